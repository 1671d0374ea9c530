//! The block-rewriting state machine.
//!
//! [`Machine::step`] is a pure function of `(state, line)`: it returns the
//! next state, the lines to emit in place of the input line, and any nesting
//! diagnostics the line produced. The engine folds it over a sequence.
//!
//! ```text
//! SearchAnchor --anchor--> ExpectOpen --open--> InBody --region--> Excising
//!                              |                  |                  |
//!                              v                  v                  v
//!                         Done(Void)      Done(Matched/Void) <-- ExpectClose
//! ```

use std::fmt;

use crate::delimiter::{Delimiters, PendingTag, replace_first, replace_last};
use crate::error::Result;
use crate::line::Line;
use crate::recipe::{Extent, NestingMode, Recipe, RegionAction, RegionRule};

/// Why a pass did not produce an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    AnchorNotFound,
    OpenNotFound,
    /// Input ended before the block closed.
    Unterminated,
    /// The block closed before any region rule fired.
    NoRegion,
    /// Nesting diagnostics were raised under a strict recipe.
    Ambiguous,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AnchorNotFound => "anchor not found",
            Self::OpenNotFound => "container open not found after anchor",
            Self::Unterminated => "container close not found before end of input",
            Self::NoRegion => "no region matched inside the container",
            Self::Ambiguous => "ambiguous nesting",
        };
        f.write_str(text)
    }
}

/// A nesting ambiguity noticed while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The open line does not open exactly one delimiter.
    OpenDepth { line: usize, delta: isize },
    /// A region ended on a close token while nested delimiters were still open.
    PrematureRegionClose { region: String, line: usize, open: isize },
    /// A region's close line closed more than the region opened.
    RegionOverclosed { region: String, line: usize },
    /// The block close line was matched with delimiters still open or overclosed.
    UnbalancedBlockClose { line: usize, depth: isize },
    /// Depth counting closed the block on a line not aligned with its open line.
    MisalignedClose {
        line: usize,
        indent: String,
        expected: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Positions are reported 1-based to match editors.
        match self {
            Self::OpenDepth { line, delta } => {
                write!(f, "line {}: open line changes depth by {delta}, expected 1", line + 1)
            }
            Self::PrematureRegionClose { region, line, open } => write!(
                f,
                "line {}: region '{region}' closed with {open} nested delimiter(s) still open",
                line + 1
            ),
            Self::RegionOverclosed { region, line } => write!(
                f,
                "line {}: region '{region}' closes more delimiters than it opened",
                line + 1
            ),
            Self::UnbalancedBlockClose { line, depth } => write!(
                f,
                "line {}: container closed at nesting depth {depth}",
                line + 1
            ),
            Self::MisalignedClose {
                line,
                indent,
                expected,
            } => write!(
                f,
                "line {}: container closed at indent {:?}, expected {:?}",
                line + 1,
                indent,
                expected
            ),
        }
    }
}

/// A region that fired: positions `[start, end)` in the input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpan {
    pub rule: String,
    pub start: usize,
    pub end: usize,
    pub unwrapped: bool,
}

/// Progress through one matched container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFrame {
    pub anchor: usize,
    pub open: usize,
    /// Required indentation of the close line in indentation mode.
    pub guard_indent: String,
    /// Delimiter depth relative to the container's parent.
    pub depth: isize,
    /// An open tag still waiting for its `>`.
    pub pending: Option<PendingTag>,
    pub regions: Vec<RegionSpan>,
}

/// Progress through one region inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFrame {
    /// Index into `Recipe::regions`.
    pub rule: usize,
    pub start: usize,
    /// Block depth before the trigger line.
    pub base_depth: isize,
    /// Whether a region had already fired before this one.
    pub after_region: bool,
    pub phase: RegionPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionPhase {
    /// Trigger consumed; the next line may be the title. The trigger line is
    /// held back in case a required title turns out to be missing.
    Title { held: Line },
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    Matched { block: BlockFrame, close: usize },
    Void(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    SearchAnchor,
    ExpectOpen { anchor: usize },
    InBody(BlockFrame),
    Excising { block: BlockFrame, region: RegionFrame },
    /// At least one region fired; waiting for the container close.
    ExpectClose(BlockFrame),
    Done(Finish),
}

/// Output of a single transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: State,
    /// Output lines; each keeps the position and terminator of the input
    /// line it stands in for.
    pub emit: Vec<Line>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Step {
    fn to(state: State) -> Self {
        Self {
            state,
            emit: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn emit(mut self, line: Line) -> Self {
        self.emit.push(line);
        self
    }

    /// Emitted text, without terminators.
    pub fn texts(&self) -> Vec<&str> {
        self.emit.iter().map(|l| l.text.as_str()).collect()
    }

    fn diagnose(mut self, diagnostic: Option<Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostic);
        self
    }
}

/// Transition function for one recipe.
#[derive(Debug, Clone)]
pub struct Machine<'r> {
    recipe: &'r Recipe,
    delimiters: Delimiters,
}

impl<'r> Machine<'r> {
    pub fn new(recipe: &'r Recipe) -> Result<Self> {
        Ok(Self {
            recipe,
            delimiters: Delimiters::new(&recipe.open.token, &recipe.close.token)?,
        })
    }

    pub fn recipe(&self) -> &Recipe {
        self.recipe
    }

    /// Advance `state` by one input line.
    pub fn step(&self, state: State, line: &Line) -> Step {
        match state {
            State::SearchAnchor => {
                if line.contains(&self.recipe.anchor) {
                    tracing::debug!(line = line.index, recipe = %self.recipe.name, "anchor matched");
                    Step::to(State::ExpectOpen { anchor: line.index }).emit(line.clone())
                } else {
                    Step::to(State::SearchAnchor).emit(line.clone())
                }
            }
            State::ExpectOpen { anchor } => self.expect_open(anchor, line),
            State::InBody(block) => self.body_line(block, false, line),
            State::ExpectClose(block) => self.body_line(block, true, line),
            State::Excising { block, region } => self.region_line(block, region, line),
            done @ State::Done(_) => Step::to(done).emit(line.clone()),
        }
    }

    fn expect_open(&self, anchor: usize, line: &Line) -> Step {
        if line.is_blank() {
            return Step::to(State::ExpectOpen { anchor }).emit(line.clone());
        }
        if !line.contains(&self.recipe.open.token) {
            tracing::debug!(line = line.index, "no container open after anchor");
            return Step::to(State::Done(Finish::Void(FailureReason::OpenNotFound)))
                .emit(line.clone());
        }

        let count = self.delimiters.count(&line.text, None);
        let delta = count.delta;
        let diagnostic = (delta != 1).then_some(Diagnostic::OpenDepth {
            line: line.index,
            delta,
        });
        let block = BlockFrame {
            anchor,
            open: line.index,
            guard_indent: self
                .recipe
                .close
                .indent
                .clone()
                .unwrap_or_else(|| line.indent().to_string()),
            depth: delta.max(1),
            pending: count.pending,
            regions: Vec::new(),
        };

        let mut step = Step::to(State::InBody(block))
            .emit(line.replaced(replace_first(
                &line.text,
                &self.recipe.open.token,
                &self.recipe.open.replacement,
            )))
            .diagnose(diagnostic);
        if let Some(inject) = &self.recipe.open.inject {
            step.emit.extend(inject.lines().map(|text| line.replaced(text)));
        }
        step
    }

    fn body_line(&self, mut block: BlockFrame, after_region: bool, line: &Line) -> Step {
        let delta = self.count(&mut block, &line.text);

        if self.closes_block(&block, line, delta) {
            return self.close_block(block, after_region, line, delta);
        }

        let Some((index, rule)) = self.trigger(line) else {
            block.depth += delta;
            let state = if after_region {
                State::ExpectClose(block)
            } else {
                State::InBody(block)
            };
            return Step::to(state).emit(line.clone());
        };

        tracing::debug!(line = line.index, region = %rule.name, "region triggered");
        let base_depth = block.depth;
        block.depth += delta;

        if rule.extent == Extent::Line {
            block.regions.push(RegionSpan {
                rule: rule.name.clone(),
                start: line.index,
                end: line.index + 1,
                unwrapped: false,
            });
            return Step::to(State::ExpectClose(block));
        }

        let region = RegionFrame {
            rule: index,
            start: line.index,
            base_depth,
            after_region,
            phase: match rule.title {
                Some(_) => RegionPhase::Title {
                    held: line.clone(),
                },
                None => RegionPhase::Body,
            },
        };

        // A trigger line that opens and closes on its own is the whole region.
        if self.recipe.nesting == NestingMode::Balanced
            && block.depth <= base_depth
            && block.pending.is_none()
        {
            return self.finish_region(block, region, line, None);
        }

        Step::to(State::Excising { block, region })
    }

    fn closes_block(&self, block: &BlockFrame, line: &Line, delta: isize) -> bool {
        match self.recipe.nesting {
            NestingMode::Indentation => {
                line.text.trim() == self.recipe.close.token && line.indent() == block.guard_indent
            }
            NestingMode::Balanced => block.depth + delta <= 0,
        }
    }

    fn close_block(&self, mut block: BlockFrame, after_region: bool, line: &Line, delta: isize) -> Step {
        block.depth += delta;
        let unbalanced = (block.depth != 0).then_some(Diagnostic::UnbalancedBlockClose {
            line: line.index,
            depth: block.depth,
        });
        let misaligned = (self.recipe.nesting == NestingMode::Balanced
            && line.indent() != block.guard_indent)
            .then(|| Diagnostic::MisalignedClose {
                line: line.index,
                indent: line.indent().to_string(),
                expected: block.guard_indent.clone(),
            });
        let text = replace_last(
            &line.text,
            &self.recipe.close.token,
            &self.recipe.close.replacement,
        );

        let finish = if after_region || self.recipe.regions.is_empty() {
            tracing::debug!(line = line.index, "container closed");
            Finish::Matched {
                block,
                close: line.index,
            }
        } else {
            tracing::debug!(line = line.index, "container closed before any region fired");
            Finish::Void(FailureReason::NoRegion)
        };
        Step::to(State::Done(finish))
            .emit(line.replaced(text))
            .diagnose(unbalanced)
            .diagnose(misaligned)
    }

    /// Count `text` into `block`, carrying an unfinished open tag to the next line.
    fn count(&self, block: &mut BlockFrame, text: &str) -> isize {
        let count = self.delimiters.count(text, block.pending.take());
        block.pending = count.pending;
        count.delta
    }

    /// First region rule whose trigger the line contains.
    fn trigger(&self, line: &Line) -> Option<(usize, &'r RegionRule)> {
        self.recipe
            .regions
            .iter()
            .enumerate()
            .find(|(_, rule)| line.contains(&rule.trigger))
    }

    fn region_line(&self, mut block: BlockFrame, mut region: RegionFrame, line: &Line) -> Step {
        let rule = &self.recipe.regions[region.rule];

        if let RegionPhase::Title { held } = &region.phase {
            let title = rule.title.as_ref();
            if title.is_some_and(|t| line.contains(&t.marker)) {
                let delta = self.count(&mut block, &line.text);
                block.depth += delta;
                region.phase = RegionPhase::Body;
                if self.recipe.nesting == NestingMode::Balanced
                    && block.depth <= region.base_depth
                    && block.pending.is_none()
                {
                    return self.finish_region(block, region, line, None);
                }
                return Step::to(State::Excising { block, region });
            }

            if title.is_some_and(|t| t.required) {
                // The rule does not apply: the held trigger passes through and
                // this line is handled as an ordinary body line.
                tracing::debug!(line = line.index, region = %rule.name, "required title missing");
                let held = held.clone();
                let mut step = self.body_line(block, region.after_region, line);
                step.emit.insert(0, held);
                return step;
            }

            region.phase = RegionPhase::Body;
        }

        let delta = self.count(&mut block, &line.text);
        block.depth += delta;

        let closes = match self.recipe.nesting {
            NestingMode::Indentation => line.contains(&self.recipe.close.token),
            NestingMode::Balanced => block.depth <= region.base_depth && block.pending.is_none(),
        };
        if !closes {
            let step = Step::to(State::Excising { block, region });
            return match rule.action {
                RegionAction::Drop => step,
                RegionAction::Unwrap { .. } => step.emit(line.clone()),
            };
        }

        let diagnostic = if block.depth > region.base_depth {
            Some(Diagnostic::PrematureRegionClose {
                region: rule.name.clone(),
                line: line.index,
                open: block.depth - region.base_depth,
            })
        } else if block.depth < region.base_depth {
            Some(Diagnostic::RegionOverclosed {
                region: rule.name.clone(),
                line: line.index,
            })
        } else {
            None
        };
        self.finish_region(block, region, line, diagnostic)
    }

    /// End the region on `line` (inclusive).
    fn finish_region(
        &self,
        mut block: BlockFrame,
        region: RegionFrame,
        line: &Line,
        diagnostic: Option<Diagnostic>,
    ) -> Step {
        let rule = &self.recipe.regions[region.rule];
        let unwrapped = matches!(rule.action, RegionAction::Unwrap { .. });
        tracing::debug!(
            region = %rule.name,
            start = region.start,
            end = line.index + 1,
            unwrapped,
            "region closed"
        );
        block.regions.push(RegionSpan {
            rule: rule.name.clone(),
            start: region.start,
            end: line.index + 1,
            unwrapped,
        });

        let step = Step::to(State::ExpectClose(block)).diagnose(diagnostic);
        match &rule.action {
            RegionAction::Drop => step,
            // The trigger line itself is never kept, even when it closes the region.
            RegionAction::Unwrap { .. } if line.index == region.start => step,
            RegionAction::Unwrap { close_replacement } => step.emit(line.replaced(replace_last(
                &line.text,
                &self.recipe.close.token,
                close_replacement,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CloseRule, OpenRule, TitleRule};
    use pretty_assertions::assert_eq;

    fn recipe(nesting: NestingMode) -> Recipe {
        Recipe {
            name: "Panel".into(),
            anchor: "{tab === 'panel'".into(),
            nesting,
            strict: true,
            open: OpenRule {
                token: "<div>".into(),
                replacement: "<Card>".into(),
                inject: None,
            },
            close: CloseRule {
                token: "</div>".into(),
                replacement: "</Card>".into(),
                indent: None,
            },
            regions: vec![
                RegionRule {
                    name: "header".into(),
                    trigger: "class=\"header\"".into(),
                    extent: Extent::Block,
                    action: RegionAction::Drop,
                    title: Some(TitleRule {
                        marker: "</h3>".into(),
                        required: false,
                    }),
                },
                RegionRule {
                    name: "heading".into(),
                    trigger: "<h4>".into(),
                    extent: Extent::Line,
                    action: RegionAction::Drop,
                    title: None,
                },
            ],
        }
    }

    fn frame(depth: isize) -> BlockFrame {
        BlockFrame {
            anchor: 0,
            open: 1,
            guard_indent: "  ".into(),
            depth,
            pending: None,
            regions: Vec::new(),
        }
    }

    #[test]
    fn search_anchor_passes_other_lines_through() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::SearchAnchor, &Line::new(0, "const x = 1;"));

        assert_eq!(step.state, State::SearchAnchor);
        assert_eq!(step.texts(), vec!["const x = 1;"]);
    }

    #[test]
    fn anchor_moves_to_expect_open() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::SearchAnchor, &Line::new(3, "{tab === 'panel' && ("));

        assert_eq!(step.state, State::ExpectOpen { anchor: 3 });
        assert_eq!(step.texts(), vec!["{tab === 'panel' && ("]);
    }

    #[test]
    fn expect_open_rewrites_and_injects() {
        let mut recipe = recipe(NestingMode::Balanced);
        recipe.open.inject = Some("  action={x}\n  }>".into());
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectOpen { anchor: 0 }, &Line::new(1, "  <div>"));

        assert_eq!(step.texts(), vec!["  <Card>", "  action={x}", "  }>"]);
        assert_eq!(step.state, State::InBody(frame(1)));
        assert!(step.diagnostics.is_empty());
    }

    #[test]
    fn expect_open_skips_blank_lines() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectOpen { anchor: 0 }, &Line::new(1, "   "));

        assert_eq!(step.state, State::ExpectOpen { anchor: 0 });
        assert_eq!(step.texts(), vec!["   "]);
    }

    #[test]
    fn expect_open_without_open_voids() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectOpen { anchor: 0 }, &Line::new(1, "  <span>"));

        assert_eq!(
            step.state,
            State::Done(Finish::Void(FailureReason::OpenNotFound))
        );
        assert_eq!(step.texts(), vec!["  <span>"]);
    }

    #[test]
    fn single_line_region_is_dropped() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::InBody(frame(1)), &Line::new(5, "    <h4>Edit</h4>"));

        let mut expected = frame(1);
        expected.regions.push(RegionSpan {
            rule: "heading".into(),
            start: 5,
            end: 6,
            unwrapped: false,
        });
        assert_eq!(step.state, State::ExpectClose(expected));
        assert!(step.texts().is_empty());
    }

    #[test]
    fn close_before_region_voids() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::InBody(frame(1)), &Line::new(4, "  </div>"));

        assert_eq!(step.state, State::Done(Finish::Void(FailureReason::NoRegion)));
    }

    #[test]
    fn close_after_region_matches() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectClose(frame(1)), &Line::new(9, "  </div>"));

        assert_eq!(step.texts(), vec!["  </Card>"]);
        assert_eq!(
            step.state,
            State::Done(Finish::Matched {
                block: frame(0),
                close: 9
            })
        );
    }

    #[test]
    fn balanced_close_off_the_open_indent_is_flagged() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectClose(frame(1)), &Line::new(9, "</div>"));

        assert_eq!(
            step.diagnostics,
            vec![Diagnostic::MisalignedClose {
                line: 9,
                indent: String::new(),
                expected: "  ".into(),
            }]
        );
    }

    #[test]
    fn trigger_with_unfinished_tag_keeps_excising() {
        let mut recipe = recipe(NestingMode::Balanced);
        recipe.regions[0].title = None;
        let machine = Machine::new(&recipe).unwrap();

        let trigger = machine.step(State::InBody(frame(1)), &Line::new(2, "    <div class=\"header\""));
        assert!(matches!(trigger.state, State::Excising { .. }));

        let attrs = machine.step(trigger.state, &Line::new(3, "      onClick={() => go()}>"));
        let State::Excising { block, .. } = &attrs.state else {
            panic!("region ended early: {:?}", attrs.state);
        };
        assert_eq!(block.depth, 2);
        assert_eq!(block.pending, None);

        let close = machine.step(attrs.state, &Line::new(4, "    </div>"));
        assert!(matches!(close.state, State::ExpectClose(ref b) if b.depth == 1));
    }

    #[test]
    fn indentation_mode_ignores_close_at_other_indent() {
        let recipe = recipe(NestingMode::Indentation);
        let machine = Machine::new(&recipe).unwrap();

        let step = machine.step(State::ExpectClose(frame(2)), &Line::new(6, "    </div>"));

        assert_eq!(step.state, State::ExpectClose(frame(1)));
        assert_eq!(step.texts(), vec!["    </div>"]);
    }

    #[test]
    fn required_title_missing_releases_trigger() {
        let mut recipe = recipe(NestingMode::Balanced);
        recipe.regions[0].title.as_mut().unwrap().required = true;
        let machine = Machine::new(&recipe).unwrap();

        let trigger = machine.step(
            State::InBody(frame(1)),
            &Line::new(2, "    <div class=\"header\">"),
        );
        assert!(trigger.texts().is_empty());

        let next = machine.step(trigger.state, &Line::new(3, "      <p>no title</p>"));

        assert_eq!(
            next.texts(),
            vec!["    <div class=\"header\">", "      <p>no title</p>"]
        );
        assert_eq!(next.state, State::InBody(frame(2)));
    }

    #[test]
    fn done_is_terminal() {
        let recipe = recipe(NestingMode::Balanced);
        let machine = Machine::new(&recipe).unwrap();
        let done = State::Done(Finish::Void(FailureReason::OpenNotFound));

        let step = machine.step(done.clone(), &Line::new(10, "{tab === 'panel' && ("));

        assert_eq!(step.state, done);
        assert_eq!(step.texts(), vec!["{tab === 'panel' && ("]);
    }
}
