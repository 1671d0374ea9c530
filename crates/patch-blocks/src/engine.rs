//! Runs a recipe over a line sequence.

use crate::error::Result;
use crate::line::{Line, LineSequence};
use crate::machine::{Diagnostic, FailureReason, Finish, Machine, RegionSpan, State};
use crate::recipe::Recipe;
use crate::scanner::scan;

/// Positions `[start, end)` of the rewritten container, open line to close
/// line inclusive, in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

/// Outcome of one pass over a sequence.
///
/// When `found` is false, `sequence` is the input unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub found: bool,
    pub sequence: LineSequence,
    pub reason: Option<FailureReason>,
    pub span: Option<BlockSpan>,
    pub regions: Vec<RegionSpan>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EditResult {
    fn failed(
        input: &LineSequence,
        reason: FailureReason,
        regions: Vec<RegionSpan>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            found: false,
            sequence: input.clone(),
            reason: Some(reason),
            span: None,
            regions,
            diagnostics,
        }
    }
}

/// Apply `recipe` to `input`.
///
/// Only the first anchor match is used; everything after the rewritten
/// container is copied through. Errors are limited to invalid recipes.
pub fn apply(recipe: &Recipe, input: &LineSequence) -> Result<EditResult> {
    recipe.validate()?;
    let machine = Machine::new(recipe)?;

    let Some(anchor) = scan(input, 0, &recipe.anchor) else {
        tracing::debug!(recipe = %recipe.name, "anchor not present");
        return Ok(EditResult::failed(
            input,
            FailureReason::AnchorNotFound,
            Vec::new(),
            Vec::new(),
        ));
    };

    let mut state = State::SearchAnchor;
    let mut emitted: Vec<Line> = Vec::with_capacity(input.len());
    let mut diagnostics = Vec::new();

    emitted.extend(input.lines()[..anchor].iter().cloned());
    for line in &input.lines()[anchor..] {
        let step = machine.step(state, line);
        state = step.state;
        emitted.extend(step.emit);
        diagnostics.extend(step.diagnostics);
    }

    for diagnostic in &diagnostics {
        tracing::warn!(recipe = %recipe.name, "{diagnostic}");
    }

    let (block, close) = match state {
        State::Done(Finish::Matched { block, close }) => (block, close),
        State::Done(Finish::Void(reason)) => {
            return Ok(EditResult::failed(input, reason, Vec::new(), diagnostics));
        }
        State::SearchAnchor => {
            return Ok(EditResult::failed(
                input,
                FailureReason::AnchorNotFound,
                Vec::new(),
                diagnostics,
            ));
        }
        State::ExpectOpen { .. } => {
            return Ok(EditResult::failed(
                input,
                FailureReason::OpenNotFound,
                Vec::new(),
                diagnostics,
            ));
        }
        State::InBody(block)
        | State::ExpectClose(block)
        | State::Excising { block, .. } => {
            return Ok(EditResult::failed(
                input,
                FailureReason::Unterminated,
                block.regions,
                diagnostics,
            ));
        }
    };

    if recipe.strict && !diagnostics.is_empty() {
        return Ok(EditResult::failed(
            input,
            FailureReason::Ambiguous,
            block.regions,
            diagnostics,
        ));
    }

    Ok(EditResult {
        found: true,
        sequence: input.rebuild(emitted),
        reason: None,
        span: Some(BlockSpan {
            start: block.open,
            end: close + 1,
        }),
        regions: block.regions,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CloseRule, Extent, NestingMode, OpenRule, RegionAction, RegionRule};
    use pretty_assertions::assert_eq;

    fn recipe() -> Recipe {
        Recipe {
            name: "Panel".into(),
            anchor: "{tab === 'panel'".into(),
            nesting: NestingMode::Balanced,
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
            regions: vec![RegionRule {
                name: "footer".into(),
                trigger: "class=\"footer\"".into(),
                extent: Extent::Block,
                action: RegionAction::Drop,
                title: None,
            }],
        }
    }

    #[test]
    fn rewrites_block_and_drops_footer() {
        let input = LineSequence::parse(
            "{tab === 'panel' && (\n  <div>\n    <p>body</p>\n    <div class=\"footer\">\n      <button />\n    </div>\n  </div>\n)}\n",
        );

        let result = apply(&recipe(), &input).unwrap();

        assert!(result.found);
        assert_eq!(
            result.sequence.render(),
            "{tab === 'panel' && (\n  <Card>\n    <p>body</p>\n  </Card>\n)}\n"
        );
        assert_eq!(result.span, Some(BlockSpan { start: 1, end: 7 }));
        assert_eq!(result.regions.len(), 1);
        assert_eq!((result.regions[0].start, result.regions[0].end), (3, 6));
    }

    #[test]
    fn missing_anchor_reports_reason() {
        let input = LineSequence::parse("<div>\n</div>\n");

        let result = apply(&recipe(), &input).unwrap();

        assert!(!result.found);
        assert_eq!(result.reason, Some(FailureReason::AnchorNotFound));
        assert_eq!(result.sequence, input);
    }

    #[test]
    fn anchor_on_last_line_is_open_not_found() {
        let input = LineSequence::parse("x\n{tab === 'panel' && (\n");

        let result = apply(&recipe(), &input).unwrap();

        assert_eq!(result.reason, Some(FailureReason::OpenNotFound));
    }

    #[test]
    fn invalid_recipe_is_an_error() {
        let mut recipe = recipe();
        recipe.open.token.clear();

        assert!(apply(&recipe, &LineSequence::parse("x")).is_err());
    }
}
