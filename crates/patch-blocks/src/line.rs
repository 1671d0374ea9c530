//! Lines and line sequences.
//!
//! A [`LineSequence`] is the only artifact the engine reads and produces.
//! Line text never contains its terminator; each line remembers its own
//! terminator and the sequence remembers whether the last line had one, so
//! an untouched sequence renders back to the exact source bytes, mixed
//! endings included.

/// One row of source text and its position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 0-based position.
    pub index: usize,
    /// Text without the line terminator.
    pub text: String,
    /// Terminator that followed the text in the source.
    pub ending: LineEnding,
}

impl Line {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            ending: LineEnding::default(),
        }
    }

    pub fn with_ending(mut self, ending: LineEnding) -> Self {
        self.ending = ending;
        self
    }

    /// A line standing in for `self`: same position and terminator, new text.
    pub fn replaced(&self, text: impl Into<String>) -> Self {
        Self {
            index: self.index,
            text: text.into(),
            ending: self.ending,
        }
    }

    /// Leading whitespace of the line.
    pub fn indent(&self) -> &str {
        let trimmed = self.text.trim_start();
        &self.text[..self.text.len() - trimmed.len()]
    }

    /// Substring containment.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Terminator style of the first line break in `text`; `Lf` when there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(pos) if pos > 0 && text.as_bytes()[pos - 1] == b'\r' => Self::CrLf,
            _ => Self::Lf,
        }
    }
}

/// Ordered lines with contiguous positions `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineSequence {
    lines: Vec<Line>,
    /// Terminator given to lines that have no source line of their own.
    ending: LineEnding,
    trailing_newline: bool,
}

impl LineSequence {
    /// Split `text` into lines.
    pub fn parse(text: &str) -> Self {
        let ending = LineEnding::detect(text);
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);

        let lines = if text.is_empty() {
            Vec::new()
        } else {
            let pieces: Vec<&str> = body.split('\n').collect();
            let last = pieces.len() - 1;
            pieces
                .into_iter()
                .enumerate()
                .map(|(index, raw)| {
                    // Only a '\r' directly before a '\n' is part of the terminator.
                    let terminated = index < last || trailing_newline;
                    match raw.strip_suffix('\r') {
                        Some(text) if terminated => {
                            Line::new(index, text).with_ending(LineEnding::CrLf)
                        }
                        _ => Line::new(index, raw),
                    }
                })
                .collect()
        };

        Self {
            lines,
            ending,
            trailing_newline,
        }
    }

    /// Build a sequence from replacement text, renumbering positions from 0.
    /// Every line gets the first terminator style of `self`.
    pub fn derive<I, S>(&self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ending = self.ending;
        self.rebuild(
            texts
                .into_iter()
                .map(|text| Line::new(0, text).with_ending(ending)),
        )
    }

    /// Build a sequence from edited lines, renumbering positions from 0 and
    /// keeping each line's own terminator.
    pub fn rebuild(&self, lines: impl IntoIterator<Item = Line>) -> Self {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| Line { index, ..line })
            .collect();
        Self {
            lines,
            ending: self.ending,
            trailing_newline: self.trailing_newline,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First terminator style found in the source.
    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Line texts, without terminators.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Render back to text.
    pub fn render(&self) -> String {
        let last = self.lines.len().saturating_sub(1);
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&line.text);
            if i < last || self.trailing_newline {
                out.push_str(line.ending.as_str());
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a LineSequence {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("one")]
    #[case("one\n")]
    #[case("one\ntwo")]
    #[case("one\r\ntwo\r\n")]
    #[case("\n\n")]
    #[case("  <div>\n  </div>\n")]
    #[case("a\r\nb\nc\r\n")]
    #[case("a\nb\r")]
    #[case("\r\n")]
    fn parse_then_render_is_identity(#[case] text: &str) {
        assert_eq!(LineSequence::parse(text).render(), text);
    }

    #[test]
    fn positions_are_contiguous() {
        let seq = LineSequence::parse("a\nb\nc\n");
        let indices: Vec<_> = seq.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn crlf_is_stripped_from_text() {
        let seq = LineSequence::parse("<div>\r\n</div>\r\n");
        assert_eq!(seq.ending(), LineEnding::CrLf);
        assert_eq!(seq.texts(), vec!["<div>", "</div>"]);
    }

    #[test]
    fn derive_renumbers_and_keeps_endings() {
        let seq = LineSequence::parse("a\r\nb\r\n");
        let derived = seq.derive(["x", "y", "z"]);
        assert_eq!(derived.get(2).map(|l| l.index), Some(2));
        assert_eq!(derived.render(), "x\r\ny\r\nz\r\n");
    }

    #[test]
    fn mixed_endings_are_kept_per_line() {
        let seq = LineSequence::parse("a\r\nb\nc\n");
        let endings: Vec<_> = seq.iter().map(|l| l.ending).collect();
        assert_eq!(endings, vec![LineEnding::CrLf, LineEnding::Lf, LineEnding::Lf]);

        let rebuilt = seq.rebuild(seq.iter().cloned());
        assert_eq!(rebuilt.render(), "a\r\nb\nc\n");
    }

    #[test]
    fn rebuild_renumbers_and_keeps_each_terminator() {
        let seq = LineSequence::parse("a\r\nb\nc\n");
        let b = seq.get(1).unwrap();
        let rebuilt = seq.rebuild([
            seq.get(0).unwrap().clone(),
            b.replaced("B1"),
            b.replaced("B2"),
            seq.get(2).unwrap().clone(),
        ]);

        assert_eq!(rebuilt.get(3).map(|l| l.index), Some(3));
        assert_eq!(rebuilt.render(), "a\r\nB1\nB2\nc\n");
    }

    #[test]
    fn indent_is_leading_whitespace() {
        let line = Line::new(0, "\t  </div>");
        assert_eq!(line.indent(), "\t  ");
        assert_eq!(Line::new(1, "</div>").indent(), "");
    }
}
