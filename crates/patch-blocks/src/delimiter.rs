//! Delimiter recognition and nesting depth.
//!
//! Depth is counted per line: every open tag pushes, every close token pops,
//! and a tag that closes itself (`<div ... />`) is neutral. A tag is only
//! classified once its closing `>` is seen, so an open tag spread over
//! several lines counts on the line that ends it. `>` inside `{...}`
//! expressions or quoted attribute values does not end a tag.

use regex::Regex;

use crate::error::Result;

/// Compiled open/close delimiter pair for one element name.
#[derive(Debug, Clone)]
pub struct Delimiters {
    open: Regex,
    stem_len: usize,
    close: String,
}

/// An open tag whose closing `>` has not been reached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingTag {
    braces: usize,
    quote: Option<char>,
    last: Option<char>,
}

/// Depth change of one line, plus any tag left open at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count {
    pub delta: isize,
    pub pending: Option<PendingTag>,
}

enum TagEnd {
    Open(usize),
    SelfClosing(usize),
    Pending(PendingTag),
}

impl Delimiters {
    /// Build the pair from an open token such as `<div>` and a close token
    /// such as `</div>`. Attributes are allowed on counted opens, so
    /// `<div className="x">` and a bare `<div` at end of line both start a tag.
    pub fn new(open_token: &str, close_token: &str) -> Result<Self> {
        let stem = open_token.trim_end_matches('>');
        Ok(Self {
            open: Regex::new(&format!(r"{}(?:[\s>/]|$)", regex::escape(stem)))?,
            stem_len: stem.len(),
            close: close_token.to_string(),
        })
    }

    /// Net depth change contributed by a line with no tag carried into it.
    pub fn delta(&self, text: &str) -> isize {
        self.count(text, None).delta
    }

    /// Count `text`, continuing a tag left open by the previous line.
    pub fn count(&self, text: &str, carried: Option<PendingTag>) -> Count {
        let closes = text.matches(self.close.as_str()).count() as isize;
        let mut delta = -closes;
        let mut pos = 0;
        let mut pending = carried;

        loop {
            if let Some(tag) = pending.take() {
                match finish_tag(&text[pos..], tag) {
                    TagEnd::Open(len) => {
                        delta += 1;
                        pos += len;
                    }
                    TagEnd::SelfClosing(len) => pos += len,
                    TagEnd::Pending(tag) => {
                        return Count {
                            delta,
                            pending: Some(tag),
                        };
                    }
                }
            }
            match self.open.find_at(text, pos) {
                Some(m) => {
                    pos = m.start() + self.stem_len;
                    pending = Some(PendingTag::default());
                }
                None => {
                    return Count {
                        delta,
                        pending: None,
                    };
                }
            }
        }
    }

    pub fn close_token(&self) -> &str {
        &self.close
    }
}

/// Scan a tag's attributes up to the `>` that ends it.
fn finish_tag(rest: &str, mut tag: PendingTag) -> TagEnd {
    for (i, c) in rest.char_indices() {
        if let Some(q) = tag.quote {
            if c == q {
                tag.quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => tag.quote = Some(c),
            '{' => tag.braces += 1,
            '}' => tag.braces = tag.braces.saturating_sub(1),
            '>' if tag.braces == 0 => {
                let len = i + c.len_utf8();
                return if tag.last == Some('/') {
                    TagEnd::SelfClosing(len)
                } else {
                    TagEnd::Open(len)
                };
            }
            _ => {}
        }
        if !c.is_whitespace() {
            tag.last = Some(c);
        }
    }
    TagEnd::Pending(tag)
}

/// Replace the first occurrence of `token` in `text`.
pub fn replace_first(text: &str, token: &str, replacement: &str) -> String {
    text.replacen(token, replacement, 1)
}

/// Replace the last occurrence of `token` in `text`.
pub fn replace_last(text: &str, token: &str, replacement: &str) -> String {
    match text.rfind(token) {
        Some(pos) => format!(
            "{}{}{}",
            &text[..pos],
            replacement,
            &text[pos + token.len()..]
        ),
        None => text.to_string(),
    }
}
