//! Page body classification
//!
//! Locates the outer brackets of a page body without parsing its elements.

/// What one page body contributes to the output array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContent<'a> {
    /// Trimmed inner contents of a non-empty array
    Elements(&'a str),
    /// A well-formed array with nothing inside
    Empty,
    /// Anything else; carries the raw, untrimmed body
    Malformed(&'a str),
}

impl<'a> PageContent<'a> {
    /// Text to emit as an element group, if any
    pub fn group(&self) -> Option<&'a str> {
        match *self {
            Self::Elements(inner) => Some(inner),
            Self::Malformed(raw) => Some(raw),
            Self::Empty => None,
        }
    }
}

/// Classify a raw page body
///
/// A body is an array when, after trimming whitespace, it is at least two
/// characters long and starts with `[` and ends with `]`. Exactly one
/// bracket is stripped from each end before the interior is trimmed.
pub fn classify(body: &str) -> PageContent<'_> {
    let trimmed = body.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'));

    match inner {
        Some(inner) => {
            let inner = inner.trim();
            if inner.is_empty() {
                PageContent::Empty
            } else {
                PageContent::Elements(inner)
            }
        }
        None => PageContent::Malformed(body),
    }
}
