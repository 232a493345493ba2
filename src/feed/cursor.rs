//! Opaque pagination cursors.
//!
//! Three shapes exist on the wire:
//! - absent or empty: initial load, default category and window
//! - `cycle-<category>-<window>`: rotation to the next combination
//! - anything else: the upstream's own continuation token, passed through

const ROTATION_PREFIX: &str = "cycle-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cursor {
    Initial,
    Rotation { category: usize, window: usize },
    Passthrough(String),
}

impl Cursor {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Cursor::Initial,
            Some(raw) => match raw.strip_prefix(ROTATION_PREFIX) {
                Some(rest) => {
                    let mut parts = rest.split('-');
                    let category = parse_index(parts.next());
                    let window = parse_index(parts.next());
                    Cursor::Rotation { category, window }
                }
                None => Cursor::Passthrough(raw.to_string()),
            },
        }
    }
}

/// Leading decimal digits of `part`, or 0 when there are none.
fn parse_index(part: Option<&str>) -> usize {
    let part = part.unwrap_or("");
    let digits = part
        .find(|c: char| !c.is_ascii_digit())
        .map_or(part, |end| &part[..end]);
    digits.parse().unwrap_or(0)
}

/// Where a request should read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Position {
    pub category: usize,
    pub window: usize,
    pub native: Option<String>,
}

/// Encodes and decodes cursors against fixed list lengths. Indices are
/// always reduced modulo those lengths, so rotation never leaves range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorCodec {
    categories: usize,
    windows: usize,
}

impl CursorCodec {
    /// Both lengths must be non-zero.
    pub(crate) fn new(categories: usize, windows: usize) -> Self {
        Self {
            categories: categories.max(1),
            windows: windows.max(1),
        }
    }

    pub(crate) fn decode(&self, raw: Option<&str>) -> Position {
        match Cursor::parse(raw) {
            Cursor::Initial => Position {
                category: 0,
                window: 0,
                native: None,
            },
            Cursor::Rotation { category, window } => Position {
                category: category % self.categories,
                window: window % self.windows,
                native: None,
            },
            Cursor::Passthrough(token) => Position {
                category: 0,
                window: 0,
                native: Some(token),
            },
        }
    }

    /// The upstream token wins when there is one; otherwise rotate.
    pub(crate) fn encode(&self, category: usize, window: usize, native: Option<&str>) -> String {
        match native {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => self.advance(category, window),
        }
    }

    /// Next combination: category + 1, and window + 1 when categories wrap.
    pub(crate) fn advance(&self, category: usize, window: usize) -> String {
        let window = window % self.windows;
        let next_category = (category % self.categories + 1) % self.categories;
        let next_window = if next_category == 0 {
            (window + 1) % self.windows
        } else {
            window
        };
        format!("{}{}-{}", ROTATION_PREFIX, next_category, next_window)
    }
}
