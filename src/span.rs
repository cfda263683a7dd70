use std::fmt::Display;

/// The source area of a token or top-level construct, used in diagnostics
// line and column are 1-based and point at the first character
// offset and length are counted in characters
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Span {
    line: u32,
    column: u32,
    offset: u32,
    length: u32,
}

#[allow(dead_code)]
impl Span {
    pub fn new(line: u32, column: u32, offset: u32, length: u32) -> Self {
        Span {
            line,
            column,
            offset,
            length,
        }
    }
    pub fn line(&self) -> u32 {
        self.line
    }
    pub fn column(&self) -> u32 {
        self.column
    }
    pub fn offset(&self) -> u32 {
        self.offset
    }
    pub fn length(&self) -> u32 {
        self.length
    }

    /// The span from the start of self up to the end of other
    pub fn to(&self, other: &Span) -> Span {
        if cfg!(debug_assertions) && self.offset > other.offset {
            log::warn!(
                "Span::to is given in the wrong order: (self:{:?} - other:{:?}",
                self,
                other
            );
        }
        Span::new(
            self.line,
            self.column,
            self.offset,
            (other.offset + other.length).saturating_sub(self.offset),
        )
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
