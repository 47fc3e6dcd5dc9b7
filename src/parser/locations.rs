#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Location {
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Position reached after reading `text` starting from `self`.
    pub(super) fn advanced_by(self, text: &str) -> Self {
        text.chars().fold(self, |loc, chr| {
            if chr == '\n' {
                Self::new(loc.line + 1, 1)
            } else {
                Self::new(loc.line, loc.column + 1)
            }
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub(crate) start: Location,
    pub(crate) end: Location,
}

impl Span {
    pub(super) fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Location {
        self.start
    }

    pub fn end(&self) -> Location {
        self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)
    }
}
