use std::fmt;

/// A discrete class label. Wraps the integer value read from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(i64);

impl Label {
    /// The label treated as positive by binary metrics.
    pub const POSITIVE: Self = Self(1);
    /// The label treated as negative by binary metrics.
    pub const NEGATIVE: Self = Self(0);

    /// Create a new label.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the raw label value.
    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Label;

    #[test]
    fn roundtrip() {
        let label = Label::new(4);
        assert_eq!(label.value(), 4);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Label::new(2)), "2");
    }

    #[test]
    fn binary_constants() {
        assert_eq!(Label::POSITIVE, Label::from(1));
        assert_eq!(Label::NEGATIVE, Label::from(0));
        assert!(Label::NEGATIVE < Label::POSITIVE);
    }
}
