use serde::{Deserialize, Serialize};

/// Ranking score attached to every record.
pub type Score = i64;

/// One `<label> <value>` pair extracted from an input line.
///
/// Records are immutable once built; two records are equal only when both the
/// label and the value match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    label: String,
    value: Score,
}

impl Record {
    pub fn new(label: impl Into<String>, value: Score) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> Score {
        self.value
    }

    pub fn into_label(self) -> String {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_needs_label_and_value() {
        let a = Record::new("http://test", 5);
        assert_eq!(a, Record::new("http://test", 5));
        assert_ne!(a, Record::new("http://test", 6));
        assert_ne!(a, Record::new("http://other", 5));
    }
}
