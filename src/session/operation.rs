//! Parsed user operations
//!
//! Accepted forms (case-insensitive): `i30`, `d30`, `insert:30`,
//! `delete:-4`, `ins 7`. Anything that is not an integer key is rejected
//! here, before it can reach the engine.

use std::fmt;
use std::str::FromStr;

use crate::SessionError;

/// One insert or delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Insert a key
    Insert(i64),
    /// Delete a key
    Delete(i64),
}

impl Operation {
    /// Key the operation targets
    pub fn value(&self) -> i64 {
        match self {
            Operation::Insert(v) | Operation::Delete(v) => *v,
        }
    }

    /// History label, e.g. `Insert 30`
    pub fn label(&self) -> String {
        match self {
            Operation::Insert(v) => format!("Insert {v}"),
            Operation::Delete(v) => format!("Delete {v}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert(v) => write!(f, "i{v}"),
            Operation::Delete(v) => write!(f, "d{v}"),
        }
    }
}

impl FromStr for Operation {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();

        let (verb, number) = match input.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((verb, number)) => (verb, number.trim()),
            None => {
                let split = input
                    .find(|c: char| c.is_ascii_digit() || c == '-' || c == '+')
                    .unwrap_or(input.len());
                (&input[..split], &input[split..])
            }
        };

        let constructor: fn(i64) -> Operation = match verb {
            "i" | "ins" | "insert" => Operation::Insert,
            "d" | "del" | "delete" => Operation::Delete,
            _ => return Err(SessionError::InvalidOperation(s.trim().to_string())),
        };

        number
            .parse::<i64>()
            .map(constructor)
            .map_err(|_| SessionError::InvalidValue(number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("i30", Operation::Insert(30) ; "short insert")]
    #[test_case("D7", Operation::Delete(7) ; "short delete uppercase")]
    #[test_case("insert:42", Operation::Insert(42) ; "long insert")]
    #[test_case("delete:-4", Operation::Delete(-4) ; "negative key")]
    #[test_case("  ins 12 ", Operation::Insert(12) ; "whitespace separated")]
    #[test_case("i-3", Operation::Insert(-3) ; "short negative")]
    #[test_case("ins\u{3000}5", Operation::Insert(5) ; "unicode whitespace separator")]
    #[test_case("del\u{3000}\u{3000}8", Operation::Delete(8) ; "repeated unicode whitespace")]
    fn test_parse_valid(input: &str, expected: Operation) {
        assert_eq!(input.parse::<Operation>().ok(), Some(expected));
    }

    #[test_case("x30" ; "unknown verb")]
    #[test_case("remove:4" ; "unknown long verb")]
    fn test_parse_unknown_verb(input: &str) {
        assert!(matches!(
            input.parse::<Operation>(),
            Err(SessionError::InvalidOperation(_))
        ));
    }

    #[test_case("i" ; "missing value")]
    #[test_case("insert:abc" ; "not a number")]
    #[test_case("d1.5" ; "fractional")]
    fn test_parse_bad_value(input: &str) {
        assert!(matches!(
            input.parse::<Operation>(),
            Err(SessionError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let op = Operation::Delete(-9);
        assert_eq!(op.to_string().parse::<Operation>().ok(), Some(op));
        assert_eq!(op.label(), "Delete -9");
        assert_eq!(op.value(), -9);
    }
}
