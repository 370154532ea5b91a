use serde::{Deserialize, Serialize};

/// A dynamic value held by a story variable: a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Returns the number if this value is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the string if this value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Whole numbers render without a trailing ".0" so stat
            // displays read "combat: 15" rather than "combat: 15.0".
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// How an assignment step combines the operand with the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// Replace the current value.
    Set,
    /// Add numbers, concatenate strings. Mixed types are an error.
    Add,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_number() {
        assert_eq!(Value::Number(10.0).as_number(), Some(10.0));
        assert_eq!(Value::Text("x".to_string()).as_number(), None);
    }

    #[test]
    fn as_text() {
        assert_eq!(Value::Text("sword".to_string()).as_text(), Some("sword"));
        assert_eq!(Value::Number(1.0).as_text(), None);
    }

    #[test]
    fn display_whole_number_without_fraction() {
        assert_eq!(Value::Number(15.0).to_string(), "15");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn display_text() {
        assert_eq!(Value::Text("rusty sword".to_string()).to_string(), "rusty sword");
    }

    #[test]
    fn ron_round_trip() {
        let v = Value::Text("dagger".to_string());
        let serialized = ron::to_string(&v).unwrap();
        let back: Value = ron::from_str(&serialized).unwrap();
        assert_eq!(back, v);
    }
}
