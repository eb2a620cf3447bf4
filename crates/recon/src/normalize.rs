use crate::model::Value;

/// Comparable form of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Text(String),
    Number(f64),
}

impl Normalized {
    /// Value equality. NaN equals NaN so that any value is identical to itself.
    pub fn same_as(&self, other: &Normalized) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Trim + lowercase text, pass numbers through, render anything else as text.
pub fn normalize(value: &Value) -> Normalized {
    match value {
        Value::Text(s) => Normalized::Text(fold(s)),
        Value::Number(n) => Normalized::Number(*n),
        other => Normalized::Text(fold(&other.to_string())),
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}
