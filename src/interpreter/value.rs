use std::fmt;

/// Runtime value produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::Bool(value) => *value,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
        }
    }

    /// Numeric view used by arithmetic and comparisons. Booleans coerce to
    /// 1 and 0; strings have no numeric view.
    pub(super) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Bool(true) => Some(1.0),
            Value::Bool(false) => Some(0.0),
            Value::Str(_) => None,
        }
    }

    /// Rendering used by `print` and string concatenation. Integral numbers
    /// print without a fractional part; booleans print `True`/`False`.
    pub fn to_output(&self) -> String {
        match self {
            Value::Number(value) => value.to_string(),
            Value::Str(value) => value.clone(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Value::Number(5.0).to_output(), "5");
        assert_eq!(Value::Number(2.5).to_output(), "2.5");
        assert_eq!(Value::Number(-0.5).to_output(), "-0.5");
    }

    #[test]
    fn booleans_render_python_style() {
        assert_eq!(Value::Bool(true).to_output(), "True");
        assert_eq!(Value::Bool(false).to_output(), "False");
    }

    #[test]
    fn truthiness_follows_nonzero_and_nonempty() {
        assert!(Value::Number(1.0).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Str("x".to_string()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
    }

    #[test]
    fn booleans_coerce_to_numbers() {
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::Bool(false).as_number(), Some(0.0));
        assert_eq!(Value::Str("1".to_string()).as_number(), None);
    }
}
