//! Field validation rules.

use std::fmt;
use std::sync::Arc;

use crate::model::Value;

/// A single rule: `Ok(())` or the message to show under the cell.
type Rule<T> = Arc<dyn Fn(&Value, &T) -> Result<(), String> + Send + Sync>;

/// Ordered rules for one column. The first failing rule wins.
///
/// # Example
///
/// ```
/// use docadmin_lib::model::{Record, Value};
/// use docadmin_lib::sheet::FieldRules;
///
/// let rules = FieldRules::<Record>::new()
///     .required("Content is required")
///     .max_length(10, "Too long");
///
/// let row = Record::new();
/// assert_eq!(rules.check(&Value::from(""), &row).as_deref(), Some("Content is required"));
/// assert_eq!(rules.check(&Value::from("ok"), &row), None);
/// ```
pub struct FieldRules<T> {
    rules: Vec<Rule<T>>,
}

impl<T> FieldRules<T> {
    /// No rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Run the rules against a cell.
    pub fn check(&self, value: &Value, row: &T) -> Option<String> {
        self.rules.iter().find_map(|rule| rule(value, row).err())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: 'static> FieldRules<T> {
    /// Add a custom rule that passes when `f` returns `true`.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value, &T) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules.push(Arc::new(move |v: &Value, row: &T| {
            if f(v, row) { Ok(()) } else { Err(msg.clone()) }
        }));
        self
    }

    /// Add a rule that computes its own message.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &T) -> Option<String> + Send + Sync + 'static,
    {
        self.rules
            .push(Arc::new(move |v: &Value, row: &T| f(v, row).map_or(Ok(()), Err)));
        self
    }

    /// Require a value that is not blank. Whitespace-only text is blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v, _| match v {
                Value::String(s) => !s.trim().is_empty(),
                Value::List(items) => !items.is_empty(),
                other => !other.is_null(),
            },
            msg,
        )
    }

    /// Require text of at least `min` characters. Blank passes.
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(
            move |v, _| v.as_str().is_none_or(|s| s.is_empty() || s.chars().count() >= min),
            msg,
        )
    }

    /// Require text of at most `max` characters.
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(
            move |v, _| v.as_str().is_none_or(|s| s.chars().count() <= max),
            msg,
        )
    }

    /// Require an integer within `min..=max`. Blank passes; anything that is
    /// not an integer fails.
    pub fn int_range(self, min: i64, max: i64, msg: impl Into<String>) -> Self {
        self.rule(
            move |v, _| {
                if v.is_blank() {
                    return true;
                }
                v.as_i64().is_some_and(|n| (min..=max).contains(&n))
            },
            msg,
        )
    }
}

impl<T> Default for FieldRules<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FieldRules<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldRules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_required() {
        let rules = FieldRules::<Record>::new().required("required");
        let row = Record::new();
        assert!(rules.check(&Value::Null, &row).is_some());
        assert!(rules.check(&Value::from("   "), &row).is_some());
        assert!(rules.check(&Value::from(0i64), &row).is_none());
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = FieldRules::<Record>::new()
            .required("required")
            .max_length(3, "too long");
        let row = Record::new();
        assert_eq!(rules.check(&Value::Null, &row).as_deref(), Some("required"));
        assert_eq!(rules.check(&Value::from("abcd"), &row).as_deref(), Some("too long"));
    }

    #[test]
    fn test_int_range() {
        let rules = FieldRules::<Record>::new().int_range(0, 100, "0-100");
        let row = Record::new();
        assert!(rules.check(&Value::from(50i64), &row).is_none());
        assert!(rules.check(&Value::from("50"), &row).is_none());
        assert!(rules.check(&Value::from(101i64), &row).is_some());
        assert!(rules.check(&Value::from("abc"), &row).is_some());
        assert!(rules.check(&Value::Null, &row).is_none());
    }

    #[test]
    fn test_rule_sees_row() {
        let rules = FieldRules::<Record>::new().rule(
            |_, row: &Record| row.get_str("kind") != Some("locked"),
            "locked",
        );
        let locked = Record::new().set("kind", "locked");
        assert!(rules.check(&Value::Null, &locked).is_some());
    }
}
