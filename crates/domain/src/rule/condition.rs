//! Condition — a guard evaluated against the event payload.
//!
//! All conditions on a rule must hold (logical AND); a rule with no
//! conditions fires on every occurrence of its event type. OR semantics
//! are expressed as two rules with overlapping triggers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EvaluationError;
use crate::template::lookup;

/// Comparison operator applied to one payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    /// Membership test; the comparison value must be an array.
    In,
    /// Presence test; the comparison value must be a boolean.
    Exists,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::In => "in",
            Self::Exists => "exists",
        };
        f.write_str(s)
    }
}

/// One field-path comparison within a rule's trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dotted path into the event payload, e.g. `"order.total"`.
    pub field: String,
    pub operator: Operator,
    /// Comparison value; its expected JSON type depends on the operator.
    pub value: Value,
}

impl Condition {
    /// Evaluate this condition against an event payload.
    ///
    /// A missing field evaluates to `false` for every operator except
    /// `exists: false`, which evaluates to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] when the comparison value has the
    /// wrong JSON type for the operator (a malformed rule, not a
    /// property of the event).
    pub fn evaluate(&self, payload: &Value) -> Result<bool, EvaluationError> {
        let actual = lookup(payload, &self.field);
        match self.operator {
            Operator::Equals => Ok(actual.is_some_and(|v| json_eq(v, &self.value))),
            Operator::NotEquals => Ok(actual.is_some_and(|v| !json_eq(v, &self.value))),
            Operator::GreaterThan => {
                let expected = self.expect_number()?;
                Ok(actual.and_then(Value::as_f64).is_some_and(|v| v > expected))
            }
            Operator::LessThan => {
                let expected = self.expect_number()?;
                Ok(actual.and_then(Value::as_f64).is_some_and(|v| v < expected))
            }
            Operator::In => {
                let set = self.value.as_array().ok_or_else(|| {
                    EvaluationError::ExpectedArray {
                        field: self.field.clone(),
                    }
                })?;
                Ok(actual.is_some_and(|v| set.iter().any(|member| json_eq(v, member))))
            }
            Operator::Exists => {
                let expected =
                    self.value
                        .as_bool()
                        .ok_or_else(|| EvaluationError::ExpectedBool {
                            field: self.field.clone(),
                        })?;
                Ok(actual.is_some() == expected)
            }
        }
    }

    fn expect_number(&self) -> Result<f64, EvaluationError> {
        self.value
            .as_f64()
            .ok_or_else(|| EvaluationError::ExpectedNumber {
                field: self.field.clone(),
            })
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.operator, self.field, self.value)
    }
}

/// Evaluate all conditions (logical AND). Returns `true` if empty.
///
/// # Errors
///
/// Propagates the first [`EvaluationError`] from a malformed condition.
pub fn evaluate_all(conditions: &[Condition], payload: &Value) -> Result<bool, EvaluationError> {
    for condition in conditions {
        if !condition.evaluate(payload)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// JSON equality that compares numbers numerically, so an integer `1`
/// in the payload matches a `1.0` in the rule.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}
