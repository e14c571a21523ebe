use crate::envelope::Payload;
use serde_json::Value;

/// A composable, side-effect-free predicate over a [`Payload`].
///
/// Matchers are plain values: cheap to clone, `Send + Sync`, and safe to
/// share across any number of concurrently running readers. They have no
/// identity beyond their behavior — build one, hand it to
/// [`stream_events`](crate::stream_events), reuse it for the next pass.
///
/// The algebra composes with [`any`](Matcher::any) (OR) and
/// [`all`](Matcher::all) (AND); both are associative and commutative in
/// their boolean result.
///
/// # Examples
///
/// ```
/// use evtap::{Envelope, Matcher};
///
/// let env = Envelope::decode(
///     r#"{"type":"evt","body":{"source":"stdout","pid":10117,"data":"true"}}"#,
/// ).unwrap();
///
/// assert!(Matcher::always().matches(&env.body));
/// assert!(Matcher::field("pid", 10117).matches(&env.body));
/// assert!(!Matcher::field("pid", 10118).matches(&env.body));
/// assert!(Matcher::mention("stdout").matches(&env.body));
///
/// let either = Matcher::any([
///     Matcher::field("source", "foo"),
///     Matcher::field("pid", 10117),
/// ]);
/// assert!(either.matches(&env.body));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Matches every payload.
    Always,
    /// Matches payloads whose named field equals a value.
    Field(String, Value),
    /// Matches payloads where any field's text equals a needle.
    Mention(String),
    /// Logical OR over sub-matchers.
    Any(Vec<Matcher>),
    /// Logical AND over sub-matchers.
    All(Vec<Matcher>),
}

impl Matcher {
    /// Match every payload. The default, no-op filter.
    pub fn always() -> Matcher {
        Matcher::Always
    }

    /// Match payloads that contain `name` with a value equal to `value`
    /// under the field's native type.
    ///
    /// Numbers compare numerically — `field("pid", 10118)` matches a payload
    /// whose `pid` was logged as the integer `10118`, and a float matches
    /// exactly as logged (no tolerance). Strings and booleans compare by
    /// JSON value equality. A payload without the field never matches; it
    /// is not an error.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Matcher {
        Matcher::Field(name.into(), value.into())
    }

    /// Match payloads where **any** field, rendered as text, equals
    /// `needle` — an ad-hoc "does this event mention X anywhere" query.
    ///
    /// This is whole-value equality scanned across all fields, not substring
    /// search: `mention("std")` does not match a `"stdout"` field, while
    /// `mention("10117")` matches a numeric pid `10117`.
    pub fn mention(needle: impl Into<String>) -> Matcher {
        Matcher::Mention(needle.into())
    }

    /// Logical OR: match iff at least one of `matchers` matches.
    ///
    /// With zero matchers this never matches (vacuous OR).
    pub fn any(matchers: impl IntoIterator<Item = Matcher>) -> Matcher {
        Matcher::Any(matchers.into_iter().collect())
    }

    /// Logical AND: match iff every one of `matchers` matches.
    ///
    /// With zero matchers this always matches (vacuous AND), the same
    /// observable behavior as [`always`](Matcher::always).
    pub fn all(matchers: impl IntoIterator<Item = Matcher>) -> Matcher {
        Matcher::All(matchers.into_iter().collect())
    }

    /// Evaluate this matcher against a payload.
    pub fn matches(&self, payload: &Payload) -> bool {
        match self {
            Matcher::Always => true,
            Matcher::Field(name, value) => {
                payload.get(name).is_some_and(|v| scalar_eq(v, value))
            }
            Matcher::Mention(needle) => payload.values().any(|v| text_eq(v, needle)),
            Matcher::Any(matchers) => matchers.iter().any(|m| m.matches(payload)),
            Matcher::All(matchers) => matchers.iter().all(|m| m.matches(payload)),
        }
    }
}

/// Equality under the field's native type.
///
/// JSON numbers compare by numeric value so that an integer query matches
/// the integer it was logged as; serde_json's own `PartialEq` would keep
/// `10118` and `10118.0` distinct.
fn scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Whole-value equality against a field's textual representation.
fn text_eq(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s == needle,
        other => other.to_string() == needle,
    }
}
