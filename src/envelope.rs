use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The discriminator value marking a telemetry event.
///
/// Envelopes with other `type` values are well-formed records — the counter
/// includes them — but the streaming reader does not forward them.
pub const EVENT_KIND: &str = "evt";

/// The flat field-to-value mapping extracted from an envelope's body.
///
/// Payloads are open-ended: no field is mandatory, and the library has no
/// opinion about event shapes. [`Matcher`](crate::Matcher)s give payloads
/// meaning.
pub type Payload = serde_json::Map<String, Value>;

/// One record of the log: a type discriminator plus an untyped payload.
///
/// Envelopes are serialized as single JSON lines, e.g.
///
/// ```text
/// {"type":"evt","body":{"source":"stdout","pid":10117,"data":"true"}}
/// ```
///
/// An envelope is immutable once decoded; exactly one is produced per input
/// line. Decoding requires both fields to be present and `body` to be a JSON
/// object — anything else is a per-line decode error, which readers skip
/// rather than surface (logs are read while still being appended, so a
/// partially written final line is expected, not exceptional).
///
/// # Examples
///
/// ```
/// use evtap::Envelope;
///
/// let env = Envelope::decode(
///     r#"{"type":"evt","body":{"source":"stdout","pid":10117}}"#,
/// ).unwrap();
/// assert!(env.is_event());
/// assert_eq!(env.body["pid"], 10117);
///
/// assert!(Envelope::decode("not json").is_err());
/// assert!(Envelope::decode(r#"{"type":"evt","body":42}"#).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct Envelope {
    /// The record type discriminator (e.g. [`EVENT_KIND`]).
    ///
    /// Serialized as `"type"` in JSON.
    #[serde(rename = "type")]
    pub kind: String,

    /// The event payload. Fields are scalars in practice (identifiers,
    /// timestamps, process metadata, free-form data), but nothing is
    /// validated here.
    pub body: Payload,
}

impl Envelope {
    /// Decode one line of input into an envelope.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error for malformed JSON, a missing
    /// `type` or `body` field, or a non-object `body`.
    pub fn decode(line: &str) -> Result<Envelope, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Whether this envelope carries a telemetry event (`type == "evt"`).
    pub fn is_event(&self) -> bool {
        self.kind == EVENT_KIND
    }
}
