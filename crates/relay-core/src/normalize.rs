//! Provider payload normalization.
//!
//! Each donation platform posts its own JSON shape. A [`ProviderProfile`]
//! lists, per record field, the payload keys to try in order and the value
//! used when none of them is present. A key counts as present when its
//! value is truthy: not null, not `false`, not zero and not an empty string.
//! A present key shadows every later candidate even if its value turns out
//! to be unusable.

use serde_json::{Map, Value};

use crate::{
    error::{RelayError, Result},
    models::{DonationRecord, DonationSource},
    time::Clock,
    username::extract_username,
};

/// Inbound webhook body as an arbitrary JSON object.
pub type Payload = Map<String, Value>;

/// Candidate keys for a text field of the record.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    /// Payload keys tried in order.
    pub candidates: &'static [&'static str],
    /// Value used when no candidate is present.
    pub default: &'static str,
}

impl TextField {
    fn resolve(&self, payload: &Payload) -> String {
        first_present(payload, self.candidates).map_or_else(|| self.default.to_owned(), text_of)
    }
}

/// Candidate keys for the monetary amount.
#[derive(Debug, Clone, Copy)]
pub struct AmountField {
    /// Payload keys tried in order.
    pub candidates: &'static [&'static str],
    /// Amount used when no candidate is present or numeric.
    pub default: u64,
}

impl AmountField {
    fn resolve(&self, payload: &Payload) -> u64 {
        first_present(payload, self.candidates).and_then(floor_amount).unwrap_or(self.default)
    }
}

/// Event type gate for providers that post more than donations.
#[derive(Debug, Clone, Copy)]
pub struct Discriminator {
    /// Payload key holding the event type.
    pub field: &'static str,
    /// Event type that is relayed. Anything else is ignored.
    pub expected: &'static str,
}

/// Field mapping table for one donation provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderProfile {
    /// Source tag written into every record from this provider.
    pub source: DonationSource,
    /// Optional event type gate.
    pub discriminator: Option<Discriminator>,
    /// Donor display name.
    pub display_name: TextField,
    /// Raw donated amount.
    pub amount: AmountField,
    /// Donor message, also scanned for a target username.
    pub message: TextField,
    /// Donor email.
    pub email: TextField,
}

/// Saweria posts `type`-tagged events; only donations are relayed.
pub const SAWERIA: ProviderProfile = ProviderProfile {
    source: DonationSource::Saweria,
    discriminator: Some(Discriminator { field: "type", expected: "donation" }),
    display_name: TextField { candidates: &["donator_name"], default: "Anonymous" },
    amount: AmountField { candidates: &["amount_raw"], default: 0 },
    message: TextField { candidates: &["message"], default: "" },
    email: TextField { candidates: &["donator_email"], default: "" },
};

/// SocialBuzz has no event type and has shipped more than one field naming.
pub const SOCIALBUZZ: ProviderProfile = ProviderProfile {
    source: DonationSource::SocialBuzz,
    discriminator: None,
    display_name: TextField { candidates: &["supporter_name", "name"], default: "Anonymous" },
    amount: AmountField { candidates: &["amount", "donation_amount"], default: 0 },
    message: TextField { candidates: &["message", "supporter_message"], default: "" },
    email: TextField { candidates: &["supporter_email", "email"], default: "" },
};

const TEST_USERNAME: TextField = TextField { candidates: &["username"], default: "TestUser" };
const TEST_DISPLAY_NAME: TextField =
    TextField { candidates: &["displayName"], default: "Test Donator" };
const TEST_MESSAGE: TextField = TextField { candidates: &["message"], default: "Test message" };
const TEST_EMAIL: TextField = TextField { candidates: &["email"], default: "" };
const TEST_AMOUNT: u64 = 10_000;

/// Outcome of normalizing a provider payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Payload describes a donation and should be forwarded.
    Record(DonationRecord),
    /// Payload is a recognized event type that is not relayed.
    Ignored {
        /// Event type found in the payload, if any.
        event_type: Option<String>,
    },
}

/// Parses an inbound body into a JSON object.
///
/// # Errors
///
/// Returns `RelayError::EmptyPayload` for a blank body and
/// `RelayError::InvalidPayload` for malformed JSON or a non-object value.
pub fn parse_payload(body: &[u8]) -> Result<Payload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::EmptyPayload);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RelayError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(RelayError::InvalidPayload(e.to_string())),
    }
}

/// Maps a provider payload onto a [`DonationRecord`] using `profile`.
///
/// The username is taken from a `[Name]` prefix in the message, falling back
/// to the display name. The timestamp comes from `clock`.
///
/// # Errors
///
/// Returns `RelayError::EmptyPayload` if `payload` has no keys.
pub fn normalize(
    payload: &Payload,
    profile: &ProviderProfile,
    clock: &dyn Clock,
) -> Result<Normalized> {
    if payload.is_empty() {
        return Err(RelayError::EmptyPayload);
    }

    if let Some(discriminator) = profile.discriminator {
        let event_type = payload.get(discriminator.field);
        if event_type.and_then(Value::as_str) != Some(discriminator.expected) {
            return Ok(Normalized::Ignored { event_type: event_type.map(text_of) });
        }
    }

    let display_name = profile.display_name.resolve(payload);
    let message = profile.message.resolve(payload);
    let username = extract_username(&message, &display_name).to_owned();

    Ok(Normalized::Record(DonationRecord {
        username,
        amount: profile.amount.resolve(payload),
        timestamp: clock.unix_timestamp(),
        source: profile.source,
        email: profile.email.resolve(payload),
        display_name,
        message,
    }))
}

/// Builds a record for the manual test endpoint from optional overrides.
///
/// `amount` is read as a leading integer; zero or unparseable values fall
/// back to 10000 and negative values clamp to zero. `source` is honored only
/// when it names a known source.
pub fn synthetic_record(payload: &Payload, clock: &dyn Clock) -> DonationRecord {
    let amount = payload
        .get("amount")
        .and_then(parse_int_prefix)
        .filter(|amount| *amount != 0)
        .map_or(TEST_AMOUNT, |amount| u64::try_from(amount).unwrap_or(0));

    let source = payload
        .get("source")
        .and_then(Value::as_str)
        .and_then(|source| source.parse().ok())
        .unwrap_or(DonationSource::Test);

    DonationRecord {
        username: TEST_USERNAME.resolve(payload),
        display_name: TEST_DISPLAY_NAME.resolve(payload),
        amount,
        timestamp: clock.unix_timestamp(),
        source,
        message: TEST_MESSAGE.resolve(payload),
        email: TEST_EMAIL.resolve(payload),
    }
}

/// Floors a raw amount to whole units.
///
/// Accepts JSON numbers and numeric strings. Negative amounts clamp to zero;
/// anything else non-numeric yields `None`.
pub fn floor_amount(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| number.as_f64().map(floor_to_units)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>().ok().or_else(|| {
                text.parse::<f64>().ok().filter(|raw| raw.is_finite()).map(floor_to_units)
            })
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_units(raw: f64) -> u64 {
    if raw.is_finite() && raw > 0.0 {
        raw.floor() as u64
    } else {
        0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_int_prefix(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|raw| raw.is_finite()).map(|raw| raw.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim_start();
            let (sign, digits) = match text.as_bytes().first() {
                Some(b'-') => (-1, &text[1..]),
                Some(b'+') => (1, &text[1..]),
                _ => (1, text),
            };
            let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|magnitude| sign * magnitude)
        },
        _ => None,
    }
}

fn first_present<'a>(payload: &'a Payload, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().filter_map(|key| payload.get(*key)).find(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
