//! Appointment record types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier assigned to an appointment by the store.
pub type AppointmentId = i64;

/// A booked appointment.
///
/// Field values are stored as whatever JSON the client sent, `null` included.
/// Fields missing from the create request stay `None` and are left out of the
/// serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store-assigned id.
    pub id: AppointmentId,
    /// Patient name.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub patient: Option<Value>,
    /// Appointment date, free text.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    /// Appointment time, free text.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
}

impl Appointment {
    /// Build a record from a draft and an assigned id.
    pub fn from_draft(id: AppointmentId, draft: NewAppointment) -> Self {
        Self {
            id,
            patient: draft.patient,
            date: draft.date,
            time: draft.time,
        }
    }
}

/// Payload for creating an appointment. Every field is optional and untyped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    /// Patient name.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub patient: Option<Value>,
    /// Appointment date.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    /// Appointment time.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
}

impl NewAppointment {
    /// Draft with all three fields set to strings.
    pub fn new(
        patient: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            patient: Some(Value::String(patient.into())),
            date: Some(Value::String(date.into())),
            time: Some(Value::String(time.into())),
        }
    }
}

// A present key maps to `Some`, even when its value is `null`; absent keys
// fall back to `None` through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Records loaded into a seeded store.
pub fn seed_appointments() -> Vec<Appointment> {
    vec![
        Appointment::from_draft(1, NewAppointment::new("John Doe", "2024-12-01", "10:00 AM")),
        Appointment::from_draft(2, NewAppointment::new("Jane Doe", "2024-12-02", "11:00 AM")),
    ]
}

/// Parse an id path segment the way a lenient integer parse would.
///
/// Surrounding whitespace is trimmed, then an optional sign. A `0x`/`0X`
/// prefix switches to hexadecimal. The leading run of digits is read and
/// anything after it is ignored. Returns `None` when there are no leading
/// digits or the value overflows.
pub fn parse_id(raw: &str) -> Option<AppointmentId> {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value = AppointmentId::from_str_radix(&rest[..digits_end], radix).ok()?;
    Some(if negative { -value } else { value })
}
