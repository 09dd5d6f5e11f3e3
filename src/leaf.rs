//! Leaf codecs: datetime and UUID strings, and primitive constructors.

use core::fmt::{self, Display};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use lexical_parse_integer::FromLexical;
use serde_json::Value;
use uuid::Uuid;

use crate::descriptor::PrimitiveKind;
use crate::instance::Instance;

// ============================================================================
// Datetime
// ============================================================================

/// An instant with or without a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datetime {
    /// No offset was given
    Naive(NaiveDateTime),
    /// Local time at a fixed offset
    Aware(DateTime<FixedOffset>),
}

impl Datetime {
    /// Whether the instant carries an offset.
    pub fn is_aware(&self) -> bool {
        matches!(self, Datetime::Aware(_))
    }

    /// Wall-clock time as written, ignoring any offset.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Datetime::Naive(dt) => *dt,
            Datetime::Aware(dt) => dt.naive_local(),
        }
    }

    /// The offset, if any.
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            Datetime::Naive(_) => None,
            Datetime::Aware(dt) => Some(*dt.offset()),
        }
    }
}

impl From<NaiveDateTime> for Datetime {
    fn from(dt: NaiveDateTime) -> Self {
        Datetime::Naive(dt)
    }
}

impl From<DateTime<FixedOffset>> for Datetime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Datetime::Aware(dt)
    }
}

impl Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datetime::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6f")),
            Datetime::Aware(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6f%:z")),
        }
    }
}

/// Name of the datetime grammar, used in diagnostics.
pub const DATETIME_FORMAT: &str = "ISO-8601 datetime (YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM])";

/// Parse `YYYY-MM-DDTHH:MM:SS[.fff|.ffffff][±HH:MM]`.
///
/// Without an offset the result is naive; with one it is aware at that
/// fixed offset.
pub fn parse_datetime(input: &str) -> Result<Datetime, &'static str> {
    let bytes = input.as_bytes();
    if bytes.len() < 19 {
        return Err("too short");
    }

    let year: i32 = digits(&bytes[0..4])?;
    separator(bytes[4], b'-')?;
    let month: u32 = digits(&bytes[5..7])?;
    separator(bytes[7], b'-')?;
    let day: u32 = digits(&bytes[8..10])?;
    separator(bytes[10], b'T')?;
    let hour: u32 = digits(&bytes[11..13])?;
    separator(bytes[13], b':')?;
    let minute: u32 = digits(&bytes[14..16])?;
    separator(bytes[16], b':')?;
    let second: u32 = digits(&bytes[17..19])?;

    let mut rest = &bytes[19..];
    let mut micro = 0;
    if let Some(fraction) = rest.strip_prefix(b".") {
        let len = fraction
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        micro = match len {
            3 => digits::<u32>(&fraction[..3])? * 1000,
            6 => digits::<u32>(&fraction[..6])?,
            _ => return Err("fractional seconds must have 3 or 6 digits"),
        };
        rest = &fraction[len..];
    }

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or("date out of range")?
        .and_hms_micro_opt(hour, minute, second, micro)
        .ok_or("time out of range")?;

    if rest.is_empty() {
        return Ok(Datetime::Naive(naive));
    }

    let offset = parse_offset(rest)?;
    naive
        .and_local_timezone(offset)
        .single()
        .map(Datetime::Aware)
        .ok_or("ambiguous local time")
}

fn parse_offset(bytes: &[u8]) -> Result<FixedOffset, &'static str> {
    if bytes.len() != 6 {
        return Err("offset must be ±HH:MM");
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err("offset must start with '+' or '-'"),
    };
    let hours: i32 = digits(&bytes[1..3])?;
    separator(bytes[3], b':')?;
    let minutes: i32 = digits(&bytes[4..6])?;
    if hours > 23 || minutes > 59 {
        return Err("offset out of range");
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or("offset out of range")
}

fn digits<T: FromLexical>(field: &[u8]) -> Result<T, &'static str> {
    if !field.iter().all(u8::is_ascii_digit) {
        return Err("expected digits");
    }
    T::from_lexical(field).map_err(|_| "number out of range")
}

fn separator(found: u8, expected: u8) -> Result<(), &'static str> {
    if found == expected {
        Ok(())
    } else {
        Err(match expected {
            b'-' => "expected '-' between date components",
            b':' => "expected ':' between time components",
            _ => "expected 'T' between date and time",
        })
    }
}

/// Render a datetime; microseconds are always written, the offset only
/// when the instant is aware.
pub fn format_datetime(datetime: &Datetime) -> String {
    datetime.to_string()
}

// ============================================================================
// UUID
// ============================================================================

/// Name of the UUID grammar, used in diagnostics.
pub const UUID_FORMAT: &str = "UUID (32 hexadecimal digits)";

/// Parse 32 hex digits, or the dashed 8-4-4-4-12 form.
pub fn parse_uuid(input: &str) -> Result<Uuid, &'static str> {
    match input.len() {
        32 | 36 => Uuid::try_parse(input).map_err(|_| "not a hexadecimal UUID"),
        _ => Err("wrong length"),
    }
}

/// 32 lowercase hex digits, no separators.
pub fn format_uuid(uuid: &Uuid) -> String {
    uuid.simple().to_string()
}

// ============================================================================
// Primitives
// ============================================================================

/// The primitive kind a JSON value natively carries, if it is a scalar.
pub fn native_kind(value: &Value) -> Option<PrimitiveKind> {
    match value {
        Value::Null => Some(PrimitiveKind::Unit),
        Value::Bool(_) => Some(PrimitiveKind::Bool),
        Value::Number(n) if n.is_f64() => Some(PrimitiveKind::Float),
        Value::Number(_) => Some(PrimitiveKind::Int),
        Value::String(_) => Some(PrimitiveKind::Str),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Single-argument constructor of a primitive kind.
///
/// Returns `None` when the kind does not accept the value.
pub fn construct(kind: PrimitiveKind, value: &Value) -> Option<Instance> {
    match (kind, value) {
        (PrimitiveKind::Unit, Value::Null) => Some(Instance::Null),
        (PrimitiveKind::Bool, Value::Bool(b)) => Some(Instance::Bool(*b)),
        (PrimitiveKind::Int, Value::Number(n)) => n
            .as_i64()
            .map(Instance::Int)
            .or_else(|| n.as_u64().map(Instance::UInt)),
        (PrimitiveKind::Int, Value::String(s)) => i64::from_lexical(s.as_bytes())
            .map(Instance::Int)
            .or_else(|_| u64::from_lexical(s.as_bytes()).map(Instance::UInt))
            .ok(),
        (PrimitiveKind::Float, Value::Number(n)) => n.as_f64().map(Instance::Float),
        (PrimitiveKind::Float, Value::String(s)) => {
            <f64 as lexical_parse_float::FromLexical>::from_lexical(s.as_bytes())
                .ok()
                .map(Instance::Float)
        }
        (PrimitiveKind::Str, Value::String(s)) => Some(Instance::Str(s.clone())),
        (PrimitiveKind::Str, Value::Number(n)) => Some(Instance::Str(render_number(n))),
        (PrimitiveKind::Str, Value::Bool(b)) => Some(Instance::Str(b.to_string())),
        _ => None,
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        itoa::Buffer::new().format(i).to_owned()
    } else if let Some(u) = n.as_u64() {
        itoa::Buffer::new().format(u).to_owned()
    } else {
        // serde_json numbers are always one of the three
        let f = n.as_f64().unwrap_or(f64::NAN);
        ryu::Buffer::new().format(f).to_owned()
    }
}
