//! Recursive descent conversion of JSON values, guided by type descriptors.

use core::fmt::{self, Display};

use serde_json::{Map, Value};

use crate::descriptor::{
    EnumDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor, UnionDescriptor,
};
use crate::error::{ConvertError, ErrorKind, Result};
use crate::instance::{EnumInstance, Instance, RecordInstance, UnionInstance};
use crate::leaf;
use crate::path::{Path, PathSegment};
use crate::typed::Datalize;

/// Find the member name closest to an unknown one.
/// Returns Some(suggestion) if a match with similarity >= 0.6 is found.
fn find_similar_member(unknown: &str, enumeration: &EnumDescriptor) -> Option<&'static str> {
    let mut best_match: Option<(&'static str, f64)> = None;

    for candidate in enumeration.member_names() {
        let similarity = strsim::jaro_winkler(unknown, candidate);
        if similarity >= 0.6 && best_match.is_none_or(|(_, best_sim)| similarity > best_sim) {
            best_match = Some((candidate, similarity));
        }
    }

    best_match.map(|(name, _)| name)
}

/// Short name of a value's structural kind.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

// ============================================================================
// Advisories
// ============================================================================

/// Non-fatal observation made during a conversion.
///
/// Raised when a union containing the string candidate has to fall back to
/// trying candidates in order: string accepts almost anything, so it may
/// shadow a more specific candidate declared after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// Where the union was resolved
    pub path: Path,
    /// The union, rendered
    pub union: String,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ambiguous union `{}` at {}: string candidate may shadow other matches",
            self.union, self.path
        )
    }
}

// ============================================================================
// Deserializer
// ============================================================================

/// Converts values against descriptors, collecting advisories on the way.
#[derive(Debug, Default)]
pub struct Deserializer {
    path: Path,
    depth: usize,
    max_depth: Option<usize>,
    advisories: Vec<Advisory>,
}

impl Deserializer {
    /// Create a deserializer with no depth limit.
    pub fn new() -> Self {
        Deserializer::default()
    }

    /// Fail with [`ErrorKind::DepthLimitExceeded`] once descriptors nest
    /// deeper than `limit`.
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Advisories raised so far.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Consume the deserializer, keeping its advisories.
    pub fn into_advisories(self) -> Vec<Advisory> {
        self.advisories
    }

    fn error(&self, kind: ErrorKind) -> ConvertError {
        ConvertError::new(kind, self.path.clone())
    }

    fn mismatch(&self, expected: &'static str, value: &Value) -> ConvertError {
        self.error(ErrorKind::ShapeMismatch {
            expected,
            got: value_kind(value),
        })
    }

    /// Main entry point: convert `value` into an instance of `target`.
    pub fn convert(&mut self, value: &Value, target: &TypeDescriptor) -> Result<Instance> {
        log::trace!("convert: target={target}, value={}", value_kind(value));

        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return Err(self.error(ErrorKind::DepthLimitExceeded { limit }));
            }
        }

        self.depth += 1;
        let result = match target {
            TypeDescriptor::Record(record) => self.convert_record(value, record),
            TypeDescriptor::Sequence(element) => self.convert_sequence(value, element),
            TypeDescriptor::Union(union) => self.convert_union(value, union),
            TypeDescriptor::Enum(enumeration) => self.convert_enum(value, enumeration),
            TypeDescriptor::Datetime => self.convert_datetime(value),
            TypeDescriptor::Uuid => self.convert_uuid(value),
            TypeDescriptor::Primitive(kind) => self.convert_primitive(value, *kind),
        };
        self.depth -= 1;
        result
    }

    fn convert_child(
        &mut self,
        segment: PathSegment,
        value: &Value,
        target: &TypeDescriptor,
    ) -> Result<Instance> {
        self.path.push(segment);
        let result = self.convert(value, target);
        self.path.pop();
        result
    }

    /// Convert a mapping into a record; every required field must be present.
    fn convert_record(&mut self, value: &Value, record: &RecordDescriptor) -> Result<Instance> {
        let Value::Object(map) = value else {
            return Err(self.mismatch("mapping", value));
        };

        log_unknown_keys(map, record);

        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let converted = match (map.get(field.name), &field.default) {
                (Some(supplied), _) => {
                    self.convert_child(PathSegment::Field(field.name), supplied, &field.ty)?
                }
                (None, Some(default)) => {
                    log::trace!("field `{}` absent, using its default", field.name);
                    default.clone()
                }
                (None, None) => {
                    return Err(self.error(ErrorKind::MissingField {
                        field: field.name,
                        record: record.name,
                    }));
                }
            };
            fields.push((field.name, converted));
        }

        Ok(Instance::Record(RecordInstance::new(record.name, fields)))
    }

    fn convert_sequence(&mut self, value: &Value, element: &TypeDescriptor) -> Result<Instance> {
        let Value::Array(items) = value else {
            return Err(self.mismatch("list", value));
        };

        let mut converted = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            converted.push(self.convert_child(PathSegment::Index(idx), item, element)?);
        }
        Ok(Instance::Sequence(converted))
    }

    /// Resolve a union: exact native kind first, then candidates in order.
    fn convert_union(&mut self, value: &Value, union: &UnionDescriptor) -> Result<Instance> {
        let candidates = union.candidates();

        // Input that already carries an unambiguous scalar kind is taken as is.
        if let Some(native) = leaf::native_kind(value) {
            for (idx, candidate) in candidates.iter().enumerate() {
                if let TypeDescriptor::Primitive(kind) = candidate {
                    if *kind == native && *kind != PrimitiveKind::Str {
                        if let Some(instance) = leaf::construct(*kind, value) {
                            log::trace!("union `{union}`: exact {kind} match");
                            return Ok(Instance::Union(UnionInstance::new(idx, instance)));
                        }
                    }
                }
            }
        }

        if union.has_string_candidate() {
            let advisory = Advisory {
                path: self.path.clone(),
                union: union.to_string(),
            };
            log::warn!("{advisory}");
            self.advisories.push(advisory);
        }

        let mut failures = Vec::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            let advisories_before = self.advisories.len();
            match self.convert(value, candidate) {
                Ok(instance) => return Ok(Instance::Union(UnionInstance::new(idx, instance))),
                Err(e) => {
                    log::debug!("union `{union}`: candidate {candidate} rejected: {e}");
                    self.advisories.truncate(advisories_before);
                    failures.push(e);
                }
            }
        }

        Err(self.error(ErrorKind::UnionExhausted {
            union: union.to_string(),
            attempted: candidates.iter().map(ToString::to_string).collect(),
            failures,
        }))
    }

    /// Resolve an enum member by value, then by name.
    fn convert_enum(&mut self, value: &Value, enumeration: &EnumDescriptor) -> Result<Instance> {
        let member = match value {
            Value::Number(n) => match n.as_i64() {
                Some(int) => enumeration.by_int_value(int),
                None => n.as_f64().and_then(|float| enumeration.by_float_value(float)),
            },
            Value::String(s) => enumeration
                .by_str_value(s)
                .or_else(|| enumeration.by_name(s)),
            _ => None,
        };

        match member {
            Some(member) => Ok(Instance::Enum(EnumInstance::new(
                enumeration.name,
                member.name,
                member.value,
            ))),
            None => {
                let suggestion = match value {
                    Value::String(s) => find_similar_member(s, enumeration),
                    _ => None,
                };
                Err(self.error(ErrorKind::EnumLookupFailed {
                    value: value.clone(),
                    enum_name: enumeration.name,
                    suggestion,
                }))
            }
        }
    }

    fn convert_datetime(&mut self, value: &Value) -> Result<Instance> {
        let Value::String(s) = value else {
            return Err(self.mismatch("string", value));
        };
        leaf::parse_datetime(s)
            .map(Instance::Datetime)
            .map_err(|reason| {
                self.error(ErrorKind::InvalidFormat {
                    value: s.clone(),
                    expected: leaf::DATETIME_FORMAT,
                    reason,
                })
            })
    }

    fn convert_uuid(&mut self, value: &Value) -> Result<Instance> {
        let Value::String(s) = value else {
            return Err(self.mismatch("string", value));
        };
        leaf::parse_uuid(s).map(Instance::Uuid).map_err(|reason| {
            self.error(ErrorKind::InvalidFormat {
                value: s.clone(),
                expected: leaf::UUID_FORMAT,
                reason,
            })
        })
    }

    fn convert_primitive(&mut self, value: &Value, kind: PrimitiveKind) -> Result<Instance> {
        leaf::construct(kind, value).ok_or_else(|| {
            self.error(ErrorKind::ConversionError {
                value: value.clone(),
                target: kind.name(),
            })
        })
    }
}

fn log_unknown_keys(map: &Map<String, Value>, record: &RecordDescriptor) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    for key in map.keys() {
        if record.field(key).is_none() {
            log::trace!("skipping unknown field `{key}` of {}", record.name);
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Convert `value` into an instance of `target`.
pub fn convert(value: &Value, target: &TypeDescriptor) -> Result<Instance> {
    Deserializer::new().convert(value, target)
}

/// Convert a JSON value into `T`.
pub fn from_value<T: Datalize>(value: &Value) -> Result<T> {
    let instance = convert(value, &T::describe())?;
    T::from_instance(instance)
}

/// Parse JSON text and convert it into `T`.
pub fn from_str<T: Datalize>(input: &str) -> Result<T> {
    let value: Value = serde_json::from_str(input)?;
    from_value(&value)
}
