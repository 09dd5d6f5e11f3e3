//! Emitting instances back into JSON values.

use serde_json::{Map, Number, Value};
use log::trace;

use crate::descriptor::MemberValue;
use crate::instance::Instance;
use crate::leaf;
use crate::typed::Datalize;

/// Serializes a value implementing `Datalize` to a JSON value.
pub fn to_value<T: Datalize>(value: &T) -> Value {
    emit(&value.to_instance())
}

/// Serializes a value implementing `Datalize` to a JSON string.
pub fn to_string<T: Datalize>(value: &T) -> String {
    to_value(value).to_string()
}

/// Serializes a value implementing `Datalize` to a pretty-printed JSON string.
pub fn to_string_pretty<T: Datalize>(value: &T) -> String {
    format!("{:#}", to_value(value))
}

/// Converts an instance back into a JSON value.
///
/// The instance describes itself, so no descriptor is needed. Records keep
/// their declared field order; floats that JSON cannot represent become `null`.
pub fn emit(instance: &Instance) -> Value {
    trace!("Emitting a {}", instance.kind_name());

    match instance {
        Instance::Null => Value::Null,
        Instance::Bool(b) => Value::Bool(*b),
        Instance::Int(n) => Value::Number((*n).into()),
        Instance::UInt(n) => Value::Number((*n).into()),
        Instance::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Instance::Str(s) => Value::String(s.clone()),
        Instance::Uuid(uuid) => Value::String(leaf::format_uuid(uuid)),
        Instance::Datetime(dt) => Value::String(leaf::format_datetime(dt)),
        Instance::Enum(member) => emit_member_value(member.value),
        Instance::Union(member) => emit(&member.value),
        Instance::Sequence(items) => Value::Array(items.iter().map(emit).collect()),
        Instance::Record(record) => {
            trace!("Emitting record {}", record.name);
            let mut map = Map::with_capacity(record.fields.len());
            for (name, value) in &record.fields {
                map.insert((*name).to_owned(), emit(value));
            }
            Value::Object(map)
        }
    }
}

fn emit_member_value(value: MemberValue) -> Value {
    match value {
        MemberValue::Int(n) => emit(&Instance::Int(n)),
        MemberValue::Float(n) => emit(&Instance::Float(n)),
        MemberValue::Str(s) => emit(&Instance::Str(s.to_owned())),
    }
}
