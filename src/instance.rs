//! Typed instances: the in-memory result of a conversion.
//!
//! An [`Instance`] is self-describing: the serializer walks it without any
//! descriptor, and [`Datalize::from_instance`](crate::Datalize::from_instance)
//! moves it into a concrete Rust type.

use core::mem;

use uuid::Uuid;

use crate::descriptor::MemberValue;
use crate::error::{ConvertError, ErrorKind, Result};
use crate::leaf::Datetime;
use crate::path::{Path, PathSegment};
use crate::typed::Datalize;

/// A converted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    /// The none-like value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Unsigned integer above `i64::MAX`
    UInt(u64),
    /// Float
    Float(f64),
    /// String
    Str(String),
    /// UUID
    Uuid(Uuid),
    /// Naive or offset-aware datetime
    Datetime(Datetime),
    /// Resolved enum member
    Enum(EnumInstance),
    /// Value that won a union resolution
    Union(UnionInstance),
    /// Sequence elements, in order
    Sequence(Vec<Instance>),
    /// Record fields, in declaration order
    Record(RecordInstance),
}

impl Instance {
    /// Short name of the instance kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instance::Null => "null",
            Instance::Bool(_) => "bool",
            Instance::Int(_) | Instance::UInt(_) => "int",
            Instance::Float(_) => "float",
            Instance::Str(_) => "str",
            Instance::Uuid(_) => "uuid",
            Instance::Datetime(_) => "datetime",
            Instance::Enum(_) => "enum member",
            Instance::Union(_) => "union member",
            Instance::Sequence(_) => "sequence",
            Instance::Record(_) => "record",
        }
    }

    /// Strips any union wrappers.
    pub fn into_inner(self) -> Instance {
        match self {
            Instance::Union(member) => member.value.into_inner(),
            other => other,
        }
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> ConvertError {
        ConvertError::new(
            ErrorKind::ShapeMismatch {
                expected,
                got: self.kind_name(),
            },
            Path::root(),
        )
    }
}

/// A record's fields with their values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstance {
    /// Record type name
    pub name: &'static str,
    /// Fields in declaration order
    pub fields: Vec<(&'static str, Instance)>,
}

impl RecordInstance {
    /// Creates a record instance.
    pub fn new(name: &'static str, fields: Vec<(&'static str, Instance)>) -> Self {
        RecordInstance { name, fields }
    }

    /// Unwraps a record instance or reports a shape mismatch.
    pub fn expect(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Record(record) => Ok(record),
            other => Err(other.mismatch("record")),
        }
    }

    /// Borrow a field value.
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Moves a field out and converts it to `T`.
    ///
    /// The slot is left as [`Instance::Null`].
    pub fn take<T: Datalize>(&mut self, name: &'static str) -> Result<T> {
        let record = self.name;
        let slot = self
            .fields
            .iter_mut()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                ConvertError::new(
                    ErrorKind::MissingField {
                        field: name,
                        record,
                    },
                    Path::root(),
                )
            })?;
        T::from_instance(mem::replace(slot, Instance::Null))
            .map_err(|e| e.within(PathSegment::Field(name)))
    }
}

/// A resolved enum member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumInstance {
    /// Enum type name
    pub enum_name: &'static str,
    /// Member name
    pub name: &'static str,
    /// Member value, which is what gets serialized
    pub value: MemberValue,
}

impl EnumInstance {
    /// Creates an enum instance.
    pub fn new(enum_name: &'static str, name: &'static str, value: MemberValue) -> Self {
        EnumInstance {
            enum_name,
            name,
            value,
        }
    }

    /// Unwraps an enum instance or reports a shape mismatch.
    pub fn expect(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Enum(member) => Ok(member),
            other => Err(other.mismatch("enum member")),
        }
    }
}

/// The candidate that won a union resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionInstance {
    /// Index of the winning candidate in declaration order
    pub candidate: usize,
    /// The converted value
    pub value: Box<Instance>,
}

impl UnionInstance {
    /// Creates a union instance.
    pub fn new(candidate: usize, value: Instance) -> Self {
        UnionInstance {
            candidate,
            value: Box::new(value),
        }
    }

    /// Unwraps a union instance or reports a shape mismatch.
    pub fn expect(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Union(member) => Ok(member),
            other => Err(other.mismatch("union member")),
        }
    }
}
