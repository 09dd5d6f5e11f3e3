//! Static descriptions of target shapes.
//!
//! A [`TypeDescriptor`] is produced once per target type (see
//! [`Datalize::describe`](crate::Datalize::describe)) and drives both the
//! deserializer and the diagnostics. Descriptors are plain immutable data.

use core::fmt::{self, Display};
use std::collections::HashMap;

use crate::instance::Instance;

// ============================================================================
// Descriptor variants
// ============================================================================

/// The shape a value is converted into.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A record with named fields
    Record(RecordDescriptor),
    /// A homogeneous sequence
    Sequence(Box<TypeDescriptor>),
    /// An ordered set of alternatives, first match wins
    Union(UnionDescriptor),
    /// A closed set of named members carrying a value
    Enum(EnumDescriptor),
    /// An ISO-8601 instant, naive or with a fixed offset
    Datetime,
    /// A 128-bit UUID
    Uuid,
    /// A scalar built from a single JSON value
    Primitive(PrimitiveKind),
}

impl TypeDescriptor {
    /// Record descriptor with fields in canonical order.
    pub fn record(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        TypeDescriptor::Record(RecordDescriptor { name, fields })
    }

    /// Sequence descriptor over `element`.
    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    /// Union descriptor; `candidates` keep their declaration order.
    pub fn union(name: &'static str, candidates: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Union(UnionDescriptor::new(name, candidates))
    }

    /// Enum descriptor.
    ///
    /// # Panics
    ///
    /// Panics if two members share a name or a value.
    pub fn enumeration(name: &'static str, members: Vec<EnumMember>) -> Self {
        TypeDescriptor::Enum(EnumDescriptor::new(name, members))
    }

    /// Primitive descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }

    /// Returns `true` for the catch-all string primitive.
    pub fn is_string(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(PrimitiveKind::Str))
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Record(record) => f.write_str(record.name),
            TypeDescriptor::Sequence(element) => write!(f, "list[{element}]"),
            TypeDescriptor::Union(union) => write!(f, "{union}"),
            TypeDescriptor::Enum(enumeration) => f.write_str(enumeration.name),
            TypeDescriptor::Datetime => f.write_str("datetime"),
            TypeDescriptor::Uuid => f.write_str("uuid"),
            TypeDescriptor::Primitive(kind) => write!(f, "{kind}"),
        }
    }
}

/// Scalar kinds built through a single-argument constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// The none-like value, accepts only `null`
    Unit,
    /// `true` / `false`
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// String; accepts any scalar except `null`
    Str,
}

impl PrimitiveKind {
    /// Type name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Unit => "null",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Str => "str",
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Records
// ============================================================================

/// Fields of a record, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    /// Record type name
    pub name: &'static str,
    /// Fields in canonical output order
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single record field.
///
/// "Absent key" is governed by `default` only; a field whose type accepts
/// `null` still has to be supplied unless it carries a default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Key in the mapping
    pub name: &'static str,
    /// Shape of the field value
    pub ty: TypeDescriptor,
    /// Value used when the key is absent
    pub default: Option<Instance>,
}

impl FieldDescriptor {
    /// Required field.
    pub fn new(name: &'static str, ty: TypeDescriptor) -> Self {
        FieldDescriptor {
            name,
            ty,
            default: None,
        }
    }

    /// Attach a default, making the field optional on input.
    pub fn with_default(mut self, default: Instance) -> Self {
        self.default = Some(default);
        self
    }

    /// Whether the key may be absent.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

// ============================================================================
// Unions
// ============================================================================

/// Ordered candidates of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDescriptor {
    /// Union type name
    pub name: &'static str,
    candidates: Vec<TypeDescriptor>,
}

impl UnionDescriptor {
    /// Creates a union; the candidate order is kept as given.
    pub fn new(name: &'static str, candidates: Vec<TypeDescriptor>) -> Self {
        assert!(
            !candidates.is_empty(),
            "union `{name}` must have at least one candidate"
        );
        UnionDescriptor { name, candidates }
    }

    /// Candidates in declaration order.
    pub fn candidates(&self) -> &[TypeDescriptor] {
        &self.candidates
    }

    /// Whether the catch-all string primitive is a candidate.
    pub fn has_string_candidate(&self) -> bool {
        self.candidates.iter().any(TypeDescriptor::is_string)
    }
}

impl Display for UnionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, candidate) in self.candidates.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{candidate}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Underlying value of an enum member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberValue {
    /// Integer member value
    Int(i64),
    /// Float member value
    Float(f64),
    /// String member value
    Str(&'static str),
}

impl Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Int(n) => write!(f, "{n}"),
            MemberValue::Float(n) => write!(f, "{n:?}"),
            MemberValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i32> for MemberValue {
    fn from(n: i32) -> Self {
        MemberValue::Int(n.into())
    }
}

impl From<i64> for MemberValue {
    fn from(n: i64) -> Self {
        MemberValue::Int(n)
    }
}

impl From<u32> for MemberValue {
    fn from(n: u32) -> Self {
        MemberValue::Int(n.into())
    }
}

impl From<f64> for MemberValue {
    fn from(n: f64) -> Self {
        MemberValue::Float(n)
    }
}

impl From<&'static str> for MemberValue {
    fn from(s: &'static str) -> Self {
        MemberValue::Str(s)
    }
}

/// A named enum member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumMember {
    /// Declared identifier
    pub name: &'static str,
    /// Underlying value
    pub value: MemberValue,
}

impl EnumMember {
    /// Creates a member.
    pub fn new(name: &'static str, value: impl Into<MemberValue>) -> Self {
        EnumMember {
            name,
            value: value.into(),
        }
    }
}

/// Member table of an enum, indexed both by value and by name.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    /// Enum type name
    pub name: &'static str,
    members: Vec<EnumMember>,
    int_values: HashMap<i64, usize>,
    float_values: HashMap<u64, usize>,
    str_values: HashMap<&'static str, usize>,
    by_name: HashMap<&'static str, usize>,
}

impl EnumDescriptor {
    /// Builds both lookup tables.
    ///
    /// # Panics
    ///
    /// Panics if two members share a name or a value.
    pub fn new(name: &'static str, members: Vec<EnumMember>) -> Self {
        let mut int_values = HashMap::new();
        let mut float_values = HashMap::new();
        let mut str_values = HashMap::new();
        let mut by_name = HashMap::with_capacity(members.len());
        for (idx, member) in members.iter().enumerate() {
            // 3 and 3.0 are the same member value.
            let duplicate = match member.value {
                MemberValue::Int(n) => {
                    float_values.contains_key(&float_key(n as f64))
                        || int_values.insert(n, idx).is_some()
                }
                MemberValue::Float(n) => {
                    integral(n).is_some_and(|i| int_values.contains_key(&i))
                        || float_values.insert(float_key(n), idx).is_some()
                }
                MemberValue::Str(s) => str_values.insert(s, idx).is_some(),
            };
            if duplicate {
                panic!("enum `{name}` has duplicate member value {}", member.value);
            }
            if by_name.insert(member.name, idx).is_some() {
                panic!("enum `{name}` has duplicate member name `{}`", member.name);
            }
        }
        EnumDescriptor {
            name,
            members,
            int_values,
            float_values,
            str_values,
            by_name,
        }
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Pass-by-value lookup.
    pub fn by_value(&self, value: MemberValue) -> Option<&EnumMember> {
        match value {
            MemberValue::Int(n) => self.by_int_value(n),
            MemberValue::Float(n) => self.by_float_value(n),
            MemberValue::Str(s) => self.by_str_value(s),
        }
    }

    /// Pass-by-value lookup of an integer; also matches an equal float
    /// member value.
    pub fn by_int_value(&self, value: i64) -> Option<&EnumMember> {
        self.int_values
            .get(&value)
            .or_else(|| self.float_values.get(&float_key(value as f64)))
            .map(|&idx| &self.members[idx])
    }

    /// Pass-by-value lookup of a float; an integral float also matches an
    /// equal integer member value.
    pub fn by_float_value(&self, value: f64) -> Option<&EnumMember> {
        self.float_values
            .get(&float_key(value))
            .or_else(|| integral(value).and_then(|n| self.int_values.get(&n)))
            .map(|&idx| &self.members[idx])
    }

    /// Pass-by-value lookup of a string member value.
    pub fn by_str_value(&self, value: &str) -> Option<&EnumMember> {
        self.str_values.get(value).map(|&idx| &self.members[idx])
    }

    /// Pass-by-name lookup.
    pub fn by_name(&self, name: &str) -> Option<&EnumMember> {
        self.by_name.get(name).map(|&idx| &self.members[idx])
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|m| m.name)
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.members == other.members
    }
}

/// Hash key of a float member value; both zeroes share one key.
fn float_key(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// The integer equal to `value`, if there is one in `i64` range.
#[allow(clippy::cast_possible_truncation)]
fn integral(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then(|| value as i64)
}
