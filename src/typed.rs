//! Mapping between Rust types, descriptors and instances.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use uuid::Uuid;

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::error::{ConvertError, ErrorKind, Result};
use crate::instance::{Instance, UnionInstance};
use crate::leaf::Datetime;
use crate::path::PathSegment;
use crate::serialize::emit;

/// A Rust type with a static shape the conversion engine understands.
///
/// Implemented for the primitive, datetime, UUID and container types of the
/// standard library, and for user types declared through
/// [`record!`](crate::record), [`enumeration!`](crate::enumeration) and
/// [`one_of!`](crate::one_of).
pub trait Datalize: Sized {
    /// The descriptor that drives deserialization into `Self`.
    fn describe() -> TypeDescriptor;

    /// Move a converted instance into `Self`.
    ///
    /// `instance` is expected to come from converting against
    /// [`describe`](Datalize::describe); anything else is reported as a shape
    /// mismatch.
    fn from_instance(instance: Instance) -> Result<Self>;

    /// The self-describing form of `self`, used by the serializer.
    fn to_instance(&self) -> Instance;
}

impl Datalize for () {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Unit)
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Null => Ok(()),
            other => Err(other.mismatch("null")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Null
    }
}

impl Datalize for bool {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Bool)
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Bool(*self)
    }
}

fn out_of_range(value: impl Into<serde_json::Value>, target: &'static str) -> ConvertError {
    ConvertError::at_root(ErrorKind::ConversionError {
        value: value.into(),
        target,
    })
}

macro_rules! impl_datalize_int {
    ($($ty:ty),*) => {
        $(
            impl Datalize for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Primitive(PrimitiveKind::Int)
                }

                fn from_instance(instance: Instance) -> Result<Self> {
                    match instance.into_inner() {
                        Instance::Int(n) => {
                            <$ty>::try_from(n).map_err(|_| out_of_range(n, stringify!($ty)))
                        }
                        Instance::UInt(n) => {
                            <$ty>::try_from(n).map_err(|_| out_of_range(n, stringify!($ty)))
                        }
                        other => Err(other.mismatch("int")),
                    }
                }

                fn to_instance(&self) -> Instance {
                    // Anything outside i64 is a large unsigned value.
                    match i64::try_from(*self) {
                        Ok(n) => Instance::Int(n),
                        Err(_) => u64::try_from(*self).map_or(Instance::Null, Instance::UInt),
                    }
                }
            }
        )*
    };
}

impl_datalize_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Datalize for f64 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Float)
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Float(f) => Ok(f),
            other => Err(other.mismatch("float")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Float(*self)
    }
}

impl Datalize for f32 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Float)
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        let f = f64::from_instance(instance)?;
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = f as f32;
        if f.is_finite() && !narrowed.is_finite() {
            return Err(out_of_range(f, "f32"));
        }
        Ok(narrowed)
    }

    fn to_instance(&self) -> Instance {
        Instance::Float(f64::from(*self))
    }
}

impl Datalize for String {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Str)
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Str(s) => Ok(s),
            other => Err(other.mismatch("str")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Str(self.clone())
    }
}

impl Datalize for Uuid {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Uuid
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Uuid(uuid) => Ok(uuid),
            other => Err(other.mismatch("uuid")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Uuid(*self)
    }
}

impl Datalize for Datetime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Datetime
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Datetime(dt) => Ok(dt),
            other => Err(other.mismatch("datetime")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Datetime(*self)
    }
}

impl Datalize for NaiveDateTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Datetime
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match Datetime::from_instance(instance)? {
            Datetime::Naive(dt) => Ok(dt),
            aware => Err(ConvertError::at_root(ErrorKind::ConversionError {
                value: emit(&Instance::Datetime(aware)),
                target: "naive datetime",
            })),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Datetime(Datetime::Naive(*self))
    }
}

impl Datalize for DateTime<FixedOffset> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Datetime
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match Datetime::from_instance(instance)? {
            Datetime::Aware(dt) => Ok(dt),
            naive => Err(ConvertError::at_root(ErrorKind::ConversionError {
                value: emit(&Instance::Datetime(naive)),
                target: "offset-aware datetime",
            })),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Datetime(Datetime::Aware(*self))
    }
}

impl<T: Datalize> Datalize for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.into_inner() {
            Instance::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    T::from_instance(item).map_err(|e| e.within(PathSegment::Index(idx)))
                })
                .collect(),
            other => Err(other.mismatch("sequence")),
        }
    }

    fn to_instance(&self) -> Instance {
        Instance::Sequence(self.iter().map(Datalize::to_instance).collect())
    }
}

/// `Option<T>` is the union of `T` and the none-like value, in that order.
impl<T: Datalize> Datalize for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::union(
            "Optional",
            vec![T::describe(), TypeDescriptor::Primitive(PrimitiveKind::Unit)],
        )
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance {
            Instance::Null => Ok(None),
            Instance::Union(UnionInstance { candidate: 1, .. }) => Ok(None),
            Instance::Union(UnionInstance { value, .. }) => T::from_instance(*value).map(Some),
            other => T::from_instance(other).map(Some),
        }
    }

    fn to_instance(&self) -> Instance {
        match self {
            Some(value) => Instance::Union(UnionInstance::new(0, value.to_instance())),
            None => Instance::Union(UnionInstance::new(1, Instance::Null)),
        }
    }
}

impl<T: Datalize> Datalize for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        T::from_instance(instance).map(Box::new)
    }

    fn to_instance(&self) -> Instance {
        (**self).to_instance()
    }
}
