//! Declaration macros that derive [`Datalize`](crate::Datalize) for user types.

/// Declare a record struct and implement [`Datalize`](crate::Datalize) for it.
///
/// A field written as `name: Type = expr` carries a default and may be absent
/// from the input; every other field is required.
///
/// ```
/// datalize::record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Point {
///         pub x: i64,
///         pub y: i64 = 0,
///     }
/// }
///
/// let point: Point = datalize::from_str(r#"{"x": 3}"#).unwrap();
/// assert_eq!(point, Point { x: 3, y: 0 });
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Datalize for $name {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::record(
                    stringify!($name),
                    vec![$($crate::__record_field!($field: $ty $(= $default)?)),*],
                )
            }

            #[allow(unused_mut)]
            fn from_instance(instance: $crate::Instance) -> $crate::Result<Self> {
                let mut record = $crate::RecordInstance::expect(instance)?;
                Ok($name {
                    $($field: record.take(stringify!($field))?,)*
                })
            }

            fn to_instance(&self) -> $crate::Instance {
                $crate::Instance::Record($crate::RecordInstance::new(
                    stringify!($name),
                    vec![$((stringify!($field), $crate::Datalize::to_instance(&self.$field))),*],
                ))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($field:ident : $ty:ty) => {
        $crate::FieldDescriptor::new(stringify!($field), <$ty as $crate::Datalize>::describe())
    };
    ($field:ident : $ty:ty = $default:expr) => {
        $crate::FieldDescriptor::new(stringify!($field), <$ty as $crate::Datalize>::describe())
            .with_default({
                let default: $ty = $default;
                $crate::Datalize::to_instance(&default)
            })
    };
}

/// Declare a fieldless enum whose members carry an integer or string value.
///
/// Members resolve from either their value or their name; `as "name"`
/// overrides the name, which otherwise is the variant identifier. Output
/// always uses the value.
///
/// ```
/// datalize::enumeration! {
///     #[derive(Debug, PartialEq)]
///     pub enum Level {
///         Low as "low" = 1,
///         High as "high" = 2,
///     }
/// }
///
/// assert_eq!(datalize::from_str::<Level>("2").unwrap(), Level::High);
/// assert_eq!(datalize::from_str::<Level>(r#""low""#).unwrap(), Level::Low);
/// assert_eq!(datalize::to_string(&Level::High), "2");
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(as $rename:literal)? = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Declared member name.
            pub fn member_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $crate::__member_name!($variant $(as $rename)?),)*
                }
            }

            /// Underlying member value.
            pub fn member_value(&self) -> $crate::MemberValue {
                match self {
                    $($name::$variant => $crate::MemberValue::from($value),)*
                }
            }
        }

        impl $crate::Datalize for $name {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::enumeration(
                    stringify!($name),
                    vec![$($crate::EnumMember::new(
                        $crate::__member_name!($variant $(as $rename)?),
                        $value,
                    )),*],
                )
            }

            fn from_instance(instance: $crate::Instance) -> $crate::Result<Self> {
                let member = $crate::EnumInstance::expect(instance)?;
                $(
                    if member.name == $crate::__member_name!($variant $(as $rename)?) {
                        return Ok($name::$variant);
                    }
                )*
                Err($crate::ConvertError::at_root($crate::ErrorKind::EnumLookupFailed {
                    value: $crate::emit(&$crate::Instance::Enum(member)),
                    enum_name: stringify!($name),
                    suggestion: None,
                }))
            }

            fn to_instance(&self) -> $crate::Instance {
                $crate::Instance::Enum($crate::EnumInstance::new(
                    stringify!($name),
                    self.member_name(),
                    self.member_value(),
                ))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_name {
    ($variant:ident) => {
        stringify!($variant)
    };
    ($variant:ident as $rename:literal) => {
        $rename
    };
}

/// Declare a union: an enum of single-payload variants whose payload types
/// are the candidates, tried in declaration order.
///
/// ```
/// datalize::one_of! {
///     #[derive(Debug, PartialEq)]
///     pub enum Number {
///         Float(f64),
///         Int(i64),
///     }
/// }
///
/// assert_eq!(datalize::from_str::<Number>("7").unwrap(), Number::Int(7));
/// assert_eq!(datalize::from_str::<Number>("7.5").unwrap(), Number::Float(7.5));
/// ```
#[macro_export]
macro_rules! one_of {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
        }

        impl $crate::Datalize for $name {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::union(
                    stringify!($name),
                    vec![$(<$ty as $crate::Datalize>::describe()),+],
                )
            }

            #[allow(unused_assignments)]
            fn from_instance(instance: $crate::Instance) -> $crate::Result<Self> {
                let member = $crate::UnionInstance::expect(instance)?;
                let mut index = 0;
                $(
                    if member.candidate == index {
                        return <$ty as $crate::Datalize>::from_instance(*member.value)
                            .map($name::$variant);
                    }
                    index += 1;
                )+
                Err($crate::ConvertError::at_root($crate::ErrorKind::ShapeMismatch {
                    expected: stringify!($name),
                    got: "union member of another type",
                }))
            }

            #[allow(unused_assignments, irrefutable_let_patterns, unreachable_code)]
            fn to_instance(&self) -> $crate::Instance {
                let mut index = 0;
                $(
                    if let $name::$variant(value) = self {
                        return $crate::Instance::Union($crate::UnionInstance::new(
                            index,
                            $crate::Datalize::to_instance(value),
                        ));
                    }
                    index += 1;
                )+
                unreachable!("every variant is covered above")
            }
        }
    };
}
