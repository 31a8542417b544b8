// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Records
//!
//! How a configuration record describes itself to the parser. A record lists its
//! fields in declaration order; every field carries its annotation and a slot the
//! decoded value is written through.
//!
//! Records normally get these impls from `#[derive(Configurable)]`:
//!
//! ```rust
//! use configs_parser::{Configurable, Postgres};
//! use std::time::Duration;
//!
//! #[derive(Default, Configurable)]
//! struct Settings {
//!     #[config("DATABASE_URL,notEmpty")]
//!     database: Postgres,
//!     #[config("REQUEST_TIMEOUT")]
//!     timeout: Duration,
//!     // No annotation: only its own fields are resolved.
//!     limits: Limits,
//! }
//!
//! #[derive(Default, Configurable)]
//! struct Limits {
//!     #[config("MAX_CONNECTIONS")]
//!     max_connections: u32,
//! }
//! ```
//!
//! Types the crate does not know about take part through [`config_value!`] or a
//! manual [`ConfigValue`] impl.

use crate::{
    errors::ConfigsError,
    registry::{TypeTag, Value, downcast_value},
};
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

/// A record whose fields the parser can walk.
pub trait Configurable {
    /// The record's fields, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// One field of a record, as seen by the parser.
pub struct Field<'a> {
    name: &'static str,
    annotation: &'static str,
    slot: Option<&'a mut dyn ConfigValue>,
}

impl<'a> Field<'a> {
    /// A settable field writing through `slot`.
    pub fn new(
        name: &'static str,
        annotation: &'static str,
        slot: &'a mut dyn ConfigValue,
    ) -> Self {
        Field {
            name,
            annotation,
            slot: Some(slot),
        }
    }

    /// A field the parser must not write to.
    pub fn locked(name: &'static str, annotation: &'static str) -> Self {
        Field {
            name,
            annotation,
            slot: None,
        }
    }

    /// Field name, as reported in errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw annotation: the source key followed by comma separated flags.
    pub fn annotation(&self) -> &'static str {
        self.annotation
    }

    /// Whether the parser may write to this field.
    pub fn is_settable(&self) -> bool {
        self.slot.is_some()
    }

    pub(crate) fn into_slot(self) -> Option<&'a mut dyn ConfigValue> {
        self.slot
    }
}

/// Writable storage of a single field.
pub trait ConfigValue: std::any::Any {
    /// Tag of the type decoded values must have.
    fn tag() -> TypeTag
    where
        Self: Sized;

    /// Same as [`ConfigValue::tag`], callable through a trait object.
    fn type_tag(&self) -> TypeTag;

    /// Whether the slot wraps its value in an optional.
    fn is_optional(&self) -> bool {
        false
    }

    /// Whether an optional slot currently holds a value.
    fn is_allocated(&self) -> bool {
        true
    }

    /// Fills an empty optional slot with `value`.
    fn allocate(&mut self, value: Value) -> Result<(), ConfigsError> {
        self.set(value)
    }

    fn set(&mut self, value: Value) -> Result<(), ConfigsError>;

    /// The nested record behind this slot, if it is one.
    fn as_record(&mut self) -> Option<&mut dyn Configurable> {
        None
    }
}

/// Implements [`ConfigValue`] for types replaced wholesale by their parsed value.
///
/// ```rust
/// use configs_parser::{config_value, ConfigsError, Parsers};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Region(String);
///
/// config_value!(Region => Other);
///
/// let parsers = Parsers::new().with::<Region, _>(|v| Ok(Region(v.to_owned())));
/// # let _ = parsers;
/// ```
#[macro_export]
macro_rules! config_value {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl $crate::ConfigValue for $ty {
                fn tag() -> $crate::TypeTag {
                    $crate::TypeTag::of::<$ty>($crate::Kind::$kind)
                }

                fn type_tag(&self) -> $crate::TypeTag {
                    <Self as $crate::ConfigValue>::tag()
                }

                fn set(
                    &mut self,
                    value: $crate::Value,
                ) -> ::std::result::Result<(), $crate::ConfigsError> {
                    *self = $crate::downcast_value::<$ty>(value)?;
                    Ok(())
                }
            }
        )+
    };
}

config_value!(
    bool => Bool,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
);

// No built-in parser; fields of these types are filled through `Parsers::with`.
config_value!(
    char => Other,
    PathBuf => Other,
    IpAddr => Other,
    SocketAddr => Other,
    Vec<String> => Other,
);

impl<T: ConfigValue> ConfigValue for Option<T> {
    fn tag() -> TypeTag {
        T::tag()
    }

    fn type_tag(&self) -> TypeTag {
        T::tag()
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn is_allocated(&self) -> bool {
        self.is_some()
    }

    fn allocate(&mut self, value: Value) -> Result<(), ConfigsError> {
        *self = Some(downcast_value::<T>(value)?);
        Ok(())
    }

    fn set(&mut self, value: Value) -> Result<(), ConfigsError> {
        if let Some(inner) = self.as_mut() {
            return inner.set(value);
        }
        self.allocate(value)
    }
}
