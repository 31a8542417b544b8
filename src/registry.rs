// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Value Parser Registry
//!
//! Converts a resolved string into a value of the field's type. Lookup is
//! layered: caller overrides for the exact type first, then the built-in
//! structured parsers for the exact type, then the primitive parser for the
//! type's [`Kind`]. A type none of the layers know is reported as "no parser"
//! and the caller decides whether that is an error.

use crate::{errors::ConfigsError, structured};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    num::{IntErrorKind, ParseIntError},
    str::FromStr,
    sync::Arc,
};

/// A decoded value on its way into a field slot.
pub type Value = Box<dyn Any>;

/// Caller-supplied parser, type-erased.
pub type ParserFn = Arc<dyn Fn(&str) -> Result<Value, ConfigsError> + Send + Sync>;

pub(crate) type BuiltinFn = fn(&str) -> Result<Value, ConfigsError>;

/// Primitive shape of a field type, used when no parser is registered for the
/// exact type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// A nested configuration record.
    Record,
    /// Anything else; only exact-type parsers apply.
    Other,
}

/// Identity of the type a field decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
    kind: Kind,
}

impl TypeTag {
    /// Tag of `T`, decoded through the primitive parser for `kind` when no
    /// exact-type parser exists.
    pub fn of<T: Any>(kind: Kind) -> TypeTag {
        TypeTag {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind,
        }
    }

    /// `TypeId` exact-type parsers are keyed by.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name, for logs and error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Primitive shape used by the fallback parser layer.
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

/// Moves a decoded value out of its box, checking it has the expected type.
pub fn downcast_value<T: Any>(value: Value) -> Result<T, ConfigsError> {
    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| ConfigsError::ValueTypeMismatch {
            expected: std::any::type_name::<T>().to_owned(),
        })
}

pub(crate) fn boxed<T: Any>(value: T) -> Value {
    Box::new(value)
}

/// Parser overrides supplied by the caller, keyed by target type.
///
/// # Example
///
/// ```rust
/// use configs_parser::{ConfigsError, Parsers};
///
/// let parsers = Parsers::new().with::<Vec<String>, _>(|v| {
///     Ok(v.split(';').map(str::to_owned).collect())
/// });
/// # let _ = parsers;
/// ```
#[derive(Clone, Default)]
pub struct Parsers {
    by_type: HashMap<TypeId, ParserFn>,
}

impl Parsers {
    /// Creates an empty set of overrides.
    pub fn new() -> Parsers {
        Parsers::default()
    }

    /// Registers `parser` for values of type `T`, replacing any previous one.
    pub fn with<T, F>(mut self, parser: F) -> Self
    where
        T: Any,
        F: Fn(&str) -> Result<T, ConfigsError> + Send + Sync + 'static,
    {
        self.by_type.insert(
            TypeId::of::<T>(),
            Arc::new(move |v: &str| parser(v).map(boxed)),
        );
        self
    }

    /// Number of types with an override.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether no override is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for Parsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsers")
            .field("overrides", &self.by_type.len())
            .finish()
    }
}

/// The three parser layers for a single parse call.
pub struct ParserRegistry {
    overrides: HashMap<TypeId, ParserFn>,
    structured: HashMap<TypeId, BuiltinFn>,
    primitives: HashMap<Kind, BuiltinFn>,
}

impl ParserRegistry {
    /// Builds the registry for one parse call, layering `overrides` over the
    /// built-in parsers.
    pub fn new(overrides: &Parsers) -> ParserRegistry {
        ParserRegistry {
            overrides: overrides.by_type.clone(),
            structured: structured::builtin_parsers(),
            primitives: primitive_parsers(),
        }
    }

    /// Whether any layer can decode values for `tag`.
    pub fn has_parser(&self, tag: &TypeTag) -> bool {
        self.overrides.contains_key(&tag.id)
            || self.structured.contains_key(&tag.id)
            || self.primitives.contains_key(&tag.kind)
    }

    /// Decodes `value` for `tag`; `Ok(None)` means no layer handles the type.
    pub fn decode(&self, value: &str, tag: &TypeTag) -> Result<Option<Value>, ConfigsError> {
        if let Some(parser) = self.overrides.get(&tag.id) {
            return parser(value).map(Some);
        }
        if let Some(parser) = self.structured.get(&tag.id) {
            return parser(value).map(Some);
        }
        if let Some(parser) = self.primitives.get(&tag.kind) {
            return parser(value).map(Some);
        }
        Ok(None)
    }
}

/// Parses the boolean literals `1 t T TRUE true True 0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Result<bool, ConfigsError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConfigsError::UnsupportedBooleanLiteral {
            literal: value.to_owned(),
        }),
    }
}

fn parse_int<T>(value: &str) -> Result<T, ConfigsError>
where
    T: FromStr<Err = ParseIntError>,
{
    let type_name = std::any::type_name::<T>();
    value.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConfigsError::NumericRangeOverflow {
                type_name: type_name.to_owned(),
                literal: value.to_owned(),
            }
        }
        _ => ConfigsError::malformed(type_name, err),
    })
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['+', '-']).to_ascii_lowercase();
    unsigned == "inf" || unsigned == "infinity"
}

macro_rules! float_parser {
    ($name:ident, $ty:ty) => {
        fn $name(value: &str) -> Result<$ty, ConfigsError> {
            let parsed = value
                .parse::<$ty>()
                .map_err(|err| ConfigsError::malformed(stringify!($ty), err))?;
            if parsed.is_infinite() && !is_infinity_literal(value) {
                return Err(ConfigsError::NumericRangeOverflow {
                    type_name: stringify!($ty).to_owned(),
                    literal: value.to_owned(),
                });
            }
            Ok(parsed)
        }
    };
}

float_parser!(parse_f32, f32);
float_parser!(parse_f64, f64);

fn primitive_parsers() -> HashMap<Kind, BuiltinFn> {
    let parsers: [(Kind, BuiltinFn); 14] = [
        (Kind::Bool, |v| parse_bool(v).map(boxed)),
        (Kind::String, |v| Ok(boxed(v.to_owned()))),
        (Kind::I8, |v| parse_int::<i8>(v).map(boxed)),
        (Kind::I16, |v| parse_int::<i16>(v).map(boxed)),
        (Kind::I32, |v| parse_int::<i32>(v).map(boxed)),
        (Kind::I64, |v| parse_int::<i64>(v).map(boxed)),
        (Kind::Isize, |v| parse_int::<isize>(v).map(boxed)),
        (Kind::U8, |v| parse_int::<u8>(v).map(boxed)),
        (Kind::U16, |v| parse_int::<u16>(v).map(boxed)),
        (Kind::U32, |v| parse_int::<u32>(v).map(boxed)),
        (Kind::U64, |v| parse_int::<u64>(v).map(boxed)),
        (Kind::Usize, |v| parse_int::<usize>(v).map(boxed)),
        (Kind::F32, |v| parse_f32(v).map(boxed)),
        (Kind::F64, |v| parse_f64(v).map(boxed)),
    ];
    HashMap::from(parsers)
}
