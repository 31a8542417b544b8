// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Errors
//!
//! Error types for the configs_parser crate.
//!
//! Every failure is detected where it happens and then wrapped, level by level,
//! with the name of the field that was being resolved. Reading the chain from the
//! outermost error down leads an operator to the offending field and its cause.

use thiserror::Error;

/// Errors that can occur while resolving a configuration record.
///
/// A failed resolution leaves the target record partially populated; callers
/// must not use a record after any error was returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigsError {
    /// The field exists but its slot cannot be assigned.
    #[error("field `{field}` can not be set")]
    FieldNotSettable { field: String },

    /// The field annotation carries a flag outside the supported set.
    #[error("tag option `{option}` on field `{field}` is not supported")]
    UnsupportedTagOption { field: String, option: String },

    /// A `notEmpty` field resolved to the empty string.
    #[error("environment variable for field `{field}` should not be empty")]
    RequiredValueMissing { field: String },

    /// The value asked for an indirection scheme that has no backend registered.
    #[error("`{scheme}` secret backend is not configured")]
    BackendNotConfigured { scheme: String },

    /// The backend was reached but the lookup failed.
    ///
    /// # Arguments
    ///
    /// * `reason` - The backend's own description of the failure
    #[error("error to load secret `{key}` from `{scheme}` backend - `{reason}`")]
    SecretFetchFailed {
        scheme: String,
        key: String,
        reason: String,
    },

    /// The string could not be decoded into the target type.
    #[error("unable to parse `{type_name}`: {reason}")]
    MalformedValue { type_name: String, reason: String },

    /// The string is not one of the accepted boolean literals.
    #[error("unsupported boolean literal `{literal}`")]
    UnsupportedBooleanLiteral { literal: String },

    /// The number is well formed but does not fit the declared width.
    #[error("value `{literal}` is out of range for `{type_name}`")]
    NumericRangeOverflow { type_name: String, literal: String },

    /// Strict mode only: no parser is registered for the field's type.
    #[error("no parser registered for `{type_name}`")]
    UnsupportedType { type_name: String },

    /// A parser produced a value of a different type than the slot holds.
    #[error("parsed value does not match field type `{expected}`")]
    ValueTypeMismatch { expected: String },

    /// Wraps an error with the name of the field it was raised for.
    #[error("error parsing field `{field}`")]
    Field {
        field: String,
        #[source]
        source: Box<ConfigsError>,
    },
}

impl ConfigsError {
    /// Builds a [`ConfigsError::MalformedValue`] for `type_name`.
    ///
    /// # Returns
    ///
    /// The error, with `reason` rendered to a string so parser errors of any
    /// type can be carried.
    pub fn malformed(type_name: impl Into<String>, reason: impl ToString) -> Self {
        ConfigsError::MalformedValue {
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn in_field(self, field: &str) -> Self {
        ConfigsError::Field {
            field: field.to_owned(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every field wrapper.
    pub fn root_cause(&self) -> &ConfigsError {
        let mut current = self;
        while let ConfigsError::Field { source, .. } = current {
            current = source;
        }
        current
    }

    /// Dotted path of the fields that wrap the root cause, outermost first.
    ///
    /// Returns an empty string for errors raised outside any field.
    pub fn field_path(&self) -> String {
        let mut path = Vec::new();
        let mut current = self;
        while let ConfigsError::Field { field, source } = current {
            path.push(field.as_str());
            current = source;
        }
        path.join(".")
    }
}
