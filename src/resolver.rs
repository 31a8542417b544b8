// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Source Resolver
//!
//! Turns a field's source key into the literal string that will be decoded. The
//! key is looked up in the environment; a value shaped like `scheme:identifier`
//! is then redirected, exactly once, to the backend registered for `scheme`.

use crate::{
    backends::Backends,
    env::EnvSource,
    env_keys::{RESERVED_SCHEMES, SCHEME_SEPARATOR},
    errors::ConfigsError,
};
use tracing::{debug, error};

pub(crate) struct SourceResolver<'a> {
    env: &'a dyn EnvSource,
    backends: &'a Backends,
}

impl<'a> SourceResolver<'a> {
    pub(crate) fn new(env: &'a dyn EnvSource, backends: &'a Backends) -> Self {
        SourceResolver { env, backends }
    }

    /// Resolves `key` to its final value; an empty key or a missing variable
    /// resolves to the empty string.
    pub(crate) fn resolve_key(&self, key: &str) -> Result<String, ConfigsError> {
        if key.is_empty() {
            return Ok(String::new());
        }

        let value = self.env.get(key).unwrap_or_default();

        let Some((scheme, identifier)) = value.split_once(SCHEME_SEPARATOR) else {
            return Ok(value);
        };

        match self.backends.get(scheme) {
            Some(backend) => {
                debug!(key, scheme, "resolving value through secret backend");
                backend.lookup(identifier).map_err(|err| {
                    error!(
                        error = err.to_string(),
                        scheme, identifier, "failed to fetch secret"
                    );
                    ConfigsError::SecretFetchFailed {
                        scheme: scheme.to_owned(),
                        key: identifier.to_owned(),
                        reason: err.to_string(),
                    }
                })
            }
            None if RESERVED_SCHEMES.contains(&scheme) => {
                error!(key, scheme, "secret backend is not configured");
                Err(ConfigsError::BackendNotConfigured {
                    scheme: scheme.to_owned(),
                })
            }
            None => Ok(value),
        }
    }
}
