// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment
//!
//! Abstraction over where source keys are looked up. The parser reads the process
//! environment through [`StdEnv`] by default; tests swap in a [`MockEnv`] so they
//! never have to touch process-wide state.

use crate::env_keys::{
    DEV_ENV_FILE_NAME, LOCAL_ENV_FILE_NAME, PROD_FILE_NAME, RUST_ENV_KEY, STAGING_FILE_NAME,
};
use std::{collections::HashMap, env::VarError};
use tracing::warn;

/// Read-only key/value store the source keys are resolved against.
pub trait EnvSource: Send + Sync {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;
}

/// Environment source that reads from the actual process environment.
///
/// A variable whose value is not valid UTF-8 is treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                warn!(name, "environment variable is not valid unicode, ignoring it");
                None
            }
        }
    }
}

/// Environment source backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Deployment environment, selected through `RUST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Reads `RUST_ENV` from the process environment.
    ///
    /// # Returns
    ///
    /// The matching environment, or [`Environment::Local`] when the variable is
    /// unset or holds an unknown value.
    pub fn from_rust_env() -> Environment {
        Environment::from(std::env::var(RUST_ENV_KEY).unwrap_or_default().as_str())
    }

    /// The `.env` file loaded for this environment.
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Prod => PROD_FILE_NAME,
            Environment::Staging => STAGING_FILE_NAME,
            Environment::Dev => DEV_ENV_FILE_NAME,
            Environment::Local => LOCAL_ENV_FILE_NAME,
        }
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Environment::Prod,
            "staging" => Environment::Staging,
            "develop" | "dev" => Environment::Dev,
            _ => Environment::Local,
        }
    }
}
