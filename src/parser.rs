// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Parser
//!
//! The `Parser` walks a [`Configurable`] record and fills it in place. For every
//! field, in declaration order, it:
//!
//! 1. refuses fields that cannot be written to;
//! 2. reads the annotation, whose first token is the source key and whose other
//!    tokens are flags (`notEmpty` is the only one);
//! 3. resolves the key through the environment and, for `scheme:identifier`
//!    values, the matching secret backend;
//! 4. decodes a non-empty value with the parser registry and assigns it;
//! 5. recurses into nested records when nothing was resolved for them.
//!
//! The walk stops at the first error. Every error is wrapped with the name of the
//! field it was raised for, so nested failures read `outer -> inner -> cause`.
//!
//! ## Secret Management
//!
//! Sensitive values can be kept out of the environment by storing a reference
//! to them instead: `DATABASE_URL=aws:/prod/db-url` is looked up as `/prod/db-url`
//! in the backend registered for `aws`. See [`crate::backends`].

use crate::{
    backends::{Backends, SecretBackend},
    env::{EnvSource, Environment, StdEnv},
    env_keys::{NOT_EMPTY_OPTION, TAG_SEPARATOR},
    errors::ConfigsError,
    record::{ConfigValue, Configurable, Field},
    registry::{ParserRegistry, Parsers},
    resolver::SourceResolver,
};
use dotenvy::from_filename;
use std::{fmt, sync::Arc};
use tracing::{debug, warn};

/// Resolves configuration records from the environment and secret backends.
///
/// A `Parser` is immutable once built and can be shared between threads; every
/// call to [`Parser::parse`] works on its own parser registry.
///
/// # Example
///
/// ```rust
/// use configs_parser::{Configurable, FakeSecretBackend, Kafka, MockEnv, Parser};
///
/// #[derive(Default, Configurable)]
/// struct Settings {
///     #[config("KAFKA_URL,notEmpty")]
///     kafka: Kafka,
///     #[config("WORKERS")]
///     workers: u16,
/// }
///
/// let parser = Parser::new()
///     .env(MockEnv::from_pairs([
///         ("KAFKA_URL", "aws:kafka-url"),
///         ("WORKERS", "4"),
///     ]))
///     .backend(
///         "aws",
///         FakeSecretBackend::new().with_secret("kafka-url", "kafka://broker:9092/?topic=orders"),
///     );
///
/// let mut settings = Settings::default();
/// parser.parse(&mut settings)?;
///
/// assert_eq!(settings.kafka.topic, "orders");
/// assert_eq!(settings.workers, 4);
/// # Ok::<(), configs_parser::ConfigsError>(())
/// ```
#[derive(Clone)]
pub struct Parser {
    env: Arc<dyn EnvSource>,
    backends: Backends,
    strict: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Parser {
            env: Arc::new(StdEnv),
            backends: Backends::new(),
            strict: false,
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("backends", &self.backends)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

impl Parser {
    /// Creates a parser reading the process environment, with no backends.
    pub fn new() -> Parser {
        Parser::default()
    }

    /// Creates a parser using the given backends.
    pub fn with_backends(backends: Backends) -> Parser {
        Parser {
            backends,
            ..Parser::default()
        }
    }

    /// Replaces the source the keys are looked up in.
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Registers a secret backend for `scheme`.
    pub fn backend(
        mut self,
        scheme: impl Into<String>,
        backend: impl SecretBackend + 'static,
    ) -> Self {
        self.backends = self.backends.with(scheme, backend);
        self
    }

    /// Makes types without a parser an error instead of leaving them untouched.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Loads variables from the `.env` file of the current environment into the
    /// process environment.
    ///
    /// The file is chosen by `RUST_ENV`:
    /// - "production" → `.env.prod`
    /// - "staging" → `.env.staging`
    /// - "develop" → `.env.develop`
    /// - any other value or not set → `.env.local`
    ///
    /// A missing file is ignored. Variables already set are kept.
    pub fn load_envs(&self) {
        let file = Environment::from_rust_env().env_file();
        match from_filename(file) {
            Ok(_) => debug!(file, "environment file loaded"),
            Err(err) => debug!(file, error = err.to_string(), "environment file not loaded"),
        }
    }

    /// Populates `target` using the built-in parsers.
    pub fn parse<T: Configurable>(&self, target: &mut T) -> Result<(), ConfigsError> {
        self.parse_with_parsers(target, &Parsers::new())
    }

    /// Populates `target`, trying `parsers` before the built-in ones.
    ///
    /// # Errors
    ///
    /// Returns the first failure met during the walk, wrapped with the name of
    /// each enclosing field. `target` may be partially populated afterwards and
    /// must not be used.
    pub fn parse_with_parsers<T: Configurable>(
        &self,
        target: &mut T,
        parsers: &Parsers,
    ) -> Result<(), ConfigsError> {
        let walk = Walk {
            resolver: SourceResolver::new(self.env.as_ref(), &self.backends),
            registry: ParserRegistry::new(parsers),
            strict: self.strict,
        };
        walk.parse_record(target)
    }
}

/// Key and flags of a field annotation.
#[derive(Debug, PartialEq, Eq)]
struct Annotation<'a> {
    key: &'a str,
    not_empty: bool,
}

impl<'a> Annotation<'a> {
    fn parse(field: &str, raw: &'a str) -> Result<Annotation<'a>, ConfigsError> {
        let mut tokens = raw.split(TAG_SEPARATOR);
        let key = tokens.next().unwrap_or_default();
        let mut not_empty = false;

        for option in tokens {
            match option {
                "" => continue,
                NOT_EMPTY_OPTION => not_empty = true,
                _ => {
                    return Err(ConfigsError::UnsupportedTagOption {
                        field: field.to_owned(),
                        option: option.to_owned(),
                    });
                }
            }
        }

        Ok(Annotation { key, not_empty })
    }
}

/// State of a single parse call.
struct Walk<'a> {
    resolver: SourceResolver<'a>,
    registry: ParserRegistry,
    strict: bool,
}

impl Walk<'_> {
    fn parse_record(&self, record: &mut dyn Configurable) -> Result<(), ConfigsError> {
        for field in record.fields() {
            let name = field.name();
            self.parse_field(field).map_err(|err| err.in_field(name))?;
        }
        Ok(())
    }

    fn parse_field(&self, field: Field<'_>) -> Result<(), ConfigsError> {
        let name = field.name();
        let annotation = field.annotation();
        let Some(slot) = field.into_slot() else {
            return Err(ConfigsError::FieldNotSettable {
                field: name.to_owned(),
            });
        };

        let annotation = Annotation::parse(name, annotation)?;
        let value = self.resolver.resolve_key(annotation.key)?;

        if annotation.not_empty && value.is_empty() {
            return Err(ConfigsError::RequiredValueMissing {
                field: name.to_owned(),
            });
        }

        if !value.is_empty() {
            debug!(field = name, key = annotation.key, "assigning resolved value");
            return self.assign(slot, &value);
        }

        if let Some(record) = slot.as_record() {
            return self.parse_record(record);
        }

        Ok(())
    }

    fn assign(&self, slot: &mut dyn ConfigValue, value: &str) -> Result<(), ConfigsError> {
        let tag = slot.type_tag();

        match self.registry.decode(value, &tag)? {
            Some(decoded) if slot.is_optional() && !slot.is_allocated() => slot.allocate(decoded),
            Some(decoded) => slot.set(decoded),
            None if self.strict => Err(ConfigsError::UnsupportedType {
                type_name: tag.name().to_owned(),
            }),
            None => {
                warn!(type_name = tag.name(), "no parser registered, field left unchanged");
                Ok(())
            }
        }
    }
}
