// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment Keys
//!
//! Constants for the environment files, the annotation grammar and the
//! secret indirection schemes understood by the parser.

/// Environment file names for different deployment environments
pub const LOCAL_ENV_FILE_NAME: &str = "./.env.local";
pub const DEV_ENV_FILE_NAME: &str = "./.env.develop";
pub const STAGING_FILE_NAME: &str = "./.env.staging";
pub const PROD_FILE_NAME: &str = "./.env.prod";

/// Variable selecting which environment file `Parser::load_envs` reads.
pub const RUST_ENV_KEY: &str = "RUST_ENV";

/// Separator between the tokens of a field annotation.
pub const TAG_SEPARATOR: char = ',';
/// Flag rejecting fields that resolve to the empty string.
pub const NOT_EMPTY_OPTION: &str = "notEmpty";

/// Separator between an indirection scheme and the backend key.
pub const SCHEME_SEPARATOR: char = ':';
/// Indirection scheme for the AWS parameter store.
pub const AWS_SCHEME: &str = "aws";
/// Indirection scheme for the GCP secret manager.
pub const GCP_SCHEME: &str = "gcp";
/// Schemes that always mean "ask a backend", registered or not.
pub const RESERVED_SCHEMES: [&str; 2] = [AWS_SCHEME, GCP_SCHEME];
