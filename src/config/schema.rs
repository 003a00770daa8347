//! Configuration schema definitions.
//!
//! This module defines the configuration structure served by the service.
//! All types derive Serde traits for deserialization from config files.
//! Scalars go through [`crate::config::coerce`] so that loosely typed files
//! (`version: 1.1`, `port: "8080"`) decode the same way they read.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::coerce;

/// Used for `fileDir` when it is absent, null or blank.
pub const DEFAULT_FILE_DIR: &str = "./";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listen port. Zero means "not set" and is rejected by validation.
    #[serde(deserialize_with = "coerce::port")]
    pub port: u16,

    /// Version label returned by `GET /version`.
    #[serde(deserialize_with = "coerce::string")]
    pub version: String,

    /// Database connection parameters.
    #[serde(alias = "mysql")]
    pub database: DatabaseConfig,

    /// Base directory for relative file references.
    #[serde(rename = "fileDir", alias = "file_dir", deserialize_with = "coerce::file_dir")]
    pub file_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 0,
            version: String::new(),
            database: DatabaseConfig::default(),
            file_dir: PathBuf::from(DEFAULT_FILE_DIR),
        }
    }
}

/// Database connection parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(deserialize_with = "coerce::string")]
    pub host: String,

    #[serde(alias = "dbname", deserialize_with = "coerce::string")]
    pub name: String,

    #[serde(deserialize_with = "coerce::port")]
    pub port: u16,
}
