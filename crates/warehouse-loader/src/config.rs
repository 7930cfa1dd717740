//! Warehouse connection configuration.
//!
//! A [`WarehouseConfig`] is assembled by the caller (CLI flags, environment
//! variables, a TOML file) and handed to a backend explicitly; nothing in this
//! crate reads the process environment. [`WarehouseConfig::validate`] turns it
//! into [`ConnectionSettings`], the fully resolved values a backend connects
//! with.

use job_core::{normalize_identifier, IdentifierError};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compute warehouse used when none is configured.
pub const DEFAULT_WAREHOUSE: &str = "job_posting";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "JOB_POSTING_DATA";

/// Schema used when none is configured.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Port used when the account does not name one.
pub const DEFAULT_PORT: u16 = 5432;

/// Errors from loading or validating a [`WarehouseConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("missing warehouse setting '{0}'")]
    MissingField(&'static str),

    /// The account is not of the form `host[:port]`.
    #[error("invalid account '{0}': expected host[:port]")]
    InvalidAccount(String),

    /// The port part of the account is not a valid TCP port.
    #[error("invalid port '{port}' in account '{account}'")]
    InvalidPort { account: String, port: String },

    /// The schema is not a plain identifier.
    #[error("invalid schema")]
    InvalidSchema(#[from] IdentifierError),

    /// The configuration file cannot be read.
    #[error("cannot read warehouse config {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this structure.
    #[error("cannot parse warehouse config {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Warehouse connection settings as supplied by the caller.
///
/// Every field is optional here so partial sources can be layered with
/// [`WarehouseConfig::merge`]; [`WarehouseConfig::validate`] decides what is
/// actually required.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarehouseConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    /// Endpoint of the warehouse, `host[:port]`
    pub account: Option<String>,
    /// Compute warehouse name, reported to the server for attribution
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
}

impl WarehouseConfig {
    /// Load a configuration from a TOML file.
    ///
    /// ```toml
    /// user = "loader"
    /// password = "secret"
    /// account = "warehouse.internal:5432"
    /// database = "JOB_POSTING_DATA"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merge(self, overrides: WarehouseConfig) -> Self {
        Self {
            user: overrides.user.or(self.user),
            password: overrides.password.or(self.password),
            account: overrides.account.or(self.account),
            warehouse: overrides.warehouse.or(self.warehouse),
            database: overrides.database.or(self.database),
            schema: overrides.schema.or(self.schema),
        }
    }

    /// Check required settings and resolve defaults.
    ///
    /// `user`, `password` and `account` are required. `warehouse`, `database`
    /// and `schema` fall back to [`DEFAULT_WAREHOUSE`], [`DEFAULT_DATABASE`]
    /// and [`DEFAULT_SCHEMA`].
    pub fn validate(&self) -> Result<ConnectionSettings, ConfigError> {
        let user = required(&self.user, "user")?;
        let password = required(&self.password, "password")?;
        let account = required(&self.account, "account")?;
        let (host, port) = parse_account(&account)?;

        let warehouse = optional(&self.warehouse).unwrap_or_else(|| DEFAULT_WAREHOUSE.to_string());
        let database = optional(&self.database).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let schema = normalize_identifier(
            optional(&self.schema)
                .as_deref()
                .unwrap_or(DEFAULT_SCHEMA),
        )?;

        Ok(ConnectionSettings {
            user,
            password,
            host,
            port,
            warehouse,
            database,
            schema,
        })
    }
}

impl fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("account", &self.account)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Validated settings a backend connects with.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub warehouse: String,
    pub database: String,
    /// Upper-case schema identifier
    pub schema: String,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::MissingField(field))
}

fn parse_account(account: &str) -> Result<(String, u16), ConfigError> {
    if account.contains(char::is_whitespace) || account.contains('/') {
        return Err(ConfigError::InvalidAccount(account.to_string()));
    }

    let (host, port) = match account.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
                ConfigError::InvalidPort {
                    account: account.to_string(),
                    port: port.to_string(),
                }
            })?;
            (host, port)
        }
        None => (account, DEFAULT_PORT),
    };

    if host.is_empty() {
        return Err(ConfigError::InvalidAccount(account.to_string()));
    }

    Ok((host.to_string(), port))
}
