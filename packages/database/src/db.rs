//! Database configuration and connection utilities.
//!
//! Connections are opened per request and released when the returned
//! `Box<dyn Database>` is dropped, so every exit path of a handler gives the
//! connection back.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use switchy_database::Database;
use switchy_database_connection::{Credentials, init_sqlite_rusqlite};

use crate::DbError;

/// Default per-query timeout when `QUERY_TIMEOUT_SECS` is unset.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_PORT: u16 = 5432;

/// Where the inspection data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// A `Postgres` server.
    Postgres {
        /// How to reach the server.
        target: PostgresTarget,
        /// Client encoding applied after connecting.
        charset: String,
    },
    /// A local `SQLite` file. The file must already exist.
    Sqlite {
        /// Path to the database file.
        path: PathBuf,
    },
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres { target, .. } => write!(f, "postgres {target}"),
            Self::Sqlite { path } => write!(f, "sqlite {}", path.display()),
        }
    }
}

/// `Postgres` connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostgresTarget {
    /// `DATABASE_URL`, without query parameters.
    Url(String),
    /// Individual `DB_*` settings. Never joined into a URL, so user names
    /// and passwords may contain `@`, `:` or `/`.
    Parts {
        host: String,
        port: Option<u16>,
        name: String,
        user: String,
        password: Option<String>,
    },
}

impl PostgresTarget {
    fn credentials(&self) -> Result<Credentials, DbError> {
        match self {
            Self::Url(url) => Credentials::from_url(url).map_err(|e| DbError::Connection {
                message: e.to_string(),
            }),
            Self::Parts {
                host,
                port,
                name,
                user,
                password,
            } => Ok(Credentials::new(
                host.clone(),
                *port,
                name.clone(),
                user.clone(),
                password.clone(),
            )),
        }
    }
}

/// Omits user and password.
impl fmt::Display for PostgresTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => {
                let rest = url.split_once("://").map_or(url.as_str(), |(_, rest)| rest);
                let location = rest.rsplit_once('@').map_or(rest, |(_, location)| location);
                f.write_str(location)
            }
            Self::Parts {
                host, port, name, ..
            } => match port {
                Some(port) => write!(f, "{host}:{port}/{name}"),
                None => write!(f, "{host}/{name}"),
            },
        }
    }
}

/// Connection settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Which database to connect to.
    pub backend: Backend,
    /// Upper bound on connecting and on each query.
    pub query_timeout: Duration,
}

impl DatabaseConfig {
    /// Builds the configuration from process environment variables.
    ///
    /// `SQLITE_PATH` selects a `SQLite` file. Otherwise `DATABASE_URL` is
    /// used as-is, falling back to the separate `DB_HOST`, `DB_PORT`,
    /// `DB_USER`, `DB_PASSWORD` and `DB_NAME` settings.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let query_timeout = match var("QUERY_TIMEOUT_SECS").map(|s| s.trim().parse::<u64>()) {
            None => DEFAULT_QUERY_TIMEOUT,
            Some(Ok(0)) => {
                log::warn!("QUERY_TIMEOUT_SECS must be at least 1, using 1");
                Duration::from_secs(1)
            }
            Some(Ok(secs)) => Duration::from_secs(secs),
            Some(Err(e)) => {
                log::warn!(
                    "Invalid QUERY_TIMEOUT_SECS ({e}), using default: {}s",
                    DEFAULT_QUERY_TIMEOUT.as_secs()
                );
                DEFAULT_QUERY_TIMEOUT
            }
        };

        if let Some(path) = var("SQLITE_PATH") {
            return Self {
                backend: Backend::Sqlite {
                    path: PathBuf::from(path),
                },
                query_timeout,
            };
        }

        let target = var("DATABASE_URL").map_or_else(
            || PostgresTarget::Parts {
                host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: Some(var("DB_PORT").map_or(DEFAULT_PORT, |p| {
                    p.trim().parse().unwrap_or_else(|e| {
                        log::warn!("Invalid DB_PORT {p:?} ({e}), using default: {DEFAULT_PORT}");
                        DEFAULT_PORT
                    })
                })),
                name: var("DB_NAME").unwrap_or_else(|| "citydb".to_string()),
                user: var("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                password: var("DB_PASSWORD"),
            },
            // Strip query parameters (e.g. ?sslmode=require) that the
            // Credentials parser doesn't understand.
            |url| PostgresTarget::Url(url.split('?').next().unwrap_or(&url).to_string()),
        );

        Self {
            backend: Backend::Postgres {
                target,
                charset: var("DB_CHARSET").unwrap_or_else(|| "UTF8".to_string()),
            },
            query_timeout,
        }
    }
}

/// Opens a new connection for the duration of one request.
///
/// `Postgres` sessions get the configured client encoding and a matching
/// `statement_timeout`, so the server also abandons queries the client
/// stopped waiting for.
///
/// # Errors
///
/// Returns [`DbError::Connection`] if the database cannot be reached, and
/// [`DbError::Timeout`] if connecting takes longer than the query timeout.
pub async fn connect(config: &DatabaseConfig) -> Result<Box<dyn Database>, DbError> {
    with_timeout(config.query_timeout, open(config)).await
}

async fn open(config: &DatabaseConfig) -> Result<Box<dyn Database>, DbError> {
    match &config.backend {
        Backend::Postgres { target, charset } => {
            if !charset
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(DbError::Connection {
                    message: format!("invalid client encoding: {charset}"),
                });
            }

            let creds = target.credentials()?;
            let db = switchy_database_connection::init_postgres_raw_native_tls(creds)
                .await
                .map_err(|e| DbError::Connection {
                    message: e.to_string(),
                })?;

            db.exec_raw(&format!("SET client_encoding = '{charset}'"))
                .await?;
            db.exec_raw(&format!(
                "SET statement_timeout = '{}s'",
                config.query_timeout.as_secs().max(1)
            ))
            .await?;

            Ok(db)
        }
        Backend::Sqlite { path } => {
            if !path.is_file() {
                return Err(DbError::Connection {
                    message: format!("{} does not exist", path.display()),
                });
            }
            init_sqlite_rusqlite(Some(path.as_path())).map_err(|e| DbError::Connection {
                message: format!("{}: {e}", path.display()),
            })
        }
    }
}

/// Runs a database future, failing with [`DbError::Timeout`] if it does not
/// complete in time. Dropping the returned future cancels the query.
///
/// # Errors
///
/// Returns the future's own error, or [`DbError::Timeout`].
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| DbError::Timeout {
            seconds: timeout.as_secs(),
        })?
}
