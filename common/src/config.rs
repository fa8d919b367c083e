use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context as _;

use crate::logging;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://postgres@localhost:5432/blog_dev".to_string(),
        }
    }
}

/// Loads a TOML config file into `C`.
///
/// When `path` is `None` the file at `default_path` is read if it exists and
/// the compiled-in defaults are used otherwise. An explicitly provided path
/// must exist. Returns the canonicalized path of the file that was loaded,
/// if any.
pub fn parse<C: serde::de::DeserializeOwned + Default>(
    path: Option<&str>,
    default_path: &str,
) -> anyhow::Result<(C, Option<String>)> {
    let path_provided = path.is_some();
    let path = path.unwrap_or(default_path);

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !path_provided => {
            tracing::debug!("failed to load config file: {}", err);
            return Ok((C::default(), None));
        }
        Err(err) => {
            return Err(err).context(format!("failed to read config file: {path}"));
        }
    };

    let config = toml::from_str(&contents).context(format!("failed to parse config file: {path}"))?;
    let path = std::fs::canonicalize(path)
        .context(format!("failed to canonicalize config file: {path}"))?
        .display()
        .to_string();

    Ok((config, Some(path)))
}

/// Reads an environment variable and parses it into `T`. Returns `None` when
/// the variable is not set.
pub fn env_override<T: FromStr>(name: &str) -> anyhow::Result<Option<T>>
where
    T::Err: Display,
{
    std::env::var(name)
        .ok()
        .map(|value| {
            value
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid value for {name}: {err}"))
        })
        .transpose()
}
