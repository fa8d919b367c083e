use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

static RELOAD_HANDLE: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Json,
    Pretty,
    Compact,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => anyhow::bail!("invalid logging mode: {}", s),
        }
    }
}

pub fn init(level: &str, mode: Mode) -> Result<()> {
    let reload = RELOAD_HANDLE.get_or_try_init(|| -> Result<_> {
        let (filter, handle) = reload::Layer::new(EnvFilter::from_str(level)?);

        let registry = tracing_subscriber::registry().with(filter);

        let fmt = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_file(true);

        match mode {
            Mode::Default => registry.with(fmt).try_init()?,
            Mode::Json => registry.with(fmt.json()).try_init()?,
            Mode::Pretty => registry.with(fmt.pretty()).try_init()?,
            Mode::Compact => registry.with(fmt.compact()).try_init()?,
        }

        Ok(handle)
    })?;

    reload.reload(EnvFilter::from_str(level)?)?;

    Ok(())
}
