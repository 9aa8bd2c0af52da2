//! The flag grammar shared by the command line and the config file.
//!
//! Flags are declared with `clap`. Every field is optional so that a parsed
//! [`Flags`] only carries what was explicitly given, which lets config-file
//! values and command-line values be layered over the built-in defaults.
//! Single-dash long flags (`-port 4000`) are accepted alongside the double-dash
//! form.

use clap::builder::{BoolishValueParser, NonEmptyStringValueParser};
use clap::{CommandFactory, Parser};
use log::debug;

use crate::error::{Error, Result};
use crate::options::LineEnding;

/// Explicitly given option values plus any positional tokens.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(
    name = "lemonade",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Flags {
    /// TCP port number
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Allow IP range
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub allow: Option<String>,

    /// Destination host name
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub host: Option<String>,

    /// Show this message
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub help: Option<bool>,

    /// Translate loopback address
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub trans_loopback: Option<bool>,

    /// Translate local file
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub trans_localfile: Option<bool>,

    /// Convert line endings (cr/crlf/lf)
    #[arg(long)]
    pub line_ending: Option<LineEnding>,

    /// Do not show fallback messages
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub no_fallback_messages: Option<bool>,

    /// Log level
    #[arg(long, allow_negative_numbers = true)]
    pub log_level: Option<i32>,

    /// Data to copy or URL to open
    #[arg(value_name = "DATA")]
    pub positional: Vec<String>,
}

impl Flags {
    /// Parses flag tokens (without the invocation path).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Flag`] for unknown flags or invalid values.
    pub fn parse_tokens<I, T>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens = normalize(tokens.into_iter().map(Into::into));
        Ok(Self::try_parse_from(tokens)?)
    }

    /// Converts a parsed config-file table into flag tokens and parses them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValue`] for values that cannot be expressed as a
    /// flag, or [`Error::Flag`] for unknown keys and invalid values.
    pub fn from_table(table: &toml::Table) -> Result<Self> {
        let mut tokens = Vec::with_capacity(table.len());
        for (key, value) in table {
            tokens.push(format!("--{key}={}", flag_value(key, value)?));
        }
        debug!("Config file flags: {tokens:?}");
        Self::parse_tokens(tokens)
    }

    /// Long names of every declared flag.
    #[must_use]
    pub fn names() -> Vec<String> {
        Self::command()
            .get_arguments()
            .filter_map(|arg| arg.get_long().map(ToString::to_string))
            .collect()
    }
}

fn flag_value(key: &str, value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Array(values) => {
            let mut parts = Vec::with_capacity(values.len());
            for value in values {
                if matches!(value, toml::Value::Array(_) | toml::Value::Table(_)) {
                    return Err(Error::ConfigValue(key.to_string()));
                }
                parts.push(flag_value(key, value)?);
            }
            Ok(parts.join(","))
        }
        toml::Value::Datetime(_) | toml::Value::Table(_) => {
            Err(Error::ConfigValue(key.to_string()))
        }
    }
}

/// Rewrites `-name` and `-name=value` to their double-dash form when `name`
/// is a declared flag. Tokens after a `--` terminator are left alone.
fn normalize(tokens: impl Iterator<Item = String>) -> Vec<String> {
    let names = Flags::names();
    let mut terminated = false;

    tokens
        .map(|token| {
            if terminated {
                return token;
            }
            if token == "--" {
                terminated = true;
                return token;
            }
            let Some(rest) = token.strip_prefix('-') else {
                return token;
            };
            if rest.starts_with('-') {
                return token;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if names.iter().any(|known| known == name) {
                format!("-{token}")
            } else {
                token
            }
        })
        .collect()
}
