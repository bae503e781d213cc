use clap::{ArgMatches, ValueEnum};
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::errors::RenameError;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Word separator the model is asked to use. Not enforced by the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NameStyle {
    #[default]
    Kebab,
    Snake,
}

impl NameStyle {
    pub fn separator(self) -> char {
        match self {
            NameStyle::Kebab => '-',
            NameStyle::Snake => '_',
        }
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameStyle::Kebab => write!(f, "kebab"),
            NameStyle::Snake => write!(f, "snake"),
        }
    }
}

/// Settings for one invocation, resolved from flags and the environment.
#[derive(Clone)]
pub struct Config {
    pub file: PathBuf,
    pub api_key: String,
    pub model: String,
    pub style: NameStyle,
    pub dry_run: bool,
    pub base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("file", &self.file)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("style", &self.style)
            .field("dry_run", &self.dry_run)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, RenameError> {
        let api_key = require_api_key(env::var(API_KEY_ENV).ok())?;
        let base_url = non_empty(env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::from_parts(matches, api_key, base_url)
    }

    /// Builds a config from parsed arguments with the secrets supplied by the caller.
    pub fn from_parts(
        matches: &ArgMatches,
        api_key: String,
        base_url: String,
    ) -> Result<Self, RenameError> {
        let file = matches
            .get_one::<PathBuf>("file")
            .cloned()
            .unwrap_or_default();
        let model = non_empty(matches.get_one::<String>("model").cloned())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let style = matches
            .get_one::<NameStyle>("style")
            .copied()
            .unwrap_or_default();

        Ok(Self {
            file,
            api_key,
            model,
            style,
            dry_run: matches.get_flag("dry-run"),
            base_url,
        })
    }
}

/// The key must be present and not blank.
pub fn require_api_key(value: Option<String>) -> Result<String, RenameError> {
    non_empty(value).ok_or(RenameError::MissingApiKey(API_KEY_ENV))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
