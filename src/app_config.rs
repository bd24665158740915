//! Application configuration loading and CLI/file/default layering.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use paper_downloader_core::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, DOI_REDIRECT_TIMEOUT_SECS, MAX_CONCURRENCY,
    MIN_CONCURRENCY, REQUEST_TIMEOUT_SECS,
};

use crate::cli::Args;

const APP_DIR: &str = "paper-downloader";
const DEFAULT_OUTPUT_DIR: &str = "downloaded_papers";

/// `key = value` file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory.
    pub output_dir: Option<PathBuf>,
    /// Default concurrency (1..=16).
    pub concurrency: Option<usize>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// DOI redirect probe timeout in seconds.
    pub doi_timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Contact email for Unpaywall.
    pub unpaywall_email: Option<String>,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Validates value ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency)
        {
            bail!(
                "Invalid config value for `concurrency`: {concurrency}. Expected range: {MIN_CONCURRENCY}..={MAX_CONCURRENCY}"
            );
        }
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout_secs("doi_timeout_secs", self.doi_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;

        if let Some(user_agent) = self.user_agent.as_deref()
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/paper-downloader/config.toml`
/// 2. `$HOME/.config/paper-downloader/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join("config.toml"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist. The default path is optional: a missing file
/// yields an empty config.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => read_config_file(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = without_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    quoted(value).with_context(invalid)?,
                ));
            }
            "concurrency" => {
                let parsed = whole_number(value).with_context(invalid)?;
                let parsed = usize::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("concurrency out of range for usize"))?;
                cfg.concurrency = Some(parsed);
            }
            "request_timeout_secs" => {
                cfg.request_timeout_secs = Some(whole_number(value).with_context(invalid)?);
            }
            "doi_timeout_secs" => {
                cfg.doi_timeout_secs = Some(whole_number(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(whole_number(value).with_context(invalid)?);
            }
            "unpaywall_email" => {
                cfg.unpaywall_email = Some(quoted(value).with_context(invalid)?);
            }
            "user_agent" => {
                cfg.user_agent = Some(quoted(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Drops a trailing `# comment`; a `#` inside a quoted value is kept.
fn without_comment(line: &str) -> &str {
    let mut quoted = false;
    line.char_indices()
        .find(|&(_, ch)| {
            if ch == '"' {
                quoted = !quoted;
            }
            ch == '#' && !quoted
        })
        .map_or(line, |(index, _)| &line[..index])
}

fn quoted(value: &str) -> Result<String> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .context("expected a double-quoted string")
}

fn whole_number(value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("expected a non-negative integer, got `{value}`"))
}

/// Effective run settings after layering defaults, file config, and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub doi_timeout: Duration,
    pub connect_timeout: Duration,
    pub unpaywall_email: Option<String>,
    pub user_agent: Option<String>,
}

impl RunSettings {
    /// Layers `args` over `file` over built-in defaults.
    #[must_use]
    pub fn resolve(args: &Args, file: &FileConfig) -> Self {
        Self {
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| file.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            concurrency: args
                .concurrency
                .map(usize::from)
                .or(file.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            request_timeout: Duration::from_secs(
                args.timeout
                    .or(file.request_timeout_secs)
                    .unwrap_or(REQUEST_TIMEOUT_SECS),
            ),
            doi_timeout: Duration::from_secs(
                file.doi_timeout_secs.unwrap_or(DOI_REDIRECT_TIMEOUT_SECS),
            ),
            connect_timeout: Duration::from_secs(
                file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            ),
            unpaywall_email: args
                .unpaywall_email
                .clone()
                .or_else(|| file.unpaywall_email.clone()),
            user_agent: file.user_agent.clone(),
        }
    }
}
