//! TOML configuration and flag overrides.
//!
//! Every key is optional. Precedence is flag, then file, then built-in
//! default.

use crate::commands::CommonArgs;
use logsync_core::errors::{ExError, ExErrorKind};
use logsync_core::filter::PathFilter;
use logsync_core::report::ReportOptions;
use logsync_fetch::command::{
    DEFAULT_ID_FIELD, DEFAULT_PROGRAM, DEFAULT_REMOTE_HISTORY, DEFAULT_REMOTE_ROOT,
};
use logsync_fetch::pair::{DEFAULT_BACKOFF, DEFAULT_TIMEOUT};
use logsync_fetch::{CommandConfig, FetchOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchSection,
    pub report: ReportSection,
    pub filter: FilterSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    pub timeout_secs: u64,
    pub retries: u32,
    pub backoff_ms: u64,
    pub program: String,
    /// `None` keeps the program's built-in arguments
    pub args: Option<Vec<String>>,
    pub remote_root: String,
    /// Remote history path; local directory sources use its file name
    pub history_file: String,
    /// JSON field holding each log line's id, for local and remote sources
    pub id_field: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            retries: 0,
            backoff_ms: DEFAULT_BACKOFF.as_millis() as u64,
            program: DEFAULT_PROGRAM.to_string(),
            args: None,
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            history_file: DEFAULT_REMOTE_HISTORY.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub detail_limit: usize,
    pub preview_count: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        let defaults = ReportOptions::default();
        Self {
            detail_limit: defaults.detail_limit,
            preview_count: defaults.preview_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Config {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// `Config` when the text is not valid TOML for this schema.
    pub fn parse(text: &str) -> Result<Self, ExError> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Load a config file, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// `Config` when the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ExError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_path(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::parse(&text).map_err(|e| e.with_path(path.display().to_string()))
    }
}

/// Effective settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub fetch: FetchOptions,
    pub command: CommandConfig,
    pub report: ReportOptions,
    pub filter: PathFilter,
}

impl Settings {
    /// Merge file values with command-line overrides.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when an include or exclude glob does not compile.
    pub fn resolve(config: Config, args: &CommonArgs) -> Result<Self, ExError> {
        let fetch = FetchOptions {
            timeout: Duration::from_secs(args.timeout.unwrap_or(config.fetch.timeout_secs)),
            retries: args.retries.unwrap_or(config.fetch.retries),
            backoff: Duration::from_millis(config.fetch.backoff_ms),
        };

        let mut command = CommandConfig {
            program: config.fetch.program,
            remote_root: config.fetch.remote_root,
            history_file: config.fetch.history_file,
            id_field: config.fetch.id_field,
            ..CommandConfig::default()
        };
        if let Some(program_args) = config.fetch.args {
            command.args = program_args;
        }

        let report = ReportOptions {
            label_a: args.label_a.clone(),
            label_b: args.label_b.clone(),
            detail_limit: args.limit.unwrap_or(config.report.detail_limit),
            preview_count: args.preview.unwrap_or(config.report.preview_count),
        };

        let include = if args.include.is_empty() {
            config.filter.include
        } else {
            args.include.clone()
        };
        let exclude = if args.exclude.is_empty() {
            config.filter.exclude
        } else {
            args.exclude.clone()
        };
        let filter = PathFilter::new(&include, &exclude)?;

        Ok(Self {
            fetch,
            command,
            report,
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.report.detail_limit, 3);
        assert_eq!(config.report.preview_count, 5);
        assert_eq!(config.fetch.program, "ssh");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [fetch]
            timeout_secs = 5
            args = ["-p", "2222"]

            [filter]
            exclude = ["*/subagents/*"]
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.retries, 0);
        assert_eq!(
            config.fetch.args,
            Some(vec!["-p".to_string(), "2222".to_string()])
        );
        assert_eq!(config.filter.exclude, vec!["*/subagents/*"]);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = Config::parse("[fetch]\ntimeout = 5\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Some(Path::new("/no/such/logsync.toml"))).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
        assert_eq!(err.path(), Some("/no/such/logsync.toml"));
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::parse(
            "[fetch]\ntimeout_secs = 5\nretries = 1\n[report]\ndetail_limit = 9\n",
        )
        .unwrap();
        let args = CommonArgs {
            timeout: Some(2),
            limit: Some(1),
            ..CommonArgs::default()
        };

        let settings = Settings::resolve(config, &args).unwrap();

        assert_eq!(settings.fetch.timeout, Duration::from_secs(2));
        assert_eq!(settings.fetch.retries, 1);
        assert_eq!(settings.report.detail_limit, 1);
        assert_eq!(settings.report.preview_count, 5);
    }

    #[test]
    fn test_bad_glob_fails_resolution() {
        let args = CommonArgs {
            include: vec!["[".to_string()],
            ..CommonArgs::default()
        };
        let err = Settings::resolve(Config::default(), &args).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPattern);
    }
}
