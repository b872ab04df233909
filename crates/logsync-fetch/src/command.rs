//! Fetching from remote hosts through an external program.
//!
//! The program (default `ssh`) is run as `<program> <args...> <host> <script>`.
//! The script is a POSIX shell snippet evaluated by the remote login shell;
//! in session mode it prints one `path|count|ids` line per log file.

use crate::error::FetchError;
use crate::fetcher::{FetchMode, ManifestFetcher};
use crate::source::SourceSpec;
use async_trait::async_trait;
use logsync_core::model::SourceId;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "ssh";
pub const DEFAULT_REMOTE_ROOT: &str = "$HOME/.claude/projects";
pub const DEFAULT_REMOTE_HISTORY: &str = "$HOME/.claude/history.jsonl";
pub const DEFAULT_ID_FIELD: &str = "uuid";

/// How to reach remote sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    pub program: String,
    /// Arguments placed before the host
    pub args: Vec<String>,
    /// Directory scanned for `*.jsonl` logs; shell variables are expanded remotely
    pub remote_root: String,
    /// History file read in history mode; shell variables are expanded remotely
    pub history_file: String,
    /// JSON field holding each log line's identifier
    pub id_field: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec![
                "-o".to_string(),
                "BatchMode=yes".to_string(),
                "-o".to_string(),
                "ConnectTimeout=10".to_string(),
            ],
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            history_file: DEFAULT_REMOTE_HISTORY.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

/// Double-quote a value for the remote shell, keeping `$VAR` expansion.
fn shell_double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Single-quote a value for the remote shell, with no expansion.
fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Exit status of the sessions script when `jq` is not installed remotely
pub const EXIT_NO_JQ: i32 = 4;
/// Exit status of the sessions script when reading one log file fails
pub const EXIT_READ_FAILED: i32 = 5;

/// Remote script that lists every log file under `root` as a manifest line.
///
/// Any file that cannot be counted or decoded fails the whole script, so a
/// host without `jq` can never report a session with its ids missing.
pub fn sessions_script(root: &str, id_field: &str) -> String {
    format!(
        concat!(
            "command -v jq >/dev/null 2>&1 || {{ echo 'jq not found' >&2; exit {no_jq}; }}; ",
            "cd {root} || exit 3; ",
            "find . -type f -name '*.jsonl' | sed 's|^\\./||' | sort | ",
            "while IFS= read -r f; do ",
            "c=$(grep -c '[^[:space:]]' \"$f\"); ",
            "[ $? -le 1 ] || {{ echo \"cannot read $f\" >&2; exit {read_failed}; }}; ",
            "ids=$(jq -R -j --arg k {field} ",
            "'fromjson? | objects | .[$k] // empty | strings | select(length > 0) ",
            "| . + \",\"' \"$f\") ",
            "|| {{ echo \"jq failed on $f\" >&2; exit {read_failed}; }}; ",
            "printf '%s|%s|%s\\n' \"$f\" \"$c\" \"$ids\"; ",
            "done"
        ),
        no_jq = EXIT_NO_JQ,
        read_failed = EXIT_READ_FAILED,
        root = shell_double_quote(root),
        field = shell_single_quote(id_field),
    )
}

/// Remote script that prints the history file.
pub fn history_script(history_file: &str) -> String {
    format!("cat {}", shell_double_quote(history_file))
}

/// Fetches from remote hosts by running the configured program
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    mode: FetchMode,
    config: CommandConfig,
}

impl CommandFetcher {
    pub fn sessions(config: CommandConfig) -> Self {
        Self {
            mode: FetchMode::Sessions,
            config,
        }
    }

    pub fn history(config: CommandConfig) -> Self {
        Self {
            mode: FetchMode::History,
            config,
        }
    }

    fn script(&self) -> String {
        match self.mode {
            FetchMode::Sessions => sessions_script(&self.config.remote_root, &self.config.id_field),
            FetchMode::History => history_script(&self.config.history_file),
        }
    }

    /// Run the program against `host` and return its stdout.
    ///
    /// # Errors
    ///
    /// `Failed` when the program cannot be started, exits non-zero or prints
    /// non-UTF-8 output.
    pub async fn run(&self, source_id: &str, host: &str) -> Result<String, FetchError> {
        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(host)
            .arg(self.script())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                FetchError::failed(
                    source_id,
                    format!("could not run `{}`: {}", self.config.program, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::failed(
                source_id,
                format!("{} ({})", stderr.trim(), output.status),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| FetchError::failed(source_id, "remote output is not valid UTF-8"))
    }
}

#[async_trait]
impl ManifestFetcher for CommandFetcher {
    async fn fetch(&self, source: &SourceId) -> Result<String, FetchError> {
        match SourceSpec::parse(source)? {
            SourceSpec::Remote(host) => self.run(source.as_str(), &host).await,
            SourceSpec::Local(path) => Err(FetchError::InvalidSource {
                source_id: source.as_str().to_string(),
                reason: format!("`{}` is a local path, not a host", path.display()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quote_keeps_variables() {
        assert_eq!(shell_double_quote("$HOME/a b"), "\"$HOME/a b\"");
        assert_eq!(shell_double_quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_single_quote_escapes_quote() {
        assert_eq!(shell_single_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_sessions_script_checks_for_jq_first() {
        let script = sessions_script("/data/logs", "uuid");
        assert!(script.starts_with("command -v jq >/dev/null 2>&1 || { echo 'jq not found' >&2;"));
        assert!(script.contains("cd \"/data/logs\" || exit 3; "));
        assert!(script.contains("--arg k 'uuid'"));
    }

    #[test]
    fn test_history_script() {
        assert_eq!(history_script("/h.jsonl"), "cat \"/h.jsonl\"");
    }
}
