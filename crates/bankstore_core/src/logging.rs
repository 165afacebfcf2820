//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start rotating file logs once per process.
//! - Record panics in the log before the default hook prints them.
//!
//! # Invariants
//! - Repeated init with equal [`LogSettings`] is a no-op.
//! - Re-init with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "bankstore";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Validated logging parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogSettings {
    /// Accepts `trace|debug|info|warn|warning|error` in any case and an
    /// absolute directory.
    pub fn parse(level: &str, dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_dir(dir)?,
        })
    }

    fn conflict_with(&self, requested: &LogSettings) -> Option<String> {
        if self.dir != requested.dir {
            return Some(format!(
                "logging already writes to `{}`; cannot move it to `{}`",
                self.dir.display(),
                requested.dir.display()
            ));
        }
        if self.level != requested.level {
            return Some(format!(
                "logging already runs at `{}`; cannot change it to `{}`",
                self.level, requested.level
            ));
        }
        None
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under `log_dir`.
///
/// # Errors
/// - Unsupported level name.
/// - Empty or relative `log_dir`, or a directory that cannot be created.
/// - Logging already active with a different level or directory.
/// - Backend startup failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogSettings::parse(level, log_dir)?;
    // A racing thread may have started the logger with other settings.
    let active = ACTIVE.get_or_try_init(|| ActiveLogger::start(requested.clone()))?;
    match active.settings.conflict_with(&requested) {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

impl ActiveLogger {
    fn start(settings: LogSettings) -> Result<Self, String> {
        std::fs::create_dir_all(&settings.dir)
            .map_err(|err| format!("cannot create `{}`: {err}", settings.dir.display()))?;

        let files = FileSpec::default()
            .directory(settings.dir.as_path())
            .basename(LOG_FILE_BASENAME);
        let handle = Logger::with(LogSpecification::builder().default(settings.level).build())
            .log_to_file(files)
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("log backend did not start: {err}"))?;

        install_panic_hook();
        info!(
            "event=log_start module=logging status=ok level={} dir={} crate_version={}",
            settings.level,
            settings.dir.display(),
            env!("CARGO_PKG_VERSION")
        );

        Ok(Self {
            settings,
            _handle: handle,
        })
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let name = level.trim();
    let name = if name.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        name
    };
    match LevelFilter::from_str(name) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{}`; use trace, debug, info, warn or error",
            level.trim()
        )),
        Ok(filter) => Ok(filter),
    }
}

fn parse_dir(dir: &str) -> Result<PathBuf, String> {
    let path = Path::new(dir.trim());
    if path.as_os_str().is_empty() {
        return Err("log directory is empty".to_string());
    }
    if path.is_relative() {
        return Err(format!("log directory `{}` is not absolute", path.display()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let at = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "?".to_string());
        let thread = std::thread::current();
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<opaque payload>");
        error!(
            "event=panic module=logging status=fatal thread={} at={} message={}",
            thread.name().unwrap_or("unnamed"),
            at,
            one_line(message, PANIC_MESSAGE_LIMIT)
        );
        chained(info);
    }));
}

/// Collapses whitespace runs to single spaces and keeps at most `limit`
/// characters, noting how many were cut.
fn one_line(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let total = collapsed.chars().count();
    if total <= limit {
        return collapsed;
    }
    let kept: String = collapsed.chars().take(limit).collect();
    format!("{kept} [+{} chars]", total - limit)
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, LogSettings};
    use log::LevelFilter;

    #[test]
    fn settings_accept_level_aliases_in_any_case() {
        let dir = std::env::temp_dir();
        let dir = dir.to_str().unwrap();
        assert_eq!(
            LogSettings::parse(" WARNING ", dir).unwrap().level,
            LevelFilter::Warn
        );
        assert_eq!(LogSettings::parse("Error", dir).unwrap().level, LevelFilter::Error);
        assert!(LogSettings::parse("off", dir).is_err());
        assert!(LogSettings::parse("verbose", dir).is_err());
    }

    #[test]
    fn settings_reject_empty_and_relative_dirs() {
        assert!(LogSettings::parse("info", "   ").is_err());
        let err = LogSettings::parse("info", "logs").unwrap_err();
        assert!(err.contains("not absolute"));
    }

    #[test]
    fn one_line_collapses_whitespace_and_reports_cut() {
        assert_eq!(one_line("a\n  b\r\nc-long-tail", 5), "a b c [+10 chars]");
        assert_eq!(one_line("short", 10), "short");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap().to_string();
        let other = tempfile::tempdir().unwrap();
        let other_str = other.path().to_str().unwrap().to_string();

        init_logging("info", &dir_str).expect("first init should succeed");
        init_logging("INFO", &dir_str).expect("same settings should be a no-op");

        let level_err = init_logging("debug", &dir_str).unwrap_err();
        assert!(level_err.contains("cannot change"));
        let dir_err = init_logging("info", &other_str).unwrap_err();
        assert!(dir_err.contains("cannot move"));

        let active = logging_status().expect("logging should be active");
        assert_eq!(active.level, LevelFilter::Info);
        assert_eq!(active.dir, dir.path());
    }
}
