//! Logging infrastructure using `log` + `log4rs`.

mod consts;

pub use consts::*;

use crate::foundation::SigningError;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::io::IsTerminal;
use std::path::Path;

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Initialize the logger with optional file output.
///
/// # Arguments
/// - `log_dir`: Optional directory for log files. If `None`, only console output is used.
/// - `filters`: Filter expression (e.g. `"info"`, `"msig_core=debug"`, `"reqwest=debug"`, `"root=info"`).
///
/// # Filtering Strategy (Whitelist)
/// - Root level defaults to OFF (suppresses all external crates completely)
/// - `msig_core` and the `msig` binary are whitelisted at the requested app level (default INFO)
/// - User can opt-in specific 3rd party crates via `<crate>=<level>` (e.g. `"hyper=info"`)
/// - User can opt-in *all* 3rd party logs by explicitly setting `root=<level>`
///
/// The logger is global; repeated calls are ignored. Console output goes to stderr.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), SigningError> {
    let app_level = parse_app_level(filters);
    let root_level = parse_root_override(filters).unwrap_or(LevelFilter::Off);
    let module_levels = parse_module_levels(filters);

    let use_ansi = std::io::stderr().is_terminal();
    let console_pattern = if use_ansi { LOG_LINE_PATTERN_COLORED } else { LOG_LINE_PATTERN };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(console_pattern)))
        .build();

    let mut config_builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut root_appenders: Vec<&str> = vec![CONSOLE_APPENDER];

    if let Some(dir) = log_dir.map(str::trim).filter(|s| !s.is_empty()) {
        let dir = Path::new(dir);

        let file_appender = rolling_appender(dir, LOG_FILE_NAME)?;
        config_builder = config_builder.appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(file_appender)));
        root_appenders.push(LOG_FILE_APPENDER);

        let err_file_appender = rolling_appender(dir, ERR_LOG_FILE_NAME)?;
        config_builder = config_builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Warn)))
                .build(ERR_LOG_FILE_APPENDER, Box::new(err_file_appender)),
        );
        root_appenders.push(ERR_LOG_FILE_APPENDER);
    }

    let appender_names: Vec<String> = root_appenders.iter().map(|name| (*name).to_string()).collect();

    // Whitelist our crates at the requested app level (unless user explicitly set them)
    for crate_name in WHITELISTED_CRATES {
        if !module_levels.iter().any(|(m, _)| m == *crate_name) {
            config_builder = config_builder.logger(
                Logger::builder()
                    .appenders(appender_names.clone())
                    .additive(false)
                    .build(*crate_name, app_level),
            );
        }
    }

    for (module, level) in &module_levels {
        config_builder =
            config_builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, *level));
    }

    let config = config_builder
        .build(Root::builder().appenders(root_appenders).build(root_level))
        .map_err(|err| SigningError::ConfigError(format!("logger config invalid: {err}")))?;
    let _ = log4rs::init_config(config);
    Ok(())
}

fn rolling_appender(dir: &Path, file_name: &str) -> Result<RollingFileAppender, SigningError> {
    let log_path = dir.join(file_name);
    let archive_pattern = dir.join(format!("{file_name}.{{}}.gz"));
    let archive_pattern = archive_pattern
        .to_str()
        .ok_or_else(|| SigningError::ConfigError(format!("log dir is not valid UTF-8: {}", dir.display())))?;

    let roller = FixedWindowRoller::builder()
        .base(1)
        .build(archive_pattern, LOG_FILE_MAX_ROLLS)
        .map_err(|err| SigningError::ConfigError(format!("log roller for {file_name}: {err}")))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE)), Box::new(roller));

    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build(log_path, Box::new(policy))
        .map_err(SigningError::from)
}

fn parse_app_level(filters: &str) -> LevelFilter {
    for part in filters.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !part.contains('=') {
            if let Ok(level) = part.parse() {
                return level;
            }
        }
    }
    LevelFilter::Info
}

fn parse_root_override(filters: &str) -> Option<LevelFilter> {
    for part in filters.split(',') {
        let Some((module, level_str)) = part.trim().split_once('=') else {
            continue;
        };
        if module.trim() != "root" {
            continue;
        }
        if let Ok(level) = level_str.trim().parse() {
            return Some(level);
        }
    }
    None
}

fn parse_module_levels(filters: &str) -> Vec<(String, LevelFilter)> {
    let mut result = Vec::new();
    for part in filters.split(',') {
        let Some((module, level_str)) = part.trim().split_once('=') else {
            continue;
        };
        let module = module.trim();
        let level_str = level_str.trim();
        if module.is_empty() || level_str.is_empty() || module == "root" {
            continue;
        }
        if let Ok(level) = level_str.parse() {
            result.push((module.to_string(), level));
        }
    }
    result
}
