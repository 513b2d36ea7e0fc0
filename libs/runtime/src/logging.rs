use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::filter::FilterFn;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == subsystem or target starts with "subsystem::"
fn matches_subsystem_prefix(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || (target.starts_with(subsystem) && target[subsystem.len()..].starts_with("::"))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotWriter {
    fn open(log_path: &Path, max_bytes: usize) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rot = FileRotate::new(
            log_path,
            AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rot))))
    }

    fn handle(&self) -> RotWriterHandle {
        RotWriterHandle(Some(self.0.clone()))
    }
}

/// A writer handle that may be None (drops writes silently).
#[derive(Clone)]
struct RotWriterHandle(Option<Arc<Mutex<FileRotate<AppendTimestamp>>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(w) => w.lock().unwrap().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(w) => w.lock().unwrap().flush(),
            None => Ok(()),
        }
    }
}

/// Route log records to different files by target prefix; falls back to the
/// "default" section's file when no subsystem matches.
#[derive(Clone)]
struct SubsystemRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl SubsystemRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubsystemRouter {
    type Writer = RotWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.default.as_ref().map(|w| w.0.clone()))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        let target = meta.target();
        for (name, writer) in &self.by_prefix {
            if matches_subsystem_prefix(target, name) {
                return writer.handle();
            }
        }
        RotWriterHandle(self.default.as_ref().map(|w| w.0.clone()))
    }
}

// -------- filters --------

type SubsystemFilter =
    FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Filter for the catch-all layers: anything NOT claimed by an explicit
/// subsystem section, up to `max_level`.
fn default_filter(subsystems: Vec<String>, max_level: Level) -> SubsystemFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        if subsystems.iter().any(|s| matches_subsystem_prefix(t, s)) {
            return false;
        }
        meta.level() <= &max_level
    }))
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_section_writer(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let log_path = resolve_log_path(&section.file, base_dir);
    match RotWriter::open(&log_path, max_bytes as usize) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

/// Initialize logging from a configuration.
///
/// Console output uses human-readable formatting; file output is JSON with
/// size-based rotation. Relative file paths resolve against `base_dir`
/// (usually `server.home_dir`).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, prelude::*, Registry};

    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let default_section = cfg.get("default");
    let subsystem_sections: Vec<(String, &Section)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect();
    let subsystem_names: Vec<String> =
        subsystem_sections.iter().map(|(n, _)| n.clone()).collect();

    let ansi = std::io::stdout().is_terminal();

    // Explicit subsystem console layer
    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in &subsystem_sections {
        if let Some(level) = parse_tracing_level(&section.console_level).map(LevelFilter::from_level)
        {
            console_targets = console_targets.with_target(name.clone(), level);
        }
    }
    let console_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets);

    // File router: per-subsystem files plus the default file
    let router = SubsystemRouter {
        default: default_section.and_then(|s| open_section_writer("default", s, base_dir)),
        by_prefix: subsystem_sections
            .iter()
            .filter_map(|(name, section)| {
                open_section_writer(name, section, base_dir).map(|w| (name.clone(), w))
            })
            .collect(),
    };

    let mut file_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in &subsystem_sections {
        if section.file.trim().is_empty() {
            continue;
        }
        if let Some(level) = parse_tracing_level(&section.file_level).map(LevelFilter::from_level) {
            file_targets = file_targets.with_target(name.clone(), level);
        }
    }

    // Collect independent layers as boxed trait objects attached directly to
    // the registry. Each layer carries its own per-target filter, so composing
    // them via a Vec is equivalent to chaining `.with()` calls.
    let mut layers: Vec<Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(console_layer.boxed());

    // Catch-all console layer for targets not claimed by a subsystem section
    if let Some(level) = default_section.and_then(|s| parse_tracing_level(&s.console_level)) {
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(default_filter(subsystem_names.clone(), level))
                .boxed(),
        );
    }

    if !router.is_empty() {
        let explicit_file_layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(file_targets);
        layers.push(explicit_file_layer.boxed());

        if let Some(level) = default_section
            .filter(|_| router.default.is_some())
            .and_then(|s| parse_tracing_level(&s.file_level))
        {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(router)
                    .with_filter(default_filter(subsystem_names, level))
                    .boxed(),
            );
        }
    }

    let _ = Registry::default().with(layers).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("invalid"), Some(Level::INFO)); // defaults to INFO
    }

    #[test]
    fn test_subsystem_prefix_matching() {
        assert!(matches_subsystem_prefix("auth_flow", "auth_flow"));
        assert!(matches_subsystem_prefix("auth_flow::domain", "auth_flow"));
        assert!(!matches_subsystem_prefix("auth_flow_extra", "auth_flow"));
        assert!(!matches_subsystem_prefix("mailer", "auth_flow"));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("absolute.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), tmp.path()), abs);
    }

    #[test]
    fn test_rot_writer_creates_parent_dirs() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let res = RotWriter::open(&p, 128 * 1024);
        assert!(res.is_ok(), "writer should be created");
        assert!(p.parent().unwrap().exists(), "parent dir must be created");
    }

    #[test]
    fn test_empty_file_disables_section_writer() {
        let tmp = tempdir().unwrap();
        let mut section = default_logging_config()["default"].clone();
        section.file = String::new();
        assert!(open_section_writer("default", &section, tmp.path()).is_none());
    }
}
