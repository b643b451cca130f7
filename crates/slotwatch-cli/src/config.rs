//! YAML configuration file.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use slotwatch_models::slot::DISPLAY_FORMAT;
use slotwatch_models::TimeRange;
use slotwatch_runtime::RuntimeConfig;

use crate::error::{CliError, Result};

/// On-disk layout of `config.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub ranges: Vec<RangeEntry>,
    pub poll_interval_secs: Option<u64>,
    pub heartbeat_interval_secs: Option<u64>,
    pub online: Option<bool>,
    pub telegram: Option<TelegramSection>,
}

/// One `ranges` entry; times are local `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Default, Deserialize)]
pub struct RangeEntry {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramSection {
    pub chat_id: i64,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ranges: Vec<TimeRange>,
    pub runtime: RuntimeConfig,
    pub telegram_chat_id: Option<i64>,
}

impl AppConfig {
    /// Load and validate the config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::parse(&raw)
    }

    /// Parse and validate YAML text.
    pub fn parse(raw: &str) -> Result<Self> {
        let file: FileConfig = serde_yaml::from_str(raw)?;
        Self::try_from(file)
    }
}

impl TryFrom<FileConfig> for AppConfig {
    type Error = CliError;

    fn try_from(file: FileConfig) -> Result<Self> {
        let ranges = convert_ranges(&file.ranges)?;

        let mut runtime = RuntimeConfig::default();
        if let Some(secs) = file.poll_interval_secs {
            if secs == 0 {
                return Err(CliError::Config("poll_interval_secs must be positive".into()));
            }
            runtime = runtime.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = file.heartbeat_interval_secs {
            if secs == 0 {
                return Err(CliError::Config("heartbeat_interval_secs must be positive".into()));
            }
            runtime = runtime.with_heartbeat_interval(Duration::from_secs(secs));
        }
        if let Some(online) = file.online {
            runtime = runtime.with_online(online);
        }

        Ok(Self {
            ranges,
            runtime,
            telegram_chat_id: file.telegram.map(|t| t.chat_id),
        })
    }
}

/// Turns raw entries into ranges, skipping ones without both bounds.
pub fn convert_ranges(entries: &[RangeEntry]) -> Result<Vec<TimeRange>> {
    let mut ranges = Vec::with_capacity(entries.len());

    for entry in entries {
        let (Some(start), Some(end)) = (&entry.start, &entry.end) else {
            warn!("skipping range without start or end");
            continue;
        };

        let range = TimeRange::new(parse_local_time(start)?, parse_local_time(end)?)
            .map_err(|e| CliError::Config(e.to_string()))?;
        ranges.push(range);
    }

    if ranges.is_empty() {
        return Err(CliError::Config("no ranges".into()));
    }

    Ok(ranges)
}

/// Parses a local wall-clock time into UTC.
///
/// Ambiguous times (DST fold) resolve to the earlier instant.
pub fn parse_local_time(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), DISPLAY_FORMAT)
        .map_err(|e| CliError::Config(format!("invalid time {:?}: {}", raw, e)))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| CliError::Config(format!("time {:?} does not exist locally", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
ranges:
  - start: "2026-10-20 09:00:00"
    end: "2026-10-20 12:00:00"
  - start: "2026-10-21 14:00:00"
  - start: "2026-10-22 10:00:00"
    end: "2026-10-22 11:30:00"
poll_interval_secs: 5
online: false
telegram:
  chat_id: 123456789
"#;

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.ranges.len(), 2);
        assert_eq!(
            config.ranges[0].start(),
            parse_local_time("2026-10-20 09:00:00").unwrap()
        );
        assert_eq!(config.runtime.poll_interval, Duration::from_secs(5));
        assert_eq!(config.runtime.heartbeat_interval, RuntimeConfig::default().heartbeat_interval);
        assert!(!config.runtime.online);
        assert_eq!(config.telegram_chat_id, Some(123456789));
    }

    #[test]
    fn test_defaults_apply() {
        let config = AppConfig::parse(
            "ranges:\n  - start: \"2026-10-20 09:00:00\"\n    end: \"2026-10-20 10:00:00\"\n",
        )
        .unwrap();

        assert_eq!(config.runtime.poll_interval, Duration::from_secs(10));
        assert!(config.runtime.online);
        assert!(config.telegram_chat_id.is_none());
    }

    #[test]
    fn test_no_ranges() {
        let err = AppConfig::parse("ranges:\n  - start: \"2026-10-20 09:00:00\"\n").unwrap_err();
        assert_eq!(err.to_string(), "config: no ranges");

        assert!(matches!(AppConfig::parse("online: true\n"), Err(CliError::Config(_))));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = AppConfig::parse(
            "ranges:\n  - start: \"2026-10-20 10:00:00\"\n    end: \"2026-10-20 09:00:00\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bad_time_format() {
        let err = AppConfig::parse(
            "ranges:\n  - start: \"20.10.2026 09:00\"\n    end: \"2026-10-20 10:00:00\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid time"));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = AppConfig::parse(
            "ranges:\n  - start: \"2026-10-20 09:00:00\"\n    end: \"2026-10-20 10:00:00\"\npoll_interval_secs: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(AppConfig::parse("ranges: [unclosed"), Err(CliError::Yaml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.ranges.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("config.yaml")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
