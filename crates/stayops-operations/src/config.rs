use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::Result;
use crate::error::OperationError;
use crate::traits::Channel;

/// File name looked up next to the store when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "stayops.toml";

const DEFAULT_CLEANING_LEAD_TIME_HOURS: u32 = 24;

/// Upper bound for `cleaning-lead-time-hours`: one year.
pub const MAX_CLEANING_LEAD_TIME_HOURS: u32 = 24 * 365;

/// Tunables for the reservation lifecycle orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct OrchestratorConfig {
    cleaning_lead_time_hours: u32,
    notify_owner_on_confirm: bool,
    refund_notice_on_cancel: bool,
    guest_channel: Channel,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cleaning_lead_time_hours: DEFAULT_CLEANING_LEAD_TIME_HOURS,
            notify_owner_on_confirm: true,
            refund_notice_on_cancel: true,
            guest_channel: Channel::Email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    orchestrator: OrchestratorConfig,
}

impl OrchestratorConfig {
    /// Parses the `[orchestrator]` table of a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ConfigParse` if the document is malformed or
    /// contains unknown keys, and `OperationError::ConfigLeadTimeOutOfRange`
    /// if the lead time exceeds [`MAX_CLEANING_LEAD_TIME_HOURS`].
    pub fn from_toml_str(path: &Path, contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|source| OperationError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        let config = file.orchestrator;
        if config.cleaning_lead_time_hours > MAX_CLEANING_LEAD_TIME_HOURS {
            return Err(OperationError::ConfigLeadTimeOutOfRange {
                path: path.to_path_buf(),
                hours: config.cleaning_lead_time_hours,
                max: MAX_CLEANING_LEAD_TIME_HOURS,
            });
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| OperationError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &contents)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn cleaning_lead_time(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.cleaning_lead_time_hours))
    }

    #[must_use]
    pub fn cleaning_lead_time_hours(&self) -> u32 {
        self.cleaning_lead_time_hours
    }

    #[must_use]
    pub fn notify_owner_on_confirm(&self) -> bool {
        self.notify_owner_on_confirm
    }

    #[must_use]
    pub fn refund_notice_on_cancel(&self) -> bool {
        self.refund_notice_on_cancel
    }

    #[must_use]
    pub fn guest_channel(&self) -> Channel {
        self.guest_channel
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_cleaning_lead_time_hours(mut self, hours: u32) -> Self {
        self.cleaning_lead_time_hours = hours;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_notify_owner_on_confirm(mut self, notify: bool) -> Self {
        self.notify_owner_on_confirm = notify;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_refund_notice_on_cancel(mut self, notify: bool) -> Self {
        self.refund_notice_on_cancel = notify;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(contents: &str) -> Result<OrchestratorConfig> {
        OrchestratorConfig::from_toml_str(&PathBuf::from("stayops.toml"), contents)
    }

    #[test]
    fn empty_document_yields_defaults() -> anyhow::Result<()> {
        let config = parse("")?;

        assert_eq!(config, OrchestratorConfig::default());
        assert_eq!(config.cleaning_lead_time_hours(), 24);
        assert_eq!(config.guest_channel(), Channel::Email);
        Ok(())
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() -> anyhow::Result<()> {
        let config = parse(
            r#"
[orchestrator]
cleaning-lead-time-hours = 48
guest-channel = "sms"
"#,
        )?;

        assert_eq!(config.cleaning_lead_time(), chrono::Duration::hours(48));
        assert_eq!(config.guest_channel(), Channel::Sms);
        assert!(config.notify_owner_on_confirm());
        assert!(config.refund_notice_on_cancel());
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse(
            r"
[orchestrator]
cleaning-hours = 12
",
        );

        assert!(matches!(result, Err(OperationError::ConfigParse { .. })));
    }

    #[test]
    fn lead_time_above_one_year_is_rejected() -> anyhow::Result<()> {
        let at_limit = parse("[orchestrator]\ncleaning-lead-time-hours = 8760\n")?;
        let too_far = parse("[orchestrator]\ncleaning-lead-time-hours = 4000000000\n");

        assert_eq!(at_limit.cleaning_lead_time_hours(), MAX_CLEANING_LEAD_TIME_HOURS);
        assert!(matches!(
            too_far,
            Err(OperationError::ConfigLeadTimeOutOfRange {
                hours: 4_000_000_000,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let config = OrchestratorConfig::load_or_default(&dir.path().join(DEFAULT_CONFIG_FILE))?;

        assert_eq!(config, OrchestratorConfig::default());
        Ok(())
    }

    #[test]
    fn load_reads_file_from_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "[orchestrator]\nnotify-owner-on-confirm = false\n",
        )?;

        let config = OrchestratorConfig::load(&path)?;

        assert!(!config.notify_owner_on_confirm());
        Ok(())
    }
}
