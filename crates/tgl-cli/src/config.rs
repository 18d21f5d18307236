//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use tgl_core::schedule::Schedule;
use tgl_core::types::WorkspaceId;

/// Application configuration.
///
/// Schedules are validated as they deserialize; a config with a malformed
/// duration, cron expression, or start hour fails to load rather than
/// silently dropping the offending schedule.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Toggl API token, from <https://track.toggl.com/profile>.
    pub api_token: String,

    /// Workspace the entries are created in.
    pub workspace_id: WorkspaceId,

    /// Workspace display name, kept for status output.
    #[serde(rename = "workspace", default)]
    pub workspace_name: String,

    /// Entries to create, in declaration order.
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"[REDACTED]")
            .field("workspace_id", &self.workspace_id)
            .field("workspace_name", &self.workspace_name)
            .field("schedules", &self.schedules.len())
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Layers, later entries winning: the default config location, the
    /// given file, then `TGL_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TGL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tgl.
///
/// On Linux: `~/.config/tgl`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tgl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        api_token = "0123456789abcdef"
        workspace_id = 42
        workspace = "Acme"

        [[schedules]]
        project = "Acme Platform"
        project_id = 101
        description = "Daily work"
        duration = "7h30m"
        billable = true
        cron = "0 17 * * 1-5"
        start_hour = 8
    "#;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (temp, path)
    }

    #[test]
    fn loads_schedules_from_toml() {
        let (_temp, path) = write_config(CONFIG);
        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.workspace_id, WorkspaceId::new(42));
        assert_eq!(config.workspace_name, "Acme");
        assert_eq!(config.schedules.len(), 1);
        assert_eq!(config.schedules[0].duration.seconds(), 27000);
        assert_eq!(config.schedules[0].cron.as_str(), "0 17 * * 1-5");
    }

    #[test]
    fn debug_redacts_api_token() {
        let (_temp, path) = write_config(CONFIG);
        let config = Config::load_from(Some(&path)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("0123456789abcdef"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn rejects_malformed_schedule_duration() {
        let (_temp, path) = write_config(&CONFIG.replace("7h30m", "soon"));
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn rejects_malformed_cron_expression() {
        let (_temp, path) = write_config(&CONFIG.replace("0 17 * * 1-5", "0 17 * *"));
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn schedules_default_to_empty() {
        let (_temp, path) = write_config(
            "api_token = \"0123456789abcdef\"\nworkspace_id = 42\n",
        );
        let config = Config::load_from(Some(&path)).unwrap();
        assert!(config.schedules.is_empty());
    }
}
