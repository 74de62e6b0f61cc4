//! Hook configuration.
//!
//! Values are layered: built-in defaults, then the optional TOML file, then
//! `FSVS_APT_HOOK_*` environment variables, then command-line overrides.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Config file read when `--config` is not given. Absence is not an error.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fsvs-apt-hook.toml";

pub const DEFAULT_LOG_PATH: &str = "/var/log/apt/term.log";
pub const DEFAULT_VCS_BINARY: &str = "/usr/bin/fsvs";
pub const DEFAULT_TRACKED_ROOT: &str = "/";
pub const DEFAULT_MESSAGE_FILE: &str = "/tmp/fsvs_cm";
pub const DEFAULT_MESSAGE_PREFIX: &str = "fsvs-apt-hook_";

pub const LOG_ENV_VAR: &str = "FSVS_APT_HOOK_LOG";
pub const VCS_ENV_VAR: &str = "FSVS_APT_HOOK_VCS";
pub const ROOT_ENV_VAR: &str = "FSVS_APT_HOOK_ROOT";
pub const MESSAGE_FILE_ENV_VAR: &str = "FSVS_APT_HOOK_MESSAGE_FILE";

/// Everything one hook run needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Apt transaction log to scan.
    pub log_path: PathBuf,
    /// fsvs binary: an absolute path, or a name looked up in `PATH`.
    pub vcs_binary: String,
    /// Path placed under version control.
    pub tracked_root: PathBuf,
    /// Where the commit message is written before committing.
    pub message_file: PathBuf,
    /// Prefix for the commit message header and for diagnostics.
    pub message_prefix: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            vcs_binary: DEFAULT_VCS_BINARY.to_string(),
            tracked_root: PathBuf::from(DEFAULT_TRACKED_ROOT),
            message_file: PathBuf::from(DEFAULT_MESSAGE_FILE),
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
        }
    }
}

/// Values given on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub log_path: Option<PathBuf>,
    pub vcs_binary: Option<String>,
    pub tracked_root: Option<PathBuf>,
    pub message_file: Option<PathBuf>,
}

/// On-disk shape of the config file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    log_path: Option<PathBuf>,
    vcs_binary: Option<String>,
    tracked_root: Option<PathBuf>,
    message_file: Option<PathBuf>,
    message_prefix: Option<String>,
}

impl HookConfig {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
    ///
    /// An explicitly given file must exist; the default one may be absent.
    /// Environment overrides are applied on top of the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No config file at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// [`load`](Self::load), then command-line overrides on top.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Defaults overlaid with the contents of the TOML file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let mut config = Self::default();
        config.merge(file);
        Ok(config)
    }

    fn merge(&mut self, file: FileConfig) {
        if let Some(v) = file.log_path {
            self.log_path = v;
        }
        if let Some(v) = file.vcs_binary {
            self.vcs_binary = v;
        }
        if let Some(v) = file.tracked_root {
            self.tracked_root = v;
        }
        if let Some(v) = file.message_file {
            self.message_file = v;
        }
        if let Some(v) = file.message_prefix {
            self.message_prefix = v;
        }
    }

    /// Apply `FSVS_APT_HOOK_*` overrides.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_override(LOG_ENV_VAR) {
            self.log_path = PathBuf::from(v);
        }
        if let Some(v) = env_override(VCS_ENV_VAR) {
            self.vcs_binary = v;
        }
        if let Some(v) = env_override(ROOT_ENV_VAR) {
            self.tracked_root = PathBuf::from(v);
        }
        if let Some(v) = env_override(MESSAGE_FILE_ENV_VAR) {
            self.message_file = PathBuf::from(v);
        }
    }

    /// Apply command-line overrides; these win over every other layer.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = &overrides.log_path {
            self.log_path = v.clone();
        }
        if let Some(v) = &overrides.vcs_binary {
            self.vcs_binary = v.clone();
        }
        if let Some(v) = &overrides.tracked_root {
            self.tracked_root = v.clone();
        }
        if let Some(v) = &overrides.message_file {
            self.message_file = v.clone();
        }
    }
}

/// Read an override variable, ignoring (with a warning) an empty value.
fn env_override(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        Ok(_) => {
            warn!("{} is set but empty, ignoring", name);
            None
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 4] = [LOG_ENV_VAR, VCS_ENV_VAR, ROOT_ENV_VAR, MESSAGE_FILE_ENV_VAR];

    #[test]
    fn test_defaults() {
        let config = HookConfig::default();
        assert_eq!(config.log_path, PathBuf::from("/var/log/apt/term.log"));
        assert_eq!(config.vcs_binary, "/usr/bin/fsvs");
        assert_eq!(config.tracked_root, PathBuf::from("/"));
        assert_eq!(config.message_file, PathBuf::from("/tmp/fsvs_cm"));
        assert_eq!(config.message_prefix, "fsvs-apt-hook_");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = HookConfig::from_toml(
            r#"
tracked_root = "/etc"
message_prefix = "host1_"
"#,
        )
        .unwrap();

        assert_eq!(config.tracked_root, PathBuf::from("/etc"));
        assert_eq!(config.message_prefix, "host1_");
        assert_eq!(config.vcs_binary, DEFAULT_VCS_BINARY);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(HookConfig::from_toml("tracked_rot = \"/etc\"").is_err());
    }

    #[test]
    fn test_from_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = HookConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_from_file_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook.toml");
        std::fs::write(&path, "log_path = [").unwrap();

        let result = HookConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook.toml");
        std::fs::write(&path, "vcs_binary = \"/opt/fsvs\"\nlog_path = \"/x.log\"\n").unwrap();

        temp_env::with_vars(
            [
                (VCS_ENV_VAR, Some("/usr/local/bin/fsvs")),
                (LOG_ENV_VAR, None),
                (ROOT_ENV_VAR, None),
                (MESSAGE_FILE_ENV_VAR, None),
            ],
            || {
                let config = HookConfig::load(Some(&path)).unwrap();
                assert_eq!(config.vcs_binary, "/usr/local/bin/fsvs");
                assert_eq!(config.log_path, PathBuf::from("/x.log"));
            },
        );
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        temp_env::with_vars(
            [
                (ROOT_ENV_VAR, Some("")),
                (LOG_ENV_VAR, None),
                (VCS_ENV_VAR, None),
                (MESSAGE_FILE_ENV_VAR, None),
            ],
            || {
                let mut config = HookConfig::default();
                config.apply_env();
                assert_eq!(config.tracked_root, PathBuf::from(DEFAULT_TRACKED_ROOT));
            },
        );
    }

    #[test]
    fn test_all_env_overrides() {
        temp_env::with_vars(
            [
                (LOG_ENV_VAR, Some("/a.log")),
                (VCS_ENV_VAR, Some("fsvs")),
                (ROOT_ENV_VAR, Some("/etc")),
                (MESSAGE_FILE_ENV_VAR, Some("/run/msg")),
            ],
            || {
                let mut config = HookConfig::default();
                config.apply_env();
                assert_eq!(config.log_path, PathBuf::from("/a.log"));
                assert_eq!(config.vcs_binary, "fsvs");
                assert_eq!(config.tracked_root, PathBuf::from("/etc"));
                assert_eq!(config.message_file, PathBuf::from("/run/msg"));
            },
        );
    }

    #[test]
    fn test_unset_env_keeps_defaults() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let mut config = HookConfig::default();
            config.apply_env();
            assert_eq!(config, HookConfig::default());
        });
    }

    #[test]
    fn test_layer_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook.toml");
        std::fs::write(
            &path,
            "log_path = \"/file.log\"\nvcs_binary = \"/file/fsvs\"\ntracked_root = \"/file\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            log_path: Some(PathBuf::from("/cli.log")),
            ..Default::default()
        };

        temp_env::with_vars(
            [
                (LOG_ENV_VAR, Some("/env.log")),
                (VCS_ENV_VAR, Some("/env/fsvs")),
                (ROOT_ENV_VAR, None),
                (MESSAGE_FILE_ENV_VAR, None),
            ],
            || {
                let config = HookConfig::resolve(Some(&path), &overrides).unwrap();
                // flag beats env
                assert_eq!(config.log_path, PathBuf::from("/cli.log"));
                // env beats file
                assert_eq!(config.vcs_binary, "/env/fsvs");
                // file beats default
                assert_eq!(config.tracked_root, PathBuf::from("/file"));
                // default
                assert_eq!(config.message_file, PathBuf::from(DEFAULT_MESSAGE_FILE));
            },
        );
    }

    #[test]
    fn test_every_override_wins_over_env() {
        let overrides = ConfigOverrides {
            log_path: Some(PathBuf::from("/cli.log")),
            vcs_binary: Some("cli-fsvs".to_string()),
            tracked_root: Some(PathBuf::from("/srv")),
            message_file: Some(PathBuf::from("/run/cli_msg")),
        };

        temp_env::with_vars(
            [
                (LOG_ENV_VAR, Some("/env.log")),
                (VCS_ENV_VAR, Some("env-fsvs")),
                (ROOT_ENV_VAR, Some("/etc")),
                (MESSAGE_FILE_ENV_VAR, Some("/run/env_msg")),
            ],
            || {
                let mut config = HookConfig::default();
                config.apply_env();
                config.apply_overrides(&overrides);
                assert_eq!(config.log_path, PathBuf::from("/cli.log"));
                assert_eq!(config.vcs_binary, "cli-fsvs");
                assert_eq!(config.tracked_root, PathBuf::from("/srv"));
                assert_eq!(config.message_file, PathBuf::from("/run/cli_msg"));
            },
        );
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let mut config = HookConfig::default();
            config.apply_overrides(&ConfigOverrides::default());
            assert_eq!(config, HookConfig::default());
        });
    }
}
