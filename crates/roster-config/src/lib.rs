use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use roster_core::domain::{normalize_email, normalize_name};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "roster";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub seed: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: vec![
                SeedUser {
                    name: "Alice".to_string(),
                    email: "alice@example.com".to_string(),
                },
                SeedUser {
                    name: "Bob".to_string(),
                    email: "bob@example.com".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("seed entry {0} has an empty name")]
    InvalidSeedName(usize),
    #[error("seed entry {0} has an empty email")]
    InvalidSeedEmail(usize),
    #[error("duplicate seed email: {0}")]
    DuplicateSeedEmail(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    seed: Option<Vec<SeedUser>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(seed) = parsed.seed {
        let mut emails: Vec<String> = Vec::with_capacity(seed.len());
        for (index, user) in seed.iter().enumerate() {
            if normalize_name(&user.name).is_none() {
                return Err(ConfigError::InvalidSeedName(index));
            }
            let Some(email) = normalize_email(&user.email) else {
                return Err(ConfigError::InvalidSeedEmail(index));
            };
            if emails.contains(&email) {
                return Err(ConfigError::DuplicateSeedEmail(email));
            }
            emails.push(email);
        }
        config.seed = seed;
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigError, ConfigFile, SeedUser};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn seed(name: &str, email: &str) -> SeedUser {
        SeedUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn defaults_seed_alice_and_bob() {
        let config = merge_config(ConfigFile { seed: None }).expect("merge");
        let names: Vec<&str> = config.seed.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[test]
    fn merge_config_accepts_explicit_seed() {
        let parsed = ConfigFile {
            seed: Some(vec![seed("Carol", "carol@example.com")]),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.seed.len(), 1);
        assert_eq!(merged.seed[0].email, "carol@example.com");
    }

    #[test]
    fn merge_config_accepts_empty_seed() {
        let merged = merge_config(ConfigFile { seed: Some(Vec::new()) }).expect("merge");
        assert!(merged.seed.is_empty());
    }

    #[test]
    fn merge_config_rejects_blank_seed_fields() {
        let parsed = ConfigFile {
            seed: Some(vec![seed("  ", "carol@example.com")]),
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidSeedName(0))
        ));

        let parsed = ConfigFile {
            seed: Some(vec![seed("Carol", ""), seed("Dan", "dan@example.com")]),
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidSeedEmail(0))
        ));
    }

    #[test]
    fn merge_config_rejects_duplicate_seed_emails() {
        let parsed = ConfigFile {
            seed: Some(vec![
                seed("Carol", "same@example.com"),
                seed("Caroline", "Same@Example.com"),
            ]),
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSeedEmail(ref email) if email == "same@example.com"));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[[seed]]\nname = \"Carol\"\nemail = \"carol@example.com\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.seed.len(), 1);
        assert_eq!(config.seed[0].name, "Carol");
    }

    #[test]
    fn load_at_path_rejects_unknown_fields() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "unknown = true\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
