use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use tgdigest_runtime_config::{AppConfig, CONFIG_FILE_NAME, apply_env_overrides};

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("tgdigest"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("tgdigest.log"))
}

/// Read `path` as TOML. A missing file is an error only when `required`.
pub fn load_config_file(path: &Path, required: bool) -> Result<AppConfig> {
    if !path.exists() {
        if required {
            bail!("config file {} does not exist", path.display());
        }
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AppConfig::from_toml_str(&raw).with_context(|| format!("Failed to load {}", path.display()))
}

/// Load `explicit` (must exist) or the default file (optional), then overlay
/// the environment.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let mut config = match explicit {
        Some(path) => load_config_file(path, true)?,
        None => load_config_file(&default_config_path()?, false)?,
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
        .validate()
        .context("Invalid configuration after environment overrides")?;
    Ok(config)
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config_file(&dir.path().join("absent.toml"), false).expect("load");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config_file(&dir.path().join("absent.toml"), true).expect_err("must fail");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut cfg = AppConfig::default();
        cfg.ollama.model = "qwen2.5:7b".to_string();
        cfg.ui.visible_chats = 15;

        save_config(&cfg, &path).expect("save");
        let loaded = load_config_file(&path, true).expect("load");

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[summary]\nhistory_limit = \"lots\"\n").expect("write");

        let err = load_config_file(&path, true).expect_err("must fail");
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }
}
