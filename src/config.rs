use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::seed::SeedPlan;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GradebookConfig {
    pub database: Option<String>,
    pub seed: Option<SeedPlan>,
}

impl GradebookConfig {
    /// Database path: explicit flag, then config, then the default
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    pub fn seed_plan(&self) -> SeedPlan {
        self.seed.unwrap_or_default()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("gradebook.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("gradebook.db")
}

/// Load the config file; a missing file yields the defaults
pub fn load_config(path: Option<&Path>) -> Result<GradebookConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(GradebookConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

pub fn write_config(path: &Path, config: &GradebookConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, GradebookConfig::default());
        assert_eq!(config.seed_plan(), SeedPlan::default());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.toml");
        let config = GradebookConfig {
            database: Some("data/school.db".to_string()),
            seed: Some(SeedPlan { grades: 200, ..SeedPlan::default() }),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();
    }

    #[test]
    fn test_partial_seed_table_uses_defaults() {
        let config: GradebookConfig = toml::from_str("[seed]\nstudents = 10\n").unwrap();
        let plan = config.seed_plan();
        assert_eq!(plan.students, 10);
        assert_eq!(plan.grades, 20);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "database = [").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_database_path_precedence() {
        let config = GradebookConfig {
            database: Some("from_config.db".to_string()),
            seed: None,
        };
        assert_eq!(config.database_path(Some(Path::new("flag.db"))), PathBuf::from("flag.db"));
        assert_eq!(config.database_path(None), PathBuf::from("from_config.db"));
        assert_eq!(GradebookConfig::default().database_path(None), default_database_path());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("gradebook.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().exists());
    }
}
