use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::graph::Placement;
use crate::model::Position;
use crate::project::DAGFORGE_DIR;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Grid used to place nodes created by `add_node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_origin")]
    pub origin_x: f64,
    #[serde(default = "default_origin")]
    pub origin_y: f64,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: default_origin(),
            origin_y: default_origin(),
            spacing: default_spacing(),
            columns: default_columns(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub const fn placement(&self) -> Placement {
        Placement {
            origin: Position::new(self.origin_x, self.origin_y),
            spacing: self.spacing,
            columns: self.columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(DAGFORGE_DIR).join("config.toml")
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("dagforge/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

const fn default_origin() -> f64 {
    40.0
}

const fn default_spacing() -> f64 {
    120.0
}

const fn default_columns() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project_config(root: &Path, content: &str) {
        let path = project_config_path(root);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_project_config(dir.path()).expect("load should succeed");
        assert_eq!(cfg, ProjectConfig::default());
        assert!(cfg.export.pretty);
        assert_eq!(cfg.layout.placement(), Placement::default());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            dir.path(),
            r"
[layout]
columns = 3

[export]
pretty = false
",
        );

        let cfg = load_project_config(dir.path()).unwrap();
        assert_eq!(cfg.layout.columns, 3);
        assert!((cfg.layout.spacing - 120.0).abs() < f64::EPSILON);
        assert!(!cfg.export.pretty);
    }

    #[test]
    fn parse_failure_names_the_file() {
        let dir = TempDir::new().unwrap();
        write_project_config(dir.path(), "[layout\ncolumns = ");

        let err = load_project_config(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn user_config_reads_output_preference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output = \"json\"\n").unwrap();

        let cfg = load_user_config_from(&path).unwrap();
        assert_eq!(cfg.output.as_deref(), Some("json"));

        let missing = load_user_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, UserConfig::default());
    }
}
