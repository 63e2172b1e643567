use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileReferenceConfig {
    pub directory: Option<PathBuf>,
    pub ion_energies: Option<PathBuf>,
    pub ion_corrections: Option<PathBuf>,
    pub end_members: Option<PathBuf>,
    pub ion_colors: Option<PathBuf>,
}

impl FileReferenceConfig {
    pub fn is_empty(&self) -> bool {
        self.directory.is_none()
            && self.ion_energies.is_none()
            && self.ion_corrections.is_none()
            && self.end_members.is_none()
            && self.ion_colors.is_none()
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDiagramConfig {
    pub metastability: Option<f64>,
    pub ion_concentration: Option<f64>,
    pub ph_range: Option<(f64, f64)>,
    pub potential_range: Option<(f64, f64)>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub directory: Option<PathBuf>,
    pub plot: Option<bool>,
    pub summary: Option<bool>,
}

/// The on-disk configuration; every field is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    pub reference: Option<FileReferenceConfig>,
    pub diagram: Option<FileDiagramConfig>,
    pub output: Option<FileOutputConfig>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Relative paths in the file are taken relative to the file's directory.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        let anchor = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        if let Some(reference) = self.reference.as_mut() {
            anchor(&mut reference.directory);
            anchor(&mut reference.ion_energies);
            anchor(&mut reference.ion_corrections);
            anchor(&mut reference.end_members);
            anchor(&mut reference.ion_colors);
        }
        if let Some(output) = self.output.as_mut() {
            anchor(&mut output.directory);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = PartialAppConfig::from_toml_str(
            r#"
            [reference]
            directory = "tables"
            ion-colors = "/opt/colors.toml"

            [diagram]
            metastability = 50.0
            ion-concentration = 1e-4
            ph-range = [2.0, 12.0]
            potential-range = [-1.0, 1.5]

            [output]
            directory = "plots"
            plot = false
            summary = true
            "#,
        )
        .unwrap();

        let diagram = config.diagram.unwrap();
        assert_eq!(diagram.metastability, Some(50.0));
        assert_eq!(diagram.ph_range, Some((2.0, 12.0)));
        let output = config.output.unwrap();
        assert_eq!(output.plot, Some(false));
        assert_eq!(output.summary, Some(true));
        assert!(!config.reference.unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = PartialAppConfig::from_toml_str("[diagram]\nmetastable = 5.0\n");
        assert!(result.is_err());
        let result = PartialAppConfig::from_toml_str("[plotting]\nplot = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn relative_paths_are_anchored_to_config_directory() {
        let config = PartialAppConfig::from_toml_str(
            "[reference]\ndirectory = \"tables\"\nend-members = \"/abs/end.toml\"\n[output]\ndirectory = \"out\"\n",
        )
        .unwrap()
        .resolve_relative_to(Path::new("/work/project"));

        let reference = config.reference.unwrap();
        assert_eq!(reference.directory, Some(PathBuf::from("/work/project/tables")));
        assert_eq!(reference.end_members, Some(PathBuf::from("/abs/end.toml")));
        assert_eq!(
            config.output.unwrap().directory,
            Some(PathBuf::from("/work/project/out"))
        );
    }

    #[test]
    fn from_file_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[diagram\n").unwrap();
        let result = PartialAppConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { path: p, .. }) if p == path));
    }
}
