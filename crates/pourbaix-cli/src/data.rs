use crate::error::{CliError, Result};
use directories::ProjectDirs;
use pourbaix2d::core::reference::bundled;
use pourbaix2d::core::reference::data::ReferencePaths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "twodmaterials";
const APPLICATION: &str = "pourbaix2d";
const PATH_CONFIG_FILE: &str = "path.conf";

#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    #[cfg(test)]
    pub fn with_custom_path(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn reference_paths(&self) -> ReferencePaths {
        ReferencePaths::in_directory(&self.base_path)
    }

    /// True when every reference table is present in the data directory.
    pub fn has_reference_tables(&self) -> bool {
        bundled::FILES
            .iter()
            .all(|(name, _)| self.base_path.join(name).is_file())
    }

    /// Writes the bundled tables into the data directory and returns their paths.
    pub fn init_data(&self, force: bool) -> Result<Vec<PathBuf>> {
        info!("Writing bundled reference tables to {:?}", &self.base_path);
        if !force {
            if let Some((name, _)) = bundled::FILES
                .iter()
                .find(|(name, _)| self.base_path.join(name).exists())
            {
                return Err(CliError::Data(format!(
                    "'{}' already exists in {}. Use --force to overwrite.",
                    name,
                    self.base_path.display()
                )));
            }
        }
        fs::create_dir_all(&self.base_path)?;

        let mut written = Vec::with_capacity(bundled::FILES.len());
        for (name, content) in bundled::FILES {
            let path = self.base_path.join(name);
            fs::write(&path, content)?;
            debug!("Wrote {:?}", &path);
            written.push(path);
        }
        Ok(written)
    }

    /// Records `path` as the data directory for later runs.
    pub fn set_custom_path(path: &Path) -> Result<()> {
        let text = path.to_str().ok_or_else(|| {
            CliError::Argument(format!("Path is not valid UTF-8: {}", path.display()))
        })?;
        let override_file = Self::override_file()?;
        if let Some(parent) = override_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&override_file, text)?;
        info!("Data directory override stored in {:?}", override_file);
        Ok(())
    }

    pub fn reset_path() -> Result<()> {
        let override_file = Self::override_file()?;
        if override_file.is_file() {
            fs::remove_file(&override_file)?;
            info!("Removed data directory override {:?}", override_file);
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::read_override()? {
            Some(path) => Ok(path),
            None => Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }

    fn read_override() -> Result<Option<PathBuf>> {
        let override_file = Self::override_file()?;
        if !override_file.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&override_file)?;
        let text = text.trim();
        if text.is_empty() {
            warn!("Data directory override {:?} is empty; using the default.", override_file);
            return Ok(None);
        }
        Ok(Some(PathBuf::from(text)))
    }

    fn override_file() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
            CliError::Data("No home directory found to place pourbaix2d data in.".to_string())
        })
    }
}
