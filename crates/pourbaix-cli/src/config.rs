pub mod defaults;
pub mod file;

use crate::cli::DiagramArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::parser;
use defaults::DefaultsConfig;
pub use file::PartialAppConfig;
use file::{FileDiagramConfig, FileOutputConfig, FileReferenceConfig};
use pourbaix2d::core::reference::data::{ReferenceData, ReferencePaths};
use pourbaix2d::engine::config::{DiagramConfig, DiagramConfigBuilder, DomainLimits};
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the reference tables come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceSource {
    Bundled,
    Files(ReferencePaths),
}

impl ReferenceSource {
    pub fn load(&self) -> Result<ReferenceData> {
        match self {
            ReferenceSource::Bundled => {
                info!("Using the bundled reference tables.");
                Ok(ReferenceData::bundled()?)
            }
            ReferenceSource::Files(paths) => {
                info!("Loading reference tables from {:?}", paths.ion_energies.parent());
                Ok(ReferenceData::load(paths)?)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub plot: bool,
    pub summary: bool,
}

/// Fully merged settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub reference: ReferenceSource,
    pub diagram: DiagramConfig,
    pub output: OutputConfig,
}

impl PartialAppConfig {
    /// Loads the file named by `--config`, or an empty configuration.
    pub fn for_args(args: &DiagramArgs) -> Result<Self> {
        match &args.config {
            Some(path) => {
                let base = path
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                Ok(Self::from_file(path)?.resolve_relative_to(&base))
            }
            None => Ok(Self::default()),
        }
    }

    /// Precedence: CLI flag, then `-S` override, then file, then defaults.
    pub fn merge_with_cli(
        mut self,
        args: &DiagramArgs,
        data_manager: &DataManager,
    ) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let reference_config = self.reference.take().unwrap_or_default();
        let diagram_config = self.diagram.take().unwrap_or_default();
        let output_config = self.output.take().unwrap_or_default();

        let reference =
            Self::merge_reference(reference_config, args.reference_dir.clone(), data_manager);
        debug!("Resolved reference source: {:?}", reference);

        let (ph_min, ph_max) = diagram_config.ph_range.unwrap_or(defaults.ph_range);
        let (pot_min, pot_max) = diagram_config
            .potential_range
            .unwrap_or(defaults.potential_range);

        let diagram = DiagramConfigBuilder::new()
            .metastability(
                args.metastability
                    .or(diagram_config.metastability)
                    .unwrap_or(defaults.metastability),
            )
            .ion_concentration(
                args.ion_concentration
                    .or(diagram_config.ion_concentration)
                    .unwrap_or(defaults.ion_concentration),
            )
            .limits(DomainLimits::new(ph_min, ph_max, pot_min, pot_max))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let output = OutputConfig {
            directory: output_config
                .directory
                .unwrap_or(defaults.output_directory),
            plot: output_config.plot.unwrap_or(defaults.plot),
            summary: output_config.summary.unwrap_or(defaults.summary),
        };

        Ok(AppConfig {
            reference,
            diagram,
            output,
        })
    }

    fn merge_reference(
        file: FileReferenceConfig,
        cli_directory: Option<PathBuf>,
        data_manager: &DataManager,
    ) -> ReferenceSource {
        if let Some(directory) = cli_directory {
            return ReferenceSource::Files(ReferencePaths::in_directory(&directory));
        }
        if file.is_empty() {
            return if data_manager.has_reference_tables() {
                ReferenceSource::Files(data_manager.reference_paths())
            } else {
                debug!(
                    "No reference tables in {:?}; falling back to the bundled set.",
                    data_manager.get_data_path()
                );
                ReferenceSource::Bundled
            };
        }

        let base = match &file.directory {
            Some(directory) => ReferencePaths::in_directory(directory),
            None => data_manager.reference_paths(),
        };
        ReferenceSource::Files(ReferencePaths {
            ion_energies: file.ion_energies.unwrap_or(base.ion_energies),
            ion_corrections: file.ion_corrections.unwrap_or(base.ion_corrections),
            end_members: file.end_members.unwrap_or(base.end_members),
            ion_colors: file.ion_colors.unwrap_or(base.ion_colors),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        let config_err = |e: parser::ParseError| CliError::Config(e.to_string());
        for kv_pair in set_values {
            let (key, value) = parser::split_key_value(kv_pair).map_err(config_err)?;
            let diagram = || FileDiagramConfig::default();
            let output = || FileOutputConfig::default();

            match key {
                "diagram.metastability" => {
                    self.diagram.get_or_insert_with(diagram).metastability =
                        Some(parser::parse_float(key, value).map_err(config_err)?);
                }
                "diagram.ion-concentration" => {
                    self.diagram.get_or_insert_with(diagram).ion_concentration =
                        Some(parser::parse_float(key, value).map_err(config_err)?);
                }
                "diagram.ph-range" => {
                    self.diagram.get_or_insert_with(diagram).ph_range =
                        Some(parser::parse_range(key, value).map_err(config_err)?);
                }
                "diagram.potential-range" => {
                    self.diagram.get_or_insert_with(diagram).potential_range =
                        Some(parser::parse_range(key, value).map_err(config_err)?);
                }
                "output.directory" => {
                    self.output.get_or_insert_with(output).directory = Some(PathBuf::from(value));
                }
                "output.plot" => {
                    self.output.get_or_insert_with(output).plot =
                        Some(parser::parse_bool(key, value).map_err(config_err)?);
                }
                "output.summary" => {
                    self.output.get_or_insert_with(output).summary =
                        Some(parser::parse_bool(key, value).map_err(config_err)?);
                }
                "reference.directory" => {
                    self.reference
                        .get_or_insert_with(Default::default)
                        .directory = Some(PathBuf::from(value));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
