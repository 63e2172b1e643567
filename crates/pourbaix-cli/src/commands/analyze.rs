use crate::cli::AnalyzeArgs;
use crate::config::{AppConfig, PartialAppConfig};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use pourbaix2d::core::io::pdf::PdfPlot;
use pourbaix2d::core::io::summary::TomlSummary;
use pourbaix2d::engine::entries::StabilityTarget;
use pourbaix2d::engine::progress::{Phase, ProgressReporter};
use pourbaix2d::workflows::stability::{self, StabilityResult};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;

    info!("Merging configuration from file and CLI arguments...");
    let mut config = PartialAppConfig::for_args(&args.diagram)?
        .merge_with_cli(&args.diagram, &data_manager)?;
    apply_output_flags(&mut config, &args);

    let reference = config.reference.load()?;
    let target = StabilityTarget::parse(&args.composition, args.energy)
        .map_err(|e| CliError::Argument(format!("'{}': {}", args.composition, e)))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Analyzing {}...", target.composition);
    let result = stability::run(&target, &reference, &config.diagram, &reporter)?;
    print_result(&result);

    let written = reporter.phase(Phase::Rendering, || write_outputs(&result, &reference, &config))?;
    for path in written {
        println!("  Wrote {}", path.display());
    }
    Ok(())
}

fn apply_output_flags(config: &mut AppConfig, args: &AnalyzeArgs) {
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    if args.summary {
        config.output.summary = true;
    }
    if args.no_plot {
        config.output.plot = false;
    }
}

fn write_outputs(
    result: &StabilityResult,
    reference: &pourbaix2d::core::reference::data::ReferenceData,
    config: &AppConfig,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if config.output.plot {
        written.push(stability::write_artifact::<PdfPlot>(
            result,
            reference,
            &config.output.directory,
        )?);
    }
    if config.output.summary {
        written.push(stability::write_artifact::<TomlSummary>(
            result,
            reference,
            &config.output.directory,
        )?);
    }
    Ok(written)
}

fn print_result(result: &StabilityResult) {
    let metastability = result.diagram.metastability();
    if metastability != 0.0 {
        println!("  Metastability tolerance: {} meV/atom", metastability);
    }
    println!(
        "  Stable regions: {} of {} entries",
        result.diagram.stable_regions().len(),
        result.diagram.len()
    );
    if result.is_stable() {
        let (ph, potential) = result.most_stable_at();
        println!(
            "✓ {} is stable (e.g., at pH {:.2}, E = {:.2} V).",
            result.reduced_formula, ph, potential
        );
    } else {
        let (ph, potential) = result.most_stable_at();
        println!(
            "✗ {} lies {:.4} eV/f.u. above the hull (closest at pH {:.2}, E = {:.2} V).",
            result.reduced_formula,
            result.instability(),
            ph,
            potential
        );
    }
}
