use crate::core::io::artifact_stem;
use crate::core::io::pdf::PdfPlot;
use crate::core::io::traits::{DiagramArtifact, DiagramFile, DiagramIoError};
use crate::core::models::ids::EntryKey;
use crate::core::reference::data::ReferenceData;
use crate::core::thermo::diagram::PourbaixDiagram;
use crate::engine::analysis::{self, HullDistance};
use crate::engine::config::DiagramConfig;
use crate::engine::entries::{self, StabilityTarget};
use crate::engine::error::EngineError;
use crate::engine::hull;
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// The diagram built for one compound and the compound's distance above it.
#[derive(Debug, Clone)]
pub struct StabilityResult {
    pub diagram: PourbaixDiagram,
    /// The compound's key in `diagram`.
    pub compound: EntryKey,
    pub distance: HullDistance,
    pub reduced_formula: String,
}

impl StabilityResult {
    /// Energy above hull in eV per formula unit; zero when stable somewhere.
    pub fn instability(&self) -> f64 {
        self.distance.energy
    }

    pub fn is_stable(&self) -> bool {
        self.distance.is_stable()
    }

    /// The (pH, φ) point where the compound comes closest to the envelope.
    pub fn most_stable_at(&self) -> (f64, f64) {
        (self.distance.ph, self.distance.potential)
    }

    pub fn artifact_stem(&self) -> String {
        artifact_stem(&self.reduced_formula, self.diagram.metastability())
    }

    pub fn artifact<'a>(&'a self, reference: &'a ReferenceData) -> DiagramArtifact<'a> {
        DiagramArtifact::new(&self.diagram, &reference.ion_colors)
            .with_highlight(self.compound)
            .with_instability(self.instability())
    }
}

#[instrument(skip_all, name = "stability_workflow", fields(compound = %target.composition))]
pub fn run(
    target: &StabilityTarget,
    reference: &ReferenceData,
    config: &DiagramConfig,
    reporter: &ProgressReporter,
) -> Result<StabilityResult, EngineError> {
    info!(
        energy = target.energy,
        metastability = config.metastability_mev_per_atom,
        concentration = config.ion_concentration,
        "Starting stability analysis."
    );

    let entry_set = reporter.phase(Phase::EntryConstruction, || {
        entries::build_entries(target, reference, config)
    })?;
    reporter.report(Progress::Message(format!(
        "{} ion entries in the {} system",
        entry_set.ions.len(),
        target.chemical_system().join("-")
    )));
    let compound_name = entry_set.compound.name.clone();
    let reduced_formula = entry_set.compound.reduced_formula();

    let diagram = reporter.phase(Phase::HullConstruction, || {
        hull::construct(
            entry_set.into_vec(),
            config.limits,
            config.metastability_mev_per_atom,
            reporter,
        )
    })?;

    // The compound is inserted first, so it survives deduplication.
    let compound = diagram
        .entries()
        .next()
        .filter(|(_, e)| e.name == compound_name)
        .map(|(k, _)| k)
        .ok_or_else(|| EngineError::EntryNotFound(compound_name.clone()))?;

    let distance = reporter.phase(Phase::HullAnalysis, || {
        analysis::energy_above_hull(&diagram, compound)
    })?;

    info!(
        instability = distance.energy,
        stable_regions = diagram.stable_regions().len(),
        "Stability analysis complete."
    );
    Ok(StabilityResult {
        diagram,
        compound,
        distance,
        reduced_formula,
    })
}

/// Writes one artifact of the result as `<output_dir>/<stem>.<ext>`.
pub fn write_artifact<F>(
    result: &StabilityResult,
    reference: &ReferenceData,
    output_dir: &Path,
) -> Result<PathBuf, EngineError>
where
    F: DiagramFile<Error = DiagramIoError>,
{
    std::fs::create_dir_all(output_dir).map_err(DiagramIoError::from)?;
    let path = output_dir.join(format!("{}.{}", result.artifact_stem(), F::EXTENSION));
    F::write_to_path(&result.artifact(reference), &path)?;
    info!(path = %path.display(), "Wrote diagram artifact.");
    Ok(path)
}

/// Runs the analysis and writes the compound's PDF plot.
pub fn run_and_plot(
    target: &StabilityTarget,
    reference: &ReferenceData,
    config: &DiagramConfig,
    reporter: &ProgressReporter,
    output_dir: &Path,
) -> Result<(StabilityResult, PathBuf), EngineError> {
    let result = run(target, reference, config, reporter)?;
    let path = reporter.phase(Phase::Rendering, || {
        write_artifact::<PdfPlot>(&result, reference, output_dir)
    })?;
    Ok((result, path))
}
