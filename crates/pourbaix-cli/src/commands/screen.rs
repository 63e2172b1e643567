use crate::cli::ScreenArgs;
use crate::config::PartialAppConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::utils::progress::bar_style;
use indicatif::{ProgressBar, ProgressDrawTarget};
use pourbaix2d::core::io::pdf::PdfPlot;
use pourbaix2d::core::reference::data::ReferenceData;
use pourbaix2d::engine::config::{DiagramConfig, DiagramConfigBuilder};
use pourbaix2d::engine::entries::StabilityTarget;
use pourbaix2d::engine::error::EngineError;
use pourbaix2d::engine::progress::ProgressReporter;
use pourbaix2d::workflows::stability;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub composition: String,
    pub energy: f64,
    #[serde(default)]
    pub metastability: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreenRecord {
    pub composition: String,
    pub reduced_formula: Option<String>,
    pub energy: f64,
    pub metastability: f64,
    pub instability: Option<f64>,
    pub stable: Option<bool>,
    pub ph: Option<f64>,
    pub potential: Option<f64>,
    pub plot: Option<String>,
    pub error: Option<String>,
}

pub fn run(args: ScreenArgs) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;
    let mut config = PartialAppConfig::for_args(&args.diagram)?
        .merge_with_cli(&args.diagram, &data_manager)?;
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    let reference = config.reference.load()?;

    let candidates = read_candidates(&args.input)?;
    println!(
        "Screening {} candidate(s) from {}...",
        candidates.len(),
        args.input.display()
    );

    let pb = ProgressBar::new(candidates.len() as u64).with_style(bar_style());
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_message("Screening");

    let plot_dir = args.plots.then_some(config.output.directory.as_path());
    let records = screen_candidates(&candidates, &reference, &config.diagram, plot_dir, || {
        pb.inc(1)
    });
    pb.finish_with_message("✓ Done");

    write_records(&args.output, &records)?;

    let failed = records.iter().filter(|r| r.error.is_some()).count();
    let stable = records.iter().filter(|r| r.stable == Some(true)).count();
    println!(
        "{} stable, {} unstable, {} failed. Results written to {}",
        stable,
        records.len() - stable - failed,
        failed,
        args.output.display()
    );
    Ok(())
}

pub fn read_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let parse_err = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(parse_err)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<Candidate>, _>>()
        .map_err(parse_err)
}

pub fn write_records(path: &Path, records: &[ScreenRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Evaluates every candidate in parallel; output order follows input order.
///
/// Each diagram is built single-threaded and shares `reference` read-only.
pub fn screen_candidates<F>(
    candidates: &[Candidate],
    reference: &ReferenceData,
    base: &DiagramConfig,
    plot_dir: Option<&Path>,
    on_done: F,
) -> Vec<ScreenRecord>
where
    F: Fn() + Sync,
{
    candidates
        .par_iter()
        .map(|candidate| {
            let record = evaluate(candidate, reference, base, plot_dir);
            on_done();
            record
        })
        .collect()
}

fn evaluate(
    candidate: &Candidate,
    reference: &ReferenceData,
    base: &DiagramConfig,
    plot_dir: Option<&Path>,
) -> ScreenRecord {
    let metastability = candidate
        .metastability
        .unwrap_or(base.metastability_mev_per_atom);
    let mut record = ScreenRecord {
        composition: candidate.composition.clone(),
        reduced_formula: None,
        energy: candidate.energy,
        metastability,
        instability: None,
        stable: None,
        ph: None,
        potential: None,
        plot: None,
        error: None,
    };

    match analyze(candidate, reference, base, metastability, plot_dir) {
        Ok((result, plot)) => {
            let (ph, potential) = result.most_stable_at();
            record.reduced_formula = Some(result.reduced_formula.clone());
            record.instability = Some(result.instability());
            record.stable = Some(result.is_stable());
            record.ph = Some(ph);
            record.potential = Some(potential);
            record.plot = plot.map(|p| p.display().to_string());
        }
        Err(e) => {
            warn!(composition = %candidate.composition, "Candidate failed: {}", e);
            record.error = Some(e.to_string());
        }
    }
    record
}

fn analyze(
    candidate: &Candidate,
    reference: &ReferenceData,
    base: &DiagramConfig,
    metastability: f64,
    plot_dir: Option<&Path>,
) -> std::result::Result<(stability::StabilityResult, Option<PathBuf>), EngineError> {
    let config = DiagramConfigBuilder::new()
        .metastability(metastability)
        .ion_concentration(base.ion_concentration)
        .limits(base.limits)
        .build()?;
    let target = StabilityTarget::parse(&candidate.composition, candidate.energy)?;
    let result = stability::run(&target, reference, &config, &ProgressReporter::new())?;
    let plot = match plot_dir {
        Some(dir) => Some(stability::write_artifact::<PdfPlot>(&result, reference, dir)?),
        None => None,
    };
    Ok((result, plot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                composition: "MoS2".to_string(),
                energy: -22.5,
                metastability: None,
            },
            Candidate {
                composition: "WS2".to_string(),
                energy: -1000.0,
                metastability: Some(50.0),
            },
            Candidate {
                composition: "Xx2".to_string(),
                energy: -5.0,
                metastability: None,
            },
        ]
    }

    #[test]
    fn read_candidates_accepts_optional_metastability_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(
            &path,
            "composition,energy,metastability\nMoS2,-22.5,\nWSe2, -18.0 ,25\n",
        )
        .unwrap();
        let parsed = read_candidates(&path).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].metastability, None);
        assert_eq!(parsed[1].energy, -18.0);
        assert_eq!(parsed[1].metastability, Some(25.0));
    }

    #[test]
    fn read_candidates_reports_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "composition,energy\nMoS2,not-a-number\n").unwrap();
        let result = read_candidates(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn screening_keeps_order_and_isolates_failures() {
        let reference = ReferenceData::bundled().unwrap();
        let counter = AtomicUsize::new(0);
        let records = screen_candidates(
            &candidates(),
            &reference,
            &DiagramConfig::default(),
            None,
            || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].composition, "MoS2");
        assert!(records[0].instability.unwrap() >= 0.0);
        assert_eq!(records[1].metastability, 50.0);
        assert_eq!(records[1].stable, Some(true));
        assert!(records[2].error.is_some());
        assert!(records[2].instability.is_none());
    }

    #[test]
    fn non_finite_energy_row_fails_with_a_clear_message() {
        let reference = ReferenceData::bundled().unwrap();
        let nan_row = Candidate {
            composition: "MoS2".to_string(),
            energy: f64::NAN,
            metastability: None,
        };
        let records = screen_candidates(
            &[nan_row],
            &reference,
            &DiagramConfig::default(),
            None,
            || {},
        );
        let error = records[0].error.as_deref().unwrap();
        assert!(error.contains("finite"), "unexpected error: {error}");
        assert!(records[0].instability.is_none());
    }

    #[test]
    fn screening_writes_plots_and_csv() {
        let reference = ReferenceData::bundled().unwrap();
        let dir = tempdir().unwrap();
        let records = screen_candidates(
            &candidates()[..2],
            &reference,
            &DiagramConfig::default(),
            Some(dir.path()),
            || {},
        );
        assert!(dir.path().join("MoS2.pdf").is_file());
        assert!(dir.path().join("WS2_50meV.pdf").is_file());

        let out = dir.path().join("out.csv");
        write_records(&out, &records).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "composition,reduced_formula,energy,metastability,instability,stable,ph,potential,plot,error"
        );
        assert!(lines.next().unwrap().starts_with("MoS2,MoS2,-22.5,0.0,"));
    }
}
