use super::traits::{DiagramArtifact, DiagramFile, DiagramIoError};
use crate::core::thermo::diagram::DomainLimits;
use serde::Serialize;
use std::io::Write;

/// Machine-readable TOML record of a diagram and its stability verdict.
pub struct TomlSummary;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct SummaryDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    compound: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instability: Option<f64>,
    metastability_mev_per_atom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ion_concentration: Option<f64>,
    entry_count: usize,
    limits: DomainLimits,
    regions: Vec<RegionRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct RegionRecord<'a> {
    name: &'a str,
    kind: &'static str,
    area: f64,
    vertices: Vec<[f64; 2]>,
}

impl DiagramFile for TomlSummary {
    type Error = DiagramIoError;
    const EXTENSION: &'static str = "toml";

    fn write_to(artifact: &DiagramArtifact, writer: &mut impl Write) -> Result<(), Self::Error> {
        let diagram = artifact.diagram;
        let regions = diagram
            .stable_regions()
            .iter()
            .filter_map(|region| {
                let entry = diagram.entry(region.key)?;
                Some(RegionRecord {
                    name: &entry.name,
                    kind: if entry.is_ion() { "ion" } else { "solid" },
                    area: region.area(),
                    vertices: region.vertices.iter().map(|p| [p.x, p.y]).collect(),
                })
            })
            .collect();

        let document = SummaryDocument {
            compound: artifact
                .highlight
                .and_then(|key| diagram.entry(key))
                .map(|e| e.name.as_str()),
            instability: artifact.instability,
            metastability_mev_per_atom: diagram.metastability(),
            ion_concentration: diagram
                .entries()
                .find(|(_, e)| e.is_ion())
                .map(|(_, e)| e.concentration),
            entry_count: diagram.len(),
            limits: diagram.limits(),
            regions,
        };

        writer.write_all(toml::to_string(&document)?.as_bytes())?;
        Ok(())
    }
}
