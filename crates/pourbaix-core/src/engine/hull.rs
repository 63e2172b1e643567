use super::config::{ConfigError, DomainLimits};
use super::entries::deduplicate;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::ids::EntryKey;
use crate::core::thermo::diagram::{PourbaixDiagram, StableRegion};
use crate::core::thermo::plane::FreeEnergyPlane;
use crate::core::thermo::pourbaix_entry::PourbaixEntry;
use crate::core::utils::geometry::{self, HalfPlane, Polygon};
use nalgebra::Vector2;
use slotmap::SlotMap;
use tracing::{debug, info, trace};

const COINCIDENCE_TOLERANCE: f64 = 1e-9;
const CLIP_TOLERANCE: f64 = 1e-9;
const MIN_REGION_AREA: f64 = 1e-9;

/// Builds the lower envelope of the entries' free-energy planes over `limits`.
///
/// Duplicates are removed first. Each remaining entry's region is the domain
/// rectangle clipped by `g_i - g_j <= 0` for every other entry `j`; planes
/// that coincide with `g_i` are skipped so tied entries share the region.
pub fn construct(
    entries: Vec<PourbaixEntry>,
    limits: DomainLimits,
    metastability: f64,
    reporter: &ProgressReporter,
) -> Result<PourbaixDiagram, EngineError> {
    if entries.is_empty() {
        return Err(EngineError::EmptyEntrySet);
    }
    if !limits.is_valid() {
        return Err(ConfigError::InvalidLimits {
            ph: limits.ph,
            potential: limits.potential,
        }
        .into());
    }

    let entries = deduplicate(entries);
    let planes: Vec<FreeEnergyPlane> = entries.iter().map(PourbaixEntry::plane).collect();

    let mut store: SlotMap<EntryKey, PourbaixEntry> = SlotMap::with_capacity_and_key(entries.len());
    let order: Vec<EntryKey> = entries.into_iter().map(|e| store.insert(e)).collect();

    reporter.report(Progress::TaskStart {
        total_steps: order.len() as u64,
    });
    let mut regions = Vec::new();
    for (i, &key) in order.iter().enumerate() {
        let polygon = stability_polygon(i, &planes, &limits);
        let area = geometry::area(&polygon);
        if area > MIN_REGION_AREA {
            trace!(entry = %store[key].name, area, vertices = polygon.len(), "Entry owns a region.");
            regions.push(StableRegion {
                key,
                vertices: polygon,
            });
        } else {
            trace!(entry = %store[key].name, "Entry has no stable region.");
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    info!(
        entries = order.len(),
        stable = regions.len(),
        "Hull construction complete."
    );
    Ok(PourbaixDiagram::from_parts(
        store,
        order,
        regions,
        limits,
        metastability,
    ))
}

fn stability_polygon(index: usize, planes: &[FreeEnergyPlane], limits: &DomainLimits) -> Polygon {
    let own = planes[index];
    let mut polygon = limits.polygon();
    for (j, other) in planes.iter().enumerate() {
        if j == index {
            continue;
        }
        if own.is_coincident(other, COINCIDENCE_TOLERANCE) {
            debug!(index, other = j, "Coincident planes share a region.");
            continue;
        }
        polygon = geometry::clip_polygon(&polygon, &dominance_half_plane(&own, other), CLIP_TOLERANCE);
        if polygon.is_empty() {
            break;
        }
    }
    polygon
}

/// The half-plane where `own` lies at or below `other`.
fn dominance_half_plane(own: &FreeEnergyPlane, other: &FreeEnergyPlane) -> HalfPlane {
    let diff = *own - *other;
    HalfPlane::new(Vector2::new(diff.ph_coeff, diff.potential_coeff), diff.constant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entry::{Entry, IonEntry, SolidEntry};
    use crate::core::thermo::pourbaix_entry::EntryKind;
    use std::sync::{Arc, Mutex};

    fn solid(formula: &str, g0: f64) -> PourbaixEntry {
        PourbaixEntry::from_entry(&Entry::Solid(SolidEntry::new(formula.parse().unwrap(), 0.0)))
            .with_g0(g0)
    }

    fn ion(formula: &str, g0: f64) -> PourbaixEntry {
        PourbaixEntry::from_entry(&Entry::Ion(IonEntry::new(formula.parse().unwrap(), 0.0)))
            .with_g0(g0)
            .with_concentration(1.0)
    }

    fn build(entries: Vec<PourbaixEntry>) -> PourbaixDiagram {
        construct(entries, DomainLimits::default(), 0.0, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn empty_entry_set_is_rejected() {
        let result = construct(Vec::new(), DomainLimits::default(), 0.0, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::EmptyEntrySet)));
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let limits = DomainLimits::new(14.0, 0.0, -2.0, 2.0);
        let result = construct(vec![solid("MoS2", -1.0)], limits, 0.0, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidLimits { .. }))
        ));
    }

    #[test]
    fn single_entry_owns_whole_domain() {
        let diagram = build(vec![solid("MoS2", -3.0)]);
        assert_eq!(diagram.stable_regions().len(), 1);
        let region = &diagram.stable_regions()[0];
        assert!((region.area() - 56.0).abs() < 1e-9);
    }

    #[test]
    fn potential_dependent_ion_splits_domain() {
        // Mo[+3]: g = -0.5 + 3φ, MoS2: g = 0 (no H, O or charge).
        let diagram = build(vec![solid("MoS2", 0.0), ion("Mo[+3]", -0.5)]);
        assert_eq!(diagram.stable_regions().len(), 2);

        let compound = diagram.find_by_name("MoS2").unwrap();
        let cation = diagram.find_by_name("Mo[+3]").unwrap();
        assert_eq!(diagram.stable_entry_at(7.0, 1.0), Some(compound));
        assert_eq!(diagram.stable_entry_at(7.0, -1.0), Some(cation));

        // Boundary at φ = 1/6.
        let expected_compound_area = 14.0 * (2.0 - 1.0 / 6.0);
        let area = diagram.region(compound).unwrap().area();
        assert!((area - expected_compound_area).abs() < 1e-9);
        let total: f64 = diagram.stable_regions().iter().map(|r| r.area()).sum();
        assert!((total - 56.0).abs() < 1e-9);
    }

    #[test]
    fn entry_above_envelope_everywhere_is_excluded() {
        let diagram = build(vec![solid("MoS2", -1.0), solid("MoSe2", 10.0)]);
        let high = diagram.find_by_name("MoSe2").unwrap();
        assert!(!diagram.is_stable(high));
        assert_eq!(diagram.len(), 2);
        assert_eq!(diagram.stable_entries().count(), 1);
    }

    #[test]
    fn coincident_planes_share_the_domain() {
        let diagram = build(vec![solid("MoS2", -1.0), solid("WS2", -1.0)]);
        assert_eq!(diagram.stable_regions().len(), 2);
        for region in diagram.stable_regions() {
            assert!((region.area() - 56.0).abs() < 1e-9);
        }
    }

    #[test]
    fn regions_are_counter_clockwise() {
        let diagram = build(vec![
            solid("MoS2", 0.0),
            ion("Mo[+3]", -0.5),
            ion("MoO4[-2]", -8.0),
        ]);
        for region in diagram.stable_regions() {
            assert!(geometry::signed_area(&region.vertices) > 0.0);
        }
    }

    #[test]
    fn duplicates_are_dropped_before_clipping() {
        let diagram = build(vec![solid("MoS2", -1.0), solid("MoS2", -1.0 + 1e-8)]);
        assert_eq!(diagram.len(), 1);
        assert_eq!(diagram.entries().next().unwrap().1.kind, EntryKind::Solid);
    }

    #[test]
    fn progress_steps_once_per_entry() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(format!("{:?}", event));
        }));
        construct(
            vec![solid("MoS2", 0.0), ion("Mo[+3]", -0.5)],
            DomainLimits::default(),
            0.0,
            &reporter,
        )
        .unwrap();
        let events = events.lock().unwrap();
        assert_eq!(events.first().unwrap(), "TaskStart { total_steps: 2 }");
        assert_eq!(events.iter().filter(|e| *e == "TaskIncrement").count(), 2);
        assert_eq!(events.last().unwrap(), "TaskFinish");
    }
}
