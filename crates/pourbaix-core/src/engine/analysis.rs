use super::error::EngineError;
use crate::core::models::ids::EntryKey;
use crate::core::thermo::diagram::PourbaixDiagram;
use tracing::debug;

const ZERO_TOLERANCE: f64 = 1e-9;

/// The smallest gap between an entry's plane and the lower envelope, and
/// the (pH, φ) point where it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullDistance {
    pub energy: f64,
    pub ph: f64,
    pub potential: f64,
}

impl HullDistance {
    pub fn is_stable(&self) -> bool {
        self.energy == 0.0
    }
}

/// Energy above hull of `key`, in eV per reduced formula unit.
///
/// The gap `g_key - min_j g_j` is convex and piecewise linear with its
/// pieces on the stable regions, so scanning every region vertex finds the
/// exact minimum over the domain.
pub fn energy_above_hull(
    diagram: &PourbaixDiagram,
    key: EntryKey,
) -> Result<HullDistance, EngineError> {
    let entry = diagram
        .entry(key)
        .ok_or_else(|| EngineError::EntryNotFound(format!("{:?}", key)))?;

    let mut best: Option<HullDistance> = None;
    for region in diagram.stable_regions() {
        for vertex in &region.vertices {
            let Some((_, envelope)) = diagram.envelope_at(vertex.x, vertex.y) else {
                continue;
            };
            let gap = entry.free_energy(vertex.x, vertex.y) - envelope;
            if best.is_none_or(|b| gap < b.energy) {
                best = Some(HullDistance {
                    energy: gap,
                    ph: vertex.x,
                    potential: vertex.y,
                });
            }
        }
    }

    let mut distance = best.ok_or_else(|| {
        EngineError::Internal("diagram has no stable region vertices".to_string())
    })?;
    if distance.energy < ZERO_TOLERANCE {
        distance.energy = 0.0;
    }
    debug!(
        entry = %entry.name,
        energy = distance.energy,
        ph = distance.ph,
        potential = distance.potential,
        "Energy above hull evaluated."
    );
    Ok(distance)
}
