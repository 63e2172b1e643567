use super::pourbaix_entry::PourbaixEntry;
use crate::core::models::ids::EntryKey;
use crate::core::utils::geometry::{self, Polygon};
use nalgebra::Point2;
use serde::Serialize;
use slotmap::SlotMap;

/// The rectangular (pH, φ) window a diagram is built over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainLimits {
    pub ph: (f64, f64),
    pub potential: (f64, f64),
}

impl Default for DomainLimits {
    fn default() -> Self {
        Self {
            ph: (0.0, 14.0),
            potential: (-2.0, 2.0),
        }
    }
}

impl DomainLimits {
    pub fn new(ph_min: f64, ph_max: f64, potential_min: f64, potential_max: f64) -> Self {
        Self {
            ph: (ph_min, ph_max),
            potential: (potential_min, potential_max),
        }
    }

    pub fn is_valid(&self) -> bool {
        let finite = [self.ph.0, self.ph.1, self.potential.0, self.potential.1]
            .iter()
            .all(|v| v.is_finite());
        finite && self.ph.0 < self.ph.1 && self.potential.0 < self.potential.1
    }

    pub fn contains(&self, ph: f64, potential: f64) -> bool {
        (self.ph.0..=self.ph.1).contains(&ph)
            && (self.potential.0..=self.potential.1).contains(&potential)
    }

    pub fn polygon(&self) -> Polygon {
        geometry::rectangle(self.ph.0, self.ph.1, self.potential.0, self.potential.1)
    }

    pub fn area(&self) -> f64 {
        (self.ph.1 - self.ph.0) * (self.potential.1 - self.potential.0)
    }
}

/// The part of the domain where one entry's free energy is the minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct StableRegion {
    pub key: EntryKey,
    /// Counter-clockwise vertices; x is pH, y is potential.
    pub vertices: Polygon,
}

impl StableRegion {
    pub fn area(&self) -> f64 {
        geometry::area(&self.vertices)
    }

    pub fn centroid(&self) -> Option<Point2<f64>> {
        geometry::centroid(&self.vertices)
    }
}

/// An immutable Pourbaix diagram: every entry that took part in the hull
/// construction plus the stability regions of those that survived.
#[derive(Debug, Clone)]
pub struct PourbaixDiagram {
    entries: SlotMap<EntryKey, PourbaixEntry>,
    order: Vec<EntryKey>,
    regions: Vec<StableRegion>,
    limits: DomainLimits,
    metastability: f64,
}

impl PourbaixDiagram {
    pub(crate) fn from_parts(
        entries: SlotMap<EntryKey, PourbaixEntry>,
        order: Vec<EntryKey>,
        regions: Vec<StableRegion>,
        limits: DomainLimits,
        metastability: f64,
    ) -> Self {
        Self {
            entries,
            order,
            regions,
            limits,
            metastability,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All entries in construction order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryKey, &PourbaixEntry)> {
        self.order.iter().map(|&k| (k, &self.entries[k]))
    }

    pub fn entry(&self, key: EntryKey) -> Option<&PourbaixEntry> {
        self.entries.get(key)
    }

    pub fn find_by_name(&self, name: &str) -> Option<EntryKey> {
        self.entries().find(|(_, e)| e.name == name).map(|(k, _)| k)
    }

    pub fn stable_regions(&self) -> &[StableRegion] {
        &self.regions
    }

    pub fn stable_entries(&self) -> impl Iterator<Item = (EntryKey, &PourbaixEntry)> {
        self.regions.iter().map(|r| (r.key, &self.entries[r.key]))
    }

    pub fn region(&self, key: EntryKey) -> Option<&StableRegion> {
        self.regions.iter().find(|r| r.key == key)
    }

    pub fn is_stable(&self, key: EntryKey) -> bool {
        self.region(key).is_some()
    }

    pub fn limits(&self) -> DomainLimits {
        self.limits
    }

    /// Metastability tolerance (meV/atom) the compound entry was built with.
    pub fn metastability(&self) -> f64 {
        self.metastability
    }

    /// The lowest free energy at a point and the entry that attains it.
    pub fn envelope_at(&self, ph: f64, potential: f64) -> Option<(EntryKey, f64)> {
        self.entries()
            .map(|(k, e)| (k, e.free_energy(ph, potential)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn stable_entry_at(&self, ph: f64, potential: f64) -> Option<EntryKey> {
        if !self.limits.contains(ph, potential) {
            return None;
        }
        self.envelope_at(ph, potential).map(|(k, _)| k)
    }

    /// Height of an entry's free energy above the envelope at one point.
    pub fn decomposition_energy(&self, key: EntryKey, ph: f64, potential: f64) -> Option<f64> {
        let entry = self.entries.get(key)?;
        let (_, minimum) = self.envelope_at(ph, potential)?;
        Some(entry.free_energy(ph, potential) - minimum)
    }
}
