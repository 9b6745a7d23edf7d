//! In-memory ledger of damage entries recorded during one return inspection.
//! Entries only reach the database as part of the commit payload; anything
//! removed before commit simply disappears.

use crate::model::{DamageSeverity, VehicleView};

/// Where the inspector clicked on the vehicle diagram. Manual entries carry
/// no location at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamagePoint {
    pub view: Option<VehicleView>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub severity: DamageSeverity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageEntry {
    pub id: u32,
    pub view: Option<VehicleView>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub severity: DamageSeverity,
    pub description: String,
    pub estimated_cost: f64,
    pub photo_paths: Vec<String>,
}

/// Partial edit merged into an existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamagePatch {
    pub severity: Option<DamageSeverity>,
    pub description: Option<String>,
    pub estimated_cost: Option<f64>,
    pub photo_paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageLedger {
    next_id: u32,
    entries: Vec<DamageEntry>,
}

impl DamageLedger {
    /// Ids are unique for the lifetime of the ledger, including across
    /// removals.
    pub fn add(&mut self, point: DamagePoint) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(DamageEntry {
            id,
            view: point.view,
            x: point.x.map(|v| v.clamp(0, 100)),
            y: point.y.map(|v| v.clamp(0, 100)),
            severity: point.severity,
            description: String::new(),
            estimated_cost: 0.0,
            photo_paths: Vec::new(),
        });
        id
    }

    /// Returns false when no entry matches `id`.
    pub fn update(&mut self, id: u32, patch: DamagePatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if let Some(severity) = patch.severity {
            entry.severity = severity;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(cost) = patch.estimated_cost {
            entry.estimated_cost = cost.max(0.0);
        }
        if let Some(paths) = patch.photo_paths {
            entry.photo_paths = paths;
        }
        true
    }

    /// Idempotent; removing an absent id is a no-op.
    pub fn remove(&mut self, id: u32) {
        self.entries.retain(|e| e.id != id);
    }

    /// Photo references beyond the four persisted slots, summed over all
    /// entries. The commit reports these instead of dropping them silently.
    pub fn excess_photo_references(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.photo_paths.len().saturating_sub(4))
            .sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(|e| e.estimated_cost).sum()
    }

    pub fn entries(&self) -> &[DamageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> DamagePoint {
        DamagePoint {
            view: Some(VehicleView::Front),
            x: Some(40),
            y: Some(60),
            severity: DamageSeverity::Minor,
        }
    }

    #[test]
    fn add_then_remove_round_trips() {
        let mut ledger = DamageLedger::default();
        ledger.add(point());
        let before = ledger.clone();
        let id = ledger.add(point());
        ledger.remove(id);
        assert_eq!(ledger.entries(), before.entries());
        assert_eq!(ledger.total_cost(), before.total_cost());
    }

    #[test]
    fn ids_stay_unique_across_removals() {
        let mut ledger = DamageLedger::default();
        let first = ledger.add(point());
        ledger.remove(first);
        let second = ledger.add(point());
        assert_ne!(first, second);
    }

    #[test]
    fn remove_absent_id_is_a_no_op() {
        let mut ledger = DamageLedger::default();
        ledger.add(point());
        ledger.remove(999);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut ledger = DamageLedger::default();
        let id = ledger.add(point());
        let updated = ledger.update(
            id,
            DamagePatch {
                description: Some(String::from("scratched bumper")),
                estimated_cost: Some(120.0),
                ..Default::default()
            },
        );
        assert!(updated);
        let entry = &ledger.entries()[0];
        assert_eq!(entry.description, "scratched bumper");
        assert_eq!(entry.estimated_cost, 120.0);
        assert_eq!(entry.severity, DamageSeverity::Minor);
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let mut ledger = DamageLedger::default();
        assert!(!ledger.update(7, DamagePatch::default()));
    }

    #[test]
    fn negative_cost_floors_at_zero() {
        let mut ledger = DamageLedger::default();
        let id = ledger.add(point());
        ledger.update(
            id,
            DamagePatch {
                estimated_cost: Some(-50.0),
                ..Default::default()
            },
        );
        assert_eq!(ledger.total_cost(), 0.0);
    }

    #[test]
    fn diagram_coordinates_clamp_to_percentage_scale() {
        let mut ledger = DamageLedger::default();
        ledger.add(DamagePoint {
            view: Some(VehicleView::Left),
            x: Some(140),
            y: Some(-5),
            severity: DamageSeverity::Major,
        });
        let entry = &ledger.entries()[0];
        assert_eq!(entry.x, Some(100));
        assert_eq!(entry.y, Some(0));
    }

    #[test]
    fn photo_references_past_four_slots_are_counted() {
        let mut ledger = DamageLedger::default();
        let id = ledger.add(point());
        ledger.update(
            id,
            DamagePatch {
                photo_paths: Some((0..6).map(|i| format!("p{}.jpg", i)).collect()),
                ..Default::default()
            },
        );
        assert_eq!(ledger.excess_photo_references(), 2);

        ledger.update(
            id,
            DamagePatch {
                photo_paths: Some(vec![String::from("p0.jpg")]),
                ..Default::default()
            },
        );
        assert_eq!(ledger.excess_photo_references(), 0);
    }

    #[test]
    fn total_cost_sums_all_entries() {
        let mut ledger = DamageLedger::default();
        let a = ledger.add(point());
        let b = ledger.add(point());
        ledger.update(
            a,
            DamagePatch {
                estimated_cost: Some(30.0),
                ..Default::default()
            },
        );
        ledger.update(
            b,
            DamagePatch {
                estimated_cost: Some(20.0),
                ..Default::default()
            },
        );
        assert_eq!(ledger.total_cost(), 50.0);
    }
}
