//! Deposit settlement arithmetic. Stateless; the workflow recomputes these
//! figures after every action so the displayed total can never go stale.

use serde::{Deserialize, Serialize};

/// A derivable charge is either computed from the return inputs or pinned to
/// a hand-entered amount. A pinned field is never recomputed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum ChargeField {
    Auto,
    Manual(f64),
}

impl ChargeField {
    pub fn resolve(&self, computed: f64) -> f64 {
        match *self {
            ChargeField::Auto => computed.max(0.0),
            ChargeField::Manual(amount) => amount.max(0.0),
        }
    }
}

impl Default for ChargeField {
    fn default() -> Self {
        ChargeField::Auto
    }
}

/// Resolved per-category amounts, all non-negative. `other` carries the
/// excess-mileage charge.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct AdditionalCharges {
    pub late_fee: f64,
    pub fuel_charge: f64,
    pub damage_fee: f64,
    pub cleaning_fee: f64,
    pub other: f64,
}

pub fn total_additional_charges(charges: &AdditionalCharges) -> f64 {
    charges.late_fee
        + charges.fuel_charge
        + charges.damage_fee
        + charges.cleaning_fee
        + charges.other
}

pub fn total_deductions(charges: &AdditionalCharges, damage_total: f64) -> f64 {
    total_additional_charges(charges) + damage_total.max(0.0)
}

/// Net outcome of offsetting the deposit against all deductions. The variant
/// drives the refund/amount-due framing; the payload is the magnitude shown.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum Settlement {
    Refund(f64),
    Due(f64),
}

impl Settlement {
    pub fn amount(&self) -> f64 {
        match *self {
            Settlement::Refund(amount) | Settlement::Due(amount) => amount,
        }
    }

    /// Positive = refund owed to the customer, negative = amount they owe.
    pub fn signed(&self) -> f64 {
        match *self {
            Settlement::Refund(amount) => amount,
            Settlement::Due(amount) => -amount,
        }
    }
}

pub fn settle(deposit: f64, deductions: f64) -> Settlement {
    let net = deposit - deductions;
    if net >= 0.0 {
        Settlement::Refund(net)
    } else {
        Settlement::Due(-net)
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deductions_are_charges_plus_damages() {
        let charges = AdditionalCharges {
            late_fee: 100.0,
            fuel_charge: 25.0,
            damage_fee: 10.0,
            cleaning_fee: 15.0,
            other: 5.0,
        };
        assert_eq!(total_additional_charges(&charges), 155.0);
        assert_eq!(total_deductions(&charges, 45.0), 200.0);
    }

    #[test]
    fn deposit_covering_deductions_frames_as_refund() {
        // deposit 300, damages 50, late fee 100 -> refund of 150
        let charges = AdditionalCharges {
            late_fee: 100.0,
            ..Default::default()
        };
        let deductions = total_deductions(&charges, 50.0);
        assert_eq!(deductions, 150.0);
        assert_eq!(settle(300.0, deductions), Settlement::Refund(150.0));
    }

    #[test]
    fn deductions_over_deposit_frame_as_due() {
        let outcome = settle(200.0, 350.0);
        assert_eq!(outcome, Settlement::Due(150.0));
        assert_eq!(outcome.signed(), -150.0);
        assert_eq!(outcome.amount(), 150.0);
    }

    #[test]
    fn exact_coverage_is_a_zero_refund() {
        assert_eq!(settle(100.0, 100.0), Settlement::Refund(0.0));
    }

    #[test]
    fn manual_field_wins_over_computed() {
        assert_eq!(ChargeField::Auto.resolve(42.0), 42.0);
        assert_eq!(ChargeField::Manual(10.0).resolve(42.0), 10.0);
        // hand-entered negatives floor at zero
        assert_eq!(ChargeField::Manual(-3.0).resolve(42.0), 0.0);
    }
}
