//! Vehicle-return wizard: an immutable state struct stepped through
//! `EnteringBasics -> InspectingVehicle -> ConfirmingSettlement -> Committed`
//! by a pure reducer. The HTTP handler replays client input through the
//! reducer and only reaches the database after the commit guard passes.

use chrono::{DateTime, Utc};

use crate::methods::charges;
use crate::methods::damage::{DamageLedger, DamagePatch, DamagePoint};
use crate::methods::settlement::{self, AdditionalCharges, ChargeField, Settlement};
use crate::model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EnteringBasics,
    InspectingVehicle,
    ConfirmingSettlement,
    Committed,
}

/// Contract fields the workflow needs, read once when the return opens.
/// The contract row itself stays owned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractSnapshot {
    pub contract_id: i32,
    pub start_time: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub daily_rate: f64,
    pub deposit: f64,
    pub allowed_km_per_day: i32,
    pub per_km_rate: f64,
    pub pickup_odometer: i32,
    pub pickup_fuel_level: i32,
}

impl From<&model::Contract> for ContractSnapshot {
    fn from(contract: &model::Contract) -> Self {
        ContractSnapshot {
            contract_id: contract.id,
            start_time: contract.start_time,
            scheduled_end: contract.end_time,
            daily_rate: contract.daily_rate,
            deposit: contract.deposit,
            allowed_km_per_day: contract.allowed_km_per_day,
            per_km_rate: contract.per_km_rate,
            pickup_odometer: contract.pickup_odometer,
            pickup_fuel_level: contract.pickup_fuel_level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Exterior,
    Interior,
    Tires,
    Lights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnFlowState {
    pub step: Step,
    pub contract: Option<ContractSnapshot>,
    pub return_time: Option<DateTime<Utc>>,
    pub odometer: Option<i32>,
    pub fuel_level: Option<i32>,
    pub inspector_name: String,
    pub exterior_condition: Option<model::ConditionGrade>,
    pub interior_condition: Option<model::ConditionGrade>,
    pub tires_condition: Option<model::ConditionGrade>,
    pub lights_condition: Option<model::ConditionGrade>,
    pub damages: DamageLedger,
    pub late_fee: ChargeField,
    pub fuel_charge: ChargeField,
    pub mileage_charge: ChargeField,
    pub damage_fee: f64,
    pub cleaning_fee: f64,
    pub customer_acknowledged: bool,
    pub notes: String,
}

impl Default for ReturnFlowState {
    fn default() -> Self {
        ReturnFlowState {
            step: Step::EnteringBasics,
            contract: None,
            return_time: None,
            odometer: None,
            fuel_level: None,
            inspector_name: String::new(),
            exterior_condition: None,
            interior_condition: None,
            tires_condition: None,
            lights_condition: None,
            damages: DamageLedger::default(),
            late_fee: ChargeField::Auto,
            fuel_charge: ChargeField::Auto,
            mileage_charge: ChargeField::Auto,
            damage_fee: 0.0,
            cleaning_fee: 0.0,
            customer_acknowledged: false,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectContract(ContractSnapshot),
    SetReturnTime(DateTime<Utc>),
    SetOdometer(Option<i32>),
    SetFuelLevel(Option<i32>),
    SetInspectorName(String),
    SetCondition(Part, Option<model::ConditionGrade>),
    AddDamage(DamagePoint),
    UpdateDamage { id: u32, patch: DamagePatch },
    RemoveDamage(u32),
    SetLateFee(ChargeField),
    SetFuelCharge(ChargeField),
    SetMileageCharge(ChargeField),
    SetDamageFee(f64),
    SetCleaningFee(f64),
    SetAcknowledged(bool),
    SetNotes(String),
    Next,
    Back,
}

/// Pure transition function. Invalid moves (advancing past a failed guard,
/// editing after commit) return the state unchanged.
pub fn reduce(mut state: ReturnFlowState, action: Action) -> ReturnFlowState {
    if state.step == Step::Committed {
        return state;
    }
    match action {
        Action::SelectContract(snapshot) => state.contract = Some(snapshot),
        Action::SetReturnTime(time) => state.return_time = Some(time),
        Action::SetOdometer(odometer) => state.odometer = odometer,
        Action::SetFuelLevel(level) => state.fuel_level = level.map(|v| v.clamp(0, 100)),
        Action::SetInspectorName(name) => state.inspector_name = name,
        Action::SetCondition(part, grade) => match part {
            Part::Exterior => state.exterior_condition = grade,
            Part::Interior => state.interior_condition = grade,
            Part::Tires => state.tires_condition = grade,
            Part::Lights => state.lights_condition = grade,
        },
        Action::AddDamage(point) => {
            state.damages.add(point);
        }
        Action::UpdateDamage { id, patch } => {
            state.damages.update(id, patch);
        }
        Action::RemoveDamage(id) => state.damages.remove(id),
        Action::SetLateFee(field) => state.late_fee = field,
        Action::SetFuelCharge(field) => state.fuel_charge = field,
        Action::SetMileageCharge(field) => state.mileage_charge = field,
        Action::SetDamageFee(amount) => state.damage_fee = amount.max(0.0),
        Action::SetCleaningFee(amount) => state.cleaning_fee = amount.max(0.0),
        Action::SetAcknowledged(acknowledged) => state.customer_acknowledged = acknowledged,
        Action::SetNotes(notes) => state.notes = notes,
        Action::Next => match state.step {
            Step::EnteringBasics if basics_complete(&state) => {
                state.step = Step::InspectingVehicle
            }
            // inspection has no blocking validation
            Step::InspectingVehicle => state.step = Step::ConfirmingSettlement,
            // leaving ConfirmingSettlement goes through commit, not Next
            _ => {}
        },
        Action::Back => match state.step {
            Step::InspectingVehicle => state.step = Step::EnteringBasics,
            Step::ConfirmingSettlement => state.step = Step::InspectingVehicle,
            _ => {}
        },
    }
    state
}

fn basics_complete(state: &ReturnFlowState) -> bool {
    state.contract.is_some() && state.return_time.is_some()
}

/// Odometer and fuel gauge default to the pickup readings when the clerk
/// leaves them blank.
pub fn effective_odometer(state: &ReturnFlowState, snapshot: &ContractSnapshot) -> i32 {
    state.odometer.unwrap_or(snapshot.pickup_odometer)
}

pub fn effective_fuel_level(state: &ReturnFlowState, snapshot: &ContractSnapshot) -> i32 {
    state.fuel_level.unwrap_or(snapshot.pickup_fuel_level)
}

/// Everything the confirmation screen shows, derived from scratch on every
/// call so it cannot drift from the form state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementView {
    pub charges: AdditionalCharges,
    pub damage_total: f64,
    pub total_deductions: f64,
    pub settlement: Settlement,
}

pub fn settlement_view(state: &ReturnFlowState) -> Option<SettlementView> {
    let snapshot = state.contract.as_ref()?;
    let return_time = state.return_time?;

    let computed_late = charges::late_fee(snapshot.scheduled_end, return_time, snapshot.daily_rate);
    let computed_fuel = charges::fuel_charge(
        snapshot.pickup_fuel_level,
        effective_fuel_level(state, snapshot),
    );
    let duration = charges::contract_duration_days(snapshot.start_time, snapshot.scheduled_end);
    let computed_mileage = charges::mileage_charge(
        snapshot.pickup_odometer,
        effective_odometer(state, snapshot),
        snapshot.allowed_km_per_day,
        duration,
        snapshot.per_km_rate,
    );

    let charges = AdditionalCharges {
        late_fee: state.late_fee.resolve(computed_late),
        fuel_charge: state.fuel_charge.resolve(computed_fuel),
        damage_fee: state.damage_fee,
        cleaning_fee: state.cleaning_fee,
        other: state.mileage_charge.resolve(computed_mileage),
    };
    let damage_total = state.damages.total_cost();
    let total_deductions = settlement::total_deductions(&charges, damage_total);

    Some(SettlementView {
        charges,
        damage_total,
        total_deductions,
        settlement: settlement::settle(snapshot.deposit, total_deductions),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitBlock {
    NoContractSelected,
    NoReturnTime,
    InspectorNameMissing,
    NotAcknowledged,
}

impl CommitBlock {
    pub fn message(&self) -> &'static str {
        match self {
            CommitBlock::NoContractSelected => "No contract is selected for this return.",
            CommitBlock::NoReturnTime => "The return date and time must be entered.",
            CommitBlock::InspectorNameMissing => "The inspector name must be filled in.",
            CommitBlock::NotAcknowledged => {
                "The customer must acknowledge the settlement before completion."
            }
        }
    }
}

/// Commit guard. Runs before any network or database work; a non-empty
/// block list means nothing downstream may be called.
pub fn validate_commit(state: &ReturnFlowState) -> Result<(), Vec<CommitBlock>> {
    let mut blocks = Vec::new();
    if state.contract.is_none() {
        blocks.push(CommitBlock::NoContractSelected);
    }
    if state.return_time.is_none() {
        blocks.push(CommitBlock::NoReturnTime);
    }
    if state.inspector_name.trim().is_empty() {
        blocks.push(CommitBlock::InspectorNameMissing);
    }
    if !state.customer_acknowledged {
        blocks.push(CommitBlock::NotAcknowledged);
    }
    if blocks.is_empty() { Ok(()) } else { Err(blocks) }
}

// -------------------------------------------------------------------------
// Commit pipeline policy
// -------------------------------------------------------------------------

/// The three network operations of a commit, in their required order:
/// photo URLs are needed by the document, and the document embeds the
/// persisted settlement figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    ResolvePhotos,
    Persist,
    GenerateDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Warn and carry on; the return still completes.
    Recoverable,
    /// Abort the commit; the workflow stays at ConfirmingSettlement.
    Fatal,
}

/// The partial-failure table: only the persistence write can sink a commit.
/// A photo failure degrades to a no-photo document; a document failure after
/// a successful write is reported but never rolls the completion back.
pub fn failure_policy(step: CommitStep) -> FailurePolicy {
    match step {
        CommitStep::ResolvePhotos => FailurePolicy::Recoverable,
        CommitStep::Persist => FailurePolicy::Fatal,
        CommitStep::GenerateDocument => FailurePolicy::Recoverable,
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionGrade, DamageSeverity, VehicleView};
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn snapshot() -> ContractSnapshot {
        ContractSnapshot {
            contract_id: 7,
            start_time: utc(2024, 1, 8, 10, 0),
            scheduled_end: utc(2024, 1, 10, 10, 0),
            daily_rate: 150.0,
            deposit: 300.0,
            allowed_km_per_day: 250,
            per_km_rate: 0.5,
            pickup_odometer: 10000,
            pickup_fuel_level: 100,
        }
    }

    fn at_confirmation() -> ReturnFlowState {
        let mut state = ReturnFlowState::default();
        state = reduce(state, Action::SelectContract(snapshot()));
        state = reduce(state, Action::SetReturnTime(utc(2024, 1, 10, 9, 0)));
        state = reduce(state, Action::Next);
        state = reduce(state, Action::Next);
        state
    }

    #[test]
    fn next_is_blocked_until_basics_are_entered() {
        let state = reduce(ReturnFlowState::default(), Action::Next);
        assert_eq!(state.step, Step::EnteringBasics);

        let state = reduce(state, Action::SelectContract(snapshot()));
        let state = reduce(state, Action::Next);
        assert_eq!(state.step, Step::EnteringBasics);

        let state = reduce(state, Action::SetReturnTime(utc(2024, 1, 10, 9, 0)));
        let state = reduce(state, Action::Next);
        assert_eq!(state.step, Step::InspectingVehicle);
    }

    #[test]
    fn inspection_advances_without_validation() {
        let mut state = at_confirmation();
        assert_eq!(state.step, Step::ConfirmingSettlement);
        // all inspection fields were left blank
        state = reduce(state, Action::Back);
        assert_eq!(state.step, Step::InspectingVehicle);
    }

    #[test]
    fn back_navigation_preserves_entered_data() {
        let mut state = at_confirmation();
        state = reduce(state, Action::Back);
        state = reduce(
            state,
            Action::SetCondition(Part::Exterior, Some(ConditionGrade::Fair)),
        );
        state = reduce(state, Action::Back);
        assert_eq!(state.step, Step::EnteringBasics);
        assert_eq!(state.exterior_condition, Some(ConditionGrade::Fair));
        assert_eq!(state.return_time, Some(utc(2024, 1, 10, 9, 0)));
    }

    #[test]
    fn commit_guard_requires_acknowledgement() {
        let mut state = at_confirmation();
        state = reduce(state, Action::SetInspectorName(String::from("Dana")));
        let blocks = validate_commit(&state).unwrap_err();
        assert_eq!(blocks, vec![CommitBlock::NotAcknowledged]);

        let state = reduce(state, Action::SetAcknowledged(true));
        assert!(validate_commit(&state).is_ok());
    }

    #[test]
    fn commit_guard_requires_inspector_name() {
        let mut state = at_confirmation();
        state = reduce(state, Action::SetInspectorName(String::from("   ")));
        state = reduce(state, Action::SetAcknowledged(true));
        let blocks = validate_commit(&state).unwrap_err();
        assert_eq!(blocks, vec![CommitBlock::InspectorNameMissing]);
    }

    #[test]
    fn committed_state_ignores_further_edits() {
        let mut state = at_confirmation();
        state.step = Step::Committed;
        let state = reduce(state, Action::SetNotes(String::from("late edit")));
        assert_eq!(state.notes, "");
        let state = reduce(state, Action::Back);
        assert_eq!(state.step, Step::Committed);
    }

    #[test]
    fn settlement_recomputes_after_every_action() {
        let mut state = at_confirmation();
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.total_deductions, 0.0);
        assert_eq!(view.settlement, Settlement::Refund(300.0));

        state = reduce(state, Action::SetCleaningFee(40.0));
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.total_deductions, 40.0);
        assert_eq!(view.settlement, Settlement::Refund(260.0));
    }

    #[test]
    fn late_return_flows_into_the_late_fee() {
        // scheduled end 01-10T10:00, returned 01-11T14:00 -> 28h -> 2 days
        let mut state = ReturnFlowState::default();
        state = reduce(state, Action::SelectContract(snapshot()));
        state = reduce(state, Action::SetReturnTime(utc(2024, 1, 11, 14, 0)));
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.charges.late_fee, 300.0);
        assert_eq!(view.settlement, Settlement::Refund(0.0));
    }

    #[test]
    fn excess_mileage_lands_in_other() {
        let mut state = at_confirmation();
        state = reduce(state, Action::SetOdometer(Some(10800)));
        let view = settlement_view(&state).unwrap();
        // 800 driven, 750 allowed over 3 days, 0.5/km
        assert_eq!(view.charges.other, 25.0);
    }

    #[test]
    fn manual_override_pins_the_charge() {
        let mut state = at_confirmation();
        state = reduce(state, Action::SetOdometer(Some(10800)));
        state = reduce(state, Action::SetMileageCharge(ChargeField::Manual(10.0)));
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.charges.other, 10.0);

        // flipping back to auto recomputes from the inputs
        state = reduce(state, Action::SetMileageCharge(ChargeField::Auto));
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.charges.other, 25.0);
    }

    #[test]
    fn blank_readings_default_to_pickup_values() {
        let state = at_confirmation();
        let snap = state.contract.clone().unwrap();
        assert_eq!(effective_odometer(&state, &snap), 10000);
        assert_eq!(effective_fuel_level(&state, &snap), 100);
        let view = settlement_view(&state).unwrap();
        assert_eq!(view.charges.fuel_charge, 0.0);
        assert_eq!(view.charges.other, 0.0);
    }

    #[test]
    fn damages_feed_the_damage_total() {
        let mut state = at_confirmation();
        state = reduce(state, Action::Back);
        state = reduce(
            state,
            Action::AddDamage(DamagePoint {
                view: Some(VehicleView::Right),
                x: Some(30),
                y: Some(70),
                severity: DamageSeverity::Moderate,
            }),
        );
        let id = state.damages.entries()[0].id;
        state = reduce(
            state,
            Action::UpdateDamage {
                id,
                patch: DamagePatch {
                    estimated_cost: Some(50.0),
                    ..Default::default()
                },
            },
        );
        state = reduce(state, Action::SetLateFee(ChargeField::Manual(100.0)));
        let view = settlement_view(&state).unwrap();
        // deposit 300, damages 50, late fee 100 -> refund of 150
        assert_eq!(view.damage_total, 50.0);
        assert_eq!(view.total_deductions, 150.0);
        assert_eq!(view.settlement, Settlement::Refund(150.0));
    }

    #[test]
    fn only_the_persist_step_is_fatal() {
        assert_eq!(
            failure_policy(CommitStep::ResolvePhotos),
            FailurePolicy::Recoverable
        );
        assert_eq!(failure_policy(CommitStep::Persist), FailurePolicy::Fatal);
        assert_eq!(
            failure_policy(CommitStep::GenerateDocument),
            FailurePolicy::Recoverable
        );
    }
}
