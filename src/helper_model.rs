use crate::model;
use serde_derive::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One toast for the back-office UI. The server never blocks on these.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: &str, message: String) -> Notice {
        Notice {
            severity: Severity::Success,
            title: title.to_string(),
            message,
        }
    }

    pub fn warning(title: &str, message: String) -> Notice {
        Notice {
            severity: Severity::Warning,
            title: title.to_string(),
            message,
        }
    }
}

/// One row of the active-contract picker: the contract joined with its
/// customer and vehicle.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ActiveContract {
    pub contract: model::Contract,
    pub customer: model::Customer,
    pub vehicle: model::Vehicle,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FilePath {
    pub file_path: String,
}

/// One damage row in the commit payload. `photo_paths` are object paths
/// handed back earlier by the upload endpoint.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DamageEntryRequest {
    pub view: Option<model::VehicleView>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub severity: model::DamageSeverity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub photo_paths: Vec<String>,
}

/// The whole return wizard, flattened for the commit call. A derivable
/// charge left as `None` means "auto"; a value pins it.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CompleteContractRequest {
    pub contract_id: i32,
    /// Branch-local wall clock, `YYYY-MM-DDTHH:MM[:SS]`.
    pub return_time: String,
    /// IANA zone name or fixed offset in hours.
    pub time_zone: String,
    pub odometer: Option<i32>,
    pub fuel_level: Option<i32>,
    pub inspector_name: String,
    pub customer_acknowledged: bool,
    pub exterior_condition: Option<model::ConditionGrade>,
    pub interior_condition: Option<model::ConditionGrade>,
    pub tires_condition: Option<model::ConditionGrade>,
    pub lights_condition: Option<model::ConditionGrade>,
    #[serde(default)]
    pub damages: Vec<DamageEntryRequest>,
    pub late_fee_override: Option<f64>,
    pub fuel_charge_override: Option<f64>,
    pub mileage_charge_override: Option<f64>,
    #[serde(default)]
    pub damage_fee: f64,
    #[serde(default)]
    pub cleaning_fee: f64,
    pub notes: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CompletedReturn {
    pub return_record: model::ReturnRecord,
    pub notices: Vec<Notice>,
}
