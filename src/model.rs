use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// Diesel requires us to define a custom mapping between the Rust enum
// and the database type, if we are not using string.
use crate::schema::*;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::{AsExpression, FromSqlRow};
use std::io::Write;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::ContractStatusEnum)] //lets us map the enum to TEXT in PostgresSQL
pub enum ContractStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::DamageSeverityEnum)]
pub enum DamageSeverity {
    Minor,
    Moderate,
    Major,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::VehicleViewEnum)]
pub enum VehicleView {
    Front,
    Back,
    Left,
    Right,
    Top,
    Interior,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::ConditionGradeEnum)]
pub enum ConditionGrade {
    Good,
    Fair,
    Poor,
}

//This is for postgres. For other databases the type might be different.
impl ToSql<sql_types::ContractStatusEnum, Pg> for ContractStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            ContractStatus::Active => out.write_all(b"Active")?,
            ContractStatus::Completed => out.write_all(b"Completed")?,
            ContractStatus::Cancelled => out.write_all(b"Cancelled")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::ContractStatusEnum, Pg> for ContractStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Active" => Ok(ContractStatus::Active),
            b"Completed" => Ok(ContractStatus::Completed),
            b"Cancelled" => Ok(ContractStatus::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}
// The following is the traits implementation for other Enums.
impl ToSql<sql_types::DamageSeverityEnum, Pg> for DamageSeverity {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            DamageSeverity::Minor => out.write_all(b"Minor")?,
            DamageSeverity::Moderate => out.write_all(b"Moderate")?,
            DamageSeverity::Major => out.write_all(b"Major")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::DamageSeverityEnum, Pg> for DamageSeverity {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Minor" => Ok(DamageSeverity::Minor),
            b"Moderate" => Ok(DamageSeverity::Moderate),
            b"Major" => Ok(DamageSeverity::Major),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<sql_types::VehicleViewEnum, Pg> for VehicleView {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            VehicleView::Front => out.write_all(b"Front")?,
            VehicleView::Back => out.write_all(b"Back")?,
            VehicleView::Left => out.write_all(b"Left")?,
            VehicleView::Right => out.write_all(b"Right")?,
            VehicleView::Top => out.write_all(b"Top")?,
            VehicleView::Interior => out.write_all(b"Interior")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::VehicleViewEnum, Pg> for VehicleView {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Front" => Ok(VehicleView::Front),
            b"Back" => Ok(VehicleView::Back),
            b"Left" => Ok(VehicleView::Left),
            b"Right" => Ok(VehicleView::Right),
            b"Top" => Ok(VehicleView::Top),
            b"Interior" => Ok(VehicleView::Interior),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<sql_types::ConditionGradeEnum, Pg> for ConditionGrade {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            ConditionGrade::Good => out.write_all(b"Good")?,
            ConditionGrade::Fair => out.write_all(b"Fair")?,
            ConditionGrade::Poor => out.write_all(b"Poor")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::ConditionGradeEnum, Pg> for ConditionGrade {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"Good" => Ok(ConditionGrade::Good),
            b"Fair" => Ok(ConditionGrade::Fair),
            b"Poor" => Ok(ConditionGrade::Poor),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub billing_address: Option<String>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vehicle {
    pub id: i32,
    pub vin: String,
    pub name: String,
    pub available: bool,
    pub license_number: String,
    pub license_state: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub image_link: Option<String>,
    pub odometer: i32,
    pub tank_size: f64,
    pub tank_level_percentage: i32,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Customer))]
#[diesel(belongs_to(Vehicle))]
#[diesel(table_name = contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Contract {
    pub id: i32,
    pub confirmation: String,
    pub status: ContractStatus,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub daily_rate: f64,
    pub deposit: f64,
    pub allowed_km_per_day: i32,
    pub per_km_rate: f64,
    pub pickup_odometer: i32,
    pub pickup_fuel_level: i32,
    pub actual_return_time: Option<DateTime<Utc>>,
    pub return_odometer: Option<i32>,
    pub return_fuel_level: Option<i32>,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(Contract))]
#[diesel(table_name = return_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReturnRecord {
    pub id: i32,
    pub confirmation: String,
    pub contract_id: i32,
    pub return_time: DateTime<Utc>,
    pub odometer: i32,
    pub fuel_level: i32,
    pub inspector_name: String,
    pub customer_acknowledged: bool,
    pub exterior_condition: Option<ConditionGrade>,
    pub interior_condition: Option<ConditionGrade>,
    pub tires_condition: Option<ConditionGrade>,
    pub lights_condition: Option<ConditionGrade>,
    pub late_fee: f64,
    pub fuel_charge: f64,
    pub damage_fee: f64,
    pub cleaning_fee: f64,
    pub other_charge: f64,
    pub damage_total: f64,
    pub deposit_held: f64,
    pub settlement_amount: f64,
    pub notes: Option<String>,
    pub document_link: Option<String>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Contract))]
#[diesel(table_name = return_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReturnRecord {
    pub confirmation: String,
    pub contract_id: i32,
    pub return_time: DateTime<Utc>,
    pub odometer: i32,
    pub fuel_level: i32,
    pub inspector_name: String,
    pub customer_acknowledged: bool,
    pub exterior_condition: Option<ConditionGrade>,
    pub interior_condition: Option<ConditionGrade>,
    pub tires_condition: Option<ConditionGrade>,
    pub lights_condition: Option<ConditionGrade>,
    pub late_fee: f64,
    pub fuel_charge: f64,
    pub damage_fee: f64,
    pub cleaning_fee: f64,
    pub other_charge: f64,
    pub damage_total: f64,
    pub deposit_held: f64,
    pub settlement_amount: f64,
    pub notes: Option<String>,
    pub document_link: Option<String>,
}

#[derive(
    Queryable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize,
)]
#[diesel(belongs_to(ReturnRecord))]
#[diesel(table_name = return_damages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReturnDamage {
    pub id: i32,
    pub return_record_id: i32,
    pub view: Option<VehicleView>,
    pub coordination_x_percentage: Option<i32>,
    pub coordination_y_percentage: Option<i32>,
    pub severity: DamageSeverity,
    pub description: String,
    pub estimated_cost: f64,
    pub first_image: Option<String>,
    pub second_image: Option<String>,
    pub third_image: Option<String>,
    pub fourth_image: Option<String>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(ReturnRecord))]
#[diesel(table_name = return_damages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReturnDamage {
    pub return_record_id: i32,
    pub view: Option<VehicleView>,
    pub coordination_x_percentage: Option<i32>,
    pub coordination_y_percentage: Option<i32>,
    pub severity: DamageSeverity,
    pub description: String,
    pub estimated_cost: f64,
    pub first_image: Option<String>,
    pub second_image: Option<String>,
    pub third_image: Option<String>,
    pub fourth_image: Option<String>,
}
