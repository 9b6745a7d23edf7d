//! Return-time fee arithmetic. All functions take primitive inputs, never
//! touch shared state, and never return a negative amount.

use chrono::{DateTime, Utc};

/// Flat amount charged per quarter tank the vehicle comes back short.
/// Shop policy, not a business invariant.
pub const FUEL_PENALTY_PER_QUARTER: f64 = 25.0;

/// A started late day bills as a full day: `ceil(hours_late / 24) * daily_rate`.
/// Returning on or before the scheduled drop-off (the exact moment included)
/// costs nothing.
pub fn late_fee(
    scheduled_end: DateTime<Utc>,
    actual_return: DateTime<Utc>,
    daily_rate: f64,
) -> f64 {
    if actual_return <= scheduled_end {
        return 0.0;
    }
    let hours_late = (actual_return - scheduled_end).num_seconds() as f64 / 3600.0;
    let late_days = (hours_late / 24.0).ceil();
    late_days * daily_rate.max(0.0)
}

/// Fuel gauges are read in quarter-tank brackets (empty, ¼, ½, ¾, full).
/// Levels are percentages; 88% and 100% are both "full".
pub fn quarter_bracket(level_percentage: i32) -> i32 {
    ((level_percentage.clamp(0, 100) as f64) / 25.0).round() as i32
}

pub fn fuel_charge(pickup_level: i32, return_level: i32) -> f64 {
    let shortfall = (quarter_bracket(pickup_level) - quarter_bracket(return_level)).max(0);
    shortfall as f64 * FUEL_PENALTY_PER_QUARTER
}

/// Contract duration in days, both endpoint dates counted.
pub fn contract_duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    ((end.date_naive() - start.date_naive()).num_days() + 1).max(1)
}

pub fn mileage_charge(
    pickup_odometer: i32,
    return_odometer: i32,
    allowed_km_per_day: i32,
    duration_days: i64,
    per_km_rate: f64,
) -> f64 {
    let actual_distance = (return_odometer - pickup_odometer).max(0) as i64;
    let allowed_distance = allowed_km_per_day as i64 * duration_days.max(0);
    let excess = (actual_distance - allowed_distance).max(0);
    excess as f64 * per_km_rate.max(0.0)
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn on_time_return_is_free() {
        let end = utc(2024, 1, 10, 10, 0);
        assert_eq!(late_fee(end, end, 150.0), 0.0);
        assert_eq!(late_fee(end, utc(2024, 1, 9, 23, 30), 150.0), 0.0);
    }

    #[test]
    fn twenty_eight_hours_late_bills_two_days() {
        // scheduled 2024-01-10T10:00, returned 2024-01-11T14:00 -> 28h late
        let fee = late_fee(utc(2024, 1, 10, 10, 0), utc(2024, 1, 11, 14, 0), 150.0);
        assert_eq!(fee, 300.0);
    }

    #[test]
    fn late_fee_is_non_decreasing_in_lateness() {
        let end = utc(2024, 1, 10, 10, 0);
        let mut last = 0.0;
        for hours in [1, 23, 24, 25, 47, 48, 49, 100] {
            let fee = late_fee(end, end + chrono::Duration::hours(hours), 150.0);
            assert!(fee >= last, "fee dropped at {} hours", hours);
            last = fee;
        }
    }

    #[test]
    fn one_minute_late_bills_one_day() {
        let end = utc(2024, 1, 10, 10, 0);
        let fee = late_fee(end, end + chrono::Duration::minutes(1), 80.0);
        assert_eq!(fee, 80.0);
    }

    #[test]
    fn seconds_late_still_bills_a_day() {
        // return times arrive with second precision
        let end = utc(2024, 1, 10, 10, 0);
        let fee = late_fee(end, end + chrono::Duration::seconds(30), 150.0);
        assert_eq!(fee, 150.0);
        // a few seconds past 24h tips into the second day
        let fee = late_fee(end, end + chrono::Duration::seconds(24 * 3600 + 5), 150.0);
        assert_eq!(fee, 300.0);
    }

    #[test]
    fn fuel_brackets() {
        assert_eq!(quarter_bracket(100), 4);
        assert_eq!(quarter_bracket(88), 4);
        assert_eq!(quarter_bracket(75), 3);
        assert_eq!(quarter_bracket(50), 2);
        assert_eq!(quarter_bracket(20), 1);
        assert_eq!(quarter_bracket(5), 0);
        // out-of-range gauge readings clamp
        assert_eq!(quarter_bracket(130), 4);
        assert_eq!(quarter_bracket(-10), 0);
    }

    #[test]
    fn fuel_shortfall_is_charged_per_quarter() {
        assert_eq!(fuel_charge(100, 50), 2.0 * FUEL_PENALTY_PER_QUARTER);
        assert_eq!(fuel_charge(100, 100), 0.0);
        // coming back fuller than pickup is never a credit
        assert_eq!(fuel_charge(50, 100), 0.0);
    }

    #[test]
    fn duration_counts_both_endpoint_dates() {
        assert_eq!(
            contract_duration_days(utc(2024, 1, 8, 10, 0), utc(2024, 1, 10, 10, 0)),
            3
        );
        // same-day rental still bills one day
        assert_eq!(
            contract_duration_days(utc(2024, 1, 8, 9, 0), utc(2024, 1, 8, 18, 0)),
            1
        );
    }

    #[test]
    fn mileage_within_allowance_is_free() {
        assert_eq!(mileage_charge(10000, 10700, 250, 3, 0.5), 0.0);
        assert_eq!(mileage_charge(10000, 10750, 250, 3, 0.5), 0.0);
    }

    #[test]
    fn excess_mileage_is_billed_per_km() {
        // pickup 10000, return 10800, 3 days at 250/day allowed, 0.5/km
        assert_eq!(mileage_charge(10000, 10800, 250, 3, 0.5), 25.0);
    }

    #[test]
    fn odometer_rollback_is_not_a_credit() {
        assert_eq!(mileage_charge(10800, 10000, 250, 3, 0.5), 0.0);
    }
}
