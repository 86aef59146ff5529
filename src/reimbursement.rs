//! Reference reimbursement model.
//!
//! A fitted per-diem/mileage/receipts model with effort-based adjustments.
//! Exposed through `batch-runner calc`, so the binary can stand in as its own
//! external calculator.

use std::fmt;

/// Effort tier inferred from travel efficiency, standing in for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// (base rate, meals & incidentals rate) per day
    fn rates(self) -> (f64, f64) {
        match self {
            Tier::Low => (15.0, 5.0),
            Tier::Medium => (50.0, 15.0),
            Tier::High => (65.0, 20.0),
        }
    }

    fn infer(days: i64, miles: f64, receipts: f64, efficiency: f64) -> Self {
        if efficiency > 200.0 || (miles > 800.0 && receipts > 1000.0) {
            Tier::High
        } else if efficiency < 50.0 || (days > 7 && efficiency < 100.0) {
            Tier::Low
        } else {
            Tier::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripInputs {
    pub days: i64,
    pub miles: f64,
    pub receipts: f64,
}

impl TripInputs {
    /// Parse the three positional calculator arguments.
    pub fn parse(days: &str, miles: &str, receipts: &str) -> Result<Self, String> {
        let days = days
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("trip_duration_days '{days}': {e}"))?;
        let miles = parse_float(miles, "miles_traveled")?;
        let receipts = parse_float(receipts, "total_receipts_amount")?;
        Ok(Self {
            days,
            miles,
            receipts,
        })
    }
}

fn parse_float(text: &str, field: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| format!("{field} '{text}': {e}"))
}

/// A reimbursement rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    pub value: f64,
    /// The per-day cap was chosen as-is, so the amount is a whole number
    whole: bool,
}

impl Amount {
    /// Round to two decimals on the exact binary value, ties to even.
    fn cents(total: f64) -> Self {
        let value = format!("{total:.2}").parse().unwrap_or(total);
        Self {
            value,
            whole: false,
        }
    }

    fn whole(value: i64) -> Self {
        Self {
            value: value as f64,
            whole: true,
        }
    }
}

impl fmt::Display for Amount {
    /// `300` for a capped amount, otherwise shortest float form: `100.0`, `487.25`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.whole {
            write!(f, "{}", self.value as i64)
        } else {
            write!(f, "{:?}", self.value)
        }
    }
}

/// Compute the reimbursement for one trip.
///
/// With `noise` set the result is scaled by a uniform factor in
/// `[0.95, 1.05)` before rounding.
pub fn calculate(trip: TripInputs, noise: bool) -> Amount {
    let TripInputs {
        days,
        miles,
        receipts,
    } = trip;
    let day_count = days as f64;

    let efficiency = if days > 0 { miles / day_count } else { 0.0 };
    let tier = Tier::infer(days, miles, receipts, efficiency);
    let (base, mie) = tier.rates();

    // Travel days at either end get 75% M&IE
    let mut per_diem = if days >= 2 {
        (base + mie) * (day_count - 2.0) + (base + mie * 0.75) * 2.0
    } else {
        (base + mie) * day_count
    };
    per_diem *= match days {
        5 => 1.15,
        d if d > 7 && tier == Tier::Low => 0.40,
        d if d > 7 => 0.80,
        _ => 1.0,
    };

    let mileage = mileage(miles) * efficiency_factor(efficiency);

    let receipt_adjustment = if receipts < 50.0 {
        per_diem
    } else if receipts <= 500.0 && days <= 6 {
        (per_diem * 0.8).min(receipts)
    } else {
        let cap = if efficiency < 100.0 { 200.0 } else { 500.0 };
        per_diem + (receipts - per_diem).min(cap) * 0.15
    };

    let mut total = per_diem + mileage + receipt_adjustment;
    if tier == Tier::Low && efficiency < 100.0 {
        total *= 0.85;
    }
    let cap = days * 100;
    let capped = efficiency < 50.0 && (cap as f64) < total;
    if capped {
        total = cap as f64;
    }
    if noise {
        total *= 0.95 + rand::random::<f64>() * 0.10;
    } else if capped {
        return Amount::whole(cap);
    }

    Amount::cents(total)
}

/// Tiered mileage rate: nothing under 50 miles, then 0.70, 0.60 and 0.50 per mile.
fn mileage(miles: f64) -> f64 {
    if miles < 50.0 {
        0.0
    } else if miles <= 100.0 {
        miles * 0.70
    } else if miles <= 500.0 {
        100.0 * 0.70 + (miles - 100.0) * 0.60
    } else {
        100.0 * 0.70 + 400.0 * 0.60 + (miles - 500.0) * 0.50
    }
}

fn efficiency_factor(efficiency: f64) -> f64 {
    if efficiency > 200.0 {
        1.20
    } else if efficiency > 100.0 {
        1.15
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(days: i64, miles: f64, receipts: f64) -> f64 {
        calculate(
            TripInputs {
                days,
                miles,
                receipts,
            },
            false,
        )
        .value
    }

    #[test]
    fn test_short_medium_trip() {
        // 3 days, 100 miles: efficiency 33.3 -> Low tier, under the $100/day cap
        // per diem 20*1 + 18.75*2 = 57.5, mileage 70, receipts 45.5 < 50 -> 57.5
        // (57.5 + 70 + 57.5) * 0.85 = 157.25
        assert_eq!(calc(3, 100.0, 45.50), 157.25);
    }

    #[test]
    fn test_five_day_bonus_medium_tier() {
        // efficiency 50 -> Medium; per diem (65*3 + 61.25*2) * 1.15 = 365.125
        // mileage 70 + 150*0.6 = 160; receipts min(292.1, 150.75) = 150.75
        assert_eq!(calc(5, 250.0, 150.75), 675.88);
    }

    #[test]
    fn test_high_effort_single_day() {
        // efficiency 300 -> High; per diem 85; mileage (70 + 120) * 1.2 = 228
        // receipts 5.86 < 50 -> per diem
        assert_eq!(calc(1, 300.0, 5.86), 398.0);
    }

    #[test]
    fn test_long_trip_with_large_receipts_is_high_tier() {
        // miles > 800 and receipts > 1000 -> High; efficiency 112.5 -> factor 1.15
        // per diem (85*6 + 80*2) * 0.8 = 536; mileage (70 + 240 + 200) * 1.15 = 586.5
        // receipts 536 + min(664, 500) * 0.15 = 611
        assert_eq!(calc(8, 900.0, 1200.0), 1733.5);
    }

    #[test]
    fn test_zero_days_has_no_per_diem() {
        // efficiency 0 -> Low, capped at 0 * 100
        assert_eq!(calc(0, 120.0, 30.0), 0.0);
    }

    #[test]
    fn test_noise_stays_within_five_percent() {
        let trip = TripInputs {
            days: 5,
            miles: 250.0,
            receipts: 150.75,
        };
        let exact = calculate(trip, false).value;
        for _ in 0..50 {
            let noisy = calculate(trip, true).value;
            assert!(noisy >= (exact * 0.95 * 100.0).floor() / 100.0);
            assert!(noisy <= (exact * 1.05 * 100.0).ceil() / 100.0);
        }
    }

    #[test]
    fn test_rounding_ties_go_to_even_cent() {
        // 725.125 exactly: the tie rounds down to the even cent
        assert_eq!(calc(5, 500.0, 50.0), 725.12);
        assert_eq!(calc(12, 899.99, 1521.8), 2155.99);
        assert_eq!(calc(7, 649.79, 677.94), 1309.89);
    }

    #[test]
    fn test_amount_display_matches_shortest_float_form() {
        assert_eq!(Amount::cents(100.0).to_string(), "100.0");
        assert_eq!(Amount::cents(487.25).to_string(), "487.25");
        assert_eq!(Amount::cents(170.6).to_string(), "170.6");
    }

    #[test]
    fn test_capped_amount_prints_as_whole_number() {
        let zero_days = TripInputs {
            days: 0,
            miles: 120.0,
            receipts: 30.0,
        };
        assert_eq!(calculate(zero_days, false).to_string(), "0");

        let negative_days = TripInputs {
            days: -1,
            miles: 120.0,
            receipts: 30.0,
        };
        assert_eq!(calculate(negative_days, false).to_string(), "-100");

        // 3 days at 100 miles falls under the cap and stays a float
        let uncapped = TripInputs {
            days: 3,
            miles: 100.0,
            receipts: 45.50,
        };
        assert_eq!(calculate(uncapped, false).to_string(), "157.25");
    }

    #[test]
    fn test_parse_rejects_fractional_days() {
        assert!(TripInputs::parse("3", "100", "45.50").is_ok());
        let err = TripInputs::parse("3.5", "100", "45.50").unwrap_err();
        assert!(err.contains("trip_duration_days"));
        assert!(TripInputs::parse("3", "far", "45.50").is_err());
    }
}
