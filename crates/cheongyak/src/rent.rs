//! Deposit to monthly-rent conversion within one contract band.
//!
//! Public rental contracts let a tenant trade a larger deposit for a smaller
//! monthly rent. Between the two extremes of a band the rent varies linearly,
//! so the highest deposit pairs with the lowest rent and vice versa.

use serde::{Deserialize, Serialize};

const DEGENERATE_RANGE_EPSILON: f64 = 1e-9;

/// Linear interpolation of the rent implied by `deposit`.
///
/// `rent_at_min` is paired with `deposit_min` and `rent_at_max` with
/// `deposit_max`; reversed bounds are swapped together with their rents.
/// Deposits outside the band saturate at the nearest bound and a band whose
/// bounds coincide returns the rent paired with the lower bound.
pub fn monthly_rent(
    deposit: f64,
    deposit_min: f64,
    deposit_max: f64,
    rent_at_min: f64,
    rent_at_max: f64,
) -> f64 {
    let ((low_deposit, low_rent), (high_deposit, high_rent)) = if deposit_min > deposit_max {
        ((deposit_max, rent_at_max), (deposit_min, rent_at_min))
    } else {
        ((deposit_min, rent_at_min), (deposit_max, rent_at_max))
    };

    if (high_deposit - low_deposit).abs() < DEGENERATE_RANGE_EPSILON {
        return low_rent;
    }

    let ratio = ((deposit - low_deposit) / (high_deposit - low_deposit)).clamp(0.0, 1.0);
    low_rent + ratio * (high_rent - low_rent)
}

/// One tenancy tier offered for a unit. Amounts are in 만원.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractBand {
    #[serde(default)]
    pub group: String,
    pub deposit_min: f64,
    pub deposit_max: f64,
    #[serde(alias = "rent_min")]
    pub monthly_rent_min: f64,
    #[serde(alias = "rent_max")]
    pub monthly_rent_max: f64,
    #[serde(default)]
    pub down_payment: f64,
}

/// Rent estimate shown next to the deposit slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RentQuote {
    /// The band offers no deposit/rent conversion.
    Fixed { deposit: f64, rent: f64 },
    Converted { deposit: f64, rent: f64 },
}

impl RentQuote {
    pub fn deposit(&self) -> f64 {
        match self {
            RentQuote::Fixed { deposit, .. } | RentQuote::Converted { deposit, .. } => *deposit,
        }
    }

    pub fn rent(&self) -> f64 {
        match self {
            RentQuote::Fixed { rent, .. } | RentQuote::Converted { rent, .. } => *rent,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, RentQuote::Fixed { .. })
    }
}

impl ContractBand {
    pub fn offers_conversion(&self) -> bool {
        self.deposit_min != self.deposit_max
    }

    /// Quotes the rent for a chosen deposit, clamped into the band.
    pub fn quote(&self, deposit: f64) -> RentQuote {
        if !self.offers_conversion() {
            return RentQuote::Fixed {
                deposit: self.deposit_min,
                rent: self.monthly_rent_min,
            };
        }

        let (low, high) = if self.deposit_min <= self.deposit_max {
            (self.deposit_min, self.deposit_max)
        } else {
            (self.deposit_max, self.deposit_min)
        };
        let deposit = deposit.clamp(low, high);
        let rent = monthly_rent(
            deposit,
            self.deposit_min,
            self.deposit_max,
            self.monthly_rent_max,
            self.monthly_rent_min,
        );

        RentQuote::Converted { deposit, rent }
    }

    pub fn slider(&self) -> DepositSlider {
        DepositSlider::for_band(self)
    }
}

/// Whole-number slider over a band whose bounds may carry a fraction.
///
/// The slider runs from `floor(deposit_min)` to `ceil(deposit_max)` and every
/// position is shifted by the fractional part of `deposit_min`, capped at
/// `deposit_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepositSlider {
    pub min: i64,
    pub max: i64,
    pub offset: f64,
    deposit_max: f64,
}

impl DepositSlider {
    pub fn for_band(band: &ContractBand) -> Self {
        let low = band.deposit_min.min(band.deposit_max);
        let high = band.deposit_min.max(band.deposit_max);
        let min = low.floor();

        Self {
            min: min as i64,
            max: high.ceil() as i64,
            offset: low - min,
            deposit_max: high,
        }
    }

    pub fn initial(&self) -> i64 {
        self.min
    }

    pub fn deposit_at(&self, position: i64) -> f64 {
        let position = position.clamp(self.min, self.max);
        (position as f64 + self.offset).min(self.deposit_max)
    }
}
