//! Monthly bill estimation.
//!
//! Residential consumption is priced in three bands. Other categories
//! pay a flat rate taken from the published tariff schedule.

use gridportal_types::{BillEstimate, BillLine, TariffCategory, TariffEntry};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::fallback::CURRENCY;

/// Errors from bill estimation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    /// The usage is too large to price.
    #[error("usage of {usage_kwh} kWh is out of range")]
    OutOfRange {
        /// The rejected usage.
        usage_kwh: Decimal,
    },
}

/// A residential price band. `width` is `None` for the open top band.
#[derive(Debug, Clone, Copy)]
struct Band {
    width: Option<Decimal>,
    rate: Decimal,
}

/// 0-300 kWh at 0.89, the next 500 kWh at 1.15, the rest at 1.45.
const RESIDENTIAL_BANDS: [Band; 3] = [
    Band {
        width: Some(Decimal::from_parts(300, 0, 0, false, 0)),
        rate: Decimal::from_parts(89, 0, 0, false, 2),
    },
    Band {
        width: Some(Decimal::from_parts(500, 0, 0, false, 0)),
        rate: Decimal::from_parts(115, 0, 0, false, 2),
    },
    Band {
        width: None,
        rate: Decimal::from_parts(145, 0, 0, false, 2),
    },
];

/// Estimate the bill for `usage_kwh` in the given category.
///
/// Usage of zero or less yields an empty, zero-total estimate. The total
/// is rounded to two places, midpoint away from zero.
pub fn estimate_bill(
    category: TariffCategory,
    usage_kwh: Decimal,
    tariffs: &[TariffEntry],
) -> Result<BillEstimate, BillingError> {
    let out_of_range = || BillingError::OutOfRange { usage_kwh };

    let lines = if usage_kwh <= Decimal::ZERO {
        Vec::new()
    } else if category == TariffCategory::Residential {
        banded_lines(usage_kwh).ok_or_else(out_of_range)?
    } else {
        flat_lines(category, usage_kwh, tariffs).ok_or_else(out_of_range)?
    };

    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.amount))
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(BillEstimate {
        category,
        usage_kwh,
        lines,
        total,
        currency: String::from(CURRENCY),
    })
}

fn banded_lines(usage_kwh: Decimal) -> Option<Vec<BillLine>> {
    let mut lines = Vec::with_capacity(RESIDENTIAL_BANDS.len());
    let mut remaining = usage_kwh;
    let mut from_kwh = Decimal::ZERO;

    for band in RESIDENTIAL_BANDS {
        if remaining <= Decimal::ZERO {
            break;
        }
        let kwh = band.width.map_or(remaining, |w| remaining.min(w));
        let to_kwh = match band.width {
            Some(w) => Some(from_kwh.checked_add(w)?),
            None => None,
        };
        lines.push(BillLine {
            from_kwh,
            to_kwh,
            kwh,
            rate: band.rate,
            amount: kwh.checked_mul(band.rate)?,
        });
        remaining = remaining.checked_sub(kwh)?;
        from_kwh = to_kwh.unwrap_or(from_kwh);
    }
    Some(lines)
}

/// `None` on overflow; no lines when the category has no tariff.
fn flat_lines(
    category: TariffCategory,
    usage_kwh: Decimal,
    tariffs: &[TariffEntry],
) -> Option<Vec<BillLine>> {
    let Some(tariff) = tariffs.iter().find(|t| t.category == category) else {
        return Some(Vec::new());
    };
    let amount = usage_kwh.checked_mul(tariff.rate)?;
    Some(vec![BillLine {
        from_kwh: Decimal::ZERO,
        to_kwh: None,
        kwh: usage_kwh,
        rate: tariff.rate,
        amount,
    }])
}
