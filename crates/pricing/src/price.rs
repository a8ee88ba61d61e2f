//! The price ladder.

use serde::{Deserialize, Serialize};

use crate::category::{FormulaProfile, classify};
use crate::formula::FormulaSet;
use crate::geometry::PackGeometry;

/// Derived sell prices for one product, rounded to cents.
///
/// `formula_version` records which [`FormulaSet`] produced the numbers so a
/// stored breakdown can be recognised as stale after an admin edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub profile: FormulaProfile,
    pub formula_version: u64,
    pub laid_in: f64,
    pub wholesale_case: f64,
    pub wholesale_bottle: f64,
    pub srp: f64,
    pub frontline: f64,
    pub frontline_case: f64,
}

impl PriceBreakdown {
    /// All-zero ladder for rows without a usable cost.
    pub fn unpriced(profile: FormulaProfile, formula_version: u64) -> Self {
        Self {
            profile,
            formula_version,
            laid_in: 0.0,
            wholesale_case: 0.0,
            wholesale_bottle: 0.0,
            srp: 0.0,
            frontline: 0.0,
            frontline_case: 0.0,
        }
    }

    pub fn is_current(&self, formulas: &FormulaSet) -> bool {
        self.formula_version == formulas.version()
    }
}

/// Compute the price ladder.
///
/// Intermediate values stay at full precision; rounding to cents happens only
/// on the returned fields. A cost that is zero, negative or non-finite yields
/// [`PriceBreakdown::unpriced`].
pub fn compute_price(
    cost: f64,
    pack_size: Option<u32>,
    bottle_size_ml: Option<f64>,
    category: &str,
    formulas: &FormulaSet,
) -> PriceBreakdown {
    let profile = classify(category);
    if !cost.is_finite() || cost <= 0.0 {
        return PriceBreakdown::unpriced(profile, formulas.version());
    }

    let f = formulas.params(profile);
    let geometry = PackGeometry::resolve(pack_size, bottle_size_ml);
    let pack = f64::from(geometry.pack_size);

    let tax = geometry.case_liters() * f.tax_per_liter + f.tax_fixed;
    let laid_in = cost + f.shipping_per_case + tax;
    let wholesale_case = laid_in / f.margin_divisor;
    let wholesale_bottle = wholesale_case / pack;
    let srp = (wholesale_bottle * f.srp_multiplier).ceil() - 0.01;
    let frontline = srp / f.srp_multiplier;

    PriceBreakdown {
        profile,
        formula_version: formulas.version(),
        laid_in: round_cents(laid_in),
        wholesale_case: round_cents(wholesale_case),
        wholesale_bottle: round_cents(wholesale_bottle),
        srp: round_cents(srp),
        frontline: round_cents(frontline),
        frontline_case: round_cents(frontline * pack),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
