//! Admin-editable formula configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::FormulaProfile;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    #[error("{profile}.{field} must be a finite, non-negative number (got {value})")]
    InvalidParameter {
        profile: FormulaProfile,
        field: &'static str,
        value: f64,
    },

    #[error("{profile}.{field} must be greater than zero (got {value})")]
    NonPositiveDivisor {
        profile: FormulaProfile,
        field: &'static str,
        value: f64,
    },
}

/// Parameters of one pricing profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormulaParams {
    pub tax_per_liter: f64,
    pub tax_fixed: f64,
    pub shipping_per_case: f64,
    pub margin_divisor: f64,
    pub srp_multiplier: f64,
}

impl FormulaParams {
    pub const WINE: FormulaParams = FormulaParams {
        tax_per_liter: 0.32,
        tax_fixed: 0.15,
        shipping_per_case: 13.0,
        margin_divisor: 0.65,
        srp_multiplier: 1.47,
    };

    pub const SPIRITS: FormulaParams = FormulaParams {
        tax_per_liter: 1.17,
        tax_fixed: 0.15,
        shipping_per_case: 13.0,
        margin_divisor: 0.65,
        srp_multiplier: 1.47,
    };

    pub const NON_ALCOHOLIC: FormulaParams = FormulaParams {
        tax_per_liter: 0.0,
        tax_fixed: 0.0,
        shipping_per_case: 13.0,
        margin_divisor: 0.65,
        srp_multiplier: 1.47,
    };

    pub fn validate(&self, profile: FormulaProfile) -> Result<(), FormulaError> {
        let fields = [
            ("tax_per_liter", self.tax_per_liter),
            ("tax_fixed", self.tax_fixed),
            ("shipping_per_case", self.shipping_per_case),
            ("margin_divisor", self.margin_divisor),
            ("srp_multiplier", self.srp_multiplier),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FormulaError::InvalidParameter { profile, field, value });
            }
        }
        for (field, value) in [
            ("margin_divisor", self.margin_divisor),
            ("srp_multiplier", self.srp_multiplier),
        ] {
            if value <= 0.0 {
                return Err(FormulaError::NonPositiveDivisor { profile, field, value });
            }
        }
        Ok(())
    }
}

/// The process-wide formula configuration, versioned.
///
/// Every accepted change bumps `version`. Prices computed under an older
/// version are stale and must be recomputed before they are served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSet {
    version: u64,
    pub wine: FormulaParams,
    pub spirits: FormulaParams,
    pub non_alcoholic: FormulaParams,
}

impl Default for FormulaSet {
    fn default() -> Self {
        Self {
            version: 1,
            wine: FormulaParams::WINE,
            spirits: FormulaParams::SPIRITS,
            non_alcoholic: FormulaParams::NON_ALCOHOLIC,
        }
    }
}

impl FormulaSet {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn params(&self, profile: FormulaProfile) -> &FormulaParams {
        match profile {
            FormulaProfile::Wine => &self.wine,
            FormulaProfile::Spirits => &self.spirits,
            FormulaProfile::NonAlcoholic => &self.non_alcoholic,
        }
    }

    /// Replace one profile's parameters, producing the next version.
    pub fn with_params(&self, profile: FormulaProfile, params: FormulaParams) -> Result<Self, FormulaError> {
        params.validate(profile)?;
        let mut next = self.clone();
        match profile {
            FormulaProfile::Wine => next.wine = params,
            FormulaProfile::Spirits => next.spirits = params,
            FormulaProfile::NonAlcoholic => next.non_alcoholic = params,
        }
        next.version = self.version + 1;
        Ok(next)
    }

    /// Replace all three profiles at once, producing the next version.
    pub fn replaced(
        &self,
        wine: FormulaParams,
        spirits: FormulaParams,
        non_alcoholic: FormulaParams,
    ) -> Result<Self, FormulaError> {
        wine.validate(FormulaProfile::Wine)?;
        spirits.validate(FormulaProfile::Spirits)?;
        non_alcoholic.validate(FormulaProfile::NonAlcoholic)?;
        Ok(Self {
            version: self.version + 1,
            wine,
            spirits,
            non_alcoholic,
        })
    }
}
