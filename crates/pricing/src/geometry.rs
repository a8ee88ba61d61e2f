//! Package geometry and lenient numeric parsing of price-list cells.

/// Bottles per case when the price list does not say.
pub const DEFAULT_PACK_SIZE: u32 = 12;

/// Bottle size when the price list does not say.
pub const DEFAULT_BOTTLE_SIZE_ML: f64 = 750.0;

/// Resolved case geometry used by the formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackGeometry {
    pub pack_size: u32,
    pub bottle_size_ml: f64,
}

impl PackGeometry {
    /// Apply defaults for missing, zero or non-finite values.
    pub fn resolve(pack_size: Option<u32>, bottle_size_ml: Option<f64>) -> Self {
        let pack_size = pack_size.filter(|p| *p > 0).unwrap_or(DEFAULT_PACK_SIZE);
        let bottle_size_ml = bottle_size_ml
            .filter(|b| b.is_finite() && *b > 0.0)
            .unwrap_or(DEFAULT_BOTTLE_SIZE_ML);
        Self {
            pack_size,
            bottle_size_ml,
        }
    }

    pub fn case_liters(&self) -> f64 {
        f64::from(self.pack_size) * self.bottle_size_ml / 1000.0
    }
}

/// Leading integer of a pack-size cell ("12", "6pk", "12/750ml").
pub fn parse_pack_size(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|p| *p > 0)
}

/// Bottle size in millilitres ("750", "750ml", "375 mL", "1.5L", "1 liter").
pub fn parse_bottle_size_ml(raw: &str) -> Option<f64> {
    let lowered = raw.trim().to_lowercase();
    let value = leading_number(&lowered)?;
    let is_liters = !lowered.contains("ml")
        && (lowered.ends_with('l') || lowered.contains("lit") || lowered.contains("ltr"));
    let ml = if is_liters { value * 1000.0 } else { value };
    Some(ml).filter(|v| v.is_finite() && *v > 0.0)
}

/// Case cost from a cell that may carry currency symbols or thousands
/// separators ("120", "$1,204.50"). Zero and negative costs count as missing.
pub fn parse_cost(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit() || c == '.')?;
    let number: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse::<f64>().ok()
}
