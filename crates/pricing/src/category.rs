//! Category → formula profile detection.
//!
//! The rule set is plain data: an ordered table of (substring, profile) pairs
//! evaluated top to bottom against the lowercased category text. The first
//! matching rule wins; no match selects [`FormulaProfile::Wine`].

use serde::{Deserialize, Serialize};

/// Which formula parameters a product is priced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaProfile {
    Wine,
    Spirits,
    NonAlcoholic,
}

impl FormulaProfile {
    pub const ALL: [FormulaProfile; 3] = [
        FormulaProfile::Wine,
        FormulaProfile::Spirits,
        FormulaProfile::NonAlcoholic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormulaProfile::Wine => "wine",
            FormulaProfile::Spirits => "spirits",
            FormulaProfile::NonAlcoholic => "non_alcoholic",
        }
    }
}

impl core::fmt::Display for FormulaProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Lowercase substring searched for in the category text.
    pub needle: &'static str,
    pub profile: FormulaProfile,
}

const fn rule(needle: &'static str, profile: FormulaProfile) -> CategoryRule {
    CategoryRule { needle, profile }
}

/// Detection rules in evaluation order. Spirits keywords come first, so
/// "non-alc spirit" prices as spirits.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    rule("spirit", FormulaProfile::Spirits),
    rule("liquor", FormulaProfile::Spirits),
    rule("vodka", FormulaProfile::Spirits),
    rule("whiskey", FormulaProfile::Spirits),
    rule("whisky", FormulaProfile::Spirits),
    rule("bourbon", FormulaProfile::Spirits),
    rule("rum", FormulaProfile::Spirits),
    rule("gin", FormulaProfile::Spirits),
    rule("tequila", FormulaProfile::Spirits),
    rule("non-alc", FormulaProfile::NonAlcoholic),
    rule("non alc", FormulaProfile::NonAlcoholic),
    rule("na ", FormulaProfile::NonAlcoholic),
    rule("juice", FormulaProfile::NonAlcoholic),
    rule("soda", FormulaProfile::NonAlcoholic),
];

/// Classify with the built-in rule table.
pub fn classify(category: &str) -> FormulaProfile {
    classify_with(CATEGORY_RULES, category)
}

/// Classify against an arbitrary ordered rule table.
pub fn classify_with(rules: &[CategoryRule], category: &str) -> FormulaProfile {
    let lowered = category.to_lowercase();
    rules
        .iter()
        .find(|r| lowered.contains(r.needle))
        .map(|r| r.profile)
        .unwrap_or(FormulaProfile::Wine)
}
