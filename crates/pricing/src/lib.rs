//! Pricing formula engine.
//!
//! Turns a supplier's FOB case cost plus package geometry and category into
//! the regulated sell-price ladder (laid-in, wholesale case/bottle, SRP,
//! frontline). Everything here is pure; formula parameters are passed in as an
//! explicit, versioned [`FormulaSet`].

pub mod category;
pub mod formula;
pub mod geometry;
pub mod price;

pub use category::{CATEGORY_RULES, CategoryRule, FormulaProfile, classify};
pub use formula::{FormulaError, FormulaParams, FormulaSet};
pub use geometry::{
    DEFAULT_BOTTLE_SIZE_ML, DEFAULT_PACK_SIZE, PackGeometry, parse_bottle_size_ml, parse_cost,
    parse_pack_size,
};
pub use price::{PriceBreakdown, compute_price};
