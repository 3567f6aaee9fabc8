pub mod stat_compare;
pub mod tier;

pub use stat_compare::{compare, compare_raw, format_fixed, stat_rows, StatComparison, StatRow};
pub use tier::{Tier, TierTable};
