pub mod helpers;
pub mod units;
