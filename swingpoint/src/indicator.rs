pub mod atr;
pub mod core;
pub mod tr_delta;

pub use atr::{Atr, add_atr_column, true_range_shifted};
pub use core::Indicator;
pub use tr_delta::{TrDelta, add_tr_delta_column};
