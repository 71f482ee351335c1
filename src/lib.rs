//! Date-range presets for the back office period filters.
//!
//! A preset such as "current quarter" is resolved against a reference instant in the business
//! timezone into an inclusive `[from, to]` pair of calendar dates, and a hand-edited pair can be
//! mapped back onto a preset label.

pub mod common;
pub mod config;
pub mod filter;
pub mod preset;
pub mod range;
pub mod resolver;
mod util;

pub use crate::common::{Error, Result};
pub use crate::filter::PeriodFilter;
pub use crate::preset::Preset;
pub use crate::range::DateRange;
pub use crate::resolver::{detect_preset, resolve, PresetRangeResolver};
