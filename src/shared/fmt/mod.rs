//! Human-readable formatting for chart readouts.

pub mod datetime;
pub mod price;

pub use datetime::{format_datetime, DatetimeFormat};
pub use price::{format_price, group_thousands};
