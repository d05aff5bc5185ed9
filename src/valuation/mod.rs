//! Present value of lease payment streams

mod discount;

pub use discount::{present_value, LeaseDiscount};
