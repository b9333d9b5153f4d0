//! Records: coerced rows and the traits for extending them.

mod computed;
mod row;
mod traits;

pub use computed::{ComputeError, Computed, checked_div, checked_powf, compute};
pub use row::{Row, coerce};
pub use traits::{FromRow, Record};
