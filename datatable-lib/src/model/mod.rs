//! Table data model: row access, headers, filters and actions.

mod action;
mod filter;
mod header;
mod record;
mod scalar;

pub use action::*;
pub use filter::*;
pub use header::*;
pub use record::*;
pub use scalar::*;
