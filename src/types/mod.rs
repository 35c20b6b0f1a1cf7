//! Data types for the canvas data grid.

mod column;
mod events;
mod options;
mod row;

pub use column::*;
pub use events::*;
pub use options::*;
pub use row::*;
