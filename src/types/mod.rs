//! Shared data structures for the irrigation advisor
//!
//! - `Reading` / `ReadingInput`: operator inputs and their validation
//! - `Decision` / `DecisionReport`: engine outputs

mod decision;
mod reading;

pub use decision::*;
pub use reading::*;
