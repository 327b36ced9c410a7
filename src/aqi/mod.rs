pub mod breakpoints;
pub mod category;
pub mod converter;

pub use breakpoints::{Breakpoint, BreakpointTable};
pub use category::{HealthCategory, LabelLanguage};
pub use converter::{concentration_to_index, convert, index_to_concentration, Direction};
