pub mod constants;
pub mod date_range;
pub mod dates;
pub mod filename;
pub mod progress;
pub mod rounding;

pub use constants::*;
pub use date_range::DateRange;
pub use dates::parse_day_first;
pub use filename::generate_default_output_filename;
pub use progress::ProgressReporter;
pub use rounding::{round_half_even, round_to};
