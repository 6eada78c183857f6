mod sample;
pub use sample::Sample;

mod series;
pub use series::{DayReadings, Series};
