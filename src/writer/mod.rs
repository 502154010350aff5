pub mod json_writer;
pub mod report;

pub use json_writer::{read_exclusion_set, write_address_set, write_statistics};
pub use report::{PipelineReport, StatsRunReport};
