pub mod address_set;
pub mod builder;

pub use address_set::{normalize, AddressSet};
pub use builder::{build_set, BuildCounts};
