pub mod json_loader;
pub mod repair;

pub use json_loader::{AddressRecord, JsonLoader, LoadOutcome, ShapePolicy};
pub use repair::repair_missing_commas;
