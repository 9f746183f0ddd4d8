//! Desktop host for the Sarkaz score calculator.
//!
//! Provides the JSON file commands a hosted page saves through, a
//! [`FileStorage`] that plugs them into the core save/load contract, and the
//! console rendering used by the `sarkaz-desk` binary.

pub mod host;
pub mod report;
pub mod storage;

pub use host::{HostError, read_json, with_json_extension, write_json};
pub use storage::FileStorage;
