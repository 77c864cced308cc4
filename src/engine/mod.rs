// ABOUTME: Property generation engine for process properties
// ABOUTME: Runs definitions in order, persists results and reports the run outcome

pub mod error;
pub mod executor;
pub mod result;
pub mod store;

pub use error::{ExecutionError, Result, StoreError};
pub use executor::{run, PropertyGenerator};
pub use result::{PropertyResult, PropertyStatus, RunOutcome, RunReport, RunSummary};
pub use store::{InMemoryPropertyStore, PropertyStore, StoredProperty};
