// Business logic services layer
//
// The upsert and merge engines operate on in-memory tables; the panel
// service wires them to the table store for the HTTP handlers and the CLI.

pub mod error;
pub mod merge;
pub mod panel;
pub mod upsert;

pub use error::ServiceError;
pub use panel::PanelService;
pub use upsert::UpsertOutcome;
