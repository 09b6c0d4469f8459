//! Orchestration layer
//!
//! Routes a parsed command line to the update, scope listing or validation
//! action and runs it against the collaborator traits.

pub mod dispatcher;
pub mod scope;
pub mod updater;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{DispatchReport, Dispatcher, Mode, select_mode};
pub use scope::render_scope;
pub use updater::CargoUpdater;
pub use validator::ValidationOrchestrator;
