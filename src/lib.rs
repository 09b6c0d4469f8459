pub mod cli;
pub mod core;
pub mod orchestration;
pub mod registry;
pub mod security;
pub mod validation;
pub mod validators;

pub use cli::{Invocation, ParsedRequest, parse_request};
pub use crate::core::*;
pub use orchestration::{CargoUpdater, DispatchReport, Dispatcher, Mode, ValidationOrchestrator};
pub use registry::{ChoiceSet, RegistrySource, TokenManager};
pub use security::{CommandError, SafeCommandExecutor, redact_secret};
pub use validators::ServiceHandlers;
