pub mod command_executor;
pub mod secret;

pub use command_executor::{CommandError, SafeCommandExecutor};
pub use secret::{redact, redact_secret, to_secret};
