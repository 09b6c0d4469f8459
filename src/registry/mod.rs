pub mod choice_set;
pub mod token_manager;

pub use choice_set::{ChoiceSet, RegistrySource};
pub use token_manager::{ProbeAuth, ProbeSpec, ServiceEntry, TokenManager};
