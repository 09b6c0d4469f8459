pub mod choice_validator;
pub mod email_validator;

pub use choice_validator::{format_service, validate_choice};
pub use email_validator::validate_email;
