//! Command-line surface: flag table, help screen and argument parsing

pub mod flags;
pub mod help;
pub mod parser;

pub use flags::{FLAGS, FlagKind, FlagSpec, normalize_args};
pub use help::render_help;
pub use parser::{Invocation, ParsedRequest, build_command, parse_request, version_banner};
