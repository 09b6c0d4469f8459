//! Help text rendering
//!
//! The help screen is rendered by hand from the flag table so that it never
//! lists the valid providers or services.

use crate::cli::flags::FlagSpec;

pub const HEADER: &str = "How2Validate Tool\n\nValidate various types of secrets for different services.";
pub const USAGE: &str = "how2validate [options]";
pub const EPILOG: &str = "Ensuring the authenticity of your secrets.";

/// Left column of one flag row (`-p, --provider <PROVIDER>`)
pub fn invocation(spec: &FlagSpec) -> String {
    let aliases = spec.aliases.join(", ");
    match spec.placeholder() {
        Some(placeholder) => format!("{} {}", aliases, placeholder),
        None => aliases,
    }
}

/// Render the complete help screen for `flags`
pub fn render_help(flags: &[FlagSpec]) -> String {
    let rows: Vec<(String, &str)> = flags
        .iter()
        .map(|spec| (invocation(spec), spec.help))
        .collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");
    out.push_str(&format!("usage: {}\n\n", USAGE));
    out.push_str("options:\n");
    for (left, help) in rows {
        out.push_str(&format!("  {:<width$}  {}\n", left, help, width = width));
    }
    out.push('\n');
    out.push_str(EPILOG);
    out.push('\n');

    out
}
