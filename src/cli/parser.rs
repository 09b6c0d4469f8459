//! Argument parsing
//!
//! Builds the clap command from the flag table and turns raw process
//! arguments into a [`ParsedRequest`]. Providers are checked while clap
//! parses, services and the report address right after, so every input
//! error surfaces as one `clap::Error` before anything is dispatched.

use crate::cli::flags::{FLAGS, FlagKind, FlagSpec, normalize_args, requests_version};
use crate::cli::help::{USAGE, render_help};
use crate::core::error::H2vError;
use crate::core::traits::{ChoiceRegistry, VersionInfo};
use crate::security::secret::to_secret;
use crate::validation::choice_validator::validate_choice;
use crate::validation::email_validator::validate_email;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

/// Everything the dispatcher needs from the command line
#[derive(Debug, Default)]
pub struct ParsedRequest {
    pub show_scope: bool,
    pub provider: Option<String>,
    pub service: Option<String>,
    pub secret: Option<SecretString>,
    pub show_response: bool,
    pub report_email: Option<String>,
    pub do_update: bool,
}

/// What the command line asks for
#[derive(Debug)]
pub enum Invocation {
    /// `-v/--version`: print the banner and stop
    Version(String),
    Request(ParsedRequest),
}

/// `How2Validate Tool version <v>`
pub fn version_banner(info: &dyn VersionInfo) -> String {
    format!("How2Validate Tool version {}", info.version())
}

fn build_arg(spec: &FlagSpec, providers: &[String]) -> Arg {
    let mut arg = Arg::new(spec.dest).long(spec.long()).help(spec.help);
    if let Some(short) = spec.short() {
        arg = arg.short(short);
    }

    match spec.kind {
        FlagKind::Switch | FlagKind::Version => arg.action(ArgAction::SetTrue),
        FlagKind::Help => arg.action(ArgAction::Help),
        FlagKind::Value => {
            arg = arg
                .action(ArgAction::Set)
                .value_name(spec.dest.to_uppercase())
                .allow_hyphen_values(true);

            if spec.dest == "provider" {
                let providers = providers.to_vec();
                arg = arg.value_parser(move |value: &str| {
                    validate_choice("provider", value, &providers)
                });
            }
            arg
        }
    }
}

/// Build the clap command for the providers known to `registry`
pub fn build_command(registry: &dyn ChoiceRegistry) -> Command {
    let providers = registry.list_providers();

    FLAGS.iter().fold(
        Command::new("how2validate")
            .override_usage(USAGE)
            .override_help(render_help(FLAGS))
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true),
        |cmd, spec| cmd.arg(build_arg(spec, &providers)),
    )
}

fn check_service(
    cmd: &mut Command,
    registry: &dyn ChoiceRegistry,
    provider: Option<&str>,
    service: &str,
) -> Result<String, clap::Error> {
    let allowed = match provider {
        Some(provider) => registry
            .list_services(provider)
            .unwrap_or_else(|_| registry.list_all_services()),
        None => registry.list_all_services(),
    };

    validate_choice("service", service, &allowed)
        .map_err(|e| cmd.error(ErrorKind::InvalidValue, e))
}

fn check_report(cmd: &mut Command, email: &str) -> Result<String, clap::Error> {
    if validate_email(email) {
        Ok(email.to_string())
    } else {
        Err(cmd.error(
            ErrorKind::ValueValidation,
            H2vError::InvalidEmail {
                candidate: email.to_string(),
            },
        ))
    }
}

fn flag_set(matches: &ArgMatches, dest: &str) -> bool {
    matches.get_flag(dest)
}

/// Parse raw process arguments (program name first).
///
/// # Errors
///
/// Returns the `clap::Error` to print for unknown flags, missing values,
/// unsupported providers or services and malformed report addresses. Help
/// requests also come back as an error of kind `DisplayHelp`, exiting 0.
pub fn parse_request<I, T>(
    args: I,
    registry: &dyn ChoiceRegistry,
    info: &dyn VersionInfo,
) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args = normalize_args(args);
    if requests_version(&args) {
        return Ok(Invocation::Version(version_banner(info)));
    }

    let mut cmd = build_command(registry);
    let matches = cmd.try_get_matches_from_mut(args)?;

    let provider = matches.get_one::<String>("provider").cloned();
    let service = match matches.get_one::<String>("service") {
        Some(service) => Some(check_service(
            &mut cmd,
            registry,
            provider.as_deref(),
            service,
        )?),
        None => None,
    };
    let report_email = match matches.get_one::<String>("report") {
        Some(email) => Some(check_report(&mut cmd, email)?),
        None => None,
    };

    Ok(Invocation::Request(ParsedRequest {
        show_scope: flag_set(&matches, "secretscope"),
        provider,
        service,
        secret: matches
            .get_one::<String>("secret")
            .map(|raw| to_secret(raw)),
        show_response: flag_set(&matches, "response"),
        report_email,
        do_update: flag_set(&matches, "update"),
    }))
}
