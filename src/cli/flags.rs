//! Flag table
//!
//! One static description of every command-line flag. The clap command and
//! the help text are both generated from [`FLAGS`].

/// What a flag does when present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Boolean switch, no value
    Switch,
    /// Takes exactly one value
    Value,
    /// Prints the version and stops
    Version,
    /// Prints the help text and stops
    Help,
}

/// Metadata of one flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Destination name (clap argument id)
    pub dest: &'static str,
    /// Accepted spellings, in display order
    pub aliases: &'static [&'static str],
    pub kind: FlagKind,
    pub help: &'static str,
}

impl FlagSpec {
    /// Single-character short form (`-p`)
    pub fn short(&self) -> Option<char> {
        self.aliases.iter().find_map(|alias| {
            let rest = alias.strip_prefix('-')?;
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '-' => Some(c),
                _ => None,
            }
        })
    }

    /// Long form without dashes; falls back to `dest`
    pub fn long(&self) -> &'static str {
        self.aliases
            .iter()
            .find_map(|alias| alias.strip_prefix("--"))
            .unwrap_or(self.dest)
    }

    /// Single-dash multi-letter spellings (`-secretscope`, `-sec`)
    pub fn word_aliases(&self) -> impl Iterator<Item = &'static str> {
        self.aliases
            .iter()
            .copied()
            .filter(|alias| !alias.starts_with("--") && alias.len() > 2)
    }

    pub fn takes_value(&self) -> bool {
        self.kind == FlagKind::Value
    }

    /// Uppercase placeholder for value flags (`<PROVIDER>`)
    pub fn placeholder(&self) -> Option<String> {
        self.takes_value()
            .then(|| format!("<{}>", self.dest.to_uppercase()))
    }

    pub fn matches(&self, token: &str) -> bool {
        self.aliases.contains(&token)
    }
}

/// Every flag of the tool
pub const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        dest: "help",
        aliases: &["-h", "--help"],
        kind: FlagKind::Help,
        help: "Show this help message and exit.",
    },
    FlagSpec {
        dest: "secretscope",
        aliases: &["-secretscope"],
        kind: FlagKind::Switch,
        help: "Explore the secret universe. Your next target awaits.",
    },
    FlagSpec {
        dest: "provider",
        aliases: &["-p", "--provider"],
        kind: FlagKind::Value,
        help: "Specify your provider. Unleash your validation arsenal.",
    },
    FlagSpec {
        dest: "service",
        aliases: &["-s", "--service"],
        kind: FlagKind::Value,
        help: "Specify your target service. Validate your secrets with precision.",
    },
    FlagSpec {
        dest: "secret",
        aliases: &["-sec", "--secret"],
        kind: FlagKind::Value,
        help: "Unveil your secrets to verify their authenticity.",
    },
    FlagSpec {
        dest: "response",
        aliases: &["-r", "--response"],
        kind: FlagKind::Switch,
        help: "Monitor the status. View if your secret is Active or InActive.",
    },
    FlagSpec {
        dest: "report",
        aliases: &["-R", "--report"],
        kind: FlagKind::Value,
        help: "Get detailed reports. Receive validated secrets via email [Alpha Feature].",
    },
    FlagSpec {
        dest: "version",
        aliases: &["-v", "--version"],
        kind: FlagKind::Version,
        help: "Expose the version.",
    },
    FlagSpec {
        dest: "update",
        aliases: &["--update"],
        kind: FlagKind::Switch,
        help: "Hack the tool to the latest version.",
    },
];

/// Look up a flag by its destination name
pub fn flag(dest: &str) -> Option<&'static FlagSpec> {
    FLAGS.iter().find(|spec| spec.dest == dest)
}

/// Position of a token after [`normalize_args`] bookkeeping
enum Position {
    Flag,
    Value,
    Positional,
}

/// Rewrite single-dash word flags into their long form.
///
/// clap reads `-sec` as `-s ec`, so `-secretscope` and `-sec` (also
/// `-sec=value`) become `--secretscope` and `--secret`. Tokens in value
/// position and everything after `--` are left alone. The first element is
/// the program name and is kept as is.
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut iter = args.into_iter().map(Into::into);
    let mut normalized: Vec<String> = iter.next().into_iter().collect();
    let mut position = Position::Flag;

    for token in iter {
        match position {
            Position::Value => {
                normalized.push(token);
                position = Position::Flag;
                continue;
            }
            Position::Positional => {
                normalized.push(token);
                continue;
            }
            Position::Flag => {}
        }

        if token == "--" {
            normalized.push(token);
            position = Position::Positional;
            continue;
        }

        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (token.clone(), None),
        };

        let spec = FLAGS.iter().find(|spec| spec.matches(&name));
        let rewritten = match spec {
            Some(spec) if spec.word_aliases().any(|alias| alias == name) => {
                let long = format!("--{}", spec.long());
                match &inline_value {
                    Some(value) => format!("{}={}", long, value),
                    None => long,
                }
            }
            _ => token,
        };

        if let Some(spec) = spec
            && spec.takes_value()
            && inline_value.is_none()
        {
            position = Position::Value;
        }

        normalized.push(rewritten);
    }

    normalized
}

/// Whether the arguments ask for the version (in flag position).
///
/// Expects arguments already passed through [`normalize_args`].
pub fn requests_version(args: &[String]) -> bool {
    let mut expecting_value = false;

    for token in args.iter().skip(1) {
        if expecting_value {
            expecting_value = false;
            continue;
        }
        if token == "--" {
            return false;
        }
        if let Some(spec) = FLAGS.iter().find(|spec| spec.matches(token)) {
            match spec.kind {
                FlagKind::Version => return true,
                FlagKind::Value => expecting_value = true,
                _ => {}
            }
        }
    }

    false
}
