//! Command-line parsing for registered flags, built on clap's runtime API.
//!
//! Every flag becomes a long option named after the flag (`--partest`,
//! `--test.v`). Value flags take `--name=value` or `--name value`. Boolean
//! flags take `--name` for `true` or `--name=<bool>` for an explicit value.
//!
//! Parsing stops at the first positional argument: it and everything after
//! it are returned untouched. Only flags that appear on the command line are
//! applied, so values already set from defaults or a config file survive.

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use crate::error::FlagfigError;
use crate::flag::FlagSet;
use crate::types::FlagKind;

const REMAINING: &str = "__remaining";

/// Names clap already uses for its own arguments.
const RESERVED: [&str; 2] = ["help", REMAINING];

/// Check that `name` can be used as a long option.
pub fn check_flag_name(name: &str) -> Result<(), FlagfigError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if RESERVED.contains(&name) {
        "name is reserved"
    } else if name.starts_with('-') {
        "name cannot start with '-'"
    } else if name.contains(|c: char| c == '=' || c.is_whitespace()) {
        "name cannot contain '=' or whitespace"
    } else {
        return Ok(());
    };
    Err(FlagfigError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Build the clap command for a flag set.
pub fn command(prog_name: &str, flags: &FlagSet<'_>) -> Command {
    let mut cmd = Command::new(prog_name.to_string())
        .no_binary_name(true)
        .args_override_self(true)
        .arg(
            Arg::new(REMAINING)
                .num_args(0..)
                .trailing_var_arg(true)
                .value_parser(clap::value_parser!(String))
                .hide(true),
        );

    for flag in flags.iter() {
        let name = flag.name().to_string();
        let mut arg = Arg::new(name.clone())
            .long(name)
            .help(flag.description().to_string())
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(String));

        arg = match flag.kind() {
            FlagKind::Bool => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            FlagKind::String => arg.num_args(1).value_name("STRING"),
            FlagKind::Int => arg.num_args(1).value_name("INT").allow_negative_numbers(true),
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Parse `args` (without the program name) and apply every flag given.
///
/// Returns the positional arguments that stopped parsing.
pub fn parse_args<I, T>(
    prog_name: &str,
    flags: &mut FlagSet<'_>,
    args: I,
) -> Result<Vec<String>, FlagfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(prog_name, flags).try_get_matches_from(args)?;

    for flag in flags.iter_mut() {
        if matches.value_source(flag.name()) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let Some(raw) = matches.get_one::<String>(flag.name()) {
            tracing::trace!("command line sets '{}' = '{raw}'", flag.name());
            flag.set(raw)?;
        }
    }

    Ok(matches
        .get_many::<String>(REMAINING)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default())
}

/// Usage text for a flag set.
pub fn render_help(prog_name: &str, flags: &FlagSet<'_>) -> String {
    command(prog_name, flags).render_help().to_string()
}
