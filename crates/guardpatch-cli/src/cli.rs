//! Argument parsing

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Which subcommand was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Patch the file
    Apply,
    /// Report pending patches without writing
    Check,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Subcommand
    pub mode: Mode,
    /// Plan file
    pub plan: PathBuf,
    /// File override; falls back to the plan's `file`
    pub file: Option<PathBuf>,
    /// Never write
    pub dry_run: bool,
    /// Treat any skipped target as an error
    pub strict: bool,
    /// Print the report as JSON
    pub json: bool,
    /// `-v` count
    pub verbose: u8,
}

fn plan_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("plan")
            .long("plan")
            .short('p')
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Plan file (.toml, .yaml, .yml or .json)"),
    )
    .arg(
        Arg::new("file")
            .long("file")
            .short('f')
            .value_parser(value_parser!(PathBuf))
            .help("File to patch; overrides the plan's `file`"),
    )
    .arg(
        Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help("Fail if any target does not match, leaving the file untouched"),
    )
}

/// Build the `guardpatch` command
#[must_use]
pub fn command() -> Command {
    Command::new("guardpatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Insert guard statements before pattern-checked source lines")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
        .subcommand(
            plan_args(Command::new("apply").about("Apply a plan to its file")).arg(
                Arg::new("dry-run")
                    .long("dry-run")
                    .action(ArgAction::SetTrue)
                    .help("Report what would change without writing"),
            ),
        )
        .subcommand(plan_args(
            Command::new("check").about("Exit 1 if any target in the plan is still pending"),
        ))
}

impl Invocation {
    /// Extract an invocation from parsed matches
    ///
    /// # Errors
    /// Returns error if no known subcommand was given
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let (mode, args) = match matches.subcommand() {
            Some(("apply", args)) => (Mode::Apply, args),
            Some(("check", args)) => (Mode::Check, args),
            Some((other, _)) => bail!("unknown subcommand '{other}'"),
            None => bail!("no subcommand given"),
        };

        let plan = args
            .get_one::<PathBuf>("plan")
            .cloned()
            .context("--plan is required")?;

        let dry_run = match mode {
            Mode::Apply => args.get_flag("dry-run"),
            Mode::Check => true,
        };

        Ok(Self {
            mode,
            plan,
            file: args.get_one::<PathBuf>("file").cloned(),
            dry_run,
            strict: args.get_flag("strict"),
            json: args.get_flag("json"),
            verbose: args.get_count("verbose"),
        })
    }

    /// Parse from an argument list (first item is the program name)
    ///
    /// # Errors
    /// Returns error if clap rejects the arguments
    pub fn parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn apply_with_all_flags() {
        let inv = Invocation::parse_from([
            "guardpatch", "-vv", "apply", "--plan", "fix.toml", "--file", "calc.go", "--dry-run",
            "--strict", "--json",
        ])
        .unwrap();

        assert_eq!(inv.mode, Mode::Apply);
        assert_eq!(inv.plan, PathBuf::from("fix.toml"));
        assert_eq!(inv.file, Some(PathBuf::from("calc.go")));
        assert!(inv.dry_run && inv.strict && inv.json);
        assert_eq!(inv.verbose, 2);
    }

    #[test]
    fn check_is_always_a_dry_run() {
        let inv = Invocation::parse_from(["guardpatch", "check", "-p", "fix.yaml"]).unwrap();
        assert_eq!(inv.mode, Mode::Check);
        assert!(inv.dry_run);
        assert!(!inv.strict);
        assert_eq!(inv.file, None);
    }

    #[test]
    fn plan_is_required() {
        assert!(Invocation::parse_from(["guardpatch", "apply"]).is_err());
    }
}
