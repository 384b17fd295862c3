//! Command-line interface for ktwrap.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::Config;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to wrap
    pub inputs: Vec<PathBuf>,

    /// Maximum line length
    pub max_line_length: Option<usize>,

    /// Number of spaces per indent level
    pub indent: Option<usize>,

    /// Manual-review marker text
    pub marker: Option<String>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Report over-long lines without modifying files
    pub check: bool,

    /// Keep a `.org` copy of rewritten files
    pub backup: bool,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (no output)
    pub silent: bool,

    /// Enable debug logging
    pub debug: bool,
}

impl CliArgs {
    /// Override `config` with the options given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(max_line_length) = self.max_line_length {
            config.max_line_length = max_line_length;
        }
        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        if let Some(marker) = &self.marker {
            config.marker.clone_from(marker);
        }
        if self.backup {
            config.backup = true;
        }
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("ktwrap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Wraps over-long lines of Kotlin source code")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to wrap (- for stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("max-line-length")
                .short('l')
                .long("max-line-length")
                .help("Maximum line length, 0 disables wrapping [default: 100]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Number of spaces per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .help("Comment text placed above lines that need manual reformatting [default: TODO: Reformat]")
                .value_name("TEXT"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report over-long lines without modifying files; exit with 1 if any")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("backup")
                .short('b')
                .long("backup")
                .help("Keep a copy of each rewritten file as <file>.org")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively process directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug logging (config discovery, wrapped lines)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        max_line_length: matches.get_one::<usize>("max-line-length").copied(),
        indent: matches.get_one::<usize>("indent").copied(),
        marker: matches.get_one::<String>("marker").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        stdout: matches.get_flag("stdout"),
        check: matches.get_flag("check"),
        backup: matches.get_flag("backup"),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        assert_eq!(cmd.get_name(), "ktwrap");
        cmd.debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse_args_from(vec!["ktwrap"]);
        assert!(args.inputs.is_empty());
        assert_eq!(args.max_line_length, None);
        assert_eq!(args.indent, None);
        assert!(!args.stdout);
        assert!(!args.check);
        assert!(!args.backup);
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn test_width_and_indent() {
        let args = parse_args_from(vec!["ktwrap", "-l", "120", "-i", "2", "Main.kt"]);
        assert_eq!(args.max_line_length, Some(120));
        assert_eq!(args.indent, Some(2));
        assert_eq!(args.inputs, vec![PathBuf::from("Main.kt")]);
    }

    #[test]
    fn test_long_flags() {
        let args = parse_args_from(vec![
            "ktwrap",
            "--max-line-length",
            "80",
            "--check",
            "--backup",
            "--recursive",
            "--silent",
            "--debug",
            "src",
        ]);
        assert_eq!(args.max_line_length, Some(80));
        assert!(args.check);
        assert!(args.backup);
        assert!(args.recursive);
        assert!(args.silent);
        assert!(args.debug);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = parse_args_from(vec![
            "ktwrap", "-e", "build", "-e", "*Generated.kt", "-r", "src",
        ]);
        assert_eq!(args.exclude, vec!["build", "*Generated.kt"]);
    }

    #[test]
    fn test_jobs_and_marker() {
        let args = parse_args_from(vec!["ktwrap", "-j", "1", "--marker", "FIXME", "A.kt"]);
        assert_eq!(args.jobs, Some(1));
        assert_eq!(args.marker.as_deref(), Some("FIXME"));
    }

    #[test]
    fn test_apply_to_config() {
        let args = parse_args_from(vec!["ktwrap", "-l", "90", "-b", "A.kt"]);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.max_line_length, 90);
        assert_eq!(config.indent, 4);
        assert!(config.backup);
    }
}
