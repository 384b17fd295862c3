//! ktwrap - Wraps over-long lines of Kotlin source code

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use env_logger::Env;
use glob::Pattern;
use ktwrap::process::{check_file, format_file};
use ktwrap::{parse_args, CliArgs, Config, Result};
use log::{debug, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Kotlin file extensions to process
const KOTLIN_EXTENSIONS: &[&str] = &["kt", "kts"];

/// Files larger than this are skipped (100 MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(&args);

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        let config = build_config(&args, None)?;
        let flagged = process_stdin(&config, &args)?;
        if args.check && flagged > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    // An explicit config file applies to every file; otherwise each file
    // discovers its own
    let base_config = match &args.config {
        Some(_) => Some(build_config(&args, None)?),
        None => None,
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No Kotlin files found.");
        }
        return Ok(());
    }

    let flagged = if args.stdout || args.jobs == Some(1) {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    if args.check && flagged > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialise `env_logger`; `--debug` raises the default level
fn init_logging(args: &CliArgs) {
    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Build configuration from CLI args and optional config file
///
/// Without an explicit `--config`, config files are discovered from the
/// ancestors of `for_path` (or the current directory).
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!("using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            debug!("no config files discovered for {}", start.display());
        }
        for f in &discovered {
            debug!("discovered config file: {}", f.display());
        }
        Config::from_discovered_files(&start)
    };

    args.apply_to(&mut config);
    debug!("configuration: {config:?}");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }
    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let mut files = Vec::new();
    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let max_depth = if args.recursive { 256 } else { 1 };
            for entry in WalkDir::new(input)
                .follow_links(true)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                let path = entry.path();
                if path.is_file() && is_kotlin_file(path) && !is_excluded(path, &exclude_patterns) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            warn!("{}: no such file or directory", input.display());
        }
    }
    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

fn is_kotlin_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| KOTLIN_EXTENSIONS.contains(&ext))
}

/// Config for one file: the shared one, or discovered next to the file
fn config_for(path: &Path, base_config: Option<&Config>, args: &CliArgs) -> Result<Config> {
    match base_config {
        Some(config) => Ok(config.clone()),
        None => build_config(args, Some(path)),
    }
}

/// Process files one after another; returns the number of flagged lines
fn process_files_sequential(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) -> usize {
    let mut flagged = 0;
    for path in files {
        match config_for(path, base_config, args).and_then(|c| process_single_file(path, &c, args)) {
            Ok(n) => flagged += n,
            Err(e) => eprintln!("Error processing {}: {e}", path.display()),
        }
    }
    flagged
}

/// Process files in parallel using Rayon; returns the number of flagged lines
fn process_files_parallel(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) -> usize {
    let flagged = AtomicUsize::new(0);
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match config_for(path, base_config, args).and_then(|c| process_single_file(path, &c, args)) {
            Ok(n) => {
                flagged.fetch_add(n, Ordering::Relaxed);
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error processing {}: {e}", path.display());
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);
    if !args.silent && !args.check {
        if errors == 0 {
            eprintln!("Processed {success} files successfully.");
        } else {
            eprintln!("Processed {success} files, {errors} errors.");
        }
    }
    flagged.load(Ordering::Relaxed)
}

/// `<file>.org`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".org");
    PathBuf::from(name)
}

/// Process a single file
///
/// Returns the number of lines that still need attention: over-long lines in
/// check mode, lines marked for manual reformatting otherwise.
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<usize> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(0);
    }

    let mut contents = Vec::new();
    File::open(path)?.read_to_end(&mut contents)?;
    let name = path.display().to_string();

    if args.check {
        let violations = check_file(BufReader::new(Cursor::new(&contents)), config, &name)?;
        if !args.silent {
            for v in &violations {
                println!("{name}:{}: {}", v.line, v.message());
            }
        }
        return Ok(violations.len());
    }

    let mut output = Vec::new();
    let report = format_file(
        BufReader::new(Cursor::new(&contents)),
        &mut output,
        config,
        &name,
    )?;

    if args.stdout {
        io::stdout().lock().write_all(&output)?;
    } else if output != contents {
        if config.backup {
            std::fs::write(backup_path(path), &contents)?;
        }
        std::fs::write(path, &output)?;
        debug!("{name}: {} lines wrapped", report.wrapped);
    }

    if report.unhandled > 0 && !args.silent {
        eprintln!(
            "{} lines of {name} need to be reformatted",
            report.unhandled
        );
    }
    Ok(report.unhandled)
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<usize> {
    let mut contents = Vec::new();
    io::stdin().read_to_end(&mut contents)?;

    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    if args.check {
        let violations = check_file(BufReader::new(Cursor::new(&contents)), config, "stdin")?;
        if !args.silent {
            for v in &violations {
                println!("stdin:{}: {}", v.line, v.message());
            }
        }
        return Ok(violations.len());
    }

    let mut output = Vec::new();
    let report = format_file(BufReader::new(Cursor::new(&contents)), &mut output, config, "stdin")?;
    io::stdout().write_all(&output)?;

    if report.unhandled > 0 && !args.silent {
        eprintln!("{} lines of stdin need to be reformatted", report.unhandled);
    }
    Ok(report.unhandled)
}

fn print_usage() {
    println!(
        "ktwrap v{} - wraps over-long lines of Kotlin source code",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  ktwrap [OPTIONS] <FILE>...");
    println!("  ktwrap [OPTIONS] -r <DIRECTORY>");
    println!("  ktwrap [OPTIONS] -              # Read from stdin");
    println!();
    println!("Examples:");
    println!("  ktwrap Main.kt                  # Wrap a single file in-place");
    println!("  ktwrap -r src/                  # Recursively wrap a directory");
    println!("  ktwrap --check -r src/          # Report over-long lines only");
    println!("  ktwrap -l 120 -i 2 Main.kt      # 120 columns, 2-space indent");
    println!();
    println!("Options:");
    println!("  -l, --max-line-length <NUM>     Max line length, 0 disables [default: 100]");
    println!("  -i, --indent <NUM>              Indent size [default: 4]");
    println!("      --marker <TEXT>             Manual-review comment [default: TODO: Reformat]");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("  -s, --stdout                    Output to stdout");
    println!("      --check                     Report over-long lines, exit 1 if any");
    println!("  -b, --backup                    Keep <file>.org copies of rewritten files");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -S, --silent                    Silent mode");
    println!("  -D, --debug                     Debug logging");
    println!("  -h, --help                      Print help");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for ktwrap.toml in the home directory and in every");
    println!("  parent directory of the file being wrapped. More specific");
    println!("  configs (closer to the file) override less specific ones.");
    println!("  A `// ktwrap: ...` comment in the file overrides both.");
}
