//! scoped-preflight
//!
//! Writes the baseline reset scoped by each given configuration.

use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;

use scoped_preflight_cli::{init_logging, run, version, write_outputs, RunOptions, LOG_ENV};

fn main() {
    let matches = Command::new("scoped-preflight")
        .version(version())
        .about("Scope a baseline CSS reset to a container, components, or outside of a container")
        .after_help(format!("Log filter is read from {} (default: warn).", LOG_ENV))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .action(ArgAction::Append)
                .help("JSON configuration file; repeat for several outputs"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("PATH")
                .help("Stylesheet to rewrite instead of the embedded preflight"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output file for a single config; overrides its \"output\" key"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log rewrite details"),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let options = RunOptions {
        configs: matches
            .get_many::<String>("config")
            .map(|paths| paths.map(PathBuf::from).collect())
            .unwrap_or_default(),
        input: matches.get_one::<String>("input").map(PathBuf::from),
        output: matches.get_one::<String>("output").map(PathBuf::from),
    };

    if let Err(err) = run(&options).and_then(|outputs| write_outputs(&outputs)) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
