//! Command line options for the simulation driver.
//! `--steps {n}` random steps, `--seed {s}` for a reproducible run.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Options {
    pub steps: u64,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub matrix: bool,
}

fn make_options_parser() -> Command {
    Command::new("coffee-pn")
        .version("v0.1.0")
        .about("Random-walk simulation of the coffee-vending machine place/transition net")
        .arg(
            Arg::new("steps")
                .short('n')
                .long("steps")
                .help("Number of random steps to attempt")
                .value_parser(clap::value_parser!(u64))
                .default_value("25"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .help("RNG seed for a reproducible run")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML file with the initial stock levels"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path to file where the execution log will be stored as JSON"),
        )
        .arg(
            Arg::new("matrix")
                .long("matrix")
                .action(ArgAction::SetTrue)
                .help("Print the incidence matrix C = Post - Pre and exit"),
        )
}

impl Options {
    pub fn from_args() -> Self {
        Self::from_matches(&make_options_parser().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            steps: matches.get_one::<u64>("steps").copied().unwrap_or(25),
            seed: matches.get_one::<u64>("seed").copied(),
            config: matches.get_one::<String>("config").map(PathBuf::from),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            matrix: matches.get_flag("matrix"),
        }
    }
}
