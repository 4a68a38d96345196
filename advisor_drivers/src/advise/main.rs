use std::process::ExitCode;

use bj_advisor::card::parse_cards;
use bj_advisor::{AdvisorError, Rules};
use bj_advisor_drivers::{advise, parse_config_from_file, Config, DriverError, OutputFormat};
use clap::Parser;

const DEFAULT_CONFIG_PATH: &str = "~/.bj_advisor.yml";
const DEFAULT_CONFIG_FILE_NAME: &str = ".bj_advisor.yml";

/// Prints the count and the recommended play for one hand.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Cards seen since the last shuffle, not counting the hand and the upcard
    #[arg(short, long, default_value_t = String::new())]
    seen: String,

    /// The player's cards, e.g. "T,6"
    #[arg(long)]
    hand: String,

    /// The dealer upcard
    #[arg(short, long)]
    dealer: String,
}

/// Loads the config, or the built-in defaults when the default file is absent.
fn load_config(path: &str) -> Result<Config, DriverError> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    match home::home_dir().map(|home_dir| home_dir.join(DEFAULT_CONFIG_FILE_NAME)) {
        Some(config_file_path) if config_file_path.is_file() => {
            parse_config_from_file(&config_file_path.to_string_lossy())
        }
        _ => {
            log::info!("no config file at {}, using default rules", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
    }
}

fn run(args: &CommandLineArgs) -> Result<String, DriverError> {
    let config = load_config(&args.config)?;
    let rules: Rules = config.rules.try_into()?;
    let format = config.output.format()?;

    let seen = parse_cards(&args.seen)?;
    let hand = parse_cards(&args.hand)?;
    let dealer = match parse_cards(&args.dealer)?.as_slice() {
        [card] => *card,
        _ => return Err(AdvisorError::InvalidRank(args.dealer.clone()).into()),
    };

    let report = advise(&rules, &seen, &hand, dealer)?;
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
        OutputFormat::Text => Ok(report.to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CommandLineArgs::parse();
    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
