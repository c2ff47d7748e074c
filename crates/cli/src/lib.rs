pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "leadflow",
    about = "Leadflow operator CLI",
    long_about = "Evaluate the lead routing engine offline and inspect effective configuration.",
    after_help = "Examples:\n  leadflow route --step erp --answer '{\"erpSystem\":\"netsuite\"}'\n  leadflow score --profile '{\"numberOfEmployees\":\">300\"}'\n  leadflow config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Route one answer submission and print the resulting decision as JSON")]
    Route {
        #[arg(long, help = "Current step, addressed by slug (e.g. registration-country)")]
        step: String,
        #[arg(long, help = "Answer payload as JSON, shape mirrors the lead profile")]
        answer: String,
        #[arg(long, help = "Previously accumulated profile as JSON (defaults to empty)")]
        profile: Option<String>,
    },
    #[command(about = "Score a lead profile and print the score and the matching demo tier")]
    Score {
        #[arg(long, help = "Lead profile as JSON")]
        profile: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Route { step, answer, profile } => {
            commands::route::run(&step, &answer, profile.as_deref())
        }
        Command::Score { profile } => commands::score::run(&profile),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
