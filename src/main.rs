use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use std::env;
use std::process;
use tessera::cli::commands::generate::{GenerateCommand, GenerateCommandHandler};
use tessera::cli::commands::init::{InitCommand, InitCommandHandler};
use tessera::cli::commands::summary::{SummaryCommand, SummaryCommandHandler};
use tessera::cli::commands::validate::{ValidateCommand, ValidateCommandHandler};
use tessera::cli::{Cli, Commands};
use tessera::core::naming::LOG_TARGET;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    match run_command(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// トレーシングを初期化する（RUST_LOG が --verbose より優先）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// コマンドを実行する
fn run_command(cli: Cli) -> Result<String> {
    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;
    let config_path = cli.config;

    match cli.command {
        Commands::Init { force } => {
            let handler = InitCommandHandler::new();
            let command = InitCommand {
                project_path,
                force,
            };
            handler.execute(&command)
        }

        Commands::Summary { input, json } => {
            let handler = SummaryCommandHandler::new();
            let command = SummaryCommand {
                project_path,
                config_path,
                input,
                json,
            };
            handler.execute(&command)
        }

        Commands::Generate {
            target,
            input,
            base,
            output,
            stdout,
        } => {
            let handler = GenerateCommandHandler::new();
            let command = GenerateCommand {
                project_path,
                config_path,
                target,
                input,
                base,
                output,
                stdout,
            };
            handler.execute(&command)
        }

        Commands::Validate { input } => {
            let handler = ValidateCommandHandler::new();
            let command = ValidateCommand {
                project_path,
                config_path,
                input,
            };
            handler.execute(&command)
        }
    }
}
