use clap::{Parser, Subcommand};
use colored::Colorize;
use roster_lib::{
    Error, Repository,
    repository::config::{CoreConfig, StorageMode},
};
use sysexits::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod member;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: member::Command,

    /// Override the configured storage mode
    #[arg(short, long, global = true)]
    storage: Option<StorageMode>,
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let mut cfg = match CoreConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::Config;
        }
    };
    if let Some(storage) = cli.storage {
        cfg.storage = storage;
    }

    let repo = match Repository::new(&cfg) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::IoErr;
        }
    };

    match member::handle(&repo, &cli.command) {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            exit_code(&err)
        }
    }
}

fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::Validation(_) | Error::DuplicateId(_) => ExitCode::DataErr,
        Error::NotFound(_) => ExitCode::NoInput,
        Error::ConfigParse(_) | Error::ConfigWrite(_) | Error::NoHome => ExitCode::Config,
        Error::Io(_) => ExitCode::IoErr,
        Error::Internal(_) | Error::Json(_) => ExitCode::Software,
    }
}
