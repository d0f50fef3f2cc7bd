//! Strictly SIM - terminal client
//!
//! Plays SIM against a remote arbiter from the command line.

#![warn(missing_docs)]

mod cli;
mod console;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use console::Input;
use std::io::Write;
use std::path::PathBuf;
use strictly_sim::{ClientConfig, ClientError, HttpArbiter, MatchClient};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            url,
            difficulty,
            config,
        } => run_play(config, url, difficulty).await,
        Command::Ping { url, config } => run_ping(config, url).await,
    }
}

/// Resolves configuration: file, then environment, then flags.
fn resolve_config(
    path: Option<PathBuf>,
    url: Option<String>,
    difficulty: Option<u8>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(path.as_deref())?;
    if let Some(url) = url {
        config = config.with_arbiter_url(url);
    }
    if let Some(level) = difficulty {
        config = config.with_difficulty(level)?;
    }
    Ok(config)
}

/// Check the arbiter's health route
#[instrument]
async fn run_ping(path: Option<PathBuf>, url: Option<String>) -> Result<()> {
    let config = resolve_config(path, url, None)?;
    let arbiter = HttpArbiter::from_config(&config)?;
    arbiter.ping().await?;
    println!("arbiter at {} is up", arbiter.base_url());
    Ok(())
}

/// Reads one line, `None` on end of input.
async fn prompt(input: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

/// Play matches interactively until the player quits
#[instrument]
async fn run_play(
    path: Option<PathBuf>,
    url: Option<String>,
    difficulty: Option<u8>,
) -> Result<()> {
    let config = resolve_config(path, url, difficulty)?;
    let level = config.difficulty().level();
    let mut client = MatchClient::new(HttpArbiter::from_config(&config)?);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    info!(arbiter_url = %config.arbiter_url(), %level, "Starting terminal client");
    println!("SIM against {} at difficulty {}", config.arbiter_url(), level);
    println!("Claim edges by typing two points, e.g. `0 3`. Avoid completing a triangle. `q` quits.");

    loop {
        // Start, retrying while the arbiter is unreachable
        loop {
            let started = client.start_match(level).await.map(|_| ());
            let Err(err) = started else { break };
            if let ClientError::Protocol(_) = err {
                warn!(error = %err, "Discarding broken match");
                client.reset();
            } else if !err.is_retryable() {
                return Err(err.into());
            }
            println!("could not start a match: {}", err);
            match prompt(&mut input, "press enter to retry, q to quit> ").await? {
                Some(line) if parse_quit(&line) => return Ok(()),
                Some(_) => {}
                None => return Ok(()),
            }
        }

        while client.session().phase().can_submit() {
            println!("\n{}", console::render(client.session()));
            let Some(line) = prompt(&mut input, "your move> ").await? else {
                return Ok(());
            };

            match console::parse_input(&line) {
                Input::Quit => return Ok(()),
                Input::Invalid(err) => println!("{}", err),
                Input::Move(choice) => match client.submit_move(choice).await {
                    Ok(_) => {}
                    Err(err) if err.is_retryable() => {
                        println!("{}; your move was not recorded, try again", err);
                    }
                    Err(ClientError::Validation(err)) => println!("{}", err),
                    Err(err) => {
                        warn!(error = %err, "Match abandoned");
                        println!("{}; this match cannot continue", err);
                        break;
                    }
                },
            }
        }

        println!("\n{}", console::render(client.session()));
        match prompt(&mut input, "play again? [y/N]> ").await? {
            Some(line) if line.trim().eq_ignore_ascii_case("y") => client.reset(),
            _ => return Ok(()),
        }
    }
}

fn parse_quit(line: &str) -> bool {
    console::parse_input(line) == Input::Quit
}
