use bevy::app::App;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use rootbound::cli::{run_command, CommandOutcome};
use rootbound::rng::hash_seed;
use rootbound::save;
use rootbound::session::GameSession;

/// Rootbound — a deterministic roguelike gardening simulator.
#[derive(Parser, Debug)]
#[command(name = "rootbound", about = "A deterministic roguelike gardening simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new run.
    Play {
        /// Climate zone id (zone_8a, zone_5b, zone_10b).
        #[arg(long, default_value = "zone_8a")]
        zone: String,
        /// Run seed: a number, or any string (hashed).
        #[arg(long)]
        seed: Option<String>,
    },
    /// Load a saved run and continue it.
    Load { path: PathBuf },
    /// Run a single REPL command against a fresh default session.
    Cmd { line: String },
}

fn main() -> ExitCode {
    // Install the global tracing subscriber behind the engine's log macros.
    // The throwaway App exists only to run the plugin's setup.
    App::new().add_plugins(bevy::log::LogPlugin {
        filter: "warn,rootbound=info".into(),
        ..Default::default()
    });

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let clap print its usage/help text, but keep exit codes to
            // 0 for help/version and 1 for bad arguments.
            let is_error = e.use_stderr();
            let _ = e.print();
            return if is_error {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cli.command.unwrap_or(Command::Play {
        zone: "zone_8a".into(),
        seed: None,
    }) {
        Command::Play { zone, seed } => {
            let seed = match seed {
                Some(s) => s.parse::<u64>().unwrap_or_else(|_| hash_seed(&s)),
                None => rand::random(),
            };
            match GameSession::new(&zone, seed) {
                Ok(session) => repl(session),
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::from(1)
                }
            }
        }
        Command::Load { path } => match save::load_from_path(&path) {
            Ok(session) => repl(session),
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(1)
            }
        },
        Command::Cmd { line } => {
            let mut session = match GameSession::new("zone_8a", 42) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::from(1);
                }
            };
            match run_command(&mut session, &line) {
                CommandOutcome::Output(output) => println!("{output}"),
                CommandOutcome::Quit => {}
            }
            ExitCode::SUCCESS
        }
    }
}

fn repl(mut session: GameSession) -> ExitCode {
    println!(
        "Rootbound — {} | seed {} | week-1 energy estimate: {}",
        session.zone().name,
        session.seed(),
        session.energy_preview(),
    );
    println!("Type `help` for commands.\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        match run_command(&mut session, line.trim()) {
            CommandOutcome::Output(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            CommandOutcome::Quit => break,
        }
    }
    ExitCode::SUCCESS
}
