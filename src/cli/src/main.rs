#![warn(clippy::pedantic)]

mod animate;
mod config;
mod render;
mod twophase;
mod walk;

use std::{io, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{OptionExt, bail};
use cube_core::{
    Puzzle,
    external::{CannedExplainer, ScrambleSource, Solver},
    method::CannedScramble,
    notation::format_sequence,
};
use env_logger::TimestampPrecision;
use log::{LevelFilter, info};

use crate::{
    config::Config,
    render::Style,
    twophase::TwophaseSolver,
    walk::Session,
};

/// Turns, scrambles, and solves a virtual 3x3x3 cube in the terminal
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The configuration file to use, in TOML format. Defaults to
    /// `cubist/config.toml` in the user configuration directory.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    log_level: u8,

    /// Print sticker letters instead of colors
    #[arg(long)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a move sequence to a solved cube and show the result.
    Apply {
        /// The moves to apply, e.g. "R U' F2".
        moves: String,
        /// Also list every cubie with its stickers.
        #[arg(long)]
        report: bool,
    },
    /// Show the canned scramble and the beginner method that undoes it.
    Scramble {
        /// Also print the solution, step by step.
        #[arg(long)]
        solution: bool,
    },
    /// Step through a solution interactively.
    Walk,
    /// Solve the cube reached by a move sequence with the two-phase solver.
    Solve {
        /// The moves to apply to a solved cube first.
        moves: String,
    },
    /// Print the facelet string of the cube reached by a move sequence.
    Facelets {
        /// The moves to apply to a solved cube.
        moves: String,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let style = if cli.plain { Style::Plain } else { Style::Color };

    match cli.command {
        Commands::Apply { moves, report } => {
            let mut puzzle = Puzzle::new();
            puzzle.apply_notation(&moves)?;

            let state = puzzle.describe()?;
            print!("{}", render::net(&state, style));
            if report {
                print!("{state}");
            }
        }
        Commands::Scramble { solution } => {
            let steps = config.steps();
            let mut source = CannedScramble::new(&steps)?;
            let moves = source.scramble();

            let mut puzzle = Puzzle::new();
            puzzle.apply_all(&moves)?;

            println!("{}", format_sequence(&moves));
            print!("{}", render::net(&puzzle.describe()?, style));

            if solution {
                for step in &steps {
                    println!("{}: {}", step.title, step.algorithm);
                }
            }
        }
        Commands::Walk => {
            let solver = TwophaseSolver::new(config.solver.clone());
            let mut session = Session::new(
                config,
                style,
                Box::new(solver),
                Box::new(CannedExplainer),
                io::stdout(),
            );
            session.run(io::stdin().lock())?;
        }
        Commands::Solve { moves } => {
            let mut puzzle = Puzzle::new();
            puzzle.apply_notation(&moves)?;

            let mut solver = TwophaseSolver::new(config.solver);
            let solution = solver.solve(&puzzle.describe()?)?;
            info!("Solver returned {} moves", solution.len());

            puzzle.apply_all(&solution)?;
            if !puzzle.describe()?.is_solved() {
                bail!("The solver's answer {} does not solve the cube", format_sequence(&solution));
            }

            println!("{}", format_sequence(&solution));
        }
        Commands::Facelets { moves } => {
            let mut puzzle = Puzzle::new();
            puzzle.apply_notation(&moves)?;

            let facelets = puzzle
                .describe()?
                .to_facelet_string()
                .ok_or_eyre("The cube has no facelet string")?;
            println!("{facelets}");
        }
    }

    Ok(())
}
