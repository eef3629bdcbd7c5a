//! Drives an external rob-twophase process as the cube's solver.
//!
//! The process is started on first use and kept alive between solves. It
//! prints `Ready!` whenever it can take a command; we answer with
//! `solve <FACELETS>` and read back a timing line followed by the solution:
//!
//! ```text
//! Ready!
//! solve LBDLULDDURDRRRFRURBFFRFBFRDLDBDDBDFBBULRLFFBUFLUUBUULL
//! 30.177ms
//! R F2 R' U R U2 F2 U2 F' D' R D2 L2 D2 L' U2 F2 (17)
//! ```

use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
    thread::available_parallelism,
};

use cube_core::{
    FaceletReport, Move,
    external::{Solver, SolverError},
    notation::parse_sequence,
};
use log::{debug, info, warn};

use crate::config::SolverConfig;

struct Process {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

pub struct TwophaseSolver {
    config: SolverConfig,
    process: Option<Process>,
}

impl TwophaseSolver {
    #[must_use]
    pub fn new(config: SolverConfig) -> TwophaseSolver {
        TwophaseSolver {
            config,
            process: None,
        }
    }

    fn spawn(&self) -> io::Result<Process> {
        // The solver dumps its tables in its working directory
        let tables = match &self.config.tables_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No cache directory"))?
                .join("rob-twophase-tables"),
        };
        fs::create_dir_all(&tables)?;

        let threads = match available_parallelism() {
            Ok(v) => v.to_string(),
            Err(e) => {
                warn!("Failed to get available parallelism; defaulting to 1: {e}");
                1.to_string()
            }
        };

        info!(
            target: "twophase",
            "Starting {} in {}", self.config.command, tables.display()
        );

        let mut child = Command::new(&self.config.command)
            .current_dir(tables)
            .args(&self.config.args)
            .args(["-t", threads.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let broken = || io::Error::new(io::ErrorKind::BrokenPipe, "Solver has no stdio");
        let stdin = child.stdin.take().ok_or_else(broken)?;
        let stdout = BufReader::new(child.stdout.take().ok_or_else(broken)?);

        Ok(Process {
            child,
            stdin,
            stdout,
        })
    }
}

impl Process {
    fn exchange(&mut self, facelets: &str) -> io::Result<String> {
        // Wait until the solver tells us that it's ready
        loop {
            if read_line(&mut self.stdout)?.trim_end() == "Ready!" {
                break;
            }
        }

        debug!(target: "twophase", "solve {facelets}");
        writeln!(self.stdin, "solve {facelets}")?;
        self.stdin.flush()?;

        let timing = read_line(&mut self.stdout)?;
        debug!(target: "twophase", "Solved in {}", timing.trim());

        read_line(&mut self.stdout)
    }
}

fn read_line(stdout: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if stdout.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Solver exited",
        ));
    }

    Ok(line)
}

/// Turns the solver's answer into moves, dropping the trailing `(N)` move
/// count.
fn parse_solution(line: &str, facelets: &str) -> Result<Vec<Move>, SolverError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().contains("error") {
        return Err(SolverError::NoSolution {
            facelets: facelets.to_owned(),
        });
    }

    let alg = trimmed.replace(['(', ')'], "");
    let moves = alg
        .split_whitespace()
        .filter(|v| v.chars().next().is_some_and(|v| !v.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    parse_sequence(&moves).map_err(|source| SolverError::Unparseable {
        output: trimmed.to_owned(),
        source,
    })
}

impl Solver for TwophaseSolver {
    fn solve(&mut self, report: &FaceletReport) -> Result<Vec<Move>, SolverError> {
        let facelets = report
            .to_facelet_string()
            .ok_or(SolverError::UnreadableState)?;

        if report.is_solved() {
            return Ok(Vec::new());
        }

        let mut process = match self.process.take() {
            Some(process) => process,
            None => self.spawn()?,
        };

        // A process that failed mid-exchange is dropped and restarted next time
        let line = process.exchange(&facelets)?;
        self.process = Some(process);

        parse_solution(&line, &facelets)
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!(target: "twophase", "Failed to stop the solver: {e}");
        }
        let _ = self.child.wait();
    }
}
