//! Scripted benchmark harness.
//!
//! `bench [hash] [threads] [depth] [fenfile]` expands its parameters into a
//! concrete command list and replays it through the same handlers the
//! dispatcher uses. Every `go` entry blocks until the search finishes so the
//! node totals are exact. Progress goes to stderr so stdout stays clean for
//! protocol output.

use std::fs;
use std::io::{self, Write};
use std::time::Instant;

use chrono::Local;

use crate::uci::session::UciSession;
use crate::uci::uci_loop::{handle_go, handle_position, handle_setoption};

const DEFAULT_HASH: &str = "16";
const DEFAULT_THREADS: &str = "1";
const DEFAULT_DEPTH: &str = "4";

/// Positions covering the opening, a tactical middlegame, and sparse endings.
const BENCH_FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "8/8/8/8/8/6k1/6p1/6K1 w - - 0 1",
    "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
];

#[derive(Debug, Clone, Copy)]
pub struct BenchSummary {
    pub elapsed_ms: u64,
    pub nodes: u64,
    pub nps: u64,
}

/// Expand bench arguments into the concrete command sequence to replay.
pub fn setup_bench(args: &[&str]) -> Result<Vec<String>, String> {
    let hash = args.first().copied().unwrap_or(DEFAULT_HASH);
    let threads = args.get(1).copied().unwrap_or(DEFAULT_THREADS);
    let depth = args.get(2).copied().unwrap_or(DEFAULT_DEPTH);
    let fen_source = args.get(3).copied().unwrap_or("default");

    let fens: Vec<String> = if fen_source == "default" {
        BENCH_FENS.iter().map(|&f| f.to_owned()).collect()
    } else {
        let body = fs::read_to_string(fen_source)
            .map_err(|e| format!("Cannot read {}: {}", fen_source, e))?;
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect()
    };

    let mut commands = Vec::with_capacity(fens.len() * 3 + 2);
    commands.push(format!("setoption name Hash value {}", hash));
    commands.push(format!("setoption name Threads value {}", threads));
    for fen in fens {
        commands.push("ucinewgame".to_owned());
        commands.push(format!("position fen {}", fen));
        commands.push(format!("go depth {}", depth));
    }
    Ok(commands)
}

pub fn run_bench(session: &mut UciSession, args: &[&str], out: &mut impl Write) -> io::Result<()> {
    let commands = match setup_bench(args) {
        Ok(commands) => commands,
        Err(err) => {
            writeln!(out, "info string bench error: {}", err)?;
            return Ok(());
        }
    };

    let summary = replay_commands(session, &commands, out)?;

    eprintln!("\n===========================");
    eprintln!("Bench finished  : {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    eprintln!("Total time (ms) : {}", summary.elapsed_ms);
    eprintln!("Nodes searched  : {}", summary.nodes);
    eprintln!("Nodes/second    : {}", summary.nps);
    Ok(())
}

/// Replay a command list, blocking on every `go` and totalling its nodes.
/// Elapsed time is clamped to at least one millisecond so the nodes-per-second
/// division is always defined.
pub fn replay_commands(
    session: &mut UciSession,
    commands: &[String],
    out: &mut impl Write,
) -> io::Result<BenchSummary> {
    let total_positions = commands.iter().filter(|c| c.starts_with("go")).count();
    let mut position_count = 0usize;
    let mut nodes = 0u64;
    let started = Instant::now();

    for command in commands {
        let tokens = command.split_whitespace().collect::<Vec<_>>();
        let Some(&verb) = tokens.first() else {
            continue;
        };
        let args = &tokens[1..];

        match verb {
            "go" => {
                position_count += 1;
                eprintln!("\nPosition: {}/{}", position_count, total_positions);
                handle_go(session, args, out)?;
                session.engine.wait_for_search_finished();
                nodes += session.engine.nodes_searched();
            }
            "position" => {
                if let Err(err) = handle_position(session, args) {
                    writeln!(out, "info string position error: {}", err)?;
                }
            }
            "setoption" => {
                if let Err(err) = handle_setoption(session, args) {
                    writeln!(out, "{}", err)?;
                }
            }
            "ucinewgame" => session.engine.new_game(),
            _ => {}
        }
    }

    let elapsed_ms = (started.elapsed().as_millis() as u64).max(1);
    Ok(BenchSummary {
        elapsed_ms,
        nodes,
        nps: nodes * 1_000 / elapsed_ms,
    })
}
