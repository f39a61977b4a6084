//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current session state, routes `go`
//! requests to the asynchronous search engine, and emits protocol-compliant
//! output. Debug extensions (`flip`, `bench`, `d`, `eval`, `move`,
//! `learning`) live behind the same dispatcher as the standard verbs.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::engines::engine::SearchRequest;
use crate::engines::eval;
use crate::game_state::game_state::GameState;
use crate::move_generation::perft::perft;
use crate::uci::bench::run_bench;
use crate::uci::move_check::process_move;
use crate::uci::notation::decode_move;
use crate::uci::session::UciSession;
use crate::utils::render_game_state::render_game_state;

const UCI_ENGINE_NAME: &str = "Damson Chess 0.6";
const UCI_ENGINE_AUTHOR: &str = "the Damson Chess developers";

/// Entry point for both invocation styles: with arguments the tokens are
/// joined into one composed command and executed once; without arguments
/// the loop reads standard input until `quit` or end-of-stream.
pub fn run(args: &[String]) -> io::Result<()> {
    let mut session = UciSession::new();
    let mut stdout = io::stdout();

    if !args.is_empty() {
        let line = args.join(" ");
        handle_command(&mut session, &line, &mut stdout)?;
        stdout.flush()?;
        // A composed `go` must run out its budget before the process exits.
        session.engine.wait_for_search_finished();
        return Ok(());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = handle_command(&mut session, &line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            return Ok(());
        }
    }

    // End of input without an explicit quit: same shutdown path.
    session.engine.signal_stop();
    session.engine.wait_for_search_finished();
    session.learning.exit();
    Ok(())
}

/// Execute one command line; returns `true` when the loop should terminate.
pub fn handle_command(
    session: &mut UciSession,
    line: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let Some(&cmd) = tokens.first() else {
        return Ok(false);
    };
    let args = &tokens[1..];

    match cmd {
        "quit" | "stop" => {
            session.engine.signal_stop();
            session.learning.exit();
            if cmd == "quit" {
                session.engine.wait_for_search_finished();
                return Ok(true);
            }
        }
        "ponderhit" => {
            if session.engine.stop_on_ponderhit() {
                session.engine.signal_stop();
                session.learning.exit();
            } else {
                // Predicted move was played: the search continues on its
                // normal clock.
                session.engine.clear_ponder();
            }
        }
        "uci" => {
            writeln!(out, "id name {}", UCI_ENGINE_NAME)?;
            writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
            writeln!(out, "{}", session.options)?;
            writeln!(out, "uciok")?;
        }
        "isready" => {
            writeln!(out, "readyok")?;
        }
        "setoption" => {
            if let Err(err) = handle_setoption(session, args) {
                writeln!(out, "{}", err)?;
            }
        }
        "ucinewgame" => {
            session.engine.new_game();
        }
        "position" => {
            if let Err(err) = handle_position(session, args) {
                writeln!(out, "info string position error: {}", err)?;
            }
        }
        "go" => {
            handle_go(session, args, out)?;
        }
        "flip" => {
            let flipped = session.game.flipped();
            session.reset_position(flipped);
        }
        "bench" => {
            run_bench(session, args, out)?;
        }
        "d" => {
            writeln!(out, "{}", render_game_state(&session.game))?;
            writeln!(out, "Fen: {}", session.game.get_fen())?;
            writeln!(out, "Key: {:016X}", session.game.zobrist_key)?;
        }
        "eval" => {
            writeln!(out, "{}", eval::trace(&session.game))?;
        }
        "move" => {
            if let Some(&token) = args.first() {
                process_move(session, token, out)?;
            }
        }
        "learning" => {
            handle_learning(session, args, out)?;
        }
        _ => {
            writeln!(out, "Unknown command: {}", line)?;
        }
    }

    Ok(false)
}

/// Position-setup protocol: `startpos` or `fen <fen...>`, optionally
/// followed by `moves <move>...`. Replay halts at the first token that does
/// not decode to a legal move, leaving the position at the last legal state.
pub(crate) fn handle_position(session: &mut UciSession, args: &[&str]) -> Result<(), String> {
    let chess960 = session.options.is_enabled("UCI_Chess960");

    let mut iter = args.iter().copied().peekable();
    let game = match iter.next() {
        Some("startpos") => {
            let mut game = GameState::new_game();
            game.chess960 = chess960;
            game
        }
        Some("fen") => {
            let mut fen_parts = Vec::<&str>::new();
            while let Some(&next) = iter.peek() {
                if next == "moves" {
                    break;
                }
                fen_parts.push(next);
                iter.next();
            }
            if fen_parts.is_empty() {
                return Err("missing FEN after 'position fen'".to_owned());
            }
            GameState::from_fen(&fen_parts.join(" "), chess960)?
        }
        Some(other) => return Err(format!("unsupported position token '{}'", other)),
        None => return Err("incomplete position command".to_owned()),
    };

    session.reset_position(game);

    if iter.peek().copied() == Some("moves") {
        iter.next();
        for token in iter {
            let mv = decode_move(token, &session.game);
            if !mv.is_real() {
                break;
            }
            let undo = session.game.make_move(mv)?;
            session.undo_stack.push(undo);
        }
    }

    Ok(())
}

/// `setoption name <name...> value <value...>`; both name and value may
/// span multiple tokens.
pub(crate) fn handle_setoption(session: &mut UciSession, args: &[&str]) -> Result<(), String> {
    let mut name_tokens = Vec::<&str>::new();
    let mut value_tokens = Vec::<&str>::new();
    let mut mode = "";

    for &tok in args {
        match tok {
            "name" if mode.is_empty() => mode = "name",
            "value" if mode == "name" => mode = "value",
            _ if mode == "name" => name_tokens.push(tok),
            _ if mode == "value" => value_tokens.push(tok),
            _ => {}
        }
    }

    let name = name_tokens.join(" ");
    let value = value_tokens.join(" ");
    session.options.set(&name, &value)
}

/// Parse a `go` command into a `SearchRequest` and start the asynchronous
/// search. `go perft N` is handled synchronously here instead.
pub(crate) fn handle_go(
    session: &mut UciSession,
    args: &[&str],
    out: &mut impl Write,
) -> io::Result<()> {
    let mut request = SearchRequest::default();

    let mut i = 0usize;
    while i < args.len() {
        match args[i] {
            "wtime" => {
                i += 1;
                request.wtime = args.get(i).and_then(|x| x.parse().ok());
            }
            "btime" => {
                i += 1;
                request.btime = args.get(i).and_then(|x| x.parse().ok());
            }
            "winc" => {
                i += 1;
                request.winc = args.get(i).and_then(|x| x.parse().ok());
            }
            "binc" => {
                i += 1;
                request.binc = args.get(i).and_then(|x| x.parse().ok());
            }
            "movestogo" => {
                i += 1;
                request.movestogo = args.get(i).and_then(|x| x.parse().ok());
            }
            "depth" => {
                i += 1;
                request.depth = args.get(i).and_then(|x| x.parse().ok());
            }
            "nodes" => {
                i += 1;
                request.nodes = args.get(i).and_then(|x| x.parse().ok());
            }
            "mate" => {
                i += 1;
                request.mate = args.get(i).and_then(|x| x.parse().ok());
            }
            "movetime" => {
                i += 1;
                request.movetime = args.get(i).and_then(|x| x.parse().ok());
            }
            "perft" => {
                i += 1;
                request.perft = args.get(i).and_then(|x| x.parse().ok());
            }
            "infinite" => request.infinite = true,
            "ponder" => request.ponder = true,
            "searchmoves" => {
                // Everything after the keyword is a move restriction.
                for &token in &args[i + 1..] {
                    let mv = decode_move(token, &session.game);
                    if mv.is_real() {
                        request.searchmoves.push(mv);
                    }
                }
                break;
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(depth) = request.perft {
        let mut scratch = session.game.clone();
        let started = Instant::now();
        let total = perft(&mut scratch, depth);
        let elapsed = started.elapsed().as_millis().max(1);
        writeln!(out, "Nodes searched: {}", total)?;
        writeln!(out, "Time: {} ms", elapsed)?;
        return Ok(());
    }

    session.engine.begin_search(&session.game, request);
    Ok(())
}

fn handle_learning(
    session: &mut UciSession,
    args: &[&str],
    out: &mut impl Write,
) -> io::Result<()> {
    match args.first().copied() {
        Some("start") => {
            if session.learning.is_active() {
                writeln!(out, "info string learning already active")?;
            } else {
                let fen = session.game.get_fen();
                session.learning.start(&fen);
            }
        }
        Some("end") => session.learning.end(),
        Some("save") => {
            if let Err(err) = session.learning.save() {
                writeln!(out, "info string learning error: {}", err)?;
            }
        }
        Some("load") => match session.learning.load() {
            Ok(count) => writeln!(out, "info string learning loaded {} records", count)?,
            Err(err) => writeln!(out, "info string learning error: {}", err)?,
        },
        Some("clear") => session.learning.clear(),
        _ => writeln!(out, "Unknown command: learning {}", args.join(" "))?,
    }
    Ok(())
}
