//! The debug `move` command: tentatively apply one move, detect game
//! termination, and re-synchronize the session from a sanitized FEN.
//!
//! The move is never committed directly. It is applied, the resulting FEN is
//! captured, the move is undone, and the session is rebuilt by feeding the
//! captured FEN back through the position-setup protocol. Castling moves
//! additionally get the mover's castling-rights flags cleared in the captured
//! FEN before the re-feed.

use std::io::{self, Write};

use crate::game_state::chess_types::{castle_rights_of, Color, Move, MoveKind};
use crate::game_state::game_state::GameState;
use crate::move_generation::attacks::is_king_in_check;
use crate::move_generation::generator::legal_moves;
use crate::uci::notation::decode_move;
use crate::uci::session::UciSession;
use crate::uci::uci_loop::handle_position;

pub fn process_move(
    session: &mut UciSession,
    token: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    if legal_moves(&session.game).is_empty() {
        if is_king_in_check(&session.game, session.game.side_to_move) {
            let winner = match session.game.side_to_move {
                Color::White => "black",
                Color::Black => "white",
            };
            writeln!(out, "Game over: {} wins", winner)?;
        } else {
            writeln!(out, "Game over: draw")?;
        }
        return Ok(());
    }

    let mv = decode_move(token, &session.game);
    if !mv.is_real() {
        writeln!(out, "Game over")?;
        return Ok(());
    }

    let mover = session.game.side_to_move;
    let undo = match session.game.make_move(mv) {
        Ok(undo) => undo,
        Err(_) => {
            writeln!(out, "Game over")?;
            return Ok(());
        }
    };

    let mut fen = session.game.get_fen();
    if !session.game.is_consistent() {
        session.game.unmake_move(&undo);
        writeln!(out, "Game over")?;
        return Ok(());
    }
    session.game.unmake_move(&undo);

    if matches!(mv, Move::Real(data) if data.kind == MoveKind::Castling) {
        fen = clear_castling_rights(&fen, mover, session.game.chess960)?;
    }

    let mut args = vec!["fen"];
    args.extend(fen.split_whitespace());
    if let Err(err) = handle_position(session, &args) {
        writeln!(out, "info string move error: {}", err)?;
        return Ok(());
    }

    session.learning.record_move(token);
    Ok(())
}

/// Remove the mover's castling-rights flags from a FEN string, leaving the
/// opponent's rights untouched.
fn clear_castling_rights(fen: &str, mover: Color, chess960: bool) -> io::Result<String> {
    let mut game = GameState::from_fen(fen, chess960)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    game.castling_rights &= !castle_rights_of(mover);
    game.refresh_caches();
    Ok(game.get_fen())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_move(session: &mut UciSession, token: &str) -> String {
        let mut out = Vec::new();
        process_move(session, token, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn checkmate_names_the_side_not_to_move_as_winner() {
        let mut session = UciSession::new();
        handle_position(
            &mut session,
            &["startpos", "moves", "f2f3", "e7e5", "g2g4", "d8h4"],
        )
        .unwrap();

        assert_eq!(run_move(&mut session, "a2a3"), "Game over: black wins\n");
    }

    #[test]
    fn stalemate_is_reported_as_a_draw() {
        let mut session = UciSession::new();
        handle_position(&mut session, &["fen", "7k/5Q2/6K1/8/8/8/8/8", "b", "-", "-", "0", "1"])
            .unwrap();

        assert_eq!(run_move(&mut session, "h8h7"), "Game over: draw\n");
    }

    #[test]
    fn undecodable_tokens_report_a_generic_game_over() {
        let mut session = UciSession::new();
        assert_eq!(run_move(&mut session, "e2e5"), "Game over\n");
        // The position is untouched.
        assert_eq!(session.game.get_fen(), GameState::new_game().get_fen());
    }

    #[test]
    fn a_legal_move_advances_the_session_through_the_refeed() {
        let mut session = UciSession::new();
        let output = run_move(&mut session, "e2e4");
        assert!(output.is_empty());
        assert_eq!(session.game.side_to_move, Color::Black);
        // Re-feeding a bare FEN resets the undo history to the seed record.
        assert_eq!(session.undo_stack.len(), 1);
    }

    #[test]
    fn castling_strips_only_the_movers_rights() {
        let mut session = UciSession::new();
        handle_position(
            &mut session,
            &["fen", "r3k2r/8/8/8/8/8/8/R3K2R", "w", "KQkq", "-", "0", "1"],
        )
        .unwrap();

        let output = run_move(&mut session, "e1g1");
        assert!(output.is_empty());

        let fen = session.game.get_fen();
        let castling_field = fen.split_whitespace().nth(2).unwrap();
        assert_eq!(castling_field, "kq");
        assert_eq!(session.game.side_to_move, Color::Black);
    }

    #[test]
    fn black_castling_keeps_whites_rights() {
        let mut session = UciSession::new();
        handle_position(
            &mut session,
            &["fen", "r3k2r/8/8/8/8/8/8/R3K2R", "b", "KQkq", "-", "0", "1"],
        )
        .unwrap();

        run_move(&mut session, "e8c8");

        let fen = session.game.get_fen();
        let castling_field = fen.split_whitespace().nth(2).unwrap();
        assert_eq!(castling_field, "KQ");
    }
}
