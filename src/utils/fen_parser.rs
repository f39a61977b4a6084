//! FEN-to-GameState parsing.
//!
//! Builds a populated board state from a Forsyth-Edwards Notation string.
//! The two trailing clock fields are optional; some controllers omit them.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let mut fields = fen.split_whitespace();

    let board_field = fields.next().ok_or("missing board layout in FEN")?;
    let side_field = fields.next().ok_or("missing side-to-move in FEN")?;
    let castling_field = fields.next().unwrap_or("-");
    let en_passant_field = fields.next().unwrap_or("-");
    let halfmove_field = fields.next().unwrap_or("0");
    let fullmove_field = fields.next().unwrap_or("1");

    if fields.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut game = GameState::new_empty();
    parse_board_field(board_field, &mut game)?;

    game.side_to_move = match side_field {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(format!("invalid side-to-move field: {other}")),
    };

    game.castling_rights = parse_castling_field(castling_field)?;
    game.en_passant_square = if en_passant_field == "-" {
        None
    } else {
        Some(algebraic_to_square(en_passant_field)?)
    };
    game.halfmove_clock = halfmove_field
        .parse::<u16>()
        .map_err(|_| format!("invalid halfmove clock: {halfmove_field}"))?;
    game.fullmove_number = fullmove_field
        .parse::<u16>()
        .map_err(|_| format!("invalid fullmove number: {fullmove_field}"))?;

    game.refresh_caches();
    Ok(game)
}

fn parse_board_field(board_field: &str, game: &mut GameState) -> Result<(), String> {
    let mut rank: i32 = 7;
    let mut file: i32 = 0;

    for ch in board_field.chars() {
        match ch {
            '/' => {
                if file != 8 {
                    return Err(format!("rank {} does not sum to 8 files", rank + 1));
                }
                rank -= 1;
                file = 0;
                if rank < 0 {
                    return Err("board layout has too many ranks".to_owned());
                }
            }
            '1'..='8' => {
                file += (ch as u8 - b'0') as i32;
            }
            _ => {
                let (color, piece) = piece_from_fen_char(ch)
                    .ok_or_else(|| format!("invalid piece character '{ch}' in board layout"))?;
                if file > 7 {
                    return Err(format!("rank {} has too many files", rank + 1));
                }
                let sq = (rank * 8 + file) as Square;
                game.pieces[color.index()][piece.index()] |= 1u64 << sq;
                file += 1;
            }
        }
    }

    if rank != 0 || file != 8 {
        return Err("board layout must contain 8 complete ranks".to_owned());
    }

    Ok(())
}

fn parse_castling_field(castling_field: &str) -> Result<CastlingRights, String> {
    if castling_field == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_field.chars() {
        rights |= match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(format!("invalid castling rights character: {ch}")),
        };
    }
    Ok(rights)
}

pub fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}
