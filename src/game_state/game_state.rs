//! Authoritative board state.
//!
//! `GameState` holds piece bitboards, occupancy caches, turn/state flags, and
//! clocks. Moves are applied and reversed in place through `make_move` /
//! `unmake_move`, with the irreversible portion captured in an `UndoState`.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::zobrist;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    /// Castling-notation variant: when set, castling moves are displayed
    /// using the rook's actual square instead of the fixed g/c files.
    pub chess960: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
            chess960: false,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        GameState::from_fen(STARTING_POSITION_FEN, false)
            .expect("starting FEN should always parse")
    }

    pub fn from_fen(fen: &str, chess960: bool) -> Result<Self, String> {
        let mut game = parse_fen(fen)?;
        game.chess960 = chess960;
        game.refresh_caches();
        Ok(game)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Recompute the occupancy caches and zobrist key from the piece boards.
    pub fn refresh_caches(&mut self) {
        self.occupancy_by_color[Color::White.index()] = self.pieces[Color::White.index()]
            .iter()
            .fold(0u64, |acc, bb| acc | bb);
        self.occupancy_by_color[Color::Black.index()] = self.pieces[Color::Black.index()]
            .iter()
            .fold(0u64, |acc, bb| acc | bb);
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
        self.zobrist_key = zobrist::compute_key(self);
    }

    pub fn piece_on(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        for color in [Color::White, Color::Black] {
            if (self.occupancy_by_color[color.index()] & mask) == 0 {
                continue;
            }
            for piece in ALL_PIECE_KINDS {
                if (self.pieces[color.index()][piece.index()] & mask) != 0 {
                    return Some((color, piece));
                }
            }
        }
        None
    }

    #[inline]
    fn clear_square(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.pieces[color.index()][piece.index()] &= !(1u64 << square);
    }

    #[inline]
    fn fill_square(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.pieces[color.index()][piece.index()] |= 1u64 << square;
    }

    /// Apply a move in place, returning the undo record needed to reverse it.
    ///
    /// `Move::None` is rejected; `Move::Null` passes the turn.
    pub fn make_move(&mut self, mv: Move) -> Result<UndoState, String> {
        let undo = UndoState {
            mv,
            captured_piece: None,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_zobrist_key: self.zobrist_key,
        };

        let data = match mv {
            Move::None => return Err("cannot apply the none-move sentinel".to_owned()),
            Move::Null => {
                self.en_passant_square = None;
                self.halfmove_clock = self.halfmove_clock.saturating_add(1);
                if self.side_to_move == Color::Black {
                    self.fullmove_number = self.fullmove_number.saturating_add(1);
                }
                self.side_to_move = self.side_to_move.opposite();
                self.refresh_caches();
                return Ok(undo);
            }
            Move::Real(data) => data,
        };

        let us = self.side_to_move;
        let them = us.opposite();
        let mut undo = undo;

        let moved_piece = self
            .piece_on(data.from)
            .filter(|(color, _)| *color == us)
            .map(|(_, piece)| piece)
            .ok_or_else(|| format!("no piece of the moving side on square {}", data.from))?;

        match data.kind {
            MoveKind::Castling => {
                // from = king square, to = rook square.
                let rank_base = data.from & !7;
                let kingside = data.to > data.from;
                let king_to = rank_base + if kingside { 6 } else { 2 };
                let rook_to = rank_base + if kingside { 5 } else { 3 };

                self.clear_square(us, PieceKind::King, data.from);
                self.clear_square(us, PieceKind::Rook, data.to);
                self.fill_square(us, PieceKind::King, king_to);
                self.fill_square(us, PieceKind::Rook, rook_to);
            }
            MoveKind::EnPassant => {
                let victim_sq = if us == Color::White {
                    data.to - 8
                } else {
                    data.to + 8
                };
                self.clear_square(us, PieceKind::Pawn, data.from);
                self.clear_square(them, PieceKind::Pawn, victim_sq);
                self.fill_square(us, PieceKind::Pawn, data.to);
                undo.captured_piece = Some(PieceKind::Pawn);
            }
            MoveKind::Normal | MoveKind::Promotion => {
                if let Some((color, captured)) = self.piece_on(data.to) {
                    if color != them {
                        return Err(format!(
                            "destination square {} occupied by the moving side",
                            data.to
                        ));
                    }
                    self.clear_square(them, captured, data.to);
                    undo.captured_piece = Some(captured);
                }

                self.clear_square(us, moved_piece, data.from);
                let placed = data.promotion.unwrap_or(moved_piece);
                self.fill_square(us, placed, data.to);
            }
        }

        self.update_castling_rights(data.from, data.to, moved_piece, us);

        // Double pawn push leaves an en-passant target behind the pawn.
        self.en_passant_square =
            if moved_piece == PieceKind::Pawn && data.from.abs_diff(data.to) == 16 {
                Some((data.from + data.to) / 2)
            } else {
                None
            };

        if moved_piece == PieceKind::Pawn || undo.captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = them;
        self.refresh_caches();

        Ok(undo)
    }

    /// Reverse the move recorded in `undo`, restoring the prior state.
    pub fn unmake_move(&mut self, undo: &UndoState) {
        let mover = self.side_to_move.opposite();

        if let Move::Real(data) = undo.mv {
            match data.kind {
                MoveKind::Castling => {
                    let rank_base = data.from & !7;
                    let kingside = data.to > data.from;
                    let king_to = rank_base + if kingside { 6 } else { 2 };
                    let rook_to = rank_base + if kingside { 5 } else { 3 };

                    self.clear_square(mover, PieceKind::King, king_to);
                    self.clear_square(mover, PieceKind::Rook, rook_to);
                    self.fill_square(mover, PieceKind::King, data.from);
                    self.fill_square(mover, PieceKind::Rook, data.to);
                }
                MoveKind::EnPassant => {
                    let victim_sq = if mover == Color::White {
                        data.to - 8
                    } else {
                        data.to + 8
                    };
                    self.clear_square(mover, PieceKind::Pawn, data.to);
                    self.fill_square(mover, PieceKind::Pawn, data.from);
                    self.fill_square(mover.opposite(), PieceKind::Pawn, victim_sq);
                }
                MoveKind::Promotion => {
                    let promoted = data.promotion.unwrap_or(PieceKind::Queen);
                    self.clear_square(mover, promoted, data.to);
                    self.fill_square(mover, PieceKind::Pawn, data.from);
                    if let Some(captured) = undo.captured_piece {
                        self.fill_square(mover.opposite(), captured, data.to);
                    }
                }
                MoveKind::Normal => {
                    let moved = self
                        .piece_on(data.to)
                        .map(|(_, piece)| piece)
                        .unwrap_or(PieceKind::Pawn);
                    self.clear_square(mover, moved, data.to);
                    self.fill_square(mover, moved, data.from);
                    if let Some(captured) = undo.captured_piece {
                        self.fill_square(mover.opposite(), captured, data.to);
                    }
                }
            }
        }

        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1).max(1);
        }
        self.side_to_move = mover;
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.refresh_caches();
    }

    fn update_castling_rights(
        &mut self,
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        us: Color,
    ) {
        if moved_piece == PieceKind::King {
            self.castling_rights &= !castle_rights_of(us);
        }

        // Rook leaving or being captured on a corner square drops the right,
        // regardless of whose move touched it.
        for sq in [from, to] {
            match sq {
                0 => self.castling_rights &= !CASTLE_WHITE_QUEENSIDE,
                7 => self.castling_rights &= !CASTLE_WHITE_KINGSIDE,
                56 => self.castling_rights &= !CASTLE_BLACK_QUEENSIDE,
                63 => self.castling_rights &= !CASTLE_BLACK_KINGSIDE,
                _ => {}
            }
        }
    }

    /// Mirror the position vertically and swap the colors.
    pub fn flipped(&self) -> Self {
        let mut out = Self::default();

        for piece in ALL_PIECE_KINDS {
            out.pieces[Color::White.index()][piece.index()] =
                self.pieces[Color::Black.index()][piece.index()].swap_bytes();
            out.pieces[Color::Black.index()][piece.index()] =
                self.pieces[Color::White.index()][piece.index()].swap_bytes();
        }

        out.side_to_move = self.side_to_move.opposite();

        let mut rights: CastlingRights = 0;
        if (self.castling_rights & CASTLE_WHITE_KINGSIDE) != 0 {
            rights |= CASTLE_BLACK_KINGSIDE;
        }
        if (self.castling_rights & CASTLE_WHITE_QUEENSIDE) != 0 {
            rights |= CASTLE_BLACK_QUEENSIDE;
        }
        if (self.castling_rights & CASTLE_BLACK_KINGSIDE) != 0 {
            rights |= CASTLE_WHITE_KINGSIDE;
        }
        if (self.castling_rights & CASTLE_BLACK_QUEENSIDE) != 0 {
            rights |= CASTLE_WHITE_QUEENSIDE;
        }
        out.castling_rights = rights;

        out.en_passant_square = self.en_passant_square.map(|sq| sq ^ 56);
        out.halfmove_clock = self.halfmove_clock;
        out.fullmove_number = self.fullmove_number;
        out.chess960 = self.chess960;
        out.refresh_caches();
        out
    }

    /// Internal consistency check used after tentative move application.
    ///
    /// A failure here signals upstream corruption, not user error.
    pub fn is_consistent(&self) -> bool {
        let mut recomputed = [0u64; 2];
        for color in [Color::White, Color::Black] {
            for piece in ALL_PIECE_KINDS {
                recomputed[color.index()] |= self.pieces[color.index()][piece.index()];
            }
        }
        if recomputed[0] != self.occupancy_by_color[0]
            || recomputed[1] != self.occupancy_by_color[1]
            || (recomputed[0] | recomputed[1]) != self.occupancy_all
        {
            return false;
        }
        if (recomputed[0] & recomputed[1]) != 0 {
            return false;
        }

        for color in [Color::White, Color::Black] {
            if self.pieces[color.index()][PieceKind::King.index()].count_ones() != 1 {
                return false;
            }
        }

        // Pawns cannot stand on the back ranks.
        let back_ranks = 0x0000_0000_0000_00FFu64 | 0xFF00_0000_0000_0000u64;
        for color in [Color::White, Color::Black] {
            if (self.pieces[color.index()][PieceKind::Pawn.index()] & back_ranks) != 0 {
                return false;
            }
        }

        if let Some(sq) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if sq / 8 != expected_rank {
                return false;
            }
        }

        if self.zobrist_key != zobrist::compute_key(self) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_types::*;

    #[test]
    fn make_then_unmake_restores_state() {
        let mut game = GameState::new_game();
        let fen_before = game.get_fen();
        let key_before = game.zobrist_key;

        let undo = game
            .make_move(Move::normal(12, 28))
            .expect("e2e4 should apply");
        assert_eq!(game.side_to_move, Color::Black);
        assert_eq!(game.en_passant_square, Some(20));

        game.unmake_move(&undo);
        assert_eq!(game.get_fen(), fen_before);
        assert_eq!(game.zobrist_key, key_before);
        assert!(game.is_consistent());
    }

    #[test]
    fn castling_moves_king_and_rook_together() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", false)
            .expect("castling FEN should parse");

        let undo = game
            .make_move(Move::castling(4, 7))
            .expect("kingside castling should apply");

        assert_eq!(game.piece_on(6), Some((Color::White, PieceKind::King)));
        assert_eq!(game.piece_on(5), Some((Color::White, PieceKind::Rook)));
        assert_eq!(game.piece_on(4), None);
        assert_eq!(game.piece_on(7), None);
        assert_eq!(game.castling_rights & castle_rights_of(Color::White), 0);
        assert_ne!(game.castling_rights & castle_rights_of(Color::Black), 0);

        game.unmake_move(&undo);
        assert_eq!(game.piece_on(4), Some((Color::White, PieceKind::King)));
        assert_eq!(game.piece_on(7), Some((Color::White, PieceKind::Rook)));
        assert_eq!(game.castling_rights, 0x0F);
    }

    #[test]
    fn en_passant_removes_the_bypassed_pawn() {
        let mut game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", false)
            .expect("en-passant FEN should parse");

        let undo = game
            .make_move(Move::en_passant(36, 43))
            .expect("en-passant capture should apply");
        assert_eq!(game.piece_on(43), Some((Color::White, PieceKind::Pawn)));
        assert_eq!(game.piece_on(35), None);

        game.unmake_move(&undo);
        assert_eq!(game.piece_on(35), Some((Color::Black, PieceKind::Pawn)));
        assert_eq!(game.piece_on(36), Some((Color::White, PieceKind::Pawn)));
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", false)
            .expect("promotion FEN should parse");

        let undo = game
            .make_move(Move::promotion(48, 56, PieceKind::Queen))
            .expect("promotion should apply");
        assert_eq!(game.piece_on(56), Some((Color::White, PieceKind::Queen)));

        game.unmake_move(&undo);
        assert_eq!(game.piece_on(48), Some((Color::White, PieceKind::Pawn)));
        assert_eq!(game.piece_on(56), None);
    }

    #[test]
    fn flip_mirrors_pieces_rights_and_side() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1", false)
            .expect("FEN should parse");
        let flipped = game.flipped();

        assert_eq!(flipped.side_to_move, Color::White);
        assert_eq!(
            flipped.castling_rights,
            CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE
        );
        assert_eq!(flipped.piece_on(4), Some((Color::White, PieceKind::King)));
        assert_eq!(flipped.piece_on(60), Some((Color::Black, PieceKind::King)));
        assert!(flipped.is_consistent());
    }

    #[test]
    fn null_move_passes_the_turn() {
        let mut game = GameState::new_game();
        let undo = game.make_move(Move::Null).expect("null move should apply");
        assert_eq!(game.side_to_move, Color::Black);
        game.unmake_move(&undo);
        assert_eq!(game.side_to_move, Color::White);
        assert_eq!(game.get_fen(), GameState::new_game().get_fen());
    }
}
