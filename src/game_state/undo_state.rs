use crate::game_state::chess_types::*;

/// Irreversible state saved before a move is applied, enough to reverse it.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: Move,
    pub captured_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,

    pub prev_zobrist_key: u64,
}

impl UndoState {
    /// Fresh record seeding a new session; no move has been applied yet.
    #[inline]
    pub fn seed() -> Self {
        Self {
            mv: Move::None,
            captured_piece: None,
            prev_castling_rights: 0,
            prev_en_passant_square: None,
            prev_halfmove_clock: 0,
            prev_zobrist_key: 0,
        }
    }
}
