/// Core value types shared by the board model, move generation, and the UCI
/// front end.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Piece kind (color is tracked separately in the board arrays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Board square index (`0 == a1`, `63 == h8`).
pub type Square = u8;

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;

#[inline]
pub const fn castle_rights_of(color: Color) -> CastlingRights {
    match color {
        Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
    }
}

/// Classification of a real move, beyond its from/to squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Promotion,
    EnPassant,
    Castling,
}

/// Payload of a real move.
///
/// Castling is always held internally as "king moves to the rook's square";
/// the notation codec translates this to the displayed destination depending
/// on the castling-notation variant in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveData {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub kind: MoveKind,
}

/// A move, including the two sentinel values.
///
/// `None` is the absence of a move (a token that failed to decode); `Null`
/// is a pass. Mixing sentinels and payload in one sum type keeps every
/// `match` on a move exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    None,
    Null,
    Real(MoveData),
}

impl Move {
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::Real(MoveData {
            from,
            to,
            promotion: None,
            kind: MoveKind::Normal,
        })
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        Move::Real(MoveData {
            from,
            to,
            promotion: Some(piece),
            kind: MoveKind::Promotion,
        })
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::Real(MoveData {
            from,
            to,
            promotion: None,
            kind: MoveKind::EnPassant,
        })
    }

    /// Castling with `to` set to the rook's square.
    #[inline]
    pub const fn castling(king_from: Square, rook_square: Square) -> Self {
        Move::Real(MoveData {
            from: king_from,
            to: rook_square,
            promotion: None,
            kind: MoveKind::Castling,
        })
    }

    #[inline]
    pub const fn is_real(self) -> bool {
        matches!(self, Move::Real(_))
    }

    #[inline]
    pub fn data(self) -> Option<MoveData> {
        match self {
            Move::Real(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_indices_and_opposites() {
        assert_eq!(Color::White.index(), 0);
        assert_eq!(Color::Black.index(), 1);
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn sentinel_moves_are_not_real() {
        assert!(!Move::None.is_real());
        assert!(!Move::Null.is_real());
        assert!(Move::normal(12, 28).is_real());
        assert_eq!(Move::None.data(), None);
    }

    #[test]
    fn castle_rights_cover_both_sides() {
        assert_eq!(
            castle_rights_of(Color::White),
            CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE
        );
        assert_eq!(
            castle_rights_of(Color::Black),
            CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE
        );
    }
}
