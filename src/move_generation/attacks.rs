//! Attack maps and check detection.
//!
//! Leaper attacks (pawn, knight, king) come from compile-time tables; slider
//! attacks trace rays against the live occupancy.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&KNIGHT_DELTAS);
pub const KING_ATTACKS: [u64; 64] = leaper_table(&KING_DELTAS);
pub const WHITE_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, 1), (1, 1)]);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, -1), (1, -1)]);

const fn leaper_table(deltas: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut targets = 0u64;

        let mut i = 0usize;
        while i < deltas.len() {
            let f = file + deltas[i].0;
            let r = rank + deltas[i].1;
            if f >= 0 && f <= 7 && r >= 0 && r <= 7 {
                targets |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }

        table[sq] = targets;
        sq += 1;
    }

    table
}

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

fn ray_attacks(square: Square, occupancy: u64, file_step: i32, rank_step: i32) -> u64 {
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;
    let mut targets = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        targets |= bit;
        if (occupancy & bit) != 0 {
            break;
        }
        file += file_step;
        rank += rank_step;
    }

    targets
}

pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ray_attacks(square, occupancy, 1, 0)
        | ray_attacks(square, occupancy, -1, 0)
        | ray_attacks(square, occupancy, 0, 1)
        | ray_attacks(square, occupancy, 0, -1)
}

pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    ray_attacks(square, occupancy, 1, 1)
        | ray_attacks(square, occupancy, 1, -1)
        | ray_attacks(square, occupancy, -1, 1)
        | ray_attacks(square, occupancy, -1, -1)
}

#[inline]
pub fn king_square(game: &GameState, color: Color) -> Option<Square> {
    let kings = game.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

pub fn is_square_attacked(game: &GameState, square: Square, attacker: Color) -> bool {
    let boards = &game.pieces[attacker.index()];

    // Pawn attacks are looked up from the defender's perspective.
    if pawn_attacks(attacker.opposite(), square) & boards[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & boards[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & boards[PieceKind::King.index()] != 0 {
        return true;
    }

    let diagonal = boards[PieceKind::Bishop.index()] | boards[PieceKind::Queen.index()];
    if bishop_attacks(square, game.occupancy_all) & diagonal != 0 {
        return true;
    }

    let straight = boards[PieceKind::Rook.index()] | boards[PieceKind::Queen.index()];
    rook_attacks(square, game.occupancy_all) & straight != 0
}

#[inline]
pub fn is_king_in_check(game: &GameState, color: Color) -> bool {
    match king_square(game, color) {
        Some(sq) => is_square_attacked(game, sq, color.opposite()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;

    #[test]
    fn knight_on_d4_attacks_eight_squares() {
        assert_eq!(knight_attacks(27).count_ones(), 8);
    }

    #[test]
    fn king_in_the_corner_attacks_three_squares() {
        assert_eq!(king_attacks(0).count_ones(), 3);
        assert_eq!(king_attacks(63).count_ones(), 3);
    }

    #[test]
    fn pawn_attacks_point_toward_the_enemy() {
        // e2 for white hits d3 and f3.
        assert_eq!(pawn_attacks(Color::White, 12), (1u64 << 19) | (1u64 << 21));
        // e7 for black hits d6 and f6.
        assert_eq!(pawn_attacks(Color::Black, 52), (1u64 << 43) | (1u64 << 45));
    }

    #[test]
    fn sliders_stop_at_blockers() {
        // Rook on a1, blocker on a4: reachable up-file squares are a2..a4.
        let occupancy = 1u64 << 24;
        let up_file = rook_attacks(0, occupancy) & 0x0101_0101_0101_0100;
        assert_eq!(up_file, (1u64 << 8) | (1u64 << 16) | (1u64 << 24));
    }

    #[test]
    fn check_detection_sees_a_queen_on_the_file() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K2q w - - 0 1", false)
            .expect("FEN should parse");
        assert!(is_king_in_check(&game, Color::White));
        assert!(!is_king_in_check(&game, Color::Black));
    }
}
