//! Legal move generation.
//!
//! Pseudo-legal moves are produced piece by piece, then filtered by applying
//! each candidate and rejecting those that leave the mover's king in check.
//! Castling is emitted with the internal king-captures-rook encoding.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::attacks::{
    bishop_attacks, is_king_in_check, is_square_attacked, king_attacks, knight_attacks,
    rook_attacks,
};

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Enumerate every legal move for the side to move.
pub fn legal_moves(game: &GameState) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    pawn_moves(game, &mut pseudo);
    knight_moves(game, &mut pseudo);
    slider_moves(game, PieceKind::Bishop, &mut pseudo);
    slider_moves(game, PieceKind::Rook, &mut pseudo);
    slider_moves(game, PieceKind::Queen, &mut pseudo);
    king_moves(game, &mut pseudo);

    let us = game.side_to_move;
    let mut scratch = game.clone();
    let mut legal = Vec::<Move>::with_capacity(pseudo.len());

    for mv in pseudo {
        let Ok(undo) = scratch.make_move(mv) else {
            continue;
        };
        if !is_king_in_check(&scratch, us) {
            legal.push(mv);
        }
        scratch.unmake_move(&undo);
    }

    legal
}

fn pawn_moves(game: &GameState, out: &mut Vec<Move>) {
    let us = game.side_to_move;
    let empty = !game.occupancy_all;
    let enemy_occ = game.occupancy_by_color[us.opposite().index()];

    let (forward, start_rank, promotion_rank): (i32, u8, u8) = match us {
        Color::White => (8, 1, 7),
        Color::Black => (-8, 6, 0),
    };

    let mut pawns = game.pieces[us.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let one_step_i = from as i32 + forward;
        if !(0..64).contains(&one_step_i) {
            continue;
        }
        let one_step = one_step_i as Square;
        if (empty & (1u64 << one_step)) != 0 {
            push_pawn_advance(out, from, one_step, promotion_rank);

            if from / 8 == start_rank {
                let two_step = (from as i32 + 2 * forward) as Square;
                if (empty & (1u64 << two_step)) != 0 {
                    out.push(Move::normal(from, two_step));
                }
            }
        }

        let file = from % 8;
        for side_step in [forward - 1, forward + 1] {
            // Stay on the board: a-file pawns cannot capture left, h-file right.
            if (side_step == forward - 1 && file == 0) || (side_step == forward + 1 && file == 7) {
                continue;
            }
            let to_i = from as i32 + side_step;
            if !(0..64).contains(&to_i) {
                continue;
            }
            let to = to_i as Square;

            if (enemy_occ & (1u64 << to)) != 0 {
                push_pawn_advance(out, from, to, promotion_rank);
            } else if game.en_passant_square == Some(to) {
                out.push(Move::en_passant(from, to));
            }
        }
    }
}

fn push_pawn_advance(out: &mut Vec<Move>, from: Square, to: Square, promotion_rank: u8) {
    if to / 8 == promotion_rank {
        for piece in PROMOTION_PIECES {
            out.push(Move::promotion(from, to, piece));
        }
    } else {
        out.push(Move::normal(from, to));
    }
}

fn knight_moves(game: &GameState, out: &mut Vec<Move>) {
    let us = game.side_to_move;
    let own_occ = game.occupancy_by_color[us.index()];

    let mut knights = game.pieces[us.index()][PieceKind::Knight.index()];
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        knights &= knights - 1;

        push_targets(out, from, knight_attacks(from) & !own_occ);
    }
}

fn slider_moves(game: &GameState, piece: PieceKind, out: &mut Vec<Move>) {
    let us = game.side_to_move;
    let own_occ = game.occupancy_by_color[us.index()];

    let mut sliders = game.pieces[us.index()][piece.index()];
    while sliders != 0 {
        let from = sliders.trailing_zeros() as Square;
        sliders &= sliders - 1;

        let attacks = match piece {
            PieceKind::Bishop => bishop_attacks(from, game.occupancy_all),
            PieceKind::Rook => rook_attacks(from, game.occupancy_all),
            _ => {
                bishop_attacks(from, game.occupancy_all) | rook_attacks(from, game.occupancy_all)
            }
        };
        push_targets(out, from, attacks & !own_occ);
    }
}

fn king_moves(game: &GameState, out: &mut Vec<Move>) {
    let us = game.side_to_move;
    let own_occ = game.occupancy_by_color[us.index()];
    let kings = game.pieces[us.index()][PieceKind::King.index()];
    if kings == 0 {
        return;
    }

    let from = kings.trailing_zeros() as Square;
    push_targets(out, from, king_attacks(from) & !own_occ);
    castling_moves(game, from, out);
}

fn castling_moves(game: &GameState, king_from: Square, out: &mut Vec<Move>) {
    let us = game.side_to_move;
    let them = us.opposite();

    let (home, kingside_right, queenside_right) = match us {
        Color::White => (4u8, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE),
        Color::Black => (60u8, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE),
    };

    if king_from != home || is_square_attacked(game, king_from, them) {
        return;
    }

    let rooks = game.pieces[us.index()][PieceKind::Rook.index()];

    if (game.castling_rights & kingside_right) != 0 && (rooks & (1u64 << (home + 3))) != 0 {
        let between = (1u64 << (home + 1)) | (1u64 << (home + 2));
        if (game.occupancy_all & between) == 0
            && !is_square_attacked(game, home + 1, them)
            && !is_square_attacked(game, home + 2, them)
        {
            out.push(Move::castling(home, home + 3));
        }
    }

    if (game.castling_rights & queenside_right) != 0 && (rooks & (1u64 << (home - 4))) != 0 {
        let between = (1u64 << (home - 1)) | (1u64 << (home - 2)) | (1u64 << (home - 3));
        if (game.occupancy_all & between) == 0
            && !is_square_attacked(game, home - 1, them)
            && !is_square_attacked(game, home - 2, them)
        {
            out.push(Move::castling(home, home - 4));
        }
    }
}

fn push_targets(out: &mut Vec<Move>, from: Square, mut targets: u64) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        targets &= targets - 1;
        out.push(Move::normal(from, to));
    }
}
