//! Pseudo-legal move generation.
//!
//! The generator enumerates every move that obeys piece-movement rules
//! for the side to move, without regard for whether the king is left in
//! check. Legality filtering happens in `Board::legal_moves`, which makes
//! each candidate, tests the king, and unmakes.

use arrayvec::ArrayVec;

use crate::board::{Bitboard, Board, Castling, Color, Move, MoveFlag, Piece, PieceType, Square};

use lookups::Lookups;

pub mod lookups;
pub mod magic;
pub mod rays;

/// Upper bound on the number of moves in any legal position, used to
/// stack-allocate the move buffer. The known maximum is 218; 256 leaves
/// headroom.
pub const MAX_MOVES: usize = 256;

pub type MoveVec = ArrayVec<Move, MAX_MOVES>;

const PROMOTION_TARGETS: [PieceType; 4] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

/// Enumerates pseudo-legal moves for the side to move into an output
/// buffer. Enumeration order is deterministic for a given position.
pub struct MoveGenerator<'board, 'moves> {
    lookups: &'static Lookups,
    board: &'board Board,
    to_move: Color,
    empty: Bitboard,
    friendly: Bitboard,
    enemy: Bitboard,
    out_moves: &'moves mut MoveVec,
}

impl<'board, 'moves> MoveGenerator<'board, 'moves> {
    pub fn new(board: &'board Board, out_moves: &'moves mut MoveVec) -> Self {
        let to_move = board.to_move();
        Self {
            lookups: Lookups::get_instance(),
            board,
            to_move,
            empty: board.empty(),
            friendly: board.occupancy(to_move),
            enemy: board.occupancy(to_move.flip()),
            out_moves,
        }
    }

    pub fn pseudo_legal_moves(&mut self) {
        self.pawn_pushes();
        self.pawn_captures();
        self.en_passants();
        self.knight_moves();
        self.bishop_moves();
        self.rook_moves();
        self.queen_moves();
        self.king_moves();
        self.castling_moves();
    }

    /// The rank a pawn of the side to move promotes *from*.
    fn promotion_rank(&self) -> u8 {
        match self.to_move {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    fn push_promotions(&mut self, from: Square, to: Square, capture: bool) {
        for piece_type in PROMOTION_TARGETS {
            self.out_moves.push(Move::new(
                from,
                to,
                MoveFlag::promotion(piece_type, capture),
            ));
        }
    }

    fn pawn_pushes(&mut self) {
        let pawns = self.board[Piece::pawn(self.to_move)];

        // A pawn can push if the square ahead is empty, which set-wise
        // means the pawn sits on the empty set stepped backwards.
        let (single, double, forward) = match self.to_move {
            Color::White => (
                pawns & self.empty.step_south(),
                pawns
                    & Bitboard::RANK_2
                    & self.empty.step_south()
                    & self.empty.step_south().step_south(),
                8i8,
            ),
            Color::Black => (
                pawns & self.empty.step_north(),
                pawns
                    & Bitboard::RANK_7
                    & self.empty.step_north()
                    & self.empty.step_north().step_north(),
                -8i8,
            ),
        };

        let promotion_rank = self.promotion_rank();

        for from in single.squares() {
            let to = from.offset(forward);
            if from.rank() == promotion_rank {
                self.push_promotions(from, to, false);
            } else {
                self.out_moves.push(Move::new(from, to, MoveFlag::Quiet));
            }
        }

        for from in double.squares() {
            self.out_moves
                .push(Move::new(from, from.offset(2 * forward), MoveFlag::DoublePush));
        }
    }

    fn pawn_captures(&mut self) {
        let pawns = self.board[Piece::pawn(self.to_move)];

        // Pawns able to capture toward each side, found by stepping the
        // capturable pieces backwards onto the pawns.
        let (east, west, east_offset, west_offset) = match self.to_move {
            Color::White => (
                pawns & self.enemy.step_south_west(),
                pawns & self.enemy.step_south_east(),
                9i8,
                7i8,
            ),
            Color::Black => (
                pawns & self.enemy.step_north_west(),
                pawns & self.enemy.step_north_east(),
                -7i8,
                -9i8,
            ),
        };

        let promotion_rank = self.promotion_rank();

        for (set, offset) in [(east, east_offset), (west, west_offset)] {
            for from in set.squares() {
                let to = from.offset(offset);
                if from.rank() == promotion_rank {
                    self.push_promotions(from, to, true);
                } else {
                    self.out_moves.push(Move::new(from, to, MoveFlag::Capture));
                }
            }
        }
    }

    fn en_passants(&mut self) {
        let Some(target) = self.board.en_passant() else {
            return;
        };

        // A pawn attacks the target square exactly when an opposite-color
        // pawn on the target would attack the pawn's square.
        let candidates = self.board[Piece::pawn(self.to_move)]
            & self.lookups.pawn_attacks(self.to_move.flip(), target);

        for from in candidates.squares() {
            self.out_moves
                .push(Move::new(from, target, MoveFlag::EnPassant));
        }
    }

    fn push_piece_moves(&mut self, from: Square, attacks: Bitboard) {
        for to in (attacks & self.enemy).squares() {
            self.out_moves.push(Move::new(from, to, MoveFlag::Capture));
        }
        for to in (attacks & self.empty).squares() {
            self.out_moves.push(Move::new(from, to, MoveFlag::Quiet));
        }
    }

    fn knight_moves(&mut self) {
        for from in self.board[Piece::knight(self.to_move)].squares() {
            let attacks = self.lookups.knight_attacks(from).without(self.friendly);
            self.push_piece_moves(from, attacks);
        }
    }

    fn bishop_moves(&mut self) {
        let occupied = self.friendly | self.enemy;
        for from in self.board[Piece::bishop(self.to_move)].squares() {
            let attacks = self
                .lookups
                .bishop_attacks(occupied, from)
                .without(self.friendly);
            self.push_piece_moves(from, attacks);
        }
    }

    fn rook_moves(&mut self) {
        let occupied = self.friendly | self.enemy;
        for from in self.board[Piece::rook(self.to_move)].squares() {
            let attacks = self
                .lookups
                .rook_attacks(occupied, from)
                .without(self.friendly);
            self.push_piece_moves(from, attacks);
        }
    }

    fn queen_moves(&mut self) {
        let occupied = self.friendly | self.enemy;
        for from in self.board[Piece::queen(self.to_move)].squares() {
            let attacks = self
                .lookups
                .queen_attacks(occupied, from)
                .without(self.friendly);
            self.push_piece_moves(from, attacks);
        }
    }

    fn king_moves(&mut self) {
        for from in self.board[Piece::king(self.to_move)].squares() {
            let attacks = self.lookups.king_attacks(from).without(self.friendly);
            self.push_piece_moves(from, attacks);
        }
    }

    /// Castles are emitted fully checked: the right must remain, the
    /// squares between king and rook must be empty, the rook must still
    /// stand on its home square, and the king's own square, transit
    /// square, and destination must not be attacked.
    fn castling_moves(&mut self) {
        let opponent = self.to_move.flip();
        let occupied = self.friendly | self.enemy;
        let rooks = self.board[Piece::rook(self.to_move)];

        let (kingside, queenside, king_from) = match self.to_move {
            Color::White => (
                Castling::WHITE_KINGSIDE,
                Castling::WHITE_QUEENSIDE,
                Square::E1,
            ),
            Color::Black => (
                Castling::BLACK_KINGSIDE,
                Castling::BLACK_QUEENSIDE,
                Square::E8,
            ),
        };

        if !self.board[Piece::king(self.to_move)].get(king_from) {
            return;
        }

        if self.board.castling().contains(kingside) {
            let transit = king_from.offset(1);
            let king_to = king_from.offset(2);
            let between = Bitboard::from_square(transit) | Bitboard::from_square(king_to);

            if (occupied & between).is_empty()
                && rooks.get(king_from.offset(3))
                && !self.board.is_square_attacked(king_from, opponent)
                && !self.board.is_square_attacked(transit, opponent)
                && !self.board.is_square_attacked(king_to, opponent)
            {
                self.out_moves
                    .push(Move::new(king_from, king_to, MoveFlag::KingCastle));
            }
        }

        if self.board.castling().contains(queenside) {
            let transit = king_from.offset(-1);
            let king_to = king_from.offset(-2);
            let between = Bitboard::from_square(transit)
                | Bitboard::from_square(king_to)
                | Bitboard::from_square(king_from.offset(-3));

            if (occupied & between).is_empty()
                && rooks.get(king_from.offset(-4))
                && !self.board.is_square_attacked(king_from, opponent)
                && !self.board.is_square_attacked(transit, opponent)
                && !self.board.is_square_attacked(king_to, opponent)
            {
                self.out_moves
                    .push(Move::new(king_from, king_to, MoveFlag::QueenCastle));
            }
        }
    }
}
