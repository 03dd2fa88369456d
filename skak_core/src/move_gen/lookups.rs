//! Process-global lookup tables for move generation.

use std::sync::OnceLock;

use crate::board::{Bitboard, Color, Square};

use super::{
    magic::MagicTables,
    rays::{black_pawn_attacks, gen_ray_attacks, king_attacks, knight_attacks, white_pawn_attacks},
};

static LOOKUPS: OnceLock<Lookups> = OnceLock::new();

/// All the attack tables move generation reads: knight and king attacks,
/// pawn attacks per color, and the magic tables for the sliders.
///
/// Built on first use via [`Lookups::get_instance`], then immutable for
/// the lifetime of the process. Positions hold no table state of their
/// own, so any number of them (on any number of threads) share these
/// tables safely.
pub struct Lookups {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],

    magic: &'static MagicTables,
}

impl Lookups {
    fn new() -> Self {
        let rays = gen_ray_attacks();

        Self {
            knight: gen_table(knight_attacks),
            king: gen_table(king_attacks),
            pawn: [
                gen_table(white_pawn_attacks),
                gen_table(black_pawn_attacks),
            ],
            magic: MagicTables::get(&rays),
        }
    }

    /// The global instance. The first call builds every table, including
    /// the magic-number search; later calls return the cached reference.
    pub fn get_instance() -> &'static Self {
        LOOKUPS.get_or_init(Self::new)
    }

    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king[square.index()]
    }

    /// The two diagonally-forward squares a pawn of `color` on `square`
    /// attacks, whether or not anything stands there.
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        self.pawn[color.index()][square.index()]
    }

    pub fn rook_attacks(&self, occupied: Bitboard, square: Square) -> Bitboard {
        self.magic.rook_attacks(occupied, square)
    }

    pub fn bishop_attacks(&self, occupied: Bitboard, square: Square) -> Bitboard {
        self.magic.bishop_attacks(occupied, square)
    }

    pub fn queen_attacks(&self, occupied: Bitboard, square: Square) -> Bitboard {
        self.magic.queen_attacks(occupied, square)
    }
}

fn gen_table(attacks: impl Fn(Bitboard) -> Bitboard) -> [Bitboard; 64] {
    std::array::from_fn(|sq| attacks(Bitboard::from_index(sq)))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookups_knight_attacks() {
        let lookups = Lookups::get_instance();

        assert_eq!(
            lookups.knight_attacks(Square::G1),
            "
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . # . #
                . . . . # . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );
    }

    #[test]
    fn lookups_pawn_attacks_by_color() {
        let lookups = Lookups::get_instance();

        assert_eq!(
            lookups.pawn_attacks(Color::White, Square::D4),
            Bitboard::from_square(Square::C5) | Bitboard::from_square(Square::E5)
        );
        assert_eq!(
            lookups.pawn_attacks(Color::Black, Square::D4),
            Bitboard::from_square(Square::C3) | Bitboard::from_square(Square::E3)
        );
    }

    #[test]
    fn lookups_queen_attacks_union() {
        let lookups = Lookups::get_instance();
        let occupied = Bitboard::from_square(Square::E6) | Bitboard::from_square(Square::G4);

        assert_eq!(
            lookups.queen_attacks(occupied, Square::E4),
            lookups.rook_attacks(occupied, Square::E4)
                | lookups.bishop_attacks(occupied, Square::E4)
        );
    }
}
