//! Attack-set geometry, used to build the lookup and magic tables.
//!
//! Everything here recomputes attack patterns from scratch by stepping
//! bitboards around the board. That is far too slow for move generation
//! itself, which instead reads the tables built from these functions.

use num_derive::{FromPrimitive, ToPrimitive};

use crate::board::{Bitboard, Square};

/// A ray direction from a starting square.
///
/// The first four variants are the "positive" directions, in which square
/// indices increase along the ray; the last four are the "negative" ones.
/// Finding the first blocker along a ray is a forward bitscan for the
/// former and a reverse bitscan for the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Direction {
    East = 0,
    North = 1,
    NorthEast = 2,
    NorthWest = 3,
    West = 4,
    South = 5,
    SouthWest = 6,
    SouthEast = 7,
}

impl Direction {
    fn step(self) -> fn(Bitboard) -> Bitboard {
        match self {
            Direction::East => Bitboard::step_east,
            Direction::North => Bitboard::step_north,
            Direction::NorthEast => Bitboard::step_north_east,
            Direction::NorthWest => Bitboard::step_north_west,
            Direction::West => Bitboard::step_west,
            Direction::South => Bitboard::step_south,
            Direction::SouthWest => Bitboard::step_south_west,
            Direction::SouthEast => Bitboard::step_south_east,
        }
    }

    const fn is_positive(self) -> bool {
        (self as usize) < 4
    }
}

/// All knight attacks from a board of knights.
pub fn knight_attacks(b: Bitboard) -> Bitboard {
    const NOT_A: Bitboard = Bitboard::A_FILE.not();
    const NOT_AB: Bitboard = Bitboard::A_FILE.or(Bitboard::B_FILE).not();
    const NOT_H: Bitboard = Bitboard::H_FILE.not();
    const NOT_GH: Bitboard = Bitboard::G_FILE.or(Bitboard::H_FILE).not();

    let mut attacks = Bitboard::EMPTY;

    attacks |= Bitboard(b.0 << 17) & NOT_A;
    attacks |= Bitboard(b.0 << 10) & NOT_AB;
    attacks |= Bitboard(b.0 >> 6) & NOT_AB;
    attacks |= Bitboard(b.0 >> 15) & NOT_A;
    attacks |= Bitboard(b.0 << 15) & NOT_H;
    attacks |= Bitboard(b.0 << 6) & NOT_GH;
    attacks |= Bitboard(b.0 >> 10) & NOT_GH;
    attacks |= Bitboard(b.0 >> 17) & NOT_H;

    attacks
}

/// All king attacks from a board of kings.
pub fn king_attacks(b: Bitboard) -> Bitboard {
    let mut attacks = b.step_east() | b.step_west();
    let row = b | attacks;
    attacks |= row.step_north() | row.step_south();
    attacks
}

/// Squares attacked diagonally forward by white pawns, regardless of what
/// occupies them.
pub fn white_pawn_attacks(b: Bitboard) -> Bitboard {
    b.step_north_east() | b.step_north_west()
}

/// Squares attacked diagonally forward by black pawns.
pub fn black_pawn_attacks(b: Bitboard) -> Bitboard {
    b.step_south_east() | b.step_south_west()
}

fn unblocked_ray(b: Bitboard, dir: Direction) -> Bitboard {
    let step = dir.step();

    let mut ray = step(b);
    loop {
        let extended = ray | step(ray);
        if extended == ray {
            return ray;
        }
        ray = extended;
    }
}

/// Generates the full ray table: for every square and [`Direction`], the
/// ray from that square to the board edge, exclusive of the square itself.
pub fn gen_ray_attacks() -> [[Bitboard; 8]; 64] {
    use num_traits::FromPrimitive;

    let mut rays = [[Bitboard::EMPTY; 8]; 64];

    for (sq, rays_from_square) in rays.iter_mut().enumerate() {
        let origin = Bitboard::from_index(sq);
        for (dir, ray) in rays_from_square.iter_mut().enumerate() {
            *ray = unblocked_ray(origin, Direction::from_usize(dir).unwrap());
        }
    }

    rays
}

fn blocked_ray(
    occupied: Bitboard,
    square: Square,
    dir: Direction,
    rays: &[[Bitboard; 8]; 64],
) -> Bitboard {
    let ray = rays[square.index()][dir as usize];
    let blockers = ray & occupied;

    // OR in a sentinel bit so the scan hits something even with no
    // blockers; the sentinel's ray is empty in that direction.
    let first_blocker = if dir.is_positive() {
        (blockers | Bitboard(0x8000_0000_0000_0000)).lsb()
    } else {
        (blockers | Bitboard(1)).msb()
    };

    ray ^ rays[first_blocker as usize][dir as usize]
}

/// Rook attacks from `square`, stopping at (and including) the first
/// blocker in each direction.
pub fn rook_attacks(occupied: Bitboard, square: Square, rays: &[[Bitboard; 8]; 64]) -> Bitboard {
    blocked_ray(occupied, square, Direction::North, rays)
        | blocked_ray(occupied, square, Direction::South, rays)
        | blocked_ray(occupied, square, Direction::East, rays)
        | blocked_ray(occupied, square, Direction::West, rays)
}

/// Bishop attacks from `square`, stopping at (and including) the first
/// blocker in each direction.
pub fn bishop_attacks(occupied: Bitboard, square: Square, rays: &[[Bitboard; 8]; 64]) -> Bitboard {
    blocked_ray(occupied, square, Direction::NorthEast, rays)
        | blocked_ray(occupied, square, Direction::SouthWest, rays)
        | blocked_ray(occupied, square, Direction::NorthWest, rays)
        | blocked_ray(occupied, square, Direction::SouthEast, rays)
}

/// The squares on which a piece can affect a rook's attack set from
/// `square`.
///
/// A blocker on the final square of a ray changes nothing (the attack set
/// includes the first blocker anyway), so board edges are left out. This
/// keeps the magic hash inputs as small as possible.
pub fn rook_blocker_mask(square: Square, rays: &[[Bitboard; 8]; 64]) -> Bitboard {
    let vertical = (rays[square.index()][Direction::North as usize]
        | rays[square.index()][Direction::South as usize])
        .without(Bitboard::RANK_1 | Bitboard::RANK_8);
    let horizontal = (rays[square.index()][Direction::East as usize]
        | rays[square.index()][Direction::West as usize])
        .without(Bitboard::A_FILE | Bitboard::H_FILE);

    vertical | horizontal
}

/// The squares on which a piece can affect a bishop's attack set from
/// `square`. Board edges are excluded, as for [`rook_blocker_mask`].
pub fn bishop_blocker_mask(square: Square, rays: &[[Bitboard; 8]; 64]) -> Bitboard {
    let edges = Bitboard::RANK_1 | Bitboard::RANK_8 | Bitboard::A_FILE | Bitboard::H_FILE;

    (rays[square.index()][Direction::NorthEast as usize]
        | rays[square.index()][Direction::NorthWest as usize]
        | rays[square.index()][Direction::SouthWest as usize]
        | rays[square.index()][Direction::SouthEast as usize])
        .without(edges)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_knight_attacks() {
        assert_eq!(
            knight_attacks(Bitboard::from_square(Square::D4)),
            "
                . . . . . . . .
                . . . . . . . .
                . . # . # . . .
                . # . . . # . .
                . . . . . . . .
                . # . . . # . .
                . . # . # . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );

        assert_eq!(
            knight_attacks(Bitboard::from_square(Square::A1)),
            "
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . # . . . . . .
                . . # . . . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );

        assert_eq!(
            knight_attacks(Bitboard::from_square(Square::H5)),
            "
                . . . . . . . .
                . . . . . . # .
                . . . . . # . .
                . . . . . . . .
                . . . . . # . .
                . . . . . . # .
                . . . . . . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(
            king_attacks(Bitboard::from_square(Square::D4)),
            "
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . # # # . . .
                . . # . # . . .
                . . # # # . . .
                . . . . . . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );

        assert_eq!(
            king_attacks(Bitboard::from_square(Square::A1)),
            "
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                # # . . . . . .
                . # . . . . . .
            "
            .parse()
            .unwrap()
        );
    }

    #[test]
    fn test_pawn_attacks() {
        assert_eq!(
            white_pawn_attacks(Bitboard::from_square(Square::E4)),
            Bitboard::from_square(Square::D5) | Bitboard::from_square(Square::F5)
        );
        assert_eq!(
            black_pawn_attacks(Bitboard::from_square(Square::E4)),
            Bitboard::from_square(Square::D3) | Bitboard::from_square(Square::F3)
        );

        // edge files attack a single square
        assert_eq!(
            white_pawn_attacks(Bitboard::from_square(Square::A2)),
            Bitboard::from_square(Square::B3)
        );
        assert_eq!(
            black_pawn_attacks(Bitboard::from_square(Square::H7)),
            Bitboard::from_square(Square::G6)
        );

        // pawns on the last rank have no forward attacks
        assert_eq!(
            white_pawn_attacks(Bitboard::from_square(Square::E8)),
            Bitboard::EMPTY
        );
        assert_eq!(
            black_pawn_attacks(Bitboard::from_square(Square::E1)),
            Bitboard::EMPTY
        );
    }

    #[test]
    fn test_rook_attacks() {
        let rays = gen_ray_attacks();

        assert_eq!(
            rook_attacks(Bitboard::EMPTY, Square::E4, &rays),
            "
                . . . . # . . .
                . . . . # . . .
                . . . . # . . .
                . . . . # . . .
                # # # # . # # #
                . . . . # . . .
                . . . . # . . .
                . . . . # . . .
            "
            .parse()
            .unwrap(),
        );

        let occupied = "
                . . . . . . . .
                . . . . # . . .
                . . . . . . . .
                . . . . # . . .
                . . # . # . . .
                . . . . . . . .
                . . . # . . . .
                . . . . # . . .
        "
        .parse()
        .unwrap();
        assert_eq!(
            rook_attacks(occupied, Square::E4, &rays),
            "
                . . . . . . . .
                . . . . . . . .
                . . . . . . . .
                . . . . # . . .
                . . # # . # # #
                . . . . # . . .
                . . . . # . . .
                . . . . # . . .
            "
            .parse()
            .unwrap(),
        );
    }

    #[test]
    fn test_bishop_attacks() {
        let rays = gen_ray_attacks();

        assert_eq!(
            bishop_attacks(Bitboard::EMPTY, Square::E4, &rays),
            "
                # . . . . . . .
                . # . . . . . #
                . . # . . . # .
                . . . # . # . .
                . . . . . . . .
                . . . # . # . .
                . . # . . . # .
                . # . . . . . #
            "
            .parse()
            .unwrap(),
        );

        let occupied = "
                . . . . . . . .
                . # . . . . . .
                . . . . . . . .
                . . . # . . . .
                . . . . . . . .
                . . . . . . . .
                . . # . . . . .
                . . . . . . . .
        "
        .parse()
        .unwrap();
        assert_eq!(
            bishop_attacks(occupied, Square::E4, &rays),
            "
                . . . . . . . .
                . . . . . . . #
                . . . . . . # .
                . . . # . # . .
                . . . . . . . .
                . . . # . # . .
                . . # . . . # .
                . . . . . . . #
            "
            .parse()
            .unwrap(),
        );
    }

    #[test]
    fn test_rook_blocker_mask() {
        let rays = gen_ray_attacks();

        assert_eq!(
            rook_blocker_mask(Square::E4, &rays),
            "
                . . . . . . . .
                . . . . # . . .
                . . . . # . . .
                . . . . # . . .
                . # # # . # # .
                . . . . # . . .
                . . . . # . . .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );

        // corner masks keep the rays but still drop the far edge squares
        assert_eq!(
            rook_blocker_mask(Square::A1, &rays),
            "
                . . . . . . . .
                # . . . . . . .
                # . . . . . . .
                # . . . . . . .
                # . . . . . . .
                # . . . . . . .
                # . . . . . . .
                . # # # # # # .
            "
            .parse()
            .unwrap()
        );
        assert_eq!(rook_blocker_mask(Square::A1, &rays).pop_count(), 12);
    }

    #[test]
    fn test_bishop_blocker_mask() {
        let rays = gen_ray_attacks();

        assert_eq!(
            bishop_blocker_mask(Square::E4, &rays),
            "
                . . . . . . . .
                . # . . . . . .
                . . # . . . # .
                . . . # . # . .
                . . . . . . . .
                . . . # . # . .
                . . # . . . # .
                . . . . . . . .
            "
            .parse()
            .unwrap()
        );

        assert_eq!(bishop_blocker_mask(Square::A1, &rays).pop_count(), 6);
        assert_eq!(bishop_blocker_mask(Square::D4, &rays).pop_count(), 9);
    }
}
