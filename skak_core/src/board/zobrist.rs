use std::{
    fmt::Debug,
    ops::{BitXor, BitXorAssign},
    sync::OnceLock,
};

use rand::{RngCore, SeedableRng};

use super::{Castling, Color, Piece, Square};

/// Zobrist hash of a position, covering the twelve piece bitboards, the
/// side to move, the castling rights, and the en passant file.
///
/// Two positions that are interchangeable for repetition purposes hash to
/// the same key. The key is maintained incrementally by make/unmake.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PositionKey(pub u64);

impl PositionKey {
    pub fn piece(piece: Piece, square: Square) -> Self {
        let table = ZobristTable::get_instance();
        Self(table.pieces[piece.index() * 64 + square.index()])
    }

    pub fn color(color: Color) -> Self {
        let table = ZobristTable::get_instance();
        match color {
            Color::White => Self(0),
            Color::Black => Self(table.black),
        }
    }

    pub fn castling(castling: Castling) -> Self {
        let table = ZobristTable::get_instance();
        Self(table.castling[castling.bits() as usize])
    }

    pub fn en_passant(en_passant: Option<Square>) -> Self {
        let table = ZobristTable::get_instance();
        match en_passant {
            Some(square) => Self(table.en_passant[square.file() as usize]),
            None => Self(0),
        }
    }
}

impl BitXor for PositionKey {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for PositionKey {
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl Debug for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PositionKey")
            .field(&format_args!("{:#018X}", self.0))
            .finish()
    }
}

struct ZobristTable {
    pieces: [u64; 12 * 64],
    black: u64,
    castling: [u64; 16],
    en_passant: [u64; 8],
}

impl ZobristTable {
    fn new() -> Self {
        let mut rng = rand_chacha::ChaCha12Rng::from_seed([
            0x6b, 0x02, 0xe5, 0x91, 0x4c, 0xd8, 0x37, 0xaa, 0x19, 0x75, 0xce, 0x40, 0x8f, 0x21,
            0xbc, 0x5e, 0xd1, 0x0a, 0x96, 0x43, 0x2f, 0xe8, 0x7b, 0x34, 0xc9, 0x50, 0x1d, 0xaf,
            0x62, 0x88, 0x3b, 0xf4,
        ]);

        let mut pieces = [0; 12 * 64];
        pieces.fill_with(|| rng.next_u64());

        let black = rng.next_u64();

        let mut castling = [0; 16];
        castling.fill_with(|| rng.next_u64());

        let mut en_passant = [0; 8];
        en_passant.fill_with(|| rng.next_u64());

        Self {
            pieces,
            black,
            castling,
            en_passant,
        }
    }

    fn get_instance() -> &'static Self {
        static INSTANCE: OnceLock<ZobristTable> = OnceLock::new();

        INSTANCE.get_or_init(Self::new)
    }
}
