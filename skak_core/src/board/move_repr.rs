use std::fmt::{Debug, Display};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

use super::{PieceType, Square};

/// The special-move tag carried in the top four bits of a [`Move`].
///
/// Bit 2 marks captures (including the promotion-capture block), and
/// values 8 and up are promotions, so both properties are simple bit
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum MoveFlag {
    Quiet = 0,
    DoublePush = 1,
    KingCastle = 2,
    QueenCastle = 3,
    Capture = 4,
    EnPassant = 5,
    KnightPromotion = 8,
    BishopPromotion = 9,
    RookPromotion = 10,
    QueenPromotion = 11,
    KnightPromotionCapture = 12,
    BishopPromotionCapture = 13,
    RookPromotionCapture = 14,
    QueenPromotionCapture = 15,
}

impl MoveFlag {
    pub const fn is_capture(self) -> bool {
        (self as u16) & 4 != 0
    }

    pub const fn is_promotion(self) -> bool {
        (self as u16) >= 8
    }

    pub const fn is_castle(self) -> bool {
        matches!(self, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }

    /// The promotion flag for the given target piece, optionally combined
    /// with a capture. Panics for pawns and kings, which are not valid
    /// promotion targets.
    pub fn promotion(piece_type: PieceType, capture: bool) -> Self {
        let base = match piece_type {
            PieceType::Knight => 8,
            PieceType::Bishop => 9,
            PieceType::Rook => 10,
            PieceType::Queen => 11,
            _ => panic!("not a promotion target: {piece_type:?}"),
        };
        Self::from_u16(base + if capture { 4 } else { 0 }).unwrap()
    }
}

/// Move data packed into 16 bits.
///
/// ```txt
/// FFFF TTTTTT SSSSSS
///    |      |      |
///    |      |      +-- from square (bits 0-5)
///    |      +--------- to square (bits 6-11)
///    +---------------- flag (bits 12-15)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move(u16);

impl Move {
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Self((from.get() as u16) | ((to.get() as u16) << 6) | ((flag as u16) << 12))
    }

    /// The raw 16-bit encoding, suitable for passing over an external
    /// boundary as a plain integer.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Reconstructs a move from its raw encoding. The flag bits must hold
    /// one of the defined [`MoveFlag`] values.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn from_square(self) -> Square {
        Square::from_u8_unchecked((self.0 & 0x3F) as u8)
    }

    pub const fn to_square(self) -> Square {
        Square::from_u8_unchecked(((self.0 >> 6) & 0x3F) as u8)
    }

    pub fn flag(self) -> MoveFlag {
        MoveFlag::from_u16(self.0 >> 12).expect("invalid move flag bits")
    }

    pub const fn is_capture(self) -> bool {
        (self.0 >> 12) & 4 != 0
    }

    pub const fn is_promotion(self) -> bool {
        (self.0 >> 12) >= 8
    }

    /// The piece kind this move promotes to, if it is a promotion.
    pub fn promotion_piece(self) -> Option<PieceType> {
        if self.is_promotion() {
            // Flag bits 0-1 select knight, bishop, rook, queen in order.
            PieceType::from_u16(((self.0 >> 12) & 3) + 1)
        } else {
            None
        }
    }
}

/// Coordinate notation: source square, destination square, and a lowercase
/// piece letter for promotions, e.g. `e2e4` or `e7e8q`.
impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from_square(), self.to_square())?;
        if let Some(piece_type) = self.promotion_piece() {
            write!(f, "{}", piece_type.as_lowercase_char())?;
        }
        Ok(())
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Move({:?} -> {:?}, {:?})",
            self.from_square(),
            self.to_square(),
            self.flag()
        )
    }
}
