use std::fmt::{Debug, Display, Write};

use num_derive::{FromPrimitive, ToPrimitive};

/// The two players.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }

    /// The opponent of this color.
    pub const fn flip(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The kind of a piece, without its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    pub const fn with_color(self, color: Color) -> Piece {
        Piece::new(color, self)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// FEN character of the white piece of this kind.
    pub const fn as_uppercase_char(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// FEN character of the black piece of this kind.
    pub const fn as_lowercase_char(self) -> char {
        self.as_uppercase_char().to_ascii_lowercase()
    }
}

/// A colored piece.
///
/// Stored as an index 0-11: white pawn, knight, bishop, rook, queen, king,
/// then the black pieces in the same order. The index doubles as the
/// position of the piece's bitboard in the board's piece array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceType::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceType::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceType::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceType::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceType::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceType::King);
    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceType::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceType::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceType::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceType::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceType::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceType::King);

    pub const ALL: [Piece; 12] = [
        Self::WHITE_PAWN,
        Self::WHITE_KNIGHT,
        Self::WHITE_BISHOP,
        Self::WHITE_ROOK,
        Self::WHITE_QUEEN,
        Self::WHITE_KING,
        Self::BLACK_PAWN,
        Self::BLACK_KNIGHT,
        Self::BLACK_BISHOP,
        Self::BLACK_ROOK,
        Self::BLACK_QUEEN,
        Self::BLACK_KING,
    ];

    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self((color as u8) * 6 + piece_type as u8)
    }

    pub const fn pawn(color: Color) -> Self {
        Self::new(color, PieceType::Pawn)
    }

    pub const fn knight(color: Color) -> Self {
        Self::new(color, PieceType::Knight)
    }

    pub const fn bishop(color: Color) -> Self {
        Self::new(color, PieceType::Bishop)
    }

    pub const fn rook(color: Color) -> Self {
        Self::new(color, PieceType::Rook)
    }

    pub const fn queen(color: Color) -> Self {
        Self::new(color, PieceType::Queen)
    }

    pub const fn king(color: Color) -> Self {
        Self::new(color, PieceType::King)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 12 {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Index 0-11 into the board's piece bitboard array.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn color(self) -> Color {
        if self.0 < 6 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub const fn piece_type(self) -> PieceType {
        match self.0 % 6 {
            0 => PieceType::Pawn,
            1 => PieceType::Knight,
            2 => PieceType::Bishop,
            3 => PieceType::Rook,
            4 => PieceType::Queen,
            _ => PieceType::King,
        }
    }

    pub const fn is_pawn(self) -> bool {
        matches!(self.piece_type(), PieceType::Pawn)
    }

    pub const fn is_king(self) -> bool {
        matches!(self.piece_type(), PieceType::King)
    }

    pub const fn as_fen_char(self) -> char {
        match self.color() {
            Color::White => self.piece_type().as_uppercase_char(),
            Color::Black => self.piece_type().as_lowercase_char(),
        }
    }

    pub fn try_from_fen_char(c: char) -> Option<Self> {
        let piece_type = match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'N' => PieceType::Knight,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'Q' => PieceType::Queen,
            'K' => PieceType::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self::new(color, piece_type))
    }

    /// Two-character label used over the UI boundary, e.g. `wP` or `bK`.
    pub const fn label(self) -> &'static str {
        const LABELS: [&str; 12] = [
            "wP", "wN", "wB", "wR", "wQ", "wK", "bP", "bN", "bB", "bR", "bQ", "bK",
        ];
        LABELS[self.0 as usize]
    }
}

impl Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.as_fen_char())
    }
}
