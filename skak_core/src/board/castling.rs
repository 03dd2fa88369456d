use bitflags::bitflags;

bitflags! {
    /// Castling rights still available to either player.
    ///
    /// A right records only the game history: it is lost forever once the
    /// king moves, once the corresponding rook leaves its home square, or
    /// once that home square becomes the destination of any move (the rook
    /// was captured). Whether a castle is actually playable right now
    /// (empty squares in between, no attacked transit squares) is checked
    /// during move generation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Castling: u8 {
        const WHITE_KINGSIDE  = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE  = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;

        const WHITE = Self::WHITE_KINGSIDE.bits() | Self::WHITE_QUEENSIDE.bits();
        const BLACK = Self::BLACK_KINGSIDE.bits() | Self::BLACK_QUEENSIDE.bits();
    }
}

impl Default for Castling {
    fn default() -> Self {
        Self::all()
    }
}

impl Castling {
    /// Renders the third FEN field: `-` when no rights remain, otherwise a
    /// subset of `KQkq` in that order.
    pub fn as_fen_str(self) -> String {
        if self.is_empty() {
            return "-".to_owned();
        }

        let mut result = String::with_capacity(4);
        if self.contains(Self::WHITE_KINGSIDE) {
            result.push('K');
        }
        if self.contains(Self::WHITE_QUEENSIDE) {
            result.push('Q');
        }
        if self.contains(Self::BLACK_KINGSIDE) {
            result.push('k');
        }
        if self.contains(Self::BLACK_QUEENSIDE) {
            result.push('q');
        }
        result
    }
}
