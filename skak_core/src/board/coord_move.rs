use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use thiserror::Error;

use super::{Move, PieceType, Square};

/// A move specified in coordinate notation, as typed on a command line:
/// the source and destination squares plus an optional promotion letter,
/// e.g. `e2e4` or `e7e8q`.
///
/// This is only a move *request* -- it carries no flag and must be matched
/// against the legal moves of a position (see `Board::find_move`) to
/// become a [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl CoordMove {
    pub const fn new(from: Square, to: Square, promotion: Option<PieceType>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }
}

impl From<Move> for CoordMove {
    fn from(m: Move) -> Self {
        Self {
            from: m.from_square(),
            to: m.to_square(),
            promotion: m.promotion_piece(),
        }
    }
}

impl Display for CoordMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece_type) = self.promotion {
            write!(f, "{}", piece_type.as_lowercase_char())?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid coordinate move")]
pub struct ParseCoordMoveError;

impl FromStr for CoordMove {
    type Err = ParseCoordMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || (s.len() != 4 && s.len() != 5) {
            return Err(ParseCoordMoveError);
        }

        let from = s[0..2].parse().map_err(|_| ParseCoordMoveError)?;
        let to = s[2..4].parse().map_err(|_| ParseCoordMoveError)?;

        let promotion = match s[4..].chars().next() {
            None => None,
            Some('n') => Some(PieceType::Knight),
            Some('b') => Some(PieceType::Bishop),
            Some('r') => Some(PieceType::Rook),
            Some('q') => Some(PieceType::Queen),
            Some(_) => return Err(ParseCoordMoveError),
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coord_move_parse() {
        assert_eq!(
            "e2e4".parse(),
            Ok(CoordMove::new(Square::E2, Square::E4, None))
        );
        assert_eq!(
            "e7e8q".parse(),
            Ok(CoordMove::new(
                Square::E7,
                Square::E8,
                Some(PieceType::Queen)
            ))
        );
        assert_eq!(
            "b7a8n".parse(),
            Ok(CoordMove::new(
                Square::B7,
                Square::A8,
                Some(PieceType::Knight)
            ))
        );

        assert_eq!("".parse::<CoordMove>(), Err(ParseCoordMoveError));
        assert_eq!("e2".parse::<CoordMove>(), Err(ParseCoordMoveError));
        assert_eq!("e2e9".parse::<CoordMove>(), Err(ParseCoordMoveError));
        assert_eq!("e7e8x".parse::<CoordMove>(), Err(ParseCoordMoveError));
        assert_eq!("e7e8qq".parse::<CoordMove>(), Err(ParseCoordMoveError));
    }

    #[test]
    fn coord_move_display_round_trip() {
        for text in ["a1h8", "e2e4", "e7e8q", "g7h8r"] {
            let parsed = text.parse::<CoordMove>().unwrap();
            assert_eq!(parsed.to_string(), text);
        }
    }
}
