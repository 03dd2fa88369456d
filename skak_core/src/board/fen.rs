use thiserror::Error;

use super::{Bitboard, Board, Castling, Color, Piece, Square};

/// Reasons a FEN string can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("expected 6 fields, got {0}")]
    WrongFieldCount(usize),
    #[error("unknown piece character `{0}`")]
    UnknownPiece(char),
    #[error("expected 8 ranks, got {0}")]
    WrongRankCount(usize),
    #[error("bad side to move `{0}`")]
    BadSideToMove(String),
    #[error("bad castling character `{0}`")]
    BadCastling(char),
    #[error("bad en passant target `{0}`")]
    BadEnPassant(String),
    #[error("bad halfmove clock `{0}`")]
    BadHalfmove(String),
    #[error("bad fullmove number `{0}`")]
    BadFullmove(String),
}

/// Parses the six whitespace-separated FEN fields into a fresh board.
/// Nothing is committed until the whole string has been validated, so a
/// failed parse leaves no partial state behind.
pub(super) fn parse_fen(fen: &str) -> Result<Board, FenParseError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(FenParseError::WrongFieldCount(fields.len()));
    }

    let ranks: Vec<&str> = fields[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::WrongRankCount(ranks.len()));
    }

    let mut pieces = [Bitboard::EMPTY; 12];
    for (rank_index, rank_text) in ranks.into_iter().enumerate() {
        let rank = 7 - rank_index as u8;
        let mut file = 0u8;
        for c in rank_text.chars() {
            if let Some(digit) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += digit as u8;
            } else {
                let piece =
                    Piece::try_from_fen_char(c).ok_or(FenParseError::UnknownPiece(c))?;
                pieces[piece.index()].set(Square::new_unchecked(rank, file));
                file += 1;
            }

            if file >= 8 {
                break;
            }
        }
    }

    let to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenParseError::BadSideToMove(other.to_owned())),
    };

    let castling = if fields[2] == "-" {
        Castling::empty()
    } else {
        let mut rights = Castling::empty();
        for c in fields[2].chars() {
            rights |= match c {
                'K' => Castling::WHITE_KINGSIDE,
                'Q' => Castling::WHITE_QUEENSIDE,
                'k' => Castling::BLACK_KINGSIDE,
                'q' => Castling::BLACK_QUEENSIDE,
                _ => return Err(FenParseError::BadCastling(c)),
            };
        }
        rights
    };

    let en_passant = if fields[3] == "-" {
        None
    } else {
        let square: Square = fields[3]
            .parse()
            .map_err(|_| FenParseError::BadEnPassant(fields[3].to_owned()))?;
        // The target is only ever the square a pawn just skipped over.
        if square.rank() != 2 && square.rank() != 5 {
            return Err(FenParseError::BadEnPassant(fields[3].to_owned()));
        }
        Some(square)
    };

    let halfmove_clock: u32 = fields[4]
        .parse()
        .map_err(|_| FenParseError::BadHalfmove(fields[4].to_owned()))?;

    let fullmoves: u32 = fields[5]
        .parse()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| FenParseError::BadFullmove(fields[5].to_owned()))?;

    Ok(Board::new(
        pieces,
        to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmoves,
    ))
}

pub(super) fn write_fen(board: &Board) -> String {
    let mut fen = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0u8;
        for file in 0..8 {
            match board.piece_at(Square::new_unchecked(rank, file)) {
                None => empty_run += 1,
                Some(piece) => {
                    if empty_run > 0 {
                        fen.push((empty_run + b'0') as char);
                        empty_run = 0;
                    }
                    fen.push(piece.as_fen_char());
                }
            }
        }
        if empty_run > 0 {
            fen.push((empty_run + b'0') as char);
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(if board.to_move().is_white() { 'w' } else { 'b' });
    fen.push(' ');
    fen.push_str(&board.castling().as_fen_str());
    fen.push(' ');
    match board.en_passant() {
        Some(square) => fen.push_str(&square.to_string()),
        None => fen.push('-'),
    }
    fen.push(' ');
    fen.push_str(&board.halfmove_clock().to_string());
    fen.push(' ');
    fen.push_str(&board.fullmoves().to_string());

    fen
}
