#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flat-text encoding of generated environments.
//!
//! Every grid column becomes one line terminated by `\n`, so line `x` holds
//! the cells `(x, 0)` through `(x, height - 1)`. Free cells are written as
//! `0`, blocked cells as `1`, rider starts as lowercase letters and rider
//! goals as the matching uppercase letters, so rider 0 is `a`/`A`.

use std::collections::HashSet;

use thiserror::Error;
use time_riders_core::{Cell, Coordinate, Grid, RiderId, MAX_RIDERS};

const FREE_SYMBOL: char = '0';
const BLOCKED_SYMBOL: char = '1';
const LINE_DELIMITER: char = '\n';

/// Encodes the grid into its flat-text representation.
pub fn encode(grid: &Grid) -> Result<String, EncodeError> {
    let columns = usize::try_from(grid.width()).unwrap_or(0);
    let rows = usize::try_from(grid.height()).unwrap_or(0);
    let mut lines = vec![String::with_capacity(rows); columns];

    for (coordinate, cell) in grid.iter() {
        let symbol = cell_symbol(cell)?;
        let line = usize::try_from(coordinate.x())
            .ok()
            .and_then(|x| lines.get_mut(x));
        if let Some(line) = line {
            line.push(symbol);
        }
    }

    let mut encoded = String::with_capacity(grid.area() + columns);
    for line in &lines {
        encoded.push_str(line);
        encoded.push(LINE_DELIMITER);
    }
    Ok(encoded)
}

/// Decodes a flat-text representation back into a grid.
///
/// A single trailing newline is accepted; any other empty line is rejected.
pub fn decode(value: &str) -> Result<Grid, DecodeError> {
    let body = value.strip_suffix(LINE_DELIMITER).unwrap_or(value);
    if body.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    let lines: Vec<&str> = body.split(LINE_DELIMITER).collect();
    let Some(first) = lines.first() else {
        return Err(DecodeError::EmptyPayload);
    };

    let height = first.chars().count();
    let width_u32 = u32::try_from(lines.len()).map_err(|_| DecodeError::TooLarge)?;
    let height_u32 = u32::try_from(height).map_err(|_| DecodeError::TooLarge)?;
    let mut grid = Grid::new(width_u32, height_u32);
    let mut seen = HashSet::new();

    for (x, line) in (0..width_u32).zip(&lines) {
        let length = line.chars().count();
        if length != height {
            return Err(DecodeError::RaggedLine {
                line: x,
                expected: height,
                actual: length,
            });
        }

        for (y, symbol) in (0..height_u32).zip(line.chars()) {
            let coordinate = Coordinate::new(x, y);
            let cell = parse_symbol(symbol).ok_or(DecodeError::UnknownSymbol {
                symbol,
                coordinate,
            })?;
            if cell.rider().is_some() && !seen.insert(cell) {
                return Err(DecodeError::DuplicateMarker { symbol });
            }
            grid.set(coordinate, cell)
                .map_err(|_| DecodeError::TooLarge)?;
        }
    }

    for cell in &seen {
        let counterpart = match *cell {
            Cell::Start(rider) => Cell::Goal(rider),
            Cell::Goal(rider) => Cell::Start(rider),
            Cell::Free | Cell::Blocked => continue,
        };
        if !seen.contains(&counterpart) {
            return Err(DecodeError::UnpairedRider {
                symbol: cell_symbol(*cell).unwrap_or('?'),
            });
        }
    }

    Ok(grid)
}

fn cell_symbol(cell: Cell) -> Result<char, EncodeError> {
    match cell {
        Cell::Free => Ok(FREE_SYMBOL),
        Cell::Blocked => Ok(BLOCKED_SYMBOL),
        Cell::Start(rider) => letter(b'a', rider),
        Cell::Goal(rider) => letter(b'A', rider),
    }
}

fn letter(base: u8, rider: RiderId) -> Result<char, EncodeError> {
    if rider.index() >= MAX_RIDERS {
        return Err(EncodeError::UnrepresentableRider { rider });
    }
    Ok(char::from(base + rider.get()))
}

fn parse_symbol(symbol: char) -> Option<Cell> {
    match symbol {
        FREE_SYMBOL => Some(Cell::Free),
        BLOCKED_SYMBOL => Some(Cell::Blocked),
        'a'..='z' => Some(Cell::Start(RiderId::new(symbol as u8 - b'a'))),
        'A'..='Z' => Some(Cell::Goal(RiderId::new(symbol as u8 - b'A'))),
        _ => None,
    }
}

/// Errors that can occur while encoding a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The rider identifier has no letter.
    #[error("{rider} cannot be written as a single letter")]
    UnrepresentableRider {
        /// Rider whose marker could not be encoded.
        rider: RiderId,
    },
}

/// Errors that can occur while decoding flat-text environments.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The text contained no lines.
    #[error("environment text was empty")]
    EmptyPayload,
    /// The text describes more cells than a grid can address.
    #[error("environment text exceeds the supported grid size")]
    TooLarge,
    /// A line's length differs from the first line.
    #[error("line {line} has {actual} cells but {expected} were expected")]
    RaggedLine {
        /// Zero-based line index, which is the column of the grid.
        line: u32,
        /// Length of the first line.
        expected: usize,
        /// Length of the offending line.
        actual: usize,
    },
    /// A character is not part of the encoding.
    #[error("unknown symbol '{symbol}' at {coordinate}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Cell holding the character.
        coordinate: Coordinate,
    },
    /// The same start or goal letter appears twice.
    #[error("marker '{symbol}' appears more than once")]
    DuplicateMarker {
        /// Repeated letter.
        symbol: char,
    },
    /// A start has no goal or a goal has no start.
    #[error("marker '{symbol}' has no matching start or goal")]
    UnpairedRider {
        /// Letter missing its counterpart.
        symbol: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::new(4, 2);
        let first = RiderId::new(0);
        let second = RiderId::new(1);
        grid.set(Coordinate::new(0, 0), Cell::Start(first))
            .expect("in bounds");
        grid.set(Coordinate::new(1, 0), Cell::Blocked)
            .expect("in bounds");
        grid.set(Coordinate::new(2, 0), Cell::Goal(first))
            .expect("in bounds");
        grid.set(Coordinate::new(0, 1), Cell::Goal(second))
            .expect("in bounds");
        grid.set(Coordinate::new(3, 1), Cell::Start(second))
            .expect("in bounds");
        grid
    }

    #[test]
    fn encodes_one_line_per_column() {
        assert_eq!(
            encode(&sample_grid()).expect("riders fit"),
            "aB\n10\nA0\n0b\n"
        );
    }

    #[test]
    fn decode_accepts_missing_final_newline() {
        assert_eq!(decode("aB\n10\nA0\n0b"), Ok(sample_grid()));
    }

    #[test]
    fn decode_rejects_blank_lines_before_the_last() {
        assert_eq!(
            decode("aA\n\n00\n"),
            Err(DecodeError::RaggedLine {
                line: 1,
                expected: 2,
                actual: 0,
            })
        );
        assert_eq!(decode("\n"), Err(DecodeError::EmptyPayload));
        assert_eq!(
            decode("aA\n00\n\n"),
            Err(DecodeError::RaggedLine {
                line: 2,
                expected: 2,
                actual: 0,
            })
        );
    }

    #[test]
    fn decode_restores_encoded_grid() {
        let grid = sample_grid();
        let encoded = encode(&grid).expect("riders fit");

        assert_eq!(decode(&encoded), Ok(grid));
    }

    #[test]
    fn encode_rejects_riders_beyond_alphabet() {
        let mut grid = Grid::new(2, 1);
        let rider = RiderId::new(26);
        grid.set(Coordinate::new(0, 0), Cell::Start(rider))
            .expect("in bounds");

        assert_eq!(
            encode(&grid),
            Err(EncodeError::UnrepresentableRider { rider })
        );
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert_eq!(decode(""), Err(DecodeError::EmptyPayload));
        assert_eq!(
            decode("aA0\n00\n"),
            Err(DecodeError::RaggedLine {
                line: 1,
                expected: 3,
                actual: 2,
            })
        );
        assert_eq!(
            decode("aA#\n"),
            Err(DecodeError::UnknownSymbol {
                symbol: '#',
                coordinate: Coordinate::new(0, 2),
            })
        );
        assert_eq!(
            decode("aAa\n"),
            Err(DecodeError::DuplicateMarker { symbol: 'a' })
        );
        assert_eq!(
            decode("aA0b\n"),
            Err(DecodeError::UnpairedRider { symbol: 'b' })
        );
    }
}
