use std::fmt;

/// Reasons an initial map cannot start a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    EmptyMap,
    EmptyRow { row: usize },
    RaggedRow { row: usize, expected: usize, actual: usize },
    UnknownSymbol { x: usize, y: usize, symbol: char },
    MissingPlayer,
    MultiplePlayers { count: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "map has no rows"),
            Self::EmptyRow { row } => write!(f, "map row {row} is empty"),
            Self::RaggedRow {
                row,
                expected,
                actual,
            } => write!(
                f,
                "map row {row} has width {actual}, expected {expected}"
            ),
            Self::UnknownSymbol { x, y, symbol } => {
                write!(f, "unknown map symbol {symbol:?} at ({x}, {y})")
            }
            Self::MissingPlayer => write!(f, "map has no player marker 'P'"),
            Self::MultiplePlayers { count } => {
                write!(f, "map has {count} player markers, expected exactly one")
            }
        }
    }
}

impl std::error::Error for MapError {}
