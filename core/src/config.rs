use serde::{Deserialize, Serialize};

use crate::*;

/// Cells that are always mine free around the first reveal: the cell itself and its 8 neighbours.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Dimensions and mine count of a board, validated so a safe opening always fits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((30, 16), 99)
    }

    pub fn validate(self) -> Result<Self> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        let max = self.max_mines();
        if self.mines > max {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                max,
            });
        }
        Ok(self)
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Upper bound on mines for an interior first click. Edge clicks leave more room, which is not accounted for.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// When accumulated grid changes are pushed to the subscriber mid-operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushPolicy {
    threshold: usize,
}

impl FlushPolicy {
    pub const DEFAULT_THRESHOLD: usize = 10;

    pub const fn new(threshold: usize) -> Self {
        Self {
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Maximum number of grid changes carried by one emitted change.
    pub const fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
