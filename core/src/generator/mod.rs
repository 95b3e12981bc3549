use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Decides where mines go once the first reveal coordinate is known.
pub trait MineGenerator {
    fn generate(&mut self, config: &GameConfig, start: Coord2) -> Vec<Coord2>;
}

/// Replays a known layout regardless of where the first reveal lands.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, _config: &GameConfig, _start: Coord2) -> Vec<Coord2> {
        self.mines.clone()
    }
}

impl<F> MineGenerator for F
where
    F: FnMut(&GameConfig, Coord2) -> Vec<Coord2>,
{
    fn generate(&mut self, config: &GameConfig, start: Coord2) -> Vec<Coord2> {
        self(config, start)
    }
}
