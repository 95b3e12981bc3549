use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Uniformly random layout that never places a mine on the first revealed cell or any of its neighbours.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: &GameConfig, start: Coord2) -> Vec<Coord2> {
        let size = config.size;
        let mut is_safe = Vec::new();
        is_safe.resize(usize::from(config.total_cells()), false);
        for coords in safe_zone(start, size) {
            is_safe[flat_index(coords, size.0)] = true;
        }

        let mut candidates: Vec<usize> = (0..is_safe.len()).filter(|&i| !is_safe[i]).collect();
        let wanted = usize::from(config.mines);
        if wanted > candidates.len() {
            log::warn!(
                "Not enough room around {:?} for {} mines, placing {}",
                start,
                wanted,
                candidates.len()
            );
        }

        let mut mines = Vec::with_capacity(wanted.min(candidates.len()));
        while mines.len() < wanted && !candidates.is_empty() {
            let pick = self.rng.random_range(0..candidates.len());
            let index = candidates.swap_remove(pick);
            mines.push(from_flat_index(index, size.0));
        }
        mines
    }
}
