use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a board. `Won` and `Lost` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// No mines placed yet, the first reveal places them
    Pending,
    Playing,
    Won,
    Lost,
}

impl PlayMode {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for PlayMode {
    fn default() -> Self {
        Self::Pending
    }
}

/// Self-consistent copy of everything a consumer needs to rebuild its view of a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullState {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub grid: Array2<CellSnapshot>,
    pub flags: CellCount,
    pub to_reveal: CellCount,
    pub play_mode: PlayMode,
}

impl FullState {
    pub fn cell_at(&self, coords: Coord2) -> CellSnapshot {
        self.grid[coords.to_nd_index()]
    }
}

/// The minesweeper engine: grid, counters, mine placement and the play mode state machine.
///
/// Every mutating command accumulates what it changed and delivers it to the subscriber before returning.
pub struct Board {
    config: GameConfig,
    grid: Array2<Cell>,
    mine_indices: Vec<usize>,
    flags: CellCount,
    to_reveal: CellCount,
    play_mode: PlayMode,
    triggered_mine: Option<Coord2>,
    generator: Box<dyn MineGenerator>,
    notifier: ChangeNotifier,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("config", &self.config)
            .field("flags", &self.flags)
            .field("to_reveal", &self.to_reveal)
            .field("play_mode", &self.play_mode)
            .field("triggered_mine", &self.triggered_mine)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Board with a seeded random layout, placed on the first reveal.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }

    pub fn with_generator(
        config: GameConfig,
        generator: impl MineGenerator + 'static,
    ) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            grid: Array2::default(grid_shape(config.size)),
            mine_indices: Vec::new(),
            flags: 0,
            to_reveal: config.safe_cells(),
            play_mode: PlayMode::Pending,
            triggered_mine: None,
            generator: Box::new(generator),
            notifier: ChangeNotifier::default(),
        })
    }

    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        let subscriber = self.notifier.unsubscribe();
        self.notifier = ChangeNotifier::new(policy);
        if let Some(subscriber) = subscriber {
            self.notifier.subscribe(subscriber);
        }
        self
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    /// Mines on the board, which may fall short of the configured count when a layout could not fit them.
    pub fn mine_count(&self) -> CellCount {
        if self.play_mode.is_pending() {
            self.config.mines
        } else {
            self.mine_indices.len() as CellCount
        }
    }

    pub fn flags(&self) -> CellCount {
        self.flags
    }

    pub fn to_reveal(&self) -> CellCount {
        self.to_reveal
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn is_finished(&self) -> bool {
        self.play_mode.is_finished()
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flags as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> CellSnapshot {
        self.grid[coords.to_nd_index()]
    }

    pub fn is_chordable(&self, coords: Coord2) -> bool {
        !self.is_finished() && self.cell_at(coords).is_chordable()
    }

    pub fn full_state(&self) -> FullState {
        FullState {
            size: self.config.size,
            mine_count: self.mine_count(),
            grid: self.grid.clone(),
            flags: self.flags,
            to_reveal: self.to_reveal,
            play_mode: self.play_mode,
        }
    }

    /// Replaces any previous subscriber.
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) {
        if self.notifier.subscribe(Box::new(subscriber)).is_some() {
            log::debug!("Replaced previous board subscriber");
        }
    }

    pub fn unsubscribe(&mut self) -> Option<Box<dyn Subscriber>> {
        self.notifier.unsubscribe()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.config.size;
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Reveals a hidden cell, flood-filling through cells without adjacent mines.
    ///
    /// The first reveal places the mines.
    pub fn reveal(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.cell_at(coords);
        if cell.flagged {
            return Err(IllegalMove::RevealFlagged.into());
        }
        if cell.revealed {
            return Err(IllegalMove::AlreadyRevealed.into());
        }

        self.notifier.ensure_subscriber()?;

        log::debug!("Reveal at {:?}", coords);
        if self.play_mode.is_pending() {
            self.place_mines(coords)?;
        }
        self.flood_reveal([self.index_of(coords)])?;
        self.notifier.flush()
    }

    /// Flags or unflags a cell that has not been revealed. Setting the current value is a no-op.
    pub fn set_flag(&mut self, coords: Coord2, flagged: bool) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.cell_at(coords);
        if cell.revealed {
            return Err(IllegalMove::FlagRevealed.into());
        }
        if cell.flagged == flagged {
            return Ok(());
        }
        self.notifier.ensure_subscriber()?;

        log::debug!("Set flag at {:?} to {}", coords, flagged);
        self.grid[coords.to_nd_index()].flagged = flagged;
        if flagged {
            self.flags += 1;
        } else {
            self.flags -= 1;
        }
        self.notifier.set_flags(self.flags);
        self.notifier.push(coords, self.cell_at(coords))?;

        for pos in self.grid.iter_neighbors(coords) {
            let neighbor = &mut self.grid[pos.to_nd_index()];
            let crossed = if flagged {
                neighbor.touching_flags += 1;
                neighbor.touching_flags == neighbor.touching_mines
            } else {
                neighbor.touching_flags -= 1;
                neighbor.touching_flags + 1 == neighbor.touching_mines
            };
            if neighbor.revealed && crossed {
                let snapshot = *neighbor;
                log::trace!("Clue at {:?} changed satisfaction", pos);
                self.notifier.push(pos, snapshot)?;
            }
        }

        self.notifier.flush()
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let flagged = self.cell_at(coords).flagged;
        self.set_flag(coords, !flagged)
    }

    /// Reveals every hidden, unflagged neighbour of a revealed clue whose flags satisfy it.
    ///
    /// Returns whether anything was revealed.
    pub fn attempt_surrounding_reveal(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = self.cell_at(coords);
        if !cell.revealed || cell.touching_mines == 0 || !cell.is_satisfied() {
            return Ok(false);
        }

        let seeds: Vec<usize> = self
            .grid
            .iter_neighbors(coords)
            .filter(|&pos| self.cell_at(pos).is_hidden())
            .map(|pos| self.index_of(pos))
            .collect();
        if seeds.is_empty() {
            return Ok(false);
        }
        self.notifier.ensure_subscriber()?;

        log::debug!("Surrounding reveal at {:?} opens {} cells", coords, seeds.len());
        self.flood_reveal(seeds)?;
        self.notifier.flush()?;
        Ok(true)
    }

    fn index_of(&self, coords: Coord2) -> usize {
        flat_index(coords, self.config.width())
    }

    fn coords_of(&self, index: usize) -> Coord2 {
        from_flat_index(index, self.config.width())
    }

    fn place_mines(&mut self, start: Coord2) -> Result<()> {
        let mines = self.generator.generate(&self.config, start);
        for &coords in &mines {
            self.validate_coords(coords)?;
        }

        for coords in mines {
            let cell = &mut self.grid[coords.to_nd_index()];
            if cell.has_mine {
                continue;
            }
            cell.has_mine = true;
            let index = self.index_of(coords);
            self.mine_indices.push(index);
            for pos in self.grid.iter_neighbors(coords) {
                self.grid[pos.to_nd_index()].touching_mines += 1;
            }
        }

        let placed = self.mine_indices.len() as CellCount;
        if placed != self.config.mines {
            log::warn!(
                "Placed {} mines but {} were requested",
                placed,
                self.config.mines
            );
            self.to_reveal = self.config.total_cells() - placed;
            self.notifier.set_to_reveal(self.to_reveal);
        }
        log::debug!("Placed {} mines around start {:?}", placed, start);

        self.play_mode = PlayMode::Playing;
        self.notifier.set_play_mode(PlayMode::Playing);
        Ok(())
    }

    /// Processes a FIFO work set of flat indices. Each index enters the set at most once.
    ///
    /// Stops early when a mine is hit or the last safe cell is revealed.
    fn flood_reveal(&mut self, seeds: impl IntoIterator<Item = usize>) -> Result<()> {
        let mut queued = HashSet::new();
        let mut work = VecDeque::new();
        for index in seeds {
            if queued.insert(index) {
                work.push_back(index);
            }
        }

        while let Some(index) = work.pop_front() {
            let coords = self.coords_of(index);
            let cell = self.cell_at(coords);

            if cell.revealed {
                return Err(IllegalMove::AlreadyRevealed.into());
            }
            if cell.has_mine {
                return self.lose(coords);
            }

            self.grid[coords.to_nd_index()].revealed = true;
            self.to_reveal -= 1;
            self.notifier.set_to_reveal(self.to_reveal);
            log::trace!(
                "Revealed {:?} touching {} mines",
                coords,
                cell.touching_mines
            );
            self.notifier.push(coords, self.cell_at(coords))?;

            if self.to_reveal == 0 {
                self.end_game(PlayMode::Won);
                return Ok(());
            }

            if cell.touching_mines == 0 {
                for pos in self.grid.iter_neighbors(coords) {
                    let next = self.index_of(pos);
                    if self.cell_at(pos).is_hidden() && queued.insert(next) {
                        work.push_back(next);
                    }
                }
            }
        }
        Ok(())
    }

    /// Shows every mine, the triggering one first. Correctly flagged mines are left as flags.
    fn lose(&mut self, trigger: Coord2) -> Result<()> {
        self.triggered_mine = Some(trigger);
        self.reveal_mine(trigger)?;

        for i in 0..self.mine_indices.len() {
            let coords = self.coords_of(self.mine_indices[i]);
            if self.cell_at(coords).is_hidden() {
                self.reveal_mine(coords)?;
            }
        }

        self.end_game(PlayMode::Lost);
        Ok(())
    }

    fn reveal_mine(&mut self, coords: Coord2) -> Result<()> {
        self.grid[coords.to_nd_index()].revealed = true;
        self.notifier.push(coords, self.cell_at(coords))
    }

    fn end_game(&mut self, play_mode: PlayMode) {
        log::debug!("Game ended: {:?}", play_mode);
        self.play_mode = play_mode;
        self.notifier.set_play_mode(play_mode);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.play_mode.is_finished() {
            Err(IllegalMove::GameOver.into())
        } else {
            Ok(())
        }
    }
}
