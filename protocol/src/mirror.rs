use ndarray::Array2;
use sweepsync_core::{
    CellCount, CellSnapshot, CellView, Coord, Coord2, FullState, PendingChange, PlayMode, ToNdIndex,
};

use crate::*;

/// Consumer-side copy of a board, rebuilt from a full state and kept current by patches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mirror {
    game: Option<GameId>,
    grid: Array2<CellSnapshot>,
    mine_count: CellCount,
    flags: CellCount,
    to_reveal: CellCount,
    play_mode: PlayMode,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self) -> Option<GameId> {
        self.game
    }

    /// Size as `(width, height)`, zero when no game is loaded.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.grid.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
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

    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flags as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> CellSnapshot {
        self.grid[coords.to_nd_index()]
    }

    pub fn view_at(&self, coords: Coord2) -> CellView {
        self.cell_at(coords).view()
    }

    pub fn views(&self) -> Array2<CellView> {
        self.grid.map(|cell| cell.view())
    }

    /// Applies one event, returning whether the mirror changed.
    ///
    /// Patches and snapshots of any game other than the current one are stale and ignored.
    pub fn apply(&mut self, event: &WorkerEvent) -> bool {
        match event {
            WorkerEvent::GameStarted { game, state } => {
                self.load(*game, state);
                true
            }
            WorkerEvent::FullState { game, state } if self.accepts_snapshot(*game) => {
                self.load(*game, state);
                true
            }
            WorkerEvent::Patch { game, change } if self.is_current(*game) => {
                self.apply_change(change);
                true
            }
            WorkerEvent::GameReset { game } if self.is_current(*game) => {
                *self = Self::default();
                true
            }
            WorkerEvent::FullState { game, .. }
            | WorkerEvent::Patch { game, .. }
            | WorkerEvent::GameReset { game } => {
                log::warn!("Discarding stale event for {}", game);
                false
            }
            WorkerEvent::ChordResult { .. } | WorkerEvent::Error { .. } => false,
        }
    }

    fn is_current(&self, game: GameId) -> bool {
        self.game == Some(game)
    }

    /// A snapshot may also bootstrap an empty mirror that joined after the game started.
    fn accepts_snapshot(&self, game: GameId) -> bool {
        self.game.is_none_or(|current| current == game)
    }

    fn load(&mut self, game: GameId, state: &FullState) {
        log::debug!("Mirror loaded {}", game);
        self.game = Some(game);
        self.grid = state.grid.clone();
        self.mine_count = state.mine_count;
        self.flags = state.flags;
        self.to_reveal = state.to_reveal;
        self.play_mode = state.play_mode;
    }

    fn apply_change(&mut self, change: &PendingChange) {
        if let Some(flags) = change.flags {
            self.flags = flags;
        }
        if let Some(to_reveal) = change.to_reveal {
            self.to_reveal = to_reveal;
        }
        if let Some(play_mode) = change.play_mode {
            self.play_mode = play_mode;
        }
        for grid_change in &change.grid_changes {
            self.grid[grid_change.coords().to_nd_index()] = grid_change.cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use sweepsync_core::{Board, GameConfig};

    fn live_views(board: &Board) -> Array2<CellView> {
        board.full_state().grid.map(|cell| cell.view())
    }

    #[test]
    fn snapshot_plus_patches_matches_live_board() {
        let (tx, rx) = channel();
        let mut session = Session::new(tx);
        let mut mirror = Mirror::new();
        session.init_game(GameConfig::intermediate(), 9).unwrap();
        session.reveal((8, 8)).unwrap();

        // join late: everything sent so far is missed, then a snapshot is requested
        rx.try_iter().for_each(drop);
        session.handle(WorkerRequest::GetFullState);
        for event in rx.try_iter() {
            assert!(mirror.apply(&event));
        }
        assert_eq!(mirror.game(), session.game());

        for step in 0..400u32 {
            let board = session.board().unwrap();
            if board.is_finished() {
                break;
            }
            let pos = ((step * 7 % 16) as Coord, (step * 11 % 16) as Coord);
            let cell = board.cell_at(pos);
            if step % 5 == 0 && !cell.revealed {
                session.set_flag(pos, !cell.flagged).unwrap();
            } else if cell.revealed {
                session.attempt_surrounding_reveal(pos).unwrap();
            } else if !cell.flagged {
                session.reveal(pos).unwrap();
            }

            for event in rx.try_iter() {
                mirror.apply(&event);
            }
            let board = session.board().unwrap();
            assert_eq!(mirror.views(), live_views(board));
            assert_eq!(mirror.flags(), board.flags());
            assert_eq!(mirror.to_reveal(), board.to_reveal());
            assert_eq!(mirror.play_mode(), board.play_mode());
        }
    }

    #[test]
    fn stale_patches_are_discarded() {
        let (tx, rx) = channel();
        let mut session = Session::new(tx);
        let mut mirror = Mirror::new();
        let old = session.init_game(GameConfig::beginner(), 1).unwrap();
        session.reveal((4, 4)).unwrap();
        let new = session.init_game(GameConfig::expert(), 2).unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        let started_new = events
            .iter()
            .position(|event| matches!(event, WorkerEvent::GameStarted { game, .. } if *game == new))
            .unwrap();
        // new game announcement arrives before the old game's patches are consumed
        mirror.apply(&events[started_new]);
        for event in &events[1..started_new] {
            assert!(!mirror.apply(event));
        }

        assert_eq!(mirror.game(), Some(new));
        assert_ne!(mirror.game(), Some(old));
        assert_eq!(mirror.size(), (30, 16));
        assert_eq!(mirror.to_reveal(), 480 - 99);
        assert!(mirror.views().iter().all(|view| *view == CellView::Hidden));
    }

    #[test]
    fn reset_clears_current_game_only() {
        let mut mirror = Mirror::new();
        let config = GameConfig::beginner();
        let board = Board::new(config, 1).unwrap();
        mirror.apply(&WorkerEvent::GameStarted {
            game: GameId(3),
            state: board.full_state(),
        });

        assert!(!mirror.apply(&WorkerEvent::GameReset { game: GameId(2) }));
        assert_eq!(mirror.mines_left(), 10);

        assert!(mirror.apply(&WorkerEvent::GameReset { game: GameId(3) }));
        assert_eq!(mirror, Mirror::new());
    }

    #[test]
    fn later_entries_for_a_cell_win() {
        let mut mirror = Mirror::new();
        let board = Board::new(GameConfig::beginner(), 1).unwrap();
        let game = GameId(1);
        mirror.apply(&WorkerEvent::GameStarted {
            game,
            state: board.full_state(),
        });

        let mut flagged = board.cell_at((2, 2));
        flagged.flagged = true;
        let unflagged = board.cell_at((2, 2));
        let change = PendingChange {
            flags: Some(0),
            grid_changes: vec![
                sweepsync_core::GridChange {
                    x: 2,
                    y: 2,
                    cell: flagged,
                },
                sweepsync_core::GridChange {
                    x: 2,
                    y: 2,
                    cell: unflagged,
                },
            ],
            ..PendingChange::default()
        };
        mirror.apply(&WorkerEvent::Patch { game, change });

        assert_eq!(mirror.view_at((2, 2)), CellView::Hidden);
        assert_eq!(mirror.flags(), 0);
    }
}
