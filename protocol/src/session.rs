use sweepsync_core::{Board, Coord2, FlushPolicy, FullState, GameConfig, PendingChange};

use crate::*;

#[derive(Debug)]
struct ActiveGame {
    id: GameId,
    board: Board,
}

/// Owns the current board of a game session and forwards its changes to a consumer.
///
/// Board identity changes (`GameStarted`, `GameReset`) are announced separately from gameplay patches, and every
/// patch carries the id of the board that produced it.
#[derive(Debug)]
pub struct Session<S: EventSink> {
    sink: S,
    current: Option<ActiveGame>,
    next_id: u64,
    policy: FlushPolicy,
}

impl<S: EventSink> Session<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
            next_id: 1,
            policy: FlushPolicy::default(),
        }
    }

    /// Applies to boards created after this call.
    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn game(&self) -> Option<GameId> {
        self.current.as_ref().map(|active| active.id)
    }

    pub fn board(&self) -> Option<&Board> {
        self.current.as_ref().map(|active| &active.board)
    }

    /// Replaces the current board with a fresh one. An invalid config leaves the current board in place.
    pub fn init_game(&mut self, config: GameConfig, seed: u64) -> Result<GameId> {
        let mut board = Board::new(config, seed)?.with_flush_policy(self.policy);
        self.teardown();

        let id = GameId(self.next_id);
        self.next_id += 1;

        let sink = self.sink.clone();
        board.subscribe(move |change: PendingChange| {
            sink.send(WorkerEvent::Patch { game: id, change })
        });

        log::debug!("Starting {} with {:?}", id, config);
        self.sink.send(WorkerEvent::GameStarted {
            game: id,
            state: board.full_state(),
        });
        self.current = Some(ActiveGame { id, board });
        Ok(id)
    }

    /// Tears down the current board without starting another one.
    pub fn reset(&mut self) -> Option<GameId> {
        let id = self.teardown()?;
        self.sink.send(WorkerEvent::GameReset { game: id });
        Some(id)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<()> {
        Ok(self.active()?.board.reveal(coords)?)
    }

    pub fn set_flag(&mut self, coords: Coord2, flagged: bool) -> Result<()> {
        Ok(self.active()?.board.set_flag(coords, flagged)?)
    }

    pub fn attempt_surrounding_reveal(&mut self, coords: Coord2) -> Result<bool> {
        Ok(self.active()?.board.attempt_surrounding_reveal(coords)?)
    }

    pub fn full_state(&self) -> Result<(GameId, FullState)> {
        let active = self.current.as_ref().ok_or(ProtocolError::NoGame)?;
        Ok((active.id, active.board.full_state()))
    }

    /// Runs one request, reporting failures to the consumer as `Error` events.
    pub fn handle(&mut self, request: WorkerRequest) {
        log::trace!("Handling {:?}", request);
        let result = match request {
            WorkerRequest::InitGame { config, seed } => self.init_game(config, seed).map(drop),
            WorkerRequest::Reset => {
                if self.reset().is_none() {
                    log::debug!("Reset without a running game");
                }
                Ok(())
            }
            WorkerRequest::Reveal { x, y } => self.reveal((x, y)),
            WorkerRequest::SetFlag { x, y, flagged } => self.set_flag((x, y), flagged),
            WorkerRequest::Chord { x, y } => {
                self.attempt_surrounding_reveal((x, y)).map(|revealed| {
                    if let Some(game) = self.game() {
                        self.sink.send(WorkerEvent::ChordResult { game, revealed });
                    }
                })
            }
            WorkerRequest::GetFullState => self.full_state().map(|(game, state)| {
                self.sink.send(WorkerEvent::FullState { game, state });
            }),
        };

        if let Err(err) = result {
            log::error!("Request failed: {}", err);
            self.sink.send(WorkerEvent::Error {
                game: self.game(),
                message: err.to_string(),
            });
        }
    }

    fn active(&mut self) -> Result<&mut ActiveGame> {
        self.current.as_mut().ok_or(ProtocolError::NoGame)
    }

    fn teardown(&mut self) -> Option<GameId> {
        let mut active = self.current.take()?;
        active.board.unsubscribe();
        log::debug!("Tore down {}", active.id);
        Some(active.id)
    }
}
