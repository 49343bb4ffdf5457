use crate::game_logic::{self, game::Connection, GameEngine};
use cartpole_codec::*;
use futures::{executor, StreamExt};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("physics engine is gone")]
    Disconnected,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("engine replied without a game state")]
    EmptyReply,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation<S> {
    Full(S),
    Terminal(S),
}
impl<S> Observation<S> {
    pub fn state(&self) -> &S {
        match self {
            Observation::Full(s) | Observation::Terminal(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool { matches!(self, Observation::Terminal(_)) }
}

/// One experience tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Observation<State>,
    pub action: Action,
    pub reward: f64,
    pub to: Observation<State>,
}
impl Transition {
    pub fn done(&self) -> bool { self.to.is_terminal() }
}

pub trait Domain {
    fn emit(&self) -> Observation<State>;

    fn step(&mut self, action: Action) -> Result<Transition, DomainError>;
}

/// Cart-pole whose physics run on a `GameEngine` thread.
pub struct CartPole {
    state: State,
    end: bool,
    tx: mpsc::Sender<GameCommand>,
    con_rx: futures::channel::mpsc::Receiver<String>,
    engine: Option<JoinHandle<()>>,
}

impl CartPole {
    /// Spawns the engine. `seed` fixes the initial state.
    pub fn new(seed: Option<u64>, tick: Duration, logger: &slog::Logger) -> CartPole {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let state = game_logic::initial_state(&mut rng);
        let (tx, rx) = mpsc::channel();
        let (con_tx, con_rx) = futures::channel::mpsc::channel(1);
        let connection = Connection::new(con_tx);
        let engine_logger = logger.new(o!("thread" => "engine"));
        let engine = std::thread::spawn(move || {
            GameEngine::new(connection, state, tick, engine_logger).run(rx);
        });
        CartPole {
            state,
            end: false,
            tx,
            con_rx,
            engine: Some(engine),
        }
    }

    fn receive(&mut self) -> Result<GameState, DomainError> {
        let text = executor::block_on(self.con_rx.next()).ok_or(DomainError::Disconnected)?;
        let ClientReceivedMsg { gamestate } = ClientReceivedMsg::deserialize_receive(&text)?;
        gamestate.ok_or(DomainError::EmptyReply)
    }
}

/// Stops the engine and waits for its thread, so the engine's logger is
/// released before the domain is gone.
impl Drop for CartPole {
    fn drop(&mut self) {
        // the engine may already have exited
        let _ = self.tx.send(GameCommand::exit());
        self.con_rx.close();
        if let Some(engine) = self.engine.take() {
            let _ = engine.join();
        }
    }
}

impl Domain for CartPole {
    fn emit(&self) -> Observation<State> {
        if self.end {
            Observation::Terminal(self.state)
        } else {
            Observation::Full(self.state)
        }
    }

    fn step(&mut self, action: Action) -> Result<Transition, DomainError> {
        let from = self.emit();
        self.tx
            .send(GameCommand::new(action.index()))
            .map_err(|_| DomainError::Disconnected)?;
        match self.receive()? {
            GameState::Game(s, _) => self.state = s,
            GameState::ShowResult(s, _) => {
                self.state = s;
                self.end = true;
            },
        }
        Ok(Transition {
            from,
            action,
            reward: game_logic::REWARD_STEP,
            to: self.emit(),
        })
    }
}
