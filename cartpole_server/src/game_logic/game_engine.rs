use crate::game_logic;
use cartpole_codec::*;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("client hung up")]
    Disconnected,
}

pub trait GameCon {
    fn tx_send(&self, msg: ClientReceivedMsg) -> Result<(), EngineError>;
}

/// Physics loop driven by `GameCommand`s. Every action command is answered
/// with exactly one `ClientReceivedMsg` carrying the new `GameState`.
pub struct GameEngine<T: GameCon> {
    connection: T,
    gamestate: GameState,
    tick: Duration,
    logger: slog::Logger,
}
impl<T> GameEngine<T>
where T: GameCon
{
    pub fn new(connection: T, initial: State, tick: Duration, logger: slog::Logger) -> Self {
        GameEngine {
            connection,
            gamestate: GameState::Game(initial, 0),
            tick,
            logger,
        }
    }

    pub fn gamestate(&self) -> &GameState { &self.gamestate }

    /// Runs until `exit_game` arrives, the command channel closes, or the
    /// client stops listening.
    pub fn run(&mut self, rx: mpsc::Receiver<GameCommand>) {
        let mut last_update = Instant::now();
        'game: while let Ok(game_command) = rx.recv() {
            match game_command {
                GameCommand {
                    exit_game: Some(true),
                    ..
                } => {
                    debug!(self.logger, "exit requested"; "step" => self.gamestate.step());
                    break 'game;
                },
                GameCommand { a: Some(a), .. } => {
                    let action = match Action::from_index(a) {
                        Ok(action) => action,
                        Err(e) => {
                            warn!(self.logger, "ignoring command"; "error" => %e);
                            continue 'game;
                        },
                    };
                    let since_last_update = last_update.elapsed();
                    if since_last_update < self.tick {
                        std::thread::sleep(self.tick - since_last_update);
                    }
                    last_update = Instant::now();

                    if let Err(e) =
                        game_logic::update_gamestate(action, &mut self.gamestate, &self.connection)
                    {
                        debug!(self.logger, "stopping engine"; "error" => %e);
                        break 'game;
                    }
                    if let GameState::ShowResult(s, step) = &self.gamestate {
                        trace!(self.logger, "terminal state";
                            "step" => *step, "x" => s.x, "theta" => s.theta);
                    }
                },
                _ => {},
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<ClientReceivedMsg>>,
    }
    impl GameCon for Recorder {
        fn tx_send(&self, msg: ClientReceivedMsg) -> Result<(), EngineError> {
            self.sent.borrow_mut().push(msg);
            Ok(())
        }
    }

    struct HungUp;
    impl GameCon for HungUp {
        fn tx_send(&self, _msg: ClientReceivedMsg) -> Result<(), EngineError> {
            Err(EngineError::Disconnected)
        }
    }

    fn engine<T: GameCon>(con: T) -> GameEngine<T> {
        GameEngine::new(con, State::default(), Duration::from_millis(0), logging::discard())
    }

    #[test]
    fn answers_each_action_until_exit() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameCommand::new(1)).unwrap();
        tx.send(GameCommand::new(0)).unwrap();
        tx.send(GameCommand::exit()).unwrap();
        tx.send(GameCommand::new(1)).unwrap();

        let mut e = engine(Recorder::default());
        e.run(rx);
        let sent = e.connection.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].gamestate.as_ref().map(|g| g.step()), Some(2));
    }

    #[test]
    fn bad_action_index_is_skipped() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameCommand::new(7)).unwrap();
        drop(tx);

        let mut e = engine(Recorder::default());
        e.run(rx);
        assert!(e.connection.sent.borrow().is_empty());
        assert_eq!(e.gamestate().step(), 0);
    }

    #[test]
    fn finished_game_does_not_advance() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..500 {
            tx.send(GameCommand::new(1)).unwrap();
        }
        drop(tx);

        let mut e = engine(Recorder::default());
        e.run(rx);
        let step = match e.gamestate() {
            GameState::ShowResult(_, step) => *step,
            other => panic!("pushing one way for 500 steps should end the game, got {:?}", other),
        };
        assert!(step < 500);
        let sent = e.connection.sent.borrow();
        assert_eq!(sent.len(), 500);
        assert_eq!(sent.last().and_then(|m| m.gamestate.as_ref()).map(|g| g.step()), Some(step));
    }

    #[test]
    fn stops_when_client_hangs_up() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameCommand::new(1)).unwrap();
        tx.send(GameCommand::new(1)).unwrap();

        let mut e = engine(HungUp);
        e.run(rx);
        assert_eq!(e.gamestate().step(), 1);
    }
}
