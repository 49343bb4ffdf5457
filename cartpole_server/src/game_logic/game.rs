use crate::game_logic::game_engine::{EngineError, GameCon};
use cartpole_codec::*;
use futures::{channel::mpsc, executor, SinkExt};
use std::fmt;

/// Engine side of the link to a client; messages travel as JSON text.
#[derive(Clone)]
pub struct Connection {
    pub sender: mpsc::Sender<String>,
}
impl GameCon for Connection {
    fn tx_send(&self, msg: ClientReceivedMsg) -> Result<(), EngineError> {
        let text = ClientReceivedMsg::serialize_send(msg)?;
        executor::block_on(self.sender.clone().send(text)).map_err(|_| EngineError::Disconnected)
    }
}
impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Connection") }
}
impl Connection {
    pub fn new(sender: mpsc::Sender<String>) -> Connection { Connection { sender } }
}
