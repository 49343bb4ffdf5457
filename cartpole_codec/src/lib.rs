extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;

use std::convert::TryFrom;
use thiserror::Error;

/// Number of scalar fields in a cart-pole observation.
pub const STATE_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("state must have {expected} fields, got {got}")]
    Length { expected: usize, got: usize },
    #[error("state field {index} is not a number")]
    NotANumber { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("action index {0} out of range, expected 0 or 1")]
    OutOfRange(usize),
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of the cart and pole.
///
/// `theta` is in radians, positive when the pole leans toward positive x.
/// It is not wrapped to [-pi, pi].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}
impl State {
    pub fn new(x: f64, x_dot: f64, theta: f64, theta_dot: f64) -> State {
        State { x, x_dot, theta, theta_dot }
    }

    pub fn to_vec(&self) -> Vec<f64> { vec![self.x, self.x_dot, self.theta, self.theta_dot] }
}
impl TryFrom<&[f64]> for State {
    type Error = StateError;

    fn try_from(v: &[f64]) -> Result<State, StateError> {
        if v.len() != STATE_LEN {
            return Err(StateError::Length {
                expected: STATE_LEN,
                got: v.len(),
            });
        }
        if let Some(index) = v.iter().position(|f| f.is_nan()) {
            return Err(StateError::NotANumber { index });
        }
        Ok(State::new(v[0], v[1], v[2], v[3]))
    }
}

/// Push applied to the cart. The action space is binary; there is no
/// "stay" action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left = 0,
    Right = 1,
}
impl Action {
    pub fn from_index(a: usize) -> Result<Action, ActionError> {
        match a {
            0 => Ok(Action::Left),
            1 => Ok(Action::Right),
            _ => Err(ActionError::OutOfRange(a)),
        }
    }

    pub fn index(self) -> usize { self as usize }

    pub fn opposite(self) -> Action {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}
impl From<Action> for usize {
    fn from(a: Action) -> usize { a.index() }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameCommand {
    pub a: Option<usize>,
    pub exit_game: Option<bool>,
}
impl GameCommand {
    pub fn new(a: usize) -> Self {
        GameCommand {
            a: Some(a),
            exit_game: None,
        }
    }

    pub fn exit() -> Self {
        GameCommand {
            a: None,
            exit_game: Some(true),
        }
    }
}

/// Engine state as seen by the client: still running, or finished with the
/// state that ended it. The counter is the number of physics steps taken.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum GameState {
    Game(State, u64),
    ShowResult(State, u64),
}
impl GameState {
    pub fn state(&self) -> &State {
        match self {
            GameState::Game(s, _) | GameState::ShowResult(s, _) => s,
        }
    }

    pub fn step(&self) -> u64 {
        match self {
            GameState::Game(_, step) | GameState::ShowResult(_, step) => *step,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ClientReceivedMsg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamestate: Option<GameState>,
}
impl ClientReceivedMsg {
    pub fn set_gamestate(&mut self, gamestate: GameState) { self.gamestate = Some(gamestate); }

    pub fn serialize_send(msg: ClientReceivedMsg) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&msg)?)
    }

    pub fn deserialize_receive(s: &str) -> Result<ClientReceivedMsg, CodecError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_slice_requires_four_fields() {
        let short: &[f64] = &[0.0, 0.0, 0.1];
        assert_eq!(
            State::try_from(short),
            Err(StateError::Length { expected: 4, got: 3 })
        );
        let long: &[f64] = &[0.0; 5];
        assert!(State::try_from(long).is_err());
    }

    #[test]
    fn state_from_slice_rejects_nan() {
        let v: &[f64] = &[0.0, 0.0, std::f64::NAN, 0.0];
        assert_eq!(State::try_from(v), Err(StateError::NotANumber { index: 2 }));
    }

    #[test]
    fn state_from_slice_keeps_field_order() {
        let v: &[f64] = &[1.0, 2.0, 3.0, 4.0];
        let s = State::try_from(v).unwrap();
        assert_eq!(s, State::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(s.to_vec(), v.to_vec());
    }

    #[test]
    fn action_indices() {
        assert_eq!(Action::from_index(0), Ok(Action::Left));
        assert_eq!(Action::from_index(1), Ok(Action::Right));
        assert_eq!(Action::from_index(2), Err(ActionError::OutOfRange(2)));
        assert_eq!(usize::from(Action::Right), 1);
        assert_eq!(Action::Left.opposite(), Action::Right);
    }

    #[test]
    fn empty_message_parses() {
        let msg = ClientReceivedMsg::deserialize_receive("{}").unwrap();
        assert_eq!(msg.gamestate, None);
    }

    #[test]
    fn terminal_gamestate_survives_the_wire() {
        let mut msg = ClientReceivedMsg::default();
        msg.set_gamestate(GameState::ShowResult(State::new(2.5, 0.1, -0.3, 0.0), 42));
        let text = ClientReceivedMsg::serialize_send(msg.clone()).unwrap();
        assert_eq!(ClientReceivedMsg::deserialize_receive(&text).unwrap(), msg);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(ClientReceivedMsg::deserialize_receive("not json").is_err());
    }
}
