pub mod game;
pub mod game_engine;
use self::game_engine::{EngineError, GameCon};
pub use self::game_engine::GameEngine;
use cartpole_codec::*;
use rand::Rng;

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
// half the pole's length
const POLE_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = POLE_MASS * POLE_LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;

pub const X_THRESHOLD: f64 = 2.4;
pub const THETA_THRESHOLD: f64 = 12.0 * std::f64::consts::PI / 180.0;

const INIT_RANGE: f64 = 0.05;

pub const REWARD_STEP: f64 = 1.0;

pub const ALL_ACTIONS: [f64; 2] = [-1.0, 1.0];

/// One Euler step of the cart-pole equations under `force` newtons along x.
pub fn dynamics(s: &State, force: f64) -> State {
    let (sin_theta, cos_theta) = s.theta.sin_cos();
    let temp = (force + POLE_MASS_LENGTH * s.theta_dot * s.theta_dot * sin_theta) / TOTAL_MASS;
    let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
        / (POLE_LENGTH * (4.0 / 3.0 - POLE_MASS * cos_theta * cos_theta / TOTAL_MASS));
    let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

    State {
        x: s.x + TAU * s.x_dot,
        x_dot: s.x_dot + TAU * x_acc,
        theta: s.theta + TAU * s.theta_dot,
        theta_dot: s.theta_dot + TAU * theta_acc,
    }
}

pub fn is_terminal(s: &State) -> bool { s.x.abs() > X_THRESHOLD || s.theta.abs() > THETA_THRESHOLD }

pub fn initial_state<R: Rng>(rng: &mut R) -> State {
    let mut draw = || rng.gen_range(-INIT_RANGE..INIT_RANGE);
    State::new(draw(), draw(), draw(), draw())
}

/// Applies action `a` to a running game and reports the resulting state.
/// A finished game is reported unchanged.
pub fn update_gamestate<T: GameCon>(
    a: Action,
    gamestate: &mut GameState,
    con: &T,
) -> Result<(), EngineError>
{
    if let GameState::Game(s, step) = gamestate {
        let force = FORCE_MAG * ALL_ACTIONS[a.index()];
        let next = dynamics(s, force);
        let step = *step + 1;
        *gamestate = if is_terminal(&next) {
            GameState::ShowResult(next, step)
        } else {
            GameState::Game(next, step)
        };
    }
    let mut h = ClientReceivedMsg::default();
    h.set_gamestate(gamestate.clone());
    con.tx_send(h)
}
