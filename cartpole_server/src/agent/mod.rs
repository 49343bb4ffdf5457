pub mod balance;
pub mod history;

pub use self::balance::ZoneBalanceController;
pub use self::history::{ActionHistory, MAX_HISTORY};

use crate::domain::Transition;
use cartpole_codec::{Action, State};

/// A policy over the cart-pole domain.
///
/// `update` receives one experience tuple (state, action, reward, next
/// state, done) after every step. Hand-tuned controllers ignore it; it is
/// part of the trait so that a learning controller can be swapped in.
pub trait Controller {
    fn act(&mut self, state: &State) -> Action;

    fn update(&mut self, transition: &Transition);

    /// Called between episodes.
    fn reset(&mut self) {}
}
