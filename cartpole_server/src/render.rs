//! Text visualisation of the cart and pole.
//!
//! The driving loop polls `is_closed` before each step so a display that
//! goes away ends the episode early.

use cartpole_codec::State;
use std::io::Write;

const TRACK_MIN: f64 = -2.4;
const TRACK_MAX: f64 = 2.4;
const CART_WIDTH: f64 = 0.4;
const POLE_LENGTH: f64 = 1.0;

pub trait Renderer {
    fn render(&mut self, state: &State);

    fn is_closed(&self) -> bool;
}

/// Draws nothing and never closes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Renderer for Headless {
    fn render(&mut self, _state: &State) {}

    fn is_closed(&self) -> bool { false }
}

/// One-line frame redrawn in place: `=` is the cart, `o` the pole tip.
/// Closes for good on the first failed write.
pub struct TerminalRenderer<W: Write> {
    out: W,
    columns: usize,
    closed: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, columns: usize) -> Self {
        TerminalRenderer {
            out,
            columns: columns.max(8),
            closed: false,
        }
    }

    pub fn into_inner(self) -> W { self.out }

    fn column(&self, x: f64) -> Option<usize> {
        if !(TRACK_MIN..=TRACK_MAX).contains(&x) {
            return None;
        }
        let frac = (x - TRACK_MIN) / (TRACK_MAX - TRACK_MIN);
        Some(((frac * (self.columns - 1) as f64).round() as usize).min(self.columns - 1))
    }

    pub fn frame(&self, state: &State) -> String {
        let mut track = vec!['.'; self.columns];
        let half = CART_WIDTH / 2.0;
        if let (Some(lo), Some(hi)) = (
            self.column((state.x - half).max(TRACK_MIN)),
            self.column((state.x + half).min(TRACK_MAX)),
        ) {
            for c in &mut track[lo..=hi] {
                *c = '=';
            }
        }
        if let Some(tip) = self.column(state.x + POLE_LENGTH * state.theta.sin()) {
            track[tip] = 'o';
        }
        format!(
            "|{}| x={:+.3} theta={:+.3}",
            track.into_iter().collect::<String>(),
            state.x,
            state.theta
        )
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, state: &State) {
        if self.closed {
            return;
        }
        let frame = self.frame(state);
        if write!(self.out, "\r{}", frame).and_then(|_| self.out.flush()).is_err() {
            self.closed = true;
        }
    }

    fn is_closed(&self) -> bool { self.closed }
}
