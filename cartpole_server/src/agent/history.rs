use cartpole_codec::Action;
use std::collections::VecDeque;

pub const MAX_HISTORY: usize = 5;

/// Fixed-capacity log of recent actions, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionHistory {
    actions: VecDeque<Action>,
    capacity: usize,
}

impl Default for ActionHistory {
    fn default() -> Self { ActionHistory::with_capacity(MAX_HISTORY) }
}

impl ActionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        ActionHistory {
            actions: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends `a`, evicting the oldest entry once over capacity.
    pub fn push(&mut self, a: Action) {
        self.actions.push_back(a);
        if self.actions.len() > self.capacity {
            self.actions.pop_front();
        }
    }

    /// The last `n` actions (fewer if not yet recorded), oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = Action> + '_ {
        let skip = self.actions.len().saturating_sub(n);
        self.actions.iter().skip(skip).copied()
    }

    pub fn len(&self) -> usize { self.actions.len() }

    pub fn is_empty(&self) -> bool { self.actions.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn clear(&mut self) { self.actions.clear(); }
}
