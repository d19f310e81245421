//! Mode stack
//!
//! A plain growable vector of mode ids. The bottom entry is the default mode and is never
//! popped, so the stack is never empty.

use crate::macrolex::modes::ModeId;

/// Returned when a pop would remove the base mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackUnderflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeStack {
    modes: Vec<ModeId>,
}

impl ModeStack {
    pub fn new(base: ModeId) -> Self {
        Self { modes: vec![base] }
    }

    pub fn top(&self) -> ModeId {
        // The base entry is never removed
        self.modes[self.modes.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    pub fn push(&mut self, mode: ModeId) {
        self.modes.push(mode);
    }

    pub fn pop(&mut self) -> Result<ModeId, StackUnderflow> {
        if self.modes.len() == 1 {
            return Err(StackUnderflow);
        }
        self.modes.pop().ok_or(StackUnderflow)
    }

    /// Swap the top entry without changing depth
    pub fn replace_top(&mut self, mode: ModeId) -> ModeId {
        let last = self.modes.len() - 1;
        std::mem::replace(&mut self.modes[last], mode)
    }

    /// Modes above the base, bottom first
    pub fn open_modes(&self) -> &[ModeId] {
        &self.modes[1..]
    }
}
