//! Keyboard focus bookkeeping over a fixed number of slots.

/// Tracks which of `len` slots holds keyboard focus.
///
/// A control group uses one with two slots (slider, field); a panel uses one
/// with a slot per group. Moving past either end wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRing {
    current: usize,
    len: usize,
}

impl FocusRing {
    /// A ring of `len` slots, focused on slot 0. A ring with no slots has
    /// nothing to focus and ignores every move.
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.len > 0 && self.current == index
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    /// Focus `index`, clamped to the last slot.
    pub fn set(&mut self, index: usize) {
        self.current = index.min(self.len.saturating_sub(1));
    }
}
