//! View epochs for discarding results that belong to a replaced view.
//!
//! The epoch advances whenever the displayed session changes (a session is
//! applied, or the view is reset). Requests capture the epoch when issued and
//! their results are applied only while it is still current.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Epoch(u64);

#[derive(Debug, Default)]
pub struct ViewEpoch {
    current: u64,
}

impl ViewEpoch {
    pub fn current(&self) -> Epoch {
        Epoch(self.current)
    }

    /// Invalidates every outstanding epoch and returns the new one.
    pub fn advance(&mut self) -> Epoch {
        self.current = self.current.wrapping_add(1);
        Epoch(self.current)
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        epoch.0 == self.current
    }
}
