//! One-shot timeouts owned by a scrollbar instance.

use web_time::Instant;

/// What a timeout does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// Remove the scrolling class
    ScrollingClass,
    /// Remove the scrolling-phantom class
    ScrollingPhantomClass,
    /// Remove the dragging-phantom class
    DraggingPhantomClass,
    /// Re-run the geometry pass once the current update batch is done
    DeferredRefresh,
}

/// Set of pending timeouts, at most one per [`Timeout`] kind.
#[derive(Debug, Clone, Default)]
pub struct Timeouts {
    entries: Vec<(Timeout, Instant)>,
}

impl Timeouts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `due`, restarting it if it was already pending.
    pub fn set(&mut self, kind: Timeout, due: Instant) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = due,
            None => self.entries.push((kind, due)),
        }
    }

    /// Cancel `kind`. Returns whether it was pending.
    pub fn clear(&mut self, kind: Timeout) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != kind);
        self.entries.len() != before
    }

    /// Cancel everything. Returns how many timeouts were dropped.
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn is_pending(&self, kind: Timeout) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Earliest deadline, if anything is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(_, due)| *due).min()
    }

    /// Remove and return the earliest timeout that is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Timeout> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= now)
            .min_by_key(|(_, (_, due))| *due)?;
        Some(self.entries.remove(index).0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_set_restarts_existing_timeout() {
        let t0 = Instant::now();
        let mut timeouts = Timeouts::new();
        timeouts.set(Timeout::ScrollingClass, t0 + Duration::from_millis(15));
        timeouts.set(Timeout::ScrollingClass, t0 + Duration::from_millis(30));

        assert_eq!(timeouts.len(), 1);
        assert_eq!(timeouts.deadline(), Some(t0 + Duration::from_millis(30)));
        assert_eq!(timeouts.pop_due(t0 + Duration::from_millis(20)), None);
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let t0 = Instant::now();
        let mut timeouts = Timeouts::new();
        timeouts.set(Timeout::ScrollingPhantomClass, t0 + Duration::from_millis(1010));
        timeouts.set(Timeout::ScrollingClass, t0 + Duration::from_millis(15));
        timeouts.set(Timeout::DeferredRefresh, t0);

        let now = t0 + Duration::from_millis(2000);
        assert_eq!(timeouts.pop_due(now), Some(Timeout::DeferredRefresh));
        assert_eq!(timeouts.pop_due(now), Some(Timeout::ScrollingClass));
        assert_eq!(timeouts.pop_due(now), Some(Timeout::ScrollingPhantomClass));
        assert_eq!(timeouts.pop_due(now), None);
        assert!(timeouts.is_empty());
    }

    #[test]
    fn test_clear() {
        let t0 = Instant::now();
        let mut timeouts = Timeouts::new();
        timeouts.set(Timeout::DraggingPhantomClass, t0);
        timeouts.set(Timeout::ScrollingClass, t0);

        assert!(timeouts.clear(Timeout::DraggingPhantomClass));
        assert!(!timeouts.clear(Timeout::DraggingPhantomClass));
        assert!(timeouts.is_pending(Timeout::ScrollingClass));
        assert_eq!(timeouts.clear_all(), 1);
        assert_eq!(timeouts.deadline(), None);
    }
}
