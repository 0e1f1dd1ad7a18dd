//! Cancellable one-shot timers on a virtual clock
//!
//! Every "wait N ms" in the battle is a scheduled action here rather than a
//! blocking sleep or a nested callback, so tearing a battle down is a single
//! `cancel_all`.

#[derive(Debug, Clone)]
struct Timer<T> {
    /// Scheduling order, breaks ties between equal due times
    seq: u64,
    due_ms: u64,
    action: T,
}

/// One-shot timers, fired in due order (ties in scheduling order)
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            timers: Vec::new(),
        }
    }

    /// Current virtual time
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            seq,
            due_ms: self.now_ms + delay_ms,
            action,
        });
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the next timer due at or before `until_ms`, advancing the clock to
    /// its due time. When nothing is due the clock moves to `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        let next = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i);

        match next {
            Some(i) => {
                let timer = self.timers.swap_remove(i);
                self.now_ms = self.now_ms.max(timer.due_ms);
                Some(timer.action)
            }
            None => {
                self.now_ms = self.now_ms.max(until_ms);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<&'static str> {
        std::iter::from_fn(|| s.pop_due(until)).collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300, "c");
        s.schedule(100, "a");
        s.schedule(200, "b");
        assert_eq!(drain(&mut s, 250), vec!["a", "b"]);
        assert_eq!(s.now_ms(), 250);
        assert_eq!(drain(&mut s, 1000), vec!["c"]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(50, "first");
        s.schedule(50, "second");
        assert_eq!(drain(&mut s, 50), vec!["first", "second"]);
    }

    #[test]
    fn test_schedule_relative_to_fired_time() {
        let mut s = Scheduler::new();
        s.schedule(100, "a");
        assert_eq!(s.pop_due(1000), Some("a"));
        // Clock sits at the fired timer's due time, not the horizon
        assert_eq!(s.now_ms(), 100);
        s.schedule(100, "b");
        assert_eq!(drain(&mut s, 1000), vec!["b"]);
    }

    #[test]
    fn test_cancel_all_leaves_nothing() {
        let mut s = Scheduler::new();
        s.schedule(10, "a");
        s.schedule(20, "b");
        s.cancel_all();
        assert_eq!(s.pending(), 0);
        assert!(drain(&mut s, 10_000).is_empty());

        // Still usable afterwards
        s.schedule(5, "c");
        assert_eq!(drain(&mut s, 10_000), vec!["c"]);
    }
}
