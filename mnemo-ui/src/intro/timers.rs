//! Frame-drained timer queue
//!
//! Timers never fire on their own: the owner calls [`TimerQueue::pop_due`]
//! with the current frame time and handles each due task. [`TimerQueue::invalidate`]
//! starts a new generation; ids from older generations are dead.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    due: f64,
    interval: Option<f64>,
    task: T,
}

/// Smallest repeat interval accepted, in milliseconds
const MIN_INTERVAL: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    generation: u64,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: 0,
            next_seq: 0,
        }
    }

    fn next_id(&mut self) -> TimerId {
        let id = TimerId {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        id
    }

    /// Run `task` once, `delay` ms after `now`
    pub fn schedule(&mut self, now: f64, delay: f64, task: T) -> TimerId {
        let id = self.next_id();
        self.entries.push(Entry {
            id,
            due: now + delay.max(0.0),
            interval: None,
            task,
        });
        id
    }

    /// Run `task` every `interval` ms, first at `now + interval`
    pub fn schedule_repeating(&mut self, now: f64, interval: f64, task: T) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        let id = self.next_id();
        self.entries.push(Entry {
            id,
            due: now + interval,
            interval: Some(interval),
            task,
        });
        id
    }

    /// Returns whether the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Drop every pending timer and start a new generation
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Earliest occurrence due at or before `now`, with its due time
    ///
    /// Ties go to the timer scheduled first. Repeating timers are moved to
    /// their next occurrence, so a late frame sees every missed tick.
    pub fn pop_due(&mut self, now: f64) -> Option<(TimerId, T, f64)> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.seq.cmp(&b.id.seq)))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[position];
        let fired = (entry.id, entry.task.clone(), entry.due);
        match entry.interval {
            Some(interval) => entry.due += interval,
            None => {
                self.entries.remove(position);
            }
        }
        Some(fired)
    }

    /// Every occurrence due at or before `now`, in due order
    pub fn drain_due(&mut self, now: f64) -> Vec<(TimerId, T)> {
        let mut fired = Vec::new();
        while let Some((id, task, _)) = self.pop_due(now) {
            fired.push((id, task));
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once_in_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(0.0, 300.0, "b");
        queue.schedule(0.0, 40.0, "a");

        assert!(queue.drain_due(39.0).is_empty());
        let fired: Vec<_> = queue.drain_due(500.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_repeating(1000.0, 3000.0, "tick");

        assert_eq!(queue.drain_due(3999.0).len(), 0);
        assert_eq!(queue.drain_due(10000.0).len(), 3);
        assert!(queue.is_scheduled(id));

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.drain_due(50000.0).is_empty());
    }

    #[test]
    fn test_invalidate_kills_old_ids() {
        let mut queue = TimerQueue::new();
        let old = queue.schedule(0.0, 10.0, 1);
        queue.invalidate();
        assert_eq!(queue.generation(), 1);
        assert!(!queue.is_scheduled(old));

        let new = queue.schedule(0.0, 10.0, 2);
        assert_ne!(old, new);
        assert!(!queue.cancel(old));
        assert_eq!(queue.drain_due(10.0), vec![(new, 2)]);
    }
}
