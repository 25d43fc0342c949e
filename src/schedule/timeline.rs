//! Logical timeline of deferred tasks.
//!
//! Tasks are due at a millisecond offset on a single clock owned by the
//! timeline. Equal due times pop in scheduling order. Each task carries the
//! session generation it was scheduled under; the timeline does not judge
//! staleness, the controller does.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Unique identifier for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// What a deferred task does when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Resolve the face-up pair after the display delay.
    ResolveFlips,
    /// Advance the game clock by one interval.
    Tick,
}

/// A task waiting on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Timeline time at which the task runs.
    pub due_ms: u64,
    /// Session generation the task belongs to.
    pub generation: u64,
}

// Min-heap order: earliest due first, then lowest id.
impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.id.0.cmp(&self.id.0))
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single logical clock with a queue of deferred tasks.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    queue: BinaryHeap<ScheduledTask>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current timeline time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of queued tasks, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `kind` to run `delay_ms` from now.
    pub fn schedule(&mut self, kind: TaskKind, delay_ms: u64, generation: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(ScheduledTask {
            id,
            kind,
            due_ms: self.now_ms.saturating_add(delay_ms),
            generation,
        });
        id
    }

    /// Pop the next task due at or before `until_ms`, moving the clock to its
    /// due time.
    ///
    /// Returns `None` when nothing is due; the clock is left unchanged so the
    /// caller can finish with `advance_to`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledTask> {
        match self.queue.peek() {
            Some(task) if task.due_ms <= until_ms => {}
            _ => return None,
        }
        let task = self.queue.pop()?;
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Move the clock forward to `ms`. Never moves backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_due_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(TaskKind::ResolveFlips, 1_000, 0);
        timeline.schedule(TaskKind::Tick, 100, 0);

        let first = timeline.pop_due(2_000).unwrap();
        assert_eq!(first.kind, TaskKind::Tick);
        assert_eq!(timeline.now_ms(), 100);

        let second = timeline.pop_due(2_000).unwrap();
        assert_eq!(second.kind, TaskKind::ResolveFlips);
        assert_eq!(timeline.now_ms(), 1_000);

        assert!(timeline.pop_due(2_000).is_none());
    }

    #[test]
    fn test_equal_due_is_fifo() {
        let mut timeline = Timeline::new();
        let a = timeline.schedule(TaskKind::Tick, 100, 0);
        let b = timeline.schedule(TaskKind::ResolveFlips, 100, 0);

        assert_eq!(timeline.pop_due(100).unwrap().id, a);
        assert_eq!(timeline.pop_due(100).unwrap().id, b);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timeline = Timeline::new();
        timeline.schedule(TaskKind::Tick, 100, 0);

        assert!(timeline.pop_due(99).is_none());
        assert_eq!(timeline.now_ms(), 0);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut timeline = Timeline::new();
        timeline.advance_to(500);
        timeline.schedule(TaskKind::Tick, 100, 0);

        assert!(timeline.pop_due(599).is_none());
        assert_eq!(timeline.pop_due(600).unwrap().due_ms, 600);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut timeline = Timeline::new();
        timeline.advance_to(1_000);
        timeline.advance_to(10);
        assert_eq!(timeline.now_ms(), 1_000);
    }
}
