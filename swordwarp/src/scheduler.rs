//! Session-owned delayed task queue.
//!
//! Created with the session, advanced by the fixed step, and shut down explicitly. Tasks are
//! plain values handed back to the owner when due, so there are no stored closures holding
//! borrows into the simulation.

use log::debug;

use crate::error::SchedulerError;

pub type TaskId = u64;

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    due: f64,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: f64,
    next_id: TaskId,
    pending: Vec<Entry<T>>,
    shut_down: bool,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
            shut_down: false,
        }
    }

    /// Queue `task` to come due after `delay_seconds` of simulated time.
    pub fn schedule(&mut self, delay_seconds: f32, task: T) -> Result<TaskId, SchedulerError> {
        if self.shut_down {
            return Err(SchedulerError::ShutDown);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Entry {
            id,
            due: self.now + delay_seconds.max(0.0) as f64,
            task,
        });
        Ok(id)
    }

    /// Returns the task if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let idx = self.pending.iter().position(|e| e.id == id)?;
        Some(self.pending.remove(idx).task)
    }

    /// Advance the clock and return every task now due, earliest first (ties in schedule order).
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if self.shut_down {
            return Vec::new();
        }
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let (mut due, keep): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|e| e.due <= now);
        self.pending = keep;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|e| e.task).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// End the lifecycle: drop pending tasks and refuse new ones. Returns how many were dropped.
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.shut_down = true;
        debug!("scheduler shut down, dropped {dropped} pending task(s)");
        dropped
    }
}
