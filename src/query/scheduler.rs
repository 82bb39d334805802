//! Deferred task scheduling.
//!
//! Stores defer two things to the next tick: the flush that notifies
//! subscribers of a settled batch of mutations, and re-arming observation
//! after hydration. A host event loop provides the [`Scheduler`]; the bundled
//! [`MicrotaskQueue`] is a FIFO drained explicitly by the caller.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after the current synchronous work completes.
pub trait Scheduler {
    /// Queue `task` for the next tick.
    fn schedule(&self, task: Task);
}

/// FIFO of tasks drained by [`MicrotaskQueue::run_until_idle`].
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl MicrotaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks, including ones queued while draining, until the
    /// queue is empty. Returns how many tasks ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            // Release the borrow before running: tasks may schedule more tasks.
            let next = self.tasks.borrow_mut().pop_front();
            let Some(task) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl Scheduler for MicrotaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
