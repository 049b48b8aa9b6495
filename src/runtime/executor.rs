use crate::runtime::TaskQueue;

use std::sync::Arc;

/// Runs ready tasks popped from a [`TaskQueue`].
pub(crate) struct Executor {
    queue: Arc<TaskQueue>,
}

impl Executor {
    pub(crate) fn new(queue: Arc<TaskQueue>) -> Self {
        Self { queue }
    }

    /// Runs at most `budget` ready tasks and returns how many ran.
    pub(crate) fn run(&self, budget: usize) -> usize {
        let mut ran = 0;

        while ran < budget {
            let Some(task) = self.queue.pop() else {
                break;
            };
            task.run();
            ran += 1;
        }

        ran
    }

    /// Runs tasks until the queue is empty.
    pub(crate) fn drain(&self) {
        self.run(usize::MAX);
    }
}
