//! Bounded priority task queue backed by an array-based binary min-heap.

use parking_lot::Mutex;

use super::task::Task;

/// A thread-safe min-heap of `(task, priority)` pairs.
///
/// Lower priority values are dequeued first. Tie-break among equal
/// priorities is unspecified (heap-order arbitrary); no FIFO guarantee is
/// made for equal priorities.
#[derive(Default)]
pub struct PriorityQueue {
    inner: Mutex<Vec<(Task, u32)>>,
}

impl PriorityQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Appends `task` with the given `priority` and restores the heap property.
    pub fn enqueue(&self, task: Task, priority: u32) {
        let mut heap = self.inner.lock();
        heap.push((task, priority));
        let start = heap.len() - 1;
        sift_up(&mut heap, start);
    }

    /// Removes and returns the lowest-priority task, if any.
    pub fn try_dequeue(&self) -> Option<(Task, u32)> {
        let mut heap = self.inner.lock();
        if heap.is_empty() {
            return None;
        }
        let last = heap.len() - 1;
        heap.swap(0, last);
        let popped = heap.pop();
        if !heap.is_empty() {
            sift_down(&mut heap, 0);
        }
        popped
    }

    /// Current number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no tasks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Bubbles the element at `start` toward the root while it is smaller than its parent.
fn sift_up(heap: &mut [(Task, u32)], start: usize) {
    let mut son = start;
    while son > 0 {
        let parent = (son - 1) / 2;
        if heap[parent].1 <= heap[son].1 {
            break;
        }
        heap.swap(son, parent);
        son = parent;
    }
}

/// Pushes the element at `start` down toward the leaves, restoring the heap property.
fn sift_down(heap: &mut [(Task, u32)], start: usize) {
    let end = heap.len() - 1;
    let mut parent = start;
    let mut son = 2 * parent + 1;

    while son <= end {
        if son < end && heap[son + 1].1 < heap[son].1 {
            son += 1;
        }
        if heap[son].1 >= heap[parent].1 {
            break;
        }
        heap.swap(son, parent);
        parent = son;
        son = 2 * son + 1;
    }
}
