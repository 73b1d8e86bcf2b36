//! Pool core: the priority queue, worker loop, task handles, and the pool itself.

pub mod error;
pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use error::{PoolError, PoolResult};
pub use pool::Pool;
pub use queue::PriorityQueue;
pub use task::{Handle, Task};
