//! Queue family.
//!
//! - [`Queue`]: unbounded FIFO.
//! - [`PriorityQueue`]: highest priority first, FIFO among equal priorities.
//! - [`CircularQueue`]: fixed capacity ring that evicts the oldest item
//!   when a new one arrives and the ring is full.
//!
//! All three take owned items and hand them back by value on dequeue.
//! An empty dequeue is `None`, never an error.
//!
//! # Usage
//!
//! ```
//! use orga_collections::queue::{CircularQueue, PriorityQueue};
//!
//! let mut pq = PriorityQueue::new();
//! pq.enqueue("low", 1);
//! pq.enqueue("urgent", 5);
//! assert_eq!(pq.dequeue(), Some("urgent"));
//!
//! let mut recent = CircularQueue::new(2);
//! recent.enqueue(1);
//! recent.enqueue(2);
//! assert_eq!(recent.enqueue(3), Some(1));
//! assert_eq!(recent.to_vec(), vec![2, 3]);
//! ```

mod circular;
mod fifo;
mod priority;

pub use circular::{CircularQueue, CircularQueueSnapshot};
pub use fifo::{Queue, QueueSnapshot};
pub use priority::{PriorityItem, PriorityQueue, PriorityQueueSnapshot};
