//! Specialized data structures
//!
//! - **[`ring_buffer`]**: Fixed-size ring buffer with overwrite-on-full
//! - **[`shared_ring_buffer`]**: The same buffer behind a lock, for
//!   diagnostic logs appended from many tasks
//!
//! ## Usage
//!
//! ```rust
//! use intake_common::collections::{RingBuffer, SharedRingBuffer};
//!
//! let mut buffer = RingBuffer::new(10);
//! buffer.push(1);
//!
//! let shared = SharedRingBuffer::new(10);
//! shared.push("event");
//! assert_eq!(shared.len(), 1);
//! ```

pub mod ring_buffer;
pub mod shared_ring_buffer;

// Re-export commonly used types
pub use ring_buffer::RingBuffer;
pub use shared_ring_buffer::SharedRingBuffer;
