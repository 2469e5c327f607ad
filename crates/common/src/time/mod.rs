//! Time utilities and abstractions
//!
//! - **[`clock`]**: Real and mock wall clocks so time-dependent rules can be
//!   tested deterministically

pub mod clock;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
