//! Banker's algorithm allocator.
//!
//! The [`Allocator`] owns the available pool and the allocation, max and need
//! matrices. Requests are granted one unit at a time, and only when the state
//! after the grant still admits an order in which every process can finish.
//! Its mutating operations are not synchronized; use [`SharedAllocator`] when
//! more than one thread drives the same state.

mod completion;
mod matrix;
mod request;
mod safety;
mod shared;
mod state;

pub use matrix::CountMatrix;
pub use safety::format_sequence;
pub use shared::SharedAllocator;
pub use state::{Allocator, AllocatorError};
