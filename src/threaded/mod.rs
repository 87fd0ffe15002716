//! Multi-threaded execution of transpose partitions.
//!
//! A single executor serves every policy: the policy only decides which
//! pairs each worker gets, the executor spawns the workers, lets them
//! swap their pairs, and joins them all before handing the matrix back.

pub mod executor;
mod shared;

pub use executor::ParallelExecutor;
