//! The square matrix type and the helpers that sit next to it.
//!
//! `transpose` holds the single-threaded baseline that every parallel
//! strategy is checked against. `cache` reads and writes the plain-text
//! matrix format used to validate round-trips.

pub mod cache;
pub mod size;
pub mod square;
pub mod transpose;

pub use size::is_power_of_two;
pub use square::SquareMatrix;
