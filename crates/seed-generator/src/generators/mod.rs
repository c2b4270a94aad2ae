//! Individual value generators for the non-textual categories.
//!
//! These draw directly from the seeded RNG so that runs with the same seed
//! produce the same values.

pub mod binary;
pub mod network;
pub mod numeric;
pub mod temporal;
pub mod uuid;
