//! Core deterministic primitives.
//!
//! Seeded randomness and state fingerprints. Nothing here knows about
//! roles, words or votes.

pub mod rng;
pub mod hash;

pub use rng::{DeterministicRng, derive_session_seed};
pub use hash::{StateHash, StateHasher, compute_state_hash, hash_with_domain};
