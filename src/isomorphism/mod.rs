//! Graph isomorphism testing.

pub mod vf2;

pub use vf2::{find_all_isomorphisms, find_isomorphism, is_isomorphic, Vf2Matcher};
