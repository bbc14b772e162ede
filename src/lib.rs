//! Serializes animations so each one starts only after the previous one has completed.

pub mod config;
pub mod hal;
pub mod svc;

pub use svc::{BreakFlag, ChainState, DaisyChain, StdAnimator};
