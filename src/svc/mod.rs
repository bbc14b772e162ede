pub use break_flag::BreakFlag;
pub use daisy_chain::{ChainState, DaisyChain};
pub use std_animator::StdAnimator;

mod break_flag;
mod daisy_chain;
mod std_animator;
