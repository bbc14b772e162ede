use std::sync::Arc;

pub use animation::{Animation, AnimationCurve, AnimationOptions, Spring};
pub use completion::{Callback, Completion};

pub mod animation;
pub mod completion;

/// The changes to commit under animation.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Platform capability that performs a timed visual change.
///
/// Implementations run `action` on their own UI context, under the given animation parameters,
/// and finish `completion` exactly once when the animation ends.
///
/// The completion callback runs on whichever thread finishes or drops `completion`. An animator
/// that rejects work from inside `animate`, for instance because it has stopped, reports
/// `finished = false` on the calling thread, which for a chain is its sequencing worker.
pub trait Animator {
    fn animate(&self, animation: Animation, action: Action, completion: Completion);
}

impl<T: Animator + ?Sized> Animator for Arc<T> {
    fn animate(&self, animation: Animation, action: Action, completion: Completion) {
        (**self).animate(animation, action, completion)
    }
}

impl<T: Animator + ?Sized> Animator for Box<T> {
    fn animate(&self, animation: Animation, action: Action, completion: Completion) {
        (**self).animate(animation, action, completion)
    }
}
