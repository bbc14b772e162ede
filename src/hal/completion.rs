use std::fmt;
use std::sync::mpsc::SyncSender;

/// Called once with `finished`, which is `false` when the animation was interrupted.
pub type Callback = Box<dyn FnOnce(bool) + Send + 'static>;

/// One-shot report of an animation's end.
///
/// An [`Animator`](crate::hal::Animator) must call [`Completion::finish`] exactly once. Dropping a
/// completion without finishing it reports `finished = false`, so a chain waiting on it is never
/// left blocked.
///
/// The callback runs on the thread that finishes or drops the completion.
pub struct Completion {
    callback: Option<Callback>,
    resume: Option<SyncSender<bool>>,
}

impl Completion {
    pub(crate) fn new(callback: Option<Callback>, resume: SyncSender<bool>) -> Self {
        Self {
            callback,
            resume: Some(resume),
        }
    }

    /// A completion that is not attached to any chain.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce(bool) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(f)),
            resume: None,
        }
    }

    pub fn finish(mut self, finished: bool) {
        self.report(finished);
    }

    // The callback must run before the chain is resumed: it may break the chain, and the worker
    // checks the flag as soon as it wakes up.
    fn report(&mut self, finished: bool) {
        if let Some(callback) = self.callback.take() {
            callback(finished);
        }

        if let Some(resume) = self.resume.take() {
            // The chain may already be gone
            resume.send(finished).ok();
        }
    }

    fn is_pending(&self) -> bool {
        self.callback.is_some() || self.resume.is_some()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.is_pending() {
            log::warn!("completion dropped without being finished, reporting interrupted");
            self.report(false);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("has_callback", &self.callback.is_some())
            .field("attached", &self.resume.is_some())
            .finish()
    }
}
