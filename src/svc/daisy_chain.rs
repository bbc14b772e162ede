use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::ChainConfig;
use crate::hal::{Action, Animation, AnimationOptions, Animator, Callback, Completion};
use crate::svc::BreakFlag;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub enum ChainState {
    /// Waiting for the next request.
    #[default]
    Idle,
    /// One request is in flight.
    Draining,
    /// The break flag was seen at a dequeue, nothing will run anymore.
    Broken,
}

#[derive(Default, Debug)]
struct Stats {
    performed: usize,
    interrupted: usize,
    abandoned: usize,
}

struct Request {
    id: usize,
    animation: Animation,
    action: Action,
    callback: Option<Callback>,
}

/// Runs animations one after another, each starting only once the previous one has completed.
///
/// Submitting never blocks: requests are queued and a dedicated worker hands them to the
/// [`Animator`] in order, waiting for each completion before dequeuing the next. Breaking the
/// chain ends it: the first request dequeued after the flag is set is abandoned together with
/// everything queued or submitted after it. A request already in flight is not affected.
pub struct DaisyChain {
    thread: Option<JoinHandle<()>>,
    tx: Sender<Request>,
    broken: BreakFlag,
    state: SharedChainState,
    continue_running: Arc<AtomicBool>,
    next_id: AtomicUsize,
}

impl DaisyChain {
    pub fn new<A>(animator: A) -> anyhow::Result<Self>
    where
        A: Animator + Send + 'static,
    {
        Self::new_with_config(animator, ChainConfig::default())
    }

    pub fn new_with_config<A>(animator: A, config: ChainConfig) -> anyhow::Result<Self>
    where
        A: Animator + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let broken = BreakFlag::new();
        let state = SharedChainState::default();
        let continue_running = Arc::new(AtomicBool::new(true));

        log::info!("Starting daisy chain");

        let thread = spawn_worker(
            config,
            animator,
            rx,
            broken.clone(),
            state.clone(),
            continue_running.clone(),
        )?;

        Ok(DaisyChain {
            thread: Some(thread),
            tx,
            broken,
            state,
            continue_running,
            next_id: AtomicUsize::new(0),
        })
    }

    pub fn animate<F>(&self, duration: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Animation::new(duration), action, None);
    }

    pub fn animate_with_completion<F, C>(&self, duration: Duration, action: F, completion: C)
    where
        F: FnOnce() + Send + 'static,
        C: FnOnce(bool) + Send + 'static,
    {
        self.submit(Animation::new(duration), action, Some(Box::new(completion)));
    }

    pub fn animate_with_options<F, C>(
        &self,
        duration: Duration,
        delay: Duration,
        options: AnimationOptions,
        action: F,
        completion: C,
    ) where
        F: FnOnce() + Send + 'static,
        C: FnOnce(bool) + Send + 'static,
    {
        let animation = Animation::new(duration)
            .with_delay(delay)
            .with_options(options);
        self.submit(animation, action, Some(Box::new(completion)));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn animate_with_spring<F, C>(
        &self,
        duration: Duration,
        delay: Duration,
        damping: f32,
        initial_velocity: f32,
        options: AnimationOptions,
        action: F,
        completion: C,
    ) where
        F: FnOnce() + Send + 'static,
        C: FnOnce(bool) + Send + 'static,
    {
        let animation = Animation::new(duration)
            .with_delay(delay)
            .with_options(options)
            .with_spring(damping, initial_velocity);
        self.submit(animation, action, Some(Box::new(completion)));
    }

    /// Queues `action` to run under `animation` once every earlier request has completed.
    pub fn submit<F>(&self, animation: Animation, action: F, completion: Option<Callback>)
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let request = Request {
            id,
            animation,
            action: Box::new(action),
            callback: completion,
        };

        if self.tx.send(request).is_err() {
            log::debug!("request {} discarded, chain is no longer draining", id);
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken.is_broken()
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.set(broken);
    }

    pub fn break_chain(&self) {
        self.broken.break_chain();
    }

    pub fn break_flag(&self) -> BreakFlag {
        self.broken.clone()
    }

    /// The flag is only observed when a request is dequeued, so a chain broken while idle stays
    /// [`ChainState::Idle`] until something else is submitted.
    pub fn state(&self) -> ChainState {
        self.state.get()
    }
}

impl Drop for DaisyChain {
    fn drop(&mut self) {
        self.continue_running.store(false, Ordering::Release);

        // Never join: the in-flight completion may be waiting for the thread dropping us.
        if let Some(thread) = self.thread.take() {
            if thread.is_finished() {
                thread.join().ok();
            }
        }
    }
}

fn spawn_worker<A>(
    config: ChainConfig,
    animator: A,
    rx: Receiver<Request>,
    broken: BreakFlag,
    state: SharedChainState,
    continue_running: Arc<AtomicBool>,
) -> anyhow::Result<JoinHandle<()>>
where
    A: Animator + Send + 'static,
{
    let thread = std::thread::Builder::new()
        .name(config.worker_name.to_string())
        .stack_size(config.worker_stack_size)
        .spawn(move || {
            let mut stats = Stats::default();

            while let Ok(request) = rx.recv() {
                if !continue_running.load(Ordering::Acquire) {
                    stats.abandoned += 1 + rx.try_iter().count();
                    break;
                }

                if broken.is_broken() {
                    state.set(ChainState::Broken);
                    let abandoned = 1 + rx.try_iter().count();
                    log::info!("chain broken, abandoning {} request(s)", abandoned);
                    stats.abandoned += abandoned;
                    break;
                }

                state.set(ChainState::Draining);

                let id = request.id;
                let start = Instant::now();

                if perform_and_wait(&animator, request) {
                    stats.performed += 1;
                } else {
                    log::debug!("request {} interrupted", id);
                    stats.interrupted += 1;
                }

                log::trace!(
                    "request {} took {}ms",
                    id,
                    (Instant::now() - start).as_millis()
                );

                state.set(ChainState::Idle);
            }

            log::debug!("stats: {:?}", stats);
        })?;

    Ok(thread)
}

fn perform_and_wait<A: Animator>(animator: &A, request: Request) -> bool {
    let Request {
        id,
        animation,
        action,
        callback,
    } = request;

    log::debug!("request {} started: {:?}", id, animation);

    let (resume, wait) = mpsc::sync_channel(1);
    animator.animate(animation, action, Completion::new(callback, resume));

    // A completion reports even when dropped, so this only fails if the animator panicked
    wait.recv().unwrap_or(false)
}

#[derive(Clone, Default)]
struct SharedChainState(Arc<Mutex<ChainState>>);

impl SharedChainState {
    fn set(&self, state: ChainState) {
        if let Ok(mut x) = self.0.lock() {
            *x = state;
        }
    }

    fn get(&self) -> ChainState {
        self.0.lock().map(|x| *x).unwrap_or_default()
    }
}
