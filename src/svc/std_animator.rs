use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::StdAnimatorConfig;
use crate::hal::{Action, Animation, Animator, Completion};

struct Job {
    animation: Animation,
    action: Action,
    completion: Completion,
}

enum Step {
    Begin(Job),
    End(Completion),
}

struct Scheduled {
    /// `None` lies beyond anything an `Instant` can represent, so it is never due.
    at: Option<Instant>,
    step: Step,
}

#[derive(Default, Debug)]
struct Stats {
    started: usize,
    finished: usize,
    interrupted: usize,
}

/// Animator backed by a dedicated thread acting as the UI context.
///
/// Actions and completions all run on that thread. Animations overlap freely: the thread only
/// sleeps until the next delay or duration expires, so independent chains sharing one animator
/// do not wait on each other.
///
/// Once the animator is stopped, new animations are rejected and their completions report
/// `finished = false` on the calling thread instead.
pub struct StdAnimator {
    thread: Option<JoinHandle<Stats>>,
    tx: Mutex<Option<Sender<Job>>>,
}

impl StdAnimator {
    pub fn new() -> anyhow::Result<Self> {
        Self::new_with_config(StdAnimatorConfig::default())
    }

    pub fn new_with_config(config: StdAnimatorConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            config.time_scale.is_finite() && config.time_scale >= 0.0,
            "invalid time scale {}",
            config.time_scale
        );

        let (tx, rx) = mpsc::channel();

        log::info!("Starting animator");

        let thread = std::thread::Builder::new()
            .name(config.thread_name.to_string())
            .spawn(move || run_loop(rx, config.time_scale))?;

        Ok(StdAnimator {
            thread: Some(thread),
            tx: Mutex::new(Some(tx)),
        })
    }

    fn stop(&mut self) -> Option<Stats> {
        // Disconnecting the channel stops the loop
        if let Ok(mut tx) = self.tx.lock() {
            tx.take();
        }

        let thread = self.thread.take()?;

        // Dropped from one of our own callbacks: the loop exits on its own
        if thread.thread().id() == std::thread::current().id() {
            return None;
        }

        thread.join().ok()
    }
}

impl Drop for StdAnimator {
    fn drop(&mut self) {
        if let Some(stats) = self.stop() {
            log::debug!("stats: {:?}", stats);
        }
    }
}

impl Animator for StdAnimator {
    fn animate(&self, animation: Animation, action: Action, completion: Completion) {
        let job = Job {
            animation,
            action,
            completion,
        };

        let sent = self
            .tx
            .lock()
            .ok()
            .and_then(|x| x.as_ref().map(|tx| tx.send(job).is_ok()));

        // A job that could not be sent is dropped here, and so is its completion
        if sent != Some(true) {
            log::warn!("animator is stopped, animation interrupted");
        }
    }
}

fn run_loop(rx: Receiver<Job>, time_scale: f32) -> Stats {
    let mut stats = Stats::default();
    let mut scheduled: Vec<Scheduled> = Vec::new();

    loop {
        let next = scheduled
            .iter()
            .filter_map(|x| x.at)
            .min()
            .map(|at| at.saturating_duration_since(Instant::now()));

        let received = match next {
            Some(timeout) => rx.recv_timeout(timeout),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(job) => {
                let at = deadline(job.animation.delay, time_scale);
                scheduled.push(Scheduled {
                    at,
                    step: Step::Begin(job),
                });
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        while let Some(step) = take_due(&mut scheduled) {
            match step {
                Step::Begin(job) => {
                    stats.started += 1;
                    let Job {
                        animation,
                        action,
                        completion,
                    } = job;
                    action();

                    if animation.is_animated() {
                        scheduled.push(Scheduled {
                            at: deadline(animation.duration, time_scale),
                            step: Step::End(completion),
                        });
                    } else {
                        stats.finished += 1;
                        completion.finish(true);
                    }
                }
                Step::End(completion) => {
                    stats.finished += 1;
                    completion.finish(true);
                }
            }
        }
    }

    // Whatever is still playing never gets to finish
    scheduled.sort_by_key(|x| (x.at.is_none(), x.at));
    for Scheduled { step, .. } in scheduled {
        stats.interrupted += 1;
        match step {
            Step::Begin(job) => job.completion.finish(false),
            Step::End(completion) => completion.finish(false),
        }
    }

    stats
}

fn take_due(scheduled: &mut Vec<Scheduled>) -> Option<Step> {
    let now = Instant::now();
    let (index, _) = scheduled
        .iter()
        .enumerate()
        .filter(|(_, x)| x.at.map_or(false, |at| at <= now))
        .min_by_key(|(_, x)| x.at)?;
    Some(scheduled.remove(index).step)
}

fn deadline(duration: Duration, time_scale: f32) -> Option<Instant> {
    Instant::now().checked_add(scale(duration, time_scale))
}

fn scale(duration: Duration, time_scale: f32) -> Duration {
    if duration.is_zero() || time_scale == 0.0 {
        Duration::ZERO
    } else if time_scale == 1.0 {
        duration
    } else {
        let secs = duration.as_secs_f64() * f64::from(time_scale);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}
