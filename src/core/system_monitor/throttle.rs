//! Redraw rate limiting.
//!
//! A [`Throttle`] wraps a zero-argument callback so it runs at most once per
//! `delay`. A call arriving inside the delay is deferred to the end of the
//! window; further calls before that deferred run are coalesced into it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Minimum gap between redraws (~60 frames per second).
pub const REDRAW_DELAY: Duration = Duration::from_millis(16);

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct Throttle {
    inner: Arc<Inner>,
}

struct Inner {
    callback: Callback,
    delay: Duration,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_call: Option<Instant>,
    pending: Option<JoinHandle<()>>,
    /// Bumped on cancel and on every immediate run; a deferred run only
    /// fires if the generation it was scheduled under is still current.
    generation: u64,
}

impl Throttle {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                callback: Arc::new(callback),
                delay,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Run the callback now if the delay has elapsed, otherwise make sure
    /// exactly one deferred run is pending.
    pub fn call(&self) {
        let now = Instant::now();
        let mut state = self.inner.state.lock();

        let remaining = match state.last_call {
            Some(last) => self.inner.delay.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        };

        if remaining.is_zero() {
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            state.generation = state.generation.wrapping_add(1);
            state.last_call = Some(now);
            drop(state);
            (self.inner.callback)();
            return;
        }

        if state.pending.is_some() {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            // No timer available outside a runtime: degrade to an immediate run
            log::debug!("throttle called outside a tokio runtime, running immediately");
            state.last_call = Some(now);
            drop(state);
            (self.inner.callback)();
            return;
        };

        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        state.pending = Some(handle.spawn(async move {
            tokio::time::sleep(remaining).await;
            {
                let mut state = inner.state.lock();
                if state.generation != generation {
                    return;
                }
                state.pending = None;
                state.last_call = Some(Instant::now());
            }
            (inner.callback)();
        }));
    }

    /// Drop any pending deferred run and forget the last invocation time.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.last_call = None;
    }

    pub fn has_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("delay", &self.inner.delay)
            .field("pending", &self.has_pending())
            .finish()
    }
}
