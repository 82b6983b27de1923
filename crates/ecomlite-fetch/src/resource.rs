//! # Fetch Resource
//!
//! A [`FetchResource`] tracks one URL: the last data received, whether a
//! request is in flight, and the last error.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Lazy ──► ┌──────┐  trigger()  ┌─────────┐  Ok   ┌─────────┐          │
//! │            │ idle │ ──────────► │ loading │ ────► │ success │          │
//! │            └──────┘             └─────────┘       └─────────┘          │
//! │                                  ▲    │  Err       │                   │
//! │   Immediate ─────────────────────┘    ▼            │ trigger()         │
//! │   (trigger on creation)          ┌─────────┐       │                   │
//! │                                  │ failure │ ◄─────┘                   │
//! │                                  └─────────┘                           │
//! │                                                                         │
//! │   loading: error cleared, data kept from the previous success          │
//! │   failure: error set, data still kept                                   │
//! │   replace(f): data = f(data) in any state, no request                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlapping Requests
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trigger() #1 ──► generation 1 ──────────────────────► response        │
//! │  trigger() #2 ──► generation 2 ──► response                 │          │
//! │                                       │                     ▼          │
//! │                                       ▼               1 ≠ latest (2)   │
//! │                                  2 == latest                │          │
//! │                                  state updated          discarded      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Only the most recently issued trigger may settle the resource. `replace`
//! does not issue a generation, so a request already in flight still lands
//! on top of a local replacement. A trigger future dropped before its
//! response arrives ends `loading` if it was still the latest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::Fetcher;
use crate::error::{FetchError, FetchResult};

/// Snapshot of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Last successfully received (or locally replaced) value.
    pub data: Option<T>,

    /// A request is in flight.
    pub loading: bool,

    /// Message from the last failed request, cleared when a new one starts.
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Whether a resource requests its URL as soon as it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Trigger once on creation.
    #[default]
    Immediate,

    /// Start idle until `trigger()` is called.
    Lazy,
}

/// Loading / error / data tracking for one URL.
///
/// Cloning is cheap and every clone shares the same state.
pub struct FetchResource<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    url: String,
    fetcher: Arc<dyn Fetcher>,
    state: watch::Sender<ResourceState<T>>,
    generation: AtomicU64,
}

impl<T> Clone for FetchResource<T> {
    fn clone(&self) -> Self {
        FetchResource {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchResource<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a resource for `url`.
    ///
    /// In [`FetchMode::Immediate`] the first request is spawned on the
    /// current tokio runtime. Outside a runtime there is nothing to spawn
    /// on, so the resource starts idle instead.
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn Fetcher>, mode: FetchMode) -> Self {
        let url = url.into();
        let initial = ResourceState {
            data: None,
            loading: mode == FetchMode::Immediate,
            error: None,
        };
        let (state, _) = watch::channel(initial);

        let resource = FetchResource {
            inner: Arc::new(Inner {
                url,
                fetcher,
                state,
                generation: AtomicU64::new(0),
            }),
        };

        if mode == FetchMode::Immediate {
            match Handle::try_current() {
                Ok(handle) => {
                    let background = resource.clone();
                    handle.spawn(async move {
                        background.trigger().await;
                    });
                }
                Err(_) => {
                    warn!(url = %resource.url(), "No async runtime, resource starts idle");
                    resource.inner.state.send_modify(|s| s.loading = false);
                }
            }
        }

        resource
    }

    /// Requests the URL and settles the resource with the outcome.
    ///
    /// Returns the state after this call completes, which reflects a newer
    /// trigger if one was issued meanwhile.
    pub async fn trigger(&self) -> ResourceState<T> {
        let request = self.begin();
        let result = self.fetch().await;
        request.settle(result);
        self.snapshot()
    }

    /// Replaces the data locally with `updater(previous)`.
    ///
    /// `loading` and `error` are left alone and no request is made.
    pub fn replace<F>(&self, updater: F)
    where
        F: FnOnce(Option<T>) -> Option<T>,
    {
        self.modify(|data| *data = updater(data.take()));
    }

    /// Sets the data locally.
    pub fn set_data(&self, data: T) {
        self.replace(|_| Some(data));
    }

    /// Runs `f` against the data in place and returns what it returns.
    ///
    /// Subscribers are notified even if `f` changed nothing.
    pub fn modify<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Option<T>) -> R,
    {
        let mut output = None;
        self.inner
            .state
            .send_modify(|state| output = Some(f(&mut state.data)));
        match output {
            Some(output) => output,
            None => unreachable!("send_modify runs its closure exactly once"),
        }
    }

    /// Waits until no request is in flight and returns the state.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut receiver = self.subscribe();
        let settled = receiver.wait_for(|state| !state.loading).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    /// Reads the data in place without cloning it.
    pub fn with_data<R, F>(&self, f: F) -> R
    where
        F: FnOnce(Option<&T>) -> R,
    {
        f(self.inner.state.borrow().data.as_ref())
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Generation of the most recently issued trigger (0 before the first).
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Change notifications for views that re-render on update.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// Issues a new generation and enters `loading`.
    fn begin(&self) -> InFlight<'_, T> {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            // Bumped under the state lock so generations and state writes
            // happen in the same order.
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        debug!(url = %self.inner.url, generation, "Fetch started");
        InFlight {
            inner: &self.inner,
            generation,
            settled: false,
        }
    }

    async fn fetch(&self) -> FetchResult<T> {
        let body = self.inner.fetcher.get(&self.inner.url).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl<T> Inner<T> {
    /// Applies an outcome unless a newer trigger was issued. `None` means
    /// the request was abandoned: only `loading` is cleared.
    fn settle(&self, generation: u64, outcome: Option<FetchResult<T>>) {
        let url = &self.url;
        self.state.send_if_modified(|state| {
            let latest = self.generation.load(Ordering::SeqCst);
            if generation != latest {
                debug!(url = %url, generation, latest, "Discarding stale response");
                return false;
            }

            match outcome {
                Some(Ok(data)) => {
                    debug!(url = %url, generation, "Fetch succeeded");
                    state.data = Some(data);
                    state.error = None;
                }
                Some(Err(e)) => {
                    warn!(url = %url, generation, error = %e, "Fetch failed");
                    state.error = Some(e.user_message());
                }
                None => debug!(url = %url, generation, "Fetch cancelled"),
            }
            state.loading = false;
            true
        });
    }
}

/// A started request for one generation.
///
/// Dropping it unsettled, as happens when the `trigger()` future is
/// cancelled, settles the generation as abandoned.
struct InFlight<'a, T> {
    inner: &'a Inner<T>,
    generation: u64,
    settled: bool,
}

impl<T> InFlight<'_, T> {
    fn settle(mut self, result: FetchResult<T>) {
        self.settled = true;
        self.inner.settle(self.generation, Some(result));
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.inner.settle(self.generation, None);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
