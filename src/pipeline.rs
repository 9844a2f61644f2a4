//! Query Parameter Pipeline
//!
//! Turns a feed of URL query parameters into a stream of fetch results:
//!
//! 1. the current snapshot is derived synchronously into a key
//! 2. every later change is derived the same way
//! 3. a key is only acted on once it stayed the latest for the debounce window
//! 4. a key equal to the last successfully issued one is dropped
//! 5. a surviving key starts one request and drops the previous in-flight one
//!
//! Requests are futures built by the caller and are only polled here, so a
//! superseded request that never got polled never hits the network. A failed
//! request is yielded as an `Err` result; the stream keeps observing params.
//! Dropping the pipeline drops its timer and in-flight request.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{LocalBoxStream, Stream, StreamExt};

use crate::router::QueryParams;

/// Something that knows the current query params and announces changes
pub trait ParamsSource {
    fn snapshot(&self) -> QueryParams;
    fn changes(&self) -> LocalBoxStream<'static, QueryParams>;
}

/// Quiescence window plus the timer used to measure it
pub struct Debounce {
    window: Duration,
    sleep: Box<dyn Fn(Duration) -> LocalBoxFuture<'static, ()>>,
}

impl Debounce {
    pub fn new<S, F>(window: Duration, sleep: S) -> Self
    where
        S: Fn(Duration) -> F + 'static,
        F: Future<Output = ()> + 'static,
    {
        Self {
            window,
            sleep: Box::new(move |d| sleep(d).boxed_local()),
        }
    }

    /// Browser timer backed by `setTimeout`
    pub fn browser(window: Duration) -> Self {
        Self::new(window, |d: Duration| {
            gloo_timers::future::TimeoutFuture::new(d.as_millis().min(u32::MAX as u128) as u32)
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn timer(&self) -> LocalBoxFuture<'static, ()> {
        (self.sleep)(self.window)
    }
}

/// Where a pipeline is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Nothing fetched or pending
    Idle,
    /// A key is waiting out the debounce window
    Awaiting,
    /// A request is in flight
    Fetching,
    /// The last request succeeded
    Displaying,
    /// The last request failed; new params still trigger fetches
    Failed,
}

/// Result of the request issued for `key`
#[derive(Debug)]
pub struct Fetched<K, T, E> {
    pub key: K,
    pub result: Result<T, E>,
}

type Derive<K> = Box<dyn Fn(&QueryParams) -> K>;
type Fetch<K, T, E> = Box<dyn Fn(&K) -> LocalBoxFuture<'static, Result<T, E>>>;

pub struct QueryPipeline<K, T, E> {
    changes: Option<LocalBoxStream<'static, QueryParams>>,
    derive: Derive<K>,
    fetch: Fetch<K, T, E>,
    debounce: Debounce,
    /// Latest derived key, whether or not it has been issued
    current: K,
    awaiting: bool,
    timer: Option<LocalBoxFuture<'static, ()>>,
    issued: Option<K>,
    in_flight: Option<(K, LocalBoxFuture<'static, Result<T, E>>)>,
    last_ok: Option<bool>,
}

// No field is structurally pinned; every future is boxed.
impl<K, T, E> Unpin for QueryPipeline<K, T, E> {}

impl<K, T, E> QueryPipeline<K, T, E>
where
    K: Clone + PartialEq + fmt::Debug + 'static,
{
    pub fn new<P, D, F, Fut>(source: &P, derive: D, fetch: F, debounce: Debounce) -> Self
    where
        P: ParamsSource + ?Sized,
        D: Fn(&QueryParams) -> K + 'static,
        F: Fn(&K) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let current = derive(&source.snapshot());
        log::debug!("[PIPELINE] starting at {:?}, debounce {:?}", current, debounce.window());
        Self {
            changes: Some(source.changes()),
            derive: Box::new(derive),
            fetch: Box::new(move |key: &K| fetch(key).boxed_local()),
            debounce,
            current,
            awaiting: true,
            timer: None,
            issued: None,
            in_flight: None,
            last_ok: None,
        }
    }

    /// Key derived from the most recent params, available before any fetch
    pub fn current_key(&self) -> &K {
        &self.current
    }

    pub fn phase(&self) -> PipelinePhase {
        if self.awaiting {
            PipelinePhase::Awaiting
        } else if self.in_flight.is_some() {
            PipelinePhase::Fetching
        } else {
            match self.last_ok {
                None => PipelinePhase::Idle,
                Some(true) => PipelinePhase::Displaying,
                Some(false) => PipelinePhase::Failed,
            }
        }
    }

    fn observe(&mut self, params: &QueryParams) {
        self.current = (self.derive)(params);
        self.awaiting = true;
        self.timer = None;
    }

    fn issue(&mut self) {
        if self.issued.as_ref() == Some(&self.current) {
            log::debug!("[PIPELINE] key {:?} unchanged, no request", self.current);
            return;
        }
        if let Some((stale, _)) = self.in_flight.take() {
            log::debug!("[PIPELINE] dropping in-flight request for {:?}", stale);
        }
        log::debug!("[PIPELINE] requesting {:?}", self.current);
        let request = (self.fetch)(&self.current);
        self.issued = Some(self.current.clone());
        self.in_flight = Some((self.current.clone(), request));
    }
}

impl<K, T, E> Stream for QueryPipeline<K, T, E>
where
    K: Clone + PartialEq + fmt::Debug + 'static,
{
    type Item = Fetched<K, T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        while let Some(changes) = this.changes.as_mut() {
            match changes.poll_next_unpin(cx) {
                Poll::Ready(Some(params)) => this.observe(&params),
                Poll::Ready(None) => this.changes = None,
                Poll::Pending => break,
            }
        }

        if this.awaiting {
            let debounce = &this.debounce;
            let timer = this.timer.get_or_insert_with(|| debounce.timer());
            if timer.as_mut().poll(cx).is_ready() {
                this.timer = None;
                this.awaiting = false;
                this.issue();
            }
        }

        if let Some((key, mut request)) = this.in_flight.take() {
            match request.as_mut().poll(cx) {
                Poll::Ready(result) => {
                    this.last_ok = Some(result.is_ok());
                    if result.is_err() {
                        // a failed key stays retryable
                        this.issued = None;
                    }
                    return Poll::Ready(Some(Fetched { key, result }));
                }
                Poll::Pending => this.in_flight = Some((key, request)),
            }
        }

        if this.changes.is_none() && !this.awaiting && this.in_flight.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
