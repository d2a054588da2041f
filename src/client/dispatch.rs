//! 完成回调分发：保证每个请求的回调恰好触发一次。
//!
//! Completion dispatch for callback-style callers.
//!
//! Every handler submitted to a [`Dispatcher`] runs exactly once, with either a
//! result or an error, on the dispatcher's callback queue: a single task that
//! runs handlers one after another. Handlers must not block, and must not
//! assume they run on any particular thread.

use crate::error::{Error, ErrorContext, ServiceError};
use crate::ServiceResult;
use once_cell::sync::OnceCell;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Callback receiving exactly one of a result or an error.
pub type Handler<T> = Box<dyn FnOnce(Option<T>, Option<ServiceError>) + Send + 'static>;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Serial callback queue shared by all requests of one client.
#[derive(Clone, Default)]
pub struct Dispatcher {
    queue: Arc<OnceCell<mpsc::UnboundedSender<Job>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `operation` on the current tokio runtime and deliver its outcome
    /// to `handler` through the callback queue.
    ///
    /// Outside a tokio runtime nothing is sent: `handler` is called right away
    /// with a configuration error.
    pub fn submit<T, F, H>(&self, operation: F, handler: H)
    where
        T: Send + 'static,
        F: Future<Output = ServiceResult<T>> + Send + 'static,
        H: FnOnce(Option<T>, Option<ServiceError>) + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("watson-sdk callback submitted outside a tokio runtime: {}", e);
                let err = ServiceError::from(Error::configuration_with_context(
                    "callback operations must be started from within a tokio runtime",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("dispatcher"),
                ));
                run_job(Box::new(move || handler(None, Some(err))));
                return;
            }
        };
        let completion = Completion {
            handler: Some(Box::new(handler)),
            queue: self.sender(&runtime),
        };
        runtime.spawn(async move {
            let result = operation.await;
            completion.resolve(result);
        });
    }

    fn sender(&self, runtime: &Handle) -> mpsc::UnboundedSender<Job> {
        self.queue
            .get_or_init(|| {
                let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
                runtime.spawn(async move {
                    while let Some(job) = rx.recv().await {
                        run_job(job);
                    }
                });
                tx
            })
            .clone()
    }
}

fn run_job(job: Job) {
    if catch_unwind(AssertUnwindSafe(job)).is_err() {
        error!("watson-sdk completion handler panicked");
    }
}

/// Single-use completion slot.
///
/// Dropping it unresolved (the request task panicked or was torn down)
/// delivers [`ServiceError::abandoned`] instead.
struct Completion<T: Send + 'static> {
    handler: Option<Handler<T>>,
    queue: mpsc::UnboundedSender<Job>,
}

impl<T: Send + 'static> Completion<T> {
    fn resolve(mut self, result: ServiceResult<T>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: ServiceResult<T>) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        let job: Job = Box::new(move || match result {
            Ok(value) => handler(Some(value), None),
            Err(err) => handler(None, Some(err)),
        });
        // Queue gone (runtime shutting down): run inline rather than lose it.
        if let Err(mpsc::error::SendError(job)) = self.queue.send(job) {
            run_job(job);
        }
    }
}

impl<T: Send + 'static> Drop for Completion<T> {
    fn drop(&mut self) {
        if self.handler.is_some() {
            self.deliver(Err(ServiceError::abandoned()));
        }
    }
}
