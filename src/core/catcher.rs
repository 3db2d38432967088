//! Error-trap combinator
//!
//! A `Catcher` pairs a logger with a message and an error filter. A matching
//! error is logged exactly once at error severity, with its kind, message
//! and source chain captured, then suppressed; a non-matching error
//! propagates unchanged. The same catcher covers the three call shapes
//! uniformly: a plain call ([`run`](Catcher::run)), a lazily-consumed
//! sequence ([`iter`](Catcher::iter)), and a cooperatively-suspending call
//! ([`run_async`](Catcher::run_async)). The scoped-guard form
//! ([`guard`](Catcher::guard)) traps unwinding panics instead of error
//! values.

use std::future::Future;
use std::sync::Arc;

use super::event::ExceptionInfo;
use super::field::FieldMap;
use super::level::Level;
use super::logger::BoundLogger;

type Filter<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

pub struct Catcher<E> {
    logger: BoundLogger,
    message: String,
    filter: Filter<E>,
}

impl<E> Clone for Catcher<E> {
    fn clone(&self) -> Self {
        Self {
            logger: self.logger.clone(),
            message: self.message.clone(),
            filter: Arc::clone(&self.filter),
        }
    }
}

impl<E> Catcher<E>
where
    E: std::error::Error,
{
    /// A catcher matching every error of type `E`
    pub fn new(logger: &BoundLogger, message: impl Into<String>) -> Self {
        Self {
            logger: logger.clone(),
            message: message.into(),
            filter: Arc::new(|_| true),
        }
    }

    /// Restrict which errors are trapped; non-matching errors propagate
    /// unchanged
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    fn log_caught(&self, error: &E) {
        // the message is verbatim and sink failures are dropped, so a
        // failure here could only be the logging path itself misbehaving;
        // the catcher must not raise in place of the suppressed error
        let _ = self.logger.exception(&self.message, error);
    }

    /// Wrap a plain synchronous call.
    ///
    /// `Ok(Some(value))` on success, `Ok(None)` when a matching error was
    /// logged and suppressed, `Err` when the error did not match.
    pub fn run<T, F>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match f() {
            Ok(value) => Ok(Some(value)),
            Err(error) if (self.filter)(&error) => {
                self.log_caught(&error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Wrap a cooperatively-suspending call over its whole
    /// suspend-to-completion span
    pub async fn run_async<T, Fut>(&self, fut: Fut) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        match fut.await {
            Ok(value) => Ok(Some(value)),
            Err(error) if (self.filter)(&error) => {
                self.log_caught(&error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Wrap each step of a lazily-consumed sequence, so an error raised
    /// partway through iteration is still caught at that point.
    ///
    /// A matching error is logged, suppressed, and ends the sequence; a
    /// non-matching error is yielded to the caller and ends the sequence.
    pub fn iter<T, I>(&self, iter: I) -> CatchIter<I, E>
    where
        I: Iterator<Item = Result<T, E>>,
    {
        CatchIter {
            inner: iter,
            catcher: self.clone(),
            done: false,
        }
    }

    /// Scoped-guard form: trap an unwinding panic inside `f`, log it once at
    /// error severity, and suppress it. Normal exit has no effect.
    pub fn guard<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                if self.logger.enabled(Level::Error) {
                    let info = ExceptionInfo::from_panic(payload.as_ref());
                    let _ = self.logger.log_with(
                        Level::Error,
                        &self.message,
                        &[],
                        FieldMap::new()
                            .with_field("panic", info.message.clone()),
                    );
                }
                None
            }
        }
    }
}

/// Iterator adapter produced by [`Catcher::iter`]
pub struct CatchIter<I, E> {
    inner: I,
    catcher: Catcher<E>,
    done: bool,
}

impl<T, I, E> Iterator for CatchIter<I, E>
where
    I: Iterator<Item = Result<T, E>>,
    E: std::error::Error,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(value)) => Some(Ok(value)),
            Some(Err(error)) => {
                self.done = true;
                if (self.catcher.filter)(&error) {
                    self.catcher.log_caught(&error);
                    None
                } else {
                    Some(Err(error))
                }
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}
