//! Filter chain for in-flight events
//!
//! A filter receives the event by value together with a [`Next`]
//! continuation standing for every stage after it. It may change the event
//! before calling `next.run(event)`, skip the call to suppress the record, or
//! act after the call returns. The chain is an ordered list: environment-wide
//! filters first, then module filters, with the format-and-write sink as the
//! innermost stage.

use super::{error::Result, event::Event};
use std::fmt;
use std::sync::Arc;

/// Middleware stage of the emission pipeline
pub trait Filter: Send + Sync {
    fn apply(&self, event: Event, next: Next<'_>) -> Result<()>;
}

/// Shared handle to a filter
pub type SharedFilter = Arc<dyn Filter>;

/// Continuation handed to a filter: the rest of the chain plus the sink
pub struct Next<'a> {
    remaining: &'a [SharedFilter],
    sink: &'a dyn Fn(Event) -> Result<()>,
}

impl<'a> Next<'a> {
    /// Pass the event to the next filter, or to the sink after the last one
    pub fn run(self, event: Event) -> Result<()> {
        match self.remaining.split_first() {
            Some((filter, rest)) => filter.apply(
                event,
                Next {
                    remaining: rest,
                    sink: self.sink,
                },
            ),
            None => (self.sink)(event),
        }
    }

    /// Number of filters still ahead, not counting the sink
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

/// Ordered list of filters composed at emission time
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<SharedFilter>,
}

impl FilterChain {
    /// Concatenate environment filters and module filters, in that order
    pub fn compose(global: &[SharedFilter], local: &[SharedFilter]) -> Self {
        let mut filters = Vec::with_capacity(global.len() + local.len());
        filters.extend(global.iter().cloned());
        filters.extend(local.iter().cloned());
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run the event through every filter and finally into `sink`
    pub fn run<S>(&self, event: Event, sink: S) -> Result<()>
    where
        S: Fn(Event) -> Result<()>,
    {
        Next {
            remaining: &self.filters,
            sink: &sink,
        }
        .run(event)
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("len", &self.filters.len())
            .finish()
    }
}

/// Filter backed by a closure, see [`filter_fn`]
pub struct FilterFn<F> {
    f: F,
}

impl<F> Filter for FilterFn<F>
where
    F: Fn(Event, Next<'_>) -> Result<()> + Send + Sync,
{
    fn apply(&self, event: Event, next: Next<'_>) -> Result<()> {
        (self.f)(event, next)
    }
}

/// Build a filter from a closure
///
/// ```
/// use module_logger::core::filter::filter_fn;
///
/// let tag = filter_fn(|mut event, next| {
///     event.fields.insert_custom("request_id", "abc-123");
///     next.run(event)
/// });
/// # let _ = tag;
/// ```
pub fn filter_fn<F>(f: F) -> FilterFn<F>
where
    F: Fn(Event, Next<'_>) -> Result<()> + Send + Sync,
{
    FilterFn { f }
}
