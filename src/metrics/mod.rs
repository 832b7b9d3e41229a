//! Metrics and observability infrastructure for starlift.
//!
//! Groups the internal event types and the `InternalEvent` trait. Counters
//! are emitted through the `metrics` facade; a one-shot batch job has no
//! scrape endpoint, so no exporter is installed here.

pub mod events;

/// Emit an internal event as a metric.
///
/// This macro calls the `InternalEvent::emit()` method on the given event,
/// which records the corresponding counter or histogram.
///
/// # Example
///
/// ```ignore
/// use starlift::metrics::events::RecordsLoaded;
///
/// emit!(RecordsLoaded { count: 100 });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}
