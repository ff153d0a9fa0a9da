//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! This module does not touch the store collaborator.

pub(crate) mod metrics;
pub mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventPerf, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
