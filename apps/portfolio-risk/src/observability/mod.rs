//! Observability module for analysis metrics.
//!
//! Recording goes through the `metrics` facade; the library installs no
//! exporter, so every call is a no-op until the host application installs a
//! recorder.

mod metrics;

pub use self::metrics::{
    analysis_status, record_analysis, record_factor, record_recommendation, record_rejection,
};
