//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cache + pattern subsystems produce:
//!     → tracing events (compiles, rejections, eviction runs)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → logging.rs subscriber (binary only)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (cache name, counts, durations)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
