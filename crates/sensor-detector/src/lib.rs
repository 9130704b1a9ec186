//! # sensor-detector
//!
//! The Loop Detector (spec §4.6), Closure Statistics (spec §4.7), and
//! Router (spec §4.8): fuses the keyword/semantic signals into a ranked
//! open-loop list, aggregates closure counts, and derives the daily mode
//! directive.

mod closure_stats;
mod loop_detector;
mod router;

pub use closure_stats::compute_closure_stats;
pub use loop_detector::{detect_loops, DetectorInput};
pub use router::route;
