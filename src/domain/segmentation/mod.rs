//! Segmentation domain module

mod plan;
mod segment;

pub use plan::{SegmentPlan, Window, SIZE_SAFETY_FACTOR};
pub use segment::Segment;
