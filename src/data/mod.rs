//! Data module - Synthetic revenue generation and grouping

mod calendar;
mod processor;
mod segments;
mod synthesizer;

pub use processor::{DataProcessor, SegmentSeries};
pub use segments::{SegmentSpec, SEGMENTS};
pub use synthesizer::RevenueSynthesizer;

#[cfg(test)]
pub use synthesizer::Observation;
