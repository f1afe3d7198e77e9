//! Customer segment definitions.

use serde::Serialize;

/// Revenue model parameters of one customer segment (values in thousands of USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentSpec {
    pub name: &'static str,
    /// Revenue level at the first month
    pub base: f64,
    /// Linear growth per month
    pub trend: f64,
    /// Peak-to-peak swing of the seasonal signal
    pub season_amp: f64,
    /// Standard deviation of the monthly perturbation
    pub noise: f64,
}

pub const SEGMENTS: [SegmentSpec; 3] = [
    SegmentSpec {
        name: "Enterprise",
        base: 650.0,
        trend: 11.0,
        season_amp: 140.0,
        noise: 40.0,
    },
    SegmentSpec {
        name: "SMB",
        base: 420.0,
        trend: 8.0,
        season_amp: 120.0,
        noise: 35.0,
    },
    SegmentSpec {
        name: "Consumer",
        base: 310.0,
        trend: 6.5,
        season_amp: 160.0,
        noise: 50.0,
    },
];
