//! Per-channel statistic records

use cellquant_core::Samples;

/// The six intensity statistics computed for every channel of a region
/// frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    /// Sum of intensities
    pub integrated: f64,
    pub median: f64,
    /// Sample standard deviation (n−1 denominator); NaN below two samples
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

impl ChannelStats {
    /// Compute all six statistics from a sample buffer. An empty buffer
    /// yields NaN throughout except `integrated` (0.0).
    pub fn from_samples(samples: &Samples) -> Self {
        Self {
            mean: samples.mean(),
            integrated: samples.sum(),
            median: samples.median(),
            sd: samples.sample_sd(),
            min: samples.min(),
            max: samples.max(),
        }
    }

    /// All-NaN record, used for the mask channel of surrounding statistics.
    pub fn nan() -> Self {
        Self {
            mean: f64::NAN,
            integrated: f64::NAN,
            median: f64::NAN,
            sd: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Surrounding-region statistics: the base six plus four percentile-trimmed
/// means of the sorted intensity distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundingStats {
    pub base: ChannelStats,
    /// Mean of the lowest 5% of values
    pub low5: f64,
    /// Mean of the lowest 25% of values
    pub low25: f64,
    /// Mean of the highest 5% of values
    pub high5: f64,
    /// Mean of the highest 25% of values
    pub high25: f64,
}

impl SurroundingStats {
    /// All-NaN record for the mask channel.
    pub fn nan() -> Self {
        Self {
            base: ChannelStats::nan(),
            low5: f64::NAN,
            low25: f64::NAN,
            high5: f64::NAN,
            high25: f64::NAN,
        }
    }
}
