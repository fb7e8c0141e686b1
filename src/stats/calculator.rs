//! Statistics Calculator
//! Descriptive statistics over the trial samples of one group.

/// Summary statistics for one measurement channel within one group.
#[derive(Debug, Clone, Copy)]
pub struct ChannelStats {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
    pub sem: f64,
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            mean: f64::NAN,
            std: f64::NAN,
            count: 0,
            sem: f64::NAN,
        }
    }
}

/// Sample mean, sample standard deviation (denominator `n - 1`) and count.
///
/// The standard deviation of a single sample is undefined and stays NaN.
/// `sem` is left unset here; see [`sem`].
pub fn describe(values: &[f64]) -> ChannelStats {
    let n = values.len();
    if n == 0 {
        return ChannelStats::default();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let variance =
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    } else {
        f64::NAN
    };

    ChannelStats {
        mean,
        std,
        count: n,
        sem: f64::NAN,
    }
}

/// Standard error of the mean: `std / sqrt(count)`, NaN for an empty group.
pub fn sem(std: f64, count: usize) -> f64 {
    if count == 0 {
        return f64::NAN;
    }
    std / (count as f64).sqrt()
}
