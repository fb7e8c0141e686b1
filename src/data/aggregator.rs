//! Trial Aggregator
//! Groups raw trial rows by `V` and reduces each measurement channel to
//! mean / std / count, in the shape the renderer consumes.

use std::collections::BTreeMap;

use polars::prelude::*;

use super::loader::{FormatError, INDEPENDENT_COLUMN};
use crate::stats::{self, ChannelStats};

/// The five quantities measured per trial, keyed to their CSV columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Approx1Ratio,
    Approx2Ratio,
    Approx1Time,
    Approx2Time,
    CnfSatTime,
}

pub const CHANNEL_COUNT: usize = Channel::ALL.len();

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Approx1Ratio,
        Channel::Approx2Ratio,
        Channel::Approx1Time,
        Channel::Approx2Time,
        Channel::CnfSatTime,
    ];

    /// Column name in the harness CSV.
    pub fn column_name(self) -> &'static str {
        match self {
            Channel::Approx1Ratio => "approx1-ratio",
            Channel::Approx2Ratio => "approx2-ratio",
            Channel::Approx1Time => "approx1-time",
            Channel::Approx2Time => "approx2-time",
            Channel::CnfSatTime => "cnf-sat-time",
        }
    }
}

/// Aggregated statistics for one value of `V`.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub v: i64,
    channel_stats: [ChannelStats; CHANNEL_COUNT],
}

impl GroupSummary {
    pub fn channel(&self, channel: Channel) -> &ChannelStats {
        &self.channel_stats[channel as usize]
    }
}

/// Per-`V` aggregates, ordered by strictly ascending `V`.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    groups: Vec<GroupSummary>,
}

impl SummaryTable {
    pub fn groups(&self) -> &[GroupSummary] {
        &self.groups
    }

    /// Largest observed `V`, if any rows were grouped.
    pub fn max_v(&self) -> Option<i64> {
        self.groups.last().map(|g| g.v)
    }

    /// Fill in the standard error of the mean for every group and channel.
    pub fn attach_sem(&mut self) {
        for group in &mut self.groups {
            for st in &mut group.channel_stats {
                st.sem = stats::sem(st.std, st.count);
            }
        }
    }
}

/// Partition trials by `V` and reduce each measurement channel independently.
///
/// A null or NaN cell only drops that cell; the row still contributes its
/// remaining channels. Rows with a null `V` cannot be grouped and are skipped.
pub fn aggregate(df: &DataFrame) -> Result<SummaryTable, FormatError> {
    let v_col = df.column(INDEPENDENT_COLUMN)?.cast(&DataType::Int64)?;
    let v_ca = v_col.i64()?;

    let channel_cols = Channel::ALL
        .iter()
        .map(|ch| -> Result<Column, FormatError> {
            Ok(df.column(ch.column_name())?.cast(&DataType::Float64)?)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let channel_cas = channel_cols
        .iter()
        .map(|col| col.f64())
        .collect::<Result<Vec<_>, _>>()?;

    let mut samples: BTreeMap<i64, Vec<Vec<f64>>> = BTreeMap::new();
    for row in 0..df.height() {
        let Some(v) = v_ca.get(row) else { continue };
        let group = samples
            .entry(v)
            .or_insert_with(|| vec![Vec::new(); CHANNEL_COUNT]);
        for (values, ca) in group.iter_mut().zip(&channel_cas) {
            if let Some(value) = ca.get(row) {
                if !value.is_nan() {
                    values.push(value);
                }
            }
        }
    }

    let groups = samples
        .into_iter()
        .map(|(v, channels)| {
            let mut channel_stats = [ChannelStats::default(); CHANNEL_COUNT];
            for (st, values) in channel_stats.iter_mut().zip(&channels) {
                *st = stats::describe(values);
            }
            GroupSummary { v, channel_stats }
        })
        .collect();

    Ok(SummaryTable { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    const EPS: f64 = 1e-9;

    fn trials(vs: &[i64], ratio1: &[f64]) -> DataFrame {
        let n = vs.len();
        df!(
            "V" => vs,
            "approx1-ratio" => ratio1,
            "approx2-ratio" => vec![1.5; n],
            "approx1-time" => vec![0.1; n],
            "approx2-time" => vec![0.2; n],
            "cnf-sat-time" => vec![100.0; n],
        )
        .unwrap()
    }

    fn summarized(df: &DataFrame) -> SummaryTable {
        let mut table = aggregate(df).unwrap();
        table.attach_sem();
        table
    }

    #[test]
    fn mean_std_count_match_analytic_values() {
        let df = trials(&[10, 10, 10], &[1.0, 1.2, 1.1]);
        let table = summarized(&df);

        assert_eq!(table.groups().len(), 1);
        let st = table.groups()[0].channel(Channel::Approx1Ratio);
        assert!((st.mean - 1.1).abs() < EPS);
        assert!((st.std - 0.1).abs() < EPS);
        assert_eq!(st.count, 3);
    }

    #[test]
    fn groups_are_sorted_ascending_without_duplicates() {
        let df = trials(&[15, 5, 10, 5, 15, 10], &[1.0; 6]);
        let table = summarized(&df);

        let vs: Vec<i64> = table.groups().iter().map(|g| g.v).collect();
        assert_eq!(vs, vec![5, 10, 15]);
        assert!(vs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sem_is_std_over_sqrt_count_for_every_channel() {
        let df = trials(&[5, 5, 5, 10, 10], &[1.0, 1.2, 1.4, 1.1, 1.3]);
        let table = summarized(&df);

        for group in table.groups() {
            for channel in Channel::ALL {
                let st = group.channel(channel);
                if st.std.is_nan() {
                    assert!(st.sem.is_nan());
                } else {
                    assert!((st.sem - st.std / (st.count as f64).sqrt()).abs() < EPS);
                    assert!(st.sem >= 0.0);
                }
            }
        }
    }

    #[test]
    fn missing_cells_only_affect_their_own_channel() {
        let df = df!(
            "V" => [5i64, 5, 5],
            "approx1-ratio" => [Some(1.0), None, Some(1.2)],
            "approx2-ratio" => [Some(1.5), Some(1.5), Some(1.5)],
            "approx1-time" => [Some(0.1), Some(0.3), None],
            "approx2-time" => [Some(0.2), Some(0.2), Some(0.2)],
            "cnf-sat-time" => [Some(100.0), Some(90.0), Some(110.0)],
        )
        .unwrap();
        let table = summarized(&df);

        let group = &table.groups()[0];
        assert_eq!(group.channel(Channel::Approx1Ratio).count, 2);
        assert_eq!(group.channel(Channel::Approx1Time).count, 2);
        assert_eq!(group.channel(Channel::Approx2Ratio).count, 3);
        assert_eq!(group.channel(Channel::CnfSatTime).count, 3);
        assert!((group.channel(Channel::Approx1Ratio).mean - 1.1).abs() < EPS);
    }

    #[test]
    fn count_totals_match_non_missing_rows() {
        let df = df!(
            "V" => [5i64, 5, 10, 10, 15],
            "approx1-ratio" => [Some(1.0), None, Some(1.2), Some(1.4), None],
            "approx2-ratio" => [Some(1.5); 5],
            "approx1-time" => [Some(0.1); 5],
            "approx2-time" => [Some(0.2); 5],
            "cnf-sat-time" => [Some(100.0); 5],
        )
        .unwrap();
        let table = summarized(&df);

        let total: usize = table
            .groups()
            .iter()
            .map(|g| g.channel(Channel::Approx1Ratio).count)
            .sum();
        assert_eq!(total, 3);
        let total_full: usize = table
            .groups()
            .iter()
            .map(|g| g.channel(Channel::CnfSatTime).count)
            .sum();
        assert_eq!(total_full, 5);
    }

    #[test]
    fn two_group_scenario_has_positive_sems() {
        let df = df!(
            "V" => [5i64, 5, 10, 10],
            "approx1-ratio" => [1.0, 1.2, 1.3, 1.5],
            "approx2-ratio" => [1.1, 1.3, 1.4, 1.6],
            "approx1-time" => [10.0, 12.0, 40.0, 44.0],
            "approx2-time" => [11.0, 13.0, 41.0, 45.0],
            "cnf-sat-time" => [100.0, 120.0, 400.0, 440.0],
        )
        .unwrap();
        let table = summarized(&df);

        let vs: Vec<i64> = table.groups().iter().map(|g| g.v).collect();
        assert_eq!(vs, vec![5, 10]);
        for group in table.groups() {
            for channel in Channel::ALL {
                let st = group.channel(channel);
                assert_eq!(st.count, 2);
                assert!(st.sem > 0.0);
            }
        }
    }

    #[test]
    fn single_trial_group_has_undefined_std_and_sem() {
        let df = trials(&[5, 5, 10], &[1.0, 1.2, 1.3]);
        let table = summarized(&df);

        let lone = table.groups().iter().find(|g| g.v == 10).unwrap();
        let st = lone.channel(Channel::Approx1Ratio);
        assert_eq!(st.count, 1);
        assert!((st.mean - 1.3).abs() < EPS);
        assert!(st.std.is_nan());
        assert!(st.sem.is_nan());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let df = trials(&[5, 10, 5, 10], &[1.0, 1.2, 1.4, 1.6]);
        let a = summarized(&df);
        let b = summarized(&df);

        for (ga, gb) in a.groups().iter().zip(b.groups()) {
            assert_eq!(ga.v, gb.v);
            for channel in Channel::ALL {
                assert_eq!(ga.channel(channel).mean.to_bits(), gb.channel(channel).mean.to_bits());
                assert_eq!(ga.channel(channel).std.to_bits(), gb.channel(channel).std.to_bits());
                assert_eq!(ga.channel(channel).sem.to_bits(), gb.channel(channel).sem.to_bits());
            }
        }
    }
}
