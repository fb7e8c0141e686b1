//! Static Chart Renderer
//! Draws the two comparison figures with plotters and saves them as SVG.
//!
//! Each figure builds its own drawing area and chart context; nothing is
//! shared between the two renders.

use std::path::Path;

use anyhow::{bail, Context};
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::data::{Channel, SummaryTable};

/// Newtype over `WithKeyPoints<RangedCoordf64>` that opts into plotters'
/// default value formatting.
///
/// plotters 0.3 does not implement `ValueFormatter` for `WithKeyPoints` over a
/// float coordinate (its `FormatOption` is `NoDefaultFormatting`), so
/// `configure_mesh` cannot be called on a chart whose axis carries explicit
/// float key points. Forwarding every `Ranged` method while declaring
/// `DefaultFormatting` makes the blanket `ValueFormatter` impl apply again; the
/// axis text itself is still produced by the `x_label_formatter` set below.
struct KeyedF64Axis(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyedF64Axis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

/// Output path for the approximation-ratio comparison.
pub const RATIO_CHART_PATH: &str = "build/vc-ratio.svg";
/// Output path for the run-time comparison.
pub const TIME_CHART_PATH: &str = "build/run-time.svg";

const CHART_SIZE: (u32, u32) = (1200, 900);
const X_TICK_STRIDE: usize = 5;
const MARKER_RADIUS: i32 = 4;
const DOT_RADIUS: i32 = 2;

/// Dash pattern (segment length, gap) or a solid line when absent.
type DashPattern = Option<(i32, i32)>;

const SOLID: DashPattern = None;
const DASHED: DashPattern = Some((10, 6));
const DASH_DOT: DashPattern = Some((4, 4));

/// X tick positions: every 5 units starting at 5, up to the largest `V`.
///
/// Empty when the largest `V` is below 5; small ranges then render without
/// x labels, matching the upstream harness conventions.
pub fn tick_positions(max_v: i64) -> Vec<i64> {
    (5..=max_v).step_by(X_TICK_STRIDE).collect()
}

/// Min and max of mean ± sem across the given channels, skipping undefined
/// points. None when no group has a defined mean.
fn value_envelope(summary: &SummaryTable, channels: &[Channel]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for group in summary.groups() {
        for &channel in channels {
            let st = group.channel(channel);
            if !st.mean.is_finite() {
                continue;
            }
            let spread = if st.sem.is_finite() { st.sem } else { 0.0 };
            lo = lo.min(st.mean - spread);
            hi = hi.max(st.mean + spread);
        }
    }
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

/// The harness owns the output directory; it is never created here.
fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!("output directory {} does not exist", parent.display());
        }
    }
    Ok(())
}

fn x_span(summary: &SummaryTable) -> (f64, f64) {
    let min_v = summary.groups().first().map(|g| g.v).unwrap_or(0);
    let max_v = summary.max_v().unwrap_or(1);
    (min_v as f64 - 1.0, max_v as f64 + 1.0)
}

/// Figure 1: mean cover-size ratio of each approximation against `V`,
/// with ±1 SEM whiskers, on linear axes.
pub fn render_ratio_chart(summary: &SummaryTable, path: &Path) -> anyhow::Result<()> {
    let series: [(Channel, &str, RGBColor, DashPattern); 2] = [
        (Channel::Approx1Ratio, "Approx1 Ratio", RED, SOLID),
        (Channel::Approx2Ratio, "Approx2 Ratio", BLUE, DASHED),
    ];
    let channels = [Channel::Approx1Ratio, Channel::Approx2Ratio];

    ensure_output_dir(path)?;
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = x_span(summary);
    let ticks: Vec<f64> = tick_positions(summary.max_v().unwrap_or(0))
        .into_iter()
        .map(|v| v as f64)
        .collect();

    let (env_lo, env_hi) = value_envelope(summary, &channels).unwrap_or((0.9, 2.0));
    let pad = 0.1 * (env_hi - env_lo).max(f64::EPSILON);
    let y_lo = env_lo - pad;
    let y_hi = env_hi + pad;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(KeyedF64Axis((x_lo..x_hi).with_key_points(ticks)), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("V")
        .y_desc("approximate / optimal cover size")
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    let cap = (x_hi - x_lo) / 150.0;
    for (channel, label, color, dash) in series {
        let points: Vec<(f64, f64)> = summary
            .groups()
            .iter()
            .filter(|g| g.channel(channel).mean.is_finite())
            .map(|g| (g.v as f64, g.channel(channel).mean))
            .collect();

        let anno = match dash {
            Some((size, spacing)) => chart.draw_series(DashedLineSeries::new(
                points.clone(),
                size,
                spacing,
                color.stroke_width(2),
            ))?,
            None => chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?,
        };
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        for group in summary.groups() {
            let st = group.channel(channel);
            if !st.mean.is_finite() {
                continue;
            }
            let x = group.v as f64;
            // A single-trial group has no defined SEM; only the marker is drawn.
            if st.sem.is_finite() {
                let y0 = st.mean - st.sem;
                let y1 = st.mean + st.sem;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x, y0), (x, y1)],
                    color.mix(0.8),
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap, y0), (x + cap, y0)],
                    color.mix(0.8),
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap, y1), (x + cap, y1)],
                    color.mix(0.8),
                )))?;
            }
            chart.draw_series(std::iter::once(Circle::new(
                (x, st.mean),
                MARKER_RADIUS,
                color.filled(),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(TRANSPARENT)
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    Ok(())
}

/// Figure 2: mean run time of each strategy against `V`, with ±1 SEM
/// whiskers, on a logarithmic time axis.
pub fn render_time_chart(summary: &SummaryTable, path: &Path) -> anyhow::Result<()> {
    let series: [(Channel, &str, RGBColor, DashPattern); 3] = [
        (Channel::Approx1Time, "Approx1 Time", RED, SOLID),
        (Channel::Approx2Time, "Approx2 Time", BLUE, DASHED),
        (Channel::CnfSatTime, "CNF-SAT Time", BLACK, DASH_DOT),
    ];
    let channels = [
        Channel::Approx1Time,
        Channel::Approx2Time,
        Channel::CnfSatTime,
    ];

    ensure_output_dir(path)?;
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = x_span(summary);
    let ticks: Vec<f64> = tick_positions(summary.max_v().unwrap_or(0))
        .into_iter()
        .map(|v| v as f64)
        .collect();

    let (env_lo, env_hi) = value_envelope(summary, &channels).unwrap_or((0.1, 1000.0));
    // The log axis needs a strictly positive range.
    let y_lo = if env_lo > 0.0 { env_lo * 0.8 } else { 1e-3 };
    let y_hi = (env_hi * 1.25).max(y_lo * 10.0);

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            KeyedF64Axis((x_lo..x_hi).with_key_points(ticks)),
            (y_lo..y_hi).log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc("V")
        .y_desc("run time [ms]")
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    let cap = (x_hi - x_lo) / 150.0;
    for (channel, label, color, dash) in series {
        let points: Vec<(f64, f64)> = summary
            .groups()
            .iter()
            .filter(|g| {
                let mean = g.channel(channel).mean;
                mean.is_finite() && mean > 0.0
            })
            .map(|g| (g.v as f64, g.channel(channel).mean))
            .collect();

        let anno = match dash {
            Some((size, spacing)) => chart.draw_series(DashedLineSeries::new(
                points.clone(),
                size,
                spacing,
                color.stroke_width(2),
            ))?,
            None => chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?,
        };
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        for group in summary.groups() {
            let st = group.channel(channel);
            if !st.mean.is_finite() || st.mean <= 0.0 {
                continue;
            }
            let x = group.v as f64;
            if st.sem.is_finite() {
                // Whiskers are clamped to the axis floor so a wide SEM cannot
                // push a segment to a non-positive time.
                let y0 = (st.mean - st.sem).max(y_lo);
                let y1 = st.mean + st.sem;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x, y0), (x, y1)],
                    color.mix(0.8),
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap, y0), (x + cap, y0)],
                    color.mix(0.8),
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap, y1), (x + cap, y1)],
                    color.mix(0.8),
                )))?;
            }
            chart.draw_series(std::iter::once(Circle::new(
                (x, st.mean),
                DOT_RADIUS,
                color.filled(),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(TRANSPARENT)
        .draw()?;

    root.present()
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    Ok(())
}
