//! Charts module - comparison chart rendering

mod renderer;

pub use renderer::{
    render_ratio_chart, render_time_chart, tick_positions, RATIO_CHART_PATH, TIME_CHART_PATH,
};
