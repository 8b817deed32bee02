use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::dashboard::controller::ChartInstance;
use crate::models::{ChartSeries, ChartStyle, Rgb};

/// Points sampled per segment for the area under the line
const FILL_SAMPLES: usize = 24;
/// Vertical steps between the lower bound and the top of the y axis
const FILL_ROWS: usize = 32;

pub fn draw_chart(f: &mut Frame, area: Rect, chart: &ChartInstance) {
    let series = chart.series();
    match series.style {
        ChartStyle::Bar => draw_bar_chart(f, area, series),
        ChartStyle::Line => draw_line_chart(f, area, series),
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn draw_bar_chart(f: &mut Frame, area: Rect, series: &ChartSeries) {
    let bar_width = series
        .labels
        .iter()
        .map(|label| label.width())
        .max()
        .unwrap_or(3)
        .max(3) as u16;

    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(&series.values)
        .enumerate()
        .map(|(i, (label, value))| {
            let fg = series.colors.get(i).copied().map(color).unwrap_or(Color::Cyan);
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(value.max(0.0).round() as u64)
                .text_value(format!("{}", value))
                .style(Style::default().fg(fg))
                .value_style(Style::default().fg(Color::Black).bg(fg).add_modifier(Modifier::BOLD))
        })
        .collect();

    let bar_chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {} ", series.title))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);

    f.render_widget(bar_chart, area);
}

/// Y bounds with 10% headroom. Zero is only forced in when the series asks.
pub fn y_bounds(values: &[f64], begin_at_zero: bool) -> [f64; 2] {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if !max.is_finite() || !min.is_finite() {
        return [0.0, 1.0];
    }

    let (low, high) = if begin_at_zero {
        (min.min(0.0), max.max(0.0))
    } else {
        (min, max)
    };
    let pad = ((high - low) * 0.1).max(1.0);
    let low = if begin_at_zero && low >= 0.0 { 0.0 } else { low - pad };
    [low, high + pad]
}

/// Straight-line samples between consecutive values
pub fn fill_points(values: &[f64], samples: usize) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for (i, pair) in values.windows(2).enumerate() {
        for step in 0..samples {
            let t = step as f64 / samples as f64;
            points.push((i as f64 + t, pair[0] + (pair[1] - pair[0]) * t));
        }
    }
    if let Some(&last) = values.last() {
        points.push(((values.len() - 1) as f64, last));
    }
    points
}

/// Scatter points shading the area between the lower bound and the line.
/// Every point stays inside `bounds`.
pub fn fill_area(values: &[f64], bounds: [f64; 2], samples: usize, rows: usize) -> Vec<(f64, f64)> {
    let step = (bounds[1] - bounds[0]) / rows.max(1) as f64;
    let mut points = Vec::new();
    for (x, top) in fill_points(values, samples) {
        for row in 0..=rows {
            let y = bounds[0] + step * row as f64;
            if y > top || y > bounds[1] {
                break;
            }
            points.push((x, y));
        }
    }
    points
}

fn draw_line_chart(f: &mut Frame, area: Rect, series: &ChartSeries) {
    let line_color = series.colors.first().copied().map(color).unwrap_or(Color::Cyan);
    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect();
    let bounds = y_bounds(&series.values, series.begin_at_zero);
    let fill = if series.filled {
        fill_area(&series.values, bounds, FILL_SAMPLES, FILL_ROWS)
    } else {
        Vec::new()
    };
    let x_max = series.values.len().saturating_sub(1).max(1) as f64;

    let x_labels: Vec<Span> = series.labels.iter().map(|l| Span::raw(l.clone())).collect();
    let y_labels: Vec<Span> = (0..=4)
        .map(|i| {
            let value = bounds[0] + (bounds[1] - bounds[0]) * (i as f64) / 4.0;
            Span::raw(format!("{:.1}", value))
        })
        .collect();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(line_color).add_modifier(Modifier::DIM))
            .data(&fill),
        Dataset::default()
            .name(series.title.as_str())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(line_color))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", series.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(x_labels)
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(y_labels)
                .bounds(bounds),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_bounds_not_forced_to_zero() {
        let [low, high] = y_bounds(&[12.0, 9.0, 20.0], false);
        assert!(low > 0.0 && low < 9.0);
        assert!(high > 20.0);
    }

    #[test]
    fn test_y_bounds_from_zero() {
        let [low, high] = y_bounds(&[50000.0, 3000.0, 0.1], true);
        assert_eq!(low, 0.0);
        assert!(high > 50000.0);
    }

    #[test]
    fn test_y_bounds_empty() {
        assert_eq!(y_bounds(&[], false), [0.0, 1.0]);
    }

    #[test]
    fn test_fill_area_stays_under_line() {
        let values = [12.7, 9.4, -3.2];
        let bounds = y_bounds(&values, false);
        let points = fill_area(&values, bounds, 4, 16);

        assert!(!points.is_empty());
        let line = fill_points(&values, 4);
        for (x, y) in &points {
            assert!(*y >= bounds[0] && *y <= bounds[1]);
            let (_, top) = line.iter().find(|(lx, _)| lx == x).unwrap();
            assert!(y <= top);
        }
        // Shading starts at the lower bound, not at zero
        assert!(points.iter().any(|(_, y)| *y == bounds[0]));
        assert!(points.iter().all(|(_, y)| *y < 13.0));
    }

    #[test]
    fn test_fill_points() {
        let points = fill_points(&[0.0, 10.0, 4.0], 2);
        assert_eq!(
            points,
            vec![(0.0, 0.0), (0.5, 5.0), (1.0, 10.0), (1.5, 7.0), (2.0, 4.0)]
        );
        assert!(fill_points(&[], 4).is_empty());
    }
}
