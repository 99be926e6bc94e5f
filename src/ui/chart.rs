use std::fmt::Write;

use crate::dashboard::ChartPoint;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
/// Above this many points the per-point markers are dropped.
const MARKER_LIMIT: usize = 400;

/// Inline SVG line chart, x = point order, y = value.
pub fn line_chart(points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return "<p class=\"muted\">No numeric values to plot.</p>\n".to_string();
    }

    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let (mut min, mut max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }

    let x_at = |i: usize| {
        if points.len() == 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_at = |v: f64| MARGIN_TOP + plot_h * (max - v) / (max - min);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg class=\"chart\" xmlns='http://www.w3.org/2000/svg' viewBox='0 0 {WIDTH:.0} {HEIGHT:.0}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.0}' y1='{top:.0}' x2='{MARGIN_LEFT:.0}' y2='{bottom:.0}' class='axis'/>",
        top = MARGIN_TOP,
        bottom = MARGIN_TOP + plot_h
    );
    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.0}' y1='{bottom:.0}' x2='{right:.0}' y2='{bottom:.0}' class='axis'/>",
        bottom = MARGIN_TOP + plot_h,
        right = MARGIN_LEFT + plot_w
    );

    let _ = writeln!(
        svg,
        "  <text x='{x:.0}' y='{y:.0}' class='tick' text-anchor='end'>{max}</text>",
        x = MARGIN_LEFT - 6.0,
        y = MARGIN_TOP + 4.0,
        max = format_value(max)
    );
    let _ = writeln!(
        svg,
        "  <text x='{x:.0}' y='{y:.0}' class='tick' text-anchor='end'>{min}</text>",
        x = MARGIN_LEFT - 6.0,
        y = MARGIN_TOP + plot_h,
        min = format_value(min)
    );

    let label_y = HEIGHT - MARGIN_BOTTOM / 2.0 + 6.0;
    let first = &points[0];
    let _ = writeln!(
        svg,
        "  <text x='{MARGIN_LEFT:.0}' y='{label_y:.0}' class='tick' text-anchor='start'>{}</text>",
        escape_text(&first.label)
    );
    if points.len() > 1 {
        let last = &points[points.len() - 1];
        let _ = writeln!(
            svg,
            "  <text x='{x:.0}' y='{label_y:.0}' class='tick' text-anchor='end'>{}</text>",
            escape_text(&last.label),
            x = MARGIN_LEFT + plot_w
        );
    }

    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.value)))
        .collect();
    let _ = writeln!(
        svg,
        "  <polyline fill='none' class='series' points='{}'/>",
        coords.join(" ")
    );

    if points.len() <= MARKER_LIMIT {
        for (i, p) in points.iter().enumerate() {
            let _ = writeln!(
                svg,
                "  <circle cx='{:.1}' cy='{:.1}' r='2.5' class='marker'><title>{}: {}</title></circle>",
                x_at(i),
                y_at(p.value),
                escape_text(&p.label),
                format_value(p.value)
            );
        }
    }

    let _ = writeln!(svg, "</svg>");
    svg
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
