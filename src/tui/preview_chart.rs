//! Plotters-powered diamond preview widget for Ratatui.
//!
//! The preview is a terminal stand-in for the layered shape images: the
//! outline is scaled by the background scale, the yellow color overlay is
//! drawn as hatching whose density follows the color opacity, and clarity
//! inclusions are scattered pixels whose count follows the clarity opacity.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use std::f64::consts::{PI, TAU};

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Shape;
use crate::visualizer::VisualizerState;

/// Hatch rows drawn at full color opacity.
const MAX_HATCH_ROWS: usize = 14;

/// Inclusion pixels drawn at full clarity opacity.
const MAX_INCLUSIONS: usize = 36;

const OUTLINE_SAMPLES: usize = 72;

/// Render-only description of the preview.
pub struct DiamondPreview<'a> {
    pub shape: Shape,
    pub state: &'a VisualizerState,
}

impl<'a> Widget for DiamondPreview<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Preview too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let radius = self.state.background_scale_percent / 100.0;
        let clarity_radius = self.state.clarity_scale_percent / 100.0;

        let outline = shape_outline(self.shape, radius);
        let hatch = hatch_segments(&outline, overlay_count(self.state.color_opacity, MAX_HATCH_ROWS));
        let inclusions = inclusion_points(clarity_radius, overlay_count(self.state.clarity_opacity, MAX_INCLUSIONS));

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(-1.0_f64..1.0_f64, -1.0_f64..1.0_f64)?;

            let yellow = RGBColor(255, 215, 0);
            let inclusion_color = RGBColor(160, 160, 160);

            // Hatching first so the outline stays on top.
            for segment in &hatch {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &yellow))?;
            }

            chart.draw_series(LineSeries::new(outline.iter().copied(), &WHITE))?;

            // Pixels, not `Circle`: the ratatui backend maps circle radii to
            // canvas units and draws them far too large.
            chart.draw_series(
                inclusions
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), inclusion_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Number of overlay marks for an opacity in `[0, 1]`.
pub fn overlay_count(opacity: f64, max: usize) -> usize {
    if !opacity.is_finite() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * max as f64).round() as usize
}

/// Closed outline of `shape` centred on the origin, fitting inside `radius`.
pub fn shape_outline(shape: Shape, radius: f64) -> Vec<(f64, f64)> {
    let r = radius.max(0.0);
    match shape {
        Shape::Round => parametric(|t| (t.sin(), t.cos()), r),
        Shape::Oval => parametric(|t| (0.7 * t.sin(), t.cos()), r),
        Shape::Princess => cut_rectangle(0.8, 0.8, 0.0, r),
        Shape::Asscher => cut_rectangle(0.8, 0.8, 0.25, r),
        Shape::Radiant => cut_rectangle(0.7, 0.95, 0.15, r),
        Shape::Emerald => cut_rectangle(0.6, 1.0, 0.2, r),
        // Teardrop with the point at the top.
        Shape::Pear => parametric(|t| (0.8 * t.sin() * (t / 2.0).sin(), t.cos()), r),
        // Lens with pointed ends top and bottom.
        Shape::Marquise => parametric(|t| (0.55 * t.sin() * t.sin().abs(), t.cos()), r),
        Shape::Heart => parametric(
            |t| {
                let x = 16.0 * t.sin().powi(3);
                let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
                (x / 17.0, (y + 2.5) / 17.0)
            },
            r,
        ),
    }
}

fn parametric(f: impl Fn(f64) -> (f64, f64), r: f64) -> Vec<(f64, f64)> {
    (0..=OUTLINE_SAMPLES)
        .map(|i| {
            let t = TAU * i as f64 / OUTLINE_SAMPLES as f64;
            let (x, y) = f(t);
            (x * r, y * r)
        })
        .collect()
}

/// Rectangle of half-extent `w` x `h` with corners cut back by `cut`.
fn cut_rectangle(w: f64, h: f64, cut: f64, r: f64) -> Vec<(f64, f64)> {
    let c = cut.min(w).min(h);
    let mut pts = if c > 0.0 {
        vec![
            (-w + c, h),
            (w - c, h),
            (w, h - c),
            (w, -h + c),
            (w - c, -h),
            (-w + c, -h),
            (-w, -h + c),
            (-w, h - c),
        ]
    } else {
        vec![(-w, h), (w, h), (w, -h), (-w, -h)]
    };
    if let Some(first) = pts.first().copied() {
        pts.push(first);
    }
    pts.into_iter().map(|(x, y)| (x * r, y * r)).collect()
}

/// Horizontal segments filling `outline` on `rows` evenly spaced scanlines.
pub fn hatch_segments(outline: &[(f64, f64)], rows: usize) -> Vec<[(f64, f64); 2]> {
    if rows == 0 || outline.len() < 3 {
        return Vec::new();
    }
    let (y_min, y_max) = outline
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if !(y_max > y_min) {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for row in 0..rows {
        let y = y_min + (y_max - y_min) * (row as f64 + 0.5) / rows as f64;
        let mut xs: Vec<f64> = outline
            .windows(2)
            .filter_map(|edge| {
                let (x0, y0) = edge[0];
                let (x1, y1) = edge[1];
                let crosses = (y0 <= y && y < y1) || (y1 <= y && y < y0);
                crosses.then(|| x0 + (y - y0) * (x1 - x0) / (y1 - y0))
            })
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        for pair in xs.chunks_exact(2) {
            segments.push([(pair[0], y), (pair[1], y)]);
        }
    }
    segments
}

/// `count` points spread evenly over a disc of `radius` (sunflower layout).
pub fn inclusion_points(radius: f64, count: usize) -> Vec<(f64, f64)> {
    let golden = PI * (3.0 - 5.0_f64.sqrt());
    (0..count)
        .map(|i| {
            let rho = radius.max(0.0) * ((i as f64 + 0.5) / count as f64).sqrt();
            let theta = golden * i as f64;
            (rho * theta.cos(), rho * theta.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_are_closed_and_fit_the_radius() {
        for shape in Shape::ALL {
            let pts = shape_outline(shape, 0.5);
            assert!(pts.len() >= 5, "{shape:?}");
            let first = pts[0];
            let last = pts[pts.len() - 1];
            assert!((first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9, "{shape:?}");
            assert!(
                pts.iter().all(|&(x, y)| x.abs() <= 0.5 + 1e-9 && y.abs() <= 0.5 + 1e-9),
                "{shape:?}"
            );
        }
    }

    #[test]
    fn hatch_stays_inside_a_square() {
        let square = shape_outline(Shape::Princess, 1.0);
        let segs = hatch_segments(&square, 4);
        assert_eq!(segs.len(), 4);
        for [(x0, _), (x1, _)] in segs {
            assert!((x0 + 0.8).abs() < 1e-9);
            assert!((x1 - 0.8).abs() < 1e-9);
        }
        assert!(hatch_segments(&square, 0).is_empty());
    }

    #[test]
    fn overlay_density_follows_opacity() {
        assert_eq!(overlay_count(0.0, MAX_HATCH_ROWS), 0);
        assert_eq!(overlay_count(1.0, MAX_HATCH_ROWS), MAX_HATCH_ROWS);
        assert_eq!(overlay_count(0.5, 10), 5);
        assert_eq!(overlay_count(f64::NAN, 10), 0);
    }

    #[test]
    fn inclusions_stay_inside_the_clarity_disc() {
        let pts = inclusion_points(0.3, 20);
        assert_eq!(pts.len(), 20);
        assert!(pts.iter().all(|&(x, y)| (x * x + y * y).sqrt() <= 0.3 + 1e-9));
        assert!(inclusion_points(0.3, 0).is_empty());
    }
}
