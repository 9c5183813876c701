//! Static Chart Renderer
//! Draws the grade charts to PNG files with the plotters bitmap backend.
//!
//! Layout:
//! 1. Histogram: title, one bar per grade bin over the grade axis
//! 2. Box plot: one box per course with whiskers at the furthest grades inside
//!    1.5 IQR and outliers as circles, course identifiers on the x-axis

use crate::charts::plotter::{BoxStats, CourseGroup, GradeHistogram, PlotError};
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

// Colors
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const BOX_BLUE: RGBColor = RGBColor(52, 152, 219);
const MEDIAN_ORANGE: RGBColor = RGBColor(243, 156, 18);

const FONT: &str = "sans-serif";

/// Box width in course slots.
const BOX_WIDTH: f32 = 0.5;

const HISTOGRAM_SIZE: (u32, u32) = (1000, 600);
const BOXPLOT_SIZE: (u32, u32) = (1200, 700);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw a grade histogram to `path`.
    pub fn draw_histogram(path: &Path, histogram: &GradeHistogram) -> Result<(), PlotError> {
        let root = BitMapBackend::new(path, HISTOGRAM_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let edges = &histogram.edges;
        let (x_min, x_max) = match (edges.first(), edges.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => (0.0, 1.0),
        };
        let y_max = histogram.counts.iter().copied().max().unwrap_or(0) as u32 + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption("Final Grade Distribution Across All Courses", (FONT, 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, 0u32..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(histogram.counts.len() + 1)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .x_desc("Final Grade (%)")
            .y_desc("Number of Students")
            .axis_desc_style((FONT, 16))
            .draw()
            .map_err(drawing_error)?;

        let bars: Vec<[(f64, u32); 2]> = histogram
            .counts
            .iter()
            .zip(edges.windows(2))
            .map(|(count, bin)| [(bin[0], 0), (bin[1], *count as u32)])
            .collect();

        chart
            .draw_series(bars.iter().map(|bar| Rectangle::new(*bar, SKY_BLUE.filled())))
            .map_err(drawing_error)?;
        chart
            .draw_series(bars.iter().map(|bar| Rectangle::new(*bar, BLACK.stroke_width(1))))
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Draw one box per course to `path`.
    pub fn draw_course_boxplot(path: &Path, groups: &[CourseGroup]) -> Result<(), PlotError> {
        let root = BitMapBackend::new(path, BOXPLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let boxes: Vec<(f32, BoxStats)> = groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.box_stats().map(|stats| (i as f32, stats)))
            .collect();

        let (y_min, y_max) = Self::get_y_range(boxes.iter().map(|(_, stats)| stats));
        let x_range = Self::course_axis(groups.len());

        let mut chart = ChartBuilder::on(&root)
            .caption("Final Grade Spread by Course ID (Box Plot)", (FONT, 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(drawing_error)?;

        let course_label = |x: &f32| Self::course_label(groups, *x);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(groups.len().max(1))
            .x_label_formatter(&course_label)
            .x_desc("Course ID")
            .y_desc("Final Grade (%)")
            .axis_desc_style((FONT, 16))
            .draw()
            .map_err(drawing_error)?;

        let half = BOX_WIDTH / 2.0;
        let cap = BOX_WIDTH / 4.0;
        let at = |x: f32, y: f64| (x, y as f32);

        chart
            .draw_series(boxes.iter().map(|(x, s)| {
                Rectangle::new([at(x - half, s.q3), at(x + half, s.q1)], BOX_BLUE.mix(0.3).filled())
            }))
            .map_err(drawing_error)?;
        chart
            .draw_series(boxes.iter().map(|(x, s)| {
                Rectangle::new([at(x - half, s.q3), at(x + half, s.q1)], BOX_BLUE.stroke_width(2))
            }))
            .map_err(drawing_error)?;
        chart
            .draw_series(boxes.iter().map(|(x, s)| {
                PathElement::new(
                    vec![at(x - half, s.median), at(x + half, s.median)],
                    MEDIAN_ORANGE.stroke_width(2),
                )
            }))
            .map_err(drawing_error)?;

        // whisker stems and caps
        let whiskers = boxes.iter().flat_map(|(x, s)| {
            [
                vec![at(*x, s.q1), at(*x, s.lower_whisker)],
                vec![at(*x, s.q3), at(*x, s.upper_whisker)],
                vec![at(x - cap, s.lower_whisker), at(x + cap, s.lower_whisker)],
                vec![at(x - cap, s.upper_whisker), at(x + cap, s.upper_whisker)],
            ]
        });
        chart
            .draw_series(whiskers.map(|points| PathElement::new(points, BLACK.stroke_width(1))))
            .map_err(drawing_error)?;

        chart
            .draw_series(boxes.iter().flat_map(|(x, s)| {
                s.outliers
                    .iter()
                    .map(move |v| Circle::new(at(*x, *v), 3, BLACK.stroke_width(1)))
            }))
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// One unit slot per course, centred on the course index.
    fn course_axis(courses: usize) -> Range<f32> {
        -0.5..courses.max(1) as f32 - 0.5
    }

    fn course_label(groups: &[CourseGroup], x: f32) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-3 || idx < 0.0 {
            return String::new();
        }
        groups
            .get(idx as usize)
            .map(|g| g.course.clone())
            .unwrap_or_default()
    }

    fn get_y_range<'s>(boxes: impl IntoIterator<Item = &'s BoxStats>) -> (f32, f32) {
        let (min, max) = boxes
            .into_iter()
            .map(BoxStats::extent)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            });
        if min.is_infinite() {
            return (0.0, 100.0);
        }
        let pad = ((max - min) * 0.1).max(1.0);
        ((min - pad).floor() as f32, (max + pad).ceil() as f32)
    }
}

fn drawing_error<E: Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}
