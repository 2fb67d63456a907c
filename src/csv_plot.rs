//! Layout and drawing of a sweep chart.
//!
//! [`ChartLayout::build`] turns a dataset into pixel geometry (scales, ticks,
//! one polyline per sweep value, legend rows). The `draw_*` passes then put
//! that geometry on any plotters backend; [`render_svg`] runs them against an
//! in-memory SVG document.

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use tracing::debug;

use crate::config::ChartConfig;
use crate::data_loader::Dataset;
use crate::error::Result;
use crate::scale::LinearScale;
use crate::series::{distinct_values, group_series, ColorAssignment};

const FONT: &str = "sans-serif";
const TICK_FONT_SIZE: u32 = 10;
const CAPTION_FONT_SIZE: u32 = 16;

const TICK_SIZE: i32 = 6;
const TICK_PADDING: i32 = 3;

// caption offsets inside the translated frame
const X_CAPTION_SHIFT: i32 = 100;
const X_CAPTION_DROP: i32 = 50;
const Y_CAPTION_X: i32 = 30;

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub scale: LinearScale,
    pub ticks: Vec<AxisTick>,
    // x of a left axis, y of a bottom axis
    pub offset: i32,
}

impl Axis {
    fn new(scale: LinearScale, tick_count: usize, offset: i32) -> Self {
        let ticks = scale
            .ticks(tick_count)
            .into_iter()
            .zip(scale.tick_labels(tick_count))
            .map(|(value, label)| AxisTick {
                value,
                label,
                position: pixel(scale.map(value)),
            })
            .collect();

        Axis { scale, ticks, offset }
    }

    fn range_pixels(&self) -> (i32, i32) {
        let (r0, r1) = self.scale.range();
        (pixel(r0), pixel(r1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub sweep_value: f64,
    pub color: RGBColor,
    pub points: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
    pub marker: (i32, i32),
    pub label_at: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub param: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub x_caption_at: (i32, i32),
    pub y_caption_at: (i32, i32),
    pub series: Vec<SeriesPath>,
    pub legend: Vec<LegendEntry>,
}

fn pixel(v: f64) -> i32 {
    v.round() as i32
}

pub fn legend_label(param: &str, value: f64) -> String {
    format!("{}={}", param, value)
}

impl ChartLayout {
    pub fn build(dataset: &Dataset, config: &ChartConfig) -> Self {
        let m = &config.margin;
        let inner_width = config.inner_width();
        let inner_height = config.inner_height();

        let x = LinearScale::from_values(
            dataset.rows.iter().map(|r| r.step_index as f64),
            config.x_range(),
        )
        .nice(config.tick_count);
        let y = LinearScale::from_values(
            dataset.rows.iter().map(|r| r.gradient_norm),
            config.y_range(),
        )
        .nice(config.tick_count);

        let colors = ColorAssignment::new(distinct_values(dataset));
        let groups = group_series(dataset, &colors);

        let series = groups
            .iter()
            .map(|group| SeriesPath {
                sweep_value: group.sweep_value,
                color: group.color,
                points: group
                    .rows
                    .iter()
                    .map(|r| (pixel(x.map(r.step_index as f64)), pixel(y.map(r.gradient_norm))))
                    .collect(),
            })
            .collect();

        let legend_cfg = &config.legend;
        let legend = groups
            .iter()
            .map(|group| {
                let row_y = legend_cfg.top_offset + m.top + group.index as i32 * legend_cfg.row_spacing;
                LegendEntry {
                    label: legend_label(&dataset.param, group.sweep_value),
                    color: group.color,
                    marker: (inner_width - legend_cfg.marker_inset, row_y),
                    label_at: (inner_width - legend_cfg.label_inset, row_y + legend_cfg.marker_radius),
                }
            })
            .collect();

        ChartLayout {
            param: dataset.param.clone(),
            x_axis: Axis::new(x, config.tick_count, inner_height - m.bottom),
            y_axis: Axis::new(y, config.tick_count, m.left),
            x_caption_at: (
                m.left + inner_width / 2 - X_CAPTION_SHIFT,
                inner_height - m.bottom + X_CAPTION_DROP,
            ),
            y_caption_at: (Y_CAPTION_X, inner_height / 2 + m.top),
            series,
            legend,
        }
    }
}

/// Paint the background and return the frame everything else is drawn in,
/// shifted right and down by the left and top margins.
pub fn compose_canvas<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    config: &ChartConfig,
) -> std::result::Result<DrawingArea<DB, Shift>, DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    Ok(root.margin(config.margin.top, 0, config.margin.left, 0))
}

pub fn draw_axes<DB: DrawingBackend>(
    frame: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    config: &ChartConfig,
) -> DrawResult<DB> {
    let tick_style = (FONT, TICK_FONT_SIZE).into_font().color(&BLACK);

    // bottom axis, ticks hanging down
    let axis = &layout.x_axis;
    let y0 = axis.offset;
    let (r0, r1) = axis.range_pixels();
    frame.draw(&PathElement::new(
        vec![(r0, y0 + TICK_SIZE), (r0, y0), (r1, y0), (r1, y0 + TICK_SIZE)],
        BLACK.stroke_width(1),
    ))?;
    let label_style = tick_style.pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &axis.ticks {
        frame.draw(&PathElement::new(
            vec![(tick.position, y0), (tick.position, y0 + TICK_SIZE)],
            BLACK.stroke_width(1),
        ))?;
        frame.draw(&Text::new(
            tick.label.clone(),
            (tick.position, y0 + TICK_SIZE + TICK_PADDING),
            label_style.clone(),
        ))?;
    }

    // left axis, ticks pointing left
    let axis = &layout.y_axis;
    let x0 = axis.offset;
    let (r0, r1) = axis.range_pixels();
    frame.draw(&PathElement::new(
        vec![(x0 - TICK_SIZE, r0), (x0, r0), (x0, r1), (x0 - TICK_SIZE, r1)],
        BLACK.stroke_width(1),
    ))?;
    let label_style = tick_style.pos(Pos::new(HPos::Right, VPos::Center));
    for tick in &axis.ticks {
        frame.draw(&PathElement::new(
            vec![(x0 - TICK_SIZE, tick.position), (x0, tick.position)],
            BLACK.stroke_width(1),
        ))?;
        frame.draw(&Text::new(
            tick.label.clone(),
            (x0 - TICK_SIZE - TICK_PADDING, tick.position),
            label_style.clone(),
        ))?;
    }

    let caption = (FONT, CAPTION_FONT_SIZE).into_font();
    frame.draw(&Text::new(
        config.x_caption.clone(),
        layout.x_caption_at,
        caption.clone().color(&BLACK).pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;
    frame.draw(&Text::new(
        config.y_caption.clone(),
        layout.y_caption_at,
        caption
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;

    Ok(())
}

pub fn draw_series<DB: DrawingBackend>(
    frame: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    config: &ChartConfig,
) -> DrawResult<DB> {
    for (index, series) in layout.series.iter().enumerate() {
        debug!(
            param = %layout.param,
            value = series.sweep_value,
            index,
            points = series.points.len(),
            "drawing series"
        );
        frame.draw(&PathElement::new(
            series.points.clone(),
            series.color.stroke_width(config.stroke_width),
        ))?;
    }
    Ok(())
}

pub fn draw_legend<DB: DrawingBackend>(
    frame: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    config: &ChartConfig,
) -> DrawResult<DB> {
    let label_style = (FONT, CAPTION_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Bottom));

    for entry in &layout.legend {
        frame.draw(&Circle::new(
            entry.marker,
            config.legend.marker_radius,
            entry.color.filled(),
        ))?;
        frame.draw(&Text::new(entry.label.clone(), entry.label_at, label_style.clone()))?;
    }
    Ok(())
}

/// Draw the whole chart into a standalone SVG document.
pub fn render_svg(layout: &ChartLayout, config: &ChartConfig) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width as u32, config.height as u32))
            .into_drawing_area();
        let frame = compose_canvas(&root, config)?;
        draw_axes(&frame, layout, config)?;
        draw_series(&frame, layout, config)?;
        draw_legend(&frame, layout, config)?;
        root.present()?;
    }
    Ok(svg)
}
