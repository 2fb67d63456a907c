use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde_json::from_reader;

use crate::error::{ChartError, Result};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Margin {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin { top: 70, right: 30, bottom: 40, left: 80 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct LegendConfig {
    #[serde(default = "default_marker_radius")]
    pub marker_radius: i32,

    #[serde(default = "default_row_spacing")]
    pub row_spacing: i32,

    // distance of the marker / label anchors from the right edge of the frame
    #[serde(default = "default_marker_inset")]
    pub marker_inset: i32,
    #[serde(default = "default_label_inset")]
    pub label_inset: i32,

    #[serde(default = "default_top_offset")]
    pub top_offset: i32,
}

impl Default for LegendConfig {
    fn default() -> Self {
        LegendConfig {
            marker_radius: default_marker_radius(),
            row_spacing: default_row_spacing(),
            marker_inset: default_marker_inset(),
            label_inset: default_label_inset(),
            top_offset: default_top_offset(),
        }
    }
}

/// Geometry and captions of a sweep chart.
///
/// Every field has a default, so an empty JSON object (or no file at all)
/// gives the 1200x800 layout the charts have always used.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,

    #[serde(default)]
    pub margin: Margin,

    #[serde(default)]
    pub legend: LegendConfig,

    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,

    // approximate number of ticks per axis, also drives the nice domain
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,

    #[serde(default = "default_x_caption")]
    pub x_caption: String,
    #[serde(default = "default_y_caption")]
    pub y_caption: String,

    #[serde(default = "default_container_id")]
    pub container_id: String,
}

fn default_width() -> i32 {
    1200
}

fn default_height() -> i32 {
    800
}

fn default_marker_radius() -> i32 {
    7
}

fn default_row_spacing() -> i32 {
    25
}

fn default_marker_inset() -> i32 {
    200
}

fn default_label_inset() -> i32 {
    180
}

fn default_top_offset() -> i32 {
    50
}

fn default_stroke_width() -> u32 {
    1
}

fn default_tick_count() -> usize {
    10
}

fn default_x_caption() -> String {
    "number of iteration steps".to_string()
}

fn default_y_caption() -> String {
    "gradient norm".to_string()
}

fn default_container_id() -> String {
    "chart-container".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            legend: LegendConfig::default(),
            stroke_width: default_stroke_width(),
            tick_count: default_tick_count(),
            x_caption: default_x_caption(),
            y_caption: default_y_caption(),
            container_id: default_container_id(),
        }
    }
}

impl ChartConfig {
    // get config from the json file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ChartError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let config: ChartConfig =
            from_reader(reader).map_err(|e| ChartError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ChartError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        let m = &self.margin;
        if m.top < 0 || m.right < 0 || m.bottom < 0 || m.left < 0 {
            return Err(ChartError::Config("margins must not be negative".to_string()));
        }
        // scale ranges subtract the margins twice, once for the frame and once for the range
        if self.x_range().0 >= self.x_range().1 || self.y_range().1 >= self.y_range().0 {
            return Err(ChartError::Config(format!(
                "margins {:?} leave no plotting area in a {}x{} canvas",
                m, self.width, self.height
            )));
        }
        if self.tick_count == 0 {
            return Err(ChartError::Config("tick_count must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Width of the frame the chart is drawn in, canvas minus the side margins.
    pub fn inner_width(&self) -> i32 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> i32 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Horizontal pixel range, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        (
            self.margin.left as f64,
            (self.inner_width() - self.margin.right) as f64,
        )
    }

    /// Vertical pixel range, bottom to top, so larger values sit higher.
    pub fn y_range(&self) -> (f64, f64) {
        (
            (self.inner_height() - self.margin.bottom) as f64,
            self.margin.top as f64,
        )
    }
}
