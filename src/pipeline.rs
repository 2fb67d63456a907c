use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ChartConfig;
use crate::csv_plot::{render_svg, ChartLayout};
use crate::data_loader::load_dataset;
use crate::error::{ChartError, Result};
use crate::page::{attach_to_container, default_host_page};

static DATA_FILE: &str = "{1}_experiment_data.csv";

/// One chart to produce: which column is swept and where its CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSpec {
    pub param: String,
    pub csv_path: PathBuf,
}

impl SweepSpec {
    pub fn new<P: Into<PathBuf>>(param: &str, csv_path: P) -> Self {
        SweepSpec { param: param.to_string(), csv_path: csv_path.into() }
    }

    /// `<data_dir>/<param>_experiment_data.csv`
    pub fn in_dir<P: AsRef<Path>>(param: &str, data_dir: P) -> Self {
        let file = DATA_FILE.replace("{1}", param);
        SweepSpec::new(param, data_dir.as_ref().join(file))
    }
}

/// Files written for one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOutput {
    pub svg_path: PathBuf,
    pub html_path: PathBuf,
    pub series: usize,
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ChartError::Write { path: path.to_path_buf(), source })
}

/// Load, lay out and draw one sweep, then write `<param>.svg` and the host
/// page `<param>.html` into `out_dir`. `host_page` replaces the built-in page.
pub async fn run_sweep(
    spec: &SweepSpec,
    config: &ChartConfig,
    host_page: Option<&str>,
    out_dir: &Path,
) -> Result<ChartOutput> {
    let dataset = load_dataset(&spec.csv_path, &spec.param).await?;
    if dataset.is_empty() {
        warn!(param = %spec.param, path = %spec.csv_path.display(), "no rows, drawing empty chart");
    }

    let layout = ChartLayout::build(&dataset, config);
    let svg = render_svg(&layout, config)?;

    let page = match host_page {
        Some(page) => page.to_string(),
        None => default_host_page(&format!("{} sweep", spec.param), &config.container_id),
    };
    let html = attach_to_container(&page, &config.container_id, &svg)?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| ChartError::Write { path: out_dir.to_path_buf(), source })?;
    let svg_path = out_dir.join(format!("{}.svg", spec.param));
    let html_path = out_dir.join(format!("{}.html", spec.param));
    write_file(&svg_path, &svg).await?;
    write_file(&html_path, &html).await?;

    info!(
        param = %spec.param,
        series = layout.series.len(),
        svg = %svg_path.display(),
        html = %html_path.display(),
        "chart written"
    );

    Ok(ChartOutput { svg_path, html_path, series: layout.series.len() })
}
