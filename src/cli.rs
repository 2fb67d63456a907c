use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render gradient-norm charts for line-search parameter sweeps")]
pub struct Args {
    /// Directory holding <param>_experiment_data.csv files
    #[arg(long, default_value = "generated")]
    pub data_dir: PathBuf,

    /// Directory the .svg and .html files are written to
    #[arg(long, default_value = "generated")]
    pub out_dir: PathBuf,

    /// Sweep parameter to chart, repeatable
    #[arg(long = "sweep", value_name = "PARAM", default_values_t = [String::from("c1"), String::from("c2")])]
    pub sweeps: Vec<String>,

    /// Path to chart config JSON (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// HTML page to embed each chart in, must contain the chart container element
    #[arg(long)]
    pub host_page: Option<PathBuf>,
}
