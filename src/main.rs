use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sweep_charts::cli::Args;
use sweep_charts::{run_sweep, ChartConfig, SweepSpec};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &args.config {
        Some(path) => ChartConfig::from_json(path)
            .with_context(|| format!("loading chart config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    let host_page = match &args.host_page {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading host page {}", path.display()))?,
        ),
        None => None,
    };

    let config = Arc::new(config);
    let host_page = Arc::new(host_page);
    let out_dir = Arc::new(args.out_dir.clone());

    // each sweep is independent, one failing leaves the others alone
    let mut handles = Vec::new();
    for param in &args.sweeps {
        let spec = SweepSpec::in_dir(param, &args.data_dir);
        let config = Arc::clone(&config);
        let host_page = Arc::clone(&host_page);
        let out_dir = Arc::clone(&out_dir);
        handles.push((
            param.clone(),
            tokio::spawn(async move {
                run_sweep(&spec, &config, host_page.as_deref(), &out_dir).await
            }),
        ));
    }

    let total = handles.len();
    let mut failures = 0;
    for (param, handle) in handles {
        match handle.await {
            Ok(Ok(output)) => info!(param = %param, series = output.series, "done"),
            Ok(Err(e)) => {
                failures += 1;
                error!(param = %param, error = %e, "chart failed");
            }
            Err(e) => {
                failures += 1;
                error!(param = %param, error = %e, "chart task panicked");
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} charts failed", failures, total);
    }
    Ok(())
}
