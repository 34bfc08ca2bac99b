use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use epi_pipeline::{PipelineConfig, ScorerConfig, write_scored_csv};
use log::{info, warn};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: epi-pipeline <input.csv> [output.csv]");
        std::process::exit(2);
    };
    let output = args.next();

    // Fixed seed so repeated runs over the same file export identical tables
    let config = PipelineConfig {
        scoring: Some(ScorerConfig {
            random_seed: Some(42),
            ..ScorerConfig::default()
        }),
        ..PipelineConfig::default()
    };

    info!("running pipeline on {input}");
    let start = Instant::now();
    let result = epi_pipeline::run_from_path(Path::new(&input), &config)
        .with_context(|| format!("pipeline failed for {input}"))?;
    info!(
        "processed {} wide records ({} long) in {:?}",
        result.wide.len(),
        result.long.len(),
        start.elapsed()
    );

    if result.quality.is_clean() {
        info!("no data lost or degraded during load");
    } else {
        warn!("{}", result.quality.summary());
    }

    let scored = result
        .scored
        .as_ref()
        .map(|tables| tables.joint.as_slice())
        .unwrap_or_default();

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create {path}"))?;
            write_scored_csv(file, scored)?;
            info!("wrote {} scored records to {path}", scored.len());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_scored_csv(&mut handle, scored)?;
            handle.flush()?;
        }
    }

    Ok(())
}
