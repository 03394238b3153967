use std::path::PathBuf;

use swingpoint::io::{read_ohlc_csv, write_csv, write_parquet};
use swingpoint::{
    ConfigLoader, ExtremumKind, SwingConfig, SwingDetector, TrDelta, add_tr_delta_column, init_logging,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: cargo run -q -p research -- <csv_path> [output_path] [config.yaml|config.json] [symbol]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let output_path = match args.get(2) {
        Some(path) => PathBuf::from(path),
        None => csv_path.with_extension("swings.parquet"),
    };
    let symbol = args.get(4).map(String::as_str).unwrap_or_default();
    let config = match args.get(3) {
        Some(path) => ConfigLoader::load(path)?.resolve_for(symbol),
        None => SwingConfig::default(),
    };
    config.validate()?;

    let bars = read_ohlc_csv(&csv_path, &config)?;
    info!(path = %csv_path.display(), rows = bars.height(), "bars loaded");

    let run = SwingDetector::new(config.clone()).run(&bars)?;
    let mut frame = add_tr_delta_column(&run.frame, &TrDelta::default(), config.ohlc_columns())?;

    let minima = run
        .outcome
        .confirmed
        .iter()
        .filter(|p| p.kind == ExtremumKind::Minimum)
        .count();
    info!(
        confirmed = run.outcome.confirmed.len(),
        minima,
        maxima = run.outcome.confirmed.len() - minima,
        seek = run.outcome.seek.as_str(),
        "swing extrema detected"
    );

    let is_csv = output_path
        .extension()
        .and_then(|x| x.to_str())
        .is_some_and(|x| x.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(&mut frame, &output_path)?;
    } else {
        write_parquet(&mut frame, &output_path)?;
    }
    info!(path = %output_path.display(), columns = frame.width(), "swing frame written");

    println!("{}", serde_json::to_string(&run.outcome.cursor)?);
    Ok(())
}
