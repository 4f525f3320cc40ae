use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use curvepress::{
    compress_with_curve, consensus, CompressionMethod, CompressionParams, ControlPointEstimator,
    DataType, Sample,
};

#[derive(Parser)]
#[command(name = "curvepress", about = "Dense scalar signals to compact piecewise curves")]
struct Cli {
    /// Input CSV with one `time,value` pair per line
    #[arg(short, long)]
    input: PathBuf,

    /// JSON parameter preset; individual flags override its fields
    #[arg(long)]
    params: Option<PathBuf>,

    /// rdp-linear, rdp-bspline, rdp-bezier, bspline-direct or bezier-direct
    #[arg(short, long)]
    method: Option<CompressionMethod>,

    /// Error budget, in (0, 1]
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// animation, sensor, financial or custom (selects importance weights)
    #[arg(short, long)]
    data_type: Option<DataType>,

    /// Importance above this scales RDP deviation up (positive)
    #[arg(long)]
    importance_threshold: Option<f64>,

    /// Control-point count for the direct methods (estimated if omitted)
    #[arg(short, long)]
    points: Option<usize>,

    /// Also run every control-point heuristic and print the verdicts
    #[arg(long)]
    estimate: bool,

    /// Lower bound of the estimator search range
    #[arg(long, default_value = "2")]
    min_points: usize,

    /// Upper bound of the estimator search range
    #[arg(long, default_value = "50")]
    max_points: usize,

    /// Write the compressed curve, resampled, to this CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sample count for --output
    #[arg(long, default_value = "100")]
    resample: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let samples = load_samples(&cli.input)?;
    let params = build_params(&cli)?;

    eprintln!();
    eprintln!("  curvepress \u{00b7} {}", cli.input.display());
    eprintln!();
    eprintln!(
        "  Load        {} samples  (method {}, tolerance {}, {})",
        samples.len(),
        params.method(),
        params.tolerance(),
        params.data_type(),
    );

    let (curve, result) = compress_with_curve(&samples, &params)?;
    eprintln!("  Curve       {} segments", curve.segment_count());
    eprint!("{}", result);

    if cli.estimate {
        let estimator = ControlPointEstimator::new(cli.min_points, cli.max_points);
        let results = estimator.estimate_all(&samples, params.tolerance());
        eprintln!();
        for (name, r) in &results {
            eprintln!(
                "  {:<16} {:>4} points  (score {:.4})",
                name, r.recommended_points, r.score
            );
        }
        if let Some(n) = consensus(&results) {
            eprintln!("  {:<16} {:>4} points", "consensus", n);
        }
    }

    if let Some(path) = &cli.output {
        let resampled = curve.to_samples(cli.resample);
        write_samples(path, &resampled)?;
        eprintln!();
        eprintln!("  \u{2713} {}  ({} samples)", path.display(), resampled.len());
    }

    eprintln!();
    Ok(())
}

fn build_params(cli: &Cli) -> Result<CompressionParams, Box<dyn std::error::Error>> {
    let mut params = match &cli.params {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => CompressionParams::default(),
    };
    if let Some(method) = cli.method {
        params.set_method(method);
    }
    if let Some(tolerance) = cli.tolerance {
        params.set_tolerance(tolerance)?;
    }
    if let Some(data_type) = cli.data_type {
        params.set_data_type(data_type);
    }
    if let Some(threshold) = cli.importance_threshold {
        params.set_importance_threshold(threshold)?;
    }
    if cli.points.is_some() {
        params.set_point_count(cli.points);
    }
    Ok(params)
}

/// Parse `time,value` lines. Blank lines, `#` comments and lines that do
/// not parse (such as a header) are skipped. Output is sorted by time.
fn load_samples(path: &Path) -> Result<Vec<Sample>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let mut samples: Vec<Sample> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split([',', ';', '\t']).map(str::trim);
            let time = fields.next()?.parse::<f64>().ok()?;
            let value = fields.next()?.parse::<f64>().ok()?;
            Some(Sample::new(time, value))
        })
        .collect();
    samples.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(samples)
}

fn write_samples(path: &Path, samples: &[Sample]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(fs::File::create(path)?);
    writeln!(file, "time,value")?;
    for s in samples {
        writeln!(file, "{},{}", s.time, s.value)?;
    }
    file.flush()
}
