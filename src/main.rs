use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use isoforest_core::{ForestConfig, Sample};
use isoforest_io::{
    ColumnSpec, ExperimentName, RecordReader, ScoreRow, ScoreWriter, SourceSummary, collect_files,
};

#[derive(Parser)]
#[command(name = "isoforest")]
#[command(about = "Isolation-forest anomaly scoring over delimited record files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Train one forest per input file and score every record in it
    Score {
        /// Input record file, or a directory walked recursively
        #[arg(long)]
        input: PathBuf,

        /// Feature columns as name=index pairs, e.g. "totalCount=2,price=3"
        #[arg(long)]
        columns: String,

        /// Field delimiter: a single character, or "tab"
        #[arg(long, default_value = "tab")]
        delimiter: String,

        /// Only read files with this extension when walking a directory
        #[arg(long)]
        extension: Option<String>,

        /// Number of trees per forest
        #[arg(long, default_value_t = 100)]
        n_trees: u32,

        /// Maximum comparisons per root-to-leaf path (0 = unlimited)
        #[arg(long, default_value_t = 256)]
        max_depth: u32,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Build trees in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Also save each trained forest as `{experiment}_{file_stem}.model`
        #[arg(long, default_value_t = false)]
        save_models: bool,
    },

    /// Score synthetic normal samples and outliers against a synthetic forest
    Demo {
        /// Number of trees
        #[arg(long, default_value_t = 10)]
        n_trees: u32,

        /// Maximum comparisons per root-to-leaf path (0 = unlimited)
        #[arg(long, default_value_t = 10)]
        max_depth: u32,

        /// Training samples drawn from [0, 25)^2
        #[arg(long, default_value_t = 100)]
        n_training: usize,

        /// Test samples of each kind
        #[arg(long, default_value_t = 10)]
        n_test: usize,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ScoreOutput {
    experiment: String,
    n_files: usize,
    n_samples: usize,
    scores_path: PathBuf,
    summary_path: PathBuf,
    sources: Vec<SourceSummary>,
}

#[derive(Serialize)]
struct DemoOutput {
    n_trees: usize,
    max_depth: u32,
    normal: Vec<DemoSample>,
    outliers: Vec<DemoSample>,
    avg_normal_score: f64,
    avg_outlier_score: f64,
}

#[derive(Serialize)]
struct DemoSample {
    x: u64,
    y: u64,
    score: f64,
}

/// Parse `--delimiter`: "tab", "\t", or any single ASCII character.
fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => bail!("invalid delimiter \"{s}\": expected a single ASCII character or \"tab\""),
    }
}

fn point(name: String, x: u64, y: u64) -> Sample {
    Sample::new(name).with_feature("x", x).with_feature("y", y)
}

fn mean_score(points: &[DemoSample]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.score).sum::<f64>() / points.len() as f64
}

fn model_path(output_dir: &Path, experiment: &str, file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map_or_else(|| "input".to_string(), |s| s.to_string_lossy().into_owned());
    output_dir.join(format!("{experiment}_{stem}.model"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Score {
            input,
            columns,
            delimiter,
            extension,
            n_trees,
            max_depth,
            experiment,
            output_dir,
            parallel,
            save_models,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let columns = ColumnSpec::parse(&columns).context("invalid --columns")?;
            let delimiter = parse_delimiter(&delimiter)?;
            let config = ForestConfig::new(n_trees)?
                .with_max_depth(max_depth)
                .with_seed(cli.seed)
                .with_parallel(parallel);

            // Discover inputs
            let files = collect_files(&input, extension.as_deref())
                .with_context(|| format!("failed to list inputs under {}", input.display()))?;
            if files.is_empty() {
                bail!("no input files found under {}", input.display());
            }
            info!(n_files = files.len(), "inputs collected");

            let writer = ScoreWriter::new(&output_dir, experiment_name)?;

            // One forest per file, trained on that file's own records
            let mut rows = Vec::new();
            let mut sources = Vec::with_capacity(files.len());
            for file in &files {
                let samples = RecordReader::new(file, columns.clone())
                    .with_delimiter(delimiter)
                    .read()
                    .with_context(|| format!("failed to read {}", file.display()))?;

                let forest = config.fit(&samples);
                if forest.n_trees() == 0 {
                    warn!(
                        file = %file.display(),
                        n_features = forest.catalog().n_features(),
                        "no trees built, every record scores 0"
                    );
                }

                let scores = forest.score_batch(&samples);
                let source = file.display().to_string();
                rows.extend(samples.iter().zip(&scores).map(|(sample, &score)| ScoreRow {
                    source: source.clone(),
                    sample: sample.name().to_string(),
                    score,
                }));

                if save_models {
                    let model_path = model_path(&output_dir, &experiment, file);
                    forest
                        .save(&model_path)
                        .with_context(|| format!("failed to save {}", model_path.display()))?;
                }

                let summary = SourceSummary::from_scores(source, forest.n_trees(), &scores);
                info!(
                    file = %file.display(),
                    n_samples = summary.n_samples,
                    mean_score = summary.mean_score,
                    min_score = summary.min_score,
                    "file scored"
                );
                sources.push(summary);
            }

            // Write artifacts
            writer.write_scores(&rows)?;
            writer.write_summary(n_trees, &sources)?;

            // Build and print stdout summary
            let output = ScoreOutput {
                experiment,
                n_files: files.len(),
                n_samples: rows.len(),
                scores_path: writer.scores_path(),
                summary_path: writer.summary_path(),
                sources,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Demo {
            n_trees,
            max_depth,
            n_training,
            n_test,
        } => {
            let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

            let training: Vec<Sample> = (0..n_training)
                .map(|i| point(format!("training:{i}"), rng.gen_range(0..25), rng.gen_range(0..25)))
                .collect();

            let forest = ForestConfig::new(n_trees)?
                .with_max_depth(max_depth)
                .with_seed(cli.seed)
                .fit(&training);

            let mut score_points = |label: &str, offset: u64| -> Vec<DemoSample> {
                (0..n_test)
                    .map(|i| {
                        let x = offset + rng.gen_range(0..25);
                        let y = offset + rng.gen_range(0..25);
                        let score = forest.score(&point(format!("{label}:{i}"), x, y));
                        DemoSample { x, y, score }
                    })
                    .collect()
            };
            let normal = score_points("normal", 0);
            let outliers = score_points("outlier", 20);

            let output = DemoOutput {
                n_trees: forest.n_trees(),
                max_depth,
                avg_normal_score: mean_score(&normal),
                avg_outlier_score: mean_score(&outliers),
                normal,
                outliers,
            };
            info!(
                avg_normal_score = output.avg_normal_score,
                avg_outlier_score = output.avg_outlier_score,
                "demo scored"
            );
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
