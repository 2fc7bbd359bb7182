use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use iris_nn::data::load_csv;
use iris_nn::logging::init_logging;
use iris_nn::{accuracy, confusion_matrix, train, GradientRule, MinMaxScaler, Network, RunConfig};

#[derive(Parser)]
#[command(version, about = "Train and evaluate a one-hidden-layer classifier on a CSV dataset")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, split, train and report accuracy
    Train {
        /// JSON run config; defaults are used when omitted
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// CSV dataset, overrides the config's data path
        #[arg(short, long, value_name = "PATH")]
        data: Option<PathBuf>,
        #[arg(long, value_name = "INT")]
        hidden: Option<usize>,
        #[arg(short, long, value_name = "INT")]
        epochs: Option<usize>,
        #[arg(short, long, value_name = "FLOAT")]
        learning_rate: Option<f64>,
        /// Seeds both weight initialization and the train/test shuffle
        #[arg(short, long, value_name = "INT")]
        seed: Option<u64>,
        /// Use the exact softmax + cross-entropy output gradient
        #[arg(long)]
        softmax_gradient: bool,
        /// Write per-epoch statistics as JSON
        #[arg(long, value_name = "PATH")]
        history: Option<PathBuf>,
    },
    /// Write the default run config as JSON
    InitConfig {
        #[arg(short, long, value_name = "PATH", default_value = "iris-nn.json")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Train {
            config,
            data,
            hidden,
            epochs,
            learning_rate,
            seed,
            softmax_gradient,
            history,
        } => {
            let mut run = match config {
                Some(path) => RunConfig::load_json(path)?,
                None => RunConfig::default(),
            };
            if let Some(path) = data {
                run.data.path = path;
            }
            if let Some(hidden) = hidden {
                run.network.hidden_neurons = hidden;
            }
            if let Some(epochs) = epochs {
                run.network.epochs = epochs;
            }
            if let Some(lr) = learning_rate {
                run.network.learning_rate = lr;
            }
            if let Some(seed) = seed {
                run.network.seed = Some(seed);
                run.data.shuffle_seed = Some(seed);
            }
            if softmax_gradient {
                run.network.gradient = GradientRule::SoftmaxCrossEntropy;
            }
            run_training(&run, history)
        }
        Command::InitConfig { out } => {
            RunConfig::default().save_json(&out)?;
            println!("Wrote default config to {}", out.display());
            Ok(())
        }
    }
}

fn run_training(run: &RunConfig, history: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    run.validate()?;

    let dataset = load_csv(&run.data.path, &run.data.label_mode())?;
    info!(
        rows = dataset.len(),
        features = dataset.n_features(),
        class_counts = ?dataset.class_counts(),
        "loaded dataset"
    );

    let mut rng = match run.data.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (train_set, test_set) = dataset.split(run.data.train_fraction, &mut rng)?;
    let (train_set, test_set) = if run.data.normalize {
        let scaler = MinMaxScaler::fit(&train_set)?;
        (scaler.transform(&train_set)?, scaler.transform(&test_set)?)
    } else {
        (train_set, test_set)
    };

    let mut network = Network::new(run.network.clone())?;
    let report = train(&mut network, &train_set.features(), &train_set.labels())?;

    if let Some(path) = history {
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report)?;
        info!(path = %path.display(), "wrote training history");
    }

    println!("Samples:        {} train / {} test", train_set.len(), test_set.len());
    println!("Loss:           {:.6} -> {:.6}", report.initial_loss(), report.final_loss);
    println!("Train accuracy: {:.2}%", report.final_accuracy * 100.0);

    if test_set.is_empty() {
        println!("Test accuracy:  n/a (no held-out rows)");
        return Ok(());
    }

    let test_labels = test_set.labels();
    let predictions = network.predict(&test_set.features())?;
    println!("Test accuracy:  {:.2}%", accuracy(&predictions, &test_labels)? * 100.0);

    println!("Confusion matrix (rows = true, cols = predicted):");
    let counts = confusion_matrix(&predictions, &test_labels)?;
    for (name, row) in run.data.class_names.iter().zip(&counts) {
        let cells: Vec<String> = row.iter().map(|c| format!("{c:>4}")).collect();
        println!("  {name:<20}{}", cells.join(""));
    }

    Ok(())
}
