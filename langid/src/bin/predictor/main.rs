mod config;
mod predict;

use std::path::PathBuf;

use clap::Parser;

use grams::GramKind;
use langid::networks::Network;
use langid::report::ConfusionMatrix;

use crate::config::PredictionConfig;
use crate::predict::predict;

#[derive(Parser)]
#[clap(about = "Evaluates a pretrained spoken-language classifier on precomputed grams.")]
pub struct Args {
    /// Network architecture.
    #[clap(arg_enum, short, long, default_value = "cnn")]
    network: Network,

    /// Batch size.
    #[clap(short, long, default_value_t = 8)]
    batch_size: i64,

    /// Number of frequency bands in the grams.
    #[clap(long, default_value_t = 224)]
    freq_bands: usize,

    /// STFT window size the grams were computed with.
    #[clap(long, default_value_t = 2048)]
    window_size: usize,

    /// Languages to filter by.
    #[clap(short, long, multiple_values = true)]
    languages: Vec<String>,

    /// Random seed.
    #[clap(long, default_value_t = 1111)]
    seed: i64,

    /// Use CUDA when available.
    #[clap(long, default_value_t = false, action)]
    cuda: bool,

    /// Report per-language accuracy.
    #[clap(long, default_value_t = false, action)]
    validate: bool,

    /// Use chromagrams instead of spectrograms.
    #[clap(long, default_value_t = false, action)]
    use_chromagrams: bool,

    /// Print progress every N batches, 0 to disable.
    #[clap(long, default_value_t = 4)]
    log_interval: usize,

    /// CSV file with audio files and labels.
    #[clap(long, value_parser, default_value_t = String::from("data/trainingset.csv"))]
    file_list: String,

    /// Precomputed grams file. Default is derived from the file list location.
    #[clap(long, value_parser)]
    grams_path: Option<String>,

    /// Weight file. Default "output/states/[NETWORK]_model_[GRAMS].pt".
    #[clap(short, long, value_parser)]
    model_path: Option<String>,

    /// Save the restored weights to the default weight path.
    #[clap(long, default_value_t = false, action)]
    save_model: bool,
}

impl From<&Args> for PredictionConfig {
    fn from(args: &Args) -> Self {
        Self {
            network: args.network,
            kind: if args.use_chromagrams {
                GramKind::Chromagrams
            } else {
                GramKind::Spectrograms
            },
            batch_size: args.batch_size,
            freq_bands: args.freq_bands,
            window_size: args.window_size,
            languages: if args.languages.is_empty() {
                None
            } else {
                Some(args.languages.clone())
            },
            cuda: args.cuda,
            log_interval: args.log_interval,
            file_list: PathBuf::from(&args.file_list),
            grams_path: args.grams_path.as_ref().map(PathBuf::from),
            model_path: args.model_path.as_ref().map(PathBuf::from),
            save_model: args.save_model,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tch::set_num_threads(num_cpus::get() as i32);

    let args = Args::parse();
    tch::manual_seed(args.seed);

    let evaluation = predict(&PredictionConfig::from(&args))?;

    println!("Predictions: {:?}", evaluation.predicted);

    let matrix =
        ConfusionMatrix::from_indices(&evaluation.encoder, &evaluation.actual, &evaluation.predicted)?;
    println!("{matrix}");

    println!(
        "Predicted {} out of {}. Accuracy: {:.02}%",
        matrix.correct(),
        matrix.total(),
        matrix.accuracy().unwrap_or_default() * 100.0
    );

    if args.validate {
        for (language, accuracy) in matrix.per_class_accuracy() {
            match accuracy {
                Some(accuracy) => println!("{language}: {:.02}%", accuracy * 100.0),
                None => println!("{language}: no samples"),
            }
        }
    }

    let timings = &evaluation.timings;
    println!(
        "Elapsed: {:.02}s. Batch time: min/max/avg={:0.2}s/{:.02}s/{:.02}s",
        timings.sum(),
        timings.min().unwrap_or_default(),
        timings.max().unwrap_or_default(),
        timings.avg().unwrap_or_default()
    );

    Ok(())
}
