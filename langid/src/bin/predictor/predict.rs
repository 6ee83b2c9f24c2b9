use anyhow::Context;
use kdam::term::Colorizer;
use tch::nn;

use grams::{load_grams, GramsRequest};
use langid::inference::run_inference;
use langid::utils::data::grams_to_tensor;
use langid::utils::Timings;
use model::{LabelEncoder, LANG_CLASSES};

use crate::config::PredictionConfig;

pub struct Evaluation {
    pub encoder: LabelEncoder,
    pub actual: Vec<i64>,
    pub predicted: Vec<i64>,
    pub timings: Timings,
}

pub fn predict(config: &PredictionConfig) -> anyhow::Result<Evaluation> {
    let grams = load_grams(&GramsRequest {
        kind: config.kind,
        file_list: config.file_list.clone(),
        grams_path: config.grams_path.clone(),
        languages: config.languages.clone(),
        window_size: config.window_size,
        freq_bands: config.freq_bands,
    })?;

    let (samples, bands, frames) = grams.features.dim();
    println!("Loaded {samples} {} of {bands} bands x {frames} frames", config.kind.name());

    let encoder = LabelEncoder::fit(&LANG_CLASSES)?;
    println!("Classes: {:?}", encoder.classes());

    let actual = encoder.transform_all(&grams.labels)?;

    let device = if config.cuda {
        tch::Device::cuda_if_available()
    } else {
        tch::Device::Cpu
    };

    let mut vs = nn::VarStore::new(device);
    let net = config
        .network
        .create_network(&vs.root(), encoder.len() as i64);

    let weights_file = config.weights_file();
    match vs.load(&weights_file) {
        Ok(()) => {
            print!("{}", "\tSuccess ".colorize("bold green"));
            println!("Weights are loaded from {}.", weights_file.display());
        }
        Err(error) => {
            print!("{}", "\tFailure ".colorize("red"));
            println!("Couldn't load weights from {}.", weights_file.display());
            return Err(error).context(format!(
                "Loading weights from {}",
                weights_file.display()
            ));
        }
    }

    let images = grams_to_tensor(grams.features)?;
    let images = config.network.shape_input(&images).to_device(device);
    println!("Input tensor: {:?}", images.size());

    let run = run_inference(&net, &images, config.batch_size, config.log_interval)?;

    let (_, predicted) = run.scores.max_dim(1, false);
    let predicted: Vec<i64> = (0..samples as i64)
        .map(|index| predicted.int64_value(&[index]))
        .collect();

    if config.save_model {
        let default_weights = config.network.default_weights_file(config.kind.name());
        if let Some(parent) = default_weights.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
        vs.save(&default_weights)
            .with_context(|| format!("Saving weights to {}", default_weights.display()))?;
        println!("Weights saved to {}.", default_weights.display());
    }

    Ok(Evaluation {
        encoder,
        actual,
        predicted,
        timings: run.timings,
    })
}
