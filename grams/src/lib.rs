pub mod config;

mod filelist;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ndarray::{s, Array3, Axis};
use ndarray_npy::ReadNpyExt;

pub use crate::filelist::{parse_file_list, read_file_list, FileEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GramKind {
    Spectrograms,
    Chromagrams,
}

impl GramKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Spectrograms => "spectrograms",
            Self::Chromagrams => "chromagrams",
        }
    }
}

/// What to load: the label file plus the feature-extraction parameters the
/// grams were precomputed with.
#[derive(Debug, Clone)]
pub struct GramsRequest {
    pub kind: GramKind,
    pub file_list: PathBuf,
    pub grams_path: Option<PathBuf>,
    pub languages: Option<Vec<String>>,
    pub window_size: usize,
    pub freq_bands: usize,
}

impl GramsRequest {
    /// Explicit grams file, or `<kind>_<bands>x<window>.npy` next to the file list.
    pub fn grams_file(&self) -> PathBuf {
        self.grams_path.clone().unwrap_or_else(|| {
            self.file_list.with_file_name(format!(
                "{}_{}x{}.npy",
                self.kind.name(),
                self.freq_bands,
                self.window_size
            ))
        })
    }
}

/// A stack of precomputed grams with their parallel ground-truth labels.
#[derive(Debug)]
pub struct Grams {
    pub features: Array3<f32>,
    pub labels: Vec<String>,
}

/// Loads precomputed grams and pairs each sample row with its label from the
/// file list. Filters by language when requested and clips every sample to
/// `config::NUM_FRAMES` frames.
pub fn load_grams(request: &GramsRequest) -> anyhow::Result<Grams> {
    let entries = read_file_list(&request.file_list)?;

    let grams_file = request.grams_file();
    let features = read_grams(&grams_file)?;

    let (samples, bands, frames) = features.dim();
    anyhow::ensure!(samples > 0, "Grams file {} is empty", grams_file.display());
    anyhow::ensure!(
        bands == request.freq_bands,
        "Grams file {} has {bands} frequency bands, expected {}",
        grams_file.display(),
        request.freq_bands
    );
    anyhow::ensure!(
        entries.len() >= samples,
        "File list has {} entries for {samples} samples",
        entries.len()
    );

    // Surplus file-list rows have no grams, drop them.
    let labels: Vec<String> = entries
        .into_iter()
        .take(samples)
        .map(|entry| entry.language)
        .collect();

    let (features, labels) = match &request.languages {
        Some(filter) if !filter.is_empty() => select_languages(features, labels, filter)?,
        _ => (features, labels),
    };

    let features = features
        .slice(s![.., .., ..config::NUM_FRAMES.min(frames)])
        .to_owned();

    Ok(Grams { features, labels })
}

fn read_grams(path: &Path) -> anyhow::Result<Array3<f32>> {
    let file = File::open(path).with_context(|| format!("Opening grams {}", path.display()))?;
    Array3::<f32>::read_npy(BufReader::new(file))
        .with_context(|| format!("Reading grams {}", path.display()))
}

fn select_languages(
    features: Array3<f32>,
    labels: Vec<String>,
    filter: &[String],
) -> anyhow::Result<(Array3<f32>, Vec<String>)> {
    let keep: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|&(_, label)| filter.contains(label))
        .map(|(index, _)| index)
        .collect();

    anyhow::ensure!(
        !keep.is_empty(),
        "No samples left after filtering by {filter:?}"
    );

    let features = features.select(Axis(0), &keep);
    let labels = keep.into_iter().map(|index| labels[index].clone()).collect();

    Ok((features, labels))
}
