use std::path::PathBuf;

use grams::GramKind;
use langid::networks::Network;

pub struct PredictionConfig {
    pub network: Network,
    pub kind: GramKind,
    pub batch_size: i64,
    pub freq_bands: usize,
    pub window_size: usize,
    pub languages: Option<Vec<String>>,
    pub cuda: bool,
    pub log_interval: usize,
    pub file_list: PathBuf,
    pub grams_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub save_model: bool,
}

impl PredictionConfig {
    /// Explicit weight file, or the conventional per-architecture path.
    pub fn weights_file(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.network.default_weights_file(self.kind.name()))
    }
}
