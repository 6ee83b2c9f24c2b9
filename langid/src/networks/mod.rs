use std::path::PathBuf;

use clap::ArgEnum;
use tch::nn::{self, SequentialT};
use tch::Tensor;

mod cnn;
mod resnet;

use self::cnn::cnn;
use self::resnet::resnet;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum)]
pub enum Network {
    /// Two-block CNN over single-channel grams.
    Cnn,
    /// Fast ResNet over channel-replicated grams.
    Resnet,
}

impl Network {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cnn => "cnn",
            Self::Resnet => "resnet",
        }
    }

    pub fn create_network(&self, path: &nn::Path, num_classes: i64) -> SequentialT {
        match self {
            Self::Cnn => cnn(path, num_classes),
            Self::Resnet => resnet(path, num_classes),
        }
    }

    /// Shapes a (batch, band, frame) gram stack for the architecture's input
    /// layer: a singleton channel for the CNN, three identical channels for
    /// the ResNet.
    pub fn shape_input(&self, batch: &Tensor) -> Tensor {
        match self {
            Self::Cnn => batch.unsqueeze(1),
            Self::Resnet => Tensor::stack(
                &[
                    batch.shallow_clone(),
                    batch.shallow_clone(),
                    batch.shallow_clone(),
                ],
                1,
            ),
        }
    }

    /// Weight file by convention, e.g. "output/states/cnn_model_spectrograms.pt".
    pub fn default_weights_file(&self, feature_type: &str) -> PathBuf {
        PathBuf::from(format!(
            "output/states/{}_model_{feature_type}.pt",
            self.name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use tch::Tensor;

    use super::Network;

    #[test]
    fn test_names() {
        assert_eq!("cnn", Network::Cnn.name());
        assert_eq!("resnet", Network::Resnet.name());
    }

    #[test]
    fn test_default_weights_file() {
        assert_eq!(
            "output/states/cnn_model_spectrograms.pt",
            Network::Cnn
                .default_weights_file("spectrograms")
                .to_str()
                .unwrap()
        );
        assert_eq!(
            "output/states/resnet_model_chromagrams.pt",
            Network::Resnet
                .default_weights_file("chromagrams")
                .to_str()
                .unwrap()
        );
    }

    #[test]
    fn test_cnn_input_gets_singleton_channel() {
        let batch = Tensor::rand(&[2, 5, 7], tch::kind::FLOAT_CPU);

        let shaped = Network::Cnn.shape_input(&batch);

        assert_eq!(vec![2, 1, 5, 7], shaped.size());
        assert!(shaped.squeeze_dim(1).equal(&batch));
    }

    #[test]
    fn test_resnet_input_gets_three_identical_channels() {
        let batch = Tensor::rand(&[2, 5, 7], tch::kind::FLOAT_CPU);

        let shaped = Network::Resnet.shape_input(&batch);

        assert_eq!(vec![2, 3, 5, 7], shaped.size());
        for channel in 0..3 {
            assert!(shaped.select(1, channel).equal(&batch));
        }
    }
}
