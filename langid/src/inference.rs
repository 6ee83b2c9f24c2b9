use std::time::Instant;

use kdam::tqdm;
use tch::nn::ModuleT;
use tch::Tensor;

use crate::utils::Timings;

/// Raw per-sample scores in the original sample order, plus per-batch timings.
pub struct InferenceRun {
    pub scores: Tensor,
    pub timings: Timings,
}

/// Feeds an already-shaped tensor through the network in contiguous batches.
/// The last batch may be short. Parameters stay frozen, no gradients are
/// tracked.
pub fn run_inference<M: ModuleT>(
    net: &M,
    images: &Tensor,
    batch_size: i64,
    log_interval: usize,
) -> anyhow::Result<InferenceRun> {
    anyhow::ensure!(batch_size > 0, "Batch size must be positive: {batch_size}");

    let total = images.size()[0];
    let batches = images.split(batch_size, 0);

    let mut timings = Timings::new();
    let mut outputs = Vec::with_capacity(batches.len());

    tch::no_grad(|| {
        let mut seen = 0;
        for (index, batch) in tqdm!(
            batches.iter().enumerate(),
            desc = "Predicting",
            animation = "fillup",
            unit = "batch",
            disable = false
        ) {
            let timer = Instant::now();

            outputs.push(net.forward_t(batch, /*train=*/ false));

            timings.push(timer.elapsed().as_secs_f64());
            seen += batch.size()[0];

            if log_interval > 0 && (index + 1) % log_interval == 0 {
                println!("Predicted {seen}/{total} samples");
            }
        }
    });

    Ok(InferenceRun {
        scores: Tensor::concat(&outputs, 0),
        timings,
    })
}

#[cfg(test)]
mod tests {
    use tch::nn::{self, OptimizerConfig};
    use tch::{Kind, Tensor};

    use model::LabelEncoder;

    use crate::report::ConfusionMatrix;

    use super::run_inference;

    // Keeps the nn module imports exercised without building an optimizer.
    fn linear_net(vs: &nn::Path, in_dim: i64, out_dim: i64) -> nn::SequentialT {
        nn::seq_t().add(nn::linear(vs, in_dim, out_dim, Default::default()))
    }

    #[test]
    fn test_batched_matches_unbatched() {
        tch::manual_seed(7);
        let vs = nn::VarStore::new(tch::Device::Cpu);
        let net = linear_net(&vs.root(), 4, 3);
        let images = Tensor::rand(&[7, 4], tch::kind::FLOAT_CPU);

        let batched = run_inference(&net, &images, 3, 0).unwrap();
        let unbatched = run_inference(&net, &images, 7, 0).unwrap();

        assert_eq!(vec![7, 3], batched.scores.size());
        assert!(batched.scores.allclose(&unbatched.scores, 1e-6, 1e-6, false));
        assert_eq!(3, batched.timings.count());
        assert_eq!(1, unbatched.timings.count());
    }

    #[test]
    fn test_partial_last_batch_keeps_order() {
        let net = nn::seq_t().add_fn(|x| x * 2.0);
        let images = Tensor::arange(5i64, tch::kind::FLOAT_CPU).reshape(&[5, 1]);

        let sut = run_inference(&net, &images, 2, 0).unwrap();

        assert_eq!(vec![5, 1], sut.scores.size());
        assert!(sut.scores.equal(&(&images * 2.0)));
        assert_eq!(3, sut.timings.count());
    }

    #[test]
    fn test_rejects_non_positive_batch_size() {
        let net = nn::seq_t().add_fn(|x| x.shallow_clone());
        let images = Tensor::ones(&[2, 1], tch::kind::FLOAT_CPU);

        assert!(run_inference(&net, &images, 0, 0).is_err());
    }

    #[test]
    fn test_gradients_stay_frozen() {
        let vs = nn::VarStore::new(tch::Device::Cpu);
        let net = linear_net(&vs.root(), 4, 3);
        let images = Tensor::rand(&[2, 4], tch::kind::FLOAT_CPU);

        let sut = run_inference(&net, &images, 2, 0).unwrap();

        assert!(!sut.scores.requires_grad());
        // The varstore is untouched, an optimizer step would be a no-op.
        assert!(nn::Sgd::default().build(&vs, 0.1).is_ok());
    }

    // A 2-sample run through a model that always favors class 0 must predict
    // [0, 0] and land both samples in the first predicted column.
    #[test]
    fn test_always_first_class() {
        let net = nn::seq_t().add_fn(|x| {
            let samples = x.size()[0];
            Tensor::stack(
                &[
                    Tensor::ones(&[samples], tch::kind::FLOAT_CPU),
                    Tensor::zeros(&[samples], tch::kind::FLOAT_CPU),
                ],
                1,
            )
        });
        let images = Tensor::rand(&[2, 224, 427], tch::kind::FLOAT_CPU).unsqueeze(1);

        let run = run_inference(&net, &images, 8, 0).unwrap();
        let (_, predicted) = run.scores.max_dim(1, false);
        let predicted: Vec<i64> = (0..2).map(|i| predicted.int64_value(&[i])).collect();

        assert_eq!(vec![0, 0], predicted);

        let encoder = LabelEncoder::fit(&["en", "fr"]).unwrap();
        assert_eq!(vec!["en", "en"], encoder.inverse_all(&predicted).unwrap());

        let matrix = ConfusionMatrix::from_indices(&encoder, &[0, 1], &predicted).unwrap();
        assert_eq!(vec![vec![1, 0], vec![1, 0]], matrix.counts());
        assert_eq!(1, matrix.correct());
        assert_eq!(2, matrix.total());
    }

    #[test]
    fn test_scores_stay_float() {
        let net = nn::seq_t().add_fn(|x| x.shallow_clone());
        let images = Tensor::ones(&[3, 2], tch::kind::FLOAT_CPU);

        let sut = run_inference(&net, &images, 2, 0).unwrap();
        assert_eq!(Kind::Float, sut.scores.kind());
    }
}
