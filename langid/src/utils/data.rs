use ndarray::Array3;
use tch::Tensor;

/// Converts a (sample, band, frame) gram stack into a float tensor of the
/// same shape.
pub fn grams_to_tensor(grams: Array3<f32>) -> anyhow::Result<Tensor> {
    let (samples, bands, frames) = grams.dim();

    let data = if grams.is_standard_layout() {
        grams.into_raw_vec()
    } else {
        grams.as_standard_layout().to_owned().into_raw_vec()
    };

    Ok(Tensor::try_from(data)?.reshape(&[samples as i64, bands as i64, frames as i64]))
}
