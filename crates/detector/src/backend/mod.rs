use ndarray::{ArrayD, ArrayViewD};
use std::path::Path;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// Contract of the engine that executes the pretrained classification model.
///
/// A backend owns whatever native session the model needs; dropping it
/// releases that session.
pub trait InferenceBackend: Send {
    /// Load the model exported under one of `tags` from `model_dir`.
    fn load_model(model_dir: &Path, tags: &[String]) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Bind each named input and compute the requested outputs, in order.
    fn run(
        &mut self,
        inputs: &[(&str, ArrayViewD<'_, f32>)],
        outputs: &[&str],
    ) -> anyhow::Result<Vec<ArrayD<f32>>>;
}
