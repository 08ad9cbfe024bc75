use crate::backend::InferenceBackend;
use crate::config::DetectorConfig;
use crate::error::{DetectorError, Result};
use crate::labels::load_labels;
use common::span_debug;
use ndarray::{ArrayD, Axis};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Loads a backend for a model directory and its serving tags.
pub type BackendLoader<B> = dyn Fn(&Path, &[String]) -> anyhow::Result<B> + Send + Sync;

/// A loaded model: the backend handle plus the label names shipped with it.
///
/// Only ever constructed fully loaded. Inference is serialized through a
/// mutex because backends need exclusive access to their native session.
pub struct ModelSession<B> {
    backend: Mutex<B>,
    labels: Vec<String>,
    input_name: String,
    output_name: String,
}

impl<B: InferenceBackend> ModelSession<B> {
    /// Load the backend, then the label file. Any failure drops what was
    /// loaded so far.
    pub fn load(config: &DetectorConfig, loader: &BackendLoader<B>) -> Result<Self> {
        tracing::info!(
            model_dir = %config.model_dir.display(),
            tags = ?config.tags,
            "Loading image classification model"
        );

        let backend = loader(&config.model_dir, &config.tags).map_err(DetectorError::model_load)?;
        let labels = load_labels(&config.model_dir).map_err(DetectorError::model_load)?;

        tracing::info!(labels = labels.len(), "Model loaded successfully");

        Ok(Self {
            backend: Mutex::new(backend),
            labels,
            input_name: config.input_name.clone(),
            output_name: config.output_name.clone(),
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Run one forward pass and return the first row of the first output.
    pub fn infer(&self, tensor: &ArrayD<f32>) -> Result<Vec<f32>> {
        let _s = span_debug!("model_inference");

        let outputs = {
            let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
            backend
                .run(
                    &[(self.input_name.as_str(), tensor.view())],
                    &[self.output_name.as_str()],
                )
                .map_err(|e| {
                    tracing::error!(error = %e, "Could not run inference");
                    DetectorError::inference(format!("could not run inference: {e:#}"))
                })?
        };

        let first = outputs
            .into_iter()
            .next()
            .ok_or_else(|| DetectorError::inference("result is empty"))?;

        let row = match first.ndim() {
            0 => return Err(DetectorError::inference("output is a scalar")),
            1 => first,
            _ if first.len_of(Axis(0)) == 0 => {
                return Err(DetectorError::inference("output has no rows"));
            }
            _ => first.index_axis_move(Axis(0), 0),
        };

        Ok(row.iter().copied().collect())
    }
}
