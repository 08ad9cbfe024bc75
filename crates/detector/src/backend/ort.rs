use super::InferenceBackend;
use ndarray::{ArrayD, ArrayViewD};
use ort::{
    session::{Session, SessionInputValue, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub enum ExecutionProvider {
    Cpu,
    #[cfg(feature = "cuda")]
    Cuda,
}

/// ONNX Runtime backend.
///
/// A serving tag names the exported graph file inside the model directory:
/// tag `serve` loads `<model_dir>/serve.onnx`.
pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    /// Find the graph file for the first tag that has one
    pub fn resolve_model_file(model_dir: &Path, tags: &[String]) -> anyhow::Result<PathBuf> {
        if !model_dir.is_dir() {
            anyhow::bail!("model directory {} does not exist", model_dir.display());
        }

        tags.iter()
            .map(|tag| model_dir.join(format!("{tag}.onnx")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no model exported for tags {:?} in {}",
                    tags,
                    model_dir.display()
                )
            })
    }

    /// Load model with specified execution provider
    pub fn load_model_with_provider(
        model_dir: &Path,
        tags: &[String],
        provider: ExecutionProvider,
    ) -> anyhow::Result<Self> {
        let path = Self::resolve_model_file(model_dir, tags)?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        #[allow(unused_mut)]
        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?;

        match provider {
            #[cfg(feature = "cuda")]
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(&path)?;

        tracing::info!(path = %path.display(), "Model loaded");
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(model_dir: &Path, tags: &[String]) -> anyhow::Result<Self> {
        #[cfg(feature = "cuda")]
        let provider = ExecutionProvider::Cuda;
        #[cfg(not(feature = "cuda"))]
        let provider = ExecutionProvider::Cpu;

        Self::load_model_with_provider(model_dir, tags, provider)
    }

    fn run(
        &mut self,
        inputs: &[(&str, ArrayViewD<'_, f32>)],
        outputs: &[&str],
    ) -> anyhow::Result<Vec<ArrayD<f32>>> {
        let mut bindings: Vec<(Cow<'_, str>, SessionInputValue<'_>)> =
            Vec::with_capacity(inputs.len());
        for (name, view) in inputs {
            bindings.push((
                Cow::Borrowed(*name),
                TensorRef::from_array_view(view.view())?.into(),
            ));
        }

        let session_outputs = self.session.run(bindings)?;

        outputs
            .iter()
            .map(|name| {
                let value = session_outputs
                    .get(*name)
                    .ok_or_else(|| anyhow::anyhow!("model has no output named {name}"))?;
                Ok(value.try_extract_array::<f32>()?.into_owned())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_model_file_uses_first_matching_tag() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("serve.onnx"), b"").unwrap();

        let tags = vec!["gpu".to_string(), "serve".to_string()];
        let path = OrtBackend::resolve_model_file(dir.path(), &tags).unwrap();

        assert_eq!(path, dir.path().join("serve.onnx"));
    }

    #[test]
    fn test_resolve_model_file_reports_tag_mismatch() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("serve.onnx"), b"").unwrap();

        let tags = vec!["train".to_string()];
        let err = OrtBackend::resolve_model_file(dir.path(), &tags).unwrap_err();

        assert!(err.to_string().contains("no model exported"));
    }

    #[test]
    fn test_resolve_model_file_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = OrtBackend::resolve_model_file(&missing, &["serve".to_string()]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
