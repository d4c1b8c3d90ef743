use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

use super::error::EmbeddingError;

/// Picks the inference device for the embedder and classifiers.
///
/// GPU backends are tried in order (Metal, then CUDA) when compiled in; anything
/// else runs on the CPU. The models involved are small, so a CPU fallback is
/// never an error.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Running models on Metal");
            return Ok(device);
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Running models on CUDA");
            return Ok(device);
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    warn!(reason = %failures.join("; "), "GPU unavailable, running models on CPU");

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    warn!("No GPU backend compiled, running models on CPU");

    Ok(Device::Cpu)
}
