//! Primary (trained) classifiers.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use candle_core::{D, Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::{CLASSIFIER_MAX_SEQ_LEN, HEURISTIC_CONFIDENCE};
use crate::embedding::bert::BertSequenceClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_tokenizer_with_truncation;

use super::error::ClassifyError;
use super::labels::LabelSet;
use super::types::Prediction;

/// A local, CPU/GPU-bound classifier that reports a calibrated confidence.
pub trait PrimaryClassifier<L: LabelSet>: Send + Sync {
    fn classify(&self, text: &str) -> Result<Prediction<L>, ClassifyError>;

    /// Returns `true` when predictions come from a stand-in rather than a model.
    fn is_stub(&self) -> bool {
        false
    }
}

/// Fine-tuned BERT sequence classifier over the label set `L`.
pub struct BertLabelClassifier<L> {
    model: BertSequenceClassifier,
    tokenizer: Tokenizer,
    device: Device,
    _labels: PhantomData<fn() -> L>,
}

impl<L> std::fmt::Debug for BertLabelClassifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertLabelClassifier")
            .field("device", &format!("{:?}", self.device))
            .field("num_labels", &self.model.num_labels())
            .finish()
    }
}

impl<L: LabelSet> BertLabelClassifier<L> {
    /// Loads `config.json`, `model.safetensors` and `tokenizer.json` from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self, ClassifyError> {
        if !model_dir.is_dir() {
            return Err(ClassifyError::ModelLoadFailed {
                reason: format!("classifier directory not found: {}", model_dir.display()),
            });
        }

        let device = select_device()?;
        debug!(?device, kind = L::KIND, "Selected compute device for classifier");

        let model = BertSequenceClassifier::load(model_dir, &device, L::ALL.len()).map_err(|e| {
            ClassifyError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer =
            load_tokenizer_with_truncation(model_dir, CLASSIFIER_MAX_SEQ_LEN).map_err(|e| {
                ClassifyError::ModelLoadFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                }
            })?;

        info!(
            kind = L::KIND,
            model_path = %model_dir.display(),
            num_labels = model.num_labels(),
            "Classifier model loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            _labels: PhantomData,
        })
    }
}

impl<L: LabelSet> PrimaryClassifier<L> for BertLabelClassifier<L> {
    fn classify(&self, text: &str) -> Result<Prediction<L>, ClassifyError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifyError::Tokenization {
                reason: e.to_string(),
            })?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| ClassifyError::Inference {
                reason: "classifier produced no logits".to_string(),
            })?;

        let label = L::from_class_index(index).ok_or_else(|| ClassifyError::Inference {
            reason: format!("class index {index} has no {} label", L::KIND),
        })?;

        debug!(kind = L::KIND, %label, confidence, "Primary classification");

        Ok(Prediction { label, confidence })
    }
}

/// Keyword-rule classifier used when no model directory is configured.
pub struct HeuristicClassifier<L> {
    _labels: PhantomData<fn() -> L>,
}

impl<L> Default for HeuristicClassifier<L> {
    fn default() -> Self {
        Self {
            _labels: PhantomData,
        }
    }
}

impl<L> std::fmt::Debug for HeuristicClassifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HeuristicClassifier")
    }
}

impl<L: LabelSet> PrimaryClassifier<L> for HeuristicClassifier<L> {
    fn classify(&self, text: &str) -> Result<Prediction<L>, ClassifyError> {
        Ok(Prediction {
            label: L::heuristic(text),
            confidence: HEURISTIC_CONFIDENCE,
        })
    }

    fn is_stub(&self) -> bool {
        true
    }
}

/// Loads the model in `model_dir`, or the heuristic stand-in when none is configured.
pub fn load_primary<L: LabelSet>(
    model_dir: Option<&Path>,
) -> Result<Arc<dyn PrimaryClassifier<L>>, ClassifyError> {
    match model_dir {
        Some(dir) => Ok(Arc::new(BertLabelClassifier::<L>::load(dir)?)),
        None => {
            warn!(
                kind = L::KIND,
                "No classifier model configured, primary classifier running in STUB mode (keyword rules)"
            );
            Ok(Arc::new(HeuristicClassifier::<L>::default()))
        }
    }
}
