use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// Weight-name prefixes used by exported BERT checkpoints, in lookup order.
const ENCODER_PREFIXES: [&str; 2] = ["bert", "roberta"];

/// Parsed `config.json`, plus the raw JSON for fields candle does not model.
pub struct BertFiles {
    pub config: Config,
    pub raw_config: serde_json::Value,
    pub vb: VarBuilder<'static>,
}

impl BertFiles {
    /// Reads `config.json` and memory-maps `model.safetensors` from `model_dir`.
    pub fn open(model_dir: &Path, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let raw_config: serde_json::Value = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let config: Config = serde_json::from_value(raw_config.clone())
            .map_err(|e| candle::Error::Msg(format!("Unsupported BERT config: {}", e)))?;

        let weights_path = model_dir.join("model.safetensors");
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        Ok(Self {
            config,
            raw_config,
            vb,
        })
    }

    /// Number of output classes declared by `id2label` / `num_labels`, if any.
    pub fn declared_num_labels(&self) -> Option<usize> {
        if let Some(map) = self.raw_config.get("id2label").and_then(|v| v.as_object()) {
            return Some(map.len());
        }
        self.raw_config
            .get("num_labels")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
    }

    /// Variable builder scoped to the encoder, whatever prefix the export used.
    fn encoder_vb(&self) -> VarBuilder<'static> {
        ENCODER_PREFIXES
            .iter()
            .find(|prefix| {
                self.vb
                    .contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight"))
            })
            .map(|prefix| self.vb.pp(*prefix))
            .unwrap_or_else(|| self.vb.clone())
    }

    /// Loads the bare encoder (sentence-transformers exports have no prefix).
    pub fn load_encoder(&self) -> Result<BertModel> {
        BertModel::load(self.encoder_vb(), &self.config)
    }
}

struct BertForSequenceClassificationImpl {
    bert: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
    num_labels: usize,
}

impl BertForSequenceClassificationImpl {
    fn load(files: &BertFiles, num_labels: usize) -> Result<Self> {
        let bert = files.load_encoder()?;
        let hidden_size = files.config.hidden_size;

        let encoder_vb = files.encoder_vb();
        let pooler = if encoder_vb.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                encoder_vb.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };

        let classifier = candle_nn::linear(hidden_size, num_labels, files.vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
            num_labels,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(pooler) => pooler.forward(&cls_token)?.tanh()?,
            None => cls_token,
        };
        self.classifier.forward(&pooled)
    }
}

/// BERT with a sequence-classification head, producing one logit per label.
#[derive(Clone)]
pub struct BertSequenceClassifier(std::sync::Arc<BertForSequenceClassificationImpl>);

impl BertSequenceClassifier {
    /// Loads a fine-tuned classifier; `default_num_labels` applies when the config declares none.
    pub fn load<P: AsRef<Path>>(
        model_dir: P,
        device: &Device,
        default_num_labels: usize,
    ) -> Result<Self> {
        let files = BertFiles::open(model_dir.as_ref(), device)?;
        let num_labels = files.declared_num_labels().unwrap_or(default_num_labels);
        let model = BertForSequenceClassificationImpl::load(&files, num_labels)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Returns logits with shape `[batch, num_labels]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }

    pub fn num_labels(&self) -> usize {
        self.0.num_labels
    }
}
