use super::*;
use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use std::path::PathBuf;

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_config_default_is_stub() {
        let config = EmbedderConfig::default();
        assert!(config.is_stub());
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
    }

    #[test]
    fn test_config_new() {
        let config = EmbedderConfig::new("/models/all-MiniLM-L6-v2");
        assert_eq!(
            config.model_path,
            Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
        );
        assert!(!config.is_stub());
    }

    #[test]
    fn test_config_validate() {
        assert!(EmbedderConfig::stub().validate().is_ok());

        let zero_len = EmbedderConfig {
            max_seq_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_len.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));

        let missing = EmbedderConfig::new("/nonexistent/minilm");
        assert!(matches!(
            missing.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));

        let empty = EmbedderConfig::new("");
        assert!(matches!(
            empty.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        // SAFETY: Test code only, we accept the thread-safety risk in tests.
        unsafe { env::remove_var(EmbedderConfig::ENV_MODEL_PATH) };
        assert!(EmbedderConfig::from_env().is_stub());

        // SAFETY: Test code only, we accept the thread-safety risk in tests.
        unsafe { env::set_var(EmbedderConfig::ENV_MODEL_PATH, "  /models/minilm  ") };
        let config = EmbedderConfig::from_env();
        // SAFETY: Test code only, we accept the thread-safety risk in tests.
        unsafe { env::remove_var(EmbedderConfig::ENV_MODEL_PATH) };

        assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_load_stub() {
        let embedder = SentenceEmbedder::load(EmbedderConfig::stub()).expect("stub loads");
        assert!(embedder.is_stub());
        assert!(!embedder.has_model());
        assert_eq!(embedder.embedding_dim(), DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_load_missing_model_fails() {
        let result = SentenceEmbedder::load(EmbedderConfig::new("/nonexistent/minilm"));
        assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
    }

    #[test]
    fn test_load_dir_without_weights_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = SentenceEmbedder::load(EmbedderConfig::new(dir.path()));
        assert!(matches!(result, Err(EmbeddingError::ModelLoadFailed { .. })));
    }

    #[test]
    fn test_stub_is_deterministic() {
        let embedder = SentenceEmbedder::stub();
        let a = embedder.embed("What is your name?").unwrap();
        let b = embedder.embed("What is your name?").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_stub_is_unit_length() {
        let embedder = SentenceEmbedder::stub();
        let v = embedder.embed("Where were you when it happened?").unwrap();
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_ignores_case_and_punctuation() {
        let embedder = SentenceEmbedder::stub();
        let a = embedder.embed("Tell me about the park.").unwrap();
        let b = embedder.embed("tell ME about the PARK").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stub_shared_words_are_similar() {
        let embedder = SentenceEmbedder::stub();
        let name = embedder.embed("What is your name?").unwrap();
        let age = embedder.embed("What is your age?").unwrap();
        let car = embedder.embed("Toyota Corolla").unwrap();

        assert!(dot(&name, &age) > 0.5);
        assert!(dot(&name, &age) > dot(&name, &car));
    }

    #[test]
    fn test_stub_empty_text_is_zero_vector() {
        let embedder = SentenceEmbedder::stub();
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_embed_batch_matches_single() {
        let embedder = SentenceEmbedder::stub();
        let texts = ["Hello", "How old are you?", ""];
        let batch = embedder.embed_batch(&texts).unwrap();

        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(&embedder.embed(text).unwrap(), vector);
        }
    }

    #[test]
    fn test_debug_output() {
        let embedder = SentenceEmbedder::stub();
        let debug = format!("{:?}", embedder);
        assert!(debug.contains("SentenceEmbedder"));
        assert!(debug.contains("Stub"));
    }
}
