use once_cell::sync::OnceCell;
use onnxruntime::{environment::Environment, session::Session};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tokenizers::Tokenizer;

use crate::EmbeddingConfig;
use crate::EmbeddingError;

static ORT_ENV: OnceCell<Environment> = OnceCell::new();

thread_local! {
    static ENCODER_CACHE: RefCell<std::collections::HashMap<EncoderCacheKey, Rc<CachedEncoder>>> =
        RefCell::new(std::collections::HashMap::new());
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct EncoderCacheKey {
    model_path: PathBuf,
    tokenizer_path: PathBuf,
}

/// Tokenizer + ONNX session pair, cached per thread. First call on any thread
/// pays the load cost; subsequent queries reuse the session.
pub(crate) struct CachedEncoder {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) session: RefCell<Session<'static>>,
}

impl CachedEncoder {
    fn load(cfg: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        if !cfg.model_path.exists() {
            return Err(EmbeddingError::ModelNotFound(
                cfg.model_path.display().to_string(),
            ));
        }
        if !cfg.tokenizer_path.exists() {
            return Err(EmbeddingError::TokenizerMissing(
                cfg.tokenizer_path.display().to_string(),
            ));
        }

        let tokenizer = Tokenizer::from_file(&cfg.tokenizer_path)
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

        let env = ort_environment()?;
        let session = env
            .new_session_builder()
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?
            .with_model_from_file(cfg.model_path.clone())
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

        Ok(Self {
            tokenizer,
            session: RefCell::new(session),
        })
    }
}

pub(crate) fn get_or_load_encoder(
    cfg: &EmbeddingConfig,
) -> Result<Rc<CachedEncoder>, EmbeddingError> {
    let key = EncoderCacheKey {
        model_path: cfg.model_path.clone(),
        tokenizer_path: cfg.tokenizer_path.clone(),
    };

    ENCODER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(handle) = cache.get(&key) {
            return Ok(handle.clone());
        }

        let handle = Rc::new(CachedEncoder::load(cfg)?);
        cache.insert(key, handle.clone());
        Ok(handle)
    })
}

fn ort_environment() -> Result<&'static Environment, EmbeddingError> {
    ORT_ENV.get_or_try_init(|| {
        Environment::builder()
            .with_name("coach-embedding")
            .build()
            .map_err(|e| EmbeddingError::Inference(e.to_string()))
    })
}
