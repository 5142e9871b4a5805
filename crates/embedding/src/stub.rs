use fxhash::hash64;

use crate::{EmbeddingConfig, EmbeddingError};

/// Deterministic dense vector for `"stub"` mode. Generates sinusoid values
/// derived from a hash of the input text so tests get reproducible vectors
/// without model assets. Normalization is owned by the caller, same as the
/// ONNX path.
pub(crate) fn make_stub_vector(
    text: &str,
    cfg: &EmbeddingConfig,
) -> Result<Vec<f32>, EmbeddingError> {
    if cfg.embedding_dim == 0 {
        return Err(EmbeddingError::InvalidConfig(
            "embedding_dim must be greater than zero".into(),
        ));
    }

    let mut v = vec![0f32; cfg.embedding_dim];
    let h = hash64(text.as_bytes());
    for (idx, value) in v.iter_mut().enumerate() {
        *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_config() -> EmbeddingConfig {
        EmbeddingConfig {
            mode: "stub".into(),
            ..Default::default()
        }
    }

    #[test]
    fn stub_vector_has_configured_dimension() {
        let v = make_stub_vector("hello", &stub_config()).unwrap();
        assert_eq!(v.len(), 768);
    }

    #[test]
    fn stub_vector_deterministic() {
        let cfg = stub_config();
        let a = make_stub_vector("same text", &cfg).unwrap();
        let b = make_stub_vector("same text", &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stub_vector_differs_per_text() {
        let cfg = stub_config();
        let a = make_stub_vector("hello", &cfg).unwrap();
        let b = make_stub_vector("world", &cfg).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn stub_vector_values_in_sine_range() {
        let v = make_stub_vector("공복 혈당", &stub_config()).unwrap();
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
        assert!(v.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn stub_vector_rejects_zero_dim() {
        let cfg = EmbeddingConfig {
            embedding_dim: 0,
            ..stub_config()
        };
        assert!(make_stub_vector("x", &cfg).is_err());
    }
}
