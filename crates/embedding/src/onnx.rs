use onnxruntime::ndarray::{Array, Array2};
use onnxruntime::session::Session;
use std::cell::RefCell;

use crate::cache::CachedEncoder;
use crate::EmbeddingError;

/// Run the encoder on one query and mean-pool the final hidden states.
///
/// The query is tokenized with truncation at `max_sequence_length`. The model
/// is expected to emit per-token hidden states (`last_hidden_state`); pooling
/// sums token embeddings weighted by the attention mask and divides by the
/// mask sum, floored at 1e-9 so a degenerate all-zero mask cannot divide by
/// zero.
pub(crate) fn run_encoder(
    handle: &CachedEncoder,
    text: &str,
    max_sequence_length: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    let encoding = handle
        .tokenizer
        .encode(text, true)
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

    let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
    let mut mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&x| x as i64)
        .collect();

    if ids.len() != mask.len() {
        return Err(EmbeddingError::Inference(
            "tokenizer produced mismatched id/mask lengths".into(),
        ));
    }
    if ids.len() > max_sequence_length {
        ids.truncate(max_sequence_length);
        mask.truncate(max_sequence_length);
    }

    let seq_len = ids.len().max(1);
    if ids.is_empty() {
        // Keep the tensor rank valid; the zero mask makes pooling return zeros.
        ids.push(0);
        mask.push(0);
    }

    let input_ids = Array::from_shape_vec((1, seq_len), ids)
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
    let attn_mask_array = Array::from_shape_vec((1, seq_len), mask.clone())
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

    let hidden_states = execute_session(&handle.session, input_ids, attn_mask_array)?;
    mean_pool(&hidden_states, &mask, seq_len)
}

/// Attention-mask-weighted mean over per-token hidden states.
///
/// `flat` is the row-major `[seq_len, hidden]` output of the encoder for a
/// single query.
pub(crate) fn mean_pool(
    flat: &[f32],
    mask: &[i64],
    seq_len: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    if seq_len == 0 || !flat.len().is_multiple_of(seq_len) {
        return Err(EmbeddingError::Inference(format!(
            "hidden state length {} is not divisible by sequence length {}",
            flat.len(),
            seq_len
        )));
    }
    if mask.len() != seq_len {
        return Err(EmbeddingError::Inference(
            "attention mask length does not match sequence length".into(),
        ));
    }

    let hidden = flat.len() / seq_len;
    let mut pooled = vec![0.0f32; hidden];
    let mut mask_sum = 0.0f32;

    for (t, &m) in mask.iter().enumerate() {
        if m == 0 {
            continue;
        }
        let m = m as f32;
        mask_sum += m;
        let row = &flat[t * hidden..(t + 1) * hidden];
        for (acc, &v) in pooled.iter_mut().zip(row.iter()) {
            *acc += v * m;
        }
    }

    let denom = mask_sum.max(1e-9);
    for v in pooled.iter_mut() {
        *v /= denom;
    }
    Ok(pooled)
}

fn execute_session(
    session: &RefCell<Session<'static>>,
    input_ids: Array2<i64>,
    attn_mask: Array2<i64>,
) -> Result<Vec<f32>, EmbeddingError> {
    let (batch, seq_len) = input_ids.dim();
    let mut guard = session.borrow_mut();
    let session_ref = &mut *guard;
    let mut runtime_inputs = Vec::with_capacity(session_ref.inputs.len());
    let mut input_ids_tensor = Some(input_ids);
    let mut attn_mask_tensor = Some(attn_mask);

    for input in &session_ref.inputs {
        match input.name.as_str() {
            "input_ids" => {
                let tensor = input_ids_tensor.take().ok_or_else(|| {
                    EmbeddingError::InvalidConfig(
                        "model requested `input_ids` multiple times".into(),
                    )
                })?;
                runtime_inputs.push(tensor.into_dyn());
            }
            "attention_mask" => {
                let tensor = attn_mask_tensor.take().ok_or_else(|| {
                    EmbeddingError::InvalidConfig(
                        "model requested `attention_mask` multiple times".into(),
                    )
                })?;
                runtime_inputs.push(tensor.into_dyn());
            }
            "token_type_ids" => {
                let tensor = Array::from_elem((batch, seq_len), 0_i64);
                runtime_inputs.push(tensor.into_dyn());
            }
            other => {
                return Err(EmbeddingError::Inference(format!(
                    "unsupported model input '{other}'"
                )))
            }
        }
    }

    if runtime_inputs.is_empty() {
        return Err(EmbeddingError::Inference(
            "model did not declare any inputs".into(),
        ));
    }

    let outputs = session_ref
        .run::<i64, f32, _>(runtime_inputs)
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
    let output_tensor = outputs
        .into_iter()
        .next()
        .ok_or_else(|| EmbeddingError::Inference("model returned no outputs".into()))?;

    Ok(output_tensor.iter().copied().collect())
}
