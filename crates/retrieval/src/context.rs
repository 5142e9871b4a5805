/// Hard cap on the assembled context, independent of the query.
pub const MAX_CONTEXT_CHARS: usize = 2000;

/// Cap on context + query combined, bounding the prompt payload sent to the
/// answer generator.
pub const MAX_COMBINED_CHARS: usize = 2500;

/// Join candidate texts into one bounded string safe for prompt injection.
///
/// Texts are joined with a single newline, truncated to
/// [`MAX_CONTEXT_CHARS`], then truncated further so that context + query
/// never exceeds [`MAX_COMBINED_CHARS`]. Lengths are counted in characters
/// (the guides are Korean; bytes would triple-count them) and truncation
/// never splits a codepoint. A query longer than the combined cap leaves no
/// allowance at all - the result is empty and the caller must treat that as
/// "no usable context".
///
/// Pure function: no I/O, deterministic.
pub fn assemble_context<S: AsRef<str>>(texts: &[S], query: &str) -> String {
    let mut context = texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&mut context, MAX_CONTEXT_CHARS);

    let query_chars = query.chars().count();
    if context.chars().count() + query_chars > MAX_COMBINED_CHARS {
        truncate_chars(&mut context, MAX_COMBINED_CHARS.saturating_sub(query_chars));
    }

    context
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((byte_idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(byte_idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_pass_through_unmodified() {
        let out = assemble_context(&["a", "b"], "q");
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn empty_input_yields_empty_context() {
        let texts: Vec<&str> = vec![];
        assert_eq!(assemble_context(&texts, "질문"), "");
    }

    #[test]
    fn hard_cap_truncates_to_exactly_2000() {
        // 2001 joined characters with a short query.
        let long = "x".repeat(2001);
        let out = assemble_context(&[long.as_str()], "q");
        assert_eq!(out.chars().count(), 2000);
    }

    #[test]
    fn combined_cap_subtracts_query_length() {
        // 1800 + 800 = 2600 > 2500, so the context shrinks to 1700.
        let context = "c".repeat(1800);
        let query = "q".repeat(800);
        let out = assemble_context(&[context.as_str()], &query);
        assert_eq!(out.chars().count(), 1700);
    }

    #[test]
    fn combined_cap_not_applied_when_under_limit() {
        let context = "c".repeat(1800);
        let query = "q".repeat(700);
        let out = assemble_context(&[context.as_str()], &query);
        assert_eq!(out.chars().count(), 1800);
    }

    #[test]
    fn oversized_query_leaves_no_allowance() {
        let context = "c".repeat(100);
        let query = "q".repeat(2600);
        let out = assemble_context(&[context.as_str()], &query);
        assert!(out.is_empty());
    }

    #[test]
    fn caps_count_characters_not_bytes() {
        // Hangul syllables are 3 bytes each; 2000 of them stay intact under
        // the character cap.
        let korean = "혈".repeat(2000);
        let out = assemble_context(&[korean.as_str()], "q");
        assert_eq!(out.chars().count(), 2000);
        assert_eq!(out, korean);
    }

    #[test]
    fn truncation_does_not_split_codepoints() {
        let korean = "당".repeat(2500);
        let out = assemble_context(&[korean.as_str()], "q");
        assert_eq!(out.chars().count(), 2000);
        assert!(out.chars().all(|c| c == '당'));
    }

    #[test]
    fn newline_separator_counts_toward_the_cap() {
        let a = "a".repeat(1000);
        let b = "b".repeat(1000);
        let out = assemble_context(&[a.as_str(), b.as_str()], "q");
        // 1000 + 1 + 1000 = 2001, truncated to 2000.
        assert_eq!(out.chars().count(), 2000);
        assert!(out.starts_with(&a));
    }
}
