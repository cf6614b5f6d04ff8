//! Query cleaning for the fallback tier.

/// Clean `raw` into a simpler query: keep only alphanumeric and whitespace
/// characters, trim both ends, then keep at most `max_chars` characters.
///
/// "Alphanumeric" is the Unicode `Alphabetic`/`Numeric` property, so
/// dependent vowel signs in Indic scripts survive while viramas and other
/// non-alphabetic combining marks are dropped.
///
/// Truncation happens after trimming, so the result may end in whitespace
/// when the cut lands between words.
///
/// # Examples
///
/// ```
/// use vidfind_search::sanitize::sanitize;
///
/// assert_eq!(sanitize("  rust: async/await?  ", 50), "rust asyncawait");
/// assert_eq!(sanitize("###???", 50), "");
/// ```
pub fn sanitize(raw: &str, max_chars: usize) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.trim().chars().take(max_chars).collect()
}
