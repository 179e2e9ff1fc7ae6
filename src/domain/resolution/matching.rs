//! Word-boundary phrase matching over normalized text.

/// Lowercases, turns every non-alphanumeric character into a space, and
/// collapses runs of spaces. The result is padded with one space on each
/// side so that phrase lookups are anchored at word starts.
pub fn normalize(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut out = String::with_capacity(lowered.len() + 2);
    out.push(' ');
    for word in lowered.split_whitespace() {
        out.push_str(word);
        out.push(' ');
    }
    out
}

/// True if `phrase` occurs in `normalized` starting at a word boundary.
///
/// The last word of the phrase may carry a suffix, so "license" matches
/// "licenses" and "passport" matches "passports", while "pan" does not
/// match inside "japan".
///
/// `normalized` must come from [`normalize`]; `phrase` is normalized here.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let needle = normalize(phrase);
    let needle = needle.trim_end();
    !needle.trim().is_empty() && normalized.contains(needle)
}
