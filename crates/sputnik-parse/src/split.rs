//! Delimiter splitting with the Sputnik field rules.

/// Split `text` on every occurrence of `delimiter`.
///
/// The scan runs left to right, emitting the span since the previous
/// delimiter each time the delimiter is hit; the final trailing span is
/// emitted only when non-empty. A trailing delimiter therefore produces no
/// empty field: `split_on("a;b;", ';')` is `["a", "b"]`, and an empty
/// input yields no fields at all.
///
/// Used for `key=value` splitting, `sector>name` splitting, and
/// `;`-separated array values.
pub fn split_on(text: &str, delimiter: char) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    for (pos, c) in text.char_indices() {
        if c == delimiter {
            fields.push(&text[start..pos]);
            start = pos + c.len_utf8();
        }
    }

    if start < text.len() {
        fields.push(&text[start..]);
    }

    fields
}
