use ahash::AHashMap;

/// Replaces `{{name}}` placeholders with session attribute values.
///
/// Single pass over the input, flat namespace, no escaping syntax. Inner
/// whitespace is trimmed, so `{{ name }}` and `{{name}}` resolve alike.
/// Unmatched placeholders are left verbatim; substituted values are not
/// re-scanned, so no nested interpolation can occur.
pub fn interpolate(text: &str, attributes: &AHashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                match attributes.get(after[..close].trim()) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..open + close + 4]),
                }
                rest = &after[close + 2..];
            }
            None => {
                // Unterminated placeholder: keep the tail as-is.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
