//! Escaping for the Sputnik data format.
//!
//! Nine characters collide with the format's line syntax: the escape
//! character `$` itself, the structural characters `:`, `=`, `;`, `@`, `>`
//! and `<`, and the line terminators CR and LF. None of them can appear
//! literally inside a name, key, or value, so the on-disk form replaces
//! each with a `$`-prefixed token. [`desanitize`] decodes those tokens and
//! is applied to every name, key, and value before it is stored;
//! [`sanitize`] is the writer-side counterpart.

use std::borrow::Cow;

/// The escape table, in sanitize order.
///
/// The order is a hard invariant: `$` must be escaped first so the tokens
/// inserted by the later replacements (which themselves start with `$`)
/// are not re-escaped. [`desanitize`] walks the table in reverse, decoding
/// `$dl` last, so the two functions are exact mirror images.
const ESCAPES: &[(char, &str)] = &[
    ('$', "$dl"),
    (':', "$cl"),
    ('=', "$eq"),
    (';', "$sc"),
    ('\r', "$r"),
    ('\n', "$n"),
    ('@', "$at"),
    ('>', "$gt"),
    ('<', "$lt"),
];

/// Escape every structural character in `text`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
/// The round-trip law `desanitize(sanitize(s)) == s` holds for any `s`.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_structural) {
        return Cow::Borrowed(text);
    }

    let mut result = text.to_owned();
    for &(ch, token) in ESCAPES {
        result = result.replace(ch, token);
    }
    Cow::Owned(result)
}

/// Decode every escape token in `text` back to its literal character.
///
/// Unknown `$`-sequences are left untouched.
pub fn desanitize(text: &str) -> Cow<'_, str> {
    if !text.contains('$') {
        return Cow::Borrowed(text);
    }

    let mut result = text.to_owned();
    for &(ch, token) in ESCAPES.iter().rev() {
        result = result.replace(token, ch.to_string().as_str());
    }
    Cow::Owned(result)
}

/// Check if a character must be escaped on disk.
fn is_structural(c: char) -> bool {
    matches!(c, '$' | ':' | '=' | ';' | '\r' | '\n' | '@' | '>' | '<')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(sanitize("plain text"), Cow::Borrowed(_)));
        assert!(matches!(desanitize("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_each_token() {
        assert_eq!(sanitize("$"), "$dl");
        assert_eq!(sanitize(":"), "$cl");
        assert_eq!(sanitize("="), "$eq");
        assert_eq!(sanitize(";"), "$sc");
        assert_eq!(sanitize("\r"), "$r");
        assert_eq!(sanitize("\n"), "$n");
        assert_eq!(sanitize("@"), "$at");
        assert_eq!(sanitize(">"), "$gt");
        assert_eq!(sanitize("<"), "$lt");

        assert_eq!(desanitize("$dl"), "$");
        assert_eq!(desanitize("$cl"), ":");
        assert_eq!(desanitize("$eq"), "=");
        assert_eq!(desanitize("$sc"), ";");
        assert_eq!(desanitize("$r"), "\r");
        assert_eq!(desanitize("$n"), "\n");
        assert_eq!(desanitize("$at"), "@");
        assert_eq!(desanitize("$gt"), ">");
        assert_eq!(desanitize("$lt"), "<");
    }

    #[test]
    fn test_dollar_escaped_first() {
        // A literal "$cl" must not decode back to ':' after a round trip:
        // sanitize escapes the '$' before anything else, and desanitize
        // only restores it at the very end.
        assert_eq!(sanitize("$cl"), "$dlcl");
        assert_eq!(desanitize("$dlcl"), "$cl");

        assert_eq!(sanitize("$dl"), "$dldl");
        assert_eq!(desanitize("$dldl"), "$dl");
    }

    #[test]
    fn test_mixed_text() {
        assert_eq!(
            sanitize("key=value; next@sector>name:\r\n"),
            "key$eqvalue$sc next$atsector$gtname$cl$r$n"
        );
        assert_eq!(
            desanitize("key$eqvalue$sc next$atsector$gtname$cl$r$n"),
            "key=value; next@sector>name:\r\n"
        );
    }

    #[test]
    fn test_unknown_sequences_untouched() {
        assert_eq!(desanitize("$zz"), "$zz");
        assert_eq!(desanitize("price in $"), "price in $");
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary(s in any::<String>()) {
            let sanitized = sanitize(&s);
            let restored = desanitize(&sanitized);
            prop_assert_eq!(restored.as_ref(), s.as_str());
        }

        #[test]
        fn roundtrip_structural_heavy(s in "[$:=;@><a\r\n]*") {
            let sanitized = sanitize(&s);
            let restored = desanitize(&sanitized);
            prop_assert_eq!(restored.as_ref(), s.as_str());
        }

        #[test]
        fn sanitized_text_is_syntax_free(s in any::<String>()) {
            // Only '$' may survive sanitizing, and then only as the start
            // of an escape token.
            let clean = sanitize(&s);
            prop_assert!(!clean.chars().any(|c| c != '$' && is_structural(c)));
        }
    }
}
