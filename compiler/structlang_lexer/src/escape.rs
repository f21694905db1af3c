//! Escape Sequence Processing
//!
//! Recognized escapes: `\n`, `\r`, `\t`, `\\`, `\"`, `\0`

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '0' => Some('\0'),
        _ => None,
    }
}

/// Turn a string literal lexeme into its value.
///
/// Accepts the lexeme with or without its surrounding quotes. Unrecognized
/// escapes are kept literally (`\q` stays `\q`).
pub fn unescape_string(lexeme: &str) -> String {
    let body = lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(lexeme);

    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(esc) => match resolve_escape(esc) {
                Some(resolved) => result.push(resolved),
                None => {
                    result.push('\\');
                    result.push(esc);
                }
            },
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes() {
        assert_eq!(unescape_string("\"hello\""), "hello");
    }

    #[test]
    fn resolves_known_escapes() {
        assert_eq!(unescape_string(r#""a\nb\t\"c\"\\""#), "a\nb\t\"c\"\\");
    }

    #[test]
    fn keeps_unknown_escapes() {
        assert_eq!(unescape_string(r#""\q""#), "\\q");
    }

    #[test]
    fn multibyte_content() {
        assert_eq!(unescape_string("\"héllo ✓\""), "héllo ✓");
    }
}
