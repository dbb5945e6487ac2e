//! Text normalization helpers for comparing generated code.

/// Removes every whitespace character outside double-quoted string literals.
///
/// Token streams render with arbitrary spacing; comparing their compacted
/// form keeps assertions independent of layout. Escaped quotes inside a
/// literal do not end it.
#[must_use]
pub fn normalize_tokens(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in value.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
            out.push(ch);
        } else if !ch.is_whitespace() {
            out.push(ch);
        }
    }
    out
}

/// Drops the generated-file header line, if present.
#[must_use]
pub fn strip_header(value: &str) -> &str {
    value
        .strip_prefix("// Code generated by")
        .and_then(|rest| rest.split_once('\n'))
        .map_or(value, |(_, body)| body)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tokens, strip_header};

    #[test]
    fn keeps_whitespace_inside_literals() {
        assert_eq!(
            normalize_tokens("out . push_str (\"Hello, \") ;"),
            "out.push_str(\"Hello, \");"
        );
    }

    #[test]
    fn escaped_quotes_do_not_close_literals() {
        assert_eq!(normalize_tokens("f (\"a \\\" b\") "), "f(\"a \\\" b\")");
    }

    #[test]
    fn strips_generated_header() {
        assert_eq!(strip_header("// Code generated by x; DO NOT EDIT.\nmod en;\n"), "mod en;\n");
        assert_eq!(strip_header("mod en;\n"), "mod en;\n");
    }
}
