//! Template string syntax.
//!
//! A template is literal text with placeholders:
//!
//! - `{name:s}` declares the argument `name` with specifier `s` and inserts
//!   it;
//! - `{name:f:>8.2}` does the same with an explicit format directive;
//! - `{name}` inserts an argument declared elsewhere in the message;
//! - `{@total}` inserts the variable `total`;
//! - `{{` and `}}` are literal braces.

use thiserror::Error;

/// One lexical element of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text with escapes resolved.
    Literal(String),
    /// Argument placeholder.
    Argument {
        /// Argument name.
        name: String,
        /// Type specifier character, when the placeholder declares the
        /// argument.
        spec: Option<char>,
        /// Explicit format directive.
        directive: Option<String>,
    },
    /// Variable placeholder.
    Variable(String),
}

/// Malformed template syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{` has no matching `}`.
    #[error("unclosed '{{' at offset {0}")]
    Unclosed(usize),

    /// A `}` is neither escaped nor closing a placeholder.
    #[error("unmatched '}}' at offset {0}")]
    UnmatchedClose(usize),

    /// A placeholder has no name.
    #[error("empty placeholder at offset {0}")]
    EmptyPlaceholder(usize),

    /// A specifier is not exactly one character.
    #[error("specifier '{0}' must be a single character")]
    Specifier(String),
}

/// Splits `template` into tokens.
///
/// # Errors
///
/// Returns a [`TemplateError`] for unbalanced braces and malformed
/// placeholders.
pub fn parse(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => literal.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => literal.push('}'),
            '}' => return Err(TemplateError::UnmatchedClose(offset)),
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    body.push(inner);
                }
                if !closed {
                    return Err(TemplateError::Unclosed(offset));
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(placeholder(&body, offset)?);
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn placeholder(body: &str, offset: usize) -> Result<Token, TemplateError> {
    if let Some(variable) = body.strip_prefix('@') {
        let name = variable.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyPlaceholder(offset));
        }
        return Ok(Token::Variable(name.to_owned()));
    }
    let mut fields = body.splitn(3, ':');
    let name = fields.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyPlaceholder(offset));
    }
    let spec = fields.next().map(specifier).transpose()?;
    // Directives keep their whitespace: a space is a valid fill character.
    let directive = fields
        .next()
        .filter(|directive| !directive.is_empty())
        .map(str::to_owned);
    Ok(Token::Argument {
        name: name.to_owned(),
        spec,
        directive,
    })
}

fn specifier(raw: &str) -> Result<char, TemplateError> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(spec), None) => Ok(spec),
        _ => Err(TemplateError::Specifier(raw.to_owned())),
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface broken fixtures")]
mod tests {
    use super::*;
    use rstest::rstest;

    fn arg(name: &str, spec: Option<char>, directive: Option<&str>) -> Token {
        Token::Argument {
            name: name.to_owned(),
            spec,
            directive: directive.map(str::to_owned),
        }
    }

    #[rstest]
    fn splits_literals_and_placeholders() {
        assert_eq!(
            parse("Hello, {name:s}! You have {count:d:>4} {@unit}.").expect("parses"),
            vec![
                Token::Literal("Hello, ".to_owned()),
                arg("name", Some('s'), None),
                Token::Literal("! You have ".to_owned()),
                arg("count", Some('d'), Some(">4")),
                Token::Literal(" ".to_owned()),
                Token::Variable("unit".to_owned()),
                Token::Literal(".".to_owned()),
            ]
        );
    }

    #[rstest]
    fn doubled_braces_are_literal() {
        assert_eq!(
            parse("{{{name}}}").expect("parses"),
            vec![
                Token::Literal("{".to_owned()),
                arg("name", None, None),
                Token::Literal("}".to_owned()),
            ]
        );
    }

    #[rstest]
    fn directive_may_contain_colons_and_spaces() {
        assert_eq!(
            parse("{t:s: ^9}").expect("parses"),
            vec![arg("t", Some('s'), Some(" ^9"))]
        );
    }

    #[rstest]
    #[case("Hello {name", TemplateError::Unclosed(6))]
    #[case("oops }", TemplateError::UnmatchedClose(5))]
    #[case("{}", TemplateError::EmptyPlaceholder(0))]
    #[case("{@ }", TemplateError::EmptyPlaceholder(0))]
    #[case("{n:dd}", TemplateError::Specifier("dd".to_owned()))]
    fn rejects_malformed_templates(#[case] template: &str, #[case] expected: TemplateError) {
        assert_eq!(parse(template), Err(expected));
    }

    #[rstest]
    fn empty_template_has_no_tokens() {
        assert_eq!(parse(""), Ok(Vec::new()));
    }
}
