use super::TemplateError;
use std::collections::HashMap;

/// Sentinel character delimiting placeholders in hand-written bodies
pub const SENTINEL: char = '$';

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Placeholder(String),
}

/// Double every brace so it survives placeholder parsing as a literal.
pub fn escape_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(c),
        }
    }
    out
}

/// Rewrite every `$word$` into the internal `{word}` placeholder syntax.
///
/// A sentinel that does not open a complete `$word$` pair stays literal.
pub fn mark_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(SENTINEL) {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let word_len = after
            .find(|c: char| !is_word_char(c))
            .unwrap_or(after.len());

        if word_len > 0 && after[word_len..].starts_with(SENTINEL) {
            out.push('{');
            out.push_str(&after[..word_len]);
            out.push('}');
            rest = &after[word_len + 1..];
        } else {
            out.push(SENTINEL);
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

/// Parse the internal syntax (`{{`, `}}`, `{name}`) into tokens.
pub fn parse(internal: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = internal.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(TemplateError::Malformed {
                        position,
                        reason: "unterminated placeholder".to_string(),
                    });
                }
                if name.is_empty() || !name.chars().all(is_word_char) {
                    return Err(TemplateError::Malformed {
                        position,
                        reason: format!("invalid placeholder name '{}'", name),
                    });
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder(name));
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(TemplateError::Malformed {
                    position,
                    reason: "unmatched '}'".to_string(),
                });
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A payload body compiled into literal/placeholder tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    /// Compile a hand-written body that uses `$name$` placeholders
    pub fn compile(body: &str) -> Result<Self, TemplateError> {
        let internal = mark_placeholders(&escape_literals(body));
        Ok(Self {
            tokens: parse(&internal)?,
        })
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Placeholder(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder with its bound value
    pub fn resolve(&self, bindings: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder(name) => {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Split a `key=value` argument at the first `=`
pub fn parse_binding(arg: &str) -> Result<(String, String), TemplateError> {
    arg.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| TemplateError::MalformedBinding(arg.to_string()))
}

/// Parse a list of `key=value` arguments; later keys override earlier ones
pub fn parse_bindings<S: AsRef<str>>(
    args: &[S],
) -> Result<HashMap<String, String>, TemplateError> {
    let mut bindings = HashMap::new();
    for arg in args {
        let (key, value) = parse_binding(arg.as_ref())?;
        bindings.insert(key, value);
    }
    Ok(bindings)
}
