//! URL rewriting.
//!
//! # Responsibilities
//! - Hold compiled rewrite rules in declaration order
//! - Turn an inbound path+query into the ordered list of outbound URLs
//! - Expand replacement templates against the first regex match
//!
//! # Design Decisions
//! - Patterns and templates compiled once, at configuration load
//! - Only the first match is replaced; text around it is kept
//! - Every matching rule contributes, in declaration order

use regex::{Captures, Regex};

/// A single pattern and its replacement templates.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    templates: Vec<Template>,
}

impl RewriteRule {
    /// Compile a rule. Fails only when `pattern` is not a valid regex.
    pub fn new<S: AsRef<str>>(pattern: &str, templates: &[S]) -> Result<Self, regex::Error> {
        let pattern = Regex::new(pattern)?;
        let templates = templates
            .iter()
            .map(|t| Template::compile(t.as_ref(), &pattern))
            .collect();
        Ok(Self { pattern, templates })
    }

    /// The pattern source as configured.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Apply every template to `path`, or `None` when the pattern does not match.
    pub fn apply(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.pattern.captures(path)?;
        Some(self.templates.iter().map(|t| t.expand(path, &caps)).collect())
    }
}

/// Ordered set of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RewriteConfig {
    rules: Vec<RewriteRule>,
}

impl RewriteConfig {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Outbound URLs for `path`, in rule-then-template order.
    ///
    /// Empty when no rule matches. Duplicates are kept.
    pub fn rewrite(&self, path: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(path))
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Group(usize),
    Named(String),
    WholeMatch,
    Before,
    After,
}

/// A replacement template, pre-split into tokens.
///
/// `$n`/`$nn` refer to positional groups (two digits win when that group
/// exists), `$&` is the whole match, `` $` `` and `$'` the text before and
/// after it, `$<name>` a named group and `$$` a literal dollar. References the
/// pattern cannot satisfy are kept as literal text.
#[derive(Debug, Clone)]
struct Template {
    source: String,
    tokens: Vec<Token>,
}

impl Template {
    fn compile(source: &str, pattern: &Regex) -> Self {
        let groups = pattern.captures_len() - 1;
        let has_names = pattern.capture_names().flatten().next().is_some();
        let bytes = source.as_bytes();

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'$' {
                // Copy up to the next '$' in one go to keep UTF-8 intact.
                let next = source[i..].find('$').map_or(source.len(), |p| p + i);
                literal.push_str(&source[i..next]);
                i = next;
                continue;
            }
            if i + 1 == bytes.len() {
                literal.push('$');
                break;
            }

            let (token, consumed) = match bytes[i + 1] {
                b'$' => (Token::Literal("$".into()), 2),
                b'&' => (Token::WholeMatch, 2),
                b'`' => (Token::Before, 2),
                b'\'' => (Token::After, 2),
                b'0'..=b'9' => match group_reference(&bytes[i + 1..], groups) {
                    Some((n, digits)) => (Token::Group(n), 1 + digits),
                    None => (Token::Literal("$".into()), 1),
                },
                b'<' if has_names => match source[i + 2..].find('>') {
                    Some(end) => (
                        Token::Named(source[i + 2..i + 2 + end].to_string()),
                        end + 3,
                    ),
                    None => (Token::Literal("$".into()), 1),
                },
                _ => (Token::Literal("$".into()), 1),
            };

            match token {
                Token::Literal(text) => literal.push_str(&text),
                other => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(other);
                }
            }
            i += consumed;
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    /// Replace the first match in `input` with this template's expansion.
    fn expand(&self, input: &str, caps: &Captures<'_>) -> String {
        let Some(whole) = caps.get(0) else {
            return input.to_string();
        };
        let mut out = String::with_capacity(input.len() + self.source.len());
        out.push_str(&input[..whole.start()]);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Group(n) => out.push_str(caps.get(*n).map_or("", |m| m.as_str())),
                Token::Named(name) => out.push_str(caps.name(name).map_or("", |m| m.as_str())),
                Token::WholeMatch => out.push_str(whole.as_str()),
                Token::Before => out.push_str(&input[..whole.start()]),
                Token::After => out.push_str(&input[whole.end()..]),
            }
        }
        out.push_str(&input[whole.end()..]);
        out
    }
}

/// Resolve `$n`/`$nn` against the pattern's group count.
///
/// Returns the group index and how many digits it used.
fn group_reference(digits: &[u8], groups: usize) -> Option<(usize, usize)> {
    let first = (digits[0] - b'0') as usize;
    if let Some(second) = digits.get(1).filter(|b| b.is_ascii_digit()) {
        let two = first * 10 + (second - b'0') as usize;
        if (1..=groups).contains(&two) {
            return Some((two, 2));
        }
    }
    if (1..=groups).contains(&first) {
        return Some((first, 1));
    }
    None
}
