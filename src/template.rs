//! Text templates for the `go-template=` output format.
//!
//! A template is plain text with `{{ ... }}` actions. Supported actions:
//!
//! - `{{.Key}}` / `{{.Value}}` - fields of the entry being rendered
//! - `{{.}}` - the whole entry, rendered as `{key value}`
//! - `{{"\n"}}`, `` {{`raw`}} `` - string constants
//! - `{{/* comment */}}` - produces nothing
//! - `{{- ` / ` -}}` - trim whitespace before / after the action
//!
//! # Examples
//!
//! ```
//! use hcl_read::template::{Entry, Template};
//!
//! let template = Template::parse("{{.Key}}={{.Value}}").unwrap();
//! let entry = Entry { key: "x.y", value: "5" };
//! assert_eq!(template.render(&entry).unwrap(), "x.y=5");
//! ```

use thiserror::Error;

/// A template that could not be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("template: output:{line}: {message}")]
pub struct TemplateError {
    pub line: usize,
    pub message: String,
}

/// A template that compiled but failed while rendering an entry.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("template: output:{line}: executing \"output\": {message}")]
pub struct ExecError {
    pub line: usize,
    pub message: String,
}

/// The data exposed to one template execution.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    /// `None` is the entry itself (`{{.}}`)
    Field { name: Option<String>, line: usize },
    Constant(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut nodes = vec![];
        let mut rest = source;
        let mut line = 1;
        let mut trim_next = false;

        while !rest.is_empty() {
            let Some(open) = rest.find("{{") else {
                push_text(&mut nodes, rest, trim_next, false);
                break;
            };

            let after_open = &rest[open + 2..];
            let trim_left = has_trim_marker(after_open);
            push_text(&mut nodes, &rest[..open], trim_next, trim_left);
            line += rest[..open].matches('\n').count();

            let Some(close) = find_close(after_open) else {
                return Err(TemplateError {
                    line,
                    message: "unclosed action".into(),
                });
            };

            let mut action = &after_open[..close];
            if trim_left {
                action = &action[1..];
            }
            let trim_right = match action.strip_suffix('-') {
                Some(stripped) if stripped.ends_with(char::is_whitespace) => {
                    action = stripped;
                    true
                }
                _ => false,
            };

            if let Some(node) = parse_action(action.trim(), line)? {
                nodes.push(node);
            }

            line += after_open[..close].matches('\n').count();
            rest = &after_open[close + 2..];
            trim_next = trim_right;
        }

        Ok(Template { nodes })
    }

    /// Render the template once for `entry`.
    pub fn render(&self, entry: &Entry<'_>) -> Result<String, ExecError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) | Node::Constant(text) => out.push_str(text),
                Node::Field { name: None, .. } => {
                    out.push_str(&format!("{{{} {}}}", entry.key, entry.value));
                }
                Node::Field {
                    name: Some(name),
                    line,
                } => match name.as_str() {
                    "Key" => out.push_str(entry.key),
                    "Value" => out.push_str(entry.value),
                    _ => {
                        return Err(ExecError {
                            line: *line,
                            message: format!("can't evaluate field {}", name),
                        });
                    }
                },
            }
        }
        Ok(out)
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// `{{-` only trims when the dash is followed by whitespace; `{{-3}}` is a
/// negative number.
fn has_trim_marker(after_open: &str) -> bool {
    after_open
        .strip_prefix('-')
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Offset of the `}}` closing the action, skipping string constants.
fn find_close(action: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in action.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' && q == '"' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '`' => quote = Some(ch),
            '}' if action[i..].starts_with("}}") => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_action(action: &str, line: usize) -> Result<Option<Node>, TemplateError> {
    let error = |message: String| TemplateError { line, message };

    if let Some(comment) = action.strip_prefix("/*") {
        return if comment.ends_with("*/") {
            Ok(None)
        } else {
            Err(error("unclosed comment".into()))
        };
    }

    match action.chars().next() {
        None => Err(error("missing value for command".into())),
        Some('.') if action == "." => Ok(Some(Node::Field { name: None, line })),
        Some('.') => {
            let name = &action[1..];
            if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                Ok(Some(Node::Field {
                    name: Some(name.to_string()),
                    line,
                }))
            } else {
                Err(error(format!("unexpected {:?} in command", action)))
            }
        }
        Some('"') => unquote(action)
            .map(|s| Some(Node::Constant(s)))
            .ok_or_else(|| error(format!("invalid string constant {}", action))),
        Some('`') => match action[1..].strip_suffix('`') {
            Some(raw) if !raw.contains('`') => Ok(Some(Node::Constant(raw.to_string()))),
            _ => Err(error(format!("invalid raw string constant {}", action))),
        },
        Some(c) if c.is_alphabetic() => {
            let word: String = action
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            Err(error(format!("function {:?} not defined", word)))
        }
        Some(_) => Err(error(format!("unexpected {:?} in command", action))),
    }
}

/// Decode a double-quoted constant. The closing quote must end the action.
fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::new();
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => return None,
            '\\' => out.push(match chars.next()? {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '"' => '"',
                '\\' => '\\',
                _ => return None,
            }),
            c => out.push(c),
        }
    }
    Some(out)
}
