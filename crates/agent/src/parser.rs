//! Reply parser: tells a conversational reply apart from an action.
//!
//! An action is the first fenced block in the reply:
//!
//! ````text
//! ```python
//! '''
//! Plan: list the directory.
//! '''
//! import os
//! print(os.listdir("."))
//! ```
//! ````
//!
//! The optional `'''` block at the top of the fence is the model's reasoning;
//! everything after it is the code to run. A fence that is never closed, or
//! one that holds no code, makes the whole reply plain text.

const FENCE: &str = "```";
const REASONING: &str = "'''";

/// A parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Talk only; shown to the user as is.
    Text(String),

    /// A script proposal awaiting confirmation.
    Action {
        reasoning: Option<String>,
        code: String,
    },
}

impl Reply {
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Action { .. } => None,
        }
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Action { reasoning, .. } => reasoning.as_deref(),
            Self::Text(_) => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Action { code, .. } => Some(code),
            Self::Text(_) => None,
        }
    }
}

/// Split a raw reply into [`Reply::Text`] or [`Reply::Action`].
///
/// Only the first opening fence and the first closing fence after it count.
pub fn parse_reply(raw: &str) -> Reply {
    let Some(open) = raw.find(FENCE) else {
        return Reply::Text(raw.to_string());
    };

    let body_start = open + FENCE.len();
    let Some(close) = raw[body_start..].find(FENCE) else {
        return Reply::Text(raw.to_string());
    };

    let candidate = strip_info_string(&raw[body_start..body_start + close]).trim();
    let (reasoning, code) = split_reasoning(candidate);

    if code.is_empty() {
        return Reply::Text(raw.to_string());
    }

    Reply::Action {
        reasoning: reasoning.map(String::from),
        code: code.to_string(),
    }
}

/// Drop a language tag such as `python` from the opening fence line.
fn strip_info_string(region: &str) -> &str {
    match region.split_once('\n') {
        Some((first, rest)) if is_info_string(first.trim_end()) => rest,
        _ => region,
    }
}

/// A tag is a bare token like `python`, `c++` or `objective-c`, or anything
/// that starts with an invisible format character (some models emit
/// `\u{200b}(code)`). Lines such as `print(1)` are code, not tags.
fn is_info_string(line: &str) -> bool {
    if line.chars().any(char::is_whitespace) {
        return false;
    }
    line.starts_with(is_invisible)
        || line
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '+' | '-' | '_' | '.' | '#'))
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{2060}' | '\u{feff}')
}

/// Separate a leading `'''...'''` block. Unclosed, it stays part of the code.
fn split_reasoning(candidate: &str) -> (Option<&str>, &str) {
    let Some(after_open) = candidate.strip_prefix(REASONING) else {
        return (None, candidate);
    };

    match after_open.find(REASONING) {
        Some(end) => {
            let reasoning = after_open[..end].trim();
            let code = after_open[end + REASONING.len()..].trim();
            ((!reasoning.is_empty()).then_some(reasoning), code)
        }
        None => (None, candidate),
    }
}
