//! Character-level scanning for search queries.

/// Lexer state while chunking a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Unquoted,
    /// Inside a span opened by this quote character.
    Quoted(char),
}

fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

/// Split a query into whitespace separated chunks, keeping quoted spans
/// together.
///
/// A backslash followed by the active quote character is kept literally and
/// does not close the span. Whitespace right after a word ending in `:` does
/// not end the chunk, so `key: value` stays one chunk.
pub fn split_search_into_tokens(query: &str) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut end_of_prev_word: Option<char> = None;
    let mut state = LexState::Unquoted;

    let mut idx = 0;
    while idx < chars.len() {
        let c = chars[idx];
        let next = chars.get(idx + 1).copied();
        token.push(c);

        if let Some(n) = next {
            if !c.is_whitespace() && n.is_whitespace() {
                end_of_prev_word = Some(c);
            }
        }

        if c.is_whitespace()
            && state == LexState::Unquoted
            && end_of_prev_word != Some(':')
            && !is_blank(&token)
        {
            tokens.push(token.trim().to_string());
            token.clear();
        }

        if c == '\'' || c == '"' {
            state = match state {
                LexState::Unquoted => LexState::Quoted(c),
                LexState::Quoted(q) if q == c => LexState::Unquoted,
                quoted => quoted,
            };
        }

        if let LexState::Quoted(q) = state {
            if c == '\\' && next == Some(q) {
                token.push(q);
                idx += 1;
            }
        }

        idx += 1;
    }

    let trimmed = token.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }

    tokens
}

/// Strip matching runs of double quotes from both ends.
///
/// A trailing quote preceded by a backslash is escaped and is kept.
pub fn remove_surrounding_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let length = chars.len();
    if length <= 1 {
        return text.to_string();
    }

    let mut left = 0;
    while 2 * left <= length && chars.get(left) == Some(&'"') {
        left += 1;
    }

    let mut right = length - 1;
    while 2 * right >= length && chars[right] == '"' && chars[right - 1] != '\\' {
        right -= 1;
    }

    if left > right {
        return String::new();
    }
    chars[left..=right].iter().collect()
}

/// Escape `*` so a value inserted by the UI is not read as a wildcard.
pub fn escape_filter_value(value: &str) -> String {
    value.replace('*', "\\*")
}

/// Escape bare double quotes, leaving existing escape sequences alone.
pub fn escape_double_quotes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Whether a value has to be wrapped in quotes when serialized.
pub(crate) fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '\\' | '"'))
}
