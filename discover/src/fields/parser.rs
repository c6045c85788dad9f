//! Field expression parser: `name(arg0,arg1,...)` calls and their arguments.

use std::sync::OnceLock;

use regex::Regex;

/// A parsed function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFunction {
    pub name: String,
    pub arguments: Vec<String>,
}

/// Functions whose arguments may contain a quoted string with commas in it.
const QUOTED_ARGUMENT_FUNCTIONS: [&str; 3] = ["to_other", "count_if", "spans_histogram"];

fn aggregate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)\((.*)?\)$").expect("aggregate pattern is valid"))
}

fn aggregate_base() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+\((.*)?\)").expect("aggregate base pattern is valid"))
}

/// Parse `name(args)` into a function name and its arguments.
///
/// Returns `None` for anything that is not a single function call; the
/// caller then treats the string as a bare field.
pub fn parse_function(field: &str) -> Option<ParsedFunction> {
    let captures = aggregate_pattern().captures(field)?;
    let name = captures.get(1)?.as_str();
    let columns = captures.get(2).map(|m| m.as_str()).unwrap_or("");

    Some(ParsedFunction {
        name: name.to_string(),
        arguments: parse_arguments(name, columns),
    })
}

/// True if the text contains a function call anywhere in it.
pub(crate) fn contains_function_call(text: &str) -> bool {
    aggregate_base().is_match(text)
}

/// Lexer state while scanning an argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgState {
    /// Outside of any quoted string.
    Plain,
    /// Inside a quoted string.
    Quoted,
    /// Inside a quoted string, right after a backslash.
    Escaped,
}

/// Split a function's argument text into individual arguments.
///
/// Most functions take plain comma separated arguments. The functions in
/// [`QUOTED_ARGUMENT_FUNCTIONS`] can take a quoted string that itself
/// contains commas, so those are scanned character by character. An
/// unterminated quote keeps the scanner in the quoted state and the final
/// segment is flushed as-is.
pub fn parse_arguments(function: &str, columns: &str) -> Vec<String> {
    if !QUOTED_ARGUMENT_FUNCTIONS.contains(&function) || columns.is_empty() {
        if columns.is_empty() {
            return Vec::new();
        }
        return columns.split(',').map(|arg| arg.trim().to_string()).collect();
    }

    let mut args = Vec::new();
    let mut state = ArgState::Plain;
    // Byte offsets of the current argument start and the scan position.
    let mut start = 0;

    for (pos, c) in columns.char_indices() {
        let at_start = pos == start;
        state = match (state, c) {
            (ArgState::Plain, '"') if at_start => ArgState::Quoted,
            (ArgState::Plain, ' ') if at_start => {
                // leading space, skip it
                start += c.len_utf8();
                ArgState::Plain
            }
            (ArgState::Plain, ',') => {
                args.push(columns[start..pos].to_string());
                start = pos + c.len_utf8();
                ArgState::Plain
            }
            (ArgState::Plain, _) => ArgState::Plain,
            (ArgState::Quoted, '\\') => ArgState::Escaped,
            (ArgState::Quoted, '"') => ArgState::Plain,
            (ArgState::Quoted, _) => ArgState::Quoted,
            (ArgState::Escaped, _) => ArgState::Quoted,
        };
    }

    if start != columns.len() {
        args.push(columns[start..].to_string());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_function_simple() {
        let parsed = parse_function("p75(transaction.duration)").unwrap();
        assert_eq!(parsed.name, "p75");
        assert_eq!(parsed.arguments, vec!["transaction.duration"]);
    }

    #[test]
    fn test_parse_function_no_args() {
        let parsed = parse_function("count()").unwrap();
        assert_eq!(parsed.name, "count");
        assert!(parsed.arguments.is_empty());
    }

    #[test]
    fn test_parse_function_trims_plain_arguments() {
        let parsed = parse_function("percentile(transaction.duration, 0.5)").unwrap();
        assert_eq!(parsed.arguments, vec!["transaction.duration", "0.5"]);
    }

    #[test]
    fn test_parse_function_rejects_non_calls() {
        assert!(parse_function("transaction.duration").is_none());
        assert!(parse_function("count() + 1").is_none());
        assert!(parse_function("equation|count() / 2").is_none());
    }

    #[test]
    fn test_quoted_argument_with_comma() {
        let args = parse_arguments("to_other", r#"release,"a,b",others,current"#);
        assert_eq!(args, vec!["release", r#""a,b""#, "others", "current"]);
    }

    #[test]
    fn test_quoted_argument_escape() {
        let args = parse_arguments("count_if", r#"message,equals,"say \"hi\", ok""#);
        assert_eq!(args, vec!["message", "equals", r#""say \"hi\", ok""#]);
    }

    #[test]
    fn test_quoted_argument_leading_spaces() {
        let args = parse_arguments("count_if", r#"transaction.duration,  greater, 300"#);
        assert_eq!(args, vec!["transaction.duration", "greater", "300"]);
    }

    #[test]
    fn test_unterminated_quote_is_flushed() {
        let args = parse_arguments("to_other", r#"release,"unterminated,value"#);
        assert_eq!(args, vec!["release", r#""unterminated,value"#]);
    }

    #[test]
    fn test_plain_function_splits_naively() {
        let args = parse_arguments("percentile", r#"a,"b,c""#);
        assert_eq!(args, vec!["a", "\"b", "c\""]);
    }

    #[test]
    fn test_contains_function_call() {
        assert!(contains_function_call("count() / 2"));
        assert!(!contains_function_call("transaction.duration * 2"));
    }
}
