//! Tokenizer for chat and console input.
//!
//! Splits one line of raw text into tokens with C-shell-like quoting:
//! whitespace separates tokens, `\` escapes the next character, and `'...'`
//! or `"..."` delimit quoted spans. A quote character only opens or closes a
//! span at a token boundary, so apostrophes inside words stay literal.

/// Tokenize a line of input into an ordered list of tokens.
///
/// # Syntax
///
/// - Whitespace (including NUL) separates tokens outside quotes
/// - `\` escapes the next character; a trailing `\` is dropped
/// - `'...'` and `"..."` preserve whitespace; the two kinds do not nest,
///   so a `'` inside `"..."` is literal and vice versa
/// - A quote only delimits a span when the current token is empty (opening)
///   or when it is followed by whitespace or end of input (closing);
///   anywhere else it is a literal character
/// - If the line ends inside an open quote, trailing whitespace captured in
///   that quote is trimmed from the final token
///
/// An empty or whitespace-only line yields a single empty token; callers
/// must treat that as "no input".
///
/// # Examples
///
/// ```
/// use chat_commands::core::tokenize;
///
/// assert_eq!(tokenize(r#"say "hello world""#), vec!["say", "hello world"]);
/// assert_eq!(tokenize("don't stop"), vec!["don't", "stop"]);
/// assert_eq!(tokenize("kick player reason"), vec!["kick", "player", "reason"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    let mut in_quote = false;
    let mut in_apostrophes = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        // A quote delimits a span only at a token boundary: the current
        // token is empty, or the quote is followed by whitespace or EOL.
        let at_boundary =
            |current: &String| current.is_empty() || chars.get(i + 1).is_none_or(|&n| is_space(n));

        match c {
            '\\' => escaped = true,
            '\'' => {
                if !in_quote && at_boundary(&current) {
                    in_apostrophes = !in_apostrophes;
                } else {
                    current.push(c);
                }
            }
            '"' => {
                if !in_apostrophes && at_boundary(&current) {
                    in_quote = !in_quote;
                } else {
                    current.push(c);
                }
            }
            _ if is_space(c) => {
                if in_quote || in_apostrophes {
                    current.push(c);
                } else if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    // An unterminated quote swallows the rest of the line; recover a clean
    // last token by trimming the whitespace it captured.
    if in_quote || in_apostrophes {
        let trimmed = current.trim_end_matches(is_space).len();
        current.truncate(trimmed);
    }

    if !current.is_empty() || tokens.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[inline]
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}
