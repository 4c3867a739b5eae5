//! Argument parser: turns raw tokens into typed values for one command.
//!
//! Consumes tokens left to right against the command's declared arguments.
//! A remainder argument joins every remaining token into one string; a
//! variadic argument converts every remaining token individually. Both are
//! always last, so either one terminates parsing.

use super::{ArgValue, CommandArgument, CommandContext, ParsedArgs};

/// A structured argument-parsing failure.
///
/// The message names the offending text, the target parameter and the
/// expected type label, and is suitable for showing to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable failure reason.
    pub message: String,
}

impl ParseError {
    fn missing(arg: &CommandArgument) -> Self {
        Self {
            message: format!(
                "Missing argument '{}': expected '{}'",
                arg.name(),
                arg.converter().type_label()
            ),
        }
    }

    fn conversion(arg: &CommandArgument, raw: &str) -> Self {
        Self {
            message: format!(
                "Failed to parse '{}' into '{}' (expected: {}).",
                raw,
                arg.name(),
                arg.converter().type_label()
            ),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse raw tokens into typed values for the given declared arguments.
///
/// One token is consumed per plain argument, in order. When tokens run out,
/// remaining arguments fall back to their defaults or the parse fails. A
/// command with no declared arguments succeeds regardless of surplus
/// tokens; whether to reject the surplus is the caller's decision.
pub fn parse(
    ctx: &CommandContext,
    arguments: &[CommandArgument],
    raw: &[String],
) -> Result<ParsedArgs, ParseError> {
    if arguments.is_empty() {
        return Ok(ParsedArgs::empty());
    }

    let mut values: Vec<ArgValue> = Vec::with_capacity(arguments.len());
    let mut current = 0;

    for arg in arguments {
        if current >= raw.len() {
            match arg.default_value() {
                Some(default) => values.push(default.clone()),
                None => return Err(ParseError::missing(arg)),
            }
            continue;
        }

        if arg.is_remainder() {
            // Join everything left into one string; remainder is always the
            // last argument, so a success ends the parse.
            let remainder = raw[current..].join(" ");
            match arg.converter().try_convert(ctx, &remainder) {
                Some(value) => values.push(value),
                None => return Err(ParseError::conversion(arg, &remainder)),
            }
            return Ok(ParsedArgs::new(values));
        }

        if arg.is_variadic() {
            let mut items = Vec::with_capacity(raw.len() - current);
            for token in &raw[current..] {
                match arg.converter().try_convert(ctx, token) {
                    Some(value) => items.push(value),
                    None => return Err(ParseError::conversion(arg, token)),
                }
            }
            values.push(ArgValue::new(items));
            return Ok(ParsedArgs::new(values));
        }

        let token = &raw[current];
        match arg.converter().try_convert(ctx, token) {
            Some(value) => values.push(value),
            None => return Err(ParseError::conversion(arg, token)),
        }
        current += 1;
    }

    Ok(ParsedArgs::new(values))
}
