//! Built-in argument converters for primitive value types.
//!
//! Numeric parsing is locale-invariant (`str::parse`). Each converter
//! carries a human-readable type label that only appears in failure
//! messages shown to the command caller.

use std::any::TypeId;

use super::{ArgValue, ArgumentConverter, CommandContext, ConverterRegistry};

macro_rules! number_converter {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $label:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl ArgumentConverter for $name {
            fn converted_type(&self) -> TypeId {
                TypeId::of::<$ty>()
            }

            fn type_label(&self) -> &str {
                $label
            }

            fn try_convert(&self, _ctx: &CommandContext, input: &str) -> Option<ArgValue> {
                input.trim().parse::<$ty>().ok().map(ArgValue::new)
            }
        }
    };
}

number_converter!(
    /// Converts a token into an unsigned byte.
    U8Converter, u8, "number [0 to 255]"
);
number_converter!(
    /// Converts a token into a signed byte.
    I8Converter, i8, "number [-128 to 127]"
);
number_converter!(
    /// Converts a token into an unsigned 16-bit integer.
    U16Converter, u16, "number [0 to 65535]"
);
number_converter!(
    /// Converts a token into a signed 16-bit integer.
    I16Converter, i16, "number [-32,768 to 32,767]"
);
number_converter!(
    /// Converts a token into an unsigned 32-bit integer.
    U32Converter, u32, "positive number"
);
number_converter!(
    /// Converts a token into a signed 32-bit integer.
    I32Converter, i32, "number"
);
number_converter!(
    /// Converts a token into an unsigned 64-bit integer.
    U64Converter, u64, "positive number"
);
number_converter!(
    /// Converts a token into a signed 64-bit integer.
    I64Converter, i64, "number"
);
number_converter!(
    /// Converts a token into a single-precision float.
    F32Converter, f32, "decimal"
);
number_converter!(
    /// Converts a token into a double-precision float.
    F64Converter, f64, "decimal"
);

/// Converts a token into a boolean.
///
/// Accepts `true`/`false`, `1`/`0` and `yes`/`no`, case-insensitive.
pub struct BoolConverter;

impl ArgumentConverter for BoolConverter {
    fn converted_type(&self) -> TypeId {
        TypeId::of::<bool>()
    }

    fn type_label(&self) -> &str {
        "boolean"
    }

    fn try_convert(&self, _ctx: &CommandContext, input: &str) -> Option<ArgValue> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("true")
            || input == "1"
            || input.eq_ignore_ascii_case("yes")
        {
            return Some(ArgValue::new(true));
        }
        if input.eq_ignore_ascii_case("false")
            || input == "0"
            || input.eq_ignore_ascii_case("no")
        {
            return Some(ArgValue::new(false));
        }
        None
    }
}

/// Converts a token into a single character.
///
/// Fails unless the token is exactly one character long.
pub struct CharConverter;

impl ArgumentConverter for CharConverter {
    fn converted_type(&self) -> TypeId {
        TypeId::of::<char>()
    }

    fn type_label(&self) -> &str {
        "character"
    }

    fn try_convert(&self, _ctx: &CommandContext, input: &str) -> Option<ArgValue> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(ArgValue::new(c)),
            _ => None,
        }
    }
}

/// Passes a token through as a string.
///
/// Whitespace-only input is a conversion failure, not an identity
/// passthrough: every command argument must carry visible content.
pub struct StringConverter;

impl ArgumentConverter for StringConverter {
    fn converted_type(&self) -> TypeId {
        TypeId::of::<String>()
    }

    fn type_label(&self) -> &str {
        "text"
    }

    fn try_convert(&self, _ctx: &CommandContext, input: &str) -> Option<ArgValue> {
        if input.trim().is_empty() {
            return None;
        }
        Some(ArgValue::new(input.to_string()))
    }
}

/// Register every built-in converter.
///
/// Called ahead of user registrations so that first-registration-wins keeps
/// the built-in behavior for primitive types.
pub fn register_builtin_converters(registry: &mut ConverterRegistry) {
    registry.register(BoolConverter);
    registry.register(U8Converter);
    registry.register(I8Converter);
    registry.register(U16Converter);
    registry.register(I16Converter);
    registry.register(U32Converter);
    registry.register(I32Converter);
    registry.register(U64Converter);
    registry.register(I64Converter);
    registry.register(F32Converter);
    registry.register(F64Converter);
    registry.register(CharConverter);
    registry.register(StringConverter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::context_for_tests;

    fn convert<C: ArgumentConverter>(converter: &C, input: &str) -> Option<ArgValue> {
        converter.try_convert(&context_for_tests(), input)
    }

    #[test]
    fn test_bool_converter() {
        for (input, expected) in [
            ("true", true),
            ("TRUE", true),
            ("1", true),
            ("yes", true),
            ("Yes", true),
            ("false", false),
            ("0", false),
            ("NO", false),
        ] {
            let value = convert(&BoolConverter, input).unwrap();
            assert_eq!(value.downcast_ref::<bool>(), Some(&expected), "input {input:?}");
        }

        assert!(convert(&BoolConverter, "maybe").is_none());
        assert!(convert(&BoolConverter, "2").is_none());
    }

    #[test]
    fn test_numeric_converters_roundtrip() {
        let value = convert(&U8Converter, "255").unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&255));

        let value = convert(&I32Converter, "-42").unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&-42));

        let value = convert(&F64Converter, "3.5").unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&3.5));

        let value = convert(&I64Converter, " 10 ").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&10));
    }

    #[test]
    fn test_numeric_converters_reject_garbage() {
        assert!(convert(&U8Converter, "256").is_none());
        assert!(convert(&U8Converter, "-1").is_none());
        assert!(convert(&I32Converter, "not-a-number").is_none());
        assert!(convert(&F32Converter, "one.five").is_none());
        assert!(convert(&U64Converter, "").is_none());
    }

    #[test]
    fn test_char_converter() {
        let value = convert(&CharConverter, "x").unwrap();
        assert_eq!(value.downcast_ref::<char>(), Some(&'x'));

        assert!(convert(&CharConverter, "xy").is_none());
        assert!(convert(&CharConverter, "").is_none());
    }

    #[test]
    fn test_string_converter_rejects_whitespace_only() {
        let value = convert(&StringConverter, "hello").unwrap();
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));

        assert!(convert(&StringConverter, "").is_none());
        assert!(convert(&StringConverter, "   ").is_none());
    }

    #[test]
    fn test_builtin_set_is_complete() {
        let registry = ConverterRegistry::with_builtins();
        assert!(registry.has::<bool>());
        assert!(registry.has::<u8>());
        assert!(registry.has::<i8>());
        assert!(registry.has::<u16>());
        assert!(registry.has::<i16>());
        assert!(registry.has::<u32>());
        assert!(registry.has::<i32>());
        assert!(registry.has::<u64>());
        assert!(registry.has::<i64>());
        assert!(registry.has::<f32>());
        assert!(registry.has::<f64>());
        assert!(registry.has::<char>());
        assert!(registry.has::<String>());
    }
}
