//! Core command model, registration and dispatch.
//!
//! This module provides the fundamental building blocks:
//! - [`CommandDispatcher`] - Resolves and executes lines of chat input
//! - [`CommandRegistry`] - Central registry for modules and commands
//! - [`ModuleSpec`], [`CommandSpec`], [`ArgSpec`] - Declarative registration
//! - [`ArgumentConverter`] and [`ConverterRegistry`] - Token-to-value conversion
//! - [`tokenize`] - Quote-aware command tokenizer
//! - Events for observing execution outcomes

mod command;
mod convert;
mod converters;
mod dispatcher;
mod events;
mod parser;
mod permissions;
mod registry;
mod tokenizer;

pub use command::{
    ArgSpec, Caller, Command, CommandArgument, CommandContext, CommandHandler, CommandModule,
    CommandSpec, ModuleSpec,
};
pub use convert::{ArgValue, ArgumentConverter, ConverterRegistry, ParsedArgs};
pub use converters::{
    BoolConverter, CharConverter, F32Converter, F64Converter, I8Converter, I16Converter,
    I32Converter, I64Converter, StringConverter, U8Converter, U16Converter, U32Converter,
    U64Converter, register_builtin_converters,
};
pub use dispatcher::CommandDispatcher;
pub use events::{CommandExecutedEvent, CommandFailedEvent, CommandFailureReason, ListenerId};
pub use parser::{ParseError, parse};
pub use permissions::{Realm, TargetPermission};
pub use registry::{CommandRegistry, RegistryError};
pub use tokenizer::tokenize;

#[cfg(test)]
pub(crate) mod test_support {
    use std::any::{Any, TypeId};
    use std::sync::Arc;

    use super::{Caller, Command, CommandArgument, CommandContext, ConverterRegistry, Realm};

    /// A context around a dummy command, for exercising converters and the
    /// parser without a dispatcher.
    pub(crate) fn context_for_tests() -> CommandContext {
        let command = Arc::new(Command::new(
            "probe".into(),
            None,
            "Test".into(),
            "test".into(),
            Vec::new(),
            "".into(),
            false,
            None,
            Realm::Shared,
            Vec::new(),
            Box::new(|_ctx, _args| {}),
        ));

        CommandContext {
            caller: Caller::Console,
            command,
            message: String::new(),
            ran_from_console: true,
            raw_arguments: Vec::new(),
        }
    }

    /// A plain argument of type `T`, bound to its built-in converter.
    pub(crate) fn argument<T: Any + Send + Sync>(name: &str) -> CommandArgument {
        let converters = ConverterRegistry::with_builtins();
        let converter = converters
            .get::<T>()
            .unwrap_or_else(|| panic!("no built-in converter for {}", std::any::type_name::<T>()))
            .clone();

        CommandArgument::new(
            name.into(),
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            converter,
            false,
            false,
            None,
        )
    }

    pub(crate) fn string_argument(name: &str) -> CommandArgument {
        argument::<String>(name)
    }
}
