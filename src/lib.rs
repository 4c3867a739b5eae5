//! A chat and console command framework for multiplayer game servers.
//!
//! Commands are declared in modules, registered once at startup and
//! dispatched from lines of chat or console input:
//!
//! - **CommandDispatcher**: Resolves prefixed input lines and executes handlers
//! - **ModuleSpec / CommandSpec / ArgSpec**: Declarative command registration
//! - **ArgumentConverter**: Pluggable string-to-typed-value conversion
//! - **Events**: Observe executed and failed commands from game code
//!
//! # Quick Start
//!
//! ```
//! use chat_commands::prelude::*;
//!
//! let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
//!
//! dispatcher
//!     .register_module(
//!         ModuleSpec::new("Moderation")
//!             .command(
//!                 CommandSpec::new("kick", |ctx, args| {
//!                     let target: &String = args.get(0).unwrap();
//!                     println!("{} kicked {}", ctx.caller.display_name(), target);
//!                 })
//!                 .description("Kick a player from the server")
//!                 .realm(Realm::Server)
//!                 .arg(ArgSpec::of::<String>("target")),
//!             ),
//!     )
//!     .unwrap();
//!
//! dispatcher.on_failed(|event| {
//!     eprintln!("{}", event.message);
//! });
//!
//! dispatcher.handle_line(&Caller::player(1, "Gordon"), "!kick Barney");
//! ```

// Core module (always available)
pub mod core;

// Configuration with RON persistence
pub mod config;

// Re-export core types at crate root for convenience
pub use config::{ChatConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use core::{
    ArgSpec, ArgValue, ArgumentConverter, Caller, Command, CommandArgument, CommandContext,
    CommandDispatcher, CommandExecutedEvent, CommandFailedEvent, CommandFailureReason,
    CommandHandler, CommandModule, CommandRegistry, CommandSpec, ConverterRegistry, ListenerId,
    ModuleSpec, ParseError, ParsedArgs, Realm, RegistryError, TargetPermission, tokenize,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ChatConfig;
    pub use crate::core::{
        ArgSpec, ArgValue, ArgumentConverter, Caller, CommandContext, CommandDispatcher,
        CommandExecutedEvent, CommandFailedEvent, CommandFailureReason, CommandSpec, ModuleSpec,
        ParsedArgs, Realm, TargetPermission,
    };
}
