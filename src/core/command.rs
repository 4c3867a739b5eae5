//! Command model: registered commands, their arguments, modules and the
//! per-invocation context.
//!
//! Commands are built once at registration time from declarative specs
//! ([`ModuleSpec`], [`CommandSpec`], [`ArgSpec`]) and are immutable
//! afterwards. The handler is a plain closure and all metadata travels as
//! data, so dispatch never needs any runtime reflection.

use std::any::{Any, TypeId};
use std::sync::Arc;

use super::{ArgValue, ArgumentConverter, ParsedArgs, Realm, TargetPermission};

/// The identity of whoever submitted a line of input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Caller {
    /// The server console; no player is attached.
    Console,
    /// A connected player.
    Player {
        /// Host-assigned player id.
        id: u64,
        /// Display name.
        name: String,
    },
}

impl Caller {
    /// Create a player caller.
    pub fn player(id: u64, name: impl Into<String>) -> Self {
        Caller::Player { id, name: name.into() }
    }

    /// Whether this caller is the server console.
    pub fn is_console(&self) -> bool {
        matches!(self, Caller::Console)
    }

    /// Display name for logs and messages.
    pub fn display_name(&self) -> &str {
        match self {
            Caller::Console => "console",
            Caller::Player { name, .. } => name,
        }
    }
}

/// Type alias for command handler closures.
///
/// Handlers receive the invocation context and the typed argument values in
/// declaration order. A handler that panics is caught by the dispatcher and
/// reported as a failed command.
pub type CommandHandler = Box<dyn Fn(&CommandContext, &ParsedArgs) + Send + Sync>;

/// One formal parameter of a registered command.
///
/// The converter is bound when the command registers, so dispatch never
/// consults the converter registry.
pub struct CommandArgument {
    name: Box<str>,
    value_type: TypeId,
    type_name: &'static str,
    converter: Arc<dyn ArgumentConverter>,
    remainder: bool,
    variadic: bool,
    default: Option<ArgValue>,
}

impl CommandArgument {
    pub(crate) fn new(
        name: Box<str>,
        value_type: TypeId,
        type_name: &'static str,
        converter: Arc<dyn ArgumentConverter>,
        remainder: bool,
        variadic: bool,
        default: Option<ArgValue>,
    ) -> Self {
        Self { name, value_type, type_name, converter, remainder, variadic, default }
    }

    /// The parameter name, used in failure messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value type (the element type for variadic arguments).
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// The Rust name of the declared value type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The converter bound at registration time.
    pub fn converter(&self) -> &Arc<dyn ArgumentConverter> {
        &self.converter
    }

    /// Whether this argument consumes and space-joins all remaining tokens.
    pub fn is_remainder(&self) -> bool {
        self.remainder
    }

    /// Whether this argument consumes all remaining tokens individually.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// The default value used when tokens run out, if any.
    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }
}

#[cfg(test)]
impl CommandArgument {
    pub(crate) fn as_remainder(mut self) -> Self {
        self.remainder = true;
        self
    }

    pub(crate) fn as_variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub(crate) fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(ArgValue::new(value));
        self
    }
}

impl std::fmt::Debug for CommandArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandArgument")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("remainder", &self.remainder)
            .field("variadic", &self.variadic)
            .field("has_default", &self.default.is_some())
            .finish_non_exhaustive()
    }
}

/// A registered command.
///
/// Identity and metadata are fixed at registration time. The owning
/// module's category, permission name and prefix are denormalized onto the
/// command so a command can be inspected without chasing its module.
pub struct Command {
    name: Box<str>,
    full_name: Box<str>,
    prefix: Option<Box<str>>,
    category: Box<str>,
    permission_name: Box<str>,
    aliases: Vec<Box<str>>,
    description: Box<str>,
    hidden: bool,
    target_permission: Option<TargetPermission>,
    realm: Realm,
    arguments: Vec<CommandArgument>,
    handler: CommandHandler,
}

impl Command {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: Box<str>,
        prefix: Option<Box<str>>,
        category: Box<str>,
        permission_name: Box<str>,
        aliases: Vec<Box<str>>,
        description: Box<str>,
        hidden: bool,
        target_permission: Option<TargetPermission>,
        realm: Realm,
        arguments: Vec<CommandArgument>,
        handler: CommandHandler,
    ) -> Self {
        let full_name = match &prefix {
            Some(prefix) => format!("{} {}", prefix, name).to_lowercase().into(),
            None => name.to_lowercase().into(),
        };

        Self {
            name,
            full_name,
            prefix,
            category,
            permission_name,
            aliases,
            description,
            hidden,
            target_permission,
            realm,
            arguments,
            handler,
        }
    }

    /// The command name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowercased full name: `"<prefix> <name>"` for prefixed commands,
    /// `"<name>"` otherwise.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The owning module's prefix as declared, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The owning module's display category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The owning module's permission name.
    pub fn permission_name(&self) -> &str {
        &self.permission_name
    }

    /// Alternative names, as declared.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|a| a.as_ref())
    }

    /// Description text for help output.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this command should be hidden from listings and completion.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Target-permission rule, if the command targets other players.
    pub fn target_permission(&self) -> Option<TargetPermission> {
        self.target_permission
    }

    /// The realm this command is meant to run on.
    pub fn realm(&self) -> Realm {
        self.realm
    }

    /// The declared arguments in order.
    pub fn arguments(&self) -> &[CommandArgument] {
        &self.arguments
    }

    /// Whether `candidate` matches the declared name or one of the declared
    /// aliases with exact case.
    pub(crate) fn matches_exact(&self, candidate: &str) -> bool {
        *self.name == *candidate || self.aliases.iter().any(|a| **a == *candidate)
    }

    /// Invoke the handler.
    pub(crate) fn invoke(&self, ctx: &CommandContext, args: &ParsedArgs) {
        (self.handler)(ctx, args);
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("full_name", &self.full_name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .field("realm", &self.realm)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// A registered command module: one instance per registered [`ModuleSpec`].
#[derive(Debug)]
pub struct CommandModule {
    category: Box<str>,
    permission_name: Box<str>,
    prefix: Option<Box<str>>,
    commands: Vec<Arc<Command>>,
}

impl CommandModule {
    pub(crate) fn new(
        category: Box<str>,
        permission_name: Box<str>,
        prefix: Option<Box<str>>,
    ) -> Self {
        Self { category, permission_name, prefix, commands: Vec::new() }
    }

    /// The display category, `"Uncategorized"` when none was declared.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The lowercase name used to build permission identifiers.
    pub fn permission_name(&self) -> &str {
        &self.permission_name
    }

    /// The command prefix, if this module declares one.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The commands registered from this module.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    pub(crate) fn push(&mut self, command: Arc<Command>) {
        self.commands.push(command);
    }
}

/// Per-invocation context handed to handlers and converters.
///
/// Constructed fresh for every dispatch; cloning is cheap because the
/// command is shared.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Who submitted the input line.
    pub caller: Caller,
    /// The command being executed.
    pub command: Arc<Command>,
    /// The raw line as received, prefix included.
    pub message: String,
    /// Whether the line came from the server console rather than chat.
    pub ran_from_console: bool,
    /// The raw argument tokens, before conversion.
    pub raw_arguments: Vec<String>,
}

/// Declares one formal parameter of a command.
///
/// # Examples
///
/// ```
/// use chat_commands::core::ArgSpec;
///
/// let target = ArgSpec::of::<String>("target");
/// let reason = ArgSpec::of::<String>("reason").remainder();
/// let minutes = ArgSpec::of::<u32>("minutes").default_value(5u32);
/// ```
pub struct ArgSpec {
    pub(crate) name: Box<str>,
    pub(crate) value_type: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) remainder: bool,
    pub(crate) variadic: bool,
    pub(crate) default: Option<ArgValue>,
}

impl ArgSpec {
    /// Declare a parameter of type `T`.
    ///
    /// `T` must have a registered converter by the time the command
    /// registers; for a variadic parameter, `T` is the element type.
    pub fn of<T: Any + Send + Sync>(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            value_type: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            remainder: false,
            variadic: false,
            default: None,
        }
    }

    /// Mark this parameter as the remainder: it consumes all remaining
    /// tokens space-joined into one string. Only valid on a trailing
    /// `String` parameter.
    pub fn remainder(mut self) -> Self {
        self.remainder = true;
        self
    }

    /// Mark this parameter as variadic: it consumes every remaining token
    /// individually. Only valid on the last parameter.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Provide a default used when the caller supplies no token for this
    /// parameter. The value's type must match the declared type.
    pub fn default_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(ArgValue::new(value));
        self
    }
}

impl std::fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgSpec")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("remainder", &self.remainder)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

/// Declares one command: name, metadata, parameters and handler.
///
/// # Examples
///
/// ```
/// use chat_commands::core::{ArgSpec, CommandSpec, Realm};
///
/// let kick = CommandSpec::new("kick", |ctx, args| {
///     let target: &String = args.get(0).unwrap();
///     let _ = (ctx, target);
/// })
/// .realm(Realm::Server)
/// .description("Kick a player from the server")
/// .alias("boot")
/// .arg(ArgSpec::of::<String>("target"));
/// ```
pub struct CommandSpec {
    pub(crate) name: Box<str>,
    pub(crate) realm: Realm,
    pub(crate) description: Box<str>,
    pub(crate) hidden: bool,
    pub(crate) target_permission: Option<TargetPermission>,
    pub(crate) aliases: Vec<Box<str>>,
    pub(crate) args: Vec<ArgSpec>,
    pub(crate) handler: CommandHandler,
}

impl CommandSpec {
    /// Declare a command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandContext, &ParsedArgs) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            realm: Realm::default(),
            description: "".into(),
            hidden: false,
            target_permission: None,
            aliases: Vec::new(),
            args: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Set the execution realm.
    pub fn realm(mut self, realm: Realm) -> Self {
        self.realm = realm;
        self
    }

    /// Set the description text.
    pub fn description(mut self, description: impl Into<Box<str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an alias.
    pub fn alias(mut self, alias: impl Into<Box<str>>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Hide this command from listings and completion.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the target-permission rule.
    pub fn target_permission(mut self, permission: TargetPermission) -> Self {
        self.target_permission = Some(permission);
        self
    }

    /// Append a parameter declaration.
    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("realm", &self.realm)
            .field("aliases", &self.aliases)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Declares a module: a category of commands sharing permission naming and
/// an optional prefix.
///
/// # Examples
///
/// ```
/// use chat_commands::core::{CommandSpec, ModuleSpec};
///
/// let module = ModuleSpec::new("Administration")
///     .permission_name("admin")
///     .prefix("admin")
///     .command(CommandSpec::new("reload", |_ctx, _args| {}));
/// ```
pub struct ModuleSpec {
    pub(crate) category: Box<str>,
    pub(crate) permission_name: Option<Box<str>>,
    pub(crate) prefix: Option<Box<str>>,
    pub(crate) commands: Vec<CommandSpec>,
}

impl ModuleSpec {
    /// Declare a module with the given display category.
    pub fn new(category: impl Into<Box<str>>) -> Self {
        Self {
            category: category.into(),
            permission_name: None,
            prefix: None,
            commands: Vec::new(),
        }
    }

    /// Declare a module with the default `"Uncategorized"` category.
    pub fn uncategorized() -> Self {
        Self::new("Uncategorized")
    }

    /// Set the permission name (lowercase `a-z0-9_-`). Derived from the
    /// category when not set.
    pub fn permission_name(mut self, name: impl Into<Box<str>>) -> Self {
        self.permission_name = Some(name.into());
        self
    }

    /// Set the command prefix. Commands in a prefixed module are invoked as
    /// `<prefix> <name>`.
    pub fn prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append a command declaration.
    pub fn command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    /// The permission name: explicit, or derived from the category by
    /// lowercasing and replacing whitespace runs with `-`.
    pub(crate) fn effective_permission_name(&self) -> Box<str> {
        match &self.permission_name {
            Some(name) => name.clone(),
            None => self
                .category
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .into(),
        }
    }
}

impl std::fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("category", &self.category)
            .field("permission_name", &self.permission_name)
            .field("prefix", &self.prefix)
            .field("commands", &self.commands)
            .finish()
    }
}
