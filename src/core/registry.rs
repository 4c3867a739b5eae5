//! Command registry: registration-time validation and name lookup.
//!
//! Modules register into two independent lookup tables: root commands,
//! reachable by bare name, and categorized commands, reachable as
//! `<prefix> <name>`. Both tables also index aliases, and both are built
//! once at startup and read-only during dispatch.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use super::{
    ArgumentConverter, Command, CommandArgument, CommandModule, CommandSpec, ConverterRegistry,
    ModuleSpec,
};

/// A module-level registration failure.
///
/// Command-level failures are logged and skip only the offending command;
/// these abort the whole module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The permission name contains characters outside `a-z0-9_-`.
    InvalidPermissionName {
        /// The module's display category.
        category: String,
        /// The rejected permission name.
        name: String,
    },
    /// The prefix contains characters outside `A-Za-z0-9_-`.
    InvalidPrefix {
        /// The module's display category.
        category: String,
        /// The rejected prefix.
        prefix: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::InvalidPermissionName { category, name } => write!(
                f,
                "module '{}': permission name '{}' may only contain lowercase a-z, 0-9, - and _",
                category, name
            ),
            RegistryError::InvalidPrefix { category, prefix } => write!(
                f,
                "module '{}': prefix '{}' may only contain A-Z, a-z, 0-9, - and _",
                category, prefix
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Central registry for command modules and argument converters.
///
/// # Examples
///
/// ```
/// use chat_commands::core::{CommandRegistry, CommandSpec, ModuleSpec};
///
/// let mut registry = CommandRegistry::with_builtin_converters();
/// registry
///     .register_module(ModuleSpec::new("General").command(
///         CommandSpec::new("ping", |_ctx, _args| {}),
///     ))
///     .unwrap();
///
/// assert!(registry.try_get_command("ping").is_some());
/// assert!(registry.try_get_command("PING").is_some());
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    converters: ConverterRegistry,
    modules: HashMap<Box<str>, CommandModule>,
    root_commands: HashMap<Box<str>, Arc<Command>>,
    categorized_commands: HashMap<Box<str>, HashMap<Box<str>, Arc<Command>>>,
}

impl CommandRegistry {
    /// Create a registry with no converters registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in converters.
    pub fn with_builtin_converters() -> Self {
        Self {
            converters: ConverterRegistry::with_builtins(),
            ..Self::default()
        }
    }

    /// Register an argument converter. First registration per type wins.
    pub fn register_converter<C: ArgumentConverter + 'static>(&mut self, converter: C) -> bool {
        self.converters.register(converter)
    }

    /// Register every converter in a collection.
    pub fn register_converters_from(
        &mut self,
        converters: impl IntoIterator<Item = Arc<dyn ArgumentConverter>>,
    ) {
        self.converters.register_from(converters);
    }

    /// Check whether a converter exists for a type.
    pub fn has_converter<T: Any>(&self) -> bool {
        self.converters.has::<T>()
    }

    /// Get the converter for a type, if any.
    pub fn converter<T: Any>(&self) -> Option<&Arc<dyn ArgumentConverter>> {
        self.converters.get::<T>()
    }

    /// The underlying converter registry.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Register a command module.
    ///
    /// Validates the module's permission name and prefix, then registers
    /// each declared command. A command that fails validation (bad name,
    /// missing converter, misplaced remainder/variadic marking, name or
    /// alias collision) is logged and skipped without affecting the
    /// module's other commands. Re-registering a module whose permission
    /// name is already loaded is a no-op.
    pub fn register_module(&mut self, spec: ModuleSpec) -> Result<(), RegistryError> {
        let permission_name = spec.effective_permission_name();
        if !is_valid_permission_name(&permission_name) {
            return Err(RegistryError::InvalidPermissionName {
                category: spec.category.to_string(),
                name: permission_name.to_string(),
            });
        }

        if let Some(prefix) = &spec.prefix
            && !is_valid_name(prefix)
        {
            return Err(RegistryError::InvalidPrefix {
                category: spec.category.to_string(),
                prefix: prefix.to_string(),
            });
        }

        if self.modules.contains_key(&permission_name) {
            debug!("Module '{}' is already registered, skipping", permission_name);
            return Ok(());
        }

        let mut module =
            CommandModule::new(spec.category.clone(), permission_name.clone(), spec.prefix.clone());

        for command in spec.commands {
            match self.build_command(&module, command) {
                Ok(cmd) => {
                    self.index_command(&cmd);
                    debug!(
                        "Registered command '{}' with {} arguments",
                        cmd.full_name(),
                        cmd.arguments().len()
                    );
                    module.push(cmd);
                }
                Err(message) => {
                    error!("Module '{}': {}", module.category(), message);
                }
            }
        }

        self.modules.insert(permission_name, module);
        Ok(())
    }

    /// Register every module in a collection, logging module-level failures.
    pub fn register_modules_from(&mut self, modules: impl IntoIterator<Item = ModuleSpec>) {
        for module in modules {
            if let Err(e) = self.register_module(module) {
                error!("Failed to register module: {}", e);
            }
        }
    }

    /// Try to get a root command by name or alias, case-insensitive.
    pub fn try_get_command(&self, name: &str) -> Option<Arc<Command>> {
        self.root_commands.get(name.to_lowercase().as_str()).cloned()
    }

    /// Try to get a categorized command by prefix and name or alias,
    /// case-insensitive on both parts.
    pub fn try_get_command_in(&self, prefix: &str, name: &str) -> Option<Arc<Command>> {
        self.categorized_commands
            .get(prefix.to_lowercase().as_str())?
            .get(name.to_lowercase().as_str())
            .cloned()
    }

    /// Iterate over the registered modules.
    pub fn modules(&self) -> impl Iterator<Item = &CommandModule> {
        self.modules.values()
    }

    /// Iterate over every registered command, each exactly once.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.modules.values().flat_map(|m| m.commands())
    }

    /// Validate one command spec and build the immutable command.
    fn build_command(
        &self,
        module: &CommandModule,
        spec: CommandSpec,
    ) -> Result<Arc<Command>, String> {
        if !is_valid_name(&spec.name) {
            return Err(format!(
                "cannot register command '{}': names may only contain A-Z, a-z, 0-9, - and _",
                spec.name
            ));
        }

        let last = spec.args.len().saturating_sub(1);
        let mut arguments = Vec::with_capacity(spec.args.len());

        for (i, arg) in spec.args.into_iter().enumerate() {
            if arg.remainder && arg.variadic {
                return Err(format!(
                    "command '{}': parameter '{}' cannot be both remainder and variadic",
                    spec.name, arg.name
                ));
            }

            if arg.remainder && i != last {
                return Err(format!(
                    "command '{}': only the last parameter can be marked remainder ('{}')",
                    spec.name, arg.name
                ));
            }

            if arg.remainder && arg.value_type != TypeId::of::<String>() {
                return Err(format!(
                    "command '{}': remainder parameter '{}' must be a String",
                    spec.name, arg.name
                ));
            }

            if arg.variadic && i != last {
                return Err(format!(
                    "command '{}': only the last parameter can be variadic ('{}')",
                    spec.name, arg.name
                ));
            }

            if arg.variadic && arg.default.is_some() {
                return Err(format!(
                    "command '{}': variadic parameter '{}' cannot have a default value",
                    spec.name, arg.name
                ));
            }

            let Some(converter) = self.converters.get_type(arg.value_type) else {
                return Err(format!(
                    "command '{}': parameter '{}' has no registered converter for its type ({})",
                    spec.name, arg.name, arg.type_name
                ));
            };

            if let Some(default) = &arg.default
                && default.value_type() != arg.value_type
            {
                return Err(format!(
                    "command '{}': default value for parameter '{}' does not match its type ({})",
                    spec.name, arg.name, arg.type_name
                ));
            }

            arguments.push(CommandArgument::new(
                arg.name,
                arg.value_type,
                arg.type_name,
                converter.clone(),
                arg.remainder,
                arg.variadic,
                arg.default,
            ));
        }

        // Keep aliases unique case-insensitively, the declared name included.
        let mut keys: Vec<Box<str>> = vec![spec.name.to_lowercase().into()];
        let mut aliases: Vec<Box<str>> = Vec::with_capacity(spec.aliases.len());
        for alias in spec.aliases {
            let key: Box<str> = alias.to_lowercase().into();
            if !keys.contains(&key) {
                keys.push(key);
                aliases.push(alias);
            }
        }

        // Pre-check every key so a colliding command never partially
        // registers: a collision is fatal to this command only.
        let scope = self.lookup_scope(module.prefix());
        if let Some(taken) = keys.iter().find(|k| scope.is_some_and(|s| s.contains_key(*k))) {
            return Err(format!(
                "cannot register command '{}': name or alias '{}' conflicts with another command",
                display_name(module.prefix(), &spec.name),
                taken
            ));
        }

        Ok(Arc::new(Command::new(
            spec.name,
            module.prefix().map(Into::into),
            module.category().into(),
            module.permission_name().into(),
            aliases,
            spec.description,
            spec.hidden,
            spec.target_permission,
            spec.realm,
            arguments,
            spec.handler,
        )))
    }

    /// The map a command in the given scope registers into, if it exists yet.
    fn lookup_scope(&self, prefix: Option<&str>) -> Option<&HashMap<Box<str>, Arc<Command>>> {
        match prefix {
            None => Some(&self.root_commands),
            Some(prefix) => self.categorized_commands.get(prefix.to_lowercase().as_str()),
        }
    }

    /// Insert a validated command and its aliases into the proper table.
    fn index_command(&mut self, cmd: &Arc<Command>) {
        let table = match cmd.prefix() {
            None => &mut self.root_commands,
            Some(prefix) => self
                .categorized_commands
                .entry(prefix.to_lowercase().into())
                .or_default(),
        };

        table.insert(cmd.name().to_lowercase().into(), cmd.clone());
        for alias in cmd.aliases() {
            table.insert(alias.to_lowercase().into(), cmd.clone());
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_valid_permission_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn display_name(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{} {}", prefix, name),
        None => name.to_string(),
    }
}
