//! Dispatcher: resolves one line of input to a command and executes it.
//!
//! The pipeline per line: prefix check, tokenize, resolve a root command
//! and/or a categorized `<prefix> <name>` command, parse arguments, invoke.
//! The subcommand executes first when both resolve; exactly one
//! [`CommandExecutedEvent`] or [`CommandFailedEvent`] is emitted per line,
//! and nothing ever propagates back to the caller of
//! [`handle_line`](CommandDispatcher::handle_line).

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::error;

use super::{
    ArgumentConverter, Caller, Command, CommandContext, CommandExecutedEvent, CommandFailedEvent,
    CommandRegistry, ListenerId, ModuleSpec, ParsedArgs, RegistryError, parser, tokenize,
};
use crate::config::ChatConfig;
use crate::core::events::ListenerSet;

/// Chat and console command dispatcher.
///
/// Owns the command registry and the outcome event listeners. Registration
/// is expected to finish before the first dispatched line; neither the
/// registry nor the listener lists are synchronized.
///
/// # Examples
///
/// ```
/// use chat_commands::config::ChatConfig;
/// use chat_commands::core::{Caller, CommandDispatcher, CommandSpec, ModuleSpec};
///
/// let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
/// dispatcher
///     .register_module(ModuleSpec::new("General").command(
///         CommandSpec::new("ping", |ctx, _args| {
///             println!("pong, {}", ctx.caller.display_name());
///         }),
///     ))
///     .unwrap();
///
/// dispatcher.handle_line(&Caller::Console, "!ping");
/// ```
pub struct CommandDispatcher {
    config: ChatConfig,
    registry: CommandRegistry,
    executed: ListenerSet<CommandExecutedEvent>,
    failed: ListenerSet<CommandFailedEvent>,
}

impl CommandDispatcher {
    /// Create a dispatcher whose registry starts from the built-in
    /// converter set.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            registry: CommandRegistry::with_builtin_converters(),
            executed: ListenerSet::default(),
            failed: ListenerSet::default(),
        }
    }

    /// Create a dispatcher with no converters registered.
    pub fn empty(config: ChatConfig) -> Self {
        Self {
            config,
            registry: CommandRegistry::new(),
            executed: ListenerSet::default(),
            failed: ListenerSet::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Mutable access to the registry for the registration phase.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Register a command module. See [`CommandRegistry::register_module`].
    pub fn register_module(&mut self, module: ModuleSpec) -> Result<(), RegistryError> {
        self.registry.register_module(module)
    }

    /// Register every module in a collection.
    pub fn register_modules_from(&mut self, modules: impl IntoIterator<Item = ModuleSpec>) {
        self.registry.register_modules_from(modules);
    }

    /// Register an argument converter.
    pub fn register_converter<C: ArgumentConverter + 'static>(&mut self, converter: C) -> bool {
        self.registry.register_converter(converter)
    }

    /// Register every converter in a collection.
    pub fn register_converters_from(
        &mut self,
        converters: impl IntoIterator<Item = Arc<dyn ArgumentConverter>>,
    ) {
        self.registry.register_converters_from(converters);
    }

    /// Subscribe to successful executions.
    pub fn on_executed<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&CommandExecutedEvent) + Send + Sync + 'static,
    {
        self.executed.subscribe(listener)
    }

    /// Remove an execution listener.
    pub fn off_executed(&mut self, id: ListenerId) -> bool {
        self.executed.unsubscribe(id)
    }

    /// Subscribe to failed executions.
    pub fn on_failed<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&CommandFailedEvent) + Send + Sync + 'static,
    {
        self.failed.subscribe(listener)
    }

    /// Remove a failure listener.
    pub fn off_failed(&mut self, id: ListenerId) -> bool {
        self.failed.unsubscribe(id)
    }

    /// Handle one line of chat or console input.
    ///
    /// Lines that don't carry the command prefix, or carry nothing after
    /// it, are ignored without an event. Every other outcome surfaces as
    /// exactly one executed or failed event; this method never panics on
    /// behalf of a handler and returns nothing.
    pub fn handle_line(&self, caller: &Caller, text: &str) {
        let trimmed = text.trim();
        let Some(rest) =
            strip_prefix(trimmed, &self.config.prefix, self.config.case_sensitive_prefix)
        else {
            return;
        };

        let tokens = tokenize(rest);
        if tokens.len() == 1 && tokens[0].is_empty() {
            return;
        }

        let first = &tokens[0];
        let mut root = self.registry.try_get_command(first);
        if self.config.case_sensitive_commands
            && root.as_ref().is_some_and(|cmd| !cmd.matches_exact(first))
        {
            root = None;
        }

        if root.is_none() && tokens.len() == 1 {
            self.failed.emit(&CommandFailedEvent::unknown_command(first));
            return;
        }

        // Root and categorized resolution are independent; a root command
        // may share its name with a module prefix.
        let mut sub = None;
        if tokens.len() >= 2 {
            let second = &tokens[1];
            sub = self.registry.try_get_command_in(first, second);
            if self.config.case_sensitive_commands
                && sub.as_ref().is_some_and(|cmd| {
                    cmd.prefix() != Some(first.as_str()) || !cmd.matches_exact(second)
                })
            {
                sub = None;
            }

            if root.is_none() && sub.is_none() {
                self.failed
                    .emit(&CommandFailedEvent::unknown_command(&format!("{} {}", first, second)));
                return;
            }
        }

        // The subcommand takes priority; the root command is the fallback.
        let mut sub_failure = None;
        if let Some(cmd) = sub {
            let context = self.make_context(caller, cmd, text, &tokens[2..]);
            match self.try_execute(&context) {
                Ok(()) => {
                    self.executed.emit(&CommandExecutedEvent { context });
                    return;
                }
                Err(failure) => sub_failure = Some(failure),
            }
        }

        let mut root_failure = None;
        if let Some(cmd) = root {
            let context = self.make_context(caller, cmd, text, &tokens[1..]);
            match self.try_execute(&context) {
                Ok(()) => {
                    self.executed.emit(&CommandExecutedEvent { context });
                    return;
                }
                Err(failure) => root_failure = Some(failure),
            }
        }

        // Surface the most specific failure: the subcommand's when one was
        // attempted, otherwise the root command's.
        if let Some(failure) = sub_failure.or(root_failure) {
            self.failed.emit(&failure);
        }
    }

    fn make_context(
        &self,
        caller: &Caller,
        command: Arc<Command>,
        text: &str,
        raw_arguments: &[String],
    ) -> CommandContext {
        CommandContext {
            caller: caller.clone(),
            command,
            message: text.to_string(),
            ran_from_console: caller.is_console(),
            raw_arguments: raw_arguments.to_vec(),
        }
    }

    /// Parse arguments and invoke the handler, catching panics.
    fn try_execute(&self, context: &CommandContext) -> Result<(), CommandFailedEvent> {
        let command = &context.command;

        // Commands without declared arguments skip the parser entirely.
        let args = if command.arguments().is_empty() {
            ParsedArgs::empty()
        } else {
            match parser::parse(context, command.arguments(), &context.raw_arguments) {
                Ok(args) => args,
                Err(e) => return Err(CommandFailedEvent::invalid_arguments(context.clone(), e)),
            }
        };

        match catch_unwind(AssertUnwindSafe(|| command.invoke(context, &args))) {
            Ok(()) => Ok(()),
            Err(payload) => {
                let payload = panic_payload(payload);
                error!(
                    "Command '{}' panicked during execution: {}",
                    command.full_name(),
                    payload
                );
                Err(CommandFailedEvent::handler_panicked(context.clone(), payload))
            }
        }
    }
}

/// Strip the configured command prefix, honoring prefix case sensitivity.
fn strip_prefix<'a>(input: &'a str, prefix: &str, case_sensitive: bool) -> Option<&'a str> {
    if case_sensitive {
        return input.strip_prefix(prefix);
    }

    if input.len() >= prefix.len()
        && input.is_char_boundary(prefix.len())
        && input[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}

fn panic_payload(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArgSpec, CommandFailureReason, CommandSpec};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Dispatcher with capture of both event streams.
    fn observed(dispatcher: &mut CommandDispatcher) -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<CommandFailedEvent>>>) {
        let executed = Arc::new(Mutex::new(Vec::new()));
        let failed = Arc::new(Mutex::new(Vec::new()));

        let sink = executed.clone();
        dispatcher.on_executed(move |event| {
            sink.lock().unwrap().push(event.context.command.full_name().to_string());
        });
        let sink = failed.clone();
        dispatcher.on_failed(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        (executed, failed)
    }

    fn noop(name: &str) -> CommandSpec {
        CommandSpec::new(name, |_ctx, _args| {})
    }

    #[test]
    fn test_zero_argument_command_end_to_end() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("test")))
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!test");

        assert_eq!(*executed.lock().unwrap(), vec!["test"]);
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_line_without_prefix_is_ignored() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("test")))
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "test");
        dispatcher.handle_line(&Caller::Console, "hello there");

        assert!(executed.lock().unwrap().is_empty());
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bare_prefix_is_ignored() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!");
        dispatcher.handle_line(&Caller::Console, "!   ");

        assert!(executed.lock().unwrap().is_empty());
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_command_fails() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        let (_, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!missing");

        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].reason, CommandFailureReason::UnknownCommand);
        assert_eq!(failed[0].message, "Unknown command 'missing'");
    }

    #[test]
    fn test_unknown_two_token_command_names_both() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        let (_, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!no such");

        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].message, "Unknown command 'no such'");
    }

    #[test]
    fn test_arguments_are_converted() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("slap", move |_ctx, args| {
                    let target: &String = args.get(0).unwrap();
                    let times: &u32 = args.get(1).unwrap();
                    *sink.lock().unwrap() = Some((target.clone(), *times));
                })
                .arg(ArgSpec::of::<String>("target"))
                .arg(ArgSpec::of::<u32>("times")),
            ))
            .unwrap();
        let (executed, _) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::player(1, "Gordon"), "!slap Barney 3");

        assert_eq!(*seen.lock().unwrap(), Some(("Barney".to_string(), 3)));
        assert_eq!(executed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_parser_failure_emits_one_failed_event() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                noop("slap").arg(ArgSpec::of::<u32>("times")),
            ))
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!slap often");

        assert!(executed.lock().unwrap().is_empty());
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].reason, CommandFailureReason::ArgumentParserError);
        assert!(failed[0].message.contains("'often'"));
        assert!(failed[0].context.is_some());
    }

    #[test]
    fn test_remainder_receives_joined_tokens() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("echo", move |_ctx, args| {
                    *sink.lock().unwrap() = args.get::<String>(0).unwrap().clone();
                })
                .arg(ArgSpec::of::<String>("message").remainder()),
            ))
            .unwrap();

        dispatcher.handle_line(&Caller::Console, "!echo a b c");

        assert_eq!(*seen.lock().unwrap(), "a b c");
    }

    #[test]
    fn test_variadic_receives_each_token() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("sum", move |_ctx, args| {
                    let values: Vec<i32> =
                        args.list_of::<i32>(0).unwrap().into_iter().copied().collect();
                    *sink.lock().unwrap() = values;
                })
                .arg(ArgSpec::of::<i32>("values").variadic()),
            ))
            .unwrap();
        let (_, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!sum 1 2 3");
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);

        dispatcher.handle_line(&Caller::Console, "!sum 1 x");
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].message.contains("'x'"));
    }

    #[test]
    fn test_subcommand_takes_priority_over_root() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("Foo Root").command(
                noop("foo").arg(ArgSpec::of::<String>("word").default_value("none".to_string())),
            ))
            .unwrap();
        dispatcher
            .register_module(
                ModuleSpec::new("Foo Module").permission_name("foo").prefix("foo")
                    .command(noop("bar")),
            )
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!foo bar");

        assert_eq!(*executed.lock().unwrap(), vec!["foo bar"]);
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_root_runs_when_subcommand_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("Foo Root").command(
                CommandSpec::new("foo", move |_ctx, _args| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .arg(ArgSpec::of::<String>("word")),
            ))
            .unwrap();
        dispatcher
            .register_module(
                ModuleSpec::new("Foo Module").permission_name("foo").prefix("foo")
                    .command(noop("bar").arg(ArgSpec::of::<u32>("count"))),
            )
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        // "bar" resolves the subcommand, but its required count is missing;
        // the root command then succeeds with "bar" as its argument.
        dispatcher.handle_line(&Caller::Console, "!foo bar");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*executed.lock().unwrap(), vec!["foo"]);
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subcommand_failure_preferred_when_both_fail() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("Foo Root").command(
                noop("foo").arg(ArgSpec::of::<u32>("count")),
            ))
            .unwrap();
        dispatcher
            .register_module(
                ModuleSpec::new("Foo Module").permission_name("foo").prefix("foo")
                    .command(noop("bar").arg(ArgSpec::of::<u32>("count"))),
            )
            .unwrap();
        let (_, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!foo bar");

        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        let context = failed[0].context.as_ref().unwrap();
        assert_eq!(context.command.full_name(), "foo bar");
    }

    #[test]
    fn test_case_insensitive_resolution_by_default() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("Foo")))
            .unwrap();
        let (executed, _) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!FOO");
        dispatcher.handle_line(&Caller::Console, "!foo");

        assert_eq!(executed.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_case_sensitive_commands() {
        let config = ChatConfig { case_sensitive_commands: true, ..ChatConfig::default() };
        let mut dispatcher = CommandDispatcher::new(config);
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("Foo").alias("F")))
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!Foo");
        dispatcher.handle_line(&Caller::Console, "!F");
        assert_eq!(executed.lock().unwrap().len(), 2);

        dispatcher.handle_line(&Caller::Console, "!foo");
        dispatcher.handle_line(&Caller::Console, "!f");
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 2);
        assert!(failed.iter().all(|e| e.reason == CommandFailureReason::UnknownCommand));
    }

    #[test]
    fn test_case_sensitive_prefixed_commands() {
        let config = ChatConfig { case_sensitive_commands: true, ..ChatConfig::default() };
        let mut dispatcher = CommandDispatcher::new(config);
        dispatcher
            .register_module(
                ModuleSpec::new("Administration")
                    .permission_name("admin")
                    .prefix("Admin")
                    .command(noop("Reload").alias("R")),
            )
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!Admin Reload");
        dispatcher.handle_line(&Caller::Console, "!Admin R");
        assert_eq!(*executed.lock().unwrap(), vec!["admin reload", "admin reload"]);

        // Wrong case on either token misses the command.
        dispatcher.handle_line(&Caller::Console, "!admin Reload");
        dispatcher.handle_line(&Caller::Console, "!Admin reload");
        dispatcher.handle_line(&Caller::Console, "!Admin r");
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 3);
        assert!(failed.iter().all(|e| e.reason == CommandFailureReason::UnknownCommand));
    }

    #[test]
    fn test_case_sensitive_prefix() {
        let config = ChatConfig {
            prefix: "do".to_string(),
            case_sensitive_prefix: true,
            ..ChatConfig::default()
        };
        let mut dispatcher = CommandDispatcher::new(config);
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("thing")))
            .unwrap();
        let (executed, _) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "DOthing");
        assert!(executed.lock().unwrap().is_empty());

        dispatcher.handle_line(&Caller::Console, "dothing");
        assert_eq!(executed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_case_insensitive_prefix_by_default() {
        let config = ChatConfig { prefix: "cc".to_string(), ..ChatConfig::default() };
        let mut dispatcher = CommandDispatcher::new(config);
        dispatcher
            .register_module(ModuleSpec::new("General").command(noop("test")))
            .unwrap();
        let (executed, _) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "CCtest");
        dispatcher.handle_line(&Caller::Console, "cctest");

        assert_eq!(executed.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("boom", |_ctx, _args| panic!("kaboom")),
            ))
            .unwrap();
        let (executed, failed) = observed(&mut dispatcher);

        dispatcher.handle_line(&Caller::Console, "!boom");

        assert!(executed.lock().unwrap().is_empty());
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].reason, CommandFailureReason::HandlerPanicked);
        assert_eq!(failed[0].panic.as_deref(), Some("kaboom"));
    }

    #[test]
    fn test_context_carries_raw_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("echo", move |ctx, _args| {
                    *sink.lock().unwrap() = ctx.raw_arguments.clone();
                })
                .arg(ArgSpec::of::<String>("message").remainder()),
            ))
            .unwrap();

        dispatcher.handle_line(&Caller::player(9, "Chell"), "!echo one \"two three\"");

        assert_eq!(*seen.lock().unwrap(), vec!["one", "two three"]);
    }

    #[test]
    fn test_quoted_tokens_reach_arguments() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("say", move |_ctx, args| {
                    *sink.lock().unwrap() = args.get::<String>(0).unwrap().clone();
                })
                .arg(ArgSpec::of::<String>("text")),
            ))
            .unwrap();

        dispatcher.handle_line(&Caller::Console, "!say \"hello world\"");

        assert_eq!(*seen.lock().unwrap(), "hello world");
    }

    #[test]
    fn test_default_value_fills_missing_argument() {
        let seen = Arc::new(Mutex::new(0u32));
        let sink = seen.clone();

        let mut dispatcher = CommandDispatcher::new(ChatConfig::default());
        dispatcher
            .register_module(ModuleSpec::new("General").command(
                CommandSpec::new("wait", move |_ctx, args| {
                    *sink.lock().unwrap() = *args.get::<u32>(0).unwrap();
                })
                .arg(ArgSpec::of::<u32>("seconds").default_value(30u32)),
            ))
            .unwrap();

        dispatcher.handle_line(&Caller::Console, "!wait");
        assert_eq!(*seen.lock().unwrap(), 30);

        dispatcher.handle_line(&Caller::Console, "!wait 5");
        assert_eq!(*seen.lock().unwrap(), 5);
    }

    #[test]
    fn test_strip_prefix_multichar() {
        assert_eq!(strip_prefix("!!cmd", "!!", false), Some("cmd"));
        assert_eq!(strip_prefix("!cmd", "!!", false), None);
        assert_eq!(strip_prefix("", "!", false), None);
    }
}
