//! Dispatch outcome events and their subscriber lists.
//!
//! Every handled line ends in at most one [`CommandExecutedEvent`] or one
//! [`CommandFailedEvent`], fanned out synchronously to subscribers in
//! registration order. A panicking listener is caught and logged so it can
//! neither crash the dispatcher nor starve later listeners.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

use super::{CommandContext, ParseError};

/// Why a command failed to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFailureReason {
    /// No root or categorized command resolved for the input.
    UnknownCommand,
    /// Argument conversion or arity failed.
    ArgumentParserError,
    /// The handler body panicked.
    HandlerPanicked,
}

/// A command executed successfully.
#[derive(Debug, Clone)]
pub struct CommandExecutedEvent {
    /// The invocation that succeeded.
    pub context: CommandContext,
}

/// A command failed to execute.
#[derive(Debug, Clone)]
pub struct CommandFailedEvent {
    /// The invocation that failed. Absent for unknown commands, where no
    /// command ever resolved.
    pub context: Option<CommandContext>,
    /// Failure classification.
    pub reason: CommandFailureReason,
    /// Human-readable message suitable for showing to the caller.
    pub message: String,
    /// The handler's panic payload, when the reason is
    /// [`HandlerPanicked`](CommandFailureReason::HandlerPanicked).
    pub panic: Option<String>,
}

impl CommandFailedEvent {
    /// Failure for input that resolved to no command.
    pub fn unknown_command(typed: &str) -> Self {
        Self {
            context: None,
            reason: CommandFailureReason::UnknownCommand,
            message: format!("Unknown command '{}'", typed),
            panic: None,
        }
    }

    /// Failure for arguments that did not parse.
    pub fn invalid_arguments(context: CommandContext, error: ParseError) -> Self {
        Self {
            context: Some(context),
            reason: CommandFailureReason::ArgumentParserError,
            message: error.message,
            panic: None,
        }
    }

    /// Failure for a handler that panicked. The payload is retained for
    /// diagnostics; the message stays generic for the caller.
    pub fn handler_panicked(context: CommandContext, payload: String) -> Self {
        Self {
            context: Some(context),
            reason: CommandFailureReason::HandlerPanicked,
            message: "The command failed unexpectedly. Check the server log for details."
                .to_string(),
            panic: Some(payload),
        }
    }
}

/// Identifies a subscribed listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// An ordered set of event listeners.
pub(crate) struct ListenerSet<E> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn Fn(&E) + Send + Sync>)>,
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self { next_id: 0, listeners: Vec::new() }
    }
}

impl<E> ListenerSet<E> {
    /// Add a listener; delivery follows subscription order.
    pub(crate) fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if the id was not subscribed.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener in subscription order.
    pub(crate) fn emit(&self, event: &E) {
        for (id, listener) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!("Command event listener {:?} panicked while handling an event", id);
            }
        }
    }
}
