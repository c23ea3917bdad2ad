//! Slash-command parsing and the command table.

use std::collections::HashMap;
use std::sync::LazyLock;

use strum::Display;

/// Prefix that marks a user message as a command.
pub const COMMAND_PREFIX: char = '/';

/// What the host should do with a message after the plugin has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MsgSignal {
    /// Not ours; keep processing normally.
    Continue,
    /// Consumed by a command; stop all further handling.
    BlockAll,
}

/// Commands this plugin handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Traceback,
}

/// Every accepted command name, aliases included. Built once, never mutated.
pub static COMMAND_TABLE: LazyLock<HashMap<&'static str, Command>> = LazyLock::new(|| {
    HashMap::from([
        ("traceback", Command::Traceback),
        ("tb", Command::Traceback),
    ])
});

/// A message split into command name and argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased, without the prefix.
    pub name: String,
    /// Remaining words joined by single spaces.
    pub args: String,
}

impl ParsedCommand {
    /// Parse `text` as `/name arg arg...`.
    ///
    /// Returns `None` for anything that is not a command, including a bare
    /// prefix with nothing after it.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.trim().strip_prefix(COMMAND_PREFIX)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();
        let args = words.collect::<Vec<_>>().join(" ");
        Some(Self { name, args })
    }

    pub fn lookup(&self) -> Option<Command> {
        COMMAND_TABLE.get(self.name.as_str()).copied()
    }
}
