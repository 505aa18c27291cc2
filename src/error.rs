use thiserror::Error;

/// Why a key was refused by [`crate::Trie::insert`] or [`crate::Trie::delete`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key is empty, keys need at least one letter")]
    Empty,

    #[error("invalid character {found:?} at position {position}, keys may only use 'a'..='z'")]
    InvalidCharacter { found: char, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command given")]
    NoInput,

    #[error("wrong number of arguments for `{command}`")]
    ArgumentMismatch { command: String },

    #[error("unknown command `{}`", .0)]
    Unknown(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },

    #[error("line {line}: {source}")]
    Key {
        line: usize,
        #[source]
        source: KeyError,
    },
}

impl ScriptError {
    /// 1-based line of the script the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Command { line, .. } | ScriptError::Key { line, .. } => *line,
        }
    }
}
