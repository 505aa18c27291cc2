use std::{fmt, str::FromStr};

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::{CommandError, KeyError, ScriptError},
    trie::Trie,
};

/// The insert/search/delete sequence used to demonstrate the trie, with the searches'
/// expected results noted after each line.
pub const REFERENCE_SCRIPT: &str = "\
# Each search prints 0 or 1.
insert hello
search hello       # 1
insert helloworld
search helloworld  # 1
search helll       # 0
insert hell
search hell        # 1
insert h
search h           # 1

delete hello
search hello       # 0
search helloworld  # 1
search hell        # 1

delete h
search h           # 0
search hell        # 1
search helloworld  # 1

delete helloworld
search helloworld  # 0
search hell        # 1
delete hell
search hell        # 0
empty              # Trie empty!!
search hell        # 0
";

/// A single line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(String),
    Search(String),
    Delete(String),
    /// Reports whether the trie's root has been released.
    Empty,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let Some(keyword) = tokens.first() else {
            return Err(CommandError::NoInput);
        };
        let keyword = keyword.to_lowercase();

        let key = || match tokens.as_slice() {
            [_, key] => Ok(key.to_string()),
            _ => Err(CommandError::ArgumentMismatch {
                command: keyword.clone(),
            }),
        };

        match keyword.as_str() {
            "insert" => Ok(Command::Insert(key()?)),
            "search" => Ok(Command::Search(key()?)),
            "delete" => Ok(Command::Delete(key()?)),
            "empty" => {
                if tokens.len() != 1 {
                    return Err(CommandError::ArgumentMismatch {
                        command: keyword.clone(),
                    });
                }
                Ok(Command::Empty)
            }
            _ => Err(CommandError::Unknown(tokens[0].to_string())),
        }
    }
}

/// What running a [`Command`] produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Outcome {
    Inserted { key: String },
    Searched { key: String, found: bool },
    Deleted { key: String },
    Emptiness { released: bool },
}

impl Command {
    pub fn apply(self, trie: &mut Trie) -> Result<Outcome, KeyError> {
        Ok(match self {
            Command::Insert(key) => {
                trie.insert(&key)?;
                Outcome::Inserted { key }
            }
            Command::Search(key) => {
                let found = trie.search(&key);
                Outcome::Searched { key, found }
            }
            Command::Delete(key) => {
                trie.delete(&key)?;
                Outcome::Deleted { key }
            }
            Command::Empty => Outcome::Emptiness {
                released: trie.root_released(),
            },
        })
    }
}

/// Renders an outcome the way the demonstration prints it. Inserts, deletes, and a trie that
/// still has its root print nothing.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Searched { found, .. } => write!(f, "{}", u8::from(*found)),
            Outcome::Emptiness { released: true } => write!(f, "Trie empty!!"),
            _ => Ok(()),
        }
    }
}

/// Strips a trailing `#` comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code).trim()
}

/// Parses and runs `script` line by line against `trie`, stopping at the first bad line.
pub fn run_script(trie: &mut Trie, script: &str) -> Result<Vec<Outcome>, ScriptError> {
    run(trie, script, false)
}

/// Like [`run_script`], but logs and skips lines that fail to parse or apply.
pub fn run_script_lenient(trie: &mut Trie, script: &str) -> Vec<Outcome> {
    // Only errors in strict mode.
    run(trie, script, true).unwrap_or_default()
}

fn run(trie: &mut Trie, script: &str, keep_going: bool) -> Result<Vec<Outcome>, ScriptError> {
    let mut outcomes = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let code = strip_comment(line);
        if code.is_empty() {
            continue;
        }

        let result = code
            .parse::<Command>()
            .map_err(|source| ScriptError::Command {
                line: line_no,
                source,
            })
            .and_then(|command| {
                debug!("Line {}: {:?}", line_no, command);
                command.apply(trie).map_err(|source| ScriptError::Key {
                    line: line_no,
                    source,
                })
            });

        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) if keep_going => warn!("Skipping {}", err),
            Err(err) => return Err(err),
        }
    }

    Ok(outcomes)
}

/// Joins the printable outcomes into lines, one per outcome.
pub fn render_text(outcomes: &[Outcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let rendered = outcome.to_string();
        if !rendered.is_empty() {
            out.push_str(&rendered);
            out.push('\n');
        }
    }
    out
}

pub fn render_json(outcomes: &[Outcome]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcomes)
}
