//! A prefix tree over lowercase ASCII letters, with a small command language for replaying
//! insert/search/delete sequences against it.

pub mod error;
pub mod script;
pub mod trie;

pub use error::{CommandError, KeyError, ScriptError};
pub use script::{
    render_json, render_text, run_script, run_script_lenient, Command, Outcome, REFERENCE_SCRIPT,
};
pub use trie::{Trie, TrieNode, ALPHABET_SIZE};
