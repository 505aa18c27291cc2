use std::fmt;

use tracing::{debug, trace};

use crate::error::KeyError;

/// Number of child slots per node, one for each of `'a'..='z'`.
pub const ALPHABET_SIZE: usize = 26;

/// A node in the trie
#[derive(Default)]
pub struct TrieNode {
    // Slot `i` owns the child for the letter `'a' + i`
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    // Whether a stored key ends exactly at this node
    is_terminal: bool,
}

impl TrieNode {
    /// Creates a node with every child slot empty that does not end any key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a stored key ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Returns `true` if at least one child slot is occupied.
    pub fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    /// Returns the child reached by `letter`, if there is one.
    pub fn child(&self, letter: char) -> Option<&TrieNode> {
        slot_of(letter).and_then(|slot| self.children[slot].as_deref())
    }

    /// Iterates over the occupied child slots in alphabetical order.
    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.as_deref().map(|child| (letter_of(slot), child)))
    }

    fn child_or_insert(&mut self, slot: usize) -> &mut TrieNode {
        self.children[slot].get_or_insert_with(Default::default)
    }

    fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .map(|(_, child)| child.subtree_len())
            .sum::<usize>()
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Children<'a>(&'a TrieNode);

        impl fmt::Debug for Children<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.children()).finish()
            }
        }

        f.debug_struct("TrieNode")
            .field("is_terminal", &self.is_terminal)
            .field("children", &Children(self))
            .finish()
    }
}

/// What a step of [`remove`] did with the node it was handed.
enum Removal {
    /// The node stays; the caller puts it back into its slot.
    Kept(Box<TrieNode>),
    /// The node was neither terminal nor a parent and has been dropped.
    Freed,
}

/// A prefix tree over lowercase ASCII letters.
///
/// The root is allocated on construction. Deleting the last stored key prunes the root as
/// well, after which the trie is empty until the next insertion allocates a new one.
#[derive(Debug)]
pub struct Trie {
    root: Option<Box<TrieNode>>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Creates a new, empty trie
    pub fn new() -> Self {
        Trie {
            root: Some(Box::new(TrieNode::new())),
        }
    }

    pub fn root(&self) -> Option<&TrieNode> {
        self.root.as_deref()
    }

    /// Returns `true` once deletion has pruned the root node itself.
    pub fn root_released(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.root
            .as_deref()
            .map_or(true, |root| !root.is_terminal && !root.has_children())
    }

    /// Number of allocated nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.as_deref().map_or(0, TrieNode::subtree_len)
    }

    /// Inserts a key into the trie. Inserting a stored key again changes nothing.
    ///
    /// The key is validated before anything is allocated, so a rejected key leaves the trie
    /// untouched.
    pub fn insert(&mut self, key: &str) -> Result<(), KeyError> {
        let slots = key_slots(key)?;

        if self.root.is_none() {
            trace!("Allocating a new root");
        }
        let mut node: &mut TrieNode = self.root.get_or_insert_with(Default::default);
        for slot in slots {
            node = node.child_or_insert(slot);
        }
        node.is_terminal = true;

        debug!("Inserted {:?}", key);
        Ok(())
    }

    /// Searches for a key in the trie.
    ///
    /// Keys that [`Trie::insert`] would reject can never be stored, so they are reported as
    /// absent.
    pub fn search(&self, key: &str) -> bool {
        let Ok(slots) = key_slots(key) else {
            trace!("Searched for invalid key {:?}", key);
            return false;
        };
        let Some(mut node) = self.root.as_deref() else {
            return false;
        };

        for slot in slots {
            match node.children[slot].as_deref() {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_terminal
    }

    /// Deletes a key from the trie and frees every node that no longer leads to a stored key.
    ///
    /// Deleting a key that is not stored is a no-op. Nodes on the path of other keys are never
    /// freed. If the root ends up with no children it is freed too.
    pub fn delete(&mut self, key: &str) -> Result<(), KeyError> {
        let slots = key_slots(key)?;

        let Some(root) = self.root.take() else {
            trace!("Delete of {:?} on a released root", key);
            return Ok(());
        };
        self.root = match remove(root, &slots) {
            Removal::Kept(root) => Some(root),
            Removal::Freed => {
                debug!("Root released");
                None
            }
        };

        debug!("Delete of {:?} done", key);
        Ok(())
    }
}

/// Removes the key spelled by `suffix` below `node`, deciding on the way back up whether
/// `node` itself is still needed.
fn remove(mut node: Box<TrieNode>, suffix: &[usize]) -> Removal {
    let Some((&slot, rest)) = suffix.split_first() else {
        // End of the key
        if !node.is_terminal {
            return Removal::Kept(node);
        }
        node.is_terminal = false;
        return if node.has_children() {
            Removal::Kept(node)
        } else {
            Removal::Freed
        };
    };

    let Some(child) = node.children[slot].take() else {
        return Removal::Kept(node);
    };
    match remove(child, rest) {
        Removal::Kept(child) => {
            node.children[slot] = Some(child);
            Removal::Kept(node)
        }
        Removal::Freed if node.is_terminal || node.has_children() => Removal::Kept(node),
        Removal::Freed => {
            trace!("Pruned node leading to {:?}", letter_of(slot));
            Removal::Freed
        }
    }
}

fn slot_of(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| letter as usize - 'a' as usize)
}

fn letter_of(slot: usize) -> char {
    (b'a' + slot as u8) as char
}

fn key_slots(key: &str) -> Result<Vec<usize>, KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    key.chars()
        .enumerate()
        .map(|(position, found)| slot_of(found).ok_or(KeyError::InvalidCharacter { found, position }))
        .collect()
}
