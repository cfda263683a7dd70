use std::collections::HashMap;

// Maps variable names to their storage handles
// Every construct introducing bindings records what it shadowed in an UndoList,
// and hands that list back to unwind exactly once when it exits
#[derive(Clone, Debug)]
pub struct ScopeTable<H: Copy> {
    bindings: HashMap<String, H>,
}

/// The bindings replaced by one construct, in the order they were made
#[derive(Debug)]
#[must_use = "an UndoList must be passed to ScopeTable::unwind"]
pub struct UndoList<H: Copy> {
    previous: Vec<(String, Option<H>)>,
}

impl<H: Copy> UndoList<H> {
    pub fn new() -> UndoList<H> {
        UndoList {
            previous: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

impl<H: Copy> Default for UndoList<H> {
    fn default() -> Self {
        UndoList::new()
    }
}

impl<H: Copy> ScopeTable<H> {
    pub fn new() -> ScopeTable<H> {
        ScopeTable {
            bindings: HashMap::new(),
        }
    }

    /// Binds `name` to `handle`, remembering the previous binding in `undo`
    pub fn bind(&mut self, undo: &mut UndoList<H>, name: &str, handle: H) {
        let previous = self.bindings.insert(name.to_string(), handle);
        log::trace!(
            "Binding {} ({})",
            name,
            if previous.is_some() { "shadowing" } else { "new" }
        );
        undo.previous.push((name.to_string(), previous));
    }

    pub fn get(&self, name: &str) -> Option<H> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Restores every binding recorded in `undo`, most recent first
    pub fn unwind(&mut self, undo: UndoList<H>) {
        for (name, previous) in undo.previous.into_iter().rev() {
            log::trace!("Unbinding {}", name);
            match previous {
                Some(handle) => {
                    self.bindings.insert(name, handle);
                }
                None => {
                    self.bindings.remove(&name);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<H: Copy> Default for ScopeTable<H> {
    fn default() -> Self {
        ScopeTable::new()
    }
}
