use std::collections::HashMap;

use crate::parser::Prototype;

// The most recent prototype seen for every function name in the session
// Definitions and extern declarations both register here
#[derive(Clone, Debug, Default)]
pub struct PrototypeTable {
    prototypes: HashMap<String, Prototype>,
}

impl PrototypeTable {
    pub fn new() -> PrototypeTable {
        PrototypeTable {
            prototypes: HashMap::new(),
        }
    }

    /// Registers `prototype`, replacing any earlier prototype with the same name
    pub fn insert(&mut self, prototype: Prototype) {
        log::trace!("Registering prototype {}", prototype);
        self.prototypes.insert(prototype.name.clone(), prototype);
    }

    pub fn get(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::ast::PrototypeKind;
    use crate::span::Span;

    fn prototype(name: &str, parameters: &[&str]) -> Prototype {
        Prototype::new(
            Span::default(),
            name.to_string(),
            parameters.iter().map(|p| p.to_string()).collect(),
            PrototypeKind::Function,
        )
    }

    #[test]
    fn latest_prototype_wins() {
        let mut table = PrototypeTable::new();
        assert!(!table.contains("f"));
        table.insert(prototype("f", &["a"]));
        table.insert(prototype("f", &["a", "b"]));
        assert!(table.contains("f"));
        assert_eq!(table.get("f").map(|p| p.parameters.len()), Some(2));
        assert!(table.get("g").is_none());
    }
}
