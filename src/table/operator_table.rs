use std::collections::HashMap;

// Precedence of every binary operator known to the parser, higher binds tighter
// Anything missing or non-positive is not a binary operator
#[derive(Clone, Debug)]
pub struct OperatorTable {
    precedences: HashMap<char, i32>,
}

impl OperatorTable {
    /// An empty table, without even the builtin operators
    pub fn empty() -> OperatorTable {
        OperatorTable {
            precedences: HashMap::new(),
        }
    }

    /// Returns the precedence of `op`, or -1 if it is not a binary operator
    pub fn precedence(&self, op: char) -> i32 {
        match self.precedences.get(&op) {
            Some(&precedence) if precedence > 0 => precedence,
            _ => -1,
        }
    }

    pub fn install(&mut self, op: char, precedence: i32) {
        log::debug!("Installing binary operator {} with precedence {}", op, precedence);
        self.precedences.insert(op, precedence);
    }

    pub fn is_binary_operator(&self, op: char) -> bool {
        self.precedence(op) > 0
    }
}

impl Default for OperatorTable {
    // The builtin operators, 1 is the lowest precedence
    fn default() -> Self {
        let mut table = OperatorTable::empty();
        table.install('=', 2);
        table.install('<', 10);
        table.install('+', 20);
        table.install('-', 20);
        table.install('*', 40);
        table
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_precedence() {
        let table = OperatorTable::default();
        assert_eq!(table.precedence('='), 2);
        assert_eq!(table.precedence('<'), 10);
        assert_eq!(table.precedence('+'), table.precedence('-'));
        assert!(table.precedence('*') > table.precedence('+'));
    }

    #[test]
    fn test_unknown_is_not_an_operator() {
        let table = OperatorTable::default();
        assert_eq!(table.precedence('&'), -1);
        assert_eq!(table.precedence('('), -1);
        assert!(!table.is_binary_operator('|'));
    }

    #[test]
    fn test_install() {
        let mut table = OperatorTable::default();
        table.install('&', 5);
        assert_eq!(table.precedence('&'), 5);
        table.install('&', 0);
        assert_eq!(table.precedence('&'), -1);
    }
}
