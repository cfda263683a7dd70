mod interpreter;
pub mod runtime;

use std::collections::HashMap;

pub use self::interpreter::{Interpreter, MAX_CALL_DEPTH};
use super::ir::IRFunction;
use super::BackendError;

/// The persistent symbol space that finalized units are linked into
pub struct Jit {
    symbols: HashMap<String, IRFunction>,
    step_limit: u64,
    output: String,
}

impl Jit {
    pub fn new(step_limit: u64) -> Jit {
        Jit {
            symbols: HashMap::new(),
            step_limit,
            output: String::new(),
        }
    }

    // A later function with the same name replaces the earlier one
    pub fn link(&mut self, function: IRFunction) {
        log::trace!("Linking {}", function.name);
        if self.symbols.insert(function.name.clone(), function).is_some() {
            log::debug!("Replaced an earlier definition");
        }
    }

    pub fn unlink(&mut self, name: &str) -> Option<IRFunction> {
        self.symbols.remove(name)
    }

    pub fn is_linked(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn execute(&mut self, entry: &str, arguments: &[f64]) -> Result<f64, BackendError> {
        if !self.is_linked(entry) {
            return Err(BackendError::MissingEntry(entry.to_string()));
        }
        let mut interpreter = Interpreter::new(&self.symbols, &mut self.output, self.step_limit);
        let result = interpreter.call(entry, arguments);
        log::debug!("Executed {} in {} steps", entry, interpreter.steps());
        result
    }

    /// Output written by the runtime library since the last call
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
