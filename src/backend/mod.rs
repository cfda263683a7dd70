mod builder;
pub mod ir;
pub mod jit;

use std::fmt::Debug;

pub use self::builder::{FunctionId, IRBackend, DEFAULT_STEP_LIMIT};

// Arithmetic the code generator can ask for, on the scalar type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("invalid function '{function}': {message}")]
    Verification { function: String, message: String },
    #[error("unresolved symbol '{0}'")]
    UnresolvedSymbol(String),
    #[error("no function '{0}' to execute")]
    MissingEntry(String),
    #[error("'{callee}' called with {found} arguments, but takes {expected}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("execution exceeded the limit of {0} steps")]
    StepLimit(u64),
    #[error("execution exceeded the call depth of {0}")]
    CallDepth(usize),
}

// Everything code generation needs from a compiler backend
// All values are of the single scalar type, except the results of comparisons,
// which are booleans until converted with emit_bool_to_scalar
// Emission happens at the insertion block of the function whose body is being built
pub trait Backend {
    type Value: Copy + Debug;
    type Storage: Copy + Debug;
    type Function: Copy + Debug + PartialEq;
    type Block: Copy + Debug;

    // Gives the backend type for processing
    fn backend_type(&self) -> &'static str;

    fn emit_constant(&mut self, value: f64) -> Self::Value;
    fn emit_load(&mut self, storage: Self::Storage) -> Self::Value;
    fn emit_store(&mut self, value: Self::Value, storage: Self::Storage);
    fn emit_arithmetic(&mut self, op: ArithmeticOp, lhs: Self::Value, rhs: Self::Value)
        -> Self::Value;
    fn emit_compare_less_than(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn emit_compare_not_equal(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn emit_bool_to_scalar(&mut self, value: Self::Value) -> Self::Value;

    // Functions of the open unit
    fn declare_function(&mut self, name: &str, parameters: &[String]) -> Self::Function;
    fn lookup_function(&self, name: &str) -> Option<Self::Function>;
    fn parameter_count(&self, function: Self::Function) -> usize;
    fn has_body(&self, function: Self::Function) -> bool;
    fn begin_function_body(&mut self, function: Self::Function) -> Self::Block;
    fn emit_argument(&mut self, index: usize) -> Self::Value;
    fn allocate_local(&mut self, name: &str) -> Self::Storage;
    fn emit_return(&mut self, value: Self::Value);
    /// Checks a completed function, it is left in the unit either way
    fn finish_function(&mut self, function: Self::Function) -> Result<(), BackendError>;
    /// Removes a function from the unit entirely
    fn abandon_function(&mut self, function: Self::Function);
    fn emit_call(&mut self, function: Self::Function, arguments: &[Self::Value]) -> Self::Value;

    // Control flow
    fn new_block(&mut self, label: &str) -> Self::Block;
    fn insertion_block(&self) -> Self::Block;
    fn set_insertion_block(&mut self, block: Self::Block);
    fn emit_conditional_branch(
        &mut self,
        condition: Self::Value,
        if_true: Self::Block,
        if_false: Self::Block,
    );
    fn emit_branch(&mut self, target: Self::Block);
    fn emit_value_join(&mut self, incoming: &[(Self::Value, Self::Block)]) -> Self::Value;

    // Session lifecycle
    fn open_unit(&mut self);
    /// Compiles the open unit, runs its entry function and returns the result
    /// Functions defined in the unit stay callable from later units
    fn finalize_and_execute(&mut self, entry: &str) -> Result<f64, BackendError>;

    /// Textual form of a function in the open unit, for diagnostics
    fn function_to_string(&self, function: Self::Function) -> String {
        let _ = function;
        log::error!("To string is not implemented for this backend");
        String::new()
    }

    /// Output written by executed code since the last call
    fn take_output(&mut self) -> String {
        String::new()
    }
}
