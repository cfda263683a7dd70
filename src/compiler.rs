use crate::backend::Backend;
use crate::codegen::CodegenContext;
use crate::error::CompileError;
use crate::parser::{Function, Prototype, ANONYMOUS_FUNCTION};
use crate::table::{OperatorTable, PrototypeTable, ScopeTable};

/// Everything that lives as long as a session
/// Handles one parsed top-level construct at a time
pub struct Compiler<B: Backend> {
    operators: OperatorTable,
    prototypes: PrototypeTable,
    scopes: ScopeTable<B::Storage>,
    backend: B,
    dump_ir: bool,
}

impl<B: Backend> Compiler<B> {
    pub fn new(mut backend: B) -> Compiler<B> {
        log::info!("Starting session with the {} backend", backend.backend_type());
        backend.open_unit();
        Compiler {
            operators: OperatorTable::default(),
            prototypes: PrototypeTable::new(),
            scopes: ScopeTable::new(),
            backend,
            dump_ir: false,
        }
    }

    /// Prints every generated function to stderr
    pub fn with_dump_ir(mut self, dump_ir: bool) -> Compiler<B> {
        self.dump_ir = dump_ir;
        self
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn prototypes(&self) -> &PrototypeTable {
        &self.prototypes
    }

    pub fn scopes(&self) -> &ScopeTable<B::Storage> {
        &self.scopes
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn context(&mut self) -> CodegenContext<B> {
        CodegenContext::new(
            &mut self.operators,
            &mut self.prototypes,
            &mut self.scopes,
            &mut self.backend,
        )
    }

    fn dump(&self, what: &str, function: B::Function) {
        if self.dump_ir {
            eprint!("Read {}:\n{}", what, self.backend.function_to_string(function));
        }
    }

    /// Generates a definition into the open unit, it runs with the next top-level expression
    pub fn handle_definition(&mut self, function: &Function) -> Result<(), CompileError> {
        let generated = function.codegen(&mut self.context())?;
        self.dump("function definition", generated);
        Ok(())
    }

    pub fn handle_extern(&mut self, prototype: &Prototype) -> Result<(), CompileError> {
        let declared = prototype.codegen(&mut self.context())?;
        self.dump("extern", declared);
        Ok(())
    }

    /// Generates the anonymous function, then runs the whole unit and starts a new one
    pub fn handle_top_level(&mut self, function: &Function) -> Result<f64, CompileError> {
        let generated = function.codegen(&mut self.context())?;
        self.dump("top-level expression", generated);
        let result = self.backend.finalize_and_execute(ANONYMOUS_FUNCTION);
        self.backend.open_unit();
        Ok(result?)
    }

    /// Output written by executed code since the last call
    pub fn take_output(&mut self) -> String {
        self.backend.take_output()
    }
}
