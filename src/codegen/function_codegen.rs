use super::{Codegen, CodegenContext};
use crate::backend::Backend;
use crate::error::CodegenError;
use crate::parser::ast::*;
use crate::table::UndoList;

impl Prototype {
    /// Registers the prototype and declares it in the open unit
    /// A binary operator declared this way gets no precedence
    pub fn codegen<B: Backend>(
        &self,
        context: &mut CodegenContext<B>,
    ) -> Result<B::Function, CodegenError> {
        self.check_conflict(context)?;
        context.prototypes.insert(self.clone());
        Ok(context
            .backend
            .declare_function(&self.name, &self.parameters))
    }

    // A declaration already in the unit must agree on the number of parameters
    fn check_conflict<B: Backend>(&self, context: &CodegenContext<B>) -> Result<(), CodegenError> {
        match context.backend.lookup_function(&self.name) {
            Some(existing) => {
                let expected = context.backend.parameter_count(existing);
                if expected != self.parameters.len() {
                    Err(CodegenError::ConflictingDeclaration {
                        name: self.name.clone(),
                        expected,
                        found: self.parameters.len(),
                    })
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }
}

impl Function {
    /// Generates the function into the open unit
    /// On failure nothing of the function is left in the unit,
    /// but the precedence of a binary operator stays installed
    pub fn codegen<B: Backend>(
        &self,
        context: &mut CodegenContext<B>,
    ) -> Result<B::Function, CodegenError> {
        let prototype = &self.prototype;
        log::debug!("Generating code for {}", prototype.name);

        if let Some(existing) = context.backend.lookup_function(&prototype.name) {
            if context.backend.has_body(existing) {
                return Err(CodegenError::Redefinition(prototype.name.clone()));
            }
        }
        let function = prototype.codegen(context)?;

        if let Some((op, precedence)) = prototype.binary_operator() {
            context.operators.install(op, precedence as i32);
        }

        context.backend.begin_function_body(function);
        let mut undo = UndoList::new();
        for (index, name) in prototype.parameters.iter().enumerate() {
            let storage = context.backend.allocate_local(name);
            let argument = context.backend.emit_argument(index);
            context.backend.emit_store(argument, storage);
            context.scopes.bind(&mut undo, name, storage);
        }

        let body = self.body.codegen(context);
        context.scopes.unwind(undo);

        let result = body.and_then(|value| {
            context.backend.emit_return(value);
            Ok(context.backend.finish_function(function)?)
        });
        match result {
            Ok(()) => Ok(function),
            Err(error) => {
                log::debug!("Abandoning {}: {}", prototype.name, error);
                context.backend.abandon_function(function);
                Err(error)
            }
        }
    }
}
