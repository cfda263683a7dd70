use super::{Codegen, CodegenContext};
use crate::backend::{ArithmeticOp, Backend};
use crate::error::CodegenError;
use crate::parser::ast::*;
use crate::table::UndoList;

impl Codegen for Expression {
    fn codegen<B: Backend>(
        &self,
        context: &mut CodegenContext<B>,
    ) -> Result<B::Value, CodegenError> {
        use Expression::*;
        match self {
            &Number(value) => Ok(context.backend.emit_constant(value)),

            Variable(name) => match context.scopes.get(name) {
                Some(storage) => Ok(context.backend.emit_load(storage)),
                None => Err(CodegenError::UnknownVariable(name.clone())),
            },

            Assign(target, value) => {
                let name = match &**target {
                    Variable(name) => name,
                    _ => return Err(CodegenError::InvalidAssignment),
                };
                let value = value.codegen(context)?;
                let storage = context
                    .scopes
                    .get(name)
                    .ok_or_else(|| CodegenError::UnknownVariable(name.clone()))?;
                context.backend.emit_store(value, storage);
                Ok(value)
            }

            &Unary(op, ref operand) => {
                let operand = operand.codegen(context)?;
                let function = context
                    .get_function(&unary_function_name(op))
                    .ok_or(CodegenError::UnknownUnaryOperator(op))?;
                Ok(context.backend.emit_call(function, &[operand]))
            }

            &Binary(op, ref left, ref right) => {
                let left = left.codegen(context)?;
                let right = right.codegen(context)?;
                binary_codegen(op, left, right, context)
            }

            If {
                condition,
                then,
                otherwise,
            } => if_codegen(condition, then, otherwise, context),

            For {
                variable,
                init,
                condition,
                step,
                body,
            } => for_codegen(variable, init, condition, step.as_deref(), body, context),

            Var { bindings, body } => var_codegen(bindings, body, context),

            Call(callee, arguments) => {
                let function = context
                    .get_function(callee)
                    .ok_or_else(|| CodegenError::UnknownFunction(callee.clone()))?;
                let expected = context.backend.parameter_count(function);
                if expected != arguments.len() {
                    return Err(CodegenError::ArgumentCount {
                        callee: callee.clone(),
                        expected,
                        found: arguments.len(),
                    });
                }
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(argument.codegen(context)?);
                }
                Ok(context.backend.emit_call(function, &values))
            }
        }
    }
}

// Builtin operators map to instructions, anything else calls the user defined 'binary' function
fn binary_codegen<B: Backend>(
    op: char,
    left: B::Value,
    right: B::Value,
    context: &mut CodegenContext<B>,
) -> Result<B::Value, CodegenError> {
    let backend = &mut *context.backend;
    match op {
        '+' => Ok(backend.emit_arithmetic(ArithmeticOp::Add, left, right)),
        '-' => Ok(backend.emit_arithmetic(ArithmeticOp::Sub, left, right)),
        '*' => Ok(backend.emit_arithmetic(ArithmeticOp::Mul, left, right)),
        '<' => {
            let less = backend.emit_compare_less_than(left, right);
            Ok(backend.emit_bool_to_scalar(less))
        }
        _ => {
            let function = context
                .get_function(&binary_function_name(op))
                .ok_or(CodegenError::UnknownBinaryOperator(op))?;
            Ok(context.backend.emit_call(function, &[left, right]))
        }
    }
}

// A value is true when it is not equal to zero
fn condition_codegen<B: Backend>(
    condition: &Expression,
    context: &mut CodegenContext<B>,
) -> Result<B::Value, CodegenError> {
    let value = condition.codegen(context)?;
    let zero = context.backend.emit_constant(0.0);
    Ok(context.backend.emit_compare_not_equal(value, zero))
}

fn if_codegen<B: Backend>(
    condition: &Expression,
    then: &Expression,
    otherwise: &Expression,
    context: &mut CodegenContext<B>,
) -> Result<B::Value, CodegenError> {
    let condition = condition_codegen(condition, context)?;

    let then_block = context.backend.new_block("then");
    let else_block = context.backend.new_block("else");
    let merge_block = context.backend.new_block("ifcont");
    context
        .backend
        .emit_conditional_branch(condition, then_block, else_block);

    // Either branch may itself add blocks, the join takes the block each branch ends in
    context.backend.set_insertion_block(then_block);
    let then_value = then.codegen(context)?;
    context.backend.emit_branch(merge_block);
    let then_end = context.backend.insertion_block();

    context.backend.set_insertion_block(else_block);
    let else_value = otherwise.codegen(context)?;
    context.backend.emit_branch(merge_block);
    let else_end = context.backend.insertion_block();

    context.backend.set_insertion_block(merge_block);
    Ok(context
        .backend
        .emit_value_join(&[(then_value, then_end), (else_value, else_end)]))
}

// The loop variable is visible in the body, step and end condition but not in init
// The loop always evaluates to 0
fn for_codegen<B: Backend>(
    variable: &str,
    init: &Expression,
    condition: &Expression,
    step: Option<&Expression>,
    body: &Expression,
    context: &mut CodegenContext<B>,
) -> Result<B::Value, CodegenError> {
    let storage = context.backend.allocate_local(variable);
    let start = init.codegen(context)?;
    context.backend.emit_store(start, storage);

    let loop_block = context.backend.new_block("loop");
    context.backend.emit_branch(loop_block);
    context.backend.set_insertion_block(loop_block);

    let mut undo = UndoList::new();
    context.scopes.bind(&mut undo, variable, storage);
    let result = loop_body_codegen(storage, loop_block, condition, step, body, context);
    context.scopes.unwind(undo);
    result?;

    Ok(context.backend.emit_constant(0.0))
}

fn loop_body_codegen<B: Backend>(
    storage: B::Storage,
    loop_block: B::Block,
    condition: &Expression,
    step: Option<&Expression>,
    body: &Expression,
    context: &mut CodegenContext<B>,
) -> Result<(), CodegenError> {
    body.codegen(context)?;
    let step = match step {
        Some(step) => step.codegen(context)?,
        None => context.backend.emit_constant(1.0),
    };
    let end = condition_codegen(condition, context)?;

    let current = context.backend.emit_load(storage);
    let next = context
        .backend
        .emit_arithmetic(ArithmeticOp::Add, current, step);
    context.backend.emit_store(next, storage);

    let after_block = context.backend.new_block("afterloop");
    context
        .backend
        .emit_conditional_branch(end, loop_block, after_block);
    context.backend.set_insertion_block(after_block);
    Ok(())
}

// Bindings are made in order, an initializer sees the enclosing scope and earlier names
// of the group but never its own name
// A variable without an initializer starts at 0
fn var_codegen<B: Backend>(
    bindings: &[(String, Option<Expression>)],
    body: &Expression,
    context: &mut CodegenContext<B>,
) -> Result<B::Value, CodegenError> {
    let mut undo = UndoList::new();
    let result = var_bindings_codegen(bindings, &mut undo, context)
        .and_then(|()| body.codegen(context));
    context.scopes.unwind(undo);
    result
}

fn var_bindings_codegen<B: Backend>(
    bindings: &[(String, Option<Expression>)],
    undo: &mut UndoList<B::Storage>,
    context: &mut CodegenContext<B>,
) -> Result<(), CodegenError> {
    for (name, init) in bindings {
        let value = match init {
            Some(init) => init.codegen(context)?,
            None => context.backend.emit_constant(0.0),
        };
        let storage = context.backend.allocate_local(name);
        context.backend.emit_store(value, storage);
        context.scopes.bind(undo, name, storage);
    }
    Ok(())
}
