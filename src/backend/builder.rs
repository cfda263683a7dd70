use std::collections::HashMap;

use smallvec::SmallVec;

use super::ir::{verify, IRFunction, IRInstruction, IRLabel, IRPhi, IRReg, IRSize, IRSlot};
use super::jit::Jit;
use super::{ArithmeticOp, Backend, BackendError};

pub const DEFAULT_STEP_LIMIT: u64 = 100_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionId(usize);

/// Builds functions of the open unit in the IR and executes finalized units in the jit
pub struct IRBackend {
    unit: Vec<Option<IRFunction>>,
    names: HashMap<String, usize>,
    position: Option<(usize, IRLabel)>,
    unit_count: usize,
    jit: Jit,
}

impl Default for IRBackend {
    fn default() -> Self {
        IRBackend::new(DEFAULT_STEP_LIMIT)
    }
}

impl IRBackend {
    pub fn new(step_limit: u64) -> IRBackend {
        IRBackend {
            unit: Vec::new(),
            names: HashMap::new(),
            position: None,
            unit_count: 0,
            jit: Jit::new(step_limit),
        }
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    fn function(&self, function: FunctionId) -> Option<&IRFunction> {
        self.unit.get(function.0).and_then(Option::as_ref)
    }

    // The function under construction and its insertion block
    fn current(&mut self) -> (&mut IRFunction, IRLabel) {
        let (index, label) = self.position.expect("no function body is being built");
        let function = self.unit[index]
            .as_mut()
            .expect("function under construction was removed");
        (function, label)
    }

    fn push(&mut self, instruction: IRInstruction) {
        let (function, label) = self.current();
        function.blocks[label as usize].instructions.push(instruction);
    }

    fn next_vreg(&mut self, size: IRSize) -> IRReg {
        self.current().0.next_vreg(size)
    }

    fn emit_with_result(
        &mut self,
        size: IRSize,
        build: impl FnOnce(IRReg) -> IRInstruction,
    ) -> IRReg {
        let result = self.next_vreg(size);
        self.push(build(result));
        result
    }
}

impl Backend for IRBackend {
    type Value = IRReg;
    type Storage = IRSlot;
    type Function = FunctionId;
    type Block = IRLabel;

    fn backend_type(&self) -> &'static str {
        "ir"
    }

    fn emit_constant(&mut self, value: f64) -> IRReg {
        self.emit_with_result(IRSize::F64, |result| IRInstruction::Imm(result, value))
    }

    fn emit_load(&mut self, storage: IRSlot) -> IRReg {
        self.emit_with_result(IRSize::F64, |result| IRInstruction::Load(result, storage))
    }

    fn emit_store(&mut self, value: IRReg, storage: IRSlot) {
        self.push(IRInstruction::Store(value, storage));
    }

    fn emit_arithmetic(&mut self, op: ArithmeticOp, lhs: IRReg, rhs: IRReg) -> IRReg {
        self.emit_with_result(IRSize::F64, |result| match op {
            ArithmeticOp::Add => IRInstruction::Add(result, lhs, rhs),
            ArithmeticOp::Sub => IRInstruction::Sub(result, lhs, rhs),
            ArithmeticOp::Mul => IRInstruction::Mul(result, lhs, rhs),
        })
    }

    fn emit_compare_less_than(&mut self, lhs: IRReg, rhs: IRReg) -> IRReg {
        self.emit_with_result(IRSize::B1, |result| IRInstruction::Lt(result, lhs, rhs))
    }

    fn emit_compare_not_equal(&mut self, lhs: IRReg, rhs: IRReg) -> IRReg {
        self.emit_with_result(IRSize::B1, |result| IRInstruction::Ne(result, lhs, rhs))
    }

    fn emit_bool_to_scalar(&mut self, value: IRReg) -> IRReg {
        self.emit_with_result(IRSize::F64, |result| IRInstruction::Cvb(result, value))
    }

    // A declaration is reused when the name already exists in the unit
    fn declare_function(&mut self, name: &str, parameters: &[String]) -> FunctionId {
        if let Some(&index) = self.names.get(name) {
            if let Some(function) = self.unit[index].as_mut() {
                if function.is_declaration() {
                    function.parameters = parameters.to_vec();
                }
                return FunctionId(index);
            }
        }
        let index = self.unit.len();
        self.unit.push(Some(IRFunction::declaration(name, parameters)));
        self.names.insert(name.to_string(), index);
        FunctionId(index)
    }

    fn lookup_function(&self, name: &str) -> Option<FunctionId> {
        let &index = self.names.get(name)?;
        self.unit[index].as_ref().map(|_| FunctionId(index))
    }

    fn parameter_count(&self, function: FunctionId) -> usize {
        self.function(function).map_or(0, |f| f.parameters.len())
    }

    fn has_body(&self, function: FunctionId) -> bool {
        self.function(function).map_or(false, |f| !f.is_declaration())
    }

    fn begin_function_body(&mut self, function: FunctionId) -> IRLabel {
        self.position = Some((function.0, 0));
        let (ir, _) = self.current();
        let entry = ir.add_block("entry");
        self.position = Some((function.0, entry));
        entry
    }

    fn emit_argument(&mut self, index: usize) -> IRReg {
        self.emit_with_result(IRSize::F64, |result| IRInstruction::Arg(result, index))
    }

    fn allocate_local(&mut self, name: &str) -> IRSlot {
        self.current().0.add_slot(name)
    }

    fn emit_return(&mut self, value: IRReg) {
        self.push(IRInstruction::Ret(value));
    }

    fn finish_function(&mut self, function: FunctionId) -> Result<(), BackendError> {
        self.position = None;
        match self.function(function) {
            Some(ir) => {
                log::trace!("Verifying {}", ir.name);
                verify(ir)
            }
            None => Ok(()),
        }
    }

    fn abandon_function(&mut self, function: FunctionId) {
        self.position = None;
        if let Some(ir) = self.unit.get_mut(function.0).and_then(Option::take) {
            log::debug!("Abandoned function {}", ir.name);
            self.names.remove(&ir.name);
        }
    }

    fn emit_call(&mut self, function: FunctionId, arguments: &[IRReg]) -> IRReg {
        let name = self
            .function(function)
            .map(|f| f.name.clone())
            .unwrap_or_default();
        let arguments: SmallVec<[IRReg; 4]> = arguments.iter().cloned().collect();
        self.emit_with_result(IRSize::F64, |result| {
            IRInstruction::Call(result, name, Box::new(arguments))
        })
    }

    fn new_block(&mut self, label: &str) -> IRLabel {
        self.current().0.add_block(label)
    }

    fn insertion_block(&self) -> IRLabel {
        self.position.map_or(0, |(_, label)| label)
    }

    fn set_insertion_block(&mut self, block: IRLabel) {
        if let Some((_, label)) = self.position.as_mut() {
            *label = block;
        }
    }

    fn emit_conditional_branch(&mut self, condition: IRReg, if_true: IRLabel, if_false: IRLabel) {
        self.push(IRInstruction::Jcc(condition, if_true, if_false));
    }

    fn emit_branch(&mut self, target: IRLabel) {
        self.push(IRInstruction::Jmp(target));
    }

    // Phis are kept together at the start of the block
    fn emit_value_join(&mut self, incoming: &[(IRReg, IRLabel)]) -> IRReg {
        let result = self.next_vreg(IRSize::F64);
        let sources: Vec<(IRLabel, IRReg)> =
            incoming.iter().map(|&(value, block)| (block, value)).collect();
        let (function, label) = self.current();
        let instructions = &mut function.blocks[label as usize].instructions;
        let position = instructions
            .iter()
            .take_while(|instruction| matches!(instruction, IRInstruction::Phi(_)))
            .count();
        instructions.insert(position, IRInstruction::Phi(IRPhi::new(result, &sources)));
        result
    }

    fn open_unit(&mut self) {
        self.unit.clear();
        self.names.clear();
        self.position = None;
        self.unit_count += 1;
        log::debug!("Opened unit {}", self.unit_count);
    }

    fn finalize_and_execute(&mut self, entry: &str) -> Result<f64, BackendError> {
        log::debug!("Finalizing unit {}", self.unit_count);
        self.position = None;
        self.names.clear();
        for function in self.unit.drain(..).flatten() {
            if !function.is_declaration() {
                self.jit.link(function);
            }
        }
        let result = self.jit.execute(entry, &[]);
        self.jit.unlink(entry);
        result
    }

    fn function_to_string(&self, function: FunctionId) -> String {
        self.function(function)
            .map(|f| f.to_string())
            .unwrap_or_default()
    }

    fn take_output(&mut self) -> String {
        self.jit.take_output()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // def double(x) x + x, then double(4) as the entry
    #[test]
    fn define_and_execute() {
        let mut backend = IRBackend::default();
        backend.open_unit();

        let double = backend.declare_function("double", &["x".to_string()]);
        backend.begin_function_body(double);
        let x = backend.emit_argument(0);
        let sum = backend.emit_arithmetic(ArithmeticOp::Add, x, x);
        backend.emit_return(sum);
        assert_eq!(backend.finish_function(double), Ok(()));
        assert!(backend.has_body(double));

        let entry = backend.declare_function("main", &[]);
        backend.begin_function_body(entry);
        let four = backend.emit_constant(4.0);
        let result = backend.emit_call(double, &[four]);
        backend.emit_return(result);
        assert_eq!(backend.finish_function(entry), Ok(()));

        assert_eq!(backend.finalize_and_execute("main"), Ok(8.0));
        assert!(backend.lookup_function("double").is_none());

        // Later units call the linked function by name
        backend.open_unit();
        let double = backend.declare_function("double", &["x".to_string()]);
        assert!(!backend.has_body(double));
        let entry = backend.declare_function("main", &[]);
        backend.begin_function_body(entry);
        let one = backend.emit_constant(1.0);
        let result = backend.emit_call(double, &[one]);
        backend.emit_return(result);
        assert_eq!(backend.finish_function(entry), Ok(()));
        assert_eq!(backend.finalize_and_execute("main"), Ok(2.0));
    }

    #[test]
    fn branches_join() {
        let mut backend = IRBackend::default();
        backend.open_unit();
        let entry = backend.declare_function("main", &[]);
        let start = backend.begin_function_body(entry);
        let zero = backend.emit_constant(0.0);
        let condition = backend.emit_compare_not_equal(zero, zero);
        let then = backend.new_block("then");
        let otherwise = backend.new_block("else");
        let merge = backend.new_block("ifcont");
        backend.emit_conditional_branch(condition, then, otherwise);
        assert_eq!(backend.insertion_block(), start);

        backend.set_insertion_block(then);
        let one = backend.emit_constant(1.0);
        backend.emit_branch(merge);
        backend.set_insertion_block(otherwise);
        let two = backend.emit_constant(2.0);
        backend.emit_branch(merge);

        backend.set_insertion_block(merge);
        let joined = backend.emit_value_join(&[(one, then), (two, otherwise)]);
        backend.emit_return(joined);
        assert_eq!(backend.finish_function(entry), Ok(()));
        assert_eq!(backend.finalize_and_execute("main"), Ok(2.0));
    }

    #[test]
    fn abandoned_function_is_gone() {
        let mut backend = IRBackend::default();
        backend.open_unit();
        let function = backend.declare_function("broken", &[]);
        backend.begin_function_body(function);
        backend.emit_constant(1.0);
        assert!(backend.finish_function(function).is_err());
        backend.abandon_function(function);
        assert!(backend.lookup_function("broken").is_none());
        assert_eq!(
            backend.finalize_and_execute("broken"),
            Err(BackendError::MissingEntry("broken".to_string()))
        );
    }
}
