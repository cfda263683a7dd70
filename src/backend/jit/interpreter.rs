use std::collections::HashMap;

use super::runtime;
use crate::backend::ir::{IRFunction, IRInstruction, IRLabel};
use crate::backend::BackendError;

pub const MAX_CALL_DEPTH: usize = 512;

// Executes linked functions, calls are resolved by name on every call
pub struct Interpreter<'a> {
    symbols: &'a HashMap<String, IRFunction>,
    output: &'a mut String,
    steps: u64,
    step_limit: u64,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        symbols: &'a HashMap<String, IRFunction>,
        output: &'a mut String,
        step_limit: u64,
    ) -> Interpreter<'a> {
        Interpreter {
            symbols,
            output,
            steps: 0,
            step_limit,
            depth: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn call(&mut self, name: &str, arguments: &[f64]) -> Result<f64, BackendError> {
        let symbols = self.symbols;
        if let Some(function) = symbols.get(name).filter(|f| !f.is_declaration()) {
            check_arity(name, function.parameters.len(), arguments.len())?;
            if self.depth >= MAX_CALL_DEPTH {
                return Err(BackendError::CallDepth(MAX_CALL_DEPTH));
            }
            self.depth += 1;
            let result = self.run(function, arguments);
            self.depth -= 1;
            result
        } else if let Some(host) = runtime::lookup(name) {
            check_arity(name, host.arity, arguments.len())?;
            self.step()?;
            Ok((host.function)(arguments, self.output))
        } else {
            Err(BackendError::UnresolvedSymbol(name.to_string()))
        }
    }

    fn step(&mut self) -> Result<(), BackendError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            Err(BackendError::StepLimit(self.step_limit))
        } else {
            Ok(())
        }
    }

    fn run(&mut self, function: &IRFunction, arguments: &[f64]) -> Result<f64, BackendError> {
        use IRInstruction::*;

        // Booleans are kept as 0.0 and 1.0
        let mut vregs = vec![0.0; function.vreg_count()];
        let mut slots = vec![0.0; function.slots.len()];
        let mut previous: Option<IRLabel> = None;
        let mut current: IRLabel = 0;

        loop {
            let block = function.blocks.get(current as usize).ok_or_else(|| {
                BackendError::Verification {
                    function: function.name.clone(),
                    message: format!("jump to missing block {}", current),
                }
            })?;

            // Phis read their sources together before any of them is written
            let joined: Vec<_> = block
                .instructions
                .iter()
                .map_while(|instruction| match instruction {
                    Phi(phi) => Some((
                        phi.target,
                        previous.and_then(|from| phi.source(from)),
                    )),
                    _ => None,
                })
                .collect();
            for &(target, source) in &joined {
                self.step()?;
                vregs[target as usize] = source.map_or(0.0, |vreg| vregs[vreg as usize]);
            }

            let mut next = None;
            for instruction in &block.instructions[joined.len()..] {
                self.step()?;
                match instruction {
                    &Imm(result, value) => vregs[result as usize] = value,
                    &Arg(result, index) => vregs[result as usize] = arguments[index],
                    &Load(result, slot) => vregs[result as usize] = slots[slot as usize],
                    &Store(value, slot) => slots[slot as usize] = vregs[value as usize],
                    &Add(result, left, right) => {
                        vregs[result as usize] = vregs[left as usize] + vregs[right as usize]
                    }
                    &Sub(result, left, right) => {
                        vregs[result as usize] = vregs[left as usize] - vregs[right as usize]
                    }
                    &Mul(result, left, right) => {
                        vregs[result as usize] = vregs[left as usize] * vregs[right as usize]
                    }
                    &Lt(result, left, right) => {
                        let (left, right) = (vregs[left as usize], vregs[right as usize]);
                        vregs[result as usize] = bool_value(left < right || left.is_nan() || right.is_nan());
                    }
                    &Ne(result, left, right) => {
                        let (left, right) = (vregs[left as usize], vregs[right as usize]);
                        vregs[result as usize] = bool_value(left < right || left > right);
                    }
                    &Cvb(result, value) => vregs[result as usize] = vregs[value as usize],
                    Call(result, name, call_arguments) => {
                        let values: Vec<f64> = call_arguments
                            .iter()
                            .map(|&vreg| vregs[vreg as usize])
                            .collect();
                        vregs[*result as usize] = self.call(name, &values)?;
                    }
                    Phi(phi) => {
                        return Err(BackendError::Verification {
                            function: function.name.clone(),
                            message: format!("phi %{} does not lead its block", phi.target),
                        })
                    }
                    &Jcc(condition, if_true, if_false) => {
                        next = Some(if vregs[condition as usize] != 0.0 {
                            if_true
                        } else {
                            if_false
                        });
                        break;
                    }
                    &Jmp(target) => {
                        next = Some(target);
                        break;
                    }
                    &Ret(value) => return Ok(vregs[value as usize]),
                }
            }

            match next {
                Some(label) => {
                    previous = Some(current);
                    current = label;
                }
                None => {
                    return Err(BackendError::Verification {
                        function: function.name.clone(),
                        message: format!("block {}{} falls through", block.name, block.label),
                    })
                }
            }
        }
    }
}

fn bool_value(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn check_arity(callee: &str, expected: usize, found: usize) -> Result<(), BackendError> {
    if expected == found {
        Ok(())
    } else {
        Err(BackendError::ArgumentCount {
            callee: callee.to_string(),
            expected,
            found,
        })
    }
}
