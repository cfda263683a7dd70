use bitvec::prelude::BitVec;

use super::{IRFunction, IRInstruction, IRReg, CFG};
use crate::backend::BackendError;

/// Checks the structure of a finished function
/// Every block ends in exactly one terminator, phis lead their block and name predecessors,
/// every vreg is defined once, every use refers to a definition of the right size
pub fn verify(function: &IRFunction) -> Result<(), BackendError> {
    let fail = |message: String| BackendError::Verification {
        function: function.name.clone(),
        message,
    };

    if function.is_declaration() {
        return Ok(());
    }

    let block_count = function.blocks.len() as u32;
    let vreg_count = function.vreg_count();
    let mut defined: BitVec = BitVec::repeat(false, vreg_count);

    for block in &function.blocks {
        let length = block.instructions.len();
        if block.terminator().is_none() {
            return Err(fail(format!("block {}{} has no terminator", block.name, block.label)));
        }
        for (index, instruction) in block.instructions.iter().enumerate() {
            if instruction.is_terminator() && index + 1 != length {
                return Err(fail(format!(
                    "terminator in the middle of block {}{}",
                    block.name, block.label
                )));
            }
            for label in instruction.get_successors() {
                if label >= block_count {
                    return Err(fail(format!("jump to missing block {}", label)));
                }
            }
            if let Some(result) = instruction.get_result() {
                check_vreg(function, result).map_err(fail)?;
                if defined[result as usize] {
                    return Err(fail(format!("%{} is defined twice", result)));
                }
                defined.set(result as usize, true);
                if function.vreg_sizes[result as usize] != instruction.get_result_size() {
                    return Err(fail(format!("%{} has the wrong type", result)));
                }
            }
            match instruction {
                &IRInstruction::Arg(_, index) if index >= function.parameters.len() => {
                    return Err(fail(format!("argument {} out of range", index)));
                }
                &IRInstruction::Load(_, slot) | &IRInstruction::Store(_, slot)
                    if slot as usize >= function.slots.len() =>
                {
                    return Err(fail(format!("slot ${} out of range", slot)));
                }
                _ => (),
            }
        }
    }

    let cfg = CFG::construct(function);
    for block in &function.blocks {
        let mut leading = true;
        let mut seen: BitVec = BitVec::repeat(false, vreg_count);
        for instruction in &block.instructions {
            if let IRInstruction::Phi(phi) = instruction {
                if !leading {
                    return Err(fail(format!("phi %{} does not lead its block", phi.target)));
                }
                let predecessors = &cfg[block.label].predecessors;
                for (label, _) in &phi.sources {
                    if !predecessors.contains(label) {
                        return Err(fail(format!(
                            "phi %{} names L{}, which is not a predecessor",
                            phi.target, label
                        )));
                    }
                }
            } else {
                leading = false;
            }

            for (vreg, size) in instruction.get_used_vreg() {
                check_vreg(function, vreg).map_err(fail)?;
                if !defined[vreg as usize] {
                    return Err(fail(format!("%{} is used but never defined", vreg)));
                }
                if function.vreg_sizes[vreg as usize] != size {
                    return Err(fail(format!("%{} is used as {}", vreg, size)));
                }
            }

            // Uses inside a block must follow the definition when both are in the block
            for (vreg, _) in instruction.get_used_vreg() {
                if !matches!(instruction, IRInstruction::Phi(_))
                    && defined_later_in(block, vreg, &seen)
                {
                    return Err(fail(format!("%{} is used before its definition", vreg)));
                }
            }
            if let Some(result) = instruction.get_result() {
                seen.set(result as usize, true);
            }
        }
    }

    Ok(())
}

fn check_vreg(function: &IRFunction, vreg: IRReg) -> Result<(), String> {
    if (vreg as usize) < function.vreg_count() {
        Ok(())
    } else {
        Err(format!("%{} was never allocated", vreg))
    }
}

fn defined_later_in(block: &super::IRBlock, vreg: IRReg, seen: &BitVec) -> bool {
    !seen[vreg as usize]
        && block
            .instructions
            .iter()
            .any(|instruction| instruction.get_result() == Some(vreg))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::ir::{IRPhi, IRSize};

    fn constant_function() -> IRFunction {
        let mut function = IRFunction::declaration("f", &[]);
        let entry = function.add_block("entry");
        let value = function.next_vreg(IRSize::F64);
        function.blocks[entry as usize].instructions =
            vec![IRInstruction::Imm(value, 1.0), IRInstruction::Ret(value)];
        function
    }

    #[test]
    fn accepts_valid_function() {
        assert_eq!(verify(&constant_function()), Ok(()));
        assert_eq!(verify(&IRFunction::declaration("g", &[])), Ok(()));
    }

    #[test]
    fn missing_terminator() {
        let mut function = constant_function();
        function.blocks[0].instructions.pop();
        assert!(matches!(
            verify(&function),
            Err(BackendError::Verification { .. })
        ));
    }

    #[test]
    fn use_before_definition() {
        let mut function = constant_function();
        let later = function.next_vreg(IRSize::F64);
        let sum = function.next_vreg(IRSize::F64);
        function.blocks[0].instructions = vec![
            IRInstruction::Add(sum, later, later),
            IRInstruction::Imm(later, 1.0),
            IRInstruction::Ret(sum),
        ];
        assert!(verify(&function).is_err());
    }

    #[test]
    fn boolean_returned() {
        let mut function = constant_function();
        let condition = function.next_vreg(IRSize::B1);
        function.blocks[0].instructions = vec![
            IRInstruction::Imm(0, 1.0),
            IRInstruction::Lt(condition, 0, 0),
            IRInstruction::Ret(condition),
        ];
        assert!(verify(&function).is_err());
    }

    #[test]
    fn phi_from_non_predecessor() {
        let mut function = constant_function();
        let other = function.add_block("other");
        let joined = function.next_vreg(IRSize::F64);
        function.blocks[other as usize].instructions = vec![
            IRInstruction::Phi(IRPhi::new(joined, &[(other, 0)])),
            IRInstruction::Ret(joined),
        ];
        assert!(verify(&function).is_err());
    }
}
