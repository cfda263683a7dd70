use super::ir::*;
use std::fmt;
use std::fmt::Display;

// This prints the IR in an LLVM like format using the Display trait

impl Display for IRFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|name| format!("{} %{}", IRSize::F64, name))
            .collect::<Vec<_>>()
            .join(", ");

        if self.is_declaration() {
            return writeln!(f, "declare {} @{}({})", IRSize::F64, self.name, parameters);
        }

        writeln!(f, "define {} @{}({}) {{", IRSize::F64, self.name, parameters)?;
        if !self.slots.is_empty() {
            let slots = self
                .slots
                .iter()
                .enumerate()
                .map(|(index, name)| format!("${}={}", index, name))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "; slots: {}", slots)?;
        }
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        writeln!(f, "}}")
    }
}

impl Display for IRBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}{}:", self.name, self.label)?;
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

impl Display for IRInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use IRInstruction::*;
        let ins = self.to_type();
        let size = IRSize::F64;
        match self {
            Imm(reg, value) => write!(f, "\t%{} = {} {} #{}", reg, ins, size, value),
            Arg(reg, index) => write!(f, "\t%{} = {} {} {}", reg, ins, size, index),
            Load(reg, slot) => write!(f, "\t%{} = {} {} ${}", reg, ins, size, slot),
            Store(value, slot) => write!(f, "\t{} {} %{}, ${}", ins, size, value, slot),
            Add(result, left, right)
            | Sub(result, left, right)
            | Mul(result, left, right)
            | Lt(result, left, right)
            | Ne(result, left, right) => {
                write!(f, "\t%{} = {} {} %{}, %{}", result, ins, size, left, right)
            }
            Cvb(result, value) => write!(f, "\t%{} = {} {} %{}", result, ins, IRSize::B1, value),
            Call(result, name, arguments) => {
                let arguments = arguments
                    .iter()
                    .map(|arg| format!("%{}", arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "\t%{} = {} {} @{}({})", result, ins, size, name, arguments)
            }
            Phi(phi) => {
                let sources = phi
                    .sources
                    .iter()
                    .map(|(label, vreg)| format!("[%{}, L{}]", vreg, label))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "\t%{} = {} {} {}", phi.target, ins, size, sources)
            }
            Jcc(condition, if_true, if_false) => write!(
                f,
                "\t{} {} %{}, L{}, L{}",
                ins,
                IRSize::B1,
                condition,
                if_true,
                if_false
            ),
            Jmp(label) => write!(f, "\t{} L{}", ins, label),
            Ret(reg) => write!(f, "\t{} {} %{}", ins, size, reg),
        }
    }
}

impl Display for IRType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use IRType::*;
        match self {
            Imm => write!(f, "loadi"),
            Arg => write!(f, "arg"),
            Load => write!(f, "load"),
            Store => write!(f, "store"),
            Add => write!(f, "add"),
            Sub => write!(f, "sub"),
            Mul => write!(f, "mul"),
            Lt => write!(f, "lt"),
            Ne => write!(f, "ne"),
            Cvb => write!(f, "cvb"),
            Call => write!(f, "call"),
            Phi => write!(f, "phi"),
            Jcc => write!(f, "jcc"),
            Jmp => write!(f, "jmp"),
            Ret => write!(f, "ret"),
        }
    }
}

impl Display for IRSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IRSize::F64 => write!(f, "double"),
            IRSize::B1 => write!(f, "b1"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::ir::IRPhi;
    use expect_test::expect;

    #[test]
    fn declaration() {
        let function = IRFunction::declaration("sin", &["x".to_string()]);
        expect![[r#"
            declare double @sin(double %x)
        "#]]
        .assert_eq(&function.to_string());
    }

    #[test]
    fn definition() {
        let mut function = IRFunction::declaration("f", &["a".to_string()]);
        let entry = function.add_block("entry");
        let slot = function.add_slot("a");
        let arg = function.next_vreg(IRSize::F64);
        let load = function.next_vreg(IRSize::F64);
        let phi = function.next_vreg(IRSize::F64);
        function.blocks[entry as usize].instructions = vec![
            IRInstruction::Arg(arg, 0),
            IRInstruction::Store(arg, slot),
            IRInstruction::Load(load, slot),
            IRInstruction::Phi(IRPhi::new(phi, &[(entry, load)])),
            IRInstruction::Ret(phi),
        ];
        expect![[r#"
            define double @f(double %a) {
            ; slots: $0=a
            entry0:
            	%0 = arg double 0
            	store double %0, $0
            	%1 = load double $0
            	%2 = phi double [%1, L0]
            	ret double %2
            }
        "#]]
        .assert_eq(&function.to_string());
    }
}
