use smallvec::{smallvec, SmallVec};

use super::ir_phi::IRPhi;

pub type IRReg = u32;
pub type IRLabel = u32;
pub type IRSlot = u32;

/// Stores a function and all the associated information
/// A function without blocks is only a declaration
#[derive(Clone, Debug, PartialEq)]
pub struct IRFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub blocks: Vec<IRBlock>,
    pub slots: Vec<String>,
    pub vreg_sizes: Vec<IRSize>,
}

/// A basic block, its label is its index in the function
#[derive(Clone, Debug, PartialEq)]
pub struct IRBlock {
    pub label: IRLabel,
    pub name: String,
    pub instructions: Vec<IRInstruction>,
}

/// All instructions that are available in the Immediate representation
#[derive(Clone, Debug, PartialEq)]
pub enum IRInstruction {
    Imm(IRReg, f64),
    Arg(IRReg, usize),

    Load(IRReg, IRSlot),  // Result slot
    Store(IRReg, IRSlot), // From slot

    Add(IRReg, IRReg, IRReg),
    Sub(IRReg, IRReg, IRReg),
    Mul(IRReg, IRReg, IRReg),

    Lt(IRReg, IRReg, IRReg), // unordered or less than
    Ne(IRReg, IRReg, IRReg), // ordered and not equal
    Cvb(IRReg, IRReg),       // boolean to scalar

    Call(IRReg, String, Box<SmallVec<[IRReg; 4]>>),
    Phi(Box<IRPhi>),

    Jcc(IRReg, IRLabel, IRLabel), // (condition, if true, if false)
    Jmp(IRLabel),
    Ret(IRReg),
}

// This is a copy of IRInstruction without the inputs used to simplify printing
#[derive(Clone, Debug, PartialEq)]
pub enum IRType {
    Imm,
    Arg,
    Load,
    Store,
    Add,
    Sub,
    Mul,
    Lt,
    Ne,
    Cvb,
    Call,
    Phi,
    Jcc,
    Jmp,
    Ret,
}

// Stores the type of a virtual register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IRSize {
    F64,
    B1,
}

impl IRFunction {
    pub fn declaration(name: &str, parameters: &[String]) -> IRFunction {
        IRFunction {
            name: name.to_string(),
            parameters: parameters.to_vec(),
            blocks: Vec::new(),
            slots: Vec::new(),
            vreg_sizes: Vec::new(),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn vreg_count(&self) -> usize {
        self.vreg_sizes.len()
    }

    pub fn next_vreg(&mut self, size: IRSize) -> IRReg {
        let vreg = self.vreg_sizes.len() as IRReg;
        self.vreg_sizes.push(size);
        vreg
    }

    pub fn add_block(&mut self, name: &str) -> IRLabel {
        let label = self.blocks.len() as IRLabel;
        self.blocks.push(IRBlock {
            label,
            name: name.to_string(),
            instructions: Vec::new(),
        });
        label
    }

    pub fn add_slot(&mut self, name: &str) -> IRSlot {
        let slot = self.slots.len() as IRSlot;
        self.slots.push(name.to_string());
        slot
    }
}

impl IRBlock {
    pub fn terminator(&self) -> Option<&IRInstruction> {
        self.instructions.last().filter(|ins| ins.is_terminator())
    }
}

impl IRInstruction {
    // Transforms the IRInstruction to the simplified version
    pub fn to_type(&self) -> IRType {
        match self {
            &Self::Imm(..) => IRType::Imm,
            &Self::Arg(..) => IRType::Arg,
            &Self::Load(..) => IRType::Load,
            &Self::Store(..) => IRType::Store,
            &Self::Add(..) => IRType::Add,
            &Self::Sub(..) => IRType::Sub,
            &Self::Mul(..) => IRType::Mul,
            &Self::Lt(..) => IRType::Lt,
            &Self::Ne(..) => IRType::Ne,
            &Self::Cvb(..) => IRType::Cvb,
            &Self::Call(..) => IRType::Call,
            &Self::Phi(..) => IRType::Phi,
            &Self::Jcc(..) => IRType::Jcc,
            &Self::Jmp(..) => IRType::Jmp,
            &Self::Ret(..) => IRType::Ret,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Jcc(..) | Self::Jmp(..) | Self::Ret(..))
    }

    // Returns the result vregister if it exists
    pub fn get_result(&self) -> Option<IRReg> {
        match self {
            &Self::Imm(result, ..)
            | &Self::Arg(result, ..)
            | &Self::Load(result, ..)
            | &Self::Add(result, ..)
            | &Self::Sub(result, ..)
            | &Self::Mul(result, ..)
            | &Self::Lt(result, ..)
            | &Self::Ne(result, ..)
            | &Self::Cvb(result, ..)
            | &Self::Call(result, ..) => Some(result),
            Self::Phi(phi) => Some(phi.target),
            _ => None,
        }
    }

    // Returns the type of the result of an instruction
    pub fn get_result_size(&self) -> IRSize {
        match self {
            Self::Lt(..) | Self::Ne(..) => IRSize::B1,
            _ => IRSize::F64,
        }
    }

    // Returns every used vregister together with the type it must have
    pub fn get_used_vreg(&self) -> SmallVec<[(IRReg, IRSize); 4]> {
        use IRInstruction::*;
        match self {
            Imm(..) | Arg(..) | Load(..) | Jmp(..) => SmallVec::new(),
            Store(value, _) | Ret(value) => smallvec![(*value, IRSize::F64)],
            Add(_, left, right)
            | Sub(_, left, right)
            | Mul(_, left, right)
            | Lt(_, left, right)
            | Ne(_, left, right) => smallvec![(*left, IRSize::F64), (*right, IRSize::F64)],
            Cvb(_, value) | Jcc(value, ..) => smallvec![(*value, IRSize::B1)],
            Call(_, _, arguments) => arguments.iter().map(|&arg| (arg, IRSize::F64)).collect(),
            Phi(phi) => phi
                .sources
                .iter()
                .map(|&(_label, vreg)| (vreg, IRSize::F64))
                .collect(),
        }
    }

    // Returns the labels this instruction may jump to
    pub fn get_successors(&self) -> SmallVec<[IRLabel; 2]> {
        match self {
            &Self::Jcc(_, if_true, if_false) => smallvec![if_true, if_false],
            &Self::Jmp(target) => smallvec![target],
            _ => SmallVec::new(),
        }
    }
}
