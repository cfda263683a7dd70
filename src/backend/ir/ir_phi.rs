use smallvec::SmallVec;

use super::{IRLabel, IRReg};

// Joins one value per incoming block into target
#[derive(Clone, Debug, PartialEq)]
pub struct IRPhi {
    pub target: IRReg,
    pub sources: SmallVec<[(IRLabel, IRReg); 2]>,
}

impl IRPhi {
    pub fn new(target: IRReg, sources: &[(IRLabel, IRReg)]) -> Box<IRPhi> {
        Box::new(IRPhi {
            target,
            sources: sources.iter().cloned().collect(),
        })
    }

    // The value flowing in from the given predecessor
    pub fn source(&self, from: IRLabel) -> Option<IRReg> {
        self.sources
            .iter()
            .find(|&&(label, _)| label == from)
            .map(|&(_, vreg)| vreg)
    }
}
