use std::{
    fmt::{self, Display},
    ops::Index,
};

use smallvec::SmallVec;

use super::{IRFunction, IRLabel};

pub struct ControlFlowNode {
    pub predecessors: SmallVec<[u32; 4]>,
    pub successors: SmallVec<[u32; 4]>,
    pub label: u32,
}

impl Display for ControlFlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {} -> {:?}",
            self.predecessors, self.label, self.successors
        )
    }
}

impl ControlFlowNode {
    pub fn new(label: u32) -> ControlFlowNode {
        ControlFlowNode {
            predecessors: SmallVec::new(),
            successors: SmallVec::new(),
            label,
        }
    }
}

pub struct ControlFlowGraph {
    pub graph: Vec<ControlFlowNode>,
}

pub type CFG = ControlFlowGraph;

impl ControlFlowGraph {
    pub fn to_string(cfg: &ControlFlowGraph) -> String {
        let mut result = String::new();
        for block in &cfg.graph {
            result.push_str(&format!("{}\n", block));
        }
        result
    }

    // Successors come from the terminator of every block, jumps out of range are ignored
    fn find_successors(cfg: &mut ControlFlowGraph, function: &IRFunction) {
        let length = cfg.len() as IRLabel;
        for (node, block) in cfg.graph.iter_mut().zip(&function.blocks) {
            if let Some(terminator) = block.terminator() {
                node.successors = terminator
                    .get_successors()
                    .into_iter()
                    .filter(|&label| label < length)
                    .collect();
            }
        }
    }

    fn find_predecessors(cfg: &mut ControlFlowGraph) {
        for block in 0..cfg.graph.len() {
            for successor in cfg.graph[block].successors.clone() {
                let predecessors = &mut cfg.graph[successor as usize].predecessors;
                if !predecessors.contains(&(block as u32)) {
                    predecessors.push(block as u32);
                }
            }
        }
    }

    pub fn construct(function: &IRFunction) -> ControlFlowGraph {
        let graph = function
            .blocks
            .iter()
            .map(|block| ControlFlowNode::new(block.label))
            .collect();
        let mut cfg = ControlFlowGraph { graph };
        CFG::find_successors(&mut cfg, function);
        CFG::find_predecessors(&mut cfg);
        log::trace!("CFG of {}:\n{}", function.name, CFG::to_string(&cfg));
        cfg
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }
}

impl Index<usize> for ControlFlowGraph {
    type Output = ControlFlowNode;
    fn index(&self, index: usize) -> &Self::Output {
        &self.graph[index]
    }
}
impl Index<u32> for ControlFlowGraph {
    type Output = ControlFlowNode;
    fn index(&self, index: u32) -> &Self::Output {
        &self[index as usize]
    }
}
