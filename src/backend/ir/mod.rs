pub mod control_flow_graph;
pub mod ir;
pub mod ir_phi;
pub mod print_ir;
pub mod verify;

pub use self::control_flow_graph::*;
pub use self::ir::*;
pub use self::verify::verify;
pub use ir_phi::*;
