pub mod operator_table;
pub mod prototype_table;
pub mod scope_table;

pub use self::operator_table::OperatorTable;
pub use self::prototype_table::PrototypeTable;
pub use self::scope_table::{ScopeTable, UndoList};
