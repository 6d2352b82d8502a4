pub mod attribute;
pub mod body;
pub mod error;
pub mod instruction;
pub mod module;
pub mod parameter;
pub mod procedure;
pub mod type_def;
pub mod type_ref;
