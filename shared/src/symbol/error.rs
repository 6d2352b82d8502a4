use thiserror::Error;

/// Errors that can occur while querying or mutating the symbol model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// No type with this name is declared in the module
    #[error("Type {name} is not declared in this module")]
    TypeNotFound { name: String },

    /// A type index did not refer to any type in the module
    #[error("Type index {index} is out of range for this module")]
    UnknownTypeIndex { index: usize },

    /// A type with this name was already added
    #[error("Type {name} is already declared in this module")]
    DuplicateType { name: String },

    /// A type names a base type that is not part of the module
    #[error("Type {type_name} derives from {base}, which is not declared in this module")]
    BaseTypeNotFound { type_name: String, base: String },

    /// The inheritance chain of a type loops back onto itself
    #[error("Inheritance chain of {type_name} contains a cycle")]
    InheritanceCycle { type_name: String },

    /// A procedure id did not refer to any procedure of the type
    #[error("Procedure #{index} does not exist on type {type_name}")]
    ProcedureNotFound { type_name: String, index: usize },

    /// A procedure with the same name and parameter types already exists on the type
    #[error("Procedure {signature} is already declared on type {type_name}")]
    DuplicateSignature { type_name: String, signature: String },

    /// A synthesized procedure with the same key already exists on the type
    #[error("Synthesized procedure {name} already exists on type {type_name}")]
    DuplicateSynthesized { type_name: String, name: String },

    /// A replacement procedure does not play the same part as the one it replaces
    #[error("Procedure {name} on type {type_name} cannot replace a procedure of a different origin")]
    OriginMismatch { type_name: String, name: String },

    /// A method reference could not be resolved on the type or its ancestors
    #[error("Method {name} could not be resolved on {type_name} or its base types")]
    MethodNotFound { type_name: String, name: String },
}
