use thiserror::Error;

use rpcweave_shared::SymbolError;

/// Reasons a procedure annotated as a remote call is rejected. The procedure is left
/// unmodified; the rest of the type is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// More than one RPC annotation, other than the ObserversRpc + TargetRpc pair
    #[error("{procedure} RPC method cannot have multiple RPC attributes. Only ObserversRpc and TargetRpc may be used together")]
    MultipleRpcAttributes { procedure: String },

    #[error("{procedure} RPC method cannot be static")]
    Static { procedure: String },

    #[error("{procedure} RPC method cannot contain generic parameters")]
    GenericProcedure { procedure: String },

    #[error("{procedure} RPC method cannot be abstract")]
    Abstract { procedure: String },

    #[error("{procedure} RPC method must return void, found {return_type}")]
    NonVoidReturn {
        procedure: String,
        return_type: String,
    },

    /// A TargetRpc must name its recipient as the first parameter
    #[error("Target RPC {procedure} must have a NetworkConnection as the first parameter")]
    MissingTargetConnection { procedure: String },

    #[error("RPC method {procedure} parameter {parameter} has open generic type {parameter_type}, which is not supported")]
    GenericParameter {
        procedure: String,
        parameter: String,
        parameter_type: String,
    },

    /// The codec has no serializer/deserializer pair for a parameter type
    #[error("RPC method {procedure} parameter type {parameter_type} does not support serialization. Use a supported type or create a custom serializer")]
    Unserializable {
        procedure: String,
        parameter_type: String,
    },
}

/// Failures while building a procedure's writer, reader or logic. The original procedure
/// is cleared and gets no dispatch registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("Could not resolve a writer for type {parameter_type} while building the writer of {procedure}")]
    MissingWriter {
        procedure: String,
        parameter_type: String,
    },

    #[error("Could not resolve a reader for type {parameter_type} while building the reader of {procedure}")]
    MissingReader {
        procedure: String,
        parameter_type: String,
    },

    #[error("Target RPC {procedure} has no connection parameter to send to")]
    MissingTargetConnection { procedure: String },

    /// The original body was already moved out and no logic procedure holds it
    #[error("Body of {procedure} has already been relocated and no logic procedure exists for it")]
    BodyPending { procedure: String },

    #[error("{procedure} has no {kind} writer to redirect calls to")]
    IncompleteTriad { procedure: String, kind: &'static str },

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Failures of the virtual-logic redirection pass. The offending call is left unpatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Could not find base method for {logic} on {type_name}")]
    BaseLogicNotFound { type_name: String, logic: String },

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Any error reported while weaving a module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeaveError {
    /// The type and its ancestors need more RPC ids than allowed; nothing in the type is registered
    #[error("{type_name} and inherited types need {required} RPC methods, exceeding the allowance of {allowance}. Only {allowance} RPC methods are supported per inheritance hierarchy")]
    QuotaExceeded {
        type_name: String,
        required: u32,
        allowance: u32,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}
