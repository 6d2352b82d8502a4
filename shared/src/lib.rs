//! # rpcweave Shared
//! Symbol model, codec service and diagnostics shared between the rpcweave weaver and its
//! test harness.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod codec;
mod diagnostics;
mod symbol;
mod types;

pub use codec::{CodecService, ReadOp, WriteOp};
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsSink, Severity};
pub use symbol::{
    attribute::{Attribute, AttributeValue},
    body::{Body, BodySlot, DebugInfo, SequencePoint},
    error::SymbolError,
    instruction::{
        CallTarget, CodecCall, Constant, Instruction, Label, LocalId, MethodRef, RuntimeCall,
    },
    module::{Module, TypeIndex},
    parameter::Parameter,
    procedure::{Modifiers, Origin, Procedure, Signature, SynthKey, SynthRole, Visibility},
    type_def::{ProcedureId, TypeDef},
    type_ref::TypeRef,
};
pub use types::{Channel, RemoteCallKind, RpcId};
