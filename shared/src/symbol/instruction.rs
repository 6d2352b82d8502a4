use crate::{
    codec::{ReadOp, WriteOp},
    symbol::type_ref::TypeRef,
    types::Channel,
};

/// Constant operands pushed by `Instruction::LoadConst`.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    U32(u32),
    Channel(Channel),
}

/// Branch target within one instruction block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

/// Index into a body's local variable table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalId(pub usize);

impl LocalId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Symbolic reference to an instance procedure. Resolution starts at `declaring_type`
/// and walks up its ancestors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub declaring_type: String,
    pub name: String,
    pub parameter_types: Vec<TypeRef>,
}

impl MethodRef {
    pub fn new(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        parameter_types: Vec<TypeRef>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            parameter_types,
        }
    }

    /// Operands consumed by a call, including the receiving object.
    pub fn arity(&self) -> usize {
        self.parameter_types.len() + 1
    }
}

/// Primitives supplied by the networking runtime. Every call takes the receiving object
/// as its first operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeCall {
    /// `(self, id, writer, channel)`
    SendServerRpc,
    /// `(self, id, writer, channel, buffer_last)`
    SendObserversRpc,
    /// `(self, id, writer, channel, connection)`
    SendTargetRpc,
    /// `(self) -> bool`
    IsOwner,
    /// `(self) -> bool`
    IsClient,
    /// `(self) -> bool`
    IsServer,
    /// `(self, connection) -> bool`
    CompareOwner,
    /// `(self) -> connection`
    LocalConnection,
}

impl RuntimeCall {
    pub fn arity(&self) -> usize {
        match self {
            RuntimeCall::SendServerRpc => 4,
            RuntimeCall::SendObserversRpc | RuntimeCall::SendTargetRpc => 5,
            RuntimeCall::CompareOwner => 2,
            RuntimeCall::IsOwner
            | RuntimeCall::IsClient
            | RuntimeCall::IsServer
            | RuntimeCall::LocalConnection => 1,
        }
    }

    pub fn produces_value(&self) -> bool {
        !matches!(
            self,
            RuntimeCall::SendServerRpc | RuntimeCall::SendObserversRpc | RuntimeCall::SendTargetRpc
        )
    }
}

/// Serialization primitives supplied by the codec.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecCall {
    /// `() -> writer`
    AcquireWriter,
    /// `(writer)`
    ReleaseWriter,
    /// `(writer, value)`
    Write(WriteOp),
    /// `(reader) -> value`
    Read(ReadOp),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CallTarget {
    /// Virtual call: an override on the receiver's runtime type wins.
    Method(MethodRef),
    /// Non-virtual call to the implementation found from `declaring_type` upwards, as made
    /// by `base.Name(..)`.
    Base(MethodRef),
    Runtime(RuntimeCall),
    Codec(CodecCall),
    /// Any other symbol the body calls into; consumes `arity` operands, produces nothing.
    External { symbol: String, arity: usize },
}

/// Stack-machine instruction. Labels are scoped to the block that contains them.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    LoadSelf,
    LoadArg(usize),
    LoadLocal(LocalId),
    StoreLocal(LocalId),
    LoadConst(Constant),
    Pop,
    Call(CallTarget),
    Jump(Label),
    BranchIfTrue(Label),
    BranchIfFalse(Label),
    BranchIfNull(Label),
    Mark(Label),
    /// Runtime warning emitted by the generated code.
    Warn(String),
    /// `cleanup` runs on every exit path out of `body`, including errors.
    Protected {
        body: Vec<Instruction>,
        cleanup: Vec<Instruction>,
    },
    Return,
}

impl Instruction {
    pub fn call_method(method: MethodRef) -> Self {
        Instruction::Call(CallTarget::Method(method))
    }

    pub fn call_base(method: MethodRef) -> Self {
        Instruction::Call(CallTarget::Base(method))
    }

    pub fn call_runtime(call: RuntimeCall) -> Self {
        Instruction::Call(CallTarget::Runtime(call))
    }

    pub fn call_codec(call: CodecCall) -> Self {
        Instruction::Call(CallTarget::Codec(call))
    }

    pub fn call_external(symbol: impl Into<String>, arity: usize) -> Self {
        Instruction::Call(CallTarget::External {
            symbol: symbol.into(),
            arity,
        })
    }

    pub fn called_method(&self) -> Option<&MethodRef> {
        match self {
            Instruction::Call(CallTarget::Method(method) | CallTarget::Base(method)) => Some(method),
            _ => None,
        }
    }

    fn label(&self) -> Option<Label> {
        match self {
            Instruction::Jump(label)
            | Instruction::BranchIfTrue(label)
            | Instruction::BranchIfFalse(label)
            | Instruction::BranchIfNull(label)
            | Instruction::Mark(label) => Some(*label),
            _ => None,
        }
    }

    pub(crate) fn highest_label(block: &[Instruction]) -> Option<u32> {
        block
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Protected { body, cleanup } => {
                    Self::highest_label(body).max(Self::highest_label(cleanup))
                }
                other => other.label().map(|label| label.0),
            })
            .max()
    }
}
