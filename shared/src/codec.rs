use crate::symbol::{
    body::Body,
    instruction::{CallTarget, CodecCall, Instruction, LocalId},
    type_ref::TypeRef,
};

/// Codec procedure that writes one value of `ty`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WriteOp {
    pub symbol: String,
    pub ty: TypeRef,
}

/// Codec procedure that reads one value of `ty`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReadOp {
    pub symbol: String,
    pub ty: TypeRef,
}

/// Type-to-serializer resolution supplied by the host environment.
pub trait CodecService {
    /// Whether `ty` has both a serializer and a deserializer.
    fn has_serializer(&self, ty: &TypeRef) -> bool;

    fn writer_for(&self, ty: &TypeRef) -> Option<WriteOp>;

    fn reader_for(&self, ty: &TypeRef) -> Option<ReadOp>;

    /// Declares a local in `body` and returns it along with the instructions that fill it
    /// from the reader argument at `reader_arg`. The instructions are not emitted.
    fn create_read(
        &self,
        body: &mut Body,
        reader_arg: usize,
        ty: &TypeRef,
    ) -> Option<(LocalId, Vec<Instruction>)> {
        let read_op = self.reader_for(ty)?;
        let local = body.declare_local(ty.clone());
        let instructions = vec![
            Instruction::LoadArg(reader_arg),
            Instruction::Call(CallTarget::Codec(CodecCall::Read(read_op))),
            Instruction::StoreLocal(local),
        ];
        Some((local, instructions))
    }
}
