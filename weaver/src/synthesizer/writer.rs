use rpcweave_shared::{
    Body, CodecCall, CodecService, Constant, DiagnosticsSink, Instruction, Procedure,
    RemoteCallKind, RpcId, RuntimeCall, TypeRef,
};

use crate::{
    classifier::Classification, error::SynthesisError, synthesizer::guards,
    weaver_config::WeaverConfig,
};

/// Builds the body of the `kind` writer for `original`. Nothing in the symbol table is
/// touched, so a failure here leaves the type as it was.
pub fn build_writer_body(
    codec: &dyn CodecService,
    config: &WeaverConfig,
    original: &Procedure,
    classification: &Classification,
    kind: RemoteCallKind,
    rpc_id: RpcId,
    diagnostics: &mut dyn DiagnosticsSink,
) -> Result<Body, SynthesisError> {
    let partition = classification.partition();
    let attribute_config = classification.config(kind);
    let mut body = Body::new();

    if config.emit_authority_guards {
        guards::emit_writer_guards(&mut body, kind, &attribute_config);
    }

    let channel = body.declare_local(TypeRef::Channel);
    body.emit(match partition.channel() {
        Some(index) => Instruction::LoadArg(index),
        None => Instruction::LoadConst(Constant::Channel(config.default_channel)),
    });
    body.emit(Instruction::StoreLocal(channel));

    let writer = body.declare_local(TypeRef::PooledWriter);
    body.emit(Instruction::call_codec(CodecCall::AcquireWriter));
    body.emit(Instruction::StoreLocal(writer));

    let mut protected = Vec::new();
    for index in partition.serialized() {
        let parameter = &original.parameters[index];
        let write_op =
            codec
                .writer_for(&parameter.ty)
                .ok_or_else(|| SynthesisError::MissingWriter {
                    procedure: original.name.clone(),
                    parameter_type: parameter.ty.to_string(),
                })?;
        if kind == RemoteCallKind::Observers && attribute_config.buffer_last && parameter.by_ref
        {
            diagnostics.log_warning(&format!(
                "{} uses BufferLast while parameter {} is passed by reference. The buffered \
                 call will hold the value at the time it was sent",
                original.name, parameter.name
            ));
        }
        protected.push(Instruction::LoadLocal(writer));
        protected.push(Instruction::LoadArg(index));
        protected.push(Instruction::call_codec(CodecCall::Write(write_op)));
    }

    protected.push(Instruction::LoadSelf);
    protected.push(Instruction::LoadConst(Constant::U32(rpc_id)));
    protected.push(Instruction::LoadLocal(writer));
    protected.push(Instruction::LoadLocal(channel));
    let send = match kind {
        RemoteCallKind::Server => RuntimeCall::SendServerRpc,
        RemoteCallKind::Observers => {
            protected.push(Instruction::LoadConst(Constant::Bool(
                attribute_config.buffer_last,
            )));
            RuntimeCall::SendObserversRpc
        }
        RemoteCallKind::Target => {
            let target = partition.target_connection().ok_or_else(|| {
                SynthesisError::MissingTargetConnection {
                    procedure: original.name.clone(),
                }
            })?;
            protected.push(Instruction::LoadArg(target));
            RuntimeCall::SendTargetRpc
        }
    };
    protected.push(Instruction::call_runtime(send));

    body.emit(Instruction::Protected {
        body: protected,
        cleanup: vec![
            Instruction::LoadLocal(writer),
            Instruction::call_codec(CodecCall::ReleaseWriter),
        ],
    });
    body.emit(Instruction::Return);

    Ok(body)
}
