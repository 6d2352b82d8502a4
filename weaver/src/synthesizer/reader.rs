use std::collections::HashMap;

use rpcweave_shared::{
    Body, CodecService, Instruction, MethodRef, Parameter, Procedure, RemoteCallKind,
    RuntimeCall, TypeRef,
};

use crate::{
    classifier::Classification, error::SynthesisError, partition::ParameterRole,
    synthesizer::guards,
};

const READER_ARG: usize = 0;
const CHANNEL_ARG: usize = 1;
const CONNECTION_ARG: usize = 2;

/// Parameters every `kind` reader is declared with. The channel always precedes the
/// connection.
pub fn reader_parameters(kind: RemoteCallKind) -> Vec<Parameter> {
    let mut parameters = vec![
        Parameter::new("reader", TypeRef::PooledReader),
        Parameter::new("channel", TypeRef::Channel),
    ];
    if kind == RemoteCallKind::Server {
        parameters.push(Parameter::new("conn", TypeRef::Connection));
    }
    parameters
}

/// Builds a reader body: consume every serialized value, run the receive-side checks, then
/// invoke `logic` with the arguments laid out as the original procedure declared them.
pub fn build_reader_body(
    codec: &dyn CodecService,
    original: &Procedure,
    classification: &Classification,
    kind: RemoteCallKind,
    logic: &MethodRef,
) -> Result<Body, SynthesisError> {
    let partition = classification.partition();
    let mut body = Body::new();

    // reads come first so a rejected call still drains its payload
    let mut locals = HashMap::new();
    for index in partition.serialized() {
        let ty = &original.parameters[index].ty;
        let (local, instructions) =
            codec
                .create_read(&mut body, READER_ARG, ty)
                .ok_or_else(|| SynthesisError::MissingReader {
                    procedure: original.name.clone(),
                    parameter_type: ty.to_string(),
                })?;
        body.emit_all(instructions);
        locals.insert(index, local);
    }

    let conn_arg = (kind == RemoteCallKind::Server).then_some(CONNECTION_ARG);
    guards::emit_reader_guards(&mut body, kind, &classification.config(kind), conn_arg);

    body.emit(Instruction::LoadSelf);
    for (index, role) in partition.roles().iter().enumerate() {
        match role {
            ParameterRole::Serialized => match locals.get(&index) {
                Some(local) => body.emit(Instruction::LoadLocal(*local)),
                None => {
                    return Err(SynthesisError::MissingReader {
                        procedure: original.name.clone(),
                        parameter_type: original.parameters[index].ty.to_string(),
                    })
                }
            },
            ParameterRole::ChannelSelector => body.emit(Instruction::LoadArg(CHANNEL_ARG)),
            ParameterRole::CallerConnection => body.emit(Instruction::LoadArg(CONNECTION_ARG)),
            ParameterRole::TargetConnection => {
                body.emit(Instruction::LoadSelf);
                body.emit(Instruction::call_runtime(RuntimeCall::LocalConnection));
            }
        }
    }
    body.emit(Instruction::call_method(logic.clone()));
    body.emit(Instruction::Return);

    Ok(body)
}
