mod guards;
mod logic;
mod reader;
mod writer;

pub use reader::reader_parameters;

use log::debug;

use rpcweave_shared::{
    Body, CodecService, DiagnosticsSink, MethodRef, Modifiers, Procedure, ProcedureId,
    RemoteCallKind, RpcId, SynthKey, TypeDef,
};

use crate::{classifier::Classification, error::SynthesisError, weaver_config::WeaverConfig};

/// The procedures generated for one remote-call procedure
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesizedTriad {
    pub logic: ProcedureId,
    pub logic_ref: MethodRef,
    /// One writer per kind, Observers before Target
    pub writers: Vec<(RemoteCallKind, ProcedureId, MethodRef)>,
    /// One reader per kind, Observers before Target
    pub readers: Vec<(RemoteCallKind, ProcedureId, MethodRef)>,
}

impl SynthesizedTriad {
    pub fn writer(&self, kind: RemoteCallKind) -> Option<&MethodRef> {
        self.writers
            .iter()
            .find(|(candidate, _, _)| *candidate == kind)
            .map(|(_, _, method)| method)
    }

    pub fn reader(&self, kind: RemoteCallKind) -> Option<(ProcedureId, &MethodRef)> {
        self.readers
            .iter()
            .find(|(candidate, _, _)| *candidate == kind)
            .map(|(_, id, method)| (*id, method))
    }
}

/// Builds writer, reader and logic procedures for classified remote-call procedures
pub struct Synthesizer<'a> {
    codec: &'a dyn CodecService,
    config: &'a WeaverConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(codec: &'a dyn CodecService, config: &'a WeaverConfig) -> Self {
        Self { codec, config }
    }

    /// Adds or refreshes the triad of `original` inside `type_def`. Writers are rebuilt every
    /// time since `rpc_id` may have changed; logic and readers are created once.
    pub fn synthesize(
        &self,
        type_def: &mut TypeDef,
        original: ProcedureId,
        classification: &Classification,
        rpc_id: RpcId,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<SynthesizedTriad, SynthesisError> {
        let procedure = type_def.procedure(original)?.clone();
        let type_name = type_def.name().to_string();
        let signature = procedure.signature();
        let parameter_types = procedure.parameter_types();
        let kinds = classification.kinds().kinds();

        debug!(
            "synthesizing {}.{} as {:?} with id {}",
            type_name,
            procedure.name,
            classification.kinds(),
            rpc_id
        );

        let mut writer_bodies = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let body = writer::build_writer_body(
                self.codec,
                self.config,
                &procedure,
                classification,
                *kind,
                rpc_id,
                diagnostics,
            )?;
            writer_bodies.push((*kind, body));
        }

        let logic = logic::relocate_logic(type_def, original)?;
        let logic_ref = MethodRef::new(
            type_name.clone(),
            type_def.procedure(logic)?.name.clone(),
            parameter_types.clone(),
        );

        let mut readers = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let key = SynthKey::reader(signature.clone(), *kind);
            let reader_ref = MethodRef::new(
                type_name.clone(),
                key.mangled_name(),
                reader_parameters(*kind)
                    .into_iter()
                    .map(|parameter| parameter.ty)
                    .collect(),
            );
            let id = match type_def.find_synthesized(&key) {
                Some(existing) => existing,
                None => {
                    let body = reader::build_reader_body(
                        self.codec,
                        &procedure,
                        classification,
                        *kind,
                        &logic_ref,
                    )?;
                    let mut reader =
                        Procedure::synthesized(key, Modifiers::private(), reader_parameters(*kind));
                    reader.body.fill(body);
                    type_def.add_procedure(reader)?
                }
            };
            readers.push((*kind, id, reader_ref));
        }

        let mut writers = Vec::with_capacity(kinds.len());
        for (kind, body) in writer_bodies {
            let key = SynthKey::writer(signature.clone(), kind);
            let writer_ref =
                MethodRef::new(type_name.clone(), key.mangled_name(), parameter_types.clone());
            let id = install(type_def, key, procedure.parameters.clone(), body)?;
            writers.push((kind, id, writer_ref));
        }

        Ok(SynthesizedTriad {
            logic,
            logic_ref,
            writers,
            readers,
        })
    }
}

fn install(
    type_def: &mut TypeDef,
    key: SynthKey,
    parameters: Vec<rpcweave_shared::Parameter>,
    body: Body,
) -> Result<ProcedureId, SynthesisError> {
    let existing = type_def.find_synthesized(&key);
    let mut writer = Procedure::synthesized(key, Modifiers::private(), parameters);
    writer.body.fill(body);
    match existing {
        Some(id) => {
            type_def.replace_procedure(id, writer)?;
            Ok(id)
        }
        None => Ok(type_def.add_procedure(writer)?),
    }
}
