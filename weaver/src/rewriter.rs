use std::collections::HashSet;

use rpcweave_shared::{
    Body, CallTarget, Instruction, MethodRef, Module, ProcedureId, RemoteCallKind, Signature,
    TypeDef,
};

use crate::{
    classifier::Classification,
    error::{LinkError, SynthesisError},
    kind_set::KindSet,
    synthesizer::SynthesizedTriad,
};

/// A virtual logic procedure whose calls to the base implementation must be pointed at the
/// base type's logic once every type has been synthesized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualLogicLink {
    pub type_name: String,
    pub logic: ProcedureId,
    pub original: Signature,
}

fn emit_forward(body: &mut Body, arity: usize, target: &MethodRef) {
    body.emit(Instruction::LoadSelf);
    body.emit_all((0..arity).map(Instruction::LoadArg));
    body.emit(Instruction::call_method(target.clone()));
}

fn writer<'t>(
    triad: &'t SynthesizedTriad,
    kind: RemoteCallKind,
    procedure: &str,
) -> Result<&'t MethodRef, SynthesisError> {
    triad
        .writer(kind)
        .ok_or_else(|| SynthesisError::IncompleteTriad {
            procedure: procedure.to_string(),
            kind: kind.tag(),
        })
}

/// Replaces the body of `original` with a call to its writer, followed by a local call to its
/// logic when the procedure runs locally.
pub fn redirect_original(
    type_def: &mut TypeDef,
    original: ProcedureId,
    classification: &Classification,
    triad: &SynthesizedTriad,
) -> Result<(), SynthesisError> {
    let procedure = type_def.procedure(original)?;
    let arity = procedure.parameters.len();
    let name = procedure.name.clone();

    let mut body = Body::new();
    match classification.kinds() {
        KindSet::Single(kind) => {
            emit_forward(&mut body, arity, writer(triad, kind, &name)?);
        }
        KindSet::ObserversAndTarget => {
            // a null connection means "everyone"
            let observers = body.new_label();
            let done = body.new_label();
            body.emit(Instruction::LoadArg(0));
            body.emit(Instruction::BranchIfNull(observers));
            emit_forward(
                &mut body,
                arity,
                writer(triad, RemoteCallKind::Target, &name)?,
            );
            body.emit(Instruction::Jump(done));
            body.emit(Instruction::Mark(observers));
            emit_forward(
                &mut body,
                arity,
                writer(triad, RemoteCallKind::Observers, &name)?,
            );
            body.emit(Instruction::Mark(done));
        }
    }
    if classification.run_locally() {
        emit_forward(&mut body, arity, &triad.logic_ref);
    }
    body.emit(Instruction::Return);

    type_def.procedure_mut(original)?.body.fill(body);
    Ok(())
}

/// Points `base.Original(..)` calls inside a virtual logic procedure at the nearest ancestor's
/// logic procedure. Returns the number of calls patched.
pub fn redirect_base_calls(module: &mut Module, link: &VirtualLogicLink) -> Result<usize, LinkError> {
    let index = module.type_index(&link.type_name)?;
    let ancestors: HashSet<String> = module
        .ancestors(index)?
        .into_iter()
        .map(|ancestor| module.type_def(ancestor).map(|t| t.name().to_string()))
        .collect::<Result<_, _>>()?;

    let is_base_call = |method: &MethodRef| {
        method.name == link.original.name
            && method.parameter_types == link.original.parameter_types
            && ancestors.contains(&method.declaring_type)
    };

    let logic = module.type_def(index)?.procedure(link.logic)?;
    let logic_name = logic.name.clone();
    let mut found = false;
    if let Some(body) = logic.body.body() {
        body.visit(&mut |instruction| {
            if instruction.called_method().is_some_and(|method| is_base_call(method)) {
                found = true;
            }
        });
    }
    if !found {
        return Ok(0);
    }

    let target = module
        .find_method_in_base(index, &logic_name, &link.original.parameter_types)?
        .ok_or_else(|| LinkError::BaseLogicNotFound {
            type_name: link.type_name.clone(),
            logic: logic_name.clone(),
        })?;

    let mut patched = 0;
    let logic = module.type_def_mut(index)?.procedure_mut(link.logic)?;
    if let Some(body) = logic.body.body_mut() {
        body.visit_mut(&mut |instruction| {
            if let Instruction::Call(CallTarget::Method(method) | CallTarget::Base(method)) =
                instruction
            {
                if is_base_call(method) {
                    *method = target.clone();
                    patched += 1;
                }
            }
        });
    }
    Ok(patched)
}
