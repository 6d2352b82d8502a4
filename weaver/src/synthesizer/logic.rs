use rpcweave_shared::{Modifiers, Procedure, ProcedureId, SynthKey, TypeDef};

use crate::error::SynthesisError;

/// Returns the logic procedure for `original`, moving the original body (debug info
/// included) into a new procedure when none exists yet. An existing logic procedure is
/// reused as it is.
pub fn relocate_logic(
    type_def: &mut TypeDef,
    original: ProcedureId,
) -> Result<ProcedureId, SynthesisError> {
    let (key, modifiers, parameters) = {
        let procedure = type_def.procedure(original)?;
        let key = SynthKey::logic(procedure.signature());
        if let Some(existing) = type_def.find_synthesized(&key) {
            return Ok(existing);
        }
        let modifiers = Modifiers {
            visibility: procedure.modifiers.visibility,
            is_virtual: procedure.modifiers.is_virtual,
            is_override: procedure.modifiers.is_override,
            ..Modifiers::default()
        };
        (key, modifiers, procedure.parameters.clone())
    };

    let procedure = type_def.procedure_mut(original)?;
    let body = procedure
        .body
        .take()
        .ok_or_else(|| SynthesisError::BodyPending {
            procedure: procedure.name.clone(),
        })?;

    let mut logic = Procedure::synthesized(key, modifiers, parameters);
    logic.body.fill(body);
    Ok(type_def.add_procedure(logic)?)
}
