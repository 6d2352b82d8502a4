use std::collections::HashMap;

use crate::symbol::{
    error::SymbolError,
    procedure::{Origin, Procedure, SynthKey},
    type_ref::TypeRef,
};

/// Index of a procedure in its type's procedure arena. Stable for the type's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcedureId(usize);

impl ProcedureId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A composite type: its name, optional base type and procedure arena.
#[derive(Clone, Debug)]
pub struct TypeDef {
    name: String,
    base: Option<String>,
    procedures: Vec<Procedure>,
    synthesized: HashMap<SynthKey, ProcedureId>,
    builder_error: Option<SymbolError>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            procedures: Vec::new(),
            synthesized: HashMap::new(),
            builder_error: None,
        }
    }

    pub fn deriving(name: impl Into<String>, base: impl Into<String>) -> Self {
        let mut type_def = Self::new(name);
        type_def.base = Some(base.into());
        type_def
    }

    /// Builder form of [`TypeDef::add_procedure`]. The first rejected procedure is kept and
    /// reported by `Module::add_type`.
    pub fn with_procedure(mut self, procedure: Procedure) -> Self {
        if let Err(error) = self.add_procedure(procedure) {
            self.builder_error.get_or_insert(error);
        }
        self
    }

    pub(crate) fn take_builder_error(&mut self) -> Option<SymbolError> {
        self.builder_error.take()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn procedure_count(&self) -> usize {
        self.procedures.len()
    }

    /// Appends a procedure. No two procedures may share a name and parameter-type
    /// sequence, and synthesized procedures are indexed by their key, which must not already
    /// be present.
    pub fn add_procedure(&mut self, procedure: Procedure) -> Result<ProcedureId, SymbolError> {
        if self
            .find_procedure(&procedure.name, &procedure.parameter_types())
            .is_some()
        {
            return Err(SymbolError::DuplicateSignature {
                type_name: self.name.clone(),
                signature: procedure.signature().to_string(),
            });
        }
        let id = ProcedureId(self.procedures.len());
        if let Origin::Synthesized(key) = &procedure.origin {
            if self.synthesized.contains_key(key) {
                return Err(SymbolError::DuplicateSynthesized {
                    type_name: self.name.clone(),
                    name: procedure.name.clone(),
                });
            }
            self.synthesized.insert(key.clone(), id);
        }
        self.procedures.push(procedure);
        Ok(id)
    }

    /// Swaps in a new procedure at `id`, returning the old one. The replacement must keep
    /// the same origin.
    pub fn replace_procedure(
        &mut self,
        id: ProcedureId,
        procedure: Procedure,
    ) -> Result<Procedure, SymbolError> {
        let slot = self
            .procedures
            .get_mut(id.0)
            .ok_or_else(|| SymbolError::ProcedureNotFound {
                type_name: self.name.clone(),
                index: id.0,
            })?;
        if slot.origin != procedure.origin {
            return Err(SymbolError::OriginMismatch {
                type_name: self.name.clone(),
                name: procedure.name,
            });
        }
        Ok(std::mem::replace(slot, procedure))
    }

    pub fn procedure(&self, id: ProcedureId) -> Result<&Procedure, SymbolError> {
        self.procedures
            .get(id.0)
            .ok_or_else(|| SymbolError::ProcedureNotFound {
                type_name: self.name.clone(),
                index: id.0,
            })
    }

    pub fn procedure_mut(&mut self, id: ProcedureId) -> Result<&mut Procedure, SymbolError> {
        let type_name = &self.name;
        self.procedures
            .get_mut(id.0)
            .ok_or_else(|| SymbolError::ProcedureNotFound {
                type_name: type_name.clone(),
                index: id.0,
            })
    }

    pub fn procedures(&self) -> impl Iterator<Item = (ProcedureId, &Procedure)> {
        self.procedures
            .iter()
            .enumerate()
            .map(|(index, procedure)| (ProcedureId(index), procedure))
    }

    /// User-declared procedures, in declaration order.
    pub fn declared_procedures(&self) -> Vec<ProcedureId> {
        self.procedures()
            .filter(|(_, procedure)| procedure.origin == Origin::Declared)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn find_synthesized(&self, key: &SynthKey) -> Option<ProcedureId> {
        self.synthesized.get(key).copied()
    }

    pub fn find_procedure(&self, name: &str, parameter_types: &[TypeRef]) -> Option<ProcedureId> {
        self.procedures()
            .find(|(_, procedure)| {
                procedure.name == name
                    && procedure.parameters.len() == parameter_types.len()
                    && procedure
                        .parameters
                        .iter()
                        .zip(parameter_types)
                        .all(|(parameter, ty)| &parameter.ty == ty)
            })
            .map(|(id, _)| id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ProcedureId> {
        self.procedures()
            .find(|(_, procedure)| procedure.name == name)
            .map(|(id, _)| id)
    }
}
