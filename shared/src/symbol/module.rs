use std::collections::{HashMap, HashSet};

use crate::symbol::{
    error::SymbolError,
    instruction::MethodRef,
    type_def::{ProcedureId, TypeDef},
    type_ref::TypeRef,
};

/// Index of a type in its module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIndex(usize);

impl TypeIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A compilation unit: every composite type the weaver may touch.
#[derive(Clone, Debug, Default)]
pub struct Module {
    types: Vec<TypeDef>,
    by_name: HashMap<String, TypeIndex>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, mut type_def: TypeDef) -> Result<TypeIndex, SymbolError> {
        if let Some(error) = type_def.take_builder_error() {
            return Err(error);
        }
        if self.by_name.contains_key(type_def.name()) {
            return Err(SymbolError::DuplicateType {
                name: type_def.name().to_string(),
            });
        }
        let index = TypeIndex(self.types.len());
        self.by_name.insert(type_def.name().to_string(), index);
        self.types.push(type_def);
        Ok(index)
    }

    pub fn type_index(&self, name: &str) -> Result<TypeIndex, SymbolError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SymbolError::TypeNotFound {
                name: name.to_string(),
            })
    }

    pub fn type_def(&self, index: TypeIndex) -> Result<&TypeDef, SymbolError> {
        self.types
            .get(index.0)
            .ok_or(SymbolError::UnknownTypeIndex { index: index.0 })
    }

    pub fn type_def_mut(&mut self, index: TypeIndex) -> Result<&mut TypeDef, SymbolError> {
        self.types
            .get_mut(index.0)
            .ok_or(SymbolError::UnknownTypeIndex { index: index.0 })
    }

    pub fn type_by_name(&self, name: &str) -> Result<&TypeDef, SymbolError> {
        self.type_def(self.type_index(name)?)
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeIndex, &TypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, type_def)| (TypeIndex(index), type_def))
    }

    /// Ancestors of a type, nearest base first.
    pub fn ancestors(&self, index: TypeIndex) -> Result<Vec<TypeIndex>, SymbolError> {
        let origin = self.type_def(index)?;
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([index]);
        let mut current = origin;

        while let Some(base_name) = current.base() {
            let base_index =
                self.by_name
                    .get(base_name)
                    .copied()
                    .ok_or_else(|| SymbolError::BaseTypeNotFound {
                        type_name: current.name().to_string(),
                        base: base_name.to_string(),
                    })?;
            if !seen.insert(base_index) {
                return Err(SymbolError::InheritanceCycle {
                    type_name: origin.name().to_string(),
                });
            }
            ancestors.push(base_index);
            current = self.type_def(base_index)?;
        }

        Ok(ancestors)
    }

    /// Every type, each appearing after all of its ancestors. Ties keep declaration order.
    pub fn hierarchy_order(&self) -> Result<Vec<TypeIndex>, SymbolError> {
        let mut ordered = Vec::with_capacity(self.types.len());
        let mut emitted = HashSet::new();

        for (index, _) in self.types() {
            let mut chain = self.ancestors(index)?;
            chain.reverse();
            chain.push(index);
            for member in chain {
                if emitted.insert(member) {
                    ordered.push(member);
                }
            }
        }

        Ok(ordered)
    }

    /// Looks up `name(parameter_types)` on the ancestors of `index`, nearest first.
    pub fn find_method_in_base(
        &self,
        index: TypeIndex,
        name: &str,
        parameter_types: &[TypeRef],
    ) -> Result<Option<MethodRef>, SymbolError> {
        for ancestor in self.ancestors(index)? {
            let type_def = self.type_def(ancestor)?;
            if type_def.find_procedure(name, parameter_types).is_some() {
                return Ok(Some(MethodRef::new(
                    type_def.name(),
                    name,
                    parameter_types.to_vec(),
                )));
            }
        }
        Ok(None)
    }

    /// Resolves a method reference on its declaring type, then up the inheritance chain.
    pub fn resolve(&self, method: &MethodRef) -> Result<(TypeIndex, ProcedureId), SymbolError> {
        let declaring = self.type_index(&method.declaring_type)?;
        let mut chain = vec![declaring];
        chain.extend(self.ancestors(declaring)?);

        for index in chain {
            let type_def = self.type_def(index)?;
            if let Some(id) = type_def.find_procedure(&method.name, &method.parameter_types) {
                return Ok((index, id));
            }
        }

        Err(SymbolError::MethodNotFound {
            type_name: method.declaring_type.clone(),
            name: method.name.clone(),
        })
    }
}
