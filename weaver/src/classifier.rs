use rpcweave_shared::{CodecService, Procedure, RemoteCallKind, TypeDef};

use crate::{
    error::ValidationError,
    kind_set::KindSet,
    partition::{partition, Partition},
    rpc_config::RpcAttributeConfig,
};

/// A single remote-call annotation found on a procedure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcAnnotation {
    pub kind: RemoteCallKind,
    pub config: RpcAttributeConfig,
}

/// The validated remote-call shape of a procedure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    kinds: KindSet,
    annotations: Vec<RpcAnnotation>,
    partition: Partition,
}

impl Classification {
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    pub fn annotations(&self) -> &[RpcAnnotation] {
        &self.annotations
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Attribute config of the annotation for `kind`, or defaults if absent.
    pub fn config(&self, kind: RemoteCallKind) -> RpcAttributeConfig {
        self.annotations
            .iter()
            .find(|annotation| annotation.kind == kind)
            .map(|annotation| annotation.config)
            .unwrap_or_default()
    }

    /// True when any of the procedure's annotations asks for local execution.
    pub fn run_locally(&self) -> bool {
        self.annotations
            .iter()
            .any(|annotation| annotation.config.run_locally)
    }
}

/// Remote-call annotations in declaration order. Nothing is validated here.
pub fn rpc_annotations(procedure: &Procedure) -> Vec<RpcAnnotation> {
    procedure
        .attributes
        .iter()
        .filter_map(|attribute| {
            RemoteCallKind::from_attribute_name(&attribute.name).map(|kind| RpcAnnotation {
                kind,
                config: RpcAttributeConfig::from_attribute(attribute),
            })
        })
        .collect()
}

/// Number of procedures of `type_def` carrying at least one remote-call annotation. Used for
/// ancestor totals, so it deliberately skips validation.
pub fn count_rpc_procedures(type_def: &TypeDef) -> u32 {
    let count = type_def
        .declared_procedures()
        .into_iter()
        .filter_map(|id| type_def.procedure(id).ok())
        .filter(|procedure| !rpc_annotations(procedure).is_empty())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Extracts and validates the remote-call annotations of a procedure. Returns `Ok(None)` if
/// the procedure is not a remote call.
pub fn classify(
    procedure: &Procedure,
    codec: &dyn CodecService,
) -> Result<Option<Classification>, ValidationError> {
    let annotations = rpc_annotations(procedure);
    if annotations.is_empty() {
        return Ok(None);
    }

    let name = || procedure.name.clone();

    let declared: Vec<RemoteCallKind> = annotations.iter().map(|a| a.kind).collect();
    let kinds = KindSet::from_kinds(&declared)
        .ok_or_else(|| ValidationError::MultipleRpcAttributes { procedure: name() })?;

    if procedure.modifiers.is_static {
        return Err(ValidationError::Static { procedure: name() });
    }
    if !procedure.generic_parameters.is_empty() {
        return Err(ValidationError::GenericProcedure { procedure: name() });
    }
    if procedure.modifiers.is_abstract {
        return Err(ValidationError::Abstract { procedure: name() });
    }
    if !procedure.return_type.is_void() {
        return Err(ValidationError::NonVoidReturn {
            procedure: name(),
            return_type: procedure.return_type.to_string(),
        });
    }

    if kinds.contains(RemoteCallKind::Target)
        && !procedure
            .parameters
            .first()
            .is_some_and(|parameter| parameter.ty.is_connection())
    {
        return Err(ValidationError::MissingTargetConnection { procedure: name() });
    }

    let partition = partition(kinds, &procedure.parameters);
    for index in partition.serialized() {
        let parameter = &procedure.parameters[index];
        if parameter.ty.is_generic() {
            return Err(ValidationError::GenericParameter {
                procedure: name(),
                parameter: parameter.name.clone(),
                parameter_type: parameter.ty.to_string(),
            });
        }
        if !codec.has_serializer(&parameter.ty) {
            return Err(ValidationError::Unserializable {
                procedure: name(),
                parameter_type: parameter.ty.to_string(),
            });
        }
    }

    Ok(Some(Classification {
        kinds,
        annotations,
        partition,
    }))
}
