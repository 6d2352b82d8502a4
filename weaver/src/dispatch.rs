use std::collections::BTreeMap;

use rpcweave_shared::{MethodRef, ProcedureId, RemoteCallKind, RpcId};

use crate::{kind_set::KindSet, rpc_config::RpcAttributeConfig};

/// Receive-side handler for one kind of a remote-call procedure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchHandler {
    pub kind: RemoteCallKind,
    pub reader: ProcedureId,
    pub reader_ref: MethodRef,
    pub config: RpcAttributeConfig,
}

/// Everything the runtime needs to route an incoming call to one procedure. Observers and
/// Target share the id of a dual procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRegistration {
    pub rpc_id: RpcId,
    pub procedure: ProcedureId,
    pub kinds: KindSet,
    pub run_locally: bool,
    pub handlers: Vec<DispatchHandler>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchEntry {
    pub reader: MethodRef,
    pub run_locally: bool,
    pub config: RpcAttributeConfig,
}

/// Per-type map from `(kind, id)` to the reader handling it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchTable {
    entries: BTreeMap<(RemoteCallKind, RpcId), DispatchEntry>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: &DispatchRegistration) {
        for handler in &registration.handlers {
            self.entries.insert(
                (handler.kind, registration.rpc_id),
                DispatchEntry {
                    reader: handler.reader_ref.clone(),
                    run_locally: registration.run_locally,
                    config: handler.config,
                },
            );
        }
    }

    pub fn get(&self, kind: RemoteCallKind, rpc_id: RpcId) -> Option<&DispatchEntry> {
        self.entries.get(&(kind, rpc_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids registered for `kind`, ascending
    pub fn ids(&self, kind: RemoteCallKind) -> Vec<RpcId> {
        self.entries
            .keys()
            .filter(|(candidate, _)| *candidate == kind)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RemoteCallKind, RpcId, &DispatchEntry)> {
        self.entries
            .iter()
            .map(|((kind, id), entry)| (*kind, *id, entry))
    }
}
