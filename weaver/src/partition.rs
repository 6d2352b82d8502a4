use rpcweave_shared::Parameter;

use crate::kind_set::KindSet;

/// What a parameter is used for on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    /// Written by the writer and read back by the reader.
    Serialized,
    /// Selects the transport channel; never serialized.
    ChannelSelector,
    /// First parameter of a TargetRpc: the recipient. Replaced by the local connection on
    /// the receiving side.
    TargetConnection,
    /// Optional trailing connection of a ServerRpc, filled with the sender on the server.
    CallerConnection,
}

/// Role of every parameter of one procedure, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    roles: Vec<ParameterRole>,
}

impl Partition {
    pub fn roles(&self) -> &[ParameterRole] {
        &self.roles
    }

    /// Indices of serialized parameters, in declaration order.
    pub fn serialized(&self) -> impl Iterator<Item = usize> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == ParameterRole::Serialized)
            .map(|(index, _)| index)
    }

    pub fn channel(&self) -> Option<usize> {
        self.position(ParameterRole::ChannelSelector)
    }

    pub fn target_connection(&self) -> Option<usize> {
        self.position(ParameterRole::TargetConnection)
    }

    pub fn caller_connection(&self) -> Option<usize> {
        self.position(ParameterRole::CallerConnection)
    }

    fn position(&self, role: ParameterRole) -> Option<usize> {
        self.roles.iter().position(|candidate| *candidate == role)
    }
}

/// Splits parameters into serialized and transport-control parameters. The classifier,
/// writer and reader all go through here so their views of the wire layout agree.
pub fn partition(kinds: KindSet, parameters: &[Parameter]) -> Partition {
    let mut roles = vec![ParameterRole::Serialized; parameters.len()];

    if kinds.contains(rpcweave_shared::RemoteCallKind::Target)
        && parameters.first().is_some_and(|p| p.ty.is_connection())
    {
        roles[0] = ParameterRole::TargetConnection;
    }
    if let Some(index) = caller_connection_index(kinds, parameters) {
        roles[index] = ParameterRole::CallerConnection;
    }
    if let Some(index) = channel_index(kinds, parameters) {
        roles[index] = ParameterRole::ChannelSelector;
    }

    Partition { roles }
}

fn caller_connection_index(kinds: KindSet, parameters: &[Parameter]) -> Option<usize> {
    if !kinds.is_server() {
        return None;
    }
    let last = parameters.len().checked_sub(1)?;
    let parameter = &parameters[last];
    (parameter.ty.is_connection() && parameter.has_default).then_some(last)
}

fn channel_index(kinds: KindSet, parameters: &[Parameter]) -> Option<usize> {
    let last = parameters.len().checked_sub(1)?;
    if parameters[last].ty.is_channel() {
        return Some(last);
    }
    // only a ServerRpc may put its optional connection after the channel
    caller_connection_index(kinds, parameters)?;
    let previous = last.checked_sub(1)?;
    parameters[previous].ty.is_channel().then_some(previous)
}
