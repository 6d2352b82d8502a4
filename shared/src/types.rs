/// Numeric RPC identifier, unique within one inheritance hierarchy.
pub type RpcId = u32;

/// Direction and audience of a remote-call procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RemoteCallKind {
    /// Client to server.
    Server,
    /// Server to every observer of the object.
    Observers,
    /// Server to a single connection.
    Target,
}

impl RemoteCallKind {
    /// Maps an annotation name onto its kind. Both the short form (`ServerRpc`) and the
    /// attribute-suffixed form (`ServerRpcAttribute`) are recognized.
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        let short = name.strip_suffix("Attribute").unwrap_or(name);
        let short = short.rsplit('.').next().unwrap_or(short);
        match short {
            "ServerRpc" => Some(RemoteCallKind::Server),
            "ObserversRpc" => Some(RemoteCallKind::Observers),
            "TargetRpc" => Some(RemoteCallKind::Target),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RemoteCallKind::Server => "Server",
            RemoteCallKind::Observers => "Observers",
            RemoteCallKind::Target => "Target",
        }
    }
}

/// Transport channel an RPC is sent on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Channel {
    #[default]
    Reliable,
    Unreliable,
}
