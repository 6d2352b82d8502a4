use rpcweave_shared::Channel;

/// Hard ceiling on RPC ids per inheritance hierarchy.
pub const MAX_RPC_ALLOWANCE: u32 = u16::MAX as u32;

cfg_if! {
    if #[cfg(feature = "player_build")] {
        const EMIT_AUTHORITY_GUARDS: bool = false;
    } else {
        const EMIT_AUTHORITY_GUARDS: bool = true;
    }
}

/// Contains Config properties which will be used by the Weaver
#[derive(Clone, Debug)]
pub struct WeaverConfig {
    /// Whether generated writers check authority (is-owner, is-client, is-server) before
    /// sending. Off when building a player, where the opposite role is compiled out.
    pub emit_authority_guards: bool,
    /// Maximum number of RPC ids a type and its ancestors may use
    pub rpc_allowance: u32,
    /// Channel used when a procedure does not declare a channel parameter
    pub default_channel: Channel,
}

impl Default for WeaverConfig {
    fn default() -> Self {
        Self {
            emit_authority_guards: EMIT_AUTHORITY_GUARDS,
            rpc_allowance: MAX_RPC_ALLOWANCE,
            default_channel: Channel::Reliable,
        }
    }
}
