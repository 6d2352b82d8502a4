use rpcweave_shared::Attribute;

const REQUIRE_OWNERSHIP_NAME: &str = "RequireOwnership";
const RUN_LOCALLY_NAME: &str = "RunLocally";
const INCLUDE_OWNER_NAME: &str = "IncludeOwner";
const BUFFER_LAST_NAME: &str = "BufferLast";

/// Fields recognized on a remote-call annotation. Unrecognized fields are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcAttributeConfig {
    /// Server RPCs only: the sender must own the object.
    pub require_ownership: bool,
    /// Also run the logic locally on the calling side.
    pub run_locally: bool,
    /// Observers RPCs only: deliver to the owning client as well.
    pub include_owner: bool,
    /// Observers RPCs only: the transport replays the last call to late observers.
    pub buffer_last: bool,
}

impl Default for RpcAttributeConfig {
    fn default() -> Self {
        Self {
            require_ownership: true,
            run_locally: false,
            include_owner: true,
            buffer_last: false,
        }
    }
}

impl RpcAttributeConfig {
    pub fn from_attribute(attribute: &Attribute) -> Self {
        let defaults = Self::default();
        Self {
            require_ownership: attribute
                .bool_field(REQUIRE_OWNERSHIP_NAME, defaults.require_ownership),
            run_locally: attribute.bool_field(RUN_LOCALLY_NAME, defaults.run_locally),
            include_owner: attribute.bool_field(INCLUDE_OWNER_NAME, defaults.include_owner),
            buffer_last: attribute.bool_field(BUFFER_LAST_NAME, defaults.buffer_last),
        }
    }
}
