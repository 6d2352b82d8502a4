//! Harness for exercising woven modules: an interpreter for the procedure IR, a naia-serde
//! backed codec, and packet assembly for round-tripping RPCs between two machines.

mod packet;

pub use codec::{read_value, write_value, SerdeCodec};
pub use error::MachineError;
pub use fixtures::{base_call_body, param, recording_body, rpc, ty, weave, weave_with, Woven};
pub use machine::Machine;
pub use packet::{deliver, write_packet, Delivery};
pub use runtime::{ExternalCall, NetworkObject, Runtime, SentRpc, WriterPool};
pub use value::Value;
