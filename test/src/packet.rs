use log::debug;
use naia_serde::{BitReader, BitWriter, Serde};

use rpcweave::DispatchTable;
use rpcweave_shared::{Channel, RemoteCallKind, RpcId};

use crate::{
    codec,
    error::MachineError,
    machine::Machine,
    runtime::{NetworkObject, SentRpc},
};

/// What the receiving side saw in a packet
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    pub dispatched: Vec<RpcId>,
    pub trailer: Option<u32>,
}

/// Packs RPCs back to back: `[true, id, payload..]*, false`, then an optional `u32` trailer
/// that lets the receiver check every reader consumed exactly its own payload.
pub fn write_packet(rpcs: &[SentRpc], trailer: Option<u32>) -> Result<Vec<u8>, MachineError> {
    let mut writer = BitWriter::new();
    for rpc in rpcs {
        true.ser(&mut writer);
        rpc.rpc_id.ser(&mut writer);
        for (ty, value) in &rpc.payload {
            codec::write_value(&mut writer, ty, value)?;
        }
    }
    false.ser(&mut writer);
    match trailer {
        Some(trailer) => {
            true.ser(&mut writer);
            trailer.ser(&mut writer);
        }
        None => false.ser(&mut writer),
    }
    Ok(writer.to_bytes().to_vec())
}

fn truncated(expected: &str) -> impl Fn(naia_serde::SerdeErr) -> MachineError + '_ {
    move |_| MachineError::Truncated {
        expected: expected.to_string(),
    }
}

/// Routes every RPC of `bytes` through `table` to the matching reader on `object`.
pub fn deliver(
    machine: &mut Machine,
    object: &NetworkObject,
    table: &DispatchTable,
    kind: RemoteCallKind,
    bytes: &[u8],
    channel: Channel,
    sender: Option<u32>,
) -> Result<Delivery, MachineError> {
    let mut reader = BitReader::new(bytes);
    let mut delivery = Delivery::default();

    while bool::de(&mut reader).map_err(truncated("continuation bit"))? {
        let rpc_id = u32::de(&mut reader).map_err(truncated("rpc id"))?;
        let entry = table
            .get(kind, rpc_id)
            .ok_or(MachineError::UnknownRpc { kind, rpc_id })?;
        debug!("dispatching {:?} {} to {}", kind, rpc_id, entry.reader.name);
        machine.invoke_reader(object, &entry.reader, &mut reader, channel, sender)?;
        delivery.dispatched.push(rpc_id);
    }

    if bool::de(&mut reader).map_err(truncated("trailer bit"))? {
        delivery.trailer = Some(u32::de(&mut reader).map_err(truncated("trailer"))?);
    }
    Ok(delivery)
}
