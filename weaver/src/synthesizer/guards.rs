use rpcweave_shared::{Body, Instruction, RemoteCallKind, RuntimeCall};

use crate::rpc_config::RpcAttributeConfig;

const NOT_OWNER_WARNING: &str =
    "Cannot complete action because you are not the owner of this object.";
const CLIENT_INACTIVE_WARNING: &str = "Cannot complete action because client is not active.";
const SERVER_INACTIVE_WARNING: &str = "Cannot complete action because server is not active.";

/// Emits `if !predicate { warn(message); return; }`, where `predicate` leaves a bool on the
/// stack.
fn require(body: &mut Body, predicate: Vec<Instruction>, message: &str) {
    let pass = body.new_label();
    body.emit_all(predicate);
    body.emit(Instruction::BranchIfTrue(pass));
    body.emit(Instruction::Warn(message.to_string()));
    body.emit(Instruction::Return);
    body.emit(Instruction::Mark(pass));
}

fn self_check(call: RuntimeCall) -> Vec<Instruction> {
    vec![Instruction::LoadSelf, Instruction::call_runtime(call)]
}

/// Authority checks run by a writer before anything is serialized.
pub fn emit_writer_guards(body: &mut Body, kind: RemoteCallKind, config: &RpcAttributeConfig) {
    match kind {
        RemoteCallKind::Server => {
            if config.require_ownership {
                require(body, self_check(RuntimeCall::IsOwner), NOT_OWNER_WARNING);
            }
            require(body, self_check(RuntimeCall::IsClient), CLIENT_INACTIVE_WARNING);
        }
        RemoteCallKind::Observers | RemoteCallKind::Target => {
            require(body, self_check(RuntimeCall::IsServer), SERVER_INACTIVE_WARNING);
        }
    }
}

/// Checks run by a reader after the payload has been consumed. `conn_arg` is the reader
/// argument holding the sender, present for Server readers only.
pub fn emit_reader_guards(
    body: &mut Body,
    kind: RemoteCallKind,
    config: &RpcAttributeConfig,
    conn_arg: Option<usize>,
) {
    match kind {
        RemoteCallKind::Server => {
            if let (true, Some(conn_arg)) = (config.require_ownership, conn_arg) {
                require(
                    body,
                    vec![
                        Instruction::LoadSelf,
                        Instruction::LoadArg(conn_arg),
                        Instruction::call_runtime(RuntimeCall::CompareOwner),
                    ],
                    NOT_OWNER_WARNING,
                );
            }
        }
        RemoteCallKind::Observers => {
            if !config.include_owner {
                // owner already ran it locally; drop silently
                let pass = body.new_label();
                body.emit_all(self_check(RuntimeCall::IsOwner));
                body.emit(Instruction::BranchIfFalse(pass));
                body.emit(Instruction::Return);
                body.emit(Instruction::Mark(pass));
            }
        }
        RemoteCallKind::Target => {}
    }
}
