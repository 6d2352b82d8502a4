use rpcweave_shared::{
    Attribute, Channel, Module, Parameter, Procedure, RemoteCallKind, TypeDef, TypeRef,
};
use rpcweave_test::{
    deliver, param, recording_body, rpc, weave, write_packet, Machine, MachineError,
    NetworkObject, Value,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn move_module(run_locally: bool) -> Module {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Player").with_procedure(
                Procedure::new("Move")
                    .with_attribute(
                        Attribute::new("ServerRpc").with_field("RunLocally", run_locally),
                    )
                    .with_parameter(param("x", "f32"))
                    .with_body(recording_body("Translate", 1)),
            ),
        )
        .unwrap();
    module
}

#[test]
fn server_rpc_reaches_server_logic() {
    init_logger();
    let mut module = move_module(false);
    let woven = weave(&mut module);
    let table = woven.table("Player").unwrap();

    let mut client = Machine::new(&module);
    client
        .call(
            &NetworkObject::client("Player", 7),
            "Move",
            vec![Value::F32(1.5)],
        )
        .unwrap();
    assert!(client.runtime.calls_to("Translate").is_empty());
    assert_eq!(client.runtime.writers.outstanding(), 0);

    let sent = client.runtime.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, RemoteCallKind::Server);
    assert_eq!(sent[0].rpc_id, 0);
    assert_eq!(sent[0].channel, Channel::Reliable);
    assert_eq!(sent[0].values(), vec![Value::F32(1.5)]);

    let bytes = write_packet(&sent, None).unwrap();
    let mut server = Machine::new(&module);
    let delivery = deliver(
        &mut server,
        &NetworkObject::server("Player", Some(7)),
        table,
        RemoteCallKind::Server,
        &bytes,
        Channel::Reliable,
        Some(7),
    )
    .unwrap();

    assert_eq!(delivery.dispatched, vec![0]);
    let calls = server.runtime.calls_to("Translate");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![Value::F32(1.5)]);
}

#[test]
fn server_reader_drops_calls_from_non_owner() {
    let mut module = move_module(false);
    let woven = weave(&mut module);

    let mut client = Machine::new(&module);
    client
        .call(
            &NetworkObject::client("Player", 9),
            "Move",
            vec![Value::F32(2.0)],
        )
        .unwrap();
    let bytes = write_packet(&client.runtime.take_sent(), Some(77)).unwrap();

    let mut server = Machine::new(&module);
    let delivery = deliver(
        &mut server,
        &NetworkObject::server("Player", Some(7)),
        woven.table("Player").unwrap(),
        RemoteCallKind::Server,
        &bytes,
        Channel::Reliable,
        Some(9),
    )
    .unwrap();

    assert_eq!(delivery.trailer, Some(77));
    assert!(server.runtime.calls_to("Translate").is_empty());
    assert_eq!(server.runtime.warnings.len(), 1);
}

#[test]
fn writer_refuses_when_not_owner() {
    let mut module = move_module(false);
    weave(&mut module);

    let mut client = Machine::new(&module);
    let object = NetworkObject::client("Player", 7).owned_by(Some(3));
    client.call(&object, "Move", vec![Value::F32(1.0)]).unwrap();

    assert!(client.runtime.sent.is_empty());
    assert_eq!(client.runtime.writers.acquired(), 0);
    assert_eq!(
        client.runtime.warnings,
        vec!["Cannot complete action because you are not the owner of this object.".to_string()]
    );
}

#[test]
fn observers_and_target_writers_refuse_off_server() {
    let mut module = door_module();
    weave(&mut module);

    let mut client = Machine::new(&module);
    let object = NetworkObject::client("Door", 8);
    client
        .call(&object, "Notify", vec![Value::Null, Value::U32(5)])
        .unwrap();
    client
        .call(&object, "Notify", vec![Value::Connection(4), Value::U32(6)])
        .unwrap();

    assert!(client.runtime.sent.is_empty());
    assert_eq!(client.runtime.writers.acquired(), 0);
    assert_eq!(client.runtime.writers.outstanding(), 0);
    assert!(client.runtime.calls_to("Opened").is_empty());
    assert_eq!(
        client.runtime.warnings,
        vec!["Cannot complete action because server is not active.".to_string(); 2]
    );
}

#[test]
fn run_locally_echoes_even_when_writer_refuses() {
    let mut module = move_module(true);
    weave(&mut module);

    let mut client = Machine::new(&module);
    client
        .call(&NetworkObject::client("Player", 7), "Move", vec![Value::F32(3.0)])
        .unwrap();
    assert_eq!(client.runtime.sent.len(), 1);
    assert_eq!(client.runtime.calls_to("Translate").len(), 1);

    let mut stranger = Machine::new(&module);
    let object = NetworkObject::client("Player", 7).owned_by(Some(1));
    stranger.call(&object, "Move", vec![Value::F32(3.0)]).unwrap();
    assert!(stranger.runtime.sent.is_empty());
    assert_eq!(stranger.runtime.calls_to("Translate").len(), 1);
}

#[test]
fn writer_is_released_when_send_fails() {
    let mut module = move_module(false);
    weave(&mut module);

    let mut client = Machine::new(&module);
    client.runtime.fail_sends = true;
    let result = client.call(&NetworkObject::client("Player", 7), "Move", vec![Value::F32(1.0)]);

    assert_eq!(result, Err(MachineError::SendFailed { rpc_id: 0 }));
    assert_eq!(client.runtime.writers.acquired(), 1);
    assert_eq!(client.runtime.writers.released(), 1);
    assert_eq!(client.runtime.writers.outstanding(), 0);
}

fn chat_module() -> Module {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Chat")
                .with_procedure(
                    Procedure::new("Say")
                        .with_attribute(
                            Attribute::new("ObserversRpc").with_field("IncludeOwner", false),
                        )
                        .with_parameter(param("text", "String"))
                        .with_body(recording_body("Said", 1)),
                )
                .with_procedure(
                    rpc("ObserversRpc", "Ping")
                        .with_parameter(param("n", "u32"))
                        .with_parameter(Parameter::new("channel", TypeRef::Channel))
                        .with_body(recording_body("Pinged", 2)),
                ),
        )
        .unwrap();
    module
}

#[test]
fn skipped_owner_still_consumes_its_payload() {
    init_logger();
    let mut module = chat_module();
    let woven = weave(&mut module);
    let table = woven.table("Chat").unwrap();

    let mut server = Machine::new(&module);
    let object = NetworkObject::server("Chat", Some(2));
    server
        .call(&object, "Say", vec![Value::Text("hello there".to_string())])
        .unwrap();
    server
        .call(
            &object,
            "Ping",
            vec![Value::U32(9), Value::Channel(Channel::Unreliable)],
        )
        .unwrap();
    let sent = server.runtime.take_sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].channel, Channel::Unreliable);
    let bytes = write_packet(&sent, Some(0xBEEF)).unwrap();

    let mut owner = Machine::new(&module);
    let delivery = deliver(
        &mut owner,
        &NetworkObject::client("Chat", 2),
        table,
        RemoteCallKind::Observers,
        &bytes,
        Channel::Unreliable,
        None,
    )
    .unwrap();
    assert_eq!(delivery.dispatched, vec![0, 1]);
    assert_eq!(delivery.trailer, Some(0xBEEF));
    assert!(owner.runtime.calls_to("Said").is_empty());
    let pinged = owner.runtime.calls_to("Pinged");
    assert_eq!(
        pinged[0].args,
        vec![Value::U32(9), Value::Channel(Channel::Unreliable)]
    );

    let mut observer = Machine::new(&module);
    deliver(
        &mut observer,
        &NetworkObject::client("Chat", 5).owned_by(Some(2)),
        table,
        RemoteCallKind::Observers,
        &bytes,
        Channel::Unreliable,
        None,
    )
    .unwrap();
    assert_eq!(
        observer.runtime.calls_to("Said")[0].args,
        vec![Value::Text("hello there".to_string())]
    );
}

fn door_module() -> Module {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Door").with_procedure(
                rpc("ObserversRpc", "Notify")
                    .with_attribute(Attribute::new("TargetRpc"))
                    .with_parameter(Parameter::new("conn", TypeRef::Connection))
                    .with_parameter(param("code", "u32"))
                    .with_body(recording_body("Opened", 2)),
            ),
        )
        .unwrap();
    module
}

#[test]
fn null_connection_goes_to_observers_otherwise_target() {
    let mut module = door_module();
    weave(&mut module);

    let mut server = Machine::new(&module);
    let object = NetworkObject::server("Door", None);
    server
        .call(&object, "Notify", vec![Value::Null, Value::U32(5)])
        .unwrap();
    server
        .call(&object, "Notify", vec![Value::Connection(4), Value::U32(6)])
        .unwrap();

    let sent = server.runtime.take_sent();
    assert_eq!(sent[0].kind, RemoteCallKind::Observers);
    assert_eq!(sent[0].target, None);
    assert!(!sent[0].buffer_last);
    assert_eq!(sent[1].kind, RemoteCallKind::Target);
    assert_eq!(sent[1].target, Some(4));
    assert_eq!(sent[0].rpc_id, sent[1].rpc_id);
    assert_eq!(sent[1].values(), vec![Value::U32(6)]);
}

#[test]
fn target_reader_substitutes_local_connection() {
    let mut module = door_module();
    let woven = weave(&mut module);

    let mut server = Machine::new(&module);
    server
        .call(
            &NetworkObject::server("Door", None),
            "Notify",
            vec![Value::Connection(4), Value::U32(6)],
        )
        .unwrap();
    let bytes = write_packet(&server.runtime.take_sent(), None).unwrap();

    // whichever client receives it sees its own connection, not the one the server named
    let mut client = Machine::new(&module);
    deliver(
        &mut client,
        &NetworkObject::client("Door", 8),
        woven.table("Door").unwrap(),
        RemoteCallKind::Target,
        &bytes,
        Channel::Reliable,
        None,
    )
    .unwrap();
    assert_eq!(
        client.runtime.calls_to("Opened")[0].args,
        vec![Value::Connection(8), Value::U32(6)]
    );
}

#[test]
fn server_caller_connection_reaches_logic() {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Shop").with_procedure(
                Procedure::new("Buy")
                    .with_attribute(
                        Attribute::new("ServerRpc").with_field("RequireOwnership", false),
                    )
                    .with_parameter(param("item", "i32"))
                    .with_parameter(Parameter::new("channel", TypeRef::Channel))
                    .with_parameter(Parameter::new("conn", TypeRef::Connection).with_default())
                    .with_body(recording_body("Bought", 3)),
            ),
        )
        .unwrap();
    let woven = weave(&mut module);

    let mut client = Machine::new(&module);
    client
        .call(
            &NetworkObject::client("Shop", 3).owned_by(None),
            "Buy",
            vec![
                Value::I32(-4),
                Value::Channel(Channel::Unreliable),
                Value::Null,
            ],
        )
        .unwrap();
    let sent = client.runtime.take_sent();
    assert_eq!(sent[0].values(), vec![Value::I32(-4)]);
    let bytes = write_packet(&sent, None).unwrap();

    let mut server = Machine::new(&module);
    deliver(
        &mut server,
        &NetworkObject::server("Shop", None),
        woven.table("Shop").unwrap(),
        RemoteCallKind::Server,
        &bytes,
        sent[0].channel,
        Some(3),
    )
    .unwrap();
    assert_eq!(
        server.runtime.calls_to("Bought")[0].args,
        vec![
            Value::I32(-4),
            Value::Channel(Channel::Unreliable),
            Value::Connection(3)
        ]
    );
}

#[test]
fn unknown_id_is_reported() {
    let mut module = move_module(false);
    let woven = weave(&mut module);
    let mut sent = {
        let mut client = Machine::new(&module);
        client
            .call(&NetworkObject::client("Player", 7), "Move", vec![Value::F32(1.0)])
            .unwrap();
        client.runtime.take_sent()
    };
    sent[0].rpc_id = 40;
    let bytes = write_packet(&sent, None).unwrap();

    let mut server = Machine::new(&module);
    let result = deliver(
        &mut server,
        &NetworkObject::server("Player", Some(7)),
        woven.table("Player").unwrap(),
        RemoteCallKind::Server,
        &bytes,
        Channel::Reliable,
        Some(7),
    );
    assert_eq!(
        result,
        Err(MachineError::UnknownRpc {
            kind: RemoteCallKind::Server,
            rpc_id: 40
        })
    );
}

#[test]
fn lookalike_names_keep_separate_readers() {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Turret")
                .with_procedure(
                    rpc("ServerRpc", "Fire")
                        .with_parameter(param("n", "u32"))
                        .with_body(recording_body("FiredCount", 1)),
                )
                .with_procedure(
                    rpc("ServerRpc", "Fire__u32").with_body(recording_body("FiredBare", 0)),
                ),
        )
        .unwrap();
    let woven = weave(&mut module);
    assert!(woven.outcome.is_success());
    let table = woven.table("Turret").unwrap();
    let readers: Vec<&str> = table
        .iter()
        .map(|(_, _, entry)| entry.reader.name.as_str())
        .collect();
    assert_eq!(readers.len(), 2);
    assert_ne!(readers[0], readers[1]);

    let mut client = Machine::new(&module);
    client
        .call(&NetworkObject::client("Turret", 7), "Fire__u32", Vec::new())
        .unwrap();
    let sent = client.runtime.take_sent();
    assert_eq!(sent[0].rpc_id, 1);
    let bytes = write_packet(&sent, Some(5)).unwrap();

    let mut server = Machine::new(&module);
    let delivery = deliver(
        &mut server,
        &NetworkObject::server("Turret", Some(7)),
        table,
        RemoteCallKind::Server,
        &bytes,
        Channel::Reliable,
        Some(7),
    )
    .unwrap();

    assert_eq!(delivery.dispatched, vec![1]);
    assert_eq!(delivery.trailer, Some(5));
    assert_eq!(server.runtime.calls_to("FiredBare").len(), 1);
    assert!(server.runtime.calls_to("FiredCount").is_empty());
}
