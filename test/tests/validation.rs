use rpcweave::{ValidationError, WeaveError};
use rpcweave_shared::{Attribute, Modifiers, Module, Parameter, Procedure, TypeDef, TypeRef};
use rpcweave_test::{param, recording_body, rpc, ty, weave};

#[test]
fn every_invalid_procedure_is_reported_and_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();

    let invalid = vec![
        rpc("ServerRpc", "Static").with_modifiers(Modifiers {
            is_static: true,
            ..Modifiers::default()
        }),
        rpc("ServerRpc", "Generic").with_generic_parameter("T"),
        rpc("ServerRpc", "Abstract").with_modifiers(Modifiers {
            is_abstract: true,
            ..Modifiers::default()
        }),
        rpc("ServerRpc", "Returns").returning(ty("bool")),
        rpc("TargetRpc", "NoTarget").with_parameter(param("code", "u32")),
        rpc("ObserversRpc", "OpenGeneric")
            .with_parameter(Parameter::new("value", TypeRef::Generic("T".to_string()))),
        rpc("ObserversRpc", "Opaque").with_parameter(param("handle", "FileHandle")),
        rpc("ServerRpc", "Twice").with_attribute(Attribute::new("TargetRpc")),
    ];
    let mut type_def = TypeDef::new("Gadget");
    for procedure in invalid {
        type_def
            .add_procedure(procedure.with_body(recording_body("Untouched", 0)))
            .unwrap();
    }
    type_def
        .add_procedure(rpc("ServerRpc", "Works").with_parameter(param("x", "u32")))
        .unwrap();
    let mut module = Module::new();
    module.add_type(type_def).unwrap();

    let woven = weave(&mut module);
    let report = woven.outcome.report("Gadget").unwrap();

    let kinds: Vec<&str> = report
        .errors
        .iter()
        .map(|error| match error {
            WeaveError::Validation(ValidationError::Static { .. }) => "static",
            WeaveError::Validation(ValidationError::GenericProcedure { .. }) => "generic",
            WeaveError::Validation(ValidationError::Abstract { .. }) => "abstract",
            WeaveError::Validation(ValidationError::NonVoidReturn { .. }) => "non-void",
            WeaveError::Validation(ValidationError::MissingTargetConnection { .. }) => "target",
            WeaveError::Validation(ValidationError::GenericParameter { .. }) => "generic param",
            WeaveError::Validation(ValidationError::Unserializable { .. }) => "unserializable",
            WeaveError::Validation(ValidationError::MultipleRpcAttributes { .. }) => "multiple",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "static",
            "generic",
            "abstract",
            "non-void",
            "target",
            "generic param",
            "unserializable",
            "multiple"
        ]
    );
    assert_eq!(woven.diagnostics.error_count(), 8);
    assert!(woven
        .diagnostics
        .errors()
        .any(|entry| entry.message.contains("FileHandle")));

    assert_eq!(report.registrations.len(), 1);
    assert_eq!(report.registrations[0].rpc_id, 0);

    // one triad for the valid procedure, nothing for the rest
    let gadget = module.type_by_name("Gadget").unwrap();
    assert_eq!(gadget.procedure_count(), 9 + 3);
    for (_, procedure) in gadget.procedures() {
        if procedure.name != "Works" && procedure.synth_key().is_none() {
            assert_eq!(procedure.body.body(), Some(&recording_body("Untouched", 0)));
        }
    }
}

#[test]
fn server_connection_without_default_must_be_serializable() {
    let mut module = Module::new();
    module
        .add_type(
            TypeDef::new("Lobby").with_procedure(
                Procedure::new("Join")
                    .with_attribute(Attribute::new("ServerRpc"))
                    .with_parameter(Parameter::new("conn", TypeRef::Connection)),
            ),
        )
        .unwrap();

    let woven = weave(&mut module);

    assert_eq!(
        woven.outcome.report("Lobby").unwrap().errors,
        vec![WeaveError::Validation(ValidationError::Unserializable {
            procedure: "Join".to_string(),
            parameter_type: "NetworkConnection".to_string(),
        })]
    );
}
