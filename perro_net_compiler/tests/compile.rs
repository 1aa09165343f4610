use perro_net_compiler::{DiagnosticKind, NetSchemaError, SchemaCompiler};
use perro_net_ids::{FunctionIndex, PropertyIndex, SceneId, StaticNodeId};
use perro_net_meta::{
    AttributeManifest, ClassManifest, ClassRegistry, FunctionManifest, InterestMask,
    PropertyManifest,
};
use perro_net_types::{WireSubtype, WireType, WireTypeInfo};
use perro_scene::{MemorySource, SceneParseError};

const CLASSES: &str = r#"{
    "classes": [
        {
            "name": "HLNC.NetworkPropertyAttribute",
            "fields": [{ "name": "InterestMask", "type": "long", "default": "2" }]
        },
        { "name": "Game.Team", "kind": "enum" },
        { "name": "Game.InventoryBase", "interfaces": ["INetworkSerializable<Game.InventoryBase>", "IBsonSerializable"] },
        { "name": "Game.Inventory", "base": "Game.InventoryBase" },
        {
            "name": "Game.Player",
            "base": "NetworkNode3D",
            "script": "res://scripts/player.cs",
            "properties": [
                { "name": "NetworkId", "type": "long", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Health", "type": "byte", "attributes": [{ "name": "NetworkProperty", "args": { "InterestMask": 4 } }] },
                { "name": "Inventory", "type": "Game.Inventory", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Team", "type": "Game.Team", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Blob", "type": "Mystery", "attributes": [{ "name": "NetworkProperty" }] }
            ],
            "functions": [
                {
                    "name": "Fire",
                    "parameters": [{ "name": "peer", "type": "Peer" }, { "name": "dir", "type": "Vector3" }],
                    "attributes": [{ "name": "NetworkFunction", "args": { "WithPeer": true } }]
                },
                {
                    "name": "Say",
                    "parameters": [{ "name": "text", "type": "string" }],
                    "attributes": [{ "name": "NetworkFunction" }]
                }
            ]
        },
        {
            "name": "Game.Weapon",
            "base": "NetworkNode3D",
            "script": "res://scripts/weapon.cs",
            "properties": [
                { "name": "NetworkId", "type": "long", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Ammo", "type": "int", "attributes": [{ "name": "NetworkProperty" }] }
            ],
            "functions": [{ "name": "Reload", "attributes": [{ "name": "NetworkFunction" }] }]
        },
        {
            "name": "Game.Level",
            "base": "NetworkNode3D",
            "script": "res://scripts/level.cs",
            "properties": [
                { "name": "NetworkId", "type": "long", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Score", "type": "int", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Seed", "type": "int", "attributes": [{ "name": "NetworkProperty" }] }
            ]
        },
        {
            "name": "Game.Pickup",
            "base": "NetworkNode3D",
            "script": "res://scripts/pickup.cs",
            "properties": [
                { "name": "Value", "type": "float", "attributes": [{ "name": "NetworkProperty" }] }
            ]
        },
        {
            "name": "Game.Turret",
            "base": "NetworkNode3D",
            "script": "res://scripts/turret.cs",
            "properties": [
                { "name": "Target", "type": "NetworkNode3D", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Lazy", "type": "LazyPeerState", "attributes": [{ "name": "NetworkProperty" }] },
                { "name": "Owner", "type": "long", "attributes": [{ "name": "NetworkProperty", "args": { "Subtype": "Guid" } }] },
                { "name": "Mode", "type": "long", "attributes": [{ "name": "NetworkProperty", "args": { "Subtype": "Nope" } }] }
            ],
            "functions": [
                { "name": "Ping", "attributes": [{ "name": "NetworkFunction", "args": { "WithPeer": true } }] }
            ]
        },
        { "name": "Game.Decoration", "base": "Node3D", "script": "res://scripts/deco.cs" }
    ]
}"#;

fn classes() -> ClassRegistry {
    ClassRegistry::from_json("classes.json", CLASSES).expect("fixture manifest")
}

/// Descriptor whose root uses `script` (if any) and which lists `children`
/// as `(name, script, instance)` directly under the root.
fn scene(root_script: Option<&str>, children: &[(&str, Option<&str>, Option<&str>)]) -> String {
    let mut src = String::from("[root]\n");
    if let Some(script) = root_script {
        src.push_str(&format!("script = \"{script}\"\n"));
    }
    src.push_str("[/root]\n");
    for (name, script, instance) in children {
        src.push_str(&format!("[{name}]\nparent = root\n"));
        if let Some(script) = script {
            src.push_str(&format!("script = \"{script}\"\n"));
        }
        if let Some(instance) = instance {
            src.push_str(&format!("instance = \"{instance}\"\n"));
        }
        src.push_str(&format!("[/{name}]\n"));
    }
    src
}

const PLAYER: &str = "res://scripts/player.cs";
const WEAPON: &str = "res://scripts/weapon.cs";
const LEVEL: &str = "res://scripts/level.cs";
const PICKUP: &str = "res://scripts/pickup.cs";
const TURRET: &str = "res://scripts/turret.cs";

fn network_class(name: &str, script: &str, properties: usize, functions: usize) -> ClassManifest {
    let mut class = ClassManifest::new(name);
    class.base = Some("NetworkNode3D".to_string());
    class.script = Some(script.to_string());
    class.properties = (0..properties)
        .map(|i| PropertyManifest {
            name: format!("P{i}"),
            ty: "int".to_string(),
            attributes: vec![AttributeManifest::new("NetworkProperty")],
        })
        .collect();
    class.functions = (0..functions)
        .map(|i| FunctionManifest {
            name: format!("F{i}"),
            parameters: Vec::new(),
            attributes: vec![AttributeManifest::new("NetworkFunction")],
        })
        .collect();
    class
}

#[test]
fn player_scene_collects_members() {
    let source = MemorySource::new().with("res://player.scn", scene(Some(PLAYER), &[]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://player.scn"]).expect("compile");
    let reg = &output.registry;

    assert_eq!(reg.scene_id("res://player.scn"), Some(SceneId(0)));
    assert_eq!(
        reg.static_network_nodes("res://player.scn"),
        [(StaticNodeId(0), ".".to_string())]
    );

    let prop = |name: &str| {
        reg.property("res://player.scn", ".", name)
            .unwrap_or_else(|| panic!("missing property {name}"))
    };
    assert_eq!(prop("NetworkId").index, PropertyIndex(0));
    assert_eq!(prop("NetworkId").wire, WireTypeInfo::plain(WireType::Int));
    assert_eq!(prop("Health").index, PropertyIndex(1));
    assert_eq!(
        prop("Health").wire,
        WireTypeInfo::new(WireType::Int, WireSubtype::Byte)
    );
    assert_eq!(prop("Team").wire, WireTypeInfo::new(WireType::Int, WireSubtype::Int));
    assert_eq!(prop("Blob").wire, WireTypeInfo::nil());
    assert_eq!(prop("Blob").index, PropertyIndex(4));

    let inventory = prop("Inventory");
    assert_eq!(inventory.wire, WireTypeInfo::plain(WireType::Object));
    assert_eq!(inventory.network_serializer.as_deref(), Some("Game.InventoryBase"));
    assert_eq!(inventory.bson_serializer.as_deref(), Some("Game.InventoryBase"));
    assert!(prop("Health").network_serializer.is_none());

    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnrecognizedType
                && d.member.as_deref() == Some("Blob"))
    );
}

#[test]
fn interest_mask_explicit_then_attribute_default() {
    let source = MemorySource::new().with("res://player.scn", scene(Some(PLAYER), &[]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://player.scn"]).expect("compile");
    let reg = &output.registry;

    let health = reg.property("res://player.scn", ".", "Health").expect("Health");
    assert_eq!(health.interest_mask, InterestMask::Explicit(4));
    let id = reg.property("res://player.scn", ".", "NetworkId").expect("NetworkId");
    assert_eq!(id.interest_mask, InterestMask::DefaultLiteral("2".to_string()));
    assert_eq!(id.interest_mask.value(), Some(2));
}

#[test]
fn with_peer_drops_first_parameter() {
    let source = MemorySource::new().with("res://player.scn", scene(Some(PLAYER), &[]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://player.scn"]).expect("compile");

    let fire = output
        .registry
        .function("res://player.scn", ".", "Fire")
        .expect("Fire");
    assert!(fire.with_peer);
    assert_eq!(fire.index, FunctionIndex(0));
    assert_eq!(fire.arguments, [WireTypeInfo::plain(WireType::Vector3)]);

    let say = output
        .registry
        .function("res://player.scn", ".", "Say")
        .expect("Say");
    assert!(!say.with_peer);
    assert_eq!(say.index, FunctionIndex(1));
    assert_eq!(say.arguments, [WireTypeInfo::plain(WireType::String)]);
}

#[test]
fn framework_types_classify_without_manifests() {
    let source = MemorySource::new().with("res://turret.scn", scene(Some(TURRET), &[]));
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://turret.scn"])
        .expect("compile");
    let reg = &output.registry;

    let target = reg.property("res://turret.scn", ".", "Target").expect("Target");
    assert_eq!(
        target.wire,
        WireTypeInfo::new(WireType::Object, WireSubtype::NetworkNode)
    );
    let lazy = reg.property("res://turret.scn", ".", "Lazy").expect("Lazy");
    assert_eq!(
        lazy.wire,
        WireTypeInfo::new(WireType::Object, WireSubtype::AsyncPeerValue)
    );
    assert!(
        !output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnrecognizedType)
    );
}

#[test]
fn subtype_attribute_overrides_inferred_subtype() {
    let source = MemorySource::new().with("res://turret.scn", scene(Some(TURRET), &[]));
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://turret.scn"])
        .expect("compile");
    let reg = &output.registry;

    let owner = reg.property("res://turret.scn", ".", "Owner").expect("Owner");
    assert_eq!(owner.wire, WireTypeInfo::new(WireType::Int, WireSubtype::Guid));

    let mode = reg.property("res://turret.scn", ".", "Mode").expect("Mode");
    assert_eq!(mode.wire, WireTypeInfo::plain(WireType::Int));
    let invalid: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::InvalidSubtype)
        .collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].member.as_deref(), Some("Mode"));
    assert_eq!(invalid[0].node_path.as_deref(), Some("."));
}

#[test]
fn with_peer_without_parameters_is_diagnosed() {
    let source = MemorySource::new().with("res://turret.scn", scene(Some(TURRET), &[]));
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://turret.scn"])
        .expect("compile");

    let ping = output
        .registry
        .function("res://turret.scn", ".", "Ping")
        .expect("Ping");
    assert!(ping.with_peer);
    assert!(ping.arguments.is_empty());
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingPeerParameter
                && d.member.as_deref() == Some("Ping"))
    );
}

#[test]
fn identity_property_only_on_root() {
    let source = MemorySource::new().with(
        "res://level.scn",
        scene(Some(LEVEL), &[("Gun", Some(WEAPON), None)]),
    );
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://level.scn"]).expect("compile");
    let reg = &output.registry;

    assert!(reg.property("res://level.scn", ".", "NetworkId").is_some());
    assert!(reg.property("res://level.scn", "Gun", "NetworkId").is_none());
    let ammo = reg.property("res://level.scn", "Gun", "Ammo").expect("Ammo");
    assert_eq!(ammo.index, PropertyIndex(3));
    assert_eq!(
        reg.static_network_nodes("res://level.scn"),
        [
            (StaticNodeId(0), ".".to_string()),
            (StaticNodeId(1), "Gun".to_string())
        ]
    );
}

#[test]
fn non_network_instance_is_rebased() {
    let source = MemorySource::new()
        .with("res://p.scn", scene(Some(LEVEL), &[("a", None, Some("res://q.scn"))]))
        .with("res://q.scn", scene(None, &[("b", Some(PICKUP), None)]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://p.scn"]).expect("compile");
    let reg = &output.registry;

    let value = reg.property("res://p.scn", "a/b", "Value").expect("merged property");
    assert_eq!(value.node_path, "a/b");
    assert_eq!(value.index, PropertyIndex(3));
    assert_eq!(
        reg.static_network_nodes("res://p.scn"),
        [
            (StaticNodeId(0), ".".to_string()),
            (StaticNodeId(1), "a/b".to_string())
        ]
    );
    assert_eq!(reg.scene_count(), 1);
    assert!(reg.properties("res://q.scn").is_none());
}

#[test]
fn rebased_functions_continue_the_parent_counter() {
    let source = MemorySource::new()
        .with(
            "res://p.scn",
            scene(Some(PLAYER), &[("Arm", None, Some("res://arm.scn"))]),
        )
        .with("res://arm.scn", scene(None, &[("Gun", Some(WEAPON), None)]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://p.scn"]).expect("compile");

    let reload = output
        .registry
        .function("res://p.scn", "Arm/Gun", "Reload")
        .expect("Reload");
    assert_eq!(reload.index, FunctionIndex(2));
    assert_eq!(reload.node_path, "Arm/Gun");
}

#[test]
fn network_instance_is_a_boundary() {
    let source = MemorySource::new()
        .with(
            "res://world.scn",
            scene(Some(LEVEL), &[("P1", None, Some("res://player.scn"))]),
        )
        .with("res://player.scn", scene(Some(PLAYER), &[]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler.run(&["res://world.scn"]).expect("compile");
    let reg = &output.registry;

    assert_eq!(reg.scene_id("res://world.scn"), Some(SceneId(0)));
    assert_eq!(reg.scene_id("res://player.scn"), Some(SceneId(1)));

    let world = reg.properties("res://world.scn").expect("world properties");
    assert!(world.keys().all(|path| path == "."));
    assert!(reg.functions("res://world.scn").is_none());
    assert_eq!(reg.static_network_nodes("res://world.scn").len(), 1);
    assert!(reg.property("res://player.scn", ".", "Health").is_some());
}

#[test]
fn network_scene_behind_plain_instance_is_a_boundary() {
    let source = MemorySource::new()
        .with("res://p.scn", scene(Some(LEVEL), &[("a", None, Some("res://q.scn"))]))
        .with(
            "res://q.scn",
            scene(
                None,
                &[("b", Some(PICKUP), None), ("r", None, Some("res://r.scn"))],
            ),
        )
        .with("res://r.scn", scene(Some(PLAYER), &[]));
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://p.scn"])
        .expect("compile");
    let reg = &output.registry;

    assert_eq!(reg.scene_id("res://p.scn"), Some(SceneId(0)));
    assert_eq!(reg.scene_id("res://r.scn"), Some(SceneId(1)));
    assert_eq!(reg.scene_id("res://q.scn"), None);
    assert_eq!(reg.scene_count(), 2);

    let paths: Vec<&str> = reg
        .properties("res://p.scn")
        .expect("p properties")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(paths, [".", "a/b"]);
    assert_eq!(
        reg.property("res://p.scn", "a/b", "Value").map(|p| p.index),
        Some(PropertyIndex(3))
    );
    assert!(reg.functions("res://p.scn").is_none());
    assert_eq!(
        reg.static_network_nodes("res://p.scn"),
        [
            (StaticNodeId(0), ".".to_string()),
            (StaticNodeId(1), "a/b".to_string())
        ]
    );

    let health = reg.property("res://r.scn", ".", "Health").expect("r keeps its own members");
    assert_eq!(health.index, PropertyIndex(1));
}

#[test]
fn shared_descriptor_is_parsed_once() {
    let parent = |name: &str| scene(Some(LEVEL), &[(name, None, Some("res://gear.scn"))]);
    let source = MemorySource::new()
        .with("res://a.scn", parent("Gear"))
        .with("res://b.scn", parent("Gear"))
        .with("res://c.scn", parent("Kit"))
        .with("res://gear.scn", scene(None, &[("Barrel", Some(WEAPON), None)]));
    let mut compiler = SchemaCompiler::new(source, classes());
    let output = compiler
        .run(&["res://a.scn", "res://b.scn", "res://c.scn"])
        .expect("compile");

    assert_eq!(compiler.cache().parse_count(), 4);
    assert_eq!(compiler.cache().len(), 4);

    let reg = &output.registry;
    assert_eq!(reg.scene_count(), 3);
    for (path, at) in [
        ("res://a.scn", "Gear/Barrel"),
        ("res://b.scn", "Gear/Barrel"),
        ("res://c.scn", "Kit/Barrel"),
    ] {
        let ammo = reg.property(path, at, "Ammo").expect("merged Ammo");
        assert_eq!(ammo.index, PropertyIndex(3));
        assert!(reg.property(path, at, "NetworkId").is_none());
    }
}

#[test]
fn compile_is_deterministic() {
    let source = || {
        MemorySource::new()
            .with(
                "res://world.scn",
                scene(
                    Some(LEVEL),
                    &[
                        ("P1", None, Some("res://player.scn")),
                        ("Arm", None, Some("res://arm.scn")),
                        ("Gun", Some(WEAPON), None),
                    ],
                ),
            )
            .with("res://player.scn", scene(Some(PLAYER), &[]))
            .with("res://arm.scn", scene(None, &[("Gun", Some(WEAPON), None)]))
    };
    let roots = ["res://world.scn", "res://player.scn"];

    let mut first = SchemaCompiler::new(source(), classes());
    let a = first.run(&roots).expect("first run");
    let b = first.run(&roots).expect("second run");
    let c = SchemaCompiler::new(source(), classes())
        .run(&roots)
        .expect("fresh run");

    assert_eq!(a.registry, b.registry);
    assert_eq!(a.registry, c.registry);
    assert_eq!(
        serde_json::to_string(&a.registry).expect("json"),
        serde_json::to_string(&c.registry).expect("json")
    );
    assert_eq!(a.diagnostics, c.diagnostics);
}

#[test]
fn sixty_four_properties_fit() {
    let mut classes = ClassRegistry::new();
    classes
        .insert(network_class("Game.Big", "res://big.cs", 64, 0))
        .expect("class");
    let source = MemorySource::new().with("res://big.scn", scene(Some("res://big.cs"), &[]));
    let output = SchemaCompiler::new(source, classes)
        .run(&["res://big.scn"])
        .expect("64 properties fit");
    let last = output
        .registry
        .property("res://big.scn", ".", "P63")
        .expect("P63");
    assert_eq!(last.index, PropertyIndex(63));
}

#[test]
fn sixty_five_properties_fail() {
    let mut classes = ClassRegistry::new();
    classes
        .insert(network_class("Game.Big", "res://big.cs", 65, 0))
        .expect("class");
    let source = MemorySource::new().with("res://big.scn", scene(Some("res://big.cs"), &[]));
    let err = SchemaCompiler::new(source, classes)
        .run(&["res://big.scn"])
        .expect_err("65 properties overflow");
    assert!(matches!(
        err,
        NetSchemaError::PropertyCapacity { ref scene, ref member, limit: 64, .. }
            if scene == "res://big.scn" && member == "P64"
    ));
}

#[test]
fn function_capacity_is_255() {
    let run = |functions: usize| {
        let mut classes = ClassRegistry::new();
        classes
            .insert(network_class("Game.Rpc", "res://rpc.cs", 0, functions))
            .expect("class");
        let source = MemorySource::new().with("res://rpc.scn", scene(Some("res://rpc.cs"), &[]));
        SchemaCompiler::new(source, classes).run(&["res://rpc.scn"])
    };

    let output = run(255).expect("255 functions fit");
    let last = output
        .registry
        .function("res://rpc.scn", ".", "F254")
        .expect("F254");
    assert_eq!(last.index, FunctionIndex(254));

    let err = run(256).expect_err("256 functions overflow");
    assert!(matches!(err, NetSchemaError::FunctionCapacity { limit: 255, .. }));
}

#[test]
fn circular_instancing_is_an_error() {
    let source = MemorySource::new()
        .with("res://one.scn", scene(Some(LEVEL), &[("Two", None, Some("res://two.scn"))]))
        .with("res://two.scn", scene(None, &[("One", None, Some("res://one.scn"))]));
    let err = SchemaCompiler::new(source, classes())
        .run(&["res://one.scn"])
        .expect_err("cycle");
    match err {
        NetSchemaError::CircularInstancing { path, chain } => {
            assert_eq!(path, "res://one.scn");
            assert_eq!(chain, ["res://one.scn", "res://two.scn", "res://one.scn"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_descriptor_names_the_referrer() {
    let source = MemorySource::new().with(
        "res://world.scn",
        scene(Some(LEVEL), &[("Ghost", None, Some("res://nope.scn"))]),
    );
    let err = SchemaCompiler::new(source, classes())
        .run(&["res://world.scn"])
        .expect_err("missing");
    match &err {
        NetSchemaError::MissingDescriptor { path, referrer } => {
            assert_eq!(path, "res://nope.scn");
            assert_eq!(referrer.as_deref(), Some("res://world.scn:Ghost"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("res://world.scn:Ghost"));

    let err = SchemaCompiler::new(MemorySource::new(), classes())
        .run(&["res://absent.scn"])
        .expect_err("missing root");
    assert!(matches!(
        err,
        NetSchemaError::MissingDescriptor { referrer: None, .. }
    ));
}

#[test]
fn parse_errors_carry_the_path() {
    let source = MemorySource::new().with("res://bad.scn", "[root]\n[/other]\n");
    let err = SchemaCompiler::new(source, classes())
        .run(&["res://bad.scn"])
        .expect_err("parse error");
    assert!(matches!(err, NetSchemaError::Parse { ref path, .. } if path == "res://bad.scn"));
}

#[test]
fn non_network_root_registers_nothing() {
    let source = MemorySource::new().with(
        "res://props.scn",
        scene(Some("res://scripts/deco.cs"), &[("Gun", Some(WEAPON), None)]),
    );
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://props.scn"])
        .expect("compile");

    assert_eq!(output.registry.scene_count(), 0);
    assert!(output.registry.properties("res://props.scn").is_none());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::NotNetworkScene);
}

#[test]
fn unknown_and_plain_scripts_are_skipped() {
    let source = MemorySource::new().with(
        "res://level.scn",
        scene(
            Some(LEVEL),
            &[
                ("Deco", Some("res://scripts/deco.cs"), None),
                ("Ghost", Some("res://scripts/missing.cs"), None),
                ("Gun", Some(WEAPON), None),
            ],
        ),
    );
    let output = SchemaCompiler::new(source, classes())
        .run(&["res://level.scn"])
        .expect("compile");
    let nodes: Vec<&str> = output
        .registry
        .static_network_nodes("res://level.scn")
        .iter()
        .map(|(_, path)| path.as_str())
        .collect();
    assert_eq!(nodes, [".", "Gun"]);
}

#[test]
fn sibling_nodes_sharing_a_path_are_rejected() {
    let src = format!(
        "[root]\nscript = \"{LEVEL}\"\n[/root]\n\
         [a]\nparent = root\nname = \"Gun\"\nscript = \"{WEAPON}\"\n[/a]\n\
         [b]\nparent = root\nname = \"Gun\"\nscript = \"{WEAPON}\"\n[/b]\n"
    );
    let source = MemorySource::new().with("res://w.scn", src);
    let err = SchemaCompiler::new(source, classes())
        .run(&["res://w.scn"])
        .expect_err("duplicate path");
    assert!(matches!(
        err,
        NetSchemaError::Parse {
            source: SceneParseError::DuplicatePath { ref path, .. },
            ..
        } if path == "Gun"
    ));
}

#[test]
fn merged_node_colliding_with_declared_node_is_rejected() {
    let src = format!(
        "[root]\nscript = \"{LEVEL}\"\n[/root]\n\
         [arm]\nparent = root\nname = \"Arm\"\ninstance = \"res://arm.scn\"\n[/arm]\n\
         [gun]\nparent = arm\nname = \"Gun\"\nscript = \"{WEAPON}\"\n[/gun]\n"
    );
    let source = MemorySource::new()
        .with("res://p.scn", src)
        .with("res://arm.scn", scene(None, &[("Gun", Some(WEAPON), None)]));
    let err = SchemaCompiler::new(source, classes())
        .run(&["res://p.scn"])
        .expect_err("collision");
    match err {
        NetSchemaError::DuplicateNodePath { scene, node_path } => {
            assert_eq!(scene, "res://p.scn");
            assert_eq!(node_path, "Arm/Gun");
        }
        other => panic!("unexpected error: {other}"),
    }
}
