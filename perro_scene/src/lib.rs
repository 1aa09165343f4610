pub mod error;
pub mod lexer;
pub mod parser;
pub mod scene;
pub mod source;

pub use error::*;
pub use lexer::*;
pub use parser::*;
pub use scene::*;
pub use source::*;

/// Parses descriptor text into a [`SceneDescriptor`].
pub fn parse_descriptor(src: &str) -> Result<SceneDescriptor, SceneParseError> {
    Parser::new(src).parse_scene()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_scene() {
        let src = r#"
        @root = main

        [main]
        name = "Player"
        script = "res://scripts/player.cs"

        [Node3D]
            position = (0, 0, 0)
        [/Node3D]
        [/main]

        [body]
        parent = @root
        name = "Body"

        [MeshInstance3D]
            mesh = "res://body.mesh"

            [Node3D]
                position = (0, 1, 0)
            [/Node3D]
        [/MeshInstance3D]
        [/body]
    "#;

        let scene = parse_descriptor(src).expect("failed to parse scene");

        assert_eq!(scene.root, "main");
        assert_eq!(scene.nodes.len(), 2);

        let main = scene.node("main").expect("main node");
        assert!(main.is_root());
        assert_eq!(main.name, "Player");
        assert_eq!(main.script(), Some("res://scripts/player.cs"));
        assert_eq!(main.path(), ".");

        let body = scene.node("body").expect("body node");
        assert_eq!(body.parent.as_deref(), Some("."));
        assert_eq!(body.path(), "Body");
        assert_eq!(body.script(), None);

        let data = body.data.as_ref().expect("body type block");
        assert_eq!(data.ty, "MeshInstance3D");
        assert_eq!(
            data.fields.get("mesh"),
            Some(&SceneValue::Str("res://body.mesh".to_string()))
        );
        let base = data.base.as_ref().expect("Node3D base");
        assert_eq!(base.ty, "Node3D");
        assert_eq!(
            base.fields.get("position"),
            Some(&SceneValue::Vec3 {
                x: 0.0,
                y: 1.0,
                z: 0.0
            })
        );
    }

    #[test]
    fn parse_nested_paths_and_instances() {
        let src = r#"
        @root = world
        @gun = "res://weapons/gun.scn"

        [world]
        [/world]

        # declared before its parent on purpose
        [muzzle]
        parent = arm
        instance = @gun
        [/muzzle]

        [arm]
        parent = @root
        name = "Arm"
        [/arm]
        "#;

        let scene = parse_descriptor(src).expect("failed to parse scene");
        let keys: Vec<&str> = scene.nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, ["world", "muzzle", "arm"]);

        let muzzle = scene.node("muzzle").expect("muzzle node");
        assert_eq!(muzzle.parent.as_deref(), Some("Arm"));
        assert_eq!(muzzle.path(), "Arm/muzzle");
        assert_eq!(muzzle.instance.as_deref(), Some("res://weapons/gun.scn"));
        assert!(muzzle.data.is_none());
    }

    #[test]
    fn parse_defaults_root_to_first_parentless_node() {
        let src = r#"
        [main]
        [/main]
        [child]
        parent = main
        [/child]
        "#;
        let scene = parse_descriptor(src).expect("failed to parse scene");
        assert_eq!(scene.root, "main");
        assert_eq!(scene.root_node().map(|n| n.key.as_str()), Some("main"));
        assert_eq!(scene.node("child").map(SceneNode::path).as_deref(), Some("child"));
    }

    #[test]
    fn parse_keeps_extra_node_properties() {
        let src = r#"
        [main]
        script = "res://a.cs"
        visible = false
        [/main]
        "#;
        let scene = parse_descriptor(src).expect("failed to parse scene");
        let main = scene.root_node().expect("root");
        let keys: Vec<&str> = main.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["script", "visible"]);
        assert_eq!(main.properties.get("visible"), Some(&SceneValue::Bool(false)));
    }

    #[test]
    fn parse_rejects_duplicate_keys() {
        let src = r#"
        [main]
        [/main]
        [main]
        parent = main
        [/main]
        "#;
        let err = parse_descriptor(src).expect_err("expected duplicate key error");
        assert_eq!(err, SceneParseError::DuplicateKey("main".to_string()));
    }

    #[test]
    fn parse_rejects_sibling_path_collision() {
        let src = r#"
        [world]
        [/world]
        [a]
        parent = world
        name = "Gun"
        [/a]
        [b]
        parent = world
        name = "Gun"
        [/b]
        "#;
        let err = parse_descriptor(src).expect_err("expected duplicate path");
        assert_eq!(
            err,
            SceneParseError::DuplicatePath {
                path: "Gun".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );

        // same name under different parents is fine
        let src = r#"
        [world]
        [/world]
        [left]
        parent = world
        [/left]
        [right]
        parent = world
        [/right]
        [g1]
        parent = left
        name = "Gun"
        [/g1]
        [g2]
        parent = right
        name = "Gun"
        [/g2]
        "#;
        let scene = parse_descriptor(src).expect("distinct paths");
        let paths: Vec<String> = scene.nodes.iter().map(SceneNode::path).collect();
        assert_eq!(paths, [".", "left", "right", "left/Gun", "right/Gun"]);
    }

    #[test]
    fn parse_rejects_unterminated_string() {
        let src = "[main]\nscript = \"res://player.cs\n[/main]\n";
        let err = parse_descriptor(src).expect_err("expected unterminated string");
        assert_eq!(err, SceneParseError::UnterminatedString { line: 2 });
    }

    #[test]
    fn parse_rejects_unknown_parent_and_orphans() {
        let src = r#"
        [main]
        [/main]
        [child]
        parent = ghost
        [/child]
        "#;
        let err = parse_descriptor(src).expect_err("expected unknown parent");
        assert!(matches!(err, SceneParseError::UnknownParent { .. }));

        let src = r#"
        @root = main
        [main]
        [/main]
        [stray]
        [/stray]
        "#;
        let err = parse_descriptor(src).expect_err("expected orphan");
        assert_eq!(err, SceneParseError::OrphanNode("stray".to_string()));
    }

    #[test]
    fn parse_rejects_parent_cycle() {
        let src = r#"
        @root = main
        [main]
        [/main]
        [a]
        parent = b
        [/a]
        [b]
        parent = a
        [/b]
        "#;
        let err = parse_descriptor(src).expect_err("expected cycle");
        assert!(matches!(err, SceneParseError::ParentCycle(_)));
    }

    #[test]
    fn parse_reports_mismatched_close_with_line() {
        let src = "[main]\n[Node3D]\n[/Node2D]\n[/main]\n";
        let err = parse_descriptor(src).expect_err("expected mismatched close");
        match err {
            SceneParseError::MismatchedClose { line, open, close } => {
                assert_eq!(line, 3);
                assert_eq!(open, "Node3D");
                assert_eq!(close, "Node2D");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_non_string_script() {
        let src = "[main]\nscript = 12\n[/main]\n";
        let err = parse_descriptor(src).expect_err("expected invalid script");
        assert!(matches!(
            err,
            SceneParseError::InvalidField {
                field: "script",
                ..
            }
        ));
    }

    #[test]
    fn parse_rejects_unknown_variable() {
        let src = "[main]\ninstance = @nope\n[/main]\n";
        let err = parse_descriptor(src).expect_err("expected unknown variable");
        assert!(matches!(err, SceneParseError::UnknownVariable { .. }));
    }

    #[test]
    fn memory_source_loads_by_path() {
        let source = MemorySource::new().with("res://a.scn", "[a]\n[/a]\n");
        assert_eq!(source.load("res://a.scn").as_deref(), Some("[a]\n[/a]\n"));
        assert!(source.load("res://b.scn").is_none());
    }

    #[test]
    fn node_path_rules() {
        assert_eq!(node_path(None, "Root"), ".");
        assert_eq!(node_path(Some("."), "Body"), "Body");
        assert_eq!(node_path(Some("Body/Arm"), "Hand"), "Body/Arm/Hand");
    }
}
