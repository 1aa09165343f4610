use std::rc::Rc;

use perro_net_meta::{
    AnnotatedFunction, AnnotatedProperty, MetadataProvider, NETWORK_FUNCTION, NETWORK_PROPERTY,
    resolve_interest_mask, resolve_subtype_override, resolve_with_peer,
};
use perro_net_types::{DeclaredType, WireSubtype, WireType, WireTypeInfo, classify};
use perro_scene::{DescriptorSource, SceneNode, parse_descriptor};
use serde::Serialize;

use crate::{
    CacheEntry, CollectedData, CollectedFunction, CollectedProperty, CompilationCache,
    CompilerConfig, Diagnostic, DiagnosticKind, IndexAllocator, NetSchemaError, Registry,
    join_node_path,
};

/// Result of [`SchemaCompiler::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileOutput {
    pub registry: Registry,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles scene descriptors into a [`Registry`].
///
/// Each descriptor is parsed and walked at most once per run; later
/// references reuse the cached [`CollectedData`]. Instancing a network scene
/// never merges it into the instancing descriptor.
pub struct SchemaCompiler<S, P> {
    source: S,
    provider: P,
    config: CompilerConfig,
    cache: CompilationCache,
    registry: Registry,
    diagnostics: Vec<Diagnostic>,
    /// Descriptors currently being compiled, outermost first.
    stack: Vec<String>,
}

impl<S: DescriptorSource, P: MetadataProvider> SchemaCompiler<S, P> {
    pub fn new(source: S, provider: P) -> Self {
        Self::with_config(source, provider, CompilerConfig::default())
    }

    pub fn with_config(source: S, provider: P, config: CompilerConfig) -> Self {
        Self {
            source,
            provider,
            config,
            cache: CompilationCache::new(),
            registry: Registry::new(),
            diagnostics: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    /// Clears all state left by a previous run.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.registry.clear();
        self.diagnostics.clear();
        self.stack.clear();
    }

    /// Compiles every root in order into a fresh registry.
    pub fn run<R: AsRef<str>>(&mut self, roots: &[R]) -> Result<CompileOutput, NetSchemaError> {
        self.reset();

        for root in roots {
            let root = root.as_ref();
            let data = self.compile(root)?;
            if !data.is_network_scene {
                self.diagnose(Diagnostic::new(
                    DiagnosticKind::NotNetworkScene,
                    root,
                    format!(
                        "root node does not derive from `{}`; nothing registered",
                        self.config.network_base_type
                    ),
                ));
            }
        }

        log::info!(
            "compiled {} network scene(s) from {} root(s), {} descriptor(s) parsed, {} diagnostic(s)",
            self.registry.scene_count(),
            roots.len(),
            self.cache.parse_count(),
            self.diagnostics.len()
        );

        Ok(CompileOutput {
            registry: self.registry.clone(),
            diagnostics: self.diagnostics.clone(),
        })
    }

    pub fn compile(&mut self, path: &str) -> Result<Rc<CollectedData>, NetSchemaError> {
        self.compile_from(path, None)
    }

    fn compile_from(
        &mut self,
        path: &str,
        referrer: Option<String>,
    ) -> Result<Rc<CollectedData>, NetSchemaError> {
        if let Some(data) = self.cache.completed(path) {
            log::debug!("cache hit `{path}`");
            return Ok(data);
        }
        if matches!(self.cache.get(path), Some(CacheEntry::InProgress)) {
            let start = self.stack.iter().position(|p| p == path).unwrap_or(0);
            let mut chain = self.stack[start..].to_vec();
            chain.push(path.to_string());
            return Err(NetSchemaError::CircularInstancing {
                path: path.to_string(),
                chain,
            });
        }

        self.cache.begin(path);
        self.stack.push(path.to_string());
        let result = self.compile_uncached(path, referrer);
        self.stack.pop();

        match result {
            Ok(data) => {
                if data.is_network_scene {
                    self.registry.record_scene(path, &data);
                }
                Ok(self.cache.finish(path, data))
            }
            Err(err) => {
                self.cache.abandon(path);
                Err(err)
            }
        }
    }

    fn compile_uncached(
        &mut self,
        path: &str,
        referrer: Option<String>,
    ) -> Result<CollectedData, NetSchemaError> {
        let text = self
            .source
            .load(path)
            .ok_or_else(|| NetSchemaError::MissingDescriptor {
                path: path.to_string(),
                referrer,
            })?;
        self.cache.record_parse();
        let descriptor = parse_descriptor(&text).map_err(|source| NetSchemaError::Parse {
            path: path.to_string(),
            source,
        })?;

        let is_network_scene = descriptor
            .root_node()
            .and_then(|root| self.network_class(root))
            .is_some();

        let mut data = CollectedData {
            is_network_scene,
            ..CollectedData::default()
        };
        if is_network_scene {
            data.scene_id = Some(self.registry.register_scene(path)?);
        }

        let mut alloc = IndexAllocator::new(path);
        for node in &descriptor.nodes {
            let node_path = node.path();

            if let Some(class) = self.network_class(node) {
                self.collect_node(path, node, &node_path, &class, &mut data, &mut alloc)?;
            } else if let Some(instance) = node.instance.as_deref() {
                let child = self.compile_from(instance, Some(format!("{path}:{node_path}")))?;
                if child.is_network_scene {
                    log::debug!("`{path}` [{node_path}]: `{instance}` is a network scene, not merged");
                    continue;
                }
                merge_child(&mut data, &mut alloc, path, &child, &node_path)?;
            }
        }

        log::debug!(
            "compiled `{path}`: {} static node(s), {} propert(ies), {} function(s)",
            data.static_network_nodes.len(),
            data.property_count(),
            data.function_count()
        );
        Ok(data)
    }

    /// Class of `node`'s script if it derives from the network base type.
    fn network_class(&self, node: &SceneNode) -> Option<String> {
        let script = node.script()?;
        let Some(class) = self.provider.resolve_script(script) else {
            log::debug!("node `{}`: script `{script}` has no known class", node.name);
            return None;
        };
        if !self
            .provider
            .is_subclass_of(&class.name, &self.config.network_base_type)
        {
            log::debug!(
                "node `{}`: `{}` is not a `{}`",
                node.name,
                class.name,
                self.config.network_base_type
            );
            return None;
        }
        Some(class.name.clone())
    }

    fn collect_node(
        &mut self,
        scene: &str,
        node: &SceneNode,
        node_path: &str,
        class: &str,
        data: &mut CollectedData,
        alloc: &mut IndexAllocator,
    ) -> Result<(), NetSchemaError> {
        add_static_node(data, alloc, scene, node_path.to_string())?;

        let members = self
            .provider
            .annotated_members(class, NETWORK_PROPERTY, NETWORK_FUNCTION);
        if members.is_empty() {
            log::debug!("`{scene}` [{node_path}]: `{class}` has no network members");
        }

        for property in &members.properties {
            if property.name == self.config.identity_property && !node.is_root() {
                log::debug!("`{scene}` [{node_path}]: identity property skipped off the root");
                continue;
            }
            let collected = self.collect_property(scene, node_path, property, alloc)?;
            data.insert_property(collected);
        }

        for function in &members.functions {
            let collected = self.collect_function(scene, node_path, function, alloc)?;
            data.insert_function(collected);
        }

        Ok(())
    }

    fn collect_property(
        &mut self,
        scene: &str,
        node_path: &str,
        property: &AnnotatedProperty,
        alloc: &mut IndexAllocator,
    ) -> Result<CollectedProperty, NetSchemaError> {
        let subtype = match resolve_subtype_override(&property.attributes) {
            Ok(subtype) => subtype,
            Err(message) => {
                self.diagnose(
                    Diagnostic::new(DiagnosticKind::InvalidSubtype, scene, message)
                        .at(node_path, &property.name),
                );
                None
            }
        };

        let wire = self.classify_member(scene, node_path, &property.name, &property.ty, subtype);
        let (network_serializer, bson_serializer) = if wire.ty == WireType::Object {
            (
                self.find_serializer(&property.ty.name, &self.config.network_serializer_interface),
                self.find_serializer(&property.ty.name, &self.config.bson_serializer_interface),
            )
        } else {
            (None, None)
        };

        Ok(CollectedProperty {
            node_path: node_path.to_string(),
            name: property.name.clone(),
            wire,
            index: alloc.next_property(node_path, &property.name)?,
            interest_mask: resolve_interest_mask(&self.provider, &property.attributes),
            network_serializer,
            bson_serializer,
        })
    }

    fn collect_function(
        &mut self,
        scene: &str,
        node_path: &str,
        function: &AnnotatedFunction,
        alloc: &mut IndexAllocator,
    ) -> Result<CollectedFunction, NetSchemaError> {
        let with_peer = resolve_with_peer(&function.attributes);
        if with_peer && function.parameters.is_empty() {
            self.diagnose(
                Diagnostic::new(
                    DiagnosticKind::MissingPeerParameter,
                    scene,
                    "WithPeer is set but the function takes no peer parameter",
                )
                .at(node_path, &function.name),
            );
        }

        let skip = usize::from(with_peer);
        let arguments: Vec<WireTypeInfo> = function
            .parameters
            .iter()
            .skip(skip)
            .map(|param| {
                let member = format!("{}({})", function.name, param.name);
                self.classify_member(scene, node_path, &member, &param.ty, None)
            })
            .collect();

        Ok(CollectedFunction {
            node_path: node_path.to_string(),
            name: function.name.clone(),
            index: alloc.next_function(node_path, &function.name)?,
            arguments,
            with_peer,
        })
    }

    fn classify_member(
        &mut self,
        scene: &str,
        node_path: &str,
        member: &str,
        ty: &DeclaredType,
        subtype: Option<WireSubtype>,
    ) -> WireTypeInfo {
        let classification = classify(ty, subtype, &self.config.classifier);
        if !classification.recognized {
            self.diagnose(
                Diagnostic::new(
                    DiagnosticKind::UnrecognizedType,
                    scene,
                    format!("type `{ty}` has no wire mapping, registered as Nil"),
                )
                .at(node_path, member),
            );
        }
        classification.wire
    }

    /// First class in the ancestry of `type_name` implementing `interface`.
    fn find_serializer(&self, type_name: &str, interface: &str) -> Option<String> {
        self.provider
            .ancestry(type_name)
            .into_iter()
            .find(|class| class.implements(interface))
            .map(|class| class.name.clone())
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// Re-bases a non-network child's result under `at`, continuing the
/// parent's counters.
fn merge_child(
    data: &mut CollectedData,
    alloc: &mut IndexAllocator,
    scene: &str,
    child: &CollectedData,
    at: &str,
) -> Result<(), NetSchemaError> {
    for (_, child_path) in &child.static_network_nodes {
        add_static_node(data, alloc, scene, join_node_path(at, child_path))?;
    }

    for (child_path, properties) in &child.properties {
        let node_path = join_node_path(at, child_path);
        for property in properties.values() {
            let index = alloc.next_property(&node_path, &property.name)?;
            data.insert_property(CollectedProperty {
                node_path: node_path.clone(),
                index,
                ..property.clone()
            });
        }
    }

    for (child_path, functions) in &child.functions {
        let node_path = join_node_path(at, child_path);
        for function in functions.values() {
            let index = alloc.next_function(&node_path, &function.name)?;
            data.insert_function(CollectedFunction {
                node_path: node_path.clone(),
                index,
                ..function.clone()
            });
        }
    }

    Ok(())
}

/// Allocates a static id for `node_path`. Member maps are keyed by node path,
/// so two network nodes may never share one.
fn add_static_node(
    data: &mut CollectedData,
    alloc: &mut IndexAllocator,
    scene: &str,
    node_path: String,
) -> Result<(), NetSchemaError> {
    if data.has_static_node(&node_path) {
        return Err(NetSchemaError::DuplicateNodePath {
            scene: scene.to_string(),
            node_path,
        });
    }
    let id = alloc.next_static_node(&node_path)?;
    data.static_network_nodes.push((id, node_path));
    Ok(())
}
