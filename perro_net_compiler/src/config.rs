use perro_net_types::ClassifierConfig;

pub const DEFAULT_BASE_TYPE: &str = "NetworkNode3D";
pub const DEFAULT_IDENTITY_PROPERTY: &str = "NetworkId";
pub const DEFAULT_NETWORK_SERIALIZER: &str = "INetworkSerializable";
pub const DEFAULT_BSON_SERIALIZER: &str = "IBsonSerializable";

/// Names the compiler treats specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// A descriptor whose root script derives from this type is a network scene.
    pub network_base_type: String,
    /// Property kept only on a descriptor's root node.
    pub identity_property: String,
    pub classifier: ClassifierConfig,
    pub network_serializer_interface: String,
    pub bson_serializer_interface: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            network_base_type: DEFAULT_BASE_TYPE.to_string(),
            identity_property: DEFAULT_IDENTITY_PROPERTY.to_string(),
            classifier: ClassifierConfig::default(),
            network_serializer_interface: DEFAULT_NETWORK_SERIALIZER.to_string(),
            bson_serializer_interface: DEFAULT_BSON_SERIALIZER.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Sets the network base type, which is also the type the classifier
    /// tags as a node back-reference.
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        let base_type = base_type.into();
        self.classifier.network_node_type = base_type.clone();
        self.network_base_type = base_type;
        self
    }
}
