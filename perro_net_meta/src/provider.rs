use perro_net_types::{DeclaredType, TypeKind};

use crate::{AttributeManifest, ClassManifest};

/// A network property as seen on a class, inherited members included.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedProperty {
    /// Class that declares the member.
    pub owner: String,
    pub name: String,
    pub ty: DeclaredType,
    pub attributes: Vec<AttributeManifest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedParameter {
    pub name: String,
    pub ty: DeclaredType,
}

/// A network function as seen on a class, inherited members included.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFunction {
    pub owner: String,
    pub name: String,
    pub parameters: Vec<AnnotatedParameter>,
    pub attributes: Vec<AttributeManifest>,
}

/// Members of a class carrying a given property/function attribute.
///
/// Order: the class's own members in declaration order, then each ancestor's
/// in turn (most derived first). A name already seen on a more derived class
/// shadows the inherited one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedMembers {
    pub properties: Vec<AnnotatedProperty>,
    pub functions: Vec<AnnotatedFunction>,
}

impl AnnotatedMembers {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.functions.is_empty()
    }
}

/// Source of class metadata. Implementors supply lookups; ancestry walking
/// and member flattening come for free.
pub trait MetadataProvider {
    /// Class by fully qualified name.
    fn class(&self, name: &str) -> Option<&ClassManifest>;

    /// Class declared in the script a scene node references.
    fn resolve_script(&self, script: &str) -> Option<&ClassManifest>;

    /// `name` followed by its base type names, up to the first type the
    /// provider does not know (which is still included).
    fn ancestry_names(&self, name: &str) -> Vec<String> {
        let mut names = vec![name.to_string()];
        let mut cursor = self.class(name);
        while let Some(class) = cursor {
            let Some(base) = class.base.as_deref() else {
                break;
            };
            if names.iter().any(|n| n == base) {
                log::warn!("class `{}` has a circular base chain at `{base}`", name);
                break;
            }
            names.push(base.to_string());
            cursor = self.class(base);
        }
        names
    }

    /// Known classes along the ancestry of `name`, most derived first.
    fn ancestry(&self, name: &str) -> Vec<&ClassManifest> {
        self.ancestry_names(name)
            .iter()
            .filter_map(|n| self.class(n))
            .collect()
    }

    fn is_subclass_of(&self, name: &str, base: &str) -> bool {
        self.ancestry_names(name).iter().any(|n| n == base)
    }

    fn type_kind(&self, name: &str) -> TypeKind {
        self.class(name.trim())
            .map(|c| c.kind)
            .unwrap_or(TypeKind::Unknown)
    }

    fn declared_type(&self, name: &str) -> DeclaredType {
        DeclaredType::new(name.trim(), self.type_kind(name))
    }

    /// Members of `class` (inherited ones included) tagged with
    /// `property_attribute` / `function_attribute`.
    fn annotated_members(
        &self,
        class: &str,
        property_attribute: &str,
        function_attribute: &str,
    ) -> AnnotatedMembers {
        let mut members = AnnotatedMembers::default();

        for owner in self.ancestry(class) {
            for property in &owner.properties {
                if !property.attributes.iter().any(|a| a.is(property_attribute)) {
                    continue;
                }
                if members.properties.iter().any(|p| p.name == property.name) {
                    log::debug!(
                        "property `{}.{}` shadowed by a derived class",
                        owner.name,
                        property.name
                    );
                    continue;
                }
                members.properties.push(AnnotatedProperty {
                    owner: owner.name.clone(),
                    name: property.name.clone(),
                    ty: self.declared_type(&property.ty),
                    attributes: property.attributes.clone(),
                });
            }

            for function in &owner.functions {
                if !function.attributes.iter().any(|a| a.is(function_attribute)) {
                    continue;
                }
                if members.functions.iter().any(|f| f.name == function.name) {
                    log::debug!(
                        "function `{}.{}` shadowed by a derived class",
                        owner.name,
                        function.name
                    );
                    continue;
                }
                members.functions.push(AnnotatedFunction {
                    owner: owner.name.clone(),
                    name: function.name.clone(),
                    parameters: function
                        .parameters
                        .iter()
                        .map(|p| AnnotatedParameter {
                            name: p.name.clone(),
                            ty: self.declared_type(&p.ty),
                        })
                        .collect(),
                    attributes: function.attributes.clone(),
                });
            }
        }

        members
    }

    /// Default initializer text of `field` on the attribute class `attribute`
    /// (looked up as `attribute` or `attributeAttribute`).
    fn attribute_field_literal(&self, attribute: &str, field: &str) -> Option<&str> {
        let class = self
            .class(attribute)
            .or_else(|| self.class(&format!("{attribute}Attribute")))?;
        class.field(field)?.default.as_deref()
    }
}
