//! Learning path document model.
//!
//! Field names on the wire follow the generator contract (`nodo_raiz`,
//! `titulo`, `sub_nodos`, ...). Unknown keys are kept in `extra` so a
//! document round-trips without losing whatever else the model emitted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A value that is either the expected shape or raw JSON that failed to match it.
///
/// Model output is untrusted; a single malformed node must not reject the
/// whole document, so it is carried through untouched instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Typed(T),
    Untyped(Value),
}

impl<T> Lenient<T> {
    pub fn as_typed(&self) -> Option<&T> {
        match self {
            Lenient::Typed(value) => Some(value),
            Lenient::Untyped(_) => None,
        }
    }

    pub fn as_typed_mut(&mut self) -> Option<&mut T> {
        match self {
            Lenient::Typed(value) => Some(value),
            Lenient::Untyped(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Lenient::Typed(_))
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Typed(value)
    }
}

/// Top-level document returned by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    #[serde(rename = "nodo_raiz")]
    pub root: Lenient<LearningNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LearningPath {
    pub fn new(root: LearningNode) -> Self {
        Self {
            root: Lenient::Typed(root),
            extra: Map::new(),
        }
    }

    /// Number of well-formed nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        count_nodes(&self.root)
    }
}

fn count_nodes(node: &Lenient<LearningNode>) -> usize {
    match node.as_typed() {
        Some(node) => 1 + node.children().iter().map(count_nodes).sum::<usize>(),
        None => 0,
    }
}

/// One node of the learning tree. Hub nodes only group children; step nodes
/// carry a description and a resource bundle.
///
/// Every field is tolerant of the wrong JSON type, so any object parses as a
/// node and still gets walked. Mistyped values are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningNode {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Lenient<String>>,
    #[serde(rename = "es_hub", default, skip_serializing_if = "Option::is_none")]
    pub is_hub: Option<Lenient<bool>>,
    #[serde(
        rename = "descripcion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Lenient<String>>,
    #[serde(rename = "recursos", default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Lenient<ResourceBundle>>,
    #[serde(rename = "sub_nodos", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Lenient<Vec<Lenient<LearningNode>>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LearningNode {
    pub fn hub(title: impl Into<String>) -> Self {
        Self {
            title: Some(Lenient::Typed(title.into())),
            is_hub: Some(Lenient::Typed(true)),
            ..Self::default()
        }
    }

    pub fn step(title: impl Into<String>, resources: ResourceBundle) -> Self {
        Self {
            title: Some(Lenient::Typed(title.into())),
            is_hub: Some(Lenient::Typed(false)),
            resources: Some(Lenient::Typed(resources)),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Lenient::Typed(description.into()));
        self
    }

    pub fn with_child(mut self, child: LearningNode) -> Self {
        match self.children.as_mut().and_then(Lenient::as_typed_mut) {
            Some(children) => children.push(Lenient::Typed(child)),
            None => self.children = Some(Lenient::Typed(vec![Lenient::Typed(child)])),
        }
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title
            .as_ref()
            .and_then(Lenient::as_typed)
            .map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(Lenient::as_typed)
            .map(String::as_str)
    }

    /// Only a literal `true` marks a hub.
    pub fn is_hub(&self) -> bool {
        matches!(self.is_hub, Some(Lenient::Typed(true)))
    }

    /// Children when `sub_nodos` is a list; empty otherwise.
    pub fn children(&self) -> &[Lenient<LearningNode>] {
        self.children
            .as_ref()
            .and_then(Lenient::as_typed)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Lenient<LearningNode>>> {
        self.children.as_mut().and_then(Lenient::as_typed_mut)
    }

    pub fn bundle(&self) -> Option<&ResourceBundle> {
        self.resources.as_ref().and_then(Lenient::as_typed)
    }
}

/// Resource slots attached to a step node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceBundle {
    #[serde(
        rename = "recurso_principal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub main_resource: Option<ResourceSlot>,
    #[serde(
        rename = "libro_recomendado",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_book: Option<ResourceSlot>,
    #[serde(
        rename = "curso_profundizacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub deep_dive_course: Option<ResourceSlot>,
    /// Free text exercise; never looked up.
    #[serde(
        rename = "desafio_practico",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub practical_challenge: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State of a single resource slot.
///
/// Before enrichment a slot holds whatever the model suggested; afterwards it
/// is either `Verified` or removed from the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceSlot {
    Verified(ResourceRef),
    Suggested(SuggestedResource),
    Named(String),
    Other(Value),
}

impl ResourceSlot {
    pub fn suggested(title: impl Into<String>) -> Self {
        ResourceSlot::Suggested(SuggestedResource {
            title: Some(title.into()),
            extra: Map::new(),
        })
    }

    pub fn named(title: impl Into<String>) -> Self {
        ResourceSlot::Named(title.into())
    }

    /// The human readable title a lookup should start from, if any.
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            ResourceSlot::Verified(reference) => Some(reference.title.as_str()),
            ResourceSlot::Suggested(suggested) => suggested.title.as_deref(),
            ResourceSlot::Named(name) => Some(name.as_str()),
            ResourceSlot::Other(_) => None,
        };
        title.filter(|text| !text.trim().is_empty())
    }

    pub fn as_verified(&self) -> Option<&ResourceRef> {
        match self {
            ResourceSlot::Verified(reference) => Some(reference),
            _ => None,
        }
    }
}

/// Object form of a suggestion (`{"titulo": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedResource {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A resource backed by a real search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "titulo")]
    pub title: String,
    pub url: String,
}

impl ResourceRef {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}
