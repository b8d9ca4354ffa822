use std::sync::Arc;

use async_recursion::async_recursion;
use serde::Serialize;
use tracing::{debug, info};

use crate::model::{LearningNode, Lenient, ResourceBundle, ResourceRef, ResourceSlot};
use crate::resolver::ResourceResolver;

/// Word appended to book titles before searching.
pub const DEFAULT_BOOK_QUALIFIER: &str = "libro";

/// Counters collected during one walk of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub nodes_visited: usize,
    pub lookups: usize,
    pub verified: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Main,
    Book,
    Course,
}

impl SlotKind {
    fn label(self) -> &'static str {
        match self {
            SlotKind::Main => "recurso_principal",
            SlotKind::Book => "libro_recomendado",
            SlotKind::Course => "curso_profundizacion",
        }
    }
}

/// Replaces suggested resources with verified links, depth first.
///
/// Slots are resolved one at a time in document order: main resource, book,
/// course, then the children of the node. A slot that cannot be verified is
/// removed. Nothing here fails; the whole tree is always walked.
#[derive(Clone)]
pub struct TreeEnricher {
    resolver: Arc<dyn ResourceResolver>,
    book_qualifier: String,
}

impl TreeEnricher {
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self {
            resolver,
            book_qualifier: DEFAULT_BOOK_QUALIFIER.to_string(),
        }
    }

    pub fn with_book_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.book_qualifier = qualifier.into();
        self
    }

    pub fn book_qualifier(&self) -> &str {
        &self.book_qualifier
    }

    pub async fn enrich(&self, node: &mut Lenient<LearningNode>) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        self.walk(node, &mut report).await;
        info!(
            nodes = report.nodes_visited,
            lookups = report.lookups,
            verified = report.verified,
            dropped = report.dropped,
            "learning path enriched"
        );
        report
    }

    #[async_recursion]
    async fn walk(&self, node: &mut Lenient<LearningNode>, report: &mut EnrichmentReport) {
        let Some(node) = node.as_typed_mut() else {
            debug!(target: "enrich", "skipping non-object node");
            return;
        };
        report.nodes_visited += 1;

        if let Some(bundle) = node.resources.as_mut().and_then(Lenient::as_typed_mut) {
            self.enrich_bundle(bundle, report).await;
        }

        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                self.walk(child, report).await;
            }
        }
    }

    async fn enrich_bundle(&self, bundle: &mut ResourceBundle, report: &mut EnrichmentReport) {
        if let Some(slot) = bundle.main_resource.take() {
            bundle.main_resource = self.resolve_slot(SlotKind::Main, slot, report).await;
        }
        if let Some(slot) = bundle.recommended_book.take() {
            bundle.recommended_book = self.resolve_slot(SlotKind::Book, slot, report).await;
        }
        if let Some(slot) = bundle.deep_dive_course.take() {
            bundle.deep_dive_course = self.resolve_slot(SlotKind::Course, slot, report).await;
        }
    }

    async fn resolve_slot(
        &self,
        kind: SlotKind,
        slot: ResourceSlot,
        report: &mut EnrichmentReport,
    ) -> Option<ResourceSlot> {
        let Some(title) = slot.title().map(str::to_string) else {
            debug!(target: "enrich", slot = kind.label(), "dropping slot without a title");
            report.dropped += 1;
            return None;
        };

        let query = self.query_for(kind, &title);
        report.lookups += 1;
        let hit = self
            .resolver
            .resolve(&query)
            .await
            .filter(|hit| !hit.url.trim().is_empty());

        let Some(hit) = hit else {
            debug!(target: "enrich", slot = kind.label(), %query, "resource not verified; removing");
            report.dropped += 1;
            return None;
        };

        report.verified += 1;
        let title = match kind {
            SlotKind::Main if !hit.title.trim().is_empty() => hit.title,
            _ => title,
        };
        Some(ResourceSlot::Verified(ResourceRef::new(title, hit.url)))
    }

    fn query_for(&self, kind: SlotKind, title: &str) -> String {
        let title = title.trim();
        let qualifier = self.book_qualifier.trim();
        match kind {
            SlotKind::Book if !qualifier.is_empty() => format!("{title} {qualifier}"),
            _ => title.to_string(),
        }
    }
}
