use std::sync::Arc;

use tracing::{info, warn};

use crate::enrich::{EnrichmentReport, TreeEnricher};
use crate::errors::PathError;
use crate::extract::parse_learning_path;
use crate::generator::PathGenerator;
use crate::model::LearningPath;
use crate::prompt::PromptBuilder;

/// Result of one end-to-end generation.
#[derive(Debug, Clone)]
pub struct PathOutcome {
    pub path: LearningPath,
    pub report: EnrichmentReport,
}

/// Drives one request: prompt, generate, parse, enrich.
///
/// Anything that fails before enrichment is fatal for the request. Enrichment
/// itself never fails.
#[derive(Clone)]
pub struct PathService {
    generator: Arc<dyn PathGenerator>,
    enricher: TreeEnricher,
    prompt: PromptBuilder,
}

impl PathService {
    pub fn new(generator: Arc<dyn PathGenerator>, enricher: TreeEnricher) -> Self {
        Self {
            generator,
            enricher,
            prompt: PromptBuilder::new(),
        }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Generate the raw, unenriched document.
    pub async fn draft_path(&self, goal: &str, level: &str) -> Result<LearningPath, PathError> {
        let (goal, level) = validate_input(goal, level)?;
        let prompt = self.prompt.build(goal, level);
        let raw = self.generator.generate(&prompt).await?;
        parse_learning_path(&raw).map_err(|err| {
            warn!(
                generator = self.generator.name(),
                %err,
                output_len = raw.len(),
                "generator output rejected"
            );
            err
        })
    }

    pub async fn generate_path(&self, goal: &str, level: &str) -> Result<PathOutcome, PathError> {
        let mut path = self.draft_path(goal, level).await?;
        info!(
            generator = self.generator.name(),
            nodes = path.node_count(),
            "learning path drafted"
        );
        let report = self.enricher.enrich(&mut path.root).await;
        Ok(PathOutcome { path, report })
    }
}

fn validate_input<'a>(goal: &'a str, level: &'a str) -> Result<(&'a str, &'a str), PathError> {
    let goal = goal.trim();
    let level = level.trim();
    if goal.is_empty() || level.is_empty() {
        return Err(PathError::MissingInput);
    }
    Ok((goal, level))
}
