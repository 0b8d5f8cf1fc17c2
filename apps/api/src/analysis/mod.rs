//! Analysis pipeline: prompt construction → resilient generation →
//! score extraction + section decomposition.

use serde::Serialize;

use crate::analysis::decompose::{decompose, section, Section, SECTION_UNAVAILABLE};
use crate::analysis::score::extract_score;
use crate::llm::templates::Template;
use crate::llm::{FallbackGenerator, GenerationError, ModelAttempt, TextModel};

pub mod decompose;
pub mod handlers;
pub mod prompt;
pub mod score;

/// Typed view of a compatibility reply. Derived deterministically from the
/// reply text; a missing marker degrades its field to the unavailable
/// placeholder. Construction never fails.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSections {
    pub score: u8,
    pub hard_skills: String,
    pub soft_skills: String,
    pub ats_checks: String,
    pub advice: String,
}

impl AnalysisSections {
    pub fn from_reply(text: &str) -> Self {
        let sections = decompose(text, Template::FullScanReport.markers());
        let field = |name: &str| {
            section(&sections, name)
                .map(|s| s.content.clone())
                .unwrap_or_else(|| SECTION_UNAVAILABLE.to_string())
        };
        Self {
            score: extract_score(text),
            hard_skills: field("hard_skills"),
            soft_skills: field("soft_skills"),
            ats_checks: field("ats_checks"),
            advice: field("advice"),
        }
    }
}

/// Everything the caller needs from one analysis run: the structured
/// sections, the raw reply for export, and which model produced it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub template: Template,
    pub score: u8,
    pub sections: Vec<Section>,
    pub full_text: String,
    pub model_used: String,
    pub attempts: Vec<ModelAttempt>,
}

/// Runs the full pipeline for one template against already-extracted texts.
pub async fn run_analysis(
    backend: &dyn TextModel,
    generator: &FallbackGenerator,
    template: Template,
    resume_text: Option<&str>,
    job_text: &str,
    char_budget: usize,
) -> Result<AnalysisReport, GenerationError> {
    let prompt = prompt::build_prompt(template, resume_text, job_text, char_budget);
    let result = generator.generate(backend, &prompt).await?;

    Ok(AnalysisReport {
        template,
        score: extract_score(&result.text),
        sections: decompose(&result.text, template.markers()),
        full_text: result.text,
        model_used: result.model_used,
        attempts: result.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::DEFAULT_SCORE;
    use crate::llm::{BackoffPolicy, ModelCallError};
    use async_trait::async_trait;

    struct CannedModel(&'static str);

    #[async_trait]
    impl TextModel for CannedModel {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, ModelCallError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_sections_from_complete_reply() {
        let reply = "SCORE: 72\nHABILIDADES DURAS: Kubernetes\nHABILIDADES BLANDAS: inglés\n\
                     CHEQUEO ATS: sin tablas\nCONSEJOS: cuantifica logros";
        let sections = AnalysisSections::from_reply(reply);
        assert_eq!(sections.score, 72);
        assert_eq!(sections.hard_skills, "Kubernetes");
        assert_eq!(sections.ats_checks, "sin tablas");
        assert_eq!(sections.advice, "cuantifica logros");
    }

    #[test]
    fn test_sections_from_unstructured_reply_degrade() {
        let sections = AnalysisSections::from_reply("the model ignored the format entirely");
        assert_eq!(sections.score, DEFAULT_SCORE);
        assert_eq!(sections.hard_skills, SECTION_UNAVAILABLE);
        assert_eq!(sections.advice, SECTION_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_run_analysis_wires_score_and_sections() {
        let backend = CannedModel("SCORE: 83\nHABILIDADES DURAS: Python, SQL\nCONSEJOS: métricas");
        let generator =
            FallbackGenerator::new(vec!["m1".to_string()], BackoffPolicy::default());

        let report = run_analysis(
            &backend,
            &generator,
            Template::AtsGapAnalysis,
            Some("cv"),
            "oferta",
            1000,
        )
        .await
        .unwrap();

        assert_eq!(report.score, 83);
        assert_eq!(report.model_used, "m1");
        assert_eq!(
            section(&report.sections, "hard_skills").unwrap().content,
            "Python, SQL"
        );
    }
}
