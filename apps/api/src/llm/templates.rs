//! Prompt templates and their declared section markers.
//!
//! The marker list each template declares is the contract the response
//! decomposer relies on. Prompt wording and marker set live here together and
//! are versioned together: a template change that touches its output format
//! must update its `markers()` in the same commit.

use serde::{Deserialize, Serialize};

/// A literal label the model is instructed to emit, used as a split point
/// during response decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Section name in API responses.
    pub name: &'static str,
    /// Exact label text the template asks the model to emit.
    pub label: &'static str,
}

pub const SCORE: Marker = Marker {
    name: "score",
    label: "SCORE:",
};
pub const HARD_SKILLS: Marker = Marker {
    name: "hard_skills",
    label: "HABILIDADES DURAS:",
};
pub const SOFT_SKILLS: Marker = Marker {
    name: "soft_skills",
    label: "HABILIDADES BLANDAS:",
};
pub const ATS_CHECKS: Marker = Marker {
    name: "ats_checks",
    label: "CHEQUEO ATS:",
};
pub const ADVICE: Marker = Marker {
    name: "advice",
    label: "CONSEJOS:",
};
pub const TECHNICAL_QUESTIONS: Marker = Marker {
    name: "technical_questions",
    label: "PREGUNTAS TÉCNICAS:",
};
pub const SITUATIONAL_QUESTIONS: Marker = Marker {
    name: "situational_questions",
    label: "PREGUNTAS SITUACIONALES:",
};
pub const TRAP_QUESTION: Marker = Marker {
    name: "trap_question",
    label: "PREGUNTA TRAMPA:",
};

/// Closed set of generation tasks. Each carries a fixed instruction skeleton
/// and the ordered markers its output is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    AtsGapAnalysis,
    InterviewQuestions,
    FullScanReport,
    SingleInterviewQuestion,
}

impl Template {
    pub fn id(self) -> &'static str {
        match self {
            Template::AtsGapAnalysis => "ats_gap_analysis",
            Template::InterviewQuestions => "interview_questions",
            Template::FullScanReport => "full_scan_report",
            Template::SingleInterviewQuestion => "single_interview_question",
        }
    }

    /// Ordered markers the decomposer splits this template's reply on.
    pub fn markers(self) -> &'static [Marker] {
        match self {
            Template::AtsGapAnalysis => &[SCORE, HARD_SKILLS, ADVICE],
            Template::InterviewQuestions => &[
                TECHNICAL_QUESTIONS,
                SITUATIONAL_QUESTIONS,
                TRAP_QUESTION,
            ],
            Template::FullScanReport => &[SCORE, HARD_SKILLS, SOFT_SKILLS, ATS_CHECKS, ADVICE],
            // The whole reply is the question; nothing to split.
            Template::SingleInterviewQuestion => &[],
        }
    }

    /// Whether the template interpolates the candidate's résumé text.
    /// Interview templates work from the job posting alone.
    pub fn needs_resume(self) -> bool {
        matches!(self, Template::AtsGapAnalysis | Template::FullScanReport)
    }

    /// Instruction skeleton. `{oferta}` and (where applicable) `{candidato}`
    /// are replaced with budget-truncated input text.
    pub fn skeleton(self) -> &'static str {
        match self {
            Template::AtsGapAnalysis => ATS_GAP_ANALYSIS_SKELETON,
            Template::InterviewQuestions => INTERVIEW_QUESTIONS_SKELETON,
            Template::FullScanReport => FULL_SCAN_REPORT_SKELETON,
            Template::SingleInterviewQuestion => SINGLE_QUESTION_SKELETON,
        }
    }
}

const ATS_GAP_ANALYSIS_SKELETON: &str = r#"Actúa como un reclutador experto. Analiza:
OFERTA: "{oferta}"
CANDIDATO: "{candidato}"

Dame un reporte en Markdown con EXACTAMENTE estas secciones, usando estas etiquetas literales:
SCORE: <número entero de 0 a 100 de compatibilidad>
HABILIDADES DURAS: <habilidades técnicas que faltan en el CV para esta oferta>
CONSEJOS: <cómo mejorar el CV para ESTA oferta específica>"#;

const FULL_SCAN_REPORT_SKELETON: &str = r#"Actúa como un reclutador experto y un sistema ATS. Analiza:
OFERTA: "{oferta}"
CANDIDATO: "{candidato}"

Dame un reporte en Markdown con EXACTAMENTE estas secciones, en este orden, usando estas etiquetas literales:
SCORE: <número entero de 0 a 100 de compatibilidad>
HABILIDADES DURAS: <habilidades técnicas de la oferta que faltan en el CV>
HABILIDADES BLANDAS: <habilidades blandas de la oferta que faltan en el CV>
CHEQUEO ATS: <problemas de formato del CV que confundirían a un sistema ATS>
CONSEJOS: <cómo mejorar el CV para ESTA oferta específica>"#;

const INTERVIEW_QUESTIONS_SKELETON: &str = r#"Actúa como el Gerente de Contratación para este puesto.

Basado ÚNICAMENTE en esta descripción de empleo:
"{oferta}"

Genera una guía de preparación con EXACTAMENTE estas secciones, usando estas etiquetas literales:
PREGUNTAS TÉCNICAS: <3 preguntas técnicas difíciles sobre las herramientas mencionadas en la oferta, cada una con un "Tip Pro" de qué quieres escuchar en la respuesta>
PREGUNTAS SITUACIONALES: <2 preguntas tipo "Cuéntame de una vez que...", cada una con su "Tip Pro">
PREGUNTA TRAMPA: <1 pregunta para evaluar honestidad o manejo de estrés, con su "Tip Pro">"#;

const SINGLE_QUESTION_SKELETON: &str = r#"Actúa como el Gerente de Contratación para este puesto.

Basado ÚNICAMENTE en esta descripción de empleo:
"{oferta}"

Hazme UNA sola pregunta de entrevista difícil y específica para este puesto.
Responde solo con la pregunta, sin introducción ni numeración."#;
