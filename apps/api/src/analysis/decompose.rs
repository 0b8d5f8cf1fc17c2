//! Response Decomposer — splits a markdown reply into the sections its
//! template declared.
//!
//! Best effort, not a grammar: the only thing verified is the presence of
//! the literal marker labels. A missing marker degrades that one section to
//! a placeholder and never aborts the rest. Decomposition cannot fail.

use serde::Serialize;

use crate::llm::templates::Marker;

/// Shown for a section whose marker the model did not emit.
pub const SECTION_UNAVAILABLE: &str = "No disponible. Revisa el reporte completo.";

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: &'static str,
    pub content: String,
    pub found: bool,
}

/// Splits `text` on the declared markers, in declared order.
///
/// Each found marker's content runs from the end of its first occurrence to
/// the first occurrence (after it) of the next declared marker that is
/// present; the last found marker runs to end-of-text.
pub fn decompose(text: &str, markers: &[Marker]) -> Vec<Section> {
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| match text.find(marker.label) {
            Some(pos) => {
                let start = pos + marker.label.len();
                let end = markers[i + 1..]
                    .iter()
                    .find_map(|next| {
                        text[start..].find(next.label).map(|rel| start + rel)
                    })
                    .unwrap_or(text.len());
                Section {
                    name: marker.name,
                    content: text[start..end].trim().to_string(),
                    found: true,
                }
            }
            None => Section {
                name: marker.name,
                content: SECTION_UNAVAILABLE.to_string(),
                found: false,
            },
        })
        .collect()
}

/// Convenience lookup over a decomposed reply.
pub fn section<'a>(sections: &'a [Section], name: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::templates::Template;

    const FULL_REPLY: &str = "Aquí está tu reporte.\n\
        SCORE: 83\n\
        HABILIDADES DURAS: Python, SQL\n\
        HABILIDADES BLANDAS: liderazgo\n\
        CHEQUEO ATS: ok\n\
        CONSEJOS: add metrics";

    // Same reply with the ATS marker (and soft skills) absent entirely.
    const REPLY_MISSING_ATS: &str = "SCORE: 83\n\
        HABILIDADES DURAS: Python, SQL\n\
        CONSEJOS: add metrics";

    #[test]
    fn test_full_reply_splits_into_all_sections() {
        let sections = decompose(FULL_REPLY, Template::FullScanReport.markers());

        assert_eq!(section(&sections, "hard_skills").unwrap().content, "Python, SQL");
        assert_eq!(section(&sections, "soft_skills").unwrap().content, "liderazgo");
        assert_eq!(section(&sections, "ats_checks").unwrap().content, "ok");
        assert_eq!(section(&sections, "advice").unwrap().content, "add metrics");
    }

    #[test]
    fn test_section_excludes_following_section_content() {
        let sections = decompose(FULL_REPLY, Template::FullScanReport.markers());
        let hard = section(&sections, "hard_skills").unwrap();
        assert!(!hard.content.contains("ok"));
        assert!(!hard.content.contains("CHEQUEO"));
    }

    #[test]
    fn test_missing_marker_degrades_only_that_section() {
        let sections = decompose(REPLY_MISSING_ATS, Template::FullScanReport.markers());

        let ats = section(&sections, "ats_checks").unwrap();
        assert!(!ats.found);
        assert_eq!(ats.content, SECTION_UNAVAILABLE);

        let soft = section(&sections, "soft_skills").unwrap();
        assert!(!soft.found);

        // Neighbors still extract correctly across the gap.
        assert_eq!(section(&sections, "hard_skills").unwrap().content, "Python, SQL");
        assert_eq!(section(&sections, "advice").unwrap().content, "add metrics");
    }

    #[test]
    fn test_last_found_marker_runs_to_end_of_text() {
        let sections = decompose(
            "SCORE: 10\nCONSEJOS: keep\ngoing\nto the end",
            Template::AtsGapAnalysis.markers(),
        );
        assert_eq!(
            section(&sections, "advice").unwrap().content,
            "keep\ngoing\nto the end"
        );
    }

    #[test]
    fn test_empty_text_degrades_every_section() {
        let sections = decompose("", Template::FullScanReport.markers());
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|s| !s.found));
        assert!(sections.iter().all(|s| s.content == SECTION_UNAVAILABLE));
    }

    #[test]
    fn test_no_markers_yields_no_sections() {
        let sections = decompose("any text", Template::SingleInterviewQuestion.markers());
        assert!(sections.is_empty());
    }
}
