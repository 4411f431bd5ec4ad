use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Theme or image extraction partially failed.
    ExtractionDegraded,
    /// One content field could not be written on one slide.
    BindingFieldFailed,
    /// A template slide could not be cloned and a layout-default slide stands in.
    CloneFailed,
}

/// A non-fatal problem met during analysis or synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Generated (or, during analysis, template) slide the problem belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_index: Option<usize>,
    /// Field or component, e.g. `title`, `notes`, `image`, `theme`.
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, slide_index: Option<usize>, field: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            slide_index,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub slides_generated: usize,
    /// Template slide index each generated slide was cloned from; `None` for
    /// slides created straight from a layout.
    pub source_slides: Vec<Option<usize>>,
    pub template_slides_removed: usize,
    pub parts_pruned: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SynthesisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_json_uses_snake_case_kinds() {
        let mut report = SynthesisReport::new();
        report.slides_generated = 3;
        report.source_slides = vec![Some(0), Some(1), Some(0)];
        report.diagnostics.push(Diagnostic::new(
            DiagnosticKind::BindingFieldFailed,
            Some(2),
            "notes",
            "no shape tree",
        ));

        let json = report.to_json();
        assert!(json.contains("\"binding_field_failed\""));
        assert!(json.contains("\"slide_index\": 2"));
        assert!(!report.is_clean());
        assert_eq!(report.diagnostics_of(DiagnosticKind::CloneFailed).count(), 0);
    }
}
