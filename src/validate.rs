//! Advisory checks run before generation. Nothing here blocks output.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::content::SectionContent;
use crate::registry::SectionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingSection,
    ThinContent,
    MissingElement,
    UnsourcedMetrics,
    LargeDocument,
    ManyTables,
    LongSection,
}

/// A non-fatal advisory about content completeness or size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl ContentWarning {
    fn new(kind: WarningKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check required sections for presence, length and key elements.
pub fn validate_content(
    registry: &SectionRegistry,
    sections: &BTreeMap<String, SectionContent>,
) -> Vec<ContentWarning> {
    let mut warnings = Vec::new();

    for def in registry.required() {
        let Some(content) = sections.get(def.key) else {
            warnings.push(ContentWarning::new(
                WarningKind::MissingSection,
                format!("MISSING required section: {}", def.name),
            ));
            continue;
        };

        let text = content.full_text();
        let words = text.split_whitespace().count();
        if words < def.min_words {
            warnings.push(ContentWarning::new(
                WarningKind::ThinContent,
                format!(
                    "THIN CONTENT in '{}': {} words (minimum: {})",
                    def.name, words, def.min_words
                ),
            ));
        }

        let lower = text.to_lowercase();
        for element in def.key_elements {
            let hint = element.replace('_', " ");
            if !lower.contains(&hint) {
                warnings.push(ContentWarning::new(
                    WarningKind::MissingElement,
                    format!(
                        "POSSIBLY MISSING element '{}' in section '{}'",
                        element, def.name
                    ),
                ));
            }
        }
    }

    warnings
}

const BUSINESS_SECTIONS: [&str; 5] = [
    "executive_summary",
    "monetization_strategy",
    "economy_design",
    "competitive_analysis",
    "development_roadmap",
];

const SOURCE_MARKERS: [&str; 3] = ["[source:", "[assumption:", "[user-provided:"];

static NUMERIC_CLAIMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\$\d+[\d,.]*[BMK]",
        r"(?i)\d+[\d,.]*\s*(billion|million|thousand)",
        r"(?i)\b\d+%\s*(retention|conversion|churn|ARPU|ARPPU|DAU|MAU|CCU)",
        r"(?i)\bARPU\s*[$:]?\s*\$?\d+",
        r"(?i)\bARPPU\s*[$:]?\s*\$?\d+",
        r"(?i)\bD[17]\d*\s+retention\s+\d+",
        r"(?i)\bmarket\s+size\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Flag business sections that quote market numbers without a
/// `[Source: ...]` or `[Assumption: ...]` marker.
pub fn validate_data_sensibility(
    registry: &SectionRegistry,
    sections: &BTreeMap<String, SectionContent>,
) -> Vec<ContentWarning> {
    let mut warnings = Vec::new();

    for key in BUSINESS_SECTIONS {
        let Some(content) = sections.get(key) else {
            continue;
        };
        let text = content.full_text();
        if !NUMERIC_CLAIMS.iter().any(|re| re.is_match(&text)) {
            continue;
        }
        let lower = text.to_lowercase();
        if SOURCE_MARKERS.iter().any(|marker| lower.contains(marker)) {
            continue;
        }
        let name = registry.get(key).map_or(key, |def| def.name);
        warnings.push(ContentWarning::new(
            WarningKind::UnsourcedMetrics,
            format!(
                "UNSOURCED METRICS in '{name}': Contains numeric business claims without \
                 [Source: ...] or [Assumption: ...] markers. Add attribution before external use."
            ),
        ));
    }

    warnings
}

/// Rough size indicators for the whole document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeEstimate {
    pub total_words: usize,
    pub section_count: usize,
    pub table_count: usize,
    pub max_section_words: usize,
    pub max_section_key: String,
    pub warnings: Vec<ContentWarning>,
}

pub fn estimate_content_size(sections: &BTreeMap<String, SectionContent>) -> SizeEstimate {
    let mut estimate = SizeEstimate::default();

    for (key, content) in sections {
        let text = content.full_text();
        let words = text.split_whitespace().count();
        estimate.section_count += 1;
        estimate.total_words += words;
        estimate.table_count += text.matches("\n|").count();
        if words > estimate.max_section_words {
            estimate.max_section_words = words;
            estimate.max_section_key = key.clone();
        }
    }

    if estimate.total_words > 50_000 {
        estimate.warnings.push(ContentWarning::new(
            WarningKind::LargeDocument,
            format!(
                "LARGE DOCUMENT: {} words total. PDF rendering may be slow. \
                 Consider using DOCX-first workflow.",
                estimate.total_words
            ),
        ));
    }
    if estimate.table_count > 50 {
        estimate.warnings.push(ContentWarning::new(
            WarningKind::ManyTables,
            format!(
                "MANY TABLES: {} tables detected. PDF table layout may have formatting \
                 issues for wide tables.",
                estimate.table_count
            ),
        ));
    }
    if estimate.max_section_words > 8_000 {
        estimate.warnings.push(ContentWarning::new(
            WarningKind::LongSection,
            format!(
                "LONG SECTION: '{}' has {} words. Consider splitting into subsections \
                 for readability.",
                estimate.max_section_key, estimate.max_section_words
            ),
        ));
    }

    estimate
}

/// Run every check. Empty content (template runs) produces no warnings.
pub fn check_all(
    registry: &SectionRegistry,
    sections: &BTreeMap<String, SectionContent>,
) -> Vec<ContentWarning> {
    if sections.is_empty() {
        return Vec::new();
    }
    let mut warnings = validate_content(registry, sections);
    warnings.extend(validate_data_sensibility(registry, sections));
    warnings.extend(estimate_content_size(sections).warnings);
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(pairs: &[(&str, &str)]) -> BTreeMap<String, SectionContent> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SectionContent::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn missing_required_sections_are_reported() {
        let registry = SectionRegistry::standard();
        let warnings = validate_content(&registry, &sections(&[("appendices", "x")]));
        let missing = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::MissingSection)
            .count();
        assert_eq!(missing, 15);
    }

    #[test]
    fn thin_content_and_missing_elements() {
        let registry = SectionRegistry::standard();
        let warnings = validate_content(
            &registry,
            &sections(&[("appendices", "Glossary and revision history only.")]),
        );
        assert!(warnings.iter().any(|w| w.kind == WarningKind::ThinContent
            && w.message == "THIN CONTENT in 'Appendices': 5 words (minimum: 100)"));
        let missing: Vec<_> = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::MissingElement)
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(
            missing,
            vec!["POSSIBLY MISSING element 'open_questions_log' in section 'Appendices'"]
        );
    }

    #[test]
    fn unsourced_metrics_need_markers() {
        let registry = SectionRegistry::standard();
        let unsourced = sections(&[("executive_summary", "The market size is $15B.")]);
        let warnings = validate_data_sensibility(&registry, &unsourced);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("UNSOURCED METRICS in 'Executive Summary'"));

        let sourced = sections(&[(
            "executive_summary",
            "The market size is $15B [Source: Newzoo 2024].",
        )]);
        assert!(validate_data_sensibility(&registry, &sourced).is_empty());
    }

    #[test]
    fn non_business_sections_are_not_checked() {
        let registry = SectionRegistry::standard();
        let content = sections(&[("art_direction", "40% retention and a $2M budget")]);
        assert!(validate_data_sensibility(&registry, &content).is_empty());
    }

    #[test]
    fn size_estimate_counts_tables() {
        let estimate = estimate_content_size(&sections(&[
            ("a", "one two\n| h |\n| v |"),
            ("b", "three"),
        ]));
        assert_eq!(estimate.section_count, 2);
        assert_eq!(estimate.table_count, 2);
        assert_eq!(estimate.max_section_key, "a");
        assert!(estimate.warnings.is_empty());
    }

    #[test]
    fn long_section_warning() {
        let long = "word ".repeat(8_001);
        let estimate = estimate_content_size(&sections(&[("game_mechanics", &long)]));
        assert_eq!(estimate.warnings.len(), 1);
        assert_eq!(estimate.warnings[0].kind, WarningKind::LongSection);
    }

    #[test]
    fn empty_content_has_no_warnings() {
        assert!(check_all(&SectionRegistry::standard(), &BTreeMap::new()).is_empty());
    }
}
