//! Caller-owned run state for applying cleaning steps in any order.
//!
//! Each step is a pure function over the record set; the session only
//! threads records from one step to the next and keeps the reports.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::classify::classify;
use crate::links::{generate_links, LinkTemplate};
use crate::model::{DuplicateAnnotation, NormalizedKey, Record};
use crate::phones::{format_phones, PhoneStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Dedup,
    Links,
    Phones,
}

impl Step {
    /// Order used when every step runs.
    pub const ALL: [Step; 3] = [Step::Dedup, Step::Links, Step::Phones];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dedup" | "duplicates" => Some(Self::Dedup),
            "links" | "link" => Some(Self::Links),
            "phones" | "phone" => Some(Self::Phones),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dedup => write!(f, "dedup"),
            Self::Links => write!(f, "links"),
            Self::Phones => write!(f, "phones"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepReport {
    Dedup {
        exact_count: usize,
        removed: usize,
        partial_found: usize,
    },
    Links {
        generated: usize,
    },
    Phones(PhoneStats),
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dedup { exact_count, partial_found, .. } => write!(
                f,
                "✔ {exact_count} exact duplicates removed.\n⚠ {partial_found} partial duplicates found and marked."
            ),
            Self::Links { generated } => write!(f, "🔗 {generated} Instagram search links generated."),
            Self::Phones(stats) => write!(
                f,
                "✔ {} phone numbers formatted ({} left as is).",
                stats.formatted + stats.passed_through,
                stats.passed_through
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub records: usize,
    pub exact_count: usize,
    pub removed: usize,
    pub partial: usize,
    pub links_generated: usize,
    pub phones_formatted: usize,
    pub phones_passed_through: usize,
    pub steps: Vec<Step>,
}

pub struct Session {
    records: Vec<Record>,
    template: LinkTemplate,
    partial: Vec<DuplicateAnnotation>,
    reports: Vec<StepReport>,
}

impl Session {
    pub fn new(records: Vec<Record>, template: LinkTemplate) -> Self {
        Self {
            records,
            template,
            partial: Vec::new(),
            reports: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn partial(&self) -> &[DuplicateAnnotation] {
        &self.partial
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// True once any step has run; exporting before that is refused.
    pub fn has_run(&self) -> bool {
        !self.reports.is_empty()
    }

    pub fn apply(&mut self, step: Step) -> StepReport {
        let records = std::mem::take(&mut self.records);
        let report = match step {
            Step::Dedup => {
                let out = classify(records);
                let removed = out.removed();
                let partial_found = out.partial.len();
                self.absorb_partial(out.partial);
                self.records = out.records;
                StepReport::Dedup {
                    exact_count: out.exact_count,
                    removed,
                    partial_found,
                }
            }
            Step::Links => {
                let (records, generated) = generate_links(records, &self.template);
                self.records = records;
                StepReport::Links { generated }
            }
            Step::Phones => {
                let (records, stats) = format_phones(records);
                self.records = records;
                StepReport::Phones(stats)
            }
        };
        tracing::info!("{step}: {report:?}");
        self.reports.push(report.clone());
        report
    }

    pub fn run_all(&mut self) -> Vec<StepReport> {
        Step::ALL.iter().map(|&step| self.apply(step)).collect()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            records: self.records.len(),
            partial: self.partial.len(),
            ..Default::default()
        };
        for report in &self.reports {
            match report {
                StepReport::Dedup { exact_count, removed, .. } => {
                    summary.exact_count += exact_count;
                    summary.removed += removed;
                    summary.steps.push(Step::Dedup);
                }
                StepReport::Links { generated } => {
                    summary.links_generated += generated;
                    summary.steps.push(Step::Links);
                }
                StepReport::Phones(stats) => {
                    summary.phones_formatted += stats.formatted;
                    summary.phones_passed_through += stats.passed_through;
                    summary.steps.push(Step::Phones);
                }
            }
        }
        summary
    }

    pub fn into_parts(self) -> (Vec<Record>, Vec<DuplicateAnnotation>) {
        (self.records, self.partial)
    }

    // Annotations from repeated dedup runs accumulate; one per normalized key.
    fn absorb_partial(&mut self, found: Vec<DuplicateAnnotation>) {
        let mut known: HashSet<NormalizedKey> =
            self.partial.iter().map(DuplicateAnnotation::key).collect();
        for a in found {
            if known.insert(a.key()) {
                self.partial.push(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Ono Grindz", "8085551234"),
            Record::new("Ono Grindz", "(808) 555-1234"),
            Record::new("Ono Grindz", "808-555-9999"),
            Record::new("Da Kine", "808-555-0001"),
        ]
    }

    #[test]
    fn fresh_session_cannot_export() {
        let session = Session::new(sample(), LinkTemplate::default());
        assert!(!session.has_run());
        assert_eq!(session.records().len(), 4);
    }

    #[test]
    fn dedup_step_reports_counts() {
        let mut session = Session::new(sample(), LinkTemplate::default());
        let report = session.apply(Step::Dedup);
        assert_eq!(
            report,
            StepReport::Dedup { exact_count: 2, removed: 1, partial_found: 1 }
        );
        assert!(session.has_run());
        assert_eq!(session.records().len(), 3);
        assert_eq!(session.partial().len(), 1);
    }

    #[test]
    fn repeated_dedup_does_not_duplicate_annotations() {
        let mut session = Session::new(sample(), LinkTemplate::default());
        session.apply(Step::Dedup);
        // The surviving representative now shares only its name with row 2.
        let second = session.apply(Step::Dedup);
        assert_eq!(
            second,
            StepReport::Dedup { exact_count: 0, removed: 0, partial_found: 2 }
        );
        assert_eq!(session.partial().len(), 2);
    }

    #[test]
    fn reformatted_phones_do_not_duplicate_annotations() {
        let mut session = Session::new(
            vec![
                Record::new("Ono Grindz", "808-555-1234"),
                Record::new("Ono Grindz", "808-555-9876"),
            ],
            LinkTemplate::default(),
        );
        session.apply(Step::Dedup);
        session.apply(Step::Phones);
        let second = session.apply(Step::Dedup);
        assert_eq!(
            second,
            StepReport::Dedup { exact_count: 0, removed: 0, partial_found: 2 }
        );
        assert_eq!(session.partial().len(), 2);
        // The first-seen (raw) spelling is kept
        assert_eq!(session.partial()[0].phone, "808-555-1234");
        let keys: HashSet<NormalizedKey> = session.partial().iter().map(DuplicateAnnotation::key).collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn run_all_order_and_summary() {
        let mut session = Session::new(sample(), LinkTemplate::default());
        let reports = session.run_all();
        assert_eq!(reports.len(), 3);
        let summary = session.summary();
        assert_eq!(summary.steps, Step::ALL.to_vec());
        assert_eq!(summary.records, 3);
        assert_eq!(summary.exact_count, 2);
        assert_eq!(summary.links_generated, 3);
        assert_eq!(summary.phones_formatted, 3);
        assert!(session.records().iter().all(|r| r.link.is_some()));
        assert!(session.records().iter().all(|r| r.phone.starts_with("+1 808-555-")));
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = Session::new(sample(), LinkTemplate::default());
        let b = Session::new(sample(), LinkTemplate::default());
        a.apply(Step::Dedup);
        assert!(b.partial().is_empty());
        assert!(!b.has_run());
    }

    #[test]
    fn reports_serialize_with_step_tag() {
        let dedup = StepReport::Dedup { exact_count: 2, removed: 1, partial_found: 0 };
        assert_eq!(
            serde_json::to_value(&dedup).unwrap(),
            serde_json::json!({"step": "dedup", "exact_count": 2, "removed": 1, "partial_found": 0})
        );
        let phones = StepReport::Phones(PhoneStats { formatted: 3, passed_through: 1 });
        assert_eq!(
            serde_json::to_value(&phones).unwrap(),
            serde_json::json!({"step": "phones", "formatted": 3, "passed_through": 1})
        );
    }

    #[test]
    fn step_parsing() {
        assert_eq!(Step::parse("Dedup"), Some(Step::Dedup));
        assert_eq!(Step::parse(" phones "), Some(Step::Phones));
        assert_eq!(Step::parse("link"), Some(Step::Links));
        assert_eq!(Step::parse("bogus"), None);
    }
}
