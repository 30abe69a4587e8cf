use std::collections::{HashMap, HashSet};

use crate::model::{Classification, DuplicateAnnotation, ExactGroup, NormalizedKey, Record};
use crate::normalize::{normalize_name, normalize_phone};

/// Split a record set into exact duplicates, partial duplicates and survivors.
///
/// Exact duplicates share both normalized name and phone; only the first of
/// each group survives. Partial duplicates share exactly one of the two and
/// are annotated, not removed. A key that is part of an exact group is never
/// reported as partial.
pub fn classify(records: Vec<Record>) -> Classification {
    let keys: Vec<NormalizedKey> = records.iter().map(NormalizedKey::of).collect();

    // Full-key groups, in order of first appearance
    let mut group_index: HashMap<&NormalizedKey, usize> = HashMap::new();
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        match group_index.get(key) {
            Some(&gi) => groups[gi].1.push(row),
            None => {
                group_index.insert(key, groups.len());
                groups.push((row, vec![row]));
            }
        }
    }

    let mut exact_keys: HashSet<&NormalizedKey> = HashSet::new();
    let mut exact_groups = Vec::new();
    let mut exact_count = 0;
    for (first, rows) in &groups {
        if rows.len() < 2 {
            continue;
        }
        exact_keys.insert(&keys[*first]);
        exact_count += rows.len();
        exact_groups.push(ExactGroup {
            name: records[*first].name.clone(),
            phone: records[*first].phone.clone(),
            rows: rows.clone(),
        });
    }

    // Single-field groups
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    let mut phone_counts: HashMap<&str, usize> = HashMap::new();
    for key in &keys {
        *name_counts.entry(key.name.as_str()).or_insert(0) += 1;
        *phone_counts.entry(key.phone.as_str()).or_insert(0) += 1;
    }

    // Name-group members first, then phone-group members, each in row order
    let name_dups = keys.iter().enumerate().filter(|(_, k)| name_counts[k.name.as_str()] >= 2);
    let phone_dups = keys.iter().enumerate().filter(|(_, k)| phone_counts[k.phone.as_str()] >= 2);

    let mut seen: HashSet<&NormalizedKey> = HashSet::new();
    let mut partial = Vec::new();
    for (row, key) in name_dups.chain(phone_dups) {
        if exact_keys.contains(key) || !seen.insert(key) {
            continue;
        }
        partial.push(DuplicateAnnotation {
            name: records[row].name.clone(),
            phone: records[row].phone.clone(),
        });
    }

    let survivors: HashSet<usize> = groups.iter().map(|(first, _)| *first).collect();
    let total = records.len();
    let deduplicated: Vec<Record> = records
        .into_iter()
        .enumerate()
        .filter(|(row, _)| survivors.contains(row))
        .map(|(_, r)| r)
        .collect();

    tracing::debug!(
        "classified {total} records: {} exact groups ({exact_count} records), {} partial",
        exact_groups.len(),
        partial.len(),
    );

    Classification {
        records: deduplicated,
        exact_count,
        partial,
        exact_groups,
    }
}

/// Lookup of annotated names and phones, compared in normalized form.
///
/// A record is marked when its name or its phone matches any annotation,
/// which also holds after the phone column has been reformatted.
#[derive(Debug, Clone, Default)]
pub struct PartialMarks {
    names: HashSet<String>,
    phones: HashSet<String>,
}

impl PartialMarks {
    pub fn from_annotations(annotations: &[DuplicateAnnotation]) -> Self {
        Self {
            names: annotations.iter().map(|a| normalize_name(&a.name)).collect(),
            phones: annotations.iter().map(|a| normalize_phone(&a.phone)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.phones.is_empty()
    }

    pub fn is_marked(&self, record: &Record) -> bool {
        if self.is_empty() {
            return false;
        }
        self.names.contains(&normalize_name(&record.name))
            || self.phones.contains(&normalize_phone(&record.phone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, phone: &str) -> Record {
        Record::new(name, phone)
    }

    #[test]
    fn empty_input() {
        let out = classify(Vec::new());
        assert!(out.records.is_empty());
        assert_eq!(out.exact_count, 0);
        assert!(out.partial.is_empty());
        assert!(out.exact_groups.is_empty());
    }

    #[test]
    fn curly_apostrophe_is_exact_duplicate() {
        let out = classify(vec![
            rec("Joe's Diner", "808-555-1234"),
            rec("Joe\u{2019}s Diner", "808-555-1234"),
        ]);
        assert_eq!(out.exact_count, 2);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "Joe's Diner");
        assert!(out.partial.is_empty());
        assert_eq!(out.removed(), 1);
    }

    #[test]
    fn phone_formatting_is_exact_duplicate() {
        let out = classify(vec![
            rec("Ono Grindz", "8085551234"),
            rec("Ono Grindz", "(808) 555-1234"),
        ]);
        assert_eq!(out.exact_count, 2);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].phone, "8085551234");
    }

    #[test]
    fn same_name_different_phone_is_partial() {
        let out = classify(vec![
            rec("Ono Grindz", "808-555-1234"),
            rec("Ono Grindz", "808-555-9876"),
        ]);
        assert_eq!(out.exact_count, 0);
        assert_eq!(out.records.len(), 2);
        assert_eq!(
            out.partial,
            vec![
                DuplicateAnnotation { name: "Ono Grindz".into(), phone: "808-555-1234".into() },
                DuplicateAnnotation { name: "Ono Grindz".into(), phone: "808-555-9876".into() },
            ]
        );
    }

    #[test]
    fn unique_record_untouched() {
        let out = classify(vec![rec("Ono Grindz", "808-555-1234"), rec("Da Kine", "808-555-9876")]);
        assert_eq!(out.exact_count, 0);
        assert!(out.partial.is_empty());
        assert_eq!(out.records[0], rec("Ono Grindz", "808-555-1234"));
    }

    #[test]
    fn unparseable_phone_still_matches_literally() {
        let out = classify(vec![rec("Da Kine", "not-a-number"), rec("da kine", " not-a-number")]);
        assert_eq!(out.exact_count, 2);
        assert_eq!(out.records.len(), 1);
    }

    #[test]
    fn exact_takes_precedence_over_partial() {
        // Rows 0 and 1 are exact; row 2 shares only the name.
        let out = classify(vec![
            rec("Poke Bar", "808-555-1234"),
            rec("POKE BAR", "8085551234"),
            rec("Poke Bar", "808-555-0000"),
        ]);
        assert_eq!(out.exact_count, 2);
        assert_eq!(out.exact_groups.len(), 1);
        assert_eq!(out.exact_groups[0].rows, vec![0, 1]);
        assert_eq!(
            out.partial,
            vec![DuplicateAnnotation { name: "Poke Bar".into(), phone: "808-555-0000".into() }]
        );
    }

    #[test]
    fn name_candidates_precede_phone_candidates() {
        let out = classify(vec![
            rec("Alpha", "808-555-1111"),
            rec("Beta", "808-555-2222"),
            rec("Gamma", "808-555-1111"),
            rec("Beta", "808-555-3333"),
        ]);
        let names: Vec<&str> = out.partial.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Beta", "Alpha", "Gamma"]);
    }

    #[test]
    fn exact_count_includes_representative() {
        let out = classify(vec![
            rec("A", "808-555-1111"),
            rec("A", "808-555-1111"),
            rec("A", "808-555-1111"),
            rec("B", "808-555-2222"),
            rec("B", "808-555-2222"),
        ]);
        assert_eq!(out.exact_count, 5);
        assert_eq!(out.exact_groups.len(), 2);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.removed(), 3);
    }

    #[test]
    fn survivors_keep_first_occurrence_order() {
        let out = classify(vec![
            rec("C", "808-555-3333"),
            rec("A", "808-555-1111"),
            rec("C", "808-555-3333"),
            rec("B", "808-555-2222"),
        ]);
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn marks_match_by_name_or_phone() {
        let marks = PartialMarks::from_annotations(&[DuplicateAnnotation {
            name: "Ono Grindz".into(),
            phone: "808-555-1234".into(),
        }]);
        assert!(marks.is_marked(&rec("ONO GRINDZ", "808-555-0000")));
        assert!(marks.is_marked(&rec("Other", "+1 808-555-1234")));
        assert!(!marks.is_marked(&rec("Other", "808-555-0000")));
        assert!(!PartialMarks::default().is_marked(&rec("Ono Grindz", "808-555-1234")));
    }
}
