use serde::Serialize;

use crate::model::Record;
use crate::normalize::{classify_phone, PhoneOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhoneStats {
    pub formatted: usize,
    pub passed_through: usize,
}

/// Rewrite every record's phone in its canonical form.
pub fn format_phones(mut records: Vec<Record>) -> (Vec<Record>, PhoneStats) {
    let mut stats = PhoneStats::default();
    for record in &mut records {
        let outcome = classify_phone(&record.phone);
        match outcome {
            PhoneOutcome::Formatted(_) => stats.formatted += 1,
            PhoneOutcome::PassThrough(_) => {
                tracing::debug!("left phone {:?} of {:?} as is", record.phone, record.name);
                stats.passed_through += 1;
            }
        }
        record.phone = outcome.into_string();
    }
    (records, stats)
}
