use chrono::{DateTime, Utc};
use sitewatch_types::{ErrorRecord, MatchRule, NetworkEvent};

use crate::parser::parse_entry;

/// Outcome of one drain tick: the records to persist plus drop accounting.
///
/// Individual parse failures never surface past this struct; only the count
/// does.
#[derive(Debug, Default)]
pub struct TickReport {
    pub records: Vec<ErrorRecord>,

    /// Entries recognized as network events this tick
    pub parsed: usize,

    /// Malformed envelopes silently dropped this tick
    pub dropped: usize,
}

/// Matches drained events against the configured rule set and turns failures
/// into persistable records.
///
/// Rules are fixed at construction. Classification is pure: one event in, at
/// most one record out, no state carried between ticks.
pub struct Classifier {
    rules: Vec<MatchRule>,
}

impl Classifier {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    /// Classify a single event. Returns None for events no rule matches and
    /// for matched responses below the rule's status threshold; monitoring
    /// only surfaces failures, never successful traffic.
    pub fn classify(&self, event: &NetworkEvent, at: DateTime<Utc>) -> Option<ErrorRecord> {
        let rule = self.rules.iter().find(|r| r.matches(event.url()))?;

        match event {
            NetworkEvent::ResponseReceived {
                url,
                status,
                mime_type,
                headers,
            } => {
                if *status < rule.min_status {
                    return None;
                }
                Some(ErrorRecord::http_failure(
                    at,
                    url,
                    *status,
                    mime_type.clone(),
                    headers.clone(),
                    rule.response_category,
                ))
            }
            NetworkEvent::LoadingFailed {
                url,
                error_text,
                raw_params,
            } => Some(ErrorRecord::loading_failure(
                at,
                url,
                error_text,
                raw_params.clone(),
                rule.failure_category,
            )),
        }
    }

    /// Run one full drain tick over a batch of raw entries.
    ///
    /// Each entry's parse/match/emit sequence is independently fault-isolated:
    /// a malformed entry increments `dropped` and processing continues with
    /// the next one.
    pub fn drain_tick<I, S>(&self, entries: I, at: DateTime<Utc>) -> TickReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = TickReport::default();

        for raw in entries {
            match parse_entry(raw.as_ref()) {
                Ok(Some(event)) => {
                    report.parsed += 1;
                    if let Some(record) = self.classify(&event, at) {
                        report.records.push(record);
                    }
                }
                Ok(None) => {}
                Err(_) => report.dropped += 1,
            }
        }

        report
    }
}
