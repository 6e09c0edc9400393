use std::iter::Peekable;

use traffic_core::{Classifier, DayAggregate, LogRecord};

use crate::types::Result;

/// Counters folded from one time window of the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub aggregate: DayAggregate,
    /// Timestamp of the last consumed record, `None` for an empty window.
    pub last_timestamp: Option<f64>,
    /// Consumed records whose timestamp equals `last_timestamp`.
    pub records_at_last_timestamp: u64,
    pub records: u64,
}

pub struct Accumulator {
    classifier: Classifier,
}

impl Accumulator {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn fold_record(&self, aggregate: &mut DayAggregate, record: &LogRecord) {
        let classification = self.classifier.classify(record);
        aggregate.category_mut(classification.category).record(
            record.status,
            &classification.path_shape,
            record.duration,
            classification.is_page,
        );
        aggregate.record_user_agent(record.user_agent());
    }

    /// Consumes records with `ts < end_exclusive`.
    ///
    /// The first record at or past the end stays in `records` for the next
    /// window. A source error ends the window and is returned as is.
    pub fn accumulate<I>(&self, records: &mut Peekable<I>, end_exclusive: f64) -> Result<Window>
    where
        I: Iterator<Item = Result<LogRecord>>,
    {
        let mut window = Window::default();
        loop {
            match records.peek() {
                None => break,
                Some(Ok(record)) if record.ts >= end_exclusive => break,
                Some(_) => {}
            }
            let record = match records.next() {
                Some(Ok(record)) => record,
                Some(Err(err)) => return Err(err),
                None => break,
            };
            self.fold_record(&mut window.aggregate, &record);
            if window.last_timestamp == Some(record.ts) {
                window.records_at_last_timestamp += 1;
            } else {
                window.last_timestamp = Some(record.ts);
                window.records_at_last_timestamp = 1;
            }
            window.records += 1;
        }
        Ok(window)
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new(Classifier::default())
    }
}
