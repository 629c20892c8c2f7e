//! Per-category time totals for a project's report view.

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::duration_seconds;
use crate::types::{DbId, Timestamp};

/// Anything with a tracked interval and an optional category.
pub trait TrackedInterval {
    fn category_id(&self) -> Option<DbId>;
    fn start_time(&self) -> Timestamp;
    fn end_time(&self) -> Option<Timestamp>;
}

/// Total tracked seconds for one category (`None` = uncategorised).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: Option<DbId>,
    pub seconds: f64,
}

/// Sum the durations of closed intervals per category.
///
/// Open intervals are skipped. Keys appear in the order their category is
/// first encountered.
pub fn aggregate_by_category<'a, T, I>(records: I) -> IndexMap<Option<DbId>, f64>
where
    T: TrackedInterval + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut totals: IndexMap<Option<DbId>, f64> = IndexMap::new();
    for record in records {
        let Some(end) = record.end_time() else {
            continue;
        };
        *totals.entry(record.category_id()).or_insert(0.0) +=
            duration_seconds(record.start_time(), Some(end));
    }
    totals
}

/// [`aggregate_by_category`] flattened into a serializable list.
pub fn category_totals<'a, T, I>(records: I) -> Vec<CategoryTotal>
where
    T: TrackedInterval + 'a,
    I: IntoIterator<Item = &'a T>,
{
    aggregate_by_category(records)
        .into_iter()
        .map(|(category_id, seconds)| CategoryTotal {
            category_id,
            seconds,
        })
        .collect()
}

/// Partition intervals into `(open, closed)`, keeping their relative order.
pub fn split_open_closed<T: TrackedInterval>(records: Vec<T>) -> (Vec<T>, Vec<T>) {
    records.into_iter().partition(|r| r.end_time().is_none())
}
