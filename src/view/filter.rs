use crate::data::record::Record;

/// Indices of the records whose name contains `query`, ignoring case.
///
/// An empty query keeps every record. Input order is preserved.
pub fn filter(records: &[Record], query: &str) -> Vec<usize> {
    let all: Vec<usize> = (0..records.len()).collect();
    filter_rows(records, &all, query)
}

/// Narrow an existing index view by `query`, keeping its order
pub fn filter_rows(records: &[Record], rows: &[usize], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .copied()
        .filter(|&idx| {
            records
                .get(idx)
                .is_some_and(|record| record.name().to_lowercase().contains(&needle))
        })
        .collect()
}
