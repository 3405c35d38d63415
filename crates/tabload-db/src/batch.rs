//! Row preparation and batching.

/// Cell values treated as missing and stored as NULL.
///
/// Matches what spreadsheet exports and pandas-produced files use for
/// absent data.
pub const MISSING_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true when `value` denotes a missing cell.
#[must_use]
pub fn is_missing(value: &str) -> bool {
    MISSING_SENTINELS.contains(&value)
}

/// NULL for missing cells, otherwise the value cut to `max_text_len` characters.
#[must_use]
pub fn prepare_value(value: &str, max_text_len: usize) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    match value.char_indices().nth(max_text_len) {
        Some((cut, _)) => Some(value[..cut].to_string()),
        None => Some(value.to_string()),
    }
}

/// Prepares every cell of `row`.
#[must_use]
pub fn prepare_row(row: &[String], max_text_len: usize) -> Vec<Option<String>> {
    row.iter()
        .map(|value| prepare_value(value, max_text_len))
        .collect()
}

/// A prepared slice of a file's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
    /// 1-based batch number within the file.
    pub number: usize,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splits rows into prepared batches of at most `batch_size` rows.
#[derive(Debug)]
pub struct RowBatches<'a> {
    chunks: std::iter::Enumerate<std::slice::Chunks<'a, Vec<String>>>,
    max_text_len: usize,
}

impl<'a> RowBatches<'a> {
    /// A `batch_size` of zero is treated as one.
    #[must_use]
    pub fn new(rows: &'a [Vec<String>], batch_size: usize, max_text_len: usize) -> Self {
        Self {
            chunks: rows.chunks(batch_size.max(1)).enumerate(),
            max_text_len,
        }
    }
}

impl Iterator for RowBatches<'_> {
    type Item = RowBatch;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, chunk) = self.chunks.next()?;
        Some(RowBatch {
            number: index + 1,
            rows: chunk
                .iter()
                .map(|row| prepare_row(row, self.max_text_len))
                .collect(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<Vec<String>> {
        (0..count).map(|i| vec![i.to_string()]).collect()
    }

    #[test]
    fn sentinels_become_null() {
        for value in ["", "NA", "N/A", "NULL", "nan", "#N/A", "None"] {
            assert_eq!(prepare_value(value, 10), None, "{value:?}");
        }
        assert_eq!(prepare_value("0", 10), Some("0".to_string()));
        assert_eq!(prepare_value(" ", 10), Some(" ".to_string()));
        assert_eq!(prepare_value("na", 10), Some("na".to_string()));
    }

    #[test]
    fn long_values_are_cut_on_character_boundaries() {
        assert_eq!(prepare_value("abcdef", 4), Some("abcd".to_string()));
        assert_eq!(prepare_value("äöüß", 2), Some("äö".to_string()));
        assert_eq!(prepare_value("abc", 3), Some("abc".to_string()));
    }

    #[test]
    fn batches_of_one_hundred() {
        let data = rows(250);
        let sizes: Vec<(usize, usize)> = RowBatches::new(&data, 100, 10)
            .map(|batch| (batch.number, batch.len()))
            .collect();
        assert_eq!(sizes, vec![(1, 100), (2, 100), (3, 50)]);
    }

    #[test]
    fn zero_batch_size_means_one_row_per_batch() {
        let data = rows(3);
        let sizes: Vec<(usize, usize)> = RowBatches::new(&data, 0, 10)
            .map(|batch| (batch.number, batch.len()))
            .collect();
        assert_eq!(sizes, vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn no_rows_no_batches() {
        let data: Vec<Vec<String>> = Vec::new();
        assert_eq!(RowBatches::new(&data, 100, 10).count(), 0);
    }
}
