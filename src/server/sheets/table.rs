//! In-memory representation of a sheet and the reconciliation logic run against it.

use std::collections::{HashMap, HashSet};

use super::record::{SheetRecord, KEY_COLUMN};

/// A sheet read as a 2-D array of cells.
///
/// The first row is treated as the header when one of its cells is `ocid`; tables written by
/// this crate always carry one, but the identifier list may have been seeded without it.
/// Row indices are 0-based and include the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    rows: Vec<Vec<String>>,
}

/// Single row rewrite produced by [`SheetTable::plan_upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub row_index: usize,
    pub values: Vec<String>,
}

/// Writes needed to reconcile a batch of records with a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertPlan {
    /// The sheet is completely empty; the header must precede the inserted rows.
    pub write_header: bool,
    pub updates: Vec<RowUpdate>,
    pub inserts: Vec<Vec<String>>,
}

impl UpsertPlan {
    pub fn counts(&self) -> super::UpsertCounts {
        super::UpsertCounts {
            updated: self.updates.len(),
            inserted: self.inserts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty()
    }
}

impl SheetTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// A table holding only `header`.
    pub fn with_header(header: &[&str]) -> Self {
        Self {
            rows: vec![header.iter().map(|cell| cell.to_string()).collect()],
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_header(&self) -> bool {
        self.rows.first().is_some_and(|first| {
            first
                .iter()
                .any(|cell| cell.trim().eq_ignore_ascii_case(KEY_COLUMN))
        })
    }

    /// Whether the header lists `R::HEADER` in order, case-insensitive. Headerless tables match.
    ///
    /// Rows are read and written positionally, so a reordered header means the cells under it
    /// hold other columns than their names say.
    pub fn header_matches<R: SheetRecord>(&self) -> bool {
        if !self.has_header() {
            return true;
        }

        let header = &self.rows[0];
        R::HEADER.iter().enumerate().all(|(column, expected)| {
            header
                .get(column)
                .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(expected))
        })
    }

    fn warn_on_header_mismatch<R: SheetRecord>(&self) {
        if !self.header_matches::<R>() {
            tracing::warn!(
                sheet = R::SHEET,
                expected = ?R::HEADER,
                found = ?self.rows[0],
                "Header does not match the expected column order; cells are still read by position"
            );
        }
    }

    /// Position of a header cell, case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if !self.has_header() {
            return None;
        }

        self.rows[0]
            .iter()
            .position(|cell| cell.trim().eq_ignore_ascii_case(name))
    }

    /// Column holding the `ocid` key; column A when there is no header.
    pub fn key_column(&self) -> usize {
        self.column_index(KEY_COLUMN).unwrap_or(0)
    }

    /// Every non-header row with its row index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        let skip = usize::from(self.has_header());

        self.rows.iter().enumerate().skip(skip)
    }

    /// Number of non-header rows.
    pub fn data_len(&self) -> usize {
        self.rows.len() - usize::from(self.has_header())
    }

    /// Maps each key to the index of the first row carrying it. Blank keys are ignored.
    pub fn key_index(&self) -> HashMap<String, usize> {
        let key_column = self.key_column();
        let mut index = HashMap::new();

        for (row_index, row) in self.data_rows() {
            let Some(key) = row.get(key_column).map(|cell| cell.trim()) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            index.entry(key.to_string()).or_insert(row_index);
        }

        index
    }

    /// Decides for each record whether it rewrites an existing row or is appended.
    ///
    /// Records sharing a key collapse to the last one given.
    pub fn plan_upsert<R: SheetRecord>(&self, records: &[R]) -> UpsertPlan {
        self.warn_on_header_mismatch::<R>();

        let index = self.key_index();
        let mut plan = UpsertPlan {
            write_header: self.rows.is_empty() && !records.is_empty(),
            ..Default::default()
        };
        let mut update_slots: HashMap<usize, usize> = HashMap::new();
        let mut insert_slots: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let values = record.to_row();

            if let Some(&row_index) = index.get(record.key()) {
                match update_slots.get(&row_index) {
                    Some(&slot) => plan.updates[slot].values = values,
                    None => {
                        update_slots.insert(row_index, plan.updates.len());
                        plan.updates.push(RowUpdate { row_index, values });
                    }
                }
            } else {
                match insert_slots.get(record.key()) {
                    Some(&slot) => plan.inserts[slot] = values,
                    None => {
                        insert_slots.insert(record.key(), plan.inserts.len());
                        plan.inserts.push(values);
                    }
                }
            }
        }

        plan
    }

    /// Applies the same writes [`SheetTable::plan_upsert`] would issue, in memory.
    pub fn apply_upsert<R: SheetRecord>(&mut self, records: &[R]) {
        if records.is_empty() {
            return;
        }
        if self.rows.is_empty() {
            self.rows = Self::with_header(R::HEADER).rows;
        }

        let mut index = self.key_index();

        for record in records {
            let values = record.to_row();

            match index.get(record.key()) {
                Some(&row_index) => self.rows[row_index] = values,
                None => {
                    index.insert(record.key().to_string(), self.rows.len());
                    self.rows.push(values);
                }
            }
        }
    }

    /// Indices of rows whose key is in `keys`, in descending order so that deleting them one
    /// after another never shifts a pending index.
    pub fn rows_matching(&self, keys: &HashSet<&str>) -> Vec<usize> {
        let key_column = self.key_column();

        let mut matching: Vec<usize> = self
            .data_rows()
            .filter(|(_, row)| {
                row.get(key_column)
                    .is_some_and(|cell| keys.contains(cell.trim()))
            })
            .map(|(row_index, _)| row_index)
            .collect();

        matching.sort_unstable_by(|a, b| b.cmp(a));
        matching
    }

    /// Parses every data row, skipping (and logging) rows that do not parse.
    pub fn parse_records<R: SheetRecord>(&self) -> Vec<R> {
        self.warn_on_header_mismatch::<R>();

        let key_column = self.key_column();

        self.data_rows()
            .filter(|(_, row)| row.get(key_column).is_some_and(|key| !key.trim().is_empty()))
            .filter_map(|(row_index, row)| match R::from_row(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        sheet = R::SHEET,
                        row = row_index + 1,
                        "Skipping unparseable row: {}",
                        e
                    );
                    None
                }
            })
            .collect()
    }

    /// Parsed records keyed by their OCID. On duplicate keys the first row wins, matching the
    /// row [`SheetTable::plan_upsert`] rewrites.
    pub fn record_map<R: SheetRecord>(&self) -> HashMap<String, R> {
        let mut records = HashMap::new();

        for record in self.parse_records::<R>() {
            records.entry(record.key().to_string()).or_insert(record);
        }

        records
    }
}

/// Spreadsheet column letter for a 0-based column index (0 → `A`, 26 → `AA`).
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 range covering every column of a `width`-column table, e.g. `CombatPower!A:E`.
pub fn full_range(sheet: &str, width: usize) -> String {
    format!("{}!A:{}", sheet, column_letter(width.saturating_sub(1)))
}

/// A1 range covering a single row, e.g. `CombatPower!A3:E3` for row index 2.
pub fn row_range(sheet: &str, row_index: usize, width: usize) -> String {
    let row_number = row_index + 1;

    format!(
        "{}!A{}:{}{}",
        sheet,
        row_number,
        column_letter(width.saturating_sub(1)),
        row_number
    )
}
