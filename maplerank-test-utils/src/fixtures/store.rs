//! In-memory table store behaving like the Sheets client.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use maplerank::server::{
    error::sheets::SheetsError,
    model::combat_power::{CharacterInfoRecord, CombatPowerRecord},
    sheets::{
        ocid_list, OcidCache, OcidPage, RemovalCounts, SheetRecord, SheetTable, TableStore,
        UpsertCounts, CHARACTER_INFO_SHEET, COMBAT_POWER_SHEET, OCID_SHEET,
    },
};
use reqwest::StatusCode;

/// A store operation, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetAllOcids { offset: usize, limit: Option<usize> },
    GetCombatPowerTable,
    GetCharacterInfoTable,
    UpsertCombatPower { ocids: Vec<String>, with_existing: bool },
    UpsertCharacterInfo { ocids: Vec<String>, with_existing: bool },
    RemoveOcids(Vec<String>),
    AddOcid(String),
}

/// [`TableStore`] over three in-memory sheets.
///
/// Upserts are planned against the `existing` table when one is passed, exactly as the Sheets
/// client does, and the resulting row writes are applied at the planned indices. A caller whose
/// snapshot has drifted from the stored table therefore corrupts rows here too.
#[derive(Default)]
pub struct MemoryTableStore {
    sheets: Mutex<HashMap<&'static str, SheetTable>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the identifier list (with an `ocid` header).
    pub fn with_ocids(self, ocids: &[&str]) -> Self {
        let mut rows = vec![vec!["ocid".to_string()]];
        rows.extend(ocids.iter().map(|ocid| vec![ocid.to_string()]));

        lock(&self.sheets).insert(OCID_SHEET, SheetTable::new(rows));
        self
    }

    pub fn with_combat_power_records(self, records: &[CombatPowerRecord]) -> Self {
        self.seed(records);
        self
    }

    pub fn with_character_info(self, records: &[CharacterInfoRecord]) -> Self {
        self.seed(records);
        self
    }

    /// Make every bulk read fail with a 503.
    pub fn with_failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Make every upsert and removal fail with a 503.
    pub fn with_failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    fn seed<R: SheetRecord>(&self, records: &[R]) {
        let mut sheets = lock(&self.sheets);
        sheets.entry(R::SHEET).or_default().apply_upsert(records);
    }

    /// Current contents of a sheet.
    pub fn table(&self, sheet: &str) -> SheetTable {
        lock(&self.sheets).get(sheet).cloned().unwrap_or_default()
    }

    /// Identifier list in sheet order.
    pub fn ocids(&self) -> Vec<String> {
        ocid_list(&self.table(OCID_SHEET))
    }

    /// Stored combat power records keyed by OCID.
    pub fn combat_power_records(&self) -> HashMap<String, CombatPowerRecord> {
        self.table(COMBAT_POWER_SHEET).record_map()
    }

    pub fn character_info_records(&self) -> HashMap<String, CharacterInfoRecord> {
        self.table(CHARACTER_INFO_SHEET).record_map()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    /// Arguments of every `remove_ocids` call.
    pub fn remove_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::RemoveOcids(ocids) => Some(ocids),
                _ => None,
            })
            .collect()
    }

    /// OCIDs of every `upsert_combat_power_records` call, one entry per call.
    pub fn combat_power_upserts(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::UpsertCombatPower { ocids, .. } => Some(ocids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        lock(&self.calls).push(call);
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), SheetsError> {
        if flag.load(Ordering::SeqCst) {
            return Err(SheetsError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "backend unavailable".to_string(),
            });
        }

        Ok(())
    }

    fn read(&self, sheet: &'static str) -> Result<SheetTable, SheetsError> {
        self.check(&self.fail_reads)?;

        Ok(self.table(sheet))
    }

    fn upsert<R: SheetRecord>(
        &self,
        records: &[R],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError> {
        if records.is_empty() {
            return Ok(UpsertCounts::default());
        }
        self.check(&self.fail_writes)?;

        let mut sheets = lock(&self.sheets);
        let stored = sheets.entry(R::SHEET).or_default();
        let plan = match existing {
            Some(table) => table.plan_upsert(records),
            None => stored.plan_upsert(records),
        };

        let mut rows = std::mem::take(stored).into_rows();
        for update in &plan.updates {
            if update.row_index < rows.len() {
                rows[update.row_index] = update.values.clone();
            }
        }
        if plan.write_header {
            rows.push(R::HEADER.iter().map(|cell| cell.to_string()).collect());
        }
        rows.extend(plan.inserts.iter().cloned());
        *stored = SheetTable::new(rows);

        Ok(plan.counts())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn get_all_ocids(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<OcidPage, SheetsError> {
        self.record(StoreCall::GetAllOcids { offset, limit });
        let table = self.read(OCID_SHEET)?;

        Ok(OcidPage::from_list(ocid_list(&table), offset, limit))
    }

    async fn get_combat_power_table(&self) -> Result<SheetTable, SheetsError> {
        self.record(StoreCall::GetCombatPowerTable);
        self.read(COMBAT_POWER_SHEET)
    }

    async fn get_all_character_info_data(&self) -> Result<SheetTable, SheetsError> {
        self.record(StoreCall::GetCharacterInfoTable);
        self.read(CHARACTER_INFO_SHEET)
    }

    async fn upsert_combat_power_records(
        &self,
        records: &[CombatPowerRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError> {
        self.record(StoreCall::UpsertCombatPower {
            ocids: records.iter().map(|record| record.ocid.clone()).collect(),
            with_existing: existing.is_some(),
        });
        self.upsert(records, existing)
    }

    async fn upsert_character_info_cache(
        &self,
        records: &[CharacterInfoRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError> {
        self.record(StoreCall::UpsertCharacterInfo {
            ocids: records.iter().map(|record| record.ocid.clone()).collect(),
            with_existing: existing.is_some(),
        });
        self.upsert(records, existing)
    }

    async fn remove_ocids(&self, ocids: &[String]) -> Result<RemovalCounts, SheetsError> {
        self.record(StoreCall::RemoveOcids(ocids.to_vec()));
        if ocids.is_empty() {
            return Ok(RemovalCounts::default());
        }
        self.check(&self.fail_writes)?;

        let targets: HashSet<&str> = ocids.iter().map(String::as_str).collect();
        let mut sheets = lock(&self.sheets);
        let mut remove = |sheet: &str| {
            let Some(table) = sheets.get_mut(sheet) else {
                return 0;
            };
            let matching = table.rows_matching(&targets);
            let mut rows = std::mem::take(table).into_rows();
            for &row_index in &matching {
                rows.remove(row_index);
            }
            *table = SheetTable::new(rows);

            matching.len()
        };

        Ok(RemovalCounts {
            sheet1: remove(OCID_SHEET),
            combat_power: remove(COMBAT_POWER_SHEET),
            character_info: remove(CHARACTER_INFO_SHEET),
        })
    }

    async fn add_ocid_if_absent(
        &self,
        ocid: &str,
        cache: &OcidCache,
    ) -> Result<bool, SheetsError> {
        self.record(StoreCall::AddOcid(ocid.to_string()));
        let mut entry = cache.entry().await;

        if !entry.is_fresh() {
            let table = self.read(OCID_SHEET)?;
            entry.replace(ocid_list(&table).into_iter().collect());
        }
        if entry.contains(ocid) {
            return Ok(false);
        }

        {
            let mut sheets = lock(&self.sheets);
            let table = sheets.entry(OCID_SHEET).or_default();
            let mut rows = std::mem::take(table).into_rows();
            rows.push(vec![ocid.to_string()]);
            *table = SheetTable::new(rows);
        }
        entry.insert(ocid.to_string());

        Ok(true)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
