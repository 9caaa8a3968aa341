//! Google Sheets v4 REST implementation of [`TableStore`].

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    auth::{SheetsCredentials, TokenProvider},
    cache::OcidCache,
    ocid_list,
    record::SheetRecord,
    table::{full_range, row_range, SheetTable},
    OcidPage, RemovalCounts, TableStore, UpsertCounts, CHARACTER_INFO_SHEET, COMBAT_POWER_SHEET,
    OCID_SHEET,
};
use crate::server::{
    error::sheets::SheetsError,
    model::combat_power::{CharacterInfoRecord, CombatPowerRecord},
};

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Writes store cell text exactly as given.
const VALUE_INPUT_OPTION: &str = "RAW";

#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody {
    range: String,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetMetadata>,
}

#[derive(Debug, Deserialize)]
struct SheetMetadata {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// HTTP client for a single spreadsheet.
pub struct SheetsClient {
    client: reqwest::Client,
    api_url: String,
    spreadsheet_id: String,
    tokens: TokenProvider,
}

impl SheetsClient {
    /// * `api_url` - Base URL without trailing slash, e.g. [`DEFAULT_SHEETS_API_URL`].
    pub fn new(
        api_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        credentials: SheetsCredentials,
    ) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, api_url, spreadsheet_id, credentials))
    }

    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        credentials: SheetsCredentials,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            tokens: TokenProvider::new(credentials),
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.api_url, self.spreadsheet_id)
    }

    /// Authorizes and sends a request, turning non-2xx responses into errors.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SheetsError> {
        let token = self.tokens.access_token(&self.client).await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Status { status, body });
        }

        Ok(response)
    }

    /// Reads a range (`Sheet!A:E`) into a table. Empty sheets yield an empty table.
    pub async fn get_values(&self, range: &str) -> Result<SheetTable, SheetsError> {
        let request = self
            .client
            .get(format!("{}/values/{}", self.spreadsheet_url(), range));

        let body: ValueRangeResponse = self.send(request).await?.json().await?;

        Ok(SheetTable::new(body.values))
    }

    /// Rewrites several ranges in a single call.
    async fn batch_update_values(&self, data: Vec<ValueRangeBody>) -> Result<(), SheetsError> {
        let request = self
            .client
            .post(format!("{}/values:batchUpdate", self.spreadsheet_url()))
            .json(&json!({
                "valueInputOption": VALUE_INPUT_OPTION,
                "data": data,
            }));

        self.send(request).await?;
        Ok(())
    }

    /// Appends rows after the last row of the table found in `range`.
    async fn append_values(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SheetsError> {
        let request = self
            .client
            .post(format!("{}/values/{}:append", self.spreadsheet_url(), range))
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": rows }));

        self.send(request).await?;
        Ok(())
    }

    /// Sheet title to numeric sheet id, needed for structural edits.
    async fn sheet_ids(&self) -> Result<HashMap<String, i64>, SheetsError> {
        let request = self
            .client
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties(sheetId,title)")]);

        let metadata: SpreadsheetMetadata = self.send(request).await?.json().await?;

        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| (sheet.properties.title, sheet.properties.sheet_id))
            .collect())
    }

    /// Deletes rows in one structural batch update. `row_indices` must be in descending order.
    async fn delete_rows(&self, sheet_id: i64, row_indices: &[usize]) -> Result<(), SheetsError> {
        let requests: Vec<serde_json::Value> = row_indices
            .iter()
            .map(|&row_index| {
                json!({
                    "deleteDimension": {
                        "range": {
                            "sheetId": sheet_id,
                            "dimension": "ROWS",
                            "startIndex": row_index,
                            "endIndex": row_index + 1,
                        }
                    }
                })
            })
            .collect();

        let request = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .json(&json!({ "requests": requests }));

        self.send(request).await?;
        Ok(())
    }

    async fn upsert<R>(
        &self,
        records: &[R],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError>
    where
        R: SheetRecord + Sync,
    {
        if records.is_empty() {
            return Ok(UpsertCounts::default());
        }

        let width = R::HEADER.len();
        let fetched;
        let table = match existing {
            Some(table) => table,
            None => {
                fetched = self.get_values(&full_range(R::SHEET, width)).await?;
                &fetched
            }
        };

        let plan = table.plan_upsert(records);

        if !plan.updates.is_empty() {
            let data = plan
                .updates
                .iter()
                .map(|update| ValueRangeBody {
                    range: row_range(R::SHEET, update.row_index, width),
                    values: vec![update.values.clone()],
                })
                .collect();

            self.batch_update_values(data).await?;
        }

        if !plan.inserts.is_empty() {
            let mut rows = Vec::with_capacity(plan.inserts.len() + 1);
            if plan.write_header {
                rows.push(R::HEADER.iter().map(|cell| cell.to_string()).collect());
            }
            rows.extend(plan.inserts.iter().cloned());

            self.append_values(&full_range(R::SHEET, width), rows).await?;
        }

        let counts = plan.counts();
        tracing::debug!(
            sheet = R::SHEET,
            updated = counts.updated,
            inserted = counts.inserted,
            "Upserted rows"
        );

        Ok(counts)
    }
}

#[async_trait]
impl TableStore for SheetsClient {
    async fn get_all_ocids(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<OcidPage, SheetsError> {
        let table = self.get_values(&format!("{}!A:A", OCID_SHEET)).await?;

        Ok(OcidPage::from_list(ocid_list(&table), offset, limit))
    }

    async fn get_combat_power_table(&self) -> Result<SheetTable, SheetsError> {
        self.get_values(&full_range(
            COMBAT_POWER_SHEET,
            CombatPowerRecord::HEADER.len(),
        ))
        .await
    }

    async fn get_all_character_info_data(&self) -> Result<SheetTable, SheetsError> {
        self.get_values(&full_range(
            CHARACTER_INFO_SHEET,
            CharacterInfoRecord::HEADER.len(),
        ))
        .await
    }

    async fn upsert_combat_power_records(
        &self,
        records: &[CombatPowerRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError> {
        self.upsert(records, existing).await
    }

    async fn upsert_character_info_cache(
        &self,
        records: &[CharacterInfoRecord],
        existing: Option<&SheetTable>,
    ) -> Result<UpsertCounts, SheetsError> {
        self.upsert(records, existing).await
    }

    async fn remove_ocids(&self, ocids: &[String]) -> Result<RemovalCounts, SheetsError> {
        if ocids.is_empty() {
            return Ok(RemovalCounts::default());
        }

        let targets: HashSet<&str> = ocids.iter().map(|ocid| ocid.as_str()).collect();
        let sheet_ids = self.sheet_ids().await?;
        let mut counts = RemovalCounts::default();

        for sheet in [OCID_SHEET, COMBAT_POWER_SHEET, CHARACTER_INFO_SHEET] {
            let Some(&sheet_id) = sheet_ids.get(sheet) else {
                tracing::debug!("Sheet {} does not exist; skipping removal", sheet);
                continue;
            };

            let table = self.get_values(&format!("{}!A:A", sheet)).await?;
            let rows = table.rows_matching(&targets);

            if !rows.is_empty() {
                self.delete_rows(sheet_id, &rows).await?;
            }

            match sheet {
                OCID_SHEET => counts.sheet1 = rows.len(),
                COMBAT_POWER_SHEET => counts.combat_power = rows.len(),
                _ => counts.character_info = rows.len(),
            }
        }

        tracing::info!(
            sheet1 = counts.sheet1,
            combat_power = counts.combat_power,
            character_info = counts.character_info,
            "Removed rows for {} OCID(s)",
            targets.len()
        );

        Ok(counts)
    }

    async fn add_ocid_if_absent(
        &self,
        ocid: &str,
        cache: &OcidCache,
    ) -> Result<bool, SheetsError> {
        // Held across the append so concurrent searches for the same character append once
        let mut entry = cache.entry().await;

        if !entry.is_fresh() {
            let table = self.get_values(&format!("{}!A:A", OCID_SHEET)).await?;
            entry.replace(ocid_list(&table).into_iter().collect());
        }

        if entry.contains(ocid) {
            return Ok(false);
        }

        self.append_values(&format!("{}!A:A", OCID_SHEET), vec![vec![ocid.to_string()]])
            .await?;
        entry.insert(ocid.to_string());

        tracing::info!("Registered new OCID {}", ocid);

        Ok(true)
    }
}
