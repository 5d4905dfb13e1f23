use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::config::RunConfig;

/// Outcome of one analysis run, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub timestamp: String,
    pub config: RunConfig,
    pub processed_files: u64,
    pub matched_count: u64,
    pub unmatched_count: u64,
    pub log_file: String,
    pub plots_dir: String,
    #[serde(default)]
    pub summary_xlsx: Option<String>,
}

impl RunResult {
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    pub fn has_summary(&self) -> bool {
        self.summary_xlsx.is_some()
    }
}

/// Condensed run entry returned by `GET /runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummaryRecord {
    pub run_id: String,
    pub timestamp: String,
    pub profile_set_id: String,
    pub processed_files: u64,
    pub matched_count: u64,
    pub unmatched_count: u64,
    pub dominance_delta: f64,
    pub balance_threshold: f64,
    pub window_secs: u32,
}

impl RunSummaryRecord {
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// Compact rendering of the config fields kept in the summary.
    pub fn config_label(&self) -> String {
        format!(
            "Δ={}, B={}, W={}s",
            self.dominance_delta, self.balance_threshold, self.window_secs
        )
    }
}

/// Backend timestamps are naive ISO-8601, with or without fractional seconds.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Human-readable timestamp, or the raw string when it does not parse.
pub fn display_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One spreadsheet row: cells in column order, `None` for empty cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SheetRow {
    cells: Vec<(String, Option<Scalar>)>,
}

impl SheetRow {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(column, _)| column.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Cell text for display; empty for null or missing cells.
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(ToString::to_string).unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for SheetRow {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let cells = map
            .into_iter()
            .map(|(column, value)| {
                let scalar = match value {
                    Value::Null => None,
                    Value::Bool(b) => Some(Scalar::Bool(b)),
                    Value::Number(n) => Some(Scalar::Number(n)),
                    Value::String(s) => Some(Scalar::Text(s)),
                    other => {
                        return Err(format!("column '{}' holds a non-scalar value: {}", column, other))
                    }
                };
                Ok((column, scalar))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarySheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl SummarySheet {
    /// Column names, taken from the first row. An empty sheet has none.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Spreadsheet summary of a run, sheets in workbook order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawSummaryData")]
pub struct SummaryData {
    pub sheets: Vec<SummarySheet>,
}

#[derive(Deserialize)]
struct RawSummaryData {
    #[serde(default)]
    sheets: Map<String, Value>,
}

impl TryFrom<RawSummaryData> for SummaryData {
    type Error = String;

    fn try_from(raw: RawSummaryData) -> Result<Self, Self::Error> {
        let sheets = raw
            .sheets
            .into_iter()
            .map(|(name, rows)| {
                let rows: Vec<SheetRow> = serde_json::from_value(rows)
                    .map_err(|e| format!("sheet '{}': {}", name, e))?;
                Ok(SummarySheet { name, rows })
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok(Self { sheets })
    }
}

impl SummaryData {
    pub fn sheet(&self, name: &str) -> Option<&SummarySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn first_sheet_name(&self) -> Option<&str> {
        self.sheets.first().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_JSON: &str = r#"{
        "run_id": "20250102_030405",
        "timestamp": "2025-01-02T03:04:05.123456",
        "config": {"dominance_delta": 29.0, "balance_threshold": 22.0,
                   "denge_mean_threshold": 46.0, "window_secs": 30,
                   "window_samples": 5, "data_root": null,
                   "profile_set_id": "meditasyon", "band_thresholds": {}},
        "processed_files": 12,
        "matched_count": 10,
        "unmatched_count": 2,
        "log_file": "/data/runs/20250102_030405/processing_log.csv",
        "plots_dir": "/data/runs/20250102_030405/plots",
        "summary_xlsx": null
    }"#;

    #[test]
    fn test_run_result_deserializes() {
        let run: RunResult = serde_json::from_str(RUN_JSON).unwrap();
        assert_eq!(run.processed_files, 12);
        assert!(!run.has_summary());
        let created = run.created_at().unwrap();
        assert_eq!(created.format("%H:%M:%S").to_string(), "03:04:05");
    }

    #[test]
    fn test_display_timestamp_falls_back_to_raw() {
        assert_eq!(display_timestamp("2025-01-02T03:04:05"), "2025-01-02 03:04:05");
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_config_label() {
        let record = RunSummaryRecord {
            run_id: "r".to_string(),
            timestamp: String::new(),
            profile_set_id: "meditasyon".to_string(),
            processed_files: 3,
            matched_count: 2,
            unmatched_count: 1,
            dominance_delta: 29.5,
            balance_threshold: 22.0,
            window_secs: 30,
        };
        assert_eq!(record.config_label(), "Δ=29.5, B=22, W=30s");
    }

    #[test]
    fn test_summary_preserves_sheet_and_column_order() {
        let body = r#"{
            "run_id": "r1",
            "sheets": {
                "Zeta": [{"b": 1, "a": "x"}],
                "Alpha": [{"name": "P1", "count": null, "ok": true}]
            },
            "download_url": "/runs/r1/summary/download"
        }"#;
        let data: SummaryData = serde_json::from_str(body).unwrap();
        assert_eq!(data.sheet_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
        assert_eq!(data.first_sheet_name(), Some("Zeta"));
        assert_eq!(data.sheets[0].columns(), vec!["b", "a"]);

        let row = &data.sheet("Alpha").unwrap().rows[0];
        assert_eq!(row.display("name"), "P1");
        assert_eq!(row.get("count"), None);
        assert_eq!(row.display("count"), "");
        assert_eq!(row.display("ok"), "true");
    }

    #[test]
    fn test_empty_sheet_has_no_columns() {
        let data: SummaryData = serde_json::from_str(r#"{"sheets": {"Empty": []}}"#).unwrap();
        assert!(data.sheets[0].columns().is_empty());
    }

    #[test]
    fn test_nested_cell_is_rejected() {
        let body = r#"{"sheets": {"S": [{"a": [1, 2]}]}}"#;
        assert!(serde_json::from_str::<SummaryData>(body).is_err());
    }
}
