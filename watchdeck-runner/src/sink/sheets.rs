//! Google Sheets sink — full replace over the values API.
//!
//! The write layout mirrors the spreadsheet the tool maintains: row 1 holds
//! the freshness marker, the header starts at row 2, data below. A replace is
//! three requests: `values:clear` on the whole tab, then two `values:update`
//! calls (marker, header+rows). Authentication is a pre-issued bearer token
//! from the environment; acquiring one is outside this tool's scope.

use super::{SinkError, TableSink};
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Environment variable holding the OAuth bearer token.
pub const TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";

#[derive(Debug)]
pub struct SheetsSink {
    client: reqwest::blocking::Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsSink {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, SinkError> {
        let spreadsheet_id = spreadsheet_id.into();
        let token = token.into();
        if spreadsheet_id.is_empty() {
            return Err(SinkError::InvalidDestination {
                destination: String::new(),
                message: "spreadsheet_id is empty".into(),
            });
        }
        if token.is_empty() {
            return Err(SinkError::MissingCredentials(format!(
                "empty bearer token (set {TOKEN_ENV})"
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SinkError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id,
            token,
        })
    }

    /// Read the bearer token from the environment.
    pub fn from_env(spreadsheet_id: impl Into<String>) -> Result<Self, SinkError> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| SinkError::MissingCredentials(format!("{TOKEN_ENV} is not set")))?;
        Self::new(spreadsheet_id, token)
    }

    /// Tab names may contain spaces ("Top 10"); escape just enough for a URL path.
    fn encode_tab(tab: &str) -> String {
        tab.replace(' ', "%20")
    }

    fn clear_url(&self, tab: &str) -> String {
        format!(
            "{}/{}/values/{}:clear",
            self.base_url,
            self.spreadsheet_id,
            Self::encode_tab(tab)
        )
    }

    fn update_url(&self, tab: &str, anchor: &str) -> String {
        format!(
            "{}/{}/values/{}!{}?valueInputOption=RAW",
            self.base_url,
            self.spreadsheet_id,
            Self::encode_tab(tab),
            anchor
        )
    }

    fn update_body(tab: &str, anchor: &str, values: &[Vec<String>]) -> serde_json::Value {
        json!({
            "range": format!("{tab}!{anchor}"),
            "majorDimension": "ROWS",
            "values": values,
        })
    }

    fn check(resp: reqwest::blocking::Response, destination: &str) -> Result<(), SinkError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let message = resp.text().unwrap_or_default();
        match status.as_u16() {
            400 => Err(SinkError::InvalidDestination {
                destination: destination.to_string(),
                message,
            }),
            401 => Err(SinkError::MissingCredentials(message)),
            code => Err(SinkError::Http {
                status: code,
                message,
            }),
        }
    }

    fn clear(&self, destination: &str) -> Result<(), SinkError> {
        let resp = self
            .client
            .post(self.clear_url(destination))
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Self::check(resp, destination)
    }

    fn update(
        &self,
        destination: &str,
        anchor: &str,
        values: &[Vec<String>],
    ) -> Result<(), SinkError> {
        let resp = self
            .client
            .put(self.update_url(destination, anchor))
            .bearer_auth(&self.token)
            .json(&Self::update_body(destination, anchor, values))
            .send()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Self::check(resp, destination)
    }
}

impl TableSink for SheetsSink {
    fn name(&self) -> &str {
        "google_sheets"
    }

    fn replace_table(
        &self,
        destination: &str,
        header: &[String],
        rows: &[Vec<String>],
        freshness_marker: &str,
    ) -> Result<(), SinkError> {
        self.clear(destination)?;
        self.update(destination, "A1", &[vec![freshness_marker.to_string()]])?;

        let mut values = Vec::with_capacity(rows.len() + 1);
        values.push(header.to_vec());
        values.extend(rows.iter().cloned());
        self.update(destination, "A2", &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> SheetsSink {
        SheetsSink::new("sheet-id-123", "token-abc").unwrap()
    }

    #[test]
    fn rejects_empty_spreadsheet_id() {
        let err = SheetsSink::new("", "token").unwrap_err();
        assert!(matches!(err, SinkError::InvalidDestination { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn rejects_empty_token() {
        let err = SheetsSink::new("sheet-id", "").unwrap_err();
        assert!(matches!(err, SinkError::MissingCredentials(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn urls_target_the_values_api() {
        let sink = sink();
        assert_eq!(
            sink.clear_url("universe"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id-123/values/universe:clear"
        );
        assert_eq!(
            sink.update_url("universe", "A2"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id-123/values/universe!A2?valueInputOption=RAW"
        );
    }

    #[test]
    fn tab_names_with_spaces_are_encoded() {
        let sink = sink();
        assert!(sink.clear_url("Top 10").contains("Top%2010:clear"));
    }

    #[test]
    fn update_body_shape() {
        let body = SheetsSink::update_body(
            "universe",
            "A1",
            &[vec!["Last update".to_string()]],
        );
        assert_eq!(body["range"], "universe!A1");
        assert_eq!(body["majorDimension"], "ROWS");
        assert_eq!(body["values"][0][0], "Last update");
    }
}
