//! Airtable-backed record store. Each attendance record is one table row
//! whose fields are `Email`, `Action`, `Time` and `Location`.

use crate::attendance::record::StoredRecord;
use crate::config::AirtableSettings;
use crate::error::StoreError;
use crate::store::RecordStore;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest page Airtable returns from a single list call.
const MAX_PAGE_SIZE: usize = 100;

pub struct AirtableStore {
    client: reqwest::Client,
    settings: AirtableSettings,
}

#[derive(Serialize)]
struct CreateRecordBody<'a> {
    fields: &'a StoredRecord,
    typecast: bool,
}

#[derive(Deserialize)]
struct ListRecordsResponse {
    records: Vec<AirtableRecord>,
}

#[derive(Deserialize)]
struct AirtableRecord {
    fields: StoredRecord,
}

impl AirtableStore {
    pub fn new(settings: AirtableSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.base_id,
            self.settings.table_id
        )
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected(format!("{}: {}", status, body)))
    }
}

/// Builds the `filterByFormula` expression selecting one user's rows.
pub fn email_filter_formula(email: &str) -> String {
    let escaped = email.to_lowercase().replace('\\', "\\\\").replace('\'', "\\'");
    format!("LOWER({{Email}}) = '{}'", escaped)
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn append(&self, record: &StoredRecord) -> Result<(), StoreError> {
        let body = CreateRecordBody {
            fields: record,
            typecast: true,
        };

        let response = self
            .client
            .post(self.table_url())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn query_recent(
        &self,
        email: &str,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = limit.min(MAX_PAGE_SIZE).to_string();

        let response = self
            .client
            .get(self.table_url())
            .bearer_auth(&self.settings.api_key)
            .query(&[
                ("filterByFormula", email_filter_formula(email).as_str()),
                ("maxRecords", limit.as_str()),
                ("pageSize", limit.as_str()),
                ("sort[0][field]", "Time"),
                ("sort[0][direction]", "desc"),
            ])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let list: ListRecordsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(list.records.into_iter().map(|record| record.fields).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeAirtable {
        rows: Arc<Mutex<Vec<Value>>>,
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer test-key")
    }

    async fn create(
        State(fake): State<FakeAirtable>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "AUTHENTICATION_REQUIRED"})));
        }
        let fields = body["fields"].clone();
        fake.rows.lock().unwrap().push(fields.clone());
        (StatusCode::OK, Json(json!({"id": "rec1", "fields": fields})))
    }

    async fn list(
        State(fake): State<FakeAirtable>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "AUTHENTICATION_REQUIRED"})));
        }
        fake.queries.lock().unwrap().push(params.clone());

        // Only the email equality formula is emulated here.
        let wanted = params["filterByFormula"]
            .rsplit('\'')
            .nth(1)
            .unwrap_or_default()
            .to_string();
        let max: usize = params["maxRecords"].parse().unwrap();

        let mut rows: Vec<Value> = fake
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row["Email"].as_str().unwrap().to_lowercase() == wanted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b["Time"].as_str().cmp(&a["Time"].as_str()));
        let records: Vec<Value> = rows
            .into_iter()
            .take(max)
            .map(|fields| json!({"id": "rec", "createdTime": "2025-01-01T00:00:00.000Z", "fields": fields}))
            .collect();

        (StatusCode::OK, Json(json!({ "records": records })))
    }

    async fn spawn_fake() -> (String, FakeAirtable) {
        let fake = FakeAirtable::default();
        let app = Router::new()
            .route("/v0/{base}/{table}", post(create).get(list))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v0", addr), fake)
    }

    fn settings(api_url: &str, api_key: &str) -> AirtableSettings {
        AirtableSettings {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            base_id: "appBase".to_string(),
            table_id: "tblAttendance".to_string(),
            timeout_secs: 5,
        }
    }

    fn record(action: &str, time: &str) -> StoredRecord {
        StoredRecord {
            email: "alice@decathlon.com".to_string(),
            action: action.to_string(),
            time: time.to_string(),
            location: "22.3193,114.1694".to_string(),
        }
    }

    #[test]
    fn filter_formula_escapes_quotes() {
        assert_eq!(
            email_filter_formula("Alice@Decathlon.com"),
            "LOWER({Email}) = 'alice@decathlon.com'"
        );
        assert_eq!(
            email_filter_formula("o'neil@decathlon.com"),
            "LOWER({Email}) = 'o\\'neil@decathlon.com'"
        );
    }

    #[tokio::test]
    async fn appends_and_reads_back_newest_first() {
        let (url, fake) = spawn_fake().await;
        let store = AirtableStore::new(settings(&url, "test-key")).unwrap();

        store.append(&record("上班", "2025-03-14 09:00:00")).await.unwrap();
        store.append(&record("午飯開始", "2025-03-14 12:00:00")).await.unwrap();

        let recent = store.query_recent("alice@decathlon.com", 5).await.unwrap();
        assert_eq!(recent[0], record("午飯開始", "2025-03-14 12:00:00"));
        assert_eq!(recent.len(), 2);

        let latest = store.query_latest("Alice@Decathlon.com").await.unwrap();
        assert_eq!(latest.as_deref(), Some("午飯開始"));

        let queries = fake.queries.lock().unwrap();
        let last = queries.last().unwrap();
        assert_eq!(last["sort[0][field]"], "Time");
        assert_eq!(last["sort[0][direction]"], "desc");
        assert_eq!(last["maxRecords"], "1");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_as_store_error() {
        let (url, fake) = spawn_fake().await;
        let store = AirtableStore::new(settings(&url, "wrong-key")).unwrap();

        let err = store.append(&record("上班", "2025-03-14 09:00:00")).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(fake.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        let store = AirtableStore::new(settings("http://127.0.0.1:9/v0", "test-key")).unwrap();

        let err = store.query_recent("alice@decathlon.com", 5).await.unwrap_err();
        assert!(matches!(err, StoreError::Http(_)));
    }
}
