use crate::attendance::action::LabelSet;
use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub corporate_domain: String,
    pub recent_limit: usize,
    pub session_ttl_secs: u64,
    pub utc_offset_hours: i32,
    pub labels: LabelSet,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Sqlite { database_url: String },
    Airtable(AirtableSettings),
}

#[derive(Debug, Clone)]
pub struct AirtableSettings {
    pub api_url: String,
    pub api_key: String,
    pub base_id: String,
    pub table_id: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let server_addr = var("SERVER_ADDR", "0.0.0.0:8080");
        let corporate_domain = var("CORPORATE_DOMAIN", "decathlon.com");

        let recent_limit: usize = var("RECENT_LIMIT", "5")
            .parse()
            .map_err(|_| anyhow::anyhow!("RECENT_LIMIT must be a non-negative integer"))?;

        let session_ttl_secs: u64 = var("SESSION_TTL_SECS", "28800")
            .parse()
            .map_err(|_| anyhow::anyhow!("SESSION_TTL_SECS must be a number of seconds"))?;

        let utc_offset_hours: i32 = var("UTC_OFFSET_HOURS", "8")
            .parse()
            .map_err(|_| anyhow::anyhow!("UTC_OFFSET_HOURS must be an integer"))?;

        let labels_code = var("ACTION_LABELS", "zh");
        let labels = LabelSet::from_code(&labels_code)
            .ok_or_else(|| anyhow::anyhow!("Unsupported ACTION_LABELS value: {}", labels_code))?;

        let backend = var("STORE_BACKEND", "sqlite").to_lowercase();
        let store = match backend.as_str() {
            "sqlite" => StoreConfig::Sqlite {
                database_url: var("DATABASE_URL", "sqlite:attendance.db"),
            },
            "airtable" => StoreConfig::Airtable(AirtableSettings {
                api_url: var("AIRTABLE_API_URL", "https://api.airtable.com/v0"),
                api_key: required("AIRTABLE_API_KEY")?,
                base_id: required("AIRTABLE_BASE_ID")?,
                table_id: required("AIRTABLE_TABLE_ID")?,
                timeout_secs: var("STORE_TIMEOUT_SECS", "10")
                    .parse()
                    .map_err(|_| anyhow::anyhow!("STORE_TIMEOUT_SECS must be a number of seconds"))?,
            }),
            other => return Err(anyhow::anyhow!("Unsupported STORE_BACKEND: {}", other)),
        };

        Ok(Config {
            server_addr,
            corporate_domain,
            recent_limit,
            session_ttl_secs,
            utc_offset_hours,
            labels,
            store,
        })
    }
}
