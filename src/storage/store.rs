/// Append-only JSON store of analysis records
///
/// The file holds a JSON array, oldest record first, capped at `max_records`.
/// Every append rewrites the file through a temp file + rename so readers
/// never observe a partially written array.
use crate::analysis::types::AnalysisRecord;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::logger::{self, LogTag};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const DEFAULT_PAGE_LIMIT: usize = 50;
pub const MAX_PAGE_LIMIT: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysesPage {
    /// Newest first
    pub analyses: Vec<AnalysisRecord>,
    pub total: usize,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct AnalysisStore {
    path: PathBuf,
    max_records: usize,
    lock: RwLock<()>,
}

impl AnalysisStore {
    pub fn new(path: PathBuf, max_records: usize) -> Self {
        Self {
            path,
            max_records: max_records.max(1),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, evicting the oldest beyond the cap
    pub async fn append(&self, record: AnalysisRecord) -> AnalysisResult<()> {
        let _guard = self.lock.write().await;

        let mut records = match self.load().await {
            Ok(records) => records,
            Err(e) => {
                logger::warning(
                    LogTag::Storage,
                    &format!("Could not read existing analyses, starting fresh: {}", e),
                );
                Vec::new()
            }
        };

        records.push(record);
        if records.len() > self.max_records {
            let excess = records.len() - self.max_records;
            records.drain(..excess);
        }

        let count = records.len();
        self.persist(records).await?;
        logger::debug(
            LogTag::Storage,
            &format!("Stored analysis ({} record(s) on disk)", count),
        );
        Ok(())
    }

    /// Newest-first page. `limit` is clamped to 1..=1000.
    pub async fn get_analyses(&self, limit: usize, offset: usize) -> AnalysisResult<AnalysesPage> {
        let _guard = self.lock.read().await;
        let records = self.load().await?;

        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        Ok(AnalysesPage {
            total: records.len(),
            last_updated: records.last().map(|r| r.timestamp),
            analyses: records.into_iter().rev().skip(offset).take(limit).collect(),
        })
    }

    /// Most recent record for a coin id
    pub async fn get_latest_for_token(&self, coin_id: i64) -> AnalysisResult<Option<AnalysisRecord>> {
        let _guard = self.lock.read().await;
        let records = self.load().await?;
        Ok(records.into_iter().rev().find(|r| r.coin_id == coin_id))
    }

    async fn load(&self) -> AnalysisResult<Vec<AnalysisRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AnalysisError::storage("read", e.to_string())),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| AnalysisError::storage("parse", e.to_string()))
    }

    async fn persist(&self, records: Vec<AnalysisRecord>) -> AnalysisResult<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &records))
            .await
            .map_err(|e| AnalysisError::storage("append", e.to_string()))?
    }
}

fn write_atomic(path: &Path, records: &[AnalysisRecord]) -> AnalysisResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| AnalysisError::storage("append", e.to_string()))?;

    let json = serde_json::to_vec_pretty(records)
        .map_err(|e| AnalysisError::storage("serialize", e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| AnalysisError::storage("append", e.to_string()))?;
    tmp.write_all(&json)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| AnalysisError::storage("append", e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| AnalysisError::storage("append", e.error.to_string()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::types::{DetectionContext, MarketDataSummary};
    use chrono::Duration;

    pub fn record(coin_id: i64, seq: i64) -> AnalysisRecord {
        AnalysisRecord {
            coin_id,
            name: format!("Token {}", coin_id),
            symbol: format!("T{}", coin_id),
            market_data: MarketDataSummary {
                current_price: Some(seq as f64),
                ..MarketDataSummary::default()
            },
            detection_context: DetectionContext {
                original_text: format!("message {}", seq),
                matched_term: format!("Token {}", coin_id),
                confidence: "high".to_string(),
            },
            ai_analysis: Some(format!("Summary: {}\nScore: 3/5", seq)),
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::seconds(seq),
        }
    }

    fn store_in(dir: &tempfile::TempDir, max_records: usize) -> AnalysisStore {
        AnalysisStore::new(dir.path().join("data").join("analyses.json"), max_records)
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 1000);

        let page = store.get_analyses(50, 0).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.analyses.is_empty());
        assert!(page.last_updated.is_none());
        assert!(store.get_latest_for_token(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_and_page_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 1000);
        for seq in 0..5 {
            store.append(record(seq % 2 + 1, seq)).await.unwrap();
        }

        let page = store.get_analyses(2, 1).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.last_updated, Some(record(1, 4).timestamp));
        let seqs: Vec<Option<f64>> = page.analyses.iter().map(|r| r.market_data.current_price).collect();
        assert_eq!(seqs, vec![Some(3.0), Some(2.0)]);

        let latest = store.get_latest_for_token(2).await.unwrap().unwrap();
        assert_eq!(latest.market_data.current_price, Some(3.0));

        let json: serde_json::Value = serde_json::to_value(&page).unwrap();
        assert!(json.get("lastUpdated").is_some());
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 3);
        for seq in 0..5 {
            store.append(record(seq, seq)).await.unwrap();
        }

        let page = store.get_analyses(50, 0).await.unwrap();
        let ids: Vec<i64> = page.analyses.iter().map(|r| r.coin_id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_thousand_and_first_record_evicts_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 1000);

        let seeded: Vec<AnalysisRecord> = (0..1000).map(|seq| record(seq, seq)).collect();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), serde_json::to_vec(&seeded).unwrap()).unwrap();

        store.append(record(1000, 1000)).await.unwrap();

        let page = store.get_analyses(1000, 0).await.unwrap();
        assert_eq!(page.total, 1000);
        assert_eq!(page.analyses.first().unwrap().coin_id, 1000);
        assert_eq!(page.analyses.last().unwrap().coin_id, 1);
        assert!(store.get_latest_for_token(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 10);
        store.append(record(1, 1)).await.unwrap();
        store.append(record(2, 2)).await.unwrap();

        assert_eq!(store.get_analyses(0, 0).await.unwrap().analyses.len(), 1);
        assert!(store.get_analyses(5, 10).await.unwrap().analyses.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_reads_and_resets_on_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 10);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"{ not an array").unwrap();

        let err = store.get_analyses(10, 0).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Storage { .. }));

        store.append(record(7, 1)).await.unwrap();
        assert_eq!(store.get_analyses(10, 0).await.unwrap().total, 1);
    }
}
