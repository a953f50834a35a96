//! history.rs: bounded in-memory log of recent scoring and prediction events.
//!
//! Entries never hold raw user input: only an anonymized id, the outcome and
//! a timestamp.

use serde::Serialize;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Sentiment,
    Prediction,
    Feedback,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub kind: EventKind,
    /// Short hash of the request payload.
    pub id: String,
    /// Method used (sentiment) or predicted label (prediction).
    pub label: String,
    /// Sentiment score, or max class probability for predictions.
    pub score: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub crisis: bool,
}

impl HistoryEntry {
    pub fn new(kind: EventKind, id: String, label: impl Into<String>, score: f64) -> Self {
        Self {
            ts_unix: now_unix(),
            kind,
            id,
            label: label.into(),
            score,
            crisis: false,
        }
    }

    pub fn crisis(mut self, flag: bool) -> Self {
        self.crisis = flag;
        self
    }
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 10_000);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap)),
            cap,
        }
    }

    pub fn push(&self, entry: HistoryEntry) {
        let mut v = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let start = v.len().saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First 6 bytes of SHA-256 as hex. Safe to log.
pub fn anon_hash(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_entries() {
        let h = History::with_capacity(3);
        for i in 0..5 {
            h.push(HistoryEntry::new(
                EventKind::Sentiment,
                format!("id{i}"),
                "text_analysis",
                i as f64 / 10.0,
            ));
        }
        assert_eq!(h.len(), 3);
        let ids: Vec<_> = h.snapshot_last_n(10).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["id2", "id3", "id4"]);
        assert_eq!(h.snapshot_last_n(1)[0].id, "id4");
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash(b"I feel great");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash(b"I feel great"));
        assert_ne!(a, anon_hash(b"I feel awful"));
    }

    #[test]
    fn crisis_flag_only_serialized_when_set() {
        let calm = HistoryEntry::new(EventKind::Prediction, "x".into(), "High", 0.9);
        let v = serde_json::to_value(&calm).unwrap();
        assert!(v.get("crisis").is_none());
        let v = serde_json::to_value(calm.crisis(true)).unwrap();
        assert_eq!(v["crisis"], true);
    }
}
