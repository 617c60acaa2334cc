//! Link store
//!
//! Owns every link record together with its click history. One `RwLock`
//! guards both, so a record and its history are always created, updated and
//! removed together and `clicks` never drifts from the history length.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::LinksConfig;
use crate::errors::{Result, SnaplinkError};
use crate::utils::url_validator::{validate_url, validation_error_message};
use crate::utils::{generate_random_code, is_reserved_code, is_valid_short_code};

use super::models::{AccessRecord, LinkDetails, LinkRecord, StoreStats};

/// Produces a candidate code of the requested length
pub type CodeGenerator = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Knobs the store needs from configuration
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub code_length: usize,
    pub max_custom_code_length: usize,
    pub max_generate_attempts: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from(&LinksConfig::default())
    }
}

impl From<&LinksConfig> for StoreSettings {
    fn from(config: &LinksConfig) -> Self {
        Self {
            code_length: config.code_length,
            max_custom_code_length: config.max_custom_code_length,
            max_generate_attempts: config.max_generate_attempts.max(1),
        }
    }
}

struct LinkEntry {
    /// Insertion sequence, used to list in creation order
    seq: u64,
    record: LinkRecord,
    history: Vec<AccessRecord>,
}

#[derive(Default)]
struct StoreInner {
    links: HashMap<String, LinkEntry>,
    next_seq: u64,
}

pub struct LinkStore {
    inner: RwLock<StoreInner>,
    settings: StoreSettings,
    generator: CodeGenerator,
}

impl Default for LinkStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl std::fmt::Debug for LinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStore")
            .field("links", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl LinkStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_generator(settings, Arc::new(generate_random_code))
    }

    /// Build a store with a custom code generator
    pub fn with_generator(settings: StoreSettings, generator: CodeGenerator) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            settings,
            generator,
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Create a link for `original_url`
    ///
    /// A blank `custom_code` counts as absent. Nothing is stored on failure.
    pub fn create(&self, original_url: &str, custom_code: Option<&str>) -> Result<LinkRecord> {
        validate_url(original_url)
            .map_err(|e| SnaplinkError::invalid_url(validation_error_message(&e)))?;

        let custom_code = custom_code.map(str::trim).filter(|c| !c.is_empty());
        if let Some(code) = custom_code
            && (!is_valid_short_code(code, self.settings.max_custom_code_length)
                || is_reserved_code(code))
        {
            return Err(SnaplinkError::validation("Invalid custom code"));
        }

        // 检查与插入在同一把写锁内完成
        let mut inner = self.inner.write();

        let (code, is_custom) = match custom_code {
            Some(code) => {
                if inner.links.contains_key(code) {
                    return Err(SnaplinkError::duplicate_code("Custom code already exists"));
                }
                (code.to_string(), true)
            }
            None => (self.generate_unused_code(&inner.links)?, false),
        };

        let record = LinkRecord::new(code.clone(), original_url.to_string(), is_custom);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.links.insert(
            code,
            LinkEntry {
                seq,
                record: record.clone(),
                history: Vec::new(),
            },
        );

        Ok(record)
    }

    fn generate_unused_code(&self, links: &HashMap<String, LinkEntry>) -> Result<String> {
        for attempt in 1..=self.settings.max_generate_attempts {
            let candidate = (self.generator)(self.settings.code_length);
            if !links.contains_key(&candidate) {
                return Ok(candidate);
            }
            warn!(
                "Generated code '{}' collided (attempt {}/{})",
                candidate, attempt, self.settings.max_generate_attempts
            );
        }

        Err(SnaplinkError::internal(format!(
            "Could not generate an unused code after {} attempts",
            self.settings.max_generate_attempts
        )))
    }

    pub fn get(&self, code: &str) -> Option<LinkRecord> {
        self.inner.read().links.get(code).map(|e| e.record.clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.inner.read().links.contains_key(code)
    }

    /// Record plus click history
    pub fn details(&self, code: &str) -> Option<LinkDetails> {
        self.inner.read().links.get(code).map(|e| LinkDetails {
            link: e.record.clone(),
            click_history: e.history.clone(),
        })
    }

    /// All links in insertion order
    pub fn list(&self) -> Vec<LinkRecord> {
        let inner = self.inner.read();
        let mut entries: Vec<&LinkEntry> = inner.links.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.record.clone()).collect()
    }

    /// Remove a link and its click history
    pub fn delete(&self, code: &str) -> Result<()> {
        match self.inner.write().links.remove(code) {
            Some(entry) => {
                debug!(
                    "Removed link {} with {} recorded clicks",
                    code,
                    entry.history.len()
                );
                Ok(())
            }
            None => Err(SnaplinkError::not_found("URL not found")),
        }
    }

    /// Count one access: bump `clicks` and append to the history
    ///
    /// Returns the updated record.
    pub fn record_access(
        &self,
        code: &str,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Result<LinkRecord> {
        self.record_access_with(code, user_agent, ip, |_| Ok(()))
            .map(|(record, ())| record)
    }

    /// Like [`record_access`](Self::record_access), but `prepare` sees the
    /// record first under the same write lock
    ///
    /// When `prepare` fails the access is not counted.
    pub fn record_access_with<T>(
        &self,
        code: &str,
        user_agent: Option<String>,
        ip: Option<String>,
        prepare: impl FnOnce(&LinkRecord) -> Result<T>,
    ) -> Result<(LinkRecord, T)> {
        let mut inner = self.inner.write();
        let entry = inner
            .links
            .get_mut(code)
            .ok_or_else(|| SnaplinkError::not_found("URL not found"))?;

        let prepared = prepare(&entry.record)?;

        entry.history.push(AccessRecord::new(user_agent, ip));
        entry.record.clicks += 1;
        debug_assert_eq!(entry.record.clicks, entry.history.len());

        Ok((entry.record.clone(), prepared))
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        StoreStats {
            total_urls: inner.links.len(),
            total_clicks: inner.links.values().map(|e| e.record.clicks).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
