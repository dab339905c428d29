//! The cache: entity id to sparse attribute set.
//!
//! Writes (`add`, `load_page`) are only accepted inside a transaction; reads
//! are allowed at any time and see writes immediately. The cache is not
//! internally synchronized; wrap it in a lock for shared use.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use smallcache_foundation::{AttributeValue, ErrorContext, PlainValue, Result, StringPool};

use crate::config::CacheConfig;
use crate::entity::SparseEntity;
use crate::page::{PageResponse, parse_page};
use crate::schema::AttributeSchema;
use crate::stats::CacheStats;
use crate::transaction::{SweepReport, TransactionManager};

/// In-memory store of sparse per-entity attribute sets.
#[derive(Debug)]
pub struct Cache {
    schema: AttributeSchema,
    entities: HashMap<String, SparseEntity>,
    pool: StringPool,
    transactions: TransactionManager,
    config: CacheConfig,
}

impl Cache {
    /// Creates a cache for the given attribute names with default settings.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `names` is empty or has more than
    /// [`MAX_ATTRIBUTES`](crate::MAX_ATTRIBUTES) entries.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(names, CacheConfig::default())
    }

    /// Creates a cache with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the attribute names cannot form a schema.
    pub fn with_config<I, S>(names: I, config: CacheConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schema = AttributeSchema::new(names)?;
        if schema.has_duplicates() {
            warn!(
                attributes = schema.len(),
                "duplicate attribute names; later occurrences share the first ordinal"
            );
        }

        let mut cache = Self {
            schema,
            entities: HashMap::new(),
            pool: StringPool::new(),
            transactions: TransactionManager::new(),
            config,
        };
        cache.reserve_entities(cache.config.initial_capacity, "initial_capacity");
        Ok(cache)
    }

    /// Returns the attribute schema.
    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the cache holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true if an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Returns the stored entity for an id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&SparseEntity> {
        self.entities.get(id)
    }

    /// Returns the number of distinct pooled strings.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Returns true if a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.transactions.is_open()
    }

    /// Returns the number of transactions begun so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.transactions.generation()
    }

    // --- Transactions ---

    /// Opens a refresh transaction.
    ///
    /// Room for `estimated_count` additional entities is reserved up front
    /// when possible; an unsatisfiable estimate is logged and ignored. With `remove_stale`, entities not written before
    /// [`Cache::end_transaction`] are dropped.
    ///
    /// # Errors
    ///
    /// Returns a state error if a transaction is already open.
    pub fn begin_transaction(&mut self, estimated_count: usize, remove_stale: bool) -> Result<()> {
        let open = self
            .transactions
            .begin(self.entities.len(), remove_stale)
            .map_err(|e| e.with_context(ErrorContext::new().with_operation("begin_transaction")))?;

        self.reserve_entities(estimated_count, "estimated_count");

        debug!(
            generation = open.generation,
            baseline = open.baseline_len,
            estimated_count,
            remove_stale,
            "transaction opened"
        );
        Ok(())
    }

    /// Closes the open transaction and sweeps stale entities.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open.
    #[instrument(skip(self), fields(generation = self.transactions.generation()))]
    pub fn end_transaction(&mut self) -> Result<SweepReport> {
        let mut report = self
            .transactions
            .end(&mut self.entities)
            .map_err(|e| e.with_context(ErrorContext::new().with_operation("end_transaction")))?;

        if self.config.purge_unused_strings {
            report.purged_strings = self.pool.purge_unused();
        }

        info!(
            refreshed = report.refreshed,
            kept_stale = report.kept_stale,
            removed = report.removed,
            purged_strings = report.purged_strings,
            "transaction closed"
        );
        Ok(report)
    }

    // --- Writes ---

    /// Writes the full attribute set of one entity.
    ///
    /// The entity's previous content is replaced entirely; names outside the
    /// schema are dropped.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open.
    pub fn add<I, K>(&mut self, id: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, PlainValue)>,
        K: AsRef<str>,
    {
        self.transactions.require_open().map_err(|e| {
            e.with_context(ErrorContext::new().with_operation("add").with_entity(id))
        })?;

        let slots = self.slots(attributes);
        self.write(id.to_owned(), slots);
        Ok(())
    }

    /// Parses a page document and applies every entity in it.
    ///
    /// Returns the total page count the page declares.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open, or a parse error if
    /// the document is malformed; in both cases nothing is applied.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn load_page(&mut self, text: &str) -> Result<usize> {
        self.transactions
            .require_open()
            .map_err(|e| e.with_context(ErrorContext::new().with_operation("load_page")))?;

        let page = parse_page(text).map_err(|e| {
            warn!(error = %e, "rejected malformed page");
            e.with_context(ErrorContext::new().with_operation("load_page"))
        })?;
        self.apply_page(page)
    }

    /// Applies an already parsed page.
    ///
    /// Returns the total page count the page declares.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open.
    pub fn apply_page(&mut self, page: PageResponse) -> Result<usize> {
        self.transactions
            .require_open()
            .map_err(|e| e.with_context(ErrorContext::new().with_operation("apply_page")))?;

        let pages = page.pages();
        let result = page.result;
        if self.config.reserve_from_page_count {
            self.reserve_entities(result.count, "page count");
        }

        debug!(
            page = result.pagination.page,
            pages,
            entities = result.data.len(),
            "applying page"
        );

        for item in result.data {
            let attributes = item
                .attributes
                .into_iter()
                .map(|attr| (attr.id, PlainValue::from(attr.value)));
            let slots = self.slots(attributes);
            self.write(item.id, slots);
        }
        Ok(pages)
    }

    // --- Reads ---

    /// Looks up named attributes of one entity.
    ///
    /// Returns one value per requested name, in request order; unknown names
    /// yield [`PlainValue::Absent`]. An unknown id yields an empty vector.
    #[must_use]
    pub fn get_one<S: AsRef<str>>(&self, id: &str, names: &[S]) -> Vec<PlainValue> {
        let Some(entity) = self.entities.get(id) else {
            return Vec::new();
        };

        names
            .iter()
            .map(|name| {
                self.schema
                    .ordinal(name.as_ref())
                    .and_then(|ordinal| entity.lookup(ordinal))
                    .map_or(PlainValue::Absent, AttributeValue::to_plain)
            })
            .collect()
    }

    /// Looks up named attributes of several entities, in `ids` order.
    #[must_use]
    pub fn get_many<I: AsRef<str>, S: AsRef<str>>(
        &self,
        ids: &[I],
        names: &[S],
    ) -> Vec<Vec<PlainValue>> {
        ids.iter().map(|id| self.get_one(id.as_ref(), names)).collect()
    }

    /// Returns a snapshot of every entity id, in no particular order.
    #[must_use]
    pub fn get_all_ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    // --- Introspection ---

    /// Collects memory and usage statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats::collect(&self.entities, &self.pool, &self.config)
    }

    /// Renders [`Cache::stats`] as a table and logs it at debug level.
    #[must_use]
    pub fn print_stats(&self) -> String {
        let text = self.stats().to_string();
        debug!("cache stats\n{text}");
        text
    }

    // --- Private helpers ---

    /// Translates named values into a slot vector indexed by ordinal.
    fn slots<I, K>(&mut self, attributes: I) -> Vec<Option<AttributeValue>>
    where
        I: IntoIterator<Item = (K, PlainValue)>,
        K: AsRef<str>,
    {
        let mut slots = vec![None; self.schema.len()];
        for (name, value) in attributes {
            if let Some(ordinal) = self.schema.ordinal(name.as_ref()) {
                slots[ordinal.index()] = Some(AttributeValue::from_plain(value, &mut self.pool));
            }
        }
        slots
    }

    /// Reserves entity room from a size hint. Hints are untrusted, so a
    /// failed reservation is logged and the cache grows on demand instead.
    fn reserve_entities(&mut self, additional: usize, hint: &'static str) {
        if additional == 0 {
            return;
        }
        if let Err(error) = self.entities.try_reserve(additional) {
            warn!(hint, additional, %error, "ignoring unsatisfiable size hint");
        }
    }

    fn write(&mut self, id: String, slots: Vec<Option<AttributeValue>>) {
        self.entities.entry(id).or_default().rebuild(slots);
    }
}
