//! The lens façade
//!
//! A lens is the one object callers touch: schema + engine + context in,
//! records out. Every operation is compile → execute → (for reads) decode;
//! the lens itself is stateless between calls.

use crate::engine::{EngineContext, EngineError, QueryEngine};
use crate::error::Result;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;
use veld_codec::{decode, record_from_json, DecodeOptions, EncodeOptions};
use veld_graph_ir::{LiteralValue, Record, Term};
use veld_schema::Schema;
use veld_sparql::{
    compile_ask, compile_by_ids, compile_count, compile_delete, compile_find, compile_insert,
    compile_update, Page,
};

/// Lens configuration
#[derive(Clone, Debug)]
pub struct LensOptions {
    /// Preferred language for encoding and decoding plain strings
    pub language: Option<Arc<str>>,
    /// Default page size for `find` when the caller gives no `take`
    pub take: u64,
}

impl Default for LensOptions {
    fn default() -> Self {
        Self {
            language: None,
            take: 1000,
        }
    }
}

/// Schema-directed view over a query engine
pub struct Lens<E> {
    schema: Arc<Schema>,
    engine: E,
    context: EngineContext,
    opts: LensOptions,
}

impl<E: QueryEngine> Lens<E> {
    /// Create a lens over an engine with default context and options
    pub fn new(schema: Arc<Schema>, engine: E) -> Self {
        Self {
            schema,
            engine,
            context: EngineContext::default(),
            opts: LensOptions::default(),
        }
    }

    /// Replace the engine context
    pub fn with_context(mut self, context: EngineContext) -> Self {
        self.context = context;
        self
    }

    /// Replace the lens options
    pub fn with_options(mut self, opts: LensOptions) -> Self {
        self.opts = opts;
        self
    }

    /// The lens's schema
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn decode_opts(&self) -> DecodeOptions {
        DecodeOptions {
            language: self.opts.language.clone(),
        }
    }

    fn encode_opts(&self) -> EncodeOptions {
        EncodeOptions {
            language: self.opts.language.clone(),
        }
    }

    /// Fetch entities matching the shape, optionally filtered and paginated
    ///
    /// Pagination is entity-granular: `take`/`skip` count entities, not
    /// result rows. Without an explicit `take` the lens's default applies.
    pub async fn find(
        &self,
        search: Option<&JsonValue>,
        page: Page,
    ) -> Result<Vec<Arc<Record>>> {
        let page = Page {
            take: page.take.or(Some(self.opts.take)),
            skip: page.skip,
        };
        let query = compile_find(self.schema.as_ref(), search, page)?;
        debug!(take = ?page.take, skip = ?page.skip, "lens find");
        let graph = self.engine.construct(&query, &self.context).await?;
        Ok(decode(&graph, &self.schema, self.decode_opts())?)
    }

    /// Fetch one entity by identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Arc<Record>>> {
        let records = self.find_by_ids(&[id]).await?;
        Ok(records
            .into_iter()
            .find(|r| r.id().map(|i| i.as_ref()) == Some(id)))
    }

    /// Fetch entities for an explicit identifier list
    pub async fn find_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Record>>> {
        let query = compile_by_ids(self.schema.as_ref(), ids);
        debug!(ids = ids.len(), "lens find_by_ids");
        let graph = self.engine.construct(&query, &self.context).await?;
        Ok(decode(&graph, &self.schema, self.decode_opts())?)
    }

    /// Count entities matching the shape and optional search filters
    pub async fn count(&self, search: Option<&JsonValue>) -> Result<u64> {
        let query = compile_count(self.schema.as_ref(), search)?;
        let rows = self.engine.select(&query, &self.context).await?;
        let term = rows
            .first()
            .and_then(|row| row.get("count"))
            .ok_or_else(|| EngineError::response("count query returned no ?count binding"))?;
        match term.as_literal() {
            Some((LiteralValue::Integer(n), _, _)) if *n >= 0 => Ok(*n as u64),
            _ => Err(EngineError::response(format!(
                "?count bound to a non-integer term {term}"
            ))
            .into()),
        }
    }

    /// Check whether a subject matches the required shape
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let query = compile_ask(self.schema.as_ref(), id);
        Ok(self.engine.ask(&query, &self.context).await?)
    }

    /// Insert fully populated records
    pub async fn insert(&self, records: &[Record]) -> Result<()> {
        let query = compile_insert(self.schema.as_ref(), records, self.encode_opts())?;
        debug!(records = records.len(), "lens insert");
        Ok(self.engine.update(&query, &self.context).await?)
    }

    /// Insert entities given as JSON documents
    pub async fn insert_json(&self, documents: &[JsonValue]) -> Result<()> {
        let records = documents
            .iter()
            .map(|doc| record_from_json(doc, self.schema.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.insert(&records).await
    }

    /// Apply partial updates to existing entities
    pub async fn update(&self, entities: &[JsonValue]) -> Result<()> {
        let query = compile_update(self.schema.as_ref(), entities, self.encode_opts())?;
        debug!(entities = entities.len(), "lens update");
        Ok(self.engine.update(&query, &self.context).await?)
    }

    /// Remove every statement a subject holds
    pub async fn delete(&self, id: &str) -> Result<()> {
        let query = compile_delete(id);
        Ok(self.engine.update(&query, &self.context).await?)
    }
}
