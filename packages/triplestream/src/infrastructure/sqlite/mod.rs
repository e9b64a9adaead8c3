//! SQLite adapter for TripleSource
//!
//! One `statements` table, one row per statement. Terms are stored as a kind
//! code plus text; literals add datatype and language columns. Absent parts
//! (datatype of an IRI, context of a default-graph statement) are stored as
//! empty strings so the UNIQUE constraint also deduplicates them.
//!
//! Cursors page through matches with keyset pagination (`id > last_id ORDER
//! BY id LIMIT batch_size`), so no SQLite statement stays open between pulls
//! and the connection lock is only held while a page is fetched.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::{debug, trace, warn};

use crate::config::SqliteConfig;
use crate::domain::{BlankNode, Iri, Literal, Pattern, Resource, Statement, TripleSource, Value};
use crate::error::{EvalError, Result};
use crate::iteration::{BoxIteration, Iteration, IterationState};

const KIND_IRI: &str = "I";
const KIND_BLANK: &str = "B";
const KIND_LITERAL: &str = "L";
const KIND_NONE: &str = "";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS statements (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_kind TEXT NOT NULL,
    subject      TEXT NOT NULL,
    predicate    TEXT NOT NULL,
    object_kind  TEXT NOT NULL,
    object       TEXT NOT NULL,
    datatype     TEXT NOT NULL DEFAULT '',
    language     TEXT NOT NULL DEFAULT '',
    context_kind TEXT NOT NULL DEFAULT '',
    context      TEXT NOT NULL DEFAULT '',
    UNIQUE (subject_kind, subject, predicate, object_kind, object,
            datatype, language, context_kind, context)
);
CREATE INDEX IF NOT EXISTS idx_statements_sp ON statements (subject, predicate);
CREATE INDEX IF NOT EXISTS idx_statements_po ON statements (predicate, object);
CREATE INDEX IF NOT EXISTS idx_statements_ctx ON statements (context);
";

const COLUMNS: &str = "id, subject_kind, subject, predicate, object_kind, object, \
                       datatype, language, context_kind, context";

/// Statement store backed by a SQLite database
pub struct SqliteTripleSource {
    conn: Mutex<Connection>,
    batch_size: usize,
    open: Arc<AtomicUsize>,
}

impl SqliteTripleSource {
    /// Open (creating if needed) a database file
    pub fn open(path: impl AsRef<Path>, batch_size: usize) -> Result<Self> {
        let path = path.as_ref();
        debug!("sqlite source: opening {}", path.display());
        Self::with_connection(Connection::open(path)?, batch_size)
    }

    pub fn open_in_memory() -> Result<Self> {
        let defaults = SqliteConfig::default();
        debug!("sqlite source: opening in-memory database");
        Self::with_connection(Connection::open_in_memory()?, defaults.batch_size)
    }

    /// Open as described by `config` (in-memory when no path is set)
    pub fn from_config(config: &SqliteConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EvalError::evaluation(format!("Invalid sqlite config: {}", e)).with_source(e))?;
        match &config.path {
            Some(path) => Self::open(path, config.batch_size),
            None => {
                debug!("sqlite source: opening in-memory database");
                Self::with_connection(Connection::open_in_memory()?, config.batch_size)
            }
        }
    }

    fn with_connection(conn: Connection, batch_size: usize) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            batch_size: batch_size.max(1),
            open: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Insert a statement; returns `false` if it was already stored
    pub fn insert(&self, statement: &Statement) -> Result<bool> {
        let conn = self.conn.lock();
        let changed = insert_row(&conn, statement)?;
        Ok(changed)
    }

    /// Insert many statements in one transaction; returns how many were new
    pub fn insert_all<'s>(&self, statements: impl IntoIterator<Item = &'s Statement>) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut added = 0;
        for statement in statements {
            if insert_row(&tx, statement)? {
                added += 1;
            }
        }
        tx.commit()?;
        debug!("sqlite source: inserted {} statements", added);
        Ok(added)
    }

    /// Delete every statement matching `pattern`; returns how many were removed
    pub fn remove_matching(&self, pattern: &Pattern) -> Result<usize> {
        let compiled = CompiledPattern::new(pattern);
        let conn = self.conn.lock();
        let sql = format!("DELETE FROM statements WHERE {}", compiled.where_sql);
        let removed = conn.execute(&sql, params_from_iter(compiled.params.iter()))?;
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM statements", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Cursors handed out and not yet closed or dropped
    pub fn open_iterations(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl TripleSource for SqliteTripleSource {
    fn get_statements(&self, pattern: &Pattern) -> Result<BoxIteration<'_, Statement>> {
        let compiled = CompiledPattern::new(pattern);
        let sql = format!(
            "SELECT {} FROM statements WHERE id > ? AND {} ORDER BY id LIMIT ?",
            COLUMNS, compiled.where_sql
        );
        debug!("sqlite source: pattern {}", pattern);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SqliteCursor {
            store: self,
            sql,
            params: compiled.params,
            pattern: pattern.clone(),
            last_id: 0,
            buffer: VecDeque::new(),
            source_exhausted: false,
            state: IterationState::Open,
        }))
    }
}

fn insert_row(conn: &Connection, statement: &Statement) -> Result<bool> {
    let (s_kind, s_text) = resource_columns(statement.subject());
    let (o_kind, o_text, datatype, language) = value_columns(statement.object());
    let (c_kind, c_text) = context_columns(statement.context());
    let changed = conn.execute(
        "INSERT OR IGNORE INTO statements
            (subject_kind, subject, predicate, object_kind, object,
             datatype, language, context_kind, context)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            s_kind,
            s_text,
            statement.predicate().as_str(),
            o_kind,
            o_text,
            datatype,
            language,
            c_kind,
            c_text
        ],
    )?;
    Ok(changed == 1)
}

// ═══════════════════════════════════════════════════════════════════════════
// Term encoding
// ═══════════════════════════════════════════════════════════════════════════

fn resource_columns(resource: &Resource) -> (&'static str, String) {
    match resource {
        Resource::Iri(iri) => (KIND_IRI, iri.as_str().to_string()),
        Resource::BlankNode(node) => (KIND_BLANK, node.id().to_string()),
    }
}

fn context_columns(context: Option<&Resource>) -> (&'static str, String) {
    context.map_or((KIND_NONE, String::new()), resource_columns)
}

fn value_columns(value: &Value) -> (&'static str, String, String, String) {
    match value {
        Value::Iri(iri) => (KIND_IRI, iri.as_str().to_string(), String::new(), String::new()),
        Value::BlankNode(node) => (KIND_BLANK, node.id().to_string(), String::new(), String::new()),
        Value::Literal(lit) => (
            KIND_LITERAL,
            lit.lexical().to_string(),
            lit.datatype().as_str().to_string(),
            lit.language().unwrap_or_default().to_string(),
        ),
    }
}

fn decode_resource(kind: &str, text: String) -> Result<Resource> {
    match kind {
        KIND_IRI => Ok(Resource::Iri(Iri::new(text))),
        KIND_BLANK => Ok(Resource::BlankNode(BlankNode::new(text))),
        other => Err(EvalError::evaluation(format!(
            "Corrupt statements row: resource kind '{}'",
            other
        ))),
    }
}

/// Row as stored, before decoding into a `Statement`
struct RawRow {
    id: i64,
    subject_kind: String,
    subject: String,
    predicate: String,
    object_kind: String,
    object: String,
    datatype: String,
    language: String,
    context_kind: String,
    context: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject_kind: row.get(1)?,
            subject: row.get(2)?,
            predicate: row.get(3)?,
            object_kind: row.get(4)?,
            object: row.get(5)?,
            datatype: row.get(6)?,
            language: row.get(7)?,
            context_kind: row.get(8)?,
            context: row.get(9)?,
        })
    }

    fn into_statement(self) -> Result<Statement> {
        let subject = decode_resource(&self.subject_kind, self.subject)?;
        let predicate = Iri::new(self.predicate);
        let object = match self.object_kind.as_str() {
            KIND_LITERAL => Value::Literal(Literal::from_parts(
                self.object,
                Iri::new(self.datatype),
                Some(self.language),
            )),
            kind => Value::from(decode_resource(kind, self.object)?),
        };
        Ok(match self.context_kind.as_str() {
            KIND_NONE => Statement::new(subject, predicate, object),
            kind => Statement::in_context(subject, predicate, object, decode_resource(kind, self.context)?),
        })
    }
}

/// WHERE clause + bound parameters for a pattern
struct CompiledPattern {
    where_sql: String,
    params: Vec<SqlValue>,
}

impl CompiledPattern {
    fn new(pattern: &Pattern) -> Self {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(subject) = &pattern.subject {
            let (kind, text) = resource_columns(subject);
            clauses.push("subject_kind = ? AND subject = ?".to_string());
            params.push(SqlValue::Text(kind.to_string()));
            params.push(SqlValue::Text(text));
        }
        if let Some(predicate) = &pattern.predicate {
            clauses.push("predicate = ?".to_string());
            params.push(SqlValue::Text(predicate.as_str().to_string()));
        }
        if let Some(object) = &pattern.object {
            let (kind, text, datatype, language) = value_columns(object);
            clauses.push("object_kind = ? AND object = ? AND datatype = ? AND language = ?".to_string());
            params.extend(
                [kind.to_string(), text, datatype, language]
                    .into_iter()
                    .map(SqlValue::Text),
            );
        }
        if !pattern.contexts.is_empty() {
            let alternatives: Vec<&str> = pattern
                .contexts
                .iter()
                .map(|ctx| {
                    let (kind, text) = context_columns(ctx.as_ref());
                    params.push(SqlValue::Text(kind.to_string()));
                    params.push(SqlValue::Text(text));
                    "(context_kind = ? AND context = ?)"
                })
                .collect();
            clauses.push(format!("({})", alternatives.join(" OR ")));
        }

        let where_sql = if clauses.is_empty() {
            "1".to_string()
        } else {
            clauses.join(" AND ")
        };
        Self { where_sql, params }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Cursor
// ═══════════════════════════════════════════════════════════════════════════

/// Keyset-paginated cursor over one pattern query
struct SqliteCursor<'a> {
    store: &'a SqliteTripleSource,
    sql: String,
    params: Vec<SqlValue>,
    pattern: Pattern,
    last_id: i64,
    buffer: VecDeque<Statement>,
    source_exhausted: bool,
    state: IterationState,
}

impl SqliteCursor<'_> {
    fn fetch_page(&mut self) -> Result<()> {
        let store = self.store;
        let limit = store.batch_size;

        let mut bound = Vec::with_capacity(self.params.len() + 2);
        bound.push(SqlValue::Integer(self.last_id));
        bound.extend(self.params.iter().cloned());
        bound.push(SqlValue::Integer(limit as i64));

        let conn = store.conn.lock();
        let mut stmt = conn.prepare_cached(&self.sql)?;
        let rows = stmt.query_map(params_from_iter(bound.iter()), RawRow::from_row)?;

        let mut fetched = 0;
        for row in rows {
            let raw = row?;
            self.last_id = raw.id;
            self.buffer.push_back(raw.into_statement()?);
            fetched += 1;
        }
        if fetched < limit {
            self.source_exhausted = true;
        }
        trace!(
            "sqlite source: fetched {} rows for {} (last id {})",
            fetched,
            self.pattern,
            self.last_id
        );
        Ok(())
    }

    fn release(&mut self) {
        if self.state.mark_closed() {
            self.buffer.clear();
            self.store.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Iteration for SqliteCursor<'_> {
    type Item = Statement;

    fn has_next(&mut self) -> Result<bool> {
        self.state.ensure_open()?;
        if self.buffer.is_empty() && !self.source_exhausted {
            self.fetch_page()?;
        }
        Ok(!self.buffer.is_empty())
    }

    fn next(&mut self) -> Result<Statement> {
        if !self.has_next()? {
            return Err(EvalError::exhausted());
        }
        self.buffer.pop_front().ok_or_else(EvalError::exhausted)
    }

    fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl Drop for SqliteCursor<'_> {
    fn drop(&mut self) {
        if !self.state.is_closed() {
            warn!("sqlite source: cursor for {} dropped without close", self.pattern);
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iteration::IterationExt;

    #[test]
    fn test_compiled_pattern_wildcard() {
        let compiled = CompiledPattern::new(&Pattern::any());
        assert_eq!(compiled.where_sql, "1");
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn test_compiled_pattern_contexts() {
        let pattern = Pattern::any()
            .predicate(Iri::new("urn:p"))
            .contexts([None, Some(Resource::iri("urn:g"))]);
        let compiled = CompiledPattern::new(&pattern);
        assert_eq!(
            compiled.where_sql,
            "predicate = ? AND ((context_kind = ? AND context = ?) OR (context_kind = ? AND context = ?))"
        );
        assert_eq!(compiled.params.len(), 5);
    }

    #[test]
    fn test_literal_roundtrip_through_table() {
        let source = SqliteTripleSource::open_in_memory().unwrap();
        let s = Resource::blank("b0");
        let stmts = vec![
            Statement::new(s.clone(), Iri::new("urn:p"), Literal::simple("plain")),
            Statement::new(s.clone(), Iri::new("urn:p"), Literal::language_tagged("hej", "sv")),
            Statement::new(s.clone(), Iri::new("urn:p"), Literal::from_bool(true)),
            Statement::in_context(s.clone(), Iri::new("urn:p"), Value::blank("b1"), Resource::iri("urn:g")),
        ];
        assert_eq!(source.insert_all(&stmts).unwrap(), 4);

        let found = source.get_statements(&Pattern::any()).unwrap().collect_vec().unwrap();
        assert_eq!(found, stmts);
    }

    #[test]
    fn test_insert_ignores_duplicates() {
        let source = SqliteTripleSource::open_in_memory().unwrap();
        let st = Statement::new(Resource::iri("urn:s"), Iri::new("urn:p"), Value::iri("urn:o"));
        assert!(source.insert(&st).unwrap());
        assert!(!source.insert(&st).unwrap());
        assert_eq!(source.len().unwrap(), 1);
    }
}
