use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params};

use crate::model::ReferenceEntry;
use crate::util::ensure_parent_directory;

/// SQLite-backed bilingual corpus, keyed by locale-qualified corpus code.
pub struct ReferenceStore {
    connection: Connection,
}

impl ReferenceStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        ensure_parent_directory(db_path)?;
        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        configure_connection(&connection)?;
        ensure_schema(&connection)?;
        Ok(Self { connection })
    }

    /// Opens an existing store for lookups; never creates or modifies the database.
    pub fn open_read_only(db_path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open reference store: {}", db_path.display()))?;
        Ok(Self { connection })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        ensure_schema(&connection)?;
        Ok(Self { connection })
    }

    /// Every entry stored for `corpus_code`, bad sources included, in insertion order.
    pub fn entries(&self, corpus_code: &str) -> Result<Vec<ReferenceEntry>> {
        let mut statement = self.connection.prepare(
            "
            SELECT source, target, is_bad_source
            FROM reference_segments
            WHERE corpus_code = ?1
            ORDER BY rowid ASC
            ",
        )?;

        let mut rows = statement.query(params![corpus_code])?;
        let mut out = Vec::<ReferenceEntry>::new();
        while let Some(row) = rows.next()? {
            out.push(ReferenceEntry {
                source: row.get(0)?,
                target: row.get(1)?,
                is_bad_source: row.get::<_, i64>(2)? != 0,
            });
        }

        Ok(out)
    }

    pub fn insert_entries<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a ReferenceEntry)>,
        replace: bool,
    ) -> Result<usize> {
        let entries = entries.into_iter().collect::<Vec<_>>();
        let tx = self.connection.transaction()?;

        if replace {
            let mut codes = entries.iter().map(|(code, _)| *code).collect::<Vec<_>>();
            codes.sort_unstable();
            codes.dedup();
            for code in codes {
                tx.execute(
                    "DELETE FROM reference_segments WHERE corpus_code = ?1",
                    params![code],
                )?;
            }
        }

        let mut inserted = 0_usize;
        {
            let mut statement = tx.prepare(
                "
                INSERT INTO reference_segments(corpus_code, source, target, is_bad_source)
                VALUES(?1, ?2, ?3, ?4)
                ",
            )?;
            for (code, entry) in &entries {
                statement.execute(params![
                    code,
                    entry.source,
                    entry.target,
                    entry.is_bad_source as i64
                ])?;
                inserted += 1;
            }
        }

        tx.commit().context("failed to commit reference import")?;
        Ok(inserted)
    }

    pub fn corpus_counts(&self) -> Result<Vec<(String, i64, i64)>> {
        let mut statement = self.connection.prepare(
            "
            SELECT corpus_code, COUNT(*), COALESCE(SUM(is_bad_source), 0)
            FROM reference_segments
            GROUP BY corpus_code
            ORDER BY corpus_code ASC
            ",
        )?;

        let rows = statement.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reference_segments (
          corpus_code TEXT NOT NULL,
          source TEXT NOT NULL,
          target TEXT NOT NULL,
          is_bad_source INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_reference_segments_corpus
          ON reference_segments(corpus_code);
        ",
    )?;
    Ok(())
}

/// Source text to its single reference translation for one language pair.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    source_to_target: HashMap<String, String>,
}

impl ReferenceMap {
    /// Later entries for the same source replace earlier ones; bad sources are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut source_to_target = HashMap::new();
        for entry in entries {
            if entry.is_bad_source {
                continue;
            }
            source_to_target.insert(entry.source, entry.target);
        }
        Self { source_to_target }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.source_to_target.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.source_to_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_to_target.is_empty()
    }
}
