//! Row loading and conversion for the SQLite entry store.

use chrono::{DateTime, Utc};

use acc_protocols::{PositionDescriptor, SavedExcerpt, StoreError};

/// An excerpt as read from the database, before validation.
pub(crate) struct ExcerptRow {
    id: String,
    content: String,
    created_at: String,
    source_url: String,
    anchor_kind: String,
    anchor_value: String,
    title: Option<String>,
    tags: Vec<String>,
}

impl ExcerptRow {
    pub(crate) fn into_excerpt(self) -> Result<SavedExcerpt, StoreError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                StoreError::InvalidRecord(format!("{}: created_at {:?}: {e}", self.id, self.created_at))
            })?;
        let anchor = PositionDescriptor::from_parts(&self.anchor_kind, &self.anchor_value)
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {e}", self.id)))?;

        Ok(SavedExcerpt {
            id: self.id,
            content: self.content,
            created_at,
            source_url: self.source_url,
            tags: self.tags,
            title: self.title,
            anchor,
        })
    }
}

/// Load one excerpt (`only`) or all of them, newest first.
pub(crate) fn load_excerpts(
    conn: &rusqlite::Connection,
    only: Option<&str>,
) -> Result<Vec<ExcerptRow>, rusqlite::Error> {
    let mut sql = String::from(
        "SELECT e.id, e.content, e.created_at, e.source_url, e.anchor_kind, e.anchor_value, t.title
         FROM excerpts e
         LEFT JOIN excerpt_titles t ON t.excerpt_id = e.id",
    );
    if only.is_some() {
        sql.push_str(" WHERE e.id = ?1");
    }
    sql.push_str(" ORDER BY e.created_at DESC, e.rowid DESC");

    let mut stmt = conn.prepare(&sql)?;
    if let Some(id) = only {
        stmt.raw_bind_parameter(1, id)?;
    }

    let mut excerpts = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        excerpts.push(ExcerptRow {
            id: row.get(0)?,
            content: row.get(1)?,
            created_at: row.get(2)?,
            source_url: row.get(3)?,
            anchor_kind: row.get(4)?,
            anchor_value: row.get(5)?,
            title: row.get(6)?,
            tags: Vec::new(),
        });
    }

    let mut tag_stmt =
        conn.prepare("SELECT tag FROM excerpt_tags WHERE excerpt_id = ?1 ORDER BY position")?;
    for excerpt in &mut excerpts {
        excerpt.tags = tag_stmt
            .query_map([&excerpt.id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
    }

    Ok(excerpts)
}
