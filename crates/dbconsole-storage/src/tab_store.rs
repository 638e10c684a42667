//! Persisted object viewer tabs
//!
//! One row per open tab. Only what is needed to reopen the tab is kept:
//! the page it showed, the node it was opened for and its strip position.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::database::Database;
use crate::Result;

/// A tab as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRecord {
    pub id: String,
    pub page_key: String,
    pub object_id: String,
    pub parent_id: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_selected_at: Option<DateTime<Utc>>,
}

impl TabRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;
        let last_selected_at: Option<String> = row.get(7)?;

        Ok(Self {
            id: row.get(0)?,
            page_key: row.get(1)?,
            object_id: row.get(2)?,
            parent_id: row.get(3)?,
            position: row.get(4)?,
            created_at: parse_timestamp(&created_at).unwrap_or_else(Utc::now),
            updated_at: parse_timestamp(&updated_at).unwrap_or_else(Utc::now),
            last_selected_at: last_selected_at.as_deref().and_then(parse_timestamp),
        })
    }
}

impl Database {
    /// Insert or overwrite a tab row
    pub fn save_tab(&self, tab: &TabRecord) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tabs
                 (id, page_key, object_id, parent_id, position,
                  created_at, updated_at, last_selected_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    tab.id,
                    tab.page_key,
                    tab.object_id,
                    tab.parent_id,
                    tab.position,
                    tab.created_at.to_rfc3339(),
                    tab.updated_at.to_rfc3339(),
                    tab.last_selected_at.map(|t| t.to_rfc3339()),
                ],
            )?;
            Ok(())
        })
    }

    /// All persisted tabs in strip order
    pub fn load_tabs(&self) -> Result<Vec<TabRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, page_key, object_id, parent_id, position,
                        created_at, updated_at, last_selected_at
                 FROM tabs ORDER BY position, created_at",
            )?;

            let tabs = stmt
                .query_map([], TabRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tabs)
        })
    }

    /// Returns false when no row matched
    pub fn delete_tab(&self, tab_id: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let deleted = conn.execute("DELETE FROM tabs WHERE id = ?1", [tab_id])?;
            Ok(deleted > 0)
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, position: i64) -> TabRecord {
        let now = Utc::now();
        TabRecord {
            id: id.to_string(),
            page_key: "data-viewer".to_string(),
            object_id: format!("database://conn1/{id}"),
            parent_id: Some("database://conn1".to_string()),
            position,
            created_at: now,
            updated_at: now,
            last_selected_at: None,
        }
    }

    #[test]
    fn test_tabs_load_in_strip_order() {
        let db = Database::open_in_memory().unwrap();
        db.save_tab(&record("t2", 1)).unwrap();
        db.save_tab(&record("t1", 0)).unwrap();

        let ids: Vec<String> = db.load_tabs().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn test_save_overwrites_row() {
        let db = Database::open_in_memory().unwrap();
        let mut tab = record("t1", 0);
        db.save_tab(&tab).unwrap();

        tab.page_key = "properties".to_string();
        tab.last_selected_at = Some(Utc::now());
        db.save_tab(&tab).unwrap();

        let stored = db.load_tabs().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].page_key, "properties");
        assert_eq!(stored[0].parent_id.as_deref(), Some("database://conn1"));
        assert!(stored[0].last_selected_at.is_some());
    }

    #[test]
    fn test_delete_tab() {
        let db = Database::open_in_memory().unwrap();
        db.save_tab(&record("t1", 0)).unwrap();

        assert!(db.delete_tab("t1").unwrap());
        assert!(!db.delete_tab("t1").unwrap());
        assert!(db.load_tabs().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_timestamp_falls_back() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO tabs (id, page_key, object_id, position, created_at, updated_at)
                 VALUES ('t1', 'data-viewer', 'database://conn1/t1', 0, 'yesterday', 'yesterday')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let stored = db.load_tabs().unwrap();
        assert_eq!(stored[0].object_id, "database://conn1/t1");
        assert!(stored[0].parent_id.is_none());
    }
}
