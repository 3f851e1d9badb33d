use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Certificate {
    pub id: i64,
    pub title: String,
    pub issuer: String,
    pub description: String,
    pub image_path: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct CertificateForm {
    pub title: String,
    pub issuer: String,
    pub description: String,
    pub image_path: String,
}

impl CertificateForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required.".to_string());
        }
        if self.issuer.trim().is_empty() {
            return Err("Issuer is required.".to_string());
        }
        Ok(())
    }
}

impl Certificate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Certificate {
            id: row.get("id")?,
            title: row.get("title")?,
            issuer: row.get("issuer")?,
            description: row.get("description")?,
            image_path: row.get("image_path")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM certificates WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT * FROM certificates ORDER BY created_at DESC, id DESC") {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM certificates", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &CertificateForm) -> Result<i64, String> {
        form.validate()?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO certificates (title, issuer, description, image_path) VALUES (?1, ?2, ?3, ?4)",
            params![form.title, form.issuer, form.description, form.image_path],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &CertificateForm) -> Result<(), String> {
        form.validate()?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE certificates SET title=?1, issuer=?2, description=?3, image_path=?4 WHERE id=?5",
            params![form.title, form.issuer, form.description, form.image_path, id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM certificates WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
