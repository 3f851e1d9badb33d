use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::db::DbPool;

/// Default swatch for new tags.
pub const DEFAULT_TAG_COLOR: &str = "#3b82f6";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProjectTag {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub thumbnail_path: String,
    pub detail_images: Vec<String>,
    pub tags: Vec<ProjectTag>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct ProjectForm {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub thumbnail_path: String,
    pub detail_images: Vec<String>,
    pub tags: Vec<ProjectTag>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
}

impl ProjectForm {
    /// Runs before any database write. Empty required fields and
    /// malformed links block the submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required.".to_string());
        }
        if self.short_description.trim().is_empty() {
            return Err("Short description is required.".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required.".to_string());
        }
        if self.thumbnail_path.trim().is_empty() {
            return Err("A thumbnail image is required.".to_string());
        }
        for link in [&self.repo_url, &self.demo_url].into_iter().flatten() {
            if !link.trim().is_empty() && Url::parse(link).is_err() {
                return Err(format!("\"{}\" is not a valid URL.", link));
            }
        }
        Ok(())
    }
}

/// Append a tag to an in-memory tag list, enforcing case-insensitive
/// name uniqueness. Returns the extended list, or an error with the
/// original list untouched. An empty color falls back to the default
/// swatch.
pub fn add_tag(tags: &[ProjectTag], name: &str, color: &str) -> Result<Vec<ProjectTag>, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Tag name is required.".to_string());
    }
    if tags.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
        return Err(format!("Tag \"{}\" already exists.", name));
    }
    let color = color.trim();
    let color = if color.is_empty() { DEFAULT_TAG_COLOR } else { color };
    let mut out = tags.to_vec();
    out.push(ProjectTag {
        name: name.to_string(),
        color: color.to_string(),
    });
    Ok(out)
}

/// Fold parallel name/color form fields into a validated tag list,
/// skipping blank names and rejecting duplicates.
pub fn build_tag_list(names: &[String], colors: &[String]) -> Result<Vec<ProjectTag>, String> {
    let mut tags: Vec<ProjectTag> = Vec::new();
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            continue;
        }
        let color = colors.get(i).map(|c| c.as_str()).unwrap_or("");
        tags = add_tag(&tags, name, color)?;
    }
    Ok(tags)
}

impl Project {
    fn base_from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get("id")?,
            title: row.get("title")?,
            short_description: row.get("short_description")?,
            description: row.get("description")?,
            thumbnail_path: row.get("thumbnail_path")?,
            detail_images: vec![],
            tags: vec![],
            repo_url: row.get("repo_url")?,
            demo_url: row.get("demo_url")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn images_for(conn: &Connection, project_id: i64) -> Vec<String> {
        let mut stmt = match conn
            .prepare("SELECT path FROM project_images WHERE project_id = ?1 ORDER BY position")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![project_id], |row| row.get(0))
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    fn tags_for(conn: &Connection, project_id: i64) -> Vec<ProjectTag> {
        let mut stmt = match conn.prepare(
            "SELECT name, color FROM project_tags WHERE project_id = ?1 ORDER BY position",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![project_id], |row| {
            Ok(ProjectTag {
                name: row.get(0)?,
                color: row.get(1)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }

    fn attach_children(conn: &Connection, mut project: Project) -> Project {
        project.detail_images = Self::images_for(conn, project.id);
        project.tags = Self::tags_for(conn, project.id);
        project
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        let project = conn
            .query_row(
                "SELECT * FROM projects WHERE id = ?1",
                params![id],
                Self::base_from_row,
            )
            .ok()?;
        Some(Self::attach_children(&conn, project))
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT * FROM projects ORDER BY created_at DESC, id DESC")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let bases: Vec<Project> = stmt
            .query_map([], Self::base_from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default();
        bases
            .into_iter()
            .map(|p| Self::attach_children(&conn, p))
            .collect()
    }

    pub fn latest(pool: &DbPool, limit: usize) -> Vec<Self> {
        let mut items = Self::list(pool);
        items.truncate(limit);
        items
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap_or(0)
    }

    fn write_children(
        conn: &Connection,
        project_id: i64,
        form: &ProjectForm,
    ) -> Result<(), String> {
        conn.execute(
            "DELETE FROM project_images WHERE project_id = ?1",
            params![project_id],
        )
        .map_err(|e| e.to_string())?;
        conn.execute(
            "DELETE FROM project_tags WHERE project_id = ?1",
            params![project_id],
        )
        .map_err(|e| e.to_string())?;

        for (i, path) in form.detail_images.iter().enumerate() {
            conn.execute(
                "INSERT INTO project_images (project_id, path, position) VALUES (?1, ?2, ?3)",
                params![project_id, path, i as i64],
            )
            .map_err(|e| e.to_string())?;
        }
        for (i, tag) in form.tags.iter().enumerate() {
            conn.execute(
                "INSERT INTO project_tags (project_id, name, color, position) VALUES (?1, ?2, ?3, ?4)",
                params![project_id, tag.name, tag.color, i as i64],
            )
            .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    pub fn create(pool: &DbPool, form: &ProjectForm) -> Result<i64, String> {
        form.validate()?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO projects (title, short_description, description, thumbnail_path, repo_url, demo_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                form.title,
                form.short_description,
                form.description,
                form.thumbnail_path,
                form.repo_url,
                form.demo_url,
            ],
        )
        .map_err(|e| e.to_string())?;
        let id = conn.last_insert_rowid();
        Self::write_children(&conn, id, form)?;
        Ok(id)
    }

    pub fn update(pool: &DbPool, id: i64, form: &ProjectForm) -> Result<(), String> {
        form.validate()?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE projects SET title=?1, short_description=?2, description=?3,
                 thumbnail_path=?4, repo_url=?5, demo_url=?6, updated_at=CURRENT_TIMESTAMP
                 WHERE id=?7",
                params![
                    form.title,
                    form.short_description,
                    form.description,
                    form.thumbnail_path,
                    form.repo_url,
                    form.demo_url,
                    id,
                ],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err("Project not found.".to_string());
        }
        Self::write_children(&conn, id, form)?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "DELETE FROM project_images WHERE project_id = ?1",
            params![id],
        )
        .map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM project_tags WHERE project_id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
