use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileDetail {
    pub icon: String,
    pub text: String,
}

/// The profile is a singleton row (id = 1). The list-shaped fields are
/// stored as JSON columns and parsed on load; a malformed column falls
/// back to an empty list rather than failing the page.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub avatar_path: String,
    pub bio_paragraphs: Vec<String>,
    pub quick_facts: Vec<String>,
    pub social_links: Vec<SocialLink>,
    pub details: Vec<ProfileDetail>,
    pub revision: i64,
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub name: String,
    pub role: String,
    pub avatar_path: String,
    pub bio_paragraphs: Vec<String>,
    pub quick_facts: Vec<String>,
    pub social_links: Vec<SocialLink>,
    pub details: Vec<ProfileDetail>,
    /// Revision the form was loaded against; a mismatch on save means
    /// another session updated the profile in the meantime.
    pub revision: i64,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required.".to_string());
        }
        if self.role.trim().is_empty() {
            return Err("Role is required.".to_string());
        }
        Ok(())
    }
}

fn parse_list<T: serde::de::DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_default()
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let bio_raw: String = row.get("bio_paragraphs")?;
        let facts_raw: String = row.get("quick_facts")?;
        let links_raw: String = row.get("social_links")?;
        let details_raw: String = row.get("details")?;
        Ok(Profile {
            name: row.get("name")?,
            role: row.get("role")?,
            avatar_path: row.get("avatar_path")?,
            bio_paragraphs: parse_list(&bio_raw),
            quick_facts: parse_list(&facts_raw),
            social_links: parse_list(&links_raw),
            details: parse_list(&details_raw),
            revision: row.get("revision")?,
        })
    }

    pub fn load(pool: &DbPool) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM profile WHERE id = 1", [], Self::from_row)
            .ok()
    }

    /// Public pages render an empty shell when no profile has been
    /// saved yet instead of erroring.
    pub fn load_or_default(pool: &DbPool) -> Self {
        Self::load(pool).unwrap_or(Profile {
            name: String::new(),
            role: String::new(),
            avatar_path: String::new(),
            bio_paragraphs: vec![],
            quick_facts: vec![],
            social_links: vec![],
            details: vec![],
            revision: 0,
        })
    }

    /// Insert or update the singleton row. The UPDATE is guarded by the
    /// revision the form was loaded against, so two concurrent edits
    /// cannot silently overwrite one another. Returns the new revision.
    pub fn upsert(pool: &DbPool, form: &ProfileForm) -> Result<i64, String> {
        form.validate()?;

        let conn = pool.get().map_err(|e| e.to_string())?;

        let bio = serde_json::to_string(&form.bio_paragraphs).map_err(|e| e.to_string())?;
        let facts = serde_json::to_string(&form.quick_facts).map_err(|e| e.to_string())?;
        let links = serde_json::to_string(&form.social_links).map_err(|e| e.to_string())?;
        let details = serde_json::to_string(&form.details).map_err(|e| e.to_string())?;

        let exists: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(|e| e.to_string())?;

        if exists == 0 {
            conn.execute(
                "INSERT INTO profile (id, name, role, avatar_path, bio_paragraphs, quick_facts, social_links, details, revision)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
                params![form.name, form.role, form.avatar_path, bio, facts, links, details],
            )
            .map_err(|e| e.to_string())?;
            return Ok(1);
        }

        let changed = conn
            .execute(
                "UPDATE profile SET name=?1, role=?2, avatar_path=?3, bio_paragraphs=?4,
                 quick_facts=?5, social_links=?6, details=?7,
                 revision = revision + 1, updated_at = CURRENT_TIMESTAMP
                 WHERE id = 1 AND revision = ?8",
                params![
                    form.name,
                    form.role,
                    form.avatar_path,
                    bio,
                    facts,
                    links,
                    details,
                    form.revision,
                ],
            )
            .map_err(|e| e.to_string())?;

        if changed == 0 {
            return Err(
                "The profile was changed in another session. Reload the page and re-apply your edits."
                    .to_string(),
            );
        }

        Ok(form.revision + 1)
    }

    /// Update just the avatar, creating the row if needed. Used by the
    /// avatar upload endpoint so an image can be swapped without
    /// resubmitting the whole form. Returns the revision after the
    /// write so an open profile form can keep its hidden revision
    /// field in sync and not trip the conflict check on save.
    pub fn update_avatar(pool: &DbPool, path: &str) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE profile SET avatar_path = ?1, revision = revision + 1,
                 updated_at = CURRENT_TIMESTAMP WHERE id = 1",
                params![path],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            conn.execute(
                "INSERT INTO profile (id, name, role, avatar_path, revision) VALUES (1, '', '', ?1, 1)",
                params![path],
            )
            .map_err(|e| e.to_string())?;
            return Ok(1);
        }
        conn.query_row("SELECT revision FROM profile WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map_err(|e| e.to_string())
    }
}
