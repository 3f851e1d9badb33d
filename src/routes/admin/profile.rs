use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::images;
use crate::models::profile::{Profile, ProfileDetail, ProfileForm, SocialLink};
use crate::models::settings::Setting;
use crate::AdminSlug;

fn profile_context(pool: &DbPool, slug: &AdminSlug, error: Option<&str>) -> Value {
    let profile = Profile::load_or_default(pool);
    let bio_text = profile_lines(&profile.bio_paragraphs);
    let facts_text = profile_lines(&profile.quick_facts);
    let mut context = json!({
        "page_title": "Profile",
        "admin_slug": slug.0,
        "profile": profile,
        "bio_text": bio_text,
        "facts_text": facts_text,
        "error": Value::Null,
        "saved": false,
        "settings": Setting::all(pool),
    });
    if let Some(msg) = error {
        context["error"] = json!(msg);
    }
    context
}

fn profile_lines(items: &[String]) -> String {
    items.join("\n")
}

/// Split a textarea into non-empty trimmed lines.
fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

#[get("/profile")]
pub fn profile_page(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    Template::render("admin/profile", profile_context(pool, slug, None))
}

#[derive(FromForm)]
pub struct ProfileFormData {
    pub name: String,
    pub role: String,
    pub avatar_path: String,
    pub bio_paragraphs: String,
    pub quick_facts: String,
    pub social_names: Vec<String>,
    pub social_urls: Vec<String>,
    pub social_icons: Vec<String>,
    pub detail_icons: Vec<String>,
    pub detail_texts: Vec<String>,
    pub revision: i64,
}

impl ProfileFormData {
    fn to_form(&self) -> ProfileForm {
        let social_links = self
            .social_names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(i, name)| SocialLink {
                name: name.trim().to_string(),
                url: self
                    .social_urls
                    .get(i)
                    .map(|u| u.trim().to_string())
                    .unwrap_or_default(),
                icon: self
                    .social_icons
                    .get(i)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        let details = self
            .detail_texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| ProfileDetail {
                icon: self
                    .detail_icons
                    .get(i)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                text: text.trim().to_string(),
            })
            .collect();

        ProfileForm {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            avatar_path: self.avatar_path.trim().to_string(),
            bio_paragraphs: parse_lines(&self.bio_paragraphs),
            quick_facts: parse_lines(&self.quick_facts),
            social_links,
            details,
            revision: self.revision,
        }
    }
}

#[post("/profile", data = "<form>")]
pub fn profile_save(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    form: Form<ProfileFormData>,
) -> Template {
    match Profile::upsert(pool, &form.to_form()) {
        Ok(_) => {
            let mut context = profile_context(pool, slug, None);
            context["saved"] = json!(true);
            Template::render("admin/profile", context)
        }
        Err(e) => Template::render("admin/profile", profile_context(pool, slug, Some(&e))),
    }
}

// ── Avatar upload (async uploader in the admin UI) ─────

#[derive(FromForm)]
pub struct AvatarUploadForm<'f> {
    pub file: TempFile<'f>,
}

#[post("/profile/avatar", data = "<form>")]
pub async fn avatar_upload(
    _admin: AdminUser,
    pool: &State<DbPool>,
    mut form: Form<AvatarUploadForm<'_>>,
) -> Json<Value> {
    match images::save_upload(&mut form.file, "profile", pool).await {
        Ok(path) => match Profile::update_avatar(pool, &path) {
            Ok(revision) => Json(json!({ "location": path, "revision": revision })),
            Err(e) => Json(json!({ "error": e })),
        },
        Err(e) => Json(json!({ "error": e })),
    }
}
