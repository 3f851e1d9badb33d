use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use super::admin_base;
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::images;
use crate::models::settings::Setting;
use crate::AdminSlug;

// ── Media Library ───────────────────────────────────────

#[derive(serde::Serialize, Clone)]
pub struct MediaFile {
    pub name: String,
    /// Path relative to the uploads root, e.g. "projects/details/x.jpg"
    pub path: String,
    pub size: u64,
    pub size_human: String,
    pub modified: String,
}

const UPLOAD_ROOT: &str = "website/uploads";

fn human_size(size: u64) -> String {
    if size >= 1_048_576 {
        format!("{:.1} MB", size as f64 / 1_048_576.0)
    } else if size >= 1024 {
        format!("{:.0} KB", size as f64 / 1024.0)
    } else {
        format!("{} B", size)
    }
}

/// Walk the uploads tree and return all files sorted newest-first,
/// along with total disk usage in bytes. Generated thumbnails are
/// skipped; they live and die with their originals.
pub(crate) fn scan_media_files() -> (Vec<MediaFile>, u64) {
    let mut files: Vec<MediaFile> = Vec::new();
    let mut total_bytes: u64 = 0;
    let root = std::path::Path::new(UPLOAD_ROOT);

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            if name.starts_with('.') || name.starts_with("thumb_") {
                continue;
            }
            let rel = path
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|_| name.clone());
            let meta = std::fs::metadata(&path).ok();
            let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);
            total_bytes += size;
            let modified = meta
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(|t| {
                    let dt: chrono::DateTime<chrono::Utc> = t.into();
                    dt.format("%Y-%m-%d %H:%M").to_string()
                })
                .unwrap_or_default();
            files.push(MediaFile {
                name,
                path: rel,
                size,
                size_human: human_size(size),
                modified,
            });
        }
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    (files, total_bytes)
}

#[get("/media")]
pub fn media_library(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    let (files, total_bytes) = scan_media_files();

    let context = json!({
        "page_title": "Media",
        "admin_slug": slug.0,
        "files": files,
        "total": files.len(),
        "disk_used": human_size(total_bytes),
        "settings": Setting::all(pool),
    });

    Template::render("admin/media/list", &context)
}

#[post("/media/delete", data = "<form>")]
pub fn media_delete(
    _admin: AdminUser,
    slug: &State<AdminSlug>,
    form: Form<MediaDeleteForm>,
) -> Redirect {
    images::delete_upload(&format!("/uploads/{}", form.path));
    Redirect::to(format!("{}/media", admin_base(slug)))
}

#[derive(FromForm)]
pub struct MediaDeleteForm {
    pub path: String,
}

// ── Image Upload API (async uploader in the admin UI) ──

#[derive(FromForm)]
pub struct ImageUploadForm<'f> {
    pub file: TempFile<'f>,
    /// Uploads folder to store under, e.g. "projects/details".
    pub folder: Option<String>,
}

#[post("/upload/image", data = "<form>")]
pub async fn upload_image(
    _admin: AdminUser,
    pool: &State<DbPool>,
    mut form: Form<ImageUploadForm<'_>>,
) -> Json<Value> {
    let folder = form
        .folder
        .clone()
        .filter(|f| {
            !f.is_empty() && f.split('/').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
        })
        .unwrap_or_else(|| "media".to_string());

    match images::save_upload(&mut form.file, &folder, pool).await {
        Ok(path) => Json(json!({ "location": path })),
        Err(e) => Json(json!({ "error": e })),
    }
}
