use image::imageops::FilterType;
use rocket::fs::TempFile;
use std::path::{Path, PathBuf};

use crate::db::DbPool;
use crate::models::settings::Setting;

const UPLOAD_ROOT: &str = "website/uploads";

/// Extensions that the `image` crate cannot (or should not) re-encode;
/// these skip thumbnail generation.
const NO_THUMB_EXTS: &[&str] = &["svg", "gif"];

pub fn max_upload_bytes(pool: &DbPool) -> u64 {
    let max_mb = Setting::get_i64(pool, "images_max_upload_mb").max(1) as u64;
    max_mb * 1024 * 1024
}

fn allowed_extensions(pool: &DbPool) -> Vec<String> {
    Setting::get_or(pool, "images_allowed_types", "jpg,jpeg,png,gif,webp,svg")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extension from content type, then original filename (raw_name), then
/// field name.
fn file_extension(file: &TempFile<'_>) -> Option<String> {
    file.content_type()
        .and_then(|ct| ct.extension())
        .map(|e| e.to_string().to_lowercase())
        .or_else(|| {
            file.raw_name().and_then(|rn| {
                let s = rn.dangerous_unsafe_unsanitized_raw().as_str().to_string();
                s.rsplit('.').next().map(|e| e.to_lowercase())
            })
        })
        .or_else(|| {
            file.name()
                .and_then(|n| n.rsplit('.').next())
                .map(|e| e.to_lowercase())
        })
}

/// Upload policy, pure over the declared type/size. Runs before any
/// byte is written; a rejected file never reaches disk.
pub fn check_upload_policy(
    declared_type_is_image: bool,
    extension: Option<&str>,
    size_bytes: u64,
    max_bytes: u64,
    allowed_exts: &[String],
) -> Result<(), String> {
    let ext_allowed = extension
        .map(|e| allowed_exts.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false);
    if !declared_type_is_image && !ext_allowed {
        return Err("Only image files can be uploaded.".to_string());
    }
    if size_bytes > max_bytes {
        return Err(format!(
            "Image is too large ({:.1} MB). The limit is {} MB.",
            size_bytes as f64 / 1_048_576.0,
            max_bytes / 1_048_576
        ));
    }
    Ok(())
}

pub fn check_upload(file: &TempFile<'_>, pool: &DbPool) -> Result<(), String> {
    let is_image = file
        .content_type()
        .map(|ct| ct.top() == "image")
        .unwrap_or(false);
    let ext = file_extension(file);
    check_upload_policy(
        is_image,
        ext.as_deref(),
        file.len(),
        max_upload_bytes(pool),
        &allowed_extensions(pool),
    )
}

/// Randomized file name that keeps the original extension, so repeated
/// uploads of the same file never collide.
pub fn unique_filename(extension: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4(), extension)
}

fn parse_dimensions(s: &str) -> (u32, u32) {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() == 2 {
        let w = parts[0].parse().unwrap_or(400);
        let h = parts[1].parse().unwrap_or(400);
        (w, h)
    } else {
        (400, 400)
    }
}

/// Validate and persist an upload under `website/uploads/<folder>/`,
/// returning the public `/uploads/...` path. A medium thumbnail is
/// written next to raster images for the grid pages; thumbnail failure
/// is logged but does not fail the upload.
pub async fn save_upload(
    file: &mut TempFile<'_>,
    folder: &str,
    pool: &DbPool,
) -> Result<String, String> {
    check_upload(file, pool)?;

    let ext = file_extension(file).unwrap_or_else(|| "jpg".to_string());
    let filename = unique_filename(&ext);
    let dir = Path::new(UPLOAD_ROOT).join(folder);
    std::fs::create_dir_all(&dir).map_err(|e| format!("Upload directory error: {}", e))?;
    let dest = dir.join(&filename);

    file.persist_to(&dest)
        .await
        .map_err(|e| format!("Upload failed: {}", e))?;

    if !NO_THUMB_EXTS.contains(&ext.as_str()) {
        if let Err(e) = write_thumbnail(pool, &dest, &filename) {
            log::warn!("Thumbnail generation failed for {}: {}", filename, e);
        }
    }

    Ok(format!("/uploads/{}/{}", folder, filename))
}

fn write_thumbnail(pool: &DbPool, original: &Path, filename: &str) -> Result<(), String> {
    let (w, h) = parse_dimensions(&Setting::get_or(pool, "images_thumb_size", "400x400"));
    let img = image::open(original).map_err(|e| e.to_string())?;
    let thumb = img.resize(w, h, FilterType::Lanczos3);
    let thumb_path = original.with_file_name(format!("thumb_{}", filename));
    thumb.save(&thumb_path).map_err(|e| e.to_string())
}

/// Map a public `/uploads/...` path back onto disk. Rejects anything
/// that escapes the uploads root.
fn disk_path(public_path: &str) -> Option<PathBuf> {
    let rel = public_path.strip_prefix("/uploads/")?;
    if rel.split('/').any(|part| part == ".." || part.is_empty()) {
        return None;
    }
    Some(Path::new(UPLOAD_ROOT).join(rel))
}

/// Delete an uploaded image and its thumbnail. Missing files are not an
/// error; the row referencing them is already gone or going.
pub fn delete_upload(public_path: &str) {
    let Some(path) = disk_path(public_path) else {
        return;
    };
    let _ = std::fs::remove_file(&path);
    if let (Some(dir), Some(name)) = (path.parent(), path.file_name()) {
        let _ = std::fs::remove_file(dir.join(format!("thumb_{}", name.to_string_lossy())));
    }
}
