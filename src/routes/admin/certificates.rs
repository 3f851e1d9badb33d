use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use super::admin_base;
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::images;
use crate::models::certificate::{Certificate, CertificateForm};
use crate::models::settings::Setting;
use crate::AdminSlug;

// ── Certificates ───────────────────────────────────────

#[get("/certificates")]
pub fn certificates_list(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
) -> Template {
    let certificates = Certificate::list(pool);
    let context = json!({
        "page_title": "Certificates",
        "admin_slug": slug.0,
        "certificates": certificates,
        "settings": Setting::all(pool),
    });
    Template::render("admin/certificates/list", &context)
}

fn edit_context(pool: &DbPool, slug: &AdminSlug, cert: Option<&Certificate>, error: Option<&str>) -> Value {
    let form_action = match cert {
        Some(c) => format!("/{}/certificates/{}/edit", slug.0, c.id),
        None => format!("/{}/certificates/new", slug.0),
    };
    let mut context = json!({
        "page_title": if cert.is_some() { "Edit Certificate" } else { "New Certificate" },
        "admin_slug": slug.0,
        "form_action": form_action,
        "certificate": Value::Null,
        "error": Value::Null,
        "settings": Setting::all(pool),
    });
    if let Some(c) = cert {
        context["certificate"] = json!(c);
    }
    if let Some(msg) = error {
        context["error"] = json!(msg);
    }
    context
}

#[get("/certificates/new")]
pub fn certificate_new(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    Template::render("admin/certificates/edit", edit_context(pool, slug, None, None))
}

#[get("/certificates/<id>/edit")]
pub fn certificate_edit(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
) -> Option<Template> {
    let cert = Certificate::find_by_id(pool, id)?;
    Some(Template::render(
        "admin/certificates/edit",
        edit_context(pool, slug, Some(&cert), None),
    ))
}

#[derive(FromForm)]
pub struct CertificateFormData<'f> {
    pub title: String,
    pub issuer: String,
    pub description: String,
    pub image: Option<TempFile<'f>>,
    pub existing_image_path: Option<String>,
}

/// Resolve the stored image path: a freshly uploaded file wins over the
/// path the form was loaded with. Upload rejection aborts the save.
async fn resolve_image(
    form: &mut CertificateFormData<'_>,
    pool: &DbPool,
) -> Result<String, String> {
    if let Some(file) = form.image.as_mut() {
        if file.len() > 0 {
            return images::save_upload(file, "certificates", pool).await;
        }
    }
    Ok(form
        .existing_image_path
        .clone()
        .unwrap_or_default())
}

#[post("/certificates/new", data = "<form>")]
pub async fn certificate_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    mut form: Form<CertificateFormData<'_>>,
) -> Result<Redirect, Template> {
    let image_path = match resolve_image(&mut form, pool).await {
        Ok(p) => p,
        Err(e) => {
            return Err(Template::render(
                "admin/certificates/edit",
                edit_context(pool, slug, None, Some(&e)),
            ))
        }
    };

    let cf = CertificateForm {
        title: form.title.trim().to_string(),
        issuer: form.issuer.trim().to_string(),
        description: form.description.trim().to_string(),
        image_path,
    };

    match Certificate::create(pool, &cf) {
        Ok(_) => Ok(Redirect::to(format!("{}/certificates", admin_base(slug)))),
        Err(e) => Err(Template::render(
            "admin/certificates/edit",
            edit_context(pool, slug, None, Some(&e)),
        )),
    }
}

#[post("/certificates/<id>/edit", data = "<form>")]
pub async fn certificate_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
    mut form: Form<CertificateFormData<'_>>,
) -> Result<Redirect, Template> {
    let existing = Certificate::find_by_id(pool, id);

    let image_path = match resolve_image(&mut form, pool).await {
        Ok(p) if !p.is_empty() => p,
        Ok(_) => existing.as_ref().map(|c| c.image_path.clone()).unwrap_or_default(),
        Err(e) => {
            return Err(Template::render(
                "admin/certificates/edit",
                edit_context(pool, slug, existing.as_ref(), Some(&e)),
            ))
        }
    };

    let cf = CertificateForm {
        title: form.title.trim().to_string(),
        issuer: form.issuer.trim().to_string(),
        description: form.description.trim().to_string(),
        image_path,
    };

    match Certificate::update(pool, id, &cf) {
        Ok(()) => Ok(Redirect::to(format!("{}/certificates", admin_base(slug)))),
        Err(e) => Err(Template::render(
            "admin/certificates/edit",
            edit_context(pool, slug, existing.as_ref(), Some(&e)),
        )),
    }
}

#[post("/certificates/<id>/delete")]
pub fn certificate_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
) -> Redirect {
    if let Some(cert) = Certificate::find_by_id(pool, id) {
        if Certificate::delete(pool, id).is_ok() && !cert.image_path.is_empty() {
            images::delete_upload(&cert.image_path);
        }
    }
    Redirect::to(format!("{}/certificates", admin_base(slug)))
}
