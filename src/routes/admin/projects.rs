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
use crate::models::project::{build_tag_list, Project, ProjectForm};
use crate::models::settings::Setting;
use crate::AdminSlug;

// ── Projects ───────────────────────────────────────────

#[get("/projects")]
pub fn projects_list(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    let projects = Project::list(pool);
    let context = json!({
        "page_title": "Projects",
        "admin_slug": slug.0,
        "projects": projects,
        "settings": Setting::all(pool),
    });
    Template::render("admin/projects/list", &context)
}

fn edit_context(pool: &DbPool, slug: &AdminSlug, project: Option<&Value>, error: Option<&str>) -> Value {
    let form_action = match project.and_then(|p| p.get("id")).and_then(|v| v.as_i64()) {
        Some(id) => format!("/{}/projects/{}/edit", slug.0, id),
        None => format!("/{}/projects/new", slug.0),
    };
    let mut context = json!({
        "page_title": if project.is_some() { "Edit Project" } else { "New Project" },
        "admin_slug": slug.0,
        "form_action": form_action,
        "default_tag_color": crate::models::project::DEFAULT_TAG_COLOR,
        "project": Value::Null,
        "error": Value::Null,
        "settings": Setting::all(pool),
    });
    if let Some(p) = project {
        context["project"] = p.clone();
    }
    if let Some(msg) = error {
        context["error"] = json!(msg);
    }
    context
}

#[get("/projects/new")]
pub fn project_new(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    Template::render("admin/projects/edit", edit_context(pool, slug, None, None))
}

#[get("/projects/<id>/edit")]
pub fn project_edit(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
) -> Option<Template> {
    let project = Project::find_by_id(pool, id)?;
    Some(Template::render(
        "admin/projects/edit",
        edit_context(pool, slug, Some(&json!(project)), None),
    ))
}

#[derive(FromForm)]
pub struct ProjectFormData<'f> {
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub thumbnail: Option<TempFile<'f>>,
    pub existing_thumbnail_path: Option<String>,
    pub detail_uploads: Vec<TempFile<'f>>,
    pub existing_detail_images: Vec<String>,
    pub tag_names: Vec<String>,
    pub tag_colors: Vec<String>,
}

fn optional_url(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Rebuild the edit-form context from submitted values so a failed
/// validation re-renders with nothing lost.
fn submitted_context(form: &ProjectFormData<'_>, id: Option<i64>) -> Value {
    let tags: Vec<Value> = form
        .tag_names
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.trim().is_empty())
        .map(|(i, n)| {
            json!({
                "name": n.trim(),
                "color": form.tag_colors.get(i).map(|c| c.as_str()).unwrap_or(""),
            })
        })
        .collect();
    json!({
        "id": id,
        "title": form.title,
        "short_description": form.short_description,
        "description": form.description,
        "repo_url": form.repo_url,
        "demo_url": form.demo_url,
        "thumbnail_path": form.existing_thumbnail_path.as_deref().unwrap_or(""),
        "detail_images": form.existing_detail_images,
        "tags": tags,
    })
}

/// Collect the project form into a validated `ProjectForm`: uploads are
/// persisted (thumbnail replaces, detail uploads append after the kept
/// existing images), tags are checked for duplicates. Any failure
/// returns the error before a row is written.
async fn assemble_form(
    form: &mut ProjectFormData<'_>,
    pool: &DbPool,
) -> Result<ProjectForm, String> {
    let tags = build_tag_list(&form.tag_names, &form.tag_colors)?;

    let thumbnail_path = match form.thumbnail.as_mut() {
        Some(file) if file.len() > 0 => images::save_upload(file, "projects/thumbnails", pool).await?,
        _ => form
            .existing_thumbnail_path
            .clone()
            .unwrap_or_default()
            .trim()
            .to_string(),
    };

    let mut detail_images: Vec<String> = form
        .existing_detail_images
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    for file in form.detail_uploads.iter_mut() {
        if file.len() == 0 {
            continue;
        }
        detail_images.push(images::save_upload(file, "projects/details", pool).await?);
    }

    let project_form = ProjectForm {
        title: form.title.trim().to_string(),
        short_description: form.short_description.trim().to_string(),
        description: form.description.trim().to_string(),
        thumbnail_path,
        detail_images,
        tags,
        repo_url: optional_url(&form.repo_url),
        demo_url: optional_url(&form.demo_url),
    };
    project_form.validate()?;
    Ok(project_form)
}

#[post("/projects/new", data = "<form>")]
pub async fn project_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    mut form: Form<ProjectFormData<'_>>,
) -> Result<Redirect, Template> {
    let pf = match assemble_form(&mut form, pool).await {
        Ok(pf) => pf,
        Err(e) => {
            let submitted = submitted_context(&form, None);
            return Err(Template::render(
                "admin/projects/edit",
                edit_context(pool, slug, Some(&submitted), Some(&e)),
            ));
        }
    };

    match Project::create(pool, &pf) {
        Ok(_) => Ok(Redirect::to(format!("{}/projects", admin_base(slug)))),
        Err(e) => {
            let submitted = submitted_context(&form, None);
            Err(Template::render(
                "admin/projects/edit",
                edit_context(pool, slug, Some(&submitted), Some(&e)),
            ))
        }
    }
}

#[post("/projects/<id>/edit", data = "<form>")]
pub async fn project_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
    mut form: Form<ProjectFormData<'_>>,
) -> Result<Redirect, Template> {
    let pf = match assemble_form(&mut form, pool).await {
        Ok(pf) => pf,
        Err(e) => {
            let submitted = submitted_context(&form, Some(id));
            return Err(Template::render(
                "admin/projects/edit",
                edit_context(pool, slug, Some(&submitted), Some(&e)),
            ));
        }
    };

    match Project::update(pool, id, &pf) {
        Ok(()) => Ok(Redirect::to(format!("{}/projects", admin_base(slug)))),
        Err(e) => {
            let submitted = submitted_context(&form, Some(id));
            Err(Template::render(
                "admin/projects/edit",
                edit_context(pool, slug, Some(&submitted), Some(&e)),
            ))
        }
    }
}

#[post("/projects/<id>/delete")]
pub fn project_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    id: i64,
) -> Redirect {
    if let Some(project) = Project::find_by_id(pool, id) {
        if Project::delete(pool, id).is_ok() {
            images::delete_upload(&project.thumbnail_path);
            for image in &project.detail_images {
                images::delete_upload(image);
            }
        }
    }
    Redirect::to(format!("{}/projects", admin_base(slug)))
}
