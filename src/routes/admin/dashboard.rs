use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;

use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::certificate::Certificate;
use crate::models::profile::Profile;
use crate::models::project::Project;
use crate::models::settings::Setting;
use crate::AdminSlug;

// ── Dashboard ──────────────────────────────────────────

#[get("/")]
pub fn dashboard(_admin: AdminUser, pool: &State<DbPool>, slug: &State<AdminSlug>) -> Template {
    let projects_count = Project::count(pool);
    let certificates_count = Certificate::count(pool);
    let profile_saved = Profile::load(pool).is_some();

    let context = json!({
        "page_title": "Dashboard",
        "admin_slug": slug.0,
        "projects_count": projects_count,
        "certificates_count": certificates_count,
        "profile_saved": profile_saved,
        "settings": Setting::all(pool),
    });

    Template::render("admin/dashboard", &context)
}
