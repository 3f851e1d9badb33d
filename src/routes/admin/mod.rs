use rocket::response::Redirect;
use rocket::State;

use crate::db::DbPool;
use crate::AdminSlug;

pub mod certificates;
pub mod dashboard;
pub mod media;
pub mod profile;
pub mod projects;
pub mod settings;

/// Helper: get the admin base path from managed state
pub(crate) fn admin_base(slug: &AdminSlug) -> String {
    format!("/{}", slug.0)
}

/// Catch-all for any admin route that failed the AdminUser guard.
/// Fires when the guard returns Forward(Unauthorized).
#[get("/<_path..>", rank = 99)]
pub fn redirect_to_login(_path: std::path::PathBuf, pool: &State<DbPool>) -> Redirect {
    if crate::routes::auth::needs_setup(pool) {
        Redirect::to("/setup")
    } else {
        Redirect::to("/login")
    }
}

/// Same for POST: every admin mutation is a form submission, and a
/// session that expired while the form was open should land back on
/// the login page, not a 404.
#[post("/<_path..>", rank = 99)]
pub fn redirect_to_login_post(_path: std::path::PathBuf, pool: &State<DbPool>) -> Redirect {
    if crate::routes::auth::needs_setup(pool) {
        Redirect::to("/setup")
    } else {
        Redirect::to("/login")
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard::dashboard,
        profile::profile_page,
        profile::profile_save,
        profile::avatar_upload,
        certificates::certificates_list,
        certificates::certificate_new,
        certificates::certificate_edit,
        certificates::certificate_create,
        certificates::certificate_update,
        certificates::certificate_delete,
        projects::projects_list,
        projects::project_new,
        projects::project_edit,
        projects::project_create,
        projects::project_update,
        projects::project_delete,
        media::media_library,
        media::media_delete,
        media::upload_image,
        settings::settings_page,
        settings::settings_save,
        redirect_to_login,
        redirect_to_login_post,
    ]
}
