#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket_dyn_templates::Template;

mod auth;
mod boot;
mod db;
mod email;
mod gallery;
mod images;
mod rate_limit;
mod render;
mod seo;
mod theme;

mod models;
mod routes;
mod security;

#[cfg(test)]
mod tests;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use serde_json::json;

use models::settings::Setting;
use rate_limit::RateLimiter;
use theme::Theme;

/// Holds the admin URL slug, read from DB at startup.
/// Shared via Rocket managed state so routes and fairings can access it.
pub struct AdminSlug(pub String);

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Pages", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        let slug = req.rocket().state::<AdminSlug>()
            .map(|s| s.0.as_str())
            .unwrap_or("admin");
        let prefix = format!("/{}", slug);
        if req.uri().path().starts_with(&*prefix) {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found(req: &rocket::Request) -> RawHtml<String> {
    match req.rocket().state::<db::DbPool>() {
        Some(pool) => {
            let theme = Theme::resolve(req.cookies(), pool);
            let context = json!({
                "settings": Setting::all(pool),
                "path": req.uri().path().as_str(),
                "seo": seo::build_meta(pool, Some("Not Found"), None, req.uri().path().as_str()),
            });
            RawHtml(render::render_page("404", theme, &context))
        }
        None => RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string()),
    }
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check — verify/create directories, validate critical files
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    if let Err(e) = auth::cleanup_expired_sessions(&pool) {
        log::warn!("Session cleanup failed: {}", e);
    }

    let admin_slug = Setting::get_or(&pool, "admin_slug", "admin");
    let admin_mount = format!("/{}", admin_slug);

    log::info!("Admin panel mounted at: {}", admin_mount);

    rocket::build()
        .manage(pool)
        .manage(AdminSlug(admin_slug))
        .manage(RateLimiter::new())
        .attach(Template::fairing())
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::from("website/static"))
        .mount("/uploads", FileServer::from("website/uploads"))
        .mount("/", routes::public::routes())
        .mount("/", routes::auth::routes())
        .mount(&admin_mount, routes::admin::routes())
        .register("/", catchers![not_found, server_error])
}
