use rocket::form::Form;
use rocket::http::{CookieJar, Header};
use rocket::response::{self, Redirect, Responder};
use rocket::{Request, State};
use rocket_dyn_templates::Template;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth;
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::rate_limit::RateLimiter;
use crate::AdminSlug;

/// Wrapper that adds no-cache headers to a Template response
pub struct NoCacheTemplate(Template);

impl<'r> Responder<'r, 'static> for NoCacheTemplate {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = self.0.respond_to(req)?;
        resp.set_header(Header::new(
            "Cache-Control",
            "no-store, no-cache, must-revalidate, max-age=0",
        ));
        resp.set_header(Header::new("Pragma", "no-cache"));
        Ok(resp)
    }
}

#[derive(Debug, FromForm, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Returns true if this is a fresh install (no admin email set)
pub fn needs_setup(pool: &DbPool) -> bool {
    let email = Setting::get_or(pool, "admin_email", "");
    let hash = Setting::get_or(pool, "admin_password_hash", "");
    email.is_empty() || hash.is_empty()
}

fn login_context(pool: &DbPool, slug: &AdminSlug, error: Option<&str>) -> HashMap<String, String> {
    let mut context: HashMap<String, String> = HashMap::new();
    context.insert(
        "site_name".to_string(),
        Setting::get_or(pool, "site_name", "Folio"),
    );
    context.insert("admin_slug".to_string(), slug.0.clone());
    context.insert("error".to_string(), error.unwrap_or("").to_string());
    context
}

#[get("/login")]
pub fn login_page(pool: &State<DbPool>, slug: &State<AdminSlug>) -> Result<NoCacheTemplate, Redirect> {
    if needs_setup(pool) {
        return Err(Redirect::to("/setup"));
    }
    Ok(NoCacheTemplate(Template::render(
        "admin/login",
        login_context(pool, slug, None),
    )))
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    form: Form<LoginForm>,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    limiter: &State<RateLimiter>,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, Template> {
    let rate_key = format!("login:{}", auth::hash_ip(form.email.trim()));
    let max_attempts = Setting::get_i64(pool, "login_rate_limit").max(1) as u64;
    let window = std::time::Duration::from_secs(15 * 60);

    // Check rate limit before touching credentials
    if !limiter.check_and_record(&rate_key, max_attempts, window) {
        return Err(Template::render(
            "admin/login",
            login_context(
                pool,
                slug,
                Some("Too many login attempts. Please try again in 15 minutes."),
            ),
        ));
    }

    let stored_hash = Setting::get(pool, "admin_password_hash").unwrap_or_default();
    let admin_email = Setting::get_or(pool, "admin_email", "");

    if admin_email.is_empty() || form.email.trim() != admin_email {
        return Err(Template::render(
            "admin/login",
            login_context(pool, slug, Some("Invalid credentials")),
        ));
    }

    if !auth::verify_password(&form.password, &stored_hash) {
        return Err(Template::render(
            "admin/login",
            login_context(pool, slug, Some("Invalid credentials")),
        ));
    }

    match auth::create_session(pool, None, None) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id);
            Ok(Redirect::to(format!("/{}", slug.0)))
        }
        Err(_) => Err(Template::render(
            "admin/login",
            login_context(pool, slug, Some("Session creation failed")),
        )),
    }
}

#[get("/logout")]
pub fn logout(pool: &State<DbPool>, cookies: &CookieJar<'_>) -> Redirect {
    if let Some(session_id) = auth::session_cookie_value(cookies) {
        let _ = auth::destroy_session(pool, &session_id);
    }
    auth::clear_session_cookie(cookies);
    Redirect::to("/login")
}

// ── First-Time Setup ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SetupContext {
    error: Option<String>,
    site_name: String,
    admin_email: String,
}

#[derive(Debug, FromForm, Deserialize)]
pub struct SetupForm {
    pub site_name: String,
    pub admin_email: String,
    pub password: String,
    pub confirm_password: String,
}

#[get("/setup")]
pub fn setup_page(pool: &State<DbPool>) -> Result<NoCacheTemplate, Redirect> {
    if !needs_setup(pool) {
        return Err(Redirect::to("/login"));
    }
    let ctx = SetupContext {
        error: None,
        site_name: Setting::get_or(pool, "site_name", "Folio"),
        admin_email: String::new(),
    };
    Ok(NoCacheTemplate(Template::render("admin/setup", &ctx)))
}

#[post("/setup", data = "<form>")]
pub fn setup_submit(form: Form<SetupForm>, pool: &State<DbPool>) -> Result<Redirect, Template> {
    if !needs_setup(pool) {
        return Ok(Redirect::to("/login"));
    }

    let make_err = |msg: &str, form: &SetupForm| {
        let ctx = SetupContext {
            error: Some(msg.to_string()),
            site_name: form.site_name.clone(),
            admin_email: form.admin_email.clone(),
        };
        Template::render("admin/setup", &ctx)
    };

    if form.admin_email.trim().is_empty() {
        return Err(make_err("Email is required.", &form));
    }
    if form.password.len() < 8 {
        return Err(make_err("Password must be at least 8 characters.", &form));
    }
    if form.password != form.confirm_password {
        return Err(make_err("Passwords do not match.", &form));
    }

    let hash = auth::hash_password(&form.password)
        .map_err(|_| make_err("Failed to hash password.", &form))?;

    let _ = Setting::set(pool, "site_name", form.site_name.trim());
    let _ = Setting::set(pool, "admin_email", form.admin_email.trim());
    let _ = Setting::set(pool, "admin_password_hash", &hash);

    Ok(Redirect::to("/login"))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_page, login_submit, logout, setup_page, setup_submit]
}
