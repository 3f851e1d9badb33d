use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::content::{RawHtml, RawXml};
use rocket::response::Redirect;
use rocket::State;
use serde_json::json;

use crate::db::DbPool;
use crate::email;
use crate::gallery::{ImageSequence, Lightbox};
use crate::models::certificate::Certificate;
use crate::models::profile::Profile;
use crate::models::project::Project;
use crate::models::settings::Setting;
use crate::rate_limit::RateLimiter;
use crate::render;
use crate::security::recaptcha;
use crate::seo;
use crate::theme::Theme;

// ── Homepage ───────────────────────────────────────────

#[get("/")]
pub fn homepage(pool: &State<DbPool>, theme: Theme) -> RawHtml<String> {
    let profile = Profile::load_or_default(pool);
    let projects = Project::latest(pool, 3);
    let certificates = Certificate::list(pool);

    let context = json!({
        "settings": Setting::all(pool),
        "profile": profile,
        "projects": projects,
        "certificates": certificates.iter().take(3).collect::<Vec<_>>(),
        "path": "/",
        "seo": seo::build_meta(pool, None, None, "/"),
    });

    RawHtml(render::render_page("home", theme, &context))
}

// ── About ──────────────────────────────────────────────

#[get("/about")]
pub fn about(pool: &State<DbPool>, theme: Theme) -> RawHtml<String> {
    let profile = Profile::load_or_default(pool);
    let certificates = Certificate::list(pool);

    let context = json!({
        "settings": Setting::all(pool),
        "profile": profile,
        "certificates": certificates,
        "path": "/about",
        "seo": seo::build_meta(pool, Some("About"), None, "/about"),
    });

    RawHtml(render::render_page("about", theme, &context))
}

// ── Projects ───────────────────────────────────────────

#[get("/projects")]
pub fn projects_grid(pool: &State<DbPool>, theme: Theme) -> RawHtml<String> {
    let projects = Project::list(pool);

    let context = json!({
        "settings": Setting::all(pool),
        "projects": projects,
        "path": "/projects",
        "seo": seo::build_meta(pool, Some("Projects"), None, "/projects"),
    });

    RawHtml(render::render_page("projects", theme, &context))
}

#[get("/projects/<id>?<image>")]
pub fn project_detail(
    pool: &State<DbPool>,
    theme: Theme,
    id: i64,
    image: Option<usize>,
) -> Option<RawHtml<String>> {
    let project = Project::find_by_id(pool, id)?;

    // Single source of truth for every lightbox index on this page.
    let sequence = ImageSequence::new(&project.thumbnail_path, &project.detail_images);
    let lightbox = Lightbox::from_query(&sequence, image);

    let lightbox_ctx = match lightbox {
        Lightbox::Viewing(i) => json!({
            "index": i,
            "image": lightbox.current_image(&sequence),
            "prev": lightbox.prev(&sequence).index(),
            "next": lightbox.next(&sequence).index(),
        }),
        Lightbox::Idle => serde_json::Value::Null,
    };

    let related: Vec<Project> = Project::list(pool)
        .into_iter()
        .filter(|p| p.id != id)
        .take(2)
        .collect();

    let context = json!({
        "settings": Setting::all(pool),
        "project": project,
        "images": sequence.iter().collect::<Vec<_>>(),
        "lightbox": lightbox_ctx,
        "related": related,
        "path": format!("/projects/{}", id),
        "seo": seo::build_meta(
            pool,
            Some(&project.title),
            Some(&project.short_description),
            &format!("/projects/{}", id),
        ),
    });

    Some(RawHtml(render::render_page("project_detail", theme, &context)))
}

// ── Contact ────────────────────────────────────────────

#[derive(FromForm)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot; bots fill it, people never see it.
    #[field(name = "_honey")]
    pub honey: Option<String>,
    #[field(name = "g-recaptcha-response")]
    pub captcha_token: Option<String>,
}

/// Field-level validation; runs before the CAPTCHA call and the send.
pub fn validate_contact(name: &str, email: &str, message: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required.".to_string());
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || !email.split('@').nth(1).map(|d| d.contains('.')).unwrap_or(false)
    {
        return Err("Please enter a valid email address.".to_string());
    }
    if message.trim().len() < 10 {
        return Err("Message must be at least 10 characters long.".to_string());
    }
    Ok(())
}

fn contact_context(
    pool: &DbPool,
    flash: Option<(&str, &str)>,
    form: Option<&ContactForm>,
) -> serde_json::Value {
    let settings = Setting::all(pool);
    let captcha_required = recaptcha::enabled(&settings);

    let flash_ctx = match flash {
        Some((kind, message)) => json!({ "kind": kind, "message": message }),
        None => serde_json::Value::Null,
    };
    let form_ctx = match form {
        Some(f) => json!({ "name": f.name, "email": f.email, "message": f.message }),
        None => serde_json::Value::Null,
    };

    json!({
        "settings": settings,
        "captcha_required": captcha_required,
        "flash": flash_ctx,
        "form": form_ctx,
        "path": "/contact",
        "seo": seo::build_meta(pool, Some("Contact"), None, "/contact"),
    })
}

#[get("/contact")]
pub fn contact_page(pool: &State<DbPool>, theme: Theme) -> RawHtml<String> {
    RawHtml(render::render_page(
        "contact",
        theme,
        &contact_context(pool, None, None),
    ))
}

#[post("/contact", data = "<form>")]
pub fn contact_submit(
    pool: &State<DbPool>,
    theme: Theme,
    limiter: &State<RateLimiter>,
    form: Form<ContactForm>,
) -> RawHtml<String> {
    let render_with = |flash: (&str, &str), keep_form: bool| {
        let form_ref = if keep_form { Some(&*form) } else { None };
        RawHtml(render::render_page(
            "contact",
            theme,
            &contact_context(pool, Some(flash), form_ref),
        ))
    };

    // Honeypot: pretend success so bots learn nothing.
    if form.honey.as_deref().is_some_and(|h| !h.is_empty()) {
        return render_with(("success", "Your message has been sent."), false);
    }

    if let Err(msg) = validate_contact(&form.name, &form.email, &form.message) {
        return render_with(("error", msg.as_str()), true);
    }

    let max_attempts = Setting::get_i64(pool, "contact_rate_limit").max(1) as u64;
    let rate_key = format!("contact:{}", crate::auth::hash_ip(form.email.trim()));
    if !limiter.check_and_record(&rate_key, max_attempts, std::time::Duration::from_secs(15 * 60))
    {
        return render_with(
            ("error", "Too many messages. Please try again later."),
            true,
        );
    }

    let settings = Setting::all(pool);
    if recaptcha::enabled(&settings) {
        let token = form.captcha_token.as_deref().unwrap_or("");
        if token.is_empty() {
            return render_with(("error", "Please complete the CAPTCHA."), true);
        }
        match recaptcha::verify(&settings, token, None) {
            Ok(true) => {}
            Ok(false) => {
                return render_with(("error", "CAPTCHA verification failed. Please try again."), true)
            }
            Err(e) => {
                log::error!("CAPTCHA verification error: {}", e);
                return render_with(
                    ("error", "Could not verify the CAPTCHA. Please try again."),
                    true,
                );
            }
        }
    }

    match email::send_contact_email(pool, form.name.trim(), form.email.trim(), form.message.trim())
    {
        Ok(()) => render_with(("success", "Your message has been sent. Thank you!"), false),
        Err(e) => {
            log::error!("Contact email failed: {}", e);
            render_with(
                ("error", "Sending failed. Please try again in a moment."),
                true,
            )
        }
    }
}

// ── Theme toggle ───────────────────────────────────────

#[derive(FromForm)]
pub struct ThemeForm {
    pub next: Option<String>,
}

#[post("/theme", data = "<form>")]
pub fn theme_toggle(
    pool: &State<DbPool>,
    cookies: &CookieJar<'_>,
    form: Form<ThemeForm>,
) -> Redirect {
    let current = Theme::resolve(cookies, pool);
    current.toggled().store(cookies);

    // Only redirect to local paths; anything else goes home.
    let next = form
        .next
        .as_deref()
        .filter(|n| n.starts_with('/') && !n.starts_with("//"))
        .unwrap_or("/");
    Redirect::to(next.to_string())
}

// ── Sitemap / robots ───────────────────────────────────

#[get("/sitemap.xml")]
pub fn sitemap(pool: &State<DbPool>) -> RawXml<String> {
    RawXml(seo::generate_sitemap(pool))
}

#[get("/robots.txt")]
pub fn robots(pool: &State<DbPool>) -> String {
    let mut content = Setting::get_or(pool, "seo_robots_txt", "User-agent: *\nAllow: /");
    let site_url = Setting::get_or(pool, "site_url", "http://localhost:8000");
    content.push_str(&format!("\nSitemap: {}/sitemap.xml", site_url));
    content
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        homepage,
        about,
        projects_grid,
        project_detail,
        contact_page,
        contact_submit,
        theme_toggle,
        sitemap,
        robots,
    ]
}
