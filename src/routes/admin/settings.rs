use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::collections::HashMap;

use super::admin_base;
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::AdminSlug;

/// Keys the settings form may write. Everything else (password hash,
/// admin slug) is managed elsewhere and ignored here.
const EDITABLE_KEYS: &[&str] = &[
    "site_name",
    "site_caption",
    "site_url",
    "admin_email",
    "theme_default",
    "session_expiry_hours",
    "login_rate_limit",
    "images_max_upload_mb",
    "images_allowed_types",
    "contact_email",
    "contact_location",
    "contact_rate_limit",
    "recaptcha_site_key",
    "recaptcha_secret_key",
    "email_smtp_enabled",
    "email_smtp_host",
    "email_smtp_port",
    "email_smtp_username",
    "email_smtp_password",
    "email_gmail_enabled",
    "email_gmail_address",
    "email_gmail_app_password",
    "social_github",
    "social_linkedin",
    "social_twitter",
    "social_instagram",
    "seo_default_description",
    "seo_robots_txt",
];

/// Checkboxes don't submit a value when unchecked, so these keys are
/// explicitly reset to "false" before the submitted values are applied.
const CHECKBOX_KEYS: &[&str] = &["email_smtp_enabled", "email_gmail_enabled"];

#[get("/settings")]
pub fn settings_page(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    flash: Option<FlashMessage<'_>>,
) -> Template {
    let mut context = json!({
        "page_title": "Settings",
        "admin_slug": slug.0,
        "flash_kind": serde_json::Value::Null,
        "flash_msg": serde_json::Value::Null,
        "settings": Setting::all(pool),
    });

    if let Some(ref f) = flash {
        context["flash_kind"] = json!(f.kind());
        context["flash_msg"] = json!(f.message());
    }

    Template::render("admin/settings", &context)
}

/// Required companion fields for toggled-on providers.
fn validate(data: &HashMap<String, String>) -> Result<(), String> {
    let enabled = |key: &str| data.get(key).map(|v| v == "true").unwrap_or(false);
    let empty = |key: &str| data.get(key).map(|v| v.trim().is_empty()).unwrap_or(true);

    if enabled("email_smtp_enabled") && (empty("email_smtp_host") || empty("email_smtp_username")) {
        return Err("Custom SMTP needs a host and username.".to_string());
    }
    if enabled("email_gmail_enabled")
        && (empty("email_gmail_address") || empty("email_gmail_app_password"))
    {
        return Err("Gmail needs an address and app password.".to_string());
    }
    let recaptcha_site = !empty("recaptcha_site_key");
    let recaptcha_secret = !empty("recaptcha_secret_key");
    if recaptcha_site != recaptcha_secret {
        return Err("reCAPTCHA needs both the site key and the secret key.".to_string());
    }
    Ok(())
}

#[post("/settings", data = "<form>")]
pub fn settings_save(
    _admin: AdminUser,
    pool: &State<DbPool>,
    slug: &State<AdminSlug>,
    form: Form<HashMap<String, String>>,
) -> Flash<Redirect> {
    let data = form.into_inner();
    let target = format!("{}/settings", admin_base(slug));

    if let Err(msg) = validate(&data) {
        return Flash::error(Redirect::to(target), msg);
    }

    for key in CHECKBOX_KEYS {
        let _ = Setting::set(pool, key, "false");
    }

    let filtered: HashMap<String, String> = data
        .into_iter()
        .filter(|(k, _)| EDITABLE_KEYS.contains(&k.as_str()))
        .collect();

    match Setting::set_many(pool, &filtered) {
        Ok(()) => Flash::success(Redirect::to(target), "Settings saved."),
        Err(e) => Flash::error(Redirect::to(target), e),
    }
}
