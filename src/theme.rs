use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;

use crate::db::DbPool;
use crate::models::settings::Setting;

const THEME_COOKIE: &str = "folio_theme";

/// Site-wide color scheme. Resolved once per request and passed
/// explicitly into every render function; there is no global theme
/// state. The visitor's choice persists across sessions in a cookie,
/// with the `theme_default` setting as the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The single body class every themed page derives its styling
    /// from.
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn resolve(cookies: &CookieJar<'_>, pool: &DbPool) -> Self {
        cookies
            .get(THEME_COOKIE)
            .and_then(|c| Theme::from_value(c.value()))
            .unwrap_or_else(|| {
                Theme::from_value(&Setting::get_or(pool, "theme_default", "dark"))
                    .unwrap_or(Theme::Dark)
            })
    }

    pub fn store(self, cookies: &CookieJar<'_>) {
        let mut cookie = Cookie::new(THEME_COOKIE, self.value());
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(rocket::time::Duration::days(365));
        cookies.add(cookie);
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Theme {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let theme = match request.guard::<&State<DbPool>>().await {
            Outcome::Success(pool) => Theme::resolve(request.cookies(), pool),
            _ => Theme::Dark,
        };
        Outcome::Success(theme)
    }
}
