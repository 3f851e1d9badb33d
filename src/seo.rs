use crate::db::DbPool;
use crate::models::project::Project;
use crate::models::settings::Setting;
use crate::render::html_escape;

/// Build meta tags HTML string for a page
pub fn build_meta(
    pool: &DbPool,
    title: Option<&str>,
    description: Option<&str>,
    path: &str,
) -> String {
    let site_name = Setting::get_or(pool, "site_name", "Folio");
    let site_url = Setting::get_or(pool, "site_url", "http://localhost:8000");
    let default_desc = Setting::get_or(pool, "seo_default_description", "");

    let page_title = match title {
        Some(t) => format!("{} — {}", t, site_name),
        None => site_name.clone(),
    };

    let page_desc = description.unwrap_or(&default_desc);
    let canonical = format!("{}{}", site_url, path);

    format!(
        r#"<title>{title}</title>
<meta name="description" content="{desc}">
<link rel="canonical" href="{canonical}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{desc}">
<meta property="og:url" content="{canonical}">
<meta property="og:site_name" content="{site}">
<meta property="og:type" content="website">"#,
        title = html_escape(&page_title),
        desc = html_escape(page_desc),
        canonical = html_escape(&canonical),
        site = html_escape(&site_name),
    )
}

/// XML sitemap covering the public routes and every project page.
pub fn generate_sitemap(pool: &DbPool) -> String {
    let site_url = Setting::get_or(pool, "site_url", "http://localhost:8000");

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in ["/", "/about", "/projects", "/contact"] {
        xml.push_str(&format!("  <url><loc>{}{}</loc></url>\n", site_url, path));
    }
    for project in Project::list(pool) {
        xml.push_str(&format!(
            "  <url><loc>{}/projects/{}</loc></url>\n",
            site_url, project.id
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}
