use serde_json::Value;

use crate::theme::Theme;

/// Renders a full public page: shared shell around the page-specific
/// body. The theme is passed in explicitly and becomes exactly one
/// body class; every themed rule keys off that class.
pub fn render_page(page_type: &str, theme: Theme, context: &Value) -> String {
    let body_html = match page_type {
        "home" => render_home(context),
        "about" => render_about(context),
        "projects" => render_projects(context),
        "project_detail" => render_project_detail(context),
        "contact" => render_contact(context),
        _ => render_404(context),
    };

    let script = if page_type == "project_detail" {
        LIGHTBOX_JS
    } else {
        ""
    };

    shell(theme, context, &body_html, script)
}

fn sg<'a>(settings: &'a Value, key: &str, def: &'a str) -> &'a str {
    settings.get(key).and_then(|v| v.as_str()).unwrap_or(def)
}

fn shell(theme: Theme, context: &Value, body_html: &str, script: &str) -> String {
    let settings = context.get("settings").cloned().unwrap_or_default();
    let site_name = sg(&settings, "site_name", "Folio").to_string();
    let seo_meta = context
        .get("seo")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .to_string();
    let current_path = context
        .get("path")
        .and_then(|s| s.as_str())
        .unwrap_or("/")
        .to_string();

    // Lock page scroll when the server renders the lightbox already
    // open (the script handles the same for in-page opens).
    let body_style = if context
        .get("lightbox")
        .map(|lb| !lb.is_null())
        .unwrap_or(false)
    {
        " style=\"overflow:hidden\""
    } else {
        ""
    };

    let nav_links = [
        ("/", "Home"),
        ("/about", "About"),
        ("/projects", "Projects"),
        ("/contact", "Contact"),
    ]
    .iter()
    .map(|(href, label)| {
        let active = if *href == current_path { " active" } else { "" };
        format!(
            "<a href=\"{}\" class=\"nav-link{}\">{}</a>",
            href, active, label
        )
    })
    .collect::<Vec<_>>()
    .join("\n            ");

    let toggle_label = match theme {
        Theme::Dark => "Light",
        Theme::Light => "Dark",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {seo_meta}
    <style>
{base_css}
    </style>
</head>
<body class="{theme_class}"{body_style}>
    <header class="site-header">
        <a href="/" class="site-brand">{site_name}</a>
        <nav class="site-nav">
            {nav_links}
            <form method="post" action="/theme" class="theme-form">
                <input type="hidden" name="next" value="{next_path}">
                <button type="submit" class="theme-toggle">{toggle_label}</button>
            </form>
        </nav>
    </header>
    <main>
{body_html}
    </main>
    <footer class="site-footer">
        {footer_social}
        <div class="footer-text">&copy; {year} {site_name}</div>
    </footer>
    <script>{script}</script>
</body>
</html>"#,
        seo_meta = seo_meta,
        base_css = BASE_CSS,
        theme_class = theme.body_class(),
        body_style = body_style,
        site_name = html_escape(&site_name),
        nav_links = nav_links,
        next_path = html_escape(&current_path),
        toggle_label = toggle_label,
        footer_social = build_social_links(&settings),
        year = chrono::Utc::now().format("%Y"),
        script = script,
    )
}

fn build_social_links(settings: &Value) -> String {
    let networks = [
        ("social_github", "GitHub"),
        ("social_linkedin", "LinkedIn"),
        ("social_twitter", "Twitter"),
        ("social_instagram", "Instagram"),
    ];
    let links: Vec<String> = networks
        .iter()
        .filter_map(|(key, label)| {
            let url = sg(settings, key, "");
            if url.is_empty() {
                None
            } else {
                Some(format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    html_escape(url),
                    label
                ))
            }
        })
        .collect();
    if links.is_empty() {
        String::new()
    } else {
        format!("<div class=\"footer-social\">{}</div>", links.join(" "))
    }
}

// ── Home ───────────────────────────────────────────────

fn render_home(context: &Value) -> String {
    let profile = context.get("profile").cloned().unwrap_or_default();
    let name = sg(&profile, "name", "");
    let role = sg(&profile, "role", "");
    let avatar = sg(&profile, "avatar_path", "");
    let intro = profile
        .get("bio_paragraphs")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let avatar_html = if avatar.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" class=\"hero-avatar\" onerror=\"this.src='{}'\">",
            html_escape(avatar),
            html_escape(name),
            PLACEHOLDER_IMAGE,
        )
    };

    let mut html = format!(
        r#"<section class="hero">
    {avatar}
    <h1>{name}</h1>
    <p class="hero-role">{role}</p>
    <p class="hero-intro">{intro}</p>
    <div class="hero-actions">
        <a href="/projects" class="btn btn-primary">View Projects</a>
        <a href="/contact" class="btn btn-secondary">Get in Touch</a>
    </div>
</section>"#,
        avatar = avatar_html,
        name = html_escape(name),
        role = html_escape(role),
        intro = html_escape(intro),
    );

    if let Some(Value::Array(projects)) = context.get("projects") {
        if !projects.is_empty() {
            html.push_str("<section class=\"section\"><h2>Recent Projects</h2><div class=\"project-grid\">");
            for project in projects {
                html.push_str(&project_card(project));
            }
            html.push_str("</div><p class=\"section-more\"><a href=\"/projects\">All projects →</a></p></section>");
        }
    }

    if let Some(Value::Array(certs)) = context.get("certificates") {
        if !certs.is_empty() {
            html.push_str("<section class=\"section\"><h2>Certificates</h2><div class=\"cert-grid\">");
            for cert in certs {
                html.push_str(&certificate_card(cert));
            }
            html.push_str("</div></section>");
        }
    }

    html
}

fn project_card(project: &Value) -> String {
    let id = project.get("id").and_then(|v| v.as_i64()).unwrap_or(0);
    let title = project.get("title").and_then(|v| v.as_str()).unwrap_or("");
    let short = project
        .get("short_description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let thumb = project
        .get("thumbnail_path")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let tags_html = project
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|tags| {
            tags.iter()
                .map(|t| {
                    let name = t.get("name").and_then(|v| v.as_str()).unwrap_or("");
                    let color = t.get("color").and_then(|v| v.as_str()).unwrap_or("");
                    format!(
                        "<span class=\"tag\" style=\"color:{}\">{}</span>",
                        html_escape(color),
                        html_escape(name)
                    )
                })
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    format!(
        r#"<a href="/projects/{id}" class="project-card">
    <img src="{thumb}" alt="{title}" loading="lazy" onerror="this.src='{placeholder}'">
    <div class="project-card-body">
        <h3>{title}</h3>
        <p>{short}</p>
        <div class="tag-row">{tags}</div>
    </div>
</a>"#,
        id = id,
        thumb = html_escape(thumb),
        title = html_escape(title),
        short = html_escape(short),
        tags = tags_html,
        placeholder = PLACEHOLDER_IMAGE,
    )
}

fn certificate_card(cert: &Value) -> String {
    let title = cert.get("title").and_then(|v| v.as_str()).unwrap_or("");
    let issuer = cert.get("issuer").and_then(|v| v.as_str()).unwrap_or("");
    let description = cert
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let image = cert.get("image_path").and_then(|v| v.as_str()).unwrap_or("");

    let image_html = if image.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\" onerror=\"this.src='{}'\">",
            html_escape(image),
            html_escape(title),
            PLACEHOLDER_IMAGE,
        )
    };

    format!(
        r#"<div class="cert-card">
    {image}
    <div class="cert-card-body">
        <h3>{title}</h3>
        <p class="cert-issuer">{issuer}</p>
        <p>{description}</p>
    </div>
</div>"#,
        image = image_html,
        title = html_escape(title),
        issuer = html_escape(issuer),
        description = html_escape(description),
    )
}

// ── About ──────────────────────────────────────────────

fn render_about(context: &Value) -> String {
    let profile = context.get("profile").cloned().unwrap_or_default();
    let name = sg(&profile, "name", "");
    let role = sg(&profile, "role", "");
    let avatar = sg(&profile, "avatar_path", "");

    let paragraphs = profile
        .get("bio_paragraphs")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .map(|p| format!("<p>{}</p>", html_escape(p)))
                .collect::<String>()
        })
        .unwrap_or_default();

    let facts = profile
        .get("quick_facts")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .map(|f| format!("<li>{}</li>", html_escape(f)))
                .collect::<String>()
        })
        .unwrap_or_default();

    let details = profile
        .get("details")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .map(|d| {
                    let text = d.get("text").and_then(|v| v.as_str()).unwrap_or("");
                    format!("<li>{}</li>", html_escape(text))
                })
                .collect::<String>()
        })
        .unwrap_or_default();

    let links = profile
        .get("social_links")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .map(|l| {
                    let label = l.get("name").and_then(|v| v.as_str()).unwrap_or("");
                    let url = l.get("url").and_then(|v| v.as_str()).unwrap_or("");
                    format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                        html_escape(url),
                        html_escape(label)
                    )
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let avatar_html = if avatar.is_empty() {
        String::new()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" class=\"about-avatar\" onerror=\"this.src='{}'\">",
            html_escape(avatar),
            html_escape(name),
            PLACEHOLDER_IMAGE,
        )
    };

    let facts_html = if facts.is_empty() {
        String::new()
    } else {
        format!("<h2>Quick Facts</h2><ul class=\"fact-list\">{}</ul>", facts)
    };
    let details_html = if details.is_empty() {
        String::new()
    } else {
        format!("<ul class=\"detail-list\">{}</ul>", details)
    };
    let links_html = if links.is_empty() {
        String::new()
    } else {
        format!("<div class=\"about-links\">{}</div>", links)
    };

    let mut html = format!(
        r#"<section class="about">
    <div class="about-header">
        {avatar}
        <div>
            <h1>{name}</h1>
            <p class="hero-role">{role}</p>
            {details}
            {links}
        </div>
    </div>
    <div class="about-bio">{paragraphs}</div>
    {facts}
</section>"#,
        avatar = avatar_html,
        name = html_escape(name),
        role = html_escape(role),
        details = details_html,
        links = links_html,
        paragraphs = paragraphs,
        facts = facts_html,
    );

    if let Some(Value::Array(certs)) = context.get("certificates") {
        if !certs.is_empty() {
            html.push_str("<section class=\"section\"><h2>Certificates</h2><div class=\"cert-grid\">");
            for cert in certs {
                html.push_str(&certificate_card(cert));
            }
            html.push_str("</div></section>");
        }
    }

    html
}

// ── Projects ───────────────────────────────────────────

fn render_projects(context: &Value) -> String {
    let mut html = String::from("<section class=\"section\"><h1>Projects</h1>");

    match context.get("projects") {
        Some(Value::Array(projects)) if !projects.is_empty() => {
            html.push_str("<div class=\"project-grid\">");
            for project in projects {
                html.push_str(&project_card(project));
            }
            html.push_str("</div>");
        }
        _ => {
            html.push_str("<p class=\"empty-note\">Nothing here yet.</p>");
        }
    }

    html.push_str("</section>");
    html
}

// ── Project detail ─────────────────────────────────────

fn render_project_detail(context: &Value) -> String {
    let project = context.get("project").cloned().unwrap_or_default();
    let id = project.get("id").and_then(|v| v.as_i64()).unwrap_or(0);
    let title = project.get("title").and_then(|v| v.as_str()).unwrap_or("");
    let description = project
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let repo_url = project.get("repo_url").and_then(|v| v.as_str()).unwrap_or("");
    let demo_url = project.get("demo_url").and_then(|v| v.as_str()).unwrap_or("");

    let images: Vec<&str> = context
        .get("images")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    let hero = images.first().copied().unwrap_or("");

    let tags_html = project
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|tags| {
            tags.iter()
                .map(|t| {
                    let name = t.get("name").and_then(|v| v.as_str()).unwrap_or("");
                    let color = t.get("color").and_then(|v| v.as_str()).unwrap_or("");
                    format!(
                        "<span class=\"tag tag-pill\" style=\"color:{}\">{}</span>",
                        html_escape(color),
                        html_escape(name)
                    )
                })
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    // Hero opens the lightbox at position 0 (the thumbnail heads the
    // sequence).
    let mut html = format!(
        r#"<section class="project-detail">
    <a href="/projects" class="back-link">← Back to Projects</a>
    <a href="/projects/{id}?image=0" class="project-hero gallery-link" data-index="0">
        <img src="{hero}" alt="{title}" onerror="this.src='{placeholder}'">
        <div class="project-hero-overlay">
            <div class="tag-row">{tags}</div>
            <h1>{title}</h1>
        </div>
    </a>"#,
        id = id,
        hero = html_escape(hero),
        title = html_escape(title),
        tags = tags_html,
        placeholder = PLACEHOLDER_IMAGE,
    );

    // Thumbnail strip only when there is more than one image.
    if images.len() > 1 {
        html.push_str("<div class=\"gallery-grid\">");
        for (i, img) in images.iter().enumerate() {
            html.push_str(&format!(
                r#"<a href="/projects/{id}?image={i}" class="gallery-link" data-index="{i}">
    <img src="{img}" alt="{title} — view {n}" loading="lazy" onerror="this.src='{placeholder}'">
</a>"#,
                id = id,
                i = i,
                img = html_escape(img),
                title = html_escape(title),
                n = i + 1,
                placeholder = PLACEHOLDER_IMAGE,
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(&format!(
        r#"<div class="panel">
    <h2>Project Overview</h2>
    <p class="project-description">{}</p>
</div>"#,
        html_escape(description).replace('\n', "<br>")
    ));

    let mut buttons = String::new();
    if !repo_url.trim().is_empty() {
        buttons.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"btn btn-primary\">View Repository</a>",
            html_escape(repo_url)
        ));
    }
    if !demo_url.trim().is_empty() {
        let class = if repo_url.trim().is_empty() {
            "btn btn-primary"
        } else {
            "btn btn-secondary"
        };
        buttons.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"{}\">Live Demo</a>",
            html_escape(demo_url),
            class
        ));
    }
    if !buttons.is_empty() {
        html.push_str(&format!("<div class=\"project-actions\">{}</div>", buttons));
    }

    if let Some(Value::Array(related)) = context.get("related") {
        if !related.is_empty() {
            html.push_str("<h2 class=\"related-heading\">More Projects</h2><div class=\"project-grid\">");
            for project in related {
                html.push_str(&project_card(project));
            }
            html.push_str("</div>");
        }
    }

    html.push_str(&render_lightbox(context, id, &images));
    html.push_str("</section>");
    html
}

/// Server-rendered lightbox overlay: open when `?image=` was valid,
/// with prev/next/close as plain links so navigation works without the
/// script. The embedded script replaces those links with in-page
/// transitions using the same wrap-around arithmetic.
fn render_lightbox(context: &Value, project_id: i64, images: &[&str]) -> String {
    let lightbox = context.get("lightbox").cloned().unwrap_or(Value::Null);

    let images_json =
        serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string());
    let data_block = format!(
        "<script type=\"application/json\" id=\"gallery-data\">{}</script>",
        images_json
    );

    let Some(index) = lightbox.get("index").and_then(|v| v.as_u64()) else {
        return format!("{}<div id=\"lightbox\" class=\"lightbox-overlay\" data-project=\"{}\"></div>", data_block, project_id);
    };
    let image = lightbox.get("image").and_then(|v| v.as_str()).unwrap_or("");
    let prev = lightbox.get("prev").and_then(|v| v.as_u64()).unwrap_or(0);
    let next = lightbox.get("next").and_then(|v| v.as_u64()).unwrap_or(0);

    let nav = if images.len() > 1 {
        format!(
            r#"<a href="/projects/{id}?image={prev}" class="lb-prev" aria-label="Previous image">&lsaquo;</a>
<a href="/projects/{id}?image={next}" class="lb-next" aria-label="Next image">&rsaquo;</a>"#,
            id = project_id,
            prev = prev,
            next = next,
        )
    } else {
        String::new()
    };

    format!(
        r#"{data_block}<div id="lightbox" class="lightbox-overlay active" data-project="{id}">
    <a href="/projects/{id}" class="lb-close" aria-label="Close">&times;</a>
    {nav}
    <div class="lb-content">
        <img class="lb-image" src="{image}" alt="" onerror="this.src='{placeholder}'">
        <div class="lb-counter">{current} / {total}</div>
    </div>
</div>"#,
        data_block = data_block,
        id = project_id,
        nav = nav,
        image = html_escape(image),
        placeholder = PLACEHOLDER_IMAGE,
        current = index + 1,
        total = images.len(),
    )
}

// ── Contact ────────────────────────────────────────────

fn render_contact(context: &Value) -> String {
    let settings = context.get("settings").cloned().unwrap_or_default();
    let contact_email = sg(&settings, "contact_email", "");
    let location = sg(&settings, "contact_location", "");
    let recaptcha_site_key = sg(&settings, "recaptcha_site_key", "");
    let captcha_required = context
        .get("captcha_required")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let flash_html = match (
        context.get("flash").and_then(|f| f.get("kind")).and_then(|v| v.as_str()),
        context.get("flash").and_then(|f| f.get("message")).and_then(|v| v.as_str()),
    ) {
        (Some("success"), Some(msg)) => format!(
            "<div class=\"flash flash-success\">{}</div>",
            html_escape(msg)
        ),
        (Some("error"), Some(msg)) => format!(
            "<div class=\"flash flash-error\">{}</div>",
            html_escape(msg)
        ),
        _ => String::new(),
    };

    let mut info = String::new();
    if !contact_email.is_empty() {
        info.push_str(&format!(
            "<div class=\"contact-detail\"><strong>Email:</strong> <a href=\"mailto:{0}\">{0}</a></div>",
            html_escape(contact_email)
        ));
    }
    if !location.is_empty() {
        info.push_str(&format!(
            "<div class=\"contact-detail\"><strong>Location:</strong> {}</div>",
            html_escape(location)
        ));
    }

    let captcha_html = if captcha_required {
        format!(
            "<div class=\"g-recaptcha\" data-sitekey=\"{}\"></div>\n<script src=\"https://www.google.com/recaptcha/api.js\" async defer></script>",
            html_escape(recaptcha_site_key)
        )
    } else {
        String::new()
    };

    let form = context.get("form").cloned().unwrap_or_default();

    format!(
        r#"<section class="contact">
    <h1>Contact</h1>
    <div class="contact-columns">
        <div class="contact-info">{info}</div>
        <div class="contact-form-wrap">
            {flash}
            <form method="post" action="/contact" class="contact-form">
                <div class="form-group"><label for="cf-name">Name</label>
                    <input type="text" id="cf-name" name="name" required value="{name}" placeholder="Your name"></div>
                <div class="form-group"><label for="cf-email">Email</label>
                    <input type="email" id="cf-email" name="email" required value="{email}" placeholder="your@email.com"></div>
                <div class="form-group"><label for="cf-message">Message</label>
                    <textarea id="cf-message" name="message" rows="6" required placeholder="Your message…">{message}</textarea></div>
                <div style="display:none"><input type="text" name="_honey" tabindex="-1" autocomplete="off"></div>
                {captcha}
                <button type="submit" class="btn btn-primary">Send Message</button>
            </form>
        </div>
    </div>
</section>"#,
        info = info,
        flash = flash_html,
        name = html_escape(form.get("name").and_then(|v| v.as_str()).unwrap_or("")),
        email = html_escape(form.get("email").and_then(|v| v.as_str()).unwrap_or("")),
        message = html_escape(form.get("message").and_then(|v| v.as_str()).unwrap_or("")),
        captcha = captcha_html,
    )
}

// ── 404 ────────────────────────────────────────────────

fn render_404(_context: &Value) -> String {
    r#"<section class="not-found">
    <h1>404</h1>
    <p>Page not found.</p>
    <a href="/" class="btn btn-primary">← Home</a>
</section>"#
        .to_string()
}

// ── Helpers ────────────────────────────────────────────

pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const LIGHTBOX_JS: &str = r#"
(function() {
    var dataEl = document.getElementById('gallery-data');
    var overlay = document.getElementById('lightbox');
    if (!dataEl || !overlay) return;

    var images = JSON.parse(dataEl.textContent || '[]');
    if (!images.length) return;

    var projectId = overlay.dataset.project;
    var placeholder = '/static/img/placeholder.svg';
    var current = -1;

    function markup(index) {
        var nav = images.length > 1
            ? '<a href="#" class="lb-prev" aria-label="Previous image">&lsaquo;</a>' +
              '<a href="#" class="lb-next" aria-label="Next image">&rsaquo;</a>'
            : '';
        return '<a href="/projects/' + projectId + '" class="lb-close" aria-label="Close">&times;</a>' +
            nav +
            '<div class="lb-content">' +
                '<img class="lb-image" src="" alt="">' +
                '<div class="lb-counter"></div>' +
            '</div>';
    }

    function show(index) {
        current = index;
        if (!overlay.querySelector('.lb-image')) {
            overlay.innerHTML = markup(index);
            bind();
        }
        var img = overlay.querySelector('.lb-image');
        img.src = images[index];
        img.onerror = function() { this.src = placeholder; };
        overlay.querySelector('.lb-counter').textContent = (index + 1) + ' / ' + images.length;
        overlay.classList.add('active');
        document.body.style.overflow = 'hidden';
    }

    function close() {
        current = -1;
        overlay.classList.remove('active');
        document.body.style.overflow = '';
    }

    function navigate(dir) {
        show((current + dir + images.length) % images.length);
    }

    function bind() {
        var closeBtn = overlay.querySelector('.lb-close');
        var prevBtn = overlay.querySelector('.lb-prev');
        var nextBtn = overlay.querySelector('.lb-next');
        closeBtn.addEventListener('click', function(e) { e.preventDefault(); close(); });
        if (prevBtn) prevBtn.addEventListener('click', function(e) { e.preventDefault(); navigate(-1); });
        if (nextBtn) nextBtn.addEventListener('click', function(e) { e.preventDefault(); navigate(1); });
    }

    if (overlay.querySelector('.lb-image')) {
        // Server rendered the lightbox open; take over its controls.
        var counter = overlay.querySelector('.lb-counter').textContent || '1 /';
        current = parseInt(counter, 10) - 1;
        bind();
    }

    document.querySelectorAll('.gallery-link').forEach(function(link) {
        link.addEventListener('click', function(e) {
            e.preventDefault();
            show(parseInt(link.dataset.index, 10) || 0);
        });
    });

    overlay.addEventListener('click', function(e) { if (e.target === overlay) close(); });

    document.addEventListener('keydown', function(e) {
        if (!overlay.classList.contains('active')) return;
        if (e.key === 'Escape') close();
        if (e.key === 'ArrowLeft') navigate(-1);
        if (e.key === 'ArrowRight') navigate(1);
    });
})();
"#;

const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.6;
}
body.theme-dark {
    --bg: #0b1220;
    --panel: #111a2b;
    --text: #e5e7eb;
    --muted: #94a3b8;
    --accent: #3b82f6;
    --border: rgba(148, 163, 184, .2);
}
body.theme-light {
    --bg: #f8fafc;
    --panel: #ffffff;
    --text: #0f172a;
    --muted: #475569;
    --accent: #2563eb;
    --border: rgba(15, 23, 42, .12);
}
a { color: var(--accent); text-decoration: none; }
main { max-width: 960px; margin: 0 auto; padding: 32px 20px; min-height: 70vh; }

.site-header {
    display: flex; align-items: center; justify-content: space-between;
    padding: 16px 24px; border-bottom: 1px solid var(--border);
}
.site-brand { font-weight: 700; font-size: 1.2em; color: var(--text); }
.site-nav { display: flex; align-items: center; gap: 18px; }
.nav-link { color: var(--muted); }
.nav-link.active, .nav-link:hover { color: var(--text); }
.theme-form { display: inline; margin: 0; }
.theme-toggle {
    background: transparent; color: var(--muted); border: 1px solid var(--border);
    border-radius: 999px; padding: 4px 14px; cursor: pointer; font: inherit; font-size: .85em;
}
.theme-toggle:hover { color: var(--text); }

.site-footer { padding: 24px; text-align: center; border-top: 1px solid var(--border); color: var(--muted); font-size: .9em; }
.footer-social { margin-bottom: 8px; display: flex; justify-content: center; gap: 16px; }

.hero { text-align: center; padding: 48px 0 24px; }
.hero-avatar { width: 160px; height: 160px; border-radius: 50%; object-fit: cover; border: 3px solid var(--border); }
.hero h1 { margin: 16px 0 4px; font-size: 2.2em; }
.hero-role { color: var(--accent); font-weight: 600; margin: 0 0 12px; }
.hero-intro { color: var(--muted); max-width: 640px; margin: 0 auto 24px; }
.hero-actions { display: flex; justify-content: center; gap: 12px; }

.btn {
    display: inline-block; padding: 10px 24px; border-radius: 8px;
    font-weight: 600; font-size: .95em; border: none; cursor: pointer; font-family: inherit;
}
.btn-primary { background: var(--accent); color: #fff; }
.btn-secondary { background: transparent; color: var(--text); border: 1px solid var(--border); }

.section { padding: 24px 0; }
.section h2 { margin-bottom: 16px; }
.section-more { text-align: right; }
.empty-note { color: var(--muted); }

.project-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 20px; }
.project-card {
    background: var(--panel); border: 1px solid var(--border); border-radius: 12px;
    overflow: hidden; color: var(--text); display: flex; flex-direction: column;
    transition: transform .15s;
}
.project-card:hover { transform: translateY(-3px); }
.project-card img { width: 100%; height: 160px; object-fit: cover; display: block; }
.project-card-body { padding: 14px 16px; }
.project-card-body h3 { margin: 0 0 6px; }
.project-card-body p { margin: 0 0 10px; color: var(--muted); font-size: .92em; }
.tag-row { display: flex; flex-wrap: wrap; gap: 6px; }
.tag { font-size: .78em; font-weight: 600; border: 1px solid var(--border); border-radius: 999px; padding: 2px 10px; }

.cert-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 20px; }
.cert-card { background: var(--panel); border: 1px solid var(--border); border-radius: 12px; overflow: hidden; }
.cert-card img { width: 100%; height: 140px; object-fit: cover; display: block; }
.cert-card-body { padding: 12px 16px; }
.cert-card-body h3 { margin: 0 0 4px; font-size: 1em; }
.cert-issuer { color: var(--accent); font-size: .85em; margin: 0 0 6px; }
.cert-card-body p { color: var(--muted); font-size: .88em; margin: 0; }

.about-header { display: flex; gap: 28px; align-items: center; flex-wrap: wrap; margin-bottom: 24px; }
.about-avatar { width: 140px; height: 140px; border-radius: 50%; object-fit: cover; }
.about-bio p { color: var(--muted); }
.fact-list li, .detail-list li { color: var(--muted); margin-bottom: 4px; }
.detail-list { list-style: none; padding: 0; margin: 8px 0; }
.about-links { display: flex; gap: 14px; margin-top: 8px; }

.project-detail .back-link { display: inline-block; margin-bottom: 20px; }
.project-hero { display: block; position: relative; border-radius: 14px; overflow: hidden; margin-bottom: 20px; }
.project-hero img { width: 100%; max-height: 420px; object-fit: cover; display: block; }
.project-hero-overlay {
    position: absolute; inset: 0; display: flex; flex-direction: column; justify-content: flex-end;
    background: linear-gradient(to top, rgba(0,0,0,.7), transparent); padding: 24px;
}
.project-hero-overlay h1 { color: #fff; margin: 8px 0 0; }
.project-hero-overlay .tag { background: rgba(255,255,255,.15); border-color: transparent; }
.gallery-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 12px; margin-bottom: 24px; }
.gallery-grid img { width: 100%; height: 120px; object-fit: cover; border-radius: 8px; display: block; }
.panel { background: var(--panel); border: 1px solid var(--border); border-radius: 12px; padding: 20px 24px; margin-bottom: 20px; }
.project-description { color: var(--muted); }
.project-actions { display: flex; gap: 12px; margin-bottom: 24px; }
.related-heading { margin-top: 32px; }

.lightbox-overlay {
    display: none; position: fixed; inset: 0; z-index: 50;
    background: rgba(0, 0, 0, .9); align-items: center; justify-content: center;
}
.lightbox-overlay.active { display: flex; }
.lb-content { position: relative; max-width: 90vw; max-height: 90vh; text-align: center; }
.lb-image { max-width: 90vw; max-height: 85vh; object-fit: contain; }
.lb-counter {
    position: absolute; bottom: -36px; left: 50%; transform: translateX(-50%);
    color: #fff; background: rgba(0,0,0,.5); padding: 4px 14px; border-radius: 999px; font-size: .85em;
}
.lb-close, .lb-prev, .lb-next {
    position: absolute; color: #fff; background: rgba(0,0,0,.5); border-radius: 50%;
    width: 44px; height: 44px; display: flex; align-items: center; justify-content: center;
    font-size: 1.6em; z-index: 51;
}
.lb-close { top: 16px; right: 16px; }
.lb-prev { left: 16px; top: 50%; transform: translateY(-50%); }
.lb-next { right: 16px; top: 50%; transform: translateY(-50%); }

.contact-columns { display: flex; gap: 40px; flex-wrap: wrap; }
.contact-info { flex: 1; min-width: 260px; }
.contact-form-wrap { flex: 2; min-width: 280px; }
.contact-detail { margin-bottom: 10px; }
.form-group { margin-bottom: 16px; }
.form-group label { display: block; font-size: .9em; font-weight: 600; margin-bottom: 6px; }
.form-group input, .form-group textarea {
    width: 100%; padding: 10px 12px; font-size: .95em; border: 1px solid var(--border);
    background: var(--panel); color: var(--text); border-radius: 6px; font-family: inherit;
}
.form-group textarea { resize: vertical; }
.flash { padding: 12px; margin-bottom: 16px; border-radius: 8px; font-size: .92em; }
.flash-success { background: rgba(34, 197, 94, .12); color: #16a34a; }
.flash-error { background: rgba(239, 68, 68, .12); color: #ef4444; }
.g-recaptcha { margin-bottom: 16px; }

.not-found { text-align: center; padding: 80px 0; }
.not-found h1 { font-size: 4em; margin-bottom: 0; }
.not-found p { color: var(--muted); margin-bottom: 24px; }

@media (max-width: 640px) {
    .contact-columns { flex-direction: column; }
    .about-header { flex-direction: column; text-align: center; }
}
"#;
