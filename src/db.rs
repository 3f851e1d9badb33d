use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file("website/db/folio.db");
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Profile (singleton row, id = 1)
        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            avatar_path TEXT NOT NULL DEFAULT '',
            bio_paragraphs TEXT NOT NULL DEFAULT '[]',
            quick_facts TEXT NOT NULL DEFAULT '[]',
            social_links TEXT NOT NULL DEFAULT '[]',
            details TEXT NOT NULL DEFAULT '[]',
            revision INTEGER NOT NULL DEFAULT 1,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Certificates
        CREATE TABLE IF NOT EXISTS certificates (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            issuer TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            image_path TEXT NOT NULL DEFAULT '',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Projects
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            short_description TEXT NOT NULL,
            description TEXT NOT NULL,
            thumbnail_path TEXT NOT NULL,
            repo_url TEXT,
            demo_url TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Ordered detail images per project
        CREATE TABLE IF NOT EXISTS project_images (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            path TEXT NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        -- Ordered tags per project; name unique per project, case-insensitive
        CREATE TABLE IF NOT EXISTS project_tags (
            id INTEGER PRIMARY KEY,
            project_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            position INTEGER NOT NULL,
            UNIQUE(project_id, name COLLATE NOCASE),
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        -- Admin sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            ip_address TEXT,
            user_agent TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_project_images_project ON project_images(project_id, position);
        CREATE INDEX IF NOT EXISTS idx_project_tags_project ON project_tags(project_id, position);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        // General
        ("site_name", "Folio"),
        ("site_caption", ""),
        ("site_url", "http://localhost:8000"),
        ("admin_email", ""),
        ("admin_slug", "admin"),
        // Security
        ("session_expiry_hours", "24"),
        ("login_rate_limit", "5"),
        // Theme
        ("theme_default", "dark"),
        // Images
        ("images_storage_path", "website/uploads/"),
        ("images_max_upload_mb", "5"),
        ("images_thumb_size", "400x400"),
        ("images_allowed_types", "jpg,jpeg,png,gif,webp,svg"),
        // Contact
        ("contact_email", ""),
        ("contact_location", ""),
        ("contact_rate_limit", "5"),
        // CAPTCHA (leave empty to disable verification)
        ("recaptcha_site_key", ""),
        ("recaptcha_secret_key", ""),
        // Email (SMTP)
        ("email_smtp_enabled", "false"),
        ("email_smtp_host", ""),
        ("email_smtp_port", "587"),
        ("email_smtp_username", ""),
        ("email_smtp_password", ""),
        ("email_gmail_enabled", "false"),
        ("email_gmail_address", ""),
        ("email_gmail_app_password", ""),
        // Social
        ("social_github", ""),
        ("social_linkedin", ""),
        ("social_twitter", ""),
        ("social_instagram", ""),
        // SEO
        ("seo_default_description", ""),
        ("seo_robots_txt", "User-agent: *\nAllow: /"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
