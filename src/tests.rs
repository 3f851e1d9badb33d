#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::collections::HashMap;

use crate::auth;
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::email;
use crate::gallery::{ImageSequence, Lightbox};
use crate::images;
use crate::models::certificate::{Certificate, CertificateForm};
use crate::models::profile::{Profile, ProfileDetail, ProfileForm, SocialLink};
use crate::models::project::{add_tag, build_tag_list, Project, ProjectForm, ProjectTag, DEFAULT_TAG_COLOR};
use crate::models::settings::Setting;
use crate::rate_limit::RateLimiter;
use crate::render;
use crate::routes::public::validate_contact;
use crate::seo;
use crate::theme::Theme;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with all migrations + seed defaults applied.
/// Uses a named shared-cache in-memory DB so multiple connections see the same data.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    {
        let conn = pool.get().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
    }
    run_migrations(&pool).expect("Failed to run migrations");
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_set_and_get() {
    let pool = test_pool();
    Setting::set(&pool, "test_key", "hello").unwrap();
    assert_eq!(Setting::get(&pool, "test_key"), Some("hello".to_string()));
}

#[test]
fn settings_get_or_default() {
    let pool = test_pool();
    assert_eq!(Setting::get_or(&pool, "nonexistent", "fallback"), "fallback");
    Setting::set(&pool, "exists", "val").unwrap();
    assert_eq!(Setting::get_or(&pool, "exists", "fallback"), "val");
}

#[test]
fn settings_get_bool_and_i64() {
    let pool = test_pool();
    Setting::set(&pool, "flag_true", "true").unwrap();
    Setting::set(&pool, "flag_one", "1").unwrap();
    Setting::set(&pool, "flag_false", "false").unwrap();
    assert!(Setting::get_bool(&pool, "flag_true"));
    assert!(Setting::get_bool(&pool, "flag_one"));
    assert!(!Setting::get_bool(&pool, "flag_false"));
    assert!(!Setting::get_bool(&pool, "missing_flag"));

    Setting::set(&pool, "num", "42").unwrap();
    assert_eq!(Setting::get_i64(&pool, "num"), 42);
    assert_eq!(Setting::get_i64(&pool, "missing"), 0);
}

#[test]
fn settings_upsert() {
    let pool = test_pool();
    Setting::set(&pool, "key", "first").unwrap();
    Setting::set(&pool, "key", "second").unwrap();
    assert_eq!(Setting::get(&pool, "key"), Some("second".to_string()));
}

#[test]
fn settings_set_many() {
    let pool = test_pool();
    let mut map = HashMap::new();
    map.insert("k1".to_string(), "v1".to_string());
    map.insert("k2".to_string(), "v2".to_string());
    Setting::set_many(&pool, &map).unwrap();
    assert_eq!(Setting::get(&pool, "k1"), Some("v1".to_string()));
    assert_eq!(Setting::get(&pool, "k2"), Some("v2".to_string()));
}

// ═══════════════════════════════════════════════════════════
// Profile
// ═══════════════════════════════════════════════════════════

fn make_profile_form(name: &str, role: &str, revision: i64) -> ProfileForm {
    ProfileForm {
        name: name.to_string(),
        role: role.to_string(),
        avatar_path: "/uploads/profile/a.jpg".to_string(),
        bio_paragraphs: vec!["First paragraph.".to_string(), "Second.".to_string()],
        quick_facts: vec!["Fact one".to_string()],
        social_links: vec![SocialLink {
            name: "GitHub".to_string(),
            url: "https://github.com/example".to_string(),
            icon: "github".to_string(),
        }],
        details: vec![ProfileDetail {
            icon: "location".to_string(),
            text: "Somewhere".to_string(),
        }],
        revision,
    }
}

#[test]
fn profile_missing_loads_default() {
    let pool = test_pool();
    assert!(Profile::load(&pool).is_none());
    let default = Profile::load_or_default(&pool);
    assert!(default.name.is_empty());
    assert_eq!(default.revision, 0);
}

#[test]
fn profile_upsert_creates_and_updates() {
    let pool = test_pool();

    let rev = Profile::upsert(&pool, &make_profile_form("Ada", "Engineer", 0)).unwrap();
    assert_eq!(rev, 1);

    let loaded = Profile::load(&pool).unwrap();
    assert_eq!(loaded.name, "Ada");
    assert_eq!(loaded.bio_paragraphs.len(), 2);
    assert_eq!(loaded.social_links[0].name, "GitHub");
    assert_eq!(loaded.details[0].text, "Somewhere");
    assert_eq!(loaded.revision, 1);

    let rev = Profile::upsert(&pool, &make_profile_form("Ada L.", "Engineer", 1)).unwrap();
    assert_eq!(rev, 2);
    assert_eq!(Profile::load(&pool).unwrap().name, "Ada L.");
}

#[test]
fn profile_stale_revision_rejected() {
    let pool = test_pool();
    Profile::upsert(&pool, &make_profile_form("Ada", "Engineer", 0)).unwrap();
    Profile::upsert(&pool, &make_profile_form("Ada L.", "Engineer", 1)).unwrap();

    // A form loaded before the second save carries revision 1 and must
    // not overwrite silently.
    let err = Profile::upsert(&pool, &make_profile_form("Stale", "Engineer", 1)).unwrap_err();
    assert!(err.contains("another session"));
    let stored = Profile::load(&pool).unwrap();
    assert_eq!(stored.name, "Ada L.");
    assert_eq!(stored.revision, 2);
}

#[test]
fn profile_requires_name_and_role() {
    let pool = test_pool();
    assert!(Profile::upsert(&pool, &make_profile_form("", "Engineer", 0)).is_err());
    assert!(Profile::upsert(&pool, &make_profile_form("Ada", "  ", 0)).is_err());
    assert!(Profile::load(&pool).is_none());
}

#[test]
fn profile_avatar_update_creates_row() {
    let pool = test_pool();
    let rev = Profile::update_avatar(&pool, "/uploads/profile/new.jpg").unwrap();
    assert_eq!(rev, 1);
    let profile = Profile::load(&pool).unwrap();
    assert_eq!(profile.avatar_path, "/uploads/profile/new.jpg");

    Profile::upsert(&pool, &make_profile_form("Ada", "Engineer", profile.revision)).unwrap();
    let rev = Profile::update_avatar(&pool, "/uploads/profile/next.jpg").unwrap();
    assert_eq!(rev, 3);
    assert_eq!(Profile::load(&pool).unwrap().avatar_path, "/uploads/profile/next.jpg");
}

#[test]
fn avatar_update_returns_revision_the_form_can_save_with() {
    // Swap the avatar mid-edit, then save the full form carrying the
    // revision the upload reported: no spurious conflict.
    let pool = test_pool();
    Profile::upsert(&pool, &make_profile_form("Ada", "Engineer", 0)).unwrap();

    let rev = Profile::update_avatar(&pool, "/uploads/profile/swap.jpg").unwrap();
    let mut form = make_profile_form("Ada L.", "Engineer", rev);
    form.avatar_path = "/uploads/profile/swap.jpg".to_string();
    Profile::upsert(&pool, &form).unwrap();

    let stored = Profile::load(&pool).unwrap();
    assert_eq!(stored.name, "Ada L.");
    assert_eq!(stored.avatar_path, "/uploads/profile/swap.jpg");
    assert_eq!(stored.revision, rev + 1);
}

// ═══════════════════════════════════════════════════════════
// Certificates
// ═══════════════════════════════════════════════════════════

fn make_cert_form(title: &str) -> CertificateForm {
    CertificateForm {
        title: title.to_string(),
        issuer: "Issuer Inc".to_string(),
        description: "About the cert".to_string(),
        image_path: "/uploads/certificates/c.png".to_string(),
    }
}

#[test]
fn certificate_crud() {
    let pool = test_pool();

    let id = Certificate::create(&pool, &make_cert_form("Cert A")).unwrap();
    assert!(id > 0);

    let cert = Certificate::find_by_id(&pool, id).unwrap();
    assert_eq!(cert.title, "Cert A");
    assert_eq!(cert.issuer, "Issuer Inc");

    let mut form = make_cert_form("Cert A (renewed)");
    form.description = "Updated".to_string();
    Certificate::update(&pool, id, &form).unwrap();
    let updated = Certificate::find_by_id(&pool, id).unwrap();
    assert_eq!(updated.title, "Cert A (renewed)");
    assert_eq!(updated.description, "Updated");

    assert_eq!(Certificate::count(&pool), 1);
    Certificate::delete(&pool, id).unwrap();
    assert!(Certificate::find_by_id(&pool, id).is_none());
    assert_eq!(Certificate::count(&pool), 0);
}

#[test]
fn certificate_delete_removes_exactly_one() {
    let pool = test_pool();
    let a = Certificate::create(&pool, &make_cert_form("A")).unwrap();
    let b = Certificate::create(&pool, &make_cert_form("B")).unwrap();

    Certificate::delete(&pool, a).unwrap();
    assert_eq!(Certificate::count(&pool), 1);
    assert!(Certificate::find_by_id(&pool, a).is_none());
    assert!(Certificate::find_by_id(&pool, b).is_some());
}

#[test]
fn certificate_validation_blocks_create() {
    let pool = test_pool();
    let mut form = make_cert_form("");
    assert!(Certificate::create(&pool, &form).is_err());
    form.title = "X".to_string();
    form.issuer = "".to_string();
    assert!(Certificate::create(&pool, &form).is_err());
    assert_eq!(Certificate::count(&pool), 0);
}

#[test]
fn certificate_list_newest_first() {
    let pool = test_pool();
    let _a = Certificate::create(&pool, &make_cert_form("First")).unwrap();
    let b = Certificate::create(&pool, &make_cert_form("Second")).unwrap();
    let list = Certificate::list(&pool);
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, b);
}

// ═══════════════════════════════════════════════════════════
// Projects
// ═══════════════════════════════════════════════════════════

fn make_project_form(title: &str) -> ProjectForm {
    ProjectForm {
        title: title.to_string(),
        short_description: "Short".to_string(),
        description: "Long description".to_string(),
        thumbnail_path: "/uploads/projects/thumbnails/t.jpg".to_string(),
        detail_images: vec![
            "/uploads/projects/details/d1.jpg".to_string(),
            "/uploads/projects/details/d2.jpg".to_string(),
        ],
        tags: vec![
            ProjectTag { name: "Rust".to_string(), color: "#dea584".to_string() },
            ProjectTag { name: "Web".to_string(), color: DEFAULT_TAG_COLOR.to_string() },
        ],
        repo_url: Some("https://github.com/example/repo".to_string()),
        demo_url: None,
    }
}

#[test]
fn project_crud_with_children() {
    let pool = test_pool();

    let id = Project::create(&pool, &make_project_form("Folio")).unwrap();
    let project = Project::find_by_id(&pool, id).unwrap();
    assert_eq!(project.title, "Folio");
    assert_eq!(
        project.detail_images,
        vec![
            "/uploads/projects/details/d1.jpg".to_string(),
            "/uploads/projects/details/d2.jpg".to_string(),
        ]
    );
    assert_eq!(project.tags.len(), 2);
    assert_eq!(project.tags[0].name, "Rust");
    assert_eq!(project.repo_url.as_deref(), Some("https://github.com/example/repo"));

    // Update replaces the child rows in the submitted order
    let mut form = make_project_form("Folio v2");
    form.detail_images = vec!["/uploads/projects/details/d3.jpg".to_string()];
    form.tags = vec![ProjectTag { name: "CLI".to_string(), color: "#111111".to_string() }];
    Project::update(&pool, id, &form).unwrap();
    let updated = Project::find_by_id(&pool, id).unwrap();
    assert_eq!(updated.title, "Folio v2");
    assert_eq!(updated.detail_images, vec!["/uploads/projects/details/d3.jpg".to_string()]);
    assert_eq!(updated.tags.len(), 1);

    Project::delete(&pool, id).unwrap();
    assert!(Project::find_by_id(&pool, id).is_none());
    assert_eq!(Project::count(&pool), 0);

    // Child rows go with the project
    let conn = pool.get().unwrap();
    let images: i64 = conn
        .query_row("SELECT COUNT(*) FROM project_images", [], |r| r.get(0))
        .unwrap();
    let tags: i64 = conn
        .query_row("SELECT COUNT(*) FROM project_tags", [], |r| r.get(0))
        .unwrap();
    assert_eq!(images, 0);
    assert_eq!(tags, 0);
}

#[test]
fn project_delete_removes_exactly_one() {
    let pool = test_pool();
    let a = Project::create(&pool, &make_project_form("A")).unwrap();
    let b = Project::create(&pool, &make_project_form("B")).unwrap();

    Project::delete(&pool, a).unwrap();
    assert_eq!(Project::count(&pool), 1);
    assert!(Project::find_by_id(&pool, b).is_some());
}

#[test]
fn project_validation_blocks_every_missing_required_field() {
    let pool = test_pool();

    let mut form = make_project_form("X");
    form.title = "  ".to_string();
    assert!(Project::create(&pool, &form).is_err());

    let mut form = make_project_form("X");
    form.short_description = String::new();
    assert!(Project::create(&pool, &form).is_err());

    let mut form = make_project_form("X");
    form.description = String::new();
    assert!(Project::create(&pool, &form).is_err());

    let mut form = make_project_form("X");
    form.thumbnail_path = String::new();
    assert!(Project::create(&pool, &form).is_err());

    // No create call reached the table
    assert_eq!(Project::count(&pool), 0);
}

#[test]
fn project_validation_rejects_malformed_urls() {
    let pool = test_pool();
    let mut form = make_project_form("X");
    form.repo_url = Some("not a url".to_string());
    assert!(Project::create(&pool, &form).is_err());

    form.repo_url = Some("https://example.com/repo".to_string());
    form.demo_url = Some("also wrong".to_string());
    assert!(Project::create(&pool, &form).is_err());
    assert_eq!(Project::count(&pool), 0);
}

#[test]
fn project_latest_returns_newest() {
    let pool = test_pool();
    for i in 0..5 {
        Project::create(&pool, &make_project_form(&format!("P{}", i))).unwrap();
    }
    let latest = Project::latest(&pool, 3);
    assert_eq!(latest.len(), 3);
    assert_eq!(latest[0].title, "P4");
}

// ═══════════════════════════════════════════════════════════
// Tags
// ═══════════════════════════════════════════════════════════

#[test]
fn tag_add_appends() {
    let tags = vec![];
    let tags = add_tag(&tags, "Rust", "#dea584").unwrap();
    let tags = add_tag(&tags, "Web", "").unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].color, DEFAULT_TAG_COLOR);
}

#[test]
fn tag_duplicate_name_rejected_case_insensitively() {
    let tags = add_tag(&[], "Rust", "#dea584").unwrap();
    let err = add_tag(&tags, "rust", "#ffffff").unwrap_err();
    assert!(err.contains("already exists"));
    let err = add_tag(&tags, "RUST", "").unwrap_err();
    assert!(err.contains("already exists"));
    // Original list is untouched
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].color, "#dea584");
}

#[test]
fn tag_empty_name_rejected() {
    assert!(add_tag(&[], "   ", "#fff").is_err());
}

#[test]
fn tag_list_built_from_parallel_fields() {
    let names = vec!["Rust".to_string(), "".to_string(), "Web".to_string()];
    let colors = vec!["#dea584".to_string(), "#000".to_string()];
    let tags = build_tag_list(&names, &colors).unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "Rust");
    // Blank name skipped; missing color falls back to the default
    assert_eq!(tags[1].name, "Web");
    assert_eq!(tags[1].color, DEFAULT_TAG_COLOR);

    let dup = vec!["Rust".to_string(), "rust".to_string()];
    assert!(build_tag_list(&dup, &[]).is_err());
}

// ═══════════════════════════════════════════════════════════
// Gallery / lightbox
// ═══════════════════════════════════════════════════════════

fn seq(urls: &[&str]) -> ImageSequence {
    ImageSequence::new(urls[0], &urls[1..].iter().map(|s| s.to_string()).collect::<Vec<_>>())
}

#[test]
fn sequence_is_thumbnail_then_details() {
    let s = seq(&["T", "D1", "D2"]);
    assert_eq!(s.len(), 3);
    assert_eq!(s.get(0), Some("T"));
    assert_eq!(s.get(1), Some("D1"));
    assert_eq!(s.get(2), Some("D2"));
    assert!(s.has_navigation());
}

#[test]
fn lightbox_walkthrough_scenario() {
    // Thumbnail T with details [D1, D2]: open on D1, "next" shows D2,
    // "next" again wraps to T.
    let s = seq(&["T", "D1", "D2"]);
    let lb = Lightbox::open_image(&s, "D1");
    assert_eq!(lb, Lightbox::Viewing(1));
    let lb = lb.next(&s);
    assert_eq!(lb.current_image(&s), Some("D2"));
    let lb = lb.next(&s);
    assert_eq!(lb.current_image(&s), Some("T"));
}

#[test]
fn lightbox_prev_wraps_from_first_to_last() {
    let s = seq(&["T", "D1", "D2"]);
    let lb = Lightbox::open(&s, 0).prev(&s);
    assert_eq!(lb, Lightbox::Viewing(2));
}

#[test]
fn lightbox_navigation_stays_in_bounds() {
    // For every sequence length, any walk of next/prev moves stays
    // within [0, N-1].
    for n in 1..=6usize {
        let urls: Vec<String> = (0..n).map(|i| format!("img{}", i)).collect();
        let refs: Vec<&str> = urls.iter().map(|s| s.as_str()).collect();
        let s = seq(&refs);
        for start in 0..n {
            let mut lb = Lightbox::open(&s, start);
            for step in 0..(2 * n + 3) {
                lb = if step % 3 == 0 { lb.prev(&s) } else { lb.next(&s) };
                let index = lb.index().unwrap();
                assert!(index < n, "index {} escaped bounds for n={}", index, n);
                assert!(lb.current_image(&s).is_some());
            }
        }
    }
}

#[test]
fn lightbox_single_image_hides_navigation_and_stays_put() {
    let s = seq(&["T"]);
    assert!(!s.has_navigation());
    let lb = Lightbox::open(&s, 0);
    assert_eq!(lb.next(&s), Lightbox::Viewing(0));
    assert_eq!(lb.prev(&s), Lightbox::Viewing(0));
}

#[test]
fn lightbox_out_of_range_and_unknown_image_stay_idle() {
    let s = seq(&["T", "D1"]);
    assert_eq!(Lightbox::open(&s, 2), Lightbox::Idle);
    assert_eq!(Lightbox::open_image(&s, "missing"), Lightbox::Idle);
    assert_eq!(Lightbox::from_query(&s, None), Lightbox::Idle);
    assert_eq!(Lightbox::from_query(&s, Some(1)), Lightbox::Viewing(1));
}

#[test]
fn lightbox_close_and_scroll_lock() {
    let s = seq(&["T", "D1"]);
    let lb = Lightbox::open(&s, 1);
    assert!(lb.is_open());
    assert!(lb.scroll_locked());
    let closed = lb.close();
    assert_eq!(closed, Lightbox::Idle);
    assert!(!closed.scroll_locked());
    assert_eq!(closed.next(&s), Lightbox::Idle);
    assert_eq!(closed.current_image(&s), None);
}

// ═══════════════════════════════════════════════════════════
// Image upload policy
// ═══════════════════════════════════════════════════════════

fn allowed() -> Vec<String> {
    vec!["jpg".into(), "jpeg".into(), "png".into(), "gif".into(), "webp".into(), "svg".into()]
}

#[test]
fn upload_rejects_oversized_file() {
    let max = 5 * 1024 * 1024;
    let err = images::check_upload_policy(true, Some("jpg"), max + 1, max, &allowed()).unwrap_err();
    assert!(err.contains("too large"));
    // At the limit passes
    assert!(images::check_upload_policy(true, Some("jpg"), max, max, &allowed()).is_ok());
}

#[test]
fn upload_rejects_non_image_type() {
    let max = 5 * 1024 * 1024;
    let err = images::check_upload_policy(false, Some("pdf"), 100, max, &allowed()).unwrap_err();
    assert!(err.contains("image"));
    // No declared type at all
    assert!(images::check_upload_policy(false, None, 100, max, &allowed()).is_err());
}

#[test]
fn upload_accepts_allowed_extension_without_image_content_type() {
    // Browsers occasionally send application/octet-stream; the
    // extension allowlist still admits real images.
    let max = 5 * 1024 * 1024;
    assert!(images::check_upload_policy(false, Some("png"), 100, max, &allowed()).is_ok());
}

#[test]
fn upload_limit_defaults_to_five_megabytes() {
    let pool = test_pool();
    assert_eq!(images::max_upload_bytes(&pool), 5 * 1024 * 1024);
}

#[test]
fn unique_filename_preserves_extension() {
    let a = images::unique_filename("png");
    let b = images::unique_filename("png");
    assert!(a.ends_with(".png"));
    assert!(b.ends_with(".png"));
    assert_ne!(a, b);
}

// ═══════════════════════════════════════════════════════════
// Auth / sessions
// ═══════════════════════════════════════════════════════════

#[test]
fn password_hash_roundtrip() {
    let hash = bcrypt::hash("hunter22", 4).unwrap();
    assert!(auth::verify_password("hunter22", &hash));
    assert!(!auth::verify_password("wrong", &hash));
    assert!(!auth::verify_password("hunter22", "not-a-hash"));
}

#[test]
fn session_lifecycle() {
    let pool = test_pool();
    let id = auth::create_session(&pool, Some("127.0.0.1"), Some("test-agent")).unwrap();
    assert!(auth::validate_session(&pool, &id));
    assert!(!auth::validate_session(&pool, "nonexistent"));

    auth::destroy_session(&pool, &id).unwrap();
    assert!(!auth::validate_session(&pool, &id));
}

#[test]
fn expired_sessions_fail_validation_and_get_cleaned() {
    let pool = test_pool();
    let conn = pool.get().unwrap();
    let past = chrono::Utc::now().naive_utc() - chrono::Duration::hours(2);
    let before = past - chrono::Duration::hours(24);
    conn.execute(
        "INSERT INTO sessions (id, created_at, expires_at) VALUES ('old', ?1, ?2)",
        rusqlite::params![before, past],
    )
    .unwrap();
    drop(conn);

    assert!(!auth::validate_session(&pool, "old"));
    auth::cleanup_expired_sessions(&pool).unwrap();

    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn ip_hashing_is_stable() {
    assert_eq!(auth::hash_ip("1.2.3.4"), auth::hash_ip("1.2.3.4"));
    assert_ne!(auth::hash_ip("1.2.3.4"), auth::hash_ip("4.3.2.1"));
    assert_eq!(auth::hash_ip("1.2.3.4").len(), 64);
}

// ═══════════════════════════════════════════════════════════
// Rate limiter
// ═══════════════════════════════════════════════════════════

#[test]
fn rate_limiter_admits_up_to_max_then_blocks() {
    let limiter = RateLimiter::new();
    let window = std::time::Duration::from_secs(60);
    for _ in 0..5 {
        assert!(limiter.check_and_record("login:abc", 5, window));
    }
    assert!(!limiter.check_and_record("login:abc", 5, window));
    // Other keys are unaffected
    assert!(limiter.check_and_record("login:other", 5, window));
}

// ═══════════════════════════════════════════════════════════
// Contact form validation
// ═══════════════════════════════════════════════════════════

#[test]
fn contact_validation() {
    assert!(validate_contact("Ada", "ada@example.com", "Hello, I have a question.").is_ok());
    assert!(validate_contact("", "ada@example.com", "Hello, I have a question.").is_err());
    assert!(validate_contact("Ada", "not-an-email", "Hello, I have a question.").is_err());
    assert!(validate_contact("Ada", "ada@nodot", "Hello, I have a question.").is_err());
    assert!(validate_contact("Ada", "ada@example.com", "short").is_err());
}

#[test]
fn contact_email_requires_configured_provider() {
    let pool = test_pool();
    let err = email::send_contact_email(&pool, "Ada", "ada@example.com", "A question.").unwrap_err();
    assert!(err.contains("No email provider"));
}

// ═══════════════════════════════════════════════════════════
// Theme
// ═══════════════════════════════════════════════════════════

#[test]
fn theme_values_and_toggle() {
    assert_eq!(Theme::from_value("dark"), Some(Theme::Dark));
    assert_eq!(Theme::from_value("light"), Some(Theme::Light));
    assert_eq!(Theme::from_value("mauve"), None);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.body_class(), "theme-dark");
    assert_eq!(Theme::Light.body_class(), "theme-light");
}

#[test]
fn every_public_page_carries_exactly_one_theme_class() {
    let context = serde_json::json!({ "settings": {} });
    for page in ["home", "about", "projects", "project_detail", "contact", "404"] {
        let dark = render::render_page(page, Theme::Dark, &context);
        assert!(dark.contains("class=\"theme-dark\""), "{} missing dark class", page);
        assert!(!dark.contains("class=\"theme-light\""), "{} leaked light class", page);

        let light = render::render_page(page, Theme::Light, &context);
        assert!(light.contains("class=\"theme-light\""), "{} missing light class", page);
        assert!(!light.contains("class=\"theme-dark\""), "{} leaked dark class", page);
    }
}

// ═══════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════

#[test]
fn project_detail_renders_gallery_and_open_lightbox() {
    let s = seq(&["/u/t.jpg", "/u/d1.jpg", "/u/d2.jpg"]);
    let lb = Lightbox::open(&s, 1);
    let context = serde_json::json!({
        "settings": {},
        "project": { "id": 7, "title": "Folio", "description": "Desc" },
        "images": s.iter().collect::<Vec<_>>(),
        "lightbox": {
            "index": 1,
            "image": lb.current_image(&s),
            "prev": lb.prev(&s).index(),
            "next": lb.next(&s).index(),
        },
        "path": "/projects/7",
    });
    let html = render::render_page("project_detail", Theme::Dark, &context);

    // Overlay open at D1 with wrap-aware neighbour links
    assert!(html.contains("lightbox-overlay active"));
    assert!(html.contains("/u/d1.jpg"));
    assert!(html.contains("/projects/7?image=0\" class=\"lb-prev\""));
    assert!(html.contains("/projects/7?image=2\" class=\"lb-next\""));
    assert!(html.contains("2 / 3"));
    // Open overlay locks page scroll in the server-rendered fallback
    assert!(html.contains("overflow:hidden"));
}

#[test]
fn project_detail_single_image_hides_controls() {
    let s = seq(&["/u/t.jpg"]);
    let context = serde_json::json!({
        "settings": {},
        "project": { "id": 3, "title": "Solo", "description": "Desc" },
        "images": s.iter().collect::<Vec<_>>(),
        "lightbox": { "index": 0, "image": "/u/t.jpg", "prev": 0, "next": 0 },
        "path": "/projects/3",
    });
    let html = render::render_page("project_detail", Theme::Dark, &context);
    // Nav links and the thumbnail strip only render for N > 1
    assert!(!html.contains("?image=0\" class=\"lb-prev\""));
    assert!(!html.contains("class=\"gallery-grid\""));
}

#[test]
fn project_detail_closed_lightbox_keeps_scroll() {
    let context = serde_json::json!({
        "settings": {},
        "project": { "id": 3, "title": "Solo", "description": "Desc" },
        "images": ["/u/t.jpg", "/u/d1.jpg"],
        "lightbox": null,
        "path": "/projects/3",
    });
    let html = render::render_page("project_detail", Theme::Dark, &context);
    assert!(!html.contains("lightbox-overlay active"));
    assert!(!html.contains("overflow:hidden"));
}

#[test]
fn broken_images_fall_back_to_placeholder() {
    let context = serde_json::json!({
        "settings": {},
        "projects": [{ "id": 1, "title": "P", "short_description": "s", "thumbnail_path": "/u/x.jpg", "tags": [] }],
        "path": "/projects",
    });
    let html = render::render_page("projects", Theme::Dark, &context);
    assert!(html.contains(render::PLACEHOLDER_IMAGE));
}

#[test]
fn html_escaping() {
    assert_eq!(
        render::html_escape("<b>\"a\" & b</b>"),
        "&lt;b&gt;&quot;a&quot; &amp; b&lt;/b&gt;"
    );
}

// ═══════════════════════════════════════════════════════════
// SEO
// ═══════════════════════════════════════════════════════════

#[test]
fn seo_meta_includes_title_and_canonical() {
    let pool = test_pool();
    Setting::set(&pool, "site_name", "My Site").unwrap();
    Setting::set(&pool, "site_url", "https://example.com").unwrap();

    let meta = seo::build_meta(&pool, Some("Projects"), Some("All of them"), "/projects");
    assert!(meta.contains("<title>Projects — My Site</title>"));
    assert!(meta.contains("https://example.com/projects"));
    assert!(meta.contains("All of them"));

    let bare = seo::build_meta(&pool, None, None, "/");
    assert!(bare.contains("<title>My Site</title>"));
}

#[test]
fn sitemap_lists_projects() {
    let pool = test_pool();
    Setting::set(&pool, "site_url", "https://example.com").unwrap();
    let id = Project::create(&pool, &make_project_form("Mapped")).unwrap();

    let xml = seo::generate_sitemap(&pool);
    assert!(xml.contains("https://example.com/about"));
    assert!(xml.contains(&format!("https://example.com/projects/{}", id)));
}
