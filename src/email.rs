use std::collections::HashMap;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::db::DbPool;
use crate::models::settings::Setting;

/// Send a contact-form submission to the site owner. The visitor's
/// address goes into Reply-To so the owner can answer directly.
pub fn send_contact_email(
    pool: &DbPool,
    visitor_name: &str,
    visitor_email: &str,
    message_text: &str,
) -> Result<(), String> {
    let settings = Setting::all(pool);
    let site_name = settings
        .get("site_name")
        .cloned()
        .unwrap_or_else(|| "Folio".to_string());

    let from = get_from_email(&settings)
        .ok_or_else(|| "No email provider is configured.".to_string())?;
    let to = settings
        .get("contact_email")
        .cloned()
        .filter(|s| !s.is_empty())
        .or_else(|| settings.get("admin_email").cloned().filter(|s| !s.is_empty()))
        .ok_or_else(|| "No destination address is configured.".to_string())?;

    let subject = format!("New message from {} — {}", visitor_name, site_name);
    let body = format!(
        "From: {} <{}>\n\n{}\n",
        visitor_name, visitor_email, message_text
    );

    send_via_configured_provider(&settings, &from, &to, Some(visitor_email), &subject, &body)
}

/// Determine the "from" address from the configured providers.
fn get_from_email(settings: &HashMap<String, String>) -> Option<String> {
    if settings.get("email_gmail_enabled").map(|v| v.as_str()) == Some("true") {
        return settings
            .get("email_gmail_address")
            .cloned()
            .filter(|s| !s.is_empty());
    }
    if settings.get("email_smtp_enabled").map(|v| v.as_str()) == Some("true") {
        return settings
            .get("email_smtp_username")
            .cloned()
            .filter(|s| !s.is_empty());
    }
    None
}

fn send_via_configured_provider(
    settings: &HashMap<String, String>,
    from: &str,
    to: &str,
    reply_to: Option<&str>,
    subject: &str,
    body: &str,
) -> Result<(), String> {
    // Gmail SMTP
    if settings.get("email_gmail_enabled").map(|v| v.as_str()) == Some("true") {
        let address = settings
            .get("email_gmail_address")
            .cloned()
            .unwrap_or_default();
        let app_password = settings
            .get("email_gmail_app_password")
            .cloned()
            .unwrap_or_default();
        if !address.is_empty() && !app_password.is_empty() {
            return send_smtp(
                "smtp.gmail.com",
                587,
                &address,
                &app_password,
                from,
                to,
                reply_to,
                subject,
                body,
            );
        }
    }

    // Custom SMTP
    if settings.get("email_smtp_enabled").map(|v| v.as_str()) == Some("true") {
        let host = settings.get("email_smtp_host").cloned().unwrap_or_default();
        let port: u16 = settings
            .get("email_smtp_port")
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);
        let username = settings
            .get("email_smtp_username")
            .cloned()
            .unwrap_or_default();
        let password = settings
            .get("email_smtp_password")
            .cloned()
            .unwrap_or_default();
        if !host.is_empty() && !username.is_empty() {
            return send_smtp(
                &host, port, &username, &password, from, to, reply_to, subject, body,
            );
        }
    }

    Err("No SMTP provider configured.".to_string())
}

fn send_smtp(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    from: &str,
    to: &str,
    reply_to: Option<&str>,
    subject: &str,
    body: &str,
) -> Result<(), String> {
    let mut builder = Message::builder()
        .from(from.parse().map_err(|e| format!("Invalid from address: {}", e))?)
        .to(to.parse().map_err(|e| format!("Invalid to address: {}", e))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);

    if let Some(addr) = reply_to {
        builder = builder.reply_to(
            addr.parse()
                .map_err(|e| format!("Invalid reply-to address: {}", e))?,
        );
    }

    let email = builder
        .body(body.to_string())
        .map_err(|e| format!("Failed to build email: {}", e))?;

    let creds = Credentials::new(username.to_string(), password.to_string());

    let mailer = SmtpTransport::starttls_relay(host)
        .map_err(|e| format!("SMTP relay error: {}", e))?
        .port(port)
        .credentials(creds)
        .build();

    mailer.send(&email).map_err(|e| format!("SMTP send error: {}", e))?;
    Ok(())
}
