//! Plain-text views of page state.

use plantcare_core::{
    PredictionDetail, PredictionSummary, UserProfile, format_confidence, format_timestamp,
    humanize_label,
};
use plantcare_ui::{
    NAV_LINKS, Notification, NotificationLevel, Router, Screen, UploadFlow, ViewState,
};

/// Renders one toast line.
pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

/// Renders the header: profile badge and nav links.
pub fn render_header(profile: &ViewState<UserProfile>) -> String {
    let badge = match profile {
        ViewState::Ready(user) => format!("{} <{}>", user.username, user.email),
        ViewState::Loading => "loading profile...".to_string(),
        ViewState::Error(message) => format!("profile unavailable: {message}"),
        ViewState::Idle | ViewState::Empty => "not signed in".to_string(),
    };
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|(label, route)| format!("{label} ({route})"))
        .collect();
    format!("{badge} | {}", links.join(" | "))
}

/// Renders the prediction history table.
pub fn render_history(records: &[PredictionSummary]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "#{:<6} {:<40} {:>8}  {}\n",
            record.id,
            humanize_label(&record.disease_name),
            format_confidence(record.confidence),
            format_timestamp(&record.date_predict)
        ));
        if let Some(description) = record.description.as_deref().filter(|text| !text.is_empty()) {
            out.push_str(&format!("        {description}\n"));
        }
    }
    out
}

/// Renders one prediction with its guidance.
pub fn render_detail(detail: &PredictionDetail) -> String {
    let mut out = String::new();
    out.push_str(&format!("Prediction: {}\n", humanize_label(&detail.class_name)));
    out.push_str(&format!("Confidence: {}\n", format_confidence(detail.confidence)));
    out.push_str(&format!("Time:       {}\n", format_timestamp(&detail.prediction_time)));
    let image = match detail.image.as_deref().map(str::trim) {
        Some(image) if !image.is_empty() => format!("{} base64 chars", image.len()),
        _ => "none".to_string(),
    };
    out.push_str(&format!("Image:      {image}\n"));
    out.push('\n');
    out.push_str(&format!("{}\n", detail.next_info.name));
    out.push_str(&format!("{}\n", detail.next_info.meaning));
    for (index, suggestion) in detail.next_info.suggestion.iter().enumerate() {
        out.push_str(&format!("  {}. {suggestion}\n", index + 1));
    }
    out
}

fn render_state<T>(
    state: &ViewState<T>,
    empty: &str,
    ready: impl FnOnce(&T) -> String,
) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => "Loading...\n".to_string(),
        ViewState::Ready(value) => ready(value),
        ViewState::Empty => format!("{empty}\n"),
        ViewState::Error(message) => format!("Error: {message}\n"),
    }
}

fn render_upload(upload: &UploadFlow) -> String {
    match upload.selected() {
        Some(image) => format!(
            "Selected: {} ({}, {} bytes)\n",
            image.file_name(),
            image.media_type(),
            image.len()
        ),
        None => "Upload: no image selected (JPG, PNG or WEBP)\n".to_string(),
    }
}

/// Renders the profile header on its own.
pub fn render_profile(router: &Router) -> String {
    format!("{}\n", render_header(router.shell().profile()))
}

/// Renders the active page, with the header on protected pages.
pub fn render_screen(router: &Router) -> String {
    let mut out = String::new();
    let screen = router.screen();
    if screen.route().requires_auth() {
        out.push_str(&format!("{}\n", render_header(router.shell().profile())));
        out.push('\n');
    }

    match screen {
        Screen::Home(page) => {
            out.push_str(&render_upload(page.upload()));
            out.push_str("\nRecent predictions\n");
            out.push_str(&render_state(page.recent(), "No predictions yet.", |records| {
                render_history(records)
            }));
        }
        Screen::History(page) => {
            out.push_str("History\n");
            out.push_str(&render_state(page.state(), "No predictions yet.", |records| {
                render_history(records)
            }));
        }
        Screen::Detail(page) => {
            out.push_str(&render_state(page.state(), "Prediction not found.", render_detail));
        }
        Screen::Login(page) => {
            out.push_str("Login\n");
            out.push_str(&render_state(page.state(), "", |_| String::new()));
        }
        Screen::Register(page) => {
            out.push_str("Register\n");
            out.push_str(&render_state(page.state(), "", |_| String::new()));
        }
    }
    out
}
