use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};

use crate::config::AppSettings;
use crate::config::SettingKey;
use crate::features::session::{HomeView, SessionState};

fn on_off(enabled: bool) -> ColoredString {
    if enabled {
        "on".green()
    } else {
        "off".red()
    }
}

/// Format settings as an aligned key/value list
pub fn format_settings_pretty(settings: &AppSettings) -> String {
    let rows = [
        (SettingKey::WorkTime, settings.work_time.yellow()),
        (SettingKey::BreakTime, settings.break_time.yellow()),
        (
            SettingKey::Language,
            format!("{} ({})", settings.language.code(), settings.language.label()).normal(),
        ),
        (
            SettingKey::MessageAnimationDelay,
            format!("{} ms", settings.message_animation_delay).normal(),
        ),
        (SettingKey::NotificationsEnabled, on_off(settings.notifications_enabled)),
        (SettingKey::SoundEnabled, on_off(settings.sound_enabled)),
    ];

    let mut output = String::from("Settings\n");
    output.push_str(&"─".repeat(40));
    output.push('\n');

    for (key, value) in rows {
        output.push_str(&format!("  {:<22} {}\n", key.as_str().dimmed(), value));
    }

    output
}

fn state_label(state: SessionState) -> ColoredString {
    let label = format!("{:<7}", state.as_str());
    match state {
        SessionState::Waiting => label.dimmed(),
        SessionState::Work => label.yellow().bold(),
        SessionState::Break => label.green().bold(),
    }
}

/// Format one session snapshot as a log line
pub fn format_view_pretty(view: &HomeView, at: DateTime<Local>) -> String {
    let mut line = format!(
        "{}  {}",
        at.format("%H:%M:%S").to_string().dimmed(),
        state_label(view.state)
    );

    match view.active_timer() {
        Some(remaining) => line.push_str(&format!("  {remaining}  {:>3}%", view.progress)),
        None => line.push_str(&format!(
            "  work {}  break {}",
            view.timer_work, view.timer_break
        )),
    }

    line
}
