//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::config::SettingKey;
use crate::features::effects::{MenuAction, MenuItem};
use crate::features::session::{HomeView, SessionState};
use crate::tui::app::App;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App<'_>, view: &HomeView, visible: bool, menu: &[MenuItem]) {
    if !visible {
        render_compact(frame, view, menu);
        return;
    }

    // Create layout: header, message, timers, progress, button, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Message
            Constraint::Length(4), // Timers
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Button
            Constraint::Min(0),
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_message(frame, view, chunks[1]);
    render_timers(frame, app, view, chunks[2]);
    render_progress(frame, view, chunks[3]);
    render_button(frame, app, view, chunks[4]);
    render_status_bar(frame, app, menu, chunks[6]);

    if view.show_settings {
        render_settings(frame, app);
    }
}

const fn state_color(state: SessionState) -> Color {
    match state {
        SessionState::Waiting => Color::DarkGray,
        SessionState::Work => Color::Yellow,
        SessionState::Break => Color::Green,
    }
}

/// One line shown while the app is hidden.
fn render_compact(frame: &mut Frame<'_>, view: &HomeView, menu: &[MenuItem]) {
    let show_key = menu
        .iter()
        .find(|item| item.action == MenuAction::Show)
        .map_or('v', |item| item.key);
    let timer = view.active_timer().unwrap_or("--:--:--");

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", view.state),
            Style::default()
                .fg(state_color(view.state))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{timer}  {}%", view.progress)),
        Span::styled(
            format!("  ({show_key} to show)"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let area = Rect {
        height: 1_u16.min(frame.area().height),
        ..frame.area()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_header(frame: &mut Frame<'_>, view: &HomeView, area: Rect) {
    let color = state_color(view.state);
    let header = Paragraph::new(format!(" eyes-break · {} ", view.state))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(header, area);
}

fn render_message(frame: &mut Frame<'_>, view: &HomeView, area: Rect) {
    let message = Paragraph::new(view.current_message.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(message, area);
}

fn render_timers(frame: &mut Frame<'_>, app: &App<'_>, view: &HomeView, area: Rect) {
    let row = |label_key: &str, value: &str, state: SessionState| {
        let active = view.state == state;
        let style = if active {
            Style::default()
                .fg(state_color(state))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("  {:<10}", app.translator.translate(label_key)), style),
            Span::styled(value.to_string(), style),
        ])
    };

    let timers = Paragraph::new(vec![
        row("home.work", &view.timer_work, SessionState::Work),
        row("home.break", &view.timer_break, SessionState::Break),
    ])
    .block(Block::default().borders(Borders::TOP));

    frame.render_widget(timers, area);
}

fn render_progress(frame: &mut Frame<'_>, view: &HomeView, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(state_color(view.state)))
        .percent(u16::from(view.progress.min(100)));

    frame.render_widget(gauge, area);
}

fn render_button(frame: &mut Frame<'_>, app: &App<'_>, view: &HomeView, area: Rect) {
    let label = format!("[ {} ]", app.translator.translate(view.title_key));
    let style = if view.animated_after_started {
        Style::default()
            .fg(Color::Black)
            .bg(state_color(view.state))
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    frame.render_widget(
        Paragraph::new(label).alignment(Alignment::Center).style(style),
        area,
    );
}

fn render_status_bar(frame: &mut Frame<'_>, app: &App<'_>, menu: &[MenuItem], area: Rect) {
    let text = app.status.clone().unwrap_or_else(|| {
        let mut parts = vec!["space:start/stop".to_string(), "s:settings".to_string()];
        parts.extend(menu.iter().map(|item| format!("{}:{}", item.key, item.label)));
        parts.join(" | ")
    });

    let status = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_settings(frame: &mut Frame<'_>, app: &App<'_>) {
    let area = centered(frame.area(), 56, 12);
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem<'_>> = SettingKey::ALL
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let label = app.translator.translate(&format!("settings.{}", key.as_str()));
            let value = match (&app.editing, i == app.selected) {
                (Some(buffer), true) => format!("{buffer}_"),
                _ => app.value_of(*key),
            };
            let invalid = app.error.is_some_and(|(k, _)| k == *key);

            ListItem::new(Line::from(vec![
                Span::raw(format!(" {label:<26}")),
                Span::styled(
                    value,
                    Style::default().fg(if invalid { Color::Red } else { Color::Yellow }),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", app.translator.translate("settings.title")))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    if let Some((key, error)) = app.error {
        let line = Paragraph::new(format!(" {key}: {error}")).style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[1]);
    }
}
