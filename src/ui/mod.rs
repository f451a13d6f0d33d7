// UI module for rendering the TUI.
// Lays out the search box, weather card, favorites, and status line.

mod card;
mod favorites;
mod palette;

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode};

pub use palette::Palette;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.theme);

    // Paint the theme background first
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(1),    // Card and favorites
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_search_box(frame, app, &palette, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(28)])
        .split(chunks[1]);

    card::draw_card(frame, app, &palette, body[0]);
    favorites::draw_favorites(frame, app, &palette, body[1]);

    draw_status_line(frame, app, &palette, chunks[2]);
    draw_key_hints(frame, app, &palette, chunks[3]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame, &palette);
    }
}

/// Draw the search box with the theme indicator in its title.
fn draw_search_box(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border = if editing { palette.accent } else { palette.muted };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" nimbus ")
        .title_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .title(Line::from(format!(" {} ", app.theme.glyph())).right_aligned());

    let mut spans = vec![
        Span::styled("City: ", Style::default().fg(palette.muted)),
        Span::styled(app.input.as_str(), Style::default().fg(palette.fg)),
    ];
    if editing {
        spans.push(Span::styled("█", Style::default().fg(palette.accent)));
    }

    let input = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(input, area);
}

/// Draw the transient status message.
fn draw_status_line(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    if app.status.message.is_empty() {
        return;
    }

    let color = if app.status.is_error() {
        palette.danger
    } else {
        palette.muted
    };

    let mut spans = vec![Span::styled(
        format!(" {}", app.status.message),
        Style::default().fg(color),
    )];
    if app.pending > 0 || app.locating {
        spans.insert(0, Span::styled(" ⏳", Style::default().fg(palette.accent)));
    }
    spans.push(Span::styled(
        format!("  ({})", format_relative_time(&app.status.timestamp)),
        Style::default().fg(palette.muted),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw keybinding hints for the current mode.
fn draw_key_hints(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let key = Style::default().fg(palette.fg);
    let label = Style::default().fg(palette.muted);

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" ↵ ", key),
            Span::styled("Search", label),
            Span::styled("  Esc ", key),
            Span::styled("Cancel", label),
        ],
        InputMode::Normal => vec![
            Span::styled(" / ", key),
            Span::styled("Search", label),
            Span::styled("  f ", key),
            Span::styled(if app.is_favorite { "Unstar" } else { "Star" }, label),
            Span::styled("  g ", key),
            Span::styled("Locate", label),
            Span::styled("  t ", key),
            Span::styled("Theme", label),
            Span::styled("  ? ", key),
            Span::styled("Help", label),
            Span::styled("  q ", key),
            Span::styled("Quit", label),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50.min(area.width);
    let popup_height = 18.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let bindings = [
        ("  / s i         ", "Edit search box"),
        ("  Enter         ", "Search / open favorite"),
        ("  Esc           ", "Cancel editing / close help"),
        ("  ↑/↓ or k/j    ", "Select favorite"),
        ("  d Del         ", "Remove selected favorite"),
        ("  f *           ", "Star / unstar shown city"),
        ("  g             ", "Weather at my location"),
        ("  r             ", "Refresh shown city"),
        ("  t             ", "Toggle light / dark"),
        ("  ?             ", "Show/hide this help"),
        ("  q Ctrl-c      ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(bindings.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(*keys, Style::default().fg(palette.accent)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(palette.muted)),
        Span::styled("Esc", Style::default().fg(palette.highlight)),
        Span::styled(" or ", Style::default().fg(palette.muted)),
        Span::styled("?", Style::default().fg(palette.highlight)),
        Span::styled(" to close", Style::default().fg(palette.muted)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

/// Format a timestamp relative to now.
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}
