// Weather card rendering.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::render::WeatherCard;

use super::Palette;

/// Draw the results card, or a placeholder before the first result.
pub fn draw_card(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(card) = &app.card else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.muted))
            .title(" Weather ");
        let (text, color) = if app.pending > 0 || app.locating {
            ("⏳ Loading weather...", palette.highlight)
        } else {
            ("Search for a city to see the weather", palette.muted)
        };
        let placeholder = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let star = if app.is_favorite { "★" } else { "☆" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", card.location),
                Style::default()
                    .fg(palette.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{} ", star), Style::default().fg(palette.highlight)),
        ]));

    let lines = card_lines(card, palette);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn card_lines<'a>(card: &'a WeatherCard, palette: &Palette) -> Vec<Line<'a>> {
    let label = Style::default().fg(palette.muted);
    let value = Style::default().fg(palette.fg);

    let detail = |name: &'static str, text: &'a str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", name), label),
            Span::styled(text, value),
        ])
    };

    vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(format!("  {}  ", card.icon)),
            Span::styled(
                format!("{}°C", card.temperature),
                Style::default()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(format!("  {}", card.description), value)),
        Line::from(""),
        detail("Feels like", &card.feels_like),
        detail("Humidity", &card.humidity),
        detail("Wind", &card.wind),
        detail("Pressure", &card.pressure),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", card.updated_at), label)),
    ]
}
