// Favorites list rendering.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

use super::Palette;

/// Draw the favorites list with the current selection highlighted.
pub fn draw_favorites(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(" Favorites ");

    if app.favorites_panel.is_empty() {
        let text = Paragraph::new("No favorites yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let current = app.current_city.as_deref().map(str::to_lowercase);
    let items: Vec<ListItem> = app
        .favorites_panel
        .items
        .iter()
        .map(|city| {
            let shown = current.as_deref() == Some(city.to_lowercase().as_str());
            let style = if shown {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.fg)
            };
            ListItem::new(Line::from(vec![
                Span::styled(city.clone(), style),
                Span::styled("  ✕", Style::default().fg(palette.muted)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.favorites_panel.list_state);
}
