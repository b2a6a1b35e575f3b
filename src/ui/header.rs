use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title block with the four collection counters.
///
/// Counters come from the collection summary, so they do not move while
/// the user filters.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let stats = &app.summary.stats;
    let counters = [
        (stats.total, "articles"),
        (app.summary.categories.len(), "catégories"),
        (stats.authors, "auteurs"),
        (stats.with_images, "avec images"),
    ];

    let mut counter_spans = Vec::with_capacity(counters.len() * 2);
    for (i, (value, label)) in counters.iter().enumerate() {
        let sep = if i + 1 < counters.len() { "   " } else { "" };
        counter_spans.push(Span::styled(value.to_string(), app.style("stat_value")));
        counter_spans.push(Span::styled(
            format!(" {}{}", label, sep),
            app.style("stat_label"),
        ));
    }

    let lines = vec![
        Line::from(Span::styled("Kiosque", app.style("header_title"))),
        Line::from(Span::styled(
            "Explorez les articles du Blog du Modérateur",
            app.style("header_subtitle"),
        )),
        Line::from(counter_spans),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(app.style("panel_border")),
    );
    f.render_widget(paragraph, area);
}
