//! Collection statistics panel rendering.

use crate::app::App;
use crate::format::category_label;
use crate::util::strip_control_chars;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::percent_of;

/// Build the panel body: counters, per-category counts, then authors.
fn stats_lines(app: &App) -> Vec<Line<'static>> {
    let stats = &app.summary.stats;
    let label = app.style("stat_label");
    let value = app.style("stat_value");
    let heading = app.style("detail_heading");

    let counter = |name: &'static str, n: usize| {
        Line::from(vec![
            Span::styled(format!("  {:<22}", name), label),
            Span::styled(n.to_string(), value),
        ])
    };

    let mut lines = vec![
        counter("Articles", stats.total),
        counter("Catégories", app.summary.categories.len()),
        counter("Auteurs", stats.authors),
        counter("Avec images", stats.with_images),
        counter("Avec contenu", stats.with_content),
        Line::from(""),
        Line::from(Span::styled("  Par catégorie :", heading)),
    ];

    for (key, count) in &stats.by_category {
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {:<30}", category_label(Some(key.as_str()))),
                app.style("detail_body"),
            ),
            Span::styled(count.to_string(), value),
        ]));
    }
    if stats.uncategorized > 0 {
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<30}", "Sans catégorie"), label),
            Span::styled(stats.uncategorized.to_string(), value),
        ]));
    }

    if !app.summary.subcategories.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Sous-catégories :", heading)));
        lines.push(Line::from(Span::styled(
            format!(
                "    {}",
                strip_control_chars(&app.summary.subcategories.join(", "))
            ),
            app.style("detail_body"),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Auteurs :", heading)));
    lines.push(Line::from(Span::styled(
        format!(
            "    {}",
            strip_control_chars(&stats.author_names.join(", "))
        ),
        app.style("detail_body"),
    )));

    lines
}

/// Render the statistics panel as a centered overlay.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Centered panel: 60% width, 80% height (with reasonable minimums)
    let width = percent_of(area.width, 60)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = percent_of(area.height, 80)
        .max(12)
        .min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    if popup.width < 30 || popup.height < 8 {
        return;
    }

    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("detail_border"))
        .title(" Statistiques ");
    let inner_area = block.inner(popup);
    f.render_widget(block, popup);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner_area);

    let body = Paragraph::new(stats_lines(app))
        .wrap(Wrap { trim: false })
        .style(app.style("detail_body"));
    f.render_widget(body, sections[0]);

    let footer = Paragraph::new("  Échap pour fermer")
        .style(app.style("status_bar"))
        .alignment(Alignment::Left);
    f.render_widget(footer, sections[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, test_app};
    use crate::ui::render::tests::render_to_string;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .map(|s| s.trim_end().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_stats_lines() {
        let app = test_app(vec![
            article("Alpha", "Élodie", "20240101", Some("web")),
            article("Bravo", "Bob", "20240301", Some("web")),
            article("Charlie", "Alice", "20240201", Some("reseaux-sociaux")),
            article("Delta", "Alice", "20240201", None),
        ]);
        let lines = texts(&stats_lines(&app));

        assert!(lines.iter().any(|l| l.starts_with("  Articles") && l.ends_with('4')));
        assert!(lines.iter().any(|l| l.starts_with("  Catégories") && l.ends_with('2')));
        assert!(lines.iter().any(|l| l.starts_with("  Auteurs") && l.ends_with('3')));
        assert!(lines.iter().any(|l| l.contains("Reseaux sociaux") && l.ends_with('1')));
        assert!(lines.iter().any(|l| l.contains("Web") && l.ends_with('2')));
        assert!(lines.iter().any(|l| l.contains("Sans catégorie") && l.ends_with('1')));
        // Locale order puts É with E, after Bob
        assert!(lines.contains(&"    Alice, Bob, Élodie".to_string()));
    }

    #[tokio::test]
    async fn test_subcategories_listed_when_present() {
        let mut with_sub = article("Alpha", "Alice", "20240101", Some("web"));
        with_sub.subcategory = Some("Référencement".into());
        let mut other = article("Bravo", "Bob", "20240301", Some("web"));
        other.subcategory = Some("Design".into());

        let app = test_app(vec![with_sub, other]);
        let lines = texts(&stats_lines(&app));
        assert!(lines.contains(&"  Sous-catégories :".to_string()));
        assert!(lines.contains(&"    Design, Référencement".to_string()));

        let app = test_app(vec![article("Alpha", "Alice", "20240101", None)]);
        assert!(!texts(&stats_lines(&app)).iter().any(|l| l.contains("Sous-catégories")));
    }

    #[tokio::test]
    async fn test_panel_rendered_over_grid() {
        let mut app = test_app(vec![article("Alpha", "Alice", "20240101", Some("web"))]);
        app.show_stats = true;
        let text = render_to_string(&mut app, 100, 30);
        assert!(text.contains("Statistiques"));
        assert!(text.contains("Par catégorie"));
    }
}
