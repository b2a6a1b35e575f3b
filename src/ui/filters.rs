use crate::app::App;
use crate::format::{category_label, format_date, found_count};
use crate::query::CategoryFilter;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SEARCH_PLACEHOLDER: &str = "Rechercher dans les articles...";
const ALL_CATEGORIES: &str = "Toutes les catégories";

/// Label of the active category filter: `"Label (count)"` for a category.
pub(super) fn category_choice(app: &App) -> String {
    match &app.selection.category {
        CategoryFilter::All => ALL_CATEGORIES.to_string(),
        CategoryFilter::Only(key) => {
            let count = app
                .summary
                .stats
                .by_category
                .get(key)
                .copied()
                .unwrap_or(0);
            format!("{} ({})", category_label(Some(key.as_str())), count)
        }
    }
}

/// Render the search line and the category/sort selectors.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let inner_width = area.width.saturating_sub(2) as usize;

    // Search line
    let term = strip_control_chars(&app.selection.search_term);
    let mut search = vec![Span::styled("Recherche : ", app.style("filter_label"))];
    if term.is_empty() && !app.search_mode {
        search.push(Span::styled(SEARCH_PLACEHOLDER, app.style("filter_label")));
    } else {
        let style = if app.search_mode {
            app.style("search_active")
        } else {
            app.style("search_input")
        };
        let shown = truncate_to_width(&term, inner_width.saturating_sub(40));
        search.push(Span::styled(shown.into_owned(), style));
        if app.search_mode {
            search.push(Span::styled("_", app.style("search_active")));
        }
    }
    if !term.is_empty() {
        search.push(Span::styled(
            format!("   {}", found_count(app.visible.len())),
            app.style("result_count"),
        ));
    }

    // Selectors line
    let sort = app
        .selection
        .sort_by
        .map_or("Ordre du fichier", |key| key.label());
    let mut selectors = vec![
        Span::styled("Catégorie : ", app.style("filter_label")),
        Span::styled(category_choice(app), app.style("filter_value")),
        Span::styled("   Tri : ", app.style("filter_label")),
        Span::styled(sort, app.style("filter_value")),
    ];
    if let Some(period) = period_label(
        app.selection.date_from.as_deref(),
        app.selection.date_to.as_deref(),
    ) {
        selectors.push(Span::styled("   Période : ", app.style("filter_label")));
        selectors.push(Span::styled(period, app.style("filter_value")));
    }
    for (label, value) in [
        ("   Auteur : ", &app.selection.author),
        ("   Sous-catégorie : ", &app.selection.subcategory),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            selectors.push(Span::styled(label, app.style("filter_label")));
            selectors.push(Span::styled(
                strip_control_chars(value).into_owned(),
                app.style("filter_value"),
            ));
        }
    }

    let title_style = if app.search_mode {
        app.style("search_active")
    } else {
        app.style("panel_border")
    };

    let paragraph = Paragraph::new(vec![Line::from(search), Line::from(selectors)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(title_style)
            .title(" Filtres "),
    );
    f.render_widget(paragraph, area);
}

/// `"du 5 janvier 2023 au 1 mars 2024"` for whichever bounds are set.
fn period_label(from: Option<&str>, to: Option<&str>) -> Option<String> {
    match (from, to) {
        (None, None) => None,
        (Some(from), None) => Some(format!("depuis le {}", format_date(from))),
        (None, Some(to)) => Some(format!("jusqu'au {}", format_date(to))),
        (Some(from), Some(to)) => Some(format!(
            "du {} au {}",
            format_date(from),
            format_date(to)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, test_app};
    use crate::ui::render::tests::render_to_string;

    fn sample_app() -> App {
        test_app(vec![
            article("Alpha", "Alice", "20240101", Some("reseaux-sociaux")),
            article("Bravo", "Bob", "20240301", Some("reseaux-sociaux")),
            article("Charlie", "Alice", "20240201", Some("web")),
        ])
    }

    #[tokio::test]
    async fn test_category_choice_labels() {
        let mut app = sample_app();
        assert_eq!(category_choice(&app), "Toutes les catégories");
        app.set_category(CategoryFilter::Only("reseaux-sociaux".into()));
        assert_eq!(category_choice(&app), "Reseaux sociaux (2)");
    }

    #[tokio::test]
    async fn test_found_count_shown_only_with_term() {
        let mut app = sample_app();
        let text = render_to_string(&mut app, 120, 30);
        assert!(text.contains("Rechercher dans les articles..."));
        assert!(!text.contains("trouvé"));

        app.set_search_term("alice");
        let text = render_to_string(&mut app, 120, 30);
        assert!(text.contains("alice"));
        assert!(text.contains("2 articles trouvés"));
    }

    #[tokio::test]
    async fn test_author_and_subcategory_shown_when_set() {
        let mut app = sample_app();
        let text = render_to_string(&mut app, 140, 30);
        assert!(!text.contains("Auteur :"));

        app.selection.author = Some("alice".into());
        app.selection.subcategory = Some("outils".into());
        app.refresh_view();
        let text = render_to_string(&mut app, 140, 30);
        assert!(text.contains("Auteur : alice"));
        assert!(text.contains("Sous-catégorie : outils"));
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(None, None), None);
        assert_eq!(
            period_label(Some("20230105"), None).unwrap(),
            "depuis le 5 janvier 2023"
        );
        assert_eq!(
            period_label(Some("20230105"), Some("20240301")).unwrap(),
            "du 5 janvier 2023 au 1 mars 2024"
        );
    }
}
