use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    f.render_widget(Paragraph::new(status_text(app)).style(app.style("status_bar")), area);
}

/// Status message if one is live, otherwise key hints for the current mode.
fn status_text(app: &App) -> Cow<'_, str> {
    if let Some((msg, _)) = &app.status_message {
        // Borrow existing status message instead of cloning
        return Cow::Borrowed(msg.as_ref());
    }

    // Static keybinding hints - zero allocation
    if app.search_mode {
        Cow::Borrowed("Tapez pour rechercher | Échap effacer | Entrée valider")
    } else if app.open_article.is_some() {
        Cow::Borrowed("[b]retour [j/k]défiler [Ctrl+d/u]page [o]uvrir [q]uitter")
    } else {
        Cow::Borrowed(
            "[/]recherche [c]atégorie [s]tri [x]réinit. [Entrée]lire [o]uvrir [i]nfos [?]aide [q]uitter",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, test_app};

    #[tokio::test]
    async fn test_hints_follow_mode() {
        let mut app = test_app(vec![article("Alpha", "Alice", "20240101", None)]);
        assert!(status_text(&app).starts_with("[/]recherche"));

        app.search_mode = true;
        assert!(status_text(&app).starts_with("Tapez pour rechercher"));

        app.search_mode = false;
        app.open_selected();
        assert!(status_text(&app).starts_with("[b]retour"));
    }

    #[tokio::test]
    async fn test_status_message_takes_precedence() {
        let mut app = test_app(Vec::new());
        app.search_mode = true;
        app.set_status("Filtres réinitialisés");
        assert_eq!(status_text(&app), "Filtres réinitialisés");
        assert!(matches!(status_text(&app), Cow::Borrowed(_)));
    }
}
