use crate::app::{App, LoadState};
use crate::article::Article;
use crate::format::{category_label, format_date, time_ago_now};
use crate::util::{strip_control_chars, wrapped_height};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

use super::helpers::centered_rect;

/// Lines of the detail overlay, with the row count they need once wrapped.
struct DetailText {
    lines: Vec<Line<'static>>,
    width: usize,
    rows: usize,
}

impl DetailText {
    fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            width,
            rows: 0,
        }
    }

    fn push(&mut self, line: Line<'static>) {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        self.rows += wrapped_height(&text, self.width);
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.push(Line::from(""));
    }

    fn text(&mut self, text: &str, style: Style) {
        self.push(Line::from(Span::styled(
            strip_control_chars(text).into_owned(),
            style,
        )));
    }

    fn field(&mut self, label: &'static str, value: &str, label_style: Style, value_style: Style) {
        self.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(strip_control_chars(value).into_owned(), value_style),
        ]));
    }

    fn heading(&mut self, title: String, style: Style) {
        self.blank();
        self.push(Line::from(Span::styled(title, style)));
        self.blank();
    }
}

/// Build the overlay body for `article`.
fn build(app: &App, article: &Article, width: usize) -> DetailText {
    let meta = app.style("detail_meta");
    let body = app.style("detail_body");
    let link = app.style("detail_link");
    let heading = app.style("detail_heading");
    let italic = body.add_modifier(Modifier::ITALIC);

    let mut out = DetailText::new(width);

    out.text(&article.title, app.style("detail_title"));
    out.blank();

    out.field("Auteur : ", &article.author, meta, body);
    out.field(
        "Publié le : ",
        &format!(
            "{} ({})",
            format_date(&article.publication_date),
            time_ago_now(&article.publication_date)
        ),
        meta,
        body,
    );
    let category = article
        .category
        .clone()
        .unwrap_or_else(|| category_label(article.category_scraped.as_deref()));
    out.field("Catégorie : ", &category, meta, body);
    out.field("Voir l'article original : ", &article.url, meta, link);
    if let Some(thumbnail) = article.thumbnail_url() {
        out.field("Vignette : ", thumbnail, meta, link);
    }

    if let Some(summary) = article.summary_text() {
        out.heading("Résumé".to_string(), heading);
        out.text(summary.trim(), italic);
    }

    out.heading("Contenu de l'article".to_string(), heading);
    let mut first = true;
    for paragraph in article.paragraphs() {
        if !first {
            out.blank();
        }
        out.text(paragraph, body);
        first = false;
    }

    if let Some(images) = article.images.as_deref().filter(|i| !i.is_empty()) {
        out.heading(format!("Images de l'article ({})", images.len()), heading);
        for (i, image) in images.iter().enumerate() {
            match image.caption() {
                Some(caption) => out.text(caption, italic),
                None => out.text(&format!("Image {}", i + 1), body),
            }
            out.field("  ", image.url(), meta, link);
        }
    }

    out
}

/// Render the detail overlay for the open article.
///
/// Records the overlay area so a click outside it can close it, and the
/// wrapped content height so scrolling stops at the last line.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let LoadState::Ready(articles) = &app.load else {
        return;
    };
    let articles = Arc::clone(articles);
    let Some(article) = app.open_article.and_then(|idx| articles.get(idx)) else {
        return;
    };

    let overlay = centered_rect(80, 90, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let badge = format!(" {} ", category_label(article.category_scraped.as_deref()));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("detail_border"))
        .title(Span::styled(badge, app.style("card_category")))
        .title_bottom(Line::from(Span::styled(
            " Échap/b fermer · j/k défiler · o ouvrir ",
            app.style("detail_meta"),
        )));
    let inner = block.inner(overlay);

    let text = build(app, article, usize::from(inner.width));

    app.detail_area = Some(overlay);
    app.detail_visible_lines = usize::from(inner.height);
    app.detail_content_lines = text.rows;
    app.clamp_detail_scroll();
    let scroll = u16::try_from(app.detail_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(text.lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, test_app};
    use crate::article::ArticleImage;
    use crate::ui::render::tests::render_to_string;

    fn rich_article() -> Article {
        let mut a = article("Alpha", "Alice", "20230105", Some("intelligence-artificielle"));
        a.category = Some("Intelligence Artificielle".into());
        a.summary = Some("Le résumé.".into());
        a.content = "  Premier paragraphe.  \n\n   \nSecond paragraphe.".into();
        a.images = Some(vec![
            ArticleImage::Url("https://example.com/1.png".into()),
            ArticleImage::Captioned {
                url: "https://example.com/2.png".into(),
                caption: Some("Une légende".into()),
            },
        ]);
        a
    }

    fn line_texts(text: &DetailText) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_build_sections() {
        let app = test_app(Vec::new());
        let text = build(&app, &rich_article(), 80);
        let lines = line_texts(&text);

        assert_eq!(lines[0], "Alpha");
        assert!(lines.contains(&"Auteur : Alice".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Publié le : 5 janvier 2023")));
        assert!(lines.contains(&"Catégorie : Intelligence Artificielle".to_string()));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("Voir l'article original : https://")));
        assert!(lines.contains(&"Résumé".to_string()));
        assert!(lines.contains(&"Le résumé.".to_string()));
        assert!(lines.contains(&"Images de l'article (2)".to_string()));
        assert!(lines.contains(&"Image 1".to_string()));
        assert!(lines.contains(&"Une légende".to_string()));
        assert!(!lines.contains(&"Image 2".to_string()));
    }

    #[tokio::test]
    async fn test_paragraphs_trimmed_and_blank_ones_dropped() {
        let app = test_app(Vec::new());
        let text = build(&app, &rich_article(), 80);
        let lines = line_texts(&text);

        let start = lines
            .iter()
            .position(|l| l == "Contenu de l'article")
            .unwrap();
        assert_eq!(
            &lines[start + 2..start + 5],
            &["Premier paragraphe.", "", "Second paragraphe."]
        );
    }

    #[tokio::test]
    async fn test_optional_sections_omitted() {
        let app = test_app(Vec::new());
        let a = article("Alpha", "Alice", "bad", None);
        let lines = line_texts(&build(&app, &a, 80));

        assert!(!lines.contains(&"Résumé".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Images de l'article")));
        assert!(!lines.iter().any(|l| l.starts_with("Vignette")));
        assert!(lines.iter().any(|l| l.starts_with("Publié le : Date inconnue")));
        assert!(lines.contains(&"Catégorie : Article".to_string()));
    }

    #[tokio::test]
    async fn test_control_sequences_stripped() {
        let app = test_app(Vec::new());
        let a = article("\x1b]0;pwned\x07Alpha\x1b[2J", "Alice", "20230105", None);
        let lines = line_texts(&build(&app, &a, 80));
        assert_eq!(lines[0], "Alpha");
    }

    #[tokio::test]
    async fn test_rows_account_for_wrapping() {
        let app = test_app(Vec::new());
        let mut a = article("Alpha", "Alice", "20230105", None);
        a.content = "x".repeat(100);
        let narrow = build(&app, &a, 20);
        let wide = build(&app, &a, 200);
        assert!(narrow.rows > wide.rows);
        assert_eq!(wide.rows, wide.lines.len());
    }

    #[tokio::test]
    async fn test_render_records_area_and_clamps_scroll() {
        let mut app = test_app(vec![rich_article()]);
        app.open_selected();
        app.detail_scroll = 10_000;

        let text = render_to_string(&mut app, 100, 40);
        assert!(text.contains("Contenu de l'article"));
        assert!(app.detail_area.is_some());
        assert!(app.detail_content_lines > 0);
        assert!(app.detail_scroll <= app.detail_content_lines);
    }
}
