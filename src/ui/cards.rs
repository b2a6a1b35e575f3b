//! Article card grid.
//!
//! One bordered card per visible article, laid out in as many columns as the
//! width allows (up to three). The grid scrolls by whole rows to keep the
//! cursor on screen, and every drawn card is recorded for mouse hit-testing.

use crate::app::{App, LoadState};
use crate::article::Article;
use crate::format::{category_label, format_date, time_ago_now, truncate_text};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

/// Rows per card, borders included.
pub(super) const CARD_HEIGHT: u16 = 7;
const MIN_CARD_WIDTH: u16 = 40;
const MAX_COLUMNS: u16 = 3;

const TITLE_MAX_CHARS: usize = 80;
const EXCERPT_MAX_CHARS: usize = 120;

/// Number of card columns that fit in `width`.
pub(super) fn columns_for(width: u16) -> u16 {
    (width / MIN_CARD_WIDTH).clamp(1, MAX_COLUMNS)
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let LoadState::Ready(articles) = &app.load else {
        return;
    };
    let articles = Arc::clone(articles);

    if app.visible.is_empty() {
        render_empty(f, app, area);
        return;
    }

    let columns = columns_for(area.width);
    let rows_on_screen = (area.height / CARD_HEIGHT).max(1);
    app.cards_per_page = usize::from(rows_on_screen) * usize::from(columns);
    app.scroll_list_to_cursor(usize::from(rows_on_screen), usize::from(columns));

    let column_constraints = vec![Constraint::Ratio(1, u32::from(columns)); usize::from(columns)];

    for row in 0..rows_on_screen {
        let y = area.y + row * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.y + area.height - y);
        let row_area = Rect::new(area.x, y, area.width, height);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints.clone())
            .split(row_area);

        for (column, cell) in cells.iter().enumerate() {
            let position =
                (app.list_offset + usize::from(row)) * usize::from(columns) + column;
            let Some(&idx) = app.visible.get(position) else {
                return;
            };
            let Some(article) = articles.get(idx) else {
                continue;
            };
            render_card(f, app, article, position == app.selected, *cell);
            app.card_areas.push((*cell, position));
        }
    }
}

fn render_empty(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Aucun article trouvé", app.style("card_title"))),
        Line::from(Span::styled(
            "Essayez de modifier vos critères de recherche ou de filtrage.",
            app.style("card_meta"),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_card(f: &mut Frame, app: &App, article: &Article, selected: bool, area: Rect) {
    let border_style = if selected {
        app.style("card_border_selected")
    } else {
        app.style("card_border")
    };

    let badge = format!(" {} ", category_label(article.category_scraped.as_deref()));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(badge, app.style("card_category")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 1 || inner.height < 1 {
        return;
    }
    let width = usize::from(inner.width);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    // Title and byline
    let title = strip_control_chars(&article.title);
    let title = truncate_text(&title, TITLE_MAX_CHARS);
    let byline = format!(
        "Par {} · {}",
        strip_control_chars(&article.author),
        time_ago_now(&article.publication_date)
    );
    let heading = vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            app.style("card_title"),
        )),
        Line::from(Span::styled(
            truncate_to_width(&byline, width).into_owned(),
            app.style("card_meta"),
        )),
    ];
    f.render_widget(Paragraph::new(heading), sections[0]);

    // Excerpt, on one logical line so it wraps across the remaining rows
    let excerpt = strip_control_chars(article.excerpt_source()).replace(['\n', '\r', '\t'], " ");
    let excerpt = truncate_text(excerpt.trim(), EXCERPT_MAX_CHARS);
    f.render_widget(
        Paragraph::new(Span::styled(excerpt.into_owned(), app.style("card_excerpt")))
            .wrap(Wrap { trim: true }),
        sections[1],
    );

    // Footer: publication date and image count
    let mut footer = vec![Span::styled(
        format_date(&article.publication_date),
        app.style("card_meta"),
    )];
    let images = article.image_count();
    if images > 0 {
        let label = if images == 1 { "image" } else { "images" };
        footer.push(Span::styled(
            format!("  ·  {} {}", images, label),
            app.style("card_images"),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(footer)), sections[2]);
}
