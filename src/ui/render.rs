//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the loading
//! screen, the error screen or the browse view based on the load state.

use crate::app::{App, LoadState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{cards, detail, filters, header, help, stats, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 16;

const HEADER_HEIGHT: u16 = 4;
const FILTER_BAR_HEIGHT: u16 = 4;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = SPINNER.len();

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering, and resets the
/// mouse hit areas so they always match the frame on screen.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    app.card_areas.clear();
    app.detail_area = None;

    // At truly minimal dimensions, we can't render anything meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Trop petit")
        } else {
            Paragraph::new(format!(
                "Terminal trop petit\n\nMinimum : {}x{}\nActuel : {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    if app.is_loading() {
        render_loading(f, app, area);
    } else if let LoadState::Failed(message) = &app.load {
        render_error(f, app, message, area);
    } else {
        render_browse(f, app);
    }

    // Help overlay goes on top of any screen
    if app.show_help {
        help::render(f, app);
    }
}

/// Spinner and message, centered.
fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let frame = SPINNER[app.spinner_frame % SPINNER_FRAMES];
    let lines = vec![
        Line::from(Span::styled(frame, app.style("loading"))),
        Line::from(""),
        Line::from(Span::styled(
            "Chargement des articles...",
            app.style("header_subtitle"),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, vertically_centered(area, 3));
}

/// The load failed: the collection is not shown at all.
fn render_error(f: &mut Frame, app: &App, message: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Erreur", app.style("error"))),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            app.style("detail_body"),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Assurez-vous que le fichier articles.json est présent et lisible.",
            app.style("detail_meta"),
        )),
        Line::from(""),
        Line::from(Span::styled("q pour quitter", app.style("detail_meta"))),
    ];

    let width = area.width.saturating_sub(4).min(80);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let column = Rect::new(x, area.y, width, area.height);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, vertically_centered(column, 9));
}

/// Header, filter bar, card grid and status bar, plus overlays.
fn render_browse(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    filters::render(f, app, chunks[1]);
    cards::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.open_article.is_some() {
        detail::render(f, app);
    }

    if app.show_stats {
        stats::render(f, app);
    }
}

/// A band of `height` rows in the vertical middle of `area`.
fn vertically_centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height - height) / 2;
    Rect::new(area.x, y, area.width, height)
}
