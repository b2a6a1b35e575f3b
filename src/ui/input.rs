//! Input handling for the TUI.
//!
//! This module processes keyboard and mouse input and dispatches to the
//! appropriate handler based on which overlay or mode is active.

use crate::app::App;
use crate::format::category_label;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::query::CategoryFilter;
use crate::util::{validate_url_for_open, MAX_SEARCH_LENGTH};
use anyhow::{Context as _, Result};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::helpers::contains;
use super::Action;

/// Lines scrolled per mouse wheel notch in the detail overlay.
const WHEEL_LINES: usize = 3;

/// Main input dispatch function.
///
/// Overlays capture input first (help, then statistics), then search mode,
/// then the detail overlay, then the grid.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.show_stats {
        return Ok(handle_stats_input(app, code));
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers));
    }

    if app.open_article.is_some() {
        return handle_detail_input(app, code, modifiers);
    }

    handle_list_input(app, code, modifiers)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the statistics panel is visible.
fn handle_stats_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('i')
    ) {
        app.show_stats = false;
    }
    Action::Continue
}

/// Handle input while the search line has focus.
///
/// The term is applied on every keystroke. Esc clears it and leaves search
/// mode, Enter keeps it and leaves search mode.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => {
            app.search_mode = false;
            app.set_search_term("");
        }
        Some(KbAction::CommitSearch) => {
            app.search_mode = false;
            tracing::debug!(term = %app.selection.search_term, visible = app.visible.len(), "Search committed");
        }
        _ => match code {
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if app.selection.search_term.chars().count() >= MAX_SEARCH_LENGTH {
                    app.set_status(format!(
                        "Recherche limitée à {} caractères",
                        MAX_SEARCH_LENGTH
                    ));
                } else {
                    app.push_search_char(c);
                }
            }
            _ => {}
        },
    }
    Action::Continue
}

/// Handle input while the detail overlay is open.
fn handle_detail_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Detail);

    match action {
        Some(KbAction::Quit) => return Ok(Action::Quit),
        Some(KbAction::CloseDetail) => app.close_detail(),
        Some(KbAction::ScrollDown) => app.scroll_down(1),
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => app.scroll_down(app.detail_visible_lines.max(1)),
        Some(KbAction::PageUp) => app.scroll_up(app.detail_visible_lines.max(1)),
        Some(KbAction::OpenInBrowser) => open_in_browser(app)?,
        Some(KbAction::CycleTheme) => cycle_theme(app),
        Some(KbAction::ShowHelp) => show_help(app),
        _ => {}
    }
    Ok(Action::Continue)
}

/// Handle input on the article grid.
fn handle_list_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global);

    // Loading and error screens only quit, switch theme or show help
    if !app.is_ready() {
        match action {
            Some(KbAction::Quit) => return Ok(Action::Quit),
            Some(KbAction::CycleTheme) => cycle_theme(app),
            Some(KbAction::ShowHelp) => show_help(app),
            _ => {}
        }
        return Ok(Action::Continue);
    }

    match action {
        Some(KbAction::Quit) => return Ok(Action::Quit),
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::Top) => app.nav_top(),
        Some(KbAction::Bottom) => app.nav_bottom(),
        Some(KbAction::PageDown) => app.page_down(),
        Some(KbAction::PageUp) => app.page_up(),
        Some(KbAction::Select) => {
            if !app.open_selected() {
                app.set_status("Aucun article à afficher");
            }
        }
        Some(KbAction::Back) => {
            if !app.selection.search_term.is_empty() {
                app.set_search_term("");
            }
        }
        Some(KbAction::EnterSearch) => app.search_mode = true,
        Some(KbAction::NextCategory) => {
            app.cycle_category(true);
            announce_category(app);
        }
        Some(KbAction::PrevCategory) => {
            app.cycle_category(false);
            announce_category(app);
        }
        Some(KbAction::CycleSort) => {
            let key = app.cycle_sort();
            app.set_status(format!("Tri : {}", key.label()));
        }
        Some(KbAction::ClearFilters) => {
            app.clear_filters();
            app.set_status("Filtres réinitialisés");
        }
        Some(KbAction::OpenInBrowser) => open_in_browser(app)?,
        Some(KbAction::ViewStats) => app.show_stats = true,
        Some(KbAction::CycleTheme) => cycle_theme(app),
        Some(KbAction::ShowHelp) => show_help(app),
        _ => {}
    }
    Ok(Action::Continue)
}

fn announce_category(app: &mut App) {
    let label = match &app.selection.category {
        CategoryFilter::All => "Toutes les catégories".to_string(),
        CategoryFilter::Only(key) => category_label(Some(key.as_str())),
    };
    app.set_status(format!("Catégorie : {}", label));
}

fn cycle_theme(app: &mut App) {
    let name = app.cycle_theme();
    app.set_status(format!("Thème : {}", name));
}

fn show_help(app: &mut App) {
    app.show_help = true;
    app.help_scroll_offset = 0;
}

/// Open the displayed (or selected) article in the system browser.
fn open_in_browser(app: &mut App) -> Result<()> {
    let Some(article) = app.target_article() else {
        return Ok(());
    };

    // Only http(s) URLs reach the OS opener
    let url = validate_url_for_open(&article.url)?;
    open::that(url.as_str()).context("Impossible d'ouvrir le navigateur")?;
    tracing::info!(url = %url, "Opened article in browser");
    app.set_status("Article ouvert dans le navigateur");
    Ok(())
}

/// Handle a mouse event using the areas recorded by the last render.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Action {
    let (x, y) = (mouse.column, mouse.row);

    if app.show_help || app.show_stats {
        match mouse.kind {
            MouseEventKind::ScrollDown if app.show_help => {
                app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
            }
            MouseEventKind::ScrollUp if app.show_help => {
                app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                app.show_help = false;
                app.help_scroll_offset = 0;
                app.show_stats = false;
            }
            _ => {}
        }
        return Action::Continue;
    }

    if app.open_article.is_some() {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Clicks inside the overlay are ignored; outside closes it.
                if !app.detail_area.is_some_and(|area| contains(area, x, y)) {
                    app.close_detail();
                }
            }
            MouseEventKind::ScrollDown => app.scroll_down(WHEEL_LINES),
            MouseEventKind::ScrollUp => app.scroll_up(WHEEL_LINES),
            _ => {}
        }
        return Action::Continue;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = app
                .card_areas
                .iter()
                .find(|(area, _)| contains(*area, x, y))
                .map(|&(_, position)| position);
            if let Some(position) = hit {
                app.search_mode = false;
                app.open_at(position);
            }
        }
        MouseEventKind::ScrollDown => app.nav_down(),
        MouseEventKind::ScrollUp => app.nav_up(),
        _ => {}
    }
    Action::Continue
}
