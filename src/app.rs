use crate::article::Article;
use crate::keybindings::KeybindingRegistry;
use crate::loader::{LoadOptions, Loaded, Source};
use crate::query::{self, CategoryFilter, Selection, SortKey, Summary};
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::Result;
use ratatui::layout::Rect;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status bar message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy with loop detection and a hop limit.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 5 {
            return attempt.error("Too many redirects (max 5)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev == url) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

// ============================================================================
// Load and Event Types
// ============================================================================

/// Lifecycle of the article collection.
///
/// The collection is fetched once; after that it is immutable for the
/// session, so it is shared as an `Arc`.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready(Arc<Vec<Article>>),
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The one-shot collection load finished.
    ArticlesLoaded(Result<Loaded, String>),
    /// A background task panicked.
    ///
    /// - `task`: name of the task that panicked
    /// - `error`: the panic message extracted from the payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub http_client: reqwest::Client,
    pub source: Source,
    pub load_options: LoadOptions,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Data
    pub load: LoadState,
    /// Category list and statistics. Derived once per loaded collection.
    pub summary: Summary,

    // Selection and derived view
    pub selection: Selection,
    /// Indices into the collection, in display order.
    pub visible: Vec<usize>,
    /// Cursor position within `visible`.
    pub selected: usize,
    /// First card row drawn in the grid.
    pub list_offset: usize,

    // Detail overlay
    /// Collection index of the article shown in the detail overlay.
    pub open_article: Option<usize>,
    pub detail_scroll: usize,
    /// Updated during rendering, used for page scrolling and clamping.
    pub detail_visible_lines: usize,
    pub detail_content_lines: usize,

    // Mode flags
    pub search_mode: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub show_stats: bool,
    pub mouse_enabled: bool,

    // Hit-test areas recorded by the last render, for mouse input
    pub card_areas: Vec<(Rect, usize)>,
    pub detail_area: Option<Rect>,
    /// Cards that fit on one screen. Updated during rendering.
    pub cards_per_page: usize,

    /// Status message with expiry. `Cow` avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(source: Source, load_options: LoadOptions, selection: Selection) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(concat!("kiosque/", env!("CARGO_PKG_VERSION")))
            .timeout(load_options.timeout)
            .build()?;

        Ok(Self {
            http_client,
            source,
            load_options,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            load: LoadState::Loading,
            summary: Summary::default(),
            selection,
            visible: Vec::new(),
            selected: 0,
            list_offset: 0,
            open_article: None,
            detail_scroll: 0,
            detail_visible_lines: 0,
            detail_content_lines: 0,
            search_mode: false,
            show_help: false,
            help_scroll_offset: 0,
            show_stats: false,
            mouse_enabled: true,
            card_areas: Vec::new(),
            detail_area: None,
            cards_per_page: 1,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        })
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// The loaded collection, or an empty slice while loading or after failure.
    pub fn articles(&self) -> &[Article] {
        match &self.load {
            LoadState::Ready(articles) => articles,
            LoadState::Loading | LoadState::Failed(_) => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    /// Whether the browse view is on screen. The loading and error screens
    /// hide it entirely.
    pub fn is_ready(&self) -> bool {
        matches!(self.load, LoadState::Ready(_))
    }

    /// Install the result of the collection load.
    pub fn finish_load(&mut self, result: Result<Loaded, String>) {
        match result {
            Ok(loaded) => {
                self.summary = query::summarize(&loaded.articles);
                self.load = LoadState::Ready(Arc::new(loaded.articles));
                if loaded.skipped > 0 {
                    self.set_status(format!(
                        "{} entrée(s) invalide(s) ignorée(s)",
                        loaded.skipped
                    ));
                }
                self.refresh_view();
            }
            Err(message) => {
                tracing::error!(error = %message, "Failed to load articles");
                self.summary = Summary::default();
                self.visible.clear();
                self.load = LoadState::Failed(message);
            }
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Re-derive the visible list after any selection change.
    ///
    /// The cursor stays on the same article when it is still visible,
    /// otherwise it is clamped.
    pub fn refresh_view(&mut self) {
        let previous = self.visible.get(self.selected).copied();
        self.visible = query::select(self.articles(), &self.selection);

        self.selected = previous
            .and_then(|idx| self.visible.iter().position(|&v| v == idx))
            .unwrap_or(0);
        self.clamp_cursor();
        self.needs_redraw = true;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.selection.search_term = term.into();
        self.refresh_view();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.selection.search_term.push(c);
        self.refresh_view();
    }

    pub fn pop_search_char(&mut self) {
        if self.selection.search_term.pop().is_some() {
            self.refresh_view();
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.selection.category = category;
        self.refresh_view();
    }

    /// Step through `all`, then every known category, then back to `all`.
    pub fn cycle_category(&mut self, forward: bool) {
        let categories = &self.summary.categories;
        // Position 0 is "all", category i is at position i + 1.
        let slots = categories.len() + 1;
        let current = match &self.selection.category {
            CategoryFilter::All => 0,
            CategoryFilter::Only(key) => categories
                .iter()
                .position(|c| c == key)
                .map_or(0, |i| i + 1),
        };
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        let filter = match next {
            0 => CategoryFilter::All,
            i => CategoryFilter::Only(categories[i - 1].clone()),
        };
        self.set_category(filter);
    }

    /// Date → Title → Author → Date. An unsorted view starts at Date.
    pub fn cycle_sort(&mut self) -> SortKey {
        let next = self.selection.sort_by.map_or(SortKey::Date, SortKey::next);
        self.set_sort(next);
        next
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.selection.sort_by = Some(key);
        self.refresh_view();
    }

    /// Reset every filter to its default.
    pub fn clear_filters(&mut self) {
        self.selection = Selection::default();
        self.selected = 0;
        self.list_offset = 0;
        self.refresh_view();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn clamp_cursor(&mut self) {
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self.selected.saturating_add(1).min(self.visible.len() - 1);
        }
    }

    pub fn nav_top(&mut self) {
        self.selected = 0;
    }

    pub fn nav_bottom(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        self.selected = self.selected.saturating_add(self.cards_per_page.max(1));
        self.clamp_cursor();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.cards_per_page.max(1));
    }

    /// Adjust `list_offset` so the cursor row is on screen.
    ///
    /// The grid holds `columns` cards per row; offsets are in rows.
    pub fn scroll_list_to_cursor(&mut self, rows_on_screen: usize, columns: usize) {
        let rows = rows_on_screen.max(1);
        let columns = columns.max(1);
        let cursor_row = self.selected / columns;
        if cursor_row < self.list_offset {
            self.list_offset = cursor_row;
        } else if cursor_row >= self.list_offset + rows {
            self.list_offset = cursor_row + 1 - rows;
        }
        let total_rows = self.visible.len().div_ceil(columns);
        self.list_offset = self.list_offset.min(total_rows.saturating_sub(rows));
    }

    /// Article under the cursor.
    pub fn selected_article(&self) -> Option<&Article> {
        let idx = *self.visible.get(self.selected)?;
        self.articles().get(idx)
    }

    // ========================================================================
    // Detail overlay
    // ========================================================================

    /// Open the article under the cursor. Returns false when the list is empty.
    pub fn open_selected(&mut self) -> bool {
        self.open_at(self.selected)
    }

    /// Open the article at `position` in the visible list.
    pub fn open_at(&mut self, position: usize) -> bool {
        let Some(&idx) = self.visible.get(position) else {
            return false;
        };
        self.selected = position;
        self.open_article = Some(idx);
        self.detail_scroll = 0;
        self.needs_redraw = true;
        true
    }

    pub fn close_detail(&mut self) {
        self.open_article = None;
        self.detail_scroll = 0;
        self.detail_area = None;
        self.needs_redraw = true;
    }

    pub fn detail_article(&self) -> Option<&Article> {
        self.articles().get(self.open_article?)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.detail_scroll = self.detail_scroll.saturating_add(lines);
        self.clamp_detail_scroll();
    }

    /// Keep the detail scroll within the last known content height.
    pub fn clamp_detail_scroll(&mut self) {
        let max_scroll = self
            .detail_content_lines
            .saturating_sub(self.detail_visible_lines);
        self.detail_scroll = self.detail_scroll.min(max_scroll).min(MAX_SCROLL);
    }

    /// The article the browser shortcut applies to: the open one, else the
    /// one under the cursor.
    pub fn target_article(&self) -> Option<&Article> {
        self.detail_article().or_else(|| self.selected_article())
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    pub(crate) fn article(title: &str, author: &str, date: &str, category: Option<&str>) -> Article {
        Article {
            url: format!("https://www.blogdumoderateur.com/{}/", title.to_lowercase()),
            title: title.to_string(),
            author: author.to_string(),
            content: format!("Premier paragraphe de {}.\nSecond paragraphe.", title),
            summary: None,
            publication_date: date.to_string(),
            category: category.map(str::to_string),
            category_scraped: category.map(str::to_string),
            subcategory: None,
            thumbnail: None,
            images: None,
        }
    }

    pub(crate) fn test_app(articles: Vec<Article>) -> App {
        let mut app = App::new(
            Source::default(),
            LoadOptions::default(),
            Selection::default(),
        )
        .unwrap();
        app.finish_load(Ok(Loaded {
            articles,
            skipped: 0,
        }));
        app
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Alpha", "Alice", "20240101", Some("ia")),
            article("Bravo", "Bob", "20240301", Some("web")),
            article("Charlie", "Alice", "20240201", Some("ia")),
            article("Delta", "Dan", "20231201", None),
        ]
    }

    fn visible_titles(app: &App) -> Vec<&str> {
        app.visible
            .iter()
            .map(|&i| app.articles()[i].title.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_new_app_is_loading() {
        let app = App::new(Source::default(), LoadOptions::default(), Selection::default())
            .unwrap();
        assert!(app.is_loading());
        assert!(app.articles().is_empty());
        assert!(app.selected_article().is_none());
    }

    #[tokio::test]
    async fn test_finish_load_derives_view_and_summary() {
        let app = test_app(sample());
        assert_eq!(visible_titles(&app), vec!["Bravo", "Charlie", "Alpha", "Delta"]);
        assert_eq!(app.summary.categories, vec!["ia", "web"]);
        assert_eq!(app.summary.stats.total, 4);
    }

    #[tokio::test]
    async fn test_finish_load_failure() {
        let mut app = App::new(Source::default(), LoadOptions::default(), Selection::default())
            .unwrap();
        app.finish_load(Err("Erreur HTTP: statut 404".to_string()));
        assert!(matches!(app.load, LoadState::Failed(ref m) if m.contains("404")));
        assert!(app.articles().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_entries_reported_in_status() {
        let mut app = App::new(Source::default(), LoadOptions::default(), Selection::default())
            .unwrap();
        app.finish_load(Ok(Loaded {
            articles: sample(),
            skipped: 2,
        }));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains('2'));
    }

    #[tokio::test]
    async fn test_search_updates_view_live() {
        let mut app = test_app(sample());
        app.push_search_char('a');
        app.push_search_char('l');
        assert_eq!(visible_titles(&app), vec!["Charlie", "Alpha"]);
        app.pop_search_char();
        app.pop_search_char();
        assert_eq!(app.visible.len(), 4);
    }

    #[tokio::test]
    async fn test_cursor_follows_article_across_refresh() {
        let mut app = test_app(sample());
        app.selected = 2; // Alpha
        app.set_category(CategoryFilter::Only("ia".to_string()));
        assert_eq!(app.selected_article().unwrap().title, "Alpha");
    }

    #[tokio::test]
    async fn test_cursor_clamped_when_article_filtered_out() {
        let mut app = test_app(sample());
        app.selected = 3; // Delta
        app.set_search_term("bravo");
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_article().unwrap().title, "Bravo");
    }

    #[tokio::test]
    async fn test_cycle_category_wraps_through_all() {
        let mut app = test_app(sample());
        app.cycle_category(true);
        assert_eq!(app.selection.category, CategoryFilter::Only("ia".into()));
        app.cycle_category(true);
        assert_eq!(app.selection.category, CategoryFilter::Only("web".into()));
        app.cycle_category(true);
        assert_eq!(app.selection.category, CategoryFilter::All);
        app.cycle_category(false);
        assert_eq!(app.selection.category, CategoryFilter::Only("web".into()));
    }

    #[tokio::test]
    async fn test_cycle_sort() {
        let mut app = test_app(sample());
        assert_eq!(app.cycle_sort(), SortKey::Title);
        assert_eq!(visible_titles(&app), vec!["Alpha", "Bravo", "Charlie", "Delta"]);
        assert_eq!(app.cycle_sort(), SortKey::Author);
        assert_eq!(app.cycle_sort(), SortKey::Date);
    }

    #[tokio::test]
    async fn test_clear_filters() {
        let mut app = test_app(sample());
        app.set_search_term("zzz");
        app.set_sort(SortKey::Author);
        assert!(app.visible.is_empty());
        app.clear_filters();
        assert_eq!(app.selection, Selection::default());
        assert_eq!(app.visible.len(), 4);
    }

    #[tokio::test]
    async fn test_summary_ignores_selection() {
        let mut app = test_app(sample());
        let before = app.summary.clone();
        app.set_search_term("bravo");
        app.set_category(CategoryFilter::Only("web".into()));
        assert_eq!(app.summary, before);
    }

    #[tokio::test]
    async fn test_navigation_bounds() {
        let mut app = test_app(sample());
        app.nav_up();
        assert_eq!(app.selected, 0);
        app.nav_bottom();
        assert_eq!(app.selected, 3);
        app.nav_down();
        assert_eq!(app.selected, 3);
        app.cards_per_page = 2;
        app.page_up();
        assert_eq!(app.selected, 1);
        app.page_down();
        app.page_down();
        assert_eq!(app.selected, 3);
    }

    #[tokio::test]
    async fn test_nav_on_empty_list() {
        let mut app = test_app(Vec::new());
        app.nav_down();
        app.page_down();
        assert_eq!(app.selected, 0);
        assert!(!app.open_selected());
        assert!(app.open_article.is_none());
    }

    #[tokio::test]
    async fn test_scroll_list_to_cursor() {
        let mut app = test_app(sample());
        app.selected = 3;
        app.scroll_list_to_cursor(2, 1);
        assert_eq!(app.list_offset, 2);
        app.selected = 0;
        app.scroll_list_to_cursor(2, 1);
        assert_eq!(app.list_offset, 0);
    }

    #[tokio::test]
    async fn test_scroll_list_to_cursor_in_grid_rows() {
        let mut app = test_app(sample());
        // Two columns: rows are [0, 1] and [2, 3]
        app.selected = 3;
        app.scroll_list_to_cursor(1, 2);
        assert_eq!(app.list_offset, 1);
        app.selected = 1;
        app.scroll_list_to_cursor(1, 2);
        assert_eq!(app.list_offset, 0);
        // Everything fits: offset stays at zero
        app.selected = 3;
        app.scroll_list_to_cursor(5, 2);
        assert_eq!(app.list_offset, 0);
    }

    #[tokio::test]
    async fn test_open_and_close_detail() {
        let mut app = test_app(sample());
        assert!(app.open_at(1));
        assert_eq!(app.detail_article().unwrap().title, "Charlie");
        assert_eq!(app.target_article().unwrap().title, "Charlie");
        app.detail_scroll = 5;
        app.close_detail();
        assert!(app.detail_article().is_none());
        assert_eq!(app.detail_scroll, 0);
        assert_eq!(app.target_article().unwrap().title, "Charlie");
    }

    #[tokio::test]
    async fn test_detail_scroll_clamped() {
        let mut app = test_app(sample());
        app.open_selected();
        app.detail_content_lines = 30;
        app.detail_visible_lines = 10;
        app.scroll_down(100);
        assert_eq!(app.detail_scroll, 20);
        app.scroll_up(100);
        assert_eq!(app.detail_scroll, 0);
    }

    #[tokio::test]
    async fn test_cycle_theme() {
        let mut app = test_app(Vec::new());
        assert_eq!(app.cycle_theme(), "Clair");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.cycle_theme(), "Sombre");
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app(Vec::new());
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
