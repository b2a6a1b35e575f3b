//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Default bindings are registered per context; `[keybindings]` in
//! config.toml can rebind any action by name.
use crossterm::event::{KeyCode, KeyModifiers};
use std::borrow::Cow;
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Top,
    Bottom,
    Select,
    Back,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    NextCategory,
    PrevCategory,
    CycleSort,
    ClearFilters,
    OpenInBrowser,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    CloseDetail,
    CycleTheme,
    ShowHelp,
    ViewStats,
}

impl Action {
    pub const ALL: [Action; 23] = [
        Action::Quit,
        Action::NavDown,
        Action::NavUp,
        Action::Top,
        Action::Bottom,
        Action::Select,
        Action::Back,
        Action::EnterSearch,
        Action::ExitSearch,
        Action::CommitSearch,
        Action::NextCategory,
        Action::PrevCategory,
        Action::CycleSort,
        Action::ClearFilters,
        Action::OpenInBrowser,
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::CloseDetail,
        Action::CycleTheme,
        Action::ShowHelp,
        Action::ViewStats,
    ];

    /// Key under `[keybindings]` in config.toml.
    pub fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "nav_down",
            Self::NavUp => "nav_up",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Select => "select",
            Self::Back => "back",
            Self::EnterSearch => "enter_search",
            Self::ExitSearch => "exit_search",
            Self::CommitSearch => "commit_search",
            Self::NextCategory => "next_category",
            Self::PrevCategory => "prev_category",
            Self::CycleSort => "cycle_sort",
            Self::ClearFilters => "clear_filters",
            Self::OpenInBrowser => "open_in_browser",
            Self::ScrollDown => "scroll_down",
            Self::ScrollUp => "scroll_up",
            Self::PageDown => "page_down",
            Self::PageUp => "page_up",
            Self::CloseDetail => "close_detail",
            Self::CycleTheme => "cycle_theme",
            Self::ShowHelp => "show_help",
            Self::ViewStats => "view_stats",
        }
    }

    /// Inverse of [`Action::name`], case-insensitive; `-` is accepted for `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Help screen label.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quitter",
            Self::NavDown => "Article suivant",
            Self::NavUp => "Article précédent",
            Self::Top => "Premier article",
            Self::Bottom => "Dernier article",
            Self::Select => "Ouvrir l'article",
            Self::Back => "Effacer la recherche",
            Self::EnterSearch => "Rechercher",
            Self::ExitSearch => "Annuler la recherche",
            Self::CommitSearch => "Valider la recherche",
            Self::NextCategory => "Catégorie suivante",
            Self::PrevCategory => "Catégorie précédente",
            Self::CycleSort => "Changer le tri",
            Self::ClearFilters => "Réinitialiser les filtres",
            Self::OpenInBrowser => "Ouvrir dans le navigateur",
            Self::ScrollDown => "Défiler vers le bas",
            Self::ScrollUp => "Défiler vers le haut",
            Self::PageDown => "Page suivante",
            Self::PageUp => "Page précédente",
            Self::CloseDetail => "Fermer l'article",
            Self::CycleTheme => "Changer de thème",
            Self::ShowHelp => "Afficher l'aide",
            Self::ViewStats => "Statistiques",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Article grid with the filter bar.
    Global,
    /// Article detail overlay.
    Detail,
    /// Search input has focus.
    Search,
}

impl Context {
    /// Section title on the help screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Liste",
            Self::Detail => "Article",
            Self::Search => "Recherche",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a config key string: a single character, `Ctrl+<char>`, `F1`..`F12`,
/// or a named key in English or French (`Enter`/`Entrée`, `Esc`/`Échap`, ...).
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" | "entrée" | "entree" => Some(KeyCode::Enter),
        "esc" | "escape" | "échap" | "echap" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" | "haut" => Some(KeyCode::Up),
        "down" | "bas" => Some(KeyCode::Down),
        "left" | "gauche" => Some(KeyCode::Left),
        "right" | "droite" => Some(KeyCode::Right),
        "home" | "début" | "debut" => Some(KeyCode::Home),
        "end" | "fin" => Some(KeyCode::End),
        "pagedown" | "pgdn" | "pgsuiv" => Some(KeyCode::PageDown),
        "pageup" | "pgup" | "pgpréc" | "pgprec" => Some(KeyCode::PageUp),
        "backspace" | "retour" => Some(KeyCode::Backspace),
        "space" | "espace" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    // Function keys
    if let Some(num) = s.strip_prefix('F').or_else(|| s.strip_prefix('f')) {
        if let Ok(n) = num.parse::<u8>() {
            return (1..=12)
                .contains(&n)
                .then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    // Single character
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Key label as shown on the help screen (French key names).
fn format_key(key: &KeySpec) -> String {
    let name: Cow<'static, str> = match key.code {
        KeyCode::Char(' ') => "Espace".into(),
        KeyCode::Char(c) => c.to_string().into(),
        KeyCode::Enter => "Entrée".into(),
        KeyCode::Esc => "Échap".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Up => "↑".into(),
        KeyCode::Down => "↓".into(),
        KeyCode::Left => "←".into(),
        KeyCode::Right => "→".into(),
        KeyCode::Home => "Début".into(),
        KeyCode::End => "Fin".into(),
        KeyCode::PageDown => "PgSuiv".into(),
        KeyCode::PageUp => "PgPréc".into(),
        KeyCode::Backspace => "Retour".into(),
        KeyCode::F(n) => format!("F{}", n).into(),
        _ => "?".into(),
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        format!("Ctrl+{}", name)
    } else {
        name.into_owned()
    }
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// in a non-global context fall back to the global bindings.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings, in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for &key in keys {
            self.bind(context, key, action);
        }
    }

    fn register_defaults(&mut self) {
        use KeyCode::*;
        let c = |ch| KeySpec::plain(Char(ch));
        let k = KeySpec::plain;

        // === Article list ===
        self.bind(Context::Global, c('q'), Action::Quit);
        self.bind_all(Context::Global, &[c('j'), k(Down)], Action::NavDown);
        self.bind_all(Context::Global, &[c('k'), k(Up)], Action::NavUp);
        self.bind_all(Context::Global, &[c('g'), k(Home)], Action::Top);
        self.bind_all(Context::Global, &[c('G'), k(End)], Action::Bottom);
        self.bind_all(
            Context::Global,
            &[KeySpec::ctrl('d'), k(PageDown)],
            Action::PageDown,
        );
        self.bind_all(
            Context::Global,
            &[KeySpec::ctrl('u'), k(PageUp)],
            Action::PageUp,
        );
        self.bind(Context::Global, k(Enter), Action::Select);
        self.bind(Context::Global, k(Esc), Action::Back);
        self.bind(Context::Global, c('/'), Action::EnterSearch);
        self.bind_all(Context::Global, &[c('c'), k(Tab)], Action::NextCategory);
        self.bind(Context::Global, c('C'), Action::PrevCategory);
        self.bind(Context::Global, c('s'), Action::CycleSort);
        self.bind(Context::Global, c('x'), Action::ClearFilters);
        self.bind(Context::Global, c('o'), Action::OpenInBrowser);
        self.bind(Context::Global, c('i'), Action::ViewStats);
        self.bind(Context::Global, c('T'), Action::CycleTheme);
        self.bind(Context::Global, c('?'), Action::ShowHelp);

        // === Detail overlay ===
        self.bind_all(Context::Detail, &[k(Esc), c('b')], Action::CloseDetail);
        self.bind_all(Context::Detail, &[c('j'), k(Down)], Action::ScrollDown);
        self.bind_all(Context::Detail, &[c('k'), k(Up)], Action::ScrollUp);
        self.bind_all(
            Context::Detail,
            &[KeySpec::ctrl('d'), k(PageDown), c(' ')],
            Action::PageDown,
        );
        self.bind_all(
            Context::Detail,
            &[KeySpec::ctrl('u'), k(PageUp)],
            Action::PageUp,
        );

        // === Search input ===
        self.bind(Context::Search, k(Esc), Action::ExitSearch);
        self.bind(Context::Search, k(Enter), Action::CommitSearch);
    }

    /// Rebind actions from the `[keybindings]` table (action name → key string).
    ///
    /// An override replaces every default key of the action, in each context
    /// the action was bound in. Returns one warning per entry that could not
    /// be applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = Action::from_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            // Rebind in every context where the action was bound
            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(reg: &KeybindingRegistry, code: KeyCode, ctx: Context) -> Option<Action> {
        reg.action_for_key(code, KeyModifiers::NONE, ctx)
    }

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(a, k)| (a.to_string(), k.to_string()))
            .collect()
    }

    #[test]
    fn test_list_defaults() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, KeyCode::Char('q'), Context::Global), Some(Action::Quit));
        assert_eq!(key(&reg, KeyCode::Down, Context::Global), Some(Action::NavDown));
        assert_eq!(key(&reg, KeyCode::Char('G'), Context::Global), Some(Action::Bottom));
        assert_eq!(key(&reg, KeyCode::Tab, Context::Global), Some(Action::NextCategory));
        assert_eq!(key(&reg, KeyCode::Char('C'), Context::Global), Some(Action::PrevCategory));
        assert_eq!(key(&reg, KeyCode::Char('s'), Context::Global), Some(Action::CycleSort));
        assert_eq!(key(&reg, KeyCode::Char('i'), Context::Global), Some(Action::ViewStats));
        assert_eq!(key(&reg, KeyCode::F(12), Context::Global), None);
    }

    #[test]
    fn test_detail_bindings_shadow_list_bindings() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, KeyCode::Char('j'), Context::Detail), Some(Action::ScrollDown));
        assert_eq!(key(&reg, KeyCode::Esc, Context::Detail), Some(Action::CloseDetail));
        assert_eq!(key(&reg, KeyCode::Char(' '), Context::Detail), Some(Action::PageDown));
        // Unbound in the overlay, so the list binding applies
        assert_eq!(key(&reg, KeyCode::Char('o'), Context::Detail), Some(Action::OpenInBrowser));
        assert_eq!(
            reg.action_for_key(KeyCode::Char('u'), KeyModifiers::CONTROL, Context::Detail),
            Some(Action::PageUp)
        );
    }

    #[test]
    fn test_search_bindings() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, KeyCode::Esc, Context::Search), Some(Action::ExitSearch));
        assert_eq!(key(&reg, KeyCode::Enter, Context::Search), Some(Action::CommitSearch));
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("Open-In-Browser"), Some(Action::OpenInBrowser));
        assert_eq!(Action::from_name("refresh"), None);
    }

    #[test]
    fn test_override_moves_action_to_new_key() {
        let mut reg = KeybindingRegistry::new();
        assert!(reg.apply_overrides(&overrides(&[("cycle_sort", "S")])).is_empty());

        assert_eq!(key(&reg, KeyCode::Char('S'), Context::Global), Some(Action::CycleSort));
        assert_eq!(key(&reg, KeyCode::Char('s'), Context::Global), None);
    }

    #[test]
    fn test_override_keeps_every_context() {
        let mut reg = KeybindingRegistry::new();
        assert!(reg.apply_overrides(&overrides(&[("page_down", "n")])).is_empty());

        assert_eq!(key(&reg, KeyCode::Char('n'), Context::Global), Some(Action::PageDown));
        assert_eq!(key(&reg, KeyCode::Char('n'), Context::Detail), Some(Action::PageDown));
        assert_eq!(key(&reg, KeyCode::Char(' '), Context::Detail), None);
    }

    #[test]
    fn test_override_warnings() {
        let mut reg = KeybindingRegistry::new();
        let mut warnings =
            reg.apply_overrides(&overrides(&[("refresh", "r"), ("quit", "Ctrl+Alt+q")]));
        warnings.sort();

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Cannot parse key 'Ctrl+Alt+q'"));
        assert!(warnings[1].starts_with("Unknown action 'refresh'"));
        // Failed overrides leave the defaults in place
        assert_eq!(key(&reg, KeyCode::Char('q'), Context::Global), Some(Action::Quit));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Entrée"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("escape"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("espace"), Some(KeySpec::plain(KeyCode::Char(' '))));
        assert_eq!(parse_key_string(" Ctrl+n "), Some(KeySpec::ctrl('n')));
        assert_eq!(parse_key_string("f5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("é"), Some(KeySpec::plain(KeyCode::Char('é'))));
        assert_eq!(parse_key_string("jk"), None);
    }

    #[test]
    fn test_format_key_uses_french_names() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Entrée");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Esc)), "Échap");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Espace");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Down)), "↓");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
    }

    #[test]
    fn test_every_action_is_reachable_by_default() {
        let bindings = KeybindingRegistry::new().all_bindings();
        for action in Action::ALL {
            assert!(
                bindings.iter().any(|(_, _, a, _)| *a == action),
                "{} has no default key",
                action.name()
            );
        }
    }
}
