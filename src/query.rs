//! In-memory query layer over a loaded article collection.
//!
//! Two derivations, both pure:
//!
//! - [`select`] maps `(collection, selection)` to the ordered list of visible
//!   articles (search, then category, then author and subcategory, then date
//!   range, then a stable sort).
//! - [`summarize`] maps the collection alone to the category list and the
//!   aggregate statistics. It ignores the selection, so its output only
//!   changes when a new collection is loaded.
//!
//! Views are expressed as indices into the collection, which is immutable
//! once loaded.
use crate::article::Article;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Selection
// ============================================================================

/// Sort order for the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Newest first, by raw `publication_date` string.
    Date,
    /// A → Z, locale-aware.
    Title,
    /// A → Z, locale-aware.
    Author,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Title, SortKey::Author];

    /// Parse a sort key name (`date`, `title`, `author`), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Author => "author",
        }
    }

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date de publication",
            Self::Title => "Titre (A-Z)",
            Self::Author => "Auteur (A-Z)",
        }
    }

    /// Cycle Date → Title → Author → Date.
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Title,
            Self::Title => Self::Author,
            Self::Author => Self::Date,
        }
    }
}

/// Category restriction for the visible list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on `category_scraped`.
    Only(String),
}

impl CategoryFilter {
    /// Name used on the command line: `"all"` or the category key itself.
    pub fn from_name(name: &str) -> Self {
        if name == "all" {
            Self::All
        } else {
            Self::Only(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(key) => key,
        }
    }

    fn matches(&self, article: &Article) -> bool {
        match self {
            Self::All => true,
            Self::Only(key) => article.category_scraped.as_deref() == Some(key.as_str()),
        }
    }
}

/// The user's current search/filter/sort choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub search_term: String,
    pub category: CategoryFilter,
    /// `None` keeps collection order.
    pub sort_by: Option<SortKey>,
    /// Case-insensitive substring of `author`.
    pub author: Option<String>,
    /// Case-insensitive substring of `subcategory`. Articles without one
    /// never match.
    pub subcategory: Option<String>,
    /// Inclusive lower bound on `publication_date` (string comparison).
    pub date_from: Option<String>,
    /// Inclusive upper bound on `publication_date` (string comparison).
    pub date_to: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: CategoryFilter::All,
            sort_by: Some(SortKey::Date),
            author: None,
            subcategory: None,
            date_from: None,
            date_to: None,
        }
    }
}

// ============================================================================
// Filtering and sorting
// ============================================================================

/// Case-insensitive substring match on title, content or author.
///
/// `needle` must already be lowercased.
pub fn matches_search(article: &Article, needle: &str) -> bool {
    needle.is_empty()
        || article.title.to_lowercase().contains(needle)
        || article.content.to_lowercase().contains(needle)
        || article.author.to_lowercase().contains(needle)
}

/// Lowercased needle for an optional narrowing; blank means no filter.
fn needle(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
}

fn field_contains(field: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field.is_some_and(|f| f.to_lowercase().contains(needle)),
    }
}

fn in_date_range(article: &Article, from: Option<&str>, to: Option<&str>) -> bool {
    let date = article.publication_date.as_str();
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

/// Indices of the articles visible under `selection`, in display order.
pub fn select(articles: &[Article], selection: &Selection) -> Vec<usize> {
    let needle_text = selection.search_term.to_lowercase();
    let author = needle(selection.author.as_deref());
    let subcategory = needle(selection.subcategory.as_deref());
    let from = selection.date_from.as_deref();
    let to = selection.date_to.as_deref();

    let mut visible: Vec<usize> = articles
        .iter()
        .enumerate()
        .filter(|(_, a)| matches_search(a, &needle_text))
        .filter(|(_, a)| selection.category.matches(a))
        .filter(|(_, a)| field_contains(Some(a.author.as_str()), author.as_deref()))
        .filter(|(_, a)| field_contains(a.subcategory.as_deref(), subcategory.as_deref()))
        .filter(|(_, a)| in_date_range(a, from, to))
        .map(|(i, _)| i)
        .collect();

    if let Some(key) = selection.sort_by {
        sort_indices(articles, &mut visible, key);
    }

    visible
}

/// Stable sort of `indices` by `key`.
pub fn sort_indices(articles: &[Article], indices: &mut [usize], key: SortKey) {
    match key {
        SortKey::Date => {
            indices.sort_by(|&a, &b| {
                articles[b]
                    .publication_date
                    .cmp(&articles[a].publication_date)
            });
        }
        SortKey::Title => {
            indices.sort_by_cached_key(|&i| CollationKey::new(&articles[i].title));
        }
        SortKey::Author => {
            indices.sort_by_cached_key(|&i| CollationKey::new(&articles[i].author));
        }
    }
}

// ============================================================================
// Locale-aware comparison
// ============================================================================

/// Sort key approximating a French collation: case and Latin diacritics are
/// ignored at the primary level, the raw string breaks ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: String,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        Self {
            primary: fold_for_collation(s),
            raw: s.to_string(),
        }
    }
}

/// Compare two strings the way the title/author sorts do.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold_for_collation(a)
        .cmp(&fold_for_collation(b))
        .then_with(|| a.cmp(b))
}

fn fold_for_collation(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => out.push('a'),
            'ç' | 'ć' | 'č' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' | 'ī' => out.push('i'),
            'ñ' | 'ń' | 'ň' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => out.push('o'),
            'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'š' | 'ś' => out.push('s'),
            'ž' | 'ź' | 'ż' => out.push('z'),
            'œ' => out.push_str("oe"),
            'æ' => out.push_str("ae"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

// ============================================================================
// Categories and statistics
// ============================================================================

/// Aggregate counts over the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    /// Article count per `category_scraped` key.
    pub by_category: BTreeMap<String, usize>,
    /// Articles with no `category_scraped`.
    pub uncategorized: usize,
    /// Number of distinct authors.
    pub authors: usize,
    /// Articles with a non-empty `images` array.
    pub with_images: usize,
    /// Articles with non-empty content.
    pub with_content: usize,
    /// Distinct author names, locale-sorted.
    pub author_names: Vec<String>,
}

/// Collection-level derivations, independent of the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Distinct `category_scraped` keys, ascending.
    pub categories: Vec<String>,
    /// Distinct non-blank `subcategory` values, locale-sorted.
    pub subcategories: Vec<String>,
    pub stats: Stats,
}

/// Distinct category keys across the whole collection, ascending.
pub fn categories(articles: &[Article]) -> Vec<String> {
    let mut keys: Vec<String> = articles
        .iter()
        .filter_map(|a| a.category_scraped.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    keys.sort();
    keys
}

/// Distinct subcategories, optionally restricted to one category key.
pub fn subcategories(articles: &[Article], category: &CategoryFilter) -> Vec<String> {
    let mut names: Vec<String> = articles
        .iter()
        .filter(|a| category.matches(a))
        .filter_map(|a| a.subcategory.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    names.sort_by(|a, b| locale_cmp(a, b));
    names
}

pub fn stats(articles: &[Article]) -> Stats {
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut uncategorized = 0;
    for article in articles {
        match &article.category_scraped {
            Some(key) => *by_category.entry(key.clone()).or_default() += 1,
            None => uncategorized += 1,
        }
    }

    let mut author_names: Vec<String> = articles
        .iter()
        .map(|a| a.author.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    author_names.sort_by(|a, b| locale_cmp(a, b));

    Stats {
        total: articles.len(),
        by_category,
        uncategorized,
        authors: author_names.len(),
        with_images: articles.iter().filter(|a| a.has_images()).count(),
        with_content: articles.iter().filter(|a| !a.content.is_empty()).count(),
        author_names,
    }
}

pub fn summarize(articles: &[Article]) -> Summary {
    Summary {
        categories: categories(articles),
        subcategories: subcategories(articles, &CategoryFilter::All),
        stats: stats(articles),
    }
}
