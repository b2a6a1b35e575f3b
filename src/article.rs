//! Article records as they appear in the scraped JSON collection.
//!
//! The collection is produced by an external scraper and consumed read-only.
//! Required keys (`url`, `title`, `author`, `content`, `publication_date`)
//! are plain `String`s; everything the scraper may omit is an `Option`.
//! Unknown keys (`scraped_at`, ...) are ignored.
use serde::Deserialize;

// ============================================================================
// Images
// ============================================================================

/// One entry of an article's `images` array.
///
/// The scraper writes either a bare URL string or an object carrying an
/// optional caption, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArticleImage {
    Url(String),
    Captioned {
        url: String,
        #[serde(default)]
        caption: Option<String>,
    },
}

impl ArticleImage {
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Captioned { url, .. } => url,
        }
    }

    /// Caption text, if present and non-blank.
    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Captioned { caption, .. } => {
                caption.as_deref().filter(|c| !c.trim().is_empty())
            }
        }
    }
}

// ============================================================================
// Article
// ============================================================================

/// A single scraped blog post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// `YYYYMMDD`. Kept as the raw string: sorting compares it lexicographically
    /// and malformed values only degrade at display time.
    pub publication_date: String,
    /// Human-readable category, shown in the detail view only.
    #[serde(default)]
    pub category: Option<String>,
    /// Normalized category key used for filtering and grouping.
    #[serde(default)]
    pub category_scraped: Option<String>,
    /// Finer-grained section under the category, free text.
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ArticleImage>>,
}

impl Article {
    /// Number of images attached to the article (0 when the key is absent).
    pub fn image_count(&self) -> usize {
        self.images.as_ref().map_or(0, Vec::len)
    }

    pub fn has_images(&self) -> bool {
        self.image_count() > 0
    }

    /// Text used for list excerpts: the summary when it is non-empty,
    /// otherwise the full content.
    pub fn excerpt_source(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => &self.content,
        }
    }

    /// Content split on newlines, trimmed, with blank paragraphs dropped.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Summary, if present and non-blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Thumbnail URL, if present and non-blank.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_deref().filter(|t| !t.trim().is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "url": "https://www.blogdumoderateur.com/a",
            "title": "Titre",
            "author": "Alice",
            "content": "Premier paragraphe.\n\n  Second paragraphe.  \n",
            "publication_date": "20240105"
        })
    }

    #[test]
    fn test_minimal_article_deserializes() {
        let article: Article = serde_json::from_value(minimal()).unwrap();
        assert_eq!(article.title, "Titre");
        assert!(article.summary.is_none());
        assert!(article.category_scraped.is_none());
        assert!(article.images.is_none());
        assert_eq!(article.image_count(), 0);
    }

    #[test]
    fn test_null_optionals_are_none() {
        let mut value = minimal();
        value["category_scraped"] = json!(null);
        value["thumbnail"] = json!(null);
        let article: Article = serde_json::from_value(value).unwrap();
        assert!(article.category_scraped.is_none());
        assert!(article.thumbnail_url().is_none());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("title");
        let result: Result<Article, _> = serde_json::from_value(value);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("title"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut value = minimal();
        value["scraped_at"] = json!("2024-01-05T10:00:00");
        assert!(serde_json::from_value::<Article>(value).is_ok());
    }

    #[test]
    fn test_subcategory_parsed_when_present() {
        let mut value = minimal();
        value["subcategory"] = json!("Outils IA");
        let article: Article = serde_json::from_value(value).unwrap();
        assert_eq!(article.subcategory.as_deref(), Some("Outils IA"));

        let article: Article = serde_json::from_value(minimal()).unwrap();
        assert!(article.subcategory.is_none());
    }

    #[test]
    fn test_mixed_image_shapes() {
        let mut value = minimal();
        value["images"] = json!([
            "https://img.example.com/1.jpg",
            {"url": "https://img.example.com/2.jpg", "caption": "Une légende"},
            {"url": "https://img.example.com/3.jpg"}
        ]);
        let article: Article = serde_json::from_value(value).unwrap();
        let images = article.images.as_ref().unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].url(), "https://img.example.com/1.jpg");
        assert_eq!(images[0].caption(), None);
        assert_eq!(images[1].caption(), Some("Une légende"));
        assert_eq!(images[2].caption(), None);
        assert!(article.has_images());
    }

    #[test]
    fn test_empty_images_is_not_has_images() {
        let mut value = minimal();
        value["images"] = json!([]);
        let article: Article = serde_json::from_value(value).unwrap();
        assert!(!article.has_images());
    }

    #[test]
    fn test_excerpt_falls_back_to_content() {
        let mut article: Article = serde_json::from_value(minimal()).unwrap();
        assert!(article.excerpt_source().starts_with("Premier"));

        article.summary = Some(String::new());
        assert!(article.excerpt_source().starts_with("Premier"));

        article.summary = Some("Résumé court".to_string());
        assert_eq!(article.excerpt_source(), "Résumé court");
    }

    #[test]
    fn test_paragraphs_trimmed_and_non_empty() {
        let article: Article = serde_json::from_value(minimal()).unwrap();
        let paragraphs: Vec<&str> = article.paragraphs().collect();
        assert_eq!(paragraphs, vec!["Premier paragraphe.", "Second paragraphe."]);
    }
}
