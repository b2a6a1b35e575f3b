//! Helper functions for UI operations.
//!
//! Panic containment for background tasks, the collection load task and
//! overlay geometry.

use crate::app::AppEvent;
use crate::loader::{load_articles, LoadOptions, Source};
use futures::FutureExt;
use ratatui::layout::Rect;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing, its panic becomes
/// `Err(String)` carrying the panic message.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn the one-shot collection load.
///
/// Sends `AppEvent::ArticlesLoaded` on completion, or `AppEvent::TaskPanicked`
/// if the load panics. The task is neither retried nor cancelled.
pub(super) fn spawn_load(
    source: Source,
    client: reqwest::Client,
    options: LoadOptions,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = catch_task_panic(load_articles(&source, &client, &options)).await;

        let event = match result {
            Ok(loaded) => AppEvent::ArticlesLoaded(loaded.map_err(|e| e.to_string())),
            Err(panic_msg) => {
                tracing::error!(task = "load", error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task: "load",
                    error: panic_msg,
                }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, event = "ArticlesLoaded", "Channel send failed (receiver dropped)");
        }
    })
}

/// `percent`% of `len`, computed without overflowing `u16`.
pub(super) fn percent_of(len: u16, percent: u16) -> u16 {
    let scaled = u32::from(len) * u32::from(percent) / 100;
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = percent_of(area.width, percent_x);
    let height = percent_of(area.height, percent_y);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Whether the point `(x, y)` lies inside `area`.
pub(super) fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && x < area.x.saturating_add(area.width)
        && y >= area.y
        && y < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        let result = catch_task_panic(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_catch_task_panic_str_payload() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_string_payload() {
        let code = 7;
        let result: Result<(), String> =
            catch_task_panic(async move { panic!("échec {}", code) }).await;
        assert_eq!(result, Err("échec 7".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_load_reports_articles() {
        let dir = std::env::temp_dir().join(format!("kiosque_helpers_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("articles.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"[{"url":"https://example.com/a","title":"A","author":"Alice",
                  "content":"Texte","publication_date":"20240101"}]"#,
        )
        .unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        spawn_load(
            Source::File(path),
            reqwest::Client::new(),
            LoadOptions::default(),
            tx,
        )
        .await
        .unwrap();

        match rx.recv().await {
            Some(AppEvent::ArticlesLoaded(Ok(loaded))) => {
                assert_eq!(loaded.articles.len(), 1);
                assert_eq!(loaded.articles[0].title, "A");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_spawn_load_reports_failure_as_message() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_load(
            Source::File("/nonexistent/kiosque/articles.json".into()),
            reqwest::Client::new(),
            LoadOptions::default(),
            tx,
        )
        .await
        .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ArticlesLoaded(Err(_)))
        ));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(80, 80, area), Rect::new(10, 5, 80, 40));
    }

    #[test]
    fn test_centered_rect_on_very_wide_terminal() {
        let area = Rect::new(0, 0, 2000, 600);
        assert_eq!(centered_rect(80, 80, area), Rect::new(200, 60, 1600, 480));
        assert_eq!(percent_of(u16::MAX, 100), u16::MAX);
        assert_eq!(percent_of(u16::MAX, 60), 39321);
    }

    #[test]
    fn test_contains() {
        let area = Rect::new(10, 5, 20, 4);
        assert!(contains(area, 10, 5));
        assert!(contains(area, 29, 8));
        assert!(!contains(area, 30, 8));
        assert!(!contains(area, 10, 9));
        assert!(!contains(area, 9, 5));
    }
}
