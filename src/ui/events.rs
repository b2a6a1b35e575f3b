//! Application event handling.
//!
//! This module processes background task completion events: the collection
//! load result and task panics.

use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded(result) => {
            if !app.is_loading() {
                tracing::warn!("Ignoring duplicate collection load result");
                return;
            }
            app.finish_load(result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            if app.is_loading() {
                // A panicked load never reports back, so it is a load failure.
                app.finish_load(Err(format!("Erreur interne ({}): {}", task, error)));
            } else {
                app.set_status(format!("Erreur interne dans la tâche {}", task));
            }
        }
    }
    app.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, test_app};
    use crate::app::LoadState;
    use crate::loader::{LoadOptions, Loaded, Source};
    use crate::query::Selection;

    fn loading_app() -> App {
        App::new(Source::default(), LoadOptions::default(), Selection::default()).unwrap()
    }

    #[tokio::test]
    async fn test_articles_loaded_installs_collection() {
        let mut app = loading_app();
        handle_app_event(
            &mut app,
            AppEvent::ArticlesLoaded(Ok(Loaded {
                articles: vec![article("Alpha", "Alice", "20240101", Some("ia"))],
                skipped: 0,
            })),
        );
        assert!(matches!(app.load, LoadState::Ready(_)));
        assert_eq!(app.visible, vec![0]);
    }

    #[tokio::test]
    async fn test_load_error_blocks_view() {
        let mut app = loading_app();
        handle_app_event(
            &mut app,
            AppEvent::ArticlesLoaded(Err("Erreur HTTP: statut 500".to_string())),
        );
        assert!(matches!(app.load, LoadState::Failed(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn test_panic_during_load_is_a_load_failure() {
        let mut app = loading_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "load",
                error: "boom".to_string(),
            },
        );
        assert!(matches!(app.load, LoadState::Failed(ref m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn test_panic_after_load_only_sets_status() {
        let mut app = test_app(vec![article("Alpha", "Alice", "20240101", None)]);
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "load",
                error: "boom".to_string(),
            },
        );
        assert!(matches!(app.load, LoadState::Ready(_)));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_second_load_result_ignored() {
        let mut app = test_app(vec![article("Alpha", "Alice", "20240101", None)]);
        handle_app_event(&mut app, AppEvent::ArticlesLoaded(Ok(Loaded::default())));
        assert_eq!(app.articles().len(), 1);
    }
}
