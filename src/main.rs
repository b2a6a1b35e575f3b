use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use kiosque::app::{App, AppEvent};
use kiosque::config::Config;
use kiosque::format::{category_label, format_date, parse_date_code};
use kiosque::loader::{load_articles, LoadOptions, Loaded, Source, DEFAULT_SOURCE};
use kiosque::query::{self, CategoryFilter, Selection, SortKey};
use kiosque::theme::ThemeVariant;
use kiosque::ui;

#[derive(Parser, Debug)]
#[command(
    name = "kiosque",
    version,
    about = "Terminal browser for Blog du Modérateur article collections"
)]
struct Args {
    /// Collection to browse: a JSON file path or an http(s) URL
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Config file (default: ~/.config/kiosque/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme: dark or light
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Fail the load on the first malformed article
    #[arg(long)]
    strict: bool,

    /// Initial search term
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Initial category key (as found in category_scraped), or "all"
    #[arg(long, value_name = "KEY")]
    category: Option<String>,

    /// Only articles whose author contains TEXT (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    author: Option<String>,

    /// Only articles whose subcategory contains TEXT (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    subcategory: Option<String>,

    /// Initial sort: date, title or author
    #[arg(long, value_name = "KEY", value_parser = parse_sort_key)]
    sort: Option<SortKey>,

    /// Only articles published on or after this date
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date_arg)]
    from: Option<String>,

    /// Only articles published on or before this date
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date_arg)]
    to: Option<String>,

    /// Print the matching articles and exit
    #[arg(long, conflicts_with = "stats")]
    print: bool,

    /// Print collection statistics and exit
    #[arg(long)]
    stats: bool,

    /// Write logs to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    SortKey::from_name(s).ok_or_else(|| format!("unknown sort key '{}' (date, title, author)", s))
}

fn parse_date_arg(s: &str) -> Result<String, String> {
    parse_date_code(s)
        .map(|_| s.to_string())
        .ok_or_else(|| format!("invalid date '{}', expected YYYYMMDD", s))
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path.cloned().or_else(Config::default_path) else {
        tracing::debug!("HOME not set, using default configuration");
        return Ok(Config::default());
    };
    Config::load(&path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// One-line summary of the active selection, e.g.
/// `category=web sort=title author=thomas`.
fn describe_selection(selection: &Selection) -> String {
    let mut parts = vec![
        format!("category={}", selection.category.name()),
        format!(
            "sort={}",
            selection.sort_by.map_or("none", SortKey::name)
        ),
    ];
    let optional = [
        ("search", Some(selection.search_term.as_str()).filter(|t| !t.is_empty())),
        ("author", selection.author.as_deref()),
        ("subcategory", selection.subcategory.as_deref()),
        ("from", selection.date_from.as_deref()),
        ("to", selection.date_to.as_deref()),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            parts.push(format!("{}={}", name, value));
        }
    }
    parts.join(" ")
}

fn print_articles(loaded: &Loaded, selection: &Selection) {
    let visible = query::select(&loaded.articles, selection);
    eprintln!(
        "{} ({} / {})",
        describe_selection(selection),
        visible.len(),
        loaded.articles.len()
    );
    for idx in visible {
        let article = &loaded.articles[idx];
        println!(
            "{:<20} {:<28} {:<24} {}",
            format_date(&article.publication_date),
            category_label(article.category_scraped.as_deref()),
            article.author,
            article.title
        );
    }
}

fn print_stats(loaded: &Loaded) {
    let summary = query::summarize(&loaded.articles);
    let stats = &summary.stats;

    println!("Articles      {}", stats.total);
    println!("Catégories    {}", summary.categories.len());
    println!("Auteurs       {}", stats.authors);
    println!("Avec images   {}", stats.with_images);
    println!("Avec contenu  {}", stats.with_content);
    println!();
    println!("Par catégorie :");
    for (key, count) in &stats.by_category {
        println!("  {:<30} {}", category_label(Some(key.as_str())), count);
    }
    if stats.uncategorized > 0 {
        println!("  {:<30} {}", "Sans catégorie", stats.uncategorized);
    }
    if !summary.subcategories.is_empty() {
        println!();
        println!("Sous-catégories :");
        for name in &summary.subcategories {
            println!("  {}", name);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = load_config(args.config.as_ref())?;

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let Some(theme) = ThemeVariant::from_str_name(theme_name) else {
        bail!("Unknown theme '{}' (expected dark or light)", theme_name);
    };

    let raw_source = args
        .source
        .as_deref()
        .or(config.source.as_deref())
        .unwrap_or(DEFAULT_SOURCE);
    let source = Source::parse(raw_source).context("Invalid collection source")?;

    let load_options = LoadOptions {
        strict: args.strict || config.strict,
        timeout: config.request_timeout(),
        ..LoadOptions::default()
    };

    let mut selection = Selection {
        search_term: args.search.clone().unwrap_or_default(),
        author: args.author.clone(),
        subcategory: args.subcategory.clone(),
        date_from: args.from.clone(),
        date_to: args.to.clone(),
        ..Selection::default()
    };
    if let Some(category) = &args.category {
        selection.category = CategoryFilter::from_name(category);
    }
    if let Some(sort) = args.sort {
        selection.sort_by = Some(sort);
    }

    let mut app = App::new(source, load_options, selection)
        .context("Failed to create application")?;

    if args.print || args.stats {
        let loaded = load_articles(&app.source, &app.http_client, &app.load_options)
            .await
            .with_context(|| format!("Failed to load articles from {}", app.source))?;
        if loaded.skipped > 0 {
            eprintln!("Warning: {} malformed articles skipped", loaded.skipped);
        }
        if args.print {
            print_articles(&loaded, &app.selection);
        } else {
            print_stats(&loaded);
        }
        return Ok(());
    }

    app.set_theme(theme);
    app.mouse_enabled = config.mouse;
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!(warning = %warning, "Ignoring keybinding override");
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
