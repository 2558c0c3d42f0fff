//! Generate the RSS feed

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::feed::build_feed;
use crate::{Blog, CONFIG_FILE};

/// Load, validate and write the feed
pub fn run(blog: &Blog) -> Result<Option<PathBuf>> {
    let start = std::time::Instant::now();

    let posts = blog.load_posts()?;
    tracing::info!("Loaded {} posts ({} mode)", posts.len(), blog.mode);

    let written = build_feed(&blog.config, &posts, blog.mode, &blog.public_dir)?;

    let duration = start.elapsed();
    tracing::info!("Completed in {:.2}s", duration.as_secs_f64());

    Ok(written)
}

/// Watch content and config, regenerating the feed on change
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.content_dir, RecursiveMode::Recursive)?;
    }

    let config_path = blog.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let base_dir = blog.base_dir.clone();
    let mode = blog.mode;

    // The debouncer delivers on a std channel; wait on it off the runtime
    tokio::task::spawn_blocking(move || {
        for result in rx {
            match result {
                Ok(events) => {
                    let changed: Vec<_> =
                        events.iter().filter(|e| is_relevant(&e.path)).collect();
                    if changed.is_empty() {
                        continue;
                    }
                    for event in &changed {
                        tracing::debug!("File changed: {}", event.path.display());
                    }
                    tracing::info!("Content changed, regenerating feed...");
                    // Reload so config edits take effect
                    let rebuilt = Blog::new(&base_dir).map(|b| b.with_mode(mode));
                    if let Err(e) = rebuilt.and_then(|b| run(&b)) {
                        tracing::error!("Feed generation failed: {:#}", e);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }
    })
    .await?;

    drop(debouncer);
    Ok(())
}

/// Editor backups and OS metadata don't trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".DS_Store") && !path_str.ends_with('~') && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildMode, SiteConfig};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_feed() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default())
            .with_mode(BuildMode::Production);
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(
            blog.content_dir.join("hello.md"),
            "---\ntitle: Hello\ndescription: First\npubDate: 2024-01-01\nauthor: A\n---\nHi\n",
        )
        .unwrap();
        fs::write(
            blog.content_dir.join("wip.md"),
            "---\ntitle: WIP\ndescription: Soon\npubDate: 2024-02-01\nauthor: A\ndraft: true\n---\n",
        )
        .unwrap();

        let path = run(&blog).unwrap().unwrap();
        assert_eq!(path, dir.path().join("dist/rss.xml"));
        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<link>https://powergr.github.io/blog/hello/</link>"));
        assert!(!xml.contains("blog/wip/"));
    }

    #[test]
    fn test_run_fails_on_invalid_post() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(&blog.content_dir).unwrap();
        fs::write(blog.content_dir.join("bad.md"), "---\ntitle: Bad\n---\n").unwrap();

        assert!(run(&blog).is_err());
        assert!(!blog.public_dir.join("rss.xml").exists());
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/post.md")));
        assert!(!is_relevant(Path::new("content/post.md~")));
        assert!(!is_relevant(Path::new("content/.DS_Store")));
    }
}
