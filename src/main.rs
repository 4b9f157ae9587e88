use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crud_console::app::App;
use crud_console::config::{config_path, resolve_config};
use crud_console::logging::init_logging;

fn main() {
    let (config, source) = resolve_config(config_path());
    init_logging(&config.logging.level);
    source.log();

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::error!(error = %err, "failed to prepare WebView data directory");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("CRUD Console"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(config)
        .launch(App);
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "crud-console", "crud-console")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    ensure_webview_data_dir(project_dirs.data_local_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_test_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("dioxus-{prefix}-{nanos}"))
    }

    #[test]
    fn ensure_webview_data_dir_creates_webview2_subdir() {
        let temp_dir = unique_test_dir("webview-data-dir");
        fs::create_dir_all(&temp_dir).expect("should create temp dir");

        let webview_dir = ensure_webview_data_dir(&temp_dir).expect("should create webview dir");

        assert_eq!(webview_dir, temp_dir.join("webview2"));
        assert!(webview_dir.is_dir());

        fs::remove_dir_all(&temp_dir).expect("should clean temp dir");
    }
}
