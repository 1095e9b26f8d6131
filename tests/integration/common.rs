use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;
use tululu_fetch::config::{CatalogConfig, Config, FetchLimits, OutputConfig};

/// Short limits so retry tests finish quickly
pub fn fast_limits(max_attempts: u32) -> FetchLimits {
    FetchLimits::new(
        Duration::from_millis(20),
        Duration::from_millis(80),
        max_attempts,
    )
}

/// Creates a test configuration pointing at a mock server and a temp dir
pub fn create_test_config(base_url: &str, out_dir: &Path, max_attempts: u32) -> Config {
    Config {
        catalog: CatalogConfig {
            base_url: base_url.to_string(),
        },
        limits: fast_limits(max_attempts),
        output: OutputConfig {
            books_dir: out_dir.join("books"),
            images_dir: out_dir.join("images"),
        },
    }
}

/// Minimal detail page in the catalog's markup
pub fn detail_page(title: &str, author: &str, image_src: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <h1>{title} &nbsp; :: &nbsp; <a href="/a1/">{author}</a></h1>
        <div class="bookimage"><a href="/b1/"><img src="{image_src}" alt="cover"></a></div>
        <span class="d_book"><b>Genre:</b> <a href="/l55/">Science Fiction</a>, <a href="/l2/">Adventure</a></span>
        <div class="texts"><b>Reader</b><span class="black">A classic.</span></div>
        </body></html>"#
    )
}

/// Names of the files directly inside `dir`, sorted; empty if `dir` is missing
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// In-memory log sink shared with a test subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Captured output split into lines
    pub fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().expect("Log buffer poisoned");
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Captured lines that contain `needle`
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("Log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes INFO and above to an in-memory buffer until the guard drops
///
/// `#[tokio::test]` runs on the current thread, so the thread-local default
/// subscriber sees everything the test awaits.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
