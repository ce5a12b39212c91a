//! Media resolution for file outputs
//!
//! A file output names either a url or a filename stored on the server. Turning
//! it into LaTeX takes two steps:
//!
//! 1. [`file_target`] and [`plan_file`] decide, without any IO, what the file
//!    is (embeddable image, link, literal path) and how an image would be
//!    obtained (copy from project storage, or download).
//! 2. [`resolve_image`] carries out that plan through a [`MediaStore`].
//!
//! Implementations of [`MediaStore`]:
//! - `StdMediaStore`: real filesystem, HTTP downloads, ImageMagick for SVG
//! - `MemoryMediaStore`: a fixed set of available sources (testing)
//! - `NoopMediaStore`: nothing is ever available (pure LaTeX generation)

use crate::data::constants::{IMAGE_EXTENSIONS, RAW_PATH_MARKER};
use crate::utils::error::{ConvertError, ConvertResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Where a file output points to, and the bare filename it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub target: String,
    pub filename: String,
}

/// What to do with a file output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPlan {
    /// Image in the user's project storage
    Local {
        source: PathBuf,
        filename: String,
        /// False when the source already is the destination
        needs_copy: bool,
    },
    /// Image that has to be downloaded
    Remote {
        url: String,
        filename: String,
        /// PNG name to convert to after download (SVG only)
        rasterize_to: Option<String>,
    },
    /// Non-image reachable over http(s)
    Link(String),
    /// Non-image with a non-http target, shown as text
    Literal(String),
}

/// Compute the target of a file output.
///
/// With a url, the filename is its last path segment. Without one, the
/// filename's last path segment is used to build a blob url on `site`.
pub fn file_target(
    url: Option<&str>,
    filename: Option<&str>,
    uuid: Option<&str>,
    site: &str,
) -> FileTarget {
    match url {
        Some(url) => FileTarget {
            target: url.to_string(),
            filename: last_segment(url).to_string(),
        },
        None => {
            let filename = last_segment(filename.unwrap_or_default()).to_string();
            FileTarget {
                target: format!(
                    "{}/blobs/{}?uuid={}",
                    site,
                    filename,
                    uuid.unwrap_or_default()
                ),
                filename,
            }
        }
    }
}

/// Decide how a file output is rendered and obtained.
pub fn plan_file(target: &FileTarget, home_dir: &Path, work_dir: &Path) -> MediaPlan {
    let (base, ext) = split_extension(&target.filename);

    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return if target.target.starts_with("http") {
            MediaPlan::Link(target.target.clone())
        } else {
            MediaPlan::Literal(target.target.clone())
        };
    }

    if let Some(pos) = target.target.find(RAW_PATH_MARKER) {
        let source = home_dir.join(&target.target[pos + RAW_PATH_MARKER.len()..]);
        let needs_copy = source != work_dir.join(&target.filename);
        return MediaPlan::Local {
            source,
            filename: target.filename.clone(),
            needs_copy,
        };
    }

    MediaPlan::Remote {
        url: target.target.clone(),
        filename: target.filename.clone(),
        rasterize_to: (ext == "svg").then(|| format!("{}.png", base)),
    }
}

/// Obtain an image according to `plan`. Returns the filename to embed, or
/// `None` when the image is unavailable. Failures are logged, never raised.
pub fn resolve_image(plan: &MediaPlan, store: &dyn MediaStore) -> Option<String> {
    match plan {
        MediaPlan::Local {
            source,
            filename,
            needs_copy,
        } => {
            if *needs_copy {
                if let Err(e) = store.copy_local(source, filename) {
                    warn!("could not copy {}: {}", source.display(), e);
                    return None;
                }
            }
            Some(filename.clone())
        }
        MediaPlan::Remote {
            url,
            filename,
            rasterize_to,
        } => {
            info!("fetching {} -> {}", url, filename);
            if let Err(e) = store.fetch(url, filename) {
                warn!("{}", e);
                return None;
            }
            match rasterize_to {
                Some(png) => match store.rasterize(filename, png) {
                    Ok(()) => Some(png.clone()),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                },
                None => Some(filename.clone()),
            }
        }
        MediaPlan::Link(_) | MediaPlan::Literal(_) => None,
    }
}

/// Everything after the last `/`.
fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a filename into base and lower-cased extension (without the dot).
/// Leading dots do not start an extension.
pub fn split_extension(filename: &str) -> (&str, String) {
    let stem_start = filename.len() - filename.trim_start_matches('.').len();
    match filename[stem_start..].rfind('.') {
        Some(pos) => {
            let dot = stem_start + pos;
            (&filename[..dot], filename[dot + 1..].to_lowercase())
        }
        None => (filename, String::new()),
    }
}

// ============================================================================
// Media stores
// ============================================================================

/// Side effects needed to make media available in the work directory
///
/// All destination names are bare filenames relative to the work directory.
pub trait MediaStore: Send + Sync {
    /// Copy a file from project storage
    fn copy_local(&self, source: &Path, filename: &str) -> ConvertResult<()>;

    /// Download a url
    fn fetch(&self, url: &str, filename: &str) -> ConvertResult<()>;

    /// Convert an SVG already in the work directory to PNG
    fn rasterize(&self, svg: &str, png: &str) -> ConvertResult<()>;
}

/// Filesystem and network backed store (for CLI usage)
pub struct StdMediaStore {
    work_dir: PathBuf,
    /// Program used for SVG conversion (ImageMagick `convert` by default)
    rasterizer: String,
}

impl StdMediaStore {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
            rasterizer: "convert".to_string(),
        }
    }

    pub fn with_rasterizer(mut self, program: impl Into<String>) -> Self {
        self.rasterizer = program.into();
        self
    }

    /// Remove a stale destination before it is rewritten
    fn clear(&self, filename: &str) -> PathBuf {
        let dest = self.work_dir.join(filename);
        if dest.exists() {
            let _ = fs::remove_file(&dest);
        }
        dest
    }
}

impl MediaStore for StdMediaStore {
    fn copy_local(&self, source: &Path, filename: &str) -> ConvertResult<()> {
        let dest = self.work_dir.join(filename);
        if let (Ok(a), Ok(b)) = (source.canonicalize(), dest.canonicalize()) {
            if a == b {
                debug!("{} already in place", dest.display());
                return Ok(());
            }
        }
        fs::copy(source, &dest)?;
        Ok(())
    }

    fn fetch(&self, url: &str, filename: &str) -> ConvertResult<()> {
        let dest = self.clear(filename);
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| ConvertError::fetch(url, e))?;
        let bytes = response.bytes().map_err(|e| ConvertError::fetch(url, e))?;
        fs::write(dest, &bytes)?;
        Ok(())
    }

    fn rasterize(&self, svg: &str, png: &str) -> ConvertResult<()> {
        self.clear(png);
        let status = Command::new(&self.rasterizer)
            .args(["-antialias", "-density", "150", svg, png])
            .current_dir(&self.work_dir)
            .status()
            .map_err(|e| ConvertError::process(&self.rasterizer, e))?;
        if !status.success() {
            return Err(ConvertError::process(&self.rasterizer, status));
        }
        Ok(())
    }
}

/// Memory-based store: sources and urls registered up front succeed,
/// everything else fails
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    local: HashSet<PathBuf>,
    remote: HashSet<String>,
    /// Whether SVG conversion succeeds
    rasterize_ok: bool,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self {
            rasterize_ok: true,
            ..Default::default()
        }
    }

    pub fn add_local(&mut self, source: impl AsRef<Path>) {
        self.local.insert(source.as_ref().to_path_buf());
    }

    pub fn add_remote(&mut self, url: &str) {
        self.remote.insert(url.to_string());
    }

    pub fn fail_rasterize(&mut self) {
        self.rasterize_ok = false;
    }
}

impl MediaStore for MemoryMediaStore {
    fn copy_local(&self, source: &Path, _filename: &str) -> ConvertResult<()> {
        if self.local.contains(source) {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", source.display()),
            )
            .into())
        }
    }

    fn fetch(&self, url: &str, _filename: &str) -> ConvertResult<()> {
        if self.remote.contains(url) {
            Ok(())
        } else {
            Err(ConvertError::fetch(url, "404 Not Found"))
        }
    }

    fn rasterize(&self, svg: &str, _png: &str) -> ConvertResult<()> {
        if self.rasterize_ok {
            Ok(())
        } else {
            Err(ConvertError::process("convert", format!("cannot read {}", svg)))
        }
    }
}

/// Store with no media access
pub struct NoopMediaStore;

impl MediaStore for NoopMediaStore {
    fn copy_local(&self, source: &Path, _filename: &str) -> ConvertResult<()> {
        Err(ConvertError::NotSupported(format!(
            "media access disabled: {}",
            source.display()
        )))
    }

    fn fetch(&self, url: &str, _filename: &str) -> ConvertResult<()> {
        Err(ConvertError::NotSupported(format!(
            "media access disabled: {}",
            url
        )))
    }

    fn rasterize(&self, svg: &str, _png: &str) -> ConvertResult<()> {
        Err(ConvertError::NotSupported(format!(
            "media access disabled: {}",
            svg
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SITE: &str = "https://cloud.sagemath.com";

    fn plan(target: &FileTarget) -> MediaPlan {
        plan_file(target, Path::new("/home/sage"), Path::new("/work"))
    }

    #[test]
    fn test_target_from_filename() {
        let t = file_target(None, Some("/tmp/plots/plot.png"), Some("abc"), SITE);
        assert_eq!(t.filename, "plot.png");
        assert_eq!(t.target, "https://cloud.sagemath.com/blobs/plot.png?uuid=abc");
    }

    #[test]
    fn test_target_from_url() {
        let t = file_target(Some("https://x.org/a/b/data.csv"), Some("ignored"), None, SITE);
        assert_eq!(t.filename, "data.csv");
        assert_eq!(t.target, "https://x.org/a/b/data.csv");
    }

    #[test]
    fn test_target_missing_fields() {
        let t = file_target(None, None, None, SITE);
        assert_eq!(t.filename, "");
        assert_eq!(t.target, "https://cloud.sagemath.com/blobs/?uuid=");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("plot.PNG"), ("plot", "png".to_string()));
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", "gz".to_string()));
        assert_eq!(split_extension(".bashrc"), (".bashrc", String::new()));
        assert_eq!(split_extension("README"), ("README", String::new()));
    }

    #[test]
    fn test_plan_remote_image() {
        let t = file_target(None, Some("plot.png"), Some("abc"), SITE);
        assert_eq!(
            plan(&t),
            MediaPlan::Remote {
                url: "https://cloud.sagemath.com/blobs/plot.png?uuid=abc".to_string(),
                filename: "plot.png".to_string(),
                rasterize_to: None,
            }
        );
    }

    #[test]
    fn test_plan_svg_is_rasterized() {
        let t = file_target(Some("https://x.org/fig.svg"), None, None, SITE);
        match plan(&t) {
            MediaPlan::Remote { rasterize_to, .. } => {
                assert_eq!(rasterize_to.as_deref(), Some("fig.png"))
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_plan_local_image() {
        let t = file_target(
            Some("https://cloud.sagemath.com/p/raw/project/fig.jpg"),
            None,
            None,
            SITE,
        );
        assert_eq!(
            plan(&t),
            MediaPlan::Local {
                source: PathBuf::from("/home/sage/project/fig.jpg"),
                filename: "fig.jpg".to_string(),
                needs_copy: true,
            }
        );
    }

    #[test]
    fn test_plan_local_already_in_place() {
        let t = file_target(Some("/raw/fig.jpg"), None, None, SITE);
        let p = plan_file(&t, Path::new("/work"), Path::new("/work"));
        assert!(matches!(p, MediaPlan::Local { needs_copy: false, .. }));
    }

    #[test]
    fn test_plan_non_images() {
        let t = file_target(Some("https://x.org/data.csv"), None, None, SITE);
        assert_eq!(plan(&t), MediaPlan::Link("https://x.org/data.csv".to_string()));

        let t = file_target(Some("notes/data.csv"), None, None, SITE);
        assert_eq!(plan(&t), MediaPlan::Literal("notes/data.csv".to_string()));
    }

    #[test]
    fn test_resolve_remote_success_and_failure() {
        let t = file_target(None, Some("plot.png"), Some("abc"), SITE);
        let p = plan(&t);

        let mut store = MemoryMediaStore::new();
        assert_eq!(resolve_image(&p, &store), None);

        store.add_remote(&t.target);
        assert_eq!(resolve_image(&p, &store), Some("plot.png".to_string()));
    }

    #[test]
    fn test_resolve_svg_uses_png() {
        let t = file_target(Some("https://x.org/fig.svg"), None, None, SITE);
        let p = plan(&t);
        let mut store = MemoryMediaStore::new();
        store.add_remote("https://x.org/fig.svg");
        assert_eq!(resolve_image(&p, &store), Some("fig.png".to_string()));

        store.fail_rasterize();
        assert_eq!(resolve_image(&p, &store), None);
    }

    #[test]
    fn test_resolve_local_copy_failure() {
        let t = file_target(Some("/raw/fig.jpg"), None, None, SITE);
        let p = plan(&t);
        assert_eq!(resolve_image(&p, &NoopMediaStore), None);

        let mut store = MemoryMediaStore::new();
        store.add_local("/home/sage/fig.jpg");
        assert_eq!(resolve_image(&p, &store), Some("fig.jpg".to_string()));
    }

    #[test]
    fn test_std_store_copy() {
        let src_dir = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("fig.png");
        fs::write(&source, b"png").unwrap();

        let store = StdMediaStore::new(work.path());
        store.copy_local(&source, "fig.png").unwrap();
        assert_eq!(fs::read(work.path().join("fig.png")).unwrap(), b"png");

        // Copying a file onto itself is a no-op
        store
            .copy_local(&work.path().join("fig.png"), "fig.png")
            .unwrap();
    }

    #[test]
    fn test_std_store_copy_missing_source() {
        let work = tempfile::tempdir().unwrap();
        let store = StdMediaStore::new(work.path());
        assert!(store
            .copy_local(Path::new("/nonexistent/fig.png"), "fig.png")
            .is_err());
    }

    #[test]
    fn test_noop_store() {
        assert!(NoopMediaStore.fetch("https://x.org/a.png", "a.png").is_err());
        assert!(NoopMediaStore.rasterize("a.svg", "a.png").is_err());
    }
}
