//! Rendering options and context

use crate::data::constants::{DEFAULT_SITE, SITE_ENV_VAR, WRAP_WIDTH};
use crate::features::media::{MediaStore, NoopMediaStore};
use std::path::{Path, PathBuf};

/// Options for worksheet to LaTeX rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Column at which stdout/stderr output is wrapped (default: 90)
    pub wrap_width: usize,
    /// Server used to build download urls for file outputs without one
    pub site: String,
    /// Root for files referenced through project storage (`/raw/` urls)
    pub home_dir: PathBuf,
    /// Directory the LaTeX is compiled in; media are placed here
    pub work_dir: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wrap_width: WRAP_WIDTH,
            site: DEFAULT_SITE.to_string(),
            home_dir: dirs::home_dir().unwrap_or_default(),
            work_dir: PathBuf::from("."),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the site overridden by `SAGEWS_SITE` when set.
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var(SITE_ENV_VAR) {
            Ok(site) if !site.trim().is_empty() => options.with_site(site),
            _ => options,
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_home_dir(mut self, home_dir: impl AsRef<Path>) -> Self {
        self.home_dir = home_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl AsRef<Path>) -> Self {
        self.work_dir = work_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }
}

/// Everything a cell needs while rendering: options plus the media store
/// that performs copies, downloads and conversions.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub options: &'a RenderOptions,
    pub media: &'a dyn MediaStore,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a RenderOptions, media: &'a dyn MediaStore) -> Self {
        Self { options, media }
    }

    /// Context that never touches the filesystem or network. Images render
    /// as "problem loading" placeholders.
    pub fn offline(options: &'a RenderOptions) -> Self {
        Self {
            options,
            media: &NoopMediaStore,
        }
    }
}
