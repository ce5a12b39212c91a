//! Feature modules - work beyond LaTeX generation
//!
//! This module contains the parts that touch the outside world:
//! - Media resolution (copying, downloading and converting images)
//! - PDF generation with an external LaTeX engine

pub mod media;
pub mod typeset;

// Re-export commonly used types
pub use media::{
    FileTarget, MediaPlan, MediaStore, MemoryMediaStore, NoopMediaStore, StdMediaStore,
};
pub use typeset::{pdf_path, sagews_to_pdf, ConvertOptions};
