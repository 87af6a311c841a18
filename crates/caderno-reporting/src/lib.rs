pub mod export;
pub mod types;
pub mod volume;

pub use export::{ExportError, export_volume, render_volume};
pub use types::{
    DEFAULT_TOC_HEADING, DEFAULT_VOLUME_TITLE, ExportFormat, UnknownFormat, VolumeMeta,
};
pub use volume::{authors_line, group_by_axis, split_paragraphs};
