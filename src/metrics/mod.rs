//! Page metrics input: typed crawler output and loaders

mod loader;
mod page;

pub use loader::{load_file, load_pages, load_reader, parse_pages, LoadedPage};
pub use page::{
    is_missing_alt_warning, HeadingCounts, HeadingValue, ImageRef, Keyword, PageFacts, PageMetrics,
};
