pub mod announce;
pub mod clean;
pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod navigation;
pub mod overlay;
pub mod page;
pub mod parse;
pub mod preprocess;
pub mod resolver;
pub mod sanitize;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod summary;
pub mod theme;
pub mod view;

pub use announce::{ANNOUNCEMENTS, Announcement};
pub use clean::clean;
pub use config::{ReaderConfig, ReaderConfigBuilder};
pub use content::{ContentRecord, MIN_CONTENT_LENGTH, Resolution, Tier};
pub use error::{HushError, Result};
pub use extract::{ArticleExtractor, ExtractConfig, ExtractedArticle, ReadabilityExtractor};
pub use fetch::{FetchConfig, FetchedPage};
pub use fetch::{fetch_file, fetch_stdin, fetch_url};
pub use navigation::{NavigationWatcher, UrlPoller};
pub use overlay::{ArticleView, ContentPane, Overlay, OverlayRenderer, SummaryButton, SummaryPanel, format_content};
pub use page::Page;
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use resolver::{CONTENT_SELECTORS, ContentResolver};
pub use sanitize::{AmmoniaSanitizer, Sanitizer};
#[doc(hidden)]
pub use scoring::ScoreConfig;
pub use session::{NOTICE_TTL, Notice, ReaderSession, SummaryOutcome};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use summary::{SummaryClient, SummaryConfig, SummaryRecord, SummaryRequest};
pub use theme::{SystemPreference, THEME_STORAGE_KEY, Theme, ThemeManager};
pub use view::{ViewNode, overlay_view, render_page};
