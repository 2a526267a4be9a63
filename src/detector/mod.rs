//! Structure detection and content extraction.
//!
//! # Module Structure
//!
//! - `candidates`: containers whose children repeat one allowed tag
//! - `alignment`: geometric check turning candidates into structures
//! - `state`: consumed-text tracking for one member walk
//! - `content`: per-member extraction of links, images and text
//! - `filters`: object and structure filters
//! - `pipeline`: orchestration of the stages above
//!
//! # Usage
//!
//! ```rust
//! use rs_struktur::detector::{align_candidates, extract_content, find_candidates};
//! use rs_struktur::{html, Options};
//!
//! let page = html::parse_annotated_html(r#"<body>
//!     <div data-struktur-rect="0,0,300,120"><a href="/a">A</a></div>
//!     <div data-struktur-rect="0,120,300,120"><a href="/b">B</a></div>
//! </body>"#)?;
//! let options = Options { n: 2, ..Options::default() };
//!
//! let candidates = find_candidates(&page.tree, page.root, &options);
//! let structures = align_candidates(&page.tree, &candidates, &options);
//! let first = extract_content(&page.tree, structures[0].members[0], &options);
//! assert_eq!(first.len(), 1);
//! # Ok::<(), rs_struktur::Error>(())
//! ```

pub mod alignment;
pub mod candidates;
pub mod content;
pub mod filters;
pub mod pipeline;
pub mod state;

pub use alignment::{align_candidates, is_aligned, Alignment, Structure};
pub use candidates::{find_candidates, CandidateGroup};
pub use content::{extract_content, Extracted};
pub use filters::{filter_object, keep_structure};
pub use pipeline::{discover_structures, run};
pub use state::WalkState;
