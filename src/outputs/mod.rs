//! Rendering of view state for the terminal and the browser.
//!
//! # Submodules
//!
//! - [`markdown`]: Turns [`ListView`](crate::views::ListView) and
//!   [`DetailView`](crate::views::DetailView) into Markdown, applying every
//!   fallback for missing article fields
//! - [`html`]: Wraps that Markdown into a standalone HTML page for the web server

pub mod html;
pub mod markdown;
