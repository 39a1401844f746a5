//! # Reelfolio
//!
//! A gallery presentation engine and static site generator for video editor
//! and colorist portfolios. One JSON catalog of projects, reels and color
//! groups drives a filterable project grid, snap carousels, and full-screen
//! video and still lightboxes.
//!
//! # Architecture: Catalog → Engine → Pages
//!
//! ```text
//! catalog.json ─► Catalog ─► Ordering + Filter ─► Paginator | Carousel ─► view
//!                                                         │
//!                                                  Lightbox on selection
//! ```
//!
//! The engine is a set of small, browser-free state machines. [`state::Gallery`]
//! composes them behind a single reducer: actions go in, side effects come out,
//! and [`state::Gallery::view`] derives everything a renderer needs. The
//! [`generate`] module walks that reducer through every reachable page and
//! writes each state as static HTML.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Record`, `Role`, `Format`, `ColorGroup` |
//! | [`catalog`] | JSON loading, invariant checks, track partitions, content digest |
//! | [`ordering`] | Curated title precedence with a stable sort |
//! | [`filter`] | `RoleFilter` projection over the standard track |
//! | [`paginate`] | Mobile pagination: pages, controls, scroll requests |
//! | [`carousel`] | Two-frame hard reset for snap strips, frame scheduling |
//! | [`lightbox`] | Video / image-group modal state, keyboard, rotation |
//! | [`embed`] | Canonical embed URLs for YouTube and Drive links |
//! | [`thumbnail`] | Title-derived thumbnail paths with one-shot fallback |
//! | [`state`] | `Gallery` reducer tying the engine together |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`generate`] | Static HTML rendering with Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Effects Out, Not Callbacks In
//!
//! Engine transitions never touch a DOM. [`state::Gallery::dispatch`] returns
//! [`state::Effect`]s (scroll the list, lock page scrolling) and carousels talk
//! to their strip through the [`carousel::Scroller`] and
//! [`carousel::FrameScheduler`] traits. The same code runs under a browser
//! binding, the static generator, and plain unit tests.
//!
//! ## Silent Degradation
//!
//! Nothing a visitor does can fail. Navigation past either end is a no-op, an
//! unrecognised video link is embedded as-is, a missing thumbnail falls back
//! once and then shows nothing, and callbacks after teardown are ignored.
//! Errors exist only at load time: malformed catalogs and configs are rejected
//! before any page is built.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup is
//! a build error, and all interpolation is escaped, which matters when titles
//! come straight from a hand-edited JSON file.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod embed;
pub mod filter;
pub mod generate;
pub mod lightbox;
pub mod ordering;
pub mod output;
pub mod paginate;
pub mod state;
pub mod thumbnail;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
