//! HTML site generation.
//!
//! Drives a [`Gallery`] through the same actions a visitor would trigger and
//! writes one static page per resulting state.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, desktop grid for `all`, reel strip,
//!   color-group strip, about section
//! - **Filter pages** (`/{filter}/index.html`): continuous grid for one filter
//! - **Paged lists** (`/{filter}/page/{n}.html`): the mobile paginated grid
//! - **Video lightbox** (`/watch/{id}.html`): canonical embed player
//! - **Image lightbox** (`/color/{group}/{n}.html`): one still, wrapping prev/next
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── all/
//! │   ├── index.html
//! │   └── page/1.html ...
//! ├── color-grading/ ...
//! ├── watch/
//! │   └── 3.html ...
//! ├── color/
//! │   └── neon-nights/1.html ...
//! └── thumbnails/            # copied from content/thumbnails
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: layout, snap strips, lightbox overlay
//! - `static/gallery.js`: carousel hard reset and lightbox keyboard handling
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::catalog::{Catalog, CatalogError};
use crate::config::{self, ConfigError, SiteConfig};
use crate::filter::RoleFilter;
use crate::lightbox::ViewportSize;
use crate::paginate::{PageControls, PageItem};
use crate::state::{Action, Gallery, GalleryView, ModalView, ViewportClass};
use crate::thumbnail::{AssetIndex, Thumbnail};
use crate::types::Record;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub output: PathBuf,
    /// Written pages, relative to `output`, in write order.
    pub pages: Vec<String>,
    /// Files copied from the thumbnail directory.
    pub thumbnails: usize,
    pub digest: String,
}

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

/// One-shot image fallback: clear the handler first so a failing fallback
/// cannot loop.
const THUMB_ONERROR: &str = "this.onerror=null;this.src=this.dataset.fallback";

/// Everything every page needs besides its own view.
struct PageContext<'a> {
    config: &'a SiteConfig,
    digest: &'a str,
    about_html: Option<&'a str>,
    assets: &'a AssetIndex,
}

#[instrument(skip_all, err, fields(source = %source.display(), output = %output_dir.display()))]
pub fn generate(source: &Path, output_dir: &Path) -> Result<GenerateSummary, GenerateError> {
    let config = config::load_config(source)?;
    let catalog = Catalog::load(source)?;
    let digest = catalog.digest();

    let about_html = read_about(source)?;
    let thumbs_src = source.join("thumbnails");
    let assets = AssetIndex::scan(&thumbs_src, &config.thumbnails.dir);
    debug!(assets = assets.len(), "thumbnail assets indexed");

    fs::create_dir_all(output_dir)?;
    let thumbnails = match local_dir(&config.thumbnails.dir) {
        Some(rel) if thumbs_src.is_dir() => {
            let dst = output_dir.join(rel);
            fs::create_dir_all(&dst)?;
            copy_dir_recursive(&thumbs_src, &dst)?
        }
        _ => 0,
    };

    let ctx = PageContext {
        config: &config,
        digest: &digest,
        about_html: about_html.as_deref(),
        assets: &assets,
    };
    let mut gallery = Gallery::new(catalog, &config);
    let mut pages = Vec::new();

    let breakpoint = config.gallery.mobile_breakpoint as f64;
    let desktop = Action::ViewportResized(ViewportSize {
        width: breakpoint,
        height: 900.0,
    });
    let mobile = Action::ViewportResized(ViewportSize {
        width: breakpoint - 1.0,
        height: 844.0,
    });

    // Home and per-filter desktop grids
    gallery.dispatch(desktop);
    gallery.dispatch(Action::SetFilter(RoleFilter::All));
    write_page(output_dir, "index.html", render_home(&ctx, &gallery.view()), &mut pages)?;

    for filter in RoleFilter::options() {
        gallery.dispatch(desktop);
        gallery.dispatch(Action::SetFilter(filter));
        let rel = format!("{}/index.html", filter.slug());
        write_page(output_dir, &rel, render_filter_page(&ctx, &gallery.view()), &mut pages)?;

        gallery.dispatch(mobile);
        let total = gallery.state().paginator.total_pages().max(1);
        for page in 1..=total {
            gallery.dispatch(Action::GoToPage(page));
            let rel = format!("{}/page/{}.html", filter.slug(), page);
            write_page(output_dir, &rel, render_filter_page(&ctx, &gallery.view()), &mut pages)?;
        }
    }

    // Video lightboxes
    gallery.dispatch(desktop);
    gallery.dispatch(Action::SetFilter(RoleFilter::All));
    let ids: Vec<u32> = gallery.catalog().records().iter().map(|r| r.id).collect();
    for id in ids {
        gallery.dispatch(Action::OpenVideo(id));
        let rel = format!("watch/{id}.html");
        write_page(output_dir, &rel, render_lightbox_page(&ctx, &gallery.view()), &mut pages)?;
        gallery.dispatch(Action::Close);
    }

    // Image-group lightboxes
    let groups: Vec<(String, usize)> = gallery
        .catalog()
        .color_groups()
        .iter()
        .enumerate()
        .map(|(idx, group)| (group.slug_at(idx), group.images.len()))
        .collect();
    for (idx, (slug, len)) in groups.into_iter().enumerate() {
        gallery.dispatch(Action::OpenGroup(idx));
        for n in 1..=len {
            let rel = format!("color/{slug}/{n}.html");
            write_page(output_dir, &rel, render_lightbox_page(&ctx, &gallery.view()), &mut pages)?;
            gallery.dispatch(Action::NextImage);
        }
        gallery.dispatch(Action::Close);
    }

    info!(pages = pages.len(), thumbnails, "site generated");
    Ok(GenerateSummary {
        output: output_dir.to_path_buf(),
        pages,
        thumbnails,
        digest,
    })
}

fn read_about(source: &Path) -> std::io::Result<Option<String>> {
    let path = source.join("about.md");
    if !path.exists() {
        return Ok(None);
    }
    let markdown = fs::read_to_string(path)?;
    Ok(Some(markdown_to_html(&markdown)))
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

/// Output-relative directory for a site-local web path like `/thumbnails`.
/// Remote locations are not copied.
fn local_dir(web_dir: &str) -> Option<&str> {
    let rel = web_dir.strip_prefix('/')?.trim_end_matches('/');
    (!rel.is_empty() && !rel.starts_with('/')).then_some(rel)
}

fn write_page(
    output_dir: &Path,
    rel: &str,
    markup: Markup,
    pages: &mut Vec<String>,
) -> std::io::Result<()> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    pages.push(rel.to_string());
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Page-level data `gallery.js` reads from `<body>`.
#[derive(Debug, Default)]
struct BodyData<'a> {
    class: Option<&'a str>,
    mobile_breakpoint: u32,
    /// `grid` or `paged`, set on filter pages only.
    view: Option<&'static str>,
    /// The same filter rendered for the other viewport class.
    alternate: Option<String>,
}

impl BodyData<'_> {
    fn new(ctx: &PageContext) -> Self {
        Self {
            mobile_breakpoint: ctx.config.gallery.mobile_breakpoint,
            ..Self::default()
        }
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, digest: &str, body: &BodyData, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="catalog-version" content=(digest);
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body class=[body.class]
                data-mobile-breakpoint=(body.mobile_breakpoint)
                data-view=[body.view]
                data-alternate=[body.alternate.as_deref()] {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the fixed header with the slide-in menu
fn site_header(ctx: &PageContext, menu_open: bool) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (ctx.config.site.title) }
            input.nav-toggle type="checkbox" id="nav-toggle" checked[menu_open];
            label.nav-hamburger for="nav-toggle" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            nav.nav-panel {
                label.nav-close for="nav-toggle" { "×" }
                ul {
                    li { a href="/#projects" { "Projects" } }
                    li { a href="/#reels" { "Reels" } }
                    li { a href="/#color" { "Color" } }
                    @if ctx.about_html.is_some() {
                        li { a href="/#about" { "About" } }
                    }
                }
            }
        }
    }
}

fn grid_href(filter: RoleFilter) -> String {
    format!("/{}/", filter.slug())
}

fn paged_href(filter: RoleFilter, page: usize) -> String {
    format!("/{}/page/{}.html", filter.slug(), page)
}

/// Renders the role filter buttons, marking the active one. Each button
/// carries its paginated target; the script swaps it in below the breakpoint.
fn render_filter_bar(active: RoleFilter) -> Markup {
    html! {
        nav.filter-bar {
            @for filter in RoleFilter::options() {
                @let is_active = filter == active;
                a.filter-button.active[is_active]
                    href=(grid_href(filter))
                    data-paged-href=(paged_href(filter, 1))
                    aria-current=[is_active.then_some("page")] {
                    (filter.label())
                }
            }
        }
    }
}

/// Renders a thumbnail with its one-shot fallback
fn render_thumbnail(ctx: &PageContext, record: &Record) -> Markup {
    let mut thumb = Thumbnail::for_record(record, &ctx.config.thumbnails);
    thumb.settle(ctx.assets);
    let fallback = thumb.pending_fallback();
    html! {
        @if let Some(src) = thumb.src() {
            img src=(src)
                alt=(record.title)
                loading="lazy"
                data-fallback=[fallback]
                onerror=[fallback.map(|_| THUMB_ONERROR)];
        }
    }
}

/// Renders a project card linking to its video lightbox
fn render_card(ctx: &PageContext, record: &Record) -> Markup {
    html! {
        a.project-card href={ "/watch/" (record.id) ".html" } data-id=(record.id) {
            (render_thumbnail(ctx, record))
            span.card-title { (record.title) }
            span.card-subtitle { (record.secondary_title) }
            span.card-roles {
                @for role in &record.roles {
                    span.role { (role.label()) }
                }
            }
        }
    }
}

fn render_grid(ctx: &PageContext, view: &GalleryView) -> Markup {
    html! {
        @if view.visible.is_empty() {
            p.empty { "No projects for this filter yet." }
        } @else {
            div.project-grid {
                @for record in &view.visible {
                    (render_card(ctx, record))
                }
            }
        }
    }
}

/// Renders the pagination bar: first/prev, numbers with ellipses, next/last
fn render_pagination(filter: RoleFilter, controls: &PageControls) -> Markup {
    let href = |page: usize| paged_href(filter, page);
    let nav_link = |label: &str, page: usize, enabled: bool| -> Markup {
        html! {
            @if enabled {
                a.page-nav href=(href(page)) { (label) }
            } @else {
                span.page-nav.disabled aria-disabled="true" { (label) }
            }
        }
    };
    let prev = controls.current.saturating_sub(1).max(1);
    let next = (controls.current + 1).min(controls.total_pages);
    html! {
        nav.pagination aria-label="Pages" {
            (nav_link("«", 1, controls.prev_enabled))
            (nav_link("‹", prev, controls.prev_enabled))
            @for item in &controls.items {
                @match item {
                    PageItem::Page { number, current: true } => {
                        span.page-number.current aria-current="page" { (number) }
                    }
                    PageItem::Page { number, current: false } => {
                        a.page-number href=(href(*number)) { (number) }
                    }
                    PageItem::Ellipsis => {
                        span.ellipsis { "…" }
                    }
                }
            }
            (nav_link("›", next, controls.next_enabled))
            (nav_link("»", controls.total_pages, controls.next_enabled))
        }
    }
}

/// Renders a snap strip with prev/next scroll buttons
fn render_carousel(id: &str, title: &str, epoch: u64, threshold: f64, cards: Markup) -> Markup {
    html! {
        section.carousel-section id=(id) {
            h2 { (title) }
            div.carousel {
                button.carousel-prev type="button" data-scroll="prev" aria-label="Previous" { "‹" }
                div.carousel-track
                    data-carousel=(id)
                    data-reset-epoch=(epoch)
                    data-visibility-threshold=(threshold) {
                    (cards)
                }
                button.carousel-next type="button" data-scroll="next" aria-label="Next" { "›" }
            }
        }
    }
}

fn render_reels(ctx: &PageContext, view: &GalleryView) -> Markup {
    let cards = html! {
        @for record in &view.reels {
            a.reel-card href={ "/watch/" (record.id) ".html" } {
                (render_thumbnail(ctx, record))
                span.card-title { (record.title) }
            }
        }
    };
    let threshold = ctx.config.carousel.visibility_threshold;
    render_carousel("reels", "Reels", view.reels_epoch, threshold, cards)
}

fn render_color_groups(ctx: &PageContext, view: &GalleryView) -> Markup {
    let cards = html! {
        @for (idx, group) in view.color_groups.iter().enumerate() {
            a.group-card href={ "/color/" (group.slug_at(idx)) "/1.html" } {
                img src=(group.cover) alt=(group.title) loading="lazy";
                span.card-title { (group.title) }
            }
        }
    };
    let threshold = ctx.config.carousel.visibility_threshold;
    render_carousel("color", "Color", view.groups_epoch, threshold, cards)
}

/// Renders the open modal over a dimmed backdrop
fn render_modal(view: &GalleryView) -> Markup {
    match &view.modal {
        ModalView::Closed => html! {},
        ModalView::Video { record, embed_url } => html! {
            div.lightbox-backdrop data-close="/" {
                div.lightbox.video-lightbox role="dialog" aria-label=(record.title) {
                    a.lightbox-close href="/" data-close="/" aria-label="Close" { "×" }
                    div.video-frame {
                        iframe src=(embed_url)
                            title=(record.title)
                            allow="autoplay; fullscreen; picture-in-picture"
                            allowfullscreen {}
                    }
                    h2 { (record.title) }
                    p { (record.secondary_title) }
                }
            }
        },
        ModalView::ImageGroup {
            group,
            index,
            image,
            rotated,
            frame,
        } => {
            let len = group.images.len();
            let slug = view
                .color_groups
                .iter()
                .position(|g| std::ptr::eq(g, *group))
                .map(|idx| group.slug_at(idx))
                .unwrap_or_else(|| group.slug());
            let prev = (index + len - 1) % len + 1;
            let next = (index + 1) % len + 1;
            html! {
                div.lightbox-backdrop data-close="/#color" {
                    div.lightbox.image-lightbox.rotated[*rotated]
                        role="dialog"
                        aria-label=(group.title)
                        style=[frame.map(|f| f.css_vars())] {
                        a.lightbox-close href="/#color" data-close="/#color" aria-label="Close" { "×" }
                        input.rotate-toggle type="checkbox" id="rotate-toggle" checked[*rotated];
                        label.rotate-button for="rotate-toggle" { "Rotate" }
                        img.lightbox-image src=(image) alt=(group.title);
                        a.lightbox-prev href={ "/color/" (slug) "/" (prev) ".html" } data-key="ArrowLeft" { "‹" }
                        a.lightbox-next href={ "/color/" (slug) "/" (next) ".html" } data-key="ArrowRight" { "›" }
                        p.lightbox-counter { (index + 1) " / " (len) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page: hero, grid, strips, about
fn render_home(ctx: &PageContext, view: &GalleryView) -> Markup {
    let site = &ctx.config.site;
    let content = html! {
        (site_header(ctx, view.menu_open))
        main.home-page {
            section.hero {
                h1 { (site.headline) }
                p.tagline { (site.tagline) }
            }
            section #projects {
                (render_filter_bar(view.filter))
                (render_grid(ctx, view))
            }
            (render_reels(ctx, view))
            (render_color_groups(ctx, view))
            @if let Some(about) = ctx.about_html {
                section #about.about-content {
                    (PreEscaped(about))
                }
            }
        }
    };
    base_document(&site.title, ctx.digest, &BodyData::new(ctx), content)
}

/// Renders a filter page, with pagination when the view carries controls.
/// The body names the page's viewport class and its counterpart so the
/// script can hop to the right one.
fn render_filter_page(ctx: &PageContext, view: &GalleryView) -> Markup {
    let title = format!("{} · {}", view.filter.label(), ctx.config.site.title);
    let content = html! {
        (site_header(ctx, view.menu_open))
        main.filter-page {
            section #projects {
                (render_filter_bar(view.filter))
                (render_grid(ctx, view))
                @if let Some(controls) = &view.controls {
                    (render_pagination(view.filter, controls))
                }
            }
        }
    };
    let body = match view.viewport {
        ViewportClass::Mobile => BodyData {
            view: Some("paged"),
            alternate: Some(grid_href(view.filter)),
            ..BodyData::new(ctx)
        },
        ViewportClass::Desktop => BodyData {
            view: Some("grid"),
            alternate: Some(paged_href(view.filter, 1)),
            ..BodyData::new(ctx)
        },
    };
    base_document(&title, ctx.digest, &body, content)
}

/// Renders a lightbox page; background scrolling is locked while it is open
fn render_lightbox_page(ctx: &PageContext, view: &GalleryView) -> Markup {
    let title = match &view.modal {
        ModalView::Video { record, .. } => record.title.as_str(),
        ModalView::ImageGroup { group, .. } => group.title.as_str(),
        ModalView::Closed => ctx.config.site.title.as_str(),
    };
    let content = html! {
        (site_header(ctx, view.menu_open))
        (render_modal(view))
    };
    let body = BodyData {
        class: view.scroll_locked.then_some("modal-open"),
        ..BodyData::new(ctx)
    };
    base_document(title, ctx.digest, &body, content)
}

// ============================================================================
// Tests
// ============================================================================
