//! Application state and its transitions.
//!
//! [`Gallery`] ties the engine together. It owns the immutable [`Catalog`],
//! the precedence-sorted tracks, and an [`AppState`] that only changes through
//! [`Gallery::dispatch`]. Every dispatch returns the side effects the host
//! must perform ([`Effect`]); every read goes through [`Gallery::view`], which
//! recomputes the derived view from scratch:
//!
//! ```text
//! Action ──► dispatch ──► AppState ──► view() ──► GalleryView ──► render
//!                │
//!                └──► Vec<Effect>  (scroll the list, lock page scrolling)
//! ```
//!
//! Carousels are driven separately through [`Gallery::carousel_mut`] because
//! their events carry host handles (scroller, frame scheduler).

use crate::carousel::CarouselController;
use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::filter::{self, RoleFilter};
use crate::lightbox::{Key, Lightbox, Modal, RotatedFrame, ViewportSize};
use crate::ordering::{Ordering, OrderingList};
use crate::paginate::{PageControls, Paginator, ScrollRequest};
use crate::types::{ColorGroup, Format, Record};
use tracing::{debug, warn};

/// Width-based presentation of the project grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    /// Paginated list.
    Mobile,
    /// Continuous grid.
    Desktop,
}

impl ViewportClass {
    /// Widths strictly below `breakpoint` are mobile.
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselId {
    Reels,
    ColorGroups,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SetFilter(RoleFilter),
    GoToPage(usize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ViewportResized(ViewportSize),
    OpenVideo(u32),
    OpenGroup(usize),
    NextImage,
    PrevImage,
    ToggleRotate,
    /// Explicit close control.
    Close,
    /// Click on the overlay outside the modal content.
    BackdropClick,
    KeyPressed(Key),
    ToggleMenu,
}

/// Host-side work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Scroll the project list under the fixed header.
    ScrollTo(ScrollRequest),
    /// Suppress (`true`) or restore (`false`) background page scrolling.
    ScrollLock(bool),
}

/// Everything that changes during a session.
#[derive(Debug, Clone)]
pub struct AppState {
    pub active_filter: RoleFilter,
    pub paginator: Paginator,
    pub viewport: ViewportClass,
    pub lightbox: Lightbox,
    pub menu_open: bool,
    pub reels_carousel: CarouselController,
    pub groups_carousel: CarouselController,
}

/// What the open modal shows, resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalView<'a> {
    Closed,
    Video {
        record: &'a Record,
        embed_url: &'a str,
    },
    ImageGroup {
        group: &'a ColorGroup,
        index: usize,
        image: &'a str,
        rotated: bool,
        frame: Option<RotatedFrame>,
    },
}

/// Derived, render-ready projection of the current state.
#[derive(Debug, Clone)]
pub struct GalleryView<'a> {
    pub filter: RoleFilter,
    pub viewport: ViewportClass,
    /// Size of the filtered list before pagination.
    pub filtered_count: usize,
    /// Records to draw: the current page on mobile, everything on desktop.
    pub visible: Vec<&'a Record>,
    /// Pagination bar (mobile only, and only with more than one page).
    pub controls: Option<PageControls>,
    pub reels: Vec<&'a Record>,
    pub color_groups: &'a [ColorGroup],
    pub modal: ModalView<'a>,
    pub scroll_locked: bool,
    pub menu_open: bool,
    pub reels_epoch: u64,
    pub groups_epoch: u64,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    catalog: Catalog,
    /// Catalog indices of the standard track, precedence-sorted.
    projects: Vec<usize>,
    /// Catalog indices of the reel track, precedence-sorted.
    reels: Vec<usize>,
    breakpoint: f64,
    state: AppState,
}

impl Gallery {
    pub fn new(catalog: Catalog, config: &SiteConfig) -> Self {
        let ordering = Ordering::from_config(&config.ordering);
        let records = catalog.records();
        let projects = ordered_indices(records, &ordering.projects, Format::Standard);
        let reels = ordered_indices(records, &ordering.reels, Format::Reel);
        let threshold = config.carousel.visibility_threshold;

        let mut gallery = Self {
            catalog,
            projects,
            reels,
            breakpoint: config.gallery.mobile_breakpoint as f64,
            state: AppState {
                active_filter: RoleFilter::All,
                paginator: Paginator::new(config.gallery.page_size)
                    .with_header_offset(config.gallery.header_offset as f64),
                viewport: ViewportClass::Desktop,
                lightbox: Lightbox::new(),
                menu_open: false,
                reels_carousel: CarouselController::new(threshold),
                groups_carousel: CarouselController::new(threshold),
            },
        };
        gallery.recompute_filtered();
        gallery
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn carousel_mut(&mut self, id: CarouselId) -> &mut CarouselController {
        match id {
            CarouselId::Reels => &mut self.state.reels_carousel,
            CarouselId::ColorGroups => &mut self.state.groups_carousel,
        }
    }

    /// Standard track in display order, unfiltered.
    pub fn projects(&self) -> Vec<&Record> {
        self.projects
            .iter()
            .map(|&i| &self.catalog.records()[i])
            .collect()
    }

    /// Reel track in display order.
    pub fn reels(&self) -> Vec<&Record> {
        self.reels
            .iter()
            .map(|&i| &self.catalog.records()[i])
            .collect()
    }

    /// Standard track under the active filter, in display order.
    pub fn filtered(&self) -> Vec<&Record> {
        filter::apply(&self.projects(), self.state.active_filter)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let was_locked = self.state.lightbox.scroll_locked();
        let mut effects = Vec::new();

        match action {
            Action::SetFilter(filter) => {
                debug!(%filter, "filter changed");
                self.state.active_filter = filter;
                self.recompute_filtered();
            }
            Action::GoToPage(page) => {
                effects.extend(self.state.paginator.paginate(page).map(Effect::ScrollTo));
            }
            Action::NextPage => {
                effects.extend(self.state.paginator.next().map(Effect::ScrollTo));
            }
            Action::PrevPage => {
                effects.extend(self.state.paginator.prev().map(Effect::ScrollTo));
            }
            Action::FirstPage => {
                effects.extend(self.state.paginator.first().map(Effect::ScrollTo));
            }
            Action::LastPage => {
                effects.extend(self.state.paginator.last().map(Effect::ScrollTo));
            }
            Action::ViewportResized(size) => {
                let class = ViewportClass::classify(size.width, self.breakpoint);
                if class != self.state.viewport {
                    debug!(?class, width = size.width, "viewport class changed");
                    self.state.viewport = class;
                }
                self.state.lightbox.resize(size);
            }
            Action::OpenVideo(id) => match self.catalog.find(id) {
                Some(record) => self.state.lightbox.open_video(record),
                None => warn!(id, "open requested for unknown record"),
            },
            Action::OpenGroup(index) => match self.catalog.color_groups().get(index) {
                Some(group) => {
                    self.state.lightbox.open_group(index, group);
                }
                None => warn!(index, "open requested for unknown color group"),
            },
            Action::NextImage => {
                self.state.lightbox.next_image();
            }
            Action::PrevImage => {
                self.state.lightbox.prev_image();
            }
            Action::ToggleRotate => {
                self.state.lightbox.toggle_rotate();
            }
            Action::Close | Action::BackdropClick => {
                self.state.lightbox.close();
            }
            Action::KeyPressed(key) => {
                let consumed = self.state.lightbox.handle_key(key);
                if !consumed && key == Key::Escape {
                    self.state.menu_open = false;
                }
            }
            Action::ToggleMenu => {
                self.state.menu_open = !self.state.menu_open;
            }
        }

        let locked = self.state.lightbox.scroll_locked();
        if locked != was_locked {
            effects.push(Effect::ScrollLock(locked));
        }
        effects
    }

    pub fn view(&self) -> GalleryView<'_> {
        let filtered = self.filtered();
        let state = &self.state;
        let (visible, controls) = match state.viewport {
            ViewportClass::Mobile => (
                state.paginator.slice(&filtered).to_vec(),
                state.paginator.controls(),
            ),
            ViewportClass::Desktop => (filtered.clone(), None),
        };

        GalleryView {
            filter: state.active_filter,
            viewport: state.viewport,
            filtered_count: filtered.len(),
            visible,
            controls,
            reels: self.reels(),
            color_groups: self.catalog.color_groups(),
            modal: self.modal_view(),
            scroll_locked: state.lightbox.scroll_locked(),
            menu_open: state.menu_open,
            reels_epoch: state.reels_carousel.reset_epoch(),
            groups_epoch: state.groups_carousel.reset_epoch(),
        }
    }

    fn modal_view(&self) -> ModalView<'_> {
        match self.state.lightbox.modal() {
            Modal::Closed => ModalView::Closed,
            Modal::Video {
                record_id,
                embed_url,
            } => match self.catalog.find(*record_id) {
                Some(record) => ModalView::Video { record, embed_url },
                None => ModalView::Closed,
            },
            Modal::ImageGroup(viewer) => {
                let group = self.catalog.color_groups().get(viewer.group);
                match group.and_then(|g| g.images.get(viewer.index).map(|image| (g, image))) {
                    Some((group, image)) => ModalView::ImageGroup {
                        group,
                        index: viewer.index,
                        image,
                        rotated: viewer.is_rotated(),
                        frame: viewer.frame(),
                    },
                    None => ModalView::Closed,
                }
            }
        }
    }

    /// The filtered set changed: pagination starts over.
    fn recompute_filtered(&mut self) {
        let count = self.filtered().len();
        self.state.paginator.reset(count);
    }
}

fn ordered_indices(records: &[Record], list: &OrderingList, format: Format) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..records.len())
        .filter(|&i| records[i].format == format)
        .collect();
    indices.sort_by_key(|&i| list.sort_key(&records[i].title));
    indices
}
