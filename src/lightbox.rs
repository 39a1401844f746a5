//! Full-screen presentation of one video or one color group.
//!
//! ```text
//!            open_video              open_group
//!   Closed ─────────────► Video    ─────────────► ImageGroup
//!     ▲                     │  ▲                    │  ▲ next / prev (wrapping)
//!     └──── close / Esc ────┘  └──── open_video ────┘  └─ rotate toggle
//! ```
//!
//! Only one modal can be open; opening another replaces it. While anything
//! is open the page behind must not scroll ([`Lightbox::scroll_locked`]).

use crate::embed::canonical_embed_url;
use crate::types::{ColorGroup, Record};

/// Keys the lightbox and menu react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Key {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Window inner size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Size of the maximized, 90°-rotated image frame: the viewport with its
/// axes swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedFrame {
    pub width: f64,
    pub height: f64,
}

impl RotatedFrame {
    pub fn for_viewport(viewport: ViewportSize) -> Self {
        Self {
            width: viewport.height,
            height: viewport.width,
        }
    }

    /// Custom properties the rotated viewer is sized with.
    pub fn css_vars(&self) -> String {
        format!(
            "--rotated-width: {}px; --rotated-height: {}px;",
            self.width, self.height
        )
    }
}

/// Paged view over one color group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupViewer {
    pub group: usize,
    pub index: usize,
    len: usize,
    rotated: bool,
    frame: Option<RotatedFrame>,
}

impl GroupViewer {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Rotated frame size, known once a viewport size has been reported.
    pub fn frame(&self) -> Option<RotatedFrame> {
        self.frame.filter(|_| self.rotated)
    }

    fn step(&mut self, forward: bool) -> usize {
        self.index = if forward {
            (self.index + 1) % self.len
        } else {
            (self.index + self.len - 1) % self.len
        };
        self.index
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Video {
        record_id: u32,
        embed_url: String,
    },
    ImageGroup(GroupViewer),
}

#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    modal: Modal,
    viewport: Option<ViewportSize>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_open(&self) -> bool {
        self.modal != Modal::Closed
    }

    /// Background page scrolling must be suppressed.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn viewer(&self) -> Option<&GroupViewer> {
        match &self.modal {
            Modal::ImageGroup(viewer) => Some(viewer),
            _ => None,
        }
    }

    pub fn open_video(&mut self, record: &Record) {
        let embed_url = canonical_embed_url(&record.media_reference);
        tracing::debug!(record = record.id, %embed_url, "lightbox: video open");
        self.modal = Modal::Video {
            record_id: record.id,
            embed_url,
        };
    }

    /// Open `group` (at `group_index` in the catalog) at its first image.
    /// Groups with no images are refused.
    pub fn open_group(&mut self, group_index: usize, group: &ColorGroup) -> bool {
        if group.images.is_empty() {
            return false;
        }
        tracing::debug!(group = %group.title, "lightbox: image group open");
        self.modal = Modal::ImageGroup(GroupViewer {
            group: group_index,
            index: 0,
            len: group.images.len(),
            rotated: false,
            frame: None,
        });
        true
    }

    /// Next image, wrapping to the first. `None` unless a group is open.
    pub fn next_image(&mut self) -> Option<usize> {
        match &mut self.modal {
            Modal::ImageGroup(viewer) => Some(viewer.step(true)),
            _ => None,
        }
    }

    /// Previous image, wrapping to the last. `None` unless a group is open.
    pub fn prev_image(&mut self) -> Option<usize> {
        match &mut self.modal {
            Modal::ImageGroup(viewer) => Some(viewer.step(false)),
            _ => None,
        }
    }

    /// Flip the rotated view. Returns the new rotation, `None` unless a group is open.
    pub fn toggle_rotate(&mut self) -> Option<bool> {
        let viewport = self.viewport;
        match &mut self.modal {
            Modal::ImageGroup(viewer) => {
                viewer.rotated = !viewer.rotated;
                viewer.frame = viewport
                    .filter(|_| viewer.rotated)
                    .map(RotatedFrame::for_viewport);
                Some(viewer.rotated)
            }
            _ => None,
        }
    }

    /// Window resized or rotated. The rotated frame is recomputed only while
    /// rotation is active.
    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = Some(viewport);
        if let Modal::ImageGroup(viewer) = &mut self.modal {
            if viewer.rotated {
                viewer.frame = Some(RotatedFrame::for_viewport(viewport));
            }
        }
    }

    /// Close whatever is open. Returns whether anything was.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        if was_open {
            tracing::debug!("lightbox: closed");
        }
        self.modal = Modal::Closed;
        was_open
    }

    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.close(),
            Key::ArrowRight => self.next_image().is_some(),
            Key::ArrowLeft => self.prev_image().is_some(),
            Key::Other => false,
        }
    }
}
