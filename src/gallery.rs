//! Project gallery and lightbox navigation.
//!
//! The image sequence for a project is always the thumbnail followed by
//! the detail images, built once per page load. Every lightbox index
//! refers into that single sequence; there is no separate
//! thumbnail/details arithmetic anywhere. Transitions are pure so the
//! same logic drives both the server-rendered fallback links and the
//! in-page script.

use serde::Serialize;

/// Ordered image list for one project: `[thumbnail, ...detail_images]`.
/// Never empty — a project without detail images yields a sequence of
/// length 1 and the navigation controls are hidden.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageSequence(Vec<String>);

impl ImageSequence {
    pub fn new(thumbnail: &str, detail_images: &[String]) -> Self {
        let mut images = Vec::with_capacity(1 + detail_images.len());
        images.push(thumbnail.to_string());
        images.extend(detail_images.iter().cloned());
        ImageSequence(images)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|s| s.as_str())
    }

    pub fn position(&self, url: &str) -> Option<usize> {
        self.0.iter().position(|img| img == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// Prev/next controls only make sense with more than one image.
    pub fn has_navigation(&self) -> bool {
        self.0.len() > 1
    }
}

/// Lightbox state: closed, or open at a position in the sequence.
/// Invariant: a `Viewing` index is always in bounds for the sequence it
/// was produced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lightbox {
    Idle,
    Viewing(usize),
}

impl Lightbox {
    /// Open at an index. Out-of-range indices leave the lightbox closed
    /// rather than ever holding an index outside the sequence.
    pub fn open(seq: &ImageSequence, index: usize) -> Self {
        if index < seq.len() {
            Lightbox::Viewing(index)
        } else {
            Lightbox::Idle
        }
    }

    /// Open at the position of a given image URL, if present.
    pub fn open_image(seq: &ImageSequence, url: &str) -> Self {
        match seq.position(url) {
            Some(i) => Lightbox::Viewing(i),
            None => Lightbox::Idle,
        }
    }

    /// Parse the `?image=` query parameter of the project detail page.
    pub fn from_query(seq: &ImageSequence, param: Option<usize>) -> Self {
        match param {
            Some(i) => Self::open(seq, i),
            None => Lightbox::Idle,
        }
    }

    pub fn close(self) -> Self {
        Lightbox::Idle
    }

    /// Advance one image, wrapping from the last back to the first.
    pub fn next(self, seq: &ImageSequence) -> Self {
        match self {
            Lightbox::Viewing(i) => Lightbox::Viewing((i + 1) % seq.len()),
            Lightbox::Idle => Lightbox::Idle,
        }
    }

    /// Step back one image, wrapping from the first to the last.
    pub fn prev(self, seq: &ImageSequence) -> Self {
        match self {
            Lightbox::Viewing(i) => Lightbox::Viewing((i + seq.len() - 1) % seq.len()),
            Lightbox::Idle => Lightbox::Idle,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Lightbox::Viewing(_))
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Lightbox::Viewing(i) => Some(i),
            Lightbox::Idle => None,
        }
    }

    /// The image currently on display, when open.
    pub fn current_image<'a>(self, seq: &'a ImageSequence) -> Option<&'a str> {
        self.index().and_then(|i| seq.get(i))
    }

    /// The overlay behaves modally: page scroll is locked exactly while
    /// an image is open.
    pub fn scroll_locked(self) -> bool {
        self.is_open()
    }
}
