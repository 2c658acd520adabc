//! Sprite sheet metadata and frame lookup
//!
//! A sheet is a grid of equally sized frames. Animation sequences are looked
//! up by label first; sheets without a label for a sequence fall back to the
//! start/count baked into its `AnimSpec`, clamped to the frames that exist.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::AnimSpec;

/// Opaque reference to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetHandle(pub u32);

/// Source rectangle in sheet pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrcRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Inclusive frame range for a named sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    first: u16,
    last: u16,
}

impl FrameRange {
    pub fn new(first: u16, last: u16) -> Self {
        Self {
            first,
            last: last.max(first),
        }
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    /// Frames in the range; a reversed range (from a hand-edited file) is one frame
    pub fn count(&self) -> u16 {
        self.last.saturating_sub(self.first).saturating_add(1)
    }
}

/// A resolved sequence: sheet row plus first column and length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    pub row: u32,
    pub start: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub handle: SheetHandle,
    /// Texture size in pixels
    pub width: u32,
    pub height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    labels: HashMap<String, FrameRange>,
}

impl SpriteSheet {
    pub fn new(handle: SheetHandle, width: u32, height: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            handle,
            width,
            height,
            frame_width: frame_width.min(width),
            frame_height: frame_height.min(height),
            labels: HashMap::new(),
        }
    }

    /// Single-row strip with the frame width inferred from the expected frame count.
    ///
    /// When the texture width is not an exact multiple, frames are taken as
    /// `fallback_width` wide instead.
    pub fn strip(handle: SheetHandle, width: u32, height: u32, expected_frames: u32, fallback_width: u32) -> Self {
        let exact = width.checked_div(expected_frames).filter(|fw| *fw > 0 && fw * expected_frames == width);
        let frame_width = exact.unwrap_or_else(|| fallback_width.clamp(1, width.max(1)));
        Self::new(handle, width, height, frame_width, height)
    }

    /// Whole texture as one frame
    pub fn single(handle: SheetHandle, width: u32, height: u32) -> Self {
        Self::new(handle, width, height, width, height)
    }

    pub fn with_label(mut self, name: &str, range: FrameRange) -> Self {
        self.labels.insert(name.to_owned(), range);
        self
    }

    pub fn label(&self, name: &str) -> Option<FrameRange> {
        self.labels.get(name).copied()
    }

    /// Zero-sized sheets draw nothing
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.frame_width == 0 || self.frame_height == 0
    }

    pub fn columns(&self) -> u32 {
        self.width.checked_div(self.frame_width).unwrap_or(0)
    }

    pub fn rows(&self) -> u32 {
        self.height.checked_div(self.frame_height).unwrap_or(0)
    }

    pub fn frame_count(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// Resolve the frames for `spec`, or `None` if the sheet has none of them
    pub fn sequence(&self, spec: &AnimSpec) -> Option<Sequence> {
        if self.is_empty() {
            return None;
        }
        let row = spec.row as u32;
        if row >= self.rows() {
            return None;
        }

        let (start, count) = match self.label(spec.label) {
            Some(range) => (range.first() as u32, range.count() as u32),
            None => {
                let start = spec.start as u32;
                let available = self.columns().saturating_sub(start);
                (start, (spec.count as u32).min(available))
            }
        };
        if count == 0 || start >= self.columns() {
            return None;
        }
        Some(Sequence {
            row,
            start,
            count: count.min(self.columns() - start),
        })
    }

    /// Source rect for frame `offset` of `spec` (wraps within the sequence)
    pub fn frame_rect(&self, spec: &AnimSpec, offset: u32) -> Option<SrcRect> {
        let seq = self.sequence(spec)?;
        let col = seq.start + offset % seq.count;
        Some(self.cell(seq.row, col))
    }

    /// Rect of the nth frame in reading order
    pub fn nth_frame(&self, index: u32) -> Option<SrcRect> {
        let columns = self.columns();
        if self.is_empty() || columns == 0 {
            return None;
        }
        let index = index % self.frame_count().max(1);
        Some(self.cell(index / columns, index % columns))
    }

    fn cell(&self, row: u32, col: u32) -> SrcRect {
        SrcRect {
            x: col * self.frame_width,
            y: row * self.frame_height,
            w: self.frame_width,
            h: self.frame_height,
        }
    }
}
