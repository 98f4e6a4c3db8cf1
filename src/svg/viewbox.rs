//! Growing the root `viewBox` to cover painted strokes.
//!
//! usvg folds the source viewBox and every group transform into `<g
//! transform>` elements and writes the root as `viewBox="0 0 width height"`.
//! The replacement box is therefore measured in canvas units, from the
//! absolute bounds of each drawable leaf.

use std::fmt;

use usvg::{Group, Node, Rect, Tree};

/// Axis-aligned area in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Extent {
    fn of(rect: Rect) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            right: rect.right(),
            bottom: rect.bottom(),
        }
    }

    fn include(&mut self, rect: Rect) {
        self.left = self.left.min(rect.left());
        self.top = self.top.min(rect.top());
        self.right = self.right.max(rect.right());
        self.bottom = self.bottom.max(rect.bottom());
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// `viewBox` attribute syntax: `min-x min-y width height`.
impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}

/// Canvas-space area painted by the tree, strokes included.
///
/// `None` for a tree that draws nothing.
pub fn painted_extent(tree: &Tree) -> Option<Extent> {
    let mut extent = None;
    add_leaves(tree.root(), &mut extent);
    extent.filter(|e: &Extent| e.width() > 0.0 && e.height() > 0.0)
}

/// Groups only contribute through their children, so group-level filter
/// regions and empty groups never widen the box.
fn add_leaves(group: &Group, extent: &mut Option<Extent>) {
    for node in group.children() {
        let rect = match node {
            Node::Group(group) => {
                add_leaves(group, extent);
                continue;
            }
            leaf => leaf.abs_stroke_bounding_box(),
        };
        *extent = Some(match *extent {
            Some(mut acc) => {
                acc.include(rect);
                acc
            }
            None => Extent::of(rect),
        });
    }
}

/// Set the `viewBox` of the root element in serialized markup.
///
/// Only the root start tag is touched. A missing attribute is appended to it.
pub fn write_viewbox(svg: &str, extent: &Extent) -> String {
    let Some(open) = svg.find("<svg") else {
        return svg.to_string();
    };
    let Some(close) = svg[open..].find('>').map(|i| open + i) else {
        return svg.to_string();
    };
    let tag = &svg[open..close];

    let (start, end) = match attribute_span(tag, "viewBox") {
        Some((start, end)) => (open + start, open + end),
        None => {
            let at = if tag.ends_with('/') { close - 1 } else { close };
            return format!("{} viewBox=\"{extent}\"{}", &svg[..at], &svg[at..]);
        }
    };
    format!("{}{extent}{}", &svg[..start], &svg[end..])
}

/// Byte span of a double-quoted attribute value inside a start tag.
fn attribute_span(tag: &str, name: &str) -> Option<(usize, usize)> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some((start, start + len))
}
