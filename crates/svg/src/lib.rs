#![deny(unsafe_code)]
//! In-memory vector scene implementing the plotgen [`Canvas`] capability.
//!
//! [`SvgCanvas`] keeps a flat arena of items addressed by [`ItemId`]. An
//! item without a parent is top-level; export walks them in creation
//! order. Intersection clips open paths
//! against circles and rectangles (see [`clip`]); translation rewrites
//! coordinates in place; export writes one SVG element per live item.

pub mod clip;

use std::fmt::Write as _;

use plotgen_core::{Canvas, ItemId, PlotError, Point, Stroke};
use tracing::trace;

use crate::clip::{clip_polyline, ClipShape};

/// Geometry (or structure) of one scene item.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Line { from: Point, to: Point },
    Polyline(Vec<Point>),
    /// Result of an intersection: zero or more open runs.
    Compound(Vec<Vec<Point>>),
    Circle { center: Point, radius: f64 },
    Rect { min: Point, max: Point },
    Group(Vec<ItemId>),
    Clip { mask: ItemId, children: Vec<ItemId> },
}

#[derive(Debug, Clone)]
struct Item {
    shape: Shape,
    stroke: Option<Stroke>,
    parent: Option<ItemId>,
}

/// A single-scene vector canvas that serializes to SVG text.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    items: Vec<Option<Item>>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current surface size.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Number of live items, including group members.
    pub fn item_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_some()).count()
    }

    /// Number of live top-level items.
    pub fn root_count(&self) -> usize {
        self.roots().count()
    }

    fn roots(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().enumerate().filter_map(|(i, item)| match item {
            Some(Item { parent: None, .. }) => Some(ItemId(i)),
            _ => None,
        })
    }

    fn item(&self, id: ItemId) -> Result<&Item, PlotError> {
        self.items
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PlotError::UnknownItem(id.0))
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, PlotError> {
        self.items
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PlotError::UnknownItem(id.0))
    }

    fn push(&mut self, shape: Shape, stroke: Option<Stroke>) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(Some(Item {
            shape,
            stroke,
            parent: None,
        }));
        id
    }

    /// Unlinks `id` from its parent's child list. Top-level items need no work.
    fn detach(&mut self, id: ItemId) -> Result<(), PlotError> {
        let Some(parent) = self.item(id)?.parent else {
            return Ok(());
        };
        let shape = &mut self.item_mut(parent)?.shape;
        match shape {
            Shape::Group(children) => children.retain(|&c| c != id),
            Shape::Clip { mask, children } => {
                children.retain(|&c| c != id);
                if *mask == id {
                    // A clip without its mask degrades to a plain group.
                    *shape = Shape::Group(std::mem::take(children));
                }
            }
            _ => {}
        }
        self.item_mut(id)?.parent = None;
        Ok(())
    }

    /// Moves `children` under a new structural item.
    fn adopt(&mut self, shape: Shape, children: &[ItemId]) -> Result<ItemId, PlotError> {
        for &child in children {
            self.detach(child)?;
        }
        let id = self.push(shape, None);
        for &child in children {
            self.item_mut(child)?.parent = Some(id);
        }
        Ok(id)
    }

    fn closed_shape(&self, id: ItemId) -> Result<ClipShape, PlotError> {
        match self.item(id)?.shape {
            Shape::Circle { center, radius } => Ok(ClipShape::Circle { center, radius }),
            Shape::Rect { min, max } => Ok(ClipShape::Rect { min, max }),
            _ => Err(PlotError::UnsupportedIntersection(format!(
                "item {} is not a closed circle or rectangle",
                id.0
            ))),
        }
    }

    fn open_runs(&self, id: ItemId) -> Result<Vec<Vec<Point>>, PlotError> {
        match &self.item(id)?.shape {
            Shape::Line { from, to } => Ok(vec![vec![*from, *to]]),
            Shape::Polyline(points) => Ok(vec![points.clone()]),
            Shape::Compound(runs) => Ok(runs.clone()),
            _ => Err(PlotError::UnsupportedIntersection(format!(
                "item {} is not an open path",
                id.0
            ))),
        }
    }

    fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        match self.items.get(id.0).and_then(Option::as_ref).map(|i| &i.shape) {
            Some(Shape::Group(children)) => children.clone(),
            Some(Shape::Clip { mask, children }) => {
                let mut all = vec![*mask];
                all.extend(children.iter().copied());
                all
            }
            _ => Vec::new(),
        }
    }

    fn write_item(&self, id: ItemId, out: &mut String) {
        let Some(item) = self.items.get(id.0).and_then(Option::as_ref) else {
            return;
        };
        let style = item.stroke.map(stroke_attrs).unwrap_or_default();
        match &item.shape {
            Shape::Line { from, to } => {
                let _ = writeln!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{style}/>"#,
                    fmt_num(from.x),
                    fmt_num(from.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                );
            }
            Shape::Polyline(points) => {
                if points.len() < 2 {
                    return;
                }
                let pts: Vec<String> = points
                    .iter()
                    .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
                    .collect();
                let _ = writeln!(out, r#"<polyline points="{}"{style}/>"#, pts.join(" "));
            }
            Shape::Compound(runs) => {
                let d = path_data(runs);
                if !d.is_empty() {
                    let _ = writeln!(out, r#"<path d="{d}"{style}/>"#);
                }
            }
            Shape::Circle { center, radius } => {
                let _ = writeln!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}"{style}/>"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius)
                );
            }
            Shape::Rect { min, max } => {
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}"{style}/>"#,
                    fmt_num(min.x),
                    fmt_num(min.y),
                    fmt_num(max.x - min.x),
                    fmt_num(max.y - min.y)
                );
            }
            Shape::Group(children) => {
                out.push_str("<g>\n");
                for &child in children {
                    self.write_item(child, out);
                }
                out.push_str("</g>\n");
            }
            Shape::Clip { mask, children } => {
                let _ = writeln!(out, r#"<defs><clipPath id="clip-{}">"#, id.0);
                self.write_item(*mask, out);
                out.push_str("</clipPath></defs>\n");
                let _ = writeln!(out, r#"<g clip-path="url(#clip-{})">"#, id.0);
                for &child in children {
                    self.write_item(child, out);
                }
                out.push_str("</g>\n");
            }
        }
    }
}

impl Canvas for SvgCanvas {
    fn setup(&mut self, width: f64, height: f64) -> Result<(), PlotError> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(PlotError::InvalidDimensions);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) -> ItemId {
        self.push(Shape::Line { from, to }, Some(stroke))
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke) -> ItemId {
        self.push(Shape::Polyline(points.to_vec()), Some(stroke))
    }

    fn circle(&mut self, center: Point, radius: f64, stroke: Stroke) -> ItemId {
        self.push(Shape::Circle { center, radius }, Some(stroke))
    }

    fn rectangle(&mut self, from: Point, to: Point, stroke: Stroke) -> ItemId {
        let min = from.min(to);
        let max = from.max(to);
        self.push(Shape::Rect { min, max }, Some(stroke))
    }

    fn intersect(&mut self, path: ItemId, shape: ItemId) -> Result<Option<ItemId>, PlotError> {
        let clip = self.closed_shape(shape)?;
        let runs: Vec<Vec<Point>> = self
            .open_runs(path)?
            .iter()
            .flat_map(|run| clip_polyline(run, &clip))
            .collect();
        if runs.is_empty() {
            return Ok(None);
        }
        let stroke = self.item(path)?.stroke;
        Ok(Some(self.push(Shape::Compound(runs), stroke)))
    }

    fn group(&mut self, items: &[ItemId]) -> Result<ItemId, PlotError> {
        self.adopt(Shape::Group(items.to_vec()), items)
    }

    fn clip(&mut self, mask: ItemId, items: &[ItemId]) -> Result<ItemId, PlotError> {
        self.closed_shape(mask)?;
        let mut members = vec![mask];
        members.extend(items.iter().copied().filter(|&i| i != mask));
        self.adopt(
            Shape::Clip {
                mask,
                children: members[1..].to_vec(),
            },
            &members,
        )
    }

    fn translate(&mut self, item: ItemId, offset: Point) -> Result<(), PlotError> {
        let children = self.descendants(item);
        match &mut self.item_mut(item)?.shape {
            Shape::Line { from, to } => {
                *from += offset;
                *to += offset;
            }
            Shape::Polyline(points) => points.iter_mut().for_each(|p| *p += offset),
            Shape::Compound(runs) => runs
                .iter_mut()
                .flat_map(|r| r.iter_mut())
                .for_each(|p| *p += offset),
            Shape::Circle { center, .. } => *center += offset,
            Shape::Rect { min, max } => {
                *min += offset;
                *max += offset;
            }
            Shape::Group(_) | Shape::Clip { .. } => {}
        }
        for child in children {
            self.translate(child, offset)?;
        }
        Ok(())
    }

    fn remove(&mut self, item: ItemId) -> Result<(), PlotError> {
        self.detach(item)?;
        let mut pending = vec![item];
        while let Some(id) = pending.pop() {
            pending.extend(self.descendants(id));
            if let Some(slot) = self.items.get_mut(id.0) {
                *slot = None;
            }
        }
        Ok(())
    }

    fn export_svg(&self) -> String {
        let (w, h) = (fmt_num(self.width), fmt_num(self.height));
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        out.push('\n');
        for id in self.roots() {
            self.write_item(id, &mut out);
        }
        out.push_str("</svg>\n");
        out
    }

    fn clear(&mut self) {
        trace!(items = self.item_count(), "clearing scene");
        self.items.clear();
        self.width = 0.0;
        self.height = 0.0;
    }
}

fn stroke_attrs(stroke: Stroke) -> String {
    format!(
        r#" fill="none" stroke="{}" stroke-width="{}""#,
        stroke.color.to_hex(),
        fmt_num(stroke.width)
    )
}

fn path_data(runs: &[Vec<Point>]) -> String {
    let mut d = String::new();
    for run in runs.iter().filter(|r| r.len() >= 2) {
        for (i, p) in run.iter().enumerate() {
            if !d.is_empty() {
                d.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", fmt_num(p.x), fmt_num(p.y));
        }
    }
    d
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
