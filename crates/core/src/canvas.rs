//! The vector-drawing capability generators render against.
//!
//! [`Canvas`] is the operation set plotgen needs from a vector engine:
//! stroked primitives, non-tracing boolean intersection, grouping,
//! clipping, translation, SVG export, and clearing. Generators never see
//! an engine's internals, only opaque [`ItemId`] handles.
//!
//! An engine holds one scene at a time. [`Session`] scopes that scene to a
//! single render call: opening it clears and sizes the canvas, dropping it
//! clears the canvas again, so nothing leaks into the next render.

use std::ops::{Deref, DerefMut};

use crate::color::Srgb;
use crate::error::PlotError;
use crate::geometry::Point;

/// Handle to an item in the current scene. Valid only within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

/// Stroke styling for a path primitive. Fills are always `none`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgb,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Srgb, width: f64) -> Self {
        Self { color, width }
    }
}

/// Capability interface of a vector-drawing engine.
///
/// Object-safe, so render pipelines take `&mut dyn Canvas`.
pub trait Canvas {
    /// Sizes a fresh drawing surface.
    ///
    /// Returns `PlotError::InvalidDimensions` for negative or non-finite sizes.
    fn setup(&mut self, width: f64, height: f64) -> Result<(), PlotError>;

    /// A straight line from `from` to `to`.
    fn line(&mut self, from: Point, to: Point, stroke: Stroke) -> ItemId;

    /// An open path through `points`.
    fn polyline(&mut self, points: &[Point], stroke: Stroke) -> ItemId;

    /// A closed circle.
    fn circle(&mut self, center: Point, radius: f64, stroke: Stroke) -> ItemId;

    /// A closed axis-aligned rectangle with opposite corners `from` and `to`.
    fn rectangle(&mut self, from: Point, to: Point, stroke: Stroke) -> ItemId;

    /// Non-tracing boolean intersection of `path` with the closed `shape`.
    ///
    /// The result is a new top-level item holding the parts of `path`
    /// inside `shape`, styled like `path`, or `None` when no part of
    /// `path` lies inside. Both inputs stay in the scene.
    fn intersect(&mut self, path: ItemId, shape: ItemId) -> Result<Option<ItemId>, PlotError>;

    /// Moves `items` into a new group.
    fn group(&mut self, items: &[ItemId]) -> Result<ItemId, PlotError>;

    /// Moves `items` into a new group clipped by the closed `mask`.
    fn clip(&mut self, mask: ItemId, items: &[ItemId]) -> Result<ItemId, PlotError>;

    /// Translates an item (and any children) by `offset`.
    fn translate(&mut self, item: ItemId, offset: Point) -> Result<(), PlotError>;

    /// Removes an item (and any children) from the scene.
    fn remove(&mut self, item: ItemId) -> Result<(), PlotError>;

    /// Serializes the current scene as an SVG document.
    fn export_svg(&self) -> String;

    /// Drops every item and resets the surface.
    fn clear(&mut self);
}

/// One render call's exclusive hold on a [`Canvas`].
///
/// Derefs to the canvas for drawing. The canvas is cleared when the
/// session is opened and again when it is dropped, whether the render
/// finished or bailed out early with `?`.
pub struct Session<'a> {
    canvas: &'a mut dyn Canvas,
    width: f64,
    height: f64,
}

impl<'a> Session<'a> {
    /// Clears `canvas` and sizes it to `width` x `height`.
    pub fn open(canvas: &'a mut dyn Canvas, width: f64, height: f64) -> Result<Self, PlotError> {
        canvas.clear();
        canvas.setup(width, height)?;
        Ok(Self {
            canvas,
            width,
            height,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Serializes the scene and ends the session.
    pub fn finish(self) -> String {
        self.canvas.export_svg()
    }
}

impl<'a> Deref for Session<'a> {
    type Target = dyn Canvas + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl<'a> DerefMut for Session<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.canvas.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls so session bookkeeping can be checked without an engine.
    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<String>,
        items: usize,
    }

    impl RecordingCanvas {
        fn next(&mut self, call: &str) -> ItemId {
            self.calls.push(call.to_string());
            self.items += 1;
            ItemId(self.items - 1)
        }
    }

    impl Canvas for RecordingCanvas {
        fn setup(&mut self, width: f64, height: f64) -> Result<(), PlotError> {
            if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
                return Err(PlotError::InvalidDimensions);
            }
            self.calls.push(format!("setup {width}x{height}"));
            Ok(())
        }

        fn line(&mut self, _: Point, _: Point, _: Stroke) -> ItemId {
            self.next("line")
        }

        fn polyline(&mut self, _: &[Point], _: Stroke) -> ItemId {
            self.next("polyline")
        }

        fn circle(&mut self, _: Point, _: f64, _: Stroke) -> ItemId {
            self.next("circle")
        }

        fn rectangle(&mut self, _: Point, _: Point, _: Stroke) -> ItemId {
            self.next("rectangle")
        }

        fn intersect(&mut self, _: ItemId, _: ItemId) -> Result<Option<ItemId>, PlotError> {
            Ok(Some(self.next("intersect")))
        }

        fn group(&mut self, _: &[ItemId]) -> Result<ItemId, PlotError> {
            Ok(self.next("group"))
        }

        fn clip(&mut self, _: ItemId, _: &[ItemId]) -> Result<ItemId, PlotError> {
            Ok(self.next("clip"))
        }

        fn translate(&mut self, item: ItemId, _: Point) -> Result<(), PlotError> {
            if item.0 >= self.items {
                return Err(PlotError::UnknownItem(item.0));
            }
            self.calls.push("translate".into());
            Ok(())
        }

        fn remove(&mut self, _: ItemId) -> Result<(), PlotError> {
            self.calls.push("remove".into());
            Ok(())
        }

        fn export_svg(&self) -> String {
            format!("<svg>{}</svg>", self.items)
        }

        fn clear(&mut self) {
            self.calls.push("clear".into());
            self.items = 0;
        }
    }

    #[test]
    fn session_clears_on_open_and_drop() {
        let mut canvas = RecordingCanvas::default();
        {
            let mut session = Session::open(&mut canvas, 10.0, 20.0).unwrap();
            session.line(Point::ZERO, Point::ONE, Stroke::new(Srgb::BLACK, 1.0));
            assert_eq!((session.width(), session.height()), (10.0, 20.0));
        }
        assert_eq!(canvas.calls, ["clear", "setup 10x20", "line", "clear"]);
        assert_eq!(canvas.items, 0);
    }

    #[test]
    fn finish_exports_before_clearing() {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::open(&mut canvas, 1.0, 1.0).unwrap();
        session.circle(Point::ZERO, 1.0, Stroke::new(Srgb::BLUE, 2.0));
        assert_eq!(session.finish(), "<svg>1</svg>");
        assert_eq!(canvas.calls.last().map(String::as_str), Some("clear"));
    }

    #[test]
    fn session_clears_when_build_fails() {
        fn failing_build(canvas: &mut dyn Canvas) -> Result<String, PlotError> {
            let mut session = Session::open(canvas, 5.0, 5.0)?;
            session.polyline(&[Point::ZERO], Stroke::new(Srgb::BLACK, 0.5));
            session.translate(ItemId(99), Point::ONE)?;
            Ok(session.finish())
        }

        let mut canvas = RecordingCanvas::default();
        let err = failing_build(&mut canvas).unwrap_err();
        assert!(matches!(err, PlotError::UnknownItem(99)));
        assert_eq!(canvas.calls.last().map(String::as_str), Some("clear"));
        assert_eq!(canvas.items, 0);
    }

    #[test]
    fn open_rejects_invalid_dimensions() {
        let mut canvas = RecordingCanvas::default();
        assert!(matches!(
            Session::open(&mut canvas, -1.0, 5.0),
            Err(PlotError::InvalidDimensions)
        ));
    }

    #[test]
    fn canvas_trait_is_object_safe() {
        let mut canvas = RecordingCanvas::default();
        let dyn_canvas: &mut dyn Canvas = &mut canvas;
        dyn_canvas.setup(1.0, 1.0).unwrap();
        assert_eq!(dyn_canvas.export_svg(), "<svg>0</svg>");
    }
}
