//! Drag and resize sessions, independent of window semantics.
//!
//! A session spans one pointer press to its release. [`InteractionState`] owns at most one
//! session at a time, so a second press while the pointer is captured is rejected until the
//! first session is ended.

use crate::{
    error::WmError,
    model::{PointerPosition, ResizeEdge, WindowId, WindowRect},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

impl DragSession {
    /// Returns the starting rect translated by the pointer delta.
    pub fn update(&self, pointer: PointerPosition) -> WindowRect {
        let dx = pointer.x - self.pointer_start.x;
        let dy = pointer.y - self.pointer_start.y;
        self.rect_start.offset(dx, dy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

impl ResizeSession {
    /// Returns the resized rect for the current pointer position.
    pub fn update(&self, pointer: PointerPosition, min_w: i32, min_h: i32) -> WindowRect {
        let dx = pointer.x - self.pointer_start.x;
        let dy = pointer.y - self.pointer_start.y;
        resize_rect(self.rect_start, self.edge, dx, dy, min_w, min_h)
    }
}

/// Applies an edge/corner delta, clamping width and height to the minimums.
///
/// When a dimension is clamped, the edge opposite the dragged one stays where it started.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_w: i32,
    min_h: i32,
) -> WindowRect {
    let mut rect = start;

    if edge.moves_right() {
        rect.w = (start.w + dx).max(min_w);
    }
    if edge.moves_left() {
        rect.w = (start.w - dx).max(min_w);
        rect.x = start.x + (start.w - rect.w);
    }
    if edge.moves_bottom() {
        rect.h = (start.h + dy).max(min_h);
    }
    if edge.moves_top() {
        rect.h = (start.h - dy).max(min_h);
        rect.y = start.y + (start.h - rect.h);
    }

    rect
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerSession {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl PointerSession {
    pub fn window_id(&self) -> WindowId {
        match self {
            Self::Drag(session) => session.window_id,
            Self::Resize(session) => session.window_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    session: Option<PointerSession>,
}

impl InteractionState {
    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    pub fn is_captured(&self) -> bool {
        self.session.is_some()
    }

    /// Captures the pointer for a window drag.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::SessionActive`] while another session owns the pointer.
    pub fn begin_drag(
        &mut self,
        window_id: WindowId,
        pointer: PointerPosition,
        rect_start: WindowRect,
    ) -> Result<(), WmError> {
        self.capture(PointerSession::Drag(DragSession {
            window_id,
            pointer_start: pointer,
            rect_start,
        }))
    }

    /// Captures the pointer for a window resize.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::SessionActive`] while another session owns the pointer.
    pub fn begin_resize(
        &mut self,
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
        rect_start: WindowRect,
    ) -> Result<(), WmError> {
        self.capture(PointerSession::Resize(ResizeSession {
            window_id,
            edge,
            pointer_start: pointer,
            rect_start,
        }))
    }

    /// Computes the rect the captured window should take for `pointer`.
    pub fn track(
        &self,
        pointer: PointerPosition,
        min_w: i32,
        min_h: i32,
    ) -> Option<(WindowId, WindowRect)> {
        match self.session.as_ref()? {
            PointerSession::Drag(session) => Some((session.window_id, session.update(pointer))),
            PointerSession::Resize(session) => Some((
                session.window_id,
                session.update(pointer, min_w, min_h),
            )),
        }
    }

    /// Releases the pointer and hands back the finished session.
    pub fn end(&mut self) -> Option<PointerSession> {
        self.session.take()
    }

    fn capture(&mut self, session: PointerSession) -> Result<(), WmError> {
        if self.session.is_some() {
            return Err(WmError::SessionActive);
        }
        self.session = Some(session);
        Ok(())
    }
}
