use crate::foundation::core::Point;
use crate::geometry::hit::{
    RESIZE_HANDLE_SIZE, estimated_text_height, handle_contains, rect_contains,
    text_bounds_contains,
};
use crate::model::card::{CardState, FrameRect, PhotoSettings, Subject, TextLayout};
use crate::text::caption::{layout_interviewee_caption, layout_reporter_caption};
use crate::text::font::TextMeasure;

/// Smallest side a frame can be resized down to.
pub const MIN_FRAME_SIDE: f64 = 50.0;

/// What a pointer-down grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Photo(Subject),
    Text(Subject),
    Frame(Subject),
    FrameHandle(Subject),
}

/// Pointer-drag state. Every dragging variant carries the pointer start and the
/// pre-drag value it edits; moves are recomputed from those, never accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingPhoto {
        subject: Subject,
        start: Point,
        initial: PhotoSettings,
    },
    DraggingText {
        subject: Subject,
        start: Point,
        initial: TextLayout,
    },
    MovingFrame {
        subject: Subject,
        start: Point,
        initial: FrameRect,
    },
    ResizingFrame {
        subject: Subject,
        start: Point,
        initial: FrameRect,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn target(&self) -> Option<DragTarget> {
        match *self {
            DragState::Idle => None,
            DragState::DraggingPhoto { subject, .. } => Some(DragTarget::Photo(subject)),
            DragState::DraggingText { subject, .. } => Some(DragTarget::Text(subject)),
            DragState::MovingFrame { subject, .. } => Some(DragTarget::Frame(subject)),
            DragState::ResizingFrame { subject, .. } => Some(DragTarget::FrameHandle(subject)),
        }
    }

    /// Enter the dragging state for `target`, snapshotting the value it edits.
    pub fn grab(card: &CardState, target: DragTarget, start: Point) -> Self {
        match target {
            DragTarget::Photo(subject) => DragState::DraggingPhoto {
                subject,
                start,
                initial: card.settings(subject),
            },
            DragTarget::Text(subject) => DragState::DraggingText {
                subject,
                start,
                initial: card.text_layout(subject),
            },
            DragTarget::Frame(subject) => DragState::MovingFrame {
                subject,
                start,
                initial: card.frame(subject),
            },
            DragTarget::FrameHandle(subject) => DragState::ResizingFrame {
                subject,
                start,
                initial: card.frame(subject),
            },
        }
    }

    /// The card as it would look with the pointer at `point`. `None` when idle.
    pub fn propose(&self, card: &CardState, point: Point) -> Option<CardState> {
        match *self {
            DragState::Idle => None,
            DragState::DraggingPhoto {
                subject,
                start,
                initial,
            } => {
                let delta = point - start;
                Some(card.with_settings(
                    subject,
                    PhotoSettings {
                        x: initial.x + delta.x,
                        y: initial.y + delta.y,
                        scale: initial.scale,
                    },
                ))
            }
            DragState::DraggingText {
                subject,
                start,
                initial,
            } => {
                let delta = point - start;
                let y = match subject {
                    Subject::Reporter => initial.y + delta.y,
                    Subject::Interviewee => initial.y,
                };
                Some(card.with_text_layout(
                    subject,
                    TextLayout {
                        x: initial.x + delta.x,
                        y,
                        ..initial
                    },
                ))
            }
            DragState::MovingFrame {
                subject,
                start,
                initial,
            } => {
                let delta = point - start;
                Some(card.with_frame(
                    subject,
                    FrameRect {
                        x: initial.x + delta.x,
                        y: initial.y + delta.y,
                        ..initial
                    },
                ))
            }
            DragState::ResizingFrame {
                subject,
                start,
                initial,
            } => {
                let delta = point - start;
                Some(card.with_frame(
                    subject,
                    FrameRect {
                        w: (initial.w + delta.x).max(MIN_FRAME_SIDE),
                        h: (initial.h + delta.y).max(MIN_FRAME_SIDE),
                        ..initial
                    },
                ))
            }
        }
    }
}

/// Pick what a pointer-down at `point` grabs, first match wins:
/// interviewee caption, reporter caption, interviewee photo, reporter photo.
///
/// A frame without a photo is inert. A visible interviewee frame swallows the press
/// even when it has nothing to drag, so the reporter frame underneath is not reached.
pub fn hit_target(
    card: &CardState,
    point: Point,
    measure: &mut dyn TextMeasure,
) -> Option<DragTarget> {
    if let Some(caption) = layout_interviewee_caption(card, measure) {
        let layout = card.interviewee_text_layout;
        if text_bounds_contains(
            point,
            &layout,
            caption.rendered_width(),
            estimated_text_height(&layout),
        ) {
            return Some(DragTarget::Text(Subject::Interviewee));
        }
    }

    if let Some(caption) = layout_reporter_caption(card, measure) {
        let layout = card.reporter_text_layout;
        if text_bounds_contains(
            point,
            &layout,
            caption.rendered_width(),
            estimated_text_height(&layout),
        ) {
            return Some(DragTarget::Text(Subject::Reporter));
        }
    }

    if card.frame_visible(Subject::Interviewee)
        && rect_contains(point, card.frame(Subject::Interviewee))
    {
        return card
            .photo(Subject::Interviewee)
            .map(|_| DragTarget::Photo(Subject::Interviewee));
    }

    if rect_contains(point, card.frame(Subject::Reporter)) {
        return card
            .photo(Subject::Reporter)
            .map(|_| DragTarget::Photo(Subject::Reporter));
    }

    None
}

/// Pointer-event front end over [`DragState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn pointer_down(
        &mut self,
        card: &CardState,
        point: Point,
        measure: &mut dyn TextMeasure,
    ) -> Option<DragTarget> {
        let target = hit_target(card, point, measure);
        self.state = match target {
            Some(t) => {
                tracing::debug!(?t, x = point.x, y = point.y, "drag started");
                DragState::grab(card, t, point)
            }
            None => DragState::Idle,
        };
        target
    }

    /// Start moving or resizing a frame. The handle wins over the body.
    pub fn begin_frame_drag(
        &mut self,
        card: &CardState,
        subject: Subject,
        point: Point,
    ) -> Option<DragTarget> {
        let frame = card.frame(subject);
        let target = if handle_contains(point, frame, RESIZE_HANDLE_SIZE) {
            DragTarget::FrameHandle(subject)
        } else if rect_contains(point, frame) {
            DragTarget::Frame(subject)
        } else {
            return None;
        };
        self.state = DragState::grab(card, target, point);
        Some(target)
    }

    pub fn pointer_move(&self, card: &CardState, point: Point) -> Option<CardState> {
        self.state.propose(card, point)
    }

    /// Release or leave. The last proposed card stays committed.
    pub fn pointer_up(&mut self) {
        if self.state.is_dragging() {
            tracing::debug!("drag ended");
        }
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
