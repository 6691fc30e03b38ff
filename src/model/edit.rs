//! Form-style edits expressed as pure `CardState -> CardState` functions.

use crate::model::card::{CardState, PhotoSettings, Subject, TextLayout};

/// UI range of the zoom control.
pub const MIN_PHOTO_SCALE: f64 = 0.5;
/// UI range of the zoom control.
pub const MAX_PHOTO_SCALE: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    ReporterName,
    ReporterTitle,
    IntervieweeName,
    IntervieweeTitle,
    PhotoCredit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    X,
    Y,
    Scale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextLayoutField {
    X,
    Y,
    W,
    Size,
}

/// Coerce free-form numeric input. Empty, non-numeric and non-finite input becomes `0`.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn with_text(state: &CardState, field: TextField, value: impl Into<String>) -> CardState {
    let mut next = state.clone();
    let slot = match field {
        TextField::ReporterName => &mut next.reporter_name,
        TextField::ReporterTitle => &mut next.reporter_title,
        TextField::IntervieweeName => &mut next.interviewee_name,
        TextField::IntervieweeTitle => &mut next.interviewee_title,
        TextField::PhotoCredit => &mut next.photo_credit,
    };
    *slot = value.into();
    next
}

/// Apply a pan/zoom control value. Zoom is held to the control's range here; the
/// renderer itself accepts any scale.
pub fn with_setting(
    state: &CardState,
    subject: Subject,
    field: SettingField,
    value: f64,
) -> CardState {
    let current = state.settings(subject);
    let next = match field {
        SettingField::X => PhotoSettings { x: value, ..current },
        SettingField::Y => PhotoSettings { y: value, ..current },
        SettingField::Scale => PhotoSettings {
            scale: value.clamp(MIN_PHOTO_SCALE, MAX_PHOTO_SCALE),
            ..current
        },
    };
    state.with_settings(subject, next)
}

pub fn with_text_layout_field(
    state: &CardState,
    subject: Subject,
    field: TextLayoutField,
    raw: &str,
) -> CardState {
    let value = coerce_number(raw);
    let current = state.text_layout(subject);
    let next = match field {
        TextLayoutField::X => TextLayout { x: value, ..current },
        TextLayoutField::Y => TextLayout { y: value, ..current },
        TextLayoutField::W => TextLayout { w: value, ..current },
        TextLayoutField::Size => TextLayout {
            size: value,
            ..current
        },
    };
    state.with_text_layout(subject, next)
}

#[cfg(test)]
#[path = "../../tests/unit/model/edit.rs"]
mod tests;
