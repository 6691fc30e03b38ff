use crate::foundation::core::{Point, Rect};

/// Lower bound for the interviewee caption anchor on the x axis.
pub const INTERVIEWEE_TEXT_X_MIN: f64 = 600.0;
/// Upper bound for the interviewee caption anchor on the x axis.
pub const INTERVIEWEE_TEXT_X_MAX: f64 = 1800.0;

/// One of the two people featured on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Reporter,
    Interviewee,
}

impl Subject {
    pub const ALL: [Subject; 2] = [Subject::Reporter, Subject::Interviewee];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Reporter => "reporter",
            Subject::Interviewee => "interviewee",
        }
    }

    /// Clamp a caption anchor x the way every mutation of this subject's text layout must.
    pub fn clamp_text_x(self, x: f64) -> f64 {
        match self {
            Subject::Reporter => x,
            Subject::Interviewee => x.clamp(INTERVIEWEE_TEXT_X_MIN, INTERVIEWEE_TEXT_X_MAX),
        }
    }
}

/// Pan offset (canvas units, relative to the frame center) and uniform zoom of a photo.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoSettings {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl PhotoSettings {
    pub const IDENTITY: PhotoSettings = PhotoSettings {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned rectangle in canvas space where a subject photo is clipped.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FrameRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn aspect_ratio(self) -> f64 {
        self.w / self.h
    }
}

/// Anchor, maximum width and base font size of a caption block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayout {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub size: f64,
}

impl TextLayout {
    pub const fn new(x: f64, y: f64, w: f64, size: f64) -> Self {
        Self { x, y, w, size }
    }

    pub fn anchor(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The whole editable card. Replaced wholesale on every edit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub solid_template: String,
    pub transparent_template: String,

    pub reporter_name: String,
    pub reporter_title: String,
    pub reporter_photo: Option<String>,
    pub reporter_settings: PhotoSettings,
    pub reporter_frame: FrameRect,
    pub reporter_text_layout: TextLayout,

    pub interviewee_name: String,
    pub interviewee_title: String,
    pub interviewee_photo: Option<String>,
    pub interviewee_settings: PhotoSettings,
    pub interviewee_frame: FrameRect,
    pub interviewee_text_layout: TextLayout,

    pub photo_credit: String,
    pub is_transparent_mode: bool,
    #[serde(default)]
    pub is_voice_altered: bool,
    #[serde(default)]
    pub map_image: Option<String>,
}

impl CardState {
    pub fn settings(&self, subject: Subject) -> PhotoSettings {
        match subject {
            Subject::Reporter => self.reporter_settings,
            Subject::Interviewee => self.interviewee_settings,
        }
    }

    pub fn with_settings(&self, subject: Subject, settings: PhotoSettings) -> Self {
        let mut next = self.clone();
        match subject {
            Subject::Reporter => next.reporter_settings = settings,
            Subject::Interviewee => next.interviewee_settings = settings,
        }
        next
    }

    pub fn frame(&self, subject: Subject) -> FrameRect {
        match subject {
            Subject::Reporter => self.reporter_frame,
            Subject::Interviewee => self.interviewee_frame,
        }
    }

    pub fn with_frame(&self, subject: Subject, frame: FrameRect) -> Self {
        let mut next = self.clone();
        match subject {
            Subject::Reporter => next.reporter_frame = frame,
            Subject::Interviewee => next.interviewee_frame = frame,
        }
        next
    }

    pub fn text_layout(&self, subject: Subject) -> TextLayout {
        match subject {
            Subject::Reporter => self.reporter_text_layout,
            Subject::Interviewee => self.interviewee_text_layout,
        }
    }

    /// Replace a caption layout. The interviewee x clamp is applied here so no
    /// caller can store an out-of-range anchor.
    pub fn with_text_layout(&self, subject: Subject, layout: TextLayout) -> Self {
        let layout = TextLayout {
            x: subject.clamp_text_x(layout.x),
            ..layout
        };
        let mut next = self.clone();
        match subject {
            Subject::Reporter => next.reporter_text_layout = layout,
            Subject::Interviewee => next.interviewee_text_layout = layout,
        }
        next
    }

    pub fn photo(&self, subject: Subject) -> Option<&str> {
        match subject {
            Subject::Reporter => self.reporter_photo.as_deref(),
            Subject::Interviewee => self.interviewee_photo.as_deref(),
        }
    }

    /// Replace a subject photo; pan and zoom always go back to identity.
    pub fn with_photo(&self, subject: Subject, photo: Option<String>) -> Self {
        let mut next = self.with_settings(subject, PhotoSettings::IDENTITY);
        match subject {
            Subject::Reporter => next.reporter_photo = photo,
            Subject::Interviewee => next.interviewee_photo = photo,
        }
        next
    }

    pub fn name(&self, subject: Subject) -> &str {
        match subject {
            Subject::Reporter => &self.reporter_name,
            Subject::Interviewee => &self.interviewee_name,
        }
    }

    pub fn title(&self, subject: Subject) -> &str {
        match subject {
            Subject::Reporter => &self.reporter_title,
            Subject::Interviewee => &self.interviewee_title,
        }
    }

    /// Whether a subject's photo frame takes part in rendering and hit-testing.
    pub fn frame_visible(&self, subject: Subject) -> bool {
        match subject {
            Subject::Reporter => true,
            Subject::Interviewee => !self.is_transparent_mode,
        }
    }

    /// Every image source the card references, in draw order, without duplicates.
    pub fn image_sources(&self) -> Vec<&str> {
        let candidates = [
            Some(self.solid_template.as_str()),
            self.map_image.as_deref(),
            self.interviewee_photo.as_deref(),
            Some(self.transparent_template.as_str()),
            self.reporter_photo.as_deref(),
        ];
        let mut out: Vec<&str> = Vec::with_capacity(candidates.len());
        for src in candidates.into_iter().flatten() {
            if !src.is_empty() && !out.contains(&src) {
                out.push(src);
            }
        }
        out
    }

    pub fn from_json(json: &str) -> crate::NewscardResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::NewscardError::validation(format!("invalid card state: {e}")))
    }

    pub fn to_json_pretty(&self) -> crate::NewscardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::NewscardError::validation(format!("serialize card state: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/card.rs"]
mod tests;
