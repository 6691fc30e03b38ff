/// Font faces a card draws with. Each maps to one font file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    /// Photo credit and status text.
    Regular,
    /// Reporter caption.
    Bold,
    /// Interviewee caption.
    Black,
    /// Brand token inside the reporter caption.
    Brand,
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Black,
        FontFace::Brand,
    ];

    /// CSS-style weight requested from variable fonts.
    pub fn weight(self) -> f32 {
        match self {
            FontFace::Regular => 400.0,
            FontFace::Bold => 700.0,
            FontFace::Black | FontFace::Brand => 900.0,
        }
    }

    /// Faces to try, in order, when this one has no font data.
    pub fn fallback_chain(self) -> &'static [FontFace] {
        match self {
            FontFace::Regular => &[FontFace::Regular, FontFace::Bold, FontFace::Black],
            FontFace::Bold => &[FontFace::Bold, FontFace::Black, FontFace::Regular],
            FontFace::Black => &[FontFace::Black, FontFace::Bold, FontFace::Regular],
            FontFace::Brand => &[
                FontFace::Brand,
                FontFace::Black,
                FontFace::Bold,
                FontFace::Regular,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub face: FontFace,
    pub size_px: f64,
}

impl FontSpec {
    pub fn new(face: FontFace, size_px: f64) -> Self {
        Self { face, size_px }
    }
}

/// Natural advance width of a single-line run, supplied by the rendering surface.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        (**self).measure(text, font)
    }
}

/// Font-free measurement: every character advances `em_ratio * size_px`.
///
/// Useful for hit-testing without loaded fonts and for deterministic layout tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em_ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em_ratio: 1.0 }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        text.chars().count() as f64 * font.size_px * self.em_ratio
    }
}
