use crate::{
    compose::plan::CardPlan,
    foundation::error::NewscardResult,
    text::engine::TextEngine,
    text::font::TextMeasure,
};

/// A rendered card as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
    /// Pixels from a cross-origin image without CORS approval were drawn.
    pub tainted: bool,
}

/// Executes a [`CardPlan`] and owns the text shaping the plan was measured with.
pub trait RenderBackend {
    fn render_plan(&mut self, plan: &CardPlan) -> NewscardResult<FrameRGBA>;

    /// Measurement source to compose plans with, so layout and drawing agree.
    fn text_measure(&mut self) -> &mut dyn TextMeasure;
}

#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    Cpu,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the surface is cleared to this straight RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
    text: TextEngine,
) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new(settings.clone(), text)),
    }
}
