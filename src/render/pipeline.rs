use crate::{
    assets::loader::ImageLookup,
    compose::card::compose_card,
    foundation::error::NewscardResult,
    model::card::CardState,
    render::backend::{FrameRGBA, RenderBackend},
};

/// Compose + render one card.
///
/// Pipeline:
/// 1. [`compose_card`](crate::compose_card), measuring text with the backend's own engine
/// 2. [`RenderBackend::render_plan`](crate::RenderBackend::render_plan)
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels at the card resolution.
#[tracing::instrument(level = "debug", skip_all)]
pub fn render_card(
    card: &CardState,
    images: &dyn ImageLookup,
    backend: &mut dyn RenderBackend,
) -> NewscardResult<FrameRGBA> {
    let plan = compose_card(card, images, backend.text_measure());
    backend.render_plan(&plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
