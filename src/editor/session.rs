//! One editing session: the card, its template choice, the drag machine and the image loads.
//!
//! Every action replaces the [`CardState`] wholesale and then re-syncs the loader with the
//! sources the new card references, so callers only ever re-render after an action or a
//! [`Editor::pump`] that reported transitions.

use crate::assets::loader::{AssetLoader, ImageLookup, LoadEvent};
use crate::assets::source::{DefaultFetcher, SourceFetcher};
use crate::foundation::core::{CANVAS_HEIGHT, CANVAS_WIDTH, Point};
use crate::foundation::error::NewscardResult;
use crate::geometry::hit::{DisplayRect, canvas_point};
use crate::interact::drag::{DragMachine, DragTarget};
use crate::model::card::{CardState, Subject};
use crate::model::edit::{
    SettingField, TextField, TextLayoutField, with_setting, with_text, with_text_layout_field,
};
use crate::model::template::TemplateKind;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::pipeline::render_card;
use crate::store::kv::{BACKGROUND_KEY, BACKGROUND_MAX_CHARS, KeyValueStore};
use crate::text::font::TextMeasure;

/// Quick-fill values for the reporter caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReporterPreset {
    /// "TVBS 新聞中心"
    NewsCenter,
    /// "TVBS 採訪中心"
    NewsDesk,
    /// Plain "記者" with the name cleared.
    Reporter,
}

impl ReporterPreset {
    pub fn title_and_name(self) -> (&'static str, &'static str) {
        match self {
            ReporterPreset::NewsCenter => ("TVBS", "新聞中心"),
            ReporterPreset::NewsDesk => ("TVBS", "採訪中心"),
            ReporterPreset::Reporter => ("記者", ""),
        }
    }
}

/// First-run gate: shown while no uploaded background is persisted.
pub fn needs_welcome(store: &dyn KeyValueStore) -> bool {
    match store.get(BACKGROUND_KEY) {
        Ok(saved) => saved.is_none(),
        Err(err) => {
            tracing::warn!(%err, "could not read persisted background");
            true
        }
    }
}

pub struct Editor<F = DefaultFetcher> {
    state: CardState,
    kind: TemplateKind,
    drag: DragMachine,
    loader: AssetLoader<F>,
    show_welcome: bool,
}

impl<F: SourceFetcher> Editor<F> {
    /// Start a session on `kind`'s defaults. The welcome gate opens when `store` has no
    /// persisted background.
    pub fn new(kind: TemplateKind, loader: AssetLoader<F>, store: &dyn KeyValueStore) -> Self {
        let mut editor = Self {
            state: CardState::defaults(kind),
            kind,
            drag: DragMachine::new(),
            loader,
            show_welcome: needs_welcome(store),
        };
        editor.loader.sync(&editor.state);
        editor
    }

    /// Resume from a saved card, e.g. one read from JSON.
    pub fn from_state(state: CardState, kind: TemplateKind, loader: AssetLoader<F>) -> Self {
        let mut editor = Self {
            state,
            kind,
            drag: DragMachine::new(),
            loader,
            show_welcome: false,
        };
        editor.loader.sync(&editor.state);
        editor
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn show_welcome(&self) -> bool {
        self.show_welcome
    }

    /// Re-open the template picker.
    pub fn open_welcome(&mut self) {
        self.show_welcome = true;
    }

    pub fn drag(&self) -> &DragMachine {
        &self.drag
    }

    pub fn images(&self) -> &AssetLoader<F> {
        &self.loader
    }

    fn replace(&mut self, next: CardState) {
        self.state = next;
        self.loader.sync(&self.state);
    }

    /// Switch template kind; every user edit is kept.
    pub fn select_template(&mut self, kind: TemplateKind) {
        self.kind = kind;
        let next = self.state.with_template(kind);
        self.replace(next);
    }

    pub fn set_transparent(&mut self, on: bool) {
        let next = CardState {
            is_transparent_mode: on,
            ..self.state.clone()
        };
        self.replace(next);
    }

    pub fn set_voice_altered(&mut self, on: bool) {
        let next = CardState {
            is_voice_altered: on,
            ..self.state.clone()
        };
        self.replace(next);
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let next = with_text(&self.state, field, value);
        self.replace(next);
    }

    pub fn apply_reporter_preset(&mut self, preset: ReporterPreset) {
        let (title, name) = preset.title_and_name();
        let next = with_text(&self.state, TextField::ReporterTitle, title);
        let next = with_text(&next, TextField::ReporterName, name);
        self.replace(next);
    }

    /// Replace (or clear) a subject photo. Pan and zoom reset to identity.
    pub fn set_photo(&mut self, subject: Subject, source: Option<String>) {
        let next = self.state.with_photo(subject, source);
        self.replace(next);
    }

    pub fn set_setting(&mut self, subject: Subject, field: SettingField, value: f64) {
        let next = with_setting(&self.state, subject, field, value);
        self.replace(next);
    }

    pub fn set_text_layout_field(&mut self, subject: Subject, field: TextLayoutField, raw: &str) {
        let next = with_text_layout_field(&self.state, subject, field, raw);
        self.replace(next);
    }

    pub fn set_map(&mut self, url: Option<String>) {
        let next = CardState {
            map_image: url,
            ..self.state.clone()
        };
        self.replace(next);
    }

    /// Fresh defaults for `kind` with transparency off.
    pub fn reset(&mut self, kind: TemplateKind) {
        self.drag.pointer_up();
        self.kind = kind;
        self.replace(CardState::defaults(kind));
    }

    /// Forget the persisted background and reset to the current kind.
    pub fn clear_all(&mut self, store: &mut dyn KeyValueStore) -> NewscardResult<()> {
        store.remove(BACKGROUND_KEY)?;
        self.reset(self.kind);
        Ok(())
    }

    /// Welcome-gate choice of a built-in template.
    pub fn choose_welcome(&mut self, kind: TemplateKind) {
        self.reset(kind);
        self.show_welcome = false;
    }

    /// Use an uploaded image as both template layers. The upload is persisted when it fits;
    /// storage failures are logged and otherwise ignored.
    pub fn upload_template(&mut self, data_url: &str, store: &mut dyn KeyValueStore) {
        let next = CardState {
            solid_template: data_url.to_string(),
            transparent_template: data_url.to_string(),
            ..self.state.clone()
        };
        self.replace(next);
        match store.set(BACKGROUND_KEY, data_url, BACKGROUND_MAX_CHARS) {
            Ok(true) => tracing::debug!("persisted uploaded template"),
            Ok(false) => tracing::debug!("uploaded template too large to persist"),
            Err(err) => tracing::warn!(%err, "could not persist uploaded template"),
        }
        self.show_welcome = false;
    }

    /// Pointer pressed at client coordinates over a canvas displayed at `display`.
    pub fn pointer_down(
        &mut self,
        client: Point,
        display: DisplayRect,
        measure: &mut dyn TextMeasure,
    ) -> Option<DragTarget> {
        let point = to_canvas(client, display);
        self.drag.pointer_down(&self.state, point, measure)
    }

    /// Start an explicit frame move or resize at client coordinates.
    pub fn begin_frame_drag(
        &mut self,
        subject: Subject,
        client: Point,
        display: DisplayRect,
    ) -> Option<DragTarget> {
        let point = to_canvas(client, display);
        self.drag.begin_frame_drag(&self.state, subject, point)
    }

    /// Apply a drag move. Returns whether the card changed.
    pub fn pointer_move(&mut self, client: Point, display: DisplayRect) -> bool {
        let point = to_canvas(client, display);
        match self.drag.pointer_move(&self.state, point) {
            Some(next) if next != self.state => {
                self.replace(next);
                true
            }
            _ => false,
        }
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    /// Advance pending image loads by one attempt each.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        self.loader.pump()
    }

    pub fn load_all(&mut self) -> Vec<LoadEvent> {
        self.loader.load_all()
    }

    pub fn render(&self, backend: &mut dyn RenderBackend) -> NewscardResult<FrameRGBA> {
        render_card(&self.state, &self.loader as &dyn ImageLookup, backend)
    }
}

fn to_canvas(client: Point, display: DisplayRect) -> Point {
    canvas_point(
        client.x,
        client.y,
        display,
        f64::from(CANVAS_WIDTH),
        f64::from(CANVAS_HEIGHT),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
