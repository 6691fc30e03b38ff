//! Newscard composites broadcast "news card" stills.
//!
//! A card is a fixed 1920×1080 canvas built from a template background, two framed subject
//! photos (blurred cover-fit backdrop under a contain-fit foreground with pan and zoom),
//! stroked and shadowed captions, an optional map overlay and a photo credit.
//!
//! - Edit a [`CardState`] through an [`Editor`] (form actions and pointer drags)
//! - Load its images with an [`AssetLoader`]
//! - Build a [`CardPlan`] with [`compose_card`] and execute it on a [`RenderBackend`]
//! - Export the [`FrameRGBA`] with [`export_png`]
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod compose;
mod config;
mod editor;
mod export;
mod foundation;
mod geometry;
mod interact;
mod model;
mod place;
mod render;
mod store;
mod text;

pub use crate::foundation::core::{
    Affine, CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{NewscardError, NewscardResult, TAINTED_EXPORT_MESSAGE};

pub use crate::model::card::{
    CardState, FrameRect, INTERVIEWEE_TEXT_X_MAX, INTERVIEWEE_TEXT_X_MIN, PhotoSettings, Subject,
    TextLayout,
};
pub use crate::model::edit::{
    MAX_PHOTO_SCALE, MIN_PHOTO_SCALE, SettingField, TextField, TextLayoutField, coerce_number,
    with_setting, with_text, with_text_layout_field,
};
pub use crate::model::template::{
    DEFAULT_INTERVIEWEE_FRAME, DEFAULT_INTERVIEWEE_TEXT, DEFAULT_REPORTER_FRAME,
    DEFAULT_REPORTER_TEXT, DEFAULT_REPORTER_TITLE, TemplateKind,
};

pub use crate::geometry::hit::{
    DisplayRect, RESIZE_HANDLE_SIZE, TEXT_HIT_HEIGHT_FACTOR, canvas_point, estimated_text_height,
    handle_contains, rect_contains, text_bounds_contains,
};
pub use crate::place::fit::{PhotoPlacement, contain_size, cover_rect, cover_size, place_photo};

pub use crate::text::caption::{
    BRAND_TOKEN, Caption, CaptionSegment, CaptionStyle, SegmentRole, VOICE_ALTERED_TAG,
    VerticalAnchor, compression_for, layout_interviewee_caption, layout_reporter_caption,
    reporter_display_name, reporter_text, split_brand,
};
pub use crate::text::engine::{FontConfig, ShapedText, TextEngine};
pub use crate::text::font::{FixedAdvance, FontFace, FontSpec, TextMeasure};

pub use crate::interact::drag::{DragMachine, DragState, DragTarget, MIN_FRAME_SIDE, hit_target};

pub use crate::compose::card::{LOAD_FAILED_TEXT, LOADING_TEXT, PLACEHOLDER_COLOR, compose_card};
pub use crate::compose::plan::{
    CardPlan, DrawOp, ImageFilter, ImageOp, LayerKind, PlannedOp, Shadow, TextAlign, TextOp,
    TextPaint,
};

pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::render_card;

pub use crate::assets::decode::{
    ImageOrigin, LoadedImage, MAX_IMAGE_DIM, decode_image, rasterize_svg,
};
pub use crate::assets::loader::{AssetLoader, ImageLookup, ImageStatus, LoadEvent, LoadPhase};
pub use crate::assets::source::{
    DefaultFetcher, FetchedBytes, SourceFetcher, SourceKind, decode_data_url, encode_data_url,
    short_source,
};

pub use crate::catalog::maps::{MapCatalog, MapEntry};
pub use crate::config::RenderConfig;
pub use crate::editor::session::{Editor, ReporterPreset, needs_welcome};
pub use crate::export::png::{default_filename, encode_png, export_png, sanitize_filename};
pub use crate::store::kv::{
    BACKGROUND_KEY, BACKGROUND_MAX_CHARS, DirStore, KeyValueStore, MemoryStore,
};
