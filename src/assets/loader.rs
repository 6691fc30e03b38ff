use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::assets::decode::{LoadedImage, decode_image};
use crate::assets::source::{DefaultFetcher, SourceFetcher, short_source};
use crate::foundation::error::NewscardResult;
use crate::model::card::CardState;

/// Lifecycle of one image source. A failed first attempt is retried exactly once.
#[derive(Clone, Debug)]
pub enum LoadPhase {
    Loading,
    Loaded(Arc<LoadedImage>),
    Failed,
    Retrying,
    FailedFinal,
}

/// What the compositor sees for a source.
#[derive(Clone, Debug)]
pub enum ImageStatus {
    Pending,
    Loaded(Arc<LoadedImage>),
    Failed,
}

impl ImageStatus {
    pub fn loaded(&self) -> Option<&Arc<LoadedImage>> {
        match self {
            ImageStatus::Loaded(img) => Some(img),
            _ => None,
        }
    }
}

impl From<&LoadPhase> for ImageStatus {
    fn from(phase: &LoadPhase) -> Self {
        match phase {
            LoadPhase::Loaded(img) => ImageStatus::Loaded(img.clone()),
            LoadPhase::FailedFinal => ImageStatus::Failed,
            LoadPhase::Loading | LoadPhase::Failed | LoadPhase::Retrying => ImageStatus::Pending,
        }
    }
}

/// A status transition; each one should trigger a re-render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded(String),
    /// First attempt failed; a retry is queued.
    Failed(String),
    FailedFinal(String),
}

/// Read access to image statuses by source string.
pub trait ImageLookup {
    fn status(&self, source: &str) -> ImageStatus;
}

impl ImageLookup for HashMap<String, ImageStatus> {
    fn status(&self, source: &str) -> ImageStatus {
        self.get(source).cloned().unwrap_or(ImageStatus::Pending)
    }
}

impl<L: ImageLookup + ?Sized> ImageLookup for &L {
    fn status(&self, source: &str) -> ImageStatus {
        (**self).status(source)
    }
}

/// Loads each distinct source once, with one automatic retry.
///
/// Work happens in [`AssetLoader::pump`]: every call advances each queued source by one
/// attempt and reports the transitions.
pub struct AssetLoader<F = DefaultFetcher> {
    fetcher: F,
    entries: HashMap<String, LoadPhase>,
    queue: VecDeque<String>,
}

impl AssetLoader<DefaultFetcher> {
    pub fn with_default_fetcher() -> NewscardResult<Self> {
        Ok(Self::new(DefaultFetcher::new()?))
    }
}

impl<F: SourceFetcher> AssetLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Queue `source` unless it is already known. Returns whether it was new.
    pub fn request(&mut self, source: &str) -> bool {
        if source.is_empty() || self.entries.contains_key(source) {
            return false;
        }
        tracing::debug!(source = %short_source(source), "image requested");
        self.entries.insert(source.to_string(), LoadPhase::Loading);
        self.queue.push_back(source.to_string());
        true
    }

    pub fn phase(&self, source: &str) -> Option<&LoadPhase> {
        self.entries.get(source)
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Forget sources the card no longer references. In-flight results for them are dropped.
    pub fn retain<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = keep.into_iter().collect();
        self.entries.retain(|k, _| keep.contains(k.as_str()));
        self.queue.retain(|k| keep.contains(k.as_str()));
    }

    /// Request every source `card` references and drop the rest.
    pub fn sync(&mut self, card: &CardState) {
        let sources = card.image_sources();
        for src in &sources {
            self.request(src);
        }
        self.retain(sources);
    }

    /// Run one attempt for every queued source.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        let batch: Vec<String> = self.queue.drain(..).collect();
        let mut events = Vec::with_capacity(batch.len());
        for source in batch {
            let retry = match self.entries.get(&source) {
                Some(LoadPhase::Loading) => false,
                Some(LoadPhase::Failed) => true,
                _ => continue,
            };
            if retry {
                self.entries.insert(source.clone(), LoadPhase::Retrying);
            }

            let outcome = self
                .fetcher
                .fetch(&source)
                .and_then(|f| decode_image(&f.bytes, f.origin));

            match outcome {
                Ok(img) => {
                    tracing::debug!(
                        source = %short_source(&source),
                        width = img.width,
                        height = img.height,
                        "image loaded"
                    );
                    self.entries
                        .insert(source.clone(), LoadPhase::Loaded(Arc::new(img)));
                    events.push(LoadEvent::Loaded(source));
                }
                Err(err) if !retry => {
                    tracing::debug!(source = %short_source(&source), %err, "image load failed, retrying");
                    self.entries.insert(source.clone(), LoadPhase::Failed);
                    self.queue.push_back(source.clone());
                    events.push(LoadEvent::Failed(source));
                }
                Err(err) => {
                    tracing::warn!(source = %short_source(&source), %err, "image load failed");
                    self.entries.insert(source.clone(), LoadPhase::FailedFinal);
                    events.push(LoadEvent::FailedFinal(source));
                }
            }
        }
        events
    }

    /// Pump until nothing is queued.
    pub fn load_all(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while self.has_pending() {
            events.extend(self.pump());
        }
        events
    }
}

impl<F> ImageLookup for AssetLoader<F> {
    fn status(&self, source: &str) -> ImageStatus {
        self.entries
            .get(source)
            .map(ImageStatus::from)
            .unwrap_or(ImageStatus::Pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
