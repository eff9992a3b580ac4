#![forbid(unsafe_code)]

//! Scroll-triggered reveal and lazy image loading.
//!
//! Both are driven by intersection notifications. Elements are identified by
//! their index in the node list the web layer observed.

use std::collections::HashSet;

/// Class added once a reveal target has intersected.
pub const CLASS_ANIMATE_IN: &str = "animate-in";
/// Placeholder class removed from an image once its source is swapped in.
pub const CLASS_LAZY: &str = "lazy";

/// Remembers which reveal targets already animated in.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    revealed: HashSet<usize>,
}

impl RevealTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one intersection entry. Returns `true` when `index` must gain
    /// [`CLASS_ANIMATE_IN`] now; later entries for it return `false`.
    pub fn observe(&mut self, index: usize, intersecting: bool) -> bool {
        intersecting && self.revealed.insert(index)
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}

/// How lazy images are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Swap sources as images intersect.
    Observe,
    /// No IntersectionObserver: load everything now.
    Immediate,
}

impl LoadStrategy {
    #[must_use]
    pub fn detect(observer_supported: bool) -> Self {
        if observer_supported {
            Self::Observe
        } else {
            Self::Immediate
        }
    }
}

/// Writes for one image whose real source is being loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyLoad {
    pub src: String,
    pub remove_class: Option<&'static str>,
    /// Stop observing the image afterwards.
    pub unobserve: bool,
}

/// Resolve an image's `data-src` under `strategy`.
///
/// `None` when the image has no usable `data-src`. The immediate fallback
/// only sets `src`, leaving the placeholder class in place.
#[must_use]
pub fn lazy_load(data_src: Option<&str>, strategy: LoadStrategy) -> Option<LazyLoad> {
    let src = data_src.map(str::trim).filter(|s| !s.is_empty())?;
    Some(match strategy {
        LoadStrategy::Observe => LazyLoad {
            src: src.to_owned(),
            remove_class: Some(CLASS_LAZY),
            unobserve: true,
        },
        LoadStrategy::Immediate => LazyLoad {
            src: src.to_owned(),
            remove_class: None,
            unobserve: false,
        },
    })
}
