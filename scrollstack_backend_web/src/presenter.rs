// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM style writes.
//!
//! Writes card transforms as inline CSS. Baseline styling is applied once per
//! mount by [`prepare`](Presenter::prepare); afterwards only the `transform`
//! and `filter` properties of changed cards are touched.

use alloc::format;

use scrollstack_core::backend::Presenter;
use scrollstack_core::cache::{FrameChanges, ItemArena};
use scrollstack_core::config::StackConfig;
use scrollstack_core::transform::CardTransform;
use web_sys::{CssStyleDeclaration, HtmlElement};

/// Baseline declarations applied to every card at mount.
const BASELINE: [(&str, &str); 6] = [
    ("will-change", "transform"),
    ("transform-origin", "top center"),
    ("backface-visibility", "hidden"),
    ("perspective", "1000px"),
    ("transform-style", "preserve-3d"),
    ("contain", "layout style paint"),
];

/// Applies stack output to card elements' inline styles.
#[derive(Debug, Default)]
pub struct DomPresenter {
    writes: u64,
}

impl DomPresenter {
    /// Creates a presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of property writes issued since creation.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn set(&mut self, style: &CssStyleDeclaration, property: &str, value: &str) {
        let _ = style.set_property(property, value);
        self.writes += 1;
    }
}

impl Presenter<HtmlElement> for DomPresenter {
    fn prepare(&mut self, arena: &ItemArena<HtmlElement>, config: &StackConfig) {
        let last = arena.len().saturating_sub(1);
        let margin = format!("{}px", config.item_distance);
        let identity = CardTransform::IDENTITY.css_transform();
        for (i, card) in arena.handles().enumerate() {
            let style = card.style();
            if i < last {
                self.set(&style, "margin-bottom", &margin);
            }
            for (property, value) in BASELINE {
                self.set(&style, property, value);
            }
            self.set(&style, "transform", &identity);
        }
    }

    fn apply(&mut self, arena: &ItemArena<HtmlElement>, changes: &FrameChanges) {
        for &i in &changes.transforms {
            if let Some((card, t)) = written(arena, i) {
                self.set(&card.style(), "transform", &t.css_transform());
            }
        }
        for &i in &changes.filters {
            if let Some((card, t)) = written(arena, i) {
                self.set(&card.style(), "filter", &t.css_filter());
            }
        }
    }
}

fn written(arena: &ItemArena<HtmlElement>, index: usize) -> Option<(&HtmlElement, CardTransform)> {
    let record = arena.get(index)?;
    Some((record.handle(), record.last_written()?))
}
