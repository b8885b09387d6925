// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a stack of cards in a smoothed scroll container.
//!
//! Builds a full-height scroll container with six cards and a trailing
//! spacer, then mounts a [`ScrollStack`] over it with rotation and blur
//! enabled. Trace output goes to the browser console through a
//! [`ConsoleSink`].
//!
//! Build with: `wasm-pack build --target web demos/web_stack`
//!
//! Then serve `demos/web_stack/` and open `index.html` in a browser.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use scrollstack_backend_web::{ConsoleSink, ScrollStack};
use scrollstack_core::config::{Length, StackConfig};

const CARD_COUNT: usize = 6;

const CARD_COLORS: [&str; CARD_COUNT] = [
    "#f44336", "#4caf50", "#2196f3", "#ffc107", "#9c27b0", "#00bcd4",
];

fn create_element(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element(tag)?.dyn_into()?;
    el.set_class_name(class);
    Ok(el)
}

fn set_styles(el: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = el.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

fn build_page(document: &Document) -> Result<HtmlElement, JsValue> {
    let container = create_element(document, "div", "scroll-stack-container")?;
    set_styles(
        &container,
        &[
            ("position", "relative"),
            ("height", "100vh"),
            ("overflow-y", "auto"),
            ("overflow-x", "hidden"),
        ],
    )?;

    let inner = create_element(document, "div", "scroll-stack-inner")?;
    set_styles(
        &inner,
        &[
            ("padding", "20vh 5rem 50rem"),
            ("min-height", "100vh"),
        ],
    )?;
    container.append_child(&inner)?;

    for (i, color) in CARD_COLORS.iter().enumerate() {
        let card = create_element(document, "div", "scroll-stack-card")?;
        set_styles(
            &card,
            &[
                ("position", "relative"),
                ("height", "20rem"),
                ("margin", "30px 0"),
                ("padding", "3rem"),
                ("border-radius", "40px"),
                ("box-sizing", "border-box"),
                ("background", color),
                ("color", "white"),
                ("font-size", "2rem"),
            ],
        )?;
        card.set_text_content(Some(&format!("Card {}", i + 1)));
        inner.append_child(&card)?;
    }

    let end = create_element(document, "div", "scroll-stack-end")?;
    set_styles(&end, &[("width", "100%"), ("height", "1px")])?;
    inner.append_child(&end)?;

    Ok(container)
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().expect("no global window");
    let document = window.document().expect("no document");

    let container = build_page(&document)?;
    document.body().expect("no body").append_child(&container)?;

    let config = StackConfig::DEFAULT
        .with_item_distance(100.0)
        .with_item_stack_distance(30.0)
        .with_stack_position(Length::Percent(20.0))
        .with_rotation_amount(0.5)
        .with_blur_amount(1.0);

    let stack = ScrollStack::new(container, config)?;
    stack.set_trace_sink(Box::new(ConsoleSink::new()));
    stack.set_on_stack_complete(|| {
        web_sys::console::log_1(&JsValue::from_str("stack complete"));
    });
    stack.mount()?;

    // The stack lives for the page's lifetime.
    core::mem::forget(stack);
    Ok(())
}
