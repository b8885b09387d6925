// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JavaScript entry point.
//!
//! ```js
//! const stack = new ScrollStack(container, {
//!   itemStackDistance: 30,
//!   stackPosition: "20%",
//!   onStackComplete: () => console.log("done"),
//! });
//! // later
//! stack.unmount();
//! ```

use js_sys::Function;
use scrollstack_core::completion::CompletionState;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::options::{StackOptions, read_options};
use crate::stack::ScrollStack;

/// A scroll stack mounted on construction.
#[wasm_bindgen(js_name = ScrollStack)]
#[derive(Debug)]
pub struct JsScrollStack {
    inner: ScrollStack,
}

fn install_callback(stack: &ScrollStack, callback: Option<Function>) {
    match callback {
        Some(function) => stack.set_on_stack_complete(move || {
            let _ = function.call0(&JsValue::NULL);
        }),
        None => stack.set_on_stack_complete(|| {}),
    }
}

#[wasm_bindgen(js_class = ScrollStack)]
impl JsScrollStack {
    /// Creates and mounts a stack over the cards of `container`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: JsValue) -> Result<Self, JsValue> {
        let options = read_options(&options);
        options.report_warnings();
        let StackOptions {
            config,
            on_stack_complete,
            ..
        } = options;
        let inner = ScrollStack::new(container, config)?;
        install_callback(&inner, on_stack_complete);
        inner.mount()?;
        Ok(Self { inner })
    }

    /// Replaces the options and remounts.
    pub fn reconfigure(&self, options: JsValue) -> Result<(), JsValue> {
        let options = read_options(&options);
        options.report_warnings();
        let StackOptions {
            config,
            on_stack_complete,
            ..
        } = options;
        install_callback(&self.inner, on_stack_complete);
        self.inner.reconfigure(config)
    }

    /// Scrolls the stack's scroll source to `y`.
    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, y: f64, immediate: Option<bool>) {
        self.inner.scroll_to(y, immediate.unwrap_or(false));
    }

    /// Tears the stack down. Idempotent.
    pub fn unmount(&self) {
        self.inner.unmount();
    }

    /// Mounts again after [`unmount`](Self::unmount).
    pub fn mount(&self) -> Result<(), JsValue> {
        self.inner.mount().map(|_| ())
    }

    /// Whether the stack is mounted.
    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Whether the last card is currently pinned in its completion window.
    #[wasm_bindgen(getter, js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.inner.completion_state() == CompletionState::Completed
    }
}
