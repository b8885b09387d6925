// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JavaScript options objects.
//!
//! The JS entry point takes a plain object with camelCase keys
//! (`itemDistance`, `stackPosition`, ...). [`read_options`] pulls each known
//! key off the object with `Reflect` and hands them to [`resolve_options`],
//! which is plain Rust and does the actual validation. Unknown keys and
//! `undefined`/`null` values are ignored so partial option objects keep the
//! defaults.
//!
//! Reading options never fails. A value that cannot be used leaves that
//! option at its default and is reported as an [`OptionError`] warning.
//! Length strings with a unit other than `px` or `%` keep their leading
//! number (`"20vh"` reads as `20px`).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use js_sys::{Function, Reflect};
use scrollstack_core::config::{Length, LengthParseError, ScrollMode, StackConfig};
use wasm_bindgen::{JsCast as _, JsValue};

/// Option keys understood by [`apply_option`], in the order they are read.
pub const OPTION_KEYS: [&str; 10] = [
    "itemDistance",
    "itemScale",
    "itemStackDistance",
    "stackPosition",
    "scaleEndPosition",
    "baseScale",
    "scaleDuration",
    "rotationAmount",
    "blurAmount",
    "useWindowScroll",
];

/// A JS value reduced to the shapes options can take.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    /// A number.
    Number(f64),
    /// A string, e.g. `"20%"`.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// Anything else (objects, functions, symbols).
    Other,
}

impl OptionValue {
    /// Classifies `value`, returning `None` for `undefined` and `null`.
    #[must_use]
    pub fn from_js(value: &JsValue) -> Option<Self> {
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(if let Some(n) = value.as_f64() {
            Self::Number(n)
        } else if let Some(s) = value.as_string() {
            Self::Text(s)
        } else if let Some(b) = value.as_bool() {
            Self::Bool(b)
        } else {
            Self::Other
        })
    }
}

/// Error returned when an option has the wrong shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionError {
    /// The value has a type the key does not accept.
    WrongType {
        /// The offending key.
        key: &'static str,
        /// What the key accepts.
        expected: &'static str,
    },
    /// A number was NaN or infinite.
    NotFinite {
        /// The offending key.
        key: &'static str,
    },
    /// A length string failed to parse.
    InvalidLength {
        /// The offending key.
        key: &'static str,
        /// The parse failure.
        error: LengthParseError,
    },
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType { key, expected } => write!(f, "option `{key}` must be {expected}"),
            Self::NotFinite { key } => write!(f, "option `{key}` must be a finite number"),
            Self::InvalidLength { key, error } => write!(f, "option `{key}`: {error}"),
        }
    }
}

impl core::error::Error for OptionError {}

fn number(key: &'static str, value: &OptionValue) -> Result<f64, OptionError> {
    match *value {
        OptionValue::Number(n) if n.is_finite() => Ok(n),
        OptionValue::Number(_) => Err(OptionError::NotFinite { key }),
        _ => Err(OptionError::WrongType {
            key,
            expected: "a number",
        }),
    }
}

fn length(key: &'static str, value: &OptionValue) -> Result<Length, OptionError> {
    match value {
        OptionValue::Text(s) => Length::parse(s).or_else(|error| {
            Length::parse_prefix(s).ok_or(OptionError::InvalidLength { key, error })
        }),
        OptionValue::Number(_) => number(key, value).map(Length::Px),
        _ => Err(OptionError::WrongType {
            key,
            expected: "a number or a length string",
        }),
    }
}

/// Applies one option to `config`.
///
/// Returns `Ok(false)` for keys that are not recognized.
pub fn apply_option(
    config: &mut StackConfig,
    key: &str,
    value: &OptionValue,
) -> Result<bool, OptionError> {
    match key {
        "itemDistance" => config.item_distance = number("itemDistance", value)?,
        "itemScale" => config.item_scale = number("itemScale", value)?,
        "itemStackDistance" => config.item_stack_distance = number("itemStackDistance", value)?,
        "stackPosition" => config.stack_position = length("stackPosition", value)?,
        "scaleEndPosition" => config.scale_end_position = length("scaleEndPosition", value)?,
        "baseScale" => config.base_scale = number("baseScale", value)?,
        "scaleDuration" => config.scale_duration = number("scaleDuration", value)?,
        "rotationAmount" => config.rotation_amount = number("rotationAmount", value)?,
        "blurAmount" => config.blur_amount = number("blurAmount", value)?,
        "useWindowScroll" => {
            let OptionValue::Bool(window) = *value else {
                return Err(OptionError::WrongType {
                    key: "useWindowScroll",
                    expected: "a boolean",
                });
            };
            config.scroll_mode = if window {
                ScrollMode::Window
            } else {
                ScrollMode::Wrapped
            };
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Applies `entries` on top of [`StackConfig::DEFAULT`].
///
/// Options that fail to apply keep their default; their errors are
/// returned alongside the configuration.
pub fn resolve_options<'a>(
    entries: impl IntoIterator<Item = (&'a str, OptionValue)>,
) -> (StackConfig, Vec<OptionError>) {
    let mut config = StackConfig::DEFAULT;
    let mut warnings = Vec::new();
    for (key, value) in entries {
        if let Err(error) = apply_option(&mut config, key, &value) {
            warnings.push(error);
        }
    }
    (config, warnings)
}

/// A parsed options object.
#[derive(Debug, Default)]
pub struct StackOptions {
    /// The resolved configuration.
    pub config: StackConfig,
    /// The `onStackComplete` callback, if one was given.
    pub on_stack_complete: Option<Function>,
    /// Options that were ignored.
    pub warnings: Vec<OptionError>,
}

impl StackOptions {
    /// Logs every warning with `console.warn`.
    pub fn report_warnings(&self) {
        for warning in &self.warnings {
            web_sys::console::warn_1(&JsValue::from_str(&alloc::format!(
                "[scrollstack] {warning}; using the default"
            )));
        }
    }
}

fn get(options: &JsValue, key: &str) -> JsValue {
    Reflect::get(options, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Reads a JS options object on top of [`StackConfig::DEFAULT`].
///
/// `undefined`, `null`, and non-objects yield the defaults.
pub fn read_options(options: &JsValue) -> StackOptions {
    if !options.is_object() {
        return StackOptions::default();
    }
    let entries = OPTION_KEYS
        .into_iter()
        .filter_map(|key| Some((key, OptionValue::from_js(&get(options, key))?)));
    let (config, mut warnings) = resolve_options(entries);

    let callback = get(options, "onStackComplete");
    let on_stack_complete = if callback.is_undefined() || callback.is_null() {
        None
    } else if let Some(function) = callback.dyn_ref::<Function>() {
        Some(function.clone())
    } else {
        warnings.push(OptionError::WrongType {
            key: "onStackComplete",
            expected: "a function",
        });
        None
    };

    StackOptions {
        config,
        on_stack_complete,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn numbers_and_lengths_apply() {
        let mut c = StackConfig::DEFAULT;
        assert_eq!(
            apply_option(&mut c, "itemStackDistance", &OptionValue::Number(40.0)),
            Ok(true)
        );
        assert_eq!(
            apply_option(&mut c, "stackPosition", &OptionValue::Text("30%".into())),
            Ok(true)
        );
        assert_eq!(
            apply_option(&mut c, "scaleEndPosition", &OptionValue::Number(120.0)),
            Ok(true)
        );
        assert_eq!(c.item_stack_distance, 40.0);
        assert_eq!(c.stack_position, Length::Percent(30.0));
        assert_eq!(c.scale_end_position, Length::Px(120.0));
    }

    #[test]
    fn window_scroll_flag_selects_mode() {
        let mut c = StackConfig::DEFAULT;
        apply_option(&mut c, "useWindowScroll", &OptionValue::Bool(true)).unwrap();
        assert!(c.uses_window_scroll());
        apply_option(&mut c, "useWindowScroll", &OptionValue::Bool(false)).unwrap();
        assert_eq!(c.scroll_mode, ScrollMode::Wrapped);
    }

    #[test]
    fn unknown_keys_are_reported_not_rejected() {
        let mut c = StackConfig::DEFAULT;
        assert_eq!(
            apply_option(&mut c, "lerp", &OptionValue::Number(0.1)),
            Ok(false)
        );
        assert_eq!(c, StackConfig::DEFAULT, "unknown keys leave config alone");
    }

    #[test]
    fn bad_values_are_typed_errors() {
        let mut c = StackConfig::DEFAULT;
        assert_eq!(
            apply_option(&mut c, "baseScale", &OptionValue::Text("big".into())),
            Err(OptionError::WrongType {
                key: "baseScale",
                expected: "a number",
            })
        );
        assert_eq!(
            apply_option(&mut c, "blurAmount", &OptionValue::Number(f64::NAN)),
            Err(OptionError::NotFinite { key: "blurAmount" })
        );
        assert_eq!(
            apply_option(&mut c, "stackPosition", &OptionValue::Text("%".into())),
            Err(OptionError::InvalidLength {
                key: "stackPosition",
                error: LengthParseError::Empty,
            })
        );
        assert_eq!(c, StackConfig::DEFAULT, "failed options change nothing");
        assert_eq!(
            OptionError::NotFinite { key: "blurAmount" }.to_string(),
            "option `blurAmount` must be a finite number"
        );
    }

    #[test]
    fn unit_lengths_keep_their_number() {
        let mut c = StackConfig::DEFAULT;
        apply_option(&mut c, "stackPosition", &OptionValue::Text("20vh".into())).unwrap();
        apply_option(&mut c, "scaleEndPosition", &OptionValue::Text("10rem".into())).unwrap();
        assert_eq!(c.stack_position, Length::Px(20.0));
        assert_eq!(c.scale_end_position, Length::Px(10.0));
    }

    #[test]
    fn unusable_options_fall_back_to_defaults() {
        let (config, warnings) = resolve_options([
            ("stackPosition", OptionValue::Text("calc(20%)".into())),
            ("scaleEndPosition", OptionValue::Text("1e400".into())),
            ("itemStackDistance", OptionValue::Number(45.0)),
            ("blurAmount", OptionValue::Number(f64::INFINITY)),
            ("useWindowScroll", OptionValue::Text("yes".into())),
        ]);
        assert_eq!(config.stack_position, StackConfig::DEFAULT.stack_position);
        assert_eq!(
            config.scale_end_position,
            StackConfig::DEFAULT.scale_end_position
        );
        assert_eq!(config.blur_amount, 0.0);
        assert!(!config.uses_window_scroll());
        assert_eq!(config.item_stack_distance, 45.0, "good options still apply");
        assert_eq!(warnings.len(), 4, "one warning per unusable option");
        assert_eq!(
            warnings[0],
            OptionError::InvalidLength {
                key: "stackPosition",
                error: LengthParseError::InvalidNumber,
            }
        );
    }

    #[test]
    fn unit_strings_resolve_without_warnings() {
        let (config, warnings) = resolve_options([
            ("stackPosition", OptionValue::Text("20vh".into())),
            ("scaleEndPosition", OptionValue::Text("15%".into())),
        ]);
        assert!(warnings.is_empty(), "got: {warnings:?}");
        assert_eq!(config.stack_position, Length::Px(20.0));
        assert_eq!(config.scale_end_position, Length::Percent(15.0));
    }
}
