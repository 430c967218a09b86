//! The process-wide global scope.
//!
//! Builtins plus a prelude of definitions every node schema may refer to.
//! It is built once, on first use, and shared read-only afterwards; user
//! definitions are layered on top with [`ScopeBuilder::child_of`].

use std::sync::OnceLock;

use navi_eval::{builtins, EvalError, Scope, ScopeBuilder};
use navi_ir::SharedInterner;
use navi_parse::{parse_definitions, ParseError};
use thiserror::Error;

/// Definitions shared by every node schema.
pub const PRELUDE: &str = r#"
// Core
struct null;
struct true;
struct false;
let bool = true | false;

def bool::not(a: bool) = match a { true => false, false => true };
def bool::and(a: bool, b: bool) = match a { false => false, true => b };
def bool::or(a: bool, b: bool) = match a { true => true, false => b };

let uint = int(0..inf);

// Images
struct Image { width: uint, height: uint, channels: int(1..inf) }
struct Color { channels: int(1..inf) }
struct Directory { path: string }

let ImageExtension = "png" | "jpg" | "jpeg" | "webp" | "tiff" | "bmp" | "gif" | "tga" | "dds";
let ColorSpace = "Gray" | "RGB" | "RGBA" | "HSV" | "HSL" | "LAB";

def color_space::channels(space: ColorSpace) = match space { "Gray" => 1, "RGBA" => 4, _ => 3 };

def image::with_channels(image: Image, channels: int(1..inf)) =
    Image { width: image.width, height: image.height, channels: channels };
def image::resize(image: Image, width: uint, height: uint) =
    Image { width: width, height: height, channels: image.channels };
def image::upscale(image: Image, scale: int(1..inf)) =
    Image {
        width: number::mul(image.width, scale),
        height: number::mul(image.height, scale),
        channels: image.channels,
    };
def image::pad(image: Image, amount: uint) =
    Image {
        width: number::add(image.width, number::mul(amount, 2)),
        height: number::add(image.height, number::mul(amount, 2)),
        channels: image.channels,
    };
def image::convert(image: Image, space: ColorSpace) =
    image::with_channels(image, color_space::channels(space));
def image::file_name(name: string, extension: ImageExtension) =
    string::concat(string::concat(name, "."), extension);
def image::is_gray(image: Image) = match image.channels { 1 => true, _ => false };
"#;

/// The global scope could not be assembled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PreludeError {
    #[error("prelude does not parse: {0}")]
    Parse(#[from] ParseError),
    #[error("prelude is inconsistent: {0}")]
    Definition(#[from] EvalError),
}

/// Build a fresh global scope with its own interner.
pub fn build_global_scope() -> Result<Scope, PreludeError> {
    let interner = SharedInterner::new();
    let items = parse_definitions(PRELUDE, &interner)?;
    let mut builder = ScopeBuilder::new(interner);
    builtins::register(&mut builder)?;
    builder.add_items(items)?;
    Ok(builder.build())
}

/// The global scope, built on first call.
pub fn global_scope() -> Result<&'static Scope, PreludeError> {
    static GLOBAL: OnceLock<Result<Scope, PreludeError>> = OnceLock::new();
    GLOBAL
        .get_or_init(|| {
            let scope = build_global_scope();
            tracing::debug!(ok = scope.is_ok(), "built global scope");
            scope
        })
        .as_ref()
        .map_err(Clone::clone)
}
