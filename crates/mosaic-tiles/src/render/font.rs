//! Embedded label typeface

use ab_glyph::{FontRef, InvalidFont};
use std::sync::LazyLock;

use crate::types::{MosaicError, Result, Stage};

static LABEL_FONT: LazyLock<std::result::Result<FontRef<'static>, InvalidFont>> =
    LazyLock::new(|| FontRef::try_from_slice(notosans::REGULAR_TTF));

/// Noto Sans Regular, parsed on first use
pub fn label_font() -> Result<&'static FontRef<'static>> {
    LABEL_FONT.as_ref().map_err(|e| {
        MosaicError::resource(Stage::Composite, format!("label font is unusable: {}", e))
    })
}
