//! Display region model shared by the modes and the board renderer.
//!
//! A mode owns a handful of named text regions. It creates them when it is
//! entered, updates their text and style while active, and removes them on
//! exit. The sink is presentation only: a missing or failing display never
//! changes what the modes do.

use heapless::String;

pub const DISPLAY_WIDTH: i16 = 128;
pub const DISPLAY_HEIGHT: i16 = 64;
pub const LABEL_BYTES: usize = 16;

pub type RegionId = &'static str;
pub type LabelText = String<LABEL_BYTES>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextColor {
    Bright,
    Dim,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// Which point of the text box sits on the region position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Anchor {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Anchor {
    pub const LEFT_MIDDLE: Self = Self::new(Align::Start, Align::Center);
    pub const CENTER: Self = Self::new(Align::Center, Align::Center);
    pub const RIGHT_MIDDLE: Self = Self::new(Align::End, Align::Center);
    pub const TOP_CENTER: Self = Self::new(Align::Center, Align::Start);
    pub const BOTTOM_LEFT: Self = Self::new(Align::Start, Align::End);
    pub const BOTTOM_RIGHT: Self = Self::new(Align::End, Align::End);

    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextRegion {
    pub text: LabelText,
    pub color: TextColor,
    /// Integer glyph magnification, `1` is the base font.
    pub scale: u8,
    pub anchor: Anchor,
    pub x: i16,
    pub y: i16,
    pub hidden: bool,
}

impl TextRegion {
    pub fn new(text: &str, color: TextColor, scale: u8, anchor: Anchor, x: i16, y: i16) -> Self {
        Self {
            text: label_text(text),
            color,
            scale: scale.max(1),
            anchor,
            x,
            y,
            hidden: false,
        }
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Receiver of region updates. Unknown ids are ignored.
pub trait DisplaySink {
    /// Creates `id`, replacing any region already registered under it.
    fn create_region(&mut self, id: RegionId, region: TextRegion);
    fn set_text(&mut self, id: RegionId, text: &str);
    fn set_style(&mut self, id: RegionId, color: TextColor, scale: u8);
    fn set_hidden(&mut self, id: RegionId, hidden: bool);
    fn remove_region(&mut self, id: RegionId);
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn create_region(&mut self, id: RegionId, region: TextRegion) {
        (**self).create_region(id, region);
    }

    fn set_text(&mut self, id: RegionId, text: &str) {
        (**self).set_text(id, text);
    }

    fn set_style(&mut self, id: RegionId, color: TextColor, scale: u8) {
        (**self).set_style(id, color, scale);
    }

    fn set_hidden(&mut self, id: RegionId, hidden: bool) {
        (**self).set_hidden(id, hidden);
    }

    fn remove_region(&mut self, id: RegionId) {
        (**self).remove_region(id);
    }
}

/// Display used when no panel is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn create_region(&mut self, _id: RegionId, _region: TextRegion) {}

    fn set_text(&mut self, _id: RegionId, _text: &str) {}

    fn set_style(&mut self, _id: RegionId, _color: TextColor, _scale: u8) {}

    fn set_hidden(&mut self, _id: RegionId, _hidden: bool) {}

    fn remove_region(&mut self, _id: RegionId) {}
}

/// Copies `text` into a label, dropping whatever does not fit.
pub fn label_text(text: &str) -> LabelText {
    let mut out = LabelText::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Printable form of a selectable character. The base font has no glyphs
/// for whitespace, so space and newline get short names.
pub fn char_label(ch: char) -> LabelText {
    match ch {
        ' ' => label_text("SP"),
        '\n' => label_text("EN"),
        _ => {
            let mut out = LabelText::new();
            let _ = out.push(ch);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_gets_named_labels() {
        assert_eq!(char_label(' ').as_str(), "SP");
        assert_eq!(char_label('\n').as_str(), "EN");
        assert_eq!(char_label('~').as_str(), "~");
    }

    #[test]
    fn long_labels_are_truncated() {
        let text = label_text("a label that is far too long");
        assert_eq!(text.len(), LABEL_BYTES);
        assert_eq!(text.as_str(), "a label that is ");
    }

    #[test]
    fn zero_scale_is_clamped() {
        let region = TextRegion::new("x", TextColor::Dim, 0, Anchor::CENTER, 0, 0);
        assert_eq!(region.scale, 1);
        assert!(!region.hidden);
    }
}
