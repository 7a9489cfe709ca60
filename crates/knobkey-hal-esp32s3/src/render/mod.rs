//! Region canvas for monochrome panels.
//!
//! [`RegionCanvas`] is the display sink the modes talk to. It only records
//! region state; [`RegionCanvas::draw`] paints the visible regions onto any
//! `embedded-graphics` target when the UI loop decides to flush.

use embedded_graphics::{
    Pixel,
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};
use heapless::FnvIndexMap;
use knobkey_core::render::{Align, DisplaySink, RegionId, TextColor, TextRegion, label_text};
use log::warn;

pub const MAX_REGIONS: usize = 8;

const FONT: MonoFont<'static> = FONT_6X10;

#[derive(Debug)]
pub struct RegionCanvas {
    regions: FnvIndexMap<RegionId, TextRegion, MAX_REGIONS>,
    dirty: bool,
}

impl RegionCanvas {
    pub fn new() -> Self {
        Self {
            regions: FnvIndexMap::new(),
            dirty: true,
        }
    }

    /// Whether anything changed since the last [`draw`](Self::draw).
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn region(&self, id: RegionId) -> Option<&TextRegion> {
        self.regions.get(id)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Clears `target` and paints every visible region.
    pub fn draw<T>(&mut self, target: &mut T) -> Result<(), T::Error>
    where
        T: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;
        for region in self.regions.values().filter(|region| !region.hidden) {
            draw_region(region, target)?;
        }
        self.dirty = false;
        Ok(())
    }

    fn update(&mut self, id: RegionId, apply: impl FnOnce(&mut TextRegion) -> bool) {
        if let Some(region) = self.regions.get_mut(id)
            && apply(region)
        {
            self.dirty = true;
        }
    }
}

impl Default for RegionCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for RegionCanvas {
    fn create_region(&mut self, id: RegionId, region: TextRegion) {
        match self.regions.insert(id, region) {
            Ok(_) => self.dirty = true,
            Err(_) => warn!("canvas: no room for region {}", id),
        }
    }

    fn set_text(&mut self, id: RegionId, text: &str) {
        self.update(id, |region| {
            if region.text.as_str() == text {
                return false;
            }
            region.text = label_text(text);
            true
        });
    }

    fn set_style(&mut self, id: RegionId, color: TextColor, scale: u8) {
        let scale = scale.max(1);
        self.update(id, |region| {
            if region.color == color && region.scale == scale {
                return false;
            }
            region.color = color;
            region.scale = scale;
            true
        });
    }

    fn set_hidden(&mut self, id: RegionId, hidden: bool) {
        self.update(id, |region| {
            if region.hidden == hidden {
                return false;
            }
            region.hidden = hidden;
            true
        });
    }

    fn remove_region(&mut self, id: RegionId) {
        if self.regions.remove(id).is_some() {
            self.dirty = true;
        }
    }
}

/// Screen rectangle a region's text occupies.
pub fn region_bounds(region: &TextRegion) -> Rectangle {
    let scale = region.scale.max(1) as u32;
    let glyph = FONT.character_size;
    let chars = region.text.chars().count() as u32;
    let size = Size::new(glyph.width * chars * scale, glyph.height * scale);

    let x = aligned_start(region.x, size.width, region.anchor.horizontal);
    let y = aligned_start(region.y, size.height, region.anchor.vertical);
    Rectangle::new(Point::new(x, y), size)
}

fn aligned_start(position: i16, extent: u32, align: Align) -> i32 {
    let position = position as i32;
    let extent = extent as i32;
    match align {
        Align::Start => position,
        Align::Center => position - extent / 2,
        Align::End => position - extent,
    }
}

fn draw_region<T>(region: &TextRegion, target: &mut T) -> Result<(), T::Error>
where
    T: DrawTarget<Color = BinaryColor>,
{
    // One bit per pixel: dim text is drawn like bright text and only differs
    // in scale.
    let style = MonoTextStyle::new(&FONT, BinaryColor::On);
    let bounds = region_bounds(region);
    let mut scaled = Scaled {
        target,
        origin: bounds.top_left,
        scale: region.scale.max(1) as u32,
    };
    Text::with_baseline(region.text.as_str(), Point::zero(), style, Baseline::Top)
        .draw(&mut scaled)?;
    Ok(())
}

/// Magnifies every pixel drawn into it to a `scale`×`scale` block.
struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<T> OriginDimensions for Scaled<'_, T>
where
    T: DrawTarget<Color = BinaryColor>,
{
    fn size(&self) -> Size {
        self.target.bounding_box().size / self.scale
    }
}

impl<T> DrawTarget for Scaled<'_, T>
where
    T: DrawTarget<Color = BinaryColor>,
{
    type Color = BinaryColor;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.target.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
