use std::sync::Arc;

use crate::color::Color;

/// Which side of a page a texture or blend color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    Front,
    Back,
    /// Both sides at once; only meaningful for setters.
    Both,
}

/// Opaque RGBA8 page content handle.
///
/// Decoding and disk I/O happen outside this crate; a provider hands over
/// already-decoded pixels. The data is shared so that assigning the same
/// bitmap to both sides of a page does not copy it.
#[derive(Debug, Clone)]
pub struct PageBitmap {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl PageBitmap {
    /// Creates a 1x1 bitmap filled with a solid color.
    ///
    /// Used as the placeholder while real content is loading or after a load
    /// error.
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            data: Arc::from(color.to_array().as_slice()),
        }
    }

    fn same_as(&self, other: &PageBitmap) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Storage for page textures and blend colors.
///
/// Each [`crate::CurlMesh`] owns one `TexturePage`. The host fills it with
/// content; the mesh reads the blend colors while rebuilding geometry, and
/// the render host consumes the dirty flag once to know when to re-upload
/// textures.
#[derive(Debug, Clone)]
pub struct TexturePage {
    color_front: Color,
    color_back: Color,
    texture_front: Option<PageBitmap>,
    texture_back: Option<PageBitmap>,
    // Texture coordinates actually covered by the content inside the uploaded
    // texture (content may be padded out to power-of-two dimensions).
    area_front: (f32, f32),
    area_back: (f32, f32),
    textures_changed: bool,
}

impl Default for TexturePage {
    fn default() -> Self {
        Self::new()
    }
}

impl TexturePage {
    pub fn new() -> Self {
        Self {
            color_front: Color::WHITE,
            color_back: Color::WHITE,
            texture_front: None,
            texture_back: None,
            area_front: (1.0, 1.0),
            area_back: (1.0, 1.0),
            textures_changed: false,
        }
    }

    /// Blend color for a side. `Both` reads as the front color.
    pub fn color(&self, side: PageSide) -> Color {
        match side {
            PageSide::Back => self.color_back,
            _ => self.color_front,
        }
    }

    pub fn set_color(&mut self, color: Color, side: PageSide) {
        match side {
            PageSide::Front => self.color_front = color,
            PageSide::Back => self.color_back = color,
            PageSide::Both => {
                self.color_front = color;
                self.color_back = color;
            }
        }
    }

    /// Content for a side, if any has been assigned.
    pub fn texture(&self, side: PageSide) -> Option<&PageBitmap> {
        match side {
            PageSide::Back => self.texture_back.as_ref(),
            _ => self.texture_front.as_ref(),
        }
    }

    /// Assigns content to one or both sides and marks the page dirty.
    pub fn set_texture(&mut self, bitmap: PageBitmap, side: PageSide) {
        match side {
            PageSide::Front => self.texture_front = Some(bitmap),
            PageSide::Back => self.texture_back = Some(bitmap),
            PageSide::Both => {
                self.texture_front = Some(bitmap.clone());
                self.texture_back = Some(bitmap);
            }
        }
        self.textures_changed = true;
    }

    /// True if a back texture exists and differs from the front one.
    pub fn has_back_texture(&self) -> bool {
        match (&self.texture_front, &self.texture_back) {
            (Some(front), Some(back)) => !front.same_as(back),
            (None, Some(_)) => true,
            _ => false,
        }
    }

    /// Consumes the dirty flag: returns true once after a texture change.
    pub fn take_textures_changed(&mut self) -> bool {
        std::mem::take(&mut self.textures_changed)
    }

    /// The `(max_u, max_v)` texture coordinates covered by the side's content.
    pub fn texture_area(&self, side: PageSide) -> (f32, f32) {
        match side {
            PageSide::Back => self.area_back,
            _ => self.area_front,
        }
    }

    pub fn set_texture_area(&mut self, area: (f32, f32), side: PageSide) {
        match side {
            PageSide::Front => self.area_front = area,
            PageSide::Back => self.area_back = area,
            PageSide::Both => {
                self.area_front = area;
                self.area_back = area;
            }
        }
    }

    /// Resets colors to white and drops any content.
    pub fn reset(&mut self) {
        self.color_front = Color::WHITE;
        self.color_back = Color::WHITE;
        self.clear();
    }

    /// Drops content, keeping blend colors. Clears the dirty flag.
    pub fn clear(&mut self) {
        self.texture_front = None;
        self.texture_back = None;
        self.area_front = (1.0, 1.0);
        self.area_back = (1.0, 1.0);
        self.textures_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_flag_is_consumed_once() {
        let mut page = TexturePage::new();
        assert!(!page.take_textures_changed());
        page.set_texture(PageBitmap::solid(Color::WHITE), PageSide::Front);
        assert!(page.take_textures_changed());
        assert!(!page.take_textures_changed());
    }

    #[test]
    fn shared_bitmap_on_both_sides_is_not_a_back_texture() {
        let mut page = TexturePage::new();
        page.set_texture(PageBitmap::solid(Color::WHITE), PageSide::Both);
        assert!(!page.has_back_texture());

        page.set_texture(PageBitmap::solid(Color::BLACK), PageSide::Back);
        assert!(page.has_back_texture());
    }

    #[test]
    fn both_side_setters_touch_front_and_back() {
        let mut page = TexturePage::new();
        page.set_color(Color::rgb(1, 2, 3), PageSide::Both);
        assert_eq!(page.color(PageSide::Front), Color::rgb(1, 2, 3));
        assert_eq!(page.color(PageSide::Back), Color::rgb(1, 2, 3));

        page.set_texture_area((0.5, 0.75), PageSide::Both);
        assert_eq!(page.texture_area(PageSide::Back), (0.5, 0.75));
    }
}
