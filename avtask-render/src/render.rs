use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result, anyhow};
use avtask_core::{Anchor, Surface};
use image::imageops::FilterType;
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{Color, ColorU8, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    size_bits: u32,
    color: [u8; 4],
}

struct TextCache {
    font: FontVec,
    map: HashMap<TextKey, Option<Pixmap>>,
}

impl TextCache {
    fn new(font: FontVec) -> Self {
        Self {
            font,
            map: HashMap::new(),
        }
    }

    fn get_or_render(&mut self, text: &str, size_px: f32, color: [u8; 4]) -> Option<&Pixmap> {
        let key = TextKey {
            text: text.to_string(),
            size_bits: size_px.to_bits(),
            color,
        };
        let font = &self.font;
        self.map
            .entry(key)
            .or_insert_with(|| render_text_pixmap(text, size_px, font, color))
            .as_ref()
    }
}

/// Rasterizes `text` on a transparent, premultiplied pixmap cropped to the
/// glyph bounds. `None` when nothing would be drawn.
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: [u8; 4],
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // 1) Layout with baseline at ascent
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    // 2) Union pixel bounds from outlined glyphs
    let outlines: Vec<_> = glyphs
        .iter()
        .filter_map(|g| font.outline_glyph(g.clone()))
        .collect();
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }
    if outlines.is_empty() {
        return None;
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;

    // 3) Rasterize with premultiplied alpha blending
    let stride = w as usize;
    let dst = pm.pixels_mut();
    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            let a_lin = (cov * color[3] as f32 / 255.0).clamp(0.0, 1.0);
            let sr = (color[0] as f32 * a_lin) as u8;
            let sg = (color[1] as f32 * a_lin) as u8;
            let sb = (color[2] as f32 * a_lin) as u8;
            let sa = (a_lin * 255.0) as u8;

            // Porter-Duff over in premultiplied space: out = src + bg * (1 - src.a)
            let bg = dst[i];
            let inv = 1.0 - (sa as f32 / 255.0);
            let r = sr.saturating_add((bg.red() as f32 * inv) as u8);
            let g = sg.saturating_add((bg.green() as f32 * inv) as u8);
            let b = sb.saturating_add((bg.blue() as f32 * inv) as u8);
            let a = sa.saturating_add((bg.alpha() as f32 * inv) as u8);

            dst[i] = PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(bg);
        });
    }

    Some(pm)
}

/// Decodes an image file and scales it to exactly `size`.
pub fn decode_image(path: &Path, size: (u32, u32)) -> Result<Pixmap> {
    let rgba = image::open(path)
        .with_context(|| format!("loading image {}", path.display()))?
        .resize_exact(size.0.max(1), size.1.max(1), FilterType::Triangle)
        .into_rgba8();

    let mut pixmap = Pixmap::new(rgba.width(), rgba.height())
        .ok_or_else(|| anyhow!("image {} has no pixels", path.display()))?;
    for (dst, px) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Offscreen RGBA canvas the session draws on.
///
/// `present` only counts frames; a window frontend copies `frame()` to the
/// screen after presenting.
pub struct SkiaSurface {
    width: u32,
    height: u32,
    canvas: Pixmap,
    background: Color,
    text: Option<TextCache>,
    frames: u64,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))?;
        canvas.fill(Color::WHITE);
        Ok(Self {
            width,
            height,
            canvas,
            background: Color::WHITE,
            text: None,
            frames: 0,
        })
    }

    /// DejaVu Sans, compiled into the binary.
    pub fn bundled_font() -> Result<FontVec> {
        FontVec::try_from_vec(BUNDLED_FONT.to_vec())
            .map_err(|e| anyhow!("invalid bundled font: {e}"))
    }

    pub fn load_font(path: &Path) -> Result<FontVec> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        FontVec::try_from_vec(bytes).map_err(|e| anyhow!("invalid font {}: {e}", path.display()))
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.text = Some(TextCache::new(font));
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.canvas
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn frame(&self) -> &[u8] {
        self.canvas.data()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn draw(&mut self, pixmap: &Pixmap, pos: (f32, f32), anchor: Anchor) {
        let (x, y) = match anchor {
            Anchor::TopLeft => pos,
            Anchor::Center => (
                pos.0 - pixmap.width() as f32 / 2.0,
                pos.1 - pixmap.height() as f32 / 2.0,
            ),
        };
        self.canvas.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

impl Surface for SkiaSurface {
    type Image = Pixmap;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn load_image(&mut self, path: &Path, size: (u32, u32)) -> Result<Pixmap> {
        decode_image(path, size)
    }

    fn clear(&mut self) {
        self.canvas.fill(self.background);
    }

    fn blit_image(&mut self, image: &Pixmap, pos: (f32, f32), anchor: Anchor) {
        self.draw(image, pos, anchor);
    }

    fn blit_text(&mut self, text: &str, size_px: f32, color: [u8; 4], pos: (f32, f32), anchor: Anchor) {
        let Some(cache) = self.text.as_mut() else {
            return;
        };
        if let Some(pm) = cache.get_or_render(text, size_px, color).cloned() {
            self.draw(&pm, pos, anchor);
        }
    }

    fn present(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}
