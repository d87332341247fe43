use std::collections::HashMap;
use std::path::PathBuf;

use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use stopsig_core::Feedback;
use tiny_skia::{Color, Paint, Pixmap, PremultipliedColorU8, Rect, Transform};

const BACKGROUND: Color = Color::BLACK;
const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [220, 60, 60, 255];
const YELLOW: [u8; 4] = [235, 200, 60, 255];
const GREEN: [u8; 4] = [90, 200, 120, 255];

const STIMULUS_PX: f32 = 160.0;
const TEXT_PX: f32 = 28.0;
const FEEDBACK_PX: f32 = 36.0;
const PROMPT_PX: f32 = 40.0;

/// Everything the app wants on screen for one frame. The renderer consumes
/// this; nothing flows back into experiment state.
#[derive(Debug, Default)]
pub struct Scene<'a> {
    pub instruction: Option<&'a str>,
    pub stimulus_glyph: Option<&'a str>,
    pub stop_marker: bool,
    pub feedback: Feedback,
    pub attention_prompt: Option<&'a str>,
    pub progress: Option<(usize, usize)>,
    pub key_reminder: Option<&'a str>,
}

/// Candidate font files, first hit wins. `STOPSIG_FONT` overrides.
const FONT_SEARCH: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font() -> Result<FontArc> {
    let candidates: Vec<PathBuf> = std::env::var_os("STOPSIG_FONT")
        .map(|p| vec![PathBuf::from(p)])
        .unwrap_or_else(|| FONT_SEARCH.iter().map(PathBuf::from).collect());

    for path in &candidates {
        if let Ok(bytes) = std::fs::read(path) {
            return FontArc::try_from_vec(bytes)
                .with_context(|| format!("invalid font file {}", path.display()));
        }
    }
    anyhow::bail!("no usable font found; set STOPSIG_FONT to a .ttf path")
}

/// Rasterize one line of text into a premultiplied pixmap sized to its
/// pixel bounds.
pub fn render_text_pixmap(text: &str, font_size: f32, font: &FontArc, color: [u8; 4]) -> Pixmap {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

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

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }
    if min_x == f32::INFINITY {
        return Pixmap::new(1, 1).expect("pixmap");
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h).expect("pixmap");

    let stride = pm.width() as usize;
    let dst = pm.pixels_mut();
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
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

                let a = (cov * color[3] as f32 / 255.0).clamp(0.0, 1.0);
                let src = PremultipliedColorU8::from_rgba(
                    (color[0] as f32 * a) as u8,
                    (color[1] as f32 * a) as u8,
                    (color[2] as f32 * a) as u8,
                    (a * 255.0) as u8,
                )
                .expect("premultiplied components");

                let bg = dst[i];
                let inv = 1.0 - (src.alpha() as f32 / 255.0);
                dst[i] = PremultipliedColorU8::from_rgba(
                    src.red().saturating_add((bg.red() as f32 * inv) as u8),
                    src.green().saturating_add((bg.green() as f32 * inv) as u8),
                    src.blue().saturating_add((bg.blue() as f32 * inv) as u8),
                    src.alpha().saturating_add((bg.alpha() as f32 * inv) as u8),
                )
                .expect("premultiplied components");
            });
        }
    }

    pm
}

pub fn feedback_color(feedback: Feedback) -> [u8; 4] {
    match feedback {
        Feedback::WrongKey | Feedback::Miss | Feedback::FailedInhibition => RED,
        Feedback::SlowCorrect => YELLOW,
        Feedback::Perfect => GREEN,
        Feedback::None => WHITE,
    }
}

type TextKey = (String, u32, [u8; 4]);

/// CPU renderer drawing each frame into an offscreen pixmap that the app
/// copies to the surface. Rasterized text lines are cached by content, size
/// and color.
pub struct SkiaRenderer {
    width: u32,
    height: u32,
    center: (f32, f32),
    font: FontArc,
    canvas: Pixmap,
    text_cache: HashMap<TextKey, Pixmap>,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let font = load_font()?;
        let canvas = Pixmap::new(width, height).context("canvas allocation")?;
        Ok(Self {
            width,
            height,
            center: (width as f32 / 2.0, height as f32 / 2.0),
            font,
            canvas,
            text_cache: HashMap::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.center = (width as f32 / 2.0, height as f32 / 2.0);
        self.canvas = Pixmap::new(width, height).context("canvas allocation")?;
        Ok(())
    }

    pub fn render_frame(&mut self, scene: &Scene<'_>, frame_buffer: &mut [u8]) -> Result<()> {
        self.canvas.fill(BACKGROUND);

        if let Some(text) = scene.instruction {
            self.draw_paragraph(text, TEXT_PX, WHITE);
        }

        if let Some(glyph) = scene.stimulus_glyph {
            let center = self.center;
            self.draw_text(glyph, STIMULUS_PX, WHITE, center);
        }
        if scene.stop_marker {
            self.draw_stop_border();
        }
        if let Some(message) = scene.feedback.message() {
            let pos = (self.center.0, self.center.1 + 180.0);
            self.draw_text(message, FEEDBACK_PX, feedback_color(scene.feedback), pos);
        }
        if let Some((current, total)) = scene.progress {
            self.draw_progress_bar(current, total);
        }
        if let Some(reminder) = scene.key_reminder {
            let pos = (self.center.0, self.height as f32 - 50.0);
            self.draw_text(reminder, TEXT_PX, WHITE, pos);
        }
        if let Some(prompt) = scene.attention_prompt {
            self.draw_attention_prompt(prompt);
        }

        let data = self.canvas.data();
        let copy_len = data.len().min(frame_buffer.len());
        let frame = &mut frame_buffer[..copy_len];
        frame.copy_from_slice(&data[..frame.len()]);
        Ok(())
    }

    fn cached_text(&mut self, text: &str, size: f32, color: [u8; 4]) -> &Pixmap {
        let key = (text.to_owned(), size as u32, color);
        self.text_cache
            .entry(key)
            .or_insert_with(|| render_text_pixmap(text, size, &self.font, color))
    }

    fn draw_text(&mut self, text: &str, size: f32, color: [u8; 4], center: (f32, f32)) {
        let pm = self.cached_text(text, size, color).to_owned();
        self.blit(&pm, center);
    }

    /// Multi-line text block, centered horizontally, vertically balanced
    /// around screen center.
    fn draw_paragraph(&mut self, text: &str, size: f32, color: [u8; 4]) {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let line_height = size * 1.5;
        let block_height = line_height * lines.len() as f32;
        let top = self.center.1 - block_height / 2.0;
        let center_x = self.center.0;
        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let y = top + line_height * (i as f32 + 0.5);
            self.draw_text(line, size, color, (center_x, y));
        }
    }

    fn blit(&mut self, pm: &Pixmap, center: (f32, f32)) {
        let w = pm.width() as i32;
        let h = pm.height() as i32;
        let x0 = (center.0 - w as f32 / 2.0).floor() as i32;
        let y0 = (center.1 - h as f32 / 2.0).floor() as i32;
        let cw = self.canvas.width() as i32;
        let ch = self.canvas.height() as i32;

        let src = pm.pixels();
        let stride = self.canvas.width() as usize;
        let dst = self.canvas.pixels_mut();

        for sy in 0..h {
            let dy = y0 + sy;
            if dy < 0 || dy >= ch {
                continue;
            }
            for sx in 0..w {
                let dx = x0 + sx;
                if dx < 0 || dx >= cw {
                    continue;
                }
                let s = src[(sy * w + sx) as usize];
                if s.alpha() == 0 {
                    continue;
                }
                let i = dy as usize * stride + dx as usize;
                let d = dst[i];
                let inv = 255 - s.alpha() as u32;
                dst[i] = PremultipliedColorU8::from_rgba(
                    (s.red() as u32 + (d.red() as u32 * inv + 127) / 255) as u8,
                    (s.green() as u32 + (d.green() as u32 * inv + 127) / 255) as u8,
                    (s.blue() as u32 + (d.blue() as u32 * inv + 127) / 255) as u8,
                    (s.alpha() as u32 + (d.alpha() as u32 * inv + 127) / 255) as u8,
                )
                .expect("premultiplied components");
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 4]) {
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(color[0], color[1], color[2], color[3]));
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.canvas
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Red frame around the stimulus area, the stop-signal marker.
    fn draw_stop_border(&mut self) {
        let side = STIMULUS_PX * 1.8;
        let thickness = 10.0;
        let (cx, cy) = self.center;
        let x = cx - side / 2.0;
        let y = cy - side / 2.0;
        self.fill_rect(x, y, side, thickness, RED);
        self.fill_rect(x, y + side - thickness, side, thickness, RED);
        self.fill_rect(x, y, thickness, side, RED);
        self.fill_rect(x + side - thickness, y, thickness, side, RED);
    }

    fn draw_progress_bar(&mut self, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        let bar_width = self.width as f32 * 0.6;
        let bar_height = 14.0;
        let x = (self.width as f32 - bar_width) / 2.0;
        let y = 40.0;
        let fraction = (current as f32 / total as f32).clamp(0.0, 1.0);
        self.fill_rect(x, y, bar_width, bar_height, [70, 70, 70, 255]);
        self.fill_rect(x, y, bar_width * fraction, bar_height, WHITE);
    }

    fn draw_attention_prompt(&mut self, prompt: &str) {
        let box_w = self.width as f32 * 0.5;
        let box_h = 160.0;
        let (cx, cy) = self.center;
        self.fill_rect(cx - box_w / 2.0, cy - box_h / 2.0, box_w, box_h, WHITE);
        self.draw_text(prompt, PROMPT_PX, [0, 0, 0, 255], (cx, cy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_colors_follow_severity() {
        assert_eq!(feedback_color(Feedback::WrongKey), RED);
        assert_eq!(feedback_color(Feedback::Miss), RED);
        assert_eq!(feedback_color(Feedback::FailedInhibition), RED);
        assert_eq!(feedback_color(Feedback::SlowCorrect), YELLOW);
        assert_eq!(feedback_color(Feedback::Perfect), GREEN);
    }

    #[test]
    fn scene_defaults_to_an_empty_frame() {
        let scene = Scene::default();
        assert!(scene.instruction.is_none());
        assert!(scene.stimulus_glyph.is_none());
        assert!(!scene.stop_marker);
        assert_eq!(scene.feedback, Feedback::None);
    }
}
