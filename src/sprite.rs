//! Card image loading: download, decode and shrink to a thumbnail the
//! terminal can paint one cell per pixel.

use image::imageops::FilterType;

use crate::error::Result;
use crate::fetch::DexApi;
use crate::models::Pokemon;

pub const THUMB_W: u32 = 48;
pub const THUMB_H: u32 = 48;

/// Compact RGB thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteThumb {
    pub w: u32,
    pub h: u32,
    /// RGB pixels in row-major order (len = w*h*3)
    pub pixels: Vec<u8>,
}

impl SpriteThumb {
    /// Decode PNG/JPEG/... bytes into a canonical-size thumbnail.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        let small =
            image::imageops::resize(&img.to_rgba8(), THUMB_W, THUMB_H, FilterType::Lanczos3);
        let mut pixels = Vec::with_capacity((THUMB_W * THUMB_H * 3) as usize);
        for p in small.pixels() {
            // Transparent pixels are painted black rather than keeping stray colour.
            let alpha = p[3] as u16;
            pixels.push(((p[0] as u16 * alpha) / 255) as u8);
            pixels.push(((p[1] as u16 * alpha) / 255) as u8);
            pixels.push(((p[2] as u16 * alpha) / 255) as u8);
        }
        Ok(Self {
            w: THUMB_W,
            h: THUMB_H,
            pixels,
        })
    }

    /// Pixel rows sized `w` x `h`, resizing in memory when needed.
    pub fn rows(&self, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
        if self.w == w && self.h == h {
            return self
                .pixels
                .chunks_exact((w * 3) as usize)
                .map(|row| row.chunks_exact(3).map(|p| (p[0], p[1], p[2])).collect())
                .collect();
        }

        let mut buf = image::RgbImage::new(self.w, self.h);
        for (i, px) in buf.pixels_mut().enumerate() {
            let idx = i * 3;
            *px = image::Rgb([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]);
        }
        let resized = image::imageops::resize(&buf, w.max(1), h.max(1), FilterType::Triangle);
        resized
            .rows()
            .map(|row| row.map(|p| (p[0], p[1], p[2])).collect())
            .collect()
    }
}

/// Terminal outcome of the card image preload.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Artwork(SpriteThumb),
    Sprite(SpriteThumb),
    Blank,
}

impl ImageOutcome {
    pub fn into_thumb(self) -> Option<SpriteThumb> {
        match self {
            ImageOutcome::Artwork(t) | ImageOutcome::Sprite(t) => Some(t),
            ImageOutcome::Blank => None,
        }
    }
}

async fn load<A: DexApi>(api: &A, url: &str) -> Result<SpriteThumb> {
    let bytes = api.fetch_image(url).await?;
    SpriteThumb::decode(&bytes)
}

/// Try the official artwork, then the small sprite, then give up with a blank.
pub async fn preload<A: DexApi>(api: &A, pokemon: &Pokemon) -> ImageOutcome {
    if let Some(url) = &pokemon.artwork_url {
        match load(api, url).await {
            Ok(thumb) => return ImageOutcome::Artwork(thumb),
            Err(e) => log::debug!("artwork for {} failed: {}", pokemon.name, e),
        }
    }
    if let Some(url) = &pokemon.sprite_url {
        match load(api, url).await {
            Ok(thumb) => return ImageOutcome::Sprite(thumb),
            Err(e) => log::debug!("sprite for {} failed: {}", pokemon.name, e),
        }
    }
    ImageOutcome::Blank
}
