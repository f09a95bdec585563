//! 画像の縮小・再エンコード

pub mod pdf;
pub mod resize;

use crate::error::{CatalogError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Webp,
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(OutputFormat::Webp),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(format!("Unknown format: {}. Use webp, jpeg, or png", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Webp => write!(f, "webp"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
        }
    }
}

/// 幅が `max_width` を超える場合のみ、縦横比を保って縮小
pub fn shrink_to_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if max_width == 0 || img.width() <= max_width {
        return img;
    }
    let ratio = max_width as f64 / img.width() as f64;
    let new_height = ((img.height() as f64 * ratio) as u32).max(1);
    img.resize_exact(max_width, new_height, FilterType::Lanczos3)
}

/// `max_width × max_height` に収まらない場合のみ、縦横比を保って縮小
pub fn shrink_to_fit(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img;
    }
    img.resize(max_width, max_height, FilterType::Lanczos3)
}

/// 指定形式でエンコード。qualityはJPEGのみ有効
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buffer), ImageFormat::WebP)
                .map_err(|e| CatalogError::Image(format!("WebPエンコード失敗: {}", e)))?;
        }
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .map_err(|e| CatalogError::Image(format!("PNGエンコード失敗: {}", e)))?;
        }
        OutputFormat::Jpeg => {
            // JPEGは透過非対応のためRGBへ
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)
                .map_err(|e| CatalogError::Image(format!("JPEGエンコード失敗: {}", e)))?;
        }
    }

    Ok(buffer)
}

/// 縮小率（%）。元サイズ0は0%
pub fn reduction_percent(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - optimized as f64) / original as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])))
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("WEBP".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn test_shrink_to_width() {
        let img = shrink_to_width(solid(1600, 1200), 800);
        assert_eq!((img.width(), img.height()), (800, 600));

        let small = shrink_to_width(solid(300, 400), 800);
        assert_eq!((small.width(), small.height()), (300, 400));
    }

    #[test]
    fn test_shrink_to_fit() {
        let img = shrink_to_fit(solid(400, 560), 200, 280);
        assert_eq!((img.width(), img.height()), (200, 280));

        let wide = shrink_to_fit(solid(800, 200), 200, 280);
        assert_eq!((wide.width(), wide.height()), (200, 50));

        let small = shrink_to_fit(solid(100, 100), 200, 280);
        assert_eq!((small.width(), small.height()), (100, 100));
    }

    #[test]
    fn test_encode_formats_decode_back() {
        let img = solid(40, 30);
        for format in [OutputFormat::Webp, OutputFormat::Jpeg, OutputFormat::Png] {
            let bytes = encode(&img, format, 80).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 30), "format={}", format);
        }
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(reduction_percent(0, 10), 0.0);
        assert_eq!(reduction_percent(200, 50), 75.0);
    }
}
