//! PDFからカード画像を抽出
//!
//! ページごとに画像XObjectを取り出し、同じページのテキスト行から拾った
//! カード名でファイル名を付ける。名前が足りない分は連番になる。

use super::{encode, reduction_percent, shrink_to_width, OutputFormat};
use crate::error::{CatalogError, Result};
use card_catalog_common::image_slug;
use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

/// カード名として扱わない表ヘッダー
const HEADER_LABELS: &[&str] = &["No.", "이미지", "Eng", "Image"];

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub output_dir: PathBuf,
    pub optimize: bool,
    pub max_width: u32,
    /// JPEG出力時の品質 (1-100)
    pub quality: u8,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Replaced,
}

impl std::fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveStatus::Saved => write!(f, "Saved"),
            SaveStatus::Replaced => write!(f, "Replaced"),
        }
    }
}

/// 書き出した画像1枚分
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub page: u32,
    pub file_name: String,
    pub status: SaveStatus,
    pub original_size: u64,
    pub saved_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    pub images: Vec<ExtractedImage>,
    /// デコードできずスキップした画像の説明
    pub skipped: Vec<String>,
}

impl ExtractReport {
    /// 保存・スキップを合わせたページ上の画像数
    pub fn seen_count(&self) -> usize {
        self.images.len() + self.skipped.len()
    }

    pub fn replaced_count(&self) -> usize {
        self.images.iter().filter(|i| i.status == SaveStatus::Replaced).count()
    }

    pub fn new_count(&self) -> usize {
        self.images.len() - self.replaced_count()
    }

    pub fn total_original(&self) -> u64 {
        self.images.iter().map(|i| i.original_size).sum()
    }

    pub fn total_saved(&self) -> u64 {
        self.images.iter().map(|i| i.saved_size).sum()
    }

    pub fn total_reduction(&self) -> f64 {
        reduction_percent(self.total_original(), self.total_saved())
    }
}

/// ページテキストからカード名らしい行を拾う
///
/// 空行・数字だけの行・表ヘッダーを除き、大文字で始まる行を順に返す。
pub fn card_name_candidates(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.chars().all(|c| c.is_numeric()))
        .filter(|line| !HEADER_LABELS.contains(line))
        .filter(|line| line.chars().next().is_some_and(char::is_uppercase))
        .map(str::to_string)
        .collect()
}

/// ページ内 index 番目の画像のファイル名
pub fn image_file_name(candidates: &[String], index: usize, counter: usize, extension: &str) -> String {
    let slug = candidates.get(index).map(|name| image_slug(name)).unwrap_or_default();
    if slug.is_empty() {
        format!("image-{:03}.{}", counter, extension)
    } else {
        format!("{}.{}", slug, extension)
    }
}

/// PDF内の画像ストリーム（未デコード）
struct PdfImage {
    width: u32,
    height: u32,
    color_space: String,
    bits_per_component: u32,
    filter: Option<String>,
    content: Vec<u8>,
}

impl PdfImage {
    /// 再エンコードしない場合の拡張子
    fn native_extension(&self) -> &'static str {
        match self.filter.as_deref() {
            Some("DCTDecode") => "jpg",
            Some("JPXDecode") => "jp2",
            _ => "png",
        }
    }

    /// JPEG/JPEG2000はストリームがそのままファイルになる
    fn is_self_contained(&self) -> bool {
        matches!(self.filter.as_deref(), Some("DCTDecode") | Some("JPXDecode"))
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

fn name_of(doc: &Document, obj: &Object) -> Option<String> {
    match resolve(doc, obj)? {
        Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
        Object::Array(arr) => arr.first().and_then(|first| name_of(doc, first)),
        _ => None,
    }
}

fn integer_of(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match resolve(doc, dict.get(key).ok()?)? {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        _ => None,
    }
}

/// ページのResources（親Pagesからの継承も見る）。Parentが循環していれば None
fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let mut visited = HashSet::from([page_id]);
    let mut current = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Some(resources) = current.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) {
            return Some(resources);
        }
        current = match current.get(b"Parent") {
            Ok(Object::Reference(parent_id)) if visited.insert(*parent_id) => {
                doc.get_dictionary(*parent_id).ok()?
            }
            _ => return None,
        };
    }
}

/// ページ上の画像XObjectをリソース順に集める
fn page_images(doc: &Document, page_id: ObjectId) -> Vec<PdfImage> {
    let Some(xobjects) = page_resources(doc, page_id)
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|x| resolve_dict(doc, x))
    else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for (_, value) in xobjects.iter() {
        let Some(Object::Stream(stream)) = resolve(doc, value) else {
            continue;
        };
        let dict = &stream.dict;
        if dict.get(b"Subtype").ok().and_then(|s| name_of(doc, s)).as_deref() != Some("Image") {
            continue;
        }

        images.push(PdfImage {
            width: integer_of(doc, dict, b"Width").unwrap_or(0).max(0) as u32,
            height: integer_of(doc, dict, b"Height").unwrap_or(0).max(0) as u32,
            color_space: dict
                .get(b"ColorSpace")
                .ok()
                .and_then(|cs| name_of(doc, cs))
                .unwrap_or_else(|| "DeviceRGB".to_string()),
            bits_per_component: integer_of(doc, dict, b"BitsPerComponent").unwrap_or(8).max(0) as u32,
            filter: dict.get(b"Filter").ok().and_then(|f| name_of(doc, f)),
            content: stream.content.clone(),
        });
    }

    images
}

/// 画像ストリームをデコード
fn decode_image(img: &PdfImage) -> std::result::Result<DynamicImage, String> {
    let raw = match img.filter.as_deref() {
        Some("DCTDecode") => {
            return image::load_from_memory_with_format(&img.content, ImageFormat::Jpeg)
                .map_err(|e| format!("JPEGデコード失敗: {}", e));
        }
        Some("JPXDecode") => {
            return image::load_from_memory(&img.content)
                .map_err(|e| format!("JPEG2000デコード失敗: {}", e));
        }
        Some("FlateDecode") => {
            let mut decoder = ZlibDecoder::new(&img.content[..]);
            let mut decoded = Vec::new();
            decoder.read_to_end(&mut decoded).map_err(|e| e.to_string())?;
            decoded
        }
        None => img.content.clone(),
        Some(other) => return Err(format!("未対応のフィルタ: {}", other)),
    };

    if img.bits_per_component != 8 {
        return Err(format!("未対応のビット深度: {}", img.bits_per_component));
    }

    let pixels = (img.width as usize) * (img.height as usize);
    if pixels == 0 {
        return Err("画像サイズが0です".into());
    }

    // ICCBased等は実データ長から成分数を推定
    let channels = match img.color_space.as_str() {
        "DeviceRGB" | "CalRGB" => 3,
        "DeviceGray" | "CalGray" => 1,
        _ => raw.len() / pixels,
    };

    match channels {
        3 if raw.len() >= pixels * 3 => RgbImage::from_raw(img.width, img.height, raw[..pixels * 3].to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "RGB画像の生成に失敗".to_string()),
        1 if raw.len() >= pixels => GrayImage::from_raw(img.width, img.height, raw[..pixels].to_vec())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| "グレースケール画像の生成に失敗".to_string()),
        _ => Err(format!(
            "未対応の色空間: {} ({} bytes, {}x{})",
            img.color_space,
            raw.len(),
            img.width,
            img.height
        )),
    }
}

/// 書き出すバイト列と拡張子を決める
fn render(img: &PdfImage, options: &ExtractOptions) -> std::result::Result<(Vec<u8>, &'static str), String> {
    if options.optimize {
        let decoded = decode_image(img)?;
        let shrunk = shrink_to_width(decoded, options.max_width);
        let bytes = encode(&shrunk, options.format, options.quality).map_err(|e| e.to_string())?;
        return Ok((bytes, options.format.extension()));
    }

    if img.is_self_contained() {
        return Ok((img.content.clone(), img.native_extension()));
    }

    // 生ピクセルはPNGにして保存
    let decoded = decode_image(img)?;
    let bytes = encode(&decoded, OutputFormat::Png, options.quality).map_err(|e| e.to_string())?;
    Ok((bytes, "png"))
}

pub fn extract_images(pdf_path: &Path, options: &ExtractOptions, verbose: bool) -> Result<ExtractReport> {
    if !pdf_path.exists() {
        return Err(CatalogError::FileNotFound(pdf_path.display().to_string()));
    }

    let doc = Document::load(pdf_path)
        .map_err(|e| CatalogError::Pdf(format!("{}: {}", pdf_path.display(), e)))?;

    std::fs::create_dir_all(&options.output_dir)?;

    let mut report = ExtractReport::default();
    let mut counter = 0usize;

    for (page_num, page_id) in doc.get_pages() {
        let text = doc.extract_text(&[page_num]).unwrap_or_default();
        let candidates = card_name_candidates(&text);
        let images = page_images(&doc, page_id);

        if verbose {
            println!("  ページ {}: 画像{}枚 / 名前候補{}件", page_num, images.len(), candidates.len());
        }

        for (index, img) in images.iter().enumerate() {
            let (bytes, extension) = match render(img, options) {
                Ok(rendered) => rendered,
                Err(e) if img.is_self_contained() => {
                    eprintln!("⚠ 最適化できませんでした（元データで保存）: {}", e);
                    (img.content.clone(), img.native_extension())
                }
                Err(e) => {
                    report.skipped.push(format!("ページ{} 画像{}: {}", page_num, index + 1, e));
                    counter += 1;
                    continue;
                }
            };

            let file_name = image_file_name(&candidates, index, counter, extension);
            let path = options.output_dir.join(&file_name);
            let status = if path.exists() { SaveStatus::Replaced } else { SaveStatus::Saved };
            std::fs::write(&path, &bytes)?;

            let extracted = ExtractedImage {
                page: page_num,
                file_name,
                status,
                original_size: img.content.len() as u64,
                saved_size: bytes.len() as u64,
            };

            let reduction = if options.optimize {
                reduction_percent(extracted.original_size, extracted.saved_size)
            } else {
                0.0
            };
            println!(
                "{}: {} ({:.1}KB → {:.1}KB, {:.1}% reduction)",
                extracted.status,
                extracted.file_name,
                extracted.original_size as f64 / 1024.0,
                extracted.saved_size as f64 / 1024.0,
                reduction
            );

            report.images.push(extracted);
            counter += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_card_name_candidates() {
        let text = "No.\nImage\n1\n  Fire Dragon  \n이미지\nEng\n\nice golem\n42\nSea Serpent\n";
        let names = card_name_candidates(text);
        assert_eq!(names, vec!["Fire Dragon", "Sea Serpent"]);
    }

    #[test]
    fn test_card_name_candidates_keeps_mixed_digits() {
        let names = card_name_candidates("Golem 2\n2024\n");
        assert_eq!(names, vec!["Golem 2"]);
    }

    #[test]
    fn test_image_file_name() {
        let candidates = vec!["Fire Dragon".to_string(), "火龍".to_string()];
        assert_eq!(image_file_name(&candidates, 0, 7, "webp"), "fire-dragon.webp");
        // スラッグが空なら連番
        assert_eq!(image_file_name(&candidates, 1, 8, "webp"), "image-008.webp");
        assert_eq!(image_file_name(&candidates, 2, 12, "jpg"), "image-012.jpg");
    }

    #[test]
    fn test_decode_raw_rgb() {
        let img = PdfImage {
            width: 2,
            height: 2,
            color_space: "DeviceRGB".into(),
            bits_per_component: 8,
            filter: None,
            content: vec![255; 12],
        };
        let decoded = decode_image(&img).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn test_decode_unsupported_filter() {
        let img = PdfImage {
            width: 2,
            height: 2,
            color_space: "DeviceRGB".into(),
            bits_per_component: 8,
            filter: Some("CCITTFaxDecode".into()),
            content: vec![0; 4],
        };
        assert!(decode_image(&img).is_err());
        assert_eq!(img.native_extension(), "png");
    }

    #[test]
    fn test_extract_missing_pdf() {
        let options = ExtractOptions {
            output_dir: PathBuf::from("/tmp/card-catalog-unused"),
            optimize: true,
            max_width: 800,
            quality: 85,
            format: OutputFormat::Webp,
        };
        let err = extract_images(Path::new("/nonexistent/card_image.pdf"), &options, false).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }

    #[test]
    fn test_page_resources_inherited_from_parent() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(lopdf::dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(lopdf::dictionary! {
                "Type" => "Pages",
                "Resources" => lopdf::dictionary! { "ProcSet" => "PDF" },
            }),
        );

        let resources = page_resources(&doc, page_id).unwrap();
        assert!(resources.get(b"ProcSet").is_ok());
    }

    #[test]
    fn test_page_resources_parent_cycle() {
        let mut doc = Document::with_version("1.5");
        let first_id = doc.new_object_id();
        let second_id = doc.new_object_id();
        doc.objects.insert(first_id, Object::Dictionary(lopdf::dictionary! { "Parent" => second_id }));
        doc.objects.insert(second_id, Object::Dictionary(lopdf::dictionary! { "Parent" => first_id }));
        let page_id = doc.add_object(lopdf::dictionary! { "Type" => "Page", "Parent" => first_id });

        assert!(page_resources(&doc, page_id).is_none());
        assert!(page_images(&doc, page_id).is_empty());
    }

    #[test]
    fn test_report_seen_count_includes_skipped() {
        let report = ExtractReport {
            images: vec![ExtractedImage {
                page: 1,
                file_name: "fire-dragon.webp".into(),
                status: SaveStatus::Saved,
                original_size: 100,
                saved_size: 50,
            }],
            skipped: vec!["ページ1 画像2: 未対応のフィルタ: CCITTFaxDecode".into()],
        };
        assert_eq!(report.seen_count(), 2);
        assert_eq!(report.new_count(), 1);
    }
}
