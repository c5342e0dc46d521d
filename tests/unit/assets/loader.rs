use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct CountingLoader {
    calls: AtomicUsize,
    fail: bool,
}

impl ImageLoader for CountingLoader {
    async fn load(&self, _source: &ImageSource) -> ThumbResult<PreparedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ThumbError::image_load("unreachable"));
        }
        Ok(PreparedImage {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
        })
    }
}

#[tokio::test]
async fn embedded_png_loads() {
    let src = ImageSource::embedded("image/png", &png_bytes(3, 2));
    let img = SourceLoader::new().load(&src).await.unwrap();
    assert_eq!((img.width, img.height), (3, 2));
}

#[tokio::test]
async fn embedded_svg_uses_svg_decoder() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="5" height="6"/>"#;
    let src = ImageSource::embedded("image/svg+xml", svg);
    let img = SourceLoader::new().load(&src).await.unwrap();
    assert_eq!((img.width, img.height), (5, 6));
}

#[tokio::test]
async fn file_source_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("thumbforge-loader-{}.png", std::process::id()));
    std::fs::write(&path, png_bytes(4, 4)).unwrap();
    let img = SourceLoader::new()
        .load(&ImageSource::File(path.clone()))
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!((img.width, img.height), (4, 4));
}

#[tokio::test]
async fn missing_file_is_image_load_error() {
    let err = SourceLoader::new()
        .load(&ImageSource::File("/definitely/not/here.png".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ThumbError::ImageLoad(_)), "{err}");
}

#[tokio::test]
async fn cache_reuses_successes() {
    let loader = CachedLoader::new(CountingLoader {
        calls: AtomicUsize::new(0),
        fail: false,
    });
    let src = ImageSource::Remote("https://example.invalid/a.png".to_string());
    let a = loader.load(&src).await.unwrap();
    let b = loader.load(&src).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.cached_len(), 1);

    loader.clear();
    loader.load(&src).await.unwrap();
    assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cache_does_not_remember_failures() {
    let loader = CachedLoader::new(CountingLoader {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let src = ImageSource::Remote("https://example.invalid/a.png".to_string());
    assert!(loader.load(&src).await.is_err());
    assert!(loader.load(&src).await.is_err());
    assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
    assert_eq!(loader.cached_len(), 0);
}

#[test]
fn hints_follow_mime_and_extension() {
    assert_eq!(hint_for_mime("image/SVG+xml"), ImageFormatHint::Svg);
    assert_eq!(hint_for_mime("image/png"), ImageFormatHint::Raster);
    assert_eq!(hint_for_path(Path::new("a/b.SVG")), ImageFormatHint::Svg);
    assert_eq!(hint_for_path(Path::new("a/b.jpg")), ImageFormatHint::Raster);
}
