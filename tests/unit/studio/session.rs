use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::assets::loader::SourceLoader;
use crate::render::cpu::CpuBackend;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn studio(mode: StudioMode) -> Studio<SourceLoader> {
    Studio::new(mode, Compositor::new(SourceLoader::new(), CpuBackend::default()))
}

struct Scripted {
    answer: Option<EncodedImage>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(answer: Option<EncodedImage>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }
}

impl BackgroundGenerator for Scripted {
    async fn generate_background(&self, _request: &GenerationRequest) -> Option<EncodedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

#[tokio::test]
async fn apply_merges_and_rerenders() {
    let mut s = studio(StudioMode::Classic);
    assert_eq!(s.surface().writes(), 0);
    let out = s.apply(&StatePatch::new().title("Hello")).await;
    assert_eq!(out, PresentOutcome::Presented { generation: 1 });
    assert_eq!(s.state().title, "Hello");
    assert_eq!(s.surface().writes(), 1);

    s.apply(&StatePatch::new().overlay_opacity(5.0)).await;
    assert_eq!(s.state().overlay_opacity, 1.0);
    assert_eq!(s.surface().writes(), 2);
}

#[tokio::test]
async fn generated_background_is_shown() {
    let mut s = studio(StudioMode::Classic);
    s.apply(&StatePatch::new().topic("desert road trip").overlay_opacity(0.0))
        .await;
    let generator = Scripted::new(Some(EncodedImage::png(png(16, 9, [0, 200, 0, 255]))));

    let out = s.generate_background(&generator).await.unwrap();
    assert!(matches!(out, PresentOutcome::Presented { .. }));
    assert!(!s.is_generating());
    assert!(matches!(
        s.state().background_image,
        Some(ImageSource::Embedded(_))
    ));
    assert!(s.surface().background_drawn());
    assert_eq!(
        s.surface().frame().unwrap().pixel(640, 100),
        Some([0, 200, 0, 255])
    );
}

#[tokio::test]
async fn failed_generation_leaves_state_untouched() {
    let mut s = studio(StudioMode::Classic);
    s.apply(&StatePatch::new().topic("cats")).await;
    let before = s.state().clone();
    let writes = s.surface().writes();

    let err = s
        .generate_background(&Scripted::new(None))
        .await
        .unwrap_err();
    assert!(matches!(err, ThumbError::RemoteGeneration(_)));
    assert!(err.to_string().contains(GENERATION_FAILED_MESSAGE));
    assert!(!s.is_generating());
    assert_eq!(s.state(), &before);
    assert_eq!(s.surface().writes(), writes);
}

#[tokio::test]
async fn generation_needs_a_topic() {
    let mut s = studio(StudioMode::Classic);
    let generator = Scripted::new(None);
    assert!(matches!(
        s.generate_background(&generator).await,
        Err(ThumbError::Validation(_))
    ));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert!(!s.is_generating());
}

#[tokio::test]
async fn only_one_generation_at_a_time() {
    let mut s = studio(StudioMode::Classic);
    s.apply(&StatePatch::new().topic("x")).await;
    let req = s.begin_generation().unwrap();
    assert_eq!(req.prompt, "x");
    assert!(s.is_generating());
    assert!(s.begin_generation().is_err());
    assert!(s.finish_generation(None).await.is_err());
    assert!(!s.is_generating());
}

struct Stalled;

impl BackgroundGenerator for Stalled {
    async fn generate_background(&self, _request: &GenerationRequest) -> Option<EncodedImage> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn cancelled_generation_clears_the_flag() {
    let mut s = studio(StudioMode::Classic);
    s.apply(&StatePatch::new().topic("night market")).await;
    let out = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        s.generate_background(&Stalled),
    )
    .await;
    assert!(out.is_err());
    assert!(!s.is_generating());
    assert!(s.begin_generation().is_ok());
}

#[tokio::test]
async fn upload_base_replaces_generated_background() {
    let mut s = studio(StudioMode::UgcFusion);
    s.render().await;
    assert!(s.export_png().is_err());

    let generated = ImageSource::embedded("image/png", &png(4, 4, [255, 0, 0, 255]));
    s.apply(&StatePatch::new().background_image(Some(generated)))
        .await;
    let base = ImageSource::embedded("image/png", &png(4, 4, [0, 0, 255, 255]));
    s.upload_base(base.clone()).await;

    assert_eq!(s.state().branding_image1, Some(base));
    assert_eq!(s.state().background_image, None);
    assert!(s.surface().background_drawn());
    let export = s.export_png().unwrap();
    assert!(export.file_name.starts_with("thumbnail-"));
    assert!(export.file_name.ends_with(".png"));
}
