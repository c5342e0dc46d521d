use super::*;

struct Fixed(Option<EncodedImage>);

impl BackgroundGenerator for Fixed {
    async fn generate_background(&self, _request: &GenerationRequest) -> Option<EncodedImage> {
        self.0.clone()
    }
}

#[test]
fn encoded_image_becomes_embedded_source() {
    let source = EncodedImage::png(vec![1, 2, 3]).into_source();
    match &source {
        ImageSource::Embedded(e) => {
            assert_eq!(e.mime, "image/png");
            assert_eq!(e.decode_payload().unwrap(), vec![1, 2, 3]);
        }
        other => panic!("expected embedded source, got {other:?}"),
    }
    assert!(source.to_string().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn generator_is_usable_by_reference() {
    let generator = Fixed(Some(EncodedImage::png(vec![9])));
    let req = GenerationRequest::build(
        "x",
        crate::state::model::AspectRatio::Landscape16x9,
        None,
        None,
    );
    let by_ref = &generator;
    assert_eq!(
        by_ref.generate_background(&req).await,
        Some(EncodedImage::png(vec![9]))
    );
    assert_eq!(Fixed(None).generate_background(&req).await, None);
}
