use super::*;

#[test]
fn empty_patch_is_identity() {
    let s = CompositionState {
        title: "HELLO".to_string(),
        ..CompositionState::default()
    };
    assert!(StatePatch::new().is_empty());
    assert_eq!(s.apply(&StatePatch::new()), s);
}

#[test]
fn some_overwrites_none_keeps() {
    let s = CompositionState {
        title: "old".to_string(),
        subtitle: "keep me".to_string(),
        ..CompositionState::default()
    };
    let patch = StatePatch::new()
        .title("new")
        .text_style(TextStyle::Comic)
        .aspect_ratio(AspectRatio::Portrait9x16);
    let out = s.apply(&patch);
    assert_eq!(out.title, "new");
    assert_eq!(out.subtitle, "keep me");
    assert_eq!(out.text_style, TextStyle::Comic);
    assert_eq!(out.aspect_ratio, AspectRatio::Portrait9x16);
    // the input record is untouched
    assert_eq!(s.title, "old");
}

#[test]
fn image_fields_can_be_set_and_cleared() {
    let src = ImageSource::Remote("https://cdn.example.com/bg.png".to_string());
    let s = CompositionState::default()
        .apply(&StatePatch::new().background_image(Some(src.clone())));
    assert_eq!(s.background_image, Some(src));

    let cleared = s.apply(&StatePatch::new().background_image(None));
    assert!(cleared.background_image.is_none());
}

#[test]
fn json_patch_distinguishes_missing_from_null() {
    let s = CompositionState {
        background_image: Some(ImageSource::File("a.png".into())),
        branding_image1: Some(ImageSource::File("b.png".into())),
        ..CompositionState::default()
    };
    let patch = StatePatch::from_json_str(r#"{"backgroundImage": null, "title": "T"}"#).unwrap();
    assert_eq!(patch.background_image, Some(None));
    assert_eq!(patch.branding_image1, None);

    let out = s.apply(&patch);
    assert!(out.background_image.is_none());
    assert!(out.branding_image1.is_some());
    assert_eq!(out.title, "T");
}

#[test]
fn patched_values_are_sanitized() {
    let out = CompositionState::default()
        .apply(&StatePatch::new().overlay_opacity(3.0).branding_scale(0.0));
    assert_eq!(out.overlay_opacity, 1.0);
    assert_eq!(out.branding_scale, 1.0);
}

#[test]
fn bad_patch_color_is_rejected() {
    assert!(StatePatch::from_json_str(r##"{"primaryColor": "#12"}"##).is_err());
}
