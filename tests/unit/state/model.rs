use super::*;

#[test]
fn canvas_is_a_function_of_aspect_ratio() {
    assert_eq!(
        AspectRatio::Landscape16x9.canvas(),
        Canvas {
            width: 1280,
            height: 720
        }
    );
    assert_eq!(
        AspectRatio::Portrait9x16.canvas(),
        Canvas {
            width: 720,
            height: 1280
        }
    );
    assert_eq!(AspectRatio::Landscape16x9.scale_factor(), 1.0);
    assert_eq!(AspectRatio::Portrait9x16.scale_factor(), 0.85);
}

#[test]
fn defaults_match_studio_open_state() {
    let s = CompositionState::default();
    assert_eq!(s.text_style, TextStyle::Impact);
    assert_eq!(s.aspect_ratio, AspectRatio::Landscape16x9);
    assert_eq!(s.primary_color.to_string(), "#ff0000");
    assert_eq!(s.secondary_color.to_string(), "#ffffff");
    assert_eq!(s.overlay_opacity, 0.3);
    assert!(s.show_overlay);
    assert_eq!(s.branding_position2, BrandingPosition::Right);
    assert_eq!(s.branding_scale, 1.0);
    assert!(s.background_image.is_none());
}

#[test]
fn json_uses_camel_case_and_fills_defaults() {
    let s = CompositionState::from_json_str(
        r##"{
            "title": "HELLO",
            "aspectRatio": "9:16",
            "textStyle": "gradient",
            "primaryColor": "#00FF00",
            "brandingImage1": "https://cdn.example.com/face.png",
            "brandingImage2": "",
            "backgroundImage": null,
            "brandingPosition2": "left"
        }"##,
    )
    .unwrap();
    assert_eq!(s.title, "HELLO");
    assert_eq!(s.aspect_ratio, AspectRatio::Portrait9x16);
    assert_eq!(s.text_style, TextStyle::Gradient);
    assert_eq!(s.primary_color, HexColor::rgb(0, 255, 0));
    assert_eq!(s.branding_position2, BrandingPosition::Left);
    assert!(matches!(s.branding_image1, Some(ImageSource::Remote(_))));
    assert!(s.branding_image2.is_none());
    assert!(s.background_image.is_none());
    assert_eq!(s.overlay_opacity, 0.3);

    let json = s.to_json_pretty().unwrap();
    assert!(json.contains("\"brandingImage1\""));
    assert!(json.contains("\"aspectRatio\": \"9:16\""));
    assert_eq!(CompositionState::from_json_str(&json).unwrap(), s);
}

#[test]
fn invalid_color_is_rejected() {
    let err = CompositionState::from_json_str(r#"{"primaryColor":"red"}"#).unwrap_err();
    assert!(matches!(err, ThumbError::Serde(_)), "{err}");
}

#[test]
fn sanitized_clamps_numeric_fields() {
    let s = CompositionState {
        overlay_opacity: 7.0,
        branding_scale: -2.0,
        ..CompositionState::default()
    }
    .sanitized();
    assert_eq!(s.overlay_opacity, 1.0);
    assert_eq!(s.branding_scale, 1.0);

    let s = CompositionState {
        overlay_opacity: f64::NAN,
        branding_scale: 50.0,
        ..CompositionState::default()
    }
    .sanitized();
    assert_eq!(s.overlay_opacity, 0.0);
    assert_eq!(s.branding_scale, MAX_BRANDING_SCALE);

    let s = CompositionState {
        branding_scale: f64::INFINITY,
        ..CompositionState::default()
    }
    .sanitized();
    assert_eq!(s.branding_scale, 1.0);
}

#[test]
fn aspect_ratio_parses_from_str() {
    assert_eq!(
        "9:16".parse::<AspectRatio>().unwrap(),
        AspectRatio::Portrait9x16
    );
    assert!("4:3".parse::<AspectRatio>().is_err());
}
