use super::*;

#[test]
fn style_table() {
    let impact = TextStyle::Impact.spec();
    assert_eq!(impact.face, FontFace::SansBlack);
    assert_eq!(impact.weight, 900.0);
    assert_eq!((impact.title_px, impact.subtitle_px), (110.0, 50.0));

    for style in [TextStyle::Clean, TextStyle::Gradient] {
        let s = style.spec();
        assert_eq!(s.face, FontFace::SansBold);
        assert_eq!((s.title_px, s.subtitle_px), (90.0, 45.0));
    }
    assert_eq!(TextStyle::Comic.spec().face, FontFace::Display);
}

#[test]
fn sizes_scale_for_portrait() {
    let s = TextStyle::Impact.spec().scaled(0.85);
    assert!((s.title_px - 93.5).abs() < 1e-4);
    assert!((s.subtitle_px - 42.5).abs() < 1e-4);
    assert_eq!(s.face, FontFace::SansBlack);
}

#[test]
fn gradient_runs_white_to_primary_around_baseline() {
    let red = HexColor::rgb(255, 0, 0);
    let fill = TextStyle::Gradient.title_fill(red, 540.0);
    assert_eq!(fill.color_at(400.0), HexColor::WHITE);
    assert_eq!(fill.color_at(490.0), HexColor::WHITE);
    assert_eq!(fill.color_at(590.0), red);
    assert_eq!(fill.color_at(700.0), red);
    let mid = fill.color_at(540.0);
    assert_eq!(mid.r, 255);
    assert!(mid.g > 120 && mid.g < 135);
}

#[test]
fn flat_styles_use_primary() {
    let c = HexColor::rgb(1, 2, 3);
    for style in [TextStyle::Clean, TextStyle::Impact, TextStyle::Comic] {
        assert_eq!(style.title_fill(c, 0.0), TitleFill::Flat(c));
    }
}
