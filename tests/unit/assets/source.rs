use super::*;

#[test]
fn parse_classifies_sources() {
    let remote = ImageSource::parse("https://cdn.example.com/bg.png")
        .unwrap()
        .unwrap();
    assert_eq!(
        remote,
        ImageSource::Remote("https://cdn.example.com/bg.png".to_string())
    );

    let file = ImageSource::parse("assets/face.jpg").unwrap().unwrap();
    assert_eq!(file, ImageSource::File(PathBuf::from("assets/face.jpg")));

    let ImageSource::Embedded(e) = ImageSource::parse("data:image/PNG;base64,AAEC")
        .unwrap()
        .unwrap()
    else {
        panic!("expected embedded source");
    };
    assert_eq!(e.mime, "image/png");
    assert!(e.base64);
    assert_eq!(e.decode_payload().unwrap(), vec![0u8, 1, 2]);
}

#[test]
fn blank_is_absent() {
    assert!(ImageSource::parse("").unwrap().is_none());
    assert!(ImageSource::parse("   ").unwrap().is_none());
    assert!("".parse::<ImageSource>().is_err());
}

#[test]
fn data_url_without_separator_is_rejected() {
    assert!(ImageSource::parse("data:image/png;base64").is_err());
}

#[test]
fn corrupt_base64_fails_at_decode_not_parse() {
    let src = ImageSource::parse("data:image/png;base64,@@@@").unwrap().unwrap();
    let ImageSource::Embedded(e) = src else {
        panic!("expected embedded source");
    };
    let err = e.decode_payload().unwrap_err();
    assert!(err.to_string().contains("image load error"));
}

#[test]
fn percent_encoded_payload_decodes() {
    let src = ImageSource::parse("data:image/svg+xml,%3Csvg%3E").unwrap().unwrap();
    let ImageSource::Embedded(e) = src else {
        panic!("expected embedded source");
    };
    assert!(e.is_svg());
    assert_eq!(e.decode_payload().unwrap(), b"<svg>".to_vec());
}

#[test]
fn display_round_trips_string_form() {
    for s in [
        "data:image/png;base64,AAEC",
        "https://cdn.example.com/bg.png",
        "assets/face.jpg",
    ] {
        let src: ImageSource = s.parse().unwrap();
        assert_eq!(src.to_string(), s);
    }
}

#[test]
fn describe_hides_payload() {
    let src = ImageSource::embedded("image/png", &[7u8; 300]);
    let d = src.describe();
    assert!(d.starts_with("data:image/png ("));
    assert!(d.len() < 64);
}
