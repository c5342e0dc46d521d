use super::*;

fn src(name: &str) -> ImageSource {
    ImageSource::Remote(format!("https://img.example.com/{name}.png"))
}

#[test]
fn identity_and_style_build_a_fusion_request() {
    let (face, vibe) = (src("face"), src("vibe"));
    let req = GenerationRequest::build(
        "  morning routine ",
        AspectRatio::Portrait9x16,
        Some(&face),
        Some(&vibe),
    );
    assert_eq!(req.kind, GenerationKind::Fusion);
    assert_eq!(req.references, vec![face, vibe]);
    assert_eq!(req.prompt, "morning routine");
    assert!(req.user_prompt.contains("\"morning routine\""));
    assert!(req.user_prompt.contains("image 1"));
    assert!(req.user_prompt.contains("image 2"));
    assert_eq!(req.aspect_ratio, AspectRatio::Portrait9x16);
}

#[test]
fn identity_only_builds_a_creator_scene() {
    let face = src("face");
    let req = GenerationRequest::build("gym", AspectRatio::Landscape16x9, Some(&face), None);
    assert_eq!(req.kind, GenerationKind::CreatorScene);
    assert_eq!(req.references, vec![face]);
}

#[test]
fn style_without_identity_is_ignored() {
    let vibe = src("vibe");
    let req = GenerationRequest::build("gym", AspectRatio::Landscape16x9, None, Some(&vibe));
    assert_eq!(req.kind, GenerationKind::PurePrompt);
    assert!(req.references.is_empty());
}

#[test]
fn system_instruction_always_forbids_text() {
    let face = src("face");
    for req in [
        GenerationRequest::build("a", AspectRatio::Landscape16x9, None, None),
        GenerationRequest::build("a", AspectRatio::Landscape16x9, Some(&face), None),
        GenerationRequest::build("a", AspectRatio::Landscape16x9, Some(&face), Some(&face)),
    ] {
        let lower = req.system_instruction.to_lowercase();
        assert!(lower.contains("never include text"), "{lower}");
        assert!(lower.contains("graphics"));
        assert!(lower.contains("watermarks"));
    }
}

#[test]
fn from_state_requires_a_topic() {
    let state = CompositionState::default();
    assert!(matches!(
        GenerationRequest::from_state(&state),
        Err(ThumbError::Validation(_))
    ));

    let state = CompositionState {
        topic: "street food tour".to_string(),
        branding_image1: Some(src("face")),
        branding_image2: Some(src("logo")),
        ..CompositionState::default()
    };
    let req = GenerationRequest::from_state(&state).unwrap();
    assert_eq!(req.kind, GenerationKind::Fusion);
    assert_eq!(req.references[0], src("face"));
}

#[test]
fn request_serializes_camel_case() {
    let req = GenerationRequest::build("x", AspectRatio::Landscape16x9, None, None);
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["kind"], "pure-prompt");
    assert_eq!(v["aspectRatio"], "16:9");
    assert!(v.get("systemInstruction").is_some());
}
