use std::time::Duration;

use super::*;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::render::frame::RenderedFrame;
use crate::render::generation::GenerationCounter;
use crate::state::policy::StudioMode;

fn presented(frame: FrameRGBA, background_drawn: bool) -> Surface {
    let counter = GenerationCounter::new();
    let ticket = counter.issue();
    let mut surface = Surface::new();
    surface.present(
        &counter,
        RenderedFrame {
            ticket,
            frame,
            background_drawn,
        },
    );
    surface
}

#[test]
fn filename_uses_unix_millis() {
    let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
    assert_eq!(export_filename(now), "thumbnail-1700000000123.png");
    assert_eq!(export_filename(UNIX_EPOCH), "thumbnail-0.png");
}

#[test]
fn unpremultiply_restores_straight_color() {
    let px = Rgba8Premul::from_straight_rgba(200, 100, 0, 128).to_array();
    let out = unpremultiply(&px);
    assert!(out[0].abs_diff(200) <= 2, "{out:?}");
    assert!(out[1].abs_diff(100) <= 2, "{out:?}");
    assert_eq!(out[2], 0);
    assert_eq!(out[3], 128);
    assert_eq!(unpremultiply(&[9, 9, 9, 0]), vec![0, 0, 0, 0]);
    assert_eq!(unpremultiply(&[1, 2, 3, 255]), vec![1, 2, 3, 255]);
}

#[test]
fn encoded_png_decodes_to_same_pixels() {
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let frame = FrameRGBA::solid(canvas, Rgba8Premul::opaque(17, 34, 51));
    let bytes = encode_png(&frame).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (8, 4));
    assert_eq!(decoded.get_pixel(3, 2).0, [17, 34, 51, 255]);
}

#[test]
fn truncated_frame_is_rejected() {
    let frame = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 10],
        premultiplied: true,
    };
    assert!(matches!(encode_png(&frame), Err(ThumbError::Render(_))));
}

#[test]
fn empty_surface_cannot_export() {
    let err = export_png(&Surface::new(), &StudioMode::Classic.policy(), SystemTime::now())
        .unwrap_err();
    assert!(err.to_string().contains("export disabled"), "{err}");
}

#[test]
fn ugc_mode_requires_a_drawn_background() {
    let policy = StudioMode::UgcFusion.policy();
    let frame = FrameRGBA::solid(
        Canvas {
            width: 4,
            height: 4,
        },
        Rgba8Premul::opaque(0, 0, 0),
    );
    let without = presented(frame.clone(), false);
    let err = export_png(&without, &policy, SystemTime::now()).unwrap_err();
    assert!(matches!(err, ThumbError::Validation(_)));
    assert!(err.to_string().contains("export disabled"));

    let with = presented(frame.clone(), true);
    let export = export_png(&with, &policy, UNIX_EPOCH + Duration::from_millis(42)).unwrap();
    assert_eq!(export.file_name, "thumbnail-42.png");
    assert_eq!(export.generation, 1);

    // classic mode exports the fallback frame as-is
    assert!(export_png(&without, &StudioMode::Classic.policy(), SystemTime::now()).is_ok());
}

#[test]
fn export_writes_into_directory() {
    let dir = std::env::temp_dir().join(format!("thumbforge-export-{}", std::process::id()));
    let export = PngExport {
        file_name: "thumbnail-1.png".to_string(),
        generation: 1,
        bytes: vec![1, 2, 3],
    };
    let path = export.write_to_dir(&dir).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    let _ = std::fs::remove_dir_all(&dir);
}
