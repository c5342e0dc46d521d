use super::*;

#[test]
fn resolve_prefers_requested_face() {
    let book = FontBook::empty()
        .with_face(FontFace::SansBold, vec![1])
        .with_face(FontFace::Display, vec![3]);
    let (face, bytes) = book.resolve(FontFace::Display).unwrap();
    assert_eq!(face, FontFace::Display);
    assert_eq!(bytes.as_slice(), &[3]);
}

#[test]
fn resolve_falls_back_to_bold_then_anything() {
    let book = FontBook::empty()
        .with_face(FontFace::SansBold, vec![1])
        .with_face(FontFace::Display, vec![3]);
    assert_eq!(book.resolve(FontFace::SansBlack).unwrap().0, FontFace::SansBold);

    let only_display = FontBook::empty().with_face(FontFace::Display, vec![3]);
    assert_eq!(
        only_display.resolve(FontFace::SansBlack).unwrap().0,
        FontFace::Display
    );
    assert!(FontBook::empty().resolve(FontFace::SansBold).is_none());
}

#[test]
fn load_dir_skips_missing_files() {
    let dir = std::env::temp_dir().join(format!("thumbforge-fonts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let files = FontFiles::default();
    std::fs::write(dir.join(&files.display), b"not really a font").unwrap();

    let book = FontBook::load_dir(&dir, &files).unwrap();
    std::fs::remove_dir_all(&dir).ok();
    assert!(book.has_face(FontFace::Display));
    assert!(!book.has_face(FontFace::SansBold));
    assert!(!book.is_empty());
}

#[test]
fn default_file_names() {
    let files = FontFiles::default();
    assert_eq!(files.file_for(FontFace::SansBlack), "Montserrat-Black.ttf");
    assert_eq!(files.file_for(FontFace::Display), "Bangers-Regular.ttf");
}
