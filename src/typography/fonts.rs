use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{foundation::error::ThumbResult, typography::style::FontFace};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Font file names, relative to the fonts directory.
pub struct FontFiles {
    pub sans_bold: String,
    pub sans_black: String,
    pub display: String,
}

impl Default for FontFiles {
    fn default() -> Self {
        Self {
            sans_bold: "Montserrat-Bold.ttf".to_string(),
            sans_black: "Montserrat-Black.ttf".to_string(),
            display: "Bangers-Regular.ttf".to_string(),
        }
    }
}

impl FontFiles {
    pub fn file_for(&self, face: FontFace) -> &str {
        match face {
            FontFace::SansBold => &self.sans_bold,
            FontFace::SansBlack => &self.sans_black,
            FontFace::Display => &self.display,
        }
    }
}

/// Font bytes per [`FontFace`].
///
/// Faces may be missing. [`FontBook::resolve`] falls back to the bold sans, then to any loaded
/// face, so a single font file is enough to render every style.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: BTreeMap<FontFace, Arc<Vec<u8>>>,
}

impl FontBook {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, face: FontFace, bytes: Vec<u8>) {
        self.faces.insert(face, Arc::new(bytes));
    }

    pub fn with_face(mut self, face: FontFace, bytes: Vec<u8>) -> Self {
        self.insert(face, bytes);
        self
    }

    /// Read every configured face from `dir`. Missing files are skipped with a warning.
    pub fn load_dir(dir: &Path, files: &FontFiles) -> ThumbResult<Self> {
        let mut book = Self::empty();
        for face in FontFace::ALL {
            let path: PathBuf = dir.join(files.file_for(face));
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!(?face, path = %path.display(), "loaded font face");
                    book.insert(face, bytes);
                }
                Err(e) => {
                    tracing::warn!(
                        ?face,
                        path = %path.display(),
                        error = %e,
                        "font face unavailable"
                    );
                }
            }
        }
        Ok(book)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn has_face(&self, face: FontFace) -> bool {
        self.faces.contains_key(&face)
    }

    /// Bytes for `face`, or the closest available substitute.
    pub fn resolve(&self, face: FontFace) -> Option<(FontFace, Arc<Vec<u8>>)> {
        let hit = |f: FontFace| self.faces.get(&f).map(|b| (f, b.clone()));
        hit(face)
            .or_else(|| hit(FontFace::SansBold))
            .or_else(|| self.faces.iter().next().map(|(f, b)| (*f, b.clone())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typography/fonts.rs"]
mod tests;
