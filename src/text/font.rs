use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

/// Where a loaded font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The configured font file.
    File(PathBuf),
    /// A face picked from the system font database, with its family name.
    System(String),
}

/// Raw font bytes plus the face index inside them (non-zero only for collections).
#[derive(Clone)]
pub struct LoadedFont {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
    pub origin: FontOrigin,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Read the font at `path`, falling back to [`system_fallback`] with a warning.
///
/// Returns `None` only when neither the file nor any system face is available.
pub fn load_font(path: &Path) -> Option<LoadedFont> {
    match std::fs::read(path) {
        Ok(bytes) => {
            return Some(LoadedFont {
                bytes: Arc::new(bytes),
                index: 0,
                origin: FontOrigin::File(path.to_path_buf()),
            });
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "custom font not found, using default"
            );
        }
    }
    system_fallback()
}

/// Bold sans-serif face from the system font database, or any face if none matches.
pub fn system_fallback() -> Option<LoadedFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        fontdb::Family::SansSerif,
        fontdb::Family::Name("DejaVu Sans"),
        fontdb::Family::Name("Liberation Sans"),
        fontdb::Family::Name("Helvetica"),
    ];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::BOLD,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let Some(id) = db.query(&query).or_else(|| db.faces().next().map(|f| f.id)) else {
        tracing::warn!("system font database is empty");
        return None;
    };

    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unknown".to_string());
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

    tracing::debug!(%family, index, "resolved fallback font");
    Some(LoadedFont {
        bytes: Arc::new(bytes),
        index,
        origin: FontOrigin::System(family),
    })
}
