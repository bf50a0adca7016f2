//! Record images, decoded off the UI thread and sampled into colour grids for half-block
//! rendering.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, Sender},
};

use image::RgbImage;
use ratatui::style::Color;

/// Decoded images are shrunk to fit within this many pixels on each side.
const DECODED_MAX_SIDE: u32 = 160;

/// A `cols × rows` grid of colours, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtGrid {
    pub cols: usize,
    pub rows: usize,
    pub colors: Vec<Color>,
}
impl ArtGrid {
    pub fn filled(cols: usize, rows: usize, color: Color) -> Self {
        Self {
            cols,
            rows,
            colors: vec![color; cols * rows],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Color> {
        (col < self.cols && row < self.rows).then(|| self.colors[row * self.cols + col])
    }
}

struct Decoded {
    image_ref: String,
    image: Option<RgbImage>,
}

enum ArtState {
    Loading,
    Loaded(RgbImage),
    Failed,
}

/// Cache of record images keyed by image reference.
///
/// References are resolved relative to the catalog's directory. Anything that isn't a local
/// file (e.g. an `http` URL) is marked failed and drawn with the record's colour instead.
pub struct ArtCache {
    base_dir: PathBuf,
    entries: HashMap<String, ArtState>,
    decoded_tx: Sender<Decoded>,
    decoded_rx: Receiver<Decoded>,
}

impl ArtCache {
    pub fn new(base_dir: PathBuf) -> Self {
        let (decoded_tx, decoded_rx) = std::sync::mpsc::channel();
        Self {
            base_dir,
            entries: HashMap::new(),
            decoded_tx,
            decoded_rx,
        }
    }

    /// Collects images that finished decoding.
    pub fn update(&mut self) {
        for decoded in self.decoded_rx.try_iter() {
            let state = match decoded.image {
                Some(image) => {
                    tracing::debug!("decoded {}", decoded.image_ref);
                    ArtState::Loaded(image)
                }
                None => ArtState::Failed,
            };
            self.entries.insert(decoded.image_ref, state);
        }
    }

    /// Returns whether the image for `image_ref` is still being decoded, requesting it if it
    /// hasn't been seen yet.
    pub fn is_loading(&mut self, image_ref: &str) -> bool {
        self.request(image_ref);
        matches!(self.entries.get(image_ref), Some(ArtState::Loading))
    }

    /// Samples the image into a grid, or `None` if it isn't available (yet).
    pub fn grid(&mut self, image_ref: &str, cols: usize, rows: usize) -> Option<ArtGrid> {
        self.request(image_ref);
        match self.entries.get(image_ref) {
            Some(ArtState::Loaded(image)) => Some(sample_grid(image, cols, rows)),
            _ => None,
        }
    }

    /// Width / height of the decoded image, if loaded.
    pub fn aspect_ratio(&self, image_ref: &str) -> Option<f32> {
        match self.entries.get(image_ref) {
            Some(ArtState::Loaded(image)) if image.height() > 0 => {
                Some(image.width() as f32 / image.height() as f32)
            }
            _ => None,
        }
    }

    fn request(&mut self, image_ref: &str) {
        if self.entries.contains_key(image_ref) {
            return;
        }
        let Some(path) = resolve_local_path(&self.base_dir, image_ref) else {
            tracing::warn!("image {image_ref} is not a local file, using folder colour");
            self.entries.insert(image_ref.to_string(), ArtState::Failed);
            return;
        };

        self.entries.insert(image_ref.to_string(), ArtState::Loading);
        let tx = self.decoded_tx.clone();
        let image_ref = image_ref.to_string();
        std::thread::spawn(move || {
            let image = match image::open(&path) {
                Ok(img) => Some(img.thumbnail(DECODED_MAX_SIDE, DECODED_MAX_SIDE).to_rgb8()),
                Err(e) => {
                    tracing::warn!("failed to load {}: {e}", path.display());
                    None
                }
            };
            let _ = tx.send(Decoded { image_ref, image });
        });
    }
}

fn resolve_local_path(base_dir: &Path, image_ref: &str) -> Option<PathBuf> {
    if image_ref.is_empty() || image_ref.contains("://") {
        return None;
    }
    let path = Path::new(image_ref);
    Some(if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    })
}

/// Averages the image over a `cols × rows` grid of regions.
pub fn sample_grid(image: &RgbImage, cols: usize, rows: usize) -> ArtGrid {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w == 0 || h == 0 || cols == 0 || rows == 0 {
        return ArtGrid::filled(cols, rows, Color::DarkGray);
    }

    let average_region = |x0: usize, y0: usize, x1: usize, y1: usize| -> Color {
        let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = image.get_pixel(x as u32, y as u32);
                r += pixel[0] as u64;
                g += pixel[1] as u64;
                b += pixel[2] as u64;
                count += 1;
            }
        }
        if count == 0 {
            return Color::DarkGray;
        }
        Color::Rgb((r / count) as u8, (g / count) as u8, (b / count) as u8)
    };

    let mut colors = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        let y0 = row * h / rows;
        let y1 = ((row + 1) * h / rows).max(y0 + 1).min(h);
        for col in 0..cols {
            let x0 = col * w / cols;
            let x1 = ((col + 1) * w / cols).max(x0 + 1).min(w);
            colors.push(average_region(x0, y0, x1, y1));
        }
    }
    ArtGrid { cols, rows, colors }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn test_sample_grid_averages_regions() {
        // Left half red, right half blue.
        let image = RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let grid = sample_grid(&image, 2, 1);
        assert_eq!(grid.get(0, 0), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(grid.get(1, 0), Some(Color::Rgb(0, 0, 255)));
        assert_eq!(grid.get(2, 0), None);

        let single = sample_grid(&image, 1, 1);
        assert_eq!(single.get(0, 0), Some(Color::Rgb(127, 0, 127)));
    }

    #[test]
    fn test_sample_grid_upscales() {
        let image = RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]));
        let grid = sample_grid(&image, 3, 2);
        assert!(grid.colors.iter().all(|c| *c == Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn test_remote_refs_are_not_loaded() {
        let mut cache = ArtCache::new(PathBuf::from("."));
        assert!(cache.grid("https://example.com/a.jpg", 4, 4).is_none());
        assert!(!cache.is_loading("https://example.com/a.jpg"));
    }

    #[test]
    fn test_relative_refs_resolve_against_base_dir() {
        let base = Path::new("/records");
        assert_eq!(
            resolve_local_path(base, "img/a.png"),
            Some(PathBuf::from("/records/img/a.png"))
        );
        assert_eq!(resolve_local_path(base, ""), None);
    }
}
