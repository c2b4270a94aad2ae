//! File name and binary generators.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Extensions used for generated file names.
pub const FILE_EXTENSIONS: &[&str] = &[
    "flac", "mp3", "wav", "bmp", "gif", "jpeg", "jpg", "png", "tiff", "css", "csv", "html", "js",
    "json", "txt", "mp4", "avi", "mov", "webm",
];

/// Append a random media extension to `stem`.
pub fn file_name<R: Rng>(rng: &mut R, stem: &str) -> String {
    let extension = FILE_EXTENSIONS.choose(rng).copied().unwrap_or("txt");
    format!("{stem}.{extension}")
}
