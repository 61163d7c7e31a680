use sha1::{Digest, Sha1};

/// Maximum number of images considered per class, ~134M.
pub const MAX_IMAGES_PER_CLASS: usize = (1 << 27) - 1;

/// Maps a bare file name to a position in the 0-100 percentage range.
///
/// The position depends on the file name text alone, so a file keeps its
/// assignment across runs, machines, and directory reshuffles. The SHA-1
/// digest is reduced modulo `MAX_IMAGES_PER_CLASS + 1`; since the modulus is
/// a power of two, that is the low 27 bits of the digest.
pub fn assignment_percentage(file_name: &str) -> f64 {
    let digest = Sha1::digest(file_name.as_bytes());
    let tail = u32::from_be_bytes([digest[16], digest[17], digest[18], digest[19]]);
    let bucket = tail & MAX_IMAGES_PER_CLASS as u32;
    bucket as f64 * (100.0 / MAX_IMAGES_PER_CLASS as f64)
}

/// Decides whether a file belongs to the validation subset.
pub fn is_validation(file_name: &str, validation_pct: f64) -> bool {
    assignment_percentage(file_name) < validation_pct
}
