use image::{Rgb, RgbImage};
use std::fs;
use tempfile::TempDir;

/// Builds a dataset directory with one subdirectory per class, each filled
/// with uniformly colored JPEG files.
pub fn make_dataset(classes: &[(&str, Rgb<u8>, usize)]) -> TempDir {
    let root = tempfile::tempdir().unwrap();

    for (dir_name, color, count) in classes {
        let class_dir = root.path().join(dir_name);
        fs::create_dir(&class_dir).unwrap();
        for index in 0..*count {
            let path = class_dir.join(format!("{}_{:04}.jpg", dir_name, index));
            RgbImage::from_pixel(20, 20, *color).save(path).unwrap();
        }
    }

    root
}

pub const RED: Rgb<u8> = Rgb([220, 20, 20]);
pub const BLUE: Rgb<u8> = Rgb([20, 20, 220]);
