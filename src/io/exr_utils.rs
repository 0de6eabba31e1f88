/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector3f;

use exr::prelude::*;

/// Reads the first RGB(A) layer of an OpenEXR file; alpha is dropped.
pub fn read_exr_from_file(file_path: &str) -> exr::error::Result<Bitmap> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    let image = read_first_rgba_layer_from_file(
        file_path,
        |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
        |bitmap: &mut Bitmap, position, (r, g, b, _a): (f32, f32, f32, f32)| {
            bitmap[(position.x(), position.y())] = Vector3f::new(r, g, b);
        },
    )?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}

pub fn write_exr_to_file(bitmap: &Bitmap, file_path: &str) -> exr::error::UnitResult {
    log::info!("Starting writing openexr images: {}.", file_path);

    write_rgb_file(file_path, bitmap.width(), bitmap.height(), |x, y| {
        let p = bitmap[(x, y)];
        (p.x, p.y, p.z)
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_file_reads_back() {
        let mut bitmap = Bitmap::new(3, 2);
        bitmap[(0, 0)] = Vector3f::new(1.0, 0.5, 0.25);
        bitmap[(2, 1)] = Vector3f::new(4.0, 0.0, 8.0);

        let path = std::env::temp_dir().join(format!("glacage_exr_{}.exr", std::process::id()));
        let path = path.to_string_lossy().to_string();
        write_exr_to_file(&bitmap, &path).expect("write failed");
        let loaded = read_exr_from_file(&path).expect("read failed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.width(), 3);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded[(0, 0)], bitmap[(0, 0)]);
        assert_eq!(loaded[(2, 1)], bitmap[(2, 1)]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_exr_from_file("no/such/file.exr").is_err());
    }
}
