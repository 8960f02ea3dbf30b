use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use egui::{pos2, Pos2};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader, RgbImage};

use crate::error::{CanvasError, CanvasResult};
use crate::point::{Point, Rgb};
use crate::state::ExportRender;

const HEADER_SIZE: usize = 8;
const RECORD_SIZE: usize = 6 * 4;
const JPEG_QUALITY: u8 = 95;

/// Writes a point list as `[count: u64][x, y, r, g, b, radius: f32]*count`, little-endian
pub fn write_points<W: Write>(mut writer: W, points: &[Point]) -> std::io::Result<()> {
    writer.write_all(&(points.len() as u64).to_le_bytes())?;
    for point in points {
        let position = point.position();
        let color = point.color();
        for value in [position.x, position.y, color.r, color.g, color.b, point.radius()] {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    writer.flush()
}

/// Reads a whole point list. Nothing is returned unless every record is valid.
pub fn read_points<R: Read>(mut reader: R) -> CanvasResult<Vec<Point>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_points(&bytes)
}

fn decode_points(bytes: &[u8]) -> CanvasResult<Vec<Point>> {
    let found = bytes.len() as u64;
    let Some((header, body)) = bytes.split_first_chunk::<HEADER_SIZE>() else {
        return Err(CanvasError::Truncated {
            expected: HEADER_SIZE as u64,
            found,
        });
    };

    let count = u64::from_le_bytes(*header);
    let expected = count
        .checked_mul(RECORD_SIZE as u64)
        .and_then(|len| len.checked_add(HEADER_SIZE as u64))
        .unwrap_or(u64::MAX);
    if found < expected {
        return Err(CanvasError::Truncated { expected, found });
    }
    if found > expected {
        log::warn!("Ignoring {} trailing bytes after point list", found - expected);
    }

    body.chunks_exact(RECORD_SIZE)
        .take(count as usize)
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

fn decode_record(index: usize, record: &[u8]) -> CanvasResult<Point> {
    let mut values = [0.0f32; 6];
    for (value, raw) in values.iter_mut().zip(record.chunks_exact(4)) {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(raw);
        *value = f32::from_le_bytes(buf);
    }

    if values.iter().any(|value| !value.is_finite()) {
        return Err(CanvasError::InvalidRecord {
            index,
            reason: "non-finite value",
        });
    }

    let [x, y, r, g, b, radius] = values;
    if radius <= 0.0 {
        return Err(CanvasError::InvalidRecord {
            index,
            reason: "radius must be positive",
        });
    }

    // Radii below MIN_RADIUS are raised to it, as for any other point
    Ok(Point::new(pos2(x, y), Rgb::new(r, g, b), radius))
}

/// Saves the point list to `path`, replacing any existing file
pub fn save_points(path: &Path, points: &[Point]) -> CanvasResult<()> {
    let file = File::create(path).map_err(|err| CanvasError::open(path, err))?;
    write_points(BufWriter::new(file), points)?;
    log::info!("Saved {} points to {}", points.len(), path.display());
    Ok(())
}

pub fn load_points(path: &Path) -> CanvasResult<Vec<Point>> {
    let file = File::open(path).map_err(|err| CanvasError::open(path, err))?;
    let points = read_points(BufReader::new(file))?;
    log::info!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Decodes an image file, optionally stretching it to `fit` (width, height)
pub fn decode_image(path: &Path, fit: Option<(u32, u32)>) -> CanvasResult<RgbImage> {
    let file = File::open(path).map_err(|err| CanvasError::open(path, err))?;
    let image = ImageReader::new(BufReader::new(file))
        .with_guessed_format()?
        .decode()
        .map_err(CanvasError::Decode)?;
    log::debug!(
        "Decoded image {}: {}x{}",
        path.display(),
        image.width(),
        image.height()
    );

    let image = match fit {
        Some((width, height)) => image.resize_exact(width, height, FilterType::Triangle),
        None => image,
    };
    Ok(image.to_rgb8())
}

/// Samples every `step`-th pixel on both axes into points of `radius`
pub fn points_from_image(image: &RgbImage, step: usize, radius: f32) -> Vec<Point> {
    let step = step.max(1);
    let mut points = Vec::new();
    for y in (0..image.height()).step_by(step) {
        for x in (0..image.width()).step_by(step) {
            let pixel = image.get_pixel(x, y);
            points.push(Point::new(
                pos2(x as f32, y as f32),
                Rgb::from_rgb8(pixel.0),
                radius,
            ));
        }
    }
    points
}

/// Renders the points onto a black `width` x `height` buffer, in order.
///
/// Centres are truncated toward zero; anything outside the buffer is clipped.
pub fn rasterize(points: &[Point], width: u32, height: u32, render: ExportRender) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for point in points {
        let center = point.position();
        if !center.x.is_finite() || !center.y.is_finite() {
            continue;
        }
        let pixel = image::Rgb(point.color().to_rgb8());
        let center = pos2(center.x.trunc(), center.y.trunc());
        match render {
            ExportRender::Pixel => put_pixel(&mut image, center, pixel),
            ExportRender::Disk => fill_disk(&mut image, center, point.radius(), pixel),
        }
    }
    image
}

fn put_pixel(image: &mut RgbImage, at: Pos2, pixel: image::Rgb<u8>) {
    if at.x >= 0.0 && at.y >= 0.0 && at.x < image.width() as f32 && at.y < image.height() as f32 {
        image.put_pixel(at.x as u32, at.y as u32, pixel);
    }
}

/// Inclusive pixel span `[center - reach, center + reach]` clipped to `0..len`
fn clipped_span(center: f32, reach: f32, len: u32) -> Option<(u32, u32)> {
    let low = (center - reach).max(0.0);
    let high = (center + reach).min(len as f32 - 1.0);
    (len > 0 && low <= high).then(|| (low as u32, high as u32))
}

fn fill_disk(image: &mut RgbImage, center: Pos2, radius: f32, pixel: image::Rgb<u8>) {
    let reach = radius.ceil();
    let radius_sq = radius * radius;
    let Some((x_low, x_high)) = clipped_span(center.x, reach, image.width()) else {
        return;
    };
    let Some((y_low, y_high)) = clipped_span(center.y, reach, image.height()) else {
        return;
    };

    for y in y_low..=y_high {
        let dy = y as f32 - center.y;
        for x in x_low..=x_high {
            let dx = x as f32 - center.x;
            if dx * dx + dy * dy <= radius_sq {
                image.put_pixel(x, y, pixel);
            }
        }
    }
}

/// Image formats accepted for export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Picks the format from the file extension, case-insensitively
    pub fn from_path(path: &Path) -> CanvasResult<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(CanvasError::UnsupportedFormat(extension)),
        }
    }
}

/// Encodes `image` to `path` using the format implied by its extension
pub fn encode_image(image: &RgbImage, path: &Path) -> CanvasResult<()> {
    let format = ExportFormat::from_path(path)?;
    let file = File::create(path).map_err(|err| CanvasError::open(path, err))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Png => image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(CanvasError::Encode)?,
        ExportFormat::Jpeg => JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
            .encode_image(image)
            .map_err(CanvasError::Encode)?,
    }
    writer.flush()?;

    log::info!(
        "Exported {}x{} image to {} ({:?})",
        image.width(),
        image.height(),
        path.display(),
        format
    );
    Ok(())
}

/// Opens `path` with the platform's default application. Failures are only logged.
pub fn open_in_shell(path: &Path) {
    match open::that_detached(path) {
        Ok(()) => log::info!("Opened {} with the default application", path.display()),
        Err(err) => log::warn!("Failed to open {}: {}", path.display(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new(pos2(0.0, 0.0), Rgb::new(1.0, 0.0, 0.0), 2.0),
            Point::new(pos2(799.5, 12.25), Rgb::new(0.1, 0.2, 0.3), 42.0),
            Point::new(pos2(-3.0, 1e6), Rgb::BLACK, 0.5),
        ]
    }

    #[test]
    fn test_point_list_round_trip() {
        let points = sample_points();
        let mut bytes = Vec::new();
        write_points(&mut bytes, &points).unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE + points.len() * RECORD_SIZE);
        assert_eq!(read_points(bytes.as_slice()).unwrap(), points);
    }

    #[test]
    fn test_empty_list_round_trip() {
        let mut bytes = Vec::new();
        write_points(&mut bytes, &[]).unwrap();
        assert_eq!(bytes, 0u64.to_le_bytes());
        assert!(read_points(bytes.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_list_is_rejected() {
        let mut bytes = Vec::new();
        write_points(&mut bytes, &sample_points()).unwrap();
        bytes.truncate(bytes.len() - 1);

        let err = read_points(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CanvasError::Truncated { .. }));

        let err = read_points(&[1u8, 2, 3][..]).unwrap_err();
        assert!(matches!(err, CanvasError::Truncated { expected: 8, found: 3 }));
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let bytes = u64::MAX.to_le_bytes();
        let err = read_points(&bytes[..]).unwrap_err();
        assert!(matches!(err, CanvasError::Truncated { .. }));
    }

    #[test]
    fn test_invalid_radius_is_rejected() {
        let mut bytes = 1u64.to_le_bytes().to_vec();
        for value in [1.0f32, 1.0, 1.0, 1.0, 1.0, 0.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let err = read_points(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_small_radius_is_raised_on_load() {
        let mut bytes = 1u64.to_le_bytes().to_vec();
        for value in [3.0f32, 4.0, 0.0, 1.0, 0.0, 0.25] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let points = read_points(bytes.as_slice()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].position(), pos2(3.0, 4.0));
        assert_eq!(points[0].radius(), crate::point::MIN_RADIUS);
    }

    #[test]
    fn test_sparse_sampling() {
        let image = RgbImage::from_pixel(5, 3, image::Rgb([0, 255, 0]));
        let points = points_from_image(&image, 2, 2.0);

        let positions: Vec<_> = points.iter().map(|p| p.position()).collect();
        assert_eq!(
            positions,
            vec![
                pos2(0.0, 0.0),
                pos2(2.0, 0.0),
                pos2(4.0, 0.0),
                pos2(0.0, 2.0),
                pos2(2.0, 2.0),
                pos2(4.0, 2.0),
            ]
        );
        assert!(points.iter().all(|p| p.radius() == 2.0));
        assert!(points.iter().all(|p| p.color() == Rgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_disk_rendering() {
        let points = [Point::new(pos2(5.0, 5.0), Rgb::WHITE, 2.0)];
        let image = rasterize(&points, 11, 11, ExportRender::Disk);

        assert_eq!(image.get_pixel(5, 5).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(7, 5).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(5, 3).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(7, 7).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(8, 5).0, [0, 0, 0]);
    }

    #[test]
    fn test_disk_is_clipped_to_buffer() {
        let points = [
            Point::new(pos2(0.0, 0.0), Rgb::WHITE, 3.0),
            Point::new(pos2(-50.0, 2.0), Rgb::WHITE, 3.0),
        ];
        let image = rasterize(&points, 4, 4, ExportRender::Disk);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(3, 3).0, [0, 0, 0]);
    }

    #[test]
    fn test_extreme_points_are_clipped() {
        let points = [
            Point::new(pos2(1e30, 5.0), Rgb::WHITE, 2.0),
            Point::new(pos2(-1e30, -1e30), Rgb::WHITE, 1e20),
            Point::new(pos2(2.0, -1e30), Rgb::WHITE, 3.0),
        ];
        for render in [ExportRender::Disk, ExportRender::Pixel] {
            let image = rasterize(&points, 4, 4, render);
            assert!(image.pixels().all(|p| p.0 == [0, 0, 0]), "{render:?}");
        }
    }

    #[test]
    fn test_huge_radius_fills_buffer() {
        let points = [Point::new(pos2(5.0, 5.0), Rgb::WHITE, 1e20)];
        let image = rasterize(&points, 4, 4, ExportRender::Disk);
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_later_points_win() {
        let points = [
            Point::new(pos2(1.0, 1.0), Rgb::new(1.0, 0.0, 0.0), 1.0),
            Point::new(pos2(1.0, 1.0), Rgb::new(0.0, 0.0, 1.0), 1.0),
        ];
        let image = rasterize(&points, 3, 3, ExportRender::Pixel);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 255]);
    }

    #[test]
    fn test_export_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.png")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.PNG")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.jpg")).unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("a.JPEG")).unwrap(), ExportFormat::Jpeg);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.bmp")),
            Err(CanvasError::UnsupportedFormat(ext)) if ext == "bmp"
        ));
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }
}
