//! Image file output.
//!
//! - `.ppm`: plain-text P3, streamed straight from the render loop
//! - `.png`: rendered into memory, then encoded with the `image` crate

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use lumen_renderer::{color_to_rgb8, Camera, Color, Hittable, ImageBuffer, ImageSink};

/// Sink that writes a plain-text (P3) PPM image.
pub struct PpmSink<W: Write> {
    writer: W,
}

impl<W: Write> PpmSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ImageSink for PpmSink<W> {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        write!(self.writer, "P3\n{} {}\n255\n", width, height)
    }

    fn write_pixel(&mut self, rgb: [f64; 3]) -> io::Result<()> {
        let [r, g, b] = color_to_rgb8(Color::from_array(rgb));
        writeln!(self.writer, "{} {} {}", r, g, b)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Save a finished in-memory render as PNG.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(image.width(), image.height(), image.to_rgb8())
        .context("Image buffer does not match its dimensions")?;
    rgb.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

/// Render `world` and write the result to `path`, picking the format by extension.
pub fn render_to_file(camera: &mut Camera, world: &dyn Hittable, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    // Reject a bad configuration before anything is created on disk.
    camera.initialize()?;

    match extension.as_deref() {
        Some("ppm") => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut sink = PpmSink::new(BufWriter::new(file));
            camera.render(world, &mut sink)?;
        }
        Some("png") => {
            let mut image = ImageBuffer::new();
            camera.render(world, &mut image)?;
            save_png(&image, path)?;
        }
        _ => bail!("Unsupported output format for {} (expected .ppm or .png)", path.display()),
    }

    log::info!("Image saved as {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{DiffuseLight, HittableList, Material, Point3, Sphere};
    use std::sync::Arc;

    fn glowing_world() -> HittableList {
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(0.25)));
        HittableList::from_object(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0, light)))
    }

    fn tiny_camera() -> Camera {
        Camera::new()
            .with_resolution(4, 2.0)
            .with_quality(1, 2)
            .with_background(Color::ONE)
    }

    #[test]
    fn test_ppm_sink_format() {
        let mut buf = Vec::new();
        let mut sink = PpmSink::new(&mut buf);
        sink.begin(2, 1).unwrap();
        sink.write_pixel([1.0, 0.5, 0.0]).unwrap();
        sink.write_pixel([0.0, 0.0, 2.0]).unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 128 0\n0 0 255\n");
    }

    #[test]
    fn test_render_ppm_to_memory() {
        let world = glowing_world();
        let mut camera = tiny_camera();
        let mut buf = Vec::new();
        camera.render(&world, &mut PpmSink::new(&mut buf)).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["P3", "4 2", "255"]);
        assert_eq!(lines.len(), 3 + 8);
        // Corners see the white background
        assert_eq!(lines[3], "255 255 255");
    }

    #[test]
    fn test_render_png_file() {
        let path = std::env::temp_dir().join(format!("lumen-output-{}.png", std::process::id()));
        let world = glowing_world();
        let mut camera = tiny_camera();
        render_to_file(&mut camera, &world, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_unknown_extension() {
        let world = glowing_world();
        let mut camera = tiny_camera();
        let err = render_to_file(&mut camera, &world, Path::new("render.bmp")).unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
    }

    #[test]
    fn test_invalid_config_creates_no_file() {
        let path = std::env::temp_dir().join(format!("lumen-invalid-{}.ppm", std::process::id()));
        let world = glowing_world();
        let mut camera = tiny_camera().with_quality(0, 2);

        let err = render_to_file(&mut camera, &world, &path).unwrap_err();
        assert!(err.to_string().contains("samples_per_pixel"), "{err}");
        assert!(!path.exists());
    }
}
