//! Integration tests for upload2png.
//!
//! Each test converts inside its own `TempDir`, standing in for the notebook's
//! working directory, and checks what is left on disk afterwards.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use upload2png::{
    convert, convert_in, ConversionConfig, ErrorKind, FileInfo, MultiFilePolicy, Upload,
    Upload2PngError,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 255 / w) as u8, (y * 255 / h) as u8, 90, 255])
    })
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("encode fixture");
    buf
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read_png(path: &Path) -> DynamicImage {
    let bytes = std::fs::read(path).expect("output exists");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "output is not a PNG");
    image::load_from_memory_with_format(&bytes, ImageFormat::Png).expect("decodable PNG")
}

// ── Conversion ───────────────────────────────────────────────────────────────

#[test]
fn lossless_sources_keep_their_pixels() {
    init_tracing();
    let src = DynamicImage::ImageRgba8(gradient(16, 9));

    for (name, format) in [
        ("photo.bmp", ImageFormat::Bmp),
        ("photo.png", ImageFormat::Png),
        ("photo.tiff", ImageFormat::Tiff),
    ] {
        let dir = TempDir::new().unwrap();
        let upload = Upload::single(name, encode(&src, format));

        let out = convert_in(&upload, dir.path()).expect(name);

        assert_eq!(out.output_path, dir.path().join("image.png"));
        let png = read_png(&out.output_path);
        assert_eq!(png.to_rgba8(), src.to_rgba8(), "{name}: pixels differ");
    }
}

#[test]
fn jpeg_source_keeps_dimensions() {
    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 12, Rgb([200, 30, 30])));
    let upload = Upload::single("cat.jpg", encode(&src, ImageFormat::Jpeg));

    let out = convert_in(&upload, dir.path()).unwrap();

    assert_eq!(out.source_format.as_deref(), Some("Jpeg"));
    let png = read_png(&out.output_path);
    assert_eq!((png.width(), png.height()), (20, 12));
}

#[test]
fn staged_original_is_removed() {
    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgba8(gradient(4, 4));
    let upload = Upload::single("upload.gif", encode(&src, ImageFormat::Gif));

    convert_in(&upload, dir.path()).unwrap();

    assert!(!dir.path().join("upload.gif").exists());
    assert_eq!(dir_entries(dir.path()), vec!["image.png"]);
}

#[test]
fn second_conversion_overwrites_first() {
    let dir = TempDir::new().unwrap();
    let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255])));
    let blue = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 2, Rgba([0, 0, 255, 255])));

    convert_in(&Upload::single("red.bmp", encode(&red, ImageFormat::Bmp)), dir.path()).unwrap();
    convert_in(&Upload::single("blue.png", encode(&blue, ImageFormat::Png)), dir.path()).unwrap();

    let png = read_png(&dir.path().join("image.png"));
    assert_eq!(png.to_rgba8(), blue.to_rgba8());
    assert_eq!(dir_entries(dir.path()), vec!["image.png"]);
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn non_image_fails_with_decode_error_and_no_output() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let upload = Upload::single("notes.txt", b"just some text, no pixels here".to_vec());

    let err = convert_in(&upload, dir.path()).unwrap_err();

    assert!(matches!(err, Upload2PngError::DecodeFailed { .. }), "{err}");
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(!dir.path().join("image.png").exists());
    assert!(dir_entries(dir.path()).is_empty(), "staged file left behind");
}

#[test]
fn decode_failure_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgba8(gradient(6, 6));
    convert_in(&Upload::single("ok.bmp", encode(&src, ImageFormat::Bmp)), dir.path()).unwrap();
    let before = std::fs::read(dir.path().join("image.png")).unwrap();

    let bad = Upload::single("broken.jpg", vec![0xFF, 0xD8, 0xFF, 0x00, 0x01]);
    assert!(convert_in(&bad, dir.path()).is_err());

    assert_eq!(std::fs::read(dir.path().join("image.png")).unwrap(), before);
    assert_eq!(dir_entries(dir.path()), vec!["image.png"]);
}

#[test]
fn empty_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = convert_in(&Upload::new(), dir.path()).unwrap_err();
    assert!(matches!(err, Upload2PngError::EmptyUpload));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn two_files_are_rejected_by_default() {
    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgba8(gradient(2, 2));
    let upload: Upload = [
        ("b.png", FileInfo::new(encode(&src, ImageFormat::Png))),
        ("a.bmp", FileInfo::new(encode(&src, ImageFormat::Bmp))),
    ]
    .into_iter()
    .collect();

    let err = convert_in(&upload, dir.path()).unwrap_err();

    match err {
        Upload2PngError::MultipleFiles { count, ref names } => {
            assert_eq!(count, 2);
            assert_eq!(names, &["a.bmp", "b.png"]);
        }
        other => panic!("expected MultipleFiles, got {other}"),
    }
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn two_files_first_by_name_converts_smallest_name() {
    let dir = TempDir::new().unwrap();
    let small = DynamicImage::ImageRgba8(gradient(2, 2));
    let large = DynamicImage::ImageRgba8(gradient(8, 8));
    let upload: Upload = [
        ("zz.png", FileInfo::new(encode(&large, ImageFormat::Png))),
        ("aa.png", FileInfo::new(encode(&small, ImageFormat::Png))),
    ]
    .into_iter()
    .collect();
    let config = ConversionConfig::builder()
        .output_dir(dir.path())
        .multi_file(MultiFilePolicy::FirstByName)
        .build()
        .unwrap();

    let out = convert(&upload, &config).unwrap();

    assert_eq!(out.source_name, "aa.png");
    assert_eq!((out.width, out.height), (2, 2));
    assert_eq!(dir_entries(dir.path()), vec!["image.png"]);
}

#[test]
fn missing_directory_is_filesystem_error() {
    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgba8(gradient(2, 2));
    let upload = Upload::single("a.png", encode(&src, ImageFormat::Png));

    let err = convert_in(&upload, dir.path().join("missing")).unwrap_err();

    assert!(matches!(err, Upload2PngError::StageFailed { .. }), "{err}");
    assert_eq!(err.kind(), ErrorKind::Filesystem);
}

// ── Widget JSON ──────────────────────────────────────────────────────────────

#[test]
fn converts_widget_json_dump() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let dir = TempDir::new().unwrap();
    let src = DynamicImage::ImageRgba8(gradient(7, 3));
    let json = format!(
        r#"{{"scan.bmp": {{"metadata": {{"name": "scan.bmp", "type": "image/bmp"}}, "content": "{}"}}}}"#,
        STANDARD.encode(encode(&src, ImageFormat::Bmp))
    );

    let upload = Upload::from_json(&json).unwrap();
    let out = convert_in(&upload, dir.path()).unwrap();

    assert_eq!(out.declared_type.as_deref(), Some("image/bmp"));
    assert_eq!(read_png(&out.output_path).to_rgba8(), src.to_rgba8());
}
