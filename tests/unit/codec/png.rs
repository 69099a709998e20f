use super::*;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let data: Vec<u8> = (0..h)
        .flat_map(|y| {
            (0..w).flat_map(move |x| {
                [
                    (x * 17) as u8,
                    (y * 29) as u8,
                    (x ^ y) as u8,
                    (x * y + 40) as u8,
                ]
            })
        })
        .collect();
    PixelBuffer::from_rgba8(w, h, data).unwrap()
}

#[test]
fn every_option_pair_decodes_to_same_pixels() {
    let buf = gradient(9, 7);
    for compression in CompressionLevel::ALL {
        for filter in FilterStrategy::ALL {
            let bytes = encode_png(&buf, EncodeOpts { compression, filter }).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
            let back = decode_png(&bytes).unwrap();
            assert_eq!(back, buf, "{compression}/{filter}");
        }
    }
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_png(b"definitely not a png").unwrap_err();
    assert!(matches!(err, BlendError::Decode(_)));
    assert_eq!(err.kind(), "DecodeError");
}

#[test]
fn decode_converts_rgb_to_rgba() {
    let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(rgb.as_raw(), 3, 2, ExtendedColorType::Rgb8)
        .unwrap();
    let buf = decode_png(&bytes).unwrap();
    assert_eq!(buf.dimensions(), (3, 2));
    assert_eq!(buf.pixel(2, 1), Some([10, 20, 30, 255]));
}

#[test]
fn option_strings_parse_case_insensitively() {
    assert_eq!("BEST".parse::<CompressionLevel>().unwrap(), CompressionLevel::Best);
    assert_eq!(" rle ".parse::<CompressionLevel>().unwrap(), CompressionLevel::Rle);
    assert_eq!("Paeth".parse::<FilterStrategy>().unwrap(), FilterStrategy::Paeth);
    assert_eq!("nofilter".parse::<FilterStrategy>().unwrap(), FilterStrategy::NoFilter);
}

#[test]
fn unknown_option_strings_are_rejected() {
    assert!(matches!(
        "fastest".parse::<CompressionLevel>(),
        Err(BlendError::InvalidEncodingOption(_))
    ));
    assert!(matches!(
        EncodeOpts::parse(None, Some("median")),
        Err(BlendError::InvalidEncodingOption(_))
    ));
}

#[test]
fn encode_opts_defaults() {
    let opts = EncodeOpts::parse(None, None).unwrap();
    assert_eq!(opts, EncodeOpts::default());
    assert_eq!(opts.compression, CompressionLevel::Fast);
    assert_eq!(opts.filter, FilterStrategy::NoFilter);

    let opts: EncodeOpts = serde_json::from_str(r#"{"compression":"best"}"#).unwrap();
    assert_eq!(opts.compression, CompressionLevel::Best);
    assert_eq!(opts.filter, FilterStrategy::NoFilter);
}

#[test]
fn write_then_read_back() {
    let dir = std::path::PathBuf::from("target").join("unit_codec_png");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.png");

    let buf = gradient(4, 4);
    write_png(&path, &buf, EncodeOpts::default()).unwrap();
    assert_eq!(read_png(&path).unwrap(), buf);
}

#[test]
fn write_into_missing_dir_is_io_error() {
    let dir = std::path::PathBuf::from("target").join("unit_codec_png_missing_dir");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("out.png");

    match write_png(&path, &gradient(2, 2), EncodeOpts::default()).unwrap_err() {
        BlendError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.exists());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = std::path::PathBuf::from("target").join("unit_codec_png_ensure");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("a").join("b").join("out.png");

    ensure_parent_dir(&path).unwrap();
    write_png(&path, &gradient(2, 2), EncodeOpts::default()).unwrap();
    assert!(path.exists());
}

#[test]
fn read_missing_file_is_io_error() {
    let path = std::path::PathBuf::from("target").join("unit_codec_png_missing.png");
    let _ = std::fs::remove_file(&path);
    match read_png(&path).unwrap_err() {
        BlendError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}
