use super::*;
use crate::codec::png::{CompressionLevel, FilterStrategy, encode_png};

fn png(px: [u8; 4]) -> Source {
    let buf = PixelBuffer::filled(3, 3, px).unwrap();
    Source::Bytes(encode_png(&buf, EncodeOpts::default()).unwrap())
}

#[tokio::test]
async fn blend_images_async_matches_blocking() {
    let engine = Engine::new();
    let opts = BlendOpts::algorithm("source_over");
    let bottom = png([0, 0, 0, 255]);
    let top = png([255, 255, 255, 128]);

    let sync_out = engine
        .blend_images(&bottom, &top, &Output::Memory, &opts, EncodeOpts::default())
        .unwrap();
    let non_blocking = engine
        .blend_images_async(bottom, top, Output::Memory, opts, EncodeOpts::default())
        .await
        .unwrap();
    assert_eq!(sync_out, non_blocking);
}

#[tokio::test]
async fn blend_multiple_async_surfaces_errors() {
    let engine = Engine::new();
    let err = engine
        .blend_multiple_async(
            vec![png([0; 4]), png([0; 4])],
            Output::Memory,
            MultipleOpts::uniform("nonexistent"),
            EncodeOpts::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlendError::UnknownAlgorithm { .. }));
}

#[tokio::test]
async fn decode_and_encode_async() {
    let engine = Engine::new();
    let buf = engine.decode_async(png([1, 2, 3, 4])).await.unwrap();
    assert_eq!(buf.pixel(2, 2), Some([1, 2, 3, 4]));

    let encoded = engine
        .encode_async(buf.clone(), Output::Memory, EncodeOpts::default())
        .await
        .unwrap();
    let back = engine
        .decode_async(Source::Bytes(encoded.bytes().unwrap().to_vec()))
        .await
        .unwrap();
    assert_eq!(back, buf);
}

#[tokio::test]
async fn benchmark_all_async_runs_sweep() {
    let engine = Engine::new();
    let opts = BenchOpts {
        algorithms: Some(vec!["alpha".into()]),
        ..BenchOpts::default()
    };
    let report = engine
        .blend_images_benchmark_all_async(png([0, 0, 0, 255]), png([9, 9, 9, 9]), opts)
        .await
        .unwrap();
    assert_eq!(
        report.entries.len(),
        CompressionLevel::ALL.len() * FilterStrategy::ALL.len()
    );
}
