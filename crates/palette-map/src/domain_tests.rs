//! End-to-end behavior tests for the conversion pipeline.
//!
//! These exercise the public API the way the CLI does: build a palette,
//! convert a raster, inspect the wire string.

use crate::color::{Rgb, Rgba};
use crate::convert::{GridConverter, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use crate::palette::{flag_palette, Palette};
use crate::serialize::{serialize_tokens, split_tokens};

fn small_palette() -> Palette {
    Palette::from_table(&[
        ("#FF0000", "0.0:0.0"),
        ("#00FF00", "0.0625:0.0"),
        ("#0000FF", "0.125:0.0"),
        ("#FFFFFF", "0.1875:0.0"),
        ("#000000", "0.25:0.0"),
    ])
    .unwrap()
}

/// Build a noisy RGBA raster with deterministic contents.
fn synthetic_image(width: usize, height: usize) -> Vec<Rgba> {
    (0..width * height)
        .map(|i| {
            Rgba::new(
                (i * 31 % 256) as u8,
                (i * 17 % 256) as u8,
                (i * 7 % 256) as u8,
                255,
            )
        })
        .collect()
}

#[test]
fn token_count_is_grid_size_for_any_source_resolution() {
    let converter = GridConverter::new(small_palette());
    let expected = DEFAULT_GRID_WIDTH * DEFAULT_GRID_HEIGHT;

    for (w, h) in [(1, 1), (3, 7), (100, 66), (640, 480), (1920, 1080)] {
        let image = synthetic_image(w, h);
        let result = converter.convert(&image, w, h).unwrap();
        assert_eq!(result.data.tokens().len(), expected, "source {w}x{h}");

        let wire = result.data.serialize();
        assert_eq!(split_tokens(&wire).len(), expected, "source {w}x{h}");
    }
}

#[test]
fn serialization_round_trip_is_stable() {
    let converter = GridConverter::new(small_palette()).grid_size(10, 6);
    let image = synthetic_image(33, 21);
    let result = converter.convert(&image, 33, 21).unwrap();

    let wire = result.data.serialize();
    let reparsed = split_tokens(&wire);
    assert_eq!(serialize_tokens(&reparsed), wire);
}

#[test]
fn conversion_is_byte_deterministic() {
    let converter = GridConverter::new(flag_palette().unwrap());
    let image = synthetic_image(123, 77);

    let first = converter.convert(&image, 123, 77).unwrap().data.serialize();
    let second = converter.convert(&image, 123, 77).unwrap().data.serialize();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn sentinel_colors_land_at_documented_positions() {
    // Grid-sized source (no resample distortion) with unique sentinels at
    // chosen cells; assert the traversal formula token N <-> (N / H, H-1 - N % H).
    let (w, h) = (10, 6);
    let converter = GridConverter::new(small_palette()).grid_size(w, h);

    let mut pixels = vec![Rgba::opaque(Rgb::new(255, 255, 255)); w * h];
    let sentinels = [
        ((0usize, 5usize), Rgb::new(255, 0, 0), "0.0:0.0"),
        ((0, 0), Rgb::new(0, 255, 0), "0.0625:0.0"),
        ((3, 2), Rgb::new(0, 0, 255), "0.125:0.0"),
        ((9, 0), Rgb::new(0, 0, 0), "0.25:0.0"),
    ];
    for &((x, y), color, _) in &sentinels {
        pixels[y * w + x] = Rgba::opaque(color);
    }

    let result = converter.convert(&pixels, w, h).unwrap();
    let tokens = result.data.tokens();

    for &((x, y), _, expected_token) in &sentinels {
        // Invert the formula: N = x * H + (H - 1 - y)
        let n = x * h + (h - 1 - y);
        assert_eq!(
            tokens[n], expected_token,
            "cell ({x}, {y}) should be token {n}"
        );
    }

    // First token is the bottom-left cell, last is the top-right cell.
    assert_eq!(tokens[0], "0.0:0.0");
    assert_eq!(tokens[w * h - 1], "0.25:0.0");
}

#[test]
fn transparent_pixels_all_collapse_to_fallback_token() {
    let palette = small_palette();
    let fallback_token = palette.token(palette.fallback_index()).to_string();
    let converter = GridConverter::new(palette).grid_size(4, 4);

    // Wildly different RGB values, all with alpha below 255
    let pixels: Vec<Rgba> = (0..16)
        .map(|i| Rgba::new((i * 16) as u8, 255 - (i * 16) as u8, (i * 5) as u8, (i * 15) as u8))
        .collect();
    let result = converter.convert(&pixels, 4, 4).unwrap();

    for token in result.data.tokens() {
        assert_eq!(token, &fallback_token);
    }
}

#[test]
fn end_to_end_1x1_red_to_2x2_grid() {
    let converter = GridConverter::new(small_palette()).grid_size(2, 2);
    let result = converter
        .convert(&[Rgba::new(255, 0, 0, 255)], 1, 1)
        .unwrap();

    let wire = result.data.serialize();
    assert_eq!(wire, "0.0:0.0,0.0:0.0,0.0:0.0,0.0:0.0");
    assert_eq!(wire.matches(',').count(), 3);
    assert!(!wire.ends_with(','));
}

#[test]
fn builtin_palette_full_pipeline() {
    let palette = flag_palette().unwrap();
    let converter = GridConverter::new(palette);
    let image = synthetic_image(64, 64);
    let result = converter.convert(&image, 64, 64).unwrap();

    // Every token must be one the built-in table actually contains
    let valid: std::collections::HashSet<&str> = converter
        .palette()
        .entries()
        .map(|e| e.token.as_str())
        .collect();
    for token in result.data.tokens() {
        assert!(valid.contains(token.as_str()), "unknown token {token}");
    }

    // And the recolored grid only contains palette keys
    let keys: std::collections::HashSet<[u8; 3]> = converter
        .palette()
        .entries()
        .map(|e| e.key.to_bytes())
        .collect();
    for &px in result.grid.pixels() {
        assert!(px.is_opaque());
        assert!(keys.contains(&px.rgb().to_bytes()));
    }
}

#[test]
fn shared_converter_produces_identical_results_across_threads() {
    use std::sync::Arc;

    let converter = Arc::new(GridConverter::new(flag_palette().unwrap()).grid_size(20, 13));
    let image = Arc::new(synthetic_image(50, 40));

    let baseline = converter.convert(&image, 50, 40).unwrap().data.serialize();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let converter = Arc::clone(&converter);
            let image = Arc::clone(&image);
            std::thread::spawn(move || converter.convert(&image, 50, 40).unwrap().data.serialize())
        })
        .collect();

    for handle in handles {
        let wire = handle.join().expect("conversion thread panicked");
        assert_eq!(wire, baseline);
    }
}
