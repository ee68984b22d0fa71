// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end orientation tests on a full-size synthetic photo.
//
// The recogniser is a stand-in that "reads" a dark title bar: it reports
// TEST IMAGE only when the bar sits at the top-left of the frame, the way
// real OCR only reads text held upright.

use std::cell::Cell;

use heictext_core::config::AppConfig;
use heictext_core::error::Result;
use heictext_core::types::{PreprocessProfile, Rotation};
use heictext_document::ImageProcessor;
use heictext_ocr::engine::TextExtractor;
use heictext_ocr::orientation::find_orientation;
use heictext_ocr::pipeline::Pipeline;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};

const SIDE: u32 = 4000;
const BAR_LEFT: u32 = 200;
const BAR_TOP: u32 = 300;
const BAR_WIDTH: u32 = 1600;
const BAR_HEIGHT: u32 = 250;

/// White page with the title bar in the upright position.
fn upright_page() -> DynamicImage {
    let mut page = GrayImage::from_pixel(SIDE, SIDE, Luma([255u8]));
    for y in BAR_TOP..BAR_TOP + BAR_HEIGHT {
        for x in BAR_LEFT..BAR_LEFT + BAR_WIDTH {
            page.put_pixel(x, y, Luma([0u8]));
        }
    }
    DynamicImage::ImageLuma8(page)
}

fn upside_down_page() -> DynamicImage {
    ImageProcessor::from_dynamic(upright_page())
        .rotate(Rotation::Deg180)
        .into_dynamic()
}

struct TitleReader {
    calls: Cell<usize>,
}

impl TitleReader {
    fn new() -> Self {
        Self { calls: Cell::new(0) }
    }
}

impl TextExtractor for TitleReader {
    fn name(&self) -> &str {
        "title-reader"
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        let centre = image.get_pixel(BAR_LEFT + BAR_WIDTH / 2, BAR_TOP + BAR_HEIGHT / 2);
        if centre.0[0] < 128 {
            Ok("TEST IMAGE\nheictext orientation check".into())
        } else {
            Ok(String::new())
        }
    }
}

#[test]
fn upside_down_photo_is_read_at_180_degrees() {
    let reader = TitleReader::new();
    let report = find_orientation(&upside_down_page(), &reader).unwrap();

    assert_eq!(report.best, Rotation::Deg180);
    assert!(report.best_text.to_lowercase().contains("test image"));
    assert_eq!(reader.calls.get(), 4);
    assert_eq!(
        report.candidates.iter().map(|c| c.rotation).collect::<Vec<_>>(),
        Rotation::ALL
    );
    assert!(
        report
            .candidates
            .iter()
            .filter(|c| c.rotation != Rotation::Deg180)
            .all(|c| c.alphanumeric == 0)
    );
}

#[test]
fn upright_photo_stays_at_zero_degrees() {
    let report = find_orientation(&upright_page(), &TitleReader::new()).unwrap();
    assert_eq!(report.best, Rotation::Deg0);
}

#[test]
fn pipeline_writes_text_from_upside_down_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("IMG_7518.png");
    upside_down_page().save(&input).unwrap();
    let out = dir.path().join("text");

    let config = AppConfig {
        auto_rotate: true,
        preprocess: PreprocessProfile::None,
        save_images: true,
        ..AppConfig::default()
    };
    let pipeline = Pipeline::with_extractor(config, Box::new(TitleReader::new()));
    let outcome = pipeline.process_file(&input, &out).unwrap();

    assert_eq!(outcome.rotation, Some(Rotation::Deg180));
    let written = std::fs::read_to_string(out.join("IMG_7518.txt")).unwrap();
    assert!(written.to_lowercase().contains("test image"));
    assert!(out.join("IMG_7518_rotated_180deg.png").is_file());
}
