use std::path::PathBuf;

use reelcap_caption_model::config::CaptionConfig;
use reelcap_caption_model::video::{FrameRate, SourceVideo};
use reelcap_caption_model::word::{parse_words, WordTimestamp};
use reelcap_layout_core::CaptionAnomaly;
use reelcap_render_engine::{BlockFont, CaptionPipeline};

fn load_fixture_words() -> Vec<WordTimestamp> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("words")
        .join("sample-words.json");

    let content = std::fs::read_to_string(path).expect("fixture words should be readable");
    parse_words(&content).expect("fixture words should parse")
}

fn vertical_source() -> SourceVideo {
    SourceVideo::new(1080, 1920, 13.0)
}

#[test]
fn fixture_run_reports_only_the_overlong_word() {
    let pipeline = CaptionPipeline::new(CaptionConfig::default(), &BlockFont);
    let run = pipeline
        .run(&vertical_source(), &load_fixture_words())
        .expect("fixture run should succeed");

    assert_eq!(run.groups.len(), 14);
    assert_eq!(run.images.len(), 14);
    assert_eq!(
        run.anomalies,
        vec![CaptionAnomaly::DegenerateGroup {
            group_index: 6,
            word: "INTERNATIONALIZATION".to_string(),
            width: 960.0,
            budget: 900,
        }]
    );
}

#[test]
fn fixture_images_are_ordered_and_inside_the_safe_band() {
    let pipeline = CaptionPipeline::new(CaptionConfig::default(), &BlockFont);
    let run = pipeline
        .run(&vertical_source(), &load_fixture_words())
        .expect("fixture run should succeed");

    for (i, image) in run.images.iter().enumerate() {
        assert_eq!(image.index, i);
        assert!(image.end > image.start);
        assert!(image.placement.within_safe_band);
        assert!(run
            .safe_area
            .contains_span(image.placement.y, image.image.height()));
        // Canvas corners never carry ink.
        assert_eq!(image.image.get_pixel(0, 0)[3], 0);
    }
    assert!(run.images.windows(2).all(|w| w[0].start <= w[1].start));
}

#[test]
fn fixture_overlays_serialize_without_pixels() {
    let pipeline = CaptionPipeline::new(CaptionConfig::default(), &BlockFont);
    let source = vertical_source().with_frame_rates(FrameRate::new(30, 1), FrameRate::new(30, 1));
    let run = pipeline
        .run(&source, &load_fixture_words())
        .expect("fixture run should succeed");

    let overlays: Vec<_> = run.images.iter().map(|i| i.overlay()).collect();
    let json = serde_json::to_value(&overlays).expect("overlays should serialize");
    assert_eq!(json[0]["text"], "SO HERE'S THE");
    assert_eq!(json[0]["x"].as_i64(), Some(run.images[0].placement.x as i64));
    assert!(json[0]["animation"]["zoom"].is_object());
}
