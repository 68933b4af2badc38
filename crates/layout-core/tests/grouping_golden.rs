use std::path::PathBuf;

use reelcap_caption_model::config::CaptionConfig;
use reelcap_caption_model::group::CaptionGroup;
use reelcap_caption_model::style::ActiveStyle;
use reelcap_caption_model::word::{normalize_words, parse_words, WordTimestamp};
use reelcap_layout_core::grouping::width_budget;
use reelcap_layout_core::metrics::FixedAdvanceMeasure;
use reelcap_layout_core::timing::plan_frames;
use reelcap_layout_core::{SafeZonePositioner, TextLayoutEngine, WordGrouper};

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

fn fnv1a_64(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn default_groups() -> Vec<CaptionGroup> {
    let config = CaptionConfig::default();
    let words = normalize_words(&load_fixture_words());
    let budget = width_budget(1080, &config.grouping, config.scaling.reference_width);
    let measure = FixedAdvanceMeasure::for_font_size(config.style.font_size);
    WordGrouper::from_config(&config.grouping, budget).group(&words, &measure)
}

#[test]
fn default_grouping_fixture_signature_is_stable() {
    let groups = default_groups();

    let signature = groups
        .iter()
        .map(|g| format!("{:.3}|{:.3}|{}", g.start, g.end, g.text))
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(groups.len(), 14);
    assert_eq!(groups[0].text, "SO HERE'S THE");
    assert_eq!(groups[6].text, "INTERNATIONALIZATION");
    assert_eq!(fnv1a_64(&signature), 0x9df120816a9770c5);
}

#[test]
fn normalization_drops_punctuation_only_words() {
    let raw = load_fixture_words();
    let words = normalize_words(&raw);
    assert_eq!(raw.len(), 31);
    assert_eq!(words.len(), 30);

    let flattened: Vec<WordTimestamp> = default_groups()
        .into_iter()
        .flat_map(|g| g.words)
        .collect();
    assert_eq!(flattened, words);
}

#[test]
fn overlong_word_keeps_its_own_line() {
    let groups = default_groups();
    let style = ActiveStyle::default();
    let measure = FixedAdvanceMeasure::for_font_size(style.font_size);
    let engine = TextLayoutEngine::new(&style);

    let layout = engine.layout(&groups[6].words, 900, &measure, None);
    assert_eq!(layout.lines.len(), 1);
    assert_eq!(layout.lines[0].words[0].text, "INTERNATIONALIZATION");
    assert_eq!(layout.overlong_words().count(), 1);
    assert_eq!(layout.width, 960 + 2 * style.outer_padding());
}

#[test]
fn every_caption_fits_the_safe_band_at_reference_size() {
    let groups = default_groups();
    let style = ActiveStyle::default();
    let measure = FixedAdvanceMeasure::for_font_size(style.font_size);
    let engine = TextLayoutEngine::new(&style);
    let positioner = SafeZonePositioner::default();

    for group in &groups {
        let layout = engine.layout(&group.words, 900, &measure, None);
        let placement = positioner.position(
            1080,
            1920,
            layout.width,
            layout.height,
            Default::default(),
            20,
        );
        assert!(placement.within_safe_band, "{} escaped the band", group.text);
    }
}

#[test]
fn highlight_mode_emits_one_frame_per_word() {
    let groups = default_groups();
    let (frames, anomalies) = plan_frames(&groups, true, 12.0);

    // ANYTHING starts at 11.90 and is clamped; nothing is skipped.
    assert!(anomalies.is_empty());
    assert_eq!(frames.len(), 30);
    assert_eq!(frames.last().map(|f| f.end), Some(12.0));
    for pair in frames.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}
