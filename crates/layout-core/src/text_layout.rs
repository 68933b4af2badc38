//! Line wrapping and per-word placement inside a caption block.
//!
//! Coordinates are canvas pixels: the canvas is the content box plus the
//! style's outer padding on every side, so stroke and shadow never clip.

use reelcap_caption_model::color::Color;
use reelcap_caption_model::style::{ActiveStyle, HorizontalAlign};
use reelcap_caption_model::word::WordTimestamp;
use serde::Serialize;

use crate::metrics::TextMeasure;

/// One word placed on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutWord {
    pub text: String,
    /// Fill color of the glyphs.
    pub color: Color,
    pub width: f32,
    /// Left edge of the word on the canvas.
    pub x: f32,
    /// Whether a highlight pill is drawn behind this word.
    pub highlighted: bool,
}

/// A wrapped line of words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    pub words: Vec<LayoutWord>,
    /// Width of the words and inner spaces, without a trailing space.
    pub width: f32,
    /// Left edge of the line on the canvas.
    pub x: f32,
    /// Top of the line box on the canvas.
    pub top: f32,
}

impl LayoutLine {
    /// Baseline y for glyph drawing.
    pub fn baseline(&self, ascent: f32) -> f32 {
        self.top + ascent
    }
}

/// A laid-out caption block, ready for rasterization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub lines: Vec<LayoutLine>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Outer padding on every side of the content box.
    pub padding: u32,
    pub line_height: f32,
    pub ascent: f32,
    /// Width budget the lines were wrapped to.
    pub budget: u32,
    /// Width of the content box: the budget, or the widest line if wider.
    pub content_width: f32,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &LayoutWord> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Words that alone are wider than the budget.
    pub fn overlong_words(&self) -> impl Iterator<Item = &LayoutWord> {
        let budget = self.budget as f32;
        self.words().filter(move |w| w.width > budget)
    }

    /// Highlighted word with the top of its line.
    pub fn highlighted(&self) -> Option<(&LayoutWord, f32)> {
        self.lines.iter().find_map(|line| {
            line.words
                .iter()
                .find(|w| w.highlighted)
                .map(|w| (w, line.top))
        })
    }
}

/// Greedy line wrapper for one caption group.
#[derive(Debug, Clone)]
pub struct TextLayoutEngine<'a> {
    style: &'a ActiveStyle,
}

impl<'a> TextLayoutEngine<'a> {
    pub fn new(style: &'a ActiveStyle) -> Self {
        Self { style }
    }

    /// Wrap `words` to `width_budget` pixels.
    ///
    /// `highlight` indexes into `words`; an out-of-range index highlights
    /// nothing. A word wider than the budget gets a line of its own.
    pub fn layout<M>(
        &self,
        words: &[WordTimestamp],
        width_budget: u32,
        measure: &M,
        highlight: Option<usize>,
    ) -> LayoutResult
    where
        M: TextMeasure + ?Sized,
    {
        let budget = width_budget as f32;
        let space = measure.space_width();
        let palette = &self.style.palette;

        // (words, net width)
        let mut rows: Vec<(Vec<LayoutWord>, f32)> = Vec::new();
        let mut current: Vec<LayoutWord> = Vec::new();
        let mut running = 0.0f32;

        for (index, word) in words.iter().enumerate() {
            let width = measure.text_width(&word.text);
            if !current.is_empty() && running + width > budget {
                rows.push((std::mem::take(&mut current), running - space));
                running = 0.0;
            }
            let highlighted = highlight == Some(index);
            current.push(LayoutWord {
                text: word.text.clone(),
                color: if highlighted {
                    palette.highlight_text
                } else {
                    palette.text
                },
                width,
                x: 0.0,
                highlighted,
            });
            running += width + space;
        }
        if !current.is_empty() {
            rows.push((current, running - space));
        }

        let padding = self.style.outer_padding();
        let pad = padding as f32;
        let line_height = measure.line_height().ceil();
        let spacing = self.style.line_spacing as f32;
        let content_width = rows.iter().map(|(_, w)| *w).fold(budget, f32::max);

        let lines: Vec<LayoutLine> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (mut line_words, width))| {
                let offset = match self.style.align {
                    HorizontalAlign::Center => (content_width - width) / 2.0,
                    HorizontalAlign::Left => 0.0,
                    HorizontalAlign::Right => content_width - width,
                };
                let x = pad + offset;
                let mut cursor = x;
                for word in &mut line_words {
                    word.x = cursor;
                    cursor += word.width + space;
                }
                LayoutLine {
                    words: line_words,
                    width,
                    x,
                    top: pad + i as f32 * (line_height + spacing),
                }
            })
            .collect();

        let stacked = if lines.is_empty() {
            0.0
        } else {
            lines.len() as f32 * line_height + (lines.len() - 1) as f32 * spacing
        };

        LayoutResult {
            width: content_width.ceil() as u32 + 2 * padding,
            height: stacked.ceil() as u32 + 2 * padding,
            padding,
            line_height,
            ascent: measure.ascent(),
            budget: width_budget,
            content_width,
            lines,
        }
    }
}
