//! Hanzi → Hanyu Pinyin (tone diacritics, space-separated), copy non-Chinese as-is.
//!
//! Learner aid for the grading UI: shown next to the correct answer so
//! students can read back what they got wrong.
use pinyin::ToPinyin;

/// Convert Chinese text into Hanyu Pinyin with tone diacritics.
/// Consecutive Hanzi syllables are space-separated; everything else is
/// copied through unchanged. Conversion is per-character (no word
/// segmentation), so polyphonic characters use a default reading.
pub fn to_pinyin_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut prev_was_syllable = false;

    for ch in text.chars() {
        match ch.to_pinyin() {
            Some(py) => {
                if prev_was_syllable {
                    out.push(' ');
                }
                out.push_str(&py.with_tone().to_string());
                prev_was_syllable = true;
            }
            None => {
                out.push(ch);
                prev_was_syllable = false;
            }
        }
    }

    out
}
