//! Legacy text decoding.
//!
//! Aozora archives carry Shift_JIS text almost exclusively, with the odd
//! UTF-8 file. [`TextDecoder`] tries an ordered list of
//! [`DecodeStrategy`]s and keeps the first that accepts the bytes. The last
//! strategy in every chain is lossy and always succeeds, so decoding never
//! fails: badly damaged input comes back with replacement characters.
//!
//! # Default chain
//!
//! | # | Strategy | Accepts when |
//! |---|----------|--------------|
//! | 1 | `utf-8-bom` | bytes start with `EF BB BF` and the rest is valid UTF-8 |
//! | 2 | `utf-8` | valid UTF-8 with at least one multi-byte sequence |
//! | 3 | `shift-jis` | `encoding_rs::SHIFT_JIS` reports no malformed sequences |
//! | 4 | `utf-8-lossy` | always |
//!
//! Pure ASCII skips step 2 and lands on Shift_JIS, which decodes ASCII
//! identically. The UTF-8 probe comes before Shift_JIS because the
//! Shift_JIS decoder accepts most well-formed UTF-8 Japanese and would
//! return mojibake.
//!
//! Every result is normalized: a leading BOM is removed and `\r\n` or a
//! lone `\r` become `\n`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The encoding a decoded text was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedEncoding {
    ShiftJis,
    Utf8,
    /// Decoded lossily; the source encoding is unknown.
    Unknown,
}

/// Which strategy chain to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum EncodingPreference {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "shift-jis", alias = "shift_jis", alias = "sjis")]
    ShiftJis,
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
}

/// Text decoded from an archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedDocument {
    pub text: String,
    pub encoding: DetectedEncoding,
}

/// One way of turning bytes into text.
pub trait DecodeStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn encoding(&self) -> DetectedEncoding;

    /// Decode `bytes`, or `None` if this strategy does not apply.
    fn try_decode(&self, bytes: &[u8]) -> Option<String>;
}

/// UTF-8 with a leading byte-order mark.
pub struct Utf8Bom;

impl DecodeStrategy for Utf8Bom {
    fn name(&self) -> &'static str {
        "utf-8-bom"
    }

    fn encoding(&self) -> DetectedEncoding {
        DetectedEncoding::Utf8
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        let rest = bytes.strip_prefix(UTF8_BOM)?;
        std::str::from_utf8(rest).ok().map(str::to_string)
    }
}

/// Valid UTF-8 that is not plain ASCII.
pub struct StrictUtf8;

impl DecodeStrategy for StrictUtf8 {
    fn name(&self) -> &'static str {
        "utf-8"
    }

    fn encoding(&self) -> DetectedEncoding {
        DetectedEncoding::Utf8
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        if bytes.is_ascii() {
            return None;
        }
        std::str::from_utf8(bytes).ok().map(str::to_string)
    }
}

/// Shift_JIS, rejected on any malformed sequence.
pub struct ShiftJis;

impl DecodeStrategy for ShiftJis {
    fn name(&self) -> &'static str {
        "shift-jis"
    }

    fn encoding(&self) -> DetectedEncoding {
        DetectedEncoding::ShiftJis
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        encoding_rs::SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

/// Shift_JIS with replacement characters. Always succeeds.
pub struct LossyShiftJis;

impl DecodeStrategy for LossyShiftJis {
    fn name(&self) -> &'static str {
        "shift-jis-lossy"
    }

    fn encoding(&self) -> DetectedEncoding {
        DetectedEncoding::ShiftJis
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        let (text, had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(bytes);
        if had_errors {
            warn!(bytes = bytes.len(), "Shift_JIS input had malformed sequences");
        }
        Some(text.into_owned())
    }
}

/// UTF-8 with replacement characters. Always succeeds.
pub struct LossyUtf8;

impl DecodeStrategy for LossyUtf8 {
    fn name(&self) -> &'static str {
        "utf-8-lossy"
    }

    fn encoding(&self) -> DetectedEncoding {
        DetectedEncoding::Unknown
    }

    fn try_decode(&self, bytes: &[u8]) -> Option<String> {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Ordered strategy chain.
pub struct TextDecoder {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new(EncodingPreference::Auto)
    }
}

impl TextDecoder {
    pub fn new(preference: EncodingPreference) -> Self {
        let strategies: Vec<Box<dyn DecodeStrategy>> = match preference {
            EncodingPreference::Auto => vec![
                Box::new(Utf8Bom),
                Box::new(StrictUtf8),
                Box::new(ShiftJis),
                Box::new(LossyUtf8),
            ],
            EncodingPreference::ShiftJis => vec![Box::new(ShiftJis), Box::new(LossyShiftJis)],
            EncodingPreference::Utf8 => {
                vec![Box::new(Utf8Bom), Box::new(StrictUtf8), Box::new(LossyUtf8)]
            }
        };
        Self { strategies }
    }

    /// Chain with caller-supplied strategies. [`LossyUtf8`] is appended
    /// so the chain always terminates.
    pub fn with_strategies(mut strategies: Vec<Box<dyn DecodeStrategy>>) -> Self {
        strategies.push(Box::new(LossyUtf8));
        Self { strategies }
    }

    /// Names of the strategies, in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn decode(&self, bytes: &[u8]) -> DecodedDocument {
        for strategy in &self.strategies {
            if let Some(text) = strategy.try_decode(bytes) {
                debug!(strategy = strategy.name(), bytes = bytes.len(), "Decoded text");
                return DecodedDocument {
                    text: normalize_newlines(&text),
                    encoding: strategy.encoding(),
                };
            }
        }

        // Every chain ends in a lossy strategy; this only guards custom ones.
        DecodedDocument {
            text: normalize_newlines(&String::from_utf8_lossy(bytes)),
            encoding: DetectedEncoding::Unknown,
        }
    }
}

/// Decode with the default chain.
pub fn decode(bytes: &[u8]) -> DecodedDocument {
    TextDecoder::default().decode(bytes)
}

/// Strip a leading BOM and convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sjis(s: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(s);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_shift_jis_detected() {
        let doc = decode(&sjis("吾輩は猫である。名前はまだ無い。"));
        assert_eq!(doc.text, "吾輩は猫である。名前はまだ無い。");
        assert_eq!(doc.encoding, DetectedEncoding::ShiftJis);
    }

    #[test]
    fn test_utf8_not_mistaken_for_shift_jis() {
        let doc = decode("羅生門《らしょうもん》".as_bytes());
        assert_eq!(doc.text, "羅生門《らしょうもん》");
        assert_eq!(doc.encoding, DetectedEncoding::Utf8);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("本文".as_bytes());
        let doc = decode(&bytes);
        assert_eq!(doc.text, "本文");
        assert_eq!(doc.encoding, DetectedEncoding::Utf8);
    }

    #[test]
    fn test_ascii_goes_through_shift_jis() {
        let doc = decode(b"plain ascii");
        assert_eq!(doc.text, "plain ascii");
        assert_eq!(doc.encoding, DetectedEncoding::ShiftJis);
    }

    #[test]
    fn test_crlf_normalized() {
        let doc = decode(&sjis("一行目\r\n二行目\r三行目\n"));
        assert_eq!(doc.text, "一行目\n二行目\n三行目\n");
    }

    #[test]
    fn test_garbage_never_panics() {
        let garbage: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let doc = decode(&garbage);
        assert!(!doc.text.is_empty());

        for pref in [EncodingPreference::ShiftJis, EncodingPreference::Utf8] {
            let _ = TextDecoder::new(pref).decode(&garbage);
        }
    }

    #[test]
    fn test_invalid_everything_is_lossy_unknown() {
        // 0x80 alone is a lead byte error in UTF-8; 0xFD..0xFF are unmapped in Shift_JIS.
        let doc = decode(&[0x41, 0xFF, 0xFE, 0xFD, 0x80]);
        assert_eq!(doc.encoding, DetectedEncoding::Unknown);
        assert!(doc.text.starts_with('A'));
        assert!(doc.text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_shift_jis_preference_is_lossy_shift_jis() {
        let decoder = TextDecoder::new(EncodingPreference::ShiftJis);
        assert_eq!(decoder.strategy_names(), vec!["shift-jis", "shift-jis-lossy"]);
        let mut bytes = sjis("壊れ");
        bytes.push(0xFF);
        let doc = decoder.decode(&bytes);
        assert_eq!(doc.encoding, DetectedEncoding::ShiftJis);
        assert!(doc.text.starts_with("壊れ"));
    }

    #[test]
    fn test_custom_chain_always_terminates() {
        let decoder = TextDecoder::with_strategies(vec![Box::new(Utf8Bom)]);
        assert_eq!(decoder.strategy_names(), vec!["utf-8-bom", "utf-8-lossy"]);
        let doc = decoder.decode(b"no bom");
        assert_eq!(doc.text, "no bom");
        assert_eq!(doc.encoding, DetectedEncoding::Unknown);
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(
            TextDecoder::default().strategy_names(),
            vec!["utf-8-bom", "utf-8", "shift-jis", "utf-8-lossy"]
        );
    }
}
