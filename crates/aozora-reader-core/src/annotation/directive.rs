//! Classification of `［＃…］` directive bodies.
//!
//! The scanner hands over the text between `［＃` and `］`; this module
//! decides which rule, if any, it belongs to. Anything unrecognized is
//! [`Directive::Other`] and gets removed by the catch-all rule.

/// A recognized directive body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `改ページ`, `改丁`, `改見開き`, `改段`.
    PageBreak,
    /// `ここからN字下げ`.
    IndentBegin(u32),
    /// `ここで字下げ終わり`.
    IndentEnd,
    /// `「X」に傍点`, `「X」は太字`, `「X」は大見出し` and friends.
    Quoted { span: &'a str, style: SpanStyle },
    /// `傍点`, `太字`, `大見出し`… opening a paired range.
    RangeBegin(SpanStyle),
    /// `傍点終わり`, `太字終わり`, `大見出し終わり`…
    RangeEnd(SpanStyle),
    /// Everything else.
    Other,
}

/// Inline styling a directive applies to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Emphasis,
    Bold,
    Heading(HeadingLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Large,
    Medium,
    Small,
}

impl HeadingLevel {
    /// HTML heading rank: 1 for large, 3 for small.
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::Large => 1,
            HeadingLevel::Medium => 2,
            HeadingLevel::Small => 3,
        }
    }
}

const PAGE_BREAKS: &[&str] = &["改ページ", "改丁", "改見開き", "改段"];
const INDENT_BEGIN_PREFIX: &str = "ここから";
const INDENT_SUFFIX: &str = "字下げ";
const INDENT_END: &str = "ここで字下げ終わり";
const RANGE_END_SUFFIX: &str = "終わり";

/// Classify the body of a `［＃…］` directive.
pub fn classify(content: &str) -> Directive<'_> {
    let content = content.trim();

    if PAGE_BREAKS.contains(&content) {
        return Directive::PageBreak;
    }
    if content == INDENT_END {
        return Directive::IndentEnd;
    }
    if let Some(rest) = content.strip_prefix(INDENT_BEGIN_PREFIX) {
        // "ここから２字下げ、折り返して３字下げ" keeps the leading width.
        if let Some((level, tail)) = parse_count(rest) {
            if tail.starts_with(INDENT_SUFFIX) {
                return Directive::IndentBegin(level);
            }
        }
        return Directive::Other;
    }
    if content.starts_with('「') {
        return classify_quoted(content);
    }
    if let Some(name) = content.strip_suffix(RANGE_END_SUFFIX) {
        if let Some(style) = range_style(name) {
            return Directive::RangeEnd(style);
        }
    }
    if let Some(style) = range_style(content) {
        return Directive::RangeBegin(style);
    }
    Directive::Other
}

fn classify_quoted(content: &str) -> Directive<'_> {
    let Some(close) = content.rfind('」') else {
        return Directive::Other;
    };
    let span = &content['「'.len_utf8()..close];
    let suffix = &content[close + '」'.len_utf8()..];

    let style = match suffix {
        "は太字" => SpanStyle::Bold,
        "は大見出し" => SpanStyle::Heading(HeadingLevel::Large),
        "は中見出し" => SpanStyle::Heading(HeadingLevel::Medium),
        "は小見出し" => SpanStyle::Heading(HeadingLevel::Small),
        // 傍点, 白ゴマ傍点, 丸傍点, 二重丸傍点…
        s if s.starts_with('に') && s.ends_with("傍点") => SpanStyle::Emphasis,
        _ => return Directive::Other,
    };
    Directive::Quoted { span, style }
}

fn range_style(name: &str) -> Option<SpanStyle> {
    match name {
        "傍点" => Some(SpanStyle::Emphasis),
        "太字" => Some(SpanStyle::Bold),
        "大見出し" => Some(SpanStyle::Heading(HeadingLevel::Large)),
        "中見出し" => Some(SpanStyle::Heading(HeadingLevel::Medium)),
        "小見出し" => Some(SpanStyle::Heading(HeadingLevel::Small)),
        _ => None,
    }
}

/// Parse a leading count written in ASCII, full-width or kanji digits.
///
/// Returns the value and the unparsed remainder.
fn parse_count(s: &str) -> Option<(u32, &str)> {
    let digits: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || ('０'..='９').contains(c))
        .collect();
    if !digits.is_empty() {
        let value = digits
            .chars()
            .filter_map(|c| {
                if c.is_ascii_digit() {
                    c.to_digit(10)
                } else {
                    Some(c as u32 - '０' as u32)
                }
            })
            .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
        return Some((value, &s[digits.len()..]));
    }

    let kanji: String = s.chars().take_while(|c| kanji_digit(*c).is_some() || *c == '十').collect();
    if kanji.is_empty() {
        return None;
    }
    let value = kanji_value(&kanji)?;
    Some((value, &s[kanji.len()..]))
}

fn kanji_digit(c: char) -> Option<u32> {
    match c {
        '〇' | '零' => Some(0),
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Values up to 99 in the 十 notation ("十二", "二十", "二十五").
fn kanji_value(s: &str) -> Option<u32> {
    match s.split_once('十') {
        Some((tens, ones)) => {
            let tens = if tens.is_empty() { 1 } else { single_kanji_digit(tens)? };
            let ones = if ones.is_empty() { 0 } else { single_kanji_digit(ones)? };
            Some(tens * 10 + ones)
        }
        None => single_kanji_digit(s),
    }
}

fn single_kanji_digit(s: &str) -> Option<u32> {
    let mut chars = s.chars();
    let digit = kanji_digit(chars.next()?)?;
    chars.next().is_none().then_some(digit)
}
