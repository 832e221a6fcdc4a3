//! Integration tests for the archive → text pipeline.
//!
//! Archives are built in memory with `zip::ZipWriter`; Shift_JIS payloads
//! are produced with `encoding_rs` the way Aozora Bunko ships them.

use std::io::{Cursor, Write};

use aozora_reader::config::{load_config, Config};
use aozora_reader::decode::DetectedEncoding;
use aozora_reader::error::{ErrorCategory, ReaderError};
use aozora_reader::models::FidelityMode;
use aozora_reader::pipeline::Pipeline;
use aozora_reader_core::{paginate, search, stats};
use tempfile::TempDir;

const DIVIDER: &str = "-------------------------------------------------------";

fn rashomon() -> String {
    format!(
        "羅生門\r\n芥川龍之介\r\n\r\n{d}\r\n【テキスト中に現れる記号について】\r\n\r\n《》：ルビ\r\n（例）下人《げにん》\r\n\r\n［＃］：入力者注　主に外字の説明や、傍点の位置の指定\r\n{d}\r\n\r\n\
第一章［＃「第一章」は中見出し］\r\n\
　ある日の暮方《くれがた》の事である。一人の下人《げにん》が、羅生門の下で雨やみを待っていた。\r\n\
　広い門の下には、この男のほかに誰もいない。\r\n\
［＃改ページ］\r\n\
第二章［＃「第二章」は中見出し］\r\n\
［＃ここから２字下げ］\r\n\
　下人の行方《ゆくえ》は、誰も知らない。\r\n\
［＃ここで字下げ終わり］\r\n\
\r\n\r\n\r\n\r\n\
底本：「芥川龍之介全集1」ちくま文庫、筑摩書房\r\n\
入力：j.utiyama\r\n",
        d = DIVIDER
    )
}

fn sjis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors, "sample text must be Shift_JIS encodable");
    bytes.into_owned()
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn rashomon_zip() -> Vec<u8> {
    let text = sjis(&rashomon());
    build_zip(&[("rashomon_ruby.txt", text.as_slice()), ("illust.png", b"\x89PNG\r\n")])
}

fn pipeline() -> Pipeline {
    Pipeline::new(Config::default()).unwrap()
}

#[test]
fn test_render_mode_end_to_end() {
    let result = pipeline()
        .process_archive(&rashomon_zip(), FidelityMode::Render)
        .unwrap();

    assert_eq!(result.encoding, DetectedEncoding::ShiftJis);
    assert_eq!(result.title.as_deref(), Some("羅生門"));
    assert_eq!(result.author.as_deref(), Some("芥川龍之介"));

    let html = &result.normalized_text;
    assert!(html.contains("<ruby>暮方<rt>くれがた</rt></ruby>"));
    assert!(html.contains("<h2 class=\"section-title\">第一章</h2>"));
    assert!(html.contains("<div class=\"page-break\"></div>"));
    assert!(html.contains("<div class=\"indent-2\">"));
    assert!(html.contains("<span class=\"indent-1\"></span>"));
    assert!(!html.contains("［＃"));
    assert!(!html.contains("底本："));
    assert!(!html.contains(DIVIDER));
    assert!(!html.contains('\r'));
}

#[test]
fn test_speech_mode_is_continuous_prose() {
    let result = pipeline()
        .process_archive(&rashomon_zip(), FidelityMode::Speech)
        .unwrap();

    let speech = &result.normalized_text;
    assert!(!speech.contains('\n'));
    assert!(!speech.contains('《'));
    assert!(!speech.contains('<'));
    assert!(speech.starts_with("第一章 ある日の暮方の事である。"));
    assert!(speech.ends_with("下人の行方は、誰も知らない。"));
    assert!(!speech.contains("くれがた"));
}

#[test]
fn test_plain_text_lines_drive_chapters_and_search() {
    let result = pipeline()
        .process_archive(&rashomon_zip(), FidelityMode::Render)
        .unwrap();

    let lines: Vec<&str> = result.plain_text.split('\n').collect();
    assert_eq!(result.chapters.len(), 2);
    assert_eq!(result.chapters[0].title, "第一章");
    assert_eq!(result.chapters[0].start_line, 0);
    assert_eq!(lines[result.chapters[1].start_line], "第二章");
    assert_eq!(result.chapters[0].end_line, result.chapters[1].start_line - 1);
    assert_eq!(result.chapters[1].end_line, lines.len() - 1);

    let hits = search::search(&result.plain_text, "下人");
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert!(lines[hit.line_number].contains("下人"));
        assert!(hit.context.contains("下人"));
    }
}

#[test]
fn test_pagination_of_plain_text() {
    let result = pipeline()
        .process_archive(&rashomon_zip(), FidelityMode::PlainStrip)
        .unwrap();

    let line_count = result.plain_text.split('\n').count();
    let pages: Vec<String> = paginate::paginate(&result.plain_text, 2).collect();
    assert_eq!(pages.len(), line_count.div_ceil(2));
    assert_eq!(pages.join("\n"), result.plain_text);

    let stats = stats::text_stats(&result.plain_text);
    assert_eq!(stats.lines, line_count);
    assert!(stats.paragraphs >= 2);
}

#[test]
fn test_utf8_archive() {
    let zip = build_zip(&[("work.txt", "吾輩《わがはい》は猫である。".as_bytes())]);
    let result = pipeline()
        .process_archive(&zip, FidelityMode::PlainStrip)
        .unwrap();
    assert_eq!(result.encoding, DetectedEncoding::Utf8);
    assert_eq!(result.normalized_text, "吾輩は猫である。");
    assert!(result.title.is_none());
}

#[test]
fn test_not_a_zip_is_unusable() {
    let err = pipeline()
        .process_archive(&[0u8; 512], FidelityMode::Render)
        .unwrap_err();
    assert!(matches!(err, ReaderError::InvalidArchive(_)));
    assert_eq!(err.category(), ErrorCategory::Unusable);
}

#[test]
fn test_archive_without_text_entry() {
    let zip = build_zip(&[("card.html", b"<html></html>"), ("cover.jpg", b"\xFF\xD8")]);
    let err = pipeline()
        .process_archive(&zip, FidelityMode::Render)
        .unwrap_err();
    match err {
        ReaderError::NoTextEntryFound { entries } => {
            assert_eq!(entries, vec!["card.html", "cover.jpg"]);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_configured_pipeline_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("aozora.toml");
    std::fs::write(
        &path,
        r#"
[decode]
encoding = "shift-jis"

[reading]
lines_per_page = 3
search_context_chars = 2
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    assert_eq!(pipeline.config().reading.lines_per_page, 3);

    let result = pipeline
        .process_archive(&rashomon_zip(), FidelityMode::PlainStrip)
        .unwrap();
    assert_eq!(result.encoding, DetectedEncoding::ShiftJis);

    let hits = pipeline.search(&result, "羅生門");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].context, "が、羅生門の下");

    assert!(pipeline.pages(&result).all(|page| page.split('\n').count() <= 3));
    let around = pipeline.page_around_line(&result, hits[0].line_number as i64);
    assert!(around.contains("羅生門"));
}

#[test]
fn test_result_serializes_for_ui() {
    let result = pipeline()
        .process_archive(&rashomon_zip(), FidelityMode::Speech)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["mode"], "speech");
    assert_eq!(json["encoding"], "shift-jis");
    assert_eq!(json["title"], "羅生門");
    assert_eq!(json["chapters"][1]["title"], "第二章");
}
