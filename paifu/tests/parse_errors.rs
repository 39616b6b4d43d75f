mod testdata;

use paifu::*;
use testdata::{GOLDEN_MJLOG, GOLDEN_TENHOU6};

fn mjlog_kind(text: &str) -> ErrorKind {
    parse_mjlog(text).unwrap_err().kind()
}

fn tenhou6_kind(text: &str) -> ErrorKind {
    parse_tenhou6(text).unwrap_err().kind()
}

/// Replaces the first occurrence, making sure there is one.
fn edit(text: &str, from: &str, to: &str) -> String {
    assert!(text.contains(from), "{from:?} not found");
    text.replacen(from, to, 1)
}

#[test]
fn test_truncated() {
    let xml = GOLDEN_MJLOG.data;

    // inside the last round
    let cut = xml.find("<RYUUKYOKU").unwrap();
    let err = parse_mjlog(&xml[..cut]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    assert_eq!(err.position(), &Position::Eof);
    assert!(err.to_string().contains("E3-0"), "{err}");

    // between rounds
    let cut = xml.rfind("<INIT").unwrap();
    assert_eq!(mjlog_kind(&xml[..cut]), ErrorKind::TruncatedInput);

    let json = GOLDEN_TENHOU6.data;
    let cut = json.find("[[1,0,0]").unwrap();
    assert_eq!(tenhou6_kind(&json[..cut]), ErrorKind::TruncatedInput);
    assert_eq!(tenhou6_kind(""), ErrorKind::TruncatedInput);

    // a round that ends without its result
    let text = edit(json, r#"["九種九牌"]"#, "[]");
    assert_eq!(tenhou6_kind(&text), ErrorKind::MalformedInput);
}

#[test]
fn test_malformed() {
    let xml = GOLDEN_MJLOG.data;
    assert_eq!(
        mjlog_kind(&edit(xml, r#" ten="250,250,250,250" oya="0""#, r#" oya="0""#)),
        ErrorKind::MalformedInput
    );
    assert_eq!(
        mjlog_kind(&edit(xml, r#"<N who="0" m="4103"/>"#, r#"<N who="0" m="x"/>"#)),
        ErrorKind::MalformedInput
    );
    assert_eq!(
        mjlog_kind(&edit(xml, "<T73/>", r#"<T73 a="1" a="2"/>"#)),
        ErrorKind::MalformedInput
    );

    let json = GOLDEN_TENHOU6.data;
    assert_eq!(
        tenhou6_kind(&edit(json, r#""log":["#, r#""log":{"#)),
        ErrorKind::MalformedInput
    );
    assert_eq!(
        tenhou6_kind(&edit(json, "[[1,0,0]", "[[1,0]")),
        ErrorKind::MalformedInput
    );
}

#[test]
fn test_encoding() {
    let xml = GOLDEN_MJLOG.data;
    assert_eq!(mjlog_kind(&edit(xml, "<T73/>", "<T137/>")), ErrorKind::Encoding);
    assert_eq!(
        mjlog_kind(&edit(xml, r#"who="2" fromWho="1""#, r#"who="2" fromWho="4""#)),
        ErrorKind::Encoding
    );
    assert_eq!(
        mjlog_kind(&edit(xml, r#"<N who="3" m="50282"/>"#, r#"<N who="3" m="52234"/>"#)),
        ErrorKind::Encoding
    );

    let json = GOLDEN_TENHOU6.data;
    let err = parse_tenhou6(&edit(json, r#""c131214""#, r#""c131299""#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(
        err.position(),
        &Position::Field {
            kyoku: 0,
            field: "takes[0][1]".to_owned()
        }
    );
    assert_eq!(
        tenhou6_kind(&edit(json, "[25000,25000,25000,25000],[37]", "[25000,25000,25000,25000],[38,99]")),
        ErrorKind::Encoding
    );
    assert_eq!(
        tenhou6_kind(&edit(json, "[2,1,2,", "[2,7,2,")),
        ErrorKind::Encoding
    );
}

#[test]
fn test_out_of_range_values() {
    let xml = GOLDEN_MJLOG.data;
    assert_eq!(
        mjlog_kind(&edit(xml, r#"ten="250,250,250,250""#, r#"ten="30000000,250,250,250""#)),
        ErrorKind::Encoding
    );
    assert_eq!(
        mjlog_kind(&edit(xml, r#"sc="250,0,250,-39,"#, r#"sc="250,0,250,-39000000,"#)),
        ErrorKind::Encoding
    );
    let err = parse_mjlog(&edit(xml, r#"seed="0,0,0,"#, r#"seed="17,0,0,"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("kyoku 17"), "{err}");

    let json = GOLDEN_TENHOU6.data;
    assert_eq!(
        tenhou6_kind(&edit(
            json,
            "[[0,0,0],[25000,25000,25000,25000]",
            "[[0,0,0],[25000,25000,2147483647,25000]"
        )),
        ErrorKind::Encoding
    );
    let err = parse_tenhou6(&edit(json, "[[0,0,0]", "[[16,0,0]")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(
        err.position(),
        &Position::Field {
            kyoku: 0,
            field: "meta[0]".to_owned()
        }
    );

    // red five counts are flags, however large
    let record = parse_tenhou6(&edit(json, r#""aka53":1"#, r#""aka53":200,"aka":100"#)).unwrap();
    assert!(record.meta.has_aka);
}

#[test]
fn test_sequence() {
    let xml = GOLDEN_MJLOG.data;
    let err = parse_mjlog(&edit(xml, "<INIT", "<D32/><INIT")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sequence);
    assert!(matches!(err.position(), Position::Token { .. }));

    // a discard without a draw
    assert_eq!(mjlog_kind(&edit(xml, "<U133/>\n", "")), ErrorKind::Sequence);
    // a draw settlement after a win
    let xml = edit(
        xml,
        "<RYUUKYOKU",
        r#"<AGARI who="0" fromWho="1" sc="0,0,0,0,0,0,0,0"/><RYUUKYOKU"#,
    );
    assert_eq!(mjlog_kind(&xml), ErrorKind::Sequence);
}

#[test]
fn test_unsupported() {
    let xml = GOLDEN_MJLOG.data;
    assert_eq!(
        mjlog_kind(&edit(xml, r#"<GO type="169""#, r#"<GO type="185""#)),
        ErrorKind::Unsupported
    );
    assert_eq!(
        mjlog_kind(&edit(xml, r#"ver="2.3""#, r#"ver="3.0""#)),
        ErrorKind::Unsupported
    );

    let json = GOLDEN_TENHOU6.data;
    assert_eq!(
        tenhou6_kind(&edit(json, "般南喰赤", "三般南喰赤")),
        ErrorKind::Unsupported
    );
}

#[test]
fn test_strict_and_lenient() {
    let (golden_mjlog, golden_tenhou6) = (
        parse_mjlog(GOLDEN_MJLOG.data).unwrap(),
        parse_tenhou6(GOLDEN_TENHOU6.data).unwrap(),
    );
    let lenient = ParseOptions::lenient();

    let xml = edit(GOLDEN_MJLOG.data, "<T73/>", "<T73/><BOGUS x=\"1\"/>");
    let err = parse_mjlog(&xml).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownToken {
            pos: err.position().clone(),
            token: "BOGUS".to_owned()
        }
    );
    let record = parse_mjlog_with(&xml, &lenient).unwrap();
    assert_eq!(record.rounds, golden_mjlog.rounds);
    assert!(matches!(
        record.warnings.as_slice(),
        [Warning::SkippedToken { token, .. }] if token == "BOGUS"
    ));

    let xml = edit(GOLDEN_MJLOG.data, r#"type="yao9""#, r#"type="what""#);
    assert_eq!(mjlog_kind(&xml), ErrorKind::UnknownToken);
    let record = parse_mjlog_with(&xml, &lenient).unwrap();
    assert!(matches!(
        record.rounds[2].end,
        RoundEnd::Ryukyoku {
            kind: RyukyokuKind::Unknown,
            ..
        }
    ));

    let json = edit(GOLDEN_TENHOU6.data, r#""lobby":0,"#, r#""lobby":0,"bonus":[1,2],"#);
    let err = parse_tenhou6(&json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownToken);
    assert_eq!(
        err.position(),
        &Position::TopLevel {
            key: "bonus".to_owned()
        }
    );
    let record = parse_tenhou6_with(&json, &lenient).unwrap();
    assert_eq!(record.rounds, golden_tenhou6.rounds);
    assert_eq!(record.warnings.len(), 1);

    let json = edit(GOLDEN_TENHOU6.data, r#""aka51":1}"#, r#""aka51":1,"kuitan":1}"#);
    let err = parse_tenhou6(&json).unwrap_err();
    assert_eq!(
        err.position(),
        &Position::TopLevel {
            key: "rule.kuitan".to_owned()
        }
    );
    let record = parse_tenhou6_with(&json, &lenient).unwrap();
    assert_eq!(record.rounds, golden_tenhou6.rounds);
    assert_eq!(record.warnings.len(), 1);

    let json = edit(GOLDEN_TENHOU6.data, "九種九牌", "途中流局");
    assert_eq!(tenhou6_kind(&json), ErrorKind::UnknownToken);
    assert!(parse_tenhou6_with(&json, &lenient).is_ok());
}

#[test]
fn test_trailing_content() {
    let golden = parse_mjlog(GOLDEN_MJLOG.data).unwrap();

    let xml = edit(GOLDEN_MJLOG.data, "</mjloggm>", "</mjloggm><T12/><D12/>");
    let record = parse_mjlog(&xml).unwrap();
    assert_eq!(record.rounds, golden.rounds);
    assert_eq!(record.final_scores, golden.final_scores);
    assert_eq!(record.warnings.len(), 2);
    assert!(record
        .warnings
        .iter()
        .all(|w| matches!(w, Warning::TrailingToken { .. })));

    // junk past the end of game is not worth failing for
    let xml = format!("{}<T12", GOLDEN_MJLOG.data);
    let record = parse_mjlog(&xml).unwrap();
    assert_eq!(record.rounds, golden.rounds);
    assert_eq!(record.warnings.len(), 1);
}
