// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_signature::{
    comments::CommentSpans,
    dialect::Dialect,
    lexer::{Channel, TokenKind, tokenize},
    offset::OffsetMap,
    stream::TokenStream
};

const SAMPLES: &[&str] = &[
    "SELECT a, 'ü' FROM t -- c\nWHERE b = 1",
    "/*!40101 SET @x := 1 */; SELECT `c` FROM t # note",
    "SELECT $$x$$, \"Q\" FROM t /* a /* nested */ b */",
    "SELECT [a b], N'ç', @p FROM #tmp",
    "SELECT q'{é}' FROM dual WHERE x = :v",
    "SELECT 'unterminated",
    ""
];

#[test]
fn test_tokens_cover_every_byte() {
    for dialect in Dialect::ALL {
        for sql in SAMPLES {
            let joined: String = tokenize(sql, dialect).iter().map(|t| t.text).collect();
            assert_eq!(joined, *sql, "{dialect}");
        }
    }
}

#[test]
fn test_char_offsets_map_to_text() {
    for dialect in Dialect::ALL {
        for sql in SAMPLES {
            let map = OffsetMap::new(sql);
            for token in tokenize(sql, dialect) {
                let start = map.byte(token.start);
                let end = map.byte(token.stop + 1);
                assert_eq!(&sql[start..end], token.text);
            }
        }
    }
}

#[test]
fn test_hidden_channel_is_whitespace_and_comments() {
    for dialect in Dialect::ALL {
        for sql in SAMPLES {
            for token in tokenize(sql, dialect) {
                let hidden = token.channel == Channel::Hidden;
                let trivia = matches!(token.kind, TokenKind::Whitespace | TokenKind::Comment);
                assert_eq!(hidden, trivia, "{:?} in {dialect}", token.text);
            }
        }
    }
}

#[test]
fn test_double_quotes_depend_on_dialect() {
    let kind = |dialect| {
        tokenize("\"x\"", dialect)
            .first()
            .map(|t| t.kind)
    };
    assert_eq!(kind(Dialect::MySql), Some(TokenKind::String));
    assert_eq!(kind(Dialect::Postgres), Some(TokenKind::QuotedIdent));
    assert_eq!(kind(Dialect::Oracle), Some(TokenKind::QuotedIdent));
}

#[test]
fn test_comment_spans_skip_quotes() {
    let sql = "SELECT '/* no */', \"-- no\" /* yes */ -- yes\n# yes";
    let spans = CommentSpans::scan(sql);
    let texts: Vec<_> = spans.spans().iter().map(|r| &sql[r.clone()]).collect();

    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "/* yes */");
    assert!(texts[1].starts_with("-- yes"));
    assert_eq!(texts[2], "# yes");
}

#[test]
fn test_stream_hides_executable_comment_body() {
    let stream = TokenStream::new("/*!40101 SET NAMES utf8 */ SELECT 1", Dialect::MySql);
    let first = stream.first_visible_from(0).unwrap();
    assert_eq!(stream.text(first), "SELECT");

    let stream = TokenStream::new("/* SET */ SELECT 1", Dialect::Postgres);
    let first = stream.first_visible_from(0).unwrap();
    assert_eq!(stream.text(first), "SELECT");
}

#[test]
fn test_stream_matching_close() {
    let stream = TokenStream::new("f(a, (b), c) x", Dialect::Postgres);
    let open = (0..stream.len()).find(|&i| stream.text(i) == "(").unwrap();
    let close = stream.matching_close(open).unwrap();
    assert_eq!(&stream.source()[stream.span(open, close)], "(a, (b), c)");

    let stream = TokenStream::new("f(a, (b)", Dialect::Postgres);
    let open = (0..stream.len()).find(|&i| stream.text(i) == "(").unwrap();
    assert!(stream.matching_close(open).is_none());
}
