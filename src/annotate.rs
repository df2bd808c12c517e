//! Row/column annotation for multi-row `INSERT ... VALUES` parameters.

use std::ops::Range;

use smallvec::SmallVec;

use crate::{dialect::Dialect, signature::ExtractedParam, stream::TokenStream};

/// Stamp `row`/`col` on every parameter that falls inside a top-level
/// `VALUES` tuple of `source`.
///
/// The text is tokenized again independently of the render pass. Rows are
/// the 1-based tuple ordinal; columns are the 1-based position by start
/// offset among the parameters of that tuple. Parameters outside every
/// tuple keep `row = 0, col = 0`.
pub fn annotate_rows(source: &str, dialect: Dialect, params: &mut [ExtractedParam]) {
    if params.is_empty() {
        return;
    }
    let upper = source.to_ascii_uppercase();
    if !upper.contains("INSERT") || !upper.contains("VALUES") {
        return;
    }

    let stream = TokenStream::new(source, dialect);
    let ranges = tuple_ranges(&stream);
    if ranges.is_empty() {
        return;
    }

    let mut by_start: SmallVec<[usize; 16]> = (0..params.len()).collect();
    by_start.sort_by_key(|&i| params[i].start);

    // Ranges are disjoint and ascending
    let mut next = 0;
    for (row, range) in ranges.iter().enumerate() {
        while next < by_start.len() && params[by_start[next]].start < range.start {
            next += 1;
        }
        let mut col = 0;
        while next < by_start.len() && range.contains(&params[by_start[next]].start) {
            col += 1;
            let param = &mut params[by_start[next]];
            param.row = row + 1;
            param.col = col;
            next += 1;
        }
    }
}

/// Byte ranges of the top-level tuples after the first `VALUES (`
fn tuple_ranges(stream: &TokenStream<'_>) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let Some(mut open) = (0..stream.len())
        .filter(|&i| stream.is_visible(i) && stream.token(i).is_word("VALUES"))
        .find_map(|i| {
            stream
                .next_visible(i)
                .filter(|&n| stream.token(n).is("("))
        })
    else {
        return ranges;
    };

    while let Some(close) = stream.matching_close(open) {
        ranges.push(stream.span(open, close));
        let Some(next) = stream
            .next_visible(close)
            .filter(|&i| stream.token(i).is(","))
            .and_then(|comma| stream.next_visible(comma))
            .filter(|&i| stream.token(i).is("("))
        else {
            break;
        };
        open = next;
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialect::Options, render::render};

    fn annotated(sql: &str) -> Vec<(usize, usize)> {
        let opts = Options::new(Dialect::MySql);
        let mut params = render(&TokenStream::new(sql, opts.dialect), &opts).params;
        annotate_rows(sql, opts.dialect, &mut params);
        params.iter().map(|p| (p.row, p.col)).collect()
    }

    #[test]
    fn test_rows_and_cols() {
        assert_eq!(
            annotated("INSERT INTO t(a,b) VALUES (1,'x'), (2,'y'), (3,'z');"),
            vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]
        );
    }

    #[test]
    fn test_params_outside_tuples_unstamped() {
        assert_eq!(
            annotated("INSERT INTO t(a) VALUES (1), (2) ON DUPLICATE KEY UPDATE a = 5"),
            vec![(1, 1), (2, 1), (0, 0)]
        );
    }

    #[test]
    fn test_nested_parens_stay_in_row() {
        assert_eq!(
            annotated("INSERT INTO t VALUES (lower('a'), (1 + 2))"),
            vec![(1, 1), (1, 2), (1, 3)]
        );
    }

    #[test]
    fn test_many_rows() {
        let rows: Vec<String> = (0..200).map(|i| format!("({i}, 'v{i}')")).collect();
        let sql = format!("INSERT INTO t(a, b) VALUES {}", rows.join(", "));
        let stamps = annotated(&sql);

        assert_eq!(stamps.len(), 400);
        for (i, stamp) in stamps.iter().enumerate() {
            assert_eq!(*stamp, (i / 2 + 1, i % 2 + 1));
        }
    }

    #[test]
    fn test_not_an_insert() {
        assert_eq!(annotated("SELECT * FROM (VALUES (1)) v"), vec![(0, 0)]);
    }
}
