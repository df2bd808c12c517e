//! Digest whitespace normalization and parenthesis repair.
//!
//! Quoted identifiers (`"..."`, `` `...` ``, `[...]`) are copied through
//! untouched by every pass here.

use tracing::trace;

/// Quote tracking over rendered digest text
#[derive(Debug, Clone, Copy, Default)]
struct Quotes {
    close: Option<char>
}

impl Quotes {
    fn is_open(self) -> bool {
        self.close.is_some()
    }

    /// Feed `c`; true when `c` is structural, outside every quoted identifier
    fn outside(&mut self, c: char) -> bool {
        match self.close {
            Some(q) => {
                if c == q {
                    self.close = None;
                }
                false
            }
            None => match c {
                '"' | '`' => {
                    self.close = Some(c);
                    false
                }
                '[' => {
                    self.close = Some(']');
                    false
                }
                _ => true
            }
        }
    }
}

/// Trim, collapse whitespace runs to one space and write `IN (`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut quotes = Quotes::default();
    let mut pending_space = false;

    for c in raw.chars() {
        if quotes.is_open() {
            quotes.outside(c);
            out.push(c);
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '(' && ends_with_in_keyword(&out) {
            out.push(' ');
        }
        quotes.outside(c);
        out.push(c);
    }
    out
}

fn ends_with_in_keyword(out: &str) -> bool {
    let Some(rest) = out.strip_suffix("IN") else {
        return false;
    };
    !rest
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Number of `?` placeholders outside quoted identifiers
pub fn count_placeholders(digest: &str) -> usize {
    let mut quotes = Quotes::default();
    digest
        .chars()
        .filter(|&c| quotes.outside(c) && c == '?')
        .count()
}

/// Remove parentheses without a partner, statement by statement.
///
/// Every `)` that would take the balance below zero is dropped, as is every
/// `(` still open at the end of its statement. Statements end at a `;`
/// outside quoted identifiers; parentheses and semicolons inside quoted
/// identifiers are left alone.
pub fn sanitize_parens(digest: &str) -> String {
    let statements: Vec<String> = split_unquoted(digest)
        .into_iter()
        .map(balance_statement)
        .filter(|s| !s.trim().is_empty())
        .collect();
    normalize(&statements.join("; "))
}

fn split_unquoted(digest: &str) -> Vec<&str> {
    let mut quotes = Quotes::default();
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, c) in digest.char_indices() {
        if quotes.outside(c) && c == ';' {
            segments.push(&digest[start..i]);
            start = i + 1;
        }
    }
    segments.push(&digest[start..]);
    segments
}

fn balance_statement(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut open_at: Vec<usize> = Vec::new();
    let mut quotes = Quotes::default();
    let mut dropped = 0usize;

    for c in segment.chars() {
        if quotes.outside(c) {
            match c {
                '(' => open_at.push(out.len()),
                ')' if open_at.pop().is_none() => {
                    dropped += 1;
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }

    dropped += open_at.len();
    for at in open_at.into_iter().rev() {
        out.remove(at);
    }
    if dropped > 0 {
        trace!(dropped, "unbalanced parentheses removed");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  SELECT   A\n FROM  T  "), "SELECT A FROM T");
        assert_eq!(normalize("WHERE X IN(?)"), "WHERE X IN (?)");
        assert_eq!(normalize("SELECT MIN(X)"), "SELECT MIN(X)");
    }

    #[test]
    fn test_drops_unmatched_closers() {
        assert_eq!(
            sanitize_parens("SELECT (? + ?)) FROM DUAL; SELECT ?) FROM DUAL"),
            "SELECT (? + ?) FROM DUAL; SELECT ? FROM DUAL"
        );
    }

    #[test]
    fn test_drops_unmatched_openers() {
        assert_eq!(sanitize_parens("SELECT F(? FROM T"), "SELECT F? FROM T");
        assert_eq!(sanitize_parens("SELECT ((?)"), "SELECT (?)");
    }

    #[test]
    fn test_quoted_identifiers_untouched() {
        assert_eq!(sanitize_parens("SELECT \"a)b\" FROM T"), "SELECT \"a)b\" FROM T");
        assert_eq!(sanitize_parens("SELECT [x(] FROM T"), "SELECT [x(] FROM T");
    }

    #[test]
    fn test_semicolon_inside_quotes_is_not_a_boundary() {
        assert_eq!(
            sanitize_parens("SELECT \"a;)\" FROM T; SELECT [b;(] FROM T)"),
            "SELECT \"a;)\" FROM T; SELECT [b;(] FROM T"
        );
    }

    #[test]
    fn test_normalize_keeps_quoted_text() {
        assert_eq!(normalize("SELECT  \"a   b\" ,`IN(`"), "SELECT \"a   b\" ,`IN(`");
    }

    #[test]
    fn test_count_placeholders_skips_quotes() {
        assert_eq!(count_placeholders("SELECT `a?`, \"b?\", [c?] FROM T WHERE X = ?"), 1);
        assert_eq!(count_placeholders("?; ?"), 2);
    }

    #[test]
    fn test_balanced_input_unchanged() {
        let digest = "INSERT INTO T(A, B) VALUES (?, ?); SELECT COUNT(*) FROM T";
        assert_eq!(sanitize_parens(digest), digest);
    }
}
