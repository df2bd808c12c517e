// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};

use sql_signature::{
    dialect::{Dialect, Options},
    signature::{ParamKind, Signature, extract_params, signature, signature_many, statement_types}
};

const CORPUS: &[(Dialect, &str)] = &[
    (Dialect::MySql, "SELECT * FROM users WHERE name = 'Zoë' AND city = \"Kraków\""),
    (Dialect::MySql, "INSERT INTO t(a,b) VALUES (1,'日本'), (2,'héllo'), (3,'z')"),
    (Dialect::MySql, "UPDATE t SET note = 'naïve café' WHERE id = 7 # trailing"),
    (Dialect::MySql, "DELETE FROM log WHERE ts < '2024-01-01' LIMIT 100"),
    (Dialect::Postgres, "SELECT id, data->>'ключ' FROM docs WHERE id = $1 AND tag = E'a\\'b'"),
    (Dialect::Postgres, "INSERT INTO t(a, b) VALUES (1.5, 'ä'), (-2, 'ö') RETURNING id"),
    (Dialect::Postgres, "SELECT $$dollar ünïcode$$, 3e10, .5 FROM t"),
    (Dialect::Postgres, "WITH x AS (SELECT 1) UPDATE t SET a = 'ß' FROM x"),
    (Dialect::SqlServer, "SELECT TOP 10 [Name] FROM [dbo].[Users] WHERE Email = N'ü@x.de'"),
    (Dialect::SqlServer, "INSERT INTO t (a, b) VALUES (@p1, 'ç'), (@p2, 'ñ')"),
    (Dialect::SqlServer, "EXEC sp_who 'active'; SELECT 1"),
    (Dialect::Oracle, "SELECT q'[it's ünïcode]' FROM dual WHERE n = :name"),
    (Dialect::Oracle, "INSERT INTO t VALUES (1, 'Å'); INSERT INTO t VALUES (2, 'Ø')"),
    (Dialect::Oracle, "MERGE INTO t USING s ON (t.id = s.id) WHEN MATCHED THEN UPDATE SET t.v = 'é'")
];

const QUOTED_IDENTIFIERS: &[(Dialect, &str)] = &[
    (Dialect::MySql, "SELECT `a?`, `b;)` FROM t WHERE x = 1"),
    (Dialect::Postgres, "SELECT \"a;)\", \"q?\" FROM t WHERE x = 1"),
    (Dialect::SqlServer, "SELECT [a;(], [b?] FROM t WHERE x = 1; SELECT 2"),
    (Dialect::Oracle, "INSERT INTO t(\"c?\") VALUES (1), (2)")
];

fn option_grid(dialect: Dialect) -> [Options; 4] {
    [
        Options::new(dialect),
        Options::new(dialect).collapse_values(true),
        Options::new(dialect).paramize_time_funcs(true),
        Options::new(dialect)
            .paramize_time_funcs(true)
            .collapse_values(true)
    ]
}

fn each_signature(mut check: impl FnMut(&str, &Options, &Signature)) {
    for (dialect, sql) in CORPUS {
        for opts in option_grid(*dialect) {
            let sig = signature(sql, &opts);
            check(sql, &opts, &sig);
        }
    }
}

#[test]
fn test_span_fidelity() {
    each_signature(|sql, _, sig| {
        for p in &sig.params {
            assert_eq!(&sql[p.start..p.end], p.value, "in {sql}");
        }
    });
}

#[test]
fn test_placeholders_never_exceed_params() {
    each_signature(|sql, opts, sig| {
        assert!(sig.placeholder_count() <= sig.params.len(), "in {sql}");
        if !opts.collapse_values_in_digest {
            assert_eq!(sig.placeholder_count(), sig.params.len(), "in {sql}");
        }
    });

    for (dialect, sql) in QUOTED_IDENTIFIERS {
        let sig = signature(sql, &Options::new(*dialect));
        assert_eq!(sig.placeholder_count(), sig.params.len(), "in {sql}");
        assert!(!sig.is_collapsed(), "in {sql}");
    }
}

#[test]
fn test_quoted_identifiers_survive_sanitizing() {
    let sig = signature("SELECT \"a;)\" FROM t WHERE x = 1", &Options::new(Dialect::Postgres));
    assert_eq!(sig.digest, "SELECT \"a;)\" FROM T WHERE X = ?");

    let sig = signature("SELECT `b;)` FROM t", &Options::new(Dialect::MySql));
    assert_eq!(sig.digest, "SELECT `b;)` FROM T");

    let sig = signature(
        "SELECT [a;(], [b?] FROM t WHERE x = 1; SELECT 2",
        &Options::new(Dialect::SqlServer)
    );
    assert_eq!(sig.digest, "SELECT [a;(], [b?] FROM T WHERE X = ?; SELECT ?");
    assert_eq!(sig.statement_types.len(), 2);
}

#[test]
fn test_no_cross_tuple_leakage() {
    each_signature(|sql, _, sig| {
        for p in &sig.params {
            assert!(!p.value.contains("), ("), "{} in {sql}", p.value);
            assert!(!p.value.contains("),("), "{} in {sql}", p.value);
        }
    });
}

#[test]
fn test_paren_balance_per_segment() {
    let extra = [
        "SELECT (1+1)) FROM dual; SELECT 1 FROM dual",
        "SELECT ((a FROM t",
        ")) SELECT 1 ((",
        "SELECT COUNT(*) FROM t WHERE a IN ((1), (2)))"
    ];
    let mut inputs: Vec<(Dialect, &str)> = CORPUS.to_vec();
    inputs.extend(extra.iter().flat_map(|s| Dialect::ALL.map(|d| (d, *s))));

    for (dialect, sql) in inputs {
        for opts in option_grid(dialect) {
            let sig = signature(sql, &opts);
            for segment in sig.digest.split(';') {
                let mut depth = 0i32;
                for c in segment.chars() {
                    match c {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        _ => {}
                    }
                    assert!(depth >= 0, "negative depth in {:?}", sig.digest);
                }
                assert_eq!(depth, 0, "unbalanced {:?}", sig.digest);
            }
        }
    }
}

#[test]
fn test_row_col_completeness() {
    let cases = [
        (Dialect::MySql, "INSERT INTO t(a,b,c) VALUES (1,'x',2.5), (2,'y',NULL), (3,'z',0)", 3),
        (Dialect::Postgres, "INSERT INTO t(a, b) VALUES ($1, 'a'), ($2, 'b')", 2),
        (Dialect::SqlServer, "INSERT INTO t VALUES (N'ü', 1)", 1),
        (Dialect::Oracle, "INSERT INTO t(a) VALUES (:a)", 1)
    ];

    for (dialect, sql, tuples) in cases {
        let sig = signature(sql, &Options::new(dialect));
        let mut rows: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for p in sig.params.iter().filter(|p| p.row > 0) {
            rows.entry(p.row).or_default().insert(p.col);
        }

        assert_eq!(rows.len(), tuples, "in {sql}");
        for cols in rows.values() {
            let expected: BTreeSet<usize> = (1..=cols.len()).collect();
            assert_eq!(*cols, expected, "in {sql}");
        }
    }
}

#[test]
fn test_classification_survives_normalization() {
    for (dialect, sql) in CORPUS {
        let sig = signature(sql, &Options::new(*dialect));
        assert_eq!(
            statement_types(&sig.digest, *dialect),
            sig.statement_types,
            "{sql} -> {}",
            sig.digest
        );
    }
}

#[test]
fn test_collapsed_insert() {
    let sql = "INSERT INTO t(a,b) VALUES (1,'x'), (2,'y'), (3,'z');";
    let sig = signature(sql, &Options::new(Dialect::MySql).collapse_values(true));

    assert_eq!(sig.placeholder_count(), 2);
    assert!(sig.is_collapsed());
    assert_eq!(sig.params.len(), 6);
    let stamps: Vec<_> = sig.params.iter().map(|p| (p.row, p.col)).collect();
    assert_eq!(stamps, vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]);
}

#[test]
fn test_bind_disables_collapse() {
    let sql = "INSERT INTO t(a,b) VALUES (1, ?), (2, ?);";
    let sig = signature(sql, &Options::new(Dialect::MySql).collapse_values(true));

    assert_eq!(sig.placeholder_count(), 4);
    assert!(!sig.is_collapsed());
}

#[test]
fn test_dangling_closer_removed() {
    let sql = "SELECT (1+1)) FROM dual; SELECT 1 FROM dual";
    let sig = signature(sql, &Options::new(Dialect::Oracle));

    assert_eq!(sig.digest, "SELECT (? + ?) FROM DUAL; SELECT ? FROM DUAL");
    assert_eq!(sig.statement_types.len(), 2);
}

#[test]
fn test_oracle_time_keywords() {
    let sql = "SELECT SYSDATE, SYSTIMESTAMP FROM dual";

    let off = signature(sql, &Options::new(Dialect::Oracle));
    assert!(off.params.is_empty());
    assert_eq!(off.digest, "SELECT SYSDATE, SYSTIMESTAMP FROM DUAL");

    let on = signature(sql, &Options::new(Dialect::Oracle).paramize_time_funcs(true));
    assert_eq!(on.params.len(), 2);
    assert!(on.params.iter().all(|p| p.kind == ParamKind::Timestamp));
    assert_eq!(on.digest, "SELECT ?, ? FROM DUAL");
}

#[test]
fn test_index_and_hash_assigned() {
    let params = extract_params("SELECT 1, 2, 3", &Options::default());
    let indexes: Vec<_> = params.iter().map(|p| p.index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert_eq!(params[0].index_hash, "c4ca");
    assert_eq!(params[1].index_hash, "c81e");
    assert!(params.iter().all(|p| p.row == 0 && p.col == 0));
}

#[test]
fn test_statement_ranges() {
    let sql = "SELECT 'ü'; DELETE FROM t";
    let sig = signature(sql, &Options::new(Dialect::Postgres));
    let texts: Vec<_> = sig
        .statements
        .iter()
        .map(|s| &sql[s.start_byte..s.end_byte])
        .collect();
    assert_eq!(texts, vec!["SELECT 'ü'", "DELETE FROM t"]);
}

#[test]
fn test_malformed_input_is_total() {
    let inputs = [
        "",
        "   ",
        "-- only a comment",
        "/* unterminated",
        "SELECT 'unterminated",
        "SELECT \"unterminated",
        ")))(((",
        ";;;",
        "INSERT INTO t VALUES (",
        "INSERT INTO t VALUES (1), (",
        "SELECT $tag$ never closed"
    ];
    for dialect in Dialect::ALL {
        for sql in inputs {
            for opts in option_grid(dialect) {
                let sig = signature(sql, &opts);
                assert!(!sig.statement_types.is_empty());
                for p in &sig.params {
                    assert_eq!(&sql[p.start..p.end], p.value);
                }
            }
        }
    }
}

#[test]
fn test_signature_many_preserves_order() {
    let sqls: Vec<String> = (0..64).map(|i| format!("SELECT {} FROM t{}", i, i % 3)).collect();
    let sigs = signature_many(&sqls, &Options::new(Dialect::Postgres));

    assert_eq!(sigs.len(), 64);
    for (i, sig) in sigs.iter().enumerate() {
        assert_eq!(sig.params[0].value, i.to_string());
        assert_eq!(sig.digest, format!("SELECT ? FROM T{}", i % 3));
    }
}

#[test]
fn test_serializes_to_json() {
    let sig = signature("INSERT INTO t VALUES (1)", &Options::default());
    let json = serde_json::to_value(&sig).unwrap();

    assert_eq!(json["digest"], "INSERT INTO T VALUES (?)");
    assert_eq!(json["statement_types"][0], "INSERT");
    assert_eq!(json["params"][0]["kind"], "Number");
    assert_eq!(json["params"][0]["row"], 1);
}
