use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use test_log::test;

use tabula::{
    col, AsofDirection, AsofOptions, ClosedInterval, Column, DataType, Error, Expr,
    InequalityStrategy, Interrupt, JoinConfig, JoinType, JoinWhereOptions, RollingOptions, Table,
    Value, WindowDirection,
};

fn ids(values: &[Option<i64>]) -> Table {
    Table::new(vec![
        Column::from_options("id", values.iter().copied()),
        Column::from_values("row", (0..values.len() as i64).collect::<Vec<_>>()),
    ])
    .unwrap()
}

fn column_values(table: &Table, name: &str) -> Vec<Value> {
    (0..table.height())
        .map(|row| table.get(row, name).unwrap())
        .collect()
}

fn int_values(values: &[Option<i64>]) -> Vec<Value> {
    values.iter().map(|&value| Value::from(value)).collect()
}

#[test]
fn inner_join_on_shared_key() {
    let left = ids(&[Some(1), Some(2), Some(3), Some(4)]);
    let right = ids(&[Some(2), Some(3), Some(4), Some(5)]);

    let table = left.join(&right, "id", JoinType::Inner).unwrap();

    assert_eq!(table.height(), 3);
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["id", "row", "row_right"]
    );
    assert_eq!(
        column_values(&table, "id"),
        int_values(&[Some(2), Some(3), Some(4)])
    );
}

#[test]
fn left_join_pads_unmatched_rows() {
    let left = ids(&[Some(1), Some(2), Some(3), Some(4)]);
    let right = ids(&[Some(2), Some(3), Some(4), Some(5)]);

    let table = left.join(&right, "id", JoinType::Left).unwrap();

    assert_eq!(table.height(), 4);
    assert_eq!(
        column_values(&table, "row_right"),
        int_values(&[None, Some(0), Some(1), Some(2)])
    );
}

#[test]
fn null_keys_never_match() {
    let left = ids(&[None, Some(1), None]);
    let right = ids(&[None, Some(1)]);

    let inner = left.join(&right, "id", JoinType::Inner).unwrap();
    assert_eq!(column_values(&inner, "row"), int_values(&[Some(1)]));

    let left_join = left.join(&right, "id", JoinType::Left).unwrap();
    assert_eq!(
        column_values(&left_join, "row_right"),
        int_values(&[None, Some(1), None])
    );

    let outer = left.join(&right, "id", JoinType::Outer).unwrap();
    assert_eq!(outer.height(), 4);
    assert_eq!(
        column_values(&outer, "row"),
        int_values(&[Some(0), Some(1), Some(2), None])
    );
    assert_eq!(
        column_values(&outer, "row_right"),
        int_values(&[None, Some(1), None, Some(0)])
    );

    let semi = left.join(&right, "id", JoinType::Semi).unwrap();
    let anti = left.join(&right, "id", JoinType::Anti).unwrap();
    assert_eq!(column_values(&semi, "row"), int_values(&[Some(1)]));
    assert_eq!(column_values(&anti, "row"), int_values(&[Some(0), Some(2)]));
}

#[test]
fn composite_keys_with_mixed_widths() {
    let left = Table::new(vec![
        Column::from_values("a", vec![1i32, 1, 2]),
        Column::from_values("b", ["x", "y", "x"].map(str::to_owned).to_vec()),
    ])
    .unwrap();
    let right = Table::new(vec![
        Column::from_values("a", vec![1.0, 2.0, 2.5]),
        Column::from_values("b", ["y", "x", "x"].map(str::to_owned).to_vec()),
        Column::from_values("payload", vec![true, false, true]),
    ])
    .unwrap();

    let table = left
        .join_on(&right, &["a", "b"], &["a", "b"], JoinType::Inner)
        .unwrap();

    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["a", "b", "payload"]
    );
    assert_eq!(
        column_values(&table, "payload"),
        vec![Value::Boolean(true), Value::Boolean(false)]
    );
}

#[test]
fn custom_suffix_and_empty_result() {
    let left = ids(&[Some(1)]);
    let right = ids(&[Some(2)]);

    let table = left
        .join_with_config(
            &right,
            &JoinConfig::new(JoinType::Inner).on(["id"]).suffix("_other"),
        )
        .unwrap();

    assert_eq!(table.height(), 0);
    assert_eq!(
        table.schema(),
        vec![
            ("id".to_owned(), DataType::Int64),
            ("row".to_owned(), DataType::Int64),
            ("row_other".to_owned(), DataType::Int64)
        ]
    );
}

#[test]
fn equality_agrees_between_hash_and_predicate_joins() {
    let left = Table::new(vec![Column::from_values(
        "a",
        vec![9_007_199_254_740_993i64, 9_007_199_254_740_992, 3],
    )])
    .unwrap();
    let right = Table::new(vec![Column::from_values(
        "b",
        vec![9_007_199_254_740_992.0, 3.0, 3.5],
    )])
    .unwrap();

    let hashed = left.join_on(&right, &["a"], &["b"], JoinType::Inner).unwrap();
    let compared = left.join_where(&right, [col("a").equal(col("b"))]).unwrap();

    assert_eq!(hashed.height(), 2);
    assert_eq!(compared.height(), 2);
    assert_eq!(column_values(&hashed, "a"), column_values(&compared, "a"));
    assert_eq!(
        column_values(&compared, "a"),
        vec![Value::Int64(9_007_199_254_740_992), Value::Int64(3)]
    );
}

#[test]
fn empty_suffix_uses_default() {
    let left = ids(&[Some(1)]);
    let right = ids(&[Some(1)]);

    let table = left
        .join_with_config(&right, &JoinConfig::new(JoinType::Inner).on(["id"]).suffix(""))
        .unwrap();

    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["id", "row", "row_right"]
    );
}

#[test]
fn cross_join_pairs_every_row() {
    let left = ids(&[Some(1), Some(2)]);
    let right = ids(&[Some(3), Some(4), Some(5)]);

    let table = left
        .join_with_config(&right, &JoinConfig::new(JoinType::Cross))
        .unwrap();

    assert_eq!(table.height(), 6);
    let pairs = (0..6)
        .map(|row| {
            (
                table.get(row, "id").unwrap().as_i64(),
                table.get(row, "id_right").unwrap().as_i64(),
            )
        })
        .collect::<BTreeSet<_>>();
    assert_eq!(pairs.len(), 6);

    assert_eq!(left.join_where(&right, Vec::<Expr>::new()).unwrap(), table);
}

#[test]
fn single_inequality() {
    let left = Table::new(vec![Column::from_values("dur", vec![1i64, 5, 10])]).unwrap();
    let right = Table::new(vec![Column::from_values("time", vec![2i64, 6, 9])]).unwrap();

    let table = left.join_where(&right, [col("dur").lt(col("time"))]).unwrap();

    let pairs = (0..table.height())
        .map(|row| {
            (
                table.get(row, "dur").unwrap(),
                table.get(row, "time").unwrap(),
            )
        })
        .collect::<Vec<_>>();
    let expected = [(1, 2), (1, 6), (1, 9), (5, 6), (5, 9)]
        .map(|(dur, time)| (Value::Int64(dur), Value::Int64(time)))
        .to_vec();
    assert_eq!(pairs, expected);
}

#[test]
fn two_inequalities_match_brute_force() {
    let left = Table::new(vec![
        Column::from_values("dur", vec![140i64, 100, 90, 100]),
        Column::from_values("rev", vec![9i64, 12, 5, 9]),
    ])
    .unwrap();
    let right = Table::new(vec![
        Column::from_values("time", vec![100i64, 140, 80, 90, 100]),
        Column::from_values("cost", vec![6i64, 11, 10, 5, 9]),
    ])
    .unwrap();

    let output = left
        .join_where_with_options(
            &right,
            [col("dur").lt(col("time")).and(col("rev").gt(col("cost")))],
            &JoinWhereOptions::default(),
        )
        .unwrap();
    assert_eq!(output.strategy, InequalityStrategy::IeJoin);

    let mut expected = Vec::new();
    for l in 0..left.height() {
        for r in 0..right.height() {
            let dur = left.get(l, "dur").unwrap().as_i64();
            let rev = left.get(l, "rev").unwrap().as_i64();
            let time = right.get(r, "time").unwrap().as_i64();
            let cost = right.get(r, "cost").unwrap().as_i64();

            if dur < time && rev > cost {
                expected.push((dur, rev, time, cost));
            }
        }
    }

    let actual = (0..output.table.height())
        .map(|row| {
            let get = |name| output.table.get(row, name).unwrap().as_i64();
            (get("dur"), get("rev"), get("time"), get("cost"))
        })
        .collect::<Vec<_>>();
    assert_eq!(actual, expected);
}

#[test]
fn errors_are_reported() {
    let left = ids(&[Some(1)]);
    let right = ids(&[Some(1)]);

    assert!(matches!(
        left.join(&right, "nope", JoinType::Left),
        Err(Error::ColumnNotFound { .. })
    ));
    assert!(matches!(
        left.join_where(&right, [col("id").lt(col("missing"))]),
        Err(Error::UnknownColumn(_))
    ));
    assert!(matches!(
        left.join_where(&right, [col("id")]),
        Err(Error::UnsupportedPredicate(_))
    ));
}

#[test]
fn interrupt_cancels_hash_join() {
    let left = ids(&[Some(1), Some(2)]);
    let interrupt = Interrupt::new();
    interrupt.raise();

    let config = JoinConfig::new(JoinType::Inner)
        .on(["id"])
        .interrupt(interrupt);

    assert!(left.join_with_config(&left, &config).is_err());
}

#[test]
fn asof_join_keeps_left_rows() {
    let left = Table::new(vec![Column::from_values("t", vec![1.5, 3.0, 9.0])]).unwrap();
    let right = Table::new(vec![
        Column::from_values("t", vec![1i64, 3, 4]),
        Column::from_values("v", ["a", "b", "c"].map(str::to_owned).to_vec()),
    ])
    .unwrap();

    let table = left
        .join_asof(
            &right,
            &AsofOptions::new("t").direction(AsofDirection::Nearest),
        )
        .unwrap();

    assert_eq!(table.height(), 3);
    assert_eq!(
        column_values(&table, "v"),
        vec![Value::from("a"), Value::from("b"), Value::from("c")]
    );
}

#[test]
fn rolling_join_agrees_with_brute_force() {
    let mut rng = Pcg64::seed_from_u64(17);
    let mut sorted_keys = |rows: usize| {
        let mut keys = (0..rows)
            .map(|_| rng.gen_range(0..2000i64))
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    };
    let left_keys = sorted_keys(1300);
    let right_keys = sorted_keys(1100);

    let left = Table::new(vec![
        Column::from_values("t", left_keys.clone()),
        Column::from_values("row", (0..left_keys.len() as i64).collect::<Vec<_>>()),
    ])
    .unwrap();
    let right = Table::new(vec![
        Column::from_values("t", right_keys.clone()),
        Column::from_values("row", (0..right_keys.len() as i64).collect::<Vec<_>>()),
    ])
    .unwrap();

    let table = left
        .join_rolling(
            &right,
            &RollingOptions::new("t", 7.0)
                .direction(WindowDirection::Forward)
                .closed(ClosedInterval::Left),
        )
        .unwrap();

    let mut expected = Vec::new();
    for (l, &key) in left_keys.iter().enumerate() {
        let before = expected.len();
        for (r, &other) in right_keys.iter().enumerate() {
            if key <= other && other < key + 7 {
                expected.push((Some(l as i64), Some(r as i64)));
            }
        }
        if expected.len() == before {
            expected.push((Some(l as i64), None));
        }
    }

    let actual = (0..table.height())
        .map(|row| {
            (
                table.get(row, "row").unwrap().as_i64(),
                table.get(row, "row_right").unwrap().as_i64(),
            )
        })
        .collect::<Vec<_>>();

    assert_eq!(actual, expected);
}

fn random_table(rng: &mut Pcg64, rows: usize, null_ratio: f64) -> Table {
    let keys = (0..rows)
        .map(|_| (!rng.gen_bool(null_ratio)).then(|| rng.gen_range(0..64i64)))
        .collect::<Vec<_>>();
    let xs = (0..rows).map(|_| rng.gen_range(0..200i64)).collect::<Vec<_>>();
    let ys = (0..rows)
        .map(|_| f64::from(rng.gen_range(0..50i32)))
        .collect::<Vec<_>>();

    Table::new(vec![
        Column::from_options("key", keys),
        Column::from_values("x", xs),
        Column::from_values("y", ys),
        Column::from_values("row", (0..rows as i64).collect::<Vec<_>>()),
    ])
    .unwrap()
}

fn row_pairs(table: &Table) -> Vec<(Option<i64>, Option<i64>)> {
    (0..table.height())
        .map(|row| {
            (
                table.get(row, "row").unwrap().as_i64(),
                table.get(row, "row_right").unwrap().as_i64(),
            )
        })
        .collect()
}

#[test]
fn randomized_equi_join_properties() {
    let mut rng = Pcg64::seed_from_u64(0x7461_6275);
    let left = random_table(&mut rng, 1500, 0.1);
    let right = random_table(&mut rng, 1300, 0.1);

    let inner = left.join(&right, "key", JoinType::Inner).unwrap();
    let left_join = left.join(&right, "key", JoinType::Left).unwrap();
    let semi = left.join(&right, "key", JoinType::Semi).unwrap();
    let anti = left.join(&right, "key", JoinType::Anti).unwrap();
    let outer = left.join(&right, "key", JoinType::Outer).unwrap();
    let flipped = right.join(&left, "key", JoinType::Outer).unwrap();

    let mut expected = Vec::new();
    for l in 0..left.height() {
        for r in 0..right.height() {
            let (lk, rk) = (left.get(l, "key").unwrap(), right.get(r, "key").unwrap());
            if !lk.is_null() && lk == rk {
                expected.push((Some(l as i64), Some(r as i64)));
            }
        }
    }
    assert_eq!(row_pairs(&inner), expected);

    assert!(left_join.height() >= left.height());
    assert_eq!(semi.height() + anti.height(), left.height());
    let semi_rows = column_values(&semi, "row").into_iter().map(|v| v.as_i64());
    let anti_rows = column_values(&anti, "row")
        .into_iter()
        .map(|v| v.as_i64())
        .collect::<BTreeSet<_>>();
    assert!(semi_rows.into_iter().all(|row| !anti_rows.contains(&row)));

    let matched = |pairs: Vec<(Option<i64>, Option<i64>)>| {
        pairs
            .into_iter()
            .filter_map(|(a, b)| a.zip(b))
            .collect::<BTreeSet<_>>()
    };
    let flipped_pairs = row_pairs(&flipped)
        .into_iter()
        .map(|(a, b)| (b, a))
        .collect::<Vec<_>>();
    assert_eq!(matched(row_pairs(&outer)), matched(flipped_pairs));
}

#[test]
fn randomized_inequality_join_matches_nested_loop() {
    let mut rng = Pcg64::seed_from_u64(42);
    let left = random_table(&mut rng, 1200, 0.0);
    let right = random_table(&mut rng, 1100, 0.0);

    let options = JoinWhereOptions::default();
    let accelerated = left
        .join_where_with_options(
            &right,
            [col("x").gt_eq(col("x")), col("y").lt(col("y"))],
            &options,
        )
        .unwrap();
    assert_eq!(accelerated.strategy, InequalityStrategy::IeJoin);

    let mut expected = Vec::new();
    for l in 0..left.height() {
        for r in 0..right.height() {
            let lx = left.get(l, "x").unwrap();
            let rx = right.get(r, "x").unwrap();
            let ly = left.get(l, "y").unwrap();
            let ry = right.get(r, "y").unwrap();

            if lx.compare(&rx).is_some_and(|o| o.is_ge())
                && ly.compare(&ry).is_some_and(|o| o.is_lt())
            {
                expected.push((Some(l as i64), Some(r as i64)));
            }
        }
    }

    assert_eq!(row_pairs(&accelerated.table), expected);
}
