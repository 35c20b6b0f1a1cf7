//! Multi-column sort over formatted cell text.
//!
//! Sorting never looks at raw values: each key column's cells are run
//! through its formatter first, so a date column sorts by what the user
//! sees. Comparison is numeric-aware and case-insensitive; missing and
//! null values sort last regardless of direction.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::formatter::FormatterRegistry;
use crate::types::{ColumnConfig, Row, SortDirection};

/// One sort key: column position in the config plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortKey {
    column: usize,
    direction: SortDirection,
}

/// The active multi-column sort, ordered by precedence. Rebuilt only when
/// sort-relevant column attributes change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortScheme {
    keys: Vec<SortKey>,
}

impl SortScheme {
    /// Collect sorted columns ordered by their `sort_index`.
    pub fn build(columns: &[ColumnConfig]) -> SortScheme {
        let mut indexed: Vec<(usize, SortKey)> = columns
            .iter()
            .enumerate()
            .filter_map(|(column, config)| {
                config.sort_index.map(|sort_index| {
                    (
                        sort_index,
                        SortKey {
                            column,
                            direction: config.direction(),
                        },
                    )
                })
            })
            .collect();
        indexed.sort_by_key(|(sort_index, _)| *sort_index);
        SortScheme {
            keys: indexed.into_iter().map(|(_, key)| key).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Formatted sort text for one cell, `None` when the field is absent or
/// null so it can be pushed to the end.
fn sort_text(
    row: &Row,
    config: &ColumnConfig,
    registry: &FormatterRegistry,
) -> Option<String> {
    let value = row.field(&config.field)?;
    if value.is_null() {
        return None;
    }
    let params = config.formatter_params.unwrap_or_default();
    Some(
        registry
            .resolve(config.formatter.as_deref())
            .to_text(Some(value), &params),
    )
}

/// Sort one sibling slice by the scheme. Returns a new vector; stable for
/// equal keys, so a no-op resort returns the input order.
pub fn sort_rows(
    rows: &[Rc<Row>],
    scheme: &SortScheme,
    columns: &[ColumnConfig],
    registry: &FormatterRegistry,
) -> Vec<Rc<Row>> {
    if scheme.is_empty() || rows.len() < 2 {
        return rows.to_vec();
    }
    let mut keyed: Vec<(Vec<Option<String>>, Rc<Row>)> = rows
        .iter()
        .map(|row| {
            let texts = scheme
                .keys
                .iter()
                .map(|key| {
                    columns
                        .get(key.column)
                        .and_then(|config| sort_text(row, config, registry))
                })
                .collect();
            (texts, Rc::clone(row))
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        for (key, (at, bt)) in scheme.keys.iter().zip(a.iter().zip(b.iter())) {
            let ordering = match (at, bt) {
                (None, None) => Ordering::Equal,
                // Missing values sink to the end in both directions.
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
                (Some(at), Some(bt)) => match key.direction {
                    SortDirection::Asc => natural_cmp(at, bt),
                    SortDirection::Desc => natural_cmp(bt, at),
                },
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Numeric-aware, case-insensitive string comparison: digit runs compare
/// as numbers ("item2" < "item10"), everything else per lowercased char.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) if ac.is_ascii_digit() && bc.is_ascii_digit() => {
                let an = take_digit_run(&mut ai);
                let bn = take_digit_run(&mut bi);
                let ordering = cmp_digit_runs(&an, &bn);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(ac), Some(bc)) => {
                let ordering = ac.to_lowercase().cmp(bc.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compare two digit runs as integers of arbitrary length.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
