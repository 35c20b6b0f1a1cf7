//! Grouping transform: flat rows to a synthetic tree of group headers.
//!
//! Applied when the options carry a `group_by` field list. Each level
//! buckets the incoming rows by one field's display text, in first-seen
//! order, and wraps every bucket in a synthetic group-header row.

use std::collections::HashMap;
use std::rc::Rc;

use crate::formatter::value_text;
use crate::types::Row;

pub fn group_rows(rows: &[Rc<Row>], fields: &[String]) -> Vec<Rc<Row>> {
    let Some((field, rest)) = fields.split_first() else {
        return rows.to_vec();
    };
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Rc<Row>>> = HashMap::new();
    for row in rows {
        let value = value_text(row.field(field));
        if !buckets.contains_key(&value) {
            order.push(value.clone());
        }
        buckets.entry(value).or_default().push(Rc::clone(row));
    }
    order
        .into_iter()
        .filter_map(|value| {
            let members = buckets.remove(&value)?;
            let children = group_rows(&members, rest);
            Some(Row::group(value, children))
        })
        .collect()
}
