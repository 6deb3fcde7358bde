//! Placeholder substitution for request descriptors.
use crate::data::Row;

/// Placeholder token for `field`, e.g. `{{user}}`.
#[must_use]
pub fn placeholder(field: &str) -> String {
    format!("{{{{{}}}}}", field)
}

/// Replaces every `{{field}}` in `template` with the row's value, one field
/// at a time. Without a row the template is returned unchanged.
///
/// Placeholders that name no field of the row stay in the output verbatim.
#[must_use]
pub fn expand(template: &str, row: Option<&Row>) -> String {
    let Some(row) = row else {
        return template.to_owned();
    };
    let mut output = template.to_owned();
    for (field, value) in row.iter() {
        let token = placeholder(field);
        if output.contains(&token) {
            output = output.replace(&token, value);
        }
    }
    output
}
