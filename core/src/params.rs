//! Query-string fragment builders.
//!
//! A fragment is the `&key=value&key=value` tail appended after the token in
//! a request URL. Parameters are appended in call order; absent values are
//! skipped.

use std::fmt::Display;

use url::form_urlencoded;

/// Append `&name=value` to `fragment` when `value` is present.
///
/// A value whose `Display` form is empty is treated as absent. Values are
/// form-urlencoded, so plain alphanumerics pass through unchanged.
pub fn paramify<V: Display>(mut fragment: String, name: &str, value: Option<V>) -> String {
    let Some(value) = value else {
        return fragment;
    };
    let value = value.to_string();
    if value.is_empty() {
        return fragment;
    }
    fragment.push('&');
    fragment.push_str(name);
    fragment.push('=');
    fragment.extend(form_urlencoded::byte_serialize(value.as_bytes()));
    fragment
}

/// Start a fragment from the two pagination parameters.
pub fn paramify_pages(per_page: Option<u32>, page: Option<u32>) -> String {
    let fragment = paramify(String::new(), "per_page", per_page);
    paramify(fragment, "page", page)
}
