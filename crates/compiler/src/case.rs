//! Property name case conversion
//!
//! DyeScript stores properties in camelCase and emits them in kebab-case.

/// Convert a camelCase property to kebab-case (`backgroundColor` -> `background-color`)
///
/// A leading uppercase letter becomes a vendor prefix (`WebkitTransition` ->
/// `-webkit-transition`). Custom properties (`--x`) are returned unchanged.
pub fn to_kebab_case(input: &str) -> String {
    if input.starts_with("--") {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a kebab-case property to camelCase (`background-color` -> `backgroundColor`)
pub fn to_camel_case(input: &str) -> String {
    if input.starts_with("--") {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for c in input.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
