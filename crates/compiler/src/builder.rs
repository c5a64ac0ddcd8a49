//! CSS output
//!
//! [`CssBuilder`] renders a finished [`Store`] in a fixed order: style
//! rules, `@keyframes` animations, reduced-motion animations, then
//! `@font-face` rules. [`MinCssBuilder`] renders the same text and drops
//! every `;` that directly precedes a `}`.

use crate::case::to_kebab_case;
use crate::store::{Animation, FontFace, Store, Style, StyleValues};

/// Media query wrapping the motions block
pub const REDUCED_MOTION_QUERY: &str = "@media (prefers-reduced-motion)";

/// Turns a store into stylesheet text
pub trait StylesheetBuilder {
    fn build(&self, store: &Store) -> String;
}

/// Pick the value to render when a property was written more than once
///
/// The most recent write wins.
pub fn dominant_value(values: &StyleValues) -> Option<&str> {
    values.last().map(String::as_str)
}

/// Base renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct CssBuilder;

impl CssBuilder {
    pub fn new() -> Self {
        Self
    }

    fn process_styles(&self, out: &mut String, store: &Store) {
        for (selector, style) in store.styles().iter() {
            out.push_str(selector);
            out.push('{');
            self.process_declarations(out, style);
            out.push('}');
        }
    }

    fn process_declarations(&self, out: &mut String, style: &Style) {
        for (property, values) in style.iter() {
            if let Some(value) = dominant_value(values) {
                out.push_str(&format!("{}:{};", to_kebab_case(property), value));
            }
        }
    }

    fn process_keyframes(&self, out: &mut String, name: &str, animation: &Animation) {
        out.push_str(&format!("@keyframes {}{{", name));
        for (label, properties) in animation.iter() {
            out.push_str(label);
            out.push('{');
            for (property, value) in properties.iter() {
                out.push_str(&format!("{}:{};", to_kebab_case(property), value));
            }
            out.push('}');
        }
        out.push('}');
    }

    fn process_animations(&self, out: &mut String, store: &Store) {
        for (name, animation) in store.animations().iter() {
            self.process_keyframes(out, name, animation);
        }
    }

    fn process_motions(&self, out: &mut String, store: &Store) {
        if store.motions().is_empty() {
            return;
        }

        out.push_str(REDUCED_MOTION_QUERY);
        out.push('{');
        for (name, motion) in store.motions().iter() {
            self.process_keyframes(out, name, motion);
        }
        out.push('}');
    }

    fn process_fonts(&self, out: &mut String, store: &Store) {
        for (family, font) in store.fonts().iter() {
            if let Some(rule) = font_face_rule(family, font) {
                out.push_str(&rule);
            }
        }
    }
}

/// `@font-face` rule for one font, or `None` if it has no source
fn font_face_rule(family: &str, font: &FontFace) -> Option<String> {
    let source = font.source.as_deref()?;
    let mut rule = format!("@font-face{{font-family:{};src:url({})", family, source);
    for (descriptor, value) in font.descriptors.iter() {
        rule.push_str(&format!(";{}:{}", to_kebab_case(descriptor), value));
    }
    rule.push('}');
    Some(rule)
}

impl StylesheetBuilder for CssBuilder {
    fn build(&self, store: &Store) -> String {
        let mut out = String::new();
        self.process_styles(&mut out, store);
        self.process_animations(&mut out, store);
        self.process_motions(&mut out, store);
        self.process_fonts(&mut out, store);
        log::debug!("Rendered {} bytes of CSS", out.len());
        out
    }
}

/// Renderer for digested output
#[derive(Debug, Clone, Copy, Default)]
pub struct MinCssBuilder {
    base: CssBuilder,
}

impl MinCssBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StylesheetBuilder for MinCssBuilder {
    fn build(&self, store: &Store) -> String {
        self.base.build(store).replace(";}", "}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn box_store() -> Store {
        let mut store = Store::new();
        store.add_style(&[".box"], "color", "red");
        store
    }

    fn fade_store() -> Store {
        let mut store = Store::new();
        store.add_keyframe("fade", "from", "opacity", "0");
        store.add_keyframe("fade", "to", "opacity", "1");
        store
    }

    #[test]
    fn test_empty_store() {
        let store = Store::new();
        assert_eq!(CssBuilder::new().build(&store), "");
        assert_eq!(MinCssBuilder::new().build(&store), "");
    }

    #[test]
    fn test_style_rule() {
        let store = box_store();
        assert_eq!(CssBuilder::new().build(&store), ".box{color:red;}");
        assert_eq!(MinCssBuilder::new().build(&store), ".box{color:red}");
    }

    #[test]
    fn test_properties_kebab_cased() {
        let mut store = Store::new();
        store.add_style(&["body"], "backgroundColor", "white");
        store.add_style(&["body"], "WebkitUserSelect", "none");
        assert_eq!(
            CssBuilder::new().build(&store),
            "body{background-color:white;-webkit-user-select:none;}"
        );
    }

    #[test]
    fn test_dominant_value_last_write_wins() {
        let values: StyleValues = smallvec!["#f00".to_string(), "rgb(255, 0, 0)".to_string()];
        assert_eq!(dominant_value(&values), Some("rgb(255, 0, 0)"));
        assert_eq!(dominant_value(&StyleValues::new()), None);

        let mut store = box_store();
        store.add_style(&[".box"], "color", "blue");
        assert_eq!(CssBuilder::new().build(&store), ".box{color:blue;}");
    }

    #[test]
    fn test_keyframes() {
        let store = fade_store();
        assert_eq!(
            CssBuilder::new().build(&store),
            "@keyframes fade{from{opacity:0;}to{opacity:1;}}"
        );

        let min = MinCssBuilder::new().build(&store);
        assert_eq!(min, "@keyframes fade{from{opacity:0}to{opacity:1}}");
        assert!(!min.contains(";}"));
    }

    #[test]
    fn test_motions_wrapped_once() {
        let mut store = Store::new();
        store.add_motion("spin", "to", "transform", "rotate(360deg)");
        store.add_motion("pulse", "50%", "opacity", "0.5");
        assert_eq!(
            CssBuilder::new().build(&store),
            "@media (prefers-reduced-motion){\
             @keyframes spin{to{transform:rotate(360deg);}}\
             @keyframes pulse{50%{opacity:0.5;}}}"
        );
    }

    #[test]
    fn test_fonts() {
        let mut store = Store::new();
        store.add_font("Inter", FontFace::new("inter.woff2").with_descriptor("fontWeight", "700"));
        store.add_font("Ghost", FontFace::default());
        assert_eq!(
            CssBuilder::new().build(&store),
            "@font-face{font-family:Inter;src:url(inter.woff2);font-weight:700}"
        );
    }

    #[test]
    fn test_section_order() {
        let mut store = fade_store();
        store.add_font("Inter", FontFace::new("inter.woff2"));
        store.add_motion("spin", "to", "opacity", "0");
        store.add_style(&["p"], "margin", "0");

        let css = CssBuilder::new().build(&store);
        let style = css.find("p{").unwrap();
        let keyframes = css.find("@keyframes fade").unwrap();
        let media = css.find(REDUCED_MOTION_QUERY).unwrap();
        let font = css.find("@font-face").unwrap();
        assert!(style < keyframes && keyframes < media && media < font);
    }

    #[test]
    fn test_minified_matches_stripped_base() {
        let mut store = box_store();
        store.add_style(&[".a", ".b"], "marginTop", "4px");
        store.add_style(&["#nav"], "display", "flex");

        let base = CssBuilder::new().build(&store);
        let stripped: String = base.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(stripped.replace(";}", "}"), MinCssBuilder::new().build(&store));
    }

    #[test]
    fn test_braces_balanced() {
        let mut store = fade_store();
        store.add_motion("spin", "from", "opacity", "1");
        store.add_font("Inter", FontFace::new("inter.woff2"));
        store.add_style(&["a"], "color", "red");

        for css in [CssBuilder::new().build(&store), MinCssBuilder::new().build(&store)] {
            let open = css.matches('{').count();
            let close = css.matches('}').count();
            assert_eq!(open, close);
        }
    }
}
