// file: src/stackexchange/html.rs
// description: reduces rendered post bodies and titles to plain text
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref BLOCK_TAG: Regex = Regex::new(r"(?i)</?(?:p|pre|br|li|ul|ol|h[1-6]|blockquote|hr)[^>]*>")
        .expect("BLOCK_TAG regex is valid");
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").expect("ANY_TAG regex is valid");
    static ref ENTITY: Regex =
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("ENTITY regex is valid");
}

/// Strips markup, decodes entities and collapses whitespace.
pub fn to_plain_text(html: &str) -> String {
    let spaced = BLOCK_TAG.replace_all(html, " ");
    let untagged = ANY_TAG.replace_all(&spaced, "");
    let decoded = decode_entities(&untagged);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    let named = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    };
    if let Some(c) = named {
        return Some(c.to_string());
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_tags() {
        let html = "<p>Use <code>Option</code> instead.</p>\n<pre><code>let x = None;\n</code></pre>";
        assert_eq!(to_plain_text(html), "Use Option instead. let x = None;");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(
            decode_entities("Vec&lt;T&gt; &amp; &quot;slices&quot; don&#39;t &#x2014; ok"),
            "Vec<T> & \"slices\" don't \u{2014} ok"
        );
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_entities_decoded_after_tags_removed() {
        // escaped markup in code samples must survive as text
        assert_eq!(to_plain_text("<code>&lt;div&gt;</code>"), "<div>");
    }
}
