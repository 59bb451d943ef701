//! Caption XML parsing.
//!
//! YouTube serves two timedtext formats:
//! format 3 (current): `<p t="ms" d="ms">text</p>`, where the body may be
//! split into per-word `<s>` elements; and the legacy
//! `<text start="sec" dur="sec">text</text>`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Segment;

static RE_FORMAT3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<p t="(\d+)" d="(\d+)"[^>]*>(.*?)</p>"#).expect("valid regex")
});
static RE_LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<text start="([^"]*)" dur="([^"]*)">([^<]*)</text>"#).expect("valid regex")
});
static RE_STRIP_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static RE_NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(\d+);").expect("valid regex"));

/// One caption unit as parsed from the XML, times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Parse caption XML into snippets, in document order.
///
/// Tries format 3 first; format-3 entries whose text is empty after tag
/// stripping (music cues, blank paragraphs) are dropped. If no format-3
/// entries are found, falls back to the legacy format, unfiltered.
pub fn parse_caption_xml(xml: &str) -> Vec<Snippet> {
    let mut snippets: Vec<Snippet> = RE_FORMAT3
        .captures_iter(xml)
        .filter_map(|c| {
            let start_ms: f64 = c[1].parse().ok()?;
            let dur_ms: f64 = c[2].parse().ok()?;
            let text = RE_STRIP_TAGS.replace_all(&c[3], "").into_owned();
            Some(Snippet {
                text,
                start: start_ms / 1000.0,
                duration: dur_ms / 1000.0,
            })
        })
        .filter(|s| !s.text.trim().is_empty())
        .collect();

    if snippets.is_empty() {
        snippets = RE_LEGACY
            .captures_iter(xml)
            .filter_map(|c| {
                Some(Snippet {
                    text: c[3].to_string(),
                    start: c[1].parse().ok()?,
                    duration: c[2].parse().ok()?,
                })
            })
            .collect();
    }

    snippets
}

/// Decode the HTML entities YouTube emits in caption text.
pub fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    RE_NUMERIC_ENTITY
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Round to two decimal places.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Project raw snippets into output segments: entities decoded, text
/// trimmed, times rounded to two decimals. Order is preserved.
pub fn project_segments(snippets: Vec<Snippet>) -> Vec<Segment> {
    snippets
        .into_iter()
        .map(|s| Segment {
            text: decode_entities(s.text.trim()),
            offset: round2(s.start),
            duration: round2(s.duration),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format3() {
        let xml = r#"<timedtext format="3"><body>
            <p t="0" d="2500">Hi there</p>
            <p t="2500" d="3100">welcome back</p>
        </body></timedtext>"#;
        let snippets = parse_caption_xml(xml);
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "Hi there");
        assert_eq!(snippets[0].start, 0.0);
        assert_eq!(snippets[0].duration, 2.5);
        assert_eq!(snippets[1].start, 2.5);
    }

    #[test]
    fn test_parse_format3_word_segments() {
        let xml = r#"<p t="1000" d="2000" w="1"><s ac="248">Hi</s><s t="160"> there</s></p>"#;
        let snippets = parse_caption_xml(xml);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "Hi there");
        assert_eq!(snippets[0].start, 1.0);
        assert_eq!(snippets[0].duration, 2.0);
    }

    #[test]
    fn test_parse_format3_drops_empty_entries() {
        let xml = r#"<p t="0" d="500"></p><p t="500" d="1000">real text</p>"#;
        let snippets = parse_caption_xml(xml);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "real text");
    }

    #[test]
    fn test_parse_legacy() {
        let xml = r#"<transcript>
            <text start="0.5" dur="2.25">first line</text>
            <text start="2.75" dur="1.5">second line</text>
        </transcript>"#;
        let snippets = parse_caption_xml(xml);
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "first line");
        assert_eq!(snippets[0].start, 0.5);
        assert_eq!(snippets[1].duration, 1.5);
    }

    #[test]
    fn test_parse_prefers_format3() {
        let xml = r#"<p t="0" d="1000">new</p><text start="0" dur="1">old</text>"#;
        let snippets = parse_caption_xml(xml);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "new");
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_caption_xml("<timedtext></timedtext>").is_empty());
        assert!(parse_caption_xml("").is_empty());
    }

    #[test]
    fn test_parse_preserves_order() {
        let xml: String = (0..10)
            .map(|i| format!(r#"<p t="{}" d="1000">line {i}</p>"#, i * 1000))
            .collect();
        let snippets = parse_caption_xml(&xml);
        assert_eq!(snippets.len(), 10);
        for (i, s) in snippets.iter().enumerate() {
            assert_eq!(s.text, format!("line {i}"));
            assert_eq!(s.start, i as f64);
        }
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry &#39;re &lt;great&gt; &quot;friends&quot;"),
            r#"Tom & Jerry 're <great> "friends""#
        );
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("caf&#233;"), "café");
        assert_eq!(decode_entities("no entities"), "no entities");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.5005), 2.5);
        assert_eq!(round2(0.001), 0.0);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_project_trims_and_rounds() {
        let segments = project_segments(vec![Snippet {
            text: "  Hi there  ".into(),
            start: 0.001,
            duration: 2.5005,
        }]);
        assert_eq!(
            segments,
            vec![Segment {
                text: "Hi there".into(),
                offset: 0.0,
                duration: 2.5,
            }]
        );
    }

    #[test]
    fn test_project_decodes_entities() {
        let segments = project_segments(vec![Snippet {
            text: " it&#39;s fine ".into(),
            start: 1.0,
            duration: 1.0,
        }]);
        assert_eq!(segments[0].text, "it's fine");
    }

    #[test]
    fn test_project_empty() {
        assert!(project_segments(Vec::new()).is_empty());
    }
}
