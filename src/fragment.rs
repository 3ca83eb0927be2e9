//! Pre-rendered HTML fragments: script extraction and a plain-text projection
//!
//! Markup spliced into a container does not execute its `<script>` tags, so a
//! fragment is split into its inert markup and the ordered list of scripts the
//! loader must revive after the markup is attached.

use std::sync::OnceLock;

use regex::Regex;

/// An executable snippet found in a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// `type` attribute, if any
    pub kind: Option<String>,
    /// `src` attribute for external scripts
    pub src: Option<String>,
    /// Inline body; empty for external scripts
    pub text: String,
}

impl Script {
    pub fn is_external(&self) -> bool {
        self.src.is_some()
    }

    /// Short description for logs and listings
    pub fn summary(&self) -> String {
        let kind = self.kind.as_deref().unwrap_or("text/javascript");
        match &self.src {
            Some(src) => format!("{} src={}", kind, src),
            None => format!("{} inline ({} bytes)", kind, self.text.len()),
        }
    }
}

/// Fragment split into markup (scripts removed) and scripts in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub markup: String,
    pub scripts: Vec<Script>,
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("script pattern compiles")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b([a-z-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("attribute pattern compiles")
    })
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    attr_re().captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
    })
}

impl Fragment {
    pub fn parse(html: &str) -> Self {
        let mut markup = String::with_capacity(html.len());
        let mut scripts = Vec::new();
        let mut last = 0;

        for caps in script_re().captures_iter(html) {
            let Some(whole) = caps.get(0) else { continue };
            markup.push_str(&html[last..whole.start()]);
            last = whole.end();

            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let src = attribute(attrs, "src").filter(|s| !s.is_empty());
            let text = if src.is_some() {
                String::new()
            } else {
                caps.get(2).map_or("", |m| m.as_str()).to_string()
            };
            scripts.push(Script {
                kind: attribute(attrs, "type").filter(|t| !t.is_empty()),
                src,
                text,
            });
        }
        markup.push_str(&html[last..]);

        Self { markup, scripts }
    }

    /// Whether the markup carries a marker such as `id="matchups_tool"`
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.markup.contains(marker)
    }

    pub fn text(&self) -> String {
        html_to_text(&self.markup)
    }
}

fn block_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|li|tr|h[1-6]|table|ul|ol|section|header)\s*>")
            .expect("block pattern compiles")
    })
}

fn invisible_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>|<!--.*?-->").expect("style pattern compiles")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"))
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&hellip;", "…")
        .replace("&amp;", "&")
}

/// Plain-text projection of markup for terminal display
pub fn html_to_text(markup: &str) -> String {
    let without_invisible = invisible_re().replace_all(markup, "");
    let with_breaks = block_break_re().replace_all(&without_invisible, "\n");
    let with_cells = with_breaks.replace("</td>", " ").replace("</th>", " ");
    let stripped = tag_re().replace_all(&with_cells, "");
    let decoded = decode_entities(&stripped);

    let mut lines: Vec<String> = Vec::new();
    for line in decoded.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
