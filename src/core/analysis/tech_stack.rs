// src/core/analysis/tech_stack.rs

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::core::models::TechStack;

/// Where a signature looks for its pattern.
pub enum Check<'a> {
    /// Check for a pattern in a specific HTTP header.
    Header(&'a str, &'a Lazy<Regex>),
    /// Check for a pattern anywhere in the HTML body.
    Body(&'a Lazy<Regex>),
}

/// Which part of the report a matching signature fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Single slot; the first matching signature wins.
    Cms,
    /// Single slot; the first matching signature wins.
    Cdn,
    JsLibrary,
    Analytics,
    Other,
}

/// A rule that defines how to detect a specific technology.
pub struct Signature<'a> {
    /// The name reported when the rule matches (e.g., "WordPress").
    pub tech_name: &'a str,
    pub slot: Slot,
    pub check: Check<'a>,
}

static RE_META_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<meta[^>]+>").unwrap());
static RE_META_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)name=["']?([^"'> ]+)"#).unwrap());
static RE_META_CONTENT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)content=["']?([^"'>]+)"#).unwrap());

static RE_WORDPRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wp-content|wp-includes|wordpress").unwrap());
static RE_DRUPAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)drupal").unwrap());
static RE_JOOMLA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)joomla").unwrap());
static RE_SHOPIFY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)shopify").unwrap());
static RE_SQUARESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)squarespace").unwrap());
static RE_WIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wix\.com").unwrap());
static RE_JQUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)jquery").unwrap());
static RE_REACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)react").unwrap());
static RE_ANGULAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)angular").unwrap());
static RE_VUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)vue").unwrap());
static RE_EMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ember").unwrap());
static RE_NEXTJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)next[.-]js").unwrap());
static RE_NUXTJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nuxt[.-]js").unwrap());
static RE_SVELTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)svelte").unwrap());
static RE_GOOGLE_ANALYTICS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)www\.googletagmanager\.com|google-analytics\.com").unwrap());
static RE_GOOGLE_ADS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)www\.googleadservices\.com").unwrap());
static RE_FACEBOOK_PIXEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)connect\.facebook\.net").unwrap());
static RE_HOTJAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)static\.hotjar\.com").unwrap());
static RE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cdn\.segment\.com").unwrap());
static RE_BOOTSTRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)bootstrap(\.min)?\.css").unwrap());
static RE_CLOUDFLARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cloudflare").unwrap());
static RE_AKAMAI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)akamai").unwrap());
static RE_FASTLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)fastly").unwrap());

/// The default signature table, in priority order.
pub static SIGNATURES: &[Signature] = &[
    Signature { tech_name: "WordPress", slot: Slot::Cms, check: Check::Body(&RE_WORDPRESS) },
    Signature { tech_name: "Drupal", slot: Slot::Cms, check: Check::Body(&RE_DRUPAL) },
    Signature { tech_name: "Joomla", slot: Slot::Cms, check: Check::Body(&RE_JOOMLA) },
    Signature { tech_name: "Shopify", slot: Slot::Cms, check: Check::Body(&RE_SHOPIFY) },
    Signature { tech_name: "Squarespace", slot: Slot::Cms, check: Check::Body(&RE_SQUARESPACE) },
    Signature { tech_name: "Wix", slot: Slot::Cms, check: Check::Body(&RE_WIX) },
    Signature { tech_name: "jQuery", slot: Slot::JsLibrary, check: Check::Body(&RE_JQUERY) },
    Signature { tech_name: "React", slot: Slot::JsLibrary, check: Check::Body(&RE_REACT) },
    Signature { tech_name: "Angular", slot: Slot::JsLibrary, check: Check::Body(&RE_ANGULAR) },
    Signature { tech_name: "Vue.js", slot: Slot::JsLibrary, check: Check::Body(&RE_VUE) },
    Signature { tech_name: "Ember.js", slot: Slot::JsLibrary, check: Check::Body(&RE_EMBER) },
    Signature { tech_name: "Next.js", slot: Slot::JsLibrary, check: Check::Body(&RE_NEXTJS) },
    Signature { tech_name: "Nuxt.js", slot: Slot::JsLibrary, check: Check::Body(&RE_NUXTJS) },
    Signature { tech_name: "Svelte", slot: Slot::JsLibrary, check: Check::Body(&RE_SVELTE) },
    Signature { tech_name: "Google Analytics", slot: Slot::Analytics, check: Check::Body(&RE_GOOGLE_ANALYTICS) },
    Signature { tech_name: "Google Ads", slot: Slot::Analytics, check: Check::Body(&RE_GOOGLE_ADS) },
    Signature { tech_name: "Facebook Pixel", slot: Slot::Analytics, check: Check::Body(&RE_FACEBOOK_PIXEL) },
    Signature { tech_name: "Hotjar", slot: Slot::Analytics, check: Check::Body(&RE_HOTJAR) },
    Signature { tech_name: "Segment", slot: Slot::Analytics, check: Check::Body(&RE_SEGMENT) },
    Signature { tech_name: "Bootstrap", slot: Slot::Other, check: Check::Body(&RE_BOOTSTRAP) },
    Signature { tech_name: "Cloudflare", slot: Slot::Cdn, check: Check::Header("server", &RE_CLOUDFLARE) },
    Signature { tech_name: "Akamai", slot: Slot::Cdn, check: Check::Header("server", &RE_AKAMAI) },
    Signature { tech_name: "Fastly", slot: Slot::Cdn, check: Check::Header("server", &RE_FASTLY) },
];

/// Detects the technology stack with the default [`SIGNATURES`] table.
pub fn detect_tech_stack(headers: &HeaderMap, html: &str) -> TechStack {
    detect_tech_stack_with(headers, html, SIGNATURES)
}

/// Detects the technology stack from the homepage headers and HTML.
///
/// `server` and `poweredBy` come straight from the headers; every `<meta>` tag
/// with a name and content lands in `meta`, and a `generator` tag also fills
/// `framework`. Signatures are then applied in table order.
///
/// # Arguments
/// * `headers` - Homepage response headers.
/// * `html` - Homepage body.
/// * `signatures` - Ordered signature table.
pub fn detect_tech_stack_with(headers: &HeaderMap, html: &str, signatures: &[Signature]) -> TechStack {
    let mut stack = TechStack {
        server: header_str(headers, "server").map(str::to_string),
        powered_by: header_str(headers, "x-powered-by").map(str::to_string),
        ..TechStack::default()
    };

    for tag in RE_META_TAG.find_iter(html) {
        let tag = tag.as_str();
        let (Some(name), Some(content)) = (RE_META_NAME.captures(tag), RE_META_CONTENT.captures(tag)) else {
            continue;
        };
        let name = name[1].to_lowercase();
        let content = content[1].to_string();
        if name == "generator" {
            stack.framework = Some(content.clone());
        }
        stack.meta.insert(name, content);
    }

    for signature in signatures {
        let matched = match &signature.check {
            Check::Body(re) => re.is_match(html),
            Check::Header(name, re) => header_str(headers, name).is_some_and(|value| re.is_match(value)),
        };
        if !matched {
            continue;
        }

        debug!(tech = signature.tech_name, slot = ?signature.slot, "Technology detected.");
        let name = signature.tech_name.to_string();
        match signature.slot {
            Slot::Cms => {
                stack.cms.get_or_insert(name);
            }
            Slot::Cdn => {
                stack.cdn.get_or_insert(name);
            }
            Slot::JsLibrary => stack.js_libraries.push(name),
            Slot::Analytics => stack.analytics.push(name),
            Slot::Other => stack.others.push(name),
        }
    }

    stack
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
