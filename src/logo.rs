//! Contestant logo lookup
//!
//! Resolution is synchronous and offline: a table of well-known brands,
//! matched exactly then partially. Unknown names get no image and fall back
//! to the colored letter avatar.

const CLEARBIT: &str = "https://logo.clearbit.com/";

/// Normalized brand name -> logo domain
const KNOWN_BRANDS: &[(&str, &str)] = &[
    // Restaurants
    ("mcdonalds", "mcdonalds.com"),
    ("burger king", "bk.com"),
    ("starbucks", "starbucks.com"),
    ("subway", "subway.com"),
    ("kfc", "kfc.com"),
    ("pizza hut", "pizzahut.com"),
    ("dominos", "dominos.com"),
    ("taco bell", "tacobell.com"),
    ("chipotle", "chipotle.com"),
    ("wendys", "wendys.com"),
    ("chick-fil-a", "chick-fil-a.com"),
    ("dunkin", "dunkindonuts.com"),
    ("papa johns", "papajohns.com"),
    ("olive garden", "olivegarden.com"),
    ("red lobster", "redlobster.com"),
    ("outback", "outback.com"),
    ("applebees", "applebees.com"),
    ("buffalo wild wings", "buffalowildwings.com"),
    ("cheesecake factory", "thecheesecakefactory.com"),
    ("panera", "panerabread.com"),
    // Tech
    ("apple", "apple.com"),
    ("google", "google.com"),
    ("microsoft", "microsoft.com"),
    ("amazon", "amazon.com"),
    ("facebook", "facebook.com"),
    ("meta", "meta.com"),
    ("netflix", "netflix.com"),
    ("twitter", "twitter.com"),
    ("x", "x.com"),
    ("tesla", "tesla.com"),
    ("spotify", "spotify.com"),
    ("uber", "uber.com"),
    ("airbnb", "airbnb.com"),
    ("slack", "slack.com"),
    ("zoom", "zoom.us"),
    ("discord", "discord.com"),
    ("reddit", "reddit.com"),
    ("linkedin", "linkedin.com"),
    ("instagram", "instagram.com"),
    ("tiktok", "tiktok.com"),
    ("youtube", "youtube.com"),
    // Stores
    ("walmart", "walmart.com"),
    ("target", "target.com"),
    ("costco", "costco.com"),
    ("ikea", "ikea.com"),
    ("best buy", "bestbuy.com"),
    ("home depot", "homedepot.com"),
    ("lowes", "lowes.com"),
];

/// Names and brands shorter than this only match exactly
const MIN_PARTIAL_LEN: usize = 3;

/// Lowercase, trim, drop apostrophes ("McDonald's" -> "mcdonalds")
pub fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect()
}

fn logo_url(domain: &str) -> String {
    format!("{}{}", CLEARBIT, domain)
}

/// Logo for a well-known brand, exact match first, then substring either way
pub fn known_logo(name: &str) -> Option<String> {
    let name = normalize(name);
    if name.is_empty() {
        return None;
    }

    if let Some((_, domain)) = KNOWN_BRANDS.iter().find(|(brand, _)| *brand == name) {
        return Some(logo_url(domain));
    }

    if name.len() < MIN_PARTIAL_LEN {
        return None;
    }
    KNOWN_BRANDS
        .iter()
        .filter(|(brand, _)| brand.len() >= MIN_PARTIAL_LEN)
        .find(|(brand, _)| name.contains(brand) || brand.contains(name.as_str()))
        .map(|(_, domain)| logo_url(domain))
}

/// Best image for a contestant: a valid custom URL wins, then a known brand
pub fn resolve_image(name: &str, custom_url: Option<&str>) -> Option<String> {
    if let Some(url) = custom_url.map(str::trim).filter(|u| is_image_url(u)) {
        return Some(url.to_string());
    }
    let logo = known_logo(name);
    if logo.is_none() {
        log::debug!("No logo for {}", name);
    }
    logo
}

/// Cheap syntactic check; the browser decides whether it actually loads
pub fn is_image_url(url: &str) -> bool {
    (url.starts_with("https://") || url.starts_with("http://") || url.starts_with("data:image/"))
        && !url.contains(char::is_whitespace)
}

/// Generated avatar URL (DiceBear), e.g. style "pixel-art" or "identicon"
pub fn placeholder_logo(name: &str, style: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/{}/svg?seed={}&backgroundColor=transparent",
        style,
        encode_component(name)
    )
}

/// Percent-encode everything outside the URI unreserved set
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(
            known_logo("Burger King").as_deref(),
            Some("https://logo.clearbit.com/bk.com")
        );
        assert_eq!(
            known_logo("  McDonald's ").as_deref(),
            Some("https://logo.clearbit.com/mcdonalds.com")
        );
        assert_eq!(known_logo("X").as_deref(), Some("https://logo.clearbit.com/x.com"));
    }

    #[test]
    fn test_partial_match() {
        assert_eq!(
            known_logo("Outback Steakhouse").as_deref(),
            Some("https://logo.clearbit.com/outback.com")
        );
        assert_eq!(
            known_logo("Panera Bread").as_deref(),
            Some("https://logo.clearbit.com/panerabread.com")
        );
    }

    #[test]
    fn test_short_names_do_not_partially_match() {
        // "x" must not match every name containing an x
        assert_eq!(known_logo("Texas Roadhouse"), None);
        assert_eq!(known_logo("ap"), None);
        assert_eq!(known_logo(""), None);
    }

    #[test]
    fn test_resolve_image_prefers_custom_url() {
        let custom = "https://example.com/logo.png";
        assert_eq!(resolve_image("Starbucks", Some(custom)).as_deref(), Some(custom));
        assert_eq!(
            resolve_image("Starbucks", Some("not a url")).as_deref(),
            Some("https://logo.clearbit.com/starbucks.com")
        );
        assert_eq!(resolve_image("Zelda", None), None);
    }

    #[test]
    fn test_placeholder_logo_encodes_name() {
        let url = placeholder_logo("Tim Hortons & Co", "pixel-art");
        assert_eq!(
            url,
            "https://api.dicebear.com/7.x/pixel-art/svg?seed=Tim%20Hortons%20%26%20Co&backgroundColor=transparent"
        );
    }
}
