//! URL discovery in message bodies, plus URL-derived placeholder titles.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::transcript::Message;

// URL syntax: http/https then any run of non-whitespace, stopping at a
// closing bracket/parenthesis/quote so `(https://a.com)` yields the bare URL.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("URL regex is valid")
});

/// One URL occurrence in a message, before canonicalization. Duplicates
/// across (and within) messages are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUrlMention {
    pub url_original: String,
    pub date: String,
    pub shared_by: String,
}

/// All URL mentions in one message, in order of appearance.
pub fn mentions_in(message: &Message) -> Vec<RawUrlMention> {
    URL_PATTERN
        .find_iter(&message.text)
        .map(|m| RawUrlMention {
            url_original: m.as_str().to_string(),
            date: message.date.clone(),
            shared_by: message.sender.clone(),
        })
        .collect()
}

/// Generate a readable placeholder title from the URL alone. Enrichment
/// replaces it with the real page title when it succeeds.
pub fn seed_title(url: &str, domain: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return domain.to_string();
    };
    let path = parsed.path().trim_matches('/');

    if domain.contains("linkedin.com") {
        // `path` has its leading slash trimmed, so anchor markers at the
        // start as well as after a separator.
        if let Some(rest) = path_after(path, "in/") {
            let name = rest.split('/').next().unwrap_or(rest);
            return format!("LinkedIn - {}", title_case(name));
        }
        if path.split('/').any(|segment| segment == "posts" || segment == "feed") {
            return "LinkedIn - Post".to_string();
        }
        if let Some(rest) = path_after(path, "company/") {
            let company = rest.split('/').next().unwrap_or(rest);
            return format!("LinkedIn - {}", title_case(company));
        }
    }
    if domain.contains("youtube.com") || domain.contains("youtu.be") {
        return "YouTube - Vídeo".to_string();
    }
    if domain.contains("instagram.com") {
        return match path.split('/').next().filter(|u| !u.is_empty()) {
            Some(username) => format!("Instagram - @{username}"),
            None => "Instagram".to_string(),
        };
    }
    if domain.contains("twitter.com") || domain == "x.com" {
        return match path.split('/').next().filter(|u| !u.is_empty()) {
            Some(username) => format!("X/Twitter - @{username}"),
            None => "X/Twitter".to_string(),
        };
    }
    if domain.contains("docs.google.com") {
        if path.contains("document/") {
            return "Google Docs - Documento".to_string();
        }
        if path.contains("spreadsheets/") {
            return "Google Sheets - Planilha".to_string();
        }
        if path.contains("presentation/") {
            return "Google Slides - Apresentação".to_string();
        }
        return "Google Docs".to_string();
    }
    if domain.contains("open.spotify.com") {
        if path.contains("episode/") {
            return "Spotify - Podcast".to_string();
        }
        if path.contains("track/") {
            return "Spotify - Música".to_string();
        }
        if path.contains("playlist/") {
            return "Spotify - Playlist".to_string();
        }
        return "Spotify".to_string();
    }
    if domain.contains("github.com") {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() >= 2 {
            return format!("GitHub - {}/{}", parts[0], parts[1]);
        }
        return "GitHub".to_string();
    }
    if domain.contains("medium.com") {
        return "Medium - Artigo".to_string();
    }
    if domain.contains("amazon.com") {
        return "Amazon - Produto".to_string();
    }

    // Generic: domain stem plus a readable slug from the last path segment.
    let stem = title_case(domain.split('.').next().unwrap_or(domain));
    if let Some(segment) = path.split('/').next_back().filter(|s| !s.is_empty()) {
        let slug = segment
            .rsplit_once('.')
            .map_or(segment, |(base, _ext)| base)
            .replace(['-', '_'], " ");
        let slug_chars = slug.chars().count();
        if slug_chars > 5 && slug_chars < 80 {
            let short: String = slug.chars().take(60).collect();
            return format!("{stem} - {short}");
        }
    }
    stem
}

/// Text following `marker` when the marker opens the (slash-trimmed) path
/// or any later segment.
fn path_after<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    if let Some(rest) = path.strip_prefix(marker) {
        return Some(rest);
    }
    let mid = format!("/{marker}");
    path.split_once(&mid).map(|(_, rest)| rest)
}

fn title_case(s: &str) -> String {
    s.replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
