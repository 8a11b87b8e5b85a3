//! Tag allocation and tag-reply parsing
//!
//! Each platform caps how many topic tags a post may carry. Allocation keeps
//! the full candidate list when it fits and otherwise draws a uniform random
//! sample without replacement; the count contract always holds exactly.

use rand::seq::SliceRandom;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dispatch::Platform;

lazy_static! {
    static ref BRACKETED: Regex = Regex::new(r"[\[【]([^\]】]*)[\]】]").expect("static pattern");
    static ref QUOTED: Regex =
        Regex::new(r#""([^"]+)"|'([^']+)'|「([^」]+)」|“([^”]+)”"#).expect("static pattern");
}

/// Pick the tag subset `platform` will accept
///
/// Within the limit the candidates pass through unchanged, in input order.
/// Over the limit the subset is a uniform sample; which tags survive may
/// differ between runs.
#[must_use]
pub fn allocate(candidates: &[String], platform: Platform) -> Vec<String> {
    let Some(limit) = platform.tag_limit() else {
        return candidates.to_vec();
    };
    if candidates.len() <= limit {
        return candidates.to_vec();
    }
    let mut rng = rand::thread_rng();
    candidates
        .choose_multiple(&mut rng, limit)
        .cloned()
        .collect()
}

/// Parse a generated tag reply tolerantly
///
/// Preference order: a bracketed list, then quoted items, then a plain
/// comma-separated line. Tags containing a hyphen are discarded; platform
/// form validators reject them.
#[must_use]
pub fn parse_tag_reply(reply: &str) -> Vec<String> {
    // A bracketed list wins outright, even when it turns out empty.
    if let Some(captures) = BRACKETED.captures(reply) {
        return keep_publishable(split_list(&captures[1]));
    }

    let from_quotes: Vec<String> = QUOTED
        .captures_iter(reply)
        .filter_map(|captures| {
            captures
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|group| group.as_str().trim().to_string())
        })
        .filter(|tag| !tag.is_empty())
        .collect();
    if !from_quotes.is_empty() {
        return keep_publishable(from_quotes);
    }

    keep_publishable(split_list(reply))
}

fn split_list(text: &str) -> Vec<String> {
    text.split([',', '，', '、', '\n'])
        .map(|piece| {
            piece
                .trim()
                .trim_matches(['"', '\'', '「', '」', '“', '”', '#', ' '])
                .to_string()
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn keep_publishable(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().filter(|tag| !tag.contains('-')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allocation_within_limit_preserves_order() {
        let tags = tag_list(&["rust", "cli", "自动化"]);
        let picked = allocate(&tags, Platform::Csdn);
        assert_eq!(picked, tags);
    }

    #[test]
    fn test_allocation_over_limit_samples_exactly_the_cap() {
        let tags: Vec<String> = (0..12).map(|i| format!("tag{i}")).collect();
        for _ in 0..20 {
            let picked = allocate(&tags, Platform::Zhihu);
            assert_eq!(picked.len(), 3);
            for tag in &picked {
                assert!(tags.contains(tag));
            }
        }
    }

    #[test]
    fn test_allocation_count_contract() {
        let tags: Vec<String> = (0..7).map(|i| format!("t{i}")).collect();
        for platform in Platform::ALL {
            let expected = platform
                .tag_limit()
                .map_or(tags.len(), |limit| limit.min(tags.len()));
            assert_eq!(allocate(&tags, platform).len(), expected);
        }
    }

    #[test]
    fn test_allocation_of_empty_candidates() {
        assert!(allocate(&[], Platform::Zhihu).is_empty());
        assert!(allocate(&[], Platform::Wechat).is_empty());
    }

    #[test]
    fn test_unbounded_platform_keeps_everything() {
        let tags: Vec<String> = (0..30).map(|i| format!("t{i}")).collect();
        assert_eq!(allocate(&tags, Platform::Wechat), tags);
    }

    #[test]
    fn test_parse_prefers_bracketed_list() {
        let reply = "这里是标签：[Rust, 命令行, 自动化] 希望有帮助";
        assert_eq!(parse_tag_reply(reply), tag_list(&["Rust", "命令行", "自动化"]));
    }

    #[test]
    fn test_parse_cjk_brackets_and_separators() {
        let reply = "【Rust、WebAssembly、性能优化】";
        assert_eq!(
            parse_tag_reply(reply),
            tag_list(&["Rust", "WebAssembly", "性能优化"])
        );
    }

    #[test]
    fn test_parse_quoted_fallback() {
        let reply = "推荐 \"Rust\" 和 「嵌入式」 以及 'CLI'";
        assert_eq!(parse_tag_reply(reply), tag_list(&["Rust", "嵌入式", "CLI"]));
    }

    #[test]
    fn test_parse_comma_fallback() {
        let reply = "Rust, 网络编程，异步";
        assert_eq!(
            parse_tag_reply(reply),
            tag_list(&["Rust", "网络编程", "异步"])
        );
    }

    #[test]
    fn test_parse_discards_hyphenated_tags() {
        let reply = "[rust-lang, tokio, async-await, 并发]";
        assert_eq!(parse_tag_reply(reply), tag_list(&["tokio", "并发"]));
    }

    #[test]
    fn test_parse_empty_reply() {
        assert!(parse_tag_reply("").is_empty());
        assert!(parse_tag_reply("[]").is_empty());
    }
}
