//! Static source profile registry.
//!
//! One data record per source: matchers, selector orderings, media
//! allowlist, thresholds and branding. Adding a source means adding a
//! profile here, not a new engine type.

use newsreel_common::{SelectorSet, SourceCategory, SourceProfile};

/// All registered source profiles, in dispatch registration order.
pub fn default_profiles() -> Vec<SourceProfile> {
    vec![
        politico(),
        abc_news(),
        nbc_news(),
        washington_post(),
        wall_street_journal(),
        financial_times(),
        x_posts(),
        telegram_posts(),
    ]
}

fn politico() -> SourceProfile {
    SourceProfile {
        name: "politico",
        display_name: "POLITICO",
        category: SourceCategory::Publication,
        domains: vec!["politico.com", "politico.eu"],
        schemes: vec![],
        excluded_patterns: vec![],
        entry_params: vec![],
        primary: SelectorSet {
            title: vec!["h1[data-testid=\"headline\"]", "h1.headline", "h1"],
            description: vec!["p.dek", "meta[name=\"description\"]"],
            body: vec!["div.story-text p", "article p"],
            image: vec!["figure img", "article img"],
        },
        secondary: SelectorSet {
            title: vec!["header h1", ".article-title"],
            description: vec![".summary", "meta[property=\"og:description\"]"],
            body: vec![".article-body p", "main p"],
            image: vec!["main img"],
        },
        media_allowlist: vec!["politico.com", "politicopro.com"],
        min_body_len: 100,
        media_optional: false,
        logo: Some("politico"),
    }
}

fn abc_news() -> SourceProfile {
    SourceProfile {
        name: "abcnews",
        display_name: "ABC News",
        category: SourceCategory::Publication,
        domains: vec!["abcnews.go.com", "abcnews.com"],
        schemes: vec![],
        // Live-updates aggregations have no stable, extractable content —
        // unless the URL pins one specific entry.
        excluded_patterns: vec!["/live-updates/"],
        entry_params: vec!["entryid"],
        primary: SelectorSet {
            title: vec!["h1[data-testid=\"prism-headline\"]", "h1"],
            description: vec!["meta[name=\"description\"]"],
            body: vec!["div[data-testid=\"prism-article-body\"] p", "article p"],
            image: vec!["picture img", "article img"],
        },
        secondary: SelectorSet {
            title: vec![".Article__Headline", "header h1"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec![".Article__Content p", "main p"],
            image: vec!["main img"],
        },
        media_allowlist: vec!["abcnews.go.com", "s.abcnews.com", "i.abcnewsfe.com"],
        min_body_len: 100,
        media_optional: false,
        logo: Some("abcnews"),
    }
}

fn nbc_news() -> SourceProfile {
    SourceProfile {
        name: "nbcnews",
        display_name: "NBC News",
        category: SourceCategory::Publication,
        domains: vec!["nbcnews.com"],
        schemes: vec![],
        excluded_patterns: vec!["/live-blog/"],
        entry_params: vec!["rcid"],
        primary: SelectorSet {
            title: vec!["h1.article-hero-headline__htag", "h1"],
            description: vec!["div.article-dek", "meta[name=\"description\"]"],
            body: vec!["div.article-body__content p", "article p"],
            image: vec!["picture img", "figure img"],
        },
        secondary: SelectorSet {
            title: vec!["header h1"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec!["main p"],
            image: vec!["main img"],
        },
        media_allowlist: vec!["media-cldnry.s-nbcnews.com", "nbcnews.com"],
        min_body_len: 100,
        media_optional: false,
        logo: Some("nbcnews"),
    }
}

fn washington_post() -> SourceProfile {
    SourceProfile {
        name: "washingtonpost",
        display_name: "The Washington Post",
        category: SourceCategory::Publication,
        domains: vec!["washingtonpost.com"],
        schemes: vec![],
        excluded_patterns: vec![],
        entry_params: vec![],
        primary: SelectorSet {
            title: vec!["h1[data-qa=\"headline\"]", "h1"],
            description: vec!["meta[name=\"description\"]"],
            body: vec!["div.article-body p", "article p"],
            image: vec!["figure img"],
        },
        secondary: SelectorSet {
            title: vec!["header h1"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec!["main p", ".teaser-content p"],
            image: vec!["main img"],
        },
        media_allowlist: vec![
            "washingtonpost.com",
            "arc-anglerfish-washpost-prod-washpost.s3.amazonaws.com",
        ],
        // Paywall-tolerant: only a teaser is obtainable without access.
        min_body_len: 50,
        media_optional: false,
        logo: Some("washingtonpost"),
    }
}

fn wall_street_journal() -> SourceProfile {
    SourceProfile {
        name: "wsj",
        display_name: "The Wall Street Journal",
        category: SourceCategory::Publication,
        domains: vec!["wsj.com"],
        schemes: vec![],
        excluded_patterns: vec!["/livecoverage/"],
        entry_params: vec![],
        primary: SelectorSet {
            title: vec!["h1.wsj-article-headline", "h1"],
            description: vec!["h2.sub-head", "meta[name=\"description\"]"],
            body: vec!["section.article-body p", "article p"],
            image: vec!["figure img"],
        },
        secondary: SelectorSet {
            title: vec!["header h1"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec!["main p", ".paywall p"],
            image: vec!["main img"],
        },
        media_allowlist: vec!["images.wsj.net", "wsj.net"],
        min_body_len: 50,
        media_optional: false,
        logo: Some("wsj"),
    }
}

fn financial_times() -> SourceProfile {
    SourceProfile {
        name: "financialtimes",
        display_name: "Financial Times",
        category: SourceCategory::Publication,
        domains: vec!["ft.com"],
        schemes: vec![],
        excluded_patterns: vec![],
        entry_params: vec![],
        primary: SelectorSet {
            title: vec!["h1.o-topper__headline", "h1"],
            description: vec!["div.o-topper__standfirst", "meta[name=\"description\"]"],
            body: vec!["div.article__content-body p", "article p"],
            image: vec!["figure img"],
        },
        secondary: SelectorSet {
            title: vec!["header h1"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec!["main p"],
            image: vec!["main img"],
        },
        media_allowlist: vec!["ft.com", "ftimg.net", "im.ft-static.com"],
        min_body_len: 50,
        media_optional: false,
        logo: Some("ft"),
    }
}

fn x_posts() -> SourceProfile {
    SourceProfile {
        name: "x",
        display_name: "X",
        category: SourceCategory::PersonalPost,
        domains: vec!["twitter.com", "x.com"],
        schemes: vec![],
        excluded_patterns: vec![],
        entry_params: vec![],
        primary: SelectorSet {
            title: vec!["div[data-testid=\"tweetText\"]"],
            description: vec!["meta[property=\"og:description\"]"],
            body: vec!["div[data-testid=\"tweetText\"]"],
            image: vec!["div[data-testid=\"tweetPhoto\"] img"],
        },
        secondary: SelectorSet {
            title: vec!["meta[property=\"og:title\"]"],
            description: vec!["meta[name=\"description\"]"],
            body: vec!["article div[lang]"],
            image: vec!["article img"],
        },
        media_allowlist: vec!["pbs.twimg.com", "video.twimg.com"],
        min_body_len: 20,
        media_optional: true,
        logo: None,
    }
}

fn telegram_posts() -> SourceProfile {
    SourceProfile {
        name: "telegram-post",
        display_name: "Telegram Post",
        category: SourceCategory::PlatformRelay,
        domains: vec![],
        schemes: vec!["telegram://post", "tg://post"],
        excluded_patterns: vec![],
        entry_params: vec![],
        primary: SelectorSet::empty(),
        secondary: SelectorSet::empty(),
        media_allowlist: vec![],
        min_body_len: 20,
        media_optional: true,
        logo: Some("telegram"),
    }
}
