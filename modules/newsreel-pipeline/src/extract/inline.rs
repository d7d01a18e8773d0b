//! Inline platform-post extraction.
//!
//! Relay posts arrive with their payload attached, so there is nothing to
//! fetch: the record is synthesized from the message fields. Untitled post
//! text gets a headline cut from its first sentence.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use newsreel_common::{
    ContentLocator, ContentType, ExtractedContent, InlinePost, MediaRef, SourceProfile,
};

const MAX_TITLE_LEN: usize = 100;
const TITLE_FALLBACK_LEN: usize = 80;
/// Posts with less text than this carry no story worth relaying.
const MIN_TEXT_LEN: usize = 20;
const FALLBACK_AUTHOR: &str = "Telegram Channel";

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Build a record from an inline post, or None when the post has no usable
/// text.
pub fn extract_post(
    locator: &ContentLocator,
    profile: &SourceProfile,
    post: &InlinePost,
) -> Option<ExtractedContent> {
    let text = post
        .text
        .as_deref()
        .or(post.caption.as_deref())
        .map(str::trim)
        .unwrap_or("");
    if text.chars().count() < MIN_TEXT_LEN {
        debug!(%locator, message_id = post.message_id, "Post text too short");
        return None;
    }

    let mut record =
        ExtractedContent::empty(locator.clone(), profile.display_name, ContentType::PlatformPost);
    record.title = synthesize_title(text);
    record.body = text.to_string();
    record.description = text.chars().take(500).collect();
    record.author = Some(author_for(post));
    record.published = post.date;

    // Largest photo rendition only; platforms ship every thumbnail size.
    if let Some(photo) = post
        .photo
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
    {
        record
            .images
            .push(MediaRef::NativeHandle(photo.file_id.clone()));
    }
    if let Some(doc) = &post.document {
        match doc.mime_type.as_deref() {
            Some(mime) if mime.starts_with("image/") => record
                .images
                .push(MediaRef::NativeHandle(doc.file_id.clone())),
            Some(mime) if mime.starts_with("video/") => record
                .videos
                .push(MediaRef::NativeHandle(doc.file_id.clone())),
            _ => {}
        }
    }
    for file_id in [&post.video, &post.animation, &post.video_note]
        .into_iter()
        .flatten()
    {
        record.videos.push(MediaRef::NativeHandle(file_id.clone()));
    }

    Some(record)
}

/// First sentence if it is substantial, else a prefix of the text. Capped at
/// 100 characters with an ellipsis.
fn synthesize_title(text: &str) -> String {
    let first_sentence = SENTENCE_BREAK.split(text).next().unwrap_or(text).trim();

    let candidate = if first_sentence.chars().count() > 10 {
        first_sentence.to_string()
    } else {
        text.chars().take(TITLE_FALLBACK_LEN).collect::<String>()
    };

    if candidate.chars().count() > MAX_TITLE_LEN {
        let truncated: String = candidate.chars().take(MAX_TITLE_LEN - 3).collect();
        format!("{}...", truncated.trim_end())
    } else {
        candidate
    }
}

/// Forwarded-from identities outrank the local channel's own labels.
fn author_for(post: &InlinePost) -> String {
    post.forward_from_user
        .as_deref()
        .or(post.forward_from_channel.as_deref())
        .or(post.author_signature.as_deref())
        .or(post.chat_title.as_deref())
        .unwrap_or(FALLBACK_AUTHOR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::default_profiles;
    use newsreel_common::{DocumentAttachment, PhotoRendition};

    fn telegram_profile() -> SourceProfile {
        default_profiles()
            .into_iter()
            .find(|p| p.name == "telegram-post")
            .unwrap()
    }

    fn locator() -> ContentLocator {
        ContentLocator::new("telegram://post/42")
    }

    #[test]
    fn title_comes_from_the_first_sentence() {
        let post = InlinePost {
            message_id: 42,
            text: Some("Breaking news! City council approves budget. Details follow.".to_string()),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert_eq!(record.title, "Breaking news");
        assert!(record.body.contains("approves budget"));
        assert_eq!(record.content_type, ContentType::PlatformPost);
    }

    #[test]
    fn short_first_sentence_falls_back_to_a_prefix() {
        let text = "Wow. The council session ran long into the night before any vote happened at all.";
        let post = InlinePost {
            message_id: 1,
            text: Some(text.to_string()),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        // "Wow" is too short to headline; first 80 chars instead.
        assert_eq!(record.title, text.chars().take(80).collect::<String>());
    }

    #[test]
    fn long_titles_are_capped_with_an_ellipsis() {
        let text = format!("{} and then some more text. Second sentence.", "word ".repeat(30));
        let post = InlinePost {
            message_id: 1,
            text: Some(text),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert!(record.title.chars().count() <= 100);
        assert!(record.title.ends_with("..."));
    }

    #[test]
    fn caption_substitutes_for_missing_text() {
        let post = InlinePost {
            message_id: 1,
            caption: Some("A photo caption long enough to be worth relaying onward.".to_string()),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert!(record.title.starts_with("A photo caption"));
    }

    #[test]
    fn too_short_posts_yield_nothing() {
        let post = InlinePost {
            message_id: 1,
            text: Some("ok then".to_string()),
            ..InlinePost::default()
        };
        assert!(extract_post(&locator(), &telegram_profile(), &post).is_none());
    }

    #[test]
    fn only_the_largest_photo_rendition_is_kept() {
        let post = InlinePost {
            message_id: 1,
            text: Some("A post with an attached photo and enough text to pass.".to_string()),
            photo: vec![
                PhotoRendition { file_id: "small".into(), width: 90, height: 60 },
                PhotoRendition { file_id: "large".into(), width: 1280, height: 720 },
                PhotoRendition { file_id: "medium".into(), width: 320, height: 180 },
            ],
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert_eq!(record.images, vec![MediaRef::NativeHandle("large".into())]);
    }

    #[test]
    fn video_documents_land_in_videos() {
        let post = InlinePost {
            message_id: 1,
            text: Some("A post with an attached video document and enough text.".to_string()),
            document: Some(DocumentAttachment {
                file_id: "doc1".into(),
                mime_type: Some("video/mp4".into()),
            }),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert_eq!(record.videos, vec![MediaRef::NativeHandle("doc1".into())]);
        assert!(record.images.is_empty());
    }

    #[test]
    fn forwarded_user_outranks_channel_labels() {
        let post = InlinePost {
            message_id: 1,
            text: Some("Forwarded content with enough text to pass the gate.".to_string()),
            forward_from_user: Some("Original Author".to_string()),
            author_signature: Some("Editor".to_string()),
            chat_title: Some("Relay Channel".to_string()),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert_eq!(record.author.as_deref(), Some("Original Author"));
    }

    #[test]
    fn anonymous_posts_get_the_fallback_author() {
        let post = InlinePost {
            message_id: 1,
            text: Some("An unattributed post with enough text to pass the gate.".to_string()),
            ..InlinePost::default()
        };
        let record = extract_post(&locator(), &telegram_profile(), &post).unwrap();
        assert_eq!(record.author.as_deref(), Some(FALLBACK_AUTHOR));
    }
}
