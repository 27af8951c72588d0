//! Builders shared by domain unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use super::{
    Did, DidService, IdentityDocument, LikeRecord, LikeRecordValue, PostView, ProfileViewBasic,
    StrongRef,
};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid time")
}

pub(crate) fn did(raw: &str) -> Did {
    Did::new(raw).expect("valid did")
}

/// Like record created `seq` minutes after [`base_time`].
pub(crate) fn like_record(seq: i64, subject_uri: &str) -> LikeRecord {
    LikeRecord {
        uri: format!("at://did:plc:alice/app.bsky.feed.like/{seq}"),
        cid: format!("like-cid-{seq}"),
        value: LikeRecordValue {
            subject: StrongRef {
                uri: subject_uri.to_owned(),
                cid: format!("post-cid-{seq}"),
            },
            created_at: Some((base_time() + Duration::minutes(seq)).to_rfc3339()),
        },
    }
}

pub(crate) fn post_view(uri: &str) -> PostView {
    PostView {
        uri: uri.to_owned(),
        cid: format!("cid-of-{uri}"),
        author: ProfileViewBasic {
            did: "did:plc:author".to_owned(),
            handle: "author.test".to_owned(),
            display_name: None,
            avatar: None,
        },
        record: json!({ "$type": "app.bsky.feed.post", "text": uri }),
        embed: None,
        reply_count: 0,
        repost_count: 0,
        like_count: 1,
        quote_count: 0,
        indexed_at: base_time(),
    }
}

pub(crate) fn document_with_pds(endpoint: &str) -> IdentityDocument {
    IdentityDocument {
        id: "did:plc:alice".to_owned(),
        also_known_as: vec!["at://alice.test".to_owned()],
        services: vec![DidService {
            id: "#atproto_pds".to_owned(),
            service_type: "AtprotoPersonalDataServer".to_owned(),
            service_endpoint: json!(endpoint),
        }],
    }
}
