//! Outgoing header construction for downstream calls.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::metadata::{MetadataCodec, RequestMetadata};

/// Headers a downstream call made on behalf of `incoming` should carry.
///
/// Color, remaining budget, criticality and the mirror flag are carried
/// forward, the caller becomes this process, and `extensions` are added as
/// generic metadata.
pub fn propagate<'a, I>(
    codec: &MetadataCodec,
    incoming: &RequestMetadata,
    extensions: I,
) -> HeaderMap
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    let mut outgoing = incoming.to_outgoing();
    for (key, value) in extensions {
        outgoing = outgoing.with_extension(key, value);
    }

    let mut headers = HeaderMap::new();
    codec.encode(&mut headers, &outgoing);
    headers
}
