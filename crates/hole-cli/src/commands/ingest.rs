use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use hole_core::entry::{AnyEntry, Candidate};
use hole_core::enums::EntityType;
use hole_core::errors::CoreError;
use hole_core::raw::{RawHolePage, RawReplyPage};
use hole_core::responses::ErrorResponse;
use hole_store::{SnapshotStore, StoreError};
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ApiPage, IngestArgs};
use crate::context::AppContext;
use crate::output::{output, store_error_response};

#[derive(Debug, Serialize)]
struct IngestResponse {
    ingested: Vec<AnyEntry>,
    rejected: Vec<Rejection>,
}

#[derive(Debug, Serialize)]
struct Rejection {
    /// Position of the candidate in the input.
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    error: ErrorResponse,
}

/// An input item that did not decode into a candidate.
#[derive(Debug)]
struct Undecodable {
    entity: Option<EntityType>,
    id: Option<u64>,
    error: CoreError,
}

/// Decoded input file.
#[derive(Debug)]
struct Batch {
    items: Vec<Result<Candidate, Undecodable>>,
    /// Serving time of an API page, when the page reports one.
    observed_at: Option<DateTime<Utc>>,
}

/// Handle `holes ingest`.
///
/// Candidates are ingested in file order. A rejected candidate is reported
/// and does not stop the rest of the batch.
pub fn handle(args: &IngestArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let batch = read_batch(&args.file, args.api)?;
    tracing::debug!("ingesting {} candidates from {}", batch.items.len(), args.file.display());

    let response = ingest_batch(&ctx.store, batch);
    if !response.rejected.is_empty() {
        tracing::warn!(
            "{} of {} candidates rejected",
            response.rejected.len(),
            response.rejected.len() + response.ingested.len()
        );
    }
    output(&response, flags.format)
}

/// Ingest every decoded item. The whole batch shares one observation time.
fn ingest_batch(store: &SnapshotStore, batch: Batch) -> IngestResponse {
    let observed_at = batch.observed_at.unwrap_or_else(Utc::now);
    let mut response = IngestResponse {
        ingested: Vec::with_capacity(batch.items.len()),
        rejected: Vec::new(),
    };

    for (index, item) in batch.items.into_iter().enumerate() {
        let candidate = match item {
            Ok(candidate) => candidate,
            Err(undecodable) => {
                response.rejected.push(Rejection {
                    index,
                    entity: undecodable.entity,
                    id: undecodable.id,
                    error: store_error_response(&StoreError::from(undecodable.error)),
                });
                continue;
            }
        };

        let (entity, id) = identify(&candidate);
        match store.ingest_observed(candidate, observed_at) {
            Ok(entry) => response.ingested.push(entry),
            Err(error) => response.rejected.push(Rejection {
                index,
                entity: Some(entity),
                id: Some(id),
                error: store_error_response(&error),
            }),
        }
    }
    response
}

fn read_batch(path: &Path, api: Option<ApiPage>) -> anyhow::Result<Batch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_batch(&content, api).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse model JSON (one candidate or an array) or a raw API page.
///
/// Model JSON is decoded item by item, so one malformed candidate does not
/// hide the others. An API page is accepted or refused as a whole.
fn parse_batch(content: &str, api: Option<ApiPage>) -> anyhow::Result<Batch> {
    let batch = match api {
        None => {
            let items = match serde_json::from_str::<Value>(content)? {
                Value::Array(items) => items.into_iter().map(decode).collect(),
                single => vec![decode(single)],
            };
            Batch {
                items,
                observed_at: None,
            }
        }
        Some(ApiPage::Hole) => {
            let page = serde_json::from_str::<RawHolePage>(content)?;
            let observed_at = page.observed_at();
            Batch {
                items: page
                    .into_holes()?
                    .into_iter()
                    .map(|hole| Ok(Candidate::from(hole)))
                    .collect(),
                observed_at,
            }
        }
        Some(ApiPage::Reply) => Batch {
            items: serde_json::from_str::<RawReplyPage>(content)?
                .into_replies()?
                .into_iter()
                .map(|reply| Ok(Candidate::from(reply)))
                .collect(),
            observed_at: None,
        },
    };
    Ok(batch)
}

fn decode(value: Value) -> Result<Candidate, Undecodable> {
    let entity = Candidate::entity_type_of(&value);
    let id = value.get("id").and_then(Value::as_u64);
    Candidate::from_value(value).map_err(|error| Undecodable { entity, id, error })
}

fn identify(candidate: &Candidate) -> (EntityType, u64) {
    match candidate {
        Candidate::Hole(hole) => (EntityType::Hole, hole.id.into()),
        Candidate::Reply(reply) => (EntityType::Reply, reply.id.into()),
    }
}
