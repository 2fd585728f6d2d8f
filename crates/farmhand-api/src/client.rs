// Hand-crafted async HTTP client for the farm-management backend.
//
// Base path: /api/
// No authentication — the backend is a trusted local service.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    CountEntry, LivestockQuery, LivestockRecord, ResourcesSpentEntry, UpdateAction, VetRecordEntry,
};

// ── Request envelopes ────────────────────────────────────────────────

#[derive(Serialize)]
struct UpdateEnvelope<'a> {
    record: &'a LivestockRecord,
    action: UpdateAction,
}

#[derive(Serialize)]
struct DeleteRequest {
    #[serde(rename = "tagID")]
    tag_id: u32,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the farm-management backend REST API.
///
/// One method per boundary operation; all calls are plain JSON
/// request/response with no partial results. Mutation endpoints answer
/// a bare boolean — `false` surfaces as [`Error::Rejected`] so callers
/// always observe an explicit outcome.
pub struct FarmClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FarmClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a backend base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL, ensuring it ends with `/api/` exactly once.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }
        Ok(url)
    }

    /// Join a relative path (e.g. `"livestock/filter"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Decode a response: non-2xx becomes [`Error::Api`] with the body
    /// as the message, 2xx bodies must parse as `T`.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn api_error(status: StatusCode, body: &str) -> Error {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        } else {
            body.trim().to_owned()
        };
        Error::Api {
            message,
            status: status.as_u16(),
        }
    }

    /// Run a mutation endpoint that answers a bare boolean.
    async fn post_accepted<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        describe: impl FnOnce() -> String,
    ) -> Result<(), Error> {
        let accepted: bool = self.post(path, body).await?;
        if accepted {
            Ok(())
        } else {
            Err(Error::Rejected {
                message: describe(),
            })
        }
    }

    // ── Livestock reads ──────────────────────────────────────────────

    /// Fetch the whole livestock collection.
    pub async fn list_livestock(&self) -> Result<Vec<LivestockRecord>, Error> {
        self.get("livestock").await
    }

    /// Fetch the collection restricted by the given filter criteria.
    pub async fn list_filtered(
        &self,
        query: &LivestockQuery,
    ) -> Result<Vec<LivestockRecord>, Error> {
        self.post("livestock/filter", query).await
    }

    // ── Livestock mutations ──────────────────────────────────────────

    /// Insert a new record.
    pub async fn insert(&self, record: &LivestockRecord) -> Result<(), Error> {
        let tag = record.tag_id;
        self.post_accepted("livestock/insert", record, || {
            format!("insert refused for tag #{tag}")
        })
        .await
    }

    /// Apply a feed/harvest action to an existing record.
    pub async fn update(
        &self,
        record: &LivestockRecord,
        action: UpdateAction,
    ) -> Result<(), Error> {
        let tag = record.tag_id;
        let envelope = UpdateEnvelope { record, action };
        self.post_accepted("livestock/update", &envelope, || {
            format!("{} refused for tag #{tag}", action.as_str())
        })
        .await
    }

    /// Delete a record by tag.
    pub async fn delete(&self, tag_id: u32) -> Result<(), Error> {
        self.post_accepted("livestock/delete", &DeleteRequest { tag_id }, || {
            format!("delete refused for tag #{tag_id}")
        })
        .await
    }

    // ── Aggregates & reports ─────────────────────────────────────────

    /// Count records of a single animal type.
    pub async fn count_by_type(&self, animal_type: &str) -> Result<Vec<CountEntry>, Error> {
        self.get_with_params(
            "livestock/count",
            &[("animalType", animal_type.to_owned())],
        )
        .await
    }

    /// Cumulative resources spent on one record. `None` means the
    /// backend has no consumption rows for this tag — distinct from an
    /// error and from an empty collection.
    pub async fn resources_spent(&self, tag_id: u32) -> Result<Option<ResourcesSpentEntry>, Error> {
        let rows: Vec<ResourcesSpentEntry> =
            self.get(&format!("livestock/{tag_id}/resources")).await?;
        Ok(rows.into_iter().next())
    }

    /// Latest veterinary record for one tag, if any exists.
    pub async fn vet_records(&self, tag_id: u32) -> Result<Option<VetRecordEntry>, Error> {
        let rows: Vec<VetRecordEntry> =
            self.get(&format!("livestock/{tag_id}/vet-records")).await?;
        Ok(rows.into_iter().next())
    }
}
