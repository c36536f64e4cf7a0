//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with methods for every server endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// POST /v1/tracks with a multipart file field.
    pub async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Response {
        let form = Form::new().part("file", Part::bytes(data).file_name(filename.to_string()));
        self.client
            .post(format!("{}/v1/tracks", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Upload request failed")
    }

    /// POST /v1/tracks with both a file and an owner field.
    pub async fn upload_file_with_owner(
        &self,
        filename: &str,
        data: Vec<u8>,
        owner: &str,
    ) -> Response {
        let form = Form::new()
            .part("file", Part::bytes(data).file_name(filename.to_string()))
            .text("owner", owner.to_string());
        self.client
            .post(format!("{}/v1/tracks", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Upload request failed")
    }

    /// POST /v1/tracks with no file field at all.
    pub async fn upload_without_file(&self) -> Response {
        let form = Form::new().text("owner", "nobody");
        self.client
            .post(format!("{}/v1/tracks", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Upload request failed")
    }

    /// GET /v1/tracks/{id}
    pub async fn get_track(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/v1/tracks/{}", self.base_url, id))
            .send()
            .await
            .expect("Get track request failed")
    }

    /// GET /v1/tracks/{id}/stream
    pub async fn stream_track(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/v1/tracks/{}/stream", self.base_url, id))
            .send()
            .await
            .expect("Stream request failed")
    }

    /// GET /v1/tracks/{id}/stream with a Range header.
    pub async fn stream_track_with_range(&self, id: &str, range: &str) -> Response {
        self.client
            .get(format!("{}/v1/tracks/{}/stream", self.base_url, id))
            .header("Range", range)
            .send()
            .await
            .expect("Stream request failed")
    }

    /// Polls GET /v1/tracks/{id} until the track leaves PROCESSING, then
    /// returns the track JSON.
    ///
    /// # Panics
    ///
    /// Panics if the track does not reach a terminal status in time.
    pub async fn wait_for_ingestion(&self, id: &str) -> serde_json::Value {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(INGESTION_TIMEOUT_MS);

        loop {
            let response = self.get_track(id).await;
            assert_eq!(response.status(), reqwest::StatusCode::OK);
            let track: serde_json::Value = response.json().await.expect("Invalid track JSON");

            if track["status"] != "PROCESSING" {
                return track;
            }
            if start.elapsed() > timeout {
                panic!(
                    "Track {} still PROCESSING after {}ms",
                    id, INGESTION_TIMEOUT_MS
                );
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}
