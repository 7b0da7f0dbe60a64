//! HTTP client utilities for testing.
//!
//! Helper functions for making HTTP requests to a hazmap server during
//! tests.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a default test client
pub fn create_test_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to build test HTTP client")
}

/// Make a GET request to the hazmap server
pub async fn get(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    let url = format!("http://{}{}", addr, path);
    Ok(client.get(url).send().await?)
}

/// Make a GET request and parse the JSON response
pub async fn get_json<T: DeserializeOwned>(
    addr: &SocketAddr,
    path: &str,
) -> Result<T, Box<dyn Error>> {
    let response = get(addr, path).await?;

    if response.status() != StatusCode::OK {
        return Err(format!(
            "Unexpected status code: {}, body: {:?}",
            response.status(),
            response.text().await
        )
        .into());
    }

    Ok(response.json::<T>().await?)
}

/// Download raw bytes (e.g. a PNG image) from the hazmap server
pub async fn get_bytes(addr: &SocketAddr, path: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let response = get(addr, path).await?;

    if response.status() != StatusCode::OK {
        return Err(format!(
            "Unexpected status code: {}, body: {:?}",
            response.status(),
            response.text().await
        )
        .into());
    }

    Ok(response.bytes().await?.to_vec())
}
