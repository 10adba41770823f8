//! Typed async client for the external prover.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/generate-proof` | [`ProverClient::generate_proof`] |
//! | POST | `/verify-proof` | [`ProverClient::verify_proof`] |

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ProverConfig;
use crate::error::ClientError;
use crate::payload::{ProofRequest, ProofResponse, VerifyRequest, VerifyResponse};

const GENERATE_PATH: &str = "generate-proof";
const VERIFY_PATH: &str = "verify-proof";

/// Client for the prover service.
#[derive(Debug, Clone)]
pub struct ProverClient {
    http: reqwest::Client,
    config: ProverConfig,
    depth: usize,
}

impl ProverClient {
    /// Build a client. `depth` is the tree depth the prover's circuit was
    /// compiled for; requests are validated against it before sending.
    pub fn new(config: ProverConfig, depth: usize) -> Result<Self, ClientError> {
        crate::payload::check_depth(depth)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            config,
            depth,
        })
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Ask the prover for a membership proof.
    ///
    /// Calls `POST {base_url}/generate-proof`.
    pub async fn generate_proof(&self, req: &ProofRequest) -> Result<ProofResponse, ClientError> {
        req.validate(self.depth)?;
        tracing::info!(
            leaf_index = req.merkle_leaf_index,
            root = %req.merkle_root,
            "requesting proof"
        );
        let resp: ProofResponse = self.post(GENERATE_PATH, req).await?;
        tracing::debug!(
            proof_len = resp.proof.len(),
            public_inputs = resp.public_inputs.len(),
            "proof received"
        );
        Ok(resp)
    }

    /// Ask the prover to verify a proof.
    ///
    /// Calls `POST {base_url}/verify-proof`.
    pub async fn verify_proof(&self, req: &VerifyRequest) -> Result<VerifyResponse, ClientError> {
        req.validate()?;
        let resp: VerifyResponse = self.post(VERIFY_PATH, req).await?;
        tracing::info!(valid = resp.valid, message = %resp.message, "verification result");
        Ok(resp)
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let endpoint = format!("POST /{path}");
        let url = self.config.endpoint(path)?;

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%endpoint, status, "prover returned an error");
            return Err(ClientError::Status {
                endpoint,
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| ClientError::Deserialization { endpoint, source: e })
    }
}
