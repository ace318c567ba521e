use super::{ConfirmationSink, SignatureCollectionService};
use crate::domain::{AggregateSignatureState, RawMessage, SignatureRecord};
use crate::foundation::{Address, SignatureBytes, SigningError, WalletScopedHash};
use crate::infrastructure::config::{redact_url, CollectionConfig};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::Serialize;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Serialize)]
struct ProposeBody<'a> {
    message: &'a RawMessage,
    signature: &'a SignatureBytes,
}

#[derive(Serialize)]
struct ConfirmBody<'a> {
    signature: &'a SignatureBytes,
}

/// REST client for a signature collection service.
pub struct HttpCollectionService {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpCollectionService {
    pub fn new(config: &CollectionConfig) -> Result<Self, SigningError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| SigningError::ConfigError(format!("http client build failed: {err}")))?;
        info!("collection service client base_url={} auth={}", redact_url(&config.base_url), config.api_token.is_some());
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string(), api_token: config.api_token.clone() })
    }

    pub fn message_url(&self, hash: &WalletScopedHash) -> String {
        format!("{}/api/v1/messages/{}/", self.base_url, hash)
    }

    pub fn propose_url(&self, wallet: &Address) -> String {
        format!("{}/api/v1/safes/{}/messages/", self.base_url, wallet.to_checksum(None))
    }

    pub fn signatures_url(&self, hash: &WalletScopedHash) -> String {
        format!("{}/api/v1/messages/{}/signatures/", self.base_url, hash)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.api_token.as_deref() {
            Some(token) => req.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Proposes a new message with its first owner signature.
    pub async fn propose(&self, wallet: &Address, message: &RawMessage, signature: &SignatureBytes) -> Result<(), SigningError> {
        let req = self.client.post(self.propose_url(wallet)).json(&ProposeBody { message, signature });
        self.send_expect_success("propose_message", req).await?;
        Ok(())
    }

    /// Adds an owner signature to an already proposed message.
    pub async fn confirm(&self, hash: &WalletScopedHash, signature: &SignatureBytes) -> Result<(), SigningError> {
        let req = self.client.post(self.signatures_url(hash)).json(&ConfirmBody { signature });
        self.send_expect_success("add_confirmation", req).await?;
        Ok(())
    }

    async fn send(&self, operation: &str, req: RequestBuilder) -> Result<(StatusCode, String), SigningError> {
        let resp = self.authorize(req).send().await.map_err(|err| SigningError::service_error(operation, None, err))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|err| SigningError::service_error(operation, Some(status.as_u16()), err))?;
        Ok((status, body))
    }

    async fn send_expect_success(&self, operation: &str, req: RequestBuilder) -> Result<String, SigningError> {
        let (status, body) = self.send(operation, req).await?;
        if !status.is_success() {
            return Err(SigningError::service_error(operation, Some(status.as_u16()), truncate(&body)));
        }
        Ok(body)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Parses a message record body. Malformed JSON or a record for another hash is an invalid response.
pub fn parse_message_record(hash: &WalletScopedHash, body: &str) -> Result<AggregateSignatureState, SigningError> {
    let state: AggregateSignatureState =
        serde_json::from_str(body).map_err(|err| SigningError::invalid_response(hash, format!("malformed record json: {err}")))?;
    if !state.hash.ct_eq(hash) {
        return Err(SigningError::invalid_response(hash, format!("record is for a different hash {}", state.hash)));
    }
    Ok(state)
}

#[async_trait]
impl SignatureCollectionService for HttpCollectionService {
    async fn get_message(&self, hash: &WalletScopedHash) -> Result<Option<AggregateSignatureState>, SigningError> {
        let (status, body) = self.send("get_message", self.client.get(self.message_url(hash))).await?;
        if status == StatusCode::NOT_FOUND {
            debug!("message record not found wallet_scoped_hash={}", hash);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SigningError::service_error("get_message", Some(status.as_u16()), truncate(&body)));
        }
        parse_message_record(hash, &body).map(Some)
    }
}

#[async_trait]
impl ConfirmationSink for HttpCollectionService {
    async fn submit_signature(
        &self,
        wallet: &Address,
        hash: &WalletScopedHash,
        message: &RawMessage,
        record: SignatureRecord,
    ) -> Result<(), SigningError> {
        match self.get_message(hash).await? {
            None => {
                info!("proposing message wallet={} wallet_scoped_hash={} owner={}", wallet, hash, record.owner);
                self.propose(wallet, message, &record.signature).await
            }
            Some(state) if state.has_owner(&record.owner) => {
                debug!("owner already confirmed wallet_scoped_hash={} owner={}", hash, record.owner);
                Ok(())
            }
            Some(_) => {
                info!("adding confirmation wallet_scoped_hash={} owner={}", hash, record.owner);
                self.confirm(hash, &record.signature).await
            }
        }
    }
}
