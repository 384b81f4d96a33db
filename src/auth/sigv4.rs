//! AWS Signature Version 4 request signing.
//!
//! Implements the header-based variant: the caller supplies method, URL, the
//! headers that will be sent and the exact body bytes, and gets back the
//! `Authorization`, `X-Amz-Date` and optional `X-Amz-Security-Token` values.

use super::Credentials;
use crate::error::GatewayError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE: &str = "x-amz-date";
const AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Headers produced by a signing operation.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub security_token: Option<String>,
}

impl SignedHeaders {
    /// Insert the signature headers into `headers`.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<(), GatewayError> {
        headers.insert(
            reqwest::header::AUTHORIZATION,
            header_value(&self.authorization)?,
        );
        headers.insert(
            HeaderName::from_static(AMZ_DATE),
            header_value(&self.amz_date)?,
        );
        if let Some(token) = &self.security_token {
            headers.insert(
                HeaderName::from_static(AMZ_SECURITY_TOKEN),
                header_value(token)?,
            );
        }
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, GatewayError> {
    HeaderValue::from_str(value)
        .map_err(|_| GatewayError::TransportFailure("signature header is not valid ASCII".into()))
}

/// SigV4 signer scoped to one region and service.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    region: String,
    service: String,
}

impl SigV4Signer {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Sign a request at `now`.
    ///
    /// `headers` are the headers that will be sent; all of them are signed
    /// together with `host` and the `x-amz-*` headers added here.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &HeaderMap,
        body: &[u8],
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders, GatewayError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);

        let mut canonical_headers = canonical_header_map(url, headers)?;
        canonical_headers.insert(AMZ_DATE.to_string(), amz_date.clone());
        if let Some(token) = credentials.session_token() {
            canonical_headers.insert(AMZ_SECURITY_TOKEN.to_string(), token.to_string());
        }

        let canonical = canonical_request(method, url, &canonical_headers, body);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical.as_bytes())
        );

        let key = derive_signing_key(
            credentials.secret_access_key(),
            &date,
            &self.region,
            &self.service,
        )?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        let signed_header_names = signed_header_list(&canonical_headers);
        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_header_names}, Signature={signature}",
            credentials.access_key_id()
        );

        Ok(SignedHeaders {
            authorization,
            amz_date,
            security_token: credentials.session_token().map(str::to_string),
        })
    }
}

/// Lower-cased header names mapped to trimmed, whitespace-collapsed values.
fn canonical_header_map(
    url: &Url,
    headers: &HeaderMap,
) -> Result<BTreeMap<String, String>, GatewayError> {
    let mut map = BTreeMap::new();
    for (name, value) in headers {
        let value = value.to_str().map_err(|_| {
            GatewayError::TransportFailure(format!("header '{name}' is not valid ASCII"))
        })?;
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        map.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push(',');
                existing.push_str(&normalized);
            })
            .or_insert(normalized);
    }
    map.insert("host".to_string(), host_header(url)?);
    Ok(map)
}

fn host_header(url: &Url) -> Result<String, GatewayError> {
    let host = url
        .host_str()
        .ok_or_else(|| GatewayError::TransportFailure(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn signed_header_list(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

pub(crate) fn canonical_request(
    method: &str,
    url: &Url,
    headers: &BTreeMap<String, String>,
    body: &[u8],
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.to_ascii_uppercase(),
        canonical_uri(url),
        canonical_query(url),
        canonical_headers,
        signed_header_list(headers),
        sha256_hex(body)
    )
}

/// Path as sent on the wire, encoded once more (non-S3 services double-encode).
fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        "/".to_string()
    } else {
        uri_encode(path, false)
    }
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k, true), uri_encode(&v, true)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 encoding of everything outside the unreserved set.
pub(crate) fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| GatewayError::TransportFailure(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, GatewayError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}
