//! TLS listener setup
//!
//! The SMTPS listener serves a self-signed certificate generated once at
//! process start and held only in memory. Clients that care about
//! certificate validity should not be pointed at this bridge.

use std::sync::Arc;

use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use rustls::ServerConfig;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Identity baked into the generated certificate
const CERT_ORGANIZATION: &str = "smtp2wwpm";
const CERT_COMMON_NAME: &str = "localhost";

/// Certificate validity: one hour of clock-skew slack in the past, ten years
/// out
const VALID_FOR_DAYS: i64 = 10 * 365;

/// Failures while generating the certificate or building the TLS config.
/// Fatal at startup.
#[derive(Error, Debug)]
pub enum TlsSetupError {
    #[error("certificate generation failed: {0}")]
    Certificate(#[from] rcgen::Error),

    #[error("TLS configuration rejected: {0}")]
    Config(#[from] rustls::Error),
}

/// Generate an in-memory self-signed certificate and build a server config
/// around it.
pub fn self_signed_config() -> Result<Arc<ServerConfig>, TlsSetupError> {
    let mut params = CertificateParams::new(vec![CERT_COMMON_NAME.to_string()])?;
    params.distinguished_name = DistinguishedName::new();
    params
        .distinguished_name
        .push(DnType::OrganizationName, CERT_ORGANIZATION);
    params
        .distinguished_name
        .push(DnType::CommonName, CERT_COMMON_NAME);
    params.not_before = OffsetDateTime::now_utc() - Duration::hours(1);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(VALID_FOR_DAYS);

    let key_pair = KeyPair::generate()?;
    let cert = params.self_signed(&key_pair)?;

    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert.der().clone()], key)?;

    Ok(Arc::new(config))
}
