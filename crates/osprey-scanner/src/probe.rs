use crate::error::{ProbeError, ProbeResult};
use http::header::HOST;
use http::{HeaderMap, Request};
use http_body_util::Empty;
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::crypto::aws_lc_rs::default_provider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::Url;

/// What one TLS GET against the target yields: the response headers
/// and the leaf certificate presented during the handshake.
#[derive(Debug)]
pub struct ProbeResponse {
    pub headers: HeaderMap,
    pub peer_cert: Option<Vec<u8>>,
}

/// Accepts any presented certificate so that self-signed or otherwise
/// untrusted chains are inspected rather than rejected. The scan
/// grades the certificate itself; verification would defeat that.
#[derive(Debug)]
struct AcceptAnyCert(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

/// Issue one GET over TLS to the audited host and capture the response
/// headers together with the peer certificate. The target is always
/// probed over TLS on port 443 unless the URL names another port.
pub async fn probe(url: &Url) -> ProbeResult<ProbeResponse> {
    let host = url
        .host_str()
        .ok_or_else(|| ProbeError::Http("URL has no host".to_string()))?;
    let port = url.port().unwrap_or(443);
    let path = url.path().to_string();

    tracing::debug!(host, port, "Connecting for security probe");
    let tcp = TcpStream::connect((host, port)).await?;

    let provider = Arc::new(default_provider());
    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| ProbeError::Tls(e.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert(provider)))
        .with_no_client_auth();

    let server_name =
        ServerName::try_from(host.to_string()).map_err(|e| ProbeError::Tls(e.to_string()))?;
    let connector = TlsConnector::from(Arc::new(config));
    let tls = connector
        .connect(server_name, tcp)
        .await
        .map_err(|e| ProbeError::Tls(e.to_string()))?;

    // Grab the leaf certificate before the stream is handed to hyper.
    let peer_cert = tls
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
        .map(|cert| cert.as_ref().to_vec());

    let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(tls))
        .await
        .map_err(|e| ProbeError::Http(e.to_string()))?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!(error = %e, "Probe connection closed with error");
        }
    });

    let request = Request::builder()
        .uri(path)
        .header(HOST, host)
        .body(Empty::<Bytes>::new())
        .map_err(|e| ProbeError::Http(e.to_string()))?;

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| ProbeError::Http(e.to_string()))?;
    tracing::debug!(status = %response.status(), "Probe response received");

    Ok(ProbeResponse {
        headers: response.headers().clone(),
        peer_cert,
    })
}
