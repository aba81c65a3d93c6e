use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use super::cert::parse_certificate;
use super::inspect::{HandshakeClass, connect_any, handshake_error_class};
use super::types::{CertificateInfo, ExpiryStatus};
use super::{TlsError, TlsInspectOptions, inspect_certificate_with_options};

fn info_with_window(
    not_before: chrono::DateTime<Utc>,
    not_after: chrono::DateTime<Utc>,
) -> CertificateInfo {
    CertificateInfo {
        subject: Some("example.com".to_string()),
        issuer: Some("Example CA".to_string()),
        version: 3,
        serial: "01".to_string(),
        not_before,
        not_after,
        subject_alt_names: vec![],
        ocsp_uri: None,
        ca_issuer_uri: None,
    }
}

#[test]
fn expiry_days_are_whole_day_truncated() {
    let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
    let not_after = Utc.with_ymd_and_hms(2026, 8, 31, 0, 0, 0).unwrap();
    let info = info_with_window(now - chrono::Duration::days(30), not_after);

    // 36 hours remaining truncates to one day
    assert_eq!(info.expiry_status_at(now), ExpiryStatus::Valid { days: 1 });
}

#[test]
fn expiry_at_the_exact_boundary_is_still_valid() {
    let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
    let info = info_with_window(now - chrono::Duration::days(30), now);

    let status = info.expiry_status_at(now);
    assert_eq!(status, ExpiryStatus::Valid { days: 0 });
    assert!(!status.is_expired());
}

#[test]
fn past_not_after_reports_days_since_expiry() {
    let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
    let not_after = now - chrono::Duration::hours(50);
    let info = info_with_window(now - chrono::Duration::days(400), not_after);

    let status = info.expiry_status_at(now);
    assert_eq!(status, ExpiryStatus::Expired { days: 2 });
    assert!(status.is_expired());
}

#[derive(Debug)]
struct ChainError {
    message: String,
    source: Option<Box<dyn StdError + 'static>>,
}

impl ChainError {
    fn leaf(message: &str) -> Self {
        Self {
            message: message.to_string(),
            source: None,
        }
    }

    fn wrapping(message: &str, source: impl StdError + 'static) -> Self {
        Self {
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ChainError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref()
    }
}

#[test]
fn protocol_version_markers_classify_as_unsupported() {
    for message in [
        "unsupported protocol version negotiated",
        "SSL routines: tls_early_post_process_client_hello: Unsupported Protocol",
        "peer reported: protocol version alert",
        "handshake failure: version too low",
        "ssl3_get_record: wrong version number",
    ] {
        let err = ChainError::wrapping("handshake failed", ChainError::leaf(message));
        assert_eq!(
            handshake_error_class(&err),
            HandshakeClass::UnsupportedProtocol,
            "marker not recognized in {message:?}"
        );
    }
}

#[test]
fn io_timeout_in_the_chain_classifies_as_timeout() {
    let io_err = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
    let err = ChainError::wrapping("handshake failed", io_err);
    assert_eq!(handshake_error_class(&err), HandshakeClass::Timeout);
}

#[test]
fn unrelated_handshake_errors_stay_unclassified() {
    let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer");
    let err = ChainError::wrapping("certificate verify failed", io_err);
    assert_eq!(handshake_error_class(&err), HandshakeClass::Other);
}

const TEST_CERT_PEM: &[u8] = b"-----BEGIN CERTIFICATE-----
MIID9jCCAt6gAwIBAgIUF9Lz3qcPQ19Ug7AFOj3XQtFLnOowDQYJKoZIhvcNAQEL
BQAwNDEcMBoGA1UEAwwTdGxzLmRuc3Rvb2xib3gudGVzdDEUMBIGA1UECgwLRE5T
IFRvb2xib3gwHhcNMjYwODI5MTMyMTEzWhcNMzYwODI2MTMyMTEzWjA0MRwwGgYD
VQQDDBN0bHMuZG5zdG9vbGJveC50ZXN0MRQwEgYDVQQKDAtETlMgVG9vbGJveDCC
ASIwDQYJKoZIhvcNAQEBBQADggEPADCCAQoCggEBALFaGQ0kDScLIPBNSyvjVAXK
4iVBl3yZ4Sm7AOtZeCfpX0SNRFGrqD7sxT27dZPijRrUXSDlr/n7/6V8PZTgatKK
pVfssR+6fb822IsXTJc7I7dXQjfgiYq/T4FlJh2PcSHI6l8+O7+7TM2voVUMuF1o
kEoOaPaYM7JcoTcLjxX0RgqxK2uwqFNWrRfhY69V0sHKGz+gT7DSBq5Msqx8bXHd
aQqsJePSuuI7nUyLLjnlTxGkE1QlWJKme1Q1XgpknNXHpAKUH8FKbhIoLaJRHDoj
uV3Ewm9G3aDui0UfIk4i2w3xKYur7ATit2z+iXGa8T3Z7NKOWWjZlUPNY+56NFMC
AwEAAaOB/zCB/DAdBgNVHQ4EFgQUZtwV+g3qENnBuHbqZuKz7D4/et8wHwYDVR0j
BBgwFoAUZtwV+g3qENnBuHbqZuKz7D4/et8wDwYDVR0TAQH/BAUwAwEB/zA5BgNV
HREEMjAwghN0bHMuZG5zdG9vbGJveC50ZXN0ghNhbHQuZG5zdG9vbGJveC50ZXN0
hwTAAAIKMG4GCCsGAQUFBwEBBGIwYDAuBggrBgEFBQcwAYYiaHR0cDovL29jc3Au
ZG5zdG9vbGJveC50ZXN0L3N0YXR1czAuBggrBgEFBQcwAoYiaHR0cDovL2NhLmRu
c3Rvb2xib3gudGVzdC9yb290LmNydDANBgkqhkiG9w0BAQsFAAOCAQEArMYNo7Fl
JiCyBQ6eprn/l0WD/LktPZCAfCCr329b2a01n70WMpnzO4GC+OKyCcb/Z2XtgxiO
2JGnNcJRjgL7J1JecGDv3QRfLbwhYSfX6Csnpy4gwLk55XYApLm/t+Z5CmWEHEZb
pV0mWTGfeDtY/N2unjNZD1WicXRFDnJeB10oeW1/dW7yi78cLgLXhSfXGdSknyvG
3nQh2OuB08w+1SFagcls2Ks033lQ+74wKVaGkc48od8YSrKWDLSltEwhRiRgYP8J
Fw56P+n4aFBXFNUaczE8yRRIgJJIzVSeIT5SMgLDt5o0Sf1XaHizGbBcs7mKnNJ4
vtyxjaZKlUAvKA==
-----END CERTIFICATE-----
";

#[test]
fn parse_certificate_extracts_report_fields() {
    let (_, pem) = x509_parser::pem::parse_x509_pem(TEST_CERT_PEM).unwrap();
    let info = parse_certificate(&pem.contents).unwrap();

    assert_eq!(info.subject.as_deref(), Some("tls.dnstoolbox.test"));
    assert_eq!(info.issuer.as_deref(), Some("tls.dnstoolbox.test"));
    assert_eq!(info.version, 3);
    assert!(info.serial.starts_with("17:D2:F3"));
    assert_eq!(info.not_before.date_naive().to_string(), "2026-08-29");
    assert_eq!(info.not_after.date_naive().to_string(), "2036-08-26");

    // the IP-address SAN entry is excluded, only DNS names survive
    assert_eq!(
        info.subject_alt_names,
        vec![
            "tls.dnstoolbox.test".to_string(),
            "alt.dnstoolbox.test".to_string()
        ]
    );

    assert_eq!(
        info.ocsp_uri.as_deref(),
        Some("http://ocsp.dnstoolbox.test/status")
    );
    assert_eq!(
        info.ca_issuer_uri.as_deref(),
        Some("http://ca.dnstoolbox.test/root.crt")
    );
}

#[test]
fn parse_certificate_rejects_garbage() {
    assert!(parse_certificate(&[0x30, 0x03, 0x02, 0x01, 0x01]).is_err());
}

#[test]
fn silent_server_times_out_instead_of_hanging() {
    // accept the TCP connection at the kernel level, never answer the
    // handshake
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let port = listener.local_addr().expect("local addr").port();

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let options = TlsInspectOptions::new()
            .with_port(port)
            .with_timeout(Duration::from_millis(300));
        let result = inspect_certificate_with_options("127.0.0.1", &options);
        let _ = sender.send(result);
    });

    let result = receiver
        .recv_timeout(Duration::from_secs(3))
        .expect("inspection must return, not spin past its deadline");
    let err = result.expect_err("no certificate from a silent peer");
    assert!(matches!(err, TlsError::Timeout { port: p, .. } if p == port));
    drop(listener);
}

#[test]
fn connect_skips_unreachable_addresses() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let live = listener.local_addr().expect("local addr");
    // reserve a port, then free it so nothing listens there
    let dead = {
        let reserved = TcpListener::bind("127.0.0.1:0").expect("reserve port");
        reserved.local_addr().expect("local addr")
    };

    let stream = connect_any("localhost", live.port(), [dead, live], Duration::from_secs(1))
        .expect("a later address must still be tried");
    drop(stream);

    let err = connect_any("localhost", dead.port(), [dead], Duration::from_secs(1))
        .expect_err("a dead-only list fails");
    assert!(matches!(err, TlsError::ConnectionFailed { .. }));
}
