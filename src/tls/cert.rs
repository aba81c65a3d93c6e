use chrono::{DateTime, TimeZone, Utc};
use x509_parser::prelude::*;

use super::{CertificateInfo, TlsError};

const OID_ACCESS_OCSP: &str = "1.3.6.1.5.5.7.48.1";
const OID_ACCESS_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Parses a DER-encoded certificate into the fields the report renders.
pub(crate) fn parse_certificate(der: &[u8]) -> Result<CertificateInfo, TlsError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|err| TlsError::parse(format!("{err:?}")))?;

    let (ocsp_uri, ca_issuer_uri) = extract_authority_info(&cert);

    Ok(CertificateInfo {
        subject: first_rdn_value(cert.subject()),
        issuer: first_rdn_value(cert.issuer()),
        // the wire version field is zero-indexed
        version: cert.version().0 + 1,
        serial: format_serial(cert.raw_serial()),
        not_before: asn1_time_to_datetime(cert.validity().not_before)?,
        not_after: asn1_time_to_datetime(cert.validity().not_after)?,
        subject_alt_names: extract_dns_sans(&cert),
        ocsp_uri,
        ca_issuer_uri,
    })
}

fn first_rdn_value(name: &X509Name<'_>) -> Option<String> {
    name.iter_attributes()
        .next()
        .and_then(|attribute| attribute.as_str().ok())
        .map(|value| value.to_string())
}

fn format_serial(raw: &[u8]) -> String {
    raw.iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, TlsError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| TlsError::parse(format!("timestamp {} out of range", time.timestamp())))
}

fn extract_dns_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(Some(extension)) = cert.subject_alternative_name() {
        for general_name in &extension.value.general_names {
            if let GeneralName::DNSName(dns) = general_name {
                names.push(dns.to_string());
            }
        }
    }
    names
}

/// OCSP responder and CA-issuer URIs from the Authority Information Access
/// extension, first occurrence each.
fn extract_authority_info(cert: &X509Certificate<'_>) -> (Option<String>, Option<String>) {
    let mut ocsp = None;
    let mut ca_issuers = None;

    for extension in cert.extensions() {
        let ParsedExtension::AuthorityInfoAccess(access) = extension.parsed_extension() else {
            continue;
        };
        for descriptor in &access.accessdescs {
            let GeneralName::URI(uri) = &descriptor.access_location else {
                continue;
            };
            match descriptor.access_method.to_string().as_str() {
                OID_ACCESS_OCSP if ocsp.is_none() => ocsp = Some(uri.to_string()),
                OID_ACCESS_CA_ISSUERS if ca_issuers.is_none() => {
                    ca_issuers = Some(uri.to_string());
                }
                _ => {}
            }
        }
    }

    (ocsp, ca_issuers)
}
