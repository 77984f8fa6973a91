//! XML parsing utilities for SES query API responses.
//!
//! Responses are namespaced (`http://email.amazonaws.com/doc/2010-12-01/`)
//! and may carry prefixes, so elements are matched on their local name.
//! Every extractor tolerates missing elements and yields empty strings.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{SesError, SesResult, ServiceErrorResponse};
use crate::types::{SendDataPoint, SendQuota};

/// One step of a document walk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// An element was opened; `path` ends with its local name.
    Start { path: Vec<String> },
    /// An element was closed with its concatenated text content.
    Element { path: Vec<String>, text: String },
}

fn xml_error(e: impl std::fmt::Display) -> SesError {
    SesError::Xml {
        message: e.to_string(),
    }
}

/// Flatten a document into open/close steps with local-name paths.
fn walk(xml: &str) -> SesResult<Vec<Node>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes = Vec::new();
    let mut stack: Vec<(String, String)> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                stack.push((name, String::new()));
                nodes.push(Node::Start {
                    path: stack.iter().map(|(n, _)| n.clone()).collect(),
                });
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let mut path: Vec<String> = stack.iter().map(|(n, _)| n.clone()).collect();
                path.push(name);
                nodes.push(Node::Start { path: path.clone() });
                nodes.push(Node::Element {
                    path,
                    text: String::new(),
                });
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?;
                if let Some((_, buffer)) = stack.last_mut() {
                    buffer.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let Some((_, buffer)) = stack.last_mut() {
                    buffer.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                let path: Vec<String> = stack.iter().map(|(n, _)| n.clone()).collect();
                if let Some((_, text)) = stack.pop() {
                    nodes.push(Node::Element { path, text });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SesError::from(e)),
            _ => {}
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(xml_error(format!("unexpected end of document inside <{}>", name)));
    }

    Ok(nodes)
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

fn first_text(nodes: &[Node], suffix: &[&str]) -> Option<String> {
    nodes.iter().find_map(|node| match node {
        Node::Element { path, text } if ends_with(path, suffix) => Some(text.clone()),
        _ => None,
    })
}

/// Parse an SES error response.
///
/// Returns `None` when the document has no `Error` element, which is the
/// only signal of failure the query API gives.
///
/// ```rust
/// use ses_archiver::xml::parse_error_response;
///
/// let xml = "<ErrorResponse><Error><Code>Throttling</Code>\
///            <Message>Rate exceeded</Message></Error></ErrorResponse>";
/// let error = parse_error_response(xml).unwrap().unwrap();
///
/// assert_eq!(error.code, "Throttling");
/// assert_eq!(error.message, "Rate exceeded");
/// ```
pub fn parse_error_response(xml: &str) -> SesResult<Option<ServiceErrorResponse>> {
    let nodes = walk(xml)?;

    let has_error = nodes.iter().any(|node| match node {
        Node::Start { path } => path.iter().any(|segment| segment == "Error"),
        Node::Element { .. } => false,
    });
    if !has_error {
        return Ok(None);
    }

    Ok(Some(ServiceErrorResponse {
        error_type: first_text(&nodes, &["Error", "Type"]),
        code: first_text(&nodes, &["Error", "Code"]).unwrap_or_default(),
        message: first_text(&nodes, &["Error", "Message"]).unwrap_or_default(),
        request_id: first_text(&nodes, &["RequestId"]),
    }))
}

/// Extract the message ID of a `SendEmail` or `SendRawEmail` response.
pub fn parse_message_id(xml: &str) -> SesResult<String> {
    let nodes = walk(xml)?;
    Ok(first_text(&nodes, &["SendEmailResult", "MessageId"])
        .or_else(|| first_text(&nodes, &["SendRawEmailResult", "MessageId"]))
        .unwrap_or_default())
}

/// Extract the request ID from `ResponseMetadata`.
pub fn parse_request_id(xml: &str) -> SesResult<Option<String>> {
    let nodes = walk(xml)?;
    Ok(first_text(&nodes, &["ResponseMetadata", "RequestId"]))
}

/// Extract the addresses of a `ListVerifiedEmailAddresses` response.
pub fn parse_verified_addresses(xml: &str) -> SesResult<Vec<String>> {
    let nodes = walk(xml)?;
    Ok(nodes
        .into_iter()
        .filter_map(|node| match node {
            Node::Element { path, text } if ends_with(&path, &["VerifiedEmailAddresses", "member"]) => {
                Some(text)
            }
            _ => None,
        })
        .collect())
}

/// Extract the fields of a `GetSendQuota` response.
pub fn parse_send_quota(xml: &str) -> SesResult<SendQuota> {
    let nodes = walk(xml)?;
    let field = |name: &str| first_text(&nodes, &["GetSendQuotaResult", name]).unwrap_or_default();

    Ok(SendQuota {
        sent_last_24_hours: field("SentLast24Hours"),
        max_24_hour_send: field("Max24HourSend"),
        max_send_rate: field("MaxSendRate"),
    })
}

/// Extract every data point of a `GetSendStatistics` response, in document order.
pub fn parse_send_statistics(xml: &str) -> SesResult<Vec<SendDataPoint>> {
    let nodes = walk(xml)?;
    let mut points: Vec<SendDataPoint> = Vec::new();

    for node in nodes {
        match node {
            Node::Start { path } if ends_with(&path, &["SendDataPoints", "member"]) => {
                points.push(SendDataPoint::default());
            }
            Node::Element { path, text } if path.len() >= 3 => {
                let parent = &path[..path.len() - 1];
                if !ends_with(parent, &["SendDataPoints", "member"]) {
                    continue;
                }
                let Some(point) = points.last_mut() else {
                    continue;
                };
                match path[path.len() - 1].as_str() {
                    "DeliveryAttempts" => point.delivery_attempts = text,
                    "Timestamp" => point.timestamp = text,
                    "Rejects" => point.rejects = text,
                    "Bounces" => point.bounces = text,
                    "Complaints" => point.complaints = text,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://email.amazonaws.com/doc/2010-12-01/";

    #[test]
    fn test_parse_error_response() {
        let xml = format!(
            r#"<ErrorResponse xmlns="{}">
                 <Error>
                   <Type>Sender</Type>
                   <Code>MessageRejected</Code>
                   <Message>Email address is not verified.</Message>
                 </Error>
                 <RequestId>4f1e-req</RequestId>
               </ErrorResponse>"#,
            NS
        );

        let error = parse_error_response(&xml).unwrap().unwrap();
        assert_eq!(error.error_type.as_deref(), Some("Sender"));
        assert_eq!(error.code, "MessageRejected");
        assert_eq!(error.message, "Email address is not verified.");
        assert_eq!(error.request_id.as_deref(), Some("4f1e-req"));
    }

    #[test]
    fn test_success_document_has_no_error() {
        let xml = "<GetSendQuotaResponse><GetSendQuotaResult/></GetSendQuotaResponse>";
        assert!(parse_error_response(xml).unwrap().is_none());
    }

    #[test]
    fn test_empty_error_element_is_still_an_error() {
        let error = parse_error_response("<Response><Error/></Response>")
            .unwrap()
            .unwrap();
        assert_eq!(error.code, "");
        assert_eq!(error.message, "");
    }

    #[test]
    fn test_prefixed_elements_match_on_local_name() {
        let xml = format!(
            r#"<ses:SendEmailResponse xmlns:ses="{}">
                 <ses:SendEmailResult><ses:MessageId>0000-abc</ses:MessageId></ses:SendEmailResult>
               </ses:SendEmailResponse>"#,
            NS
        );
        assert_eq!(parse_message_id(&xml).unwrap(), "0000-abc");
    }

    #[test]
    fn test_raw_message_id() {
        let xml = "<SendRawEmailResponse><SendRawEmailResult><MessageId>raw-1</MessageId>\
                   </SendRawEmailResult></SendRawEmailResponse>";
        assert_eq!(parse_message_id(xml).unwrap(), "raw-1");
    }

    #[test]
    fn test_missing_message_id_is_empty() {
        assert_eq!(parse_message_id("<SendEmailResponse/>").unwrap(), "");
    }

    #[test]
    fn test_escaped_text_and_cdata() {
        let xml = "<R><Error><Code>Bad</Code><Message>a &amp; b<![CDATA[ <c>]]></Message></Error></R>";
        let error = parse_error_response(xml).unwrap().unwrap();
        assert_eq!(error.message, "a & b <c>");
    }

    #[test]
    fn test_parse_verified_addresses() {
        let xml = format!(
            r#"<ListVerifiedEmailAddressesResponse xmlns="{}">
                 <ListVerifiedEmailAddressesResult>
                   <VerifiedEmailAddresses>
                     <member>a@example.com</member>
                     <member>b@example.com</member>
                   </VerifiedEmailAddresses>
                 </ListVerifiedEmailAddressesResult>
                 <ResponseMetadata><RequestId>r-1</RequestId></ResponseMetadata>
               </ListVerifiedEmailAddressesResponse>"#,
            NS
        );

        assert_eq!(
            parse_verified_addresses(&xml).unwrap(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert_eq!(parse_request_id(&xml).unwrap().as_deref(), Some("r-1"));
    }

    #[test]
    fn test_parse_send_quota_reads_each_field() {
        let xml = "<GetSendQuotaResponse><GetSendQuotaResult>\
                   <SentLast24Hours>127.0</SentLast24Hours>\
                   <Max24HourSend>200.0</Max24HourSend>\
                   <MaxSendRate>1.0</MaxSendRate>\
                   </GetSendQuotaResult></GetSendQuotaResponse>";

        let quota = parse_send_quota(xml).unwrap();
        assert_eq!(quota.sent_last_24_hours, "127.0");
        assert_eq!(quota.max_24_hour_send, "200.0");
        assert_eq!(quota.max_send_rate, "1.0");
    }

    #[test]
    fn test_parse_send_statistics() {
        let xml = "<GetSendStatisticsResponse><GetSendStatisticsResult><SendDataPoints>\
                   <member><DeliveryAttempts>8</DeliveryAttempts><Timestamp>2011-08-03T19:23:00Z</Timestamp>\
                   <Rejects>0</Rejects><Bounces>1</Bounces><Complaints>0</Complaints></member>\
                   <member><DeliveryAttempts>3</DeliveryAttempts><Timestamp>2011-08-03T06:53:00Z</Timestamp>\
                   <Rejects>1</Rejects><Bounces>0</Bounces><Complaints>2</Complaints></member>\
                   </SendDataPoints></GetSendStatisticsResult></GetSendStatisticsResponse>";

        let points = parse_send_statistics(xml).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].delivery_attempts, "8");
        assert_eq!(points[0].bounces, "1");
        assert_eq!(points[1].timestamp, "2011-08-03T06:53:00Z");
        assert_eq!(points[1].complaints, "2");
    }

    #[test]
    fn test_statistics_without_points() {
        let xml = "<GetSendStatisticsResponse><GetSendStatisticsResult><SendDataPoints/>\
                   </GetSendStatisticsResult></GetSendStatisticsResponse>";
        assert!(parse_send_statistics(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(matches!(
            parse_message_id("<SendEmailResponse><MessageId>x</Oops>"),
            Err(SesError::Xml { .. })
        ));
        assert!(matches!(
            parse_message_id("<SendEmailResponse><SendEmailResult>"),
            Err(SesError::Xml { .. })
        ));
    }
}
