//! SIP message parsing, serialization, and structured accessors (RFC 3261
//! §7).

use crate::error::{Error, Result};
use crate::headers::{split_respecting_nesting, HeaderMap};
use crate::parser::message::{header_line, split_header_body, split_start_line};
use crate::types::header_name::{expand_compact, is_multi_instance, prettify};
use crate::types::{Address, CSeq, Method, SipUri, Via};

/// A parsed SIP request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SipMessage {
    Request(SipRequest),
    Response(SipResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipResponse {
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl SipMessage {
    /// Parse a raw SIP message. The header section and the body are split
    /// on the first blank line; anything after that is taken verbatim as
    /// the body regardless of what it contains.
    pub fn parse(data: &str) -> Result<SipMessage> {
        let (header_section, body) = split_header_body(data);
        let body = body.to_string();

        let header_section = header_section.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = header_section.split('\n');
        let start_line = lines.next().unwrap_or("").trim();
        if start_line.is_empty() {
            return Err(Error::EmptyMessage);
        }

        // Unfold continuation lines (RFC 3261 §7.3.1): a line beginning
        // with whitespace extends the previous header.
        let mut header_lines: Vec<String> = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            if (line.starts_with(' ') || line.starts_with('\t')) && !header_lines.is_empty() {
                let last = header_lines.last_mut().unwrap();
                last.push(' ');
                last.push_str(line.trim());
            } else {
                header_lines.push(line.to_string());
            }
        }

        let mut headers = HeaderMap::new();
        for line in &header_lines {
            let Some((name, value)) = header_line(line) else { continue };
            let name = expand_compact(name);

            if is_multi_instance(&name.to_ascii_lowercase()) {
                for part in split_respecting_nesting(value) {
                    headers.append(name.clone(), part);
                }
            } else {
                headers.append(name.clone(), value.to_string());
            }
        }

        if start_line.starts_with("SIP/") {
            let (_version, code, reason) = split_start_line(start_line);
            let status_code = code.parse().unwrap_or(0);
            Ok(SipMessage::Response(SipResponse { status_code, reason_phrase: reason.to_string(), headers, body }))
        } else {
            let (method, uri, _version) = split_start_line(start_line);
            if method.is_empty() {
                return Err(Error::InvalidStartLine(start_line.to_string()));
            }
            let method = Method::from_str_infallible(method);
            Ok(SipMessage::Request(SipRequest { method, uri: uri.to_string(), headers, body }))
        }
    }
}

impl Method {
    fn from_str_infallible(s: &str) -> Method {
        use std::str::FromStr;
        Method::from_str(s).unwrap()
    }
}

macro_rules! common_accessors {
    ($ty:ident) => {
        impl $ty {
            pub fn get_header(&self, name: &str) -> Option<&str> {
                self.headers.get(name)
            }

            pub fn get_header_values(&self, name: &str) -> Vec<&str> {
                self.headers.get_all(name)
            }

            pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
                self.headers.set(name.to_string(), value);
            }

            pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
                self.headers.append(name.to_string(), value);
            }

            pub fn remove_header(&mut self, name: &str) {
                self.headers.remove(name);
            }

            pub fn via(&self) -> Vec<Via> {
                self.headers.get_all("via").into_iter().map(Via::parse).collect()
            }

            pub fn set_via(&mut self, vias: &[Via]) {
                self.headers.remove("via");
                for v in vias {
                    self.headers.append("Via", v.to_string());
                }
            }

            pub fn from_addr(&self) -> Option<Address> {
                self.headers.get("from").map(Address::parse)
            }

            pub fn set_from_addr(&mut self, addr: &Address) {
                self.headers.set("From", addr.to_string());
            }

            pub fn to_addr(&self) -> Option<Address> {
                self.headers.get("to").map(Address::parse)
            }

            pub fn set_to_addr(&mut self, addr: &Address) {
                self.headers.set("To", addr.to_string());
            }

            pub fn cseq(&self) -> Option<CSeq> {
                self.headers.get("cseq").map(CSeq::parse)
            }

            pub fn set_cseq(&mut self, cseq: &CSeq) {
                self.headers.set("CSeq", cseq.to_string());
            }

            pub fn call_id(&self) -> Option<&str> {
                self.headers.get("call-id")
            }

            pub fn set_call_id(&mut self, value: impl Into<String>) {
                self.headers.set("Call-ID", value);
            }

            pub fn contact(&self) -> Vec<Address> {
                self.headers.get_all("contact").into_iter().map(Address::parse).collect()
            }

            pub fn set_contact(&mut self, addrs: &[Address]) {
                self.headers.remove("contact");
                for a in addrs {
                    self.headers.append("Contact", a.to_string());
                }
            }

            pub fn content_type(&self) -> Option<&str> {
                self.headers.get("content-type")
            }

            pub fn set_content_type(&mut self, value: impl Into<String>) {
                self.headers.set("Content-Type", value);
            }

            pub fn content_length(&self) -> usize {
                self.headers.get("content-length").and_then(|v| v.parse().ok()).unwrap_or(0)
            }

            /// Serialize back to wire format, re-deriving Content-Length from
            /// the body on every call.
            pub fn serialize(&mut self) -> String {
                self.headers.set("Content-Length", self.body.len().to_string());

                let mut out = String::new();
                out.push_str(&self.start_line());
                out.push_str("\r\n");
                for (name, value) in self.headers.iter() {
                    out.push_str(&prettify(name));
                    out.push_str(": ");
                    out.push_str(value);
                    out.push_str("\r\n");
                }
                out.push_str("\r\n");
                out.push_str(&self.body);
                out
            }
        }
    };
}

impl SipRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> SipRequest {
        SipRequest { method, uri: uri.into(), headers: HeaderMap::new(), body: String::new() }
    }

    fn start_line(&self) -> String {
        format!("{} {} SIP/2.0", self.method, self.uri)
    }
}

impl SipResponse {
    pub fn new(status_code: u16, reason_phrase: impl Into<String>) -> SipResponse {
        SipResponse { status_code, reason_phrase: reason_phrase.into(), headers: HeaderMap::new(), body: String::new() }
    }

    fn start_line(&self) -> String {
        format!("SIP/2.0 {} {}", self.status_code, self.reason_phrase)
    }
}

common_accessors!(SipRequest);
common_accessors!(SipResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_invite_request() {
        let raw = "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n\
                   Via: SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds\r\n\
                   To: Bob <sip:bob@biloxi.example.com>\r\n\
                   From: Alice <sip:alice@atlanta.example.com>;tag=1928301774\r\n\
                   Call-ID: a84b4c76e66710@pc33.atlanta.example.com\r\n\
                   CSeq: 314159 INVITE\r\n\
                   Content-Length: 0\r\n\
                   \r\n";
        let msg = SipMessage::parse(raw).unwrap();
        match msg {
            SipMessage::Request(req) => {
                assert_eq!(req.method, Method::Invite);
                assert_eq!(req.uri, "sip:bob@biloxi.example.com");
                assert_eq!(req.call_id(), Some("a84b4c76e66710@pc33.atlanta.example.com"));
                assert_eq!(req.cseq().unwrap().seq, 314159);
            }
            _ => panic!("expected request"),
        }
    }

    #[test]
    fn parses_response_status_line() {
        let raw = "SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n";
        let msg = SipMessage::parse(raw).unwrap();
        match msg {
            SipMessage::Response(resp) => {
                assert_eq!(resp.status_code, 200);
                assert_eq!(resp.reason_phrase, "OK");
            }
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn unfolds_continuation_lines() {
        let raw = "SIP/2.0 200 OK\r\nSubject: Project X\r\n meeting\r\nContent-Length: 0\r\n\r\n";
        let msg = SipMessage::parse(raw).unwrap();
        match msg {
            SipMessage::Response(resp) => {
                assert_eq!(resp.get_header("subject"), Some("Project X meeting"));
            }
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn compact_header_names_expand_on_parse() {
        let raw = "SIP/2.0 200 OK\r\ni: abc@example.com\r\n\r\n";
        let msg = SipMessage::parse(raw).unwrap();
        match msg {
            SipMessage::Response(resp) => assert_eq!(resp.call_id(), Some("abc@example.com")),
            _ => panic!("expected response"),
        }
    }

    #[test]
    fn serialize_sets_content_length_from_body() {
        let mut req = SipRequest::new(Method::Options, "sip:bob@biloxi.example.com");
        req.body = "v=0".to_string();
        let out = req.serialize();
        assert!(out.contains("Content-Length: 3"));
        assert!(out.ends_with("v=0"));
    }

    #[test]
    fn multi_value_via_header_splits_into_separate_headers() {
        let raw = "SIP/2.0 200 OK\r\nVia: SIP/2.0/UDP a.example.com;branch=z9hG4bK1, SIP/2.0/UDP b.example.com;branch=z9hG4bK2\r\n\r\n";
        let msg = SipMessage::parse(raw).unwrap();
        match msg {
            SipMessage::Response(resp) => assert_eq!(resp.via().len(), 2),
            _ => panic!("expected response"),
        }
    }
}
