//! Turning a host argument into a question and running one exchange.

use crate::transport::Transport;
use anyhow::{Context, Result};
use data_encoding::HEXLOWER;
use dnsq_proto::reverse::{is_reverse_name, reverse_name, reverse_name_for};
use dnsq_proto::{Message, Name, OpCode, Question, RecordType};
use std::net::IpAddr;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Builds the question for `host`.
///
/// With `force_reverse` the host must be an address literal and the query
/// becomes a PTR lookup of its reverse name. A PTR query for something that
/// parses as an IP address is reversed implicitly; any other host is used
/// as-is.
pub fn build_question(host: &str, qtype: RecordType, force_reverse: bool) -> Result<Question> {
    if force_reverse {
        let name = reverse_name(host).with_context(|| format!("cannot reverse {host:?}"))?;
        return Ok(Question::new(name, RecordType::PTR));
    }

    if qtype == RecordType::PTR {
        if let Ok(addr) = IpAddr::from_str(host) {
            return Ok(Question::new(reverse_name_for(addr), qtype));
        }
    }

    let name = Name::from_str(host).with_context(|| format!("invalid host name {host:?}"))?;
    if qtype == RecordType::PTR && !is_reverse_name(&name) {
        warn!(%name, "PTR query for a name outside the reverse zones");
    }
    Ok(Question::new(name, qtype))
}

/// A decoded reply and the number of bytes it arrived in.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The decoded response.
    pub message: Message,
    /// Size of the response on the wire.
    pub size: usize,
}

/// Encodes a request for `question`, exchanges it, and decodes the reply.
///
/// A reply that does not match the request (wrong id, not a response,
/// different question) is logged but still returned.
pub async fn lookup<T>(
    transport: &T,
    id: u16,
    question: &Question,
    recursion_desired: bool,
) -> Result<Reply>
where
    T: Transport + ?Sized,
{
    let request = Message::encode_request(
        id,
        OpCode::Query,
        recursion_desired,
        std::slice::from_ref(question),
    )?;
    debug!(
        id,
        bytes = request.len(),
        server = %transport.server(),
        hex = %HEXLOWER.encode(&request),
        "sending request"
    );

    let response = transport
        .exchange(&request)
        .await
        .with_context(|| format!("query to {} failed", transport.server()))?;
    debug!(
        bytes = response.len(),
        hex = %HEXLOWER.encode(&response),
        "received response"
    );

    let message = Message::parse(&response).context("failed to decode response")?;

    if let Err(mismatch) = message.validate_response(id, question) {
        warn!(%mismatch, "response does not match request");
    }

    info!(
        id = message.id(),
        rcode = %message.rcode(),
        answers = message.answers().len(),
        authority = message.authority().len(),
        additional = message.additional().len(),
        "lookup complete"
    );

    Ok(Reply {
        message,
        size: response.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use dnsq_proto::ResourceRecord;
    use std::io::Write;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::{Arc, Mutex};

    /// Replies with a fixed response.
    struct Canned(Vec<u8>);

    #[async_trait]
    impl Transport for Canned {
        async fn exchange(&self, _request: &[u8]) -> Result<Vec<u8>, TransportError> {
            Ok(self.0.clone())
        }

        fn server(&self) -> SocketAddr {
            "127.0.0.1:53".parse().unwrap()
        }
    }

    /// Collects formatted log lines.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_forward_question() {
        let q = build_question("example.com", RecordType::AAAA, false).unwrap();
        assert_eq!(q.qname.to_dotted(), "example.com");
        assert_eq!(q.record_type(), Some(RecordType::AAAA));
    }

    #[test]
    fn test_forced_reverse() {
        let q = build_question("192.168.1.10", RecordType::A, true).unwrap();
        assert_eq!(q.qname.to_dotted(), "10.1.168.192.in-addr.arpa");
        assert_eq!(q.record_type(), Some(RecordType::PTR));

        assert!(build_question("example.com", RecordType::A, true).is_err());
    }

    #[test]
    fn test_implied_reverse_for_ptr() {
        let q = build_question("2001:db8::1", RecordType::PTR, false).unwrap();
        assert!(q.qname.to_dotted().ends_with(".ip6.arpa"));

        // Already a reverse name: used verbatim.
        let q = build_question("1.0.0.127.in-addr.arpa", RecordType::PTR, false).unwrap();
        assert_eq!(q.qname.to_dotted(), "1.0.0.127.in-addr.arpa");
    }

    #[test]
    fn test_address_is_a_name_for_other_types() {
        let q = build_question("8.8.8.8", RecordType::A, false).unwrap();
        assert_eq!(q.qname.to_dotted(), "8.8.8.8");
    }

    #[test]
    fn test_invalid_host() {
        assert!(build_question(&"a".repeat(64), RecordType::A, false).is_err());
        assert!(build_question("a..b", RecordType::A, false).is_err());
    }

    #[test]
    fn test_debug_log_has_hex_dumps() {
        let question = build_question("example.com", RecordType::A, false).unwrap();
        let mut response = Message::response_from(&Message::query(0x0102, question.clone()));
        response.add_answer(ResourceRecord::a(
            question.qname.clone(),
            300,
            Ipv4Addr::new(192, 0, 2, 7),
        ));
        let response = response.to_wire().unwrap().to_vec();
        let request = Message::encode_request(
            0x0102,
            OpCode::Query,
            true,
            std::slice::from_ref(&question),
        )
        .unwrap();

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let reply = tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(lookup(&Canned(response.clone()), 0x0102, &question, true))
        })
        .unwrap();
        assert_eq!(reply.size, response.len());

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains(&HEXLOWER.encode(&request)));
        assert!(text.contains(&HEXLOWER.encode(&response)));
    }
}
