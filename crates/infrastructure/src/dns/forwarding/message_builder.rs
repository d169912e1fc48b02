//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use dnscache_domain::{DnsFailure, DnsQuery};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Recursive query message with a single question.
    pub fn query_message(query: &DnsQuery, id: u16) -> Message {
        let mut question = Query::new();
        question.set_name(query.name.clone());
        question.set_query_type(query.record_type);
        question.set_query_class(query.record_class);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question);
        message
    }

    /// Build a query with a random ID and return both the ID and bytes
    ///
    /// The ID is needed to match the response.
    pub fn build_query_with_id(query: &DnsQuery) -> Result<(u16, Vec<u8>), DnsFailure> {
        let id = fastrand::u16(..);
        let message = Self::query_message(query, id);
        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DnsFailure> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DnsFailure::SyntaxError(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
