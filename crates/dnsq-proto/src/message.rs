//! DNS message representation.
//!
//! A DNS message consists of a header, question section, and three
//! resource record sections (answer, authority, additional).

use crate::error::{Error, Result};
use crate::header::{Header, HEADER_SIZE};
use crate::opcode::OpCode;
use crate::question::{Question, QuestionParser};
use crate::rcode::ResponseCode;
use crate::record::{RecordParser, ResourceRecord};
use crate::rtype::RecordType;
use crate::wire::WireWriter;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// A complete DNS message.
///
/// DNS messages consist of:
/// - A fixed 12-byte header
/// - A question section (queries)
/// - An answer section (responses to queries)
/// - An authority section (NS/SOA records)
/// - An additional section (related records)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message header.
    header: Header,
    /// The question section.
    questions: Vec<Question>,
    /// The answer section.
    answers: Vec<ResourceRecord>,
    /// The authority section.
    authority: Vec<ResourceRecord>,
    /// The additional section.
    additional: Vec<ResourceRecord>,
}

/// Ways a decoded response can fail to belong to the request that was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseMismatch {
    /// The QR bit is clear.
    #[error("message is not a response")]
    NotAResponse,

    /// The transaction ID differs from the request's.
    #[error("response id {actual:#06x} does not match request id {expected:#06x}")]
    IdMismatch {
        /// ID sent in the request.
        expected: u16,
        /// ID found in the response.
        actual: u16,
    },

    /// The response echoes a different question, or none.
    #[error("response question does not match the request")]
    QuestionMismatch,
}

impl Message {
    /// Creates a new empty message with the given header.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Creates a recursive standard query for one question.
    pub fn query(id: u16, question: Question) -> Self {
        let mut msg = Self::new(Header::request(id, OpCode::Query, true));
        msg.add_question(question);
        msg
    }

    /// Creates a response message echoing a query's id and questions.
    pub fn response_from(query: &Message) -> Self {
        let mut msg = Self::new(Header::response_from(&query.header));
        msg.questions = query.questions.clone();
        msg.header.qd_count = query.header.qd_count;
        msg
    }

    /// Encodes a request carrying `questions`.
    ///
    /// QR, AA, TC, Z and RCODE are zero, QDCOUNT is the number of questions
    /// and the record counts are zero.
    pub fn encode_request(
        id: u16,
        opcode: OpCode,
        recursion_desired: bool,
        questions: &[Question],
    ) -> Result<Bytes> {
        let mut msg = Self::new(Header::request(id, opcode, recursion_desired));
        msg.questions = questions.to_vec();
        msg.to_wire()
    }

    // =========================================================================
    // Header accessors
    // =========================================================================

    /// Returns the message header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to the header.
    #[inline]
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the message ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Sets the message ID.
    #[inline]
    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    /// Returns the opcode.
    #[inline]
    pub fn opcode(&self) -> OpCode {
        self.header.opcode
    }

    /// Returns the response code.
    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode
    }

    /// Sets the response code.
    #[inline]
    pub fn set_rcode(&mut self, rcode: ResponseCode) {
        self.header.rcode = rcode;
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        self.header.is_query()
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.header.is_truncated()
    }

    // =========================================================================
    // Section accessors
    // =========================================================================

    /// Returns the question section.
    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question if present.
    #[inline]
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section.
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    // =========================================================================
    // Section mutators
    // =========================================================================

    /// Adds a question.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
        self.header.qd_count = self.questions.len() as u16;
    }

    /// Adds an answer record.
    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Adds an authority record.
    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authority.push(record);
        self.header.ns_count = self.authority.len() as u16;
    }

    /// Adds an additional record.
    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additional.push(record);
        self.header.ar_count = self.additional.len() as u16;
    }

    // =========================================================================
    // Response helpers
    // =========================================================================

    /// Checks that this message answers the request `request_id` carrying
    /// `question`.
    ///
    /// The decoder never applies this itself; a mismatched message still
    /// decodes.
    pub fn validate_response(
        &self,
        request_id: u16,
        question: &Question,
    ) -> std::result::Result<(), ResponseMismatch> {
        if !self.is_response() {
            return Err(ResponseMismatch::NotAResponse);
        }
        if self.id() != request_id {
            return Err(ResponseMismatch::IdMismatch {
                expected: request_id,
                actual: self.id(),
            });
        }
        match self.question() {
            Some(q) if q.matches(question) => Ok(()),
            _ => Err(ResponseMismatch::QuestionMismatch),
        }
    }

    /// Returns answer records of a specific type.
    pub fn answers_of_type(&self, rtype: RecordType) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .filter(move |r| r.record_type() == Some(rtype))
    }

    /// Returns A record addresses from the answers.
    pub fn a_records(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_a())
    }

    /// Returns AAAA record addresses from the answers.
    pub fn aaaa_records(&self) -> impl Iterator<Item = Ipv6Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_aaaa())
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    /// Parses a DNS message from wire format.
    ///
    /// Sections are read in order with one cursor; any read past the end of
    /// `data` fails the whole message. Bytes after the last declared record
    /// are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;

        let mut questions = QuestionParser::new(data, HEADER_SIZE, header.qd_count);
        let question_list = questions.collect_all()?;

        let mut answers = RecordParser::new(data, questions.offset(), header.an_count);
        let answer_list = answers.collect_all()?;

        let mut authority = RecordParser::new(data, answers.offset(), header.ns_count);
        let authority_list = authority.collect_all()?;

        let mut additional = RecordParser::new(data, authority.offset(), header.ar_count);
        let additional_list = additional.collect_all()?;

        Ok(Self {
            header,
            questions: question_list,
            answers: answer_list,
            authority: authority_list,
            additional: additional_list,
        })
    }

    /// Returns the uncompressed wire format length of this message.
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE
            + self.questions.iter().map(Question::wire_len).sum::<usize>()
            + self
                .answers
                .iter()
                .chain(&self.authority)
                .chain(&self.additional)
                .map(ResourceRecord::wire_len)
                .sum::<usize>()
    }

    /// Writes the message to wire format, without name compression.
    ///
    /// Header counts are taken from the section lengths.
    pub fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        let mut header = self.header.clone();
        header.qd_count = section_count("question", self.questions.len())?;
        header.an_count = section_count("answer", self.answers.len())?;
        header.ns_count = section_count("authority", self.authority.len())?;
        header.ar_count = section_count("additional", self.additional.len())?;

        header.write_to(writer);

        for q in &self.questions {
            q.write_to(writer);
        }

        for r in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            r.write_to(writer)?;
        }

        Ok(())
    }

    /// Converts the message to wire format bytes.
    pub fn to_wire(&self) -> Result<Bytes> {
        let mut writer = WireWriter::new(self.wire_len());
        self.write_to(&mut writer)?;
        Ok(writer.freeze())
    }
}

fn section_count(section: &'static str, count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| Error::TooManyEntries { section, count })
}

impl Default for Message {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;

        writeln!(f, "\n;; QUESTION SECTION:")?;
        for q in &self.questions {
            writeln!(f, ";{q}")?;
        }

        for (title, records) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authority),
            ("ADDITIONAL", &self.additional),
        ] {
            if records.is_empty() {
                continue;
            }
            writeln!(f, "\n;; {title} SECTION:")?;
            for r in records {
                writeln!(f, "{r}")?;
            }
        }

        Ok(())
    }
}
