//! DNS question section.
//!
//! The question section contains queries for information.
//! Each question has a domain name, query type, and query class.

use crate::class::Class;
use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::{WireReader, WireWriter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest possible question on the wire: root name plus type and class.
const MIN_QUESTION_LEN: usize = 5;

/// A DNS question.
///
/// A typical query has one question, though the protocol allows multiple.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     QNAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QTYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     QCLASS                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The domain name being queried.
    pub qname: Name,

    /// The type of record being requested.
    pub qtype: Type,

    /// The class of the query.
    pub qclass: Class,
}

impl Question {
    /// Creates a new Internet-class question.
    #[inline]
    pub fn new(qname: Name, qtype: RecordType) -> Self {
        Self {
            qname,
            qtype: Type::Known(qtype),
            qclass: Class::IN,
        }
    }

    /// Returns the record type if known.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.qtype.as_known()
    }

    /// Parses a question from wire format.
    ///
    /// Returns the question and the number of bytes consumed at `offset`.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (qname, name_len) = NameParser::new(data).parse_name(offset)?;

        let mut reader = WireReader::at(data, offset + name_len);
        let qtype = Type::from_u16(reader.read_u16()?);
        let qclass = Class::from_u16(reader.read_u16()?);

        Ok((Self { qname, qtype, qclass }, name_len + 4))
    }

    /// Returns the wire format length of this question.
    pub fn wire_len(&self) -> usize {
        self.qname.wire_len() + 4
    }

    /// Writes the question to wire format.
    pub fn write_to(&self, writer: &mut WireWriter) {
        self.qname.write_wire(writer);
        writer.write_u16(self.qtype.to_u16());
        writer.write_u16(self.qclass.to_u16());
    }

    /// Converts the question to wire format bytes.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut writer = WireWriter::new(self.wire_len());
        self.write_to(&mut writer);
        writer.as_bytes().to_vec()
    }

    /// Returns true if this question matches a response question.
    ///
    /// Matching is case-insensitive for the name, and exact for type and class.
    pub fn matches(&self, other: &Question) -> bool {
        self.qname == other.qname && self.qtype == other.qtype && self.qclass == other.qclass
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}

/// Parser for the question section.
#[derive(Debug)]
pub struct QuestionParser<'a> {
    /// The message data.
    data: &'a [u8],
    /// Current offset in the message.
    offset: usize,
    /// Number of questions remaining.
    remaining: u16,
}

impl<'a> QuestionParser<'a> {
    /// Creates a new question parser.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the current offset.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of remaining questions.
    #[inline]
    pub const fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Parses the next question.
    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let (question, consumed) = Question::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;

        Ok(Some(question))
    }

    /// Collects all remaining questions into a vector.
    pub fn collect_all(&mut self) -> Result<Vec<Question>> {
        let fit = self.data.len().saturating_sub(self.offset) / MIN_QUESTION_LEN;
        let mut questions = Vec::with_capacity(usize::from(self.remaining).min(fit));
        while let Some(q) = self.next()? {
            questions.push(q);
        }
        Ok(questions)
    }
}
