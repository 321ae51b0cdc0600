// src/core/dns/record_type.rs

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// DNS record types collected for every scan.
///
/// Declaration order is report order. Adding a type here is enough to have it
/// queried, deduplicated and reported under `rawDns`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RecordType {
    A,
    AAAA,
    MX,
    TXT,
    NS,
    CNAME,
    SOA,
    SRV,
    PTR,
    SPF,
    NAPTR,
    CAA,
    CERT,
    DNSKEY,
    DS,
    LOC,
    SMIMEA,
    SSHFP,
    TLSA,
    URI,
}

/// Types projected into the `dns` summary section of the report.
pub const SUMMARY_TYPES: [RecordType; 10] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::MX,
    RecordType::TXT,
    RecordType::NS,
    RecordType::CNAME,
    RecordType::SOA,
    RecordType::SRV,
    RecordType::PTR,
    RecordType::SPF,
];

impl RecordType {
    /// IANA type code.
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::LOC => 29,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::CERT => 37,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::DNSKEY => 48,
            RecordType::TLSA => 52,
            RecordType::SMIMEA => 53,
            RecordType::SPF => 99,
            RecordType::URI => 256,
            RecordType::CAA => 257,
        }
    }

    pub fn is_summary(self) -> bool {
        SUMMARY_TYPES.contains(&self)
    }
}

impl From<RecordType> for hickory_resolver::proto::rr::RecordType {
    fn from(value: RecordType) -> Self {
        hickory_resolver::proto::rr::RecordType::from(value.code())
    }
}
