//! Document scan stub
//!
//! Placeholder recognition: the input bytes are ignored and a canned
//! profile is drawn at random, with a random confidence figure. The
//! interface is the real contract (arbitrary image payload in, structured
//! [`ScanResult`] out); an actual OCR engine can replace this struct
//! without touching any caller. The non-determinism is deliberate and
//! part of the stub's observable behavior.

use aura_common::api::ScanResult;
use rand::Rng;

struct CannedProfile {
    document_type: &'static str,
    body_text: &'static str,
    key_points: &'static [&'static str],
}

const CATALOG: [CannedProfile; 3] = [
    CannedProfile {
        document_type: "invoice",
        body_text: "Invoice #2047 from Meridian Office Supply. Total due 128.40 within 30 days.",
        key_points: &[
            "Total due: 128.40",
            "Payment terms: net 30",
            "Vendor: Meridian Office Supply",
        ],
    },
    CannedProfile {
        document_type: "receipt",
        body_text: "Card payment of 23.75 at Fern & Bean Cafe, including 1.98 tax.",
        key_points: &[
            "Amount: 23.75",
            "Merchant: Fern & Bean Cafe",
            "Paid by card",
        ],
    },
    CannedProfile {
        document_type: "meeting notes",
        body_text: "Project sync notes: launch moved to the 14th, design review owned by Sam, \
                    follow-up scheduled for Thursday.",
        key_points: &[
            "Launch moved to the 14th",
            "Design review: Sam",
            "Follow-up on Thursday",
        ],
    },
];

const MIN_CONFIDENCE: u8 = 70;
const MAX_CONFIDENCE: u8 = 100;

/// Stubbed document scanner
pub struct DocumentScanStub;

impl DocumentScanStub {
    /// Produce a canned analysis for any image payload.
    pub fn scan(&self, image_bytes: &[u8]) -> ScanResult {
        let mut rng = rand::thread_rng();
        let profile = &CATALOG[rng.gen_range(0..CATALOG.len())];
        let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);

        tracing::debug!(
            payload_bytes = image_bytes.len(),
            document_type = profile.document_type,
            confidence,
            "stub scan produced canned result"
        );

        ScanResult {
            document_type: profile.document_type.to_string(),
            body_text: profile.body_text.to_string(),
            key_points: profile.key_points.iter().map(|s| s.to_string()).collect(),
            confidence_percent: confidence,
        }
    }
}
