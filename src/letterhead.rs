//! Company identity printed around the uploaded page.

use serde::Serialize;

/// Text in both letterhead languages. `secondary` is right-to-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bilingual {
    pub primary: &'static str,
    pub secondary: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Letterhead {
    pub company: Bilingual,
    pub tagline: Bilingual,
    pub address: &'static [Bilingual],
    pub contact: &'static str,
    pub registration: Bilingual,
    pub watermark: &'static str,
    /// Language tag for the secondary text, used for `lang`/`dir` in the markup.
    pub secondary_lang: &'static str,
}

pub const LETTERHEAD: Letterhead = Letterhead {
    company: Bilingual {
        primary: "Northwind Trading Company",
        secondary: "شركة نورثويند للتجارة",
    },
    tagline: Bilingual {
        primary: "General Trading & Logistics",
        secondary: "التجارة العامة والخدمات اللوجستية",
    },
    address: &[
        Bilingual {
            primary: "King Fahd Road, Al Olaya District",
            secondary: "طريق الملك فهد، حي العليا",
        },
        Bilingual {
            primary: "P.O. Box 12345, Riyadh 11564, Saudi Arabia",
            secondary: "ص.ب 12345، الرياض 11564، المملكة العربية السعودية",
        },
    ],
    contact: "+966 11 000 0000 · info@northwind.example · northwind.example",
    registration: Bilingual {
        primary: "C.R. 1010000000 · VAT 300000000000003",
        secondary: "س.ت 1010000000 · الرقم الضريبي 300000000000003",
    },
    watermark: "NORTHWIND",
    secondary_lang: "ar",
};
