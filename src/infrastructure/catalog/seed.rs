//! Sample property-management catalog used by the CLI and demos

use chrono::NaiveDate;

use crate::domain::{DocumentDetails, DocumentStatus, NewDocument};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn status(value: &str) -> DocumentStatus {
    DocumentStatus::new(value).unwrap_or_else(|_| DocumentStatus::uploaded())
}

/// Documents covering every detail variant and the common statuses
pub fn sample_documents() -> Vec<NewDocument> {
    vec![
        NewDocument::new(
            "Lease Agreement - Unit 4B.pdf",
            "Legal",
            "PDF",
            "2.4 MB",
            date(2024, 1, 15),
        )
        .with_property("Sunset Apartments")
        .with_tenant("Sarah Johnson")
        .with_status(status(DocumentStatus::SIGNED))
        .with_tags(["lease", "signed", "2024"])
        .with_details(DocumentDetails::Lease {
            expiry_date: date(2025, 1, 14),
        }),
        NewDocument::new(
            "Property Insurance Policy.pdf",
            "Insurance",
            "PDF",
            "1.8 MB",
            date(2024, 1, 10),
        )
        .with_property("Oak Street Plaza")
        .with_status(status(DocumentStatus::ACTIVE))
        .with_tags(["insurance", "policy"])
        .with_details(DocumentDetails::Lease {
            expiry_date: date(2024, 12, 31),
        }),
        NewDocument::new(
            "HVAC Repair Invoice.pdf",
            "Maintenance",
            "PDF",
            "456 KB",
            date(2024, 1, 20),
        )
        .with_property("Sunset Apartments")
        .with_status(status(DocumentStatus::PROCESSED))
        .with_tags(["invoice", "hvac", "repair"])
        .with_details(DocumentDetails::Invoice { amount: 1250.0 }),
        NewDocument::new(
            "Move-in Inspection - Unit 2A.pdf",
            "Inspections",
            "PDF",
            "5.2 MB",
            date(2024, 1, 5),
        )
        .with_property("Riverside Condos")
        .with_tenant("Mike Chen")
        .with_status(status(DocumentStatus::APPROVED))
        .with_tags(["inspection", "move-in"])
        .with_details(DocumentDetails::Inspection {
            score: 92,
            photo_count: 24,
        }),
        NewDocument::new(
            "Water Bill - January.pdf",
            "Utilities",
            "PDF",
            "320 KB",
            date(2024, 1, 25),
        )
        .with_property("Oak Street Plaza")
        .with_status(status(DocumentStatus::PENDING))
        .with_tags(["utility", "water", "bill"])
        .with_details(DocumentDetails::Invoice { amount: 342.18 }),
        NewDocument::new(
            "Unit 4B Inventory Checklist.xlsx",
            "Inventory",
            "XLSX",
            "88 KB",
            date(2023, 12, 28),
        )
        .with_property("Sunset Apartments")
        .with_tenant("Sarah Johnson")
        .with_status(status(DocumentStatus::CURRENT))
        .with_tags(["inventory", "move-in"])
        .with_details(DocumentDetails::Inventory { item_count: 47 }),
        NewDocument::new(
            "Lobby Photos.png",
            "Marketing",
            "PNG",
            "3.1 MB",
            date(2024, 1, 18),
        )
        .with_property("Riverside Condos")
        .with_status(status(DocumentStatus::UPLOADED))
        .with_tags(["uploaded", "photos"])
        .with_details(DocumentDetails::Upload {
            uploaded_by: "Property Manager".to_string(),
        }),
        NewDocument::new(
            "2023 Lease - Unit 1C.pdf",
            "Legal",
            "PDF",
            "2.1 MB",
            date(2023, 1, 3),
        )
        .with_property("Riverside Condos")
        .with_tenant("Emily Davis")
        .with_status(status(DocumentStatus::ARCHIVED))
        .with_tags(["lease", "signed", "2023"]),
    ]
}
