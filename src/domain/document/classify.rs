//! Content-based classification of incoming files

pub const CATEGORY_LEGAL: &str = "Legal";
pub const CATEGORY_MARKETING: &str = "Marketing";
pub const CATEGORY_UTILITIES: &str = "Utilities";
pub const CATEGORY_MAINTENANCE: &str = "Maintenance";

/// Infer a catalog category from a file's MIME type and name.
///
/// The MIME type wins over the name, so `utility-bill.pdf` is filed as legal.
pub fn infer_category(file_name: &str, mime_type: &str) -> &'static str {
    let mime = mime_type.to_lowercase();
    let name = file_name.to_lowercase();

    if mime.starts_with("image/") {
        return CATEGORY_MARKETING;
    }

    if mime == "application/pdf" {
        return CATEGORY_LEGAL;
    }

    if name.contains("lease") {
        return CATEGORY_LEGAL;
    }

    if name.contains("utility") || name.contains("bill") {
        return CATEGORY_UTILITIES;
    }

    if name.contains("maintenance") || name.contains("repair") {
        return CATEGORY_MAINTENANCE;
    }

    CATEGORY_LEGAL
}

/// Short upper-case label for a file, e.g. `PDF` or `DOCX`.
///
/// Uses the file extension when there is one, the MIME subtype otherwise.
pub fn file_type_label(file_name: &str, mime_type: &str) -> String {
    if let Some((stem, ext)) = file_name.rsplit_once('.') {
        if !stem.is_empty() && !ext.is_empty() {
            return ext.to_uppercase();
        }
    }

    mime_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .filter(|s| !s.is_empty())
        .unwrap_or("FILE")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_are_marketing() {
        assert_eq!(infer_category("lease.png", "image/png"), CATEGORY_MARKETING);
        assert_eq!(infer_category("front.JPG", "IMAGE/JPEG"), CATEGORY_MARKETING);
    }

    #[test]
    fn test_pdf_is_legal_regardless_of_name() {
        assert_eq!(infer_category("water-bill.pdf", "application/pdf"), CATEGORY_LEGAL);
    }

    #[test]
    fn test_name_heuristics() {
        assert_eq!(infer_category("Lease_2024.docx", "application/msword"), CATEGORY_LEGAL);
        assert_eq!(infer_category("utility-march.xlsx", "text/csv"), CATEGORY_UTILITIES);
        assert_eq!(infer_category("electric_BILL.txt", "text/plain"), CATEGORY_UTILITIES);
        assert_eq!(infer_category("repair-log.txt", "text/plain"), CATEGORY_MAINTENANCE);
        assert_eq!(infer_category("Maintenance.csv", "text/csv"), CATEGORY_MAINTENANCE);
    }

    #[test]
    fn test_default_is_legal() {
        assert_eq!(infer_category("notes.txt", "text/plain"), CATEGORY_LEGAL);
    }

    #[test]
    fn test_file_type_label() {
        assert_eq!(file_type_label("lease.pdf", "application/pdf"), "PDF");
        assert_eq!(file_type_label("report.final.docx", "application/msword"), "DOCX");
        assert_eq!(file_type_label("README", "text/plain"), "PLAIN");
        assert_eq!(file_type_label(".env", ""), "FILE");
    }
}
