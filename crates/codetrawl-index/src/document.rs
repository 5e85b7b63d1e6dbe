//! Mapping from pending documents to tantivy index entries.
//!
//! One entry per pending document. Facet dimensions are only written
//! when the source value carries something other than whitespace; an
//! empty owner must produce zero owner facets, not a facet with an empty
//! string.

use tantivy::schema::Facet;
use tantivy::TantivyDocument;

use codetrawl_types::CodeDocument;

use crate::schema::{ContentSchema, MinimalSchema, TimeSchema};

/// Add a single-segment facet unless the value is blank.
fn add_facet_if_present(entry: &mut TantivyDocument, field: tantivy::schema::Field, value: &str) {
    if !value.trim().is_empty() {
        entry.add_facet(field, Facet::from_path(std::iter::once(value)));
    }
}

/// Build a content-index entry keyed by the document's normalized path.
pub fn content_document(
    schema: &ContentSchema,
    doc: &CodeDocument,
    body: &str,
    modified_ms: u64,
) -> TantivyDocument {
    let mut entry = TantivyDocument::new();

    entry.add_text(schema.path, &doc.path);

    add_facet_if_present(&mut entry, schema.language_facet, &doc.language_name);
    add_facet_if_present(&mut entry, schema.repo_facet, &doc.repo_name);
    add_facet_if_present(&mut entry, schema.owner_facet, &doc.code_owner);

    entry.add_text(schema.repo_name, &doc.repo_name);
    entry.add_text(schema.repo_name_raw, &doc.repo_name);
    entry.add_text(schema.file_name, &doc.file_name);
    entry.add_text(schema.file_location, &doc.file_location);
    entry.add_text(schema.file_location_filename, &doc.file_location_filename);
    entry.add_text(schema.md5_hash, &doc.md5_hash);
    entry.add_text(schema.language_name, &doc.language_name);
    entry.add_u64(schema.code_lines, doc.code_lines);
    entry.add_text(schema.contents, body);
    entry.add_text(schema.repo_location, &doc.repo_remote_location);
    entry.add_text(schema.code_owner, &doc.code_owner);
    entry.add_text(schema.code_id, doc.path_digest());
    entry.add_u64(schema.modified, modified_ms);

    entry
}

/// Build a time-index entry keyed by path plus revision.
pub fn time_document(
    schema: &TimeSchema,
    doc: &CodeDocument,
    body: &str,
    modified_ms: u64,
) -> TantivyDocument {
    let mut entry = TantivyDocument::new();

    entry.add_text(schema.path, format!("{}:{}", doc.path, doc.revision));

    add_facet_if_present(&mut entry, schema.language_facet, &doc.language_name);
    add_facet_if_present(&mut entry, schema.repo_facet, &doc.repo_name);
    add_facet_if_present(&mut entry, schema.owner_facet, &doc.code_owner);
    add_facet_if_present(
        &mut entry,
        schema.date_year_month_day_facet,
        &doc.year_month_day,
    );
    add_facet_if_present(&mut entry, schema.date_year_month_facet, doc.year_month());
    add_facet_if_present(&mut entry, schema.date_year_facet, doc.year());
    add_facet_if_present(&mut entry, schema.revision_facet, &doc.revision);
    add_facet_if_present(&mut entry, schema.deleted_facet, &doc.deleted);

    entry.add_text(schema.repo_name, &doc.repo_name);
    entry.add_text(schema.file_name, &doc.file_name);
    entry.add_text(schema.file_location, &doc.file_location);
    entry.add_text(schema.file_location_filename, &doc.file_location_filename);
    entry.add_text(schema.md5_hash, &doc.md5_hash);
    entry.add_text(schema.language_name, &doc.language_name);
    entry.add_u64(schema.code_lines, doc.code_lines);
    entry.add_text(schema.contents, body);
    entry.add_text(schema.repo_location, &doc.repo_remote_location);
    entry.add_text(schema.code_owner, &doc.code_owner);
    entry.add_text(schema.revision, &doc.revision);
    entry.add_text(schema.date_year_month_day, &doc.year_month_day);
    entry.add_text(schema.date_year_month, doc.year_month());
    entry.add_text(schema.date_year, doc.year());
    entry.add_text(schema.message, &doc.message);
    entry.add_text(schema.deleted, &doc.deleted);
    entry.add_u64(schema.modified, modified_ms);

    entry
}

/// Build a minimal-index entry: decimal id plus processed text only.
pub fn minimal_document(schema: &MinimalSchema, id: i64, body: &str) -> TantivyDocument {
    let mut entry = TantivyDocument::new();
    entry.add_text(schema.id, id.to_string());
    entry.add_text(schema.contents, body);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaFlavor;
    use tantivy::schema::Value;

    fn sample_doc() -> CodeDocument {
        CodeDocument::new(
            "./repo/acme/src/main.rs",
            "acme",
            "main.rs",
            "src",
            "src/main.rs",
        )
        .with_md5_hash("d41d8cd98f00b204e9800998ecf8427e")
        .with_language_name("Rust")
        .with_code_lines(12)
        .with_contents("fn main() {}")
        .with_repo_remote_location("https://example.com/acme.git")
        .with_code_owner("Ben")
        .with_revision("abc123")
        .with_year_month_day("20160523")
        .with_message("initial commit")
        .with_deleted("FALSE")
    }

    fn content_schema() -> ContentSchema {
        ContentSchema::from_schema(ContentSchema::build()).unwrap()
    }

    fn time_schema() -> TimeSchema {
        TimeSchema::from_schema(TimeSchema::build()).unwrap()
    }

    #[test]
    fn test_content_document_key_and_fields() {
        let schema = content_schema();
        let doc = sample_doc();
        let entry = content_document(&schema, &doc, "main rs fn main", 1_000);

        let path = entry.get_first(schema.path).unwrap();
        assert_eq!(path.as_str(), Some("./repo/acme/src/main.rs"));

        let lines = entry.get_first(schema.code_lines).unwrap();
        assert_eq!(lines.as_u64(), Some(12));

        let modified = entry.get_first(schema.modified).unwrap();
        assert_eq!(modified.as_u64(), Some(1_000));

        let code_id = entry.get_first(schema.code_id).unwrap();
        assert_eq!(code_id.as_str(), Some(doc.path_digest().as_str()));
    }

    #[test]
    fn test_content_document_has_facets_when_present() {
        let schema = content_schema();
        let entry = content_document(&schema, &sample_doc(), "body", 0);

        assert!(entry.get_first(schema.language_facet).is_some());
        assert!(entry.get_first(schema.repo_facet).is_some());
        assert!(entry.get_first(schema.owner_facet).is_some());
    }

    #[test]
    fn test_blank_owner_produces_no_owner_facet() {
        let schema = content_schema();

        let mut doc = sample_doc();
        doc.code_owner = "   ".to_string();
        let entry = content_document(&schema, &doc, "body", 0);

        assert!(entry.get_first(schema.owner_facet).is_none());
        // The stored text field still carries the raw value
        assert!(entry.get_first(schema.code_owner).is_some());
    }

    #[test]
    fn test_empty_language_produces_no_language_facet() {
        let schema = content_schema();

        let mut doc = sample_doc();
        doc.language_name = String::new();
        let entry = content_document(&schema, &doc, "body", 0);

        assert!(entry.get_first(schema.language_facet).is_none());
    }

    #[test]
    fn test_time_document_key_includes_revision() {
        let schema = time_schema();
        let doc = sample_doc();
        let entry = time_document(&schema, &doc, "body", 0);

        let path = entry.get_first(schema.path).unwrap();
        assert_eq!(path.as_str(), Some("./repo/acme/src/main.rs:abc123"));
    }

    #[test]
    fn test_time_document_date_truncations_stored() {
        let schema = time_schema();
        let entry = time_document(&schema, &sample_doc(), "body", 0);

        let ymd = entry.get_first(schema.date_year_month_day).unwrap();
        assert_eq!(ymd.as_str(), Some("20160523"));
        let ym = entry.get_first(schema.date_year_month).unwrap();
        assert_eq!(ym.as_str(), Some("201605"));
        let year = entry.get_first(schema.date_year).unwrap();
        assert_eq!(year.as_str(), Some("2016"));
    }

    #[test]
    fn test_time_document_blank_date_omits_all_date_facets() {
        let schema = time_schema();

        let mut doc = sample_doc();
        doc.year_month_day = String::new();
        let entry = time_document(&schema, &doc, "body", 0);

        assert!(entry.get_first(schema.date_year_month_day_facet).is_none());
        assert!(entry.get_first(schema.date_year_month_facet).is_none());
        assert!(entry.get_first(schema.date_year_facet).is_none());
    }

    #[test]
    fn test_time_document_carries_message_and_deleted() {
        let schema = time_schema();
        let entry = time_document(&schema, &sample_doc(), "body", 0);

        let message = entry.get_first(schema.message).unwrap();
        assert_eq!(message.as_str(), Some("initial commit"));
        let deleted = entry.get_first(schema.deleted).unwrap();
        assert_eq!(deleted.as_str(), Some("FALSE"));
    }

    #[test]
    fn test_minimal_document() {
        let schema = MinimalSchema::from_schema(MinimalSchema::build()).unwrap();
        let entry = minimal_document(&schema, 42, "split clean interesting");

        let id = entry.get_first(schema.id).unwrap();
        assert_eq!(id.as_str(), Some("42"));
        let contents = entry.get_first(schema.contents).unwrap();
        assert_eq!(contents.as_str(), Some("split clean interesting"));
    }

    #[test]
    fn test_facet_value_with_separator_is_escaped() {
        let schema = content_schema();

        let mut doc = sample_doc();
        doc.language_name = "C/C++".to_string();
        // Building the entry must not panic on the embedded separator
        let entry = content_document(&schema, &doc, "body", 0);
        assert!(entry.get_first(schema.language_facet).is_some());
    }
}
