//! Tantivy schema definitions for the three index flavors.
//!
//! The content index holds one live entry per file path; the time index
//! holds one entry per (path, revision) pair with commit metadata and
//! date facets; the minimal index holds numeric-id-keyed processed text
//! only. Content and time share one batch engine through the
//! [`SchemaFlavor`] trait, which carries the two deliberate asymmetries
//! between them as explicit flags instead of duplicated code paths.

use tantivy::schema::{FacetOptions, Field, Schema, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::TantivyDocument;

use codetrawl_analysis::{code_clean_pipeline, find_interesting_keywords, split_keywords};
use codetrawl_types::CodeDocument;

use crate::document::{content_document, time_document};
use crate::error::IndexError;

/// Field names shared between schema construction and validation.
pub mod field_names {
    pub const PATH: &str = "path";
    pub const REPO_NAME: &str = "repo_name";
    pub const REPO_NAME_RAW: &str = "repo_name_raw";
    pub const FILE_NAME: &str = "file_name";
    pub const FILE_LOCATION: &str = "file_location";
    pub const FILE_LOCATION_FILENAME: &str = "file_location_filename";
    pub const MD5_HASH: &str = "md5_hash";
    pub const LANGUAGE_NAME: &str = "language_name";
    pub const CODE_LINES: &str = "code_lines";
    pub const CONTENTS: &str = "contents";
    pub const REPO_LOCATION: &str = "repo_location";
    pub const CODE_OWNER: &str = "code_owner";
    pub const CODE_ID: &str = "code_id";
    pub const MODIFIED: &str = "modified";
    pub const REVISION: &str = "revision";
    pub const DATE_YEAR_MONTH_DAY: &str = "date_year_month_day";
    pub const DATE_YEAR_MONTH: &str = "date_year_month";
    pub const DATE_YEAR: &str = "date_year";
    pub const MESSAGE: &str = "message";
    pub const DELETED: &str = "deleted";
    pub const ID: &str = "id";

    pub const LANGUAGE_FACET: &str = "language_facet";
    pub const REPO_FACET: &str = "repo_facet";
    pub const OWNER_FACET: &str = "owner_facet";
    pub const REVISION_FACET: &str = "revision_facet";
    pub const DELETED_FACET: &str = "deleted_facet";
    pub const DATE_YEAR_MONTH_DAY_FACET: &str = "date_year_month_day_facet";
    pub const DATE_YEAR_MONTH_FACET: &str = "date_year_month_facet";
    pub const DATE_YEAR_FACET: &str = "date_year_facet";
}

fn named_field(schema: &Schema, name: &str) -> Result<Field, IndexError> {
    schema
        .get_field(name)
        .map_err(|_| IndexError::SchemaMismatch(format!("missing {name} field")))
}

/// One index flavor: where its fields live and how a pending document
/// becomes an entry.
///
/// The batch engine in `indexer` is written once against this trait; the
/// two flags capture the content/time asymmetries that are part of the
/// design rather than accidents.
pub trait SchemaFlavor: Sized {
    /// Flavor name for logging.
    fn name(&self) -> &'static str;

    /// Build the tantivy schema used when creating a fresh index.
    fn build() -> Schema;

    /// Resolve field handles against an existing index's schema.
    fn from_schema(schema: Schema) -> Result<Self, IndexError>;

    /// Field holding the primary-key term.
    fn primary_key_field(&self) -> Field;

    /// Primary-key value for a pending document.
    fn primary_key(&self, doc: &CodeDocument) -> String;

    /// Whether the searchable body leads with file name and location.
    fn body_includes_path_parts(&self) -> bool;

    /// Whether "interesting keyword" extraction feeds the body.
    fn wants_interesting_keywords(&self) -> bool;

    /// Build the index entry for one pending document.
    fn build_document(
        &self,
        doc: &CodeDocument,
        body: &str,
        modified_ms: u64,
    ) -> TantivyDocument;

    /// Lower-cased searchable body for one pending document.
    fn searchable_body(&self, doc: &CodeDocument) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.body_includes_path_parts() {
            parts.push(doc.file_name.clone());
            parts.push(doc.file_location_filename.clone());
            parts.push(doc.file_location.clone());
        }

        parts.push(split_keywords(&doc.contents));
        parts.push(code_clean_pipeline(&doc.contents));

        if self.wants_interesting_keywords() {
            parts.push(find_interesting_keywords(&doc.contents));
        }

        parts.retain(|part| !part.is_empty());
        parts.join(" ").to_lowercase()
    }
}

/// Field handles for the content index (current repository state).
#[derive(Debug, Clone)]
pub struct ContentSchema {
    schema: Schema,
    /// Primary key: normalized full path (STRING | STORED)
    pub path: Field,
    pub repo_name: Field,
    /// Untokenized copy of the repository name, used as the deletion key
    pub repo_name_raw: Field,
    pub file_name: Field,
    pub file_location: Field,
    pub file_location_filename: Field,
    pub md5_hash: Field,
    pub language_name: Field,
    pub code_lines: Field,
    /// Processed searchable body (TEXT, not stored)
    pub contents: Field,
    pub repo_location: Field,
    pub code_owner: Field,
    /// Digest of the path, a secondary correlation id
    pub code_id: Field,
    /// When this entry was last written, epoch milliseconds
    pub modified: Field,
    pub language_facet: Field,
    pub repo_facet: Field,
    pub owner_facet: Field,
}

impl ContentSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl SchemaFlavor for ContentSchema {
    fn name(&self) -> &'static str {
        "content"
    }

    fn build() -> Schema {
        use field_names::*;

        let mut builder = Schema::builder();
        builder.add_text_field(PATH, STRING | STORED);
        builder.add_text_field(REPO_NAME, TEXT | STORED);
        builder.add_text_field(REPO_NAME_RAW, STRING);
        builder.add_text_field(FILE_NAME, TEXT | STORED);
        builder.add_text_field(FILE_LOCATION, TEXT | STORED);
        builder.add_text_field(FILE_LOCATION_FILENAME, TEXT | STORED);
        builder.add_text_field(MD5_HASH, TEXT | STORED);
        builder.add_text_field(LANGUAGE_NAME, TEXT | STORED);
        builder.add_u64_field(CODE_LINES, INDEXED | STORED);
        builder.add_text_field(CONTENTS, TEXT);
        builder.add_text_field(REPO_LOCATION, TEXT | STORED);
        builder.add_text_field(CODE_OWNER, TEXT | STORED);
        builder.add_text_field(CODE_ID, TEXT | STORED);
        builder.add_u64_field(MODIFIED, INDEXED | STORED | FAST);
        builder.add_facet_field(LANGUAGE_FACET, FacetOptions::default());
        builder.add_facet_field(REPO_FACET, FacetOptions::default());
        builder.add_facet_field(OWNER_FACET, FacetOptions::default());
        builder.build()
    }

    fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        use field_names::*;

        Ok(Self {
            path: named_field(&schema, PATH)?,
            repo_name: named_field(&schema, REPO_NAME)?,
            repo_name_raw: named_field(&schema, REPO_NAME_RAW)?,
            file_name: named_field(&schema, FILE_NAME)?,
            file_location: named_field(&schema, FILE_LOCATION)?,
            file_location_filename: named_field(&schema, FILE_LOCATION_FILENAME)?,
            md5_hash: named_field(&schema, MD5_HASH)?,
            language_name: named_field(&schema, LANGUAGE_NAME)?,
            code_lines: named_field(&schema, CODE_LINES)?,
            contents: named_field(&schema, CONTENTS)?,
            repo_location: named_field(&schema, REPO_LOCATION)?,
            code_owner: named_field(&schema, CODE_OWNER)?,
            code_id: named_field(&schema, CODE_ID)?,
            modified: named_field(&schema, MODIFIED)?,
            language_facet: named_field(&schema, LANGUAGE_FACET)?,
            repo_facet: named_field(&schema, REPO_FACET)?,
            owner_facet: named_field(&schema, OWNER_FACET)?,
            schema,
        })
    }

    fn primary_key_field(&self) -> Field {
        self.path
    }

    fn primary_key(&self, doc: &CodeDocument) -> String {
        doc.path.clone()
    }

    fn body_includes_path_parts(&self) -> bool {
        true
    }

    fn wants_interesting_keywords(&self) -> bool {
        true
    }

    fn build_document(
        &self,
        doc: &CodeDocument,
        body: &str,
        modified_ms: u64,
    ) -> TantivyDocument {
        content_document(self, doc, body, modified_ms)
    }
}

/// Field handles for the time index (one entry per path + revision).
#[derive(Debug, Clone)]
pub struct TimeSchema {
    schema: Schema,
    /// Primary key: normalized full path + ":" + revision (STRING | STORED)
    pub path: Field,
    pub repo_name: Field,
    pub file_name: Field,
    pub file_location: Field,
    pub file_location_filename: Field,
    pub md5_hash: Field,
    pub language_name: Field,
    pub code_lines: Field,
    pub contents: Field,
    pub repo_location: Field,
    pub code_owner: Field,
    pub revision: Field,
    pub date_year_month_day: Field,
    pub date_year_month: Field,
    pub date_year: Field,
    pub message: Field,
    pub deleted: Field,
    pub modified: Field,
    pub language_facet: Field,
    pub repo_facet: Field,
    pub owner_facet: Field,
    pub revision_facet: Field,
    pub deleted_facet: Field,
    pub date_year_month_day_facet: Field,
    pub date_year_month_facet: Field,
    pub date_year_facet: Field,
}

impl TimeSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl SchemaFlavor for TimeSchema {
    fn name(&self) -> &'static str {
        "time"
    }

    fn build() -> Schema {
        use field_names::*;

        let mut builder = Schema::builder();
        builder.add_text_field(PATH, STRING | STORED);
        builder.add_text_field(REPO_NAME, TEXT | STORED);
        builder.add_text_field(FILE_NAME, TEXT | STORED);
        builder.add_text_field(FILE_LOCATION, TEXT | STORED);
        builder.add_text_field(FILE_LOCATION_FILENAME, TEXT | STORED);
        builder.add_text_field(MD5_HASH, TEXT | STORED);
        builder.add_text_field(LANGUAGE_NAME, TEXT | STORED);
        builder.add_u64_field(CODE_LINES, INDEXED | STORED);
        builder.add_text_field(CONTENTS, TEXT);
        builder.add_text_field(REPO_LOCATION, TEXT | STORED);
        builder.add_text_field(CODE_OWNER, TEXT | STORED);
        builder.add_text_field(REVISION, TEXT | STORED);
        builder.add_text_field(DATE_YEAR_MONTH_DAY, TEXT | STORED);
        builder.add_text_field(DATE_YEAR_MONTH, TEXT | STORED);
        builder.add_text_field(DATE_YEAR, TEXT | STORED);
        builder.add_text_field(MESSAGE, TEXT | STORED);
        builder.add_text_field(DELETED, TEXT | STORED);
        builder.add_u64_field(MODIFIED, INDEXED | STORED | FAST);
        builder.add_facet_field(LANGUAGE_FACET, FacetOptions::default());
        builder.add_facet_field(REPO_FACET, FacetOptions::default());
        builder.add_facet_field(OWNER_FACET, FacetOptions::default());
        builder.add_facet_field(REVISION_FACET, FacetOptions::default());
        builder.add_facet_field(DELETED_FACET, FacetOptions::default());
        builder.add_facet_field(DATE_YEAR_MONTH_DAY_FACET, FacetOptions::default());
        builder.add_facet_field(DATE_YEAR_MONTH_FACET, FacetOptions::default());
        builder.add_facet_field(DATE_YEAR_FACET, FacetOptions::default());
        builder.build()
    }

    fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        use field_names::*;

        Ok(Self {
            path: named_field(&schema, PATH)?,
            repo_name: named_field(&schema, REPO_NAME)?,
            file_name: named_field(&schema, FILE_NAME)?,
            file_location: named_field(&schema, FILE_LOCATION)?,
            file_location_filename: named_field(&schema, FILE_LOCATION_FILENAME)?,
            md5_hash: named_field(&schema, MD5_HASH)?,
            language_name: named_field(&schema, LANGUAGE_NAME)?,
            code_lines: named_field(&schema, CODE_LINES)?,
            contents: named_field(&schema, CONTENTS)?,
            repo_location: named_field(&schema, REPO_LOCATION)?,
            code_owner: named_field(&schema, CODE_OWNER)?,
            revision: named_field(&schema, REVISION)?,
            date_year_month_day: named_field(&schema, DATE_YEAR_MONTH_DAY)?,
            date_year_month: named_field(&schema, DATE_YEAR_MONTH)?,
            date_year: named_field(&schema, DATE_YEAR)?,
            message: named_field(&schema, MESSAGE)?,
            deleted: named_field(&schema, DELETED)?,
            modified: named_field(&schema, MODIFIED)?,
            language_facet: named_field(&schema, LANGUAGE_FACET)?,
            repo_facet: named_field(&schema, REPO_FACET)?,
            owner_facet: named_field(&schema, OWNER_FACET)?,
            revision_facet: named_field(&schema, REVISION_FACET)?,
            deleted_facet: named_field(&schema, DELETED_FACET)?,
            date_year_month_day_facet: named_field(&schema, DATE_YEAR_MONTH_DAY_FACET)?,
            date_year_month_facet: named_field(&schema, DATE_YEAR_MONTH_FACET)?,
            date_year_facet: named_field(&schema, DATE_YEAR_FACET)?,
            schema,
        })
    }

    fn primary_key_field(&self) -> Field {
        self.path
    }

    fn primary_key(&self, doc: &CodeDocument) -> String {
        format!("{}:{}", doc.path, doc.revision)
    }

    fn body_includes_path_parts(&self) -> bool {
        false
    }

    // The time index deliberately indexes fewer derived tokens than the
    // content index.
    fn wants_interesting_keywords(&self) -> bool {
        false
    }

    fn build_document(
        &self,
        doc: &CodeDocument,
        body: &str,
        modified_ms: u64,
    ) -> TantivyDocument {
        time_document(self, doc, body, modified_ms)
    }
}

/// Field handles for the minimal index: numeric id plus processed text.
#[derive(Debug, Clone)]
pub struct MinimalSchema {
    schema: Schema,
    /// Primary key: decimal row id (STRING | STORED)
    pub id: Field,
    /// Processed searchable body (TEXT, not stored)
    pub contents: Field,
}

impl MinimalSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn build() -> Schema {
        use field_names::*;

        let mut builder = Schema::builder();
        builder.add_text_field(ID, STRING | STORED);
        builder.add_text_field(CONTENTS, TEXT);
        builder.build()
    }

    pub fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        use field_names::*;

        Ok(Self {
            id: named_field(&schema, ID)?,
            contents: named_field(&schema, CONTENTS)?,
            schema,
        })
    }
}
