//! In-memory Tantivy index over normalized records.
//!
//! Shared by the precise and fuzzy strategies, which only differ in how a
//! single query token is matched against indexed terms.
//!
//! Every query token must match in at least one field. Per token the best
//! matching field contributes its weight, and the record's match confidence
//! is the mean over all tokens.

use tantivy::collector::TopDocs;
use tantivy::query::{
    BooleanQuery, BoostQuery, DisjunctionMaxQuery, FuzzyTermQuery, Occur, Query, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption, STORED, STRING, Schema, TEXT, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::debug;

use crate::config::ScoreConfig;
use crate::query::SearchMode;
use crate::record::{ResultType, SearchResultItem};

/// Heap size for the index writer (50MB).
const WRITER_HEAP_SIZE: usize = 50_000_000;

/// Largest edit distance the Levenshtein automata support.
pub const MAX_FUZZY_DISTANCE: u8 = 2;

/// How a query token is matched against indexed terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMatch {
    /// The indexed term starts with the token.
    Prefix,
    /// The indexed term starts with something within `distance` edits of
    /// the token. A transposition counts as one edit.
    Fuzzy { distance: u8 },
}

/// Contribution of a match in each field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub title: f32,
    pub tags: f32,
    pub url: f32,
    pub folder: f32,
}

impl FieldWeights {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_config(config: &ScoreConfig) -> Self {
        Self {
            title: config.title_weight as f32,
            tags: config.tag_weight as f32,
            url: config.url_weight as f32,
            folder: config.folder_weight as f32,
        }
    }
}

/// Schema field handles for the Tantivy index.
#[derive(Debug, Clone)]
struct SchemaFields {
    title: Field,
    tags: Field,
    url: Field,
    folder: Field,
    kind: Field,
    position: Field,
}

/// A rebuildable in-RAM index of records.
pub struct RecordIndex {
    index: Index,
    reader: IndexReader,
    fields: SchemaFields,
    weights: FieldWeights,
    records: Vec<SearchResultItem>,
}

impl RecordIndex {
    /// Build the Tantivy schema for records.
    ///
    /// Fields:
    /// - `title`, `tags`, `url`, `folder`: searchable text
    /// - `kind`: exact record type, used to scope a search to one source
    /// - `position`: stored offset into the record list
    fn build_schema() -> (Schema, SchemaFields) {
        let mut schema_builder = Schema::builder();

        let title = schema_builder.add_text_field("title", TEXT);
        let tags = schema_builder.add_text_field("tags", TEXT);
        let url = schema_builder.add_text_field("url", TEXT);
        let folder = schema_builder.add_text_field("folder", TEXT);
        let kind = schema_builder.add_text_field("kind", STRING);
        let position = schema_builder.add_u64_field("position", STORED);

        let schema = schema_builder.build();
        let fields = SchemaFields {
            title,
            tags,
            url,
            folder,
            kind,
            position,
        };

        (schema, fields)
    }

    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index reader cannot be created.
    pub fn new(weights: FieldWeights) -> anyhow::Result<Self> {
        let (schema, fields) = Self::build_schema();
        let index = Index::create_in_ram(schema);
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            fields,
            weights,
            records: Vec::new(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the indexed records.
    ///
    /// Search engine records are never indexed; they are produced per query.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or committing the index fails.
    pub fn rebuild(&mut self, records: &[SearchResultItem]) -> anyhow::Result<()> {
        let mut writer: IndexWriter = self.index.writer_with_num_threads(1, WRITER_HEAP_SIZE)?;
        writer.delete_all_documents()?;

        let mut kept = Vec::with_capacity(records.len());
        for record in records.iter().filter(|r| r.kind != ResultType::Search) {
            let mut doc = TantivyDocument::new();
            doc.add_text(self.fields.title, record.title.as_deref().unwrap_or_default());
            doc.add_text(self.fields.url, &record.url);
            if let Some(tags) = &record.tags {
                doc.add_text(self.fields.tags, tags.join(" "));
            }
            if let Some(folders) = &record.folder {
                doc.add_text(self.fields.folder, folders.join(" "));
            }
            doc.add_text(self.fields.kind, record.kind.as_str());
            doc.add_u64(self.fields.position, kept.len() as u64);

            writer.add_document(doc)?;
            kept.push(record.clone());
        }

        writer.commit()?;
        self.reader.reload()?;
        self.records = kept;

        debug!("Indexed {} records", self.records.len());
        Ok(())
    }

    /// Search records matching every token of `term`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be executed.
    pub fn search(
        &self,
        term: &str,
        mode: SearchMode,
        matching: TokenMatch,
    ) -> anyhow::Result<Vec<SearchResultItem>> {
        let scope = match mode {
            SearchMode::All => None,
            SearchMode::Bookmarks => Some(ResultType::Bookmark),
            SearchMode::History => Some(ResultType::History),
            SearchMode::Tabs => Some(ResultType::Tab),
            SearchMode::Search | SearchMode::Tags | SearchMode::Folders => return Ok(vec![]),
        };

        let tokens = tokenize(term);
        if tokens.is_empty() || self.records.is_empty() {
            return Ok(vec![]);
        }

        let query = self.build_query(&tokens, scope, matching);
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.records.len()))?;

        #[allow(clippy::cast_precision_loss)]
        let token_count = tokens.len() as f64;
        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let Some(record) = doc
                .get_first(self.fields.position)
                .and_then(|v| v.as_u64())
                .and_then(|p| usize::try_from(p).ok())
                .and_then(|p| self.records.get(p))
            else {
                continue;
            };

            let mut item = record.clone();
            item.search_score = Some((f64::from(score) / token_count).clamp(0.0, 1.0));
            results.push(item);
        }

        Ok(results)
    }

    fn build_query(
        &self,
        tokens: &[String],
        scope: Option<ResultType>,
        matching: TokenMatch,
    ) -> Box<dyn Query> {
        let weighted_fields = [
            (self.fields.title, self.weights.title),
            (self.fields.tags, self.weights.tags),
            (self.fields.url, self.weights.url),
            (self.fields.folder, self.weights.folder),
        ];

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = tokens
            .iter()
            .map(|token| {
                let per_field: Vec<Box<dyn Query>> = weighted_fields
                    .iter()
                    .map(|(field, weight)| {
                        let term = Term::from_field_text(*field, token);
                        Box::new(BoostQuery::new(token_query(term, matching), *weight))
                            as Box<dyn Query>
                    })
                    .collect();
                (
                    Occur::Must,
                    Box::new(DisjunctionMaxQuery::new(per_field)) as Box<dyn Query>,
                )
            })
            .collect();

        // Zero boost: the scope restricts matches without adding to the score.
        if let Some(kind) = scope {
            let kind_term = Term::from_field_text(self.fields.kind, kind.as_str());
            let kind_query = TermQuery::new(kind_term, IndexRecordOption::Basic);
            clauses.push((Occur::Must, Box::new(BoostQuery::new(Box::new(kind_query), 0.0))));
        }

        Box::new(BooleanQuery::new(clauses))
    }
}

fn token_query(term: Term, matching: TokenMatch) -> Box<dyn Query> {
    match matching {
        TokenMatch::Prefix => Box::new(FuzzyTermQuery::new_prefix(term, 0, true)),
        TokenMatch::Fuzzy { distance } => Box::new(FuzzyTermQuery::new_prefix(
            term,
            distance.min(MAX_FUZZY_DISTANCE),
            true,
        )),
    }
}

/// Split a term the way the default text tokenizer splits indexed text.
fn tokenize(term: &str) -> Vec<String> {
    term.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
