//! Keyword search over the site's articles. The index is built with
//! [`tantivy`] during a site build and written next to the pages; a reader
//! opens it lazily through an [`IndexHandle`] and queries it. Until the handle
//! is loaded, every search returns no results.
//!
//! Titles, subtitles and tag names are tokenized with tantivy's English
//! stemmer, so a query for "election" finds "Elections". Hits come back in
//! relevance order.

use crate::post::Post;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, TantivyError};

/// Lowercases and stems English words.
const TOKENIZER: &str = "en_stem";

/// The indexing memory budget. Tantivy's minimum for a single thread.
const WRITER_MEMORY: usize = 15_000_000;

/// The record shown for a search hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub excerpt: String,
    pub slug: String,
    pub title: String,
}

#[derive(Clone, Copy)]
struct Fields {
    slug: Field,
    title: Field,
    subtitle: Field,
    tags: Field,
}

impl Fields {
    fn schema() -> (Schema, Fields) {
        let text = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );
        let mut builder = Schema::builder();
        let fields = Fields {
            slug: builder.add_text_field("slug", STRING | STORED),
            title: builder.add_text_field("title", text.clone() | STORED),
            subtitle: builder.add_text_field("subtitle", text.clone() | STORED),
            tags: builder.add_text_field("tags", text),
        };
        (builder.build(), fields)
    }

    fn from_schema(schema: &Schema) -> Result<Fields> {
        Ok(Fields {
            slug: schema.get_field("slug")?,
            title: schema.get_field("title")?,
            subtitle: schema.get_field("subtitle")?,
            tags: schema.get_field("tags")?,
        })
    }

    fn searchable(&self) -> Vec<Field> {
        vec![self.title, self.subtitle, self.tags]
    }
}

/// A full-text index of posts. Each document stores the record returned for a
/// hit; the post's subtitle doubles as the excerpt.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    fields: Fields,
}

impl SearchIndex {
    /// Indexes posts in memory.
    pub fn build(posts: &[Post]) -> Result<SearchIndex> {
        let (schema, fields) = Fields::schema();
        SearchIndex::populate(Index::create_in_ram(schema), fields, posts)
    }

    /// Indexes posts into `dir`, which must not hold an index yet.
    pub fn create_in_dir(posts: &[Post], dir: &Path) -> Result<SearchIndex> {
        std::fs::create_dir_all(dir).map_err(|e| Error::Io(dir.to_owned(), e))?;
        let (schema, fields) = Fields::schema();
        SearchIndex::populate(Index::create_in_dir(dir, schema)?, fields, posts)
    }

    /// Opens an index previously written by [`SearchIndex::create_in_dir`].
    pub fn open(dir: &Path) -> Result<SearchIndex> {
        let index = Index::open_in_dir(dir)?;
        let fields = Fields::from_schema(&index.schema())?;
        SearchIndex::with_reader(index, fields)
    }

    fn populate(index: Index, fields: Fields, posts: &[Post]) -> Result<SearchIndex> {
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY)?;
        for post in posts {
            let mut doc = TantivyDocument::default();
            doc.add_text(fields.slug, &post.slug);
            doc.add_text(fields.title, &post.title);
            doc.add_text(fields.subtitle, &post.subtitle);
            for tag in &post.tags {
                doc.add_text(fields.tags, &tag.name);
            }
            writer.add_document(doc)?;
        }
        writer.commit()?;
        log::debug!("indexed {} posts for search", posts.len());
        SearchIndex::with_reader(index, fields)
    }

    fn with_reader(index: Index, fields: Fields) -> Result<SearchIndex> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(SearchIndex {
            index,
            reader,
            fields,
        })
    }

    /// The number of indexed posts.
    pub fn len(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored records of every post matching any query term, best
    /// match first. Query syntax errors are tolerated; whatever parses is
    /// searched.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let searcher = self.reader.searcher();
        let limit = searcher.num_docs() as usize;
        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let parser = QueryParser::for_index(&self.index, self.fields.searchable());
        let (query, errors) = parser.parse_query_lenient(query);
        for err in errors {
            log::debug!("ignoring part of search query: {}", err);
        }

        let hits = searcher.search(&query, &TopDocs::with_limit(limit))?;
        let mut results = Vec::with_capacity(hits.len());
        for (_score, address) in hits {
            let doc: TantivyDocument = searcher.doc(address)?;
            results.push(SearchResult {
                excerpt: stored_text(&doc, self.fields.subtitle),
                slug: stored_text(&doc, self.fields.slug),
                title: stored_text(&doc, self.fields.title),
            });
        }
        Ok(results)
    }
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_owned()
}

/// A lazily opened [`SearchIndex`]. A handle starts out not ready; once
/// [`IndexHandle::load`] succeeds it serves queries.
#[derive(Default)]
pub struct IndexHandle {
    index: OnceLock<SearchIndex>,
}

impl IndexHandle {
    pub fn new() -> IndexHandle {
        IndexHandle::default()
    }

    /// A handle that is ready with `index`.
    pub fn ready(index: SearchIndex) -> IndexHandle {
        let handle = IndexHandle::new();
        let _ = handle.index.set(index);
        handle
    }

    pub fn is_ready(&self) -> bool {
        self.index.get().is_some()
    }

    /// Opens the index in `dir` unless it is already loaded.
    pub fn load(&self, dir: &Path) -> Result<&SearchIndex> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let index = SearchIndex::open(dir)?;
        log::debug!("loaded search index with {} documents", index.len());
        Ok(self.index.get_or_init(|| index))
    }

    /// Searches the index. An empty query, a handle that isn't ready or a
    /// failing search yields no results.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.index.get() {
            Some(index) if !query.is_empty() => index.search(query).unwrap_or_else(|e| {
                log::warn!("search failed: {}", e);
                Vec::new()
            }),
            _ => Vec::new(),
        }
    }
}

/// The highlighted position in a list of search results. Moving never wraps
/// around; the cursor stops at either end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub active: usize,
}

impl Selection {
    pub fn down(&mut self, len: usize) {
        if self.active + 1 < len {
            self.active += 1;
        }
    }

    pub fn up(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    /// Keeps the cursor on a result when the list shrinks to `len` items.
    pub fn clamp(&mut self, len: usize) {
        self.active = self.active.min(len.saturating_sub(1));
    }

    /// The selected result, if any.
    pub fn selected<'a>(&self, results: &'a [SearchResult]) -> Option<&'a SearchResult> {
        results.get(self.active)
    }
}

/// The result of a fallible search-index operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building, opening or querying a [`SearchIndex`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the index directory can't be created.
    Io(PathBuf, std::io::Error),

    /// Returned for errors from the index itself.
    Index(TantivyError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(path, err) => {
                write!(f, "creating search index `{}`: {}", path.display(), err)
            }
            Error::Index(err) => write!(f, "search index: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(_, err) => Some(err),
            Error::Index(err) => Some(err),
        }
    }
}

impl From<TantivyError> for Error {
    /// Converts a [`TantivyError`] into an [`Error`]. It allows us to use the
    /// `?` operator on index operations.
    fn from(err: TantivyError) -> Error {
        Error::Index(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::derive::MissingPipe;

    fn posts() -> Vec<Post> {
        let mut posts: Vec<Post> = serde_json::from_str(
            r#"[
                {"id": "1", "slug": "rust-tips", "title": "Rust tips",
                 "excerpt": "Ownership explained | caption",
                 "published_at": "2020-03-01T00:00:00Z",
                 "tags": [{"slug": "tech", "name": "Tech"}]},
                {"id": "2", "slug": "go-news", "title": "Go news",
                 "excerpt": "Generics at last | caption",
                 "published_at": "2020-02-01T00:00:00Z",
                 "tags": [{"slug": "tech", "name": "Tech"}]}
            ]"#,
        )
        .unwrap();
        for post in posts.iter_mut() {
            post.augment(MissingPipe::Empty);
        }
        posts
    }

    #[test]
    fn test_search() -> Result<()> {
        let index = SearchIndex::build(&posts())?;
        let results = index.search("RUST")?;
        assert_eq!(1, results.len());
        assert_eq!("rust-tips", results[0].slug);
        assert_eq!("Rust tips", results[0].title);
        assert_eq!("Ownership explained", results[0].excerpt);
        Ok(())
    }

    #[test]
    fn test_search_matches_inflected_words() -> Result<()> {
        let mut post: Post = serde_json::from_str(
            r#"{"id": "3", "slug": "elections-in-asia", "title": "Elections in Asia",
                "excerpt": "Voters explained | caption",
                "published_at": "2020-04-01T00:00:00Z"}"#,
        )
        .unwrap();
        post.augment(MissingPipe::Empty);
        let index = SearchIndex::build(&[post])?;
        for query in ["election", "elections", "explain", "voter"] {
            let results = index.search(query)?;
            assert_eq!(1, results.len(), "no hit for {}", query);
            assert_eq!("elections-in-asia", results[0].slug);
        }
        Ok(())
    }

    #[test]
    fn test_search_unions_terms_without_duplicates() -> Result<()> {
        let index = SearchIndex::build(&posts())?;
        let mut slugs: Vec<String> = index
            .search("generics tech rust")?
            .into_iter()
            .map(|r| r.slug)
            .collect();
        slugs.sort();
        assert_eq!(vec!["go-news".to_owned(), "rust-tips".to_owned()], slugs);
        Ok(())
    }

    #[test]
    fn test_search_no_match() -> Result<()> {
        let index = SearchIndex::build(&posts())?;
        assert!(index.search("python")?.is_empty());
        assert!(index.search("")?.is_empty());
        assert!(index.search("rust AND (")?.len() <= 1);
        Ok(())
    }

    #[test]
    fn test_empty_index() -> Result<()> {
        let index = SearchIndex::build(&[])?;
        assert!(index.is_empty());
        assert!(index.search("rust")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unready_handle_returns_nothing() {
        let handle = IndexHandle::new();
        assert!(!handle.is_ready());
        assert!(handle.search("rust").is_empty());
    }

    #[test]
    fn test_handle_loads_lazily() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let index_dir = dir.path().join("search-index");
        SearchIndex::create_in_dir(&posts(), &index_dir)?;

        let handle = IndexHandle::new();
        assert!(handle.load(&dir.path().join("missing")).is_err());
        assert!(!handle.is_ready());
        assert!(handle.search("ownership").is_empty());

        handle.load(&index_dir)?;
        assert!(handle.is_ready());
        assert_eq!(1, handle.search("ownership").len());
        Ok(())
    }

    #[test]
    fn test_ready_handle_ignores_empty_query() -> Result<()> {
        let handle = IndexHandle::ready(SearchIndex::build(&posts())?);
        assert!(handle.search("").is_empty());
        assert_eq!(2, handle.search("tech").len());
        Ok(())
    }

    #[test]
    fn test_selection_clamps() {
        let mut selection = Selection::default();
        selection.up();
        assert_eq!(0, selection.active);

        selection.down(3);
        selection.down(3);
        selection.down(3);
        assert_eq!(2, selection.active);

        selection.clamp(1);
        assert_eq!(0, selection.active);

        selection.down(0);
        selection.clamp(0);
        assert_eq!(0, selection.active);
    }
}
