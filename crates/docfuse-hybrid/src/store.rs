use docfuse_core::records::extract_text;
use docfuse_core::traits::Segmenter;
use docfuse_core::types::{DocId, Document, Record};

/// Ordered documents of one corpus generation. A document's position is its id.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
}

impl DocumentStore {
    /// Derive `text` and `tokens` for every record, preserving record order.
    pub fn build(records: Vec<Record>, text_fields: &[String], segmenter: &dyn Segmenter) -> Self {
        let docs = records
            .into_iter()
            .map(|record| {
                let text = extract_text(&record, text_fields);
                let tokens = segmenter.tokenize(&text);
                Document { record, text, tokens }
            })
            .collect();
        Self { docs }
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn get(&self, id: DocId) -> Option<&Document> { self.docs.get(id) }

    pub fn record(&self, id: DocId) -> Option<&Record> { self.docs.get(id).map(|d| &d.record) }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> { self.docs.iter() }

    pub fn texts(&self) -> Vec<String> { self.docs.iter().map(|d| d.text.clone()).collect() }
}
