use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};
use unicode_segmentation::UnicodeSegmentation;

use docfuse_core::traits::Segmenter;

const ENGLISH_STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
];

/// Default segmenter: Unicode (UAX #29) word boundaries, lowercased.
///
/// Han ideographs and hiragana break per character, so Chinese and Japanese
/// text without spaces still yields lexical tokens. Katakana runs stay whole
/// (UAX #29 WB13). Punctuation and whitespace are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl UnicodeSegmenter {
	pub fn new() -> Self { Self }
}

impl Segmenter for UnicodeSegmenter {
	fn tokenize(&self, text: &str) -> Vec<String> {
		text.unicode_words().map(|w| w.to_lowercase()).collect()
	}
}

/// Tantivy analyzer chain for English corpora: simple tokenizer, lowercasing
/// and an English stop-word filter.
#[derive(Clone)]
pub struct StopwordSegmenter {
	analyzer: TextAnalyzer,
}

impl StopwordSegmenter {
	pub fn new() -> Self {
		Self::with_stop_words(ENGLISH_STOP_WORDS.iter().map(|s| s.to_string()))
	}

	pub fn with_stop_words<I: IntoIterator<Item = String>>(stop_words: I) -> Self {
		let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
			.filter(LowerCaser)
			.filter(StopWordFilter::remove(stop_words))
			.build();
		Self { analyzer }
	}
}

impl Default for StopwordSegmenter {
	fn default() -> Self { Self::new() }
}

impl Segmenter for StopwordSegmenter {
	fn tokenize(&self, text: &str) -> Vec<String> {
		// token_stream needs &mut; analyzers are cheap to clone
		let mut analyzer = self.analyzer.clone();
		let mut stream = analyzer.token_stream(text);
		let mut tokens = Vec::new();
		while stream.advance() { tokens.push(stream.token().text.clone()); }
		tokens
	}
}
