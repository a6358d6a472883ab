/// Reduces raw sentence text to an ordered sequence of tokens.
///
/// Subword segmenters live outside this crate; anything that can be called
/// per sentence plugs in here.
pub trait Tokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String>;

    fn count_tokens(&self, sentence: &str) -> usize {
        self.tokenize(sentence).len()
    }
}

/// Splits on Unicode whitespace. Punctuation stays attached to words.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence.split_whitespace().map(str::to_string).collect()
    }

    fn count_tokens(&self, sentence: &str) -> usize {
        sentence.split_whitespace().count()
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        self(sentence)
    }
}
