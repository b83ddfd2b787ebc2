//! # Tokenizadores
//!
//! O decodificador não decide onde os tokens começam e terminam: ele recebe um
//! [`Tokenizer`] do chamador. Este módulo oferece alguns prontos.
//!
//! ## Contrato
//!
//! Concatenar os tokens devolvidos reproduz **exatamente** o texto de entrada:
//! nenhum caractere descartado (nem espaços), nenhum duplicado. Espaços e
//! pontuação viram tokens próprios.
//!
//! ## Modos
//!
//! - **WordPunct**: sequências alfanuméricas (`[^\W_]+`) formam um token; cada
//!   outro caractere é um token sozinho. `"P. D."` → `"P"`, `"."`, `" "`, `"D"`, `"."`.
//! - **CharLevel**: cada caractere é um token.
//! - **WordBounds**: fronteiras de palavra Unicode (UAX #29).
//!
//! ```rust
//! use brs_core::tokenizer::{tokenize_with_mode, TokenizerMode};
//!
//! let tokens = tokenize_with_mode("Hello, world!", TokenizerMode::WordPunct);
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Hello", ",", " ", "world", "!"]);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// Mantém a posição exata (em bytes) no texto de onde veio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Hello", ",", " ").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Estratégias de tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// **Palavra/Pontuação**: runs alfanuméricos juntos, todo o resto caractere a caractere.
    #[default]
    WordPunct,
    /// **Caractere**: cada caractere é um token.
    CharLevel,
    /// **Fronteiras Unicode**: segmentação de palavras UAX #29.
    WordBounds,
}

/// Função de tokenização consumida pelo decodificador.
///
/// Qualquer closure `Fn(&str) -> Vec<String>` serve.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

impl Tokenizer for TokenizerMode {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize_with_mode(text, *self)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }
}

/// Tokeniza um texto usando o modo padrão (`WordPunct`).
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_mode(text, TokenizerMode::WordPunct)
}

/// Tokeniza um texto com o modo especificado.
pub fn tokenize_with_mode(text: &str, mode: TokenizerMode) -> Vec<Token> {
    let mut tokens = match mode {
        TokenizerMode::WordPunct => tokenize_word_punct(text),
        TokenizerMode::CharLevel => tokenize_char_level(text),
        TokenizerMode::WordBounds => tokenize_word_bounds(text),
    };

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Padrão constante: a compilação só falharia com o literal abaixo errado.
fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[^\W_]+").expect("padrão de palavra é uma regex válida"))
}

fn tokenize_word_punct(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    for m in word_pattern().find_iter(text) {
        push_chars(&mut tokens, text, offset, m.start());
        push_token(&mut tokens, m.as_str().to_string(), m.start(), m.end());
        offset = m.end();
    }
    push_chars(&mut tokens, text, offset, text.len());

    tokens
}

fn tokenize_char_level(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_chars(&mut tokens, text, 0, text.len());
    tokens
}

fn tokenize_word_bounds(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .map(|(start, word)| Token {
            text: word.to_string(),
            start,
            end: start + word.len(),
            index: 0,
        })
        .collect()
}

/// Emite cada caractere de `text[from..to]` como um token.
fn push_chars(tokens: &mut Vec<Token>, text: &str, from: usize, to: usize) {
    for (i, c) in text[from..to].char_indices() {
        let start = from + i;
        push_token(tokens, c.to_string(), start, start + c.len_utf8());
    }
}

fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0, // será atribuído depois
    });
}
