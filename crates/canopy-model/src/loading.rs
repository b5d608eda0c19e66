// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tree instance loader.
//!
//! Reads whitespace-delimited tree instances and turns them into a validated
//! `Tree`. The format is the vertex count followed by one `u v w` triple per
//! edge:
//!
//! ```raw
//! n            // number of vertices
//! u_1 v_1 w_1  // first edge
//! ...
//! u_{n-1} v_{n-1} w_{n-1}
//! ```
//!
//! Line breaks carry no meaning; tokens may be spread over lines freely.
//! A `#` starts a comment that runs to the end of the line. Vertex ids are
//! 1-based unless the loader is configured with `zero_based_ids`, in which
//! case every id is shifted up by one on the way in. Anything left after the
//! last edge is reported as trailing input rather than silently ignored.

use crate::{
    index::VertexIndex,
    tree::{TopologyError, Tree, TreeBuilder},
};
use canopy_core::num::weight::TreeWeight;
use std::{
    collections::VecDeque,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the tree loading process.
#[derive(Debug)]
pub enum TreeLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input ended before all announced edges were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected type.
    Parse(ParseTokenError),
    /// Input remained after the last edge.
    TrailingInput(String),
    /// The edges do not form a valid tree.
    Topology(TopologyError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The token that failed to parse.
    pub token: String,
    /// The 1-based line the token appeared on.
    pub line: usize,
    /// What the token was supposed to be (e.g., "vertex id").
    pub expected: &'static str,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: could not parse '{}' as {}",
            self.line, self.token, self.expected
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for TreeLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of input while reading edges"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::TrailingInput(token) => {
                write!(f, "Unexpected token '{token}' after the last edge")
            }
            Self::Topology(e) => write!(f, "Invalid tree: {e}"),
        }
    }
}

impl std::error::Error for TreeLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Topology(e) => Some(e),
            Self::UnexpectedEof | Self::TrailingInput(_) => None,
        }
    }
}

impl From<std::io::Error> for TreeLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for TreeLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<TopologyError> for TreeLoaderError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

/// A configurable loader for tree instances.
///
/// # Configuration
/// * `zero_based_ids`: Interpret vertex ids in the input as `0..n` instead of
///   `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLoader<W> {
    zero_based_ids: bool,
    _marker: std::marker::PhantomData<W>,
}

impl<W> Default for TreeLoader<W> {
    fn default() -> Self {
        Self {
            zero_based_ids: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<W> TreeLoader<W>
where
    W: TreeWeight + FromStr,
{
    /// Creates a new `TreeLoader` reading 1-based vertex ids.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether vertex ids in the input start at zero.
    #[inline]
    pub fn zero_based_ids(mut self, yes: bool) -> Self {
        self.zero_based_ids = yes;
        self
    }

    /// Loads a tree from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Tree<W>, TreeLoaderError> {
        let mut tokens = Tokens::new(rdr);

        let n: usize = tokens.parse("vertex count")?;
        let mut builder = TreeBuilder::new(n);

        for _ in 0..n.saturating_sub(1) {
            let source = self.vertex(&mut tokens)?;
            let target = self.vertex(&mut tokens)?;
            let weight: W = tokens.parse("edge weight")?;
            builder.add_edge(source, target, weight);
        }

        if let Some((token, _)) = tokens.next_token()? {
            return Err(TreeLoaderError::TrailingInput(token));
        }

        Ok(builder.build()?)
    }

    /// Loads a tree from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Tree<W>, TreeLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a tree from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Tree<W>, TreeLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a tree from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Tree<W>, TreeLoaderError> {
        self.from_bufread(s.as_bytes())
    }

    fn vertex<R: BufRead>(&self, tokens: &mut Tokens<R>) -> Result<VertexIndex, TreeLoaderError> {
        let raw: usize = tokens.parse("vertex id")?;
        // A shifted id that overflows cannot name a vertex; `usize::MAX`
        // is guaranteed to fail the range check in `TreeBuilder::build`.
        let id = if self.zero_based_ids {
            raw.checked_add(1).unwrap_or(usize::MAX)
        } else {
            raw
        };
        Ok(VertexIndex::new(id))
    }
}

/// Splits a line-oriented reader into whitespace-delimited tokens,
/// dropping `#` comments and remembering the line each token came from.
struct Tokens<R> {
    rdr: R,
    line: usize,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            line: 0,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token and its line, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<(String, usize)>, TreeLoaderError> {
        let mut buf = String::new();
        while self.pending.is_empty() {
            buf.clear();
            if self.rdr.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let content = buf.split('#').next().unwrap_or("");
            self.pending
                .extend(content.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front().map(|token| (token, self.line)))
    }

    fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, TreeLoaderError> {
        let (token, line) = self.next_token()?.ok_or(TreeLoaderError::UnexpectedEof)?;
        token.parse::<T>().map_err(|_| {
            TreeLoaderError::Parse(ParseTokenError {
                token,
                line,
                expected,
            })
        })
    }
}
