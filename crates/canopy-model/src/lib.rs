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

//! # Canopy Model
//!
//! **The domain model for capacitated p-center queries on trees.**
//!
//! This crate defines the data the solver consumes and produces:
//!
//! * **`index`**: `VertexIndex`, the 1-based vertex id used throughout the API.
//! * **`tree`**: The immutable `Tree` and its `TreeBuilder`, which validates
//!   vertex ranges, weights, edge count, and acyclicity before handing out a
//!   tree.
//! * **`loading`**: `TreeLoader`, a reader for whitespace-delimited tree
//!   instances.
//! * **`solution`**: `CenterSolution`, the radius, opened centers, and
//!   vertex-to-center assignment returned by a query.
//!
//! Construction fails fast: a `Tree` that exists is connected and acyclic,
//! so downstream precomputation never sees malformed input.

pub mod index;
pub mod loading;
pub mod solution;
pub mod tree;
