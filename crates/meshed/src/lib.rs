/*
 * Copyright [2022] [Kevin Velasco]
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Generic graph construction and traversal: build a [`graph::Graph`]
//! from anything that can be queried and can enumerate its own edges,
//! then walk it depth- or breadth-first, acyclically or not, collecting
//! or projecting the visited subgraph back out.

mod anymap;
pub mod extract;
pub mod graph;
pub mod identify;

pub mod prelude {
    pub use crate::extract::{Edges, ExtractData, Label, Query};
    pub use crate::graph::{Graph, GraphDefinition, Inverted};
    pub use crate::identify::{Identifiable, Identity};
}
